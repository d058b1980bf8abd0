mod auth;
mod state;

pub use auth::TokenStore;
pub use state::MAX_HISTORY_ENTRIES;
pub use state::MoodHistory;
pub use state::StoreError;
