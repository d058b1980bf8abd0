use tabled::Table;

use crate::{error, info, management::MoodHistory, success, types::HistoryTableRow};

pub async fn history(clear: bool) {
    let mut history = match MoodHistory::load(MoodHistory::default_path()).await {
        Ok(history) => history,
        Err(e) => error!("Failed to load mood history. Err: {}", e),
    };

    if clear {
        match history.clear().await {
            Ok(()) => success!("Mood history cleared."),
            Err(e) => error!("Failed to clear mood history. Err: {}", e),
        }
        return;
    }

    if history.entries().is_empty() {
        info!("No moods yet. Try moodmatch generate \"rainy sunday\"");
        return;
    }

    let rows: Vec<HistoryTableRow> = history
        .entries()
        .iter()
        .enumerate()
        .map(|(i, mood)| HistoryTableRow {
            position: i + 1,
            mood: mood.clone(),
        })
        .collect();

    println!("{}", Table::new(rows));
}
