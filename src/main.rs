use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use moodmatch::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth(AuthOptions),

    /// Generate a playlist from a mood
    Generate(GenerateOptions),

    /// Show or clear recently used moods
    History(HistoryOptions),

    /// Show authentication and history state
    Status,

    /// Forget the stored Spotify token
    Logout,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Give up after this many seconds (default: wait until Ctrl-C)
    #[clap(long)]
    timeout: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// How you feel, up to 50 characters
    mood: String,

    /// Emoji to go with the mood
    #[clap(long)]
    emoji: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct HistoryOptions {
    /// Remove all remembered moods
    #[clap(long)]
    clear: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // these two never touch the network or the configuration
    match &cli.command {
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            return;
        }
        Command::History(opt) => {
            cli::history(opt.clear).await;
            return;
        }
        _ => {}
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!(
            "Invalid configuration: {}. Check {}",
            e,
            config::data_dir().join(".env").display()
        ),
    };

    match cli.command {
        Command::Auth(opt) => cli::auth(&config, opt.timeout).await,
        Command::Generate(opt) => cli::generate(&config, opt.mood, opt.emoji).await,
        Command::Status => cli::status(&config).await,
        Command::Logout => cli::logout(&config).await,
        Command::History(_) | Command::Completions(_) => {}
    }
}
