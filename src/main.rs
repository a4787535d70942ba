use std::path::PathBuf;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use discogs2spotify::{
    cli,
    config::{self, Config},
    error,
    matching::MatchPolicy,
    spotify::UpsertMode,
    sync::SyncMode,
};

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
    /// Env file with the Discogs and Spotify credentials
    #[clap(long, global = true)]
    env_file: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify and cache the token
    Auth(AuthOptions),

    /// List the collection folders of a Discogs user
    Folders(FoldersOptions),

    /// Copy a Discogs collection folder into a Spotify playlist
    Sync(SyncOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Paste the redirect URL instead of running a local callback server
    #[clap(long)]
    manual: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct FoldersOptions {
    /// Discogs username
    #[clap(long)]
    username: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Discogs username (prompted when missing)
    #[clap(long)]
    username: Option<String>,

    /// Collection folder id (prompted when missing; 0 is "All")
    #[clap(long)]
    folder: Option<u64>,

    /// Target playlist name (prompted when missing)
    #[clap(long)]
    playlist: Option<String>,

    /// What to add for each matched release
    #[clap(long, value_enum, default_value_t = SyncMode::Album)]
    mode: SyncMode,

    /// How a search result is chosen
    #[clap(long, value_enum, default_value_t = MatchPolicy::First)]
    match_policy: MatchPolicy,

    #[clap(flatten)]
    upsert: UpsertFlags,

    /// File receiving the albums without a match
    #[clap(long)]
    unmatched_file: Option<PathBuf>,

    /// Do not write the unmatched albums file
    #[clap(long, conflicts_with = "unmatched_file")]
    no_unmatched_file: bool,
}

#[derive(Args, Debug, Clone)]
#[group(multiple = false)]
pub struct UpsertFlags {
    /// Replace the playlist contents (default for --mode single)
    #[clap(long)]
    replace: bool,

    /// Append to the playlist contents (default for album and tracklist)
    #[clap(long)]
    append: bool,
}

impl UpsertFlags {
    fn mode(&self) -> Option<UpsertMode> {
        match (self.replace, self.append) {
            (true, _) => Some(UpsertMode::Replace),
            (_, true) => Some(UpsertMode::Append),
            _ => None,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env(cli.env_file.as_deref()).await {
        error!("Cannot load environment. Err: {}", e);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };

    match cli.command {
        Command::Auth(opt) => cli::auth(&config, opt.manual).await,
        Command::Folders(opt) => cli::folders(&config, &opt.username).await,
        Command::Sync(opt) => {
            let args = cli::SyncArgs {
                username: opt.username,
                folder: opt.folder,
                playlist: opt.playlist,
                mode: opt.mode,
                policy: opt.match_policy,
                upsert: opt.upsert.mode(),
                unmatched_file: opt.unmatched_file,
                no_unmatched_file: opt.no_unmatched_file,
            };
            cli::sync(&config, args).await
        }
        Command::Completions(_) => {}
    }
}
