mod cmd;
mod profile_args;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// Setup logging based on verbose flag or RUST_LOG environment variable
fn setup_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("redist_cli=debug,redist_build=debug")
    } else {
        EnvFilter::new("redist_cli=info,redist_build=info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser)]
#[command(name = "cargo-redist")]
#[command(bin_name = "cargo-redist")]
#[command(version, long_about = None)]
#[command(about = "Resolve prebuilt third-party libraries per platform and configuration")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the library sets of a module manifest
    #[command(alias = "r")]
    Resolve(cmd::resolve::ResolveArgs),

    /// Print the library directory for a platform and configuration
    Directory(cmd::directory::DirectoryArgs),

    /// Print the file-name affixes for a platform
    Affixes(cmd::affixes::AffixesArgs),

    /// List known platforms
    #[command(alias = "ls")]
    ListPlatforms,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Resolve(args) => cmd::resolve::run(&args),
        Commands::Directory(args) => cmd::directory::run(&args),
        Commands::Affixes(args) => cmd::affixes::run(&args),
        Commands::ListPlatforms => cmd::list_platforms::run(),
    }
}
