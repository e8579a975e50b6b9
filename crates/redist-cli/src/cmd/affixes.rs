use anyhow::Result;
use clap::Args;
use redist_build::{Affixes, AffixTableKind, Platform};
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct AffixesArgs {
    /// Target platform (e.g. Win64, Linux)
    #[arg(short, long, env = "REDIST_PLATFORM")]
    pub platform: String,

    /// Affix table (shared, static-archives, static-libraries)
    #[arg(long, default_value = "shared")]
    pub table: AffixTableKind,

    /// Architecture qualifier inserted before each extension (e.g. x64)
    #[arg(long)]
    pub arch: Option<String>,
}

pub fn run(args: &AffixesArgs) -> Result<()> {
    let affixes = lookup(args);

    println!("prefix={:?}", affixes.prefix);
    println!("library_suffix={:?}", affixes.library_suffix);
    println!("dll_suffix={:?}", affixes.dll_suffix);

    Ok(())
}

// Unknown or unsupported platforms get empty affixes rather than an error.
fn lookup(args: &AffixesArgs) -> Affixes {
    let platform = match args.platform.parse::<Platform>() {
        Ok(platform) => platform,
        Err(e) => {
            warn!("{}", e);
            return Affixes::default();
        }
    };

    let affixes = args
        .table
        .table()
        .get(platform)
        .cloned()
        .unwrap_or_default();

    match &args.arch {
        Some(arch) => affixes.qualified(arch),
        None => affixes,
    }
}
