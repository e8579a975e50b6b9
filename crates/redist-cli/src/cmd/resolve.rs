use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use redist_build::{ModuleManifest, ModuleSpec, PlatformProfile, ResolvedLibrarySet};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::profile_args::ProfileArgs;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
    Cargo,
}

/// Configuration for resolving a module manifest
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Path to the module manifest (TOML)
    #[arg(short, long, env = "REDIST_MANIFEST")]
    pub manifest: PathBuf,

    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Only resolve the module with this name
    #[arg(long)]
    pub module: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Serialize)]
struct ModuleOutput<'a> {
    module: &'a str,
    policy: String,
    profile: &'a PlatformProfile,
    #[serde(flatten)]
    set: &'a ResolvedLibrarySet,
}

#[instrument(skip(args), fields(manifest = %args.manifest.display()))]
pub fn run(args: &ResolveArgs) -> Result<()> {
    let profile = args.profile.profile()?;
    let manifest = ModuleManifest::load(&args.manifest)
        .with_context(|| format!("Failed to load manifest: {}", args.manifest.display()))?;

    let modules: Vec<&ModuleSpec> = match &args.module {
        Some(name) => vec![manifest.find(name)?],
        None => manifest.modules.iter().collect(),
    };

    // Resolve everything before printing anything.
    let mut resolved = Vec::with_capacity(modules.len());
    for module in modules {
        let set = module
            .resolve(&profile)
            .with_context(|| format!("Failed to resolve module {}", module.name))?;
        resolved.push((module, set));
    }

    info!(
        platform = %profile.platform,
        configuration = %profile.configuration,
        modules = resolved.len(),
        "Resolved manifest"
    );

    match args.format {
        Format::Text => print_text(&profile, &resolved),
        Format::Json => print_json(&profile, &resolved)?,
        Format::Cargo => {
            for (_, set) in &resolved {
                set.print_cargo_args();
            }
        }
    }

    Ok(())
}

fn print_text(profile: &PlatformProfile, resolved: &[(&ModuleSpec, ResolvedLibrarySet)]) {
    for (module, set) in resolved {
        println!(
            "{} ({}, {}/{})",
            module.name, module.policy, profile.platform, profile.configuration
        );
        println!("  directory: {}", set.directory);

        if !module.resolver().affix_table().is_supported(profile.platform) {
            println!("  no prebuilt libraries for {}", profile.platform);
        }

        print_section("link", set.link_libraries.iter().map(|p| p.display().to_string()));
        print_section(
            "runtime",
            set.runtime_libraries.iter().map(|p| p.display().to_string()),
        );
        print_section("definitions", set.definitions.iter().map(|d| d.to_string()));
    }
}

fn print_section(title: &str, items: impl Iterator<Item = String>) {
    let items: Vec<String> = items.collect();

    if items.is_empty() {
        return;
    }

    println!("  {}:", title);
    for item in items {
        println!("    {}", item);
    }
}

fn print_json(
    profile: &PlatformProfile,
    resolved: &[(&ModuleSpec, ResolvedLibrarySet)],
) -> Result<()> {
    let output: Vec<ModuleOutput> = resolved
        .iter()
        .map(|(module, set)| ModuleOutput {
            module: &module.name,
            policy: module.policy.to_string(),
            profile,
            set,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
