//! Resolves where a plugin's prebuilt third-party libraries live for a given
//! platform and build configuration, and what the build needs to be told
//! about them.
//!
//! ```ignore
//! use redist_build::{Configuration, LibrarySetResolver, Platform, PlatformProfile};
//!
//! let profile = PlatformProfile::new(Platform::Linux, Configuration::Shipping);
//! let set = LibrarySetResolver::default().resolve(["NvBlast"], &profile, "/blast")?;
//!
//! set.print_cargo_args();
//! ```

pub mod utils;

mod affixes;
mod configuration;
mod definition;
mod directory;
mod error;
mod library_set;
mod manifest;
mod platform;

pub use affixes::*;
pub use configuration::*;
pub use definition::*;
pub use directory::*;
pub use error::*;
pub use library_set::*;
pub use manifest::*;
pub use platform::*;

use std::path::Path;

/// The library directory for the given host identifiers, using the checked policy.
pub fn resolve_library_directory(
    platform: &str,
    configuration: &str,
    uses_debug_runtime: bool,
) -> Result<String> {
    let profile =
        PlatformProfile::parse(platform, configuration)?.debug_runtime(uses_debug_runtime);

    Ok(DirectoryPolicy::Checked.library_directory(&profile).to_string())
}

/// The affixes from the shared table. Unrecognized platforms get empty affixes.
pub fn resolve_platform_affixes(platform: &str) -> Affixes {
    match platform.parse::<Platform>() {
        Ok(platform) => AffixTable::shared()
            .get(platform)
            .cloned()
            .unwrap_or_default(),
        Err(_) => {
            tracing::debug!(platform, "unrecognized platform, using empty affixes");
            Affixes::default()
        }
    }
}

/// Resolves `names` with the shared affix table and the checked policy.
pub fn resolve_library_set<I, S>(
    names: I,
    profile: &PlatformProfile,
    base: impl AsRef<Path>,
) -> Result<ResolvedLibrarySet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    LibrarySetResolver::default().resolve(names, profile, base)
}
