use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Platform, Result};

/// File-name prefix and suffixes for a platform's prebuilt binaries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Affixes {
    pub prefix: String,
    pub library_suffix: String,
    pub dll_suffix: String,
}

impl Affixes {
    pub fn new<P, L, D>(prefix: P, library_suffix: L, dll_suffix: D) -> Self
    where
        P: Into<String>,
        L: Into<String>,
        D: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            library_suffix: library_suffix.into(),
            dll_suffix: dll_suffix.into(),
        }
    }

    /// Import library plus DLL (`Foo.lib`, `Foo.dll`).
    pub fn windows() -> Self {
        Self::new("", ".lib", ".dll")
    }

    /// Shared object linked and loaded directly (`libFoo.so`).
    pub fn unix_shared() -> Self {
        Self::new("lib", ".so", ".so")
    }

    /// Static archive, nothing to load at runtime (`libFoo.a`).
    pub fn unix_static() -> Self {
        Self::new("lib", ".a", "")
    }

    /// Static `.lib`, nothing to load at runtime.
    pub fn windows_static() -> Self {
        Self::new("", ".lib", "")
    }

    /// True when no library could ever be resolved with these affixes.
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.library_suffix.is_empty() && self.dll_suffix.is_empty()
    }

    /// Inserts an architecture qualifier before each extension, so
    /// `.lib` becomes `_x64.lib`.
    pub fn qualified(&self, arch: &str) -> Self {
        Self {
            prefix: self.prefix.clone(),
            library_suffix: qualify(&self.library_suffix, arch),
            dll_suffix: qualify(&self.dll_suffix, arch),
        }
    }

    pub fn library_file_name(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, self.library_suffix)
    }

    /// The runtime artifact name, if the platform has one.
    pub fn dll_file_name(&self, name: &str) -> Option<String> {
        if self.dll_suffix.is_empty() {
            None
        } else {
            Some(format!("{}{}{}", self.prefix, name, self.dll_suffix))
        }
    }
}

fn qualify(suffix: &str, arch: &str) -> String {
    if suffix.is_empty() {
        String::new()
    } else {
        format!("_{}{}", arch, suffix)
    }
}

/// What to do with a platform missing from an [`AffixTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnsupportedPlatform {
    /// Resolve to empty affixes; the module builds without the dependency.
    #[default]
    Skip,
    /// Refuse to build.
    Fail,
}

/// An immutable platform -> affixes lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixTable {
    entries: BTreeMap<Platform, Affixes>,
    unsupported: UnsupportedPlatform,
}

impl AffixTable {
    pub fn new(unsupported: UnsupportedPlatform) -> Self {
        Self {
            entries: BTreeMap::new(),
            unsupported,
        }
    }

    /// Registers `affixes` for every platform in `platforms`.
    pub fn with(mut self, platforms: &[Platform], affixes: Affixes) -> Self {
        for platform in platforms {
            self.entries.insert(*platform, affixes.clone());
        }

        self
    }

    /// Shared libraries for Windows and Linux; every other platform is skipped.
    pub fn shared() -> Self {
        Self::new(UnsupportedPlatform::Skip)
            .with(
                &[
                    Platform::Win64,
                    Platform::Win32,
                    Platform::HoloLens,
                    Platform::XboxOne,
                ],
                Affixes::windows(),
            )
            .with(&[Platform::Linux, Platform::LinuxArm64], Affixes::unix_shared())
    }

    /// Static archives only. Platforms without archives fail the build.
    pub fn static_archives() -> Self {
        Self::new(UnsupportedPlatform::Fail)
            .with(
                &[Platform::Win64, Platform::Win32, Platform::XboxOne],
                Affixes::windows_static(),
            )
            .with(
                &[Platform::Linux, Platform::Mac, Platform::PS4],
                Affixes::unix_static(),
            )
    }

    /// Static libraries for desktop Windows, Mac and Linux; every other
    /// platform is skipped.
    pub fn static_libraries() -> Self {
        Self::new(UnsupportedPlatform::Skip)
            .with(&[Platform::Win64, Platform::Win32], Affixes::windows_static())
            .with(&[Platform::Mac, Platform::Linux], Affixes::unix_static())
    }

    /// Drops every platform not in `platforms`.
    pub fn restrict_to(mut self, platforms: &[Platform]) -> Self {
        self.entries.retain(|platform, _| platforms.contains(platform));
        self
    }

    pub fn unsupported_policy(&self) -> UnsupportedPlatform {
        self.unsupported
    }

    pub fn get(&self, platform: Platform) -> Option<&Affixes> {
        self.entries.get(&platform)
    }

    pub fn is_supported(&self, platform: Platform) -> bool {
        self.entries.contains_key(&platform)
    }

    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.entries.keys().copied()
    }

    /// Looks up the affixes for `platform`, applying the unsupported-platform policy.
    pub fn affixes(&self, platform: Platform) -> Result<Affixes> {
        match (self.entries.get(&platform), self.unsupported) {
            (Some(affixes), _) => Ok(affixes.clone()),
            (None, UnsupportedPlatform::Skip) => {
                debug!(%platform, "no affixes registered, skipping");
                Ok(Affixes::default())
            }
            (None, UnsupportedPlatform::Fail) => Err(Error::UnsupportedPlatform { platform }),
        }
    }
}

impl Default for AffixTable {
    fn default() -> Self {
        Self::shared()
    }
}

/// The named affix tables a module manifest can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AffixTableKind {
    #[default]
    Shared,
    StaticArchives,
    StaticLibraries,
}

impl AffixTableKind {
    pub fn table(&self) -> AffixTable {
        match self {
            AffixTableKind::Shared => AffixTable::shared(),
            AffixTableKind::StaticArchives => AffixTable::static_archives(),
            AffixTableKind::StaticLibraries => AffixTable::static_libraries(),
        }
    }
}

impl std::str::FromStr for AffixTableKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "shared" => Ok(AffixTableKind::Shared),
            "static" | "static-archives" => Ok(AffixTableKind::StaticArchives),
            "static-libraries" => Ok(AffixTableKind::StaticLibraries),
            _ => Err(Error::UnknownPolicy(s.to_string())),
        }
    }
}
