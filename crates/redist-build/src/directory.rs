use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Configuration, Error, PlatformProfile};

/// How a module picks the library directory for a build configuration.
///
/// Plugins disagree on this, so each rule is kept as its own policy rather
/// than folded into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectoryPolicy {
    /// `debug`/`checked`/`release`/`profile`, honouring the shipping and
    /// checked library flags.
    #[default]
    Checked,
    /// `debug` for Debug builds, `release` for everything else.
    DebugOrRelease,
    /// `debug` only when Debug builds also use the debug C runtime.
    DebugRuntime,
    /// Same rule as `DebugRuntime`, spelled `Debug`/`Release`.
    CapitalizedDebugRuntime,
    /// `Debug`/`Release`, requiring the debug C runtime on Windows-family
    /// platforms only.
    PlatformDebugRuntime,
}

impl DirectoryPolicy {
    pub fn all() -> &'static [DirectoryPolicy] {
        &[
            DirectoryPolicy::Checked,
            DirectoryPolicy::DebugOrRelease,
            DirectoryPolicy::DebugRuntime,
            DirectoryPolicy::CapitalizedDebugRuntime,
            DirectoryPolicy::PlatformDebugRuntime,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectoryPolicy::Checked => "checked",
            DirectoryPolicy::DebugOrRelease => "debug-or-release",
            DirectoryPolicy::DebugRuntime => "debug-runtime",
            DirectoryPolicy::CapitalizedDebugRuntime => "capitalized-debug-runtime",
            DirectoryPolicy::PlatformDebugRuntime => "platform-debug-runtime",
        }
    }

    /// The library directory name for `profile`. Never empty.
    pub fn library_directory(&self, profile: &PlatformProfile) -> &'static str {
        let dir = match self {
            DirectoryPolicy::Checked => checked_directory(profile),
            DirectoryPolicy::DebugOrRelease => match profile.configuration {
                Configuration::Debug => "debug",
                _ => "release",
            },
            DirectoryPolicy::DebugRuntime if debug_with_crt(profile) => "debug",
            DirectoryPolicy::DebugRuntime => "release",
            DirectoryPolicy::CapitalizedDebugRuntime if debug_with_crt(profile) => "Debug",
            DirectoryPolicy::CapitalizedDebugRuntime => "Release",
            DirectoryPolicy::PlatformDebugRuntime => {
                let debug_crt_ok =
                    !profile.platform.is_windows_family() || profile.uses_debug_runtime;

                if profile.configuration == Configuration::Debug && debug_crt_ok {
                    "Debug"
                } else {
                    "Release"
                }
            }
        };

        debug!(
            policy = self.as_str(),
            platform = %profile.platform,
            configuration = %profile.configuration,
            dir,
            "resolved library directory"
        );

        dir
    }
}

fn debug_with_crt(profile: &PlatformProfile) -> bool {
    profile.configuration == Configuration::Debug && profile.uses_debug_runtime
}

// The order of these checks decides which library variant gets linked.
fn checked_directory(profile: &PlatformProfile) -> &'static str {
    match profile.configuration {
        Configuration::Debug if profile.uses_debug_runtime => "debug",
        Configuration::Debug => "checked",
        Configuration::Shipping => "release",
        Configuration::Test => "profile",
        _ => {
            if profile.libs.shipping {
                "release"
            } else if profile.libs.checked {
                "checked"
            } else {
                "profile"
            }
        }
    }
}

impl FromStr for DirectoryPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DirectoryPolicy::all()
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| Error::UnknownPolicy(s.to_string()))
    }
}

impl fmt::Display for DirectoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
