use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

use crate::{Error, Platform};

/// A named build configuration of the host build tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Configuration {
    Debug,
    DebugGame,
    Development,
    Test,
    Shipping,
    Unknown,
}

const CONFIGURATIONS: [Configuration; 6] = [
    Configuration::Debug,
    Configuration::DebugGame,
    Configuration::Development,
    Configuration::Test,
    Configuration::Shipping,
    Configuration::Unknown,
];

impl Configuration {
    pub fn all() -> &'static [Configuration] {
        &CONFIGURATIONS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Configuration::Debug => "Debug",
            Configuration::DebugGame => "DebugGame",
            Configuration::Development => "Development",
            Configuration::Test => "Test",
            Configuration::Shipping => "Shipping",
            Configuration::Unknown => "Unknown",
        }
    }

    /// Maps a Cargo `PROFILE` value to a configuration. Cargo only reports
    /// `debug` or `release`; anything else is treated as `Unknown`.
    pub fn from_cargo_profile(profile: &str) -> Configuration {
        match profile {
            "debug" => Configuration::Debug,
            "release" => Configuration::Development,
            _ => Configuration::Unknown,
        }
    }
}

impl FromStr for Configuration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CONFIGURATIONS
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| Error::UnknownConfiguration(s.to_string()))
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Configuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Flags asking for a specific flavour of the prebuilt runtime libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RuntimeLibraryFlags {
    pub shipping: bool,
    pub checked: bool,
}

/// Everything the build invocation tells us about the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformProfile {
    pub platform: Platform,
    pub configuration: Configuration,
    pub uses_debug_runtime: bool,
    pub libs: RuntimeLibraryFlags,
}

impl PlatformProfile {
    pub fn new(platform: Platform, configuration: Configuration) -> Self {
        Self {
            platform,
            configuration,
            uses_debug_runtime: false,
            libs: RuntimeLibraryFlags::default(),
        }
    }

    /// Parses the platform and configuration identifiers given by the host.
    pub fn parse(platform: &str, configuration: &str) -> Result<Self, Error> {
        Ok(Self::new(platform.parse()?, configuration.parse()?))
    }

    /// Whether debug builds link the debug C runtime.
    pub fn debug_runtime(mut self, enabled: bool) -> Self {
        self.uses_debug_runtime = enabled;
        self
    }

    pub fn shipping_libs(mut self, enabled: bool) -> Self {
        self.libs.shipping = enabled;
        self
    }

    pub fn checked_libs(mut self, enabled: bool) -> Self {
        self.libs.checked = enabled;
        self
    }
}
