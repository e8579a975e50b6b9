use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// A target platform known to the host build tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Win64,
    Win32,
    HoloLens,
    XboxOne,
    Linux,
    LinuxArm64,
    Mac,
    IOS,
    Android,
    PS4,
    Switch,
}

const PLATFORMS: [Platform; 11] = [
    Platform::Win64,
    Platform::Win32,
    Platform::HoloLens,
    Platform::XboxOne,
    Platform::Linux,
    Platform::LinuxArm64,
    Platform::Mac,
    Platform::IOS,
    Platform::Android,
    Platform::PS4,
    Platform::Switch,
];

impl Platform {
    /// Every platform, in a stable order.
    pub fn all() -> &'static [Platform] {
        &PLATFORMS
    }

    /// The identifier the host build tool uses for this platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Win64 => "Win64",
            Platform::Win32 => "Win32",
            Platform::HoloLens => "HoloLens",
            Platform::XboxOne => "XboxOne",
            Platform::Linux => "Linux",
            Platform::LinuxArm64 => "LinuxArm64",
            Platform::Mac => "Mac",
            Platform::IOS => "IOS",
            Platform::Android => "Android",
            Platform::PS4 => "PS4",
            Platform::Switch => "Switch",
        }
    }

    /// Platforms linking against MSVC-style `.lib` import libraries.
    pub fn is_windows_family(&self) -> bool {
        matches!(
            self,
            Platform::Win64 | Platform::Win32 | Platform::HoloLens | Platform::XboxOne
        )
    }

    pub fn is_linux_family(&self) -> bool {
        matches!(self, Platform::Linux | Platform::LinuxArm64)
    }

    pub fn is_apple(&self) -> bool {
        matches!(self, Platform::Mac | Platform::IOS)
    }

    /// A short family name, used for display and `rustc-cfg` flags.
    pub fn family(&self) -> &'static str {
        if self.is_windows_family() {
            "windows"
        } else if self.is_linux_family() {
            "linux"
        } else if self.is_apple() {
            "apple"
        } else if *self == Platform::Android {
            "android"
        } else {
            "console"
        }
    }

    /// Maps a Rust target triple (i.e. `x86_64-pc-windows-msvc`) to a platform.
    pub fn from_target_triple(triple: &str) -> Result<Platform, Error> {
        let arch = triple.split('-').next().unwrap_or_default();
        let is_x86 = matches!(arch, "i386" | "i586" | "i686");

        let platform = if triple.contains("windows") {
            if is_x86 {
                Some(Platform::Win32)
            } else {
                Some(Platform::Win64)
            }
        } else if triple.contains("android") {
            Some(Platform::Android)
        } else if triple.contains("linux") {
            match arch {
                "x86_64" => Some(Platform::Linux),
                "aarch64" => Some(Platform::LinuxArm64),
                _ => None,
            }
        } else if triple.contains("apple-darwin") {
            Some(Platform::Mac)
        } else if triple.contains("apple-ios") {
            Some(Platform::IOS)
        } else {
            None
        };

        platform.ok_or_else(|| Error::UnknownPlatform(triple.to_string()))
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PLATFORMS
            .iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| Error::UnknownPlatform(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;

        s.parse().map_err(de::Error::custom)
    }
}
