//! # `redist-env`
//!
//! Helpers to link prebuilt third-party libraries from a Cargo build script.
//!
//! ## Features
//!
//! - Reads the target platform, build configuration and runtime-library flags
//!   from the build script's environment
//! - Sets `rustc-cfg` flags describing the resolved platform and configuration
//! - Resolves library sets with `redist-build`
//!
//! ## Usage
//!
//! In your crate's `build.rs`:
//!
//! ```rust
//! pub fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let env = redist_env::activate()?;
//!     let set = env.resolve(&redist_build::LibrarySetResolver::default())?;
//!
//!     set.print_cargo_args();
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Available `rustc-cfg`
//!
//! - `#[cfg(redist_platform_win64)]`, `#[cfg(redist_platform_linux)]`, ...
//! - `#[cfg(redist_config_debug)]`, `#[cfg(redist_config_shipping)]`, ...
//! - `#[cfg(redist_windows)]`
//! - `#[cfg(redist_linux)]`
//! - `#[cfg(redist_debug_crt)]`

#[macro_use]
mod utils;
mod redist_env;

use std::error::Error;

pub use redist_env::RedistEnv;
pub use utils::CfgFlag;

#[cfg(test)]
static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Loads the environment and prints the `rerun-if-env-changed` and
/// `rustc-cfg` directives for it. Fails if the platform or configuration
/// cannot be determined.
pub fn activate() -> Result<RedistEnv, Box<dyn Error>> {
    let env = RedistEnv::default();

    env.print_cargo_rerun_if_changed();
    let profile = env.profile()?;
    env.print_cargo_rustc_cfg();

    tracing::debug!(?profile, "activated redist environment");

    Ok(env)
}

/// Loads the environment without printing any Cargo directives.
pub fn load() -> Result<RedistEnv, Box<dyn Error>> {
    Ok(RedistEnv::default())
}
