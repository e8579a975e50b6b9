use anyhow::{Context, Result};
use clap::Args;
use redist_build::PlatformProfile;

/// Flags describing the build invocation being resolved.
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Target platform (e.g. Win64, Linux)
    #[arg(short, long, env = "REDIST_PLATFORM")]
    pub platform: String,

    /// Build configuration (Debug, DebugGame, Development, Test, Shipping)
    #[arg(short, long, env = "REDIST_CONFIGURATION")]
    pub configuration: String,

    /// Debug builds link the debug C runtime
    #[arg(long)]
    pub debug_crt: bool,

    /// Prefer shipping libraries
    #[arg(long)]
    pub shipping_libs: bool,

    /// Prefer checked libraries
    #[arg(long)]
    pub checked_libs: bool,
}

impl ProfileArgs {
    pub fn profile(&self) -> Result<PlatformProfile> {
        let profile = PlatformProfile::parse(&self.platform, &self.configuration)
            .context("Invalid build profile")?;

        Ok(profile
            .debug_runtime(self.debug_crt)
            .shipping_libs(self.shipping_libs)
            .checked_libs(self.checked_libs))
    }
}
