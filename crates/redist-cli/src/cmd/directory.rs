use anyhow::Result;
use clap::Args;
use redist_build::DirectoryPolicy;

use crate::profile_args::ProfileArgs;

#[derive(Args, Debug, Clone)]
pub struct DirectoryArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Directory policy (checked, debug-or-release, debug-runtime,
    /// capitalized-debug-runtime, platform-debug-runtime)
    #[arg(long, default_value = "checked")]
    pub policy: DirectoryPolicy,
}

pub fn run(args: &DirectoryArgs) -> Result<()> {
    let profile = args.profile.profile()?;

    println!("{}", args.policy.library_directory(&profile));

    Ok(())
}
