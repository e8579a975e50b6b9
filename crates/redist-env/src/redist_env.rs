use redist_build::{
    utils::{is_truthy, shellsplit},
    Configuration, Error, LibrarySetResolver, Platform, PlatformProfile, ResolvedLibrarySet,
    Result,
};
use std::{collections::HashMap, path::PathBuf, rc::Rc};

use crate::utils::CfgFlag;

const ENV_PREFIX: &str = "REDIST_";
const CARGO_VARS: [&str; 2] = ["TARGET", "PROFILE"];
const FLAG_VARS: [&str; 3] = ["DEBUG_CRT", "SHIPPING_LIBS", "CHECKED_LIBS"];

/// The build invocation, as seen from a build script's environment.
#[derive(Debug, Clone)]
pub struct RedistEnv {
    vars: Rc<HashMap<String, String>>,
}

impl RedistEnv {
    /// Builds an environment from explicit key/value pairs. Only `REDIST_*`,
    /// `TARGET` and `PROFILE` are kept.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars.into_iter().map(|(k, v)| (k.into(), v.into()));
        let vars =
            vars.filter(|(k, _)| k.starts_with(ENV_PREFIX) || CARGO_VARS.contains(&k.as_str()));
        let vars: HashMap<String, String> = vars.collect();

        Self {
            vars: Rc::new(vars),
        }
    }

    /// Raw value of a variable, `REDIST_` prefix included.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| v.as_str())
    }

    fn get_redist(&self, key: &str) -> Option<&str> {
        self.get(&format!("{}{}", ENV_PREFIX, key))
    }

    fn flag(&self, key: &str) -> bool {
        self.get_redist(key).map(is_truthy).unwrap_or(false)
    }

    /// `REDIST_PLATFORM`, or the platform of Cargo's `TARGET` triple.
    pub fn platform(&self) -> Result<Platform> {
        if let Some(platform) = self.get_redist("PLATFORM") {
            return platform.parse();
        }

        match self.get("TARGET") {
            Some(triple) => Platform::from_target_triple(triple),
            None => Err(Error::MissingEnv("TARGET")),
        }
    }

    /// `REDIST_CONFIGURATION`, or a configuration derived from Cargo's `PROFILE`.
    pub fn configuration(&self) -> Result<Configuration> {
        if let Some(configuration) = self.get_redist("CONFIGURATION") {
            return configuration.parse();
        }

        match self.get("PROFILE") {
            Some(profile) => Ok(Configuration::from_cargo_profile(profile)),
            None => Err(Error::MissingEnv("PROFILE")),
        }
    }

    pub fn uses_debug_runtime(&self) -> bool {
        self.flag("DEBUG_CRT")
    }

    pub fn profile(&self) -> Result<PlatformProfile> {
        Ok(PlatformProfile::new(self.platform()?, self.configuration()?)
            .debug_runtime(self.uses_debug_runtime())
            .shipping_libs(self.flag("SHIPPING_LIBS"))
            .checked_libs(self.flag("CHECKED_LIBS")))
    }

    /// Library names from `REDIST_LIBRARIES`, in order.
    pub fn libraries(&self) -> Vec<String> {
        self.get_redist("LIBRARIES")
            .map(shellsplit)
            .unwrap_or_default()
    }

    pub fn base_dir(&self) -> Option<PathBuf> {
        self.get_redist("BASE_DIR").map(PathBuf::from)
    }

    /// Resolves `REDIST_LIBRARIES` under `REDIST_BASE_DIR` with `resolver`.
    pub fn resolve(&self, resolver: &LibrarySetResolver) -> Result<ResolvedLibrarySet> {
        let base = self
            .base_dir()
            .ok_or(Error::MissingEnv("REDIST_BASE_DIR"))?;

        resolver.resolve(self.libraries(), &self.profile()?, base)
    }

    /// Every `rustc-cfg` flag this crate declares, with whether it is set for
    /// this environment. Unresolvable platforms or configurations leave their
    /// flags unset.
    pub fn cfg_flags(&self) -> Vec<CfgFlag> {
        let platform = self.platform().ok();
        let configuration = self.configuration().ok();
        let mut flags = vec![];

        for p in Platform::all() {
            rustc_cfg!(
                flags,
                platform == Some(*p),
                "redist_platform_{}",
                p.as_str().to_lowercase()
            );
        }

        for c in Configuration::all() {
            rustc_cfg!(
                flags,
                configuration == Some(*c),
                "redist_config_{}",
                c.as_str().to_lowercase()
            );
        }

        rustc_cfg!(flags, platform.is_some_and(|p| p.is_windows_family()), "redist_windows");
        rustc_cfg!(flags, platform.is_some_and(|p| p.is_linux_family()), "redist_linux");
        rustc_cfg!(flags, self.uses_debug_runtime(), "redist_debug_crt");

        flags
    }

    /// Prints args for rustc (i.e. `cargo:rustc-cfg=...`).
    pub fn print_cargo_rustc_cfg(&self) {
        for flag in self.cfg_flags() {
            for arg in flag.cargo_args() {
                println!("{}", arg);
            }
        }
    }

    /// Prints directives for re-runs (i.e. `cargo:rerun-if-env-changed=...`)
    pub fn print_cargo_rerun_if_changed(&self) {
        for key in self.rerun_vars() {
            println!("cargo:rerun-if-env-changed={}", key);
        }

        println!("cargo:rerun-if-changed=build.rs");
    }

    fn rerun_vars(&self) -> Vec<String> {
        let mut keys: Vec<String> = ["PLATFORM", "CONFIGURATION", "LIBRARIES", "BASE_DIR"]
            .iter()
            .chain(FLAG_VARS.iter())
            .map(|k| format!("{}{}", ENV_PREFIX, k))
            .collect();

        keys.extend(CARGO_VARS.iter().map(|k| k.to_string()));
        keys
    }
}

impl Default for RedistEnv {
    fn default() -> Self {
        Self::from_vars(std::env::vars())
    }
}
