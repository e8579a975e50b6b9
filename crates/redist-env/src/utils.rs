/// A `rustc-cfg` name and whether it is set for the current build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgFlag {
    pub name: String,
    pub enabled: bool,
}

impl CfgFlag {
    pub fn new<S: Into<String>>(name: S, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }

    /// The `rustc-check-cfg` declaration, followed by `rustc-cfg` when enabled.
    pub fn cargo_args(&self) -> Vec<String> {
        let mut args = vec![format!("cargo:rustc-check-cfg=cfg({})", self.name)];

        if self.enabled {
            args.push(format!("cargo:rustc-cfg={}", self.name));
        }

        args
    }
}

/// Pushes a [`CfgFlag`] named by a format string onto `$flags`.
macro_rules! rustc_cfg {
    ($flags:expr, $enable:expr, $($name:tt)*) => {
        $flags.push($crate::utils::CfgFlag::new(format!($($name)*), $enable))
    };
}
