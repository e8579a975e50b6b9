use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{AffixTable, Affixes, Definition, DirectoryPolicy, Error, PlatformProfile, Result};

/// One prebuilt library, as laid out on disk for a given platform and configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryDescriptor {
    pub name: String,
    /// Appended to `name` before the affixes, i.e. `d` for debug builds.
    pub name_suffix: String,
    pub affixes: Affixes,
    pub directory: String,
    /// Path below the configuration directory, i.e. `Win64` in `Release/Win64`.
    pub subdir: Option<PathBuf>,
}

impl LibraryDescriptor {
    pub fn new<S: Into<String>>(name: S, affixes: Affixes, directory: &str) -> Self {
        Self {
            name: name.into(),
            name_suffix: String::new(),
            affixes,
            directory: directory.to_string(),
            subdir: None,
        }
    }

    /// The library name as it appears in file names.
    pub fn stem(&self) -> String {
        format!("{}{}", self.name, self.name_suffix)
    }

    /// The directory holding the library's artifacts.
    pub fn search_path(&self, base: &Path) -> PathBuf {
        let dir = base.join(&self.directory);

        match &self.subdir {
            Some(subdir) => dir.join(subdir),
            None => dir,
        }
    }

    /// The artifact handed to the linker.
    pub fn link_path(&self, base: &Path) -> PathBuf {
        self.search_path(base)
            .join(self.affixes.library_file_name(&self.stem()))
    }

    /// The artifact loaded at runtime, if the platform has one.
    pub fn runtime_path(&self, base: &Path) -> Option<PathBuf> {
        self.affixes
            .dll_file_name(&self.stem())
            .map(|file| self.search_path(base).join(file))
    }
}

/// The resolved libraries for a single build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLibrarySet {
    pub directory: String,
    pub search_path: PathBuf,
    pub affixes: Affixes,
    pub link_libraries: Vec<PathBuf>,
    pub runtime_libraries: Vec<PathBuf>,
    pub delay_load: Vec<String>,
    pub definitions: Vec<Definition>,
}

impl ResolvedLibrarySet {
    /// True when nothing needs to be linked, i.e. on an unsupported platform.
    pub fn is_empty(&self) -> bool {
        self.link_libraries.is_empty() && self.runtime_libraries.is_empty()
    }

    /// Get the resolved set as Cargo build script directives.
    pub fn cargo_args(&self) -> Vec<String> {
        let mut result = vec![];

        if !self.link_libraries.is_empty() {
            result.push(format!(
                "cargo:rustc-link-search=native={}",
                self.search_path.display()
            ));
        }

        for lib in &self.link_libraries {
            result.push(format!("cargo:rustc-link-arg={}", lib.display()));
        }

        for def in &self.definitions {
            result.push(format!("cargo:rustc-env={}={}", def.name, def.raw_value()));
        }

        result
    }

    /// Print the Cargo directives to stdout.
    pub fn print_cargo_args(&self) {
        for arg in self.cargo_args() {
            println!("{}", arg);
        }
    }
}

/// Resolves library names into paths with an injected affix table and
/// directory policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySetResolver {
    affixes: AffixTable,
    policy: DirectoryPolicy,
    define_prefix: Option<String>,
    with_define: bool,
    debug_suffix: Option<String>,
    subdir: Option<PathBuf>,
}

impl Default for LibrarySetResolver {
    fn default() -> Self {
        Self::new(AffixTable::shared(), DirectoryPolicy::Checked)
    }
}

impl LibrarySetResolver {
    pub fn new(affixes: AffixTable, policy: DirectoryPolicy) -> Self {
        Self {
            affixes,
            policy,
            define_prefix: None,
            with_define: false,
            debug_suffix: None,
            subdir: None,
        }
    }

    /// Emit `{prefix}_LIB_CONFIG_STRING`, `{prefix}_LIB_DLL_PREFIX` and
    /// `{prefix}_LIB_DLL_SUFFIX` definitions.
    pub fn define_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.define_prefix = Some(prefix.into());
        self
    }

    /// Also emit `WITH_{prefix}=0|1`.
    pub fn with_define(mut self, enabled: bool) -> Self {
        self.with_define = enabled;
        self
    }

    /// Appended to every library name when the policy picks a `debug`
    /// directory (`ULIS1.0` -> `ULIS1.0d`).
    pub fn debug_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.debug_suffix = Some(suffix.into());
        self
    }

    /// Places the libraries in `base/<directory>/<subdir>`.
    pub fn subdir<P: Into<PathBuf>>(mut self, subdir: P) -> Self {
        self.subdir = Some(subdir.into());
        self
    }

    pub fn affix_table(&self) -> &AffixTable {
        &self.affixes
    }

    pub fn policy(&self) -> DirectoryPolicy {
        self.policy
    }

    /// Resolves `names` under `base`, keeping the order of `names`.
    pub fn resolve<I, S>(
        &self,
        names: I,
        profile: &PlatformProfile,
        base: impl AsRef<Path>,
    ) -> Result<ResolvedLibrarySet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = validate_names(names)?;
        let base = base.as_ref();
        let directory = self.policy.library_directory(profile);
        let affixes = self.affixes.affixes(profile.platform)?;
        let supported = self.affixes.is_supported(profile.platform);

        let name_suffix = match &self.debug_suffix {
            Some(suffix) if directory.eq_ignore_ascii_case("debug") => suffix.as_str(),
            _ => "",
        };

        let template = LibraryDescriptor {
            name: String::new(),
            name_suffix: name_suffix.to_string(),
            affixes: affixes.clone(),
            directory: directory.to_string(),
            subdir: self.subdir.clone(),
        };

        let mut set = ResolvedLibrarySet {
            directory: directory.to_string(),
            search_path: template.search_path(base),
            affixes: affixes.clone(),
            link_libraries: vec![],
            runtime_libraries: vec![],
            delay_load: vec![],
            definitions: self.definitions(directory, &affixes, supported),
        };

        if !supported {
            warn!(platform = %profile.platform, "platform has no prebuilt libraries, skipping");
            return Ok(set);
        }

        for name in names {
            let lib = LibraryDescriptor {
                name,
                ..template.clone()
            };

            set.link_libraries.push(lib.link_path(base));

            if let Some(runtime) = lib.runtime_path(base) {
                set.runtime_libraries.push(runtime);
            }

            if let Some(dll) = affixes.dll_file_name(&lib.stem()) {
                set.delay_load.push(dll);
            }
        }

        debug!(
            platform = %profile.platform,
            configuration = %profile.configuration,
            directory,
            link = set.link_libraries.len(),
            runtime = set.runtime_libraries.len(),
            "resolved library set"
        );

        Ok(set)
    }

    fn definitions(
        &self,
        directory: &str,
        affixes: &Affixes,
        supported: bool,
    ) -> Vec<Definition> {
        let prefix = match &self.define_prefix {
            Some(prefix) => prefix,
            None => return vec![],
        };

        let mut defs = vec![
            Definition::string(format!("{}_LIB_CONFIG_STRING", prefix), directory),
            Definition::string(format!("{}_LIB_DLL_PREFIX", prefix), affixes.prefix.as_str()),
            Definition::string(format!("{}_LIB_DLL_SUFFIX", prefix), affixes.dll_suffix.as_str()),
        ];

        if self.with_define {
            defs.push(Definition::flag(format!("WITH_{}", prefix), supported));
        }

        defs
    }
}

fn validate_names<I, S>(names: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let name_regex =
        NAME_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.+-]*$").unwrap());

    names
        .into_iter()
        .map(|name| {
            let name = name.as_ref();

            if name_regex.is_match(name) {
                Ok(name.to_string())
            } else {
                Err(Error::InvalidLibraryName(name.to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Configuration, Platform, UnsupportedPlatform};

    fn linux_shipping() -> PlatformProfile {
        PlatformProfile::new(Platform::Linux, Configuration::Shipping)
    }

    #[test]
    fn test_linux_release_preserves_order() {
        let set = LibrarySetResolver::default()
            .resolve(["Foo", "Bar"], &linux_shipping(), "/base")
            .unwrap();

        assert_eq!(
            set.link_libraries,
            vec![
                PathBuf::from("/base/release/libFoo.so"),
                PathBuf::from("/base/release/libBar.so"),
            ]
        );
        assert_eq!(
            set.runtime_libraries,
            vec![
                PathBuf::from("/base/release/libFoo.so"),
                PathBuf::from("/base/release/libBar.so"),
            ]
        );
        assert_eq!(set.delay_load, vec!["libFoo.so", "libBar.so"]);
    }

    #[test]
    fn test_reversed_input_reverses_output() {
        let set = LibrarySetResolver::default()
            .resolve(["Bar", "Foo"], &linux_shipping(), "/base")
            .unwrap();

        assert_eq!(
            set.link_libraries,
            vec![
                PathBuf::from("/base/release/libBar.so"),
                PathBuf::from("/base/release/libFoo.so"),
            ]
        );
    }

    #[test]
    fn test_windows_debug() {
        let profile =
            PlatformProfile::new(Platform::Win64, Configuration::Debug).debug_runtime(true);
        let set = LibrarySetResolver::default()
            .resolve(["NvBlast"], &profile, "/blast")
            .unwrap();

        assert_eq!(set.link_libraries, vec![PathBuf::from("/blast/debug/NvBlast.lib")]);
        assert_eq!(set.runtime_libraries, vec![PathBuf::from("/blast/debug/NvBlast.dll")]);
    }

    #[test]
    fn test_unsupported_platform_is_a_no_op() {
        let profile = PlatformProfile::new(Platform::Mac, Configuration::Shipping);
        let set = LibrarySetResolver::default()
            .resolve(["Foo"], &profile, "/base")
            .unwrap();

        assert!(set.is_empty());
        assert!(set.delay_load.is_empty());
        assert!(set.affixes.is_empty());
        assert!(set.cargo_args().is_empty());
    }

    #[test]
    fn test_unsupported_platform_fails_under_fail_policy() {
        let resolver = LibrarySetResolver::new(
            AffixTable::new(UnsupportedPlatform::Fail),
            DirectoryPolicy::Checked,
        );

        let result = resolver.resolve(["Foo"], &linux_shipping(), "/base");

        assert!(matches!(result, Err(Error::UnsupportedPlatform { .. })));
    }

    #[test]
    fn test_invalid_library_name_produces_no_paths() {
        let result = LibrarySetResolver::default().resolve(
            ["Foo", "../Bar", ""],
            &linux_shipping(),
            "/base",
        );

        assert!(matches!(result, Err(Error::InvalidLibraryName(ref n)) if n == "../Bar"));
    }

    #[test]
    fn test_static_archives_have_no_runtime_libraries() {
        let resolver =
            LibrarySetResolver::new(AffixTable::static_archives(), DirectoryPolicy::DebugRuntime);
        let set = resolver
            .resolve(["tinyxml"], &linux_shipping(), "/substance")
            .unwrap();

        assert_eq!(
            set.link_libraries,
            vec![PathBuf::from("/substance/release/libtinyxml.a")]
        );
        assert!(set.runtime_libraries.is_empty());
        assert!(set.delay_load.is_empty());
    }

    #[test]
    fn test_definitions() {
        let resolver =
            LibrarySetResolver::new(AffixTable::shared(), DirectoryPolicy::DebugOrRelease)
                .define_prefix("BLAST")
                .with_define(true);

        let set = resolver.resolve(["NvBlast"], &linux_shipping(), "/blast").unwrap();

        assert_eq!(
            set.definitions
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>(),
            vec![
                r#"BLAST_LIB_CONFIG_STRING="release""#,
                r#"BLAST_LIB_DLL_PREFIX="lib""#,
                r#"BLAST_LIB_DLL_SUFFIX=".so""#,
                "WITH_BLAST=1",
            ]
        );
    }

    #[test]
    fn test_definitions_on_unsupported_platform() {
        let resolver = LibrarySetResolver::default()
            .define_prefix("ULIS")
            .with_define(true);
        let profile = PlatformProfile::new(Platform::Switch, Configuration::Development);

        let set = resolver.resolve(["ULIS"], &profile, "/ulis").unwrap();

        assert!(set.is_empty());
        assert_eq!(
            set.definitions.last().map(|d| d.to_string()).as_deref(),
            Some("WITH_ULIS=0")
        );
    }

    #[test]
    fn test_cargo_args() {
        let set = LibrarySetResolver::default()
            .define_prefix("FOO")
            .resolve(["Foo"], &linux_shipping(), "/base")
            .unwrap();

        assert_eq!(
            set.cargo_args(),
            vec![
                "cargo:rustc-link-search=native=/base/release",
                "cargo:rustc-link-arg=/base/release/libFoo.so",
                "cargo:rustc-env=FOO_LIB_CONFIG_STRING=release",
                "cargo:rustc-env=FOO_LIB_DLL_PREFIX=lib",
                "cargo:rustc-env=FOO_LIB_DLL_SUFFIX=.so",
            ]
        );
    }

    #[test]
    fn test_descriptor_paths() {
        let lib = LibraryDescriptor::new("zmq", Affixes::unix_static(), "release");

        assert_eq!(
            lib.link_path(Path::new("/zeromq")),
            PathBuf::from("/zeromq/release/libzmq.a")
        );
        assert_eq!(lib.runtime_path(Path::new("/zeromq")), None);
    }

    #[test]
    fn test_descriptor_with_suffix_and_subdir() {
        let lib = LibraryDescriptor {
            name_suffix: "d".into(),
            subdir: Some(PathBuf::from("Win64")),
            ..LibraryDescriptor::new("lcms2", Affixes::windows(), "Debug")
        };

        assert_eq!(lib.stem(), "lcms2d");
        assert_eq!(
            lib.link_path(Path::new("/ulis")),
            PathBuf::from("/ulis/Debug/Win64/lcms2d.lib")
        );
        assert_eq!(
            lib.runtime_path(Path::new("/ulis")),
            Some(PathBuf::from("/ulis/Debug/Win64/lcms2d.dll"))
        );
    }

    #[test]
    fn test_debug_suffix_only_in_debug_directory() {
        let resolver = LibrarySetResolver::new(
            AffixTable::static_libraries(),
            DirectoryPolicy::CapitalizedDebugRuntime,
        )
        .debug_suffix("d");
        let debug = PlatformProfile::new(Platform::Win64, Configuration::Debug);

        let set = resolver
            .resolve(["ULIS1.0", "lcms2"], &debug.debug_runtime(true), "/ulis")
            .unwrap();

        assert_eq!(
            set.link_libraries,
            vec![
                PathBuf::from("/ulis/Debug/ULIS1.0d.lib"),
                PathBuf::from("/ulis/Debug/lcms2d.lib"),
            ]
        );
        assert!(set.runtime_libraries.is_empty());

        let set = resolver.resolve(["ULIS1.0"], &debug, "/ulis").unwrap();

        assert_eq!(set.link_libraries, vec![PathBuf::from("/ulis/Release/ULIS1.0.lib")]);
    }

    #[test]
    fn test_subdir_follows_directory() {
        let resolver = LibrarySetResolver::new(
            AffixTable::static_archives(),
            DirectoryPolicy::PlatformDebugRuntime,
        )
        .subdir("Linux");
        let profile = PlatformProfile::new(Platform::Linux, Configuration::Debug);

        let set = resolver.resolve(["tinyxml"], &profile, "/substance").unwrap();

        assert_eq!(set.search_path, PathBuf::from("/substance/Debug/Linux"));
        assert_eq!(
            set.link_libraries,
            vec![PathBuf::from("/substance/Debug/Linux/libtinyxml.a")]
        );
        assert_eq!(
            set.cargo_args()[0],
            "cargo:rustc-link-search=native=/substance/Debug/Linux"
        );
    }
}
