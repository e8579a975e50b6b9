use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    AffixTableKind, DirectoryPolicy, Error, LibrarySetResolver, Platform, PlatformProfile,
    ResolvedLibrarySet, Result,
};

/// A set of plugin modules and the prebuilt libraries each one links.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleManifest {
    #[serde(rename = "module", default)]
    pub modules: Vec<ModuleSpec>,
}

/// One `[[module]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ModuleSpec {
    pub name: String,
    #[serde(default)]
    pub define_prefix: Option<String>,
    #[serde(default)]
    pub policy: DirectoryPolicy,
    #[serde(default)]
    pub affixes: AffixTableKind,
    /// Library root; `{platform}` expands to the platform directory.
    pub base: String,
    /// Path below the configuration directory, expanded like `base`.
    #[serde(default)]
    pub subdir: Option<String>,
    /// Narrows the affix table to these platforms.
    #[serde(default)]
    pub supported_platforms: Option<Vec<Platform>>,
    #[serde(default)]
    pub debug_suffix: Option<String>,
    #[serde(default)]
    pub with_define: bool,
    #[serde(default)]
    pub libraries: Vec<String>,
    #[serde(rename = "platform", default)]
    pub platforms: BTreeMap<Platform, PlatformOverride>,
}

/// `[module.platform.<id>]`: what differs on one platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformOverride {
    /// Replaces the platform identifier in `{platform}` expansions.
    #[serde(default)]
    pub dir: Option<String>,
    /// Replaces the module's library list.
    #[serde(default)]
    pub libraries: Option<Vec<String>>,
}

impl ModuleManifest {
    pub fn from_toml(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content)
    }

    pub fn find(&self, name: &str) -> Result<&ModuleSpec> {
        self.modules
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| Error::UnknownModule(name.to_string()))
    }

    /// Resolves every module. Fails on the first module that fails.
    pub fn resolve_all(
        &self,
        profile: &PlatformProfile,
    ) -> Result<Vec<(&ModuleSpec, ResolvedLibrarySet)>> {
        self.modules
            .iter()
            .map(|m| m.resolve(profile).map(|set| (m, set)))
            .collect()
    }
}

impl ModuleSpec {
    /// The resolver for this module, without the platform-dependent subdir.
    pub fn resolver(&self) -> LibrarySetResolver {
        let table = match &self.supported_platforms {
            Some(platforms) => self.affixes.table().restrict_to(platforms),
            None => self.affixes.table(),
        };

        let mut resolver = LibrarySetResolver::new(table, self.policy);

        if let Some(suffix) = &self.debug_suffix {
            resolver = resolver.debug_suffix(suffix.as_str());
        }

        match &self.define_prefix {
            Some(prefix) => resolver.define_prefix(prefix.as_str()).with_define(self.with_define),
            None => resolver,
        }
    }

    /// The directory name `{platform}` expands to.
    pub fn platform_dir(&self, platform: Platform) -> &str {
        self.platforms
            .get(&platform)
            .and_then(|o| o.dir.as_deref())
            .unwrap_or(platform.as_str())
    }

    pub fn base_for(&self, platform: Platform) -> PathBuf {
        PathBuf::from(self.expand(&self.base, platform))
    }

    pub fn subdir_for(&self, platform: Platform) -> Option<PathBuf> {
        self.subdir
            .as_ref()
            .map(|subdir| PathBuf::from(self.expand(subdir, platform)))
    }

    pub fn libraries_for(&self, platform: Platform) -> &[String] {
        self.platforms
            .get(&platform)
            .and_then(|o| o.libraries.as_deref())
            .unwrap_or(self.libraries.as_slice())
    }

    pub fn resolve(&self, profile: &PlatformProfile) -> Result<ResolvedLibrarySet> {
        let platform = profile.platform;
        let resolver = match self.subdir_for(platform) {
            Some(subdir) => self.resolver().subdir(subdir),
            None => self.resolver(),
        };

        resolver.resolve(self.libraries_for(platform), profile, self.base_for(platform))
    }

    fn expand(&self, template: &str, platform: Platform) -> String {
        template.replace("{platform}", self.platform_dir(platform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Configuration;

    const MANIFEST: &str = r#"
[[module]]
name = "Blast"
define-prefix = "BLAST"
policy = "debug-or-release"
base = "/plugins/Blast/Libraries/{platform}"
libraries = ["NvBlast", "NvBlastGlobals"]

[[module]]
name = "SubstanceEngine"
policy = "platform-debug-runtime"
affixes = "static-archives"
base = "/plugins/Substance/Libs"
libraries = ["pfxlinkercommon", "tinyxml"]
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = ModuleManifest::from_toml(MANIFEST).unwrap();

        assert_eq!(manifest.modules.len(), 2);

        let blast = manifest.find("Blast").unwrap();
        assert_eq!(blast.policy, DirectoryPolicy::DebugOrRelease);
        assert_eq!(blast.affixes, AffixTableKind::Shared);
        assert!(!blast.with_define);

        let substance = manifest.find("SubstanceEngine").unwrap();
        assert_eq!(substance.affixes, AffixTableKind::StaticArchives);
        assert_eq!(substance.define_prefix, None);
    }

    #[test]
    fn test_defaults() {
        let manifest = ModuleManifest::from_toml(
            r#"
[[module]]
name = "Foo"
base = "/foo"
"#,
        )
        .unwrap();

        let foo = manifest.find("Foo").unwrap();
        assert_eq!(foo.policy, DirectoryPolicy::Checked);
        assert!(foo.libraries.is_empty());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = ModuleManifest::from_toml(
            r#"
[[module]]
name = "Foo"
base = "/foo"
suffix = ".so"
"#,
        );

        assert!(matches!(result, Err(Error::Manifest(_))));
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result = ModuleManifest::from_toml(
            r#"
[[module]]
name = "Foo"
base = "/foo"
policy = "fastest"
"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_module() {
        let manifest = ModuleManifest::from_toml(MANIFEST).unwrap();

        assert!(matches!(manifest.find("Odyssey"), Err(Error::UnknownModule(_))));
    }

    #[test]
    fn test_resolve_expands_platform() {
        let manifest = ModuleManifest::from_toml(MANIFEST).unwrap();
        let profile = PlatformProfile::new(Platform::Win64, Configuration::Debug);

        let set = manifest.find("Blast").unwrap().resolve(&profile).unwrap();

        assert_eq!(
            set.link_libraries,
            vec![
                PathBuf::from("/plugins/Blast/Libraries/Win64/debug/NvBlast.lib"),
                PathBuf::from("/plugins/Blast/Libraries/Win64/debug/NvBlastGlobals.lib"),
            ]
        );
        assert_eq!(set.definitions[0].to_string(), r#"BLAST_LIB_CONFIG_STRING="debug""#);
    }

    #[test]
    fn test_resolve_all_fails_fast() {
        let manifest = ModuleManifest::from_toml(MANIFEST).unwrap();
        let profile = PlatformProfile::new(Platform::Android, Configuration::Shipping);

        assert!(matches!(
            manifest.resolve_all(&profile),
            Err(Error::UnsupportedPlatform { .. })
        ));
    }

    fn bundled() -> ModuleManifest {
        ModuleManifest::from_toml(include_str!("../../../data/plugins.toml")).unwrap()
    }

    #[test]
    fn test_bundled_plugin_manifest() {
        let manifest = bundled();
        let profile = PlatformProfile::new(Platform::Win64, Configuration::Development);

        let resolved = manifest.resolve_all(&profile).unwrap();
        let names: Vec<_> = resolved.iter().map(|(m, _)| m.name.as_str()).collect();

        assert_eq!(names, ["Blast", "ULIS", "SubstanceEngine", "SubstanceSource"]);
        assert_eq!(resolved[0].1.link_libraries.len(), 5);
        assert_eq!(resolved[2].1.directory, "Release");
    }

    #[test]
    fn test_ulis_windows_debug_crt() {
        let ulis = bundled().find("ULIS").unwrap().clone();
        let profile =
            PlatformProfile::new(Platform::Win64, Configuration::Debug).debug_runtime(true);

        let set = ulis.resolve(&profile).unwrap();
        let root = "Plugins/Iliad/Source/ThirdParty/ULIS/Redist/Lib/Win/MSVC/x64/Debug";

        assert_eq!(
            set.link_libraries,
            vec![
                PathBuf::from(root).join("ULIS1.0d.lib"),
                PathBuf::from(root).join("lcms2d.lib"),
            ]
        );
        assert!(set.runtime_libraries.is_empty());
        assert!(set.delay_load.is_empty());
        assert_eq!(set.definitions.last().unwrap().to_string(), "WITH_ULIS=1");
    }

    #[test]
    fn test_ulis_mac_release() {
        let ulis = bundled().find("ULIS").unwrap().clone();
        let profile = PlatformProfile::new(Platform::Mac, Configuration::Debug);

        let set = ulis.resolve(&profile).unwrap();
        let root = "Plugins/Iliad/Source/ThirdParty/ULIS/Redist/Lib/Mac/Xcode/x64/Release";

        assert_eq!(
            set.link_libraries,
            vec![
                PathBuf::from(root).join("libULIS1.0.a"),
                PathBuf::from(root).join("liblcms2.a"),
            ]
        );
        assert_eq!(set.definitions.last().unwrap().to_string(), "WITH_ULIS=1");
    }

    #[test]
    fn test_ulis_linux_is_unavailable() {
        let ulis = bundled().find("ULIS").unwrap().clone();
        let profile = PlatformProfile::new(Platform::Linux, Configuration::Shipping);

        let set = ulis.resolve(&profile).unwrap();

        assert!(set.is_empty());
        assert!(!ulis.resolver().affix_table().is_supported(Platform::Linux));
        assert_eq!(set.definitions.last().unwrap().to_string(), "WITH_ULIS=0");
    }

    #[test]
    fn test_substance_engine_is_laid_out_per_platform() {
        let manifest = bundled();
        let engine = manifest.find("SubstanceEngine").unwrap();

        let win = engine
            .resolve(&PlatformProfile::new(Platform::Win64, Configuration::Shipping))
            .unwrap();
        let linux = engine
            .resolve(&PlatformProfile::new(Platform::Linux, Configuration::Debug))
            .unwrap();

        assert_eq!(win.search_path, PathBuf::from("Plugins/Substance/Libs/Release/Win64"));
        assert_eq!(
            win.link_libraries[3],
            PathBuf::from("Plugins/Substance/Libs/Release/Win64/substance_linker_static.lib")
        );
        assert_eq!(
            linux.link_libraries[3],
            PathBuf::from("Plugins/Substance/Libs/Debug/Linux/libsubstance_linker.a")
        );
        assert_eq!(
            linux.link_libraries.last(),
            Some(&PathBuf::from("Plugins/Substance/Libs/Debug/Linux/libsubstance_framework.a"))
        );
    }

    #[test]
    fn test_substance_source_skips_consoles() {
        let manifest = bundled();
        let source = manifest.find("SubstanceSource").unwrap();

        let mac = source
            .resolve(&PlatformProfile::new(Platform::Mac, Configuration::Development))
            .unwrap();
        let ps4 = source
            .resolve(&PlatformProfile::new(Platform::PS4, Configuration::Development))
            .unwrap();

        assert_eq!(
            mac.link_libraries,
            vec![
                PathBuf::from("Plugins/Substance/Libs/Release/Mac/libsubstance_source_framework.a"),
                PathBuf::from("Plugins/Substance/Libs/Release/Mac/libporterstemmer.a"),
            ]
        );
        assert!(ps4.is_empty());
    }

    #[test]
    fn test_platform_override() {
        let manifest = ModuleManifest::from_toml(
            r#"
[[module]]
name = "Foo"
base = "/foo/{platform}"
libraries = ["foo"]

[module.platform.win32]
dir = "Win/x86"
libraries = ["foo_static", "bar"]
"#,
        )
        .unwrap();
        let foo = manifest.find("Foo").unwrap();

        assert_eq!(foo.base_for(Platform::Win32), PathBuf::from("/foo/Win/x86"));
        assert_eq!(foo.base_for(Platform::Win64), PathBuf::from("/foo/Win64"));
        assert_eq!(foo.libraries_for(Platform::Win32), ["foo_static", "bar"]);
        assert_eq!(foo.libraries_for(Platform::Linux), ["foo"]);
        assert_eq!(foo.subdir_for(Platform::Linux), None);
    }

    #[test]
    fn test_unknown_platform_key_is_rejected() {
        let result = ModuleManifest::from_toml(
            r#"
[[module]]
name = "Foo"
base = "/foo"
supported-platforms = ["Win64", "Amiga"]
"#,
        );

        assert!(matches!(result, Err(Error::Manifest(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ModuleManifest::load(Path::new("/definitely/not/here.toml")).unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
    }
}
