//! Configuration loading.
//!
//! Options come from an optional JSON config file and the command line; CLI
//! values win.

use crate::cli::Args;
use camino::{Utf8Path, Utf8PathBuf};
use dts_transformer::{ExportType, NameFormat};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use style_compiler::{Aliases, CompilerKind};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "typed-less-modules.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid.
    #[error("invalid config {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },

    /// `concurrency` was zero.
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Contents of a `typed-less-modules.json` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ConfigFile {
    pub name_format: Option<NameFormat>,
    pub export_type: Option<ExportType>,
    pub declaration_map: Option<bool>,
    pub aliases: IndexMap<String, String>,
    pub alias_prefixes: IndexMap<String, String>,
    /// Relative paths are resolved against the config file's directory.
    pub include_paths: Vec<Utf8PathBuf>,
    pub compiler: Option<CompilerKind>,
    pub concurrency: Option<usize>,
    pub watch: bool,
    pub ignore_initial: bool,
    pub list_different: bool,
    pub verbose: bool,
}

impl ConfigFile {
    /// Loads a config file. `//` and `/* */` comments are allowed.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        let mut config: Self =
            serde_json::from_str(&remove_json_comments(&content)).map_err(|source| {
                ConfigError::Parse {
                    path: path.to_owned(),
                    source,
                }
            })?;

        if let Some(dir) = path.parent() {
            for include in &mut config.include_paths {
                if include.is_relative() {
                    *include = dir.join(&*include);
                }
            }
        }

        Ok(config)
    }

    /// Loads `typed-less-modules.json` from `dir`, if it exists.
    pub fn find(dir: &Utf8Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Fully resolved options for a run.
#[derive(Debug, Clone)]
pub struct Options {
    pub name_format: NameFormat,
    pub export_type: ExportType,
    pub declaration_map: bool,
    pub aliases: Aliases,
    pub include_paths: Vec<Utf8PathBuf>,
    pub compiler: CompilerKind,
    pub concurrency: usize,
    pub watch: bool,
    pub ignore_initial: bool,
    pub list_different: bool,
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            name_format: NameFormat::Camel,
            export_type: ExportType::Named,
            declaration_map: true,
            aliases: Aliases::default(),
            include_paths: Vec::new(),
            compiler: CompilerKind::Auto,
            concurrency: default_concurrency(),
            watch: false,
            ignore_initial: false,
            list_different: false,
            verbose: false,
        }
    }
}

impl Options {
    /// Merges CLI arguments over a config file.
    pub fn resolve(args: &Args, file: ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut aliases = Aliases {
            exact: file.aliases,
            prefixes: file.alias_prefixes,
        };
        aliases.exact.extend(args.aliases.iter().cloned());
        aliases.prefixes.extend(args.alias_prefixes.iter().cloned());

        let mut include_paths = file.include_paths;
        include_paths.extend(args.include_paths.iter().cloned());

        let concurrency = args
            .concurrency
            .or(file.concurrency)
            .unwrap_or(defaults.concurrency);
        if concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        Ok(Self {
            name_format: args
                .name_format
                .or(file.name_format)
                .unwrap_or(defaults.name_format),
            export_type: args
                .export_type
                .or(file.export_type)
                .unwrap_or(defaults.export_type),
            declaration_map: args
                .declaration_map
                .or(file.declaration_map)
                .unwrap_or(defaults.declaration_map),
            aliases,
            include_paths,
            compiler: args.compiler.or(file.compiler).unwrap_or(defaults.compiler),
            concurrency,
            watch: args.watch || file.watch,
            ignore_initial: args.ignore_initial || file.ignore_initial,
            list_different: args.list_different || file.list_different,
            verbose: args.verbose || file.verbose,
        })
    }
}

/// Loads the config file named by `--config`, or the default one in `cwd`,
/// and merges the CLI arguments over it.
pub fn load_options(args: &Args, cwd: &Utf8Path) -> Result<Options, ConfigError> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(&cwd.join(path))?,
        None => ConfigFile::find(cwd)?.unwrap_or_default(),
    };
    Options::resolve(args, file)
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Removes single-line and multi-line comments from JSON.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
        } else if c == '"' {
            result.push(c);
            in_string = true;
        } else if c == '/' {
            match chars.peek() {
                Some('/') => {
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        chars.next();
                    }
                }
                Some('*') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '*' && chars.peek() == Some(&'/') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => result.push(c),
            }
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["typed-less-modules-rs", "src"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_remove_comments() {
        let json = r#"{
            // This is a comment
            "key": "value /* kept */" /* inline comment */
        }"#;

        let cleaned = remove_json_comments(json);
        assert!(!cleaned.contains("//"));
        assert!(!cleaned.contains("inline"));
        assert!(cleaned.contains("\"value /* kept */\""));
    }

    #[test]
    fn test_defaults() {
        let options = Options::resolve(&args(&[]), ConfigFile::default()).unwrap();
        assert_eq!(options.name_format, NameFormat::Camel);
        assert_eq!(options.export_type, ExportType::Named);
        assert!(options.declaration_map);
        assert_eq!(options.compiler, CompilerKind::Auto);
        assert!(options.concurrency >= 1);
        assert!(options.aliases.is_empty());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = ConfigFile {
            name_format: Some(NameFormat::Dashes),
            export_type: Some(ExportType::Default),
            declaration_map: Some(false),
            ..Default::default()
        };
        let options =
            Options::resolve(&args(&["--nameFormat", "none", "--declarationMap"]), file).unwrap();
        assert_eq!(options.name_format, NameFormat::None);
        assert_eq!(options.export_type, ExportType::Default);
        assert!(options.declaration_map);
    }

    #[test]
    fn test_aliases_merge_in_order() {
        let mut file = ConfigFile::default();
        file.alias_prefixes
            .insert("~".to_string(), "nested-styles/".to_string());
        let options =
            Options::resolve(&args(&["--aliasPrefix", "@theme/=theme/"]), file).unwrap();
        assert_eq!(
            options.aliases.prefixes.keys().collect::<Vec<_>>(),
            vec!["~", "@theme/"]
        );
    }

    #[test]
    fn test_zero_concurrency_is_error() {
        let result = Options::resolve(&args(&["--concurrency", "0"]), ConfigFile::default());
        assert!(matches!(result, Err(ConfigError::ZeroConcurrency)));
    }

    #[test]
    fn test_load_config_file() {
        let (_guard, dir) = temp_dir();
        std::fs::write(
            dir.join(CONFIG_FILE_NAME),
            r#"{
                // generated for tests
                "nameFormat": "kebab",
                "exportType": "default",
                "aliases": { "~fancy-import": "complex" },
                "aliasPrefixes": { "~": "nested-styles/" },
                "includePaths": ["shared"],
                "compiler": "native"
            }"#,
        )
        .unwrap();

        let options = load_options(&args(&[]), &dir).unwrap();
        assert_eq!(options.name_format, NameFormat::Kebab);
        assert_eq!(options.export_type, ExportType::Default);
        assert_eq!(options.compiler, CompilerKind::Native);
        assert_eq!(
            options.aliases.resolve("~fancy-import").as_deref(),
            Some("complex")
        );
        assert_eq!(options.include_paths, vec![dir.join("shared")]);
    }

    #[test]
    fn test_invalid_export_type_in_file() {
        let (_guard, dir) = temp_dir();
        let path = dir.join("custom.json");
        std::fs::write(&path, r#"{ "exportType": "invalid" }"#).unwrap();

        let error = load_options(&args(&["--config", path.as_str()]), &dir).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_explicit_config() {
        let (_guard, dir) = temp_dir();
        let error = load_options(&args(&["--config", "nope.json"]), &dir).unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
    }
}
