//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::Parser;
use dts_transformer::{ExportType, NameFormat};
use style_compiler::CompilerKind;

/// Generate TypeScript declarations for CSS/LESS modules.
#[derive(Debug, Parser)]
#[command(name = "typed-less-modules-rs")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Glob pattern, file or directory of stylesheets
    pub pattern: String,

    /// Path to a JSON config file (default: ./typed-less-modules.json if present)
    #[arg(long, short = 'c')]
    pub config: Option<Utf8PathBuf>,

    /// How class names are rewritten
    #[arg(long = "nameFormat", alias = "name-format", short = 'n', value_enum)]
    pub name_format: Option<NameFormat>,

    /// Shape of the generated declaration
    #[arg(long = "exportType", alias = "export-type", short = 'e', value_enum)]
    pub export_type: Option<ExportType>,

    /// Write a .d.ts.map next to each declaration (default: true)
    #[arg(
        long = "declarationMap",
        alias = "declaration-map",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub declaration_map: Option<bool>,

    /// Exact import alias (KEY=VALUE), may be repeated
    #[arg(long = "alias", short = 'a', value_parser = parse_key_value)]
    pub aliases: Vec<(String, String)>,

    /// Import prefix alias (PREFIX=REPLACEMENT), may be repeated
    #[arg(long = "aliasPrefix", alias = "alias-prefix", value_parser = parse_key_value)]
    pub alias_prefixes: Vec<(String, String)>,

    /// Additional directory searched for imports, may be repeated
    #[arg(long = "includePath", alias = "include-path", short = 'i')]
    pub include_paths: Vec<Utf8PathBuf>,

    /// Stylesheet compiler
    #[arg(long, value_enum)]
    pub compiler: Option<CompilerKind>,

    /// Maximum number of files processed at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Watch mode
    #[arg(long, short = 'w')]
    pub watch: bool,

    /// Skip the initial generation pass in watch mode
    #[arg(long = "ignoreInitial", alias = "ignore-initial")]
    pub ignore_initial: bool,

    /// Check existing declarations instead of writing them; exits 1 if any differ
    #[arg(long = "listDifferent", alias = "list-different", short = 'l')]
    pub list_different: bool,

    /// Debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Parses `KEY=VALUE`.
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
