use camino::Utf8PathBuf;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::sync::Arc;
use typed_less_modules_rs::cli::Args;
use typed_less_modules_rs::config::load_options;
use typed_less_modules_rs::logging::init_logging;
use typed_less_modules_rs::{run, ConsoleAlerts};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cwd = std::env::current_dir().into_diagnostic()?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|path| miette::miette!("working directory is not UTF-8: {}", path.display()))?;

    let options = load_options(&args, &cwd).into_diagnostic()?;
    init_logging(options.verbose);

    let result = run(&args.pattern, options, &cwd, Arc::new(ConsoleAlerts)).await;

    match result {
        Ok(summary) => {
            if !summary.is_success() {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
