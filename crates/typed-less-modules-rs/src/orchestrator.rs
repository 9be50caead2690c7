//! Main orchestration logic.

use crate::config::Options;
use crate::discovery::{DiscoveryError, FilePattern};
use crate::output::{Alerts, CheckSummary};
use camino::{Utf8Path, Utf8PathBuf};
use dts_transformer::{
    declaration_map, map_footer, render, transform, Rejection, TransformError, Transformation,
};
use rustc_hash::FxHashMap;
use source_map::SourceMapError;
use std::future::Future;
use std::sync::Arc;
use style_compiler::{CompileError, CompileOptions, Compiler};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};

/// Orchestration errors. These stop the whole run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The requested compiler is not available.
    #[error("{0}")]
    Compiler(#[from] CompileError),

    /// Watch error.
    #[error("watch error: {0}")]
    WatchFailed(String),
}

/// Errors generating the declaration for one file.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Failed to read the stylesheet.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    /// The stylesheet did not compile.
    #[error("{}", describe_compile_error(.0))]
    Compile(CompileError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    SourceMap(#[from] SourceMapError),
}

fn describe_compile_error(error: &CompileError) -> String {
    match error.location() {
        Some(location) => format!("{} {location}", error.message),
        None => error.message.clone(),
    }
}

/// Failed to write a generated artifact.
#[derive(Debug, Error)]
#[error("failed to write {path}: {source}")]
pub struct WriteError {
    pub path: Utf8PathBuf,
    pub source: std::io::Error,
}

/// Declaration text and map for one stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    /// `.d.ts` contents, including the map footer when maps are enabled.
    pub declaration: String,
    /// `.d.ts.map` contents. Computed for both export types.
    pub map: String,
    /// Names left out of a named declaration.
    pub rejections: Vec<Rejection>,
}

/// What [`Generator::write_file`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Declaration (and map, if enabled) written.
    Written {
        declaration: Utf8PathBuf,
        map: Option<Utf8PathBuf>,
    },
    /// The stylesheet exports nothing; nothing was written.
    NoTypes,
    /// Generation or writing failed; the error was reported.
    Failed,
}

/// Returns `<file>.d.ts`.
pub fn declaration_path(file: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{file}.d.ts"))
}

/// Returns `<file>.d.ts.map`.
pub fn declaration_map_path(file: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{file}.d.ts.map"))
}

fn file_name(path: &Utf8Path) -> &str {
    path.file_name().unwrap_or(path.as_str())
}

/// Runs the declaration pipeline for individual files.
#[derive(Debug, Clone)]
pub struct Generator {
    options: Options,
    compiler: Compiler,
}

impl Generator {
    /// Creates a generator, locating `lessc` from `workspace` if needed.
    pub fn new(options: Options, workspace: &Utf8Path) -> Result<Self, CompileError> {
        let compiler = Compiler::new(options.compiler, workspace)?;
        Ok(Self::with_compiler(options, compiler))
    }

    pub fn with_compiler(options: Options, compiler: Compiler) -> Self {
        Self { options, compiler }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Compiles `file` and returns its named tokens in discovery order.
    pub async fn file_to_declarations(
        &self,
        file: &Utf8Path,
    ) -> Result<Vec<Transformation>, GenerateError> {
        let source = tokio::fs::read_to_string(file)
            .await
            .map_err(|source| GenerateError::Read {
                path: file.to_owned(),
                source,
            })?;

        let compile_options = CompileOptions {
            filename: file.to_owned(),
            aliases: self.options.aliases.clone(),
            include_paths: self.options.include_paths.clone(),
            source_map: true,
        };
        let output = self
            .compiler
            .compile(&source, &compile_options)
            .await
            .map_err(GenerateError::Compile)?;
        tracing::debug!(file = %file, css_len = output.css.len(), "compiled");

        Ok(transform(
            &output.css,
            output.map.as_deref(),
            self.options.name_format,
        )?)
    }

    /// Produces the declaration artifacts for `file`, or `None` if it
    /// exports nothing.
    pub async fn generate(
        &self,
        file: &Utf8Path,
    ) -> Result<Option<GeneratedArtifacts>, GenerateError> {
        let transformations = self.file_to_declarations(file).await?;
        let Some(rendered) = render(&transformations, self.options.export_type) else {
            return Ok(None);
        };

        let declaration_file = declaration_path(file);
        let map_file = declaration_map_path(file);
        let map = declaration_map(
            &rendered,
            &transformations,
            file_name(&declaration_file),
            file_name(file),
        );

        let mut declaration = rendered.text;
        if self.options.declaration_map {
            declaration.push_str(&map_footer(file_name(&map_file)));
        }

        Ok(Some(GeneratedArtifacts {
            declaration,
            map: map.to_json()?,
            rejections: rendered.rejections,
        }))
    }

    /// Writes the declaration (and map) for `file`, reporting through `alerts`.
    pub async fn write_file(&self, file: &Utf8Path, alerts: &dyn Alerts) -> WriteOutcome {
        let artifacts = match self.generate(file).await {
            Ok(Some(artifacts)) => artifacts,
            Ok(None) => {
                alerts.notice(&format!("[NO GENERATED TYPES] {file}"));
                return WriteOutcome::NoTypes;
            }
            Err(error) => {
                alerts.error(&error.to_string());
                return WriteOutcome::Failed;
            }
        };

        for rejection in &artifacts.rejections {
            alerts.warn(&rejection.to_string());
        }

        let declaration = declaration_path(file);
        if let Err(error) = write(&declaration, &artifacts.declaration).await {
            alerts.error(&error.to_string());
            return WriteOutcome::Failed;
        }

        let map = if self.options.declaration_map {
            let map = declaration_map_path(file);
            if let Err(error) = write(&map, &artifacts.map).await {
                alerts.error(&error.to_string());
                return WriteOutcome::Failed;
            }
            Some(map)
        } else {
            None
        };

        alerts.success(&format!("[GENERATED TYPES] {declaration}"));
        WriteOutcome::Written { declaration, map }
    }

    /// Returns true if the declaration on disk for `file` is up to date.
    ///
    /// A stylesheet that exports nothing always passes. Skipped names are
    /// warned about here too, as the rendered declaration is the same.
    pub async fn check_file(&self, file: &Utf8Path, alerts: &dyn Alerts) -> bool {
        let up_to_date = match self.generate(file).await {
            Ok(None) => return true,
            Ok(Some(artifacts)) => {
                for rejection in &artifacts.rejections {
                    alerts.warn(&rejection.to_string());
                }
                self.matches_disk(file, &artifacts).await
            }
            Err(error) => {
                tracing::warn!(file = %file, "{error}");
                false
            }
        };

        if !up_to_date {
            alerts.error(&format!("[INVALID TYPES] Check type definitions for {file}"));
        }
        up_to_date
    }

    async fn matches_disk(&self, file: &Utf8Path, artifacts: &GeneratedArtifacts) -> bool {
        let declaration = tokio::fs::read_to_string(declaration_path(file)).await;
        if declaration.ok().as_deref() != Some(artifacts.declaration.as_str()) {
            return false;
        }
        if !self.options.declaration_map {
            return true;
        }
        let map = tokio::fs::read_to_string(declaration_map_path(file)).await;
        map.ok().as_deref() == Some(artifacts.map.as_str())
    }
}

async fn write(path: &Utf8Path, contents: &str) -> Result<(), WriteError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| WriteError {
            path: path.to_owned(),
            source,
        })
}

/// Runs `task` for every file, at most `concurrency` at a time.
///
/// Results are returned in path order once every task has finished. A task
/// that panicked yields its `JoinError` in place of a value.
async fn for_each_file<T, F, Fut>(
    files: Vec<Utf8PathBuf>,
    concurrency: usize,
    task: F,
) -> Vec<(Utf8PathBuf, Result<T, JoinError>)>
where
    F: Fn(Utf8PathBuf) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut set = JoinSet::new();
    let mut paths: FxHashMap<Id, Utf8PathBuf> = FxHashMap::default();

    for file in files {
        let semaphore = Arc::clone(&semaphore);
        let future = task(file.clone());
        let handle = set.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            future.await
        });
        paths.insert(handle.id(), file);
    }

    let mut results = Vec::with_capacity(paths.len());
    while let Some(joined) = set.join_next_with_id().await {
        let (id, result) = match joined {
            Ok((id, value)) => (id, Ok(value)),
            Err(error) => (error.id(), Err(error)),
        };
        if let Some(file) = paths.remove(&id) {
            results.push((file, result));
        }
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

/// Collects the files that failed a check. A check that did not finish
/// counts as failed and is reported like any other mismatch.
fn failed_checks(
    results: Vec<(Utf8PathBuf, Result<bool, JoinError>)>,
    alerts: &dyn Alerts,
) -> Vec<Utf8PathBuf> {
    results
        .into_iter()
        .filter_map(|(file, result)| match result {
            Ok(true) => None,
            Ok(false) => Some(file),
            Err(error) => {
                tracing::error!(file = %file, "check task failed: {error}");
                alerts.error(&format!("[INVALID TYPES] Check type definitions for {file}"));
                Some(file)
            }
        })
        .collect()
}

/// Checks every file matching `pattern` against its declaration on disk.
pub async fn list_different(
    pattern: &str,
    generator: Arc<Generator>,
    alerts: Arc<dyn Alerts>,
) -> Result<CheckSummary, OrchestratorError> {
    let files = FilePattern::new(pattern)?.files();
    if files.is_empty() {
        alerts.notice("No files found.");
        return Ok(CheckSummary::default());
    }

    let file_count = files.len();
    let concurrency = generator.options().concurrency;
    let results = for_each_file(files, concurrency, |file| {
        let generator = Arc::clone(&generator);
        let alerts = Arc::clone(&alerts);
        async move { generator.check_file(&file, alerts.as_ref()).await }
    })
    .await;

    Ok(CheckSummary {
        file_count,
        failed: failed_checks(results, alerts.as_ref()),
    })
}

/// Writes declarations for every file in `files`.
///
/// One file failing never stops the others.
pub async fn write_files(
    files: Vec<Utf8PathBuf>,
    generator: Arc<Generator>,
    alerts: Arc<dyn Alerts>,
) -> Vec<(Utf8PathBuf, WriteOutcome)> {
    let concurrency = generator.options().concurrency;
    let results = for_each_file(files, concurrency, |file| {
        let generator = Arc::clone(&generator);
        let alerts = Arc::clone(&alerts);
        async move { generator.write_file(&file, alerts.as_ref()).await }
    })
    .await;

    results
        .into_iter()
        .map(|(file, result)| {
            let outcome = result.unwrap_or_else(|error| {
                alerts.error(&format!("failed to generate types for {file}: {error}"));
                WriteOutcome::Failed
            });
            (file, outcome)
        })
        .collect()
}

/// Runs the tool: check mode, or a write pass optionally followed by watching.
pub async fn run(
    pattern: &str,
    options: Options,
    workspace: &Utf8Path,
    alerts: Arc<dyn Alerts>,
) -> Result<CheckSummary, OrchestratorError> {
    let generator = Arc::new(Generator::new(options, workspace)?);

    if generator.options().list_different {
        return list_different(pattern, generator, alerts).await;
    }

    let file_pattern = FilePattern::new(pattern)?;
    let watch = generator.options().watch;
    let mut summary = CheckSummary::default();

    if !(watch && generator.options().ignore_initial) {
        let files = file_pattern.files();
        if files.is_empty() {
            alerts.notice("No files found.");
        }
        summary.file_count = files.len();
        write_files(files, Arc::clone(&generator), Arc::clone(&alerts)).await;
    }

    if watch {
        run_watch_mode(&file_pattern, generator, alerts).await?;
    }

    Ok(summary)
}

/// Regenerates declarations whenever a matching stylesheet changes.
async fn run_watch_mode(
    pattern: &FilePattern,
    generator: Arc<Generator>,
    alerts: Arc<dyn Alerts>,
) -> Result<(), OrchestratorError> {
    use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    watcher
        .watch(pattern.base().as_std_path(), RecursiveMode::Recursive)
        .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    alerts.notice(&format!("Watching {}...", pattern.base()));

    while let Some(event) = rx.recv().await {
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            continue;
        }

        for path in event.paths {
            let Ok(path) = Utf8PathBuf::try_from(path) else {
                continue;
            };
            if path.is_file() && pattern.matches(&path) {
                alerts.notice(&format!("[CHANGED] {path}"));
                generator.write_file(&path, alerts.as_ref()).await;
            }
        }
    }

    Err(OrchestratorError::WatchFailed(
        "watch channel closed unexpectedly".to_string(),
    ))
}
