//! End-to-end tests for writing and checking declarations.

use camino::{Utf8Path, Utf8PathBuf};
use dts_transformer::ExportType;
use pretty_assertions::assert_eq;
use source_map::{GeneratedPosition, SourceMap};
use std::fs;
use std::sync::Arc;
use style_compiler::Compiler;
use typed_less_modules_rs::config::Options;
use typed_less_modules_rs::orchestrator::{list_different, write_files, Generator, WriteOutcome};
use typed_less_modules_rs::output::{AlertLevel, RecordingAlerts};

struct Fixture {
    _dir: tempfile::TempDir,
    root: Utf8PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        Self { _dir: dir, root }
    }

    fn write(&self, name: &str, content: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

fn generator(options: Options) -> Generator {
    Generator::with_compiler(options, Compiler::native())
}

fn read(path: &Utf8Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_write_named_declaration() {
    let fixture = Fixture::new();
    let file = fixture.write("style.less", ".someClass {\n  color: red;\n}\n");
    let alerts = RecordingAlerts::default();

    let outcome = generator(Options::default()).write_file(&file, &alerts).await;

    let declaration = fixture.root.join("style.less.d.ts");
    let map_path = fixture.root.join("style.less.d.ts.map");
    assert_eq!(
        outcome,
        WriteOutcome::Written {
            declaration: declaration.clone(),
            map: Some(map_path.clone()),
        }
    );
    assert_eq!(
        read(&declaration),
        "export const someClass: string;\n//# sourceMappingURL=style.less.d.ts.map\n"
    );
    assert_eq!(
        alerts.messages(AlertLevel::Success),
        vec![format!("[GENERATED TYPES] {declaration}")]
    );

    let map = SourceMap::from_json(&read(&map_path)).unwrap();
    assert_eq!(map.file(), Some("style.less.d.ts"));
    let original = map
        .original_position_for(GeneratedPosition::new(1, 13))
        .unwrap();
    assert_eq!(original.source.as_deref(), Some("style.less"));
    assert_eq!((original.line, original.column), (1, 0));
}

#[tokio::test]
async fn test_write_default_declaration_without_map() {
    let fixture = Fixture::new();
    let file = fixture.write(
        "style.css",
        ".myClass {\n  color: red;\n}\n.your-class {\n  color: blue;\n}\n",
    );
    let alerts = RecordingAlerts::default();
    let options = Options {
        export_type: ExportType::Default,
        declaration_map: false,
        ..Options::default()
    };

    generator(options).write_file(&file, &alerts).await;

    insta::assert_snapshot!(read(&fixture.root.join("style.css.d.ts")), @r"
    export interface Styles {
      'myClass': string;
      'yourClass': string;
    }

    export type ClassNames = keyof Styles;

    declare const styles: Styles;

    export default styles;
    ");
    assert!(!fixture.root.join("style.css.d.ts.map").exists());
}

#[tokio::test]
async fn test_rejected_names_are_warned() {
    let fixture = Fixture::new();
    let file = fixture.write(
        "style.css",
        ".myClass { color: red; }\n.if { color: blue; }\n.your-class { color: green; }\n",
    );
    let alerts = RecordingAlerts::default();
    let options = Options {
        name_format: dts_transformer::NameFormat::None,
        declaration_map: false,
        ..Options::default()
    };

    generator(options).write_file(&file, &alerts).await;

    assert_eq!(
        read(&fixture.root.join("style.css.d.ts")),
        "export const myClass: string;\n"
    );
    let warnings = alerts.messages(AlertLevel::Warn);
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("'if' is a reserved keyword"));
    assert!(warnings[1].contains("'your-class' contains dashes"));
}

#[tokio::test]
async fn test_no_classes_writes_nothing() {
    let fixture = Fixture::new();
    let file = fixture.write("empty.less", "body {\n  margin: 0;\n}\n");
    let alerts = RecordingAlerts::default();

    let outcome = generator(Options::default()).write_file(&file, &alerts).await;

    assert_eq!(outcome, WriteOutcome::NoTypes);
    assert_eq!(
        alerts.messages(AlertLevel::Notice),
        vec![format!("[NO GENERATED TYPES] {file}")]
    );
    assert!(!fixture.root.join("empty.less.d.ts").exists());
}

#[tokio::test]
async fn test_compile_error_is_reported() {
    let fixture = Fixture::new();
    let file = fixture.write("broken.less", ".a {\n  color: red;\n");
    let alerts = RecordingAlerts::default();

    let outcome = generator(Options::default()).write_file(&file, &alerts).await;

    assert_eq!(outcome, WriteOutcome::Failed);
    let errors = alerts.messages(AlertLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains(file.as_str()), "{}", errors[0]);
}

#[tokio::test]
async fn test_write_is_deterministic() {
    let fixture = Fixture::new();
    let file = fixture.write(
        "style.less",
        ".b { color: red; }\n.a { color: blue; }\n.b:hover { color: green; }\n",
    );
    let generator = generator(Options::default());
    let alerts = RecordingAlerts::default();

    generator.write_file(&file, &alerts).await;
    let first = (
        read(&fixture.root.join("style.less.d.ts")),
        read(&fixture.root.join("style.less.d.ts.map")),
    );
    generator.write_file(&file, &alerts).await;
    let second = (
        read(&fixture.root.join("style.less.d.ts")),
        read(&fixture.root.join("style.less.d.ts.map")),
    );

    assert_eq!(first, second);
    assert!(first.0.starts_with("export const b: string;\nexport const a: string;\n"));
}

#[tokio::test]
async fn test_list_different_reports_stale_file() {
    let fixture = Fixture::new();
    let current = fixture.write("current.less", ".current { color: red; }\n");
    let stale = fixture.write("stale.less", ".fresh { color: red; }\n");
    fixture.write("nothing.less", "body { margin: 0; }\n");

    let generator = Arc::new(generator(Options::default()));
    let quiet = RecordingAlerts::default();
    generator.write_file(&current, &quiet).await;
    generator.write_file(&stale, &quiet).await;
    fixture.write("stale.less", ".renamed { color: red; }\n");

    let alerts = Arc::new(RecordingAlerts::default());
    let summary = list_different(fixture.root.as_str(), generator, alerts.clone())
        .await
        .unwrap();

    assert_eq!(summary.file_count, 3);
    assert_eq!(summary.failed, vec![stale.clone()]);
    assert_eq!(
        alerts.messages(AlertLevel::Error),
        vec![format!("[INVALID TYPES] Check type definitions for {stale}")]
    );
}

#[tokio::test]
async fn test_list_different_passes_when_current() {
    let fixture = Fixture::new();
    let file = fixture.write("style.less", ".someClass { color: red; }\n");
    let generator = Arc::new(generator(Options::default()));
    generator
        .write_file(&file, &RecordingAlerts::default())
        .await;

    let alerts = Arc::new(RecordingAlerts::default());
    let summary = list_different(fixture.root.as_str(), generator, alerts.clone())
        .await
        .unwrap();

    assert!(summary.is_success());
    assert!(alerts.entries().is_empty());
}

#[tokio::test]
async fn test_list_different_missing_map_fails() {
    let fixture = Fixture::new();
    let file = fixture.write("style.less", ".someClass { color: red; }\n");
    let generator = Arc::new(generator(Options::default()));
    generator
        .write_file(&file, &RecordingAlerts::default())
        .await;
    fs::remove_file(fixture.root.join("style.less.d.ts.map")).unwrap();

    let summary = list_different(
        fixture.root.as_str(),
        generator,
        Arc::new(RecordingAlerts::default()),
    )
    .await
    .unwrap();

    assert_eq!(summary.failed, vec![file]);
}

#[tokio::test]
async fn test_list_different_no_files() {
    let fixture = Fixture::new();
    let alerts = Arc::new(RecordingAlerts::default());
    let summary = list_different(
        fixture.root.join("*.less").as_str(),
        Arc::new(generator(Options::default())),
        alerts.clone(),
    )
    .await
    .unwrap();

    assert_eq!(summary.file_count, 0);
    assert!(summary.is_success());
    assert_eq!(alerts.messages(AlertLevel::Notice), vec!["No files found."]);
}

#[tokio::test]
async fn test_batch_continues_after_compile_error() {
    let fixture = Fixture::new();
    let broken = fixture.write("broken.less", ".a {\n  color: red;\n");
    let good = fixture.write("good.less", ".good { color: red; }\n");
    let alerts = Arc::new(RecordingAlerts::default());

    let outcomes = write_files(
        vec![broken.clone(), good.clone()],
        Arc::new(generator(Options::default())),
        alerts.clone(),
    )
    .await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0], (broken, WriteOutcome::Failed));
    assert!(matches!(outcomes[1].1, WriteOutcome::Written { .. }));
    assert_eq!(
        read(&fixture.root.join("good.less.d.ts")),
        "export const good: string;\n//# sourceMappingURL=good.less.d.ts.map\n"
    );
    assert!(!fixture.root.join("broken.less.d.ts").exists());
    assert_eq!(alerts.messages(AlertLevel::Error).len(), 1);
}

#[tokio::test]
async fn test_list_different_counts_compile_error_once() {
    let fixture = Fixture::new();
    let good = fixture.write("good.less", ".good { color: red; }\n");
    let generator = Arc::new(generator(Options::default()));
    generator
        .write_file(&good, &RecordingAlerts::default())
        .await;
    let broken = fixture.write("broken.less", ".a {\n  color: red;\n");

    let alerts = Arc::new(RecordingAlerts::default());
    let summary = list_different(fixture.root.as_str(), generator, alerts.clone())
        .await
        .unwrap();

    assert_eq!(summary.file_count, 2);
    assert_eq!(summary.failed, vec![broken.clone()]);
    assert_eq!(
        alerts.messages(AlertLevel::Error),
        vec![format!("[INVALID TYPES] Check type definitions for {broken}")]
    );
}

#[tokio::test]
async fn test_list_different_warns_about_skipped_names() {
    let fixture = Fixture::new();
    let file = fixture.write("style.css", ".myClass { color: red; }\n.if { color: blue; }\n");
    let options = Options {
        name_format: dts_transformer::NameFormat::None,
        ..Options::default()
    };
    let generator = Arc::new(generator(options));
    generator
        .write_file(&file, &RecordingAlerts::default())
        .await;

    let alerts = Arc::new(RecordingAlerts::default());
    let summary = list_different(fixture.root.as_str(), generator, alerts.clone())
        .await
        .unwrap();

    assert!(summary.is_success());
    let warnings = alerts.messages(AlertLevel::Warn);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("'if' is a reserved keyword"));
}

#[tokio::test]
async fn test_less_line_comments_without_lessc() {
    let fixture = Fixture::new();
    let file = fixture.write(
        "style.less",
        "// don't touch\n.someClass {\n  color: red; // note\n}\n",
    );
    let alerts = RecordingAlerts::default();

    generator(Options::default()).write_file(&file, &alerts).await;

    assert_eq!(
        read(&fixture.root.join("style.less.d.ts")),
        "export const someClass: string;\n//# sourceMappingURL=style.less.d.ts.map\n"
    );
    let map = SourceMap::from_json(&read(&fixture.root.join("style.less.d.ts.map"))).unwrap();
    let original = map
        .original_position_for(GeneratedPosition::new(1, 13))
        .unwrap();
    assert_eq!((original.line, original.column), (2, 0));
}
