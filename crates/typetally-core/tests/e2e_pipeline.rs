/// End-to-end pipeline tests.
///
/// These run the real walker, worker pool, aggregator and renderers against
/// temporary directory trees. Classification is injected through the
/// classifier factory so results do not depend on any model: a file's label
/// is taken from its extension, and names containing `corrupt` fail.
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use typetally_core::classifier::{Classifier, ClassifierKind, SharedClassifier};
use typetally_core::error::ClassificationError;
use typetally_core::model::TypeLabel;
use typetally_core::render::ReportFormat;
use typetally_core::scanner::ScanOptions;
use typetally_core::{Orchestrator, RunError, RunOutcome, RunPhase};

// ── Helpers ──────────────────────────────────────────────────────────────────

struct ExtensionClassifier;

impl Classifier for ExtensionClassifier {
    fn name(&self) -> &'static str {
        "extension"
    }

    fn classify(&self, path: &Path) -> Result<TypeLabel, ClassificationError> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.contains("corrupt") {
            return Err(ClassificationError::model(path, "unreadable content"));
        }
        if name.contains("sleepy") {
            std::thread::sleep(Duration::from_millis(1_500));
        }
        let label = match path.extension().and_then(|e| e.to_str()) {
            Some("py") => "python",
            Some(ext) => ext,
            None => "unknown",
        };
        Ok(TypeLabel::new(label))
    }
}

fn extension_classifier() -> Result<SharedClassifier, RunError> {
    Ok(Arc::new(ExtensionClassifier))
}

fn write_bytes(path: &Path, n: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![b'x'; n]).unwrap();
}

fn options(jobs: usize) -> ScanOptions {
    ScanOptions {
        jobs,
        ..ScanOptions::default()
    }
}

fn run(root: &Path, jobs: usize, format: ReportFormat) -> RunOutcome {
    let mut orchestrator = Orchestrator::new(root, options(jobs), format);
    let outcome = orchestrator
        .run(extension_classifier)
        .expect("run must succeed");
    assert_eq!(orchestrator.phase(), RunPhase::Done);
    outcome
}

/// ```text
/// root/
///   a.py    (100 bytes)
///   b.py    ( 50 bytes)
///   c.pdf   (200 bytes)
/// ```
fn build_scenario(root: &Path) {
    write_bytes(&root.join("a.py"), 100);
    write_bytes(&root.join("b.py"), 50);
    write_bytes(&root.join("c.pdf"), 200);
}

/// A wider, nested tree for conservation and determinism checks.
fn build_nested(root: &Path) {
    for i in 0..30 {
        let dir = root.join(format!("d{}", i % 5)).join(format!("s{}", i % 3));
        let ext = ["py", "pdf", "md", "json", "bin"][i % 5];
        write_bytes(&dir.join(format!("f{i}.{ext}")), i * 37);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn scenario_report_orders_by_size() {
    let tmp = TempDir::new().unwrap();
    build_scenario(tmp.path());

    let outcome = run(tmp.path(), 1, ReportFormat::Table);
    let report = &outcome.report;
    assert_eq!(report.grand_total, 350);
    assert_eq!(report.files_analyzed, 3);
    assert_eq!(report.files_skipped, 0);
    assert_eq!(report.rows[0].label.as_str(), "pdf");
    assert_eq!(report.rows[0].total_bytes, 200);
    assert_eq!(report.rows[1].label.as_str(), "python");
    assert_eq!(report.rows[1].total_bytes, 150);

    assert!(outcome.rendered.contains("57.1%"));
    assert!(outcome.rendered.contains("42.9%"));
    assert!(outcome.rendered.contains("350.00 B"));
    let pdf_at = outcome.rendered.find("pdf").unwrap();
    let python_at = outcome.rendered.find("python").unwrap();
    assert!(pdf_at < python_at, "pdf row must come first");
}

#[test]
fn conservation_holds_for_nested_tree() {
    let tmp = TempDir::new().unwrap();
    build_nested(tmp.path());
    let expected: u64 = (0..30u64).map(|i| i * 37).sum();

    for jobs in [1, 4] {
        let report = run(tmp.path(), jobs, ReportFormat::Table).report;
        let row_sum: u64 = report.rows.iter().map(|r| r.total_bytes).sum();
        assert_eq!(report.grand_total, expected, "jobs = {jobs}");
        assert_eq!(row_sum, expected, "jobs = {jobs}");
        assert_eq!(report.files_analyzed, 30);

        let pct: f64 = report.rows.iter().map(|r| r.percentage).sum();
        assert!((pct - 100.0).abs() < 0.1);
        assert!(report
            .rows
            .iter()
            .all(|r| (0.0..=100.0).contains(&r.percentage)));
    }
}

#[test]
fn reports_are_byte_identical_across_runs_and_pool_sizes() {
    let tmp = TempDir::new().unwrap();
    build_nested(tmp.path());

    for format in [ReportFormat::Table, ReportFormat::Json, ReportFormat::Csv] {
        let first = run(tmp.path(), 1, format).rendered;
        let second = run(tmp.path(), 1, format).rendered;
        let pooled = run(tmp.path(), 4, format).rendered;
        assert_eq!(first, second, "{format:?}");
        assert_eq!(first, pooled, "{format:?}");
    }
}

#[test]
fn empty_tree_reports_no_files() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("only/dirs/here")).unwrap();

    let outcome = run(tmp.path(), 2, ReportFormat::Table);
    assert!(outcome.report.is_empty());
    assert_eq!(outcome.rendered, "No files found.\n");
}

#[test]
fn one_bad_file_is_skipped_not_fatal() {
    let tmp = TempDir::new().unwrap();
    build_scenario(tmp.path());
    write_bytes(&tmp.path().join("corrupt.pdf"), 999);

    for jobs in [1, 3] {
        let outcome = run(tmp.path(), jobs, ReportFormat::Table);
        assert_eq!(outcome.report.files_skipped, 1);
        assert_eq!(outcome.report.files_analyzed, 3);
        assert_eq!(outcome.report.grand_total, 350);
        assert!(outcome.rendered.contains("1 file skipped"));
    }
}

#[test]
fn single_zero_byte_file_gets_a_zero_row() {
    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("empty.py"), 0);

    let outcome = run(tmp.path(), 1, ReportFormat::Table);
    let report = &outcome.report;
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].label.as_str(), "python");
    assert_eq!(report.rows[0].total_bytes, 0);
    assert_eq!(report.rows[0].percentage, 0.0);
    assert!(outcome.rendered.contains("0.0%"));
}

#[test]
fn slow_classification_times_out_into_a_skip() {
    let tmp = TempDir::new().unwrap();
    build_scenario(tmp.path());
    write_bytes(&tmp.path().join("sleepy.md"), 10);

    let opts = ScanOptions {
        jobs: 2,
        classify_timeout: Some(Duration::from_millis(150)),
        ..ScanOptions::default()
    };
    let mut orchestrator = Orchestrator::new(tmp.path(), opts, ReportFormat::Table);
    let outcome = orchestrator.run(extension_classifier).unwrap();
    assert_eq!(outcome.report.files_skipped, 1);
    assert_eq!(outcome.report.grand_total, 350);
}

#[test]
fn invalid_root_exit_code() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("plain.txt");
    write_bytes(&file, 3);

    let mut orchestrator = Orchestrator::new(&file, options(1), ReportFormat::Table);
    let err = orchestrator.run(extension_classifier).unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert_eq!(orchestrator.phase(), RunPhase::Aborted);
}

#[test]
fn builtin_classifier_end_to_end() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("doc.bin"), b"%PDF-1.4 rest of document").unwrap();
    fs::write(tmp.path().join("notes.txt"), b"just some words").unwrap();

    let mut orchestrator = Orchestrator::new(tmp.path(), options(2), ReportFormat::Csv);
    let outcome = orchestrator
        .run(|| ClassifierKind::Builtin.build())
        .unwrap();
    assert_eq!(
        outcome.rendered,
        "type,total_bytes,file_count,percentage\npdf,25,1,62.5\ntxt,15,1,37.5\n"
    );
}

// ── Unreadable and special entries ───────────────────────────────────────────

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[cfg(unix)]
#[test]
fn unreadable_directory_counts_as_skipped() {
    let tmp = TempDir::new().unwrap();
    build_scenario(tmp.path());
    let locked = tmp.path().join("locked");
    write_bytes(&locked.join("hidden.py"), 500);
    set_mode(&locked, 0o000);

    // Permission bits do not bind a privileged user.
    if fs::read_dir(&locked).is_ok() {
        set_mode(&locked, 0o755);
        return;
    }

    let results: Vec<_> = [1, 3]
        .into_iter()
        .map(|jobs| {
            Orchestrator::new(tmp.path(), options(jobs), ReportFormat::Table)
                .run(extension_classifier)
        })
        .collect();
    set_mode(&locked, 0o755);

    for result in results {
        let outcome = result.expect("run must succeed");
        assert_eq!(outcome.report.files_analyzed, 3);
        assert_eq!(outcome.report.files_skipped, 1);
        assert_eq!(outcome.report.grand_total, 350);
        assert!(outcome.rendered.ends_with("3 files analyzed, 1 file skipped\n"));
    }
}

#[cfg(unix)]
#[test]
fn unstattable_file_counts_as_skipped() {
    let tmp = TempDir::new().unwrap();
    build_scenario(tmp.path());
    // Listable but not searchable: names are visible, metadata is not.
    let opaque = tmp.path().join("opaque");
    write_bytes(&opaque.join("inner.py"), 500);
    set_mode(&opaque, 0o600);

    if fs::metadata(opaque.join("inner.py")).is_ok() {
        set_mode(&opaque, 0o755);
        return;
    }

    let mut orchestrator = Orchestrator::new(tmp.path(), options(1), ReportFormat::Table);
    let result = orchestrator.run(extension_classifier);
    set_mode(&opaque, 0o755);

    let report = result.expect("run must succeed").report;
    assert_eq!(report.files_analyzed, 3);
    assert_eq!(report.files_skipped, 1);
    assert_eq!(report.grand_total, 350);
}

#[cfg(unix)]
#[test]
fn sockets_do_not_count() {
    let tmp = TempDir::new().unwrap();
    build_scenario(tmp.path());
    let _listener = std::os::unix::net::UnixListener::bind(tmp.path().join("s.sock")).unwrap();

    let report = run(tmp.path(), 2, ReportFormat::Table).report;
    assert_eq!(report.files_analyzed, 3);
    assert_eq!(report.files_skipped, 0);
    assert_eq!(report.grand_total, 350);
}

#[cfg(unix)]
#[test]
fn relative_link_cycle_does_not_inflate_totals() {
    let tmp = TempDir::new().unwrap();
    build_scenario(tmp.path());
    write_bytes(&tmp.path().join("sub/inner.py"), 25);
    std::os::unix::fs::symlink("..", tmp.path().join("sub/up")).unwrap();

    for jobs in [1, 4] {
        let opts = ScanOptions {
            jobs,
            follow_links: true,
            ..ScanOptions::default()
        };
        let mut orchestrator = Orchestrator::new(tmp.path(), opts, ReportFormat::Table);
        let report = orchestrator.run(extension_classifier).unwrap().report;
        assert_eq!(report.files_analyzed, 4, "jobs = {jobs}");
        assert_eq!(report.grand_total, 375, "jobs = {jobs}");
        assert_eq!(report.files_skipped, 1, "jobs = {jobs}");
    }
}
