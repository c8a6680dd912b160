use std::io::Cursor;

use pretty_assertions::assert_eq;
use sentiment_engine::{
    build_archive, export_dashboard, CaptureError, ExportError, ExportOptions, ExportableSurface,
    PanelCapture, PanelId, TextPanelSurface, ARCHIVE_FILENAME,
};

struct FixedSurface(&'static [u8]);

impl ExportableSurface for FixedSurface {
    fn capture_image(&self) -> Result<Vec<u8>, CaptureError> {
        Ok(self.0.to_vec())
    }
}

struct BrokenSurface;

impl ExportableSurface for BrokenSurface {
    fn capture_image(&self) -> Result<Vec<u8>, CaptureError> {
        Err(CaptureError::Failed("surface detached".to_string()))
    }
}

fn entry_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    archive.file_names().map(str::to_string).collect()
}

fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    use std::io::Read;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut file = archive.by_name(name).expect("entry");
    let mut out = Vec::new();
    file.read_to_end(&mut out).unwrap();
    out
}

#[test]
fn all_present_panels_are_bundled_under_fixed_names() {
    let panels = vec![
        PanelCapture::present(PanelId::Charts, FixedSurface(b"charts")),
        PanelCapture::present(PanelId::Kpis, FixedSurface(b"kpis")),
        PanelCapture::present(PanelId::Sources, FixedSurface(b"sources")),
    ];

    let bundle = build_archive(&panels).unwrap();

    assert_eq!(bundle.entries, vec!["charts.png", "kpis.png", "sources.png"]);
    assert!(bundle.skipped.is_empty());
    let mut names = entry_names(&bundle.bytes);
    names.sort();
    assert_eq!(names, vec!["charts.png", "kpis.png", "sources.png"]);
    assert_eq!(read_entry(&bundle.bytes, "kpis.png"), b"kpis");
}

#[test]
fn absent_panel_is_skipped_and_others_still_export() {
    let temp = tempfile::TempDir::new().unwrap();
    let panels = vec![
        PanelCapture::present(PanelId::Charts, FixedSurface(b"charts")),
        PanelCapture::absent(PanelId::Kpis),
        PanelCapture::present(PanelId::Sources, FixedSurface(b"sources")),
    ];

    let summary = export_dashboard(&panels, &ExportOptions::in_dir(temp.path())).unwrap();

    assert_eq!(summary.archive_path, temp.path().join(ARCHIVE_FILENAME));
    assert_eq!(summary.entries, vec!["charts.png", "sources.png"]);
    assert_eq!(summary.skipped, vec![PanelId::Kpis]);
    let bytes = std::fs::read(&summary.archive_path).unwrap();
    let mut names = entry_names(&bytes);
    names.sort();
    assert_eq!(names, vec!["charts.png", "sources.png"]);
}

#[test]
fn failing_capture_aborts_whole_export() {
    let temp = tempfile::TempDir::new().unwrap();
    let panels = vec![
        PanelCapture::present(PanelId::Charts, FixedSurface(b"charts")),
        PanelCapture::present(PanelId::Kpis, BrokenSurface),
        PanelCapture::present(PanelId::Sources, FixedSurface(b"sources")),
    ];

    let err = export_dashboard(&panels, &ExportOptions::in_dir(temp.path())).unwrap_err();

    match err {
        ExportError::Capture { panel, source } => {
            assert_eq!(panel, "kpis");
            assert_eq!(source, CaptureError::Failed("surface detached".to_string()));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!temp.path().join(ARCHIVE_FILENAME).exists());
}

#[test]
fn export_with_no_rendered_panels_writes_empty_archive() {
    let temp = tempfile::TempDir::new().unwrap();
    let panels: Vec<_> = PanelId::ALL.into_iter().map(PanelCapture::absent).collect();

    let summary = export_dashboard(&panels, &ExportOptions::in_dir(temp.path())).unwrap();

    assert!(summary.entries.is_empty());
    assert_eq!(summary.skipped, PanelId::ALL.to_vec());
    let bytes = std::fs::read(summary.archive_path).unwrap();
    assert!(entry_names(&bytes).is_empty());
}

#[test]
fn text_panels_export_as_png_images() {
    let temp = tempfile::TempDir::new().unwrap();
    let panels = vec![PanelCapture::present(
        PanelId::Sources,
        TextPanelSurface::new(vec!["a.com  OK".to_string(), "b.com  BLOCKED/ERROR".to_string()]),
    )];

    let summary = export_dashboard(&panels, &ExportOptions::in_dir(temp.path())).unwrap();
    let bytes = std::fs::read(summary.archive_path).unwrap();
    let image = read_entry(&bytes, "sources.png");

    assert_eq!(&image[1..4], b"PNG");
}
