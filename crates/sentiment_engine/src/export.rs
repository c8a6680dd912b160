use std::io::{Cursor, Write};
use std::path::PathBuf;

use engine_logging::{engine_info, engine_warn};

use crate::persist::{AtomicFileWriter, PersistError};

/// File name the archive is delivered under.
pub const ARCHIVE_FILENAME: &str = "dashboard_export.zip";

/// The panels an export may contain, in archive order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelId {
    /// Aggregate visualizations (distribution and gauge).
    Charts,
    /// KPI card grid.
    Kpis,
    /// Source results list.
    Sources,
}

impl PanelId {
    pub const ALL: [PanelId; 3] = [PanelId::Charts, PanelId::Kpis, PanelId::Sources];

    pub fn name(self) -> &'static str {
        match self {
            PanelId::Charts => "charts",
            PanelId::Kpis => "kpis",
            PanelId::Sources => "sources",
        }
    }

    pub fn entry_name(self) -> String {
        format!("{}.png", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("image of {width}x{height} pixels exceeds the capture limit")]
    TooLarge { width: u64, height: u64 },
    #[error("capture failed: {0}")]
    Failed(String),
}

/// A rendered surface that can be captured as an encoded raster image.
pub trait ExportableSurface: Send {
    fn capture_image(&self) -> Result<Vec<u8>, CaptureError>;
}

/// One slot of the export; `surface` is `None` when the panel is not rendered.
pub struct PanelCapture {
    pub panel: PanelId,
    pub surface: Option<Box<dyn ExportableSurface>>,
}

impl PanelCapture {
    pub fn present(panel: PanelId, surface: impl ExportableSurface + 'static) -> Self {
        Self {
            panel,
            surface: Some(Box::new(surface)),
        }
    }

    pub fn absent(panel: PanelId) -> Self {
        Self {
            panel,
            surface: None,
        }
    }
}

impl std::fmt::Debug for PanelCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelCapture")
            .field("panel", &self.panel)
            .field("present", &self.surface.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub archive_filename: String,
}

impl ExportOptions {
    pub fn in_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            archive_filename: ARCHIVE_FILENAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub archive_path: PathBuf,
    pub entries: Vec<String>,
    pub skipped: Vec<PanelId>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("capture of panel {panel} failed: {source}")]
    Capture {
        panel: &'static str,
        #[source]
        source: CaptureError,
    },
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveBundle {
    pub bytes: Vec<u8>,
    pub entries: Vec<String>,
    pub skipped: Vec<PanelId>,
}

/// Captures every present panel and packs the images into one zip archive.
///
/// Absent panels are skipped. Any capture failure aborts the whole bundle.
pub fn build_archive(panels: &[PanelCapture]) -> Result<ArchiveBundle, ExportError> {
    let mut images = Vec::new();
    let mut skipped = Vec::new();
    for capture in panels {
        let Some(surface) = &capture.surface else {
            skipped.push(capture.panel);
            continue;
        };
        let image = surface
            .capture_image()
            .map_err(|source| ExportError::Capture {
                panel: capture.panel.name(),
                source,
            })?;
        images.push((capture.panel.entry_name(), image));
    }

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    // PNG data is already compressed.
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    let mut entries = Vec::with_capacity(images.len());
    for (name, image) in images {
        writer.start_file(name.as_str(), options)?;
        writer.write_all(&image)?;
        entries.push(name);
    }
    let bytes = writer.finish()?.into_inner();

    Ok(ArchiveBundle {
        bytes,
        entries,
        skipped,
    })
}

/// Builds the archive and writes it atomically; nothing is written on failure.
pub fn export_dashboard(
    panels: &[PanelCapture],
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let bundle = match build_archive(panels) {
        Ok(bundle) => bundle,
        Err(err) => {
            engine_warn!("Export aborted: {}", err);
            return Err(err);
        }
    };
    let writer = AtomicFileWriter::new(options.output_dir.clone());
    let archive_path = writer.write(&options.archive_filename, &bundle.bytes)?;
    engine_info!(
        "Wrote {:?} with entries {:?} (skipped {:?})",
        archive_path,
        bundle.entries,
        bundle.skipped
    );
    Ok(ExportSummary {
        archive_path,
        entries: bundle.entries,
        skipped: bundle.skipped,
    })
}
