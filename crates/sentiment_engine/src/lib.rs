//! Sentiment engine: backend IO, poll timer and export pipeline.
mod backend;
mod engine;
mod export;
mod persist;
mod raster;
mod retry;
mod types;

pub use backend::{BackendSettings, JobBackend, ReqwestBackend, DEFAULT_BASE_URL};
pub use engine::{EngineHandle, EngineSettings};
pub use export::{
    build_archive, export_dashboard, ArchiveBundle, CaptureError, ExportError, ExportOptions,
    ExportSummary, ExportableSurface, PanelCapture, PanelId, ARCHIVE_FILENAME,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use raster::TextPanelSurface;
pub use retry::{retry_async, RetryPolicy};
pub use types::{BackendError, EngineEvent, FailureKind};
