//! Export path: render, encode and write photos.
//!
//! ## Batch Export
//!
//! [`export_batch`] processes photos strictly one at a time, in the order
//! given. Each photo is rendered, encoded and written before the next one
//! starts, so a shared destination never sees two concurrent writes and
//! progress is monotonic.
//!
//! Failures are soft: a photo without a decoded image is skipped, and a
//! render/encode/write failure is logged and recorded, but the rest of the
//! batch still runs. Only problems detected before any work starts (quota,
//! cancelled destination selection) abort the whole export.
//!
//! ## Collaborators
//!
//! - [`ExportSink`]: where encoded bytes go (a folder, or a download)
//! - [`ExportGate`]: usage quota / account capability
//! - [`ImageSource`]: decoded originals, keyed by [`PhotoId`]

use crate::encode::{encode_raster, EncodeError, DEFAULT_QUALITY};
use crate::raster::Raster;
use crate::render::render;
use crate::session::{Photo, PhotoId};
use crate::transform::CropError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// JPEG quality (1-100)
    pub quality: u8,
    /// Prefix added to file names of browser downloads
    pub download_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            download_prefix: "f64_".to_string(),
        }
    }
}

/// Kind of destination an export writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// A user-chosen folder; file names are preserved.
    Folder,
    /// A browser download; file names get the download prefix.
    Download,
}

/// File name a photo is written under for the given destination.
pub fn export_file_name(destination: Destination, name: &str, config: &ExportConfig) -> String {
    match destination {
        Destination::Folder => name.to_string(),
        Destination::Download => format!("{}{}", config.download_prefix, name),
    }
}

/// Errors from the export path.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Cannot render photo: {0}")]
    Crop(#[from] CropError),

    #[error("Cannot encode photo: {0}")]
    Encode(#[from] EncodeError),

    #[error("Failed to write {file_name}: {source}")]
    Write {
        file_name: String,
        #[source]
        source: io::Error,
    },

    #[error("Export quota exceeded: {requested} photo(s) requested")]
    QuotaExceeded { requested: usize },

    #[error("Export destination selection was cancelled")]
    Cancelled,
}

/// Receives encoded files.
pub trait ExportSink {
    fn destination(&self) -> Destination;

    fn write(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Writes files into a directory on disk.
#[derive(Debug, Clone)]
pub struct FolderSink {
    dir: PathBuf,
}

impl FolderSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for FolderSink {
    fn destination(&self) -> Destination {
        Destination::Folder
    }

    fn write(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        // Only the final component: a photo name never picks its directory.
        let leaf = Path::new(file_name).file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file name: {file_name:?}"),
            )
        })?;
        fs::write(self.dir.join(leaf), bytes)
    }
}

/// Keeps files in memory, in write order.
#[derive(Debug, Clone)]
pub struct MemorySink {
    destination: Destination,
    pub files: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new(destination: Destination) -> Self {
        Self {
            destination,
            files: Vec::new(),
        }
    }
}

impl ExportSink for MemorySink {
    fn destination(&self) -> Destination {
        self.destination
    }

    fn write(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Account capability consulted before exporting.
pub trait ExportGate {
    fn can_export(&self, amount: usize) -> bool;

    fn record_export(&mut self, amount: usize);
}

/// No limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unmetered;

impl ExportGate for Unmetered {
    fn can_export(&self, _amount: usize) -> bool {
        true
    }

    fn record_export(&mut self, _amount: usize) {}
}

/// Fixed number of exports per billing month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyQuota {
    pub limit: usize,
    pub used: usize,
}

impl MonthlyQuota {
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.used)
    }
}

impl ExportGate for MonthlyQuota {
    fn can_export(&self, amount: usize) -> bool {
        amount <= self.remaining()
    }

    fn record_export(&mut self, amount: usize) {
        self.used = self.used.saturating_add(amount);
    }
}

/// Lookup of decoded originals.
pub trait ImageSource {
    fn image(&self, id: PhotoId) -> Option<&Raster>;
}

impl ImageSource for HashMap<PhotoId, Raster> {
    fn image(&self, id: PhotoId) -> Option<&Raster> {
        self.get(&id)
    }
}

/// Position within a running batch. `current` counts from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    pub current: usize,
    pub total: usize,
}

/// What happened to one photo of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Written { file_name: String },
    /// No decoded image was available.
    Skipped,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub id: PhotoId,
    pub outcome: ItemOutcome,
}

/// Per-photo results of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }

    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }
}

/// Render, encode and write a single photo. Returns the file name written.
///
/// Not gated: callers exporting outside [`export_batch`] consult their
/// [`ExportGate`] themselves.
pub fn export_single<S: ExportSink + ?Sized>(
    photo: &Photo,
    image: &Raster,
    sink: &mut S,
    config: &ExportConfig,
) -> Result<String, ExportError> {
    let rendered = render(image, &photo.params)?;
    let bytes = encode_raster(&rendered, config.quality)?;
    let file_name = export_file_name(sink.destination(), &photo.name, config);

    log::debug!("writing {} ({} bytes)", file_name, bytes.len());
    sink.write(&file_name, &bytes)
        .map_err(|source| ExportError::Write {
            file_name: file_name.clone(),
            source,
        })?;
    Ok(file_name)
}

/// Export `photos` in order through one destination.
///
/// `open_sink` is called once, after the quota check; returning `None`
/// (the user dismissed the folder picker) aborts before any photo is
/// touched. An empty request returns immediately without opening anything.
///
/// `on_progress` fires once per requested photo, including skipped and
/// failed ones, with `current` running from 1 to `photos.len()`.
pub fn export_batch<S, G, I, F>(
    photos: &[Photo],
    images: &I,
    open_sink: impl FnOnce() -> Option<S>,
    gate: &mut G,
    config: &ExportConfig,
    mut on_progress: F,
) -> Result<BatchReport, ExportError>
where
    S: ExportSink,
    G: ExportGate + ?Sized,
    I: ImageSource + ?Sized,
    F: FnMut(ExportProgress),
{
    let total = photos.len();
    if total == 0 {
        return Ok(BatchReport::default());
    }
    if !gate.can_export(total) {
        return Err(ExportError::QuotaExceeded { requested: total });
    }
    let mut sink = open_sink().ok_or(ExportError::Cancelled)?;

    log::info!("exporting {total} photo(s)");
    let mut report = BatchReport {
        items: Vec::with_capacity(total),
    };

    for (index, photo) in photos.iter().enumerate() {
        on_progress(ExportProgress {
            current: index + 1,
            total,
        });

        let outcome = match images.image(photo.id) {
            None => {
                log::debug!("skipping {}: no decoded image", photo.id);
                ItemOutcome::Skipped
            }
            Some(image) => match export_single(photo, image, &mut sink, config) {
                Ok(file_name) => ItemOutcome::Written { file_name },
                Err(err) => {
                    log::warn!("failed to export {}: {}", photo.name, err);
                    ItemOutcome::Failed {
                        reason: err.to_string(),
                    }
                }
            },
        };
        report.items.push(ItemReport {
            id: photo.id,
            outcome,
        });
    }

    let written = report.written();
    if written > 0 {
        gate.record_export(written);
    }
    log::info!(
        "export finished: {} written, {} skipped, {} failed",
        written,
        report.skipped(),
        report.failed()
    );
    Ok(report)
}
