//! Person pictures: decoding and display
//!
//! The store keeps pictures as opaque bytes. Reports hand them to a
//! [`PictureViewer`], which decodes them with the `image` crate and shows
//! them in whatever way fits the front end.

use std::path::PathBuf;
use image::GenericImageView;
use serde::Serialize;
use crate::person::Person;
use crate::{Result, ui};

/// What could be learned from decoding a picture payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PictureInfo {
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

impl std::fmt::Display for PictureInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}x{} ({} bytes)", self.format, self.width, self.height, self.bytes)
    }
}

/// Decode a payload far enough to describe it
pub fn inspect(bytes: &[u8]) -> Result<PictureInfo> {
    let format = image::guess_format(bytes)?;
    let img = image::load_from_memory_with_format(bytes, format)?;
    let (width, height) = img.dimensions();
    Ok(PictureInfo {
        format: format!("{:?}", format).to_uppercase(),
        width,
        height,
        bytes: bytes.len(),
    })
}

/// Outcome of decoding a stored picture, as reported in JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PictureStatus {
    Decoded(PictureInfo),
    Unreadable { error: String },
}

/// Decode `bytes`, turning a failure into a reportable status
pub fn summarize(bytes: &[u8]) -> PictureStatus {
    match inspect(bytes) {
        Ok(info) => PictureStatus::Decoded(info),
        Err(e) => PictureStatus::Unreadable { error: e.to_string() },
    }
}

/// Something that can present a person's picture
pub trait PictureViewer {
    fn show(&self, person: &Person, bytes: &[u8]) -> Result<()>;
}

/// Prints the decoded format and dimensions
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryViewer;

impl PictureViewer for SummaryViewer {
    fn show(&self, _person: &Person, bytes: &[u8]) -> Result<()> {
        let info = inspect(bytes)?;
        ui::info("Picture", &info.to_string());
        Ok(())
    }
}

/// Decodes the picture and writes it as `<national_id>.png` into a directory
#[derive(Debug, Clone)]
pub struct ExportViewer {
    dir: PathBuf,
}

impl ExportViewer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where the picture of `person` ends up
    pub fn target_path(&self, person: &Person) -> PathBuf {
        self.dir.join(format!("{}.png", person.national_id))
    }

    fn export(&self, person: &Person, bytes: &[u8]) -> Result<PathBuf> {
        let img = image::load_from_memory(bytes)?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.target_path(person);
        img.save_with_format(&path, image::ImageFormat::Png)?;
        Ok(path)
    }
}

impl PictureViewer for ExportViewer {
    fn show(&self, person: &Person, bytes: &[u8]) -> Result<()> {
        let path = self.export(person, bytes)?;
        tracing::debug!("Exported picture of {} to {}", person.national_id, path.display());
        ui::info("Picture", &path.display().to_string());
        Ok(())
    }
}
