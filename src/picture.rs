//! Turns uploaded image files into the data URIs stored on contacts.

use crate::error::KontaktError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureKind {
    Jpeg,
    Png,
}

impl PictureKind {
    /// Picks the kind from the file extension (`.jpg`, `.jpeg` or `.png`).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<PictureKind, KontaktError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("jpg") | Some("jpeg") => Ok(PictureKind::Jpeg),
            Some("png") => Ok(PictureKind::Png),
            _ => Err(KontaktError::UnsupportedPicture(path.to_path_buf())),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            PictureKind::Jpeg => "image/jpeg",
            PictureKind::Png => "image/png",
        }
    }
}

pub fn data_uri(kind: PictureKind, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", kind.mime_type(), STANDARD.encode(bytes))
}

pub fn read_picture<P: AsRef<Path>>(path: P) -> Result<String, KontaktError> {
    let path = path.as_ref();
    let kind = PictureKind::from_path(path)?;
    let bytes = fs::read(path).map_err(|e| KontaktError::Io(path.to_path_buf(), e))?;
    Ok(data_uri(kind, &bytes))
}
