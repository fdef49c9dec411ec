//! Upload validation: size, extension, and magic-byte sniffing, the
//! first step of both pipelines.

use clinrag_core::{Error, FileKind, Result};

pub const MAX_AUDIO_BYTES: u64 = 25 * 1024 * 1024;
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

fn extension_of(filename: &str) -> Option<String> {
    filename.rsplit('.').next().map(|e| e.to_lowercase())
}

fn looks_like_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

fn looks_like_mp3(bytes: &[u8]) -> bool {
    if bytes.len() >= 3 && &bytes[0..3] == b"ID3" {
        return true;
    }
    // MPEG frame sync: 11 set bits at the start of a frame header.
    bytes.len() >= 2 && bytes[0] == 0xFF && (bytes[1] & 0xE0) == 0xE0
}

/// Validate an audio upload against size, extension, and magic bytes.
/// Rejects with `InvalidMedia`.
pub fn validate_audio(bytes: &[u8], filename: &str) -> Result<()> {
    if bytes.len() as u64 > MAX_AUDIO_BYTES {
        return Err(Error::InvalidMedia(format!("audio exceeds {MAX_AUDIO_BYTES} bytes")));
    }
    match extension_of(filename).as_deref() {
        Some("wav") if looks_like_wav(bytes) => Ok(()),
        Some("mp3") if looks_like_mp3(bytes) => Ok(()),
        Some(ext @ ("wav" | "mp3")) => Err(Error::InvalidMedia(format!("{ext} extension but magic bytes don't match"))),
        other => Err(Error::InvalidMedia(format!("unsupported audio extension: {other:?}"))),
    }
}

fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && &bytes[0..4] == b"%PDF"
}

fn looks_like_image(bytes: &[u8]) -> bool {
    let jpeg = bytes.len() >= 3 && bytes[0..3] == [0xFF, 0xD8, 0xFF];
    let png = bytes.len() >= 8 && bytes[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    jpeg || png
}

/// Validate a document upload against size, kind, and magic bytes.
/// Rejects with `InvalidMedia`.
pub fn validate_document(bytes: &[u8], filename: &str) -> Result<FileKind> {
    if bytes.len() as u64 > MAX_DOCUMENT_BYTES {
        return Err(Error::InvalidMedia(format!("document exceeds {MAX_DOCUMENT_BYTES} bytes")));
    }
    match extension_of(filename).as_deref() {
        Some("pdf") if looks_like_pdf(bytes) => Ok(FileKind::Pdf),
        Some("jpg" | "jpeg" | "png") if looks_like_image(bytes) => Ok(FileKind::Image),
        Some(ext) => Err(Error::InvalidMedia(format!("{ext} extension but magic bytes don't match a supported kind"))),
        None => Err(Error::InvalidMedia("document has no recognizable extension".into())),
    }
}
