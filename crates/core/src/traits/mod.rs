//! Provider adapter capabilities (C1).
//!
//! The core binds to these capability sets, never to a specific vendor.
//! Each is a small async trait; concrete providers live in sibling
//! crates and are wired together at startup.
//!
//! ```text
//! Asr          - audio bytes -> transcript
//! LanguageModel - chat messages -> completion text
//! Embedder      - text -> fixed-dimension vector
//! Ocr           - pdf/image bytes -> extracted text
//! ```

mod asr;
mod embedder;
mod llm;
mod ocr;

pub use asr::{classify_transport_error, Asr, AsrSegment, TranscribeHints, TranscribeResult};
pub use embedder::Embedder;
pub use llm::LanguageModel;
pub use ocr::{ImageExtract, Ocr, PdfExtract};
