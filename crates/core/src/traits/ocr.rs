//! PDF/image text extraction capability.

use async_trait::async_trait;

use crate::error::Result;

/// Result of extracting text from a PDF.
#[derive(Debug, Clone)]
pub struct PdfExtract {
    pub text: String,
    pub page_count: u32,
}

/// Result of extracting text from an image via OCR.
#[derive(Debug, Clone)]
pub struct ImageExtract {
    pub text: String,
    pub confidence: f32,
}

/// OCR/PDF provider capability.
///
/// # Example
///
/// ```ignore
/// let ocr: Box<dyn Ocr> = Box::new(LocalOcr::new(config));
/// let pdf = ocr.extract_pdf(&bytes, 50).await?;
/// ```
#[async_trait]
pub trait Ocr: Send + Sync + 'static {
    /// Extract text from a PDF, reading at most `max_pages`.
    async fn extract_pdf(&self, bytes: &[u8], max_pages: u32) -> Result<PdfExtract>;

    /// Extract text from an image via OCR, in the given language.
    async fn extract_image(&self, bytes: &[u8], lang: &str) -> Result<ImageExtract>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockOcr;

    #[async_trait]
    impl Ocr for MockOcr {
        async fn extract_pdf(&self, _bytes: &[u8], max_pages: u32) -> Result<PdfExtract> {
            Ok(PdfExtract { text: "Paciente: Pepito Gómez".into(), page_count: max_pages.min(3) })
        }

        async fn extract_image(&self, _bytes: &[u8], _lang: &str) -> Result<ImageExtract> {
            Ok(ImageExtract { text: "Glucosa 180 mg/dL".into(), confidence: 0.9 })
        }

        fn name(&self) -> &str {
            "mock-ocr"
        }
    }

    #[tokio::test]
    async fn mock_extracts_pdf() {
        let ocr = MockOcr;
        let result = ocr.extract_pdf(&[], 50).await.unwrap();
        assert_eq!(result.page_count, 3);
    }
}
