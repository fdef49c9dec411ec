//! Text embedding capability.

use async_trait::async_trait;

use crate::error::Result;
use crate::vector::EMBEDDING_DIM;

/// Embedding provider capability.
///
/// Must be deterministic: `embed(x) == embed(x)` byte-identical, for any
/// input `x`, across calls on the same instance.
///
/// # Example
///
/// ```ignore
/// let embedder: Box<dyn Embedder> = Box::new(LocalEmbedder::new(config));
/// let vector = embedder.embed("paciente con dolor de cabeza").await?;
/// assert_eq!(vector.len(), embedder.dimension());
/// ```
#[async_trait]
pub trait Embedder: Send + Sync + 'static {
    /// Embed a single piece of text into a fixed-dimension vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding dimension produced by this implementation. Defaults to
    /// the workspace-wide reference value.
    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    /// Model identifier, surfaced by `VectorIndex::stats`.
    fn model_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockEmbedder;

    #[async_trait]
    impl Embedder for MockEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            // Deterministic stand-in: hash each byte into a fixed-size vector.
            let mut v = vec![0.0f32; EMBEDDING_DIM];
            for (i, b) in text.bytes().enumerate() {
                v[i % EMBEDDING_DIM] += b as f32 / 255.0;
            }
            Ok(v)
        }

        fn model_id(&self) -> &str {
            "mock-embedder"
        }
    }

    #[tokio::test]
    async fn deterministic_embedding() {
        let e = MockEmbedder;
        let a = e.embed("dolor de cabeza").await.unwrap();
        let b = e.embed("dolor de cabeza").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), EMBEDDING_DIM);
    }
}
