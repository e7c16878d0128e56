//! Mock artifact source for testing without a registry.
//!
//! Serves a scripted queue of fetch results and records how many
//! fetches were made.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use crate::client::ArtifactSource;
use crate::error::{RegistryError, RegistryResult};

/// What the mock does once its scripted queue is drained.
#[derive(Debug, Clone)]
enum Drained {
    /// Keep returning the same payload.
    Repeat(Bytes),
    /// Fail with a request error.
    Error,
    /// Never resolve. Useful when a test wants the fetch side quiet.
    Pend,
}

/// Mock implementation of the `ArtifactSource` trait.
///
/// Thread-safe via `Mutex` (fine for test contexts).
pub struct MockArtifactSource {
    responses: Mutex<VecDeque<RegistryResult<Bytes>>>,
    drained: Drained,
    fetches: AtomicUsize,
}

impl MockArtifactSource {
    /// A source whose fetches never resolve.
    pub fn pending() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            drained: Drained::Pend,
            fetches: AtomicUsize::new(0),
        }
    }

    /// A source that returns `payload` on every fetch.
    pub fn repeating(payload: impl Into<Bytes>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            drained: Drained::Repeat(payload.into()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A source that serves the scripted results in order, then fails.
    pub fn scripted(responses: Vec<RegistryResult<Bytes>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            drained: Drained::Error,
            fetches: AtomicUsize::new(0),
        }
    }

    /// A source that serves the scripted results in order, then pends.
    pub fn scripted_then_pending(responses: Vec<RegistryResult<Bytes>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            drained: Drained::Pend,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of fetch calls observed so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactSource for MockArtifactSource {
    async fn fetch(&self) -> RegistryResult<Bytes> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => match &self.drained {
                Drained::Repeat(payload) => Ok(payload.clone()),
                Drained::Error => Err(RegistryError::Request("mock queue drained".into())),
                Drained::Pend => std::future::pending().await,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_responses_in_order() {
        let source = MockArtifactSource::scripted(vec![
            Ok(Bytes::from_static(b"one")),
            Err(RegistryError::EmptyManifest),
        ]);

        assert_eq!(&source.fetch().await.unwrap()[..], b"one");
        assert!(matches!(
            source.fetch().await.unwrap_err(),
            RegistryError::EmptyManifest
        ));
        assert!(matches!(
            source.fetch().await.unwrap_err(),
            RegistryError::Request(_)
        ));
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn repeating_never_drains() {
        let source = MockArtifactSource::repeating(&b"blob"[..]);
        for _ in 0..3 {
            assert_eq!(&source.fetch().await.unwrap()[..], b"blob");
        }
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn pending_source_never_resolves() {
        let source = MockArtifactSource::pending();
        let fetch = source.fetch();
        tokio::select! {
            _ = fetch => panic!("pending source must not resolve"),
            () = tokio::time::sleep(std::time::Duration::from_millis(20)) => {}
        }
    }
}
