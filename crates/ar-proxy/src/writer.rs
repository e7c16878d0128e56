//! Serialized writer shared by the two pumps.
//!
//! Both the fetch pump and the packet pump write to the same downstream
//! connection. Frame writes go through one mutex so the pumps never
//! interleave partial writes.

use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Clonable handle writing whole frames to a shared connection.
pub struct SharedWriter<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> Clone for SharedWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: AsyncWrite + Unpin + Send> SharedWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    /// Write one whole frame and flush, holding the lock throughout.
    pub async fn write_frame(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut writer = self.inner.lock().await;
        writer.write_all(bytes).await?;
        writer.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn concurrent_frames_stay_whole() {
        let (tx, mut rx) = tokio::io::duplex(4096);
        let writer = SharedWriter::new(tx);

        let a = writer.clone();
        let b = writer.clone();
        let task_a = tokio::spawn(async move {
            for _ in 0..50 {
                a.write_frame(b"aaaa").await.unwrap();
            }
        });
        let task_b = tokio::spawn(async move {
            for _ in 0..50 {
                b.write_frame(b"bbbb").await.unwrap();
            }
        });
        task_a.await.unwrap();
        task_b.await.unwrap();
        drop(writer);

        let mut out = Vec::new();
        rx.read_to_end(&mut out).await.unwrap();
        assert_eq!(out.len(), 100 * 4);
        for frame in out.chunks(4) {
            assert!(frame == b"aaaa" || frame == b"bbbb", "torn frame: {frame:?}");
        }
    }

    #[tokio::test]
    async fn write_to_closed_peer_errors() {
        let (tx, rx) = tokio::io::duplex(64);
        drop(rx);
        let writer = SharedWriter::new(tx);
        assert!(writer.write_frame(b"data").await.is_err());
    }
}
