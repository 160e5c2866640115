use crate::digester::Digest;
use anyhow::{Context, Result};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::debug;

type DigestRx = mpsc::Receiver<Digest>;

/// Writes one JSON document per digest to `writer`.
pub struct Reporter<W> {
    writer: W,
    pretty: bool,
}

impl<W: AsyncWrite + Unpin> Reporter<W> {
    pub fn new(writer: W, pretty: bool) -> Self {
        Self { writer, pretty }
    }

    fn encode(&self, digest: &Digest) -> Result<Vec<u8>> {
        let mut buf = if self.pretty {
            serde_json::to_vec_pretty(digest)?
        } else {
            serde_json::to_vec(digest)?
        };
        buf.push(b'\n');
        Ok(buf)
    }

    /// Drain `rx` until every sender is gone. Returns the number of
    /// reports written.
    pub async fn report(&mut self, mut rx: DigestRx) -> Result<usize> {
        let mut written = 0;

        while let Some(digest) = rx.recv().await {
            let buf = self
                .encode(&digest)
                .with_context(|| format!("encode report for {}", digest.source))?;
            self.writer
                .write_all(&buf)
                .await
                .with_context(|| format!("write report for {}", digest.source))?;
            debug!("Reported {}", digest.source);
            written += 1;
        }

        self.writer.flush().await.context("flush reports")?;
        Ok(written)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
