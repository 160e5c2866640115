use crate::conf::Input;
use crate::parser;
use crate::structures::PingSummary;
use anyhow::{Context, Result};
use futures::future::join_all;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc::{Receiver, Sender};
use tracing::{info, warn};

type JobRx = Receiver<DigestJob>;
type DigestTx = Sender<Digest>;

/// Captured output of one ping run, waiting to be parsed.
#[derive(Debug)]
pub struct DigestJob {
    pub source: String,
    pub output: String,
    pub count: u64,
}

impl DigestJob {
    pub async fn load(input: &Input, count: u64) -> Result<Self> {
        let output = match input {
            Input::Stdin => {
                let mut buf = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut buf)
                    .await
                    .context("read ping output from stdin")?;
                buf
            }
            Input::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("read ping output from {}", path.display()))?,
        };

        Ok(Self {
            source: input.name(),
            output,
            count,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Digest {
    pub source: String,
    pub result: PingSummary,
}

pub struct Digester {}

impl Digester {
    /// Parse every job received, each on its own task, until the job
    /// channel closes. Returns how many digests were handed on.
    pub async fn digest(mut job_rx: JobRx, digest_tx: DigestTx) -> usize {
        let mut handlers = vec![];

        while let Some(job) = job_rx.recv().await {
            handlers.push(tokio::spawn(Self::digest_once(job, digest_tx.clone())));
        }

        let results = join_all(handlers).await;
        results
            .into_iter()
            .filter(|r| matches!(r, Ok(true)))
            .count()
    }

    async fn digest_once(job: DigestJob, digest_tx: DigestTx) -> bool {
        let result = parser::parse(&job.output, job.count);
        info!(
            "Digested {}: {} round trips, summary {}",
            job.source,
            result.roundtrips.len(),
            if result.sent.is_some() { "present" } else { "missing" }
        );

        let digest = Digest {
            source: job.source,
            result,
        };
        if let Err(e) = digest_tx.send(digest).await {
            warn!("Send digest fail, reporter gone: {}", e);
            return false;
        }
        true
    }
}
