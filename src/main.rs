use clap::Parser;
use futures::future;
use ping_digest::conf::{self, Args, DEFAULT_LOG_LEVEL};
use ping_digest::digester::{DigestJob, Digester};
use ping_digest::reporter::Reporter;
use std::process;
use tokio::sync::mpsc;
use tokio::task;
use tracing::{error, info};

const JOB_QUEUE: usize = 16;
const DIGEST_QUEUE: usize = 64;

#[tokio::main]
async fn main() {
    let settings = conf::load(Args::parse()).await;

    let level = settings.as_ref().map_or(DEFAULT_LOG_LEVEL, |s| s.log_level);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            process::exit(exitcode::CONFIG);
        }
    };

    let (job_tx, job_rx) = mpsc::channel(JOB_QUEUE);
    let (digest_tx, digest_rx) = mpsc::channel(DIGEST_QUEUE);

    let digester = task::spawn(Digester::digest(job_rx, digest_tx));
    let pretty = settings.pretty;
    let reporter = task::spawn(async move {
        let mut reporter = Reporter::new(tokio::io::stdout(), pretty);
        reporter.report(digest_rx).await
    });

    let mut code = exitcode::OK;
    for input in &settings.inputs {
        match DigestJob::load(input, settings.count).await {
            Ok(job) => {
                if job_tx.send(job).await.is_err() {
                    error!("Digester stopped early");
                    code = exitcode::SOFTWARE;
                    break;
                }
            }
            Err(e) => {
                error!("{:#}", e);
                code = exitcode::NOINPUT;
            }
        }
    }
    drop(job_tx);

    let (digested, reported) = future::join(digester, reporter).await;
    match (digested, reported) {
        (Ok(digested), Ok(Ok(reported))) => {
            info!("Digested {} inputs, reported {}", digested, reported);
        }
        (_, Ok(Err(e))) => {
            error!("Report fail: {:#}", e);
            code = exitcode::IOERR;
        }
        (Err(e), _) | (_, Err(e)) => {
            error!("Task fail: {}", e);
            code = exitcode::SOFTWARE;
        }
    }

    process::exit(code);
}
