use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_LOG_LEVEL: Level = Level::INFO;

/// Turn captured ping output into JSON telemetry.
#[derive(Parser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Config file in TOML format
    #[clap(short, long)]
    pub conf: Option<PathBuf>,
    /// Number of packets ping was asked to send
    #[clap(short = 'n', long)]
    pub count: Option<u64>,
    /// Pretty-print the JSON reports
    #[clap(long)]
    pub pretty: bool,
    /// One of error, warn, info, debug, trace
    #[clap(short, long)]
    pub log_level: Option<String>,
    /// Files holding captured ping output, `-` for stdin
    pub inputs: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Conf {
    pub parse: ParseConf,
    pub report: ReportConf,
    pub log: LogConf,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ParseConf {
    pub count: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ReportConf {
    pub pretty: bool,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct LogConf {
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn name(&self) -> String {
        match self {
            Input::Stdin => String::from("-"),
            Input::File(path) => path.display().to_string(),
        }
    }
}

/// Command line merged over the config file.
#[derive(Debug)]
pub struct Settings {
    /// Highest sequence number kept; `u64::MAX` when no count was given.
    pub count: u64,
    pub pretty: bool,
    pub log_level: Level,
    pub inputs: Vec<Input>,
}

impl Settings {
    pub fn resolve(args: Args, conf: Conf) -> Result<Self> {
        let count = args.count.or(conf.parse.count).unwrap_or(u64::MAX);

        let log_level = match args.log_level.or(conf.log.level) {
            Some(level) => level
                .parse::<Level>()
                .with_context(|| format!("invalid log level {:?}", level))?,
            None => DEFAULT_LOG_LEVEL,
        };

        let mut inputs: Vec<Input> = args
            .inputs
            .into_iter()
            .map(|s| match s.as_str() {
                "-" => Input::Stdin,
                _ => Input::File(PathBuf::from(s)),
            })
            .collect();
        if inputs.is_empty() {
            inputs.push(Input::Stdin);
        }

        Ok(Self {
            count,
            pretty: args.pretty || conf.report.pretty,
            log_level,
            inputs,
        })
    }
}

pub fn parse_conf(text: &str) -> Result<Conf> {
    let conf = toml::from_str::<Conf>(text)?;
    Ok(conf)
}

pub async fn load(args: Args) -> Result<Settings> {
    use tokio::fs;

    let conf = match &args.conf {
        Some(path) => {
            let text = fs::read_to_string(path)
                .await
                .with_context(|| format!("read conf from {}", path.display()))?;
            parse_conf(&text).with_context(|| format!("parse conf {}", path.display()))?
        }
        None => Conf::default(),
    };

    Settings::resolve(args, conf)
}
