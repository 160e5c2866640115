use regex::{Captures, Regex};
use std::str::FromStr;
use std::sync::OnceLock;

// 64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=12.3 ms
const REPLY: &str = r"^([0-9]+) bytes\s+from (.*):\s+icmp_[rs]eq=([0-9]+)\s+ttl=([0-9]+)\s+time=([0-9.]+) ms$";

// From 5.6.7.8 icmp_seq=7 Destination Net Unreachable
const ERROR: &str = r"^From\s+([^\s]+)\s+icmp_seq=([0-9]+)\s+(.*)$";

// 5 packets transmitted, 5 received, 0% packet loss, time 4131ms
const LOSS: &str = r"^([0-9]+) packets transmitted, ([0-9]+) received, ([0-9.]+)% packet loss";

// rtt min/avg/max/mdev = 19.631/24.191/29.874/4.262 ms
const TIMING: &str =
    r"^rtt min/avg/max/mdev\s*=\s*([0-9.]+)/([0-9.]+)/([0-9.]+)/([0-9.]+)\s+ms$";

struct Grammar {
    reply: Regex,
    error: Regex,
    loss: Regex,
    timing: Regex,
}

fn grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();

    GRAMMAR.get_or_init(|| Grammar {
        reply: compile(REPLY),
        error: compile(ERROR),
        loss: compile(LOSS),
        timing: compile(TIMING),
    })
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("failed to compile ping line grammar")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ReplyLine<'a> {
    pub length: u32,
    pub addr: &'a str,
    pub seq: u64,
    pub ttl: u32,
    pub time_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ErrorLine<'a> {
    pub addr: &'a str,
    pub seq: u64,
    pub reason: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct LossLine {
    pub sent: u64,
    pub received: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct TimingLine {
    pub min_ms: f64,
    pub avg_ms: f64,
    pub max_ms: f64,
    pub mdev_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Line<'a> {
    Reply(ReplyLine<'a>),
    Error(ErrorLine<'a>),
    Loss(LossLine),
    Timing(TimingLine),
    Ignored,
}

fn num<T: FromStr>(caps: &Captures<'_>, i: usize) -> Option<T> {
    caps.get(i)?.as_str().parse().ok()
}

fn text<'a>(caps: &Captures<'a>, i: usize) -> Option<&'a str> {
    caps.get(i).map(|m| m.as_str())
}

/// Decide which shape a trimmed line has. Shapes are tried in a fixed order
/// and the first grammar that matches decides; a match whose numbers do not
/// parse is ignored rather than retried against the next grammar.
pub(super) fn classify(line: &str) -> Line<'_> {
    let g = grammar();

    if let Some(caps) = g.reply.captures(line) {
        return reply(&caps).map_or(Line::Ignored, Line::Reply);
    }
    if let Some(caps) = g.error.captures(line) {
        return error(&caps).map_or(Line::Ignored, Line::Error);
    }
    if let Some(caps) = g.loss.captures(line) {
        return loss(&caps).map_or(Line::Ignored, Line::Loss);
    }
    if let Some(caps) = g.timing.captures(line) {
        return timing(&caps).map_or(Line::Ignored, Line::Timing);
    }
    Line::Ignored
}

fn reply<'a>(caps: &Captures<'a>) -> Option<ReplyLine<'a>> {
    Some(ReplyLine {
        length: num(caps, 1)?,
        addr: text(caps, 2)?,
        seq: num(caps, 3)?,
        ttl: num(caps, 4)?,
        time_ms: num(caps, 5)?,
    })
}

fn error<'a>(caps: &Captures<'a>) -> Option<ErrorLine<'a>> {
    Some(ErrorLine {
        addr: text(caps, 1)?,
        seq: num(caps, 2)?,
        reason: text(caps, 3)?,
    })
}

fn loss(caps: &Captures<'_>) -> Option<LossLine> {
    Some(LossLine {
        sent: num(caps, 1)?,
        received: num(caps, 2)?,
        percent: num(caps, 3)?,
    })
}

fn timing(caps: &Captures<'_>) -> Option<TimingLine> {
    Some(TimingLine {
        min_ms: num(caps, 1)?,
        avg_ms: num(caps, 2)?,
        max_ms: num(caps, 3)?,
        mdev_ms: num(caps, 4)?,
    })
}
