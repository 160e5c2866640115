//! Turns the console output of Linux `ping` into a [`PingSummary`].
//!
//! The parser is line oriented and never fails: lines it does not recognize
//! are skipped. Grammars are compiled once per process and shared read-only,
//! so any number of threads may parse at the same time.

mod grammar;
mod icmp_error;
mod roundtrip;

pub use icmp_error::classify_icmp_error;

use crate::structures::{Latency, PingSummary, RoundTrip};
use grammar::{Line, LossLine, TimingLine};
use tracing::trace;

const PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Scanning,
    /// The final timing line was seen; further input is ignored.
    Done,
}

/// Incremental form of [`parse`], for callers that get ping output a line
/// at a time.
#[derive(Debug)]
pub struct Aggregator {
    count: u64,
    state: State,
    roundtrips: Vec<RoundTrip>,
    ips: Vec<String>,
    loss: Option<LossLine>,
    timing: Option<TimingLine>,
}

impl Aggregator {
    /// `count` is the number of packets ping was asked to send; replies with
    /// a higher sequence number are dropped.
    pub fn new(count: u64) -> Self {
        Self {
            count,
            state: State::Scanning,
            roundtrips: Vec::new(),
            ips: Vec::new(),
            loss: None,
            timing: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn feed(&mut self, line: &str) -> State {
        if self.state == State::Done {
            return State::Done;
        }

        match grammar::classify(line.trim()) {
            Line::Reply(reply) => self.push(roundtrip::from_reply(&reply, self.count)),
            Line::Error(error) => self.push(roundtrip::from_error(&error, self.count)),
            Line::Loss(loss) => self.loss = Some(loss),
            Line::Timing(timing) => {
                trace!("timing line seen after {} round trips", self.roundtrips.len());
                self.timing = Some(timing);
                self.state = State::Done;
            }
            Line::Ignored => (),
        }
        self.state
    }

    fn push(&mut self, rt: Option<RoundTrip>) {
        if let Some(rt) = rt {
            self.ips.push(rt.ip.clone());
            self.roundtrips.push(rt);
        }
    }

    pub fn finish(self) -> PingSummary {
        let mut summary = PingSummary {
            roundtrips: self.roundtrips,
            ips: self.ips,
            ..Default::default()
        };

        if let Some(loss) = self.loss {
            summary.sent = Some(loss.sent);
            summary.received = Some(loss.received);
            summary.loss = Some(loss.percent / PERCENT);
        }

        if let Some(timing) = self.timing {
            summary.min = Some(Latency::from_millis_f64(timing.min_ms));
            summary.mean = Some(Latency::from_millis_f64(timing.avg_ms));
            summary.max = Some(Latency::from_millis_f64(timing.max_ms));
            summary.stddev = Some(Latency::from_millis_f64(timing.mdev_ms));
        }

        summary
    }
}

/// Parse the complete output of one ping invocation.
///
/// `count` is the number of packets ping was asked to send.
pub fn parse(output: &str, count: u64) -> PingSummary {
    let mut aggregator = Aggregator::new(count);
    for line in output.split('\n') {
        if aggregator.feed(line) == State::Done {
            break;
        }
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::IcmpError;
    use std::time::Duration;

    const FULL: &str = "\
PING 10.0.0.1 (10.0.0.1) 56(84) bytes of data.
64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=19.6 ms
64 bytes from 10.0.0.1: icmp_seq=2 ttl=64 time=29.8 ms
From 10.0.0.254 icmp_seq=3 Destination Net Unreachable

--- 10.0.0.1 ping statistics ---
3 packets transmitted, 2 received, +1 errors, 33.3333% packet loss, time 2003ms
3 packets transmitted, 2 received, 33.3333% packet loss, time 2003ms
rtt min/avg/max/mdev = 19.631/24.191/29.874/4.262 ms
";

    #[test]
    fn full_output() {
        let summary = parse(FULL, 3);

        assert_eq!(3, summary.roundtrips.len());
        assert_eq!(vec!["10.0.0.1", "10.0.0.1", "10.0.0.254"], summary.ips);
        assert_eq!(Some(IcmpError::NetUnreachable), summary.roundtrips[2].error());
        assert_eq!(Some(3), summary.sent);
        assert_eq!(Some(2), summary.received);
        assert!((summary.loss.unwrap() - 0.333333).abs() < 1e-9);
        assert_eq!(
            Some(Duration::from_micros(24_191)),
            summary.mean.map(Duration::from)
        );
    }

    #[test]
    fn aggregator_stops_on_timing() {
        let mut aggregator = Aggregator::new(5);
        assert_eq!(State::Scanning, aggregator.feed("PING x"));
        assert_eq!(
            State::Done,
            aggregator.feed("rtt min/avg/max/mdev = 1.0/2.0/3.0/0.5 ms")
        );
        assert_eq!(
            State::Done,
            aggregator.feed("64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=1.0 ms")
        );
        assert_eq!(State::Done, aggregator.state());
        assert!(aggregator.finish().roundtrips.is_empty());
    }

    #[test]
    fn last_loss_line_wins() {
        let summary = parse(
            "5 packets transmitted, 5 received, 0% packet loss\n\
             5 packets transmitted, 4 received, 20% packet loss",
            5,
        );
        assert_eq!(Some(4), summary.received);
        assert_eq!(Some(0.2), summary.loss);
    }

    #[test]
    fn surrounding_whitespace_is_insignificant() {
        let summary = parse(
            "   64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=1.0 ms\r\n\t",
            1,
        );
        assert_eq!(1, summary.roundtrips.len());
    }

    #[test]
    fn empty_input() {
        assert_eq!(PingSummary::default(), parse("", 10));
    }
}
