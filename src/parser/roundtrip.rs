use super::grammar::{ErrorLine, ReplyLine};
use super::icmp_error::classify_icmp_error;
use crate::structures::{Latency, RoundTrip};

/// Drop a `%<scope-id>` suffix, as ping6 prints on link-local addresses.
pub(super) fn strip_scope(addr: &str) -> &str {
    match addr.find('%') {
        Some(i) => &addr[..i],
        None => addr,
    }
}

pub(super) fn from_reply(line: &ReplyLine<'_>, count: u64) -> Option<RoundTrip> {
    if line.seq > count {
        return None;
    }
    Some(RoundTrip::reply(
        line.seq,
        strip_scope(line.addr).to_string(),
        line.length,
        line.ttl,
        Latency::from_millis_f64(line.time_ms),
    ))
}

pub(super) fn from_error(line: &ErrorLine<'_>, count: u64) -> Option<RoundTrip> {
    if line.seq > count {
        return None;
    }
    Some(RoundTrip::failure(
        line.seq,
        strip_scope(line.addr).to_string(),
        classify_icmp_error(line.reason),
    ))
}
