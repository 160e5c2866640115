use crate::iso8601::duration_as_iso8601;
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

const MICROS_PER_MILLI: f64 = 1000.0;

/// Elapsed time as reported by ping, kept at microsecond resolution.
///
/// Serializes as an ISO-8601 duration string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Latency(Duration);

impl Latency {
    /// Build from a millisecond reading such as `12.3` in `time=12.3 ms`.
    pub fn from_millis_f64(ms: f64) -> Self {
        let micros = (ms * MICROS_PER_MILLI).round();
        Self(Duration::from_micros(micros as u64))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl From<Duration> for Latency {
    fn from(d: Duration) -> Self {
        Self(Duration::from_micros(d.as_micros() as u64))
    }
}

impl From<Latency> for Duration {
    fn from(v: Latency) -> Self {
        v.0
    }
}

impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&duration_as_iso8601(self.0))
    }
}

impl Serialize for Latency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&duration_as_iso8601(self.0))
    }
}

/// Canonical code for an ICMP error reported in place of an echo reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IcmpError {
    NetUnreachable,
    HostUnreachable,
    ProtocolUnreachable,
    PortUnreachable,
    SourceRouteFailed,
    CommunicationAdministrativelyProhibited,
    FragmentationNeededAndDfSet,
}

impl IcmpError {
    pub fn as_str(&self) -> &'static str {
        match self {
            IcmpError::NetUnreachable => "net-unreachable",
            IcmpError::HostUnreachable => "host-unreachable",
            IcmpError::ProtocolUnreachable => "protocol-unreachable",
            IcmpError::PortUnreachable => "port-unreachable",
            IcmpError::SourceRouteFailed => "source-route-failed",
            IcmpError::CommunicationAdministrativelyProhibited => {
                "communication-administratively-prohibited"
            }
            IcmpError::FragmentationNeededAndDfSet => "fragmentation-needed-and-df-set",
        }
    }
}

impl fmt::Display for IcmpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What came back for one sequence number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Reply { length: u32, ttl: u32, rtt: Latency },
    /// `error` is `None` when ping printed a phrase we have no code for.
    Failure { error: Option<IcmpError> },
}

/// One reply or error line, in the order ping printed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTrip {
    pub seq: u64,
    pub ip: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl RoundTrip {
    pub fn reply(seq: u64, ip: String, length: u32, ttl: u32, rtt: Latency) -> Self {
        Self {
            seq,
            ip,
            outcome: Outcome::Reply { length, ttl, rtt },
        }
    }

    pub fn failure(seq: u64, ip: String, error: Option<IcmpError>) -> Self {
        Self {
            seq,
            ip,
            outcome: Outcome::Failure { error },
        }
    }

    pub fn is_reply(&self) -> bool {
        matches!(self.outcome, Outcome::Reply { .. })
    }

    pub fn rtt(&self) -> Option<Latency> {
        match self.outcome {
            Outcome::Reply { rtt, .. } => Some(rtt),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<IcmpError> {
        match self.outcome {
            Outcome::Reply { .. } => None,
            Outcome::Failure { error } => error,
        }
    }
}

/// Everything recovered from one ping invocation's output.
///
/// Optional fields stay `None` unless the line carrying them was seen;
/// `None` means "not reported", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PingSummary {
    pub roundtrips: Vec<RoundTrip>,
    pub ips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<u64>,
    /// Fraction in `[0, 1]`, not a percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Latency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<Latency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Latency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stddev: Option<Latency>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn latency_from_millis() {
        let rtt = Latency::from_millis_f64(12.3);
        assert_eq!(Duration::from_micros(12_300), rtt.as_duration());
        assert_eq!("PT0.012300S", rtt.to_string());
    }

    #[test]
    fn latency_from_duration_truncates_nanos() {
        let rtt = Latency::from(Duration::from_nanos(1_500));
        assert_eq!(Duration::from_micros(1), Duration::from(rtt));
    }

    #[test]
    fn icmp_error_serializes_kebab_case() {
        for e in [
            IcmpError::NetUnreachable,
            IcmpError::CommunicationAdministrativelyProhibited,
            IcmpError::FragmentationNeededAndDfSet,
        ] {
            assert_eq!(json!(e.as_str()), serde_json::to_value(e).unwrap());
        }
    }

    #[test]
    fn reply_shape() {
        let r = RoundTrip::reply(1, "10.0.0.1".into(), 64, 57, Latency::from_millis_f64(12.3));
        assert_eq!(
            json!({"seq": 1, "ip": "10.0.0.1", "length": 64, "ttl": 57, "rtt": "PT0.012300S"}),
            serde_json::to_value(&r).unwrap()
        );
        assert!(r.is_reply());
        assert_eq!(None, r.error());
    }

    #[test]
    fn unknown_failure_keeps_null_error() {
        let r = RoundTrip::failure(2, "192.168.1.1".into(), None);
        assert_eq!(
            json!({"seq": 2, "ip": "192.168.1.1", "error": null}),
            serde_json::to_value(&r).unwrap()
        );
        assert_eq!(None, r.rtt());
    }

    #[test]
    fn empty_summary_omits_unobserved_fields() {
        let v = serde_json::to_value(PingSummary::default()).unwrap();
        assert_eq!(json!({"roundtrips": [], "ips": []}), v);
    }

    #[test]
    fn zero_loss_is_reported() {
        let summary = PingSummary {
            sent: Some(5),
            received: Some(5),
            loss: Some(0.0),
            ..Default::default()
        };
        let v = serde_json::to_value(summary).unwrap();
        assert_eq!(json!(0.0), v["loss"]);
        assert!(v.get("min").is_none());
    }
}
