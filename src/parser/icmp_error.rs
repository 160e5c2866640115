use crate::structures::IcmpError;

// Phrases ping prints verbatim after `icmp_seq=N`.
const EXACT: &[(&str, IcmpError)] = &[
    ("Destination Net Unreachable", IcmpError::NetUnreachable),
    ("Destination Host Unreachable", IcmpError::HostUnreachable),
    ("Destination Protocol Unreachable", IcmpError::ProtocolUnreachable),
    ("Destination Port Unreachable", IcmpError::PortUnreachable),
    ("Source Route Failed", IcmpError::SourceRouteFailed),
    ("Packet filtered", IcmpError::CommunicationAdministrativelyProhibited),
];

// Phrases followed by variable detail, e.g. `Frag needed and DF set (mtu = 1400)`.
const PREFIXES: &[(&str, IcmpError)] = &[(
    "Frag needed and DF set",
    IcmpError::FragmentationNeededAndDfSet,
)];

/// Map the reason ping gave for a failed probe to its canonical code.
///
/// Exact phrases are checked first, then prefix rules in order. Returns
/// `None` for anything else.
pub fn classify_icmp_error(reason: &str) -> Option<IcmpError> {
    EXACT
        .iter()
        .find(|(phrase, _)| *phrase == reason)
        .or_else(|| {
            PREFIXES
                .iter()
                .find(|(prefix, _)| reason.starts_with(prefix))
        })
        .map(|(_, code)| *code)
}
