pub mod conf;
pub mod digester;
pub mod iso8601;
pub mod parser;
pub mod reporter;
pub mod structures;

pub use parser::{parse, Aggregator, State};
pub use structures::{IcmpError, Latency, Outcome, PingSummary, RoundTrip};
