use std::fmt::Write;
use std::time::Duration;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Render an elapsed time as an ISO-8601 duration, e.g. `PT0.012300S`.
///
/// Resolution is one microsecond; anything finer is truncated. A zero
/// duration renders as `P0D`.
pub fn duration_as_iso8601(d: Duration) -> String {
    let total = d.as_secs();
    let micros = d.subsec_micros();

    let days = total / SECS_PER_DAY;
    let hours = total % SECS_PER_DAY / SECS_PER_HOUR;
    let minutes = total % SECS_PER_HOUR / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    let mut out = String::from("P");
    if days > 0 {
        let _ = write!(out, "{}D", days);
    }
    if hours > 0 || minutes > 0 || seconds > 0 || micros > 0 {
        out.push('T');
        if hours > 0 {
            let _ = write!(out, "{}H", hours);
        }
        if minutes > 0 {
            let _ = write!(out, "{}M", minutes);
        }
        if micros > 0 {
            let _ = write!(out, "{}.{:06}S", seconds, micros);
        } else if seconds > 0 {
            let _ = write!(out, "{}S", seconds);
        }
    }
    if out.len() == 1 {
        out.push_str("0D");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero() {
        assert_eq!("P0D", duration_as_iso8601(Duration::ZERO));
    }

    #[test]
    fn sub_second() {
        assert_eq!("PT0.012300S", duration_as_iso8601(Duration::from_micros(12_300)));
    }

    #[test]
    fn whole_seconds() {
        assert_eq!("PT5S", duration_as_iso8601(Duration::from_secs(5)));
    }

    #[test]
    fn all_components() {
        let d = Duration::from_secs(SECS_PER_DAY + 2 * SECS_PER_HOUR + 3 * SECS_PER_MINUTE + 4)
            + Duration::from_micros(500);
        assert_eq!("P1DT2H3M4.000500S", duration_as_iso8601(d));
    }

    #[test]
    fn minutes_only() {
        assert_eq!("PT2M", duration_as_iso8601(Duration::from_secs(120)));
    }

    #[test]
    fn whole_days() {
        assert_eq!("P2D", duration_as_iso8601(Duration::from_secs(2 * SECS_PER_DAY)));
    }

    #[test]
    fn nanoseconds_truncated() {
        assert_eq!("P0D", duration_as_iso8601(Duration::from_nanos(999)));
    }
}
