//! Timestamps at the precision records are stored with.

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to whole microseconds.
///
/// Records persist timestamps as integer microseconds, so a value taken from
/// here compares equal to itself after a store round trip.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_a_microsecond_round_trip() {
        let now = now();
        let back = DateTime::from_timestamp_micros(now.timestamp_micros());
        assert_eq!(back, Some(now));
    }
}
