//! Rotation file names.
//!
//! `<prefix>-<year>-<MM>-<DD>.<hh>.<mm>.<ss>-<micros>.log`, e.g.
//! `svc-2026-01-21.14.30.45-000123.log`. Microseconds are zero padded so
//! names sort in creation order.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::format::micros_of_second;

/// Extension of every rotation file.
pub const LOG_EXTENSION: &str = "log";

/// Build the file name for a file created at `at`.
pub fn file_name(prefix: &str, at: &NaiveDateTime) -> String {
    format!(
        "{}-{}-{:02}-{:02}.{:02}.{:02}.{:02}-{:06}.{}",
        prefix,
        at.year(),
        at.month(),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
        micros_of_second(at),
        LOG_EXTENSION
    )
}

/// Recover the creation timestamp from a file name built by [`file_name`].
///
/// Returns `None` when the name has a different prefix or is malformed.
pub fn parse_file_name(prefix: &str, name: &str) -> Option<NaiveDateTime> {
    let rest = name
        .strip_prefix(prefix)?
        .strip_prefix('-')?
        .strip_suffix(LOG_EXTENSION)?
        .strip_suffix('.')?;
    let (stamp, micros) = rest.rsplit_once('-')?;

    if micros.is_empty() || !micros.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let micros: u32 = micros.parse().ok()?;
    if micros >= 1_000_000 {
        return None;
    }

    NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d.%H.%M.%S")
        .ok()?
        .with_nanosecond(micros * 1_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 21)
            .unwrap()
            .and_hms_micro_opt(14, 3, 5, micro)
            .unwrap()
    }

    #[test]
    fn test_file_name_format() {
        assert_eq!(file_name("svc", &at(42)), "svc-2026-01-21.14.03.05-000042.log");
    }

    #[test]
    fn test_parse_roundtrip() {
        let t = at(987_654);
        let name = file_name("worker", &t);
        assert_eq!(parse_file_name("worker", &name), Some(t));
    }

    #[test]
    fn test_prefix_with_dashes() {
        let t = at(1);
        let name = file_name("my-svc", &t);
        assert_eq!(parse_file_name("my-svc", &name), Some(t));
        assert_eq!(parse_file_name("my", &name), None);
    }

    #[test]
    fn test_parse_accepts_unpadded_micros() {
        assert_eq!(
            parse_file_name("svc", "svc-2026-01-21.14.03.05-42.log"),
            Some(at(42))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_file_name("svc", "svc-2026-01-21.14.03.05-42.txt"), None);
        assert_eq!(parse_file_name("svc", "svc-2026-13-21.14.03.05-42.log"), None);
        assert_eq!(parse_file_name("svc", "svc-2026-01-21.14.03.05-+42.log"), None);
        assert_eq!(parse_file_name("svc", "svc-2026-01-21.14.03.05-1000000.log"), None);
        assert_eq!(parse_file_name("svc", "other-2026-01-21.14.03.05-42.log"), None);
    }

    #[test]
    fn test_names_sort_by_time_within_a_second() {
        let early = file_name("svc", &at(5));
        let late = file_name("svc", &at(123_456));
        assert!(early < late);
    }
}
