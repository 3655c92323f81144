//! Property-based tests for gating, prefix rendering and file names
//!
//! Uses proptest to verify the invariants of line construction and rotation
//! file naming.

use std::panic::Location;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use proptest::prelude::*;
use rotolog_core::format::{format_line, Body};
use rotolog_core::{file_name, parse_file_name, Logger, MemorySink, PrefixFlags, Severity};

// ============================================================================
// Strategy Generators
// ============================================================================

fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

fn flags_strategy() -> impl Strategy<Value = PrefixFlags> {
    (0u8..32).prop_map(PrefixFlags::from_bits_truncate)
}

/// Local wall-clock timestamps with microsecond precision
fn timestamp_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (
        1970i32..=9999,
        1u32..=12,
        1u32..=28,
        0u32..24,
        0u32..60,
        0u32..60,
        0u32..1_000_000,
    )
        .prop_map(|(y, mo, d, h, mi, s, us)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_micro_opt(h, mi, s, us)
                .unwrap()
        })
}

fn prefix_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_-]{0,15}").expect("valid regex")
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// A call is written iff its severity passes the threshold; fatal always
    #[test]
    fn level_gating(threshold in severity_strategy(), severity in severity_strategy()) {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::with_sink(threshold, PrefixFlags::NONE, sink.clone());

        logger.log(severity, None, Body::Values(&[&"msg"]));

        let expected = severity >= threshold || severity == Severity::Fatal;
        prop_assert_eq!(sink.write_count() == 1, expected);
        prop_assert_eq!(sink.is_empty(), !expected);
    }

    /// The prefix holds exactly the flagged fields, in fixed order
    #[test]
    fn prefix_fields_follow_flags(flags in flags_strategy(), now in timestamp_strategy()) {
        let location = Location::caller();
        let mut line = String::new();
        format_line(&mut line, &now, flags, Severity::Info, Some(location), Body::Values(&[&"m"]));

        let mut expected = String::new();
        if flags.contains(PrefixFlags::DATE) {
            expected.push_str(&now.format("%Y-%m-%d ").to_string());
        }
        if flags.contains(PrefixFlags::TIME) {
            expected.push_str(&now.format("%H:%M:%S ").to_string());
        }
        if flags.contains(PrefixFlags::MICROSECONDS) {
            expected.push_str(&format!("{} ", now.nanosecond() / 1_000));
        }
        if flags.contains(PrefixFlags::LONG_FILE) {
            expected.push_str(&format!("{}:{} ", location.file(), location.line()));
        }
        if flags.contains(PrefixFlags::SHORT_FILE) {
            expected.push_str(&format!("property_tests.rs:{} ", location.line()));
        }
        expected.push_str("[info] [m]\n");

        prop_assert_eq!(line, expected);
    }

    /// Rotation file names parse back to the exact creation timestamp
    #[test]
    fn file_name_roundtrip(prefix in prefix_strategy(), at in timestamp_strategy()) {
        let name = file_name(&prefix, &at);
        let expected_prefix = format!("{}-", prefix);
        prop_assert!(name.starts_with(&expected_prefix));
        prop_assert!(name.ends_with(".log"));
        prop_assert_eq!(parse_file_name(&prefix, &name), Some(at));
    }

    /// Later timestamps always produce names that sort later
    #[test]
    fn file_names_sort_by_time(a in timestamp_strategy(), b in timestamp_strategy()) {
        prop_assume!(a != b);
        let (early, late) = if a < b { (a, b) } else { (b, a) };
        prop_assert!(file_name("svc", &early) < file_name("svc", &late));
    }

    /// Flags survive a trip through their textual form
    #[test]
    fn flags_text_roundtrip(flags in flags_strategy()) {
        let parsed: PrefixFlags = flags.to_string().parse().unwrap();
        prop_assert_eq!(parsed, flags);
    }
}
