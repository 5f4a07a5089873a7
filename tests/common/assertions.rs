//! Domain-specific assertion macros for nginx-digest harnesses.
//!
//! These add context to failures so it is clear which record or bucket broke
//! the expectation.

// ---------------------------------------------------------------------------
// Record assertions
// ---------------------------------------------------------------------------

/// Assert that a record's request tokens equal the given list.
///
/// ```rust
/// assert_tokens!(record, ["GET", "/", "HTTP/1.1"]);
/// ```
#[macro_export]
macro_rules! assert_tokens {
    ($record:expr, [$($token:expr),* $(,)?]) => {{
        let record: &digest_core::Record = &$record;
        let expected: Vec<&str> = vec![$($token),*];
        let actual: Vec<&str> = record.tokens().iter().map(String::as_str).collect();
        if actual != expected {
            panic!(
                "assert_tokens! failed for {} at {}:\n  expected: {:?}\n  actual:   {:?}",
                record.source_ip,
                record.timestamp_key(),
                expected,
                actual
            );
        }
    }};
}

/// Assert that every record in a slice is in non-decreasing time order.
#[macro_export]
macro_rules! assert_chronological {
    ($records:expr) => {{
        let records = &$records;
        for (i, pair) in records.windows(2).enumerate() {
            if pair[0].timestamp > pair[1].timestamp {
                panic!(
                    "assert_chronological! failed at index {}: {} is after {}",
                    i,
                    pair[0].timestamp_key(),
                    pair[1].timestamp_key()
                );
            }
        }
    }};
}

// ---------------------------------------------------------------------------
// Bucket assertions
// ---------------------------------------------------------------------------

/// Assert that bucket counts equal the given list, in bucket order.
///
/// ```rust
/// assert_bucket_counts!(buckets, [2, 0, 1]);
/// ```
#[macro_export]
macro_rules! assert_bucket_counts {
    ($buckets:expr, [$($count:expr),* $(,)?]) => {{
        let actual: Vec<usize> = $buckets.iter().map(|b| b.len()).collect();
        let expected: Vec<usize> = vec![$($count),*];
        if actual != expected {
            panic!(
                "assert_bucket_counts! failed:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            );
        }
    }};
}
