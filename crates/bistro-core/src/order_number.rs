//! # Order Numbers
//!
//! `ORD` + `YYYYMMDDHHMMSS` + `-` + a 4-digit sequence.
//!
//! The timestamp alone repeats within a second; the sequence counter makes
//! numbers issued by one process distinct, and the `orders.order_number`
//! UNIQUE constraint catches anything left.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};

const SEQUENCE_MODULUS: u32 = 10_000;

/// Issues order numbers. Share one instance per process.
#[derive(Debug, Default)]
pub struct OrderNumberGenerator {
    sequence: AtomicU32,
}

impl OrderNumberGenerator {
    pub const fn new() -> Self {
        OrderNumberGenerator {
            sequence: AtomicU32::new(0),
        }
    }

    /// Returns the next order number for the given time.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::order_number::OrderNumberGenerator;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let generator = OrderNumberGenerator::new();
    /// let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 30, 5).unwrap();
    /// assert_eq!(generator.next(now), "ORD20250314123005-0001");
    /// assert_eq!(generator.next(now), "ORD20250314123005-0002");
    /// ```
    pub fn next(&self, now: DateTime<Utc>) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) % SEQUENCE_MODULUS + 1;
        format!("ORD{}-{:04}", now.format("%Y%m%d%H%M%S"), seq % SEQUENCE_MODULUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_format() {
        let generator = OrderNumberGenerator::new();
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(generator.next(now), "ORD20240102030405-0001");
    }

    #[test]
    fn test_same_second_numbers_are_distinct() {
        let generator = OrderNumberGenerator::new();
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let numbers: HashSet<String> = (0..500).map(|_| generator.next(now)).collect();
        assert_eq!(numbers.len(), 500);
    }

    #[test]
    fn test_sequence_wraps() {
        let generator = OrderNumberGenerator {
            sequence: AtomicU32::new(9_998),
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(generator.next(now), "ORD20240102030405-9999");
        assert_eq!(generator.next(now), "ORD20240102030405-0000");
        assert_eq!(generator.next(now), "ORD20240102030405-0001");
    }
}
