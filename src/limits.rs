use crate::model::Minute;

/// Minutes in a day; interval ends are bounded by this (exclusive start, inclusive end).
pub const MINUTES_PER_DAY: Minute = 1440;

/// Longest accepted booking title.
pub const MAX_TITLE_LEN: usize = 256;

/// How far ahead of today a booking date may lie.
pub const MAX_DAYS_AHEAD: i64 = 365;

/// Save attempts against the durable store before a reservation is rolled back.
pub const PERSIST_ATTEMPTS: usize = 3;
