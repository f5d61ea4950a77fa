/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Whole seconds elapsed between two millisecond timestamps, never negative
pub fn elapsed_seconds(since_millis: i64, now_millis: i64) -> i64 {
    (now_millis - since_millis).max(0) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_seconds() {
        assert_eq!(elapsed_seconds(1_000, 61_999), 60);
        assert_eq!(elapsed_seconds(5_000, 5_000), 0);
        // Clock skew (now before since) never yields negative time
        assert_eq!(elapsed_seconds(10_000, 2_000), 0);
    }
}
