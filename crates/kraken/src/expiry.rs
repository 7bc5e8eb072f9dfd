//! Good-till-date expiration math.

/// Margin subtracted from the validity window so the order expires strictly
/// before the boundary even if the exchange's clock crosses it
/// mid-processing.
pub const SAFETY_MARGIN_SECS: i64 = 60;

/// Absolute unix expiry for an order valid `validity_minutes` from the
/// exchange's own clock. Server time is the trusted source here; local
/// clock skew would otherwise expire orders early or late.
pub fn compute_expiry(server_time_unix: f64, validity_minutes: u32) -> i64 {
    server_time_unix.floor() as i64 + i64::from(validity_minutes) * 60 - SAFETY_MARGIN_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_lands_before_the_window_boundary() {
        let expiry = compute_expiry(1000.0, 5);
        assert!(expiry < 1000 + 5 * 60);
        assert_eq!(expiry, 1000 + 300 - SAFETY_MARGIN_SECS);
    }

    #[test]
    fn fractional_server_time_is_floored() {
        assert_eq!(compute_expiry(1000.9, 5), compute_expiry(1000.0, 5));
    }

    #[test]
    fn one_minute_validity_expires_immediately_after_issue() {
        // 60s window minus the 60s margin leaves the server timestamp itself.
        assert_eq!(compute_expiry(1000.0, 1), 1000);
    }
}
