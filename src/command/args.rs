//! Argument parsing shared by the command families

use crate::core::types::UnitId;

/// A unit id typed on the console
pub fn parse_unit_id(token: &str) -> Option<UnitId> {
    token.parse::<u64>().ok().map(UnitId)
}

/// A time scale; only syntax is checked here, range is up to `TimeControl`
pub fn parse_scale(token: &str) -> Option<f32> {
    token.trim().parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit_id() {
        assert_eq!(parse_unit_id("12"), Some(UnitId(12)));
        assert_eq!(parse_unit_id("-1"), None);
        assert_eq!(parse_unit_id("abc"), None);
        assert_eq!(parse_unit_id("1.5"), None);
    }

    #[test]
    fn test_parse_scale() {
        assert_eq!(parse_scale("2.5"), Some(2.5));
        assert_eq!(parse_scale("0"), Some(0.0));
        assert!(parse_scale("nan").unwrap().is_nan());
        assert_eq!(parse_scale("rápido"), None);
    }
}
