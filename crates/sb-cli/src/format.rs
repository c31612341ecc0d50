//! Display helpers shared by the commands.

use std::collections::BTreeSet;

use sb_core::SECONDS_PER_DAY;

/// Shortens an address to its first 6 and last 4 characters.
///
/// Addresses of 10 characters or fewer are returned unchanged.
pub fn format_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Formats a duration in seconds as days rounded to one decimal place.
///
/// Whole numbers print without a decimal (`3 days`, `1.5 days`).
#[allow(clippy::cast_precision_loss)]
pub fn format_days(seconds: i64) -> String {
    let days = (seconds as f64 / SECONDS_PER_DAY as f64 * 10.0).round() / 10.0;
    format!("{days} days")
}

/// Joins categories with `", "`.
pub fn join_categories(categories: &BTreeSet<String>) -> String {
    categories
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_truncated() {
        assert_eq!(
            format_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
    }

    #[test]
    fn short_address_is_unchanged() {
        assert_eq!(format_address("0xabc"), "0xabc");
        assert_eq!(format_address(""), "");
    }

    #[test]
    fn days_round_to_one_decimal() {
        assert_eq!(format_days(259_200), "3 days");
        assert_eq!(format_days(129_600), "1.5 days");
        assert_eq!(format_days(0), "0 days");
        assert_eq!(format_days(86_399), "1 days");
        assert_eq!(format_days(100_000), "1.2 days");
    }

    #[test]
    fn categories_are_comma_joined_in_order() {
        let categories: BTreeSet<String> = ["Warrior", "Mage"].map(String::from).into();
        assert_eq!(join_categories(&categories), "Mage, Warrior");
        assert_eq!(join_categories(&BTreeSet::new()), "");
    }
}
