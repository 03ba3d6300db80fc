//! Display formatting for money, distances, and dates (en-IN conventions).

use chrono::NaiveDate;

/// Groups digits the Indian way: the last three, then pairs (`12,34,567`).
pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

/// Formats an amount with at most two fraction digits, dropping trailing zeros.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    if !amount.is_finite() {
        return format!("{symbol}0");
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    let whole = group_digits(cents / 100);
    let frac = match cents % 100 {
        0 => String::new(),
        f if f % 10 == 0 => format!(".{}", f / 10),
        f => format!(".{f:02}"),
    };
    format!("{sign}{symbol}{whole}{frac}")
}

pub fn format_km(odometer: u32) -> String {
    format!("{} km", group_digits(u64::from(odometer)))
}

/// `dd/mm/yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "N/A".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_like_en_in() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1_000), "1,000");
        assert_eq!(group_digits(123_456), "1,23,456");
        assert_eq!(group_digits(12_345_678), "1,23,45,678");
    }

    #[test]
    fn currency_trims_fraction() {
        assert_eq!(format_currency(800.0, "₹"), "₹800");
        assert_eq!(format_currency(1234.5, "₹"), "₹1,234.5");
        assert_eq!(format_currency(1234.567, "$"), "$1,234.57");
        assert_eq!(format_currency(-42.05, "₹"), "-₹42.05");
        assert_eq!(format_currency(f64::NAN, "₹"), "₹0");
    }

    #[test]
    fn dates_are_day_first() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 7).unwrap();
        assert_eq!(format_date(date), "07/02/2024");
        assert_eq!(format_optional_date(None), "N/A");
        assert_eq!(format_km(15_200), "15,200 km");
    }
}
