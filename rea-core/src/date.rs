use chrono::Utc;

/// Today's date as `d MMMM yyyy`, e.g. `1 March 2019`.
pub fn today_readable() -> String {
    Utc::now().date_naive().format("%-d %B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_today_readable_is_day_month_year() {
        let today = today_readable();
        let parsed = NaiveDate::parse_from_str(&today, "%d %B %Y").unwrap();
        assert_eq!(parsed, Utc::now().date_naive());
        assert!(!today.starts_with('0'));
    }
}
