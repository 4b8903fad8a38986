//! Turns daily totals from the database into the ten day series shown on the dashboard.

use std::collections::HashMap;

use time::{Date, Duration, Month};

/// The number of days, ending today, shown on the dashboard.
pub(super) const ROLLING_WINDOW_DAYS: i64 = 10;

/// Daily totals for the days in the rolling window, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct RollingSeries {
    /// Labels such as "19Oct", one per day.
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// The first day of the rolling window that ends on `today`.
pub(super) fn rolling_window_start(today: Date) -> Date {
    today.saturating_sub(Duration::days(ROLLING_WINDOW_DAYS - 1))
}

/// Spread `daily_totals` over the ten days ending on `today`.
///
/// Days without a total are zero. Totals dated outside the window are ignored.
pub(super) fn rolling_daily_totals(daily_totals: &[(Date, f64)], today: Date) -> RollingSeries {
    let mut totals_by_date: HashMap<Date, f64> = HashMap::new();
    for (date, total) in daily_totals {
        *totals_by_date.entry(*date).or_insert(0.0) += total;
    }

    let days: Vec<Date> = (0..ROLLING_WINDOW_DAYS)
        .rev()
        .map(|days_ago| today.saturating_sub(Duration::days(days_ago)))
        .collect();

    RollingSeries {
        labels: days.iter().map(format_day_label).collect(),
        values: days
            .iter()
            .map(|day| totals_by_date.get(day).copied().unwrap_or(0.0))
            .collect(),
    }
}

/// Format a date as the day of the month followed by the abbreviated month, e.g. "5Sept".
pub(super) fn format_day_label(date: &Date) -> String {
    let month = match date.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sept",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{}{month}", date.day())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{format_day_label, rolling_daily_totals, rolling_window_start};

    #[test]
    fn series_has_ten_days_oldest_first() {
        let today = date!(2025 - 10 - 19);

        let series = rolling_daily_totals(&[], today);

        assert_eq!(series.values, vec![0.0; 10]);
        assert_eq!(series.labels.len(), 10);
        assert_eq!(series.labels.first().map(String::as_str), Some("10Oct"));
        assert_eq!(series.labels.last().map(String::as_str), Some("19Oct"));
    }

    #[test]
    fn totals_land_on_their_day() {
        let today = date!(2025 - 10 - 19);
        let daily_totals = [
            (date!(2025 - 10 - 19), 5.0),
            (date!(2025 - 10 - 10), 7.0),
            (date!(2025 - 10 - 15), 2.5),
        ];

        let series = rolling_daily_totals(&daily_totals, today);

        assert_eq!(
            series.values,
            vec![7.0, 0.0, 0.0, 0.0, 0.0, 2.5, 0.0, 0.0, 0.0, 5.0]
        );
    }

    #[test]
    fn series_sums_to_total_within_window() {
        let today = date!(2025 - 10 - 19);
        let daily_totals = [
            (date!(2025 - 10 - 9), 100.0),
            (date!(2025 - 10 - 12), 1.0),
            (date!(2025 - 10 - 18), 2.0),
            (date!(2025 - 10 - 20), 1000.0),
        ];

        let series = rolling_daily_totals(&daily_totals, today);

        assert_eq!(series.values.iter().sum::<f64>(), 3.0);
    }

    #[test]
    fn window_spans_month_boundary() {
        let today = date!(2025 - 10 - 03);

        let series = rolling_daily_totals(&[], today);

        assert_eq!(rolling_window_start(today), date!(2025 - 09 - 24));
        assert_eq!(series.labels[0], "24Sept");
        assert_eq!(series.labels[9], "3Oct");
    }

    #[test]
    fn formats_labels() {
        assert_eq!(format_day_label(&date!(2025 - 09 - 05)), "5Sept");
        assert_eq!(format_day_label(&date!(2025 - 01 - 31)), "31Jan");
    }
}
