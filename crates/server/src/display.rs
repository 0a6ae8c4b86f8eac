//! Shapes stored records for the widget and the chart.

use itertools::Itertools;
use serde::Serialize;
use time::Month;

use crate::models::MonthlyRecord;

/// Offset from the end of the record list to the same month one year ago.
const YEAR_AGO_OFFSET: usize = 13;

/// Current-month summary for the widget.
///
/// `percent_diff` is positive infinity when fewer than 13 records exist -
/// the "insufficient history" sentinel, which renderers must show as
/// something other than a number.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetSummary {
    pub max_temp: f64,
    pub min_temp: f64,
    pub percent_diff: f64,
}

/// The record list decomposed into three parallel chart sequences.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphSeries {
    pub labels: Vec<String>,
    pub maxes: Vec<f64>,
    pub mins: Vec<f64>,
}

/// Summarize the most recent month and its change against a year prior.
/// `None` only for an empty record list.
pub fn widget_summary(records: &[MonthlyRecord]) -> Option<WidgetSummary> {
    let last = records.last()?;

    let percent_diff = records
        .len()
        .checked_sub(YEAR_AGO_OFFSET)
        .map(|year_ago| round2(last.max_temp / records[year_ago].max_temp * 100.0 - 100.0))
        .unwrap_or(f64::INFINITY);

    Some(WidgetSummary {
        max_temp: last.max_temp,
        min_temp: last.min_temp,
        percent_diff,
    })
}

/// Direct unzip of the record list, preserving input order.
pub fn graph_series(records: &[MonthlyRecord]) -> GraphSeries {
    let (labels, maxes, mins) = records
        .iter()
        .map(|r| (r.month.to_string(), r.max_temp, r.min_temp))
        .multiunzip();

    GraphSeries {
        labels,
        maxes,
        mins,
    }
}

/// English month name for a 1-based month number, `"Month"` out of range.
pub fn month_name(number: u8) -> String {
    match Month::try_from(number) {
        Ok(month) => month.to_string(),
        Err(_) => String::from("Month"),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoordKey;

    fn records(maxes: &[f64]) -> Vec<MonthlyRecord> {
        let coord = CoordKey::new(45.52, -122.67);
        let mut month = "2020-01".parse::<crate::models::MonthKey>().unwrap();
        maxes
            .iter()
            .map(|&max_temp| {
                let record = MonthlyRecord {
                    coord: coord.clone(),
                    month,
                    max_temp,
                    min_temp: max_temp - 20.0,
                };
                month = crate::models::MonthKey {
                    year: if month.month == Month::December {
                        month.year + 1
                    } else {
                        month.year
                    },
                    month: month.month.next(),
                };
                record
            })
            .collect()
    }

    #[test]
    fn percent_diff_compares_against_thirteen_back() {
        // 13 records: the first is exactly one year before the last
        let mut maxes = vec![80.0; 12];
        maxes.insert(0, 64.0);
        let records = records(&maxes);
        assert_eq!(records.len(), 13);

        let widget = widget_summary(&records).unwrap();
        assert_eq!(widget.max_temp, 80.0);
        assert_eq!(widget.min_temp, 60.0);
        // 80 / 64 * 100 - 100 = 25
        assert_eq!(widget.percent_diff, 25.0);
    }

    #[test]
    fn percent_diff_rounds_to_two_decimals() {
        let mut maxes = vec![90.0; 12];
        maxes.push(96.0);
        let records = records(&maxes);
        assert_eq!(records.len(), 13);

        let widget = widget_summary(&records).unwrap();
        // 96 / 90 * 100 - 100 = 6.666... -> 6.67
        assert_eq!(widget.percent_diff, 6.67);
    }

    #[test]
    fn short_history_reports_infinity() {
        let records = records(&[70.0; 12]);
        let widget = widget_summary(&records).unwrap();
        assert!(widget.percent_diff.is_infinite());
        assert!(widget.percent_diff.is_sign_positive());
    }

    #[test]
    fn empty_records_have_no_summary() {
        assert!(widget_summary(&[]).is_none());
    }

    #[test]
    fn graph_series_stays_aligned_with_records() {
        let records = records(&[70.0, 75.0, 68.0]);
        let series = graph_series(&records);

        assert_eq!(series.labels.len(), records.len());
        assert_eq!(series.maxes.len(), records.len());
        assert_eq!(series.mins.len(), records.len());
        for (i, record) in records.iter().enumerate() {
            assert_eq!(series.labels[i], record.month.to_string());
            assert_eq!(series.maxes[i], record.max_temp);
            assert_eq!(series.mins[i], record.min_temp);
        }
    }

    #[test]
    fn month_names_cover_the_calendar_and_nothing_else() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(9), "September");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "Month");
        assert_eq!(month_name(13), "Month");
    }
}
