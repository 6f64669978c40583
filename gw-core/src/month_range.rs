use chrono::NaiveDate;
use gw_utils::dates::{month_end, next_month_end};

/// An iterator over every month-end date falling inside `[start, end]`
/// (inclusive), in ascending order.
///
/// A range shorter than a month yields a single date only when a month end
/// lies inside it; an inverted range yields nothing.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct MonthEndRange {
    cursor: Option<NaiveDate>,
    end: NaiveDate,
}

impl MonthEndRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        MonthEndRange {
            cursor: month_end(&start),
            end,
        }
    }
}

impl Iterator for MonthEndRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        if current > self.end {
            self.cursor = None;
            return None;
        }
        self.cursor = next_month_end(&current);
        Some(current)
    }
}
