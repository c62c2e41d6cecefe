use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::mem::replace;

/// A date range iterator that yields each date from the start date
/// through the end date (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// Same range, yielding midnight timestamps for daily series.
    pub fn midnights(self) -> impl Iterator<Item = NaiveDateTime> {
        self.map(|day| day.and_time(NaiveTime::MIN))
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0 + TimeDelta::days(1);
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}
