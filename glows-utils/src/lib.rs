//! Shared utility functions for the GEOGLOWS plugin crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

    /// Format used in cache file names: "YYYYMMDD"
    pub const STAMP_FORMAT: &str = "%Y%m%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Format a NaiveDate as a compact "YYYYMMDD" stamp
    pub fn format_stamp(date: &NaiveDate) -> String {
        date.format(STAMP_FORMAT).to_string()
    }

    /// Parse a compact "YYYYMMDD" stamp
    pub fn parse_stamp(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, STAMP_FORMAT)?)
    }

    /// Last calendar day of the month containing `year`/`month`.
    pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
    }

    /// Midnight timestamp at the end of the month of `date`.
    ///
    /// Monthly resampling labels every bucket with its last day, so two
    /// series resampled independently line up on the same index.
    pub fn month_end_stamp(date: &NaiveDate) -> Option<NaiveDateTime> {
        month_end(date.year(), date.month()).map(|d| d.and_time(NaiveTime::MIN))
    }

    /// Midnight timestamp on the first day of the month of `date`.
    pub fn month_start_stamp(date: &NaiveDate) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(date.year(), date.month(), 1).map(|d| d.and_time(NaiveTime::MIN))
    }

    /// Midnight timestamp on January 1st of `year`.
    pub fn year_start_stamp(year: i32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.and_time(NaiveTime::MIN))
    }

}

/// Calendar month naming
pub mod months {
    /// Three letter month abbreviations, January first.
    pub const SHORT_NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    /// Full month names, January first.
    pub const LONG_NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    /// Abbreviated name for a 1-based month number.
    pub fn short_name(month: u32) -> Option<&'static str> {
        SHORT_NAMES.get((month as usize).checked_sub(1)?).copied()
    }

    /// Full name for a 1-based month number.
    pub fn long_name(month: u32) -> Option<&'static str> {
        LONG_NAMES.get((month as usize).checked_sub(1)?).copied()
    }

    /// Zero-padded month tick values ("01".."12").
    pub fn padded_numbers() -> Vec<String> {
        (1..=12).map(|m| format!("{m:02}")).collect()
    }

}
