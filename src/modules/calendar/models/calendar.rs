use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Business calendar: explicit non-business days plus optional weekend exclusion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub excluded_dates: BTreeSet<NaiveDate>,
    pub exclude_saturdays: bool,
    pub exclude_sundays: bool,
}

impl Calendar {
    pub fn new(
        excluded_dates: impl IntoIterator<Item = NaiveDate>,
        exclude_saturdays: bool,
        exclude_sundays: bool,
    ) -> Self {
        Self {
            excluded_dates: excluded_dates.into_iter().collect(),
            exclude_saturdays,
            exclude_sundays,
        }
    }

    /// True when no installment may fall due on `date`
    pub fn is_non_business_day(&self, date: NaiveDate) -> bool {
        self.excluded_dates.contains(&date)
            || (self.exclude_saturdays && date.weekday() == Weekday::Sat)
            || (self.exclude_sundays && date.weekday() == Weekday::Sun)
    }

    /// First business day on or after `date`
    pub fn roll_forward(&self, date: NaiveDate) -> NaiveDate {
        let mut candidate = date;
        while self.is_non_business_day(candidate) {
            match candidate.succ_opt() {
                Some(next) => candidate = next,
                None => break,
            }
        }
        candidate
    }
}
