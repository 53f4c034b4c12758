use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

use super::error::{ConfigurationError, Result};

/// Resolves "today" for the business.
///
/// Timestamps are stored as naive UTC; schedule dates are business-local dates in a
/// fixed offset. A pinned clock always answers the same date and is used by tests and
/// replays.
#[derive(Debug, Clone, Copy)]
pub struct BusinessClock {
    offset: FixedOffset,
    pinned: Option<NaiveDate>,
}

impl BusinessClock {
    /// Clock running in UTC
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
            pinned: None,
        }
    }

    /// Clock running in a fixed offset east of UTC (negative for west)
    pub fn with_offset_minutes(minutes: i32) -> Result<Self> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ConfigurationError::InvalidSetting(format!(
                    "Invalid business UTC offset: {} minutes",
                    minutes
                ))
            })?;

        Ok(Self {
            offset,
            pinned: None,
        })
    }

    /// Clock whose business date never moves
    pub fn pinned(date: NaiveDate) -> Self {
        Self {
            pinned: Some(date),
            ..Self::utc()
        }
    }

    /// Current business-local date
    pub fn today(&self) -> NaiveDate {
        match self.pinned {
            Some(date) => date,
            None => to_business_time(Utc::now(), self.offset).date_naive(),
        }
    }

    /// Current instant as stored in the database
    pub fn now_utc(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

impl Default for BusinessClock {
    fn default() -> Self {
        Self::utc()
    }
}

/// Convert a UTC instant to the business offset
pub fn to_business_time(utc_time: DateTime<Utc>, offset: FixedOffset) -> DateTime<FixedOffset> {
    utc_time.with_timezone(&offset)
}
