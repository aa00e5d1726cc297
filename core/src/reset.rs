//! Reset-time calculation
//!
//! Pure functions that compute the next instant the game wipes progress for
//! a given schedule. Nothing here reads a clock: callers pass `now` in, so
//! every function is deterministic and safe to call from any thread.
//!
//! All instants are UTC. Weekly schedules that vary by data-center region
//! are resolved through [`REGIONAL_WEEKLY_RESETS`].

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc, Weekday};
use dutykeeper_types::TaskCategory;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hour (UTC) of the daily reset.
pub const DAILY_RESET_HOUR: u32 = 15;
/// Hour (UTC) of the Grand Company supply reset.
pub const GRAND_COMPANY_RESET_HOUR: u32 = 20;
/// Hour (UTC) of the weekly reset on Tuesdays.
pub const WEEKLY_RESET_HOUR: u32 = 8;
/// Hour (UTC) at which leve allowances roll over mid-day.
pub const LEVE_ALLOWANCE_RESET_HOUR: u32 = 12;
/// Fashion report judging opens this many days after the weekly reset.
const FASHION_REPORT_OFFSET_DAYS: u64 = 3;

/// Day and hour a region-dependent weekly reset lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionalReset {
    pub weekday: Weekday,
    pub hour: u32,
}

/// Region code -> weekly reset slot.
///
/// Codes are the game's data-center region ids: 1 Japan, 2 North America,
/// 3 Europe, 4 Oceania, 7 Cloud.
pub static REGIONAL_WEEKLY_RESETS: phf::Map<u8, RegionalReset> = phf::phf_map! {
    1u8 => RegionalReset { weekday: Weekday::Sat, hour: 12 },
    2u8 => RegionalReset { weekday: Weekday::Sun, hour: 2 },
    3u8 => RegionalReset { weekday: Weekday::Sat, hour: 19 },
    4u8 => RegionalReset { weekday: Weekday::Sat, hour: 9 },
    7u8 => RegionalReset { weekday: Weekday::Sun, hour: 2 },
};

/// Errors from reset computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResetError {
    /// The region code has no known weekly reset slot.
    #[error("unresolved data-center region {0}: no regional weekly reset is known")]
    UnknownRegion(u8),
}

// ═══════════════════════════════════════════════════════════════════════════
// Primitive helpers
// ═══════════════════════════════════════════════════════════════════════════

fn at_hour(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() + TimeDelta::hours(i64::from(hour))
}

fn tomorrow(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive() + Days::new(1)
}

/// Today at `hour` if that hour has not started yet, otherwise tomorrow at `hour`.
///
/// Only the hour field is compared, so `hour:00:00` exactly already counts
/// as past.
pub fn next_time_for_hour(now: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
    if now.hour() < hour {
        at_hour(now.date_naive(), hour)
    } else {
        at_hour(tomorrow(now), hour)
    }
}

/// Next `weekday` at `hour`.
///
/// If `now` is already on `weekday` and before `hour`, that same day is
/// returned. Otherwise the search starts tomorrow and walks forward at most
/// seven days.
pub fn next_day_of_week(now: DateTime<Utc>, weekday: Weekday, hour: u32) -> DateTime<Utc> {
    if now.weekday() == weekday && now.hour() < hour {
        return at_hour(now.date_naive(), hour);
    }

    let mut date = tomorrow(now);
    while date.weekday() != weekday {
        date = date + Days::new(1);
    }

    at_hour(date, hour)
}

// ═══════════════════════════════════════════════════════════════════════════
// Named resets
// ═══════════════════════════════════════════════════════════════════════════

pub fn next_daily_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    next_time_for_hour(now, DAILY_RESET_HOUR)
}

pub fn next_weekly_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    next_day_of_week(now, Weekday::Tue, WEEKLY_RESET_HOUR)
}

/// Fashion report resets three days after the weekly reset (Friday 08:00).
pub fn next_fashion_report_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    next_weekly_reset(now) + Days::new(FASHION_REPORT_OFFSET_DAYS)
}

pub fn next_grand_company_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    next_time_for_hour(now, GRAND_COMPANY_RESET_HOUR)
}

/// Leve allowances accrue twice a day: at noon and at midnight.
pub fn next_leve_allowance_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    if now.hour() < LEVE_ALLOWANCE_RESET_HOUR {
        at_hour(now.date_naive(), LEVE_ALLOWANCE_RESET_HOUR)
    } else {
        at_hour(tomorrow(now), 0)
    }
}

/// Weekly reset whose day and hour depend on the player's data-center region.
pub fn next_regional_weekly_reset(
    now: DateTime<Utc>,
    region: u8,
) -> Result<DateTime<Utc>, ResetError> {
    let slot = REGIONAL_WEEKLY_RESETS
        .get(&region)
        .ok_or(ResetError::UnknownRegion(region))?;
    Ok(next_day_of_week(now, slot.weekday, slot.hour))
}

// ═══════════════════════════════════════════════════════════════════════════
// Schedules
// ═══════════════════════════════════════════════════════════════════════════

/// Which reset rule a task follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetSchedule {
    Daily,
    Weekly,
    FashionReport,
    GrandCompany,
    LeveAllowance,
    RegionalWeekly,
    /// Never reset by the game; used by special tasks.
    Never,
}

impl ResetSchedule {
    pub const ALL: [ResetSchedule; 7] = [
        Self::Daily,
        Self::Weekly,
        Self::FashionReport,
        Self::GrandCompany,
        Self::LeveAllowance,
        Self::RegionalWeekly,
        Self::Never,
    ];

    /// Category this schedule is listed under.
    pub fn category(&self) -> TaskCategory {
        match self {
            Self::Daily | Self::GrandCompany | Self::LeveAllowance => TaskCategory::Daily,
            Self::Weekly | Self::FashionReport | Self::RegionalWeekly => TaskCategory::Weekly,
            Self::Never => TaskCategory::Special,
        }
    }

    /// Default schedule for a bare category.
    pub fn for_category(category: TaskCategory) -> Self {
        match category {
            TaskCategory::Daily => Self::Daily,
            TaskCategory::Weekly => Self::Weekly,
            TaskCategory::Special => Self::Never,
        }
    }

    /// Time between two consecutive resets, `None` for [`ResetSchedule::Never`].
    pub fn period(&self) -> Option<TimeDelta> {
        match self {
            Self::Daily | Self::GrandCompany => Some(TimeDelta::days(1)),
            Self::LeveAllowance => Some(TimeDelta::hours(12)),
            Self::Weekly | Self::FashionReport | Self::RegionalWeekly => Some(TimeDelta::days(7)),
            Self::Never => None,
        }
    }

    /// Next reset instant after `now`.
    ///
    /// `Ok(None)` means the schedule never resets. `region` is only consulted
    /// by [`ResetSchedule::RegionalWeekly`].
    pub fn next_reset(
        &self,
        region: u8,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, ResetError> {
        let next = match self {
            Self::Daily => next_daily_reset(now),
            Self::Weekly => next_weekly_reset(now),
            Self::FashionReport => next_fashion_report_reset(now),
            Self::GrandCompany => next_grand_company_reset(now),
            Self::LeveAllowance => next_leve_allowance_reset(now),
            Self::RegionalWeekly => next_regional_weekly_reset(now, region)?,
            Self::Never => return Ok(None),
        };
        Ok(Some(next))
    }
}

/// Next reset for a bare category, using that category's default schedule.
pub fn next_reset_for_category(
    category: TaskCategory,
    region: u8,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, ResetError> {
    ResetSchedule::for_category(category).next_reset(region, now)
}
