// Copyright  (C) 2020, Hove and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Hove (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

use std::fmt::{Display, Formatter};

mod calendar;
pub mod days_patterns;

pub use calendar::Calendar;

pub const SECONDS_IN_A_DAY: u32 = 24 * 60 * 60;

/// Duration since midnight on the service day of a trip.
/// This corresponds to the "Time" notion found in gtfs stop_times.txt.
/// Values greater than 24:00:00 are legal and describe past-midnight
/// operation on the previous service day.
/// This type accepts only times comprised between 00:00:00 and 48:00:00.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct SecondsSinceDayStart {
    seconds: u32,
}

const MAX_SECONDS_SINCE_DAY_START: u32 = 48 * 60 * 60; // 48h

/// Duration since 00:00:00 on the first day of the dataset calendar.
/// This is used in the engine to store a point in time in an unambiguous way.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct SecondsSinceDatasetStart {
    seconds: u32,
}

/// Number of days since the first day of the dataset calendar
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub struct DaysSinceDatasetStart {
    pub(super) days: u16,
}

// we allow 36_600 days which is more than 100 years, and less than u16::MAX = 65_535 days
pub(crate) const MAX_DAYS_IN_CALENDAR: u16 = 100 * 366;

#[derive(Debug, Eq, PartialEq, Clone, Copy, Ord, PartialOrd)]
pub struct PositiveDuration {
    pub(super) seconds: u32,
}

impl PositiveDuration {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> PositiveDuration {
        let total_seconds = seconds + 60 * minutes + 60 * 60 * hours;
        PositiveDuration {
            seconds: total_seconds,
        }
    }

    pub const fn from_seconds(seconds: u32) -> PositiveDuration {
        PositiveDuration { seconds }
    }

    pub fn total_seconds(&self) -> u64 {
        self.seconds as u64
    }
}

impl Display for PositiveDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.seconds / (60 * 60);
        let minutes_in_secs = self.seconds % (60 * 60);
        let minutes = minutes_in_secs / 60;
        let seconds = minutes_in_secs % 60;
        if hours != 0 {
            write!(f, "{}h{:02}m{:02}s", hours, minutes, seconds)
        } else if minutes != 0 {
            write!(f, "{}m{:02}s", minutes, seconds)
        } else {
            write!(f, "{}s", seconds)
        }
    }
}

impl SecondsSinceDayStart {
    pub fn from_seconds(seconds: u32) -> Option<Self> {
        if seconds >= MAX_SECONDS_SINCE_DAY_START {
            None
        } else {
            Some(Self { seconds })
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }

    /// The time-of-day part, in `[0, 86400)`
    pub fn time_in_day(&self) -> u32 {
        self.seconds % SECONDS_IN_A_DAY
    }

    /// How many whole days after the service day this time falls on
    pub fn day_shift(&self) -> u16 {
        // the cast is safe : seconds < 48h so the shift is 0 or 1
        (self.seconds / SECONDS_IN_A_DAY) as u16
    }
}

impl Display for SecondsSinceDayStart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.seconds / 60 / 60,
            self.seconds / 60 % 60,
            self.seconds % 60
        )
    }
}

impl std::str::FromStr for SecondsSinceDayStart {
    type Err = BadTime;

    /// Parse a gtfs time in `H:MM:SS` or `HH:MM:SS` form, possibly beyond 24:00:00
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let bad = || BadTime {
            text: text.to_string(),
        };
        let mut parts = text.split(':');
        let hours: u32 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let minutes: u32 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let seconds: u32 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
            return Err(bad());
        }
        SecondsSinceDayStart::from_seconds(hours * 3600 + minutes * 60 + seconds)
            .ok_or_else(bad)
    }
}

#[derive(Debug)]
pub struct BadTime {
    text: String,
}

impl std::error::Error for BadTime {}

impl Display for BadTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unable to parse `{}` as a time. Expected format is 13:05:00, possibly beyond 24:00:00 \
            and up to 48:00:00 excluded.",
            self.text
        )
    }
}

impl SecondsSinceDatasetStart {
    pub fn duration_since(
        &self,
        start_datetime: &SecondsSinceDatasetStart,
    ) -> Option<PositiveDuration> {
        self.seconds
            .checked_sub(start_datetime.seconds)
            .map(|seconds| PositiveDuration { seconds })
    }

    /// The day this instant falls on, and its time-of-day part
    pub(crate) fn decompose(&self) -> (u16, u32) {
        // the cast is safe : an instant is bounded by the calendar which
        // has at most MAX_DAYS_IN_CALENDAR < u16::MAX days, plus the 48h
        // overhang of past-midnight stop times
        let day = (self.seconds / SECONDS_IN_A_DAY) as u16;
        let time_in_day = self.seconds % SECONDS_IN_A_DAY;
        (day, time_in_day)
    }

    pub(crate) fn compose(day: u16, seconds_in_day: u32) -> Self {
        Self {
            seconds: u32::from(day) * SECONDS_IN_A_DAY + seconds_in_day,
        }
    }
}

impl std::ops::Add<PositiveDuration> for SecondsSinceDatasetStart {
    type Output = Self;

    fn add(self, rhs: PositiveDuration) -> Self::Output {
        Self {
            seconds: self.seconds + rhs.seconds,
        }
    }
}

impl std::ops::Add for PositiveDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            seconds: self.seconds + rhs.seconds,
        }
    }
}
