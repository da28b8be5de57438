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

use super::{
    DaysSinceDatasetStart, SecondsSinceDatasetStart, SecondsSinceDayStart, MAX_DAYS_IN_CALENDAR,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::convert::TryFrom;

/// The range of dates over which the dataset operates.
/// All instants handled by the engine are measured in seconds
/// since 00:00:00 on `first_date`.
#[derive(Debug)]
pub struct Calendar {
    first_date: NaiveDate, // first date which may be allowed
    last_date: NaiveDate,  // last date (included) which may be allowed
    nb_of_days: u16,       // == (last_date - first_date).num_days() + 1
                           // we allow at most MAX_DAYS_IN_CALENDAR days
}

impl Calendar {
    pub fn new(first_date: NaiveDate, last_date: NaiveDate) -> Self {
        assert!(first_date <= last_date);
        let nb_of_days_i64: i64 = (last_date - first_date).num_days() + 1;
        assert!(
            nb_of_days_i64 < MAX_DAYS_IN_CALENDAR as i64,
            "Trying to construct a calendar with {:#} days \
            which is more than the maximum allowed of {:#} days",
            nb_of_days_i64,
            MAX_DAYS_IN_CALENDAR
        );

        // unwrap here is safe because :
        // - nb_of_days_i64 >= 0 since we asserted above that first_date <= last_date
        // - nb_of_days_i64 < MAX_DAYS_IN_CALENDAR < u16::MAX
        let nb_of_days: u16 = TryFrom::try_from(nb_of_days_i64).unwrap();

        Self {
            first_date,
            last_date,
            nb_of_days,
        }
    }

    pub fn nb_of_days(&self) -> u16 {
        self.nb_of_days
    }

    pub fn first_date(&self) -> &NaiveDate {
        &self.first_date
    }

    pub fn last_date(&self) -> &NaiveDate {
        &self.last_date
    }

    pub fn contains_date(&self, date: &NaiveDate) -> bool {
        self.first_date <= *date && *date <= self.last_date
    }

    pub fn to_naive_date(&self, day: &DaysSinceDatasetStart) -> NaiveDate {
        self.first_date + chrono::Duration::days(i64::from(day.days))
    }

    pub fn to_naive_datetime(&self, instant: &SecondsSinceDatasetStart) -> NaiveDateTime {
        self.first_date.and_time(NaiveTime::MIN)
            + chrono::Duration::seconds(i64::from(instant.seconds))
    }

    pub fn date_to_days_since_start(&self, date: &NaiveDate) -> Option<DaysSinceDatasetStart> {
        self.date_to_offset(date)
            .map(|offset| DaysSinceDatasetStart { days: offset })
    }

    pub(crate) fn date_to_offset(&self, date: &NaiveDate) -> Option<u16> {
        if *date < self.first_date || *date > self.last_date {
            None
        } else {
            let offset_64: i64 = (*date - self.first_date).num_days();
            // the cast is safe because :
            //  - we check above that offset_64 is not negative
            //  - offset_64 < nb_of_days <= MAX_DAYS_IN_CALENDAR < u16::MAX
            //    since date <= self.last_date
            let offset = offset_64 as u16;
            Some(offset)
        }
    }

    /// Convert a wall-clock datetime into an instant of this calendar.
    /// Returns None when the date part is outside the calendar.
    pub fn from_naive_datetime(&self, datetime: &NaiveDateTime) -> Option<SecondsSinceDatasetStart> {
        let first_datetime = self.first_date.and_time(NaiveTime::MIN);
        let seconds_i64 = (*datetime - first_datetime).num_seconds();
        if seconds_i64 < 0 {
            return None;
        }
        if !self.contains_date(&datetime.date()) {
            return None;
        }
        // the cast is safe because the date is inside the calendar,
        // which is capped at MAX_DAYS_IN_CALENDAR days
        Some(SecondsSinceDatasetStart {
            seconds: seconds_i64 as u32,
        })
    }

    /// The instant at which `time` occurs on the service day `day`
    pub fn compose(
        &self,
        day: &DaysSinceDatasetStart,
        time: &SecondsSinceDayStart,
    ) -> SecondsSinceDatasetStart {
        debug_assert!(day.days < self.nb_of_days);
        SecondsSinceDatasetStart::compose(day.days, time.total_seconds())
    }
}
