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

use crate::time::{Calendar, DaysSinceDatasetStart};
use chrono::NaiveDate;

/// The sets of active days of all services, deduplicated.
/// Many services share the exact same activity pattern (e.g. "every
/// working day"), so patterns are stored once and referred to by handle.
#[derive(Debug)]
pub struct DaysPatterns {
    days_patterns: Vec<DaysPatternData>,

    buffer: Vec<bool>,
}

#[derive(Debug)]
struct DaysPatternData {
    allowed_dates: Vec<bool>,
}

#[derive(Debug, Copy, Clone)]
pub struct DaysPattern {
    idx: usize,
}

impl DaysPatterns {
    pub fn new(nb_of_days: usize) -> Self {
        Self {
            days_patterns: Vec::new(),
            buffer: vec![false; nb_of_days],
        }
    }

    pub fn is_allowed(&self, days_pattern: &DaysPattern, day: &DaysSinceDatasetStart) -> bool {
        debug_assert!((day.days as usize) < self.buffer.len());
        debug_assert!(days_pattern.idx < self.days_patterns.len());
        let day_idx: usize = day.days.into();
        self.days_patterns[days_pattern.idx].allowed_dates[day_idx]
    }

    pub fn get_or_insert<'a, Dates>(&mut self, dates: Dates, calendar: &Calendar) -> DaysPattern
    where
        Dates: Iterator<Item = &'a NaiveDate>,
    {
        // set all elements of the buffer to false
        for val in self.buffer.iter_mut() {
            *val = false;
        }

        for date in dates {
            let has_offset = calendar.date_to_offset(date);
            if let Some(offset) = has_offset {
                self.buffer[offset as usize] = true;
            }
        }

        let has_days_pattern = self
            .days_patterns
            .iter()
            .enumerate()
            .find(|(_, pattern)| pattern.allowed_dates == self.buffer)
            .map(|(idx, _)| idx);

        let idx = if let Some(idx) = has_days_pattern {
            idx
        } else {
            let idx = self.days_patterns.len();
            let days_pattern_data = DaysPatternData {
                allowed_dates: self.buffer.clone(),
            };
            self.days_patterns.push(days_pattern_data);
            idx
        };

        DaysPattern { idx }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_are_deduplicated() {
        let calendar = Calendar::new(
            NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 10).unwrap(),
        );
        let mut patterns = DaysPatterns::new(calendar.nb_of_days() as usize);

        let dates = [
            NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 4).unwrap(),
        ];
        let first = patterns.get_or_insert(dates.iter(), &calendar);
        let second = patterns.get_or_insert(dates.iter(), &calendar);
        assert_eq!(patterns.days_patterns.len(), 1);

        let day = calendar
            .date_to_days_since_start(&NaiveDate::from_ymd_opt(2024, 11, 4).unwrap())
            .unwrap();
        assert!(patterns.is_allowed(&first, &day));
        assert!(patterns.is_allowed(&second, &day));

        let other_day = calendar
            .date_to_days_since_start(&NaiveDate::from_ymd_opt(2024, 11, 3).unwrap())
            .unwrap();
        assert!(!patterns.is_allowed(&first, &other_day));
    }

    #[test]
    fn dates_outside_the_calendar_are_ignored() {
        let calendar = Calendar::new(
            NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 10).unwrap(),
        );
        let mut patterns = DaysPatterns::new(calendar.nb_of_days() as usize);
        let dates = [NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()];
        let pattern = patterns.get_or_insert(dates.iter(), &calendar);
        for days in 0..calendar.nb_of_days() {
            assert!(!patterns.is_allowed(&pattern, &DaysSinceDatasetStart { days }));
        }
    }
}
