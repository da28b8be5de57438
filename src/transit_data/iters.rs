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

//! Enumeration of the absolute departure instants at a stop.
//!
//! A stop time with a relative departure `t` occurs at instant
//! `day * 86400 + t` for every day on which its trip's service is active.
//! The per-stop departure list is sorted by `t` modulo one day, so a single
//! wall-clock day merges the contributions of the current service day and of
//! earlier service days whose past-midnight stop times land on it.
//!
//! The enumeration is positioned by a (wall-clock day, offset) cursor :
//! finding the first departure costs a binary search, resuming from the
//! previous position costs a forward scan. A scan looks at most 24h past
//! its starting point (the rest of the wall-clock day, then one wrapped
//! day) ; search horizons above 24h are not guaranteed correct.

use super::TransitData;
use crate::models::{Stop, Trip};
use crate::time::{DaysSinceDatasetStart, SecondsSinceDatasetStart};

/// A departure found at a stop, along with the cursor position it was
/// found at, so that the enumeration can be resumed after it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PositionedDeparture {
    /// wall-clock day of the departure, counted since the dataset start
    pub(crate) wall_day: u16,
    /// position in the stop's departure list, sorted by time-of-day
    pub(crate) idx: usize,

    pub(crate) instant: SecondsSinceDatasetStart,
    /// the service day of the trip, `wall_day` minus the day shift of
    /// past-midnight stop times
    pub(crate) service_day: DaysSinceDatasetStart,
    pub(crate) trip: Trip,
    pub(crate) stoptime_idx: usize,
}

impl TransitData {
    /// The earliest boardable departure at `stop` occurring at or after
    /// `from`, if there is one within the next 24h
    pub(crate) fn first_departure_after(
        &self,
        stop: Stop,
        from: SecondsSinceDatasetStart,
    ) -> Option<PositionedDeparture> {
        let departures = &self.stop_schedule(stop).departures;
        if departures.is_empty() {
            return None;
        }
        let (wall_day, time_in_day) = from.decompose();
        let start_idx = departures.partition_point(|dep| dep.time_in_day < time_in_day);
        self.scan(stop, wall_day, start_idx, time_in_day)
    }

    /// The next boardable departure at `stop` strictly after `current`,
    /// if there is one within 24h of it
    pub(crate) fn next_departure_after(
        &self,
        stop: Stop,
        current: &PositionedDeparture,
    ) -> Option<PositionedDeparture> {
        let departures = &self.stop_schedule(stop).departures;
        let limit_time_in_day = departures[current.idx].time_in_day;
        self.scan(stop, current.wall_day, current.idx + 1, limit_time_in_day)
    }

    /// Scan the departure list from (`base_day`, `start_idx`), wrapping
    /// once onto the next day up to `limit_time_in_day`, for a departure
    /// whose trip is active on the matching service day
    fn scan(
        &self,
        stop: Stop,
        base_day: u16,
        start_idx: usize,
        limit_time_in_day: u32,
    ) -> Option<PositionedDeparture> {
        let departures = &self.stop_schedule(stop).departures;
        let mut day = base_day;
        let mut idx = start_idx;
        let mut wrapped = false;
        loop {
            if idx >= departures.len() {
                if wrapped {
                    return None;
                }
                wrapped = true;
                day = base_day + 1;
                idx = 0;
                continue;
            }
            let departure = &departures[idx];
            if wrapped && departure.time_in_day >= limit_time_in_day {
                // a full day has been scanned
                return None;
            }
            if let Some(service_days) = day.checked_sub(departure.day_shift) {
                let service_day = DaysSinceDatasetStart { days: service_days };
                if self.is_trip_active(departure.trip, &service_day) {
                    return Some(PositionedDeparture {
                        wall_day: day,
                        idx,
                        instant: SecondsSinceDatasetStart::compose(day, departure.time_in_day),
                        service_day,
                        trip: departure.trip,
                        stoptime_idx: departure.stoptime_idx,
                    });
                }
            }
            idx += 1;
        }
    }
}
