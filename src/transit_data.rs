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

//! The indexed, read-only view of the schedule that the engine consults :
//! departures per stop sorted by time-of-day, walking transfers per stop
//! materialised according to the configured transfer mode, and the active
//! days of every trip as deduplicated bitmaps.

use crate::models::{BaseModel, Stop, StopTime, Trip};
use crate::time::days_patterns::{DaysPattern, DaysPatterns};
use crate::time::{
    Calendar, DaysSinceDatasetStart, PositiveDuration, SecondsSinceDatasetStart,
};

mod init;
mod iters;

pub use init::BadDataset;
pub(crate) use iters::PositionedDeparture;

pub struct TransitData {
    model: BaseModel,
    calendar: Calendar,
    days_patterns: DaysPatterns,

    /// the active-days pattern of each trip's service, indexed by trip
    trip_days: Vec<DaysPattern>,

    /// indexed by stop
    stop_schedules: Vec<StopSchedule>,
}

#[derive(Debug)]
pub(crate) struct StopSchedule {
    /// every boardable stop time at this stop,
    /// sorted by increasing time-of-day
    pub(crate) departures: Vec<StopDeparture>,

    /// outgoing walking edges, sorted by increasing duration so that a
    /// walker enumerating them produces nondecreasing arrival instants.
    /// The zero-cost edge to the stop itself always comes first.
    pub(crate) transfers: Vec<TransferEdge>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct StopDeparture {
    pub(crate) trip: Trip,
    /// position of this departure within the trip
    pub(crate) stoptime_idx: usize,
    /// departure time modulo one day
    pub(crate) time_in_day: u32,
    /// how many days before the wall-clock day the trip's service day lies
    pub(crate) day_shift: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct TransferEdge {
    pub to_stop: Stop,
    pub duration: PositiveDuration,
    pub source: TransferSource,
}

/// Where a walking edge comes from, kept for display purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSource {
    /// waiting at the same stop
    SameStop,
    /// a transfers.txt record, by its position in [`BaseModel::transfers`]
    Recorded(usize),
    /// stops sharing the configured transfer-node column
    NodeGroup,
    /// stops sharing a parent station
    ParentStation,
}

impl TransitData {
    pub fn model(&self) -> &BaseModel {
        &self.model
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn nb_of_stops(&self) -> usize {
        self.model.nb_of_stops()
    }

    pub fn nb_of_trips(&self) -> usize {
        self.model.nb_of_trips()
    }

    pub(crate) fn stop_schedule(&self, stop: Stop) -> &StopSchedule {
        &self.stop_schedules[stop.idx]
    }

    pub(crate) fn transfers_at(&self, stop: Stop) -> &[TransferEdge] {
        &self.stop_schedules[stop.idx].transfers
    }

    pub(crate) fn stop_time(&self, trip: Trip, stoptime_idx: usize) -> Option<&StopTime> {
        self.model.stop_times_of(trip).get(stoptime_idx)
    }

    pub(crate) fn is_trip_active(&self, trip: Trip, day: &DaysSinceDatasetStart) -> bool {
        if day.days >= self.calendar.nb_of_days() {
            return false;
        }
        self.days_patterns.is_allowed(&self.trip_days[trip.idx], day)
    }

    /// The instant at which `trip`, running on the service day `day`,
    /// arrives at its `stoptime_idx`-th stop time
    pub(crate) fn arrival_instant_of(
        &self,
        trip: Trip,
        stoptime_idx: usize,
        day: &DaysSinceDatasetStart,
    ) -> SecondsSinceDatasetStart {
        let stop_time = &self.model.stop_times_of(trip)[stoptime_idx];
        SecondsSinceDatasetStart::compose(day.days, stop_time.arrival.total_seconds())
    }

    /// The instant at which `trip`, running on the service day `day`,
    /// departs from its `stoptime_idx`-th stop time
    pub(crate) fn departure_instant_of(
        &self,
        trip: Trip,
        stoptime_idx: usize,
        day: &DaysSinceDatasetStart,
    ) -> SecondsSinceDatasetStart {
        let stop_time = &self.model.stop_times_of(trip)[stoptime_idx];
        SecondsSinceDatasetStart::compose(day.days, stop_time.departure.total_seconds())
    }
}
