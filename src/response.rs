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

use crate::engine::journeys_tree::{JourneysTree, Reached, ReachedBy};
use crate::models::{Stop, Trip};
use crate::time::{PositiveDuration, SecondsSinceDatasetStart};
use crate::transit_data::{TransferSource, TransitData};

use chrono::{NaiveDate, NaiveDateTime};

/// The result of one search
#[derive(Debug)]
pub enum SearchOutcome {
    Found(Journey),
    NotFoundWithinHorizon,
    OriginEqualsDestination,
}

/// An alternating sequence of vehicle and walking sections from an origin
/// stop to a destination stop
#[derive(Debug, Clone)]
pub struct Journey {
    pub sections: Vec<Section>,
    departure: SecondsSinceDatasetStart,
    arrival: SecondsSinceDatasetStart,
}

#[derive(Debug, Clone)]
pub enum Section {
    Vehicle(VehicleSection),
    Transfer(TransferSection),
}

#[derive(Debug, Clone)]
pub struct VehicleSection {
    pub trip: Trip,
    /// the service day the trip runs on, which for past-midnight stop
    /// times is the day before the wall-clock day of the event
    pub service_day: NaiveDate,
    pub from_stop: Stop,
    pub to_stop: Stop,
    pub from_datetime: NaiveDateTime,
    pub to_datetime: NaiveDateTime,
    pub board_stoptime_idx: usize,
    pub debark_stoptime_idx: usize,
}

#[derive(Debug, Clone)]
pub struct TransferSection {
    pub from_stop: Stop,
    pub to_stop: Stop,
    pub from_datetime: NaiveDateTime,
    pub to_datetime: NaiveDateTime,
    pub source: TransferSource,
}

impl Journey {
    /// Rebuild the journey ending at `reached` by walking the shared
    /// prefix chain backwards
    pub(crate) fn reconstruct(
        tree: &JourneysTree,
        reached: Reached,
        data: &TransitData,
    ) -> Journey {
        let calendar = data.calendar();
        let arrival = tree.reached_data(&reached).arrival;
        let mut departure = tree.reached_data(&reached).arrival;
        let mut sections = Vec::new();

        let mut current = reached;
        loop {
            let reached_data = tree.reached_data(&current);
            match &reached_data.by {
                ReachedBy::Departure => {
                    break;
                }
                ReachedBy::Debark {
                    onboard,
                    stoptime_idx,
                } => {
                    let onboard_data = tree.onboard_data(onboard);
                    let board_instant = data.departure_instant_of(
                        onboard_data.trip,
                        onboard_data.board_stoptime_idx,
                        &onboard_data.day,
                    );
                    // unwrap is safe : a boarded stop time always exists
                    let board_stop = data
                        .stop_time(onboard_data.trip, onboard_data.board_stoptime_idx)
                        .unwrap()
                        .stop;
                    departure = board_instant;
                    sections.push(Section::Vehicle(VehicleSection {
                        trip: onboard_data.trip,
                        service_day: calendar.to_naive_date(&onboard_data.day),
                        from_stop: board_stop,
                        to_stop: reached_data.stop,
                        from_datetime: calendar.to_naive_datetime(&board_instant),
                        to_datetime: calendar.to_naive_datetime(&reached_data.arrival),
                        board_stoptime_idx: onboard_data.board_stoptime_idx,
                        debark_stoptime_idx: *stoptime_idx,
                    }));
                    current = onboard_data.prev;
                }
                ReachedBy::Walk {
                    prev,
                    started,
                    source,
                } => {
                    let from_stop = tree.reached_data(prev).stop;
                    departure = *started;
                    sections.push(Section::Transfer(TransferSection {
                        from_stop,
                        to_stop: reached_data.stop,
                        from_datetime: calendar.to_naive_datetime(started),
                        to_datetime: calendar.to_naive_datetime(&reached_data.arrival),
                        source: *source,
                    }));
                    current = *prev;
                }
            }
        }
        sections.reverse();

        Journey {
            sections,
            departure,
            arrival,
        }
    }

    pub fn first_departure(&self) -> NaiveDateTime {
        match self.sections.first() {
            Some(Section::Vehicle(section)) => section.from_datetime,
            Some(Section::Transfer(section)) => section.from_datetime,
            // a found journey always has at least one section : origin and
            // destination stops are distinct
            None => unreachable!("a found journey has at least one section"),
        }
    }

    pub fn last_arrival(&self) -> NaiveDateTime {
        match self.sections.last() {
            Some(Section::Vehicle(section)) => section.to_datetime,
            Some(Section::Transfer(section)) => section.to_datetime,
            None => unreachable!("a found journey has at least one section"),
        }
    }

    pub fn nb_of_vehicle_sections(&self) -> usize {
        self.sections
            .iter()
            .filter(|section| matches!(section, Section::Vehicle(_)))
            .count()
    }

    pub fn nb_of_transfers(&self) -> usize {
        self.nb_of_vehicle_sections().saturating_sub(1)
    }

    pub fn total_duration(&self) -> PositiveDuration {
        // unwrap is safe : arrival is never before departure
        self.arrival.duration_since(&self.departure).unwrap()
    }
}
