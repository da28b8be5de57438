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

use crate::models::{Stop, Trip};
use crate::time::{DaysSinceDatasetStart, SecondsSinceDatasetStart};
use crate::transit_data::TransferSource;

type Id = usize;

#[derive(Clone, Copy, Debug)]
pub struct Onboard {
    id: Id,
}

#[derive(Clone, Copy, Debug)]
pub struct Reached {
    id: Id,
}

/// A complete journey is a sequence of moments of the form
///   Reached, (Onboard, Reached)*
/// i.e. it starts by reaching the origin stop, and then alternates
/// boarding a trip and reaching a stop, where "reaching" is either
/// alighting the trip or walking a transfer.
///
/// Each moment stores a handle to the moment it extends, so many
/// journeys in flight share their common prefix instead of copying it.
/// Handles are small and copyable ; the driver reconstructs the final
/// journey by walking the chain backwards once the search is over.
pub struct JourneysTree {
    onboards: Vec<OnboardData>,
    reacheds: Vec<ReachedData>,
}

pub struct OnboardData {
    pub trip: Trip,
    pub day: DaysSinceDatasetStart,
    pub board_stoptime_idx: usize,
    pub prev: Reached,
}

pub struct ReachedData {
    pub stop: Stop,
    pub arrival: SecondsSinceDatasetStart,
    pub by: ReachedBy,
}

pub enum ReachedBy {
    /// the journey starts at this stop
    Departure,
    /// alighted the trip at its `stoptime_idx`-th stop time
    Debark {
        onboard: Onboard,
        stoptime_idx: usize,
    },
    /// walked a transfer from the previously reached stop
    Walk {
        prev: Reached,
        started: SecondsSinceDatasetStart,
        source: TransferSource,
    },
}

impl JourneysTree {
    pub fn new() -> Self {
        Self {
            onboards: Vec::new(),
            reacheds: Vec::new(),
        }
    }

    pub fn depart(&mut self, stop: Stop, instant: SecondsSinceDatasetStart) -> Reached {
        let id = self.reacheds.len();
        self.reacheds.push(ReachedData {
            stop,
            arrival: instant,
            by: ReachedBy::Departure,
        });
        Reached { id }
    }

    pub fn board(
        &mut self,
        prev: &Reached,
        trip: Trip,
        day: DaysSinceDatasetStart,
        board_stoptime_idx: usize,
    ) -> Onboard {
        let id = self.onboards.len();
        self.onboards.push(OnboardData {
            trip,
            day,
            board_stoptime_idx,
            prev: *prev,
        });
        Onboard { id }
    }

    pub fn debark(
        &mut self,
        onboard: &Onboard,
        stoptime_idx: usize,
        stop: Stop,
        arrival: SecondsSinceDatasetStart,
    ) -> Reached {
        let id = self.reacheds.len();
        self.reacheds.push(ReachedData {
            stop,
            arrival,
            by: ReachedBy::Debark {
                onboard: *onboard,
                stoptime_idx,
            },
        });
        Reached { id }
    }

    pub fn walk(
        &mut self,
        prev: &Reached,
        to_stop: Stop,
        started: SecondsSinceDatasetStart,
        arrival: SecondsSinceDatasetStart,
        source: TransferSource,
    ) -> Reached {
        let id = self.reacheds.len();
        self.reacheds.push(ReachedData {
            stop: to_stop,
            arrival,
            by: ReachedBy::Walk {
                prev: *prev,
                started,
                source,
            },
        });
        Reached { id }
    }

    pub fn onboard_data(&self, onboard: &Onboard) -> &OnboardData {
        &self.onboards[onboard.id]
    }

    pub fn reached_data(&self, reached: &Reached) -> &ReachedData {
        &self.reacheds[reached.id]
    }

    pub fn size(&self) -> usize {
        self.onboards.len() + self.reacheds.len()
    }

    pub fn clear(&mut self) {
        self.onboards.clear();
        self.reacheds.clear();
    }
}
