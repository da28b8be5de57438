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

//! The search driver : seeds the frontier at the origin stops, pops the
//! visitor with the earliest event, integrates its improvements, and stops
//! once no remaining visitor can better the destination.

use super::journeys_tree::{JourneysTree, Onboard, Reached};
use super::visitor::{StopVisitor, TransferVisitor, Visitor, VisitorStatus};
use crate::models::{Stop, Trip};
use crate::request::Request;
use crate::time::SecondsSinceDatasetStart;
use crate::transit_data::TransitData;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// How good the journey recorded at a stop or trip is.
///
/// Among journeys meeting at the same place with the same arrival, the one
/// departing the origin later wins, and at equal departure the one with
/// fewer vehicle legs wins. The arrival axis itself is not compared here :
/// the driver processes events in nondecreasing time order, so a record is
/// only ever challenged by proposals arriving at or after it.
#[derive(Debug, Clone, Copy)]
pub struct JourneyQuality {
    /// instant at which the journey left its origin stop,
    /// None for the empty journey still waiting there
    pub first_departure: Option<SecondsSinceDatasetStart>,
    /// number of closed vehicle legs
    pub nb_of_vehicle_legs: u8,
}

impl JourneyQuality {
    pub fn empty() -> Self {
        Self {
            first_departure: None,
            nb_of_vehicle_legs: 0,
        }
    }

    /// Whether this quality is strictly better than `other`.
    /// The empty journey is better than any started one.
    pub fn dominates(&self, other: &JourneyQuality) -> bool {
        match (self.first_departure, other.first_departure) {
            (None, None) => false,
            (None, Some(_)) => true,
            (Some(_), None) => false,
            (Some(mine), Some(theirs)) => {
                mine > theirs
                    || (mine == theirs && self.nb_of_vehicle_legs < other.nb_of_vehicle_legs)
            }
        }
    }
}

/// Per-query mutable state shared with the visitors
pub struct SearchState {
    pub tree: JourneysTree,

    /// best journey ending at each stop, indexed by stop
    stop_records: Vec<Option<(JourneyQuality, Reached)>>,
    /// best journey having boarded each trip, indexed by trip.
    /// A later boarding with a worse or equal prefix is discarded, which
    /// keeps every trip expanded at most once.
    trip_records: Vec<Option<(JourneyQuality, Onboard)>>,
    /// whether a StopVisitor was ever created at each stop
    stop_visitor_exists: Vec<bool>,

    is_destination: Vec<bool>,
    destination_reached: bool,
}

impl SearchState {
    fn new() -> Self {
        Self {
            tree: JourneysTree::new(),
            stop_records: Vec::new(),
            trip_records: Vec::new(),
            stop_visitor_exists: Vec::new(),
            is_destination: Vec::new(),
            destination_reached: false,
        }
    }

    fn clear(&mut self, nb_of_stops: usize, nb_of_trips: usize) {
        self.tree.clear();
        self.stop_records.clear();
        self.stop_records.resize(nb_of_stops, None);
        self.trip_records.clear();
        self.trip_records.resize(nb_of_trips, None);
        self.stop_visitor_exists.clear();
        self.stop_visitor_exists.resize(nb_of_stops, false);
        self.is_destination.clear();
        self.is_destination.resize(nb_of_stops, false);
        self.destination_reached = false;
    }

    pub fn stop_record(&self, stop: Stop) -> Option<(JourneyQuality, Reached)> {
        self.stop_records[stop.idx]
    }

    pub fn set_stop_record(&mut self, stop: Stop, quality: JourneyQuality, reached: Reached) {
        self.stop_records[stop.idx] = Some((quality, reached));
        if self.is_destination[stop.idx] {
            self.destination_reached = true;
        }
    }

    pub fn trip_record(&self, trip: Trip) -> Option<(JourneyQuality, Onboard)> {
        self.trip_records[trip.idx]
    }

    pub fn set_trip_record(&mut self, trip: Trip, quality: JourneyQuality, onboard: Onboard) {
        self.trip_records[trip.idx] = Some((quality, onboard));
    }

    pub fn stop_has_visitor(&self, stop: Stop) -> bool {
        self.stop_visitor_exists[stop.idx]
    }

    pub fn mark_stop_visitor(&mut self, stop: Stop) {
        self.stop_visitor_exists[stop.idx] = true;
    }
}

struct HeapEntry {
    next_event: SecondsSinceDatasetStart,
    visitor: Visitor,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.next_event == other.next_event
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    // reversed so that the BinaryHeap pops the earliest event first
    fn cmp(&self, other: &Self) -> Ordering {
        other.next_event.cmp(&self.next_event)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SearchStatus {
    Found,
    NotFoundWithinHorizon,
    OriginEqualsDestination,
}

pub struct EventSearch {
    queue: BinaryHeap<HeapEntry>,
    state: SearchState,
    emitted: Vec<Visitor>,

    nb_of_popped_events: usize,
    nb_of_pushed_visitors: usize,
}

impl EventSearch {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            state: SearchState::new(),
            emitted: Vec::new(),
            nb_of_popped_events: 0,
            nb_of_pushed_visitors: 0,
        }
    }

    /// Run the search. On [`SearchStatus::Found`] the best journey can be
    /// read back with [`EventSearch::best_destination`] and
    /// [`EventSearch::tree`].
    pub fn compute(&mut self, data: &TransitData, request: &Request) -> SearchStatus {
        self.clear(data);

        if request
            .origins
            .iter()
            .any(|origin| request.destinations.contains(origin))
        {
            return SearchStatus::OriginEqualsDestination;
        }

        for destination in &request.destinations {
            self.state.is_destination[destination.idx] = true;
        }

        for origin in &request.origins {
            let reached = self.state.tree.depart(*origin, request.departure);
            self.state
                .set_stop_record(*origin, JourneyQuality::empty(), reached);
            self.state.mark_stop_visitor(*origin);
            if let Some(stop_visitor) = StopVisitor::new(data, *origin, request.departure) {
                self.push(Visitor::Stop(stop_visitor));
            }
            self.push(Visitor::Transfer(TransferVisitor::new(
                data,
                *origin,
                request.departure,
                reached,
                JourneyQuality::empty(),
            )));
        }

        let mut previous_time = request.departure;
        while let Some(entry) = self.queue.pop() {
            let event_time = entry.next_event;
            // the frontier is monotone : a visitor never schedules an event
            // before the one it was popped at
            debug_assert!(event_time >= previous_time);
            if event_time > previous_time {
                previous_time = event_time;
                // every remaining visitor has its next event at or after
                // event_time, so a recorded destination cannot be improved
                if self.state.destination_reached {
                    return SearchStatus::Found;
                }
                if event_time > request.max_arrival {
                    return SearchStatus::NotFoundWithinHorizon;
                }
            }
            self.nb_of_popped_events += 1;

            let mut visitor = entry.visitor;
            let mut emitted = std::mem::take(&mut self.emitted);
            let status = visitor.step(data, &mut self.state, &mut emitted);
            for successor in emitted.drain(..) {
                self.push(successor);
            }
            self.emitted = emitted;
            if status == VisitorStatus::Alive {
                self.push(visitor);
            }
        }

        if self.state.destination_reached {
            SearchStatus::Found
        } else {
            SearchStatus::NotFoundWithinHorizon
        }
    }

    fn clear(&mut self, data: &TransitData) {
        self.queue.clear();
        self.state.clear(data.nb_of_stops(), data.nb_of_trips());
        self.nb_of_popped_events = 0;
        self.nb_of_pushed_visitors = 0;
    }

    fn push(&mut self, visitor: Visitor) {
        self.nb_of_pushed_visitors += 1;
        self.queue.push(HeapEntry {
            next_event: visitor.next_event(),
            visitor,
        });
    }

    /// The best recorded journey among the destination stops, by the full
    /// (arrival ascending, departure descending, legs ascending) order
    pub fn best_destination(&self, destinations: &[Stop]) -> Option<Reached> {
        let mut best: Option<(SecondsSinceDatasetStart, JourneyQuality, Reached)> = None;
        for destination in destinations {
            if let Some((quality, reached)) = self.state.stop_record(*destination) {
                let arrival = self.state.tree.reached_data(&reached).arrival;
                let is_better = match &best {
                    None => true,
                    Some((best_arrival, best_quality, _)) => {
                        arrival < *best_arrival
                            || (arrival == *best_arrival && quality.dominates(best_quality))
                    }
                };
                if is_better {
                    best = Some((arrival, quality, reached));
                }
            }
        }
        best.map(|(_, _, reached)| reached)
    }

    pub fn tree(&self) -> &JourneysTree {
        &self.state.tree
    }

    pub fn nb_of_popped_events(&self) -> usize {
        self.nb_of_popped_events
    }

    pub fn nb_of_pushed_visitors(&self) -> usize {
        self.nb_of_pushed_visitors
    }

    pub fn tree_size(&self) -> usize {
        self.state.tree.size()
    }
}
