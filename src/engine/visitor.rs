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

//! The frontier elements of the search.
//!
//! A visitor is a position in the time-expanded graph (waiting at a stop,
//! riding a trip, or walking a transfer) together with enough cursor state
//! to produce its next event. The set of kinds is closed and known, so the
//! dispatch is a plain enum rather than a trait object.

use super::journeys_tree::Reached;
use super::search::{JourneyQuality, SearchState};
use crate::models::{Stop, Trip};
use crate::time::{DaysSinceDatasetStart, SecondsSinceDatasetStart};
use crate::transit_data::{PositionedDeparture, TransitData};

pub enum Visitor {
    Stop(StopVisitor),
    Trip(TripVisitor),
    Transfer(TransferVisitor),
}

#[derive(Debug, PartialEq, Eq)]
pub enum VisitorStatus {
    /// the visitor has a further event and should be pushed back
    Alive,
    Exhausted,
}

impl Visitor {
    /// The absolute instant at which this visitor's next action occurs.
    /// The driver orders its queue on this value alone : a visitor can
    /// only emit journeys arriving at or after its next event.
    pub fn next_event(&self) -> SecondsSinceDatasetStart {
        match self {
            Visitor::Stop(visitor) => visitor.departure.instant,
            Visitor::Trip(visitor) => visitor.next_event,
            Visitor::Transfer(visitor) => visitor.next_event,
        }
    }

    /// Advance by exactly one event, integrating any journey improvement
    /// into `state` and appending successor visitors to `emitted`
    pub fn step(
        &mut self,
        data: &TransitData,
        state: &mut SearchState,
        emitted: &mut Vec<Visitor>,
    ) -> VisitorStatus {
        match self {
            Visitor::Stop(visitor) => visitor.step(data, state, emitted),
            Visitor::Trip(visitor) => visitor.step(data, state, emitted),
            Visitor::Transfer(visitor) => visitor.step(data, state, emitted),
        }
    }
}

/// Standing at a stop, ready to board the next departure not yet considered.
///
/// The boarded prefix journey is *not* stored here : it is read from the
/// best-known record at the stop when a departure is actually boarded, so
/// that a prefix improved after this visitor was created is still used.
pub struct StopVisitor {
    stop: Stop,
    departure: PositionedDeparture,
}

impl StopVisitor {
    /// A visitor for the departures of `stop` at or after `from`.
    /// None when the stop has no boardable departure in the next 24h.
    pub fn new(data: &TransitData, stop: Stop, from: SecondsSinceDatasetStart) -> Option<Self> {
        let departure = data.first_departure_after(stop, from)?;
        Some(Self { stop, departure })
    }

    fn step(
        &mut self,
        data: &TransitData,
        state: &mut SearchState,
        emitted: &mut Vec<Visitor>,
    ) -> VisitorStatus {
        let departure = self.departure;
        let trip = departure.trip;

        // unwrap is safe : a StopVisitor exists only at a stop with a
        // best-known record
        let (prefix_quality, prefix_node) = state.stop_record(self.stop).unwrap();
        let open_quality = JourneyQuality {
            first_departure: prefix_quality
                .first_departure
                .or(Some(departure.instant)),
            nb_of_vehicle_legs: prefix_quality.nb_of_vehicle_legs,
        };

        match state.trip_record(trip) {
            None => {
                let onboard = state.tree.board(
                    &prefix_node,
                    trip,
                    departure.service_day,
                    departure.stoptime_idx,
                );
                state.set_trip_record(trip, open_quality, onboard);
                if let Some(trip_visitor) =
                    TripVisitor::new(data, trip, departure.service_day, departure.stoptime_idx)
                {
                    emitted.push(Visitor::Trip(trip_visitor));
                }
            }
            Some((best_quality, _)) => {
                if open_quality.dominates(&best_quality) {
                    // a better way to board a trip already being ridden :
                    // replace the record, the riding TripVisitor will use it
                    let onboard = state.tree.board(
                        &prefix_node,
                        trip,
                        departure.service_day,
                        departure.stoptime_idx,
                    );
                    state.set_trip_record(trip, open_quality, onboard);
                }
            }
        }

        match data.next_departure_after(self.stop, &departure) {
            Some(next) => {
                self.departure = next;
                VisitorStatus::Alive
            }
            None => VisitorStatus::Exhausted,
        }
    }
}

/// Riding a trip on a given service day, about to arrive at the next
/// stop time where alighting is allowed
pub struct TripVisitor {
    trip: Trip,
    day: DaysSinceDatasetStart,
    next_stoptime_idx: usize,
    next_event: SecondsSinceDatasetStart,
}

impl TripVisitor {
    /// A visitor riding `trip` boarded at `board_stoptime_idx`.
    /// None when no later stop time allows alighting.
    pub fn new(
        data: &TransitData,
        trip: Trip,
        day: DaysSinceDatasetStart,
        board_stoptime_idx: usize,
    ) -> Option<Self> {
        let next_stoptime_idx = find_next_debark(data, trip, board_stoptime_idx + 1)?;
        let next_event = data.arrival_instant_of(trip, next_stoptime_idx, &day);
        Some(Self {
            trip,
            day,
            next_stoptime_idx,
            next_event,
        })
    }

    fn step(
        &mut self,
        data: &TransitData,
        state: &mut SearchState,
        emitted: &mut Vec<Visitor>,
    ) -> VisitorStatus {
        let stoptime_idx = self.next_stoptime_idx;
        let arrival = self.next_event;
        // unwrap is safe : next_stoptime_idx was found by find_next_debark
        let stop = data.stop_time(self.trip, stoptime_idx).unwrap().stop;

        // unwrap is safe : a TripVisitor exists only for a recorded trip
        let (open_quality, onboard) = state.trip_record(self.trip).unwrap();
        let board_stoptime_idx = state.tree.onboard_data(&onboard).board_stoptime_idx;

        // with equal-time stop times, the record may have been improved by
        // a boarding downstream of this position ; closing there would go
        // backwards along the trip
        if board_stoptime_idx < stoptime_idx {
            let closed_quality = JourneyQuality {
                first_departure: open_quality.first_departure,
                nb_of_vehicle_legs: open_quality.nb_of_vehicle_legs.saturating_add(1),
            };
            let accepted = match state.stop_record(stop) {
                None => true,
                Some((best_quality, _)) => closed_quality.dominates(&best_quality),
            };
            if accepted {
                let reached = state.tree.debark(&onboard, stoptime_idx, stop, arrival);
                state.set_stop_record(stop, closed_quality, reached);
                if !state.stop_has_visitor(stop) {
                    state.mark_stop_visitor(stop);
                    if let Some(stop_visitor) = StopVisitor::new(data, stop, arrival) {
                        emitted.push(Visitor::Stop(stop_visitor));
                    }
                }
                emitted.push(Visitor::Transfer(TransferVisitor::new(
                    data,
                    stop,
                    arrival,
                    reached,
                    closed_quality,
                )));
            }
        }

        match find_next_debark(data, self.trip, stoptime_idx + 1) {
            Some(next_stoptime_idx) => {
                self.next_stoptime_idx = next_stoptime_idx;
                self.next_event = data.arrival_instant_of(self.trip, next_stoptime_idx, &self.day);
                VisitorStatus::Alive
            }
            None => VisitorStatus::Exhausted,
        }
    }
}

fn find_next_debark(data: &TransitData, trip: Trip, from_idx: usize) -> Option<usize> {
    let stop_times = data.model().stop_times_of(trip);
    stop_times
        .iter()
        .enumerate()
        .skip(from_idx)
        .find(|(_, stop_time)| stop_time.flow.allows_debark())
        .map(|(idx, _)| idx)
}

/// Walking the outgoing transfer edges of a stop, one edge per event.
///
/// Unlike a StopVisitor, the prefix journey is snapshotted at creation :
/// a fresh TransferVisitor is spawned whenever the record at the source
/// stop improves, so walks always propagate the prefix they were created
/// with. Edges are sorted by duration, which keeps the events of a single
/// visitor nondecreasing.
pub struct TransferVisitor {
    stop: Stop,
    started: SecondsSinceDatasetStart,
    prefix_node: Reached,
    prefix_quality: JourneyQuality,
    edge_idx: usize,
    next_event: SecondsSinceDatasetStart,
}

impl TransferVisitor {
    pub fn new(
        data: &TransitData,
        stop: Stop,
        started: SecondsSinceDatasetStart,
        prefix_node: Reached,
        prefix_quality: JourneyQuality,
    ) -> Self {
        // every stop has at least the zero-cost edge to itself
        let first_edge = &data.transfers_at(stop)[0];
        Self {
            stop,
            started,
            prefix_node,
            prefix_quality,
            edge_idx: 0,
            next_event: started + first_edge.duration,
        }
    }

    fn step(
        &mut self,
        data: &TransitData,
        state: &mut SearchState,
        emitted: &mut Vec<Visitor>,
    ) -> VisitorStatus {
        let edge = data.transfers_at(self.stop)[self.edge_idx];
        let arrival = self.next_event;
        let target = edge.to_stop;

        let walk_quality = JourneyQuality {
            // walking immediately on arrival : for an empty prefix this is
            // where the journey starts
            first_departure: self.prefix_quality.first_departure.or(Some(self.started)),
            nb_of_vehicle_legs: self.prefix_quality.nb_of_vehicle_legs,
        };

        let accepted = match state.stop_record(target) {
            None => true,
            Some((best_quality, _)) => walk_quality.dominates(&best_quality),
        };
        if accepted {
            let reached = state.tree.walk(
                &self.prefix_node,
                target,
                self.started,
                arrival,
                edge.source,
            );
            state.set_stop_record(target, walk_quality, reached);
            if !state.stop_has_visitor(target) {
                state.mark_stop_visitor(target);
                if let Some(stop_visitor) = StopVisitor::new(data, target, arrival) {
                    emitted.push(Visitor::Stop(stop_visitor));
                }
            }
            // walks do not chain : further transfers from `target` are
            // only spawned when a trip arrives there
        }

        self.edge_idx += 1;
        match data.transfers_at(self.stop).get(self.edge_idx) {
            Some(next_edge) => {
                self.next_event = self.started + next_edge.duration;
                VisitorStatus::Alive
            }
            None => VisitorStatus::Exhausted,
        }
    }
}
