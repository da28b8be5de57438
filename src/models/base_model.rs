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

use crate::time::{PositiveDuration, SecondsSinceDayStart};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};

/// Immutable schedule entities, built once at startup.
///
/// Entities are stored in arenas and addressed by small copyable handles
/// ([`Stop`], [`Route`], [`Trip`], [`Service`]), so that the engine never
/// carries owning references into the model.
#[derive(Debug)]
pub struct BaseModel {
    stops: Vec<StopData>,
    routes: Vec<RouteData>,
    trips: Vec<TripData>,
    services: Vec<ServiceData>,
    transfers: Vec<Transfer>,

    stop_id_to_idx: HashMap<String, Stop>,
    route_id_to_idx: HashMap<String, Route>,
    trip_id_to_idx: HashMap<String, Trip>,
    service_id_to_idx: HashMap<String, Service>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Stop {
    pub(crate) idx: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Route {
    pub(crate) idx: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Trip {
    pub(crate) idx: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Service {
    pub(crate) idx: usize,
}

/// A record of stops.txt
#[derive(Debug, Clone)]
pub struct StopData {
    pub id: String,
    pub name: Option<String>,
    pub location_type: LocationType,
    pub parent_station: Option<String>,
    /// value of the configured transfer-node column, read only in
    /// `by_node_id` transfer mode
    pub node_id: Option<String>,
}

/// A record of routes.txt
#[derive(Debug, Clone)]
pub struct RouteData {
    pub id: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub route_type: RouteType,
}

#[derive(Debug)]
struct TripData {
    id: String,
    route: Route,
    service: Service,
    short_name: Option<String>,
    stop_times: Vec<StopTime>,
}

/// The set of days on which trips of a service operate, already combined
/// from the weekly pattern and the calendar_dates exceptions.
#[derive(Debug, Clone)]
pub struct ServiceData {
    pub id: String,
    pub dates: BTreeSet<NaiveDate>,
}

/// One scheduled visit of a trip to a stop.
/// Times are measured since midnight of the trip's service day and may
/// exceed 24h for past-midnight operation.
#[derive(Debug, Clone, Copy)]
pub struct StopTime {
    pub stop: Stop,
    pub arrival: SecondsSinceDayStart,
    pub departure: SecondsSinceDayStart,
    pub flow: FlowDirection,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FlowDirection {
    BoardAndDebark,
    BoardOnly,
    DebarkOnly,
    NoBoardDebark,
}

impl FlowDirection {
    pub fn allows_board(&self) -> bool {
        matches!(
            self,
            FlowDirection::BoardAndDebark | FlowDirection::BoardOnly
        )
    }

    pub fn allows_debark(&self) -> bool {
        matches!(
            self,
            FlowDirection::BoardAndDebark | FlowDirection::DebarkOnly
        )
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LocationType {
    StopOrPlatform,
    Station,
    EntranceOrExit,
    GenericNode,
    BoardingArea,
}

/// The mode of transport of a route.
/// Covers the classic route_type values plus the supported
/// Google extended values, already folded onto the classic modes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RouteType {
    TramOrLightRail,
    MetroOrSubway,
    Rail,
    Bus,
    Ferry,
    CableTram,
    AerialLift,
    Funicular,
    Trolleybus,
    Monorail,
}

impl Display for RouteType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RouteType::TramOrLightRail => "Tram",
            RouteType::MetroOrSubway => "Metro",
            RouteType::Rail => "Train",
            RouteType::Bus => "Bus",
            RouteType::Ferry => "Ferry",
            RouteType::CableTram => "Cable tram",
            RouteType::AerialLift => "Aerial lift",
            RouteType::Funicular => "Funicular",
            RouteType::Trolleybus => "Trolleybus",
            RouteType::Monorail => "Monorail",
        };
        write!(f, "{}", name)
    }
}

/// A walking connection between two stops.
/// Either a record of transfers.txt, or synthesised from a node-id or
/// parent-station group.
#[derive(Debug, Clone)]
pub struct Transfer {
    pub from_stop: Stop,
    pub to_stop: Stop,
    pub kind: TransferKind,
    pub min_transfer_time: Option<PositiveDuration>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TransferKind {
    /// transfers.transfer_type 0 (or empty)
    Recommended,
    /// transfers.transfer_type 1
    Guaranteed,
    /// transfers.transfer_type 2
    RequiresMinimumTime,
    /// transfers.transfer_type 3
    NotPossible,
    /// transfers.transfer_type 4
    InSeat,
    /// transfers.transfer_type 5
    Reboard,
    /// synthesised between stops sharing the configured node column
    NodeGroup,
    /// synthesised between stops sharing a parent station
    ParentStation,
}

/// A record of trips.txt, with ids not yet resolved to handles
#[derive(Debug, Clone)]
pub struct TripRecord {
    pub id: String,
    pub route_id: String,
    pub service_id: String,
    pub short_name: Option<String>,
}

/// A record of stop_times.txt, with ids not yet resolved to handles
#[derive(Debug, Clone)]
pub struct StopTimeRecord {
    pub trip_id: String,
    pub stop_sequence: u32,
    pub stop_id: String,
    pub arrival: SecondsSinceDayStart,
    pub departure: SecondsSinceDayStart,
    pub flow: FlowDirection,
}

/// A record of transfers.txt, with ids not yet resolved to handles
#[derive(Debug, Clone)]
pub struct TransferRecord {
    pub from_stop_id: String,
    pub to_stop_id: String,
    pub kind: TransferKind,
    pub min_transfer_time: Option<PositiveDuration>,
}

impl BaseModel {
    pub fn new(
        stops: Vec<StopData>,
        routes: Vec<RouteData>,
        services: Vec<ServiceData>,
        trips: Vec<TripRecord>,
        stop_times: Vec<StopTimeRecord>,
        transfers: Vec<TransferRecord>,
    ) -> Result<Self, ModelError> {
        let mut stop_id_to_idx = HashMap::with_capacity(stops.len());
        for (idx, stop_data) in stops.iter().enumerate() {
            let previous = stop_id_to_idx.insert(stop_data.id.clone(), Stop { idx });
            if previous.is_some() {
                return Err(ModelError::DuplicateStopId(stop_data.id.clone()));
            }
        }

        let mut route_id_to_idx = HashMap::with_capacity(routes.len());
        for (idx, route_data) in routes.iter().enumerate() {
            let previous = route_id_to_idx.insert(route_data.id.clone(), Route { idx });
            if previous.is_some() {
                return Err(ModelError::DuplicateRouteId(route_data.id.clone()));
            }
        }

        let mut service_id_to_idx = HashMap::with_capacity(services.len());
        for (idx, service_data) in services.iter().enumerate() {
            let previous = service_id_to_idx.insert(service_data.id.clone(), Service { idx });
            if previous.is_some() {
                return Err(ModelError::DuplicateServiceId(service_data.id.clone()));
            }
        }

        let mut trip_datas: Vec<TripData> = Vec::with_capacity(trips.len());
        let mut trip_id_to_idx: HashMap<String, Trip> = HashMap::with_capacity(trips.len());
        for record in trips {
            let route = *route_id_to_idx.get(&record.route_id).ok_or_else(|| {
                ModelError::UnknownRouteId {
                    trip_id: record.id.clone(),
                    route_id: record.route_id.clone(),
                }
            })?;
            let service = *service_id_to_idx.get(&record.service_id).ok_or_else(|| {
                ModelError::UnknownServiceId {
                    trip_id: record.id.clone(),
                    service_id: record.service_id.clone(),
                }
            })?;
            let trip = Trip {
                idx: trip_datas.len(),
            };
            if trip_id_to_idx.insert(record.id.clone(), trip).is_some() {
                return Err(ModelError::DuplicateTripId(record.id));
            }
            trip_datas.push(TripData {
                id: record.id,
                route,
                service,
                short_name: record.short_name,
                stop_times: Vec::new(),
            });
        }

        // group stop times under their trip, ordered by stop_sequence
        let mut sequences: Vec<Vec<(u32, StopTime)>> = vec![Vec::new(); trip_datas.len()];
        for record in stop_times {
            let trip = *trip_id_to_idx.get(&record.trip_id).ok_or_else(|| {
                ModelError::UnknownTripId {
                    trip_id: record.trip_id.clone(),
                }
            })?;
            let stop = *stop_id_to_idx.get(&record.stop_id).ok_or_else(|| {
                ModelError::UnknownStopId {
                    trip_id: record.trip_id.clone(),
                    stop_id: record.stop_id.clone(),
                }
            })?;
            sequences[trip.idx].push((
                record.stop_sequence,
                StopTime {
                    stop,
                    arrival: record.arrival,
                    departure: record.departure,
                    flow: record.flow,
                },
            ));
        }
        for (trip_idx, mut sequence) in sequences.into_iter().enumerate() {
            sequence.sort_by_key(|(stop_sequence, _)| *stop_sequence);
            let trip_data = &mut trip_datas[trip_idx];
            for window in sequence.windows(2) {
                if window[0].0 == window[1].0 {
                    return Err(ModelError::DuplicateStopSequence {
                        trip_id: trip_data.id.clone(),
                        stop_sequence: window[0].0,
                    });
                }
            }
            trip_data.stop_times = sequence.into_iter().map(|(_, stop_time)| stop_time).collect();
            check_stop_times_are_increasing(trip_data)?;
        }

        let transfers = transfers
            .into_iter()
            .map(|record| {
                let from_stop = *stop_id_to_idx.get(&record.from_stop_id).ok_or_else(|| {
                    ModelError::UnknownTransferStopId {
                        stop_id: record.from_stop_id.clone(),
                    }
                })?;
                let to_stop = *stop_id_to_idx.get(&record.to_stop_id).ok_or_else(|| {
                    ModelError::UnknownTransferStopId {
                        stop_id: record.to_stop_id.clone(),
                    }
                })?;
                Ok(Transfer {
                    from_stop,
                    to_stop,
                    kind: record.kind,
                    min_transfer_time: record.min_transfer_time,
                })
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        Ok(Self {
            stops,
            routes,
            trips: trip_datas,
            services,
            transfers,
            stop_id_to_idx,
            route_id_to_idx,
            trip_id_to_idx,
            service_id_to_idx,
        })
    }

    pub fn nb_of_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn nb_of_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn nb_of_trips(&self) -> usize {
        self.trips.len()
    }

    pub fn nb_of_services(&self) -> usize {
        self.services.len()
    }

    pub fn stops(&self) -> impl Iterator<Item = Stop> + '_ {
        (0..self.stops.len()).map(|idx| Stop { idx })
    }

    pub fn trips(&self) -> impl Iterator<Item = Trip> + '_ {
        (0..self.trips.len()).map(|idx| Trip { idx })
    }

    pub fn stop_data(&self, stop: Stop) -> &StopData {
        &self.stops[stop.idx]
    }

    pub fn route_data(&self, route: Route) -> &RouteData {
        &self.routes[route.idx]
    }

    pub fn service_data(&self, service: Service) -> &ServiceData {
        &self.services[service.idx]
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn stop_by_id(&self, id: &str) -> Option<Stop> {
        self.stop_id_to_idx.get(id).copied()
    }

    pub fn route_by_id(&self, id: &str) -> Option<Route> {
        self.route_id_to_idx.get(id).copied()
    }

    pub fn trip_by_id(&self, id: &str) -> Option<Trip> {
        self.trip_id_to_idx.get(id).copied()
    }

    pub fn service_by_id(&self, id: &str) -> Option<Service> {
        self.service_id_to_idx.get(id).copied()
    }

    pub fn stop_id(&self, stop: Stop) -> &str {
        &self.stops[stop.idx].id
    }

    pub fn stop_name(&self, stop: Stop) -> Option<&str> {
        self.stops[stop.idx].name.as_deref()
    }

    pub fn trip_id(&self, trip: Trip) -> &str {
        &self.trips[trip.idx].id
    }

    pub fn route_of(&self, trip: Trip) -> Route {
        self.trips[trip.idx].route
    }

    pub fn service_of(&self, trip: Trip) -> Service {
        self.trips[trip.idx].service
    }

    pub fn stop_times_of(&self, trip: Trip) -> &[StopTime] {
        &self.trips[trip.idx].stop_times
    }

    pub fn service_runs_on(&self, service: Service, date: &NaiveDate) -> bool {
        self.services[service.idx].dates.contains(date)
    }

    pub fn route_type(&self, route: Route) -> RouteType {
        self.routes[route.idx].route_type
    }

    /// The short name of a route, falling back to its long name, then its id
    pub fn route_name(&self, route: Route) -> &str {
        let data = &self.routes[route.idx];
        data.short_name
            .as_deref()
            .or(data.long_name.as_deref())
            .unwrap_or(&data.id)
    }

    /// The name of a trip for display : its short name followed by the
    /// route name, or the route name alone
    pub fn trip_name(&self, trip: Trip) -> String {
        let trip_data = &self.trips[trip.idx];
        let route_name = self.route_name(trip_data.route);
        match &trip_data.short_name {
            Some(short_name) => format!("{} ({})", short_name, route_name),
            None => route_name.to_string(),
        }
    }
}

fn check_stop_times_are_increasing(trip_data: &TripData) -> Result<(), ModelError> {
    for stop_time in &trip_data.stop_times {
        if stop_time.arrival > stop_time.departure {
            return Err(ModelError::DecreasingStopTimes {
                trip_id: trip_data.id.clone(),
            });
        }
    }
    for window in trip_data.stop_times.windows(2) {
        if window[0].departure > window[1].arrival {
            return Err(ModelError::DecreasingStopTimes {
                trip_id: trip_data.id.clone(),
            });
        }
    }
    Ok(())
}

#[derive(Debug)]
pub enum ModelError {
    DuplicateStopId(String),
    DuplicateRouteId(String),
    DuplicateTripId(String),
    DuplicateServiceId(String),
    DuplicateStopSequence { trip_id: String, stop_sequence: u32 },
    UnknownRouteId { trip_id: String, route_id: String },
    UnknownServiceId { trip_id: String, service_id: String },
    UnknownTripId { trip_id: String },
    UnknownStopId { trip_id: String, stop_id: String },
    UnknownTransferStopId { stop_id: String },
    DecreasingStopTimes { trip_id: String },
}

impl std::error::Error for ModelError {}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::DuplicateStopId(id) => {
                write!(f, "stops.stop_id `{}` is not unique", id)
            }
            ModelError::DuplicateRouteId(id) => {
                write!(f, "routes.route_id `{}` is not unique", id)
            }
            ModelError::DuplicateTripId(id) => {
                write!(f, "trips.trip_id `{}` is not unique", id)
            }
            ModelError::DuplicateServiceId(id) => {
                write!(f, "service_id `{}` is not unique", id)
            }
            ModelError::DuplicateStopSequence {
                trip_id,
                stop_sequence,
            } => write!(
                f,
                "trip `{}` has two stop_times with stop_sequence {}",
                trip_id, stop_sequence
            ),
            ModelError::UnknownRouteId { trip_id, route_id } => write!(
                f,
                "trip `{}` refers to the unknown route_id `{}`",
                trip_id, route_id
            ),
            ModelError::UnknownServiceId {
                trip_id,
                service_id,
            } => write!(
                f,
                "trip `{}` refers to the unknown service_id `{}`",
                trip_id, service_id
            ),
            ModelError::UnknownTripId { trip_id } => write!(
                f,
                "a stop_time refers to the unknown trip_id `{}`",
                trip_id
            ),
            ModelError::UnknownStopId { trip_id, stop_id } => write!(
                f,
                "a stop_time of trip `{}` refers to the unknown stop_id `{}`",
                trip_id, stop_id
            ),
            ModelError::UnknownTransferStopId { stop_id } => write!(
                f,
                "a transfer refers to the unknown stop_id `{}`",
                stop_id
            ),
            ModelError::DecreasingStopTimes { trip_id } => write!(
                f,
                "the stop_times of trip `{}` are not increasing along the trip",
                trip_id
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn stop(id: &str) -> StopData {
        StopData {
            id: id.to_string(),
            name: Some(id.to_string()),
            location_type: LocationType::StopOrPlatform,
            parent_station: None,
            node_id: None,
        }
    }

    fn stop_time(trip_id: &str, stop_sequence: u32, stop_id: &str, time: &str) -> StopTimeRecord {
        StopTimeRecord {
            trip_id: trip_id.to_string(),
            stop_sequence,
            stop_id: stop_id.to_string(),
            arrival: SecondsSinceDayStart::from_str(time).unwrap(),
            departure: SecondsSinceDayStart::from_str(time).unwrap(),
            flow: FlowDirection::BoardAndDebark,
        }
    }

    fn toy_parts() -> (Vec<StopData>, Vec<RouteData>, Vec<ServiceData>, Vec<TripRecord>) {
        let stops = vec![stop("A"), stop("B")];
        let routes = vec![RouteData {
            id: "R1".to_string(),
            short_name: Some("1".to_string()),
            long_name: None,
            route_type: RouteType::Bus,
        }];
        let services = vec![ServiceData {
            id: "S1".to_string(),
            dates: BTreeSet::new(),
        }];
        let trips = vec![TripRecord {
            id: "T1".to_string(),
            route_id: "R1".to_string(),
            service_id: "S1".to_string(),
            short_name: None,
        }];
        (stops, routes, services, trips)
    }

    #[test]
    fn stop_times_are_ordered_by_stop_sequence() {
        let (stops, routes, services, trips) = toy_parts();
        // records out of order on purpose
        let stop_times = vec![
            stop_time("T1", 2, "B", "10:10:00"),
            stop_time("T1", 1, "A", "10:00:00"),
        ];
        let model =
            BaseModel::new(stops, routes, services, trips, stop_times, Vec::new()).unwrap();
        let trip = model.trip_by_id("T1").unwrap();
        let stop_times = model.stop_times_of(trip);
        assert_eq!(model.stop_id(stop_times[0].stop), "A");
        assert_eq!(model.stop_id(stop_times[1].stop), "B");
    }

    #[test]
    fn decreasing_stop_times_are_rejected() {
        let (stops, routes, services, trips) = toy_parts();
        let stop_times = vec![
            stop_time("T1", 1, "A", "10:00:00"),
            stop_time("T1", 2, "B", "09:00:00"),
        ];
        let result = BaseModel::new(stops, routes, services, trips, stop_times, Vec::new());
        assert!(matches!(
            result,
            Err(ModelError::DecreasingStopTimes { .. })
        ));
    }

    #[test]
    fn unknown_references_are_rejected() {
        let (stops, routes, services, mut trips) = toy_parts();
        trips[0].route_id = "nope".to_string();
        let result = BaseModel::new(stops, routes, services, trips, Vec::new(), Vec::new());
        assert!(matches!(result, Err(ModelError::UnknownRouteId { .. })));
    }
}
