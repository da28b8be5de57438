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

//! Provides an easy way to create a `BaseModel` for tests
//!
//! ```
//!  let model = ModelBuilder::default()
//!      .calendar("s1", &["2020-01-01"])
//!      .vj("toto", |vj| {
//!          vj.calendar("s1")
//!            .st("A", "10:00:00", "10:01:00")
//!            .st("B", "11:00:00", "11:01:00");
//!      })
//!      .build();
//! ```

use spoj::chrono::NaiveDate;
use spoj::models::{
    FlowDirection, LocationType, RouteData, ServiceData, StopData, StopTimeRecord,
    TransferKind, TransferRecord, TripRecord,
};
use spoj::time::SecondsSinceDayStart;
use spoj::{BaseModel, PositiveDuration, RouteType};

use std::collections::BTreeSet;
use std::str::FromStr;

const DEFAULT_CALENDAR_ID: &str = "default_service";
const DEFAULT_ROUTE_ID: &str = "default_route";

/// Builder used to easily create a `BaseModel`.
/// Note: if not explicitly set, all the trips will be attached to a
/// default calendar active on 2020-01-01 and to a default bus route.
pub struct ModelBuilder {
    stops: Vec<StopData>,
    routes: Vec<RouteData>,
    services: Vec<ServiceData>,
    trips: Vec<TripRecord>,
    stop_times: Vec<StopTimeRecord>,
    transfers: Vec<TransferRecord>,
}

pub struct VehicleJourneyBuilder<'a> {
    model: &'a mut ModelBuilder,
    trip_idx: usize,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self {
            stops: Vec::new(),
            routes: Vec::new(),
            services: Vec::new(),
            trips: Vec::new(),
            stop_times: Vec::new(),
            transfers: Vec::new(),
        }
    }
}

impl ModelBuilder {
    /// Declare a service active on the given dates (formatted 2020-01-01)
    pub fn calendar(mut self, id: &str, dates: &[&str]) -> Self {
        let dates: BTreeSet<NaiveDate> = dates
            .iter()
            .map(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap())
            .collect();
        self.services.push(ServiceData {
            id: id.to_string(),
            dates,
        });
        self
    }

    /// Declare (or customize) a stop
    pub fn stop<F>(mut self, id: &str, stop_initer: F) -> Self
    where
        F: FnOnce(&mut StopData),
    {
        let idx = self.get_or_create_stop(id);
        stop_initer(&mut self.stops[idx]);
        self
    }

    /// Declare (or customize) a route
    pub fn route<F>(mut self, id: &str, route_initer: F) -> Self
    where
        F: FnOnce(&mut RouteData),
    {
        let idx = self.get_or_create_route(id);
        route_initer(&mut self.routes[idx]);
        self
    }

    /// Add a new vehicle journey to the model
    pub fn vj<F>(mut self, name: &str, vj_initer: F) -> Self
    where
        F: FnOnce(VehicleJourneyBuilder),
    {
        let trip_idx = self.trips.len();
        self.trips.push(TripRecord {
            id: name.to_string(),
            route_id: DEFAULT_ROUTE_ID.to_string(),
            service_id: DEFAULT_CALENDAR_ID.to_string(),
            short_name: None,
        });
        let vj_builder = VehicleJourneyBuilder {
            model: &mut self,
            trip_idx,
        };
        vj_initer(vj_builder);
        self
    }

    /// Add a transfers.txt-like record (used in by_transfers_txt mode)
    pub fn add_transfer(mut self, from_stop_id: &str, to_stop_id: &str, seconds: u32) -> Self {
        self.get_or_create_stop(from_stop_id);
        self.get_or_create_stop(to_stop_id);
        self.transfers.push(TransferRecord {
            from_stop_id: from_stop_id.to_string(),
            to_stop_id: to_stop_id.to_string(),
            kind: TransferKind::RequiresMinimumTime,
            min_transfer_time: Some(PositiveDuration::from_seconds(seconds)),
        });
        self
    }

    pub fn build(mut self) -> BaseModel {
        // create whatever the trips refer to and was not declared
        let route_ids: Vec<String> = self.trips.iter().map(|trip| trip.route_id.clone()).collect();
        for route_id in route_ids {
            self.get_or_create_route(&route_id);
        }
        let service_ids: Vec<String> = self
            .trips
            .iter()
            .map(|trip| trip.service_id.clone())
            .collect();
        for service_id in service_ids {
            if !self.services.iter().any(|service| service.id == service_id) {
                let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
                self.services.push(ServiceData {
                    id: service_id,
                    dates: std::iter::once(date).collect(),
                });
            }
        }
        BaseModel::new(
            self.stops,
            self.routes,
            self.services,
            self.trips,
            self.stop_times,
            self.transfers,
        )
        .unwrap()
    }

    fn get_or_create_stop(&mut self, id: &str) -> usize {
        match self.stops.iter().position(|stop| stop.id == id) {
            Some(idx) => idx,
            None => {
                self.stops.push(StopData {
                    id: id.to_string(),
                    name: Some(id.to_string()),
                    location_type: LocationType::StopOrPlatform,
                    parent_station: None,
                    node_id: None,
                });
                self.stops.len() - 1
            }
        }
    }

    fn get_or_create_route(&mut self, id: &str) -> usize {
        match self.routes.iter().position(|route| route.id == id) {
            Some(idx) => idx,
            None => {
                self.routes.push(RouteData {
                    id: id.to_string(),
                    short_name: Some(id.to_string()),
                    long_name: None,
                    route_type: RouteType::Bus,
                });
                self.routes.len() - 1
            }
        }
    }
}

impl<'a> VehicleJourneyBuilder<'a> {
    pub fn route(self, id: &str) -> Self {
        self.model.trips[self.trip_idx].route_id = id.to_string();
        self
    }

    pub fn calendar(self, id: &str) -> Self {
        self.model.trips[self.trip_idx].service_id = id.to_string();
        self
    }

    pub fn short_name(self, name: &str) -> Self {
        self.model.trips[self.trip_idx].short_name = Some(name.to_string());
        self
    }

    /// Append a stop time, with boarding and alighting both allowed
    pub fn st(self, stop_id: &str, arrival: &str, departure: &str) -> Self {
        self.st_flow(stop_id, arrival, departure, FlowDirection::BoardAndDebark)
    }

    pub fn st_flow(
        self,
        stop_id: &str,
        arrival: &str,
        departure: &str,
        flow: FlowDirection,
    ) -> Self {
        self.model.get_or_create_stop(stop_id);
        let trip_id = self.model.trips[self.trip_idx].id.clone();
        let stop_sequence = self
            .model
            .stop_times
            .iter()
            .filter(|stop_time| stop_time.trip_id == trip_id)
            .count() as u32
            + 1;
        self.model.stop_times.push(StopTimeRecord {
            trip_id,
            stop_sequence,
            stop_id: stop_id.to_string(),
            arrival: SecondsSinceDayStart::from_str(arrival).unwrap(),
            departure: SecondsSinceDayStart::from_str(departure).unwrap(),
            flow,
        });
        self
    }
}
