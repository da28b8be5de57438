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
#![allow(dead_code)]
pub mod model_builder;

use spoj::chrono::NaiveDateTime;
use spoj::request::BadRequest;
use spoj::tracing::dispatcher::DefaultGuard;
use spoj::{
    BaseModel, Config, Journey, SearchOutcome, SearchParams, Section, Solver, TransferSection,
    TransitData, VehicleSection,
};

pub fn init_test_logger() -> DefaultGuard {
    spoj::logger::init_test_logger()
}

pub fn dt(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap()
}

/// Build the transit data for `model` and run one query against it
pub fn build_and_solve(
    model: BaseModel,
    config: &Config,
    origins: &[&str],
    destinations: &[&str],
    departure: &str,
) -> (TransitData, Result<SearchOutcome, BadRequest>) {
    let data = TransitData::new(model, config).unwrap();
    let mut solver = Solver::new();
    let params = SearchParams {
        origin_stop_ids: origins.iter().map(|id| id.to_string()).collect(),
        destination_stop_ids: destinations.iter().map(|id| id.to_string()).collect(),
        departure_datetime: dt(departure),
    };
    let outcome = solver.solve(&data, &params, config);
    (data, outcome)
}

pub fn expect_journey(outcome: Result<SearchOutcome, BadRequest>) -> Journey {
    match outcome.unwrap() {
        SearchOutcome::Found(journey) => journey,
        other => panic!("expected a journey, got {:?}", other),
    }
}

pub fn vehicle_sections(journey: &Journey) -> Vec<&VehicleSection> {
    journey
        .sections
        .iter()
        .filter_map(|section| match section {
            Section::Vehicle(vehicle_section) => Some(vehicle_section),
            Section::Transfer(_) => None,
        })
        .collect()
}

pub fn transfer_sections(journey: &Journey) -> Vec<&TransferSection> {
    journey
        .sections
        .iter()
        .filter_map(|section| match section {
            Section::Transfer(transfer_section) => Some(transfer_section),
            Section::Vehicle(_) => None,
        })
        .collect()
}
