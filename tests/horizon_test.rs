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

mod utils;

use spoj::request::BadRequest;
use spoj::{BaseModel, Config, SearchOutcome};
use utils::model_builder::ModelBuilder;
use utils::{build_and_solve, dt, expect_journey};

fn daily_model() -> BaseModel {
    ModelBuilder::default()
        .calendar(
            "daily",
            &["2020-01-01", "2020-01-02", "2020-01-03"],
        )
        .vj("T1", |vj| {
            vj.calendar("daily")
                .st("A", "10:00:00", "10:00:00")
                .st("B", "10:05:00", "10:05:00")
                .st("C", "10:15:00", "10:15:00");
        })
        .build()
}

#[test]
fn test_not_found_when_the_next_run_is_beyond_the_horizon() {
    let _guard = utils::init_test_logger();

    // just missed the 10:00 departure : the next one is tomorrow,
    // more than 4 hours away
    let mut config = Config::default();
    config.max_search_time_hours = 4;
    let (_, outcome) = build_and_solve(
        daily_model(),
        &config,
        &["A"],
        &["C"],
        "2020-01-01 10:06:00",
    );
    assert!(matches!(
        outcome.unwrap(),
        SearchOutcome::NotFoundWithinHorizon
    ));
}

#[test]
fn test_the_next_day_run_is_found_within_a_full_day_horizon() {
    let _guard = utils::init_test_logger();

    // the horizon ends at 10:06 the next day, so tomorrow's run can still
    // reach B at 10:05
    let config = Config::default();
    let (_, outcome) = build_and_solve(
        daily_model(),
        &config,
        &["A"],
        &["B"],
        "2020-01-01 10:06:00",
    );
    let journey = expect_journey(outcome);
    assert_eq!(journey.first_departure(), dt("2020-01-02 10:00:00"));
    assert_eq!(journey.last_arrival(), dt("2020-01-02 10:05:00"));
}

#[test]
fn test_not_found_against_the_direction_of_travel() {
    let _guard = utils::init_test_logger();

    let config = Config::default();
    let (_, outcome) = build_and_solve(
        daily_model(),
        &config,
        &["C"],
        &["A"],
        "2020-01-01 09:30:00",
    );
    assert!(matches!(
        outcome.unwrap(),
        SearchOutcome::NotFoundWithinHorizon
    ));
}

#[test]
fn test_origin_equals_destination() {
    let _guard = utils::init_test_logger();

    let config = Config::default();
    let (_, outcome) = build_and_solve(
        daily_model(),
        &config,
        &["A"],
        &["A"],
        "2020-01-01 09:30:00",
    );
    assert!(matches!(
        outcome.unwrap(),
        SearchOutcome::OriginEqualsDestination
    ));
}

#[test]
fn test_overlapping_origin_and_destination_sets() {
    let _guard = utils::init_test_logger();

    let config = Config::default();
    let (_, outcome) = build_and_solve(
        daily_model(),
        &config,
        &["A", "B"],
        &["B", "C"],
        "2020-01-01 09:30:00",
    );
    assert!(matches!(
        outcome.unwrap(),
        SearchOutcome::OriginEqualsDestination
    ));
}

#[test]
fn test_arrival_exactly_at_the_horizon_is_found() {
    let _guard = utils::init_test_logger();

    // departure at 09:15, horizon one hour : T1 arrives at C at exactly
    // 10:15
    let mut config = Config::default();
    config.max_search_time_hours = 1;
    let (_, outcome) = build_and_solve(
        daily_model(),
        &config,
        &["A"],
        &["C"],
        "2020-01-01 09:15:00",
    );
    let journey = expect_journey(outcome);
    assert_eq!(journey.last_arrival(), dt("2020-01-01 10:15:00"));
}

#[test]
fn test_unknown_stops_are_reported_before_searching() {
    let _guard = utils::init_test_logger();

    let config = Config::default();
    let (_, outcome) = build_and_solve(
        daily_model(),
        &config,
        &["nowhere"],
        &["C"],
        "2020-01-01 09:30:00",
    );
    assert!(matches!(
        outcome,
        Err(BadRequest::UnknownOriginStop(stop_id)) if stop_id == "nowhere"
    ));

    let config = Config::default();
    let (_, outcome) = build_and_solve(
        daily_model(),
        &config,
        &["A"],
        &["nowhere"],
        "2020-01-01 09:30:00",
    );
    assert!(matches!(
        outcome,
        Err(BadRequest::UnknownDestinationStop(stop_id)) if stop_id == "nowhere"
    ));
}

#[test]
fn test_departure_outside_the_dataset_dates_is_rejected() {
    let _guard = utils::init_test_logger();

    let config = Config::default();
    let (_, outcome) = build_and_solve(
        daily_model(),
        &config,
        &["A"],
        &["C"],
        "2021-06-01 09:30:00",
    );
    assert!(matches!(
        outcome,
        Err(BadRequest::DepartureDatetime { .. })
    ));
}
