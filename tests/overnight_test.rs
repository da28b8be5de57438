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

use spoj::{BaseModel, Config, SearchOutcome};
use utils::model_builder::ModelBuilder;
use utils::{build_and_solve, dt, expect_journey, vehicle_sections};

/// A trip scheduled past midnight : its service day is 2020-01-01 but it
/// actually runs in the small hours of 2020-01-02
fn overnight_model() -> BaseModel {
    ModelBuilder::default()
        .calendar("night", &["2020-01-01", "2020-01-02"])
        .vj("owl", |vj| {
            vj.calendar("night")
                .st("A", "25:30:00", "25:30:00")
                .st("B", "26:00:00", "26:00:00");
        })
        .build()
}

#[test]
fn test_a_past_midnight_departure_runs_on_the_next_day() {
    let _guard = utils::init_test_logger();

    let config = Config::default();
    let (data, outcome) = build_and_solve(
        overnight_model(),
        &config,
        &["A"],
        &["B"],
        "2020-01-02 01:00:00",
    );
    let journey = expect_journey(outcome);

    let vehicles = vehicle_sections(&journey);
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0].from_datetime, dt("2020-01-02 01:30:00"));
    assert_eq!(vehicles[0].to_datetime, dt("2020-01-02 02:00:00"));
    // the trip belongs to the previous service day
    assert_eq!(
        vehicles[0].service_day,
        dt("2020-01-01 00:00:00").date()
    );
}

#[test]
fn test_a_late_evening_query_catches_the_past_midnight_departure() {
    let _guard = utils::init_test_logger();

    let config = Config::default();
    let (_, outcome) = build_and_solve(
        overnight_model(),
        &config,
        &["A"],
        &["B"],
        "2020-01-01 23:59:00",
    );
    let journey = expect_journey(outcome);
    assert_eq!(journey.first_departure(), dt("2020-01-02 01:30:00"));
    assert_eq!(journey.last_arrival(), dt("2020-01-02 02:00:00"));
}

#[test]
fn test_the_service_day_selects_the_overnight_run() {
    let _guard = utils::init_test_logger();

    // the owl service is active on 2020-01-01 only, so the 25:30 departure
    // exists in the night of the 1st to the 2nd, but not the next night.
    // The unrelated daytime trip keeps 2020-01-02 inside the calendar.
    let model = ModelBuilder::default()
        .calendar("night", &["2020-01-01"])
        .calendar("daily", &["2020-01-01", "2020-01-02"])
        .vj("owl", |vj| {
            vj.calendar("night")
                .st("A", "25:30:00", "25:30:00")
                .st("B", "26:00:00", "26:00:00");
        })
        .vj("daytime", |vj| {
            vj.calendar("daily")
                .st("E", "12:00:00", "12:00:00")
                .st("F", "12:30:00", "12:30:00");
        })
        .build();

    let mut config = Config::default();
    config.max_search_time_hours = 4;
    let (_, outcome) = build_and_solve(model, &config, &["A"], &["B"], "2020-01-02 02:00:00");
    assert!(matches!(
        outcome.unwrap(),
        SearchOutcome::NotFoundWithinHorizon
    ));
}
