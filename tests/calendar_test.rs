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
use utils::{build_and_solve, dt, expect_journey};

/// One trip each day the "sparse" service is active : the 1st and the 3rd,
/// but not the 2nd. The "anchor" trip keeps every date in the calendar.
fn sparse_model() -> BaseModel {
    ModelBuilder::default()
        .calendar("sparse", &["2020-01-01", "2020-01-03"])
        .calendar(
            "anchor",
            &["2020-01-01", "2020-01-02", "2020-01-03"],
        )
        .vj("T1", |vj| {
            vj.calendar("sparse")
                .st("A", "10:00:00", "10:00:00")
                .st("B", "10:30:00", "10:30:00");
        })
        .vj("anchor_trip", |vj| {
            vj.calendar("anchor")
                .st("E", "12:00:00", "12:00:00")
                .st("F", "12:30:00", "12:30:00");
        })
        .build()
}

#[test]
fn test_the_trip_runs_on_an_active_day() {
    let _guard = utils::init_test_logger();

    let mut config = Config::default();
    config.max_search_time_hours = 4;
    let (data, outcome) = build_and_solve(
        sparse_model(),
        &config,
        &["A"],
        &["B"],
        "2020-01-03 09:00:00",
    );
    let journey = expect_journey(outcome);
    assert_eq!(journey.first_departure(), dt("2020-01-03 10:00:00"));

    let service = data.model().service_by_id("sparse").unwrap();
    assert!(data
        .model()
        .service_runs_on(service, &dt("2020-01-03 00:00:00").date()));
    assert!(!data
        .model()
        .service_runs_on(service, &dt("2020-01-02 00:00:00").date()));
}

#[test]
fn test_the_trip_does_not_run_on_an_inactive_day() {
    let _guard = utils::init_test_logger();

    let mut config = Config::default();
    config.max_search_time_hours = 4;
    let (_, outcome) = build_and_solve(
        sparse_model(),
        &config,
        &["A"],
        &["B"],
        "2020-01-02 09:00:00",
    );
    assert!(matches!(
        outcome.unwrap(),
        SearchOutcome::NotFoundWithinHorizon
    ));
}

#[test]
fn test_a_full_day_horizon_skips_to_the_next_active_day() {
    let _guard = utils::init_test_logger();

    // searching on the inactive 2nd at 09:00 : the next run is on the 3rd
    // at 10:00, one hour past the 24h window of departures considered
    // from the origin, so nothing is found even with a generous horizon
    let mut config = Config::default();
    config.max_search_time_hours = 30;
    let (_, outcome) = build_and_solve(
        sparse_model(),
        &config,
        &["A"],
        &["B"],
        "2020-01-02 09:00:00",
    );
    assert!(matches!(
        outcome.unwrap(),
        SearchOutcome::NotFoundWithinHorizon
    ));

    // an hour later the run of the 3rd enters the window
    let (_, outcome) = build_and_solve(
        sparse_model(),
        &config,
        &["A"],
        &["B"],
        "2020-01-02 10:01:00",
    );
    let journey = expect_journey(outcome);
    assert_eq!(journey.first_departure(), dt("2020-01-03 10:00:00"));
}
