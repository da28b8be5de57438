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

use spoj::{Config, PositiveDuration, SearchOutcome, TransferMode};
use utils::model_builder::ModelBuilder;
use utils::{build_and_solve, dt, expect_journey, transfer_sections};

/// T1 rides A -> B -> C, T2 rides B2 -> D. Whether B and B2 are walkable
/// depends on the transfer mode under test.
fn two_platform_model() -> ModelBuilder {
    ModelBuilder::default()
        .calendar("service1", &["2020-01-01"])
        .vj("T1", |vj| {
            vj.calendar("service1")
                .st("A", "10:00:00", "10:00:00")
                .st("B", "10:05:00", "10:05:00")
                .st("C", "10:15:00", "10:15:00");
        })
        .vj("T2", |vj| {
            vj.calendar("service1")
                .st("B2", "10:10:00", "10:10:00")
                .st("D", "10:20:00", "10:20:00");
        })
}

fn config_for(mode: TransferMode, min_transfer_seconds: u32) -> Config {
    let mut config = Config::default();
    config.transfer_mode = mode;
    config.min_transfer_time = PositiveDuration::from_seconds(min_transfer_seconds);
    config.max_search_time_hours = 4;
    config
}

#[test]
fn test_by_parent_station_walks_between_siblings() {
    let _guard = utils::init_test_logger();

    let model = two_platform_model()
        .stop("B", |stop| stop.parent_station = Some("SB".to_string()))
        .stop("B2", |stop| stop.parent_station = Some("SB".to_string()))
        .build();

    let (data, outcome) = build_and_solve(
        model,
        &config_for(TransferMode::ByParentStation, 60),
        &["A"],
        &["D"],
        "2020-01-01 09:30:00",
    );
    let journey = expect_journey(outcome);

    let walks = transfer_sections(&journey);
    assert_eq!(walks.len(), 1);
    assert_eq!(data.model().stop_id(walks[0].from_stop), "B");
    assert_eq!(data.model().stop_id(walks[0].to_stop), "B2");
    assert_eq!(journey.last_arrival(), dt("2020-01-01 10:20:00"));
}

#[test]
fn test_by_transfers_txt_uses_the_recorded_minimum_when_larger() {
    let _guard = utils::init_test_logger();

    let model = two_platform_model().add_transfer("B", "B2", 120).build();

    // the configured minimum (60s) is below the recorded one (120s) :
    // the walk takes 120s
    let (_, outcome) = build_and_solve(
        model,
        &config_for(TransferMode::ByTransfersTxt, 60),
        &["A"],
        &["D"],
        "2020-01-01 09:30:00",
    );
    let journey = expect_journey(outcome);
    let walks = transfer_sections(&journey);
    assert_eq!(walks[0].from_datetime, dt("2020-01-01 10:05:00"));
    assert_eq!(walks[0].to_datetime, dt("2020-01-01 10:07:00"));
}

#[test]
fn test_by_transfers_txt_uses_the_configured_minimum_when_larger() {
    let _guard = utils::init_test_logger();

    let model = two_platform_model().add_transfer("B", "B2", 120).build();

    // the configured minimum (240s) overrides the recorded 120s
    let (_, outcome) = build_and_solve(
        model,
        &config_for(TransferMode::ByTransfersTxt, 240),
        &["A"],
        &["D"],
        "2020-01-01 09:30:00",
    );
    let journey = expect_journey(outcome);
    let walks = transfer_sections(&journey);
    assert_eq!(walks[0].to_datetime, dt("2020-01-01 10:09:00"));
}

#[test]
fn test_by_transfers_txt_records_are_directed() {
    let _guard = utils::init_test_logger();

    // only B -> B2 is recorded ; a journey needing B2 -> B finds nothing
    let model = ModelBuilder::default()
        .calendar("service1", &["2020-01-01"])
        .add_transfer("B", "B2", 60)
        .vj("T3", |vj| {
            vj.calendar("service1")
                .st("B", "10:30:00", "10:30:00")
                .st("A", "10:40:00", "10:40:00");
        })
        .build();

    let (_, outcome) = build_and_solve(
        model,
        &config_for(TransferMode::ByTransfersTxt, 60),
        &["B2"],
        &["A"],
        "2020-01-01 10:00:00",
    );
    assert!(matches!(
        outcome.unwrap(),
        SearchOutcome::NotFoundWithinHorizon
    ));
}

#[test]
fn test_mode_none_never_walks_between_stops() {
    let _guard = utils::init_test_logger();

    let model = two_platform_model()
        .stop("B", |stop| {
            stop.parent_station = Some("SB".to_string());
            stop.node_id = Some("node_b".to_string());
        })
        .stop("B2", |stop| {
            stop.parent_station = Some("SB".to_string());
            stop.node_id = Some("node_b".to_string());
        })
        .build();

    let (_, outcome) = build_and_solve(
        model,
        &config_for(TransferMode::None, 60),
        &["A"],
        &["D"],
        "2020-01-01 09:30:00",
    );
    assert!(matches!(
        outcome.unwrap(),
        SearchOutcome::NotFoundWithinHorizon
    ));
}
