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

use spoj::chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use spoj::tracing::info;
use spoj::{Config, TransferMode, TransitData};

use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::SystemTime;
use structopt::StructOpt;

pub mod stop_trie;
pub mod ui;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "spoj",
    about = "Search earliest-arrival journeys over a gtfs dataset.",
    rename_all = "snake_case"
)]
pub struct Options {
    /// directory of gtfs files to load
    #[structopt(short = "d", long = "dataset", parse(from_os_str))]
    pub dataset_path: PathBuf,

    /// search horizon in hours.
    /// Values above 24 are accepted but not guaranteed correct.
    #[structopt(long)]
    pub max_search_time_hours: Option<u32>,

    /// how transfers between stops are realized :
    /// "by_node_id", "by_parent_station", "by_transfers_txt" or "none"
    #[structopt(long)]
    pub transfer_mode: Option<TransferMode>,

    /// name of the stops.txt column grouping stops into transfer nodes,
    /// required with by_node_id
    #[structopt(long)]
    pub transfer_node_id: Option<String>,

    /// minimum time needed for a transfer between two stops, in seconds
    #[structopt(long)]
    pub min_transfer_time_seconds: Option<u32>,

    /// log search timings and engine counters after every query
    #[structopt(long)]
    pub profile: bool,
}

/// Read the configuration from the environment, then apply the command
/// line overrides
pub fn make_config(options: &Options) -> Config {
    let mut config = Config::from_env(options.dataset_path.clone());
    if let Some(hours) = options.max_search_time_hours {
        config.max_search_time_hours = hours;
    }
    if let Some(transfer_mode) = options.transfer_mode {
        config.transfer_mode = transfer_mode;
    }
    if let Some(column) = &options.transfer_node_id {
        config.transfer_node_id = Some(column.clone());
    }
    if let Some(seconds) = options.min_transfer_time_seconds {
        config.min_transfer_time = spoj::PositiveDuration::from_seconds(seconds);
    }
    if options.profile {
        config.profile = true;
    }
    config
}

/// Load the dataset and build the transit data, logging progress
pub fn build(config: &Config) -> Result<TransitData, anyhow::Error> {
    let load_timer = SystemTime::now();
    let model = spoj::gtfs::read(&config.dataset_path, config)?;
    info!(
        "Dataset loaded in {} ms",
        load_timer.elapsed().unwrap().as_millis()
    );
    info!("Number of stops : {}", model.nb_of_stops());
    info!("Number of routes : {}", model.nb_of_routes());
    info!("Number of trips : {}", model.nb_of_trips());

    let data_timer = SystemTime::now();
    let data = TransitData::new(model, config)?;
    info!(
        "Transit data constructed in {} ms",
        data_timer.elapsed().unwrap().as_millis()
    );
    info!(
        "Validity dates between {} and {}",
        data.calendar().first_date(),
        data.calendar().last_date()
    );
    Ok(data)
}

const DATETIME_FORMATS: [&str; 10] = [
    "%d. %m. %Y %H:%M:%S",
    "%d. %m. %Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%d. %m. %Y", "%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Parse a datetime written in one of the common European day-first forms,
/// e.g. "14. 3. 2025 12:34". A date alone means midnight.
pub fn parse_datetime(text: &str) -> Result<NaiveDateTime, BadDateTime> {
    let trimmed = text.trim();
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    Err(BadDateTime {
        text: trimmed.to_string(),
    })
}

#[derive(Debug)]
pub struct BadDateTime {
    text: String,
}

impl std::error::Error for BadDateTime {}

impl Display for BadDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unable to parse `{}` as a datetime. Expected something like '14. 3. 2025 12:34'",
            self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_first_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(12, 34, 0)
            .unwrap();
        assert_eq!(parse_datetime("14. 3. 2025 12:34").unwrap(), expected);
        assert_eq!(parse_datetime("14.3.2025 12:34").unwrap(), expected);
        assert_eq!(parse_datetime("14/03/2025 12:34").unwrap(), expected);
        assert_eq!(parse_datetime("2025-03-14 12:34").unwrap(), expected);
    }

    #[test]
    fn date_alone_means_midnight() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_datetime("14. 3. 2025").unwrap(), expected);
    }

    #[test]
    fn nonsense_is_rejected() {
        assert!(parse_datetime("next tuesday").is_err());
        assert!(parse_datetime("").is_err());
    }
}
