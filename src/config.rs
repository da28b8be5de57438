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

use crate::time::PositiveDuration;
use serde::Deserialize;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_MAX_SEARCH_TIME_HOURS: u32 = 24;
pub const DEFAULT_MIN_TRANSFER_TIME_SECONDS: u32 = 180;

/// Runtime configuration, read from the environment and/or command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// directory containing the gtfs dataset
    pub dataset_path: PathBuf,

    /// the search gives up on journeys arriving more than this many hours
    /// after the requested departure.
    /// Values above 24 are accepted but correctness is not guaranteed.
    pub max_search_time_hours: u32,

    /// how walking transfers between stops are materialised
    pub transfer_mode: TransferMode,

    /// name of the stops.txt column carrying the transfer node,
    /// used (and required) in `by_node_id` mode
    pub transfer_node_id: Option<String>,

    /// lower bound applied to every walking transfer
    pub min_transfer_time: PositiveDuration,

    /// log search timings and engine counters after every query
    pub profile: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data"),
            max_search_time_hours: DEFAULT_MAX_SEARCH_TIME_HOURS,
            transfer_mode: TransferMode::default(),
            transfer_node_id: None,
            min_transfer_time: PositiveDuration::from_seconds(
                DEFAULT_MIN_TRANSFER_TIME_SECONDS,
            ),
            profile: false,
        }
    }
}

impl Config {
    /// Build a configuration for the given dataset directory, with every
    /// other key read from its environment variable when set.
    pub fn from_env(dataset_path: PathBuf) -> Self {
        let defaults = Config::default();
        let max_search_time_hours = parse_env_var(
            "MAX_SEARCH_TIME_HOURS",
            defaults.max_search_time_hours,
            str::parse,
        );
        let transfer_mode = parse_env_var("TRANSFER_MODE", defaults.transfer_mode, str::parse);
        let transfer_node_id = match std::env::var("TRANSFER_NODE_ID") {
            Ok(name) if !name.is_empty() => Some(name),
            _ => None,
        };
        let min_transfer_time = parse_env_var(
            "MIN_TRANSFER_TIME_SECONDS",
            defaults.min_transfer_time,
            |s| s.parse::<u32>().map(PositiveDuration::from_seconds),
        );
        let profile = parse_env_var("PROFILE", false, str::parse);
        Self {
            dataset_path,
            max_search_time_hours,
            transfer_mode,
            transfer_node_id,
            min_transfer_time,
            profile,
        }
    }

    pub fn horizon(&self) -> PositiveDuration {
        PositiveDuration::from_hms(self.max_search_time_hours, 0, 0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transfer_mode == TransferMode::ByNodeId && self.transfer_node_id.is_none() {
            return Err(ConfigError::MissingTransferNodeId);
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    ByNodeId,
    ByParentStation,
    ByTransfersTxt,
    None,
}

impl Default for TransferMode {
    fn default() -> Self {
        TransferMode::None
    }
}

impl std::str::FromStr for TransferMode {
    type Err = TransferModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use TransferMode::*;
        let mode = match s {
            "by_node_id" => ByNodeId,
            "by_parent_station" => ByParentStation,
            "by_transfers_txt" => ByTransfersTxt,
            "none" => None,
            _ => {
                return Err(TransferModeError {
                    mode_name: s.to_string(),
                })
            }
        };
        Ok(mode)
    }
}

impl Display for TransferMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use TransferMode::*;
        match self {
            ByNodeId => write!(f, "by_node_id"),
            ByParentStation => write!(f, "by_parent_station"),
            ByTransfersTxt => write!(f, "by_transfers_txt"),
            None => write!(f, "none"),
        }
    }
}

#[derive(Debug)]
pub struct TransferModeError {
    mode_name: String,
}

impl std::error::Error for TransferModeError {}

impl Display for TransferModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bad transfer_mode given : `{}`. Expected one of \
            by_node_id, by_parent_station, by_transfers_txt, none.",
            self.mode_name
        )
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingTransferNodeId,
}

impl std::error::Error for ConfigError {}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingTransferNodeId => write!(
                f,
                "The transfer_mode is `by_node_id` but no transfer_node_id column is configured."
            ),
        }
    }
}

// - var not set -> use default value
// - var set but non-unicode -> warn and use default value
// - var set but not parsable -> warn and use default value
pub fn parse_env_var<T, Parser, ParseErr>(var_name: &str, default_value: T, parser: Parser) -> T
where
    Parser: Fn(&str) -> Result<T, ParseErr>,
    ParseErr: Display,
    T: Debug,
{
    match std::env::var(var_name) {
        Ok(s) => match parser(&s) {
            Ok(val) => val,
            Err(err) => {
                warn!(
                    "Could not parse env var {} : {}. I'll use the default value '{:?}' instead",
                    var_name, err, default_value
                );
                default_value
            }
        },
        Err(std::env::VarError::NotPresent) => default_value,
        Err(std::env::VarError::NotUnicode(err)) => {
            warn!(
                "Badly formed env var {} : {:?}. I'll use the default value {:?} instead",
                var_name, err, default_value
            );
            default_value
        }
    }
}
