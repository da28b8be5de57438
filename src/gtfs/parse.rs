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

//! Field-level parsers for the gtfs CSV files.

use crate::models::{FlowDirection, LocationType, RouteType, TransferKind};
use chrono::NaiveDate;

#[derive(Debug)]
pub(super) enum RouteTypeError {
    /// a known extended value that this engine does not support
    NotSupported(u16),
    /// not a value of the classic or supported extended sets
    Invalid(String),
}

/// Parse a routes.route_type field.
/// All classic values are supported, along with some (but not all) values
/// from the Google Transit extension.
pub(super) fn route_type(field: &str) -> Result<RouteType, RouteTypeError> {
    let value: u16 = field
        .parse()
        .map_err(|_| RouteTypeError::Invalid(field.to_string()))?;
    let route_type = match value {
        0 | 900..=906 => RouteType::TramOrLightRail,
        1 | 400..=404 => RouteType::MetroOrSubway,
        2 | 100..=117 => RouteType::Rail,
        3 | 200..=209 | 700..=716 => RouteType::Bus,
        4 | 1000 | 1200 => RouteType::Ferry,
        5 => RouteType::CableTram,
        6 | 1300..=1307 => RouteType::AerialLift,
        7 | 1400 => RouteType::Funicular,
        11 | 800 => RouteType::Trolleybus,
        12 | 405 => RouteType::Monorail,
        1100 | 1700 | 1702 | 1500..=1507 => return Err(RouteTypeError::NotSupported(value)),
        _ => return Err(RouteTypeError::Invalid(field.to_string())),
    };
    Ok(route_type)
}

/// Parse a stops.location_type field
pub(super) fn location_type(field: &str) -> Result<LocationType, String> {
    let location_type = match field {
        "0" | "" => LocationType::StopOrPlatform,
        "1" => LocationType::Station,
        "2" => LocationType::EntranceOrExit,
        "3" => LocationType::GenericNode,
        "4" => LocationType::BoardingArea,
        _ => return Err(format!("`{}` is not a valid location_type", field)),
    };
    Ok(location_type)
}

/// Parse a date in YYYYMMDD format
pub(super) fn date(field: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(field, "%Y%m%d")
        .map_err(|_| format!("`{}` is not a date in YYYYMMDD format", field))
}

/// Parse a calendar weekday flag (0 or 1)
pub(super) fn bool01(field: &str) -> Result<bool, String> {
    match field {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(format!("`{}` is not a valid flag, expected 0 or 1", field)),
    }
}

fn pickup_dropoff_available(field: Option<&str>, name: &str) -> Result<bool, String> {
    match field {
        None | Some("0") => Ok(true),
        // passengers must phone the agency or coordinate with the driver,
        // but boarding/alighting remains possible
        Some("2") | Some("3") => Ok(true),
        Some("1") => Ok(false),
        Some(other) => Err(format!("`{}` is not a valid {}", other, name)),
    }
}

/// Combine the pickup_type and drop_off_type fields of a stop_time
pub(super) fn flow(
    pickup_type: Option<&str>,
    drop_off_type: Option<&str>,
) -> Result<FlowDirection, String> {
    let can_board = pickup_dropoff_available(pickup_type, "pickup_type")?;
    let can_debark = pickup_dropoff_available(drop_off_type, "drop_off_type")?;
    let flow = match (can_board, can_debark) {
        (true, true) => FlowDirection::BoardAndDebark,
        (true, false) => FlowDirection::BoardOnly,
        (false, true) => FlowDirection::DebarkOnly,
        (false, false) => FlowDirection::NoBoardDebark,
    };
    Ok(flow)
}

/// Parse a transfers.transfer_type field
pub(super) fn transfer_kind(field: Option<&str>) -> Result<TransferKind, String> {
    let kind = match field {
        None | Some("0") => TransferKind::Recommended,
        Some("1") => TransferKind::Guaranteed,
        Some("2") => TransferKind::RequiresMinimumTime,
        Some("3") => TransferKind::NotPossible,
        Some("4") => TransferKind::InSeat,
        Some("5") => TransferKind::Reboard,
        Some(other) => return Err(format!("`{}` is not a valid transfer_type", other)),
    };
    Ok(kind)
}
