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

use crate::models::Stop;
use crate::time::{PositiveDuration, SecondsSinceDatasetStart};
use crate::transit_data::TransitData;

use chrono::NaiveDateTime;
use std::fmt::{Display, Formatter};

/// What the caller asks for : where to start, where to go, when to leave.
///
/// Several stop ids may be given on each side, typically all the stops
/// bearing the name the user picked.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub origin_stop_ids: Vec<String>,
    pub destination_stop_ids: Vec<String>,
    pub departure_datetime: NaiveDateTime,
}

/// A validated query, with stop ids resolved to handles and the departure
/// converted to an instant of the dataset calendar
pub(crate) struct Request {
    pub(crate) origins: Vec<Stop>,
    pub(crate) destinations: Vec<Stop>,
    pub(crate) departure: SecondsSinceDatasetStart,
    pub(crate) max_arrival: SecondsSinceDatasetStart,
}

impl Request {
    pub(crate) fn new(
        data: &TransitData,
        params: &SearchParams,
        horizon: PositiveDuration,
    ) -> Result<Self, BadRequest> {
        if params.origin_stop_ids.is_empty() {
            return Err(BadRequest::NoOriginStop);
        }
        if params.destination_stop_ids.is_empty() {
            return Err(BadRequest::NoDestinationStop);
        }

        let model = data.model();
        let origins = params
            .origin_stop_ids
            .iter()
            .map(|stop_id| {
                model
                    .stop_by_id(stop_id)
                    .ok_or_else(|| BadRequest::UnknownOriginStop(stop_id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let destinations = params
            .destination_stop_ids
            .iter()
            .map(|stop_id| {
                model
                    .stop_by_id(stop_id)
                    .ok_or_else(|| BadRequest::UnknownDestinationStop(stop_id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let departure = data
            .calendar()
            .from_naive_datetime(&params.departure_datetime)
            .ok_or_else(|| BadRequest::DepartureDatetime {
                datetime: params.departure_datetime,
                first_date: *data.calendar().first_date(),
                last_date: *data.calendar().last_date(),
            })?;

        Ok(Self {
            origins,
            destinations,
            departure,
            max_arrival: departure + horizon,
        })
    }
}

#[derive(Debug)]
pub enum BadRequest {
    NoOriginStop,
    NoDestinationStop,
    UnknownOriginStop(String),
    UnknownDestinationStop(String),
    DepartureDatetime {
        datetime: NaiveDateTime,
        first_date: chrono::NaiveDate,
        last_date: chrono::NaiveDate,
    },
}

impl std::error::Error for BadRequest {}

impl Display for BadRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BadRequest::NoOriginStop => {
                write!(f, "No origin stop was given.")
            }
            BadRequest::NoDestinationStop => {
                write!(f, "No destination stop was given.")
            }
            BadRequest::UnknownOriginStop(stop_id) => {
                write!(f, "The origin stop `{}` is not in the dataset.", stop_id)
            }
            BadRequest::UnknownDestinationStop(stop_id) => {
                write!(
                    f,
                    "The destination stop `{}` is not in the dataset.",
                    stop_id
                )
            }
            BadRequest::DepartureDatetime {
                datetime,
                first_date,
                last_date,
            } => write!(
                f,
                "The departure datetime {} is outside the dataset dates. \
                Allowed dates are between {} and {}.",
                datetime, first_date, last_date
            ),
        }
    }
}
