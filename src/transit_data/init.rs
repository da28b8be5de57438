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

use super::{StopDeparture, StopSchedule, TransferEdge, TransferSource, TransitData};
use crate::config::{Config, TransferMode};
use crate::models::{BaseModel, Stop};
use crate::time::days_patterns::{DaysPattern, DaysPatterns};
use crate::time::{Calendar, PositiveDuration, MAX_DAYS_IN_CALENDAR};

use chrono::NaiveDate;
use std::cmp::max;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use tracing::debug;

impl TransitData {
    /// Build the engine-ready index from a loaded model.
    /// This happens once at startup ; the result is immutable.
    pub fn new(model: BaseModel, config: &Config) -> Result<Self, BadDataset> {
        let calendar = build_calendar(&model)?;

        let mut days_patterns = DaysPatterns::new(calendar.nb_of_days() as usize);
        let mut service_patterns: Vec<Option<DaysPattern>> = vec![None; model.nb_of_services()];
        let mut trip_days: Vec<DaysPattern> = Vec::with_capacity(model.nb_of_trips());
        for trip in model.trips() {
            let service = model.service_of(trip);
            let pattern = match service_patterns[service.idx] {
                Some(pattern) => pattern,
                None => {
                    let dates = &model.service_data(service).dates;
                    let pattern = days_patterns.get_or_insert(dates.iter(), &calendar);
                    service_patterns[service.idx] = Some(pattern);
                    pattern
                }
            };
            trip_days.push(pattern);
        }

        let mut stop_schedules: Vec<StopSchedule> = (0..model.nb_of_stops())
            .map(|_| StopSchedule {
                departures: Vec::new(),
                transfers: Vec::new(),
            })
            .collect();

        for trip in model.trips() {
            for (stoptime_idx, stop_time) in model.stop_times_of(trip).iter().enumerate() {
                if !stop_time.flow.allows_board() {
                    continue;
                }
                stop_schedules[stop_time.stop.idx]
                    .departures
                    .push(StopDeparture {
                        trip,
                        stoptime_idx,
                        time_in_day: stop_time.departure.time_in_day(),
                        day_shift: stop_time.departure.day_shift(),
                    });
            }
        }
        for schedule in stop_schedules.iter_mut() {
            schedule
                .departures
                .sort_by_key(|dep| (dep.time_in_day, dep.trip.idx, dep.stoptime_idx));
        }

        build_transfers(&model, config, &mut stop_schedules);

        let nb_of_departures: usize = stop_schedules
            .iter()
            .map(|schedule| schedule.departures.len())
            .sum();
        let nb_of_transfers: usize = stop_schedules
            .iter()
            .map(|schedule| schedule.transfers.len())
            .sum();
        debug!(
            "Transit data built : {} boardable departures, {} walking edges",
            nb_of_departures, nb_of_transfers
        );

        Ok(Self {
            model,
            calendar,
            days_patterns,
            trip_days,
            stop_schedules,
        })
    }
}

fn build_calendar(model: &BaseModel) -> Result<Calendar, BadDataset> {
    let mut first_date: Option<NaiveDate> = None;
    let mut last_date: Option<NaiveDate> = None;
    for trip in model.trips() {
        let service_data = model.service_data(model.service_of(trip));
        if let (Some(first), Some(last)) =
            (service_data.dates.iter().next(), service_data.dates.iter().last())
        {
            first_date = Some(first_date.map_or(*first, |date| date.min(*first)));
            last_date = Some(last_date.map_or(*last, |date| date.max(*last)));
        }
    }
    let (first_date, last_date) = match (first_date, last_date) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(BadDataset::NoCalendarDates),
    };
    let nb_of_days = (last_date - first_date).num_days() + 1;
    if nb_of_days >= i64::from(MAX_DAYS_IN_CALENDAR) {
        return Err(BadDataset::CalendarTooLarge { nb_of_days });
    }
    Ok(Calendar::new(first_date, last_date))
}

fn build_transfers(model: &BaseModel, config: &Config, stop_schedules: &mut [StopSchedule]) {
    // waiting at a stop is always possible : boarding another trip at the
    // same stop is modelled as a zero-cost transfer
    for (idx, schedule) in stop_schedules.iter_mut().enumerate() {
        schedule.transfers.push(TransferEdge {
            to_stop: Stop { idx },
            duration: PositiveDuration::zero(),
            source: TransferSource::SameStop,
        });
    }

    match config.transfer_mode {
        TransferMode::ByNodeId => {
            let groups = group_stops_by(model, |stop| model.stop_data(stop).node_id.as_deref());
            insert_group_edges(
                groups,
                config.min_transfer_time,
                TransferSource::NodeGroup,
                stop_schedules,
            );
        }
        TransferMode::ByParentStation => {
            let groups =
                group_stops_by(model, |stop| model.stop_data(stop).parent_station.as_deref());
            insert_group_edges(
                groups,
                config.min_transfer_time,
                TransferSource::ParentStation,
                stop_schedules,
            );
        }
        TransferMode::ByTransfersTxt => {
            for (record_idx, transfer) in model.transfers().iter().enumerate() {
                let duration = max(
                    transfer.min_transfer_time.unwrap_or(config.min_transfer_time),
                    config.min_transfer_time,
                );
                stop_schedules[transfer.from_stop.idx]
                    .transfers
                    .push(TransferEdge {
                        to_stop: transfer.to_stop,
                        duration,
                        source: TransferSource::Recorded(record_idx),
                    });
            }
        }
        TransferMode::None => {}
    }

    for schedule in stop_schedules.iter_mut() {
        schedule
            .transfers
            .sort_by_key(|edge| (edge.duration, edge.to_stop.idx));
    }
}

fn group_stops_by<'a, Key>(model: &'a BaseModel, key: Key) -> HashMap<&'a str, Vec<Stop>>
where
    Key: Fn(Stop) -> Option<&'a str>,
{
    let mut groups: HashMap<&str, Vec<Stop>> = HashMap::new();
    for stop in model.stops() {
        if let Some(group_key) = key(stop) {
            groups.entry(group_key).or_default().push(stop);
        }
    }
    groups
}

fn insert_group_edges(
    groups: HashMap<&str, Vec<Stop>>,
    min_transfer_time: PositiveDuration,
    source: TransferSource,
    stop_schedules: &mut [StopSchedule],
) {
    for members in groups.values() {
        for from_stop in members {
            for to_stop in members {
                if from_stop == to_stop {
                    continue;
                }
                stop_schedules[from_stop.idx].transfers.push(TransferEdge {
                    to_stop: *to_stop,
                    duration: min_transfer_time,
                    source,
                });
            }
        }
    }
}

#[derive(Debug)]
pub enum BadDataset {
    /// no service is active on any date, so no calendar can be built
    NoCalendarDates,
    CalendarTooLarge { nb_of_days: i64 },
}

impl std::error::Error for BadDataset {}

impl Display for BadDataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BadDataset::NoCalendarDates => write!(
                f,
                "The dataset has no active service date. Nothing can be scheduled."
            ),
            BadDataset::CalendarTooLarge { nb_of_days } => write!(
                f,
                "The dataset calendar spans {} days, which is more than the maximum allowed of {}",
                nb_of_days, MAX_DAYS_IN_CALENDAR
            ),
        }
    }
}
