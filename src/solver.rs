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

use crate::config::Config;
use crate::engine::search::{EventSearch, SearchStatus};
use crate::request::{BadRequest, Request, SearchParams};
use crate::response::{Journey, SearchOutcome};
use crate::transit_data::TransitData;

use std::time::SystemTime;
use tracing::{debug, info};

/// Runs queries against an immutable [`TransitData`], reusing the engine
/// allocations between queries
pub struct Solver {
    engine: EventSearch,
}

impl Solver {
    pub fn new() -> Self {
        Self {
            engine: EventSearch::new(),
        }
    }

    pub fn solve(
        &mut self,
        data: &TransitData,
        params: &SearchParams,
        config: &Config,
    ) -> Result<SearchOutcome, BadRequest> {
        let request = Request::new(data, params, config.horizon())?;

        debug!("Start computing journey");
        let request_timer = SystemTime::now();
        let status = self.engine.compute(data, &request);
        let elapsed_ms = request_timer.elapsed().unwrap().as_millis();
        if config.profile {
            info!(
                "Journey computed in {} ms : {} events popped, {} visitors pushed, \
                journey tree size {}",
                elapsed_ms,
                self.engine.nb_of_popped_events(),
                self.engine.nb_of_pushed_visitors(),
                self.engine.tree_size()
            );
        } else {
            debug!("Journey computed in {} ms", elapsed_ms);
        }

        let outcome = match status {
            SearchStatus::Found => {
                // unwrap is safe : Found means a destination has a record
                let reached = self.engine.best_destination(&request.destinations).unwrap();
                let journey = Journey::reconstruct(self.engine.tree(), reached, data);
                SearchOutcome::Found(journey)
            }
            SearchStatus::NotFoundWithinHorizon => SearchOutcome::NotFoundWithinHorizon,
            SearchStatus::OriginEqualsDestination => SearchOutcome::OriginEqualsDestination,
        };
        Ok(outcome)
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}
