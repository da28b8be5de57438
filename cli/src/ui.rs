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

//! Interactive terminal loop : ask for an origin, a destination and a
//! departure datetime, run the search, print the journey.

use crate::stop_trie::StopTrie;
use crate::parse_datetime;

use spoj::chrono::{Datelike, NaiveDateTime, Timelike};
use spoj::tracing::info;
use spoj::{
    Config, Journey, SearchOutcome, SearchParams, Section, Solver, TransferKind, TransferSource,
    TransitData,
};

use std::io::{BufRead, Write};

pub struct Ui<'data> {
    data: &'data TransitData,
    config: &'data Config,
    stop_trie: StopTrie,
    solver: Solver,
}

impl<'data> Ui<'data> {
    pub fn new(data: &'data TransitData, config: &'data Config) -> Self {
        let stop_trie = StopTrie::from_model(data.model());
        info!("Stop name index built");
        Self {
            data,
            config,
            stop_trie,
            solver: Solver::new(),
        }
    }

    /// Run the prompt loop until the user quits or the input ends
    pub fn run(&mut self) -> Result<(), anyhow::Error> {
        println!();
        println!("spoj journey search");
        println!("-------------------");
        loop {
            println!();
            let params = match self.request_search_params()? {
                Some(params) => params,
                None => return Ok(()),
            };
            println!("Searching...");
            match self.solver.solve(self.data, &params, self.config) {
                Ok(outcome) => {
                    println!();
                    self.display_outcome(&outcome);
                }
                Err(err) => println!("Cannot search : {}", err),
            }
            println!();
            println!("[0] to quit, [Enter] or any other key to search again");
            match read_line()? {
                None => return Ok(()),
                Some(command) if command == "0" => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn request_search_params(&self) -> Result<Option<SearchParams>, anyhow::Error> {
        loop {
            let (origin_name, origin_ids) = match self.ask_for_stop("Origin stop: ")? {
                Some(choice) => choice,
                None => return Ok(None),
            };
            let (destination_name, destination_ids) =
                match self.ask_for_stop("Destination stop: ")? {
                    Some(choice) => choice,
                    None => return Ok(None),
                };
            let departure_datetime = match self.ask_for_datetime()? {
                Some(datetime) => datetime,
                None => return Ok(None),
            };
            println!("Search journey:");
            println!("\t{} -> {}", origin_name, destination_name);
            println!("\tDeparture: {}", format_datetime(&departure_datetime));
            println!("[Enter] to confirm, [0] to start over");
            match read_line()? {
                None => return Ok(None),
                Some(command) if command.is_empty() => {
                    return Ok(Some(SearchParams {
                        origin_stop_ids: origin_ids,
                        destination_stop_ids: destination_ids,
                        departure_datetime,
                    }))
                }
                Some(command) if command == "0" => {}
                Some(_) => println!("Unknown command. Starting over."),
            }
        }
    }

    /// Ask for a stop name prefix and disambiguate between the matching
    /// names. Returns the chosen name with all the stop ids bearing it.
    fn ask_for_stop(&self, prompt: &str) -> Result<Option<(String, Vec<String>)>, anyhow::Error> {
        loop {
            print!("{}", prompt);
            std::io::stdout().flush()?;
            let prefix = match read_line()? {
                Some(prefix) => prefix,
                None => return Ok(None),
            };
            // only the first 9 matches are offered
            let options: Vec<(&str, &[String])> = self
                .stop_trie
                .search_by_prefix(&prefix)
                .into_iter()
                .take(9)
                .collect();

            match options.len() {
                0 => {
                    println!("No stop found. Try again.");
                }
                1 => {
                    let (name, ids) = options[0];
                    println!("Found stop: {}", name);
                    println!("[Enter] to confirm, [0] to search again");
                    match read_line()? {
                        None => return Ok(None),
                        Some(command) if command.is_empty() => {
                            return Ok(Some((name.to_string(), ids.to_vec())))
                        }
                        Some(command) if command == "0" => {}
                        Some(_) => println!("Unknown command. Try again."),
                    }
                }
                _ => {
                    println!("Pick one:");
                    for (number, (name, _)) in options.iter().copied().enumerate() {
                        println!("[{}] {}", number + 1, name);
                    }
                    println!("[0] to search again");
                    match read_line()? {
                        None => return Ok(None),
                        Some(command) if command == "0" => {}
                        Some(command) => match command.parse::<usize>() {
                            Ok(number) if (1..=options.len()).contains(&number) => {
                                let (name, ids) = options[number - 1];
                                return Ok(Some((name.to_string(), ids.to_vec())));
                            }
                            _ => println!("Unknown command. Try again."),
                        },
                    }
                }
            }
        }
    }

    fn ask_for_datetime(&self) -> Result<Option<NaiveDateTime>, anyhow::Error> {
        loop {
            print!("Departure date and time (e.g. '14. 3. 2025 12:34'): ");
            std::io::stdout().flush()?;
            let text = match read_line()? {
                Some(text) => text,
                None => return Ok(None),
            };
            match parse_datetime(&text) {
                Ok(datetime) => return Ok(Some(datetime)),
                Err(err) => println!("{} Try again.", err),
            }
        }
    }

    fn display_outcome(&self, outcome: &SearchOutcome) {
        match outcome {
            SearchOutcome::OriginEqualsDestination => {
                println!("The origin and destination stops are the same.");
            }
            SearchOutcome::NotFoundWithinHorizon => {
                println!("No journey was found between these stops.");
            }
            SearchOutcome::Found(journey) => self.display_journey(journey),
        }
    }

    fn display_journey(&self, journey: &Journey) {
        let transfers = journey.nb_of_transfers();
        let transfers_text = match transfers {
            0 => "no transfer".to_string(),
            1 => "1 transfer".to_string(),
            n => format!("{} transfers", n),
        };
        println!(
            "Journey: {}, total {}",
            transfers_text,
            journey.total_duration()
        );

        let model = self.data.model();
        for section in &journey.sections {
            match section {
                Section::Vehicle(section) => {
                    let route = model.route_of(section.trip);
                    println!(
                        "\t{} {}",
                        model.route_type(route),
                        model.trip_name(section.trip)
                    );
                    println!(
                        "\t\t{} {}",
                        format_datetime(&section.from_datetime),
                        self.stop_display_name(section.from_stop)
                    );
                    println!(
                        "\t\t{} {}",
                        format_datetime(&section.to_datetime),
                        self.stop_display_name(section.to_stop)
                    );
                }
                Section::Transfer(section) => {
                    let seconds = (section.to_datetime - section.from_datetime).num_seconds();
                    match section.source {
                        TransferSource::SameStop => {
                            println!("\tWait at the stop");
                        }
                        TransferSource::Recorded(record_idx) => {
                            let kind = model.transfers()[record_idx].kind;
                            match kind {
                                TransferKind::Guaranteed => {
                                    println!("\tWalk: guaranteed transfer");
                                }
                                _ => println!("\tWalk: {}", format_walk_duration(seconds)),
                            }
                        }
                        TransferSource::NodeGroup | TransferSource::ParentStation => {
                            println!("\tWalk: {}", format_walk_duration(seconds));
                        }
                    }
                }
            }
        }
    }

    fn stop_display_name(&self, stop: spoj::Stop) -> String {
        let model = self.data.model();
        match model.stop_name(stop) {
            Some(name) => name.to_string(),
            None => model.stop_id(stop).to_string(),
        }
    }
}

fn format_datetime(datetime: &NaiveDateTime) -> String {
    format!(
        "{}. {}. {} {}:{:02}",
        datetime.day(),
        datetime.month(),
        datetime.year(),
        datetime.hour(),
        datetime.minute()
    )
}

fn format_walk_duration(seconds: i64) -> String {
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    match (minutes, seconds) {
        (0, 0) => "right there".to_string(),
        (0, s) => format!("about {} s", s),
        (m, 0) => format!("about {} min", m),
        (m, s) => format!("about {} min {} s", m, s),
    }
}

/// Read one line from stdin, trimmed. None on end of input.
fn read_line() -> Result<Option<String>, std::io::Error> {
    let mut line = String::new();
    let nb_of_bytes = std::io::stdin().lock().read_line(&mut line)?;
    if nb_of_bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
