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

//! Prefix index over stop names, for interactive autocompletion.
//! Lookup is case-insensitive and folds the diacritics common in
//! central-European stop names.

use spoj::{BaseModel, LocationType};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct TrieNode {
    /// full stop names ending here, each with all the stop ids bearing
    /// that name
    stops: BTreeMap<String, Vec<String>>,
    children: BTreeMap<char, TrieNode>,
}

#[derive(Debug, Default)]
pub struct StopTrie {
    root: TrieNode,
}

impl StopTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every named stop or platform of the model
    pub fn from_model(model: &BaseModel) -> Self {
        let mut trie = Self::new();
        for stop in model.stops() {
            let stop_data = model.stop_data(stop);
            if stop_data.location_type != LocationType::StopOrPlatform {
                continue;
            }
            if let Some(name) = &stop_data.name {
                trie.add_stop(name, &stop_data.id);
            }
        }
        trie
    }

    pub fn add_stop(&mut self, stop_name: &str, stop_id: &str) {
        let mut node = &mut self.root;
        for letter in stop_name.chars() {
            let letter = fold_letter(letter);
            node = node.children.entry(letter).or_default();
        }
        node.stops
            .entry(stop_name.to_string())
            .or_default()
            .push(stop_id.to_string());
    }

    /// All stops whose name starts with `prefix`, as (name, stop ids)
    /// pairs in deterministic order
    pub fn search_by_prefix(&self, prefix: &str) -> Vec<(&str, &[String])> {
        let mut node = &self.root;
        for letter in prefix.chars() {
            let letter = fold_letter(letter);
            match node.children.get(&letter) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }
        let mut results = Vec::new();
        collect_stops(node, &mut results);
        results
    }
}

fn collect_stops<'trie>(node: &'trie TrieNode, results: &mut Vec<(&'trie str, &'trie [String])>) {
    for (name, ids) in &node.stops {
        results.push((name.as_str(), ids.as_slice()));
    }
    for child in node.children.values() {
        collect_stops(child, results);
    }
}

/// Map a letter to its canonical form : lowercase, with the diacritics of
/// czech and neighbouring languages removed
fn fold_letter(letter: char) -> char {
    let letter = letter.to_lowercase().next().unwrap_or(letter);
    match letter {
        'á' | 'ä' => 'a',
        'č' => 'c',
        'ď' => 'd',
        'é' | 'ě' | 'ë' => 'e',
        'í' => 'i',
        'ľ' => 'l',
        'ň' => 'n',
        'ó' | 'ö' => 'o',
        'ř' => 'r',
        'š' => 's',
        'ť' => 't',
        'ú' | 'ů' | 'ü' => 'u',
        'ý' => 'y',
        'ž' => 'z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie() -> StopTrie {
        let mut trie = StopTrie::new();
        trie.add_stop("Nové Holešovice", "U1");
        trie.add_stop("Nové Holešovice", "U2");
        trie.add_stop("Nádraží Braník", "U3");
        trie.add_stop("Muzeum", "U4");
        trie
    }

    #[test]
    fn prefix_search_ignores_case_and_diacritics() {
        let trie = trie();
        let results = trie.search_by_prefix("nove hol");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "Nové Holešovice");
        assert_eq!(results[0].1, ["U1".to_string(), "U2".to_string()]);
    }

    #[test]
    fn all_names_under_a_short_prefix_are_returned() {
        let trie = trie();
        let results = trie.search_by_prefix("n");
        let names: Vec<&str> = results.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Nové Holešovice"));
        assert!(names.contains(&"Nádraží Braník"));
    }

    #[test]
    fn unknown_prefix_finds_nothing() {
        let trie = trie();
        assert!(trie.search_by_prefix("xyz").is_empty());
        assert!(!trie.search_by_prefix("").is_empty());
    }
}
