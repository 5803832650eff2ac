// Copyright (C) 2009 The Libphonenumber Authors
// Copyright (C) 2025 Kashin Vladislav (Rust adaptation author)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::{HashMap, VecDeque};

use crate::{i18n, proto_gen::phonemetadata::PhoneMetadataCollection};

/// A mapping from a country calling code to the region codes which denote the
/// regions represented by that country calling code. Note regions under NANPA
/// share the country calling code 1 and Russia and Kazakhstan share the
/// country calling code 7. The main region for a code is always first in its
/// list; the remaining regions keep their declared order.
///
/// Implemented as a vector sorted by calling code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCodeToRegionCodeMap {
    entries: Vec<(i32, Vec<String>)>,
}

impl CountryCodeToRegionCodeMap {
    /// Builds the map from `(calling code, regions)` pairs. Region lists are
    /// taken as given, so the main region must already be first.
    pub fn new(entries: impl IntoIterator<Item = (i32, Vec<String>)>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        // Sort all the pairs in ascending order according to country calling code.
        entries.sort_by_key(|(code, _)| *code);
        entries.dedup_by_key(|(code, _)| *code);
        Self { entries }
    }

    /// Derives the map from decoded records, honouring `main_country_for_code`.
    pub fn from_collection(collection: &PhoneMetadataCollection) -> Self {
        // Storing data in a temporary map to make it easier to find other regions
        // that share a country calling code when inserting data.
        let mut country_calling_code_to_region_map = HashMap::<i32, VecDeque<String>>::new();
        for metadata in &collection.metadata {
            let region_code = metadata.id();
            if i18n::RegionCode::get_unknown() == region_code {
                continue;
            }
            let regions = country_calling_code_to_region_map
                .entry(metadata.country_code())
                .or_default();
            if regions.iter().any(|known| known == region_code) {
                continue;
            }
            if metadata.main_country_for_code() {
                regions.push_front(region_code.to_owned());
            } else {
                regions.push_back(region_code.to_owned());
            }
        }
        Self::new(
            country_calling_code_to_region_map
                .into_iter()
                .map(|(code, regions)| (code, Vec::from(regions))),
        )
    }

    /// Returns the regions sharing `country_calling_code`, main region first.
    /// Empty for unknown codes.
    pub fn region_codes(&self, country_calling_code: i32) -> &[String] {
        self.entries
            .binary_search_by_key(&country_calling_code, |(code, _)| *code)
            .map(|index| self.entries[index].1.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, country_calling_code: i32) -> bool {
        self.entries
            .binary_search_by_key(&country_calling_code, |(code, _)| *code)
            .is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &[String])> {
        self.entries
            .iter()
            .map(|(code, regions)| (*code, regions.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::CountryCodeToRegionCodeMap;
    use crate::proto_gen::phonemetadata::{PhoneMetadata, PhoneMetadataCollection};

    fn metadata(id: &str, country_code: i32, main: bool) -> PhoneMetadata {
        let mut metadata = PhoneMetadata::new();
        metadata.set_id(id.to_owned());
        metadata.set_country_code(country_code);
        if main {
            metadata.set_main_country_for_code(true);
        }
        metadata
    }

    #[test]
    fn main_region_goes_first() {
        let mut collection = PhoneMetadataCollection::new();
        collection.metadata.push(metadata("BS", 1, false));
        collection.metadata.push(metadata("US", 1, true));
        collection.metadata.push(metadata("CA", 1, false));
        collection.metadata.push(metadata("GB", 44, false));
        collection.metadata.push(metadata("ZZ", 0, false));

        let map = CountryCodeToRegionCodeMap::from_collection(&collection);
        assert_eq!(["US", "BS", "CA"], map.region_codes(1));
        assert_eq!(["GB"], map.region_codes(44));
        assert!(map.region_codes(0).is_empty());
        assert!(!map.contains(0));
        assert_eq!(2, map.len());
    }

    #[test]
    fn explicit_entries_are_sorted() {
        let map = CountryCodeToRegionCodeMap::new([
            (800, vec!["001".to_owned()]),
            (44, vec!["GB".to_owned()]),
            (1, vec!["US".to_owned()]),
        ]);
        let codes: Vec<i32> = map.iter().map(|(code, _)| code).collect();
        assert_eq!(vec![1, 44, 800], codes);
        assert!(map.contains(800));
    }
}
