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

use std::sync::Arc;

use dashmap::DashMap;

use crate::proto_gen::phonemetadata::PhoneMetadata;

/// Index of registered metadata records. The variant decides which field of
/// a record becomes its key; registration is otherwise identical.
///
/// Entries are never removed, so a record handed out once stays valid for
/// the lifetime of the container.
pub enum MetadataContainer {
    /// Geographical regions, keyed by region code ("US", "GB", ...).
    ByRegionCode(DashMap<String, Arc<PhoneMetadata>>),
    /// Non-geographical entities, keyed by their calling code (800, 808, ...).
    ByCountryCallingCode(DashMap<i32, Arc<PhoneMetadata>>),
}

impl MetadataContainer {
    pub fn by_region_code() -> Self {
        Self::ByRegionCode(DashMap::new())
    }

    pub fn by_country_calling_code() -> Self {
        Self::ByCountryCallingCode(DashMap::new())
    }

    pub fn accept(&self, metadata: Arc<PhoneMetadata>) {
        match self {
            Self::ByRegionCode(entries) => {
                entries.insert(metadata.id().to_owned(), metadata);
            }
            Self::ByCountryCallingCode(entries) => {
                entries.insert(metadata.country_code(), metadata);
            }
        }
    }

    pub fn get_for_region(&self, region_code: &str) -> Option<Arc<PhoneMetadata>> {
        match self {
            Self::ByRegionCode(entries) => entries.get(region_code).map(|entry| entry.value().clone()),
            Self::ByCountryCallingCode(_) => None,
        }
    }

    pub fn get_for_country_calling_code(&self, country_calling_code: i32) -> Option<Arc<PhoneMetadata>> {
        match self {
            Self::ByCountryCallingCode(entries) => entries
                .get(&country_calling_code)
                .map(|entry| entry.value().clone()),
            Self::ByRegionCode(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::ByRegionCode(entries) => entries.len(),
            Self::ByCountryCallingCode(entries) => entries.len(),
        }
    }
}
