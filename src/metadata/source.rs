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

use std::{
    borrow::Cow,
    sync::{Arc, OnceLock},
};

use dashmap::DashMap;
use log::{debug, warn};
use protobuf::Message;

use super::{container::MetadataContainer, errors::MetadataError};
use crate::{
    i18n,
    interfaces::MetadataLoader,
    phonenumberutil::helper_constants::REGION_CODE_FOR_NON_GEO_ENTITY,
    proto_gen::phonemetadata::{PhoneMetadata, PhoneMetadataCollection},
};

/// What to do when the loader has no bytes for a resource, or when the
/// bytes decode to zero records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Report [`MetadataError`]; lookups needing the resource are fatal.
    Strict,
    /// Log a warning and treat the resource as holding no records.
    Lenient,
}

/// Naming scheme mapping a lookup to the resource that holds its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataLayout {
    /// Every record lives in one resource.
    SingleFile { name: String },
    /// One resource per region (`<prefix>_US`) and per non-geographical
    /// calling code (`<prefix>_800`).
    MultiFile { prefix: String },
}

impl MetadataLayout {
    pub const DEFAULT_FILE_PREFIX: &'static str = "PhoneNumberMetadataProto";

    pub fn single_file() -> Self {
        Self::SingleFile { name: Self::DEFAULT_FILE_PREFIX.to_owned() }
    }

    pub fn multi_file() -> Self {
        Self::MultiFile { prefix: Self::DEFAULT_FILE_PREFIX.to_owned() }
    }

    pub fn resource_for_region(&self, region_code: &str) -> String {
        match self {
            Self::SingleFile { name } => name.clone(),
            Self::MultiFile { prefix } => fast_cat::concat_str!(prefix, "_", region_code),
        }
    }

    pub fn resource_for_country_calling_code(&self, country_calling_code: i32) -> String {
        match self {
            Self::SingleFile { name } => name.clone(),
            Self::MultiFile { prefix } => {
                let mut buf = itoa::Buffer::new();
                fast_cat::concat_str!(prefix, "_", buf.format(country_calling_code))
            }
        }
    }
}

type LoadSlot = Arc<OnceLock<Result<(), MetadataError>>>;

/// Load-once guard keyed by resource id.
///
/// The first caller for a resource claims its slot and runs the load; other
/// callers for the same resource block on that slot until the outcome is
/// published. Different resources use different slots and never wait on
/// each other.
#[derive(Default)]
struct BootstrappingGuard {
    slots: DashMap<String, LoadSlot>,
}

impl BootstrappingGuard {
    fn get_or_bootstrap<F>(&self, resource: &str, bootstrap: F) -> Result<(), MetadataError>
    where
        F: FnOnce() -> Result<(), MetadataError>,
    {
        if let Some(result) = self.slots.get(resource).and_then(|slot| slot.get().cloned()) {
            return result;
        }
        // The shard lock is released at the end of this statement, before
        // the (possibly slow) load runs.
        let slot: LoadSlot = Arc::clone(&self.slots.entry(resource.to_owned()).or_default());
        slot.get_or_init(bootstrap).clone()
    }

    fn is_loaded(&self, resource: &str) -> bool {
        self.slots
            .get(resource)
            .is_some_and(|slot| slot.get().is_some())
    }
}

/// Process-wide metadata store fed lazily by a [`MetadataLoader`].
pub struct MetadataSource {
    loader: Box<dyn MetadataLoader>,
    layout: MetadataLayout,
    mode: LoadMode,
    guard: BootstrappingGuard,
    geographical: MetadataContainer,
    non_geographical: MetadataContainer,
}

impl MetadataSource {
    pub fn new(loader: impl MetadataLoader + 'static, layout: MetadataLayout, mode: LoadMode) -> Self {
        Self {
            loader: Box::new(loader),
            layout,
            mode,
            guard: BootstrappingGuard::default(),
            geographical: MetadataContainer::by_region_code(),
            non_geographical: MetadataContainer::by_country_calling_code(),
        }
    }

    /// Source over records that are already decoded. Everything is
    /// registered up front; the loader is never consulted.
    pub fn from_collection(collection: PhoneMetadataCollection) -> Self {
        let layout = MetadataLayout::single_file();
        let source = Self::new(
            |_: &str| -> Option<Cow<'static, [u8]>> { None },
            layout.clone(),
            LoadMode::Lenient,
        );
        let resource = layout.resource_for_region(i18n::RegionCode::get_unknown());
        let registered = source.guard.get_or_bootstrap(&resource, || {
            source.register(collection);
            Ok(())
        });
        debug_assert!(registered.is_ok());
        source
    }

    pub fn layout(&self) -> &MetadataLayout {
        &self.layout
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Returns whether the resource has been bootstrapped (successfully or not).
    pub fn is_resource_loaded(&self, resource: &str) -> bool {
        self.guard.is_loaded(resource)
    }

    pub fn get_metadata_for_region(
        &self,
        region_code: &str,
    ) -> Result<Option<Arc<PhoneMetadata>>, MetadataError> {
        if let Some(metadata) = self.geographical.get_for_region(region_code) {
            return Ok(Some(metadata));
        }
        self.bootstrap(&self.layout.resource_for_region(region_code))?;
        Ok(self.geographical.get_for_region(region_code))
    }

    pub fn get_metadata_for_non_geographical_region(
        &self,
        country_calling_code: i32,
    ) -> Result<Option<Arc<PhoneMetadata>>, MetadataError> {
        if let Some(metadata) = self.non_geographical.get_for_country_calling_code(country_calling_code) {
            return Ok(Some(metadata));
        }
        self.bootstrap(&self.layout.resource_for_country_calling_code(country_calling_code))?;
        Ok(self.non_geographical.get_for_country_calling_code(country_calling_code))
    }

    fn bootstrap(&self, resource: &str) -> Result<(), MetadataError> {
        self.guard.get_or_bootstrap(resource, || {
            debug!("Bootstrapping metadata resource '{}'", resource);
            let Some(bytes) = self.loader.load_metadata(resource) else {
                return match self.mode {
                    LoadMode::Strict => Err(MetadataError::NotFound { resource: resource.to_owned() }),
                    LoadMode::Lenient => {
                        warn!("Metadata resource '{}' not found, treating it as empty", resource);
                        Ok(())
                    }
                };
            };
            let collection = PhoneMetadataCollection::parse_from_bytes(&bytes).map_err(|err| {
                MetadataError::Corrupt { resource: resource.to_owned(), reason: err.to_string() }
            })?;
            if collection.metadata.is_empty() {
                match self.mode {
                    LoadMode::Strict => {
                        return Err(MetadataError::Corrupt {
                            resource: resource.to_owned(),
                            reason: "empty metadata".to_owned(),
                        })
                    }
                    LoadMode::Lenient => warn!("Metadata resource '{}' holds no records", resource),
                }
            }
            let registered = self.register(collection);
            debug!("Registered {} metadata records from '{}'", registered, resource);
            Ok(())
        })
    }

    /// Registers every record of the collection before returning; callers
    /// publish the resource as loaded only afterwards.
    fn register(&self, collection: PhoneMetadataCollection) -> usize {
        let mut registered = 0;
        for metadata in collection.metadata {
            let region_code = metadata.id();
            if i18n::RegionCode::get_unknown() == region_code {
                continue;
            }
            let container = if REGION_CODE_FOR_NON_GEO_ENTITY == region_code {
                &self.non_geographical
            } else {
                &self.geographical
            };
            container.accept(Arc::new(metadata));
            registered += 1;
        }
        registered
    }
}
