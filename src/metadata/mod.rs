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

//! Lazily bootstrapped metadata indices.
//!
//! Raw bytes come from a [`MetadataLoader`](crate::MetadataLoader); this
//! module owns decoding them and registering the records, once per resource.

mod container;
mod country_code_map;
mod errors;
mod source;

pub use container::MetadataContainer;
pub use country_code_map::CountryCodeToRegionCodeMap;
pub use errors::MetadataError;
pub use source::{LoadMode, MetadataLayout, MetadataSource};
