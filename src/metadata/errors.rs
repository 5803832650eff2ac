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

use thiserror::Error;

/// Failure to bootstrap a metadata resource. Both variants are fatal for
/// the lookups that needed the resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// Bytes were fetched but could not be turned into metadata records.
    #[error("Metadata resource '{resource}' is corrupt: {reason}")]
    Corrupt { resource: String, reason: String },
    /// The loader does not know the resource (strict mode only).
    #[error("Metadata resource '{resource}' not found")]
    NotFound { resource: String },
}
