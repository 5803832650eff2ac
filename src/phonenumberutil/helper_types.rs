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

use crate::proto_gen::phonenumber::phone_number::CountryCodeSource;

/// Normalized digits left after the international prefix (if any) has been
/// consumed, together with how that prefix was written.
#[derive(Debug)]
pub struct PhoneNumberWithCountryCodeSource {
    pub phone_number: String,
    pub country_code_source: CountryCodeSource,
}

impl PhoneNumberWithCountryCodeSource {
    pub fn new(phone_number: String, country_code_source: CountryCodeSource) -> Self {
        Self { phone_number, country_code_source }
    }
}

/// Outcome of stripping a national prefix from a national number.
#[derive(Debug, PartialEq, Eq)]
pub struct StrippedNationalPrefix {
    /// The national number once the prefix (and any transform rule) was applied.
    pub national_number: String,
    /// Carrier code captured by the national prefix pattern, if any.
    pub carrier_code: Option<String>,
}
