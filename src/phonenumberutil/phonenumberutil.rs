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

use std::{
    collections::HashSet,
    sync::Arc,
};

use log::{error, trace, warn};

use super::{
    errors::{GetExampleNumberError, ValidationError},
    helper_constants::{NANPA_COUNTRY_CODE, PLUS_SIGN, REGION_CODE_FOR_NON_GEO_ENTITY},
    helper_functions::{
        get_number_desc_by_type, get_supported_types_for_metadata, test_number_length,
    },
    phone_number_regexps_and_mappings::PhoneNumberRegExpsAndMappings,
    NumberLengthType, PhoneNumberType,
};
use crate::{
    asyoutypeformatter::AsYouTypeFormatter,
    i18n,
    interfaces::MatcherApi,
    metadata::{CountryCodeToRegionCodeMap, MetadataError, MetadataSource},
    proto_gen::{
        phonemetadata::{PhoneMetadata, PhoneMetadataCollection, PhoneNumberDesc},
        phonenumber::PhoneNumber,
    },
    regex_based_matcher::RegexBasedMatcher,
    regex_util::RegexConsume,
};

/// Metadata errors can't be reported through the infallible API: the data
/// is assumed to be valid, so failing to load it is fatal.
fn expect_metadata<T>(result: Result<T, MetadataError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            let err_message = format!("Could not load metadata: {}", err);
            error!("{}", err_message);
            panic!("{}", err_message);
        }
    }
}

pub struct PhoneNumberUtil {
    /// An API for validation checking.
    pub(super) matcher_api: Box<dyn MatcherApi>,

    /// Helper class holding useful regular expressions and character mappings.
    pub(super) reg_exps: PhoneNumberRegExpsAndMappings,

    /// Lazily bootstrapped metadata of both geographical regions and
    /// non-geographical entities.
    source: MetadataSource,

    /// A mapping from a country calling code to the region codes which denote
    /// the regions represented by that country calling code. Under this map, 1
    /// is mapped to region code "US" first and 7 is mapped to region code "RU"
    /// first.
    country_calling_code_to_region_code_map: CountryCodeToRegionCodeMap,

    /// The set of geographical regions present in the map above.
    supported_regions: HashSet<String>,

    /// The set of regions that share country calling code 1.
    nanpa_regions: HashSet<String>,
}

impl PhoneNumberUtil {
    /// Creates a utility over already decoded metadata. The calling code map
    /// is derived from the records.
    pub fn new_for_metadata(metadata_collection: PhoneMetadataCollection) -> Self {
        let map = CountryCodeToRegionCodeMap::from_collection(&metadata_collection);
        Self::new_with_source(MetadataSource::from_collection(metadata_collection), map)
    }

    /// Creates a utility whose metadata is bootstrapped on first use of every
    /// resource. The map tells which regions and calling codes exist without
    /// loading any of them.
    pub fn new_with_source(
        source: MetadataSource,
        country_calling_code_to_region_code_map: CountryCodeToRegionCodeMap,
    ) -> Self {
        let mut supported_regions = HashSet::new();
        let mut nanpa_regions = HashSet::new();
        for (country_calling_code, region_codes) in country_calling_code_to_region_code_map.iter() {
            for region_code in region_codes {
                if REGION_CODE_FOR_NON_GEO_ENTITY == region_code {
                    continue;
                }
                supported_regions.insert(region_code.clone());
                if country_calling_code == NANPA_COUNTRY_CODE {
                    nanpa_regions.insert(region_code.clone());
                }
            }
        }
        Self {
            matcher_api: Box::new(RegexBasedMatcher::new()),
            reg_exps: PhoneNumberRegExpsAndMappings::new(),
            source,
            country_calling_code_to_region_code_map,
            supported_regions,
            nanpa_regions,
        }
    }

    /// Bootstraps the metadata of a region ahead of time. Lookups done later
    /// through the infallible API then never block on the loader or fail.
    pub fn load_metadata_for_region(&self, region_code: &str) -> Result<(), MetadataError> {
        self.source.get_metadata_for_region(region_code).map(|_| ())
    }

    /// Same as [`Self::load_metadata_for_region`] for a non-geographical entity.
    pub fn load_metadata_for_non_geo_entity(&self, country_calling_code: i32) -> Result<(), MetadataError> {
        self.source
            .get_metadata_for_non_geographical_region(country_calling_code)
            .map(|_| ())
    }

    pub fn metadata_source(&self) -> &MetadataSource {
        &self.source
    }

    /// Creates a formatter for numbers typed one character at a time, using
    /// `region_code` for numbers entered without an international prefix.
    pub fn get_as_you_type_formatter(&self, region_code: &str) -> AsYouTypeFormatter<'_> {
        AsYouTypeFormatter::new(self, region_code)
    }

    /// Returns the metadata for the given region code or `None` if the region
    /// code is invalid or unknown.
    pub fn get_metadata_for_region(&self, region_code: &str) -> Option<Arc<PhoneMetadata>> {
        if !self.is_valid_region_code(region_code) {
            return None;
        }
        expect_metadata(self.source.get_metadata_for_region(region_code))
    }

    /// Returns the metadata for a non-geographical entity such as +800 or
    /// `None` if the calling code does not belong to one.
    pub fn get_metadata_for_non_geographical_region(
        &self,
        country_calling_code: i32,
    ) -> Option<Arc<PhoneMetadata>> {
        let is_non_geo_code = self
            .country_calling_code_to_region_code_map
            .region_codes(country_calling_code)
            .iter()
            .any(|region_code| REGION_CODE_FOR_NON_GEO_ENTITY == region_code);
        if !is_non_geo_code {
            return None;
        }
        expect_metadata(
            self.source
                .get_metadata_for_non_geographical_region(country_calling_code),
        )
    }

    pub(crate) fn get_metadata_for_region_or_calling_code(
        &self,
        country_calling_code: i32,
        region_code: &str,
    ) -> Option<Arc<PhoneMetadata>> {
        if REGION_CODE_FOR_NON_GEO_ENTITY == region_code {
            self.get_metadata_for_non_geographical_region(country_calling_code)
        } else {
            self.get_metadata_for_region(region_code)
        }
    }

    pub fn get_supported_regions(&self) -> impl Iterator<Item = &str> {
        self.supported_regions.iter().map(|region| region.as_str())
    }

    pub fn get_supported_global_network_calling_codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.country_calling_code_to_region_code_map
            .iter()
            .filter(|(_, region_codes)| {
                region_codes
                    .iter()
                    .any(|region_code| REGION_CODE_FOR_NON_GEO_ENTITY == region_code)
            })
            .map(|(country_calling_code, _)| country_calling_code)
    }

    pub fn get_supported_calling_codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.country_calling_code_to_region_code_map
            .iter()
            .map(|(country_calling_code, _)| country_calling_code)
    }

    pub fn get_supported_types_for_region(
        &self,
        region_code: &str,
    ) -> Option<HashSet<PhoneNumberType>> {
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            warn!("Invalid or unknown region code provided: {}", region_code);
            return None;
        };
        Some(get_supported_types_for_metadata(&metadata))
    }

    pub fn get_supported_types_for_non_geo_entity(
        &self,
        country_calling_code: i32,
    ) -> Option<HashSet<PhoneNumberType>> {
        let Some(metadata) = self.get_metadata_for_non_geographical_region(country_calling_code) else {
            warn!(
                "Unknown country calling code for a non-geographical entity provided: {}",
                country_calling_code
            );
            return None;
        };
        Some(get_supported_types_for_metadata(&metadata))
    }

    pub(crate) fn is_format_eligible_for_as_you_type_formatter(&self, format: &str) -> bool {
        // We require that the first group is present in the output pattern to
        // ensure no data is lost while formatting; when we format as you type,
        // this should always be the case.
        self.reg_exps
            .is_format_eligible_as_you_type_formatting_regex
            .is_match(format)
    }

    pub(crate) fn formatting_rule_has_first_group_only(&self, national_prefix_formatting_rule: &str) -> bool {
        national_prefix_formatting_rule.is_empty()
            || self
                .reg_exps
                .formatting_rule_has_first_group_only_regex
                .is_match(national_prefix_formatting_rule)
    }

    pub(crate) fn is_valid_region_code(&self, region_code: &str) -> bool {
        self.supported_regions.contains(region_code)
    }

    pub(crate) fn has_valid_country_calling_code(&self, country_calling_code: i32) -> bool {
        self.country_calling_code_to_region_code_map
            .contains(country_calling_code)
    }

    /// Returns true if the region is one of the regions under the North
    /// American Numbering Plan Administration (NANPA).
    pub fn is_nanpa_country(&self, region_code: &str) -> bool {
        self.nanpa_regions.contains(region_code)
    }

    /// Returns the country calling code for a specific region, or 0 if the
    /// region is invalid or unknown.
    pub fn get_country_code_for_region(&self, region_code: &str) -> i32 {
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            warn!("Invalid or unknown region code ({}) provided.", region_code);
            return 0;
        };
        metadata.country_code()
    }

    /// Returns the region code that matches the specific country calling code. In
    /// the case of no region code being found, the unknown region code will be
    /// returned.
    pub fn get_region_code_for_country_code(&self, country_calling_code: i32) -> &str {
        self.get_region_codes_for_country_calling_code(country_calling_code)
            .first()
            .map(|region_code| region_code.as_str())
            .unwrap_or(i18n::RegionCode::get_unknown())
    }

    /// Returns the region codes that match the specific country calling code,
    /// main region first. Empty if the code is unknown.
    pub fn get_region_codes_for_country_calling_code(&self, country_calling_code: i32) -> &[String] {
        self.country_calling_code_to_region_code_map
            .region_codes(country_calling_code)
    }

    /// Returns the national dialling prefix for a specific region. For example,
    /// this would be 1 for the United States, and 0 for New Zealand. Set
    /// `strip_non_digits` to true to strip symbols like "~" (which indicates a
    /// wait for a dialling tone) from the prefix returned.
    pub fn get_ndd_prefix_for_region(&self, region_code: &str, strip_non_digits: bool) -> Option<String> {
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            warn!("Invalid or unknown region code ({}) provided.", region_code);
            return None;
        };
        let national_prefix = metadata.national_prefix();
        // If no national prefix was found, we return None.
        if national_prefix.is_empty() {
            return None;
        }
        if strip_non_digits {
            // Note: if any other non-numeric symbols are ever used in national
            // prefixes, these would have to be removed here as well.
            return Some(national_prefix.replace('~', ""));
        }
        Some(national_prefix.to_owned())
    }

    /// Gets the national significant number of a phone number. Note a national
    /// significant number doesn't contain a national prefix or any formatting.
    pub fn get_national_significant_number(phone_number: &PhoneNumber) -> String {
        let mut buf = itoa::Buffer::new();
        let national_number = buf.format(phone_number.national_number());
        if !phone_number.italian_leading_zero() {
            return national_number.to_owned();
        }
        // If leading zero(s) have been set, we prefix this now. Note this is not a
        // national prefix. Ensure the number of leading zeros is at least 0 so we
        // don't crash in the case of malicious input.
        let zeros_start = "0".repeat(phone_number.number_of_leading_zeros().max(0) as usize);
        fast_cat::concat_str!(&zeros_start, national_number)
    }

    /// Tests whether a phone number matches a valid pattern. Note this doesn't
    /// verify the number is actually in use, which is impossible to tell by just
    /// looking at a number itself.
    pub fn is_valid_number(&self, phone_number: &PhoneNumber) -> bool {
        let region_code = self.get_region_code_for_number(phone_number);
        self.is_valid_number_for_region(phone_number, region_code)
    }

    /// Tests whether a phone number is valid for a certain region. Note this does
    /// not verify the number is actually in use. Regions sharing a calling code
    /// are told apart by their number patterns, so a number valid for one of
    /// them is not valid for the others.
    pub fn is_valid_number_for_region(&self, phone_number: &PhoneNumber, region_code: &str) -> bool {
        let country_calling_code = phone_number.country_code();
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return false;
        };
        if REGION_CODE_FOR_NON_GEO_ENTITY != region_code
            && country_calling_code != metadata.country_code()
        {
            // Either the region code was invalid, or the country calling code for
            // this number does not match that of the region code.
            return false;
        }
        let national_significant_number = Self::get_national_significant_number(phone_number);
        self.get_number_type_helper(&national_significant_number, &metadata) != PhoneNumberType::Unknown
    }

    /// Gets the type of a valid phone number, or `Unknown` if it is invalid.
    pub fn get_number_type(&self, phone_number: &PhoneNumber) -> PhoneNumberType {
        let region_code = self.get_region_code_for_number(phone_number);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(phone_number.country_code(), region_code)
        else {
            return PhoneNumberType::Unknown;
        };
        let national_significant_number = Self::get_national_significant_number(phone_number);
        self.get_number_type_helper(&national_significant_number, &metadata)
    }

    /// Returns the region where a phone number is from. This could be used for
    /// geocoding at the region level. Only guarantees correct results for valid,
    /// full numbers (not short-codes, or invalid numbers).
    pub fn get_region_code_for_number(&self, phone_number: &PhoneNumber) -> &str {
        let country_calling_code = phone_number.country_code();
        let region_codes = self.get_region_codes_for_country_calling_code(country_calling_code);
        match region_codes {
            [] => {
                trace!("Missing/invalid country calling code ({})", country_calling_code);
                i18n::RegionCode::get_unknown()
            }
            [region_code] => region_code,
            _ => self.get_region_code_for_number_from_region_list(phone_number, region_codes),
        }
    }

    /// Regions are tried in their declared order and the first one accepting
    /// the number wins, even if a later one would accept it too.
    fn get_region_code_for_number_from_region_list<'b>(
        &self,
        phone_number: &PhoneNumber,
        region_codes: &'b [String],
    ) -> &'b str {
        let national_number = Self::get_national_significant_number(phone_number);
        for region_code in region_codes {
            let Some(metadata) = self
                .get_metadata_for_region_or_calling_code(phone_number.country_code(), region_code)
            else {
                continue;
            };
            if metadata.has_leading_digits() {
                if self
                    .reg_exps
                    .regexp_cache
                    .get_regex(metadata.leading_digits())
                    .matches_start(&national_number)
                {
                    return region_code;
                }
            } else if self.get_number_type_helper(&national_number, &metadata) != PhoneNumberType::Unknown {
                return region_code;
            }
        }
        i18n::RegionCode::get_unknown()
    }

    pub(super) fn get_number_type_helper(
        &self,
        national_number: &str,
        metadata: &PhoneMetadata,
    ) -> PhoneNumberType {
        if !self.is_number_matching_desc(national_number, &metadata.general_desc) {
            trace!("Number '{national_number}' type unknown - doesn't match general national number pattern");
            return PhoneNumberType::Unknown;
        }
        if self.is_number_matching_desc(national_number, &metadata.premium_rate) {
            trace!("Number '{national_number}' is a premium number.");
            return PhoneNumberType::PremiumRate;
        }
        if self.is_number_matching_desc(national_number, &metadata.toll_free) {
            trace!("Number '{national_number}' is a toll-free number.");
            return PhoneNumberType::TollFree;
        }
        if self.is_number_matching_desc(national_number, &metadata.shared_cost) {
            trace!("Number '{national_number}' is a shared cost number.");
            return PhoneNumberType::SharedCost;
        }
        if self.is_number_matching_desc(national_number, &metadata.voip) {
            trace!("Number '{national_number}' is a VOIP (Voice over IP) number.");
            return PhoneNumberType::VoIP;
        }
        if self.is_number_matching_desc(national_number, &metadata.personal_number) {
            trace!("Number '{national_number}' is a personal number.");
            return PhoneNumberType::PersonalNumber;
        }
        if self.is_number_matching_desc(national_number, &metadata.pager) {
            trace!("Number '{national_number}' is a pager number.");
            return PhoneNumberType::Pager;
        }
        if self.is_number_matching_desc(national_number, &metadata.uan) {
            trace!("Number '{national_number}' is a UAN.");
            return PhoneNumberType::UAN;
        }
        if self.is_number_matching_desc(national_number, &metadata.voicemail) {
            trace!("Number '{national_number}' is a voicemail number.");
            return PhoneNumberType::VoiceMail;
        }

        let is_fixed_line = self.is_number_matching_desc(national_number, &metadata.fixed_line);
        if is_fixed_line {
            if metadata.same_mobile_and_fixed_line_pattern() {
                trace!("Number '{national_number}': fixed-line and mobile patterns equal, \
                    number is fixed-line or mobile");
                return PhoneNumberType::FixedLineOrMobile;
            } else if self.is_number_matching_desc(national_number, &metadata.mobile) {
                trace!("Number '{national_number}': Fixed-line and mobile patterns differ, but number is \
                    still fixed-line or mobile");
                return PhoneNumberType::FixedLineOrMobile;
            }
            trace!("Number '{national_number}' is a fixed line number.");
            return PhoneNumberType::FixedLine;
        }
        // Otherwise, test to see if the number is mobile. Only do this if certain
        // that the patterns for mobile and fixed line aren't the same.
        if !metadata.same_mobile_and_fixed_line_pattern()
            && self.is_number_matching_desc(national_number, &metadata.mobile)
        {
            trace!("Number '{national_number}' is a mobile number.");
            return PhoneNumberType::Mobile;
        }
        trace!("Number '{national_number}' type unknown - doesn't match any specific number type pattern.");
        PhoneNumberType::Unknown
    }

    pub(super) fn is_number_matching_desc(
        &self,
        national_number: &str,
        number_desc: &PhoneNumberDesc,
    ) -> bool {
        // Check if any possible number lengths are present; if so, we use them to
        // avoid checking the validation pattern if they don't match. If they are
        // absent, this means they match the general description, which we have
        // already checked before checking a specific number type.
        let actual_length = national_number.len() as i32;
        if !number_desc.possible_length.is_empty()
            && !number_desc.possible_length.contains(&actual_length)
        {
            return false;
        }
        self.matcher_api
            .match_national_number(national_number, number_desc, false)
    }

    /// Convenience wrapper around [`Self::is_possible_number_with_reason`].
    /// Instead of returning the reason for failure, this method returns true
    /// if the number is either a possible fully-qualified number (containing
    /// the area code and country code), or if the number could be a possible
    /// local number (with a country code, but missing an area code).
    pub fn is_possible_number(&self, phone_number: &PhoneNumber) -> bool {
        self.is_possible_number_with_reason(phone_number).is_ok()
    }

    /// Checks whether a phone number is a possible number. It provides a more
    /// lenient check than [`Self::is_valid_number`]: only the number length
    /// is looked at, not the actual digit patterns.
    pub fn is_possible_number_with_reason(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<NumberLengthType, ValidationError> {
        self.is_possible_number_for_type_with_reason(phone_number, PhoneNumberType::Unknown)
    }

    pub fn is_possible_number_for_type_with_reason(
        &self,
        phone_number: &PhoneNumber,
        phone_number_type: PhoneNumberType,
    ) -> Result<NumberLengthType, ValidationError> {
        let national_number = Self::get_national_significant_number(phone_number);
        let country_calling_code = phone_number.country_code();
        // Note: For regions that share a country calling code, like NANPA numbers,
        // we just use the rules from the default region (US in this case) since the
        // get_region_code_for_number will not work if the number is possible but
        // not valid. Possible lengths for every region sharing a code are kept
        // in the metadata of the main region.
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Err(ValidationError::InvalidCountryCode);
        }
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return Err(ValidationError::InvalidCountryCode);
        };
        test_number_length(&national_number, &metadata, phone_number_type)
    }

    /// Returns true if the number can be dialled from outside the region, or
    /// unknown. If the number can only be dialled from within the region,
    /// returns false.
    pub fn can_be_internationally_dialled(&self, phone_number: &PhoneNumber) -> bool {
        let region_code = self.get_region_code_for_number(phone_number);
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            // Note numbers belonging to non-geographical entities (e.g. +800 numbers)
            // are always internationally diallable, and will be caught here.
            return true;
        };
        let national_significant_number = Self::get_national_significant_number(phone_number);
        !self.is_number_matching_desc(
            &national_significant_number,
            &metadata.no_international_dialling,
        )
    }

    /// Gets a valid fixed-line number for the specified region.
    pub fn get_example_number(&self, region_code: &str) -> Result<PhoneNumber, GetExampleNumberError> {
        self.get_example_number_for_type(region_code, PhoneNumberType::FixedLine)
    }

    /// Gets a valid number for the specified region and number type.
    pub fn get_example_number_for_type(
        &self,
        region_code: &str,
        phone_number_type: PhoneNumberType,
    ) -> Result<PhoneNumber, GetExampleNumberError> {
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            warn!("Invalid or unknown region code ({}) provided.", region_code);
            return Err(GetExampleNumberError::InvalidRegionCode);
        };
        let desc = get_number_desc_by_type(&metadata, phone_number_type);
        if !desc.has_example_number() {
            return Err(GetExampleNumberError::NoExampleNumber);
        }
        Ok(self.parse(desc.example_number(), region_code)?)
    }

    /// Gets a valid number for the specified non-geographical country calling
    /// code, trying the number types such entities use.
    pub fn get_example_number_for_non_geo_entity(
        &self,
        country_calling_code: i32,
    ) -> Result<PhoneNumber, GetExampleNumberError> {
        let Some(metadata) = self.get_metadata_for_non_geographical_region(country_calling_code) else {
            warn!(
                "Invalid or unknown country calling code provided: {}",
                country_calling_code
            );
            return Err(GetExampleNumberError::InvalidCountryCallingCode);
        };
        // For geographical entities, fixed-line data is always present. However,
        // for non-geographical entities, this is not the case, so we have to go
        // through different types to find the example number. We don't check
        // fixed-line or personal number since they aren't used by
        // non-geographical entities.
        let descs = [
            &metadata.mobile,
            &metadata.toll_free,
            &metadata.shared_cost,
            &metadata.voip,
            &metadata.voicemail,
            &metadata.uan,
            &metadata.premium_rate,
        ];
        let mut buf = itoa::Buffer::new();
        let country_calling_code_str = buf.format(country_calling_code);
        for desc in descs {
            if !desc.has_example_number() {
                continue;
            }
            let example = fast_cat::concat_str!(PLUS_SIGN, country_calling_code_str, desc.example_number());
            match self.parse(&example, i18n::RegionCode::get_unknown()) {
                Ok(phone_number) => return Ok(phone_number),
                Err(err) => warn!("Failed to parse example number '{}': {}", example, err),
            }
        }
        Err(GetExampleNumberError::NoExampleNumber)
    }
}
