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

use log::trace;

use super::{
    errors::{ExtractNumberError, NotANumberError, ParseError, ValidationError},
    helper_constants::{
        MAX_INPUT_STRING_LENGTH, MAX_LENGTH_COUNTRY_CODE, MAX_LENGTH_FOR_NSN,
        MIN_LENGTH_FOR_NSN, PLUS_SIGN, RFC3966_ISDN_SUBADDRESS, RFC3966_PHONE_CONTEXT,
        RFC3966_PREFIX,
    },
    helper_functions::{
        normalize_digit, normalize_helper, set_italian_leading_zeros_for_phone_number,
        test_number_length_with_unknown_type,
    },
    helper_types::{PhoneNumberWithCountryCodeSource, StrippedNationalPrefix},
    phonenumberutil::PhoneNumberUtil,
    NumberLengthType,
};
use crate::{
    proto_gen::{
        phonemetadata::PhoneMetadata,
        phonenumber::{phone_number::CountryCodeSource, PhoneNumber},
    },
    regex_util::{replacement_template, RegexConsume},
};

impl PhoneNumberUtil {
    /// Parses a string and returns it as a phone number in proto buffer format.
    /// The method is quite lenient and looks for a number in the input text
    /// (raw input) and does not check whether the string is definitely only a
    /// phone number. To do this, it ignores punctuation and white-space, as well
    /// as any text before the number (e.g. a leading "Tel: ") and trims the
    /// non-number bits. It will accept a number in any format (E164, national,
    /// international etc), assuming it can be interpreted with the
    /// `default_region` supplied. It also attempts to convert any alpha
    /// characters into digits if it thinks this is a vanity number of the type
    /// "1800 MICROSOFT".
    ///
    /// This method will return an error if the number is not considered to be a
    /// possible number. Note that validation of whether the number is actually a
    /// valid number for a particular region is not performed. This can be done
    /// separately with [`Self::is_valid_number`].
    ///
    /// `default_region` is only used if the number being parsed is not written
    /// in international format. The country calling code for the number in this
    /// case would be stored as that of the default region supplied. If the
    /// number is guaranteed to start with a '+' followed by the country calling
    /// code, then "ZZ" can be supplied.
    pub fn parse(&self, number_to_parse: &str, default_region: &str) -> Result<PhoneNumber, ParseError> {
        self.parse_helper(number_to_parse, default_region, false, true)
    }

    /// Same as [`Self::parse`], but keeps the raw input string, the source of
    /// the country calling code and any carrier code found.
    pub fn parse_and_keep_raw_input(
        &self,
        number_to_parse: &str,
        default_region: &str,
    ) -> Result<PhoneNumber, ParseError> {
        self.parse_helper(number_to_parse, default_region, true, true)
    }

    /// Parses a string and fills up the phone number. This method is the same
    /// as the public [`Self::parse`] method, with the exception that it allows
    /// the default region to be checked or not.
    pub(crate) fn parse_helper(
        &self,
        number_to_parse: &str,
        default_region: &str,
        keep_raw_input: bool,
        check_region: bool,
    ) -> Result<PhoneNumber, ParseError> {
        if number_to_parse.chars().count() > MAX_INPUT_STRING_LENGTH {
            return Err(ParseError::TooLongNsn);
        }
        let national_number = self.build_national_number_for_parsing(number_to_parse)?;

        if !self.is_viable_phone_number(&national_number) {
            trace!("The string supplied did not seem to be a phone number '{}'.", national_number);
            return Err(NotANumberError::NotMatchedValidNumberPattern.into());
        }

        // Check the region supplied is valid, or that the extracted number starts
        // with some sort of + sign so the number's region can be determined.
        if check_region && !self.check_region_for_parsing(&national_number, default_region) {
            trace!("Missing or invalid default country.");
            return Err(ParseError::InvalidCountryCode);
        }

        let mut phone_number = PhoneNumber::new();
        if keep_raw_input {
            phone_number.set_raw_input(number_to_parse.to_owned());
        }
        // Attempt to parse extension first, since it doesn't require
        // region-specific data and we want to have the non-normalised number here.
        let (national_number, extension) = self.maybe_strip_extension(&national_number);
        if let Some(extension) = extension {
            phone_number.set_extension(extension.to_owned());
        }

        let mut region_metadata = self.get_metadata_for_region(default_region);
        // Check to see if the number is given in international format so we know
        // whether this number is from the default region or not.
        let extracted = match self.maybe_extract_country_code(
            national_number,
            region_metadata.as_deref(),
            keep_raw_input,
            &mut phone_number,
        ) {
            Err(ParseError::InvalidCountryCode) => {
                let Some(plus_match) = self.reg_exps.plus_chars_pattern.find_start(national_number) else {
                    return Err(ParseError::InvalidCountryCode);
                };
                // Strip the plus-char, and try again.
                let extracted = self.maybe_extract_country_code(
                    &national_number[plus_match.end()..],
                    region_metadata.as_deref(),
                    keep_raw_input,
                    &mut phone_number,
                )?;
                if extracted.0 == 0 {
                    return Err(ParseError::InvalidCountryCode);
                }
                extracted
            }
            result => result?,
        };
        let (country_code, mut normalized_national_number) = extracted;

        if country_code != 0 {
            let phone_number_region = self.get_region_code_for_country_code(country_code);
            if phone_number_region != default_region {
                // Metadata cannot be None because the country calling code is valid.
                region_metadata =
                    self.get_metadata_for_region_or_calling_code(country_code, phone_number_region);
            }
        } else {
            // If no extracted country calling code, use the region supplied instead.
            // The national number is just the normalized version of the number we
            // were given to parse.
            normalized_national_number = self.normalize(national_number);
            let Some(metadata) = &region_metadata else {
                // A region whose metadata resource turned out empty cannot
                // supply a calling code.
                trace!("No metadata for default region '{}'.", default_region);
                return Err(ParseError::InvalidCountryCode);
            };
            phone_number.set_country_code(metadata.country_code());
        }

        if normalized_national_number.len() < MIN_LENGTH_FOR_NSN {
            trace!("The string supplied is too short to be a phone number.");
            return Err(ParseError::TooShortNsn);
        }

        if let Some(metadata) = &region_metadata {
            if let Some(stripped) =
                self.maybe_strip_national_prefix_and_carrier_code(&normalized_national_number, metadata)
            {
                // We require that the NSN remaining after stripping the national
                // prefix and carrier code be long enough to be a possible length
                // for the region. Otherwise, we don't do the stripping, since the
                // original number could be a valid short number.
                let validation_result =
                    test_number_length_with_unknown_type(&stripped.national_number, metadata);
                if !matches!(
                    validation_result,
                    Err(ValidationError::TooShort)
                        | Err(ValidationError::InvalidLength)
                        | Ok(NumberLengthType::IsPossibleLocalOnly)
                ) {
                    normalized_national_number = stripped.national_number;
                    if keep_raw_input {
                        if let Some(carrier_code) = stripped.carrier_code {
                            phone_number.set_preferred_domestic_carrier_code(carrier_code);
                        }
                    }
                }
            }
        }

        let length_of_national_number = normalized_national_number.len();
        if length_of_national_number < MIN_LENGTH_FOR_NSN {
            trace!("The string supplied is too short to be a phone number.");
            return Err(ParseError::TooShortNsn);
        }
        if length_of_national_number > MAX_LENGTH_FOR_NSN {
            trace!("The string supplied is too long to be a phone number.");
            return Err(ParseError::TooLongNsn);
        }
        set_italian_leading_zeros_for_phone_number(&normalized_national_number, &mut phone_number);
        phone_number.set_national_number(normalized_national_number.parse::<u64>()?);
        Ok(phone_number)
    }

    /// Converts the input into the string the rest of the parser works on:
    /// the number part of an RFC3966 URI (with its global phone-context
    /// prepended), or the possible number found in free text.
    fn build_national_number_for_parsing(&self, number_to_parse: &str) -> Result<String, ParseError> {
        let mut national_number = if let Some(index_of_phone_context) =
            number_to_parse.find(RFC3966_PHONE_CONTEXT)
        {
            let phone_context = Self::extract_phone_context(number_to_parse, index_of_phone_context);
            if !self.is_phone_context_valid(phone_context) {
                trace!("The phone-context value '{}' is invalid.", phone_context);
                return Err(NotANumberError::InvalidPhoneContext.into());
            }
            let mut national_number = String::with_capacity(number_to_parse.len());
            // If the phone context contains a phone number prefix, we need to
            // capture it, whereas domains will be ignored.
            if phone_context.starts_with(PLUS_SIGN) {
                // Additional parameters might follow the phone context. If so, we
                // will remove them here because the parameters after phone context
                // are not important for parsing the phone number.
                national_number.push_str(phone_context);
            }
            // Now append everything between the "tel:" prefix and the
            // phone-context. This should include the national number, an optional
            // extension or isdn-subaddress component. Note we also handle the case
            // when "tel:" is missing, as we have seen in some of the phone number
            // inputs. In that case, we append everything from the beginning.
            let index_of_national_number = number_to_parse
                .find(RFC3966_PREFIX)
                .map(|index| index + RFC3966_PREFIX.len())
                .unwrap_or(0);
            national_number.push_str(
                number_to_parse
                    .get(index_of_national_number..index_of_phone_context)
                    .unwrap_or_default(),
            );
            national_number
        } else {
            // Extract a possible number from the string passed in (this strips
            // leading characters that could not be the start of a phone number.)
            self.extract_possible_number(number_to_parse)?.to_owned()
        };

        // Delete the isdn-subaddress and everything after it if it is present.
        // Note extension won't appear at the same time with isdn-subaddress
        // according to paragraph 5.3 of the RFC3966 spec.
        if let Some(index_of_isdn) = national_number.find(RFC3966_ISDN_SUBADDRESS) {
            if index_of_isdn > 0 {
                national_number.truncate(index_of_isdn);
            }
        }
        // If both phone context and isdn-subaddress are absent but other
        // parameters are present, the parameters are left in national_number.
        // This is because we are concerned about deleting content from a
        // potential number string when there is no strong evidence that the
        // number is actually written in RFC3966.
        Ok(national_number)
    }

    /// Extracts the value of the phone-context parameter, following the
    /// specification of RFC3966.
    fn extract_phone_context(number_to_extract_from: &str, index_of_phone_context: usize) -> &str {
        let phone_context_start = index_of_phone_context + RFC3966_PHONE_CONTEXT.len();
        // If phone-context parameter is empty
        let Some(phone_context) = number_to_extract_from.get(phone_context_start..) else {
            return "";
        };
        // If there is another parameter after phone-context
        match phone_context.find(';') {
            Some(phone_context_end) => &phone_context[..phone_context_end],
            None => phone_context,
        }
    }

    /// Returns whether the value of phone-context is valid. It also returns
    /// true if it is absent.
    fn is_phone_context_valid(&self, phone_context: &str) -> bool {
        if phone_context.is_empty() {
            return false;
        }
        // Does phone-context value match pattern of global-number-digits or
        // domainname
        self.reg_exps.rfc3966_global_number_digits_pattern.is_match(phone_context)
            || self.reg_exps.rfc3966_domainname_pattern.is_match(phone_context)
    }

    /// Attempts to extract a possible number from the string passed in. This
    /// currently strips all leading characters that cannot be used to start a
    /// phone number. Characters that can be used to start a phone number are
    /// defined in the valid_start_char_pattern. If none of these characters are
    /// found in the number passed in, an error is returned. This function also
    /// attempts to strip off any alternative extensions or endings if two or
    /// more are present, such as in the case of: (530) 583-6985 x302/x2303. The
    /// second extension here makes this actually two phone numbers, (530)
    /// 583-6985 x302 and (530) 583-6985 x2303. We remove the second extension
    /// so that the first number is parsed correctly.
    pub fn extract_possible_number<'b>(&self, phone_number: &'b str) -> Result<&'b str, ExtractNumberError> {
        let Some(start) = self.reg_exps.valid_start_char_pattern.find(phone_number) else {
            trace!("Number '{}' has no valid start character.", phone_number);
            return Err(ExtractNumberError::NoValidStartCharacter);
        };
        let mut number = &phone_number[start.start()..];
        // Remove trailing non-alpha non-numerical characters.
        if let Some(trailing) = self.reg_exps.unwanted_end_char_pattern.find(number) {
            number = &number[..trailing.start()];
        }
        // Check for extra numbers at the end.
        if let Some(second_number) = self.reg_exps.second_number_start_pattern.find(number) {
            number = &number[..second_number.start()];
        }
        Ok(number)
    }

    /// Checks to see if the string of characters could possibly be a phone
    /// number at all. At the moment, checks to see that the string begins with
    /// at least 2 digits, ignoring any punctuation commonly found in phone
    /// numbers. This method does not require the number to be normalized in
    /// advance - but does assume that leading non-number symbols have been
    /// removed, such as by the method [`Self::extract_possible_number`].
    pub fn is_viable_phone_number(&self, number: &str) -> bool {
        if number.chars().count() < MIN_LENGTH_FOR_NSN {
            return false;
        }
        self.reg_exps.valid_phone_number_pattern.is_match(number)
    }

    /// Checks to see that the region code used is valid, or if it is not valid,
    /// that the number to parse starts with a + symbol so that we can attempt to
    /// infer the region from the number.
    fn check_region_for_parsing(&self, number_to_parse: &str, default_region: &str) -> bool {
        self.is_valid_region_code(default_region)
            || self.reg_exps.plus_chars_pattern.matches_start(number_to_parse)
    }

    /// Strips any extension (as in, the part of the number dialled after the
    /// call is connected, usually indicated with extn, ext, x or similar) from
    /// the end of the number, and returns the number without it along with the
    /// extension, if any was found.
    pub(crate) fn maybe_strip_extension<'b>(&self, number: &'b str) -> (&'b str, Option<&'b str>) {
        let Some(captures) = self.reg_exps.extn_pattern.captures(number) else {
            return (number, None);
        };
        let Some(full_match) = captures.get(0) else {
            return (number, None);
        };
        // If we find a potential extension, and the number preceding this is a
        // viable number, we assume it is an extension.
        let number_without_extension = &number[..full_match.start()];
        if !self.is_viable_phone_number(number_without_extension) {
            return (number, None);
        }
        // The numbers are captured into groups in the regular expression.
        match captures.iter().skip(1).flatten().next() {
            Some(extension) => (number_without_extension, Some(extension.as_str())),
            None => (number, None),
        }
    }

    /// Tries to extract a country calling code from a number. This method will
    /// return zero if no country calling code is considered to be present.
    /// Country calling codes are extracted in the following ways:
    /// - by stripping the international dialing prefix of the region the person
    ///   is dialing from, if this is present in the number, and looking at the
    ///   next digits
    /// - by stripping the '+' sign if present and then looking at the next
    ///   digits
    /// - by comparing the start of the number and the country calling code of
    ///   the default region. If the number is not considered possible for the
    ///   numbering plan of the default region initially, but starts with the
    ///   country calling code of this region, validation will be reattempted
    ///   after stripping this country calling code. If this number is considered
    ///   a possible number, then the first digits will be considered the country
    ///   calling code and removed as such.
    ///
    /// Returns the country calling code together with the national number that
    /// follows it. The national number is empty when no code was found.
    pub(crate) fn maybe_extract_country_code(
        &self,
        number: &str,
        default_region_metadata: Option<&PhoneMetadata>,
        keep_raw_input: bool,
        phone_number: &mut PhoneNumber,
    ) -> Result<(i32, String), ParseError> {
        if number.is_empty() {
            return Ok((0, String::new()));
        }
        // Set the default prefix to be something that will never match if there
        // is no default region.
        let possible_country_idd_prefix = default_region_metadata
            .map(|metadata| metadata.international_prefix())
            .unwrap_or("NonMatch");

        let PhoneNumberWithCountryCodeSource {
            phone_number: full_number,
            country_code_source,
        } = self.maybe_strip_international_prefix_and_normalize(number, possible_country_idd_prefix);

        if keep_raw_input {
            phone_number.set_country_code_source(country_code_source);
        }
        if country_code_source != CountryCodeSource::FROM_DEFAULT_COUNTRY {
            if full_number.len() <= MIN_LENGTH_FOR_NSN {
                trace!("Phone number had an IDD, but after this was not long enough to be a viable phone number.");
                return Err(ParseError::TooShortAfterIdd);
            }
            let Some((potential_country_code, national_number)) = self.extract_country_code(&full_number)
            else {
                // If this fails, they must be using a strange country calling code
                // that we don't recognize, or that doesn't exist.
                return Err(ParseError::InvalidCountryCode);
            };
            phone_number.set_country_code(potential_country_code);
            return Ok((potential_country_code, national_number.to_owned()));
        }

        if let Some(metadata) = default_region_metadata {
            // Check to see if the number starts with the country calling code for
            // the default region. If so, we remove the country calling code, and do
            // some checks on the validity of the number before and after.
            let default_country_code = metadata.country_code();
            let mut buf = itoa::Buffer::new();
            let default_country_code_str = buf.format(default_country_code);
            if let Some(potential_national_number) = full_number.strip_prefix(default_country_code_str) {
                let general_desc = &metadata.general_desc;
                let potential_national_number = self
                    .maybe_strip_national_prefix_and_carrier_code(potential_national_number, metadata)
                    .map(|stripped| stripped.national_number)
                    .unwrap_or_else(|| potential_national_number.to_owned());

                // If the number was not valid before but is valid now, or if it was
                // too long before, we consider the number with the country calling
                // code stripped to be a better result and keep that instead.
                if (!self.matcher_api.match_national_number(&full_number, general_desc, false)
                    && self.matcher_api.match_national_number(&potential_national_number, general_desc, false))
                    || test_number_length_with_unknown_type(&full_number, metadata)
                        == Err(ValidationError::TooLong)
                {
                    if keep_raw_input {
                        phone_number.set_country_code_source(CountryCodeSource::FROM_NUMBER_WITHOUT_PLUS_SIGN);
                    }
                    phone_number.set_country_code(default_country_code);
                    return Ok((default_country_code, potential_national_number));
                }
            }
        }
        // No country calling code present.
        phone_number.set_country_code(0);
        Ok((0, String::new()))
    }

    /// Extracts country calling code from `full_number`, returning it together
    /// with the rest of the number. It assumes that the leading plus sign or IDD
    /// has already been removed. Returns `None` if `full_number` doesn't start
    /// with a valid country calling code.
    pub(crate) fn extract_country_code<'b>(&self, full_number: &'b str) -> Option<(i32, &'b str)> {
        if full_number.is_empty() || full_number.starts_with('0') {
            // Country codes do not begin with a '0'.
            return None;
        }
        // Longest candidate first. Calling codes are prefix-free, so at most one
        // length can match anyway.
        (1..=MAX_LENGTH_COUNTRY_CODE.min(full_number.len())).rev().find_map(|length| {
            let potential_country_code = full_number.get(..length)?.parse::<i32>().ok()?;
            self.has_valid_country_calling_code(potential_country_code)
                .then(|| (potential_country_code, &full_number[length..]))
        })
    }

    /// Strips any international prefix (such as +, 00, 011) present in the
    /// number provided, normalizes the resulting number, and indicates if an
    /// international prefix was present.
    ///
    /// `possible_idd_prefix` represents the international direct dialing prefix
    /// from the region we think this number may be dialed in.
    pub(crate) fn maybe_strip_international_prefix_and_normalize(
        &self,
        phone_number: &str,
        possible_idd_prefix: &str,
    ) -> PhoneNumberWithCountryCodeSource {
        if phone_number.is_empty() {
            return PhoneNumberWithCountryCodeSource::new(String::new(), CountryCodeSource::FROM_DEFAULT_COUNTRY);
        }
        // Check to see if the number begins with one or more plus signs.
        if let Some(plus_match) = self.reg_exps.plus_chars_pattern.find_start(phone_number) {
            // Can now normalize the rest of the number since we've consumed the
            // "+" sign at the start.
            return PhoneNumberWithCountryCodeSource::new(
                self.normalize(&phone_number[plus_match.end()..]),
                CountryCodeSource::FROM_NUMBER_WITH_PLUS_SIGN,
            );
        }
        // Attempt to parse the first digits as an international prefix.
        let normalized_number = self.normalize(phone_number);
        match self.parse_prefix_as_idd(&normalized_number, possible_idd_prefix) {
            Some(rest) => PhoneNumberWithCountryCodeSource::new(
                rest.to_owned(),
                CountryCodeSource::FROM_NUMBER_WITH_IDD,
            ),
            None => PhoneNumberWithCountryCodeSource::new(
                normalized_number,
                CountryCodeSource::FROM_DEFAULT_COUNTRY,
            ),
        }
    }

    /// Strips the IDD from the start of the number if present. Helper function
    /// used by [`Self::maybe_strip_international_prefix_and_normalize`].
    fn parse_prefix_as_idd<'b>(&self, phone_number: &'b str, idd_pattern: &str) -> Option<&'b str> {
        let idd_regex = self.reg_exps.regexp_cache.get_regex(idd_pattern);
        let idd_match = idd_regex.find_start(phone_number)?;
        let rest = &phone_number[idd_match.end()..];
        // Only strip this if the first digit after the match is not a 0, since
        // country calling codes cannot begin with 0.
        if let Some(captures) = self.reg_exps.capturing_digit_pattern.captures(rest) {
            if Self::normalize_digits_only(&captures[1]) == "0" {
                return None;
            }
        }
        Some(rest)
    }

    /// Strips any national prefix (such as 0, 1) present in the number
    /// provided. Returns `None` if nothing was stripped, either because the
    /// region defines no prefix or because stripping would leave a number that
    /// no longer fits the region's general pattern while the original did.
    pub(crate) fn maybe_strip_national_prefix_and_carrier_code(
        &self,
        number: &str,
        metadata: &PhoneMetadata,
    ) -> Option<StrippedNationalPrefix> {
        let possible_national_prefix = metadata.national_prefix_for_parsing();
        if number.is_empty() || possible_national_prefix.is_empty() {
            // Early return for numbers of zero length.
            return None;
        }
        // Attempt to parse the first digits as a national prefix.
        let prefix_regex = self.reg_exps.regexp_cache.get_regex(possible_national_prefix);
        let captures = prefix_regex.captures_start(number)?;
        let general_desc = &metadata.general_desc;
        // Check if the original number is viable.
        let is_viable_original_number = self.matcher_api.match_national_number(number, general_desc, false);
        // prefix_regex.captures_len() counts the implicit whole-match group too.
        let num_of_groups = captures.len() - 1;
        let transform_rule = metadata.national_prefix_transform_rule();
        let last_group = captures.get(num_of_groups);

        if transform_rule.is_empty() || last_group.is_none() {
            let prefix_end = captures.get(0)?.end();
            let national_number = &number[prefix_end..];
            // If the original number was viable, and the resultant number is not,
            // we return.
            if is_viable_original_number
                && !self.matcher_api.match_national_number(national_number, general_desc, false)
            {
                return None;
            }
            let carrier_code = (num_of_groups > 0 && last_group.is_some())
                .then(|| captures.get(1).map(|carrier| carrier.as_str().to_owned()))
                .flatten();
            return Some(StrippedNationalPrefix {
                national_number: national_number.to_owned(),
                carrier_code,
            });
        }

        // Only the first match is replaced, and it sits at the start of the number.
        let transformed_number = prefix_regex
            .replacen(number, 1, &*replacement_template(transform_rule))
            .into_owned();
        // If the original number was viable, and the resultant number is not,
        // we return.
        if is_viable_original_number
            && !self.matcher_api.match_national_number(&transformed_number, general_desc, false)
        {
            return None;
        }
        let carrier_code = (num_of_groups > 1)
            .then(|| captures.get(1).map(|carrier| carrier.as_str().to_owned()))
            .flatten();
        Some(StrippedNationalPrefix {
            national_number: transformed_number,
            carrier_code,
        })
    }

    /// Normalizes a string of characters representing a phone number. This
    /// performs the following conversions:
    /// - Punctuation is stripped.
    /// - For ALPHA/VANITY numbers: letters are converted to their numeric
    ///   representation on a telephone keypad. The keypad used here is the one
    ///   defined in ITU Recommendation E.161. This is only done if there are 3 or
    ///   more letters in the number, to lessen the risk that such letters are
    ///   typos.
    /// - For other numbers: wide-ascii digits are converted to normal ASCII
    ///   (European) digits, Arabic-Indic numerals are converted to European
    ///   numerals, and spurious alpha characters are stripped.
    pub fn normalize(&self, number: &str) -> String {
        if self.reg_exps.valid_alpha_phone_pattern.is_match(number) {
            normalize_helper(&self.reg_exps.alpha_phone_mappings, true, number)
        } else {
            Self::normalize_digits_only(number)
        }
    }

    /// Normalizes a string of characters representing a phone number. This
    /// converts wide-ascii and arabic-indic numerals to European numerals, and
    /// strips punctuation and alpha characters.
    pub fn normalize_digits_only(number: &str) -> String {
        number.chars().filter_map(normalize_digit).collect()
    }

    /// Normalizes a string of characters representing a phone number. This
    /// strips all characters which are not diallable on a mobile phone keypad
    /// (including all non-ASCII digits).
    pub fn normalize_diallable_chars_only(&self, number: &str) -> String {
        normalize_helper(&self.reg_exps.diallable_char_mappings, true, number)
    }

    /// Converts all alpha characters in a number to their respective digits on
    /// a keypad, but retains existing formatting.
    pub fn convert_alpha_characters_in_number(&self, number: &str) -> String {
        normalize_helper(&self.reg_exps.alpha_phone_mappings, false, number)
    }

    /// Checks if the number is a valid vanity (alpha) number such as 800
    /// MICROSOFT. A valid vanity number will start with at least 3 digits and
    /// will have three or more alpha characters. This does not do
    /// region-specific checks - to work out if this number is actually valid
    /// for a region, it should be parsed and methods such as
    /// [`Self::is_possible_number_with_reason`] and [`Self::is_valid_number`]
    /// should be used.
    pub fn is_alpha_number(&self, number: &str) -> bool {
        if !self.is_viable_phone_number(number) {
            // Number is too short, or doesn't match the basic phone number pattern.
            return false;
        }
        let (number, _) = self.maybe_strip_extension(number);
        self.reg_exps.valid_alpha_phone_pattern.is_match(number)
    }

    /// Returns true if the supplied region supports mobile number portability.
    pub fn is_mobile_number_portable_region(&self, region_code: &str) -> bool {
        self.get_metadata_for_region(region_code)
            .is_some_and(|metadata| metadata.mobile_number_portable_region())
    }
}
