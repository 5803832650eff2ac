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

use std::borrow::Cow;

use log::warn;
use regex::NoExpand;

use super::{
    errors::ValidationError,
    helper_constants::{
        DEFAULT_EXTN_PREFIX, NANPA_COUNTRY_CODE, REGION_CODE_FOR_NON_GEO_ENTITY,
        RFC3966_EXTN_PREFIX,
    },
    helper_functions::{prefix_number_with_country_calling_code, test_number_length_with_unknown_type},
    phonenumberutil::PhoneNumberUtil,
    PhoneNumberFormat, PhoneNumberType,
};
use crate::{
    macros::owned_from_cow_or,
    proto_gen::{
        phonemetadata::{NumberFormat, PhoneMetadata},
        phonenumber::PhoneNumber,
    },
    regex_util::{replacement_template, RegexConsume, RegexFullMatch},
};

impl PhoneNumberUtil {
    /// Formats a phone number in the specified format using default rules. Note
    /// that this does not promise to produce a phone number that the user can
    /// dial from where they are - although we do format in either NATIONAL or
    /// INTERNATIONAL format depending on what the client asks for, we do not
    /// currently support a more abbreviated format, such as for users in the
    /// same area who could potentially dial the number without area code.
    pub fn format<'b>(&self, phone_number: &'b PhoneNumber, number_format: PhoneNumberFormat) -> Cow<'b, str> {
        if phone_number.national_number() == 0 {
            let raw_input = phone_number.raw_input();
            if !raw_input.is_empty() {
                // Unparseable numbers that kept their raw input just use that.
                // This is the only case where a number can be formatted as E164 without a
                // leading '+' symbol (but the original number wasn't parseable anyway).
                return Cow::Borrowed(raw_input);
            }
        }
        let country_calling_code = phone_number.country_code();
        let mut formatted_number = Self::get_national_significant_number(phone_number);

        if number_format == PhoneNumberFormat::E164 {
            // Early exit for E164 case (even if the country calling code is invalid)
            // since no formatting of the national number needs to be applied.
            // Extensions are not formatted.
            prefix_number_with_country_calling_code(
                country_calling_code,
                PhoneNumberFormat::E164,
                &mut formatted_number,
            );
            return Cow::Owned(formatted_number);
        }
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Cow::Owned(formatted_number);
        }
        // Note here that all NANPA formatting rules are contained by US, so we use
        // that to format NANPA numbers. The same applies to Russian Fed regions -
        // rules are contained by Russia. French Indian Ocean country rules are
        // contained by Reunion.
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        // Metadata cannot be None because the country calling code is valid (which
        // means that the region code cannot be ZZ and must be one of our supported
        // region codes).
        let Some(metadata) = self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return Cow::Owned(formatted_number);
        };
        formatted_number = owned_from_cow_or!(
            self.format_nsn(&formatted_number, &metadata, number_format),
            formatted_number
        );
        if let Some(formatted_extension) =
            Self::get_formatted_extension(phone_number, &metadata, number_format)
        {
            formatted_number.push_str(&formatted_extension);
        }
        prefix_number_with_country_calling_code(country_calling_code, number_format, &mut formatted_number);
        Cow::Owned(formatted_number)
    }

    /// Formats a phone number in the specified format using client-defined
    /// formatting rules.
    pub fn format_by_pattern(
        &self,
        phone_number: &PhoneNumber,
        number_format: PhoneNumberFormat,
        user_defined_formats: &[NumberFormat],
    ) -> String {
        let country_calling_code = phone_number.country_code();
        let national_significant_number = Self::get_national_significant_number(phone_number);
        if !self.has_valid_country_calling_code(country_calling_code) {
            return national_significant_number;
        }
        // Note get_region_code_for_country_code() is used because formatting
        // information for regions which share a country calling code is contained
        // by only one region for performance reasons. For example, for NANPA
        // regions it will be contained in the metadata for US.
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return national_significant_number;
        };

        let formatting_pattern =
            self.choose_formatting_pattern_for_number(user_defined_formats, &national_significant_number);

        let mut formatted_number = if let Some(formatting_pattern) = formatting_pattern {
            // Before we do a replacement of the national prefix pattern $NP with the
            // national prefix, we need to copy the rule so that subsequent replacements
            // for different numbers have the appropriate national prefix.
            let mut num_format_copy = formatting_pattern.clone();
            let national_prefix_formatting_rule = formatting_pattern.national_prefix_formatting_rule();
            if !national_prefix_formatting_rule.is_empty() {
                let national_prefix = metadata.national_prefix();
                if !national_prefix.is_empty() {
                    // Replace $NP with national prefix and $FG with the first group ($1).
                    let rule = national_prefix_formatting_rule
                        .replace("$NP", national_prefix)
                        .replace("$FG", "$1");
                    num_format_copy.set_national_prefix_formatting_rule(rule);
                } else {
                    // We don't want to have a rule for how to format the national prefix if
                    // there isn't one.
                    num_format_copy.clear_national_prefix_formatting_rule();
                }
            }
            self.format_nsn_using_pattern(&national_significant_number, &num_format_copy, number_format)
                .into_owned()
        } else {
            national_significant_number
        };
        if let Some(extension) = Self::get_formatted_extension(phone_number, &metadata, number_format) {
            formatted_number.push_str(&extension);
        }
        prefix_number_with_country_calling_code(country_calling_code, number_format, &mut formatted_number);
        formatted_number
    }

    /// Formats a phone number in national format for dialing using the carrier
    /// as specified in the `carrier_code`. The `carrier_code` will always be used
    /// regardless of whether the phone number already has a preferred domestic
    /// carrier code stored. If `carrier_code` contains an empty string, returns
    /// the number in national format without any carrier code.
    pub fn format_national_number_with_carrier_code(
        &self,
        phone_number: &PhoneNumber,
        carrier_code: &str,
    ) -> String {
        let country_calling_code = phone_number.country_code();
        let national_significant_number = Self::get_national_significant_number(phone_number);
        if !self.has_valid_country_calling_code(country_calling_code) {
            return national_significant_number;
        }
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return national_significant_number;
        };

        let mut formatted_number = owned_from_cow_or!(
            self.format_nsn_with_carrier(
                &national_significant_number,
                &metadata,
                PhoneNumberFormat::National,
                carrier_code,
            ),
            national_significant_number
        );
        if let Some(formatted_extension) =
            Self::get_formatted_extension(phone_number, &metadata, PhoneNumberFormat::National)
        {
            formatted_number.push_str(&formatted_extension);
        }
        prefix_number_with_country_calling_code(
            country_calling_code,
            PhoneNumberFormat::National,
            &mut formatted_number,
        );
        formatted_number
    }

    /// Formats a phone number in national format for dialing using the carrier
    /// as specified in the preferred_domestic_carrier_code field of the
    /// PhoneNumber object passed in. If that is missing, use the
    /// `fallback_carrier_code` passed in instead. If there is no
    /// preferred_domestic_carrier_code, and the `fallback_carrier_code` contains
    /// an empty string, return the number in national format without any carrier
    /// code.
    pub fn format_national_number_with_preferred_carrier_code(
        &self,
        phone_number: &PhoneNumber,
        fallback_carrier_code: &str,
    ) -> String {
        // Historically, we set this to an empty string when parsing with raw input
        // if none was found in the input string. However, this doesn't result in a
        // number we can dial. For this reason, we treat the empty string the same
        // as if it isn't set at all.
        let carrier_code = if !phone_number.preferred_domestic_carrier_code().is_empty() {
            phone_number.preferred_domestic_carrier_code()
        } else {
            fallback_carrier_code
        };
        self.format_national_number_with_carrier_code(phone_number, carrier_code)
    }

    /// Formats a phone number for out-of-country dialing purposes. If no
    /// `calling_from` is supplied, we format the number in its INTERNATIONAL
    /// format. If the country calling code is the same as that of the region
    /// where the number is from, then NATIONAL formatting will be applied.
    ///
    /// If the number itself has a country calling code of zero or an otherwise
    /// invalid country calling code, then we return the number with no
    /// formatting applied.
    ///
    /// Note this function takes care of the case for calling inside of NANPA and
    /// between Russia and Kazakhstan (who share the same country calling code).
    /// In those cases, no international prefix is used. For regions which have
    /// multiple international prefixes, the number in its INTERNATIONAL format
    /// will be returned instead.
    pub fn format_out_of_country_calling_number(
        &self,
        phone_number: &PhoneNumber,
        calling_from: &str,
    ) -> String {
        let Some(metadata_calling_from) = self.get_metadata_for_region(calling_from) else {
            warn!(
                "Trying to format number from invalid region {}. International formatting applied.",
                calling_from
            );
            return self
                .format(phone_number, PhoneNumberFormat::International)
                .into_owned();
        };
        let country_calling_code = phone_number.country_code();
        let national_significant_number = Self::get_national_significant_number(phone_number);
        if !self.has_valid_country_calling_code(country_calling_code) {
            return national_significant_number;
        }
        if country_calling_code == NANPA_COUNTRY_CODE {
            if self.is_nanpa_country(calling_from) {
                // For NANPA regions, return the national format for these regions but
                // prefix it with the country calling code.
                let mut buf = itoa::Buffer::new();
                return fast_cat::concat_str!(
                    buf.format(country_calling_code),
                    " ",
                    &self.format(phone_number, PhoneNumberFormat::National)
                );
            }
        } else if country_calling_code == metadata_calling_from.country_code() {
            // If regions share a country calling code, the country calling code need
            // not be dialled. This also applies when dialling within a region, so this
            // if clause covers both these cases. Technically this is the case for
            // dialling from La Reunion to other overseas departments of France (French
            // Guiana, Martinique, Guadeloupe), but not vice versa - so we don't cover
            // this edge case for now and for those cases return the version including
            // country calling code. Details here:
            // http://www.petitfute.com/voyage/225-info-pratiques-reunion
            return self
                .format(phone_number, PhoneNumberFormat::National)
                .into_owned();
        }
        // Metadata cannot be None because we checked 'is_valid_region_code()' above.
        let international_prefix = metadata_calling_from.international_prefix();

        // In general, if there is a preferred international prefix, use that.
        // Otherwise, for regions that have multiple international prefixes, the
        // international format of the number is returned since we would not know
        // which one to use.
        let international_prefix_for_formatting = if metadata_calling_from.has_preferred_international_prefix() {
            metadata_calling_from.preferred_international_prefix()
        } else if self
            .reg_exps
            .single_international_prefix
            .is_match(international_prefix)
        {
            international_prefix
        } else {
            ""
        };

        let region_code = self.get_region_code_for_country_code(country_calling_code);
        // Metadata cannot be None because the country calling code is valid.
        let Some(metadata_for_region) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return national_significant_number;
        };
        let mut formatted_number = owned_from_cow_or!(
            self.format_nsn(
                &national_significant_number,
                &metadata_for_region,
                PhoneNumberFormat::International,
            ),
            national_significant_number
        );
        if let Some(formatted_extension) = Self::get_formatted_extension(
            phone_number,
            &metadata_for_region,
            PhoneNumberFormat::International,
        ) {
            formatted_number.push_str(&formatted_extension);
        }
        if !international_prefix_for_formatting.is_empty() {
            let mut buf = itoa::Buffer::new();
            formatted_number = fast_cat::concat_str!(
                international_prefix_for_formatting,
                " ",
                buf.format(country_calling_code),
                " ",
                &formatted_number
            );
        } else {
            prefix_number_with_country_calling_code(
                country_calling_code,
                PhoneNumberFormat::International,
                &mut formatted_number,
            );
        }
        formatted_number
    }

    /// Returns a number formatted in such a way that it can be dialed from a
    /// mobile phone in a specific region. If the number cannot be reached from
    /// the region (e.g. some countries block toll-free numbers from being called
    /// outside of the country), the method returns an empty string.
    pub fn format_number_for_mobile_dialing<'b>(
        &self,
        phone_number: &'b PhoneNumber,
        calling_from: &str,
        with_formatting: bool,
    ) -> Cow<'b, str> {
        let country_calling_code = phone_number.country_code();
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Cow::Borrowed(phone_number.raw_input());
        }

        let mut formatted_number = String::new();
        // Clear the extension, as that part cannot normally be dialed together with
        // the main number.
        let mut number_no_extension = phone_number.clone();
        number_no_extension.clear_extension();
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let number_type = self.get_number_type(&number_no_extension);
        let is_valid_number = number_type != PhoneNumberType::Unknown;
        if calling_from == region_code {
            let is_fixed_line_or_mobile = matches!(
                number_type,
                PhoneNumberType::FixedLine | PhoneNumberType::FixedLineOrMobile | PhoneNumberType::Mobile
            );
            // Carrier codes may be needed in some countries. We handle this here.
            if region_code == "BR" && is_fixed_line_or_mobile {
                // Historically, we set this to an empty string when parsing with raw
                // input if none was found in the input string. However, this doesn't
                // result in a number we can dial. For this reason, we treat the empty
                // string the same as if it isn't set at all.
                if !number_no_extension.preferred_domestic_carrier_code().is_empty() {
                    formatted_number =
                        self.format_national_number_with_preferred_carrier_code(&number_no_extension, "");
                }
                // Otherwise Brazilian fixed line and mobile numbers need to be dialed
                // with a carrier code when called within Brazil. Without that, most
                // of the carriers won't connect the call, so the result stays empty.
            } else if country_calling_code == NANPA_COUNTRY_CODE {
                // For NANPA countries, we output international format for numbers that
                // can be dialed internationally, since that always works, except for
                // numbers which might potentially be short numbers, which are always
                // dialled in national format.
                let is_shorter_than_possible_normal_number = self
                    .get_metadata_for_region(calling_from)
                    .is_some_and(|region_metadata| {
                        let national_number = Self::get_national_significant_number(&number_no_extension);
                        test_number_length_with_unknown_type(&national_number, &region_metadata)
                            == Err(ValidationError::TooShort)
                    });
                let format = if self.can_be_internationally_dialled(&number_no_extension)
                    && !is_shorter_than_possible_normal_number
                {
                    PhoneNumberFormat::International
                } else {
                    PhoneNumberFormat::National
                };
                formatted_number = self.format(&number_no_extension, format).into_owned();
            } else {
                // For non-geographical countries, and Mexican, Chilean and Uzbek fixed
                // line and mobile numbers, we output international format for numbers
                // that can be dialed internationally as that always works.
                // MX fixed line and mobile numbers should always be formatted in
                // international format, even when dialed within MX. For national
                // format to work, a carrier code needs to be used, and the correct
                // carrier code depends on if the caller and callee are from the same
                // local area. CL fixed line numbers need the national prefix when
                // dialing in the national format, but don't have it when used for
                // display; the reverse is true for mobile numbers. UZ mobile and
                // fixed-line numbers have to be formatted in international format or
                // prefixed with special codes we have no complete data on.
                let format = if (region_code == REGION_CODE_FOR_NON_GEO_ENTITY
                    || (matches!(region_code, "MX" | "CL" | "UZ") && is_fixed_line_or_mobile))
                    && self.can_be_internationally_dialled(&number_no_extension)
                {
                    PhoneNumberFormat::International
                } else {
                    PhoneNumberFormat::National
                };
                formatted_number = self.format(&number_no_extension, format).into_owned();
            }
        } else if is_valid_number && self.can_be_internationally_dialled(&number_no_extension) {
            // We assume that short numbers are not diallable from outside their
            // region, so if a number is not a valid regular length phone number, we
            // treat it as if it cannot be internationally dialled.
            let format = if with_formatting {
                PhoneNumberFormat::International
            } else {
                PhoneNumberFormat::E164
            };
            return Cow::Owned(self.format(&number_no_extension, format).into_owned());
        }
        if with_formatting {
            Cow::Owned(formatted_number)
        } else {
            Cow::Owned(self.normalize_diallable_chars_only(&formatted_number))
        }
    }

    /// Formats the national significant number with the region's own formats.
    /// Returns the input untouched when no format applies.
    pub(crate) fn format_nsn<'b>(
        &self,
        phone_number: &'b str,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
    ) -> Cow<'b, str> {
        self.format_nsn_with_carrier(phone_number, metadata, number_format, "")
    }

    fn format_nsn_with_carrier<'b>(
        &self,
        number: &'b str,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
        carrier_code: &str,
    ) -> Cow<'b, str> {
        // When the intl_number_formats exists, we use that to format national number
        // for the INTERNATIONAL format instead of using the number_formats.
        let available_formats =
            if metadata.intl_number_format.is_empty() || number_format == PhoneNumberFormat::National {
                &metadata.number_format
            } else {
                &metadata.intl_number_format
            };
        match self.choose_formatting_pattern_for_number(available_formats, number) {
            Some(formatting_pattern) => self.format_nsn_using_pattern_with_carrier(
                number,
                formatting_pattern,
                number_format,
                carrier_code,
            ),
            None => Cow::Borrowed(number),
        }
    }

    pub(crate) fn choose_formatting_pattern_for_number<'b>(
        &self,
        available_formats: &'b [NumberFormat],
        national_number: &str,
    ) -> Option<&'b NumberFormat> {
        available_formats.iter().find(|format| {
            // We always use the last leading_digits_pattern, as it is the most
            // detailed.
            let leading_digits_match = format.leading_digits_pattern.last().is_none_or(|last| {
                self.reg_exps
                    .regexp_cache
                    .get_regex(last)
                    .matches_start(national_number)
            });
            leading_digits_match
                && self
                    .reg_exps
                    .regexp_cache
                    .full_match(format.pattern(), national_number)
        })
    }

    /// Note that carrier_code is optional - if an empty string, no carrier code
    /// replacement will take place.
    fn format_nsn_using_pattern_with_carrier<'b>(
        &self,
        national_number: &'b str,
        formatting_pattern: &NumberFormat,
        number_format: PhoneNumberFormat,
        carrier_code: &str,
    ) -> Cow<'b, str> {
        let mut number_format_rule = Cow::Borrowed(formatting_pattern.format());
        let domestic_carrier_code_formatting_rule = formatting_pattern.domestic_carrier_code_formatting_rule();
        if number_format == PhoneNumberFormat::National
            && !carrier_code.is_empty()
            && !domestic_carrier_code_formatting_rule.is_empty()
        {
            // Replace the $CC in the formatting rule with the desired carrier code.
            let carrier_code_formatting_rule = self
                .reg_exps
                .carrier_code_pattern
                .replace(domestic_carrier_code_formatting_rule, NoExpand(carrier_code));
            // Now replace the $FG in the formatting rule with the first group and
            // the carrier code combined in the appropriate way.
            number_format_rule = Cow::Owned(
                self.reg_exps
                    .first_group_capturing_pattern
                    .replace(&number_format_rule, &*replacement_template(&carrier_code_formatting_rule))
                    .into_owned(),
            );
        } else {
            // Use the national prefix formatting rule instead.
            let national_prefix_formatting_rule = formatting_pattern.national_prefix_formatting_rule();
            if number_format == PhoneNumberFormat::National && !national_prefix_formatting_rule.is_empty() {
                // Apply the national_prefix_formatting_rule as the formatting_pattern
                // contains only information on how the national significant number
                // should be formatted at this point.
                number_format_rule = Cow::Owned(
                    self.reg_exps
                        .first_group_capturing_pattern
                        .replace(&number_format_rule, &*replacement_template(national_prefix_formatting_rule))
                        .into_owned(),
                );
            }
        }

        // The pattern fully matches the number, so the whole number is replaced.
        let pattern_to_match = self.reg_exps.regexp_cache.get_full_regex(formatting_pattern.pattern());
        let formatted_number = pattern_to_match
            .replace(national_number, &*replacement_template(&number_format_rule))
            .into_owned();

        if number_format != PhoneNumberFormat::RFC3966 {
            return Cow::Owned(formatted_number);
        }
        // First consume any leading punctuation, if any was present.
        let without_leading_separators = match self.reg_exps.separator_pattern.find_start(&formatted_number) {
            Some(leading) => &formatted_number[leading.end()..],
            None => &formatted_number,
        };
        // Then replace all separators with a "-".
        Cow::Owned(
            self.reg_exps
                .separator_pattern
                .replace_all(without_leading_separators, "-")
                .into_owned(),
        )
    }

    /// Simple wrapper of format_nsn_using_pattern_with_carrier for the common
    /// case of no carrier code.
    pub(crate) fn format_nsn_using_pattern<'b>(
        &self,
        national_number: &'b str,
        formatting_pattern: &NumberFormat,
        number_format: PhoneNumberFormat,
    ) -> Cow<'b, str> {
        self.format_nsn_using_pattern_with_carrier(national_number, formatting_pattern, number_format, "")
    }

    /// Returns the formatted extension of a phone number, if the phone number had
    /// an extension specified, else None.
    fn get_formatted_extension(
        phone_number: &PhoneNumber,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
    ) -> Option<String> {
        if !phone_number.has_extension() || phone_number.extension().is_empty() {
            return None;
        }
        let prefix = if number_format == PhoneNumberFormat::RFC3966 {
            RFC3966_EXTN_PREFIX
        } else if metadata.has_preferred_extn_prefix() {
            metadata.preferred_extn_prefix()
        } else {
            DEFAULT_EXTN_PREFIX
        };
        Some(fast_cat::concat_str!(prefix, phone_number.extension()))
    }
}
