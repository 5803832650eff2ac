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

use std::collections::{HashMap, HashSet};

use dec_from_char::DecimalExtended;
use strum::IntoEnumIterator;

use crate::proto_gen::{
    phonemetadata::{PhoneMetadata, PhoneNumberDesc},
    phonenumber::PhoneNumber,
};

use super::{
    NumberLengthType, PhoneNumberFormat, PhoneNumberType,
    errors::ValidationError,
    helper_constants::{
        DIGITS, OPTIONAL_EXT_SUFFIX, PLUS_SIGN, POSSIBLE_CHARS_AFTER_EXT_LABEL,
        POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL, RFC3966_EXTN_PREFIX, RFC3966_PREFIX,
    },
};

/// Returns a reference to the description inside the metadata of the
/// appropriate type.
pub(super) fn get_number_desc_by_type(
    metadata: &PhoneMetadata,
    phone_number_type: PhoneNumberType,
) -> &PhoneNumberDesc {
    match phone_number_type {
        PhoneNumberType::PremiumRate => &metadata.premium_rate,
        PhoneNumberType::TollFree => &metadata.toll_free,
        PhoneNumberType::Mobile => &metadata.mobile,
        PhoneNumberType::FixedLine | PhoneNumberType::FixedLineOrMobile => &metadata.fixed_line,
        PhoneNumberType::SharedCost => &metadata.shared_cost,
        PhoneNumberType::VoIP => &metadata.voip,
        PhoneNumberType::PersonalNumber => &metadata.personal_number,
        PhoneNumberType::Pager => &metadata.pager,
        PhoneNumberType::UAN => &metadata.uan,
        PhoneNumberType::VoiceMail => &metadata.voicemail,
        // Instead of the default case, we only match `Unknown`
        PhoneNumberType::Unknown => &metadata.general_desc,
    }
}

/// A helper function that is used by format and format_by_pattern.
pub(super) fn prefix_number_with_country_calling_code(
    country_calling_code: i32,
    number_format: PhoneNumberFormat,
    formatted_number: &mut String,
) {
    let mut buf = itoa::Buffer::new();
    let country_calling_code_str = buf.format(country_calling_code);

    // we anyway allocate a new string in concatenation, so we'l do it once
    // with capacity of resulting string
    let new_str = match number_format {
        PhoneNumberFormat::E164 => {
            fast_cat::concat_str!(PLUS_SIGN, country_calling_code_str, &formatted_number)
        }
        PhoneNumberFormat::International => {
            fast_cat::concat_str!(PLUS_SIGN, country_calling_code_str, " ", &formatted_number)
        }
        PhoneNumberFormat::RFC3966 => fast_cat::concat_str!(
            RFC3966_PREFIX,
            PLUS_SIGN,
            country_calling_code_str,
            "-",
            &formatted_number
        ),
        PhoneNumberFormat::National => return,
    };
    *formatted_number = new_str;
}

/// Helper method for constructing regular expressions for parsing. Creates an
/// expression that captures up to max_length digits.
fn extn_digits(max_length: u32) -> String {
    let mut buf = itoa::Buffer::new();
    fast_cat::concat_str!("([", DIGITS, "]{1,", buf.format(max_length), "})")
}

// Helper initialiser method to create the regular-expression pattern to match
// extensions when parsing. Note that:
// - There are currently eight capturing groups for the extension itself. If
// this number is changed, maybe_strip_extension needs to be updated.
// - The only capturing groups should be around the digits that you want to
// capture as part of the extension, or else parsing will fail!
pub(super) fn create_extn_pattern() -> String {
    // We cap the maximum length of an extension based on the ambiguity of the
    // way the extension is prefixed. As per ITU, the officially allowed
    // length for extensions is actually 40, but we don't support this since we
    // haven't seen real examples and this introduces many false interpretations
    // as the extension labels are not standardized.
    let ext_limit_after_explicit_label = 20;
    let ext_limit_after_likely_label = 15;
    let ext_limit_after_ambiguous_char = 9;
    let ext_limit_when_not_sure = 6;

    // Two options for representing any non-ASCII character like ó are allowed:
    // the character itself, and one in the unicode decomposed form with the
    // combining acute accent.

    // Here the extension is called out in a more explicit way, i.e mentioning it
    // obvious patterns like "ext.".
    let explicit_ext_labels = "(?:e?xt(?:ensi(?:o\u{0301}?|\u{00F3}))?n?|(?:\u{FF45})?\u{FF58}\u{FF54}(?:\u{FF4E})?|\u{0434}\u{043E}\u{0431}|anexo)";
    // One-character symbols that can be used to indicate an extension, and less
    // commonly used or more ambiguous extension labels.
    let ambiguous_ext_labels = "(?:[x\u{FF58}#\u{FF03}~\u{FF5E}]|int|\u{FF49}\u{FF4E}\u{FF54})";
    // When extension is not separated clearly.
    let ambiguous_separator = "[- ]+";

    let rfc_extn = fast_cat::concat_str!(
        RFC3966_EXTN_PREFIX,
        &extn_digits(ext_limit_after_explicit_label)
    );
    let explicit_extn = fast_cat::concat_str!(
        POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL,
        explicit_ext_labels,
        POSSIBLE_CHARS_AFTER_EXT_LABEL,
        &extn_digits(ext_limit_after_explicit_label),
        OPTIONAL_EXT_SUFFIX
    );
    let ambiguous_extn = fast_cat::concat_str!(
        POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL,
        ambiguous_ext_labels,
        POSSIBLE_CHARS_AFTER_EXT_LABEL,
        &extn_digits(ext_limit_after_ambiguous_char),
        OPTIONAL_EXT_SUFFIX
    );
    let american_style_extn_with_suffix = fast_cat::concat_str!(
        ambiguous_separator,
        &extn_digits(ext_limit_when_not_sure),
        "#"
    );

    // ",," is commonly used for auto dialling the extension when connected.
    // Semi-colon works in Iphone and also in Android to pop up a button with
    // the extension number following.
    let auto_dialling_and_ext_labels_found = "(?:,{2}|;)";
    // This is same as POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL, but not
    // matching comma as extension label may have it.
    let possible_separators_number_ext_label_no_comma = "[ \u{00A0}\\t]*";

    let auto_dialling_extn = fast_cat::concat_str!(
        possible_separators_number_ext_label_no_comma,
        auto_dialling_and_ext_labels_found,
        POSSIBLE_CHARS_AFTER_EXT_LABEL,
        &extn_digits(ext_limit_after_likely_label),
        OPTIONAL_EXT_SUFFIX
    );
    let only_commas_extn = fast_cat::concat_str!(
        possible_separators_number_ext_label_no_comma,
        "(?:,)+",
        POSSIBLE_CHARS_AFTER_EXT_LABEL,
        &extn_digits(ext_limit_after_ambiguous_char),
        OPTIONAL_EXT_SUFFIX
    );

    // The first pattern covers RFC 3966 format, where the extension is added
    // using ";ext=". The second is more generic, where the extension is
    // mentioned with explicit labels like "ext:". In both cases we allow more
    // digits than for any other label. The third captures single character
    // labels or less commonly used ones, with fewer digits, to reduce the
    // chance of reading two adjacent numbers as number + extension. The fourth
    // covers American numbers written with a hash at the end, such as
    // "- 503#". The last two are the autodialling forms: the first accepts
    // longer extensions, the second is liberal on the number of commas and so
    // strict on the digit count.
    fast_cat::concat_str!(
        &rfc_extn,
        "|",
        &explicit_extn,
        "|",
        &ambiguous_extn,
        "|",
        &american_style_extn_with_suffix,
        "|",
        &auto_dialling_extn,
        "|",
        &only_commas_extn
    )
}

/// Converts a single decimal digit of any script to its ASCII form.
pub(crate) fn normalize_digit(digit: char) -> Option<char> {
    if digit.is_ascii_digit() {
        return Some(digit);
    }
    digit
        .to_decimal_utf8()
        .and_then(|value| char::from_digit(value as u32, 10))
}

/// Normalizes a string of characters representing a phone number by replacing
/// all characters found in the accompanying map with the values therein, and
/// stripping all other characters if remove_non_matches is true.
///
/// Parameters:
/// * `normalization_replacements` - a mapping of characters to what they should be
///   replaced by in the normalized version of the phone number
/// * `remove_non_matches` - indicates whether characters that are not able to be
///   replaced should be stripped from the number. If this is false, they will be
///   left unchanged in the number.
/// * `phone_number` - a string of characters representing a phone number to
///   be normalized.
pub(super) fn normalize_helper(
    normalization_replacements: &HashMap<char, char>,
    remove_non_matches: bool,
    phone_number: &str,
) -> String {
    let mut normalized_number = String::with_capacity(phone_number.len());
    for phone_char in phone_number.chars() {
        if let Some(replacement) = normalization_replacements.get(&phone_char.to_ascii_uppercase()) {
            normalized_number.push(*replacement);
        } else if !remove_non_matches {
            normalized_number.push(phone_char);
        }
        // If neither of the above are true, we remove this character.
    }
    normalized_number
}

/// Returns `true` if there is any possible number data set for a particular
/// PhoneNumberDesc.
pub(super) fn desc_has_possible_number_data(desc: &PhoneNumberDesc) -> bool {
    // If this is empty, it means numbers of this type inherit from the "general
    // desc" -> the value "-1" means that no numbers exist for this type.
    desc.possible_length.len() != 1 || desc.possible_length[0] != -1
}

/// Returns `true` if there is any data set for a particular PhoneNumberDesc.
pub(super) fn desc_has_data(desc: &PhoneNumberDesc) -> bool {
    // Checking most properties since we don't know what's present, since a custom
    // build may have stripped just one of them (e.g. example numbers). We don't
    // bother checking the possible_length_local_only, since if this is the only
    // thing that's present we don't really support the type at all: no
    // type-specific methods will work with only this data.
    desc.has_example_number()
        || desc_has_possible_number_data(desc)
        || desc.has_national_number_pattern()
}

/// Returns the types we have metadata for based on the PhoneMetadata object
/// passed in.
pub(super) fn get_supported_types_for_metadata(metadata: &PhoneMetadata) -> HashSet<PhoneNumberType> {
    PhoneNumberType::iter()
        // Never return FIXED_LINE_OR_MOBILE (it is a convenience type, and
        // represents that a particular number type can't be
        // determined) or UNKNOWN (the non-type).
        .filter(|number_type| {
            !matches!(
                number_type,
                PhoneNumberType::FixedLineOrMobile | PhoneNumberType::Unknown
            )
        })
        .filter(|number_type| desc_has_data(get_number_desc_by_type(metadata, *number_type)))
        .collect()
}

/// Helper method to check a number against possible lengths for this number
/// type, and determine whether it matches, or is too short or too long.
pub(super) fn test_number_length(
    phone_number: &str,
    phone_metadata: &PhoneMetadata,
    phone_number_type: PhoneNumberType,
) -> Result<NumberLengthType, ValidationError> {
    let desc_for_type = get_number_desc_by_type(phone_metadata, phone_number_type);
    // There should always be "possible_length" set for every element. For size
    // efficiency, where a sub-description (e.g. fixed-line) has the same
    // possible lengths as the parent, this is missing, so we fall back to the
    // general desc (where no numbers of the type exist at all, there is one
    // possible length (-1) which is guaranteed not to match the length of any
    // real phone number).
    let mut possible_lengths = if desc_for_type.possible_length.is_empty() {
        phone_metadata.general_desc.possible_length.clone()
    } else {
        desc_for_type.possible_length.clone()
    };

    let mut local_lengths = desc_for_type.possible_length_local_only.clone();
    if phone_number_type == PhoneNumberType::FixedLineOrMobile {
        let fixed_line_desc = get_number_desc_by_type(phone_metadata, PhoneNumberType::FixedLine);
        if !desc_has_possible_number_data(fixed_line_desc) {
            // The rare case has been encountered where no fixedLine data is available
            // (true for some non-geographical entities), so we just check mobile.
            return test_number_length(phone_number, phone_metadata, PhoneNumberType::Mobile);
        }
        let mobile_desc = get_number_desc_by_type(phone_metadata, PhoneNumberType::Mobile);
        if desc_has_possible_number_data(mobile_desc) {
            // Merge the mobile data in if there was any. Note that when adding the
            // possible lengths from mobile, we have to again check they aren't
            // empty since if they are this indicates they are the same as the
            // general desc and should be obtained from there.
            let len_to_append = if mobile_desc.possible_length.is_empty() {
                &phone_metadata.general_desc.possible_length
            } else {
                &mobile_desc.possible_length
            };
            possible_lengths.extend_from_slice(len_to_append);
            possible_lengths.sort();

            if local_lengths.is_empty() {
                local_lengths = mobile_desc.possible_length_local_only.clone();
            } else {
                local_lengths.extend_from_slice(&mobile_desc.possible_length_local_only);
                local_lengths.sort();
            }
        }
    }

    // If the type is not suported at all (indicated by the possible lengths
    // containing -1 at this point) we return invalid length.
    let (Some(&minimum_length), Some(&maximum_length)) = (possible_lengths.first(), possible_lengths.last())
    else {
        return Err(ValidationError::InvalidLength);
    };
    if minimum_length == -1 {
        return Err(ValidationError::InvalidLength);
    }

    let actual_length = phone_number.len() as i32;
    // This is safe because there is never an overlap beween the possible lengths
    // and the local-only lengths; this is checked at build time.
    if local_lengths.contains(&actual_length) {
        return Ok(NumberLengthType::IsPossibleLocalOnly);
    }

    if minimum_length == actual_length {
        Ok(NumberLengthType::IsPossible)
    } else if minimum_length > actual_length {
        Err(ValidationError::TooShort)
    } else if maximum_length < actual_length {
        Err(ValidationError::TooLong)
    } else if possible_lengths[1..].contains(&actual_length) {
        // We skip the first element; we've already checked it.
        Ok(NumberLengthType::IsPossible)
    } else {
        Err(ValidationError::InvalidLength)
    }
}

/// Helper method to check a number against possible lengths for this region,
/// based on the metadata being passed in, and determine whether it matches, or
/// is too short or too long.
pub(super) fn test_number_length_with_unknown_type(
    phone_number: &str,
    phone_metadata: &PhoneMetadata,
) -> Result<NumberLengthType, ValidationError> {
    test_number_length(phone_number, phone_metadata, PhoneNumberType::Unknown)
}

/// A helper function to set the values related to leading zeros in a
/// PhoneNumber.
pub(super) fn set_italian_leading_zeros_for_phone_number(
    national_number: &str,
    phone_number: &mut PhoneNumber,
) {
    let bytes = national_number.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        phone_number.set_italian_leading_zero(true);
        let mut number_of_leading_zeros = 1;
        // Note that if the national number is all "0"s, the last "0" is not
        // counted as a leading zero.
        while number_of_leading_zeros < bytes.len() - 1 && bytes[number_of_leading_zeros] == b'0' {
            number_of_leading_zeros += 1;
        }
        if number_of_leading_zeros != 1 {
            phone_number.set_number_of_leading_zeros(number_of_leading_zeros as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc_with_lengths(lengths: &[i32], local_only: &[i32]) -> PhoneNumberDesc {
        let mut desc = PhoneNumberDesc::new();
        desc.possible_length = lengths.to_vec();
        desc.possible_length_local_only = local_only.to_vec();
        desc
    }

    #[test]
    fn test_number_length_against_general_desc() {
        let mut metadata = PhoneMetadata::new();
        metadata.general_desc = protobuf::MessageField::some(desc_with_lengths(&[6, 8, 9], &[3]));

        assert_eq!(Ok(NumberLengthType::IsPossible), test_number_length_with_unknown_type("123456", &metadata));
        assert_eq!(Ok(NumberLengthType::IsPossible), test_number_length_with_unknown_type("123456789", &metadata));
        assert_eq!(Ok(NumberLengthType::IsPossibleLocalOnly), test_number_length_with_unknown_type("123", &metadata));
        assert_eq!(Err(ValidationError::TooShort), test_number_length_with_unknown_type("12345", &metadata));
        assert_eq!(Err(ValidationError::InvalidLength), test_number_length_with_unknown_type("1234567", &metadata));
        assert_eq!(Err(ValidationError::TooLong), test_number_length_with_unknown_type("1234567890", &metadata));
    }

    #[test]
    fn unsupported_type_has_invalid_length() {
        let mut metadata = PhoneMetadata::new();
        metadata.general_desc = protobuf::MessageField::some(desc_with_lengths(&[7], &[]));
        metadata.pager = protobuf::MessageField::some(desc_with_lengths(&[-1], &[]));

        assert_eq!(
            Err(ValidationError::InvalidLength),
            test_number_length("1234567", &metadata, PhoneNumberType::Pager)
        );
        assert!(!get_supported_types_for_metadata(&metadata).contains(&PhoneNumberType::Pager));
    }

    #[test]
    fn fixed_line_or_mobile_merges_lengths() {
        let mut metadata = PhoneMetadata::new();
        metadata.general_desc = protobuf::MessageField::some(desc_with_lengths(&[7, 10], &[]));
        metadata.fixed_line = protobuf::MessageField::some(desc_with_lengths(&[7], &[]));
        metadata.mobile = protobuf::MessageField::some(desc_with_lengths(&[10], &[]));

        assert_eq!(
            Ok(NumberLengthType::IsPossible),
            test_number_length("1234567890", &metadata, PhoneNumberType::FixedLineOrMobile)
        );
        assert_eq!(
            Err(ValidationError::TooLong),
            test_number_length("1234567890", &metadata, PhoneNumberType::FixedLine)
        );
    }

    #[test]
    fn italian_leading_zeros() {
        let mut number = PhoneNumber::new();
        set_italian_leading_zeros_for_phone_number("0236618300", &mut number);
        assert!(number.italian_leading_zero());
        assert_eq!(1, number.number_of_leading_zeros());

        let mut number = PhoneNumber::new();
        set_italian_leading_zeros_for_phone_number("0001", &mut number);
        assert_eq!(3, number.number_of_leading_zeros());

        let mut number = PhoneNumber::new();
        set_italian_leading_zeros_for_phone_number("000", &mut number);
        assert_eq!(2, number.number_of_leading_zeros());

        let mut number = PhoneNumber::new();
        set_italian_leading_zeros_for_phone_number("0", &mut number);
        assert!(!number.has_italian_leading_zero());
    }

    #[test]
    fn normalizes_unicode_digits() {
        assert_eq!(Some('5'), normalize_digit('5'));
        assert_eq!(Some('6'), normalize_digit('\u{FF16}'));
        assert_eq!(Some('3'), normalize_digit('\u{0663}'));
        assert_eq!(None, normalize_digit('a'));
    }
}
