use crate::{AsYouTypeFormatter, AsYouTypeState};

use super::{region_code::RegionCode, test_metadata::get_phone_util};

/// Feeds `input` one character at a time and checks every intermediate output.
fn assert_outputs(formatter: &mut AsYouTypeFormatter, input: &str, expected: &[&str]) {
    assert_eq!(input.chars().count(), expected.len(), "one output per typed char");
    for (next_char, expected_output) in input.chars().zip(expected) {
        assert_eq!(*expected_output, formatter.input_digit(next_char), "after typing {next_char:?}");
    }
}

#[test]
fn invalid_region() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::zz());
    assert_outputs(
        &mut formatter,
        "+442087654321",
        &[
            "+",
            "+4",
            "+44 ",
            "+44 2",
            "+44 20",
            "+44 20 8",
            "+44 20 87",
            "+44 20 876",
            "+44 20 8765",
            "+44 20 8765 4",
            "+44 20 8765 43",
            "+44 20 8765 432",
            "+44 20 8765 4321",
        ],
    );

    // Without a plus sign nothing can be formatted.
    formatter.clear();
    assert_outputs(&mut formatter, "2087", &["2", "20", "208", "2087"]);
}

#[test]
fn us_toll_free() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_eq!(AsYouTypeState::Idle, formatter.state());

    assert_eq!("8", formatter.input_digit('8'));
    assert_eq!("80", formatter.input_digit('0'));
    assert_eq!(AsYouTypeState::Accumulating, formatter.state());
    assert_eq!("800", formatter.input_digit('0'));
    // Both US formats still fit, so neither is settled on yet.
    assert_eq!(AsYouTypeState::CountryCodeResolved, formatter.state());
    // The local format is tried first and dropped once the number outgrows it.
    assert_outputs(
        &mut formatter,
        "555121",
        &["800-5", "800-55", "800-555", "800-5551", "(800) 555-12", "(800) 555-121"],
    );
    assert_eq!(AsYouTypeState::Formatted, formatter.state());
    assert_eq!("(800) 555-1212", formatter.input_digit_and_remember_position('2'));
    assert_eq!(AsYouTypeState::Formatted, formatter.state());
    assert_eq!(14, formatter.get_remembered_position());
    assert_eq!("(800) 555-1212", formatter.current_output());
}

#[test]
fn us_international_with_plus() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_eq!("+", formatter.input_digit('+'));
    assert_eq!("+1", formatter.input_digit('1'));
    assert_eq!("+1 6", formatter.input_digit('6'));
    assert_eq!(AsYouTypeState::CountryCodeResolved, formatter.state());
    assert_outputs(
        &mut formatter,
        "502530000",
        &[
            "+1 65",
            "+1 650",
            "+1 650-2",
            "+1 650-25",
            "+1 650-253",
            "+1 650-253-0",
            "+1 650-253-00",
            "+1 650-253-000",
            "+1 650-253-0000",
        ],
    );
    assert_eq!(AsYouTypeState::Formatted, formatter.state());
}

#[test]
fn us_dialling_out_with_idd() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(
        &mut formatter,
        "011442087654321",
        &[
            "0",
            "01",
            "011 ",
            "011 4",
            "011 44 ",
            "011 44 2",
            "011 44 20",
            "011 44 20 8",
            "011 44 20 87",
            "011 44 20 876",
            "011 44 20 8765",
            "011 44 20 8765 4",
            "011 44 20 8765 43",
            "011 44 20 8765 432",
            "011 44 20 8765 4321",
        ],
    );
}

#[test]
fn gb_national_prefix() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::gb());
    assert_outputs(
        &mut formatter,
        "02087654321",
        &[
            "0",
            "02",
            "020",
            "020 8",
            "020 87",
            "020 876",
            "020 8765",
            "020 8765 4",
            "020 8765 43",
            "020 8765 432",
            "020 8765 4321",
        ],
    );
}

#[test]
fn non_geographical_number() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(
        &mut formatter,
        "+80012345678",
        &[
            "+",
            "+8",
            "+80",
            "+800 ",
            "+800 1",
            "+800 12",
            "+800 123",
            "+800 1234",
            "+800 1234 5",
            "+800 1234 56",
            "+800 1234 567",
            "+800 1234 5678",
        ],
    );
}

#[test]
fn user_formatting_switches_to_free_form() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(&mut formatter, "650-", &["6", "65", "650", "650-"]);
    assert_eq!(AsYouTypeState::FreeForm, formatter.state());
    // Everything after that is echoed back.
    assert_eq!("650-2", formatter.input_digit('2'));
    assert_eq!("650-25", formatter.input_digit('5'));
    assert_eq!(AsYouTypeState::FreeForm, formatter.state());
}

#[test]
fn full_width_digits() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_eq!("\u{FF16}", formatter.input_digit('\u{FF16}'));
    assert_eq!("\u{FF16}\u{FF15}", formatter.input_digit('\u{FF15}'));
    // Once formatting starts the digits are normalized.
    assert_eq!("650", formatter.input_digit('\u{FF10}'));
    assert_eq!("650-2", formatter.input_digit('\u{FF12}'));
}

#[test]
fn remember_position() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(&mut formatter, "650", &["6", "65", "650"]);
    assert_eq!("650-2", formatter.input_digit_and_remember_position('2'));
    assert_eq!(5, formatter.get_remembered_position());

    // The position follows the digit when separators are inserted in front of it.
    assert_outputs(&mut formatter, "5300", &["650-25", "650-253", "650-2530", "(650) 253-00"]);
    assert_eq!(7, formatter.get_remembered_position());

    formatter.clear();
    assert_eq!(0, formatter.get_remembered_position());
}

#[test]
fn remember_position_in_free_form() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(&mut formatter, "65", &["6", "65"]);
    assert_eq!("650", formatter.input_digit_and_remember_position('0'));
    assert_eq!("650-", formatter.input_digit('-'));
    assert_eq!(3, formatter.get_remembered_position());
}

#[test]
fn index_maps() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(&mut formatter, "6502", &["6", "65", "650", "650-2"]);
    assert_eq!(&[Some(0), Some(1), Some(2), Some(4)], formatter.original_to_formatted());
    assert_eq!(
        &[Some(0), Some(1), Some(2), None, Some(3)],
        formatter.formatted_to_original()
    );
}

#[test]
fn full_width_plus_maps_to_leading_plus() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(
        &mut formatter,
        "\u{FF0B}1650",
        &["\u{FF0B}", "\u{FF0B}1", "+1 6", "+1 65", "+1 650"],
    );
    assert_eq!(
        &[Some(0), Some(1), Some(3), Some(4), Some(5)],
        formatter.original_to_formatted()
    );
    assert_eq!(
        &[Some(0), Some(1), None, Some(2), Some(3), Some(4)],
        formatter.formatted_to_original()
    );
}

#[test]
fn clear_resets_state() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_outputs(&mut formatter, "+44", &["+", "+4", "+44 "]);
    formatter.clear();
    assert_eq!(AsYouTypeState::Idle, formatter.state());
    assert_eq!("", formatter.current_output());
    assert!(formatter.original_to_formatted().is_empty());
    assert!(formatter.formatted_to_original().is_empty());

    // The default region is back in effect.
    assert_outputs(
        &mut formatter,
        "6502530000",
        &[
            "6",
            "65",
            "650",
            "650-2",
            "650-25",
            "650-253",
            "650-2530",
            "(650) 253-00",
            "(650) 253-000",
            "(650) 253-0000",
        ],
    );
}
