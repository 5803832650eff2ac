pub(crate) mod helper_constants;
pub(crate) mod helper_functions;
pub mod errors;
pub mod enums;
pub mod phonenumberutil;
mod phone_number_regexps_and_mappings;
mod helper_types;
mod parsing;
mod formatting;

pub use enums::{PhoneNumberFormat, PhoneNumberType, NumberLengthType};
