//! Metadata-driven phone number parsing, validation and formatting.
//!
//! [`PhoneNumberUtil`] is the entry point. Its metadata comes from a
//! [`MetadataSource`], which asks a [`MetadataLoader`] for serialized
//! [`PhoneMetadataCollection`] bytes the first time a region or
//! non-geographical calling code is needed.

mod interfaces;
/// This module is automatically generated from /resources/*.proto
mod proto_gen {
    include!(concat!(env!("OUT_DIR"), "/proto_gen/mod.rs"));
}
mod phonenumberutil;
mod asyoutypeformatter;
mod regexp_cache;
mod regex_based_matcher;
pub mod i18n;
pub mod metadata;
pub(crate) mod regex_util;

/// I decided to create this module because there are many
/// boilerplate places in the code that can be replaced with macros,
/// the name of which will describe what is happening more
/// clearly than a few lines of code.
mod macros;

#[cfg(test)]
mod tests;

pub use asyoutypeformatter::{AsYouTypeFormatter, AsYouTypeState};
pub use interfaces::MetadataLoader;
pub use metadata::{
    CountryCodeToRegionCodeMap, LoadMode, MetadataContainer, MetadataError, MetadataLayout,
    MetadataSource,
};
pub use phonenumberutil::{
    errors::{
        ExtractNumberError, GetExampleNumberError, NotANumberError, ParseError, ValidationError,
    },
    phonenumberutil::PhoneNumberUtil,
    NumberLengthType, PhoneNumberFormat, PhoneNumberType,
};
pub use proto_gen::{
    phonemetadata::{NumberFormat, PhoneMetadata, PhoneMetadataCollection, PhoneNumberDesc},
    phonenumber::{phone_number::CountryCodeSource, PhoneNumber},
};
pub use regexp_cache::{InvalidRegexError, RegexCache};
