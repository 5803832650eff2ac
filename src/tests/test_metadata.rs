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

//! A small hand-written metadata set shaped like the compiled one: types
//! without numbers carry the `-1` possible length, formatting rules already
//! have `$NP`/`$FG` resolved.

use std::{
    borrow::Cow,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Once,
    },
};

use protobuf::{Message, MessageField};

use crate::{
    metadata::{CountryCodeToRegionCodeMap, LoadMode, MetadataLayout, MetadataSource},
    proto_gen::phonemetadata::{NumberFormat, PhoneMetadata, PhoneMetadataCollection, PhoneNumberDesc},
    PhoneNumberUtil,
};

static LOGGER: Once = Once::new();

pub fn init_logger() {
    LOGGER.call_once(|| {
        colog::default_builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .init()
    });
}

fn desc(pattern: &str, possible_lengths: &[i32], example: Option<&str>) -> MessageField<PhoneNumberDesc> {
    let mut desc = PhoneNumberDesc::new();
    desc.set_national_number_pattern(pattern.to_owned());
    desc.possible_length = possible_lengths.to_vec();
    if let Some(example) = example {
        desc.set_example_number(example.to_owned());
    }
    MessageField::some(desc)
}

fn no_numbers() -> MessageField<PhoneNumberDesc> {
    let mut desc = PhoneNumberDesc::new();
    desc.possible_length = vec![-1];
    MessageField::some(desc)
}

fn number_format(pattern: &str, format: &str, leading_digits: &[&str], national_prefix_rule: &str) -> NumberFormat {
    let mut number_format = NumberFormat::new();
    number_format.set_pattern(pattern.to_owned());
    number_format.set_format(format.to_owned());
    number_format.leading_digits_pattern = leading_digits.iter().map(|p| p.to_string()).collect();
    if !national_prefix_rule.is_empty() {
        number_format.set_national_prefix_formatting_rule(national_prefix_rule.to_owned());
    }
    number_format
}

fn region(id: &str, country_code: i32, international_prefix: &str) -> PhoneMetadata {
    let mut metadata = PhoneMetadata::new();
    metadata.set_id(id.to_owned());
    metadata.set_country_code(country_code);
    metadata.set_international_prefix(international_prefix.to_owned());
    metadata.general_desc = no_numbers();
    metadata.fixed_line = no_numbers();
    metadata.mobile = no_numbers();
    metadata.toll_free = no_numbers();
    metadata.premium_rate = no_numbers();
    metadata.shared_cost = no_numbers();
    metadata.personal_number = no_numbers();
    metadata.voip = no_numbers();
    metadata.pager = no_numbers();
    metadata.uan = no_numbers();
    metadata.voicemail = no_numbers();
    metadata.no_international_dialling = no_numbers();
    metadata
}

fn us() -> PhoneMetadata {
    let mut metadata = region("US", 1, "011");
    metadata.set_main_country_for_code(true);
    metadata.set_national_prefix("1".to_owned());
    metadata.set_national_prefix_for_parsing("1".to_owned());
    metadata.set_same_mobile_and_fixed_line_pattern(true);
    metadata.set_mobile_number_portable_region(true);
    metadata.general_desc = desc("[2-9]\\d{9}", &[10], None);
    metadata.general_desc.mut_or_insert_default().possible_length_local_only = vec![7];
    metadata.fixed_line = desc("[3-79]\\d{9}|2[0-35-9]\\d{8}", &[10], Some("2015550123"));
    metadata.mobile = desc("[3-79]\\d{9}|2[0-35-9]\\d{8}", &[10], Some("2015550123"));
    metadata.toll_free = desc("8(?:00|33|44|55|66|77|88)\\d{7}", &[10], Some("8002345678"));
    metadata.premium_rate = desc("900\\d{7}", &[10], Some("9002345678"));
    metadata.no_international_dialling = desc("800\\d{7}", &[10], None);
    metadata.number_format = vec![
        number_format("(\\d{3})(\\d{4})", "$1-$2", &["[2-9]"], ""),
        {
            let mut format = number_format("(\\d{3})(\\d{3})(\\d{4})", "($1) $2-$3", &["[2-9]"], "");
            format.set_national_prefix_optional_when_formatting(true);
            format
        },
    ];
    metadata.intl_number_format = vec![number_format("(\\d{3})(\\d{3})(\\d{4})", "$1-$2-$3", &["[2-9]"], "")];
    metadata
}

fn bs() -> PhoneMetadata {
    let mut metadata = region("BS", 1, "011");
    metadata.set_national_prefix("1".to_owned());
    metadata.set_national_prefix_for_parsing("1".to_owned());
    metadata.set_leading_digits("242".to_owned());
    metadata.general_desc = desc("242\\d{7}", &[10], None);
    metadata.fixed_line = desc("242[2-9]\\d{6}", &[10], Some("2423651234"));
    metadata
}

fn gb() -> PhoneMetadata {
    let mut metadata = region("GB", 44, "00");
    metadata.set_national_prefix("0".to_owned());
    metadata.set_national_prefix_for_parsing("0".to_owned());
    metadata.set_preferred_extn_prefix(" x".to_owned());
    metadata.general_desc = desc("\\d{10}", &[10], None);
    metadata.fixed_line = desc("[12]\\d{9}", &[], Some("1212345678"));
    metadata.mobile = desc("7[1-57-9]\\d{8}", &[], Some("7912345678"));
    metadata.toll_free = desc("80\\d{8}", &[], Some("8012345678"));
    metadata.premium_rate = desc("9[018]\\d{8}", &[], Some("9187654321"));
    metadata.number_format = vec![
        number_format("(\\d{2})(\\d{4})(\\d{4})", "$1 $2 $3", &["[1-59]|[78]0"], "0$1"),
        number_format("(\\d{4})(\\d{6})", "$1 $2", &["7"], "0$1"),
    ];
    metadata
}

fn de() -> PhoneMetadata {
    let mut metadata = region("DE", 49, "00");
    metadata.set_national_prefix("0".to_owned());
    metadata.set_national_prefix_for_parsing("0".to_owned());
    metadata.general_desc = desc("[1-9]\\d{5,10}", &[6, 7, 8, 9, 10, 11], None);
    metadata.fixed_line = desc("[2-9]\\d{5,9}", &[], Some("30123456"));
    metadata.mobile = desc("1[5-7]\\d{8,9}", &[10, 11], Some("15123456789"));
    metadata.number_format = vec![
        number_format("(\\d{2})(\\d{2,8})", "$1 $2", &["3[02]|40|[68]9"], "0$1"),
        number_format("(\\d{3})(\\d{7,8})", "$1 $2", &["1[5-7]"], "0$1"),
    ];
    metadata
}

fn it() -> PhoneMetadata {
    let mut metadata = region("IT", 39, "00");
    metadata.general_desc = desc("[03]\\d{5,10}", &[6, 7, 8, 9, 10, 11], None);
    metadata.fixed_line = desc("0\\d{5,10}", &[], Some("0236618300"));
    metadata.mobile = desc("3\\d{8,9}", &[9, 10], Some("345678901"));
    metadata.number_format = vec![
        number_format("(\\d{2})(\\d{4})(\\d{4})", "$1 $2 $3", &["0[26]"], ""),
        number_format("(\\d{3})(\\d{3})(\\d{3,4})", "$1 $2 $3", &["3"], ""),
    ];
    metadata
}

fn au() -> PhoneMetadata {
    let mut metadata = region("AU", 61, "001[14-689]");
    metadata.set_preferred_international_prefix("0011".to_owned());
    metadata.set_national_prefix("0".to_owned());
    metadata.set_national_prefix_for_parsing("0".to_owned());
    metadata.general_desc = desc("[1-578]\\d{8}", &[9], None);
    metadata.fixed_line = desc("[2378]\\d{8}", &[], Some("212345678"));
    metadata.mobile = desc("4\\d{8}", &[], Some("412345678"));
    metadata.number_format = vec![
        number_format("(\\d)(\\d{4})(\\d{4})", "$1 $2 $3", &["[2378]"], "(0$1)"),
        number_format("(\\d{3})(\\d{3})(\\d{3})", "$1 $2 $3", &["4"], "0$1"),
    ];
    metadata
}

fn br() -> PhoneMetadata {
    let mut metadata = region("BR", 55, "00(?:1[245]|2[135]|31|4[13]|[56]5|99)");
    metadata.set_national_prefix("0".to_owned());
    metadata.set_national_prefix_for_parsing("0(?:(1[245]|2[135]|31|4[13]|[56]5|99))?".to_owned());
    metadata.general_desc = desc("[1-9]\\d{9,10}", &[10, 11], None);
    metadata.fixed_line = desc("[1-9][1-9][2-5]\\d{7}", &[10], Some("1123456789"));
    metadata.mobile = desc("[1-9][1-9]9\\d{8}", &[11], Some("11961234567"));
    metadata.number_format = vec![{
        let mut format = number_format("(\\d{2})(\\d{4})(\\d{4})", "$1 $2-$3", &["[1-9][1-9][2-5]"], "($1)");
        format.set_domestic_carrier_code_formatting_rule("0 $CC ($1)".to_owned());
        format
    }];
    metadata
}

fn international_toll_free() -> PhoneMetadata {
    let mut metadata = region("001", 800, "");
    metadata.general_desc = desc("\\d{8}", &[8], None);
    metadata.toll_free = desc("\\d{8}", &[8], Some("12345678"));
    metadata.number_format = vec![number_format("(\\d{4})(\\d{4})", "$1 $2", &[], "")];
    metadata
}

fn all_regions() -> Vec<PhoneMetadata> {
    vec![us(), bs(), gb(), de(), it(), au(), br(), international_toll_free()]
}

pub fn test_metadata_collection() -> PhoneMetadataCollection {
    let mut collection = PhoneMetadataCollection::new();
    collection.metadata = all_regions();
    collection
}

/// Utility over metadata registered up front.
pub fn get_phone_util() -> PhoneNumberUtil {
    init_logger();
    PhoneNumberUtil::new_for_metadata(test_metadata_collection())
}

/// Serializes records into the bytes a loader hands out.
pub fn serialize(records: Vec<PhoneMetadata>) -> Cow<'static, [u8]> {
    let mut collection = PhoneMetadataCollection::new();
    collection.metadata = records;
    Cow::Owned(
        collection
            .write_to_bytes()
            .expect("test metadata should serialize"),
    )
}

/// A loader serving one resource per region or non-geographical calling
/// code, counting every call it receives.
pub fn multi_file_loader(calls: Arc<AtomicUsize>) -> impl Fn(&str) -> Option<Cow<'static, [u8]>> + Send + Sync {
    let layout = MetadataLayout::multi_file();
    move |resource: &str| {
        calls.fetch_add(1, Ordering::SeqCst);
        let record = all_regions().into_iter().find(|metadata| {
            let expected = if metadata.id() == "001" {
                layout.resource_for_country_calling_code(metadata.country_code())
            } else {
                layout.resource_for_region(metadata.id())
            };
            expected == resource
        })?;
        Some(serialize(vec![record]))
    }
}

/// Utility whose metadata is bootstrapped lazily through a multi-file
/// loader. The returned counter tracks loader invocations.
pub fn get_lazy_phone_util(mode: LoadMode) -> (PhoneNumberUtil, Arc<AtomicUsize>) {
    init_logger();
    let calls = Arc::new(AtomicUsize::new(0));
    let source = MetadataSource::new(
        multi_file_loader(calls.clone()),
        MetadataLayout::multi_file(),
        mode,
    );
    let map = CountryCodeToRegionCodeMap::from_collection(&test_metadata_collection());
    (PhoneNumberUtil::new_with_source(source, map), calls)
}
