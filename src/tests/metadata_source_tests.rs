use std::{
    borrow::Cow,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Barrier, LazyLock,
    },
    thread,
};

use crate::{
    CountryCodeToRegionCodeMap, LoadMode, MetadataError, MetadataLayout, MetadataSource, ParseError,
    PhoneNumberFormat, PhoneNumberUtil,
};

use super::{
    region_code::RegionCode,
    test_metadata::{
        get_lazy_phone_util, get_phone_util, init_logger, multi_file_loader, serialize,
        test_metadata_collection,
    },
};

static SHARED_PHONE_UTIL: LazyLock<PhoneNumberUtil> =
    LazyLock::new(|| get_lazy_phone_util(LoadMode::Strict).0);

fn counting_source(mode: LoadMode) -> (MetadataSource, Arc<AtomicUsize>) {
    init_logger();
    let calls = Arc::new(AtomicUsize::new(0));
    let source = MetadataSource::new(
        multi_file_loader(calls.clone()),
        MetadataLayout::multi_file(),
        mode,
    );
    (source, calls)
}

#[test]
fn resource_names() {
    let multi_file = MetadataLayout::multi_file();
    assert_eq!("PhoneNumberMetadataProto_US", multi_file.resource_for_region("US"));
    assert_eq!("PhoneNumberMetadataProto_800", multi_file.resource_for_country_calling_code(800));

    let single_file = MetadataLayout::single_file();
    assert_eq!("PhoneNumberMetadataProto", single_file.resource_for_region("US"));
    assert_eq!("PhoneNumberMetadataProto", single_file.resource_for_country_calling_code(800));
}

#[test]
fn nothing_is_loaded_up_front() {
    let (phone_util, calls) = get_lazy_phone_util(LoadMode::Strict);
    // Region listings come from the calling code map alone.
    assert_eq!(7, phone_util.get_supported_regions().count());
    assert!(phone_util.is_nanpa_country(RegionCode::bs()));
    assert_eq!(0, calls.load(Ordering::SeqCst));
}

#[test]
fn regions_are_loaded_on_first_use() {
    let (phone_util, calls) = get_lazy_phone_util(LoadMode::Strict);
    let source = phone_util.metadata_source();

    let number = phone_util.parse("650 253 0000", RegionCode::us()).unwrap();
    assert_eq!(6502530000, number.national_number());
    assert!(source.is_resource_loaded("PhoneNumberMetadataProto_US"));
    assert!(!source.is_resource_loaded("PhoneNumberMetadataProto_GB"));

    // Loaded resources are never fetched again.
    let loads_after_first_parse = calls.load(Ordering::SeqCst);
    phone_util.parse("650 253 0001", RegionCode::us()).unwrap();
    assert_eq!(loads_after_first_parse, calls.load(Ordering::SeqCst));

    let gb_number = phone_util.parse("+44 20 8765 4321", RegionCode::us()).unwrap();
    assert_eq!("020 8765 4321", phone_util.format(&gb_number, PhoneNumberFormat::National));
    assert!(source.is_resource_loaded("PhoneNumberMetadataProto_GB"));
}

#[test]
fn lazy_and_eager_utilities_agree() {
    let (lazy, _) = get_lazy_phone_util(LoadMode::Strict);
    let eager = get_phone_util();
    for input in ["+1 242 365 1234", "+44 7912 345678", "+39 02 3661 8300", "+800 1234 5678"] {
        let lazy_number = lazy.parse(input, RegionCode::zz()).unwrap();
        let eager_number = eager.parse(input, RegionCode::zz()).unwrap();
        assert_eq!(eager_number, lazy_number);
        assert_eq!(eager.get_number_type(&eager_number), lazy.get_number_type(&lazy_number));
        assert_eq!(
            eager.format(&eager_number, PhoneNumberFormat::International),
            lazy.format(&lazy_number, PhoneNumberFormat::International)
        );
    }
}

#[test]
fn non_geographical_entities_are_loaded_by_calling_code() {
    let (phone_util, calls) = get_lazy_phone_util(LoadMode::Strict);
    assert_eq!(Ok(()), phone_util.load_metadata_for_non_geo_entity(800));
    assert!(phone_util
        .metadata_source()
        .is_resource_loaded("PhoneNumberMetadataProto_800"));
    assert_eq!(1, calls.load(Ordering::SeqCst));

    let metadata = phone_util.get_metadata_for_non_geographical_region(800).unwrap();
    assert_eq!("001", metadata.id());
    assert_eq!(1, calls.load(Ordering::SeqCst));
}

#[test]
fn concurrent_lookups_load_once() {
    let (source, calls) = counting_source(LoadMode::Strict);
    let barrier = Barrier::new(8);
    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                barrier.wait();
                let metadata = source
                    .get_metadata_for_region("GB")
                    .unwrap()
                    .expect("GB should be registered");
                assert_eq!(44, metadata.country_code());
            });
        }
    });
    assert_eq!(1, calls.load(Ordering::SeqCst));
}

#[test]
fn process_wide_instance_is_shared_across_threads() {
    thread::scope(|scope| {
        for input in ["+44 20 8765 4321", "+1 650 253 0000", "+49 30 123456", "+800 1234 5678"] {
            scope.spawn(move || {
                let number = SHARED_PHONE_UTIL.parse(input, RegionCode::zz()).unwrap();
                assert!(SHARED_PHONE_UTIL.is_valid_number(&number), "{input}");
            });
        }
    });
}

#[test]
fn distinct_resources_load_independently() {
    let (source, calls) = counting_source(LoadMode::Strict);
    assert!(source.get_metadata_for_region("GB").unwrap().is_some());
    assert!(source.get_metadata_for_region("DE").unwrap().is_some());
    assert!(source.get_metadata_for_region("GB").unwrap().is_some());
    assert_eq!(2, calls.load(Ordering::SeqCst));
}

#[test]
fn single_file_layout_loads_everything_at_once() {
    init_logger();
    let calls = Arc::new(AtomicUsize::new(0));
    let loader_calls = calls.clone();
    let source = MetadataSource::new(
        move |resource: &str| -> Option<Cow<'static, [u8]>> {
            loader_calls.fetch_add(1, Ordering::SeqCst);
            (resource == "PhoneNumberMetadataProto")
                .then(|| serialize(test_metadata_collection().metadata))
        },
        MetadataLayout::single_file(),
        LoadMode::Strict,
    );
    assert_eq!("US", source.get_metadata_for_region("US").unwrap().unwrap().id());
    assert_eq!("AU", source.get_metadata_for_region("AU").unwrap().unwrap().id());
    assert_eq!(
        800,
        source
            .get_metadata_for_non_geographical_region(800)
            .unwrap()
            .unwrap()
            .country_code()
    );
    assert_eq!(1, calls.load(Ordering::SeqCst));
}

#[test]
fn decoded_collection_is_registered_up_front() {
    let source = MetadataSource::from_collection(test_metadata_collection());
    assert!(source.is_resource_loaded("PhoneNumberMetadataProto"));
    assert_eq!("BR", source.get_metadata_for_region("BR").unwrap().unwrap().id());
    assert_eq!(None, source.get_metadata_for_region("FR").unwrap());
}

#[test]
fn strict_mode_reports_missing_resource_once() {
    let (phone_util, calls) = get_lazy_phone_util(LoadMode::Strict);
    let expected = Err(MetadataError::NotFound {
        resource: "PhoneNumberMetadataProto_FR".to_owned(),
    });
    assert_eq!(expected, phone_util.load_metadata_for_region(RegionCode::fr()));
    // The failure is remembered, the loader is not asked again.
    assert_eq!(expected, phone_util.load_metadata_for_region(RegionCode::fr()));
    assert_eq!(1, calls.load(Ordering::SeqCst));
    assert!(phone_util
        .metadata_source()
        .is_resource_loaded("PhoneNumberMetadataProto_FR"));
}

#[test]
fn lenient_mode_treats_missing_resource_as_empty() {
    let (source, calls) = counting_source(LoadMode::Lenient);
    assert_eq!(Ok(None), source.get_metadata_for_region("FR"));
    assert_eq!(Ok(None), source.get_metadata_for_region("FR"));
    assert_eq!(1, calls.load(Ordering::SeqCst));
}

#[test]
fn parsing_for_region_without_metadata_has_no_calling_code() {
    init_logger();
    let serve = multi_file_loader(Arc::new(AtomicUsize::new(0)));
    let source = MetadataSource::new(
        move |resource: &str| -> Option<Cow<'static, [u8]>> {
            if resource == "PhoneNumberMetadataProto_GB" {
                return None;
            }
            serve(resource)
        },
        MetadataLayout::multi_file(),
        LoadMode::Lenient,
    );
    let map = CountryCodeToRegionCodeMap::from_collection(&test_metadata_collection());
    let phone_util = PhoneNumberUtil::new_with_source(source, map);

    // GB is still a known region, but its resource is empty.
    assert!(phone_util.get_metadata_for_region(RegionCode::gb()).is_none());
    assert!(matches!(
        phone_util.parse("020 8765 4321", RegionCode::gb()),
        Err(ParseError::InvalidCountryCode)
    ));
    assert!(matches!(
        phone_util.parse_and_keep_raw_input("020 8765 4321", RegionCode::gb()),
        Err(ParseError::InvalidCountryCode)
    ));

    let us_number = phone_util.parse("650 253 0000", RegionCode::us()).unwrap();
    assert_eq!(1, us_number.country_code());
}

#[test]
fn corrupt_bytes_are_rejected_in_every_mode() {
    init_logger();
    for mode in [LoadMode::Strict, LoadMode::Lenient] {
        let source = MetadataSource::new(
            |_: &str| -> Option<Cow<'static, [u8]>> { Some(Cow::Owned(vec![0xff; 3])) },
            MetadataLayout::multi_file(),
            mode,
        );
        let err = source.get_metadata_for_region("US").unwrap_err();
        assert!(
            matches!(&err, MetadataError::Corrupt { resource, .. } if resource == "PhoneNumberMetadataProto_US"),
            "{err}"
        );
    }
}

#[test]
fn empty_collection_depends_on_mode() {
    init_logger();
    let empty_loader = |_: &str| -> Option<Cow<'static, [u8]>> { Some(serialize(Vec::new())) };

    let strict = MetadataSource::new(empty_loader, MetadataLayout::multi_file(), LoadMode::Strict);
    assert_eq!(
        Err(MetadataError::Corrupt {
            resource: "PhoneNumberMetadataProto_US".to_owned(),
            reason: "empty metadata".to_owned(),
        }),
        strict.get_metadata_for_region("US")
    );

    let lenient = MetadataSource::new(empty_loader, MetadataLayout::multi_file(), LoadMode::Lenient);
    assert_eq!(Ok(None), lenient.get_metadata_for_region("US"));
}

#[test]
#[should_panic]
fn missing_metadata_for_known_region_is_fatal() {
    init_logger();
    let source = MetadataSource::new(
        |_: &str| -> Option<Cow<'static, [u8]>> { None },
        MetadataLayout::multi_file(),
        LoadMode::Strict,
    );
    let map = CountryCodeToRegionCodeMap::new([(1, vec!["US".to_owned()])]);
    let phone_util = PhoneNumberUtil::new_with_source(source, map);
    phone_util.get_metadata_for_region(RegionCode::us());
}
