use std::borrow::Cow;

use crate::proto_gen::phonemetadata::PhoneNumberDesc;

/// Internal phonenumber matching API used to isolate the underlying
/// implementation of the matcher and allow different implementations to be
/// swapped in easily.
pub(crate) trait MatcherApi: Send + Sync {
    /// Returns whether the given national number (a string containing only decimal
    /// digits) matches the national number pattern defined in the given
    /// PhoneNumberDesc message.
    fn match_national_number(
        &self,
        number: &str,
        number_desc: &PhoneNumberDesc,
        allow_prefix_match: bool,
    ) -> bool;
}

/// Supplies raw metadata bytes for a resource identifier.
///
/// Where the bytes come from (bundled blob, file system, network) is up to
/// the implementor. `None` means the resource does not exist.
pub trait MetadataLoader: Send + Sync {
    fn load_metadata(&self, resource: &str) -> Option<Cow<'static, [u8]>>;
}

impl<F> MetadataLoader for F
where
    F: Fn(&str) -> Option<Cow<'static, [u8]>> + Send + Sync,
{
    fn load_metadata(&self, resource: &str) -> Option<Cow<'static, [u8]>> {
        self(resource)
    }
}
