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

use super::regex_util::{RegexConsume, RegexFullMatch};

use crate::{interfaces, proto_gen::phonemetadata::PhoneNumberDesc, regexp_cache::RegexCache};

pub struct RegexBasedMatcher {
    cache: RegexCache,
}

impl RegexBasedMatcher {
    pub fn new() -> Self {
        Self { cache: RegexCache::with_capacity(128) }
    }

    fn match_number(
        &self, phone_number: &str,
        number_pattern: &str,
        allow_prefix_match: bool
    ) -> bool {
        if allow_prefix_match {
            // A prefix match only counts when there is something to match.
            !phone_number.is_empty()
                && self.cache.get_regex(number_pattern).matches_start(phone_number)
        } else {
            self.cache.full_match(number_pattern, phone_number)
        }
    }
}

impl interfaces::MatcherApi for RegexBasedMatcher {
    fn match_national_number(
        &self, number: &str,
        number_desc: &PhoneNumberDesc,
        allow_prefix_match: bool
    ) -> bool {
        let national_number_pattern = number_desc.national_number_pattern();
        // We don't want to consider it a prefix match when matching non-empty input
        // against an empty pattern.
        if national_number_pattern.is_empty() {
            return false;
        }
        self.match_number(number, national_number_pattern, allow_prefix_match)
    }
}

#[cfg(test)]
mod tests {
    use super::RegexBasedMatcher;
    use crate::{interfaces::MatcherApi, proto_gen::phonemetadata::PhoneNumberDesc};

    fn desc(pattern: &str) -> PhoneNumberDesc {
        let mut desc = PhoneNumberDesc::new();
        desc.set_national_number_pattern(pattern.to_owned());
        desc
    }

    #[test]
    fn empty_pattern_never_matches() {
        let matcher = RegexBasedMatcher::new();
        let empty = PhoneNumberDesc::new();
        for allow_prefix_match in [false, true] {
            assert!(!matcher.match_national_number("", &empty, allow_prefix_match));
            assert!(!matcher.match_national_number("1234", &empty, allow_prefix_match));
            assert!(!matcher.match_national_number("1234", &desc(""), allow_prefix_match));
        }
    }

    #[test]
    fn full_match_requires_whole_number() {
        let matcher = RegexBasedMatcher::new();
        let desc = desc("[2-9]\\d{2}");
        assert!(matcher.match_national_number("234", &desc, false));
        assert!(!matcher.match_national_number("2345", &desc, false));
        assert!(!matcher.match_national_number("123", &desc, false));
    }

    #[test]
    fn prefix_match_is_anchored_at_start() {
        let matcher = RegexBasedMatcher::new();
        let desc = desc("[2-9]\\d{2}");
        assert!(matcher.match_national_number("2345", &desc, true));
        assert!(!matcher.match_national_number("1234", &desc, true));
        assert!(!matcher.match_national_number("", &desc, true));
    }

    #[test]
    fn alternation_full_match() {
        let matcher = RegexBasedMatcher::new();
        let desc = desc("80|800\\d");
        assert!(matcher.match_national_number("8001", &desc, false));
        assert!(matcher.match_national_number("80", &desc, false));
    }
}
