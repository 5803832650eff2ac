// Copyright (C) 2009 The Libphonenumber Authors
// Copyright (C) 2025 The Kashin Vladislav (Rust adaptation author)
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

use std::{borrow::Cow, sync::Arc};

use regex::{Captures, Match, Regex};

use crate::regexp_cache::RegexCache;

/// Wraps a pattern so it only matches the whole input. `find` alone is not
/// enough: leftmost-first alternation may stop before the end of the input
/// even when another branch would consume all of it.
pub fn full_match_pattern(pattern: &str) -> String {
    fast_cat::concat_str!("^(?:", pattern, ")$")
}

/// Rewrites group references of a metadata replacement rule (`$1`) into the
/// braced form (`${1}`). Unbraced, the regex crate would read "$1a" or "$15"
/// as a single group name.
pub fn replacement_template(rule: &str) -> Cow<'_, str> {
    if !rule.contains('$') {
        return Cow::Borrowed(rule);
    }
    let mut template = String::with_capacity(rule.len() + 4);
    let mut chars = rule.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('$', Some(digit)) if digit.is_ascii_digit() => {
                template.push_str("${");
                template.push(*digit);
                template.push('}');
                chars.next();
            }
            _ => template.push(c),
        }
    }
    Cow::Owned(template)
}

/// Equivalent of `lookingAt`/`Consume`: the match must start at position 0.
pub trait RegexConsume {
    fn matches_start(&self, s: &str) -> bool {
        self.find_start(s).is_some()
    }

    fn captures_start<'a>(&self, s: &'a str) -> Option<Captures<'a>>;
    fn find_start<'a>(&self, s: &'a str) -> Option<Match<'a>>;
}

impl RegexConsume for Regex {
    fn captures_start<'a>(&self, s: &'a str) -> Option<Captures<'a>> {
        let captures = self.captures(s)?;
        let full_capture = captures.get(0)?;
        if full_capture.start() != 0 {
            return None
        }

        Some(captures)
    }

    fn find_start<'a>(&self, s: &'a str) -> Option<Match<'a>> {
        let found = self.find(s)?;
        if found.start() != 0 {
            return None
        }
        Some(found)
    }
}

/// Full-match helpers over a [`RegexCache`], keyed by the anchored pattern.
pub trait RegexFullMatch {
    fn get_full_regex(&self, pattern: &str) -> Arc<Regex>;

    fn full_match(&self, pattern: &str, s: &str) -> bool {
        self.get_full_regex(pattern).is_match(s)
    }
}

impl RegexFullMatch for RegexCache {
    fn get_full_regex(&self, pattern: &str) -> Arc<Regex> {
        self.get_regex(&full_match_pattern(pattern))
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::{replacement_template, RegexConsume, RegexFullMatch};
    use crate::regexp_cache::RegexCache;

    #[test]
    fn full_match_tries_every_alternative() {
        let cache = RegexCache::with_capacity(4);
        assert!(cache.full_match("1|12", "12"));
        assert!(cache.full_match("1|12", "1"));
        assert!(!cache.full_match("1|12", "123"));
        assert!(!cache.full_match("\\d{3}", "12"));
    }

    #[test]
    fn consume_is_anchored_at_start() {
        let regex = Regex::new("0|1").unwrap();
        assert!(regex.matches_start("012"));
        assert!(!regex.matches_start("201"));
        let captures = Regex::new("(\\d)x").unwrap();
        assert!(captures.captures_start("a1x").is_none());
        assert_eq!("1", &captures.captures_start("1xa").unwrap()[1]);
    }

    #[test]
    fn replacement_template_braces_single_digit_groups() {
        assert_eq!("${1} ${2}-${3}", replacement_template("$1 $2-$3"));
        assert_eq!("0${1}5", replacement_template("0$15"));
        assert_eq!("$NP $FG", replacement_template("$NP $FG"));
        assert_eq!("no groups", replacement_template("no groups"));

        let regex = Regex::new("(\\d{2})(\\d)").unwrap();
        assert_eq!("0125", regex.replace("123", &*replacement_template("0$15")));
    }
}
