// Copyright (C) 2011 The Libphonenumber Authors
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

use std::{
    num::NonZeroUsize,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::error;
use lru::LruCache;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
#[error("An error occurred while trying to create regex: {0}")]
pub struct InvalidRegexError(#[from] regex::Error);

/// Bounded cache of compiled patterns with least-recently-used eviction.
///
/// Compiled regexes are handed out as `Arc`, so evicting an entry never
/// invalidates a matcher that is still in use by another caller. Compilation
/// happens outside of the lock: two threads missing on the same pattern may
/// both compile it, the second insert simply replaces an identical value.
pub struct RegexCache {
    cache: Mutex<LruCache<String, Arc<Regex>>>,
}

impl RegexCache {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Arc<Regex>>> {
        // the cache holds no invariant a panicking holder could break
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns compiled regex for the pattern, compiling and caching it
    /// on first request. A hit moves the entry to the front.
    pub fn try_get_regex(&self, pattern: &str) -> Result<Arc<Regex>, InvalidRegexError> {
        if let Some(regex) = self.lock().get(pattern) {
            return Ok(regex.clone());
        }
        let regex = Arc::new(Regex::new(pattern)?);
        self.lock().put(pattern.to_owned(), regex.clone());
        Ok(regex)
    }

    /// Same as [`Self::try_get_regex`] for patterns coming from trusted
    /// metadata, where a syntax error is a data bug and therefore fatal.
    pub fn get_regex(&self, pattern: &str) -> Arc<Regex> {
        match self.try_get_regex(pattern) {
            Ok(regex) => regex,
            Err(err) => {
                error!("Invalid pattern in metadata '{}': {}", pattern, err);
                panic!("A valid regex is expected in metadata; this indicates a data bug! {}", err)
            }
        }
    }

    /// Checks presence without touching the recency order.
    pub fn contains(&self, pattern: &str) -> bool {
        self.lock().contains(pattern)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::RegexCache;

    #[test]
    fn evicts_least_recently_used() {
        let cache = RegexCache::with_capacity(2);
        cache.get_regex("a");
        cache.get_regex("b");
        // touching "a" makes "b" the eviction candidate
        cache.get_regex("a");
        cache.get_regex("c");

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(2, cache.len());
    }

    #[test]
    fn never_grows_past_capacity() {
        let cache = RegexCache::with_capacity(3);
        for i in 0..10 {
            cache.get_regex(&format!("\\d{{{}}}", i + 1));
            assert!(cache.len() <= 3);
        }
        assert_eq!(3, cache.capacity());
        assert!(cache.contains("\\d{10}"));
        assert!(!cache.contains("\\d{1}"));
    }

    #[test]
    fn hit_returns_same_compiled_regex() {
        let cache = RegexCache::with_capacity(4);
        let first = cache.get_regex("[2-9]\\d{2}");
        let second = cache.get_regex("[2-9]\\d{2}");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn evicted_regex_stays_usable() {
        let cache = RegexCache::with_capacity(1);
        let held = cache.get_regex("\\d+");
        cache.get_regex("x");
        assert!(!cache.contains("\\d+"));
        assert!(held.is_match("123"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let cache = RegexCache::with_capacity(1);
        assert!(cache.try_get_regex("(").is_err());
        assert_eq!(0, cache.len());
    }

    #[test]
    fn concurrent_hits_keep_cache_consistent() {
        let cache = RegexCache::with_capacity(8);
        std::thread::scope(|scope| {
            for t in 0..4 {
                let cache = &cache;
                scope.spawn(move || {
                    for i in 0..200 {
                        let regex = cache.get_regex(&format!("{}{}", t, i % 12));
                        assert!(regex.is_match(&format!("{}{}", t, i % 12)));
                    }
                });
            }
        });
        assert_eq!(8, cache.len());
    }
}
