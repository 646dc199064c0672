//! Environment variable reader
//!
//! Reads through a lookup function instead of `std::env` directly so configuration
//! loaders can be tested without mutating the process environment.

use crate::error::{ConfigError, ConfigResult};
use std::str::FromStr;

/// Accumulating reader over a key → value lookup
pub struct EnvReader<F> {
    lookup: F,
    missing: Vec<String>,
}

impl EnvReader<fn(&str) -> Option<String>> {
    /// Reader backed by the process environment
    pub fn from_process() -> Self {
        fn process_lookup(key: &str) -> Option<String> {
            std::env::var(key).ok()
        }
        EnvReader::new(process_lookup as fn(&str) -> Option<String>)
    }
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(lookup: F) -> Self {
        Self {
            lookup,
            missing: Vec::new(),
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    /// Read a required variable.
    ///
    /// A missing or blank value is recorded and an empty string returned; call
    /// [`EnvReader::finish`] once every key has been read to surface them together.
    pub fn required(&mut self, key: &str) -> String {
        match self.get(key) {
            Some(value) => value,
            None => {
                self.missing.push(key.to_string());
                String::new()
            },
        }
    }

    /// Read an optional variable, falling back to `default`
    pub fn optional(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Read and parse an optional variable, falling back to `default` when unset
    pub fn parsed<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::invalid(key, &raw, e.to_string())),
            None => Ok(default),
        }
    }

    /// Fail with every missing required key, in the order they were read
    pub fn finish(self) -> ConfigResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(self.missing))
        }
    }
}
