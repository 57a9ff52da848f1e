use std::str::FromStr;

use log::warn;

use crate::error::DictError;

/// Construction options for a [`Dictionary`](crate::Dictionary).
///
/// # Examples
///
/// ```
/// use chaindict::{DictConfig, Dictionary};
///
/// let config = DictConfig::default().with_buckets(101);
/// let dict: Dictionary<u32, &str> = Dictionary::with_config(config).unwrap();
///
/// assert_eq!(dict.bucket_count(), 101);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DictConfig {
    /// The fixed number of buckets. Must be at least `1`.
    pub buckets: u32,
    /// A chain longer than this is reported at `trace` level on insertion.
    pub chain_trace_threshold: usize,
}

impl DictConfig {
    /// 31 buckets suit a few dozen to a couple hundred keys.
    pub const DEFAULT_BUCKETS: u32 = 31;

    pub const DEFAULT_CHAIN_TRACE_THRESHOLD: usize = 8;

    pub const ENV_BUCKETS: &'static str = "DICT_BUCKETS";

    pub const ENV_CHAIN_TRACE_THRESHOLD: &'static str = "DICT_CHAIN_TRACE_THRESHOLD";

    /// Sets the number of buckets.
    #[must_use]
    #[inline]
    pub fn with_buckets(mut self, buckets: u32) -> Self {
        self.buckets = buckets;
        self
    }

    /// Sets the chain length above which insertions are traced.
    #[must_use]
    #[inline]
    pub fn with_chain_trace_threshold(mut self, threshold: usize) -> Self {
        self.chain_trace_threshold = threshold;
        self
    }

    /// Checks that the configuration can build a dictionary.
    pub fn validate(&self) -> Result<(), DictError> {
        if self.buckets == 0 {
            warn!("Rejected dictionary configuration with zero buckets");
            return Err(DictError::ZeroBuckets);
        }
        Ok(())
    }

    /// Reads the configuration from the environment, falling back to the defaults for unset
    /// variables.
    ///
    /// - `DICT_BUCKETS`: the bucket count.
    ///
    /// - `DICT_CHAIN_TRACE_THRESHOLD`: the chain length above which insertions are traced.
    pub fn from_env() -> Result<Self, DictError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from a variable lookup function.
    fn from_lookup<F>(lookup: F) -> Result<Self, DictError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(Self::ENV_BUCKETS) {
            config.buckets = parse_var(Self::ENV_BUCKETS, &raw)?;
        }
        if let Some(raw) = lookup(Self::ENV_CHAIN_TRACE_THRESHOLD) {
            config.chain_trace_threshold = parse_var(Self::ENV_CHAIN_TRACE_THRESHOLD, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T: FromStr>(name: &'static str, raw: &str) -> Result<T, DictError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| DictError::InvalidConfig {
            name,
            value: raw.to_string(),
        })
}

impl Default for DictConfig {
    #[inline]
    fn default() -> Self {
        Self {
            buckets: Self::DEFAULT_BUCKETS,
            chain_trace_threshold: Self::DEFAULT_CHAIN_TRACE_THRESHOLD,
        }
    }
}
