use thiserror::Error;

/// Errors raised while building a [`Dictionary`](crate::Dictionary).
///
/// Lookups and removals never fail: a missing key is reported as `None`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DictError {
    /// The bucket count was zero, which would make every key's bucket index undefined.
    #[error("bucket count must be at least 1")]
    ZeroBuckets,
    /// The bucket array could not be allocated.
    #[error("failed to allocate {buckets} buckets")]
    AllocFailed { buckets: u32 },
    /// A configuration value could not be parsed.
    #[error("invalid configuration value for `{name}`: {value:?}")]
    InvalidConfig { name: &'static str, value: String },
}

impl DictError {
    /// Panics with the message of this error.
    ///
    /// Used by the infallible constructors, which treat a bad configuration as a caller bug.
    #[cold]
    #[track_caller]
    pub(crate) fn panic(self) -> ! {
        panic!("Dictionary construction error: {self}")
    }
}
