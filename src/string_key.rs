use core::fmt;
use core::ops::Deref;

use crate::key::Key;

/// Hashes a byte string with CRC-32 (IEEE).
#[inline]
fn checksum(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

/// A convenience key type that owns a string.
///
/// Hashing uses the CRC-32 (IEEE) checksum of the UTF-8 bytes, equality is byte-wise.
/// `str` and `String` implement [`Key`] the same way, so a `StringKey`, a `String` and a `&str`
/// with the same text always select the same bucket.
///
/// # Examples
///
/// ```
/// use chaindict::{Dictionary, StringKey};
///
/// let mut dict = Dictionary::new();
/// dict.set(StringKey::from("foo"), "bar");
///
/// assert_eq!(dict.get(&StringKey::from("foo")), Some(&"bar"));
/// assert_eq!(dict.get(&StringKey::from("bar")), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct StringKey(String);

impl StringKey {
    /// Creates a new key from anything that converts into a `String`.
    #[inline]
    pub fn new(s: impl Into<String>) -> Self {
        StringKey(s.into())
    }

    /// Returns the key as a string slice.
    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key and returns the inner `String`.
    #[inline(always)]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Key for StringKey {
    #[inline]
    fn hash(&self) -> u32 {
        checksum(self.0.as_bytes())
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        self.0.as_bytes() == other.0.as_bytes()
    }
}

impl Key for str {
    #[inline]
    fn hash(&self) -> u32 {
        checksum(self.as_bytes())
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Key for String {
    #[inline]
    fn hash(&self) -> u32 {
        checksum(self.as_bytes())
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl From<&str> for StringKey {
    #[inline]
    fn from(s: &str) -> Self {
        StringKey(s.to_owned())
    }
}

impl From<String> for StringKey {
    #[inline]
    fn from(s: String) -> Self {
        StringKey(s)
    }
}

impl From<char> for StringKey {
    #[inline]
    fn from(c: char) -> Self {
        StringKey(c.to_string())
    }
}

impl Deref for StringKey {
    type Target = str;

    #[inline(always)]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StringKey {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StringKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
