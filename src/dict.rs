use core::fmt::{self, Debug, Display};
use core::iter::FusedIterator;
use core::mem;
use core::slice;

use log::{debug, trace, warn};

use crate::chain::{Chain, ChainIter, Entry, EntryPool, NIL};
use crate::config::DictConfig;
use crate::error::DictError;
use crate::key::Key;

/// A dictionary built on separate chaining with a fixed number of buckets.
///
/// Every key is routed to the bucket `key.hash() % bucket_count`. Each bucket holds a doubly
/// linked chain of entries, and each entry caches its key's hash so that a scan only calls
/// [`Key::equal`] when the hashes match. New keys are inserted at the head of their chain; an
/// existing key is replaced in place.
///
/// The bucket count is chosen at construction and never changes. The default of `31` suits a
/// few dozen to a couple hundred keys; larger loads should pick a larger count, since chains
/// grow linearly with the number of entries.
///
/// The dictionary is not synchronized. Wrap it in a lock to share it between threads.
///
/// # Examples
///
/// ```
/// use chaindict::{Dictionary, StringKey};
///
/// let mut dict = Dictionary::new();
///
/// dict.set(StringKey::from("foo"), "bar");
///
/// assert_eq!(dict.get(&StringKey::from("foo")), Some(&"bar"));
/// assert_eq!(dict.get(&StringKey::from("bar")), None);
///
/// assert_eq!(dict.delete(&StringKey::from("foo")), Some("bar"));
/// assert_eq!(dict.delete(&StringKey::from("bar")), None);
/// ```
pub struct Dictionary<K, V> {
    chains: Box<[Chain]>,
    pool: EntryPool<K, V>,
    chain_trace_threshold: usize,
}

// Core implementation
impl<K, V> Dictionary<K, V>
where
    K: Key,
{
    /// Creates a new `Dictionary` with the default bucket count of `31`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::Dictionary;
    ///
    /// let dict: Dictionary<u32, &str> = Dictionary::new();
    ///
    /// assert_eq!(dict.len(), 0);
    /// assert_eq!(dict.bucket_count(), 31);
    /// ```
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        match Self::with_config(DictConfig::default()) {
            Ok(dict) => dict,
            Err(e) => e.panic(),
        }
    }

    /// Creates a new `Dictionary` with `buckets` buckets.
    ///
    /// # Panics
    ///
    /// This function will panic if `buckets` is `0` or if the buckets cannot be allocated. Use
    /// [`Dictionary::try_with_buckets`] to get an error instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::Dictionary;
    ///
    /// let dict: Dictionary<u32, &str> = Dictionary::with_buckets(7);
    ///
    /// assert_eq!(dict.bucket_count(), 7);
    /// ```
    #[must_use]
    #[inline]
    #[track_caller]
    pub fn with_buckets(buckets: u32) -> Self {
        match Self::try_with_buckets(buckets) {
            Ok(dict) => dict,
            Err(e) => e.panic(),
        }
    }

    /// Creates a new `Dictionary` with `buckets` buckets.
    ///
    /// Returns [`DictError::ZeroBuckets`] if `buckets` is `0`, or [`DictError::AllocFailed`] if the
    /// buckets cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::{DictError, Dictionary};
    ///
    /// let result = Dictionary::<u32, &str>::try_with_buckets(0);
    /// assert_eq!(result.err(), Some(DictError::ZeroBuckets));
    ///
    /// let dict = Dictionary::<u32, &str>::try_with_buckets(3).unwrap();
    /// assert_eq!(dict.bucket_count(), 3);
    /// ```
    #[inline]
    pub fn try_with_buckets(buckets: u32) -> Result<Self, DictError> {
        Self::with_config(DictConfig::default().with_buckets(buckets))
    }

    /// Creates a new `Dictionary` from `config` after validating it.
    #[inline]
    pub fn with_config(config: DictConfig) -> Result<Self, DictError> {
        config.validate()?;
        debug!("Creating dictionary with {} buckets", config.buckets);

        let chains = Chain::alloc_many(config.buckets).map_err(|_| {
            warn!("Failed to allocate {} buckets", config.buckets);
            DictError::AllocFailed {
                buckets: config.buckets,
            }
        })?;

        Ok(Dictionary {
            chains,
            pool: EntryPool::new(),
            chain_trace_threshold: config.chain_trace_threshold,
        })
    }

    /// Returns the index of the bucket for `hash`.
    #[inline(always)]
    fn bucket_of(&self, hash: u32) -> usize {
        hash as usize % self.chains.len()
    }

    /// Finds the entry of `key`, returning its bucket and slot.
    ///
    /// The slot is [`NIL`] if the key is absent.
    #[inline]
    fn locate(&self, key: &K) -> (usize, usize) {
        let hash = key.hash();
        let bucket = self.bucket_of(hash);
        (bucket, self.pool.find(&self.chains[bucket], hash, key))
    }

    /// Inserts a key-value pair into the dictionary.
    ///
    /// If the dictionary did not have this key, the entry is added at the head of its chain and
    /// `None` is returned.
    ///
    /// If the dictionary did have this key, both the stored key and its value are replaced in
    /// place, and the old value is returned.
    ///
    /// # Time Complexity
    ///
    /// _O_(1) on average with a well distributed hash, _O_(chain length) in the worst case.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::Dictionary;
    ///
    /// let mut dict = Dictionary::new();
    ///
    /// assert_eq!(dict.set(1, "a"), None);
    /// assert_eq!(dict.set(1, "b"), Some("a"));
    ///
    /// assert_eq!(dict.get(&1), Some(&"b"));
    /// assert_eq!(dict.len(), 1);
    /// ```
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let hash = key.hash();
        let bucket = self.bucket_of(hash);
        let chain = &mut self.chains[bucket];

        // Quick exit, the chain is empty.
        if chain.is_empty() {
            self.pool.push_front(chain, Entry::new(key, value, hash));
            return None;
        }

        let at = self.pool.find(chain, hash, &key);
        if at != NIL {
            let entry = self.pool.entry_mut(at);
            entry.key = key;
            return Some(mem::replace(&mut entry.value, value));
        }

        self.pool.push_front(chain, Entry::new(key, value, hash));

        let chain_len = chain.len();
        if chain_len > self.chain_trace_threshold {
            trace!(
                "Chain of bucket {} grew to {} entries with {} buckets",
                bucket,
                chain_len,
                self.chains.len()
            );
        }

        None
    }

    /// Retrieves a value by its `key`.
    ///
    /// # Returns
    ///
    /// - `Some(&value)`: if the key is found.
    ///
    /// - `None`: if the key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::Dictionary;
    ///
    /// let mut dict = Dictionary::new();
    ///
    /// dict.set("foo", "bar");
    ///
    /// assert_eq!(dict.get(&"foo"), Some(&"bar"));
    /// assert_eq!(dict.get(&"bar"), None);
    /// ```
    #[must_use]
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        if self.is_empty() {
            return None;
        }

        let (_, at) = self.locate(key);
        if at == NIL {
            return None;
        }
        Some(&self.pool.entry(at).value)
    }

    /// Retrieves a mutable reference to a value by its `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::Dictionary;
    ///
    /// let mut dict = Dictionary::new();
    ///
    /// dict.set(1, 10);
    ///
    /// if let Some(value) = dict.get_mut(&1) {
    ///     *value += 1;
    /// }
    ///
    /// assert_eq!(dict.get(&1), Some(&11));
    /// assert_eq!(dict.get_mut(&2), None);
    /// ```
    #[must_use]
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if self.is_empty() {
            return None;
        }

        let (_, at) = self.locate(key);
        if at == NIL {
            return None;
        }
        Some(&mut self.pool.entry_mut(at).value)
    }

    /// Returns `true` if the dictionary contains a value for `key`.
    #[must_use]
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes the entry of `key` and returns the stored key and value.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::{Dictionary, StringKey};
    ///
    /// let mut dict = Dictionary::new();
    ///
    /// dict.set(StringKey::from("foo"), 1);
    ///
    /// let (key, value) = dict.delete_entry(&StringKey::from("foo")).unwrap();
    ///
    /// assert_eq!(key.as_str(), "foo");
    /// assert_eq!(value, 1);
    /// assert!(dict.is_empty());
    /// ```
    pub fn delete_entry(&mut self, key: &K) -> Option<(K, V)> {
        if self.is_empty() {
            return None;
        }

        let (bucket, at) = self.locate(key);
        if at == NIL {
            return None;
        }

        let entry = self.pool.unlink(&mut self.chains[bucket], at);
        Some((entry.key, entry.value))
    }

    /// Removes the entry of `key` and returns its value.
    ///
    /// The other entries of the chain keep their relative order.
    ///
    /// # Returns
    ///
    /// - `Some(value)`: if the key was found and removed.
    ///
    /// - `None`: if the key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::Dictionary;
    ///
    /// let mut dict = Dictionary::new();
    ///
    /// dict.set("foo", "bar");
    ///
    /// assert_eq!(dict.delete(&"foo"), Some("bar"));
    /// assert_eq!(dict.delete(&"foo"), None);
    /// ```
    #[inline]
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.delete_entry(key).map(|(_, value)| value)
    }
}

impl<K, V> Dictionary<K, V> {
    /// Returns the number of entries in the dictionary.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.pool.len()
    }

    /// Checks if the dictionary is empty.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.pool.len() == 0
    }

    /// Returns the fixed number of buckets.
    #[inline(always)]
    pub fn bucket_count(&self) -> u32 {
        // Built from a `u32` count.
        self.chains.len() as u32
    }

    /// Returns the average number of entries per bucket.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::Dictionary;
    ///
    /// let mut dict = Dictionary::with_buckets(4);
    ///
    /// assert_eq!(dict.load_factor(), 0.0);
    ///
    /// dict.set(1, ());
    /// dict.set(2, ());
    ///
    /// assert_eq!(dict.load_factor(), 0.5);
    /// ```
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.chains.len() as f64
    }

    /// Returns the number of entries in each bucket, in bucket order.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::Dictionary;
    ///
    /// let mut dict = Dictionary::with_buckets(3);
    ///
    /// // Integer keys hash to themselves.
    /// dict.set(0u32, "a");
    /// dict.set(3u32, "b");
    /// dict.set(2u32, "c");
    ///
    /// assert_eq!(dict.chain_lengths(), vec![2, 0, 1]);
    /// ```
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.chains.iter().map(Chain::len).collect()
    }

    /// Removes all entries. The bucket count remains unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::Dictionary;
    ///
    /// let mut dict = Dictionary::new();
    /// dict.set(1, "a");
    /// dict.set(2, "b");
    ///
    /// dict.clear();
    ///
    /// assert!(dict.is_empty());
    /// assert_eq!(dict.get(&1), None);
    /// ```
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }

        debug!(
            "Clearing dictionary of {} entries across {} buckets",
            self.len(),
            self.chains.len()
        );

        self.chains.fill(Chain::new());
        self.pool.clear();
    }

    /// Calls `visit` on every entry, bucket by bucket from `0` to `bucket_count - 1`, and within a
    /// bucket from the head of its chain to the tail.
    ///
    /// Iteration stops at the first `Err` returned by `visit`, and that error is returned
    /// unchanged. If every call succeeds, `Ok(())` is returned.
    ///
    /// The dictionary is borrowed immutably for the whole call, so it cannot be modified from
    /// within `visit`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::Dictionary;
    ///
    /// let mut dict = Dictionary::new();
    /// dict.set(1, 10);
    /// dict.set(2, 20);
    ///
    /// let mut sum = 0;
    /// let result: Result<(), ()> = dict.each(|_, value| {
    ///     sum += value;
    ///     Ok(())
    /// });
    ///
    /// assert!(result.is_ok());
    /// assert_eq!(sum, 30);
    ///
    /// // Returning an error stops the iteration.
    /// let result = dict.each(|key, _| if *key == 1 { Err(*key) } else { Ok(()) });
    ///
    /// assert_eq!(result, Err(1));
    /// ```
    pub fn each<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&K, &V) -> Result<(), E>,
    {
        for (key, value) in self.iter() {
            visit(key, value)?;
        }
        Ok(())
    }

    /// Returns all keys in the same order as [`Dictionary::each`].
    ///
    /// The returned vector is sized exactly to the number of entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::Dictionary;
    ///
    /// let mut dict = Dictionary::with_buckets(2);
    ///
    /// dict.set(1u32, "a");
    /// dict.set(2u32, "b");
    /// dict.set(4u32, "c");
    ///
    /// // Bucket 0 holds 4 then 2 (newest first), bucket 1 holds 1.
    /// assert_eq!(dict.keys(), vec![&4, &2, &1]);
    /// ```
    pub fn keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len());
        keys.extend(self.iter().map(|(key, _)| key));
        keys
    }

    /// Returns owned copies of all keys in the same order as [`Dictionary::each`].
    pub fn cloned_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut keys = Vec::with_capacity(self.len());
        keys.extend(self.iter().map(|(key, _)| key.clone()));
        keys
    }

    /// Returns an iterator over the entries in the same order as [`Dictionary::each`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chaindict::Dictionary;
    ///
    /// let mut dict = Dictionary::with_buckets(1);
    ///
    /// dict.set(1, "a");
    /// dict.set(2, "b");
    ///
    /// assert_eq!(dict.iter().collect::<Vec<_>>(), vec![(&2, &"b"), (&1, &"a")]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            pool: &self.pool,
            buckets: self.chains.iter(),
            chain: None,
            remaining: self.len(),
        }
    }

    /// Returns an iterator over the values in the same order as [`Dictionary::each`].
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<K, V> Default for Dictionary<K, V>
where
    K: Key,
{
    /// Creates a new `Dictionary` with the default bucket count of `31`.
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for Dictionary<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Creates an identical copy with the same bucket count and the same chain order.
    fn clone(&self) -> Self {
        Dictionary {
            chains: self.chains.clone(),
            pool: self.pool.clone(),
            chain_trace_threshold: self.chain_trace_threshold,
        }
    }
}

impl<K, V> PartialEq for Dictionary<K, V>
where
    K: Key,
    V: PartialEq,
{
    /// Two dictionaries are equal if they hold the same mapping, whatever their bucket counts.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(key, value)| other.get(key).is_some_and(|v| *value == *v))
    }
}

impl<K, V> Extend<(K, V)> for Dictionary<K, V>
where
    K: Key,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Dictionary<K, V>
where
    K: Key,
{
    /// Collects the pairs into a dictionary with the default bucket count. Later pairs replace
    /// earlier ones with the same key.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        dict.extend(iter);
        dict
    }
}

impl<'a, K, V> IntoIterator for &'a Dictionary<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Debug for Dictionary<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Display for Dictionary<K, V>
where
    K: Display,
    V: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        for (key, value) in self.iter() {
            writeln!(f, "    {}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// An iterator over the entries of a [`Dictionary`], bucket by bucket.
pub struct Iter<'a, K, V> {
    pool: &'a EntryPool<K, V>,
    buckets: slice::Iter<'a, Chain>,
    chain: Option<ChainIter<'a, K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }

            // Current chain exhausted, move to the next bucket.
            let pool = self.pool;
            self.chain = Some(pool.iter_chain(self.buckets.next()?));
        }
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Development and testing methods that are not available in release builds.
#[cfg(test)]
impl<K, V> Dictionary<K, V> {
    /// Returns the number of slots held by the entry pool, live or free.
    pub(crate) fn debug_pool_slots(&self) -> usize {
        self.pool.slots()
    }

    /// Returns the keys of bucket `bucket` from head to tail.
    pub(crate) fn debug_chain_keys(&self, bucket: usize) -> Vec<&K> {
        self.pool
            .iter_chain(&self.chains[bucket])
            .map(|entry| &entry.key)
            .collect()
    }

    /// Returns the cached hashes of bucket `bucket` from head to tail.
    pub(crate) fn debug_chain_hashes(&self, bucket: usize) -> Vec<u32> {
        self.pool
            .iter_chain(&self.chains[bucket])
            .map(|entry| entry.hash)
            .collect()
    }
}
