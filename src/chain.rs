use core::mem;
use std::collections::TryReserveError;

use crate::key::Key;

/// Invalid slot offset used as a sentinel value to indicate absence.
pub(crate) const NIL: usize = usize::MAX;

/// A stored key-value pair together with the cached hash of its key.
#[derive(Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u32,
}

impl<K, V> Entry<K, V> {
    #[inline(always)]
    pub(crate) const fn new(key: K, value: V, hash: u32) -> Self {
        Self { key, value, hash }
    }
}

/// A linked node of a chain.
#[derive(Clone)]
struct Node<K, V> {
    entry: Entry<K, V>,
    prev: usize,
    next: usize,
}

#[derive(Clone)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    /// A freed slot waiting to be reused. `next_free` links the free list.
    Vacant { next_free: usize },
}

/// The head, tail and length of one bucket's doubly linked list.
///
/// The nodes themselves live in the [`EntryPool`] shared by all chains of a dictionary.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Chain {
    head: usize,
    tail: usize,
    len: usize,
}

impl Chain {
    #[inline(always)]
    pub(crate) const fn new() -> Self {
        Self {
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    #[inline(always)]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocates `buckets` empty chains, reporting allocation failure instead of aborting.
    pub(crate) fn alloc_many(buckets: u32) -> Result<Box<[Chain]>, TryReserveError> {
        try_filled(buckets as usize, Chain::new())
    }
}

/// Builds a boxed slice of `len` copies of `value` without panicking on capacity overflow or
/// allocator failure.
fn try_filled<T: Clone>(len: usize, value: T) -> Result<Box<[T]>, TryReserveError> {
    let mut items = Vec::new();
    items.try_reserve_exact(len)?;
    items.resize(len, value);
    Ok(items.into_boxed_slice())
}

/// Storage for the entries of every chain in a dictionary.
///
/// Slots released by [`EntryPool::unlink`] are kept on a free list and handed out again by the
/// next insertion, so a dictionary with steady churn stops allocating once it reaches its peak
/// size. The key and value of a released slot are moved out before the slot is reused.
#[derive(Clone)]
pub(crate) struct EntryPool<K, V> {
    slots: Vec<Slot<K, V>>,
    free: usize,
    len: usize,
}

impl<K, V> EntryPool<K, V> {
    #[inline(always)]
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: NIL,
            len: 0,
        }
    }

    /// Returns the number of live entries across all chains.
    #[inline(always)]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of allocated slots, live or free.
    #[cfg(test)]
    pub(crate) fn slots(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    fn node(&self, at: usize) -> &Node<K, V> {
        match &self.slots[at] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("Logic error: access to a vacant slot"),
        }
    }

    #[inline(always)]
    fn node_mut(&mut self, at: usize) -> &mut Node<K, V> {
        match &mut self.slots[at] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("Logic error: access to a vacant slot"),
        }
    }

    #[inline]
    pub(crate) fn entry(&self, at: usize) -> &Entry<K, V> {
        &self.node(at).entry
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, at: usize) -> &mut Entry<K, V> {
        &mut self.node_mut(at).entry
    }

    /// Stores `node` in a free slot, reusing a released one when available.
    fn allocate(&mut self, node: Node<K, V>) -> usize {
        self.len += 1;
        if self.free == NIL {
            self.slots.push(Slot::Occupied(node));
            return self.slots.len() - 1;
        }

        let at = self.free;
        match mem::replace(&mut self.slots[at], Slot::Occupied(node)) {
            Slot::Vacant { next_free } => self.free = next_free,
            Slot::Occupied(_) => unreachable!("Logic error: occupied slot on the free list"),
        }
        at
    }

    /// Inserts `entry` at the head of `chain` and returns its slot.
    pub(crate) fn push_front(&mut self, chain: &mut Chain, entry: Entry<K, V>) -> usize {
        let old_head = chain.head;
        let at = self.allocate(Node {
            entry,
            prev: NIL,
            next: old_head,
        });

        if old_head == NIL {
            chain.tail = at;
        } else {
            self.node_mut(old_head).prev = at;
        }
        chain.head = at;
        chain.len += 1;
        at
    }

    /// Removes the node at `at` from `chain`, relinks its neighbours and releases the slot.
    ///
    /// `at` must be a live node of `chain`.
    pub(crate) fn unlink(&mut self, chain: &mut Chain, at: usize) -> Entry<K, V> {
        let released = mem::replace(
            &mut self.slots[at],
            Slot::Vacant {
                next_free: self.free,
            },
        );
        let node = match released {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("Logic error: unlink of a vacant slot"),
        };

        if node.prev == NIL {
            chain.head = node.next;
        } else {
            self.node_mut(node.prev).next = node.next;
        }

        if node.next == NIL {
            chain.tail = node.prev;
        } else {
            self.node_mut(node.next).prev = node.prev;
        }

        chain.len -= 1;
        self.free = at;
        self.len -= 1;
        node.entry
    }

    /// Drops every entry and releases all slots.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free = NIL;
        self.len = 0;
    }

    /// Returns an iterator over the entries of `chain` from head to tail.
    #[inline]
    pub(crate) fn iter_chain<'a>(&'a self, chain: &Chain) -> ChainIter<'a, K, V> {
        ChainIter {
            pool: self,
            cursor: chain.head,
        }
    }

    /// Returns the slot of the entry of `chain` whose key equals `key`, or [`NIL`].
    ///
    /// Cached hashes are compared first, `equal` is only called when they match.
    pub(crate) fn find(&self, chain: &Chain, hash: u32, key: &K) -> usize
    where
        K: Key,
    {
        let mut cursor = chain.head;
        while cursor != NIL {
            let node = self.node(cursor);
            if node.entry.hash == hash && key.equal(&node.entry.key) {
                return cursor;
            }
            cursor = node.next;
        }
        NIL
    }

    /// Returns the slot of the last entry of `chain`, or [`NIL`] if it is empty.
    #[cfg(test)]
    pub(crate) fn tail(&self, chain: &Chain) -> usize {
        chain.tail
    }
}

/// An iterator over one chain, from head to tail.
pub(crate) struct ChainIter<'a, K, V> {
    pool: &'a EntryPool<K, V>,
    cursor: usize,
}

impl<'a, K, V> Iterator for ChainIter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let node = self.pool.node(self.cursor);
        self.cursor = node.next;
        Some(&node.entry)
    }
}

#[cfg(test)]
mod chain_tests {
    use super::{try_filled, Chain, Entry, EntryPool, NIL};

    fn keys(pool: &EntryPool<u32, &str>, chain: &Chain) -> Vec<u32> {
        pool.iter_chain(chain).map(|e| e.key).collect()
    }

    #[test]
    fn test_push_front_order() {
        let mut pool = EntryPool::new();
        let mut chain = Chain::new();

        assert!(chain.is_empty());

        pool.push_front(&mut chain, Entry::new(1, "a", 1));
        pool.push_front(&mut chain, Entry::new(2, "b", 2));
        pool.push_front(&mut chain, Entry::new(3, "c", 3));

        assert_eq!(chain.len(), 3);
        assert_eq!(pool.len(), 3);
        assert_eq!(keys(&pool, &chain), vec![3, 2, 1]);
        assert_eq!(pool.entry(pool.tail(&chain)).key, 1);
    }

    #[test]
    fn test_unlink_head_middle_tail() {
        let mut pool = EntryPool::new();
        let mut chain = Chain::new();

        let s1 = pool.push_front(&mut chain, Entry::new(1, "a", 1));
        let s2 = pool.push_front(&mut chain, Entry::new(2, "b", 2));
        let s3 = pool.push_front(&mut chain, Entry::new(3, "c", 3));
        let s4 = pool.push_front(&mut chain, Entry::new(4, "d", 4));

        // Middle.
        assert_eq!(pool.unlink(&mut chain, s2).value, "b");
        assert_eq!(keys(&pool, &chain), vec![4, 3, 1]);

        // Head.
        assert_eq!(pool.unlink(&mut chain, s4).value, "d");
        assert_eq!(keys(&pool, &chain), vec![3, 1]);

        // Tail.
        assert_eq!(pool.unlink(&mut chain, s1).value, "a");
        assert_eq!(keys(&pool, &chain), vec![3]);
        assert_eq!(pool.tail(&chain), s3);

        // Last one.
        assert_eq!(pool.unlink(&mut chain, s3).value, "c");
        assert!(chain.is_empty());
        assert_eq!(pool.tail(&chain), NIL);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn test_released_slots_are_reused() {
        let mut pool = EntryPool::new();
        let mut chain = Chain::new();

        let s1 = pool.push_front(&mut chain, Entry::new(1, "a", 1));
        let s2 = pool.push_front(&mut chain, Entry::new(2, "b", 2));
        assert_eq!(pool.slots(), 2);

        pool.unlink(&mut chain, s1);
        pool.unlink(&mut chain, s2);

        // Released last, reused first.
        assert_eq!(pool.push_front(&mut chain, Entry::new(3, "c", 3)), s2);
        assert_eq!(pool.push_front(&mut chain, Entry::new(4, "d", 4)), s1);
        assert_eq!(pool.slots(), 2);
        assert_eq!(keys(&pool, &chain), vec![4, 3]);
    }

    #[test]
    fn test_find_gates_on_hash() {
        let mut pool = EntryPool::new();
        let mut chain = Chain::new();

        // Same key, different cached hash: must not match.
        pool.push_front(&mut chain, Entry::new(7, "x", 100));
        assert_eq!(pool.find(&chain, 7, &7), NIL);

        let at = pool.push_front(&mut chain, Entry::new(7, "y", 7));
        assert_eq!(pool.find(&chain, 7, &7), at);
        assert_eq!(pool.find(&chain, 8, &8), NIL);
    }

    #[test]
    fn test_chains_share_pool() {
        let mut pool = EntryPool::new();
        let mut left = Chain::new();
        let mut right = Chain::new();

        let l1 = pool.push_front(&mut left, Entry::new(1, "a", 1));
        pool.push_front(&mut right, Entry::new(2, "b", 2));
        pool.push_front(&mut left, Entry::new(3, "c", 3));

        pool.unlink(&mut left, l1);

        assert_eq!(keys(&pool, &left), vec![3]);
        assert_eq!(keys(&pool, &right), vec![2]);

        pool.clear();
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.slots(), 0);
    }

    #[test]
    fn test_alloc_many() {
        let chains = Chain::alloc_many(7).unwrap();

        assert_eq!(chains.len(), 7);
        assert!(chains.iter().all(Chain::is_empty));
    }

    #[test]
    fn test_try_filled_capacity_overflow() {
        assert!(try_filled(usize::MAX, 0u64).is_err());
        assert!(try_filled(usize::MAX / 2, Chain::new()).is_err());

        let items = try_filled(3, 9u8).unwrap();
        assert_eq!(&*items, &[9, 9, 9]);
    }
}
