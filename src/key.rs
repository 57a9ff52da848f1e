/// The capability a type needs to be stored as a key in a [`Dictionary`](crate::Dictionary).
///
/// The dictionary never looks inside a key. It only calls these two methods: `hash` to pick
/// the bucket and to gate comparisons, and `equal` to confirm a match.
///
/// # Contract
///
/// - `equal` must be an equivalence relation (reflexive, symmetric and transitive).
///
/// - Keys that are `equal` must return the same `hash`. Breaking this does not cause memory
///   unsafety, but lookups for such keys will silently miss.
///
/// - `hash` and `equal` must not change while the key is stored in a dictionary.
///
/// A good `hash` spreads unequal keys across many values. Quality only affects speed.
///
/// # Examples
///
/// ```
/// use chaindict::{Dictionary, Key};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Key for Point {
///     fn hash(&self) -> u32 {
///         (self.x as u32).wrapping_mul(31) ^ self.y as u32
///     }
///
///     fn equal(&self, other: &Self) -> bool {
///         self.x == other.x && self.y == other.y
///     }
/// }
///
/// let mut dict = Dictionary::new();
/// dict.set(Point { x: 1, y: 2 }, "a");
///
/// assert_eq!(dict.get(&Point { x: 1, y: 2 }), Some(&"a"));
/// assert_eq!(dict.get(&Point { x: 2, y: 1 }), None);
/// ```
///
/// > Note: the method names match those of [`std::hash::Hash`]. When both traits are in scope,
/// > call them as `Key::hash(&key)` to disambiguate.
pub trait Key {
    /// Returns a 32-bit hash of the key.
    fn hash(&self) -> u32;

    /// Returns `true` if `self` and `other` are the same key.
    fn equal(&self, other: &Self) -> bool;
}

impl<T> Key for &T
where
    T: Key + ?Sized,
{
    #[inline]
    fn hash(&self) -> u32 {
        T::hash(*self)
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        T::equal(*self, *other)
    }
}

/// Folds a 64-bit value into 32 bits by xoring its halves.
#[inline(always)]
const fn fold64(v: u64) -> u32 {
    (v ^ (v >> 32)) as u32
}

macro_rules! impl_key_narrow {
    ($($t:ty),* $(,)?) => {
        $(
            impl Key for $t {
                #[inline]
                fn hash(&self) -> u32 {
                    *self as u32
                }

                #[inline]
                fn equal(&self, other: &Self) -> bool {
                    *self == *other
                }
            }
        )*
    };
}

macro_rules! impl_key_wide {
    ($($t:ty),* $(,)?) => {
        $(
            impl Key for $t {
                #[inline]
                fn hash(&self) -> u32 {
                    fold64(*self as u64)
                }

                #[inline]
                fn equal(&self, other: &Self) -> bool {
                    *self == *other
                }
            }
        )*
    };
}

macro_rules! impl_key_128 {
    ($($t:ty),* $(,)?) => {
        $(
            impl Key for $t {
                #[inline]
                fn hash(&self) -> u32 {
                    let v = *self as u128;
                    fold64((v ^ (v >> 64)) as u64)
                }

                #[inline]
                fn equal(&self, other: &Self) -> bool {
                    *self == *other
                }
            }
        )*
    };
}

impl_key_narrow!(u8, u16, u32, i8, i16, i32, bool, char);
impl_key_wide!(u64, i64, usize, isize);
impl_key_128!(u128, i128);
