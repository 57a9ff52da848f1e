/// A builder macro that creates a `Dictionary` from a list of key-value pairs.
///
/// Later pairs replace earlier ones with the same key.
///
/// # Examples
///
/// This example creates a `Dictionary` with the default bucket count.
///
/// ```
/// use chaindict::dict;
///
/// let dict = dict! {
///     "one" => 1,
///     "two" => 2,
///     "three" => 3,
/// };
///
/// assert_eq!(dict.len(), 3);
/// assert_eq!(dict.bucket_count(), 31);
///
/// assert_eq!(dict.get(&"one"), Some(&1));
/// assert_eq!(dict.get(&"two"), Some(&2));
/// assert_eq!(dict.get(&"three"), Some(&3));
/// ```
///
/// This example creates a `Dictionary` with a specified bucket count.
///
/// The bucket count is given before the key-value pairs.
///
/// > Note: the macro panics if the bucket count is `0`.
///
/// ```
/// use chaindict::dict;
///
/// let dict = dict! {
///     7; // Buckets
///     1 => "a",
///     2 => "b",
/// };
///
/// assert_eq!(dict.len(), 2);
/// assert_eq!(dict.bucket_count(), 7);
///
/// assert_eq!(dict.get(&1), Some(&"a"));
/// assert_eq!(dict.get(&2), Some(&"b"));
/// ```
#[macro_export]
macro_rules! dict {
    // Pattern without explicit bucket count.
    ( $( $key:expr => $value:expr ),* $(,)? ) => {
        {
            let mut dict = $crate::Dictionary::new();
            $(
                dict.set($key, $value);
            )*
            dict
        }
    };
    // Pattern with explicit bucket count.
    ( $buckets:expr; $( $key:expr => $value:expr ),* $(,)? ) => {
        {
            let mut dict = $crate::Dictionary::with_buckets($buckets);
            $(
                dict.set($key, $value);
            )*
            dict
        }
    };
    // Catch-all pattern for invalid patterns.
    ( $($tt:tt)* ) => {
        compile_error!("Invalid syntax. Use `dict! { key => value, ... }` or `dict! { buckets; key => value, ... }`.");
    };
}

#[cfg(test)]
mod builder_tests {
    use crate::{Dictionary, StringKey};

    #[test]
    fn test_builder_without_buckets() {
        let dict = dict! {
            StringKey::from("one") => 1,
            StringKey::from("two") => 2,
            StringKey::from("one") => 11,
        };

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.bucket_count(), 31);

        assert_eq!(dict.get(&StringKey::from("one")), Some(&11));
        assert_eq!(dict.get(&StringKey::from("two")), Some(&2));
    }

    #[test]
    fn test_builder_with_buckets() {
        let dict = dict! {
            3; // Buckets
            1u32 => "a",
            2u32 => "b",
            4u32 => "c",
        };

        assert_eq!(dict.len(), 3);
        assert_eq!(dict.bucket_count(), 3);
        assert_eq!(dict.chain_lengths(), vec![0, 2, 1]);
    }

    #[test]
    fn test_builder_empty() {
        let dict: Dictionary<u32, u32> = dict! {};

        assert!(dict.is_empty());
        assert_eq!(dict.bucket_count(), 31);
    }
}
