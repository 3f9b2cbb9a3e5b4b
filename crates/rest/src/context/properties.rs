use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Debug, Formatter};

type AnyValue = Box<dyn Any + Send + Sync>;

/// A string keyed map of arbitrary values.
///
/// Handlers taking part in one conversion use it to pass data to each other. Values are
/// read back with the type they were inserted with; a lookup with another type yields
/// `None`.
#[derive(Default)]
pub struct Properties {
    inner: HashMap<String, AnyValue>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous one stored under `key` if any.
    pub fn insert<T>(&mut self, key: impl Into<String>, value: T) -> Option<AnyValue>
    where
        T: Any + Send + Sync,
    {
        self.inner.insert(key.into(), Box::new(value))
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.inner.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.inner.get_mut(key).and_then(|value| value.downcast_mut::<T>())
    }

    /// Removes the value under `key`, returning it when it has type `T`.
    ///
    /// The entry is removed even when the type does not match.
    pub fn remove<T: Any>(&mut self, key: &str) -> Option<T> {
        self.inner.remove(key).and_then(|value| value.downcast::<T>().ok()).map(|value| *value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl Debug for Properties {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.inner.keys()).finish()
    }
}

/// Builds properties from a configuration map, as a client does for every invocation.
impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Any + Send + Sync,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        let mut properties = Properties::new();
        assert!(properties.insert("retries", 3_u32).is_none());
        properties.insert("tenant", "acme".to_string());

        assert_eq!(properties.get::<u32>("retries"), Some(&3));
        assert_eq!(properties.get::<String>("tenant").map(String::as_str), Some("acme"));
        // wrong type
        assert_eq!(properties.get::<i64>("retries"), None);

        *properties.get_mut::<u32>("retries").unwrap() += 1;
        assert_eq!(properties.get::<u32>("retries"), Some(&4));
    }

    #[test]
    fn insert_replaces_and_remove_takes() {
        let mut properties = Properties::new();
        properties.insert("k", 1_i32);
        let previous = properties.insert("k", 2_i32).unwrap();
        assert_eq!(previous.downcast_ref::<i32>(), Some(&1));

        assert_eq!(properties.remove::<i32>("k"), Some(2));
        assert!(properties.is_empty());
        assert_eq!(properties.remove::<i32>("k"), None);
    }

    #[test]
    fn from_configuration_map() {
        let properties: Properties = [("a", 1_u8), ("b", 2_u8)].into_iter().collect();

        let mut keys = properties.keys().collect::<Vec<_>>();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(properties.len(), 2);
    }
}
