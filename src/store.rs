use crate::log::Error;
use serde::Serialize;
use serde_json::{to_value, Map, Value};

/// Provides storage for the parameter bindings that a
/// [`Template`][`crate::Template`] is rendered with.
///
/// Keys keep the order they were first inserted in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    data: Map<String, Value>,
}

impl Store {
    /// Create a new [`Store`].
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::Store;
    ///
    /// let store = Store::new();
    /// assert!(store.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self { data: Map::new() }
    }

    /// Create a new [`Store`] from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the [`Value`] is not an object.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::Store;
    /// use serde_json::json;
    ///
    /// let store = Store::from_value(json!({"name": "taylor"})).unwrap();
    /// assert_eq!(store.get("name").unwrap(), "taylor");
    ///
    /// assert!(Store::from_value(json!(["name"])).is_err());
    /// ```
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(Error::build("bindings must be an object")
                .with_help(format!("received `{other}`"))),
        }
    }

    /// Inserts a key-value pair into the [`Store`].
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::Store;
    ///
    /// let mut store = Store::new();
    /// let result = store.insert("files", vec!["main.rs", "lib.rs"]);
    ///
    /// assert!(result.is_ok());
    /// ```
    pub fn insert<S, T>(&mut self, key: S, value: T) -> Result<(), Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        let key = key.into();
        let value = to_value(value).map_err(|error| {
            Error::build(format!("value for `{key}` is unserializable"))
                .with_help(error.to_string())
        })?;
        self.data.insert(key, value);

        Ok(())
    }

    /// Inserts a key-value pair into the [`Store`].
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::Store;
    ///
    /// let mut store = Store::new();
    /// store.insert_must("name", "taylor");
    /// ```
    #[inline]
    pub fn insert_must<S, T>(&mut self, key: S, value: T)
    where
        S: Into<String>,
        T: Serialize,
    {
        if let Err(error) = self.insert(key, value) {
            panic!("{}", error.summary());
        }
    }

    /// Inserts a key-value pair into the [`Store`].
    ///
    /// Returns the `Store`, so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::Store;
    ///
    /// let store = Store::new().with("name", "taylor");
    ///
    /// assert!(store.is_ok());
    /// ```
    #[inline]
    pub fn with<S, T>(mut self, key: S, value: T) -> Result<Self, Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert(key, value)?;

        Ok(self)
    }

    /// Inserts a key-value pair into the [`Store`].
    ///
    /// Returns the `Store`, so additional methods may be chained.
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::Store;
    ///
    /// let store = Store::new().with_must("name", "taylor");
    /// ```
    #[inline]
    pub fn with_must<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert_must(key, value);

        self
    }

    /// Returns a reference to the [`Value`] corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use plume::Store;
    ///
    /// let store = Store::new().with_must("name", "taylor");
    /// let result = store.get("name");
    ///
    /// assert_eq!(result.unwrap(), "taylor")
    /// ```
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns true if the [`Store`] holds a value for the key.
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the number of bindings.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the [`Store`] holds no bindings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over the bindings in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }
}

impl From<Map<String, Value>> for Store {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

impl<K> FromIterator<(K, Value)> for Store
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Wrapper for [`Store`] that provides mutable storage for loop-scoped values.
///
/// Lookups search the frames from the most recent to the oldest, and fall
/// back to the `Store`.
#[derive(Debug)]
pub(crate) struct Shadow<'store> {
    pub store: &'store Store,
    data: Vec<Map<String, Value>>,
}

impl<'store> Shadow<'store> {
    /// Create a new [`Shadow`] over the given [`Store`].
    #[inline]
    pub fn new(store: &'store Store) -> Self {
        Self {
            store,
            data: vec![],
        }
    }

    /// Push a new frame onto the [`Shadow`].
    #[inline]
    pub fn push(&mut self) {
        self.data.push(Map::new());
    }

    /// Remove the top frame from the [`Shadow`].
    ///
    /// # Panics
    ///
    /// Panics if no frames exist within the [`Shadow`].
    #[inline]
    pub fn pop(&mut self) {
        if self.data.pop().is_none() {
            panic!("no frame to remove");
        }
    }

    /// Insert the value into the top frame of the [`Shadow`].
    ///
    /// # Panics
    ///
    /// Panics if no frames exist within the [`Shadow`].
    #[inline]
    pub fn insert<S>(&mut self, key: S, value: Value)
    where
        S: Into<String>,
    {
        self.data
            .last_mut()
            .expect("stack must not be empty when shadowing value")
            .insert(key.into(), value);
    }

    /// Get the [`Value`] of the given key from the frames only, ignoring
    /// the [`Store`].
    #[inline]
    pub fn get_local(&self, key: &str) -> Option<&Value> {
        self.data.iter().rev().find_map(|frame| frame.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::{Shadow, Store};
    use serde_json::json;

    #[test]
    fn test_store_insert() {
        let mut store = Store::new();
        store.insert_must("one", "two");

        assert!(store
            .get("one")
            .is_some_and(|t| t.as_str() == Some("two")));
    }

    #[test]
    fn test_store_insert_fluent() {
        assert!(Store::new()
            .with_must("three", "four")
            .get("three")
            .is_some_and(|t| t.as_str() == Some("four")))
    }

    #[test]
    fn test_store_keeps_insertion_order() {
        let store = Store::new()
            .with_must("zeta", 1)
            .with_must("alpha", 2)
            .with_must("mid", 3);
        let keys: Vec<_> = store.iter().map(|(k, _)| k.as_str()).collect();

        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_store_nested_value() {
        let store = Store::new().with_must("report", json!({"issues": [1, 2]}));

        assert_eq!(store.get("report").unwrap()["issues"][1], json!(2));
    }

    #[test]
    fn test_shadow_insert_and_get() {
        let store = Store::new().with_must("one", "one").with_must("two", "two");
        let mut shadow = Shadow::new(&store);
        shadow.push();
        shadow.insert("one", json!("shadowed one"));

        assert_eq!(shadow.get_local("one"), Some(&json!("shadowed one")));
        assert_eq!(shadow.get_local("two"), None);
        shadow.push();
        shadow.insert("three", json!(3));
        assert_eq!(shadow.get_local("one"), Some(&json!("shadowed one")));
        shadow.pop();
        shadow.pop();

        assert_eq!(shadow.get_local("one"), None);
        assert_eq!(shadow.store.get("one"), Some(&json!("one")));
    }

    #[test]
    #[should_panic(expected = "no frame to remove")]
    fn test_shadow_pop_empty() {
        let store = Store::new();
        let mut shadow = Shadow::new(&store);

        shadow.pop();
    }
}
