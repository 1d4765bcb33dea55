//! Insertion-ordered cache with a pluggable miss handler

use crate::error::{CacheError, CacheResult};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Function invoked when [`KeyedCache::get`] misses
pub type MissHandler<K, V> = Arc<dyn Fn(&K) -> CacheResult<V> + Send + Sync>;

/// Lazily-populated associative store.
///
/// Entries are kept in insertion order so that anything enumerated from the
/// cache (attribute lists, metadata payloads) comes out deterministically.
///
/// Only the populate-on-miss path of [`get`](Self::get) is serialized: a
/// per-instance mutex is taken, presence is checked again, and only then is
/// the miss handler invoked. Concurrent first reads of the same key therefore
/// call the handler once and all observe the stored value.
///
/// Closures passed to [`each`](Self::each), [`each_pair`](Self::each_pair),
/// [`find`](Self::find) and [`exists`](Self::exists) run while the store is
/// read-locked and must not call back into the same cache.
pub struct KeyedCache<K, V> {
	values: RwLock<IndexMap<K, V>>,
	populate: Mutex<()>,
	on_missing: MissHandler<K, V>,
}

impl<K, V> KeyedCache<K, V>
where
	K: Eq + Hash + Clone + fmt::Debug + 'static,
	V: Clone + 'static,
{
	/// Creates an empty cache whose miss handler fails with [`CacheError::NotFound`].
	pub fn new() -> Self {
		Self::with_on_missing(|key: &K| Err(CacheError::not_found(key)))
	}

	/// Creates an empty cache with a custom miss handler.
	///
	/// # Examples
	///
	/// ```
	/// use tagweave_cache::KeyedCache;
	///
	/// let cache: KeyedCache<u32, u32> = KeyedCache::with_on_missing(|n: &u32| Ok(n * 2));
	/// assert_eq!(cache.get(&21).unwrap(), 42);
	/// assert_eq!(cache.len(), 1);
	/// ```
	pub fn with_on_missing<F>(on_missing: F) -> Self
	where
		F: Fn(&K) -> CacheResult<V> + Send + Sync + 'static,
	{
		Self {
			values: RwLock::new(IndexMap::new()),
			populate: Mutex::new(()),
			on_missing: Arc::new(on_missing),
		}
	}

	/// Replaces the miss handler.
	pub fn set_on_missing<F>(&mut self, on_missing: F)
	where
		F: Fn(&K) -> CacheResult<V> + Send + Sync + 'static,
	{
		self.on_missing = Arc::new(on_missing);
	}

	/// Returns the value stored for `key`, populating it on a miss.
	///
	/// # Errors
	///
	/// Propagates whatever the miss handler returns; the default handler
	/// fails with [`CacheError::NotFound`]. A failed population stores nothing.
	pub fn get(&self, key: &K) -> CacheResult<V> {
		if let Some(value) = self.values.read().get(key) {
			return Ok(value.clone());
		}

		let _populating = self.populate.lock();
		if let Some(value) = self.values.read().get(key) {
			return Ok(value.clone());
		}

		tracing::trace!(key = ?key, "populating cache entry on miss");
		let value = (self.on_missing)(key)?;
		self.values.write().insert(key.clone(), value.clone());
		Ok(value)
	}

	/// Inserts or replaces the value for `key`.
	pub fn set(&self, key: K, value: V) {
		self.values.write().insert(key, value);
	}

	/// Inserts `value` only when `key` is absent.
	pub fn fill(&self, key: K, value: V) {
		self.values.write().entry(key).or_insert(value);
	}

	/// Returns the stored value without invoking the miss handler.
	pub fn try_get(&self, key: &K) -> Option<V> {
		self.values.read().get(key).cloned()
	}

	/// Whether `key` is present. Never populates.
	pub fn has(&self, key: &K) -> bool {
		self.values.read().contains_key(key)
	}

	/// Applies `f` to the stored value in place. Returns `false` when absent.
	pub fn update<F>(&self, key: &K, f: F) -> bool
	where
		F: FnOnce(&mut V),
	{
		match self.values.write().get_mut(key) {
			Some(value) => {
				f(value);
				true
			}
			None => false,
		}
	}

	/// Removes `key`, keeping the order of the remaining entries.
	pub fn remove(&self, key: &K) {
		self.values.write().shift_remove(key);
	}

	/// Removes every entry.
	pub fn clear(&self) {
		self.values.write().clear();
	}

	/// Number of stored entries.
	pub fn len(&self) -> usize {
		self.values.read().len()
	}

	/// Whether the cache holds no entries.
	pub fn is_empty(&self) -> bool {
		self.values.read().is_empty()
	}

	/// Visits every value in insertion order.
	pub fn each<F>(&self, mut f: F)
	where
		F: FnMut(&V),
	{
		for value in self.values.read().values() {
			f(value);
		}
	}

	/// Visits every key/value pair in insertion order.
	pub fn each_pair<F>(&self, mut f: F)
	where
		F: FnMut(&K, &V),
	{
		for (key, value) in self.values.read().iter() {
			f(key, value);
		}
	}

	/// First value matching `predicate`, in insertion order.
	pub fn find<P>(&self, mut predicate: P) -> Option<V>
	where
		P: FnMut(&V) -> bool,
	{
		self.values.read().values().find(|v| predicate(v)).cloned()
	}

	/// Whether any value matches `predicate`.
	pub fn exists<P>(&self, mut predicate: P) -> bool
	where
		P: FnMut(&V) -> bool,
	{
		self.values.read().values().any(|v| predicate(v))
	}

	/// The earliest inserted value.
	pub fn first(&self) -> Option<V> {
		self.values.read().values().next().cloned()
	}

	/// Snapshot of all values in insertion order.
	pub fn values(&self) -> Vec<V> {
		self.values.read().values().cloned().collect()
	}

	/// Snapshot of all keys in insertion order.
	pub fn keys(&self) -> Vec<K> {
		self.values.read().keys().cloned().collect()
	}

	/// Snapshot of all entries in insertion order.
	pub fn entries(&self) -> Vec<(K, V)> {
		self.values
			.read()
			.iter()
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect()
	}
}

impl<K, V> Default for KeyedCache<K, V>
where
	K: Eq + Hash + Clone + fmt::Debug + 'static,
	V: Clone + 'static,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V> Clone for KeyedCache<K, V>
where
	K: Clone,
	V: Clone,
{
	fn clone(&self) -> Self {
		Self {
			values: RwLock::new(self.values.read().clone()),
			populate: Mutex::new(()),
			on_missing: Arc::clone(&self.on_missing),
		}
	}
}

impl<K, V> fmt::Debug for KeyedCache<K, V>
where
	K: fmt::Debug,
	V: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KeyedCache")
			.field("values", &*self.values.read())
			.finish_non_exhaustive()
	}
}

/// Serializes as a map in insertion order.
impl<K, V> Serialize for KeyedCache<K, V>
where
	K: Serialize,
	V: Serialize,
{
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let values = self.values.read();
		let mut map = serializer.serialize_map(Some(values.len()))?;
		for (key, value) in values.iter() {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn lengths() -> KeyedCache<String, usize> {
		KeyedCache::with_on_missing(|key: &String| Ok(key.len()))
	}

	#[rstest]
	fn test_default_handler_reports_not_found() {
		// Arrange
		let cache: KeyedCache<String, String> = KeyedCache::new();

		// Act
		let result = cache.get(&"missing".to_string());

		// Assert
		assert_eq!(
			result,
			Err(CacheError::NotFound {
				key: "\"missing\"".to_string()
			})
		);
		assert!(cache.is_empty());
	}

	#[rstest]
	fn test_get_memoizes_handler_result() {
		// Arrange
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);
		let cache: KeyedCache<String, usize> = KeyedCache::with_on_missing(move |key: &String| {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(key.len())
		});

		// Act
		let first = cache.get(&"abc".to_string()).unwrap();
		let second = cache.get(&"abc".to_string()).unwrap();

		// Assert
		assert_eq!(first, 3);
		assert_eq!(second, 3);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[rstest]
	fn test_probes_never_populate() {
		let cache = lengths();

		assert!(!cache.has(&"abc".to_string()));
		assert_eq!(cache.try_get(&"abc".to_string()), None);
		assert!(cache.is_empty());
	}

	#[rstest]
	fn test_set_upserts_in_place() {
		let cache = lengths();
		cache.set("a".to_string(), 1);
		cache.set("b".to_string(), 2);
		cache.set("a".to_string(), 10);

		assert_eq!(cache.keys(), vec!["a".to_string(), "b".to_string()]);
		assert_eq!(cache.values(), vec![10, 2]);
	}

	#[rstest]
	fn test_fill_keeps_existing_value() {
		let cache = lengths();
		cache.set("a".to_string(), 1);
		cache.fill("a".to_string(), 99);
		cache.fill("b".to_string(), 2);

		assert_eq!(cache.try_get(&"a".to_string()), Some(1));
		assert_eq!(cache.try_get(&"b".to_string()), Some(2));
	}

	#[rstest]
	fn test_remove_preserves_remaining_order() {
		let cache = lengths();
		for key in ["x", "y", "z"] {
			cache.set(key.to_string(), 0);
		}

		cache.remove(&"y".to_string());
		cache.remove(&"absent".to_string());

		assert_eq!(cache.keys(), vec!["x".to_string(), "z".to_string()]);
	}

	#[rstest]
	fn test_enumeration_helpers() {
		let cache = lengths();
		cache.set("one".to_string(), 1);
		cache.set("two".to_string(), 2);
		cache.set("three".to_string(), 3);

		let mut seen = Vec::new();
		cache.each_pair(|k, v| seen.push(format!("{}={}", k, v)));
		let mut sum = 0;
		cache.each(|v| sum += v);

		assert_eq!(seen, vec!["one=1", "two=2", "three=3"]);
		assert_eq!(sum, 6);
		assert_eq!(cache.find(|v| *v > 1), Some(2));
		assert_eq!(cache.find(|v| *v > 5), None);
		assert!(cache.exists(|v| *v == 3));
		assert_eq!(cache.first(), Some(1));
	}

	#[rstest]
	fn test_update_modifies_present_value_only() {
		let cache = lengths();
		cache.set("a".to_string(), 1);

		assert!(cache.update(&"a".to_string(), |v| *v += 1));
		assert!(!cache.update(&"b".to_string(), |v| *v += 1));
		assert_eq!(cache.try_get(&"a".to_string()), Some(2));
		assert!(!cache.has(&"b".to_string()));
	}

	#[rstest]
	fn test_failed_population_stores_nothing() {
		let cache: KeyedCache<String, usize> =
			KeyedCache::with_on_missing(|key: &String| Err(CacheError::populate(key, "nope")));

		assert!(cache.get(&"k".to_string()).is_err());
		assert!(!cache.has(&"k".to_string()));
	}

	#[rstest]
	fn test_serializes_in_insertion_order() {
		let cache: KeyedCache<String, i32> = KeyedCache::new();
		cache.set("zeta".to_string(), 1);
		cache.set("alpha".to_string(), 2);

		let json = serde_json::to_string(&cache).unwrap();

		assert_eq!(json, r#"{"zeta":1,"alpha":2}"#);
	}

	#[rstest]
	fn test_clone_shares_handler_but_not_entries() {
		let cache = lengths();
		cache.set("a".to_string(), 1);
		let copy = cache.clone();
		copy.set("b".to_string(), 2);

		assert_eq!(copy.get(&"four".to_string()).unwrap(), 4);
		assert!(!cache.has(&"b".to_string()));
	}
}
