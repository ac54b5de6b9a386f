use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Hit and miss counters for a [`Memo`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
	/// Lookups answered from a stored value.
	pub hits: u64,
	/// Lookups that ran the producer.
	pub misses: u64,
}

/// A get-or-compute map keyed by opaque strings such as URLs or file paths.
///
/// The producer for a key runs at most once per successful result. Entries
/// are never evicted and never expire.
#[derive(Debug)]
pub struct Memo<V> {
	entries: HashMap<String, V>,
	stats: MemoStats,
}

impl<V> Default for Memo<V> {
	fn default() -> Self {
		Self {
			entries: HashMap::new(),
			stats: MemoStats::default(),
		}
	}
}

impl<V> Memo<V> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Return the value stored for `key`, running `produce` to create it the
	/// first time.
	pub fn get_or_insert_with(&mut self, key: &str, produce: impl FnOnce() -> V) -> &V {
		match self.get_or_try_insert_with(key, || Ok::<V, std::convert::Infallible>(produce())) {
			Ok(value) => value,
			Err(never) => match never {},
		}
	}

	/// Like [`Memo::get_or_insert_with`] for a fallible producer. A failed
	/// producer stores nothing, so the next call for the same key tries again.
	pub fn get_or_try_insert_with<E>(
		&mut self,
		key: &str,
		produce: impl FnOnce() -> Result<V, E>,
	) -> Result<&V, E> {
		match self.entries.entry(key.to_string()) {
			Entry::Occupied(entry) => {
				self.stats.hits = self.stats.hits.saturating_add(1);
				tracing::trace!(key, "memo hit");
				Ok(entry.into_mut())
			}
			Entry::Vacant(entry) => {
				self.stats.misses = self.stats.misses.saturating_add(1);
				tracing::trace!(key, "memo miss");
				let value = produce()?;
				Ok(entry.insert(value))
			}
		}
	}

	pub fn get(&self, key: &str) -> Option<&V> {
		self.entries.get(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn stats(&self) -> MemoStats {
		self.stats
	}
}
