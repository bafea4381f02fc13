//! Thread-safe in-memory [`CredentialStore`] with lazy expiry and an LRU bound.

// self
use crate::{
	_prelude::*,
	auth::{TenantId, TokenSecret},
	store::{CacheConfig, CacheMetrics, CredentialStore},
};

type EntryMap = Arc<Mutex<Entries>>;

/// Single cached credential plus its recency stamp.
#[derive(Clone, Debug)]
struct Entry {
	token: TokenSecret,
	expires_at: OffsetDateTime,
	last_used: u64,
}

#[derive(Debug, Default)]
struct Entries {
	map: HashMap<TenantId, Entry>,
	tick: u64,
}
impl Entries {
	fn next_tick(&mut self) -> u64 {
		self.tick += 1;

		self.tick
	}

	fn least_recently_used(&self) -> Option<TenantId> {
		self.map.iter().min_by_key(|(_, entry)| entry.last_used).map(|(key, _)| key.clone())
	}
}

/// Process-local credential cache shared across concurrent requests.
///
/// Reads and writes for a tenant are linearizable: both take the same mutex and neither
/// suspends while holding it. Expired entries are removed by the first read that observes
/// them. When a capacity is configured, inserting past it evicts the least-recently used
/// tenant, which may still be live.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialCache {
	config: CacheConfig,
	entries: EntryMap,
	metrics: Arc<CacheMetrics>,
}
impl MemoryCredentialCache {
	/// Creates an empty cache governed by `config`.
	pub fn new(config: CacheConfig) -> Self {
		Self { config, entries: Default::default(), metrics: Default::default() }
	}

	/// Returns the configuration applied to new entries.
	pub fn config(&self) -> &CacheConfig {
		&self.config
	}

	/// Returns the shared counters for this cache.
	pub fn metrics(&self) -> &CacheMetrics {
		&self.metrics
	}

	/// Returns the expiry deadline of the entry for `tenant`, if one is held.
	pub fn expires_at(&self, tenant: &TenantId) -> Option<OffsetDateTime> {
		self.entries.lock().map.get(tenant).map(|entry| entry.expires_at)
	}

	/// Drops every entry that is expired at `now`, returning how many were removed.
	pub fn sweep_expired_at(&self, now: OffsetDateTime) -> usize {
		let mut guard = self.entries.lock();
		let before = guard.map.len();

		guard.map.retain(|_, entry| now < entry.expires_at);

		let removed = before - guard.map.len();

		for _ in 0..removed {
			self.metrics.record_expiration();
		}

		removed
	}
}
impl CredentialStore for MemoryCredentialCache {
	fn set_at(&self, tenant: &TenantId, token: TokenSecret, now: OffsetDateTime) {
		let expires_at = now + self.config.effective_ttl();
		let mut guard = self.entries.lock();
		let last_used = guard.next_tick();

		guard.map.insert(tenant.to_owned(), Entry { token, expires_at, last_used });

		if let Some(capacity) = self.config.capacity {
			while guard.map.len() > capacity {
				let Some(victim) = guard.least_recently_used() else {
					break;
				};

				guard.map.remove(&victim);
				self.metrics.record_eviction();
			}
		}
	}

	fn get_at(&self, tenant: &TenantId, now: OffsetDateTime) -> Option<TokenSecret> {
		let mut guard = self.entries.lock();
		let tick = guard.next_tick();

		match guard.map.get_mut(tenant) {
			Some(entry) if now < entry.expires_at => {
				entry.last_used = tick;
				self.metrics.record_hit();

				Some(entry.token.clone())
			},
			Some(_) => {
				guard.map.remove(tenant);
				self.metrics.record_expiration();
				self.metrics.record_miss();

				None
			},
			None => {
				self.metrics.record_miss();

				None
			},
		}
	}

	fn remove(&self, tenant: &TenantId) -> bool {
		self.entries.lock().map.remove(tenant).is_some()
	}

	fn len(&self) -> usize {
		self.entries.lock().map.len()
	}
}
