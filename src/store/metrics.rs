//! Lock-free counters describing credential cache behavior.

// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing cache effectiveness.
#[derive(Debug, Default)]
pub struct CacheMetrics {
	hits: AtomicU64,
	misses: AtomicU64,
	expirations: AtomicU64,
	evictions: AtomicU64,
}
impl CacheMetrics {
	/// Returns the number of reads that found a live entry.
	pub fn hits(&self) -> u64 {
		self.hits.load(Ordering::Relaxed)
	}

	/// Returns the number of reads that found nothing usable (absent or expired).
	pub fn misses(&self) -> u64 {
		self.misses.load(Ordering::Relaxed)
	}

	/// Returns the number of entries dropped because a read observed them past expiry.
	pub fn expirations(&self) -> u64 {
		self.expirations.load(Ordering::Relaxed)
	}

	/// Returns the number of entries dropped to honor the capacity bound.
	pub fn evictions(&self) -> u64 {
		self.evictions.load(Ordering::Relaxed)
	}

	pub(crate) fn record_hit(&self) {
		self.hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_miss(&self) {
		self.misses.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_expiration(&self) {
		self.expirations.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_eviction(&self) {
		self.evictions.fetch_add(1, Ordering::Relaxed);
	}
}
