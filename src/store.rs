//! Credential cache contracts and the built-in in-memory implementation.
//!
//! A [`CredentialStore`] holds at most one live credential per tenant. Entries expire
//! `ttl - safety_margin` after insertion, and reads past that deadline behave exactly like
//! a miss. The trait is synchronous on purpose: every operation is a bounded in-memory map
//! access and must never be held across an `.await`.

pub mod memory;
pub mod metrics;

pub use memory::MemoryCredentialCache;
pub use metrics::CacheMetrics;

// self
use crate::{
	_prelude::*,
	auth::{TenantId, TokenSecret},
};

/// Storage contract implemented by tenant credential caches.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Stores or replaces the credential for `tenant`, anchoring its expiry at `now`.
	fn set_at(&self, tenant: &TenantId, token: TokenSecret, now: OffsetDateTime);

	/// Returns the credential for `tenant` if it is still live at `now`.
	fn get_at(&self, tenant: &TenantId, now: OffsetDateTime) -> Option<TokenSecret>;

	/// Drops any credential for `tenant`, returning `true` if one was present.
	fn remove(&self, tenant: &TenantId) -> bool;

	/// Number of entries currently held, including expired ones not yet swept.
	fn len(&self) -> usize;

	/// Returns `true` when no entries are held.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Stores or replaces the credential for `tenant` using the current UTC instant.
	fn set(&self, tenant: &TenantId, token: TokenSecret) {
		self.set_at(tenant, token, OffsetDateTime::now_utc());
	}

	/// Returns the credential for `tenant` if it is live right now.
	fn get(&self, tenant: &TenantId) -> Option<TokenSecret> {
		self.get_at(tenant, OffsetDateTime::now_utc())
	}
}

/// Lifetime and capacity settings for a credential cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
	/// Nominal credential lifetime granted by the platform.
	pub ttl: Duration,
	/// Amount subtracted from `ttl` so entries expire before the platform's deadline.
	pub safety_margin: Duration,
	/// Maximum number of tenants kept; `None` disables the bound.
	pub capacity: Option<usize>,
}
impl CacheConfig {
	/// Nominal lifetime of platform access tokens and JS-API tickets.
	pub const DEFAULT_TTL: Duration = Duration::seconds(7_200);
	/// Early-expiry margin absorbing network latency around the deadline.
	pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::seconds(10);
	/// Default tenant bound.
	pub const DEFAULT_CAPACITY: usize = 10;

	/// Overrides the nominal lifetime.
	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = ttl;

		self
	}

	/// Overrides the safety margin; negative values are clamped to zero.
	pub fn with_safety_margin(mut self, margin: Duration) -> Self {
		self.safety_margin = if margin.is_negative() { Duration::ZERO } else { margin };

		self
	}

	/// Overrides the tenant bound; `None` keeps every tenant until it expires.
	pub fn with_capacity(mut self, capacity: Option<usize>) -> Self {
		self.capacity = capacity.map(|value| value.max(1));

		self
	}

	/// Lifetime actually applied to new entries (`ttl - safety_margin`, never negative).
	pub fn effective_ttl(&self) -> Duration {
		let effective = self.ttl - self.safety_margin;

		if effective.is_negative() { Duration::ZERO } else { effective }
	}
}
impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			ttl: Self::DEFAULT_TTL,
			safety_margin: Self::DEFAULT_SAFETY_MARGIN,
			capacity: Some(Self::DEFAULT_CAPACITY),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_config_matches_platform_lifetime() {
		let config = CacheConfig::default();

		assert_eq!(config.effective_ttl(), Duration::seconds(7_190));
		assert_eq!(config.capacity, Some(10));
	}

	#[test]
	fn effective_ttl_never_goes_negative() {
		let config = CacheConfig::default()
			.with_ttl(Duration::seconds(5))
			.with_safety_margin(Duration::seconds(30));

		assert_eq!(config.effective_ttl(), Duration::ZERO);

		let config = CacheConfig::default().with_safety_margin(Duration::seconds(-3));

		assert_eq!(config.safety_margin, Duration::ZERO);
	}

	#[test]
	fn zero_capacity_is_raised_to_one() {
		let config = CacheConfig::default().with_capacity(Some(0));

		assert_eq!(config.capacity, Some(1));
		assert_eq!(CacheConfig::default().with_capacity(None).capacity, None);
	}
}
