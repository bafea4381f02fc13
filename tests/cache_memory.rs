// std
use std::{sync::Arc, thread};
// crates.io
use time::{Duration, OffsetDateTime, macros};
// self
use wechat_mp_broker::{
	auth::{TenantId, TokenSecret},
	store::{CacheConfig, CredentialStore, MemoryCredentialCache},
};

fn tenant(value: &str) -> TenantId {
	TenantId::new(value).expect("Tenant fixture should be valid.")
}

fn exposed(secret: Option<TokenSecret>) -> Option<String> {
	secret.map(|value| value.expose().to_owned())
}

#[test]
fn set_then_get_returns_the_latest_token() {
	let cache = MemoryCredentialCache::default();
	let wx = tenant("wx001");
	let t0 = macros::datetime!(2025-11-10 12:00 UTC);

	cache.set_at(&wx, TokenSecret::new("tok-abc"), t0);

	assert_eq!(exposed(cache.get_at(&wx, t0)), Some("tok-abc".into()));

	cache.set_at(&wx, TokenSecret::new("tok-def"), t0);

	assert_eq!(exposed(cache.get_at(&wx, t0)), Some("tok-def".into()));
	assert_eq!(cache.len(), 1);
}

#[test]
fn tenants_are_isolated() {
	let cache = MemoryCredentialCache::default();
	let now = OffsetDateTime::now_utc();

	cache.set_at(&tenant("wx-a"), TokenSecret::new("a"), now);

	assert_eq!(cache.get_at(&tenant("wx-b"), now), None);
	assert_eq!(exposed(cache.get_at(&tenant("wx-a"), now)), Some("a".into()));
}

#[test]
fn entries_expire_at_ttl_minus_margin() {
	let cache = MemoryCredentialCache::default();
	let wx = tenant("wx001");
	let t0 = macros::datetime!(2025-11-10 12:00 UTC);

	cache.set_at(&wx, TokenSecret::new("tok-abc"), t0);

	assert_eq!(
		exposed(cache.get_at(&wx, t0 + Duration::seconds(7_189))),
		Some("tok-abc".into())
	);
	assert_eq!(cache.get_at(&wx, t0 + Duration::seconds(7_190)), None);
	assert!(cache.is_empty());
	assert_eq!(cache.metrics().expirations(), 1);
}

#[test]
fn margin_larger_than_ttl_expires_immediately() {
	let config = CacheConfig::default()
		.with_ttl(Duration::seconds(5))
		.with_safety_margin(Duration::seconds(30));
	let cache = MemoryCredentialCache::new(config);
	let now = OffsetDateTime::now_utc();

	cache.set_at(&tenant("wx001"), TokenSecret::new("short"), now);

	assert_eq!(cache.get_at(&tenant("wx001"), now), None);
}

#[test]
fn lru_bound_evicts_the_least_recently_used_tenant() {
	let cache = MemoryCredentialCache::new(CacheConfig::default().with_capacity(Some(2)));
	let now = OffsetDateTime::now_utc();

	cache.set_at(&tenant("wx-a"), TokenSecret::new("a"), now);
	cache.set_at(&tenant("wx-b"), TokenSecret::new("b"), now);

	// Touch `wx-a` so `wx-b` becomes the eviction candidate.
	assert!(cache.get_at(&tenant("wx-a"), now).is_some());

	cache.set_at(&tenant("wx-c"), TokenSecret::new("c"), now);

	assert_eq!(cache.len(), 2);
	assert!(cache.get_at(&tenant("wx-a"), now).is_some());
	assert_eq!(cache.get_at(&tenant("wx-b"), now), None);
	assert!(cache.get_at(&tenant("wx-c"), now).is_some());
	assert_eq!(cache.metrics().evictions(), 1);
}

#[test]
fn unbounded_cache_keeps_every_tenant() {
	let cache = MemoryCredentialCache::new(CacheConfig::default().with_capacity(None));
	let now = OffsetDateTime::now_utc();

	for idx in 0..64 {
		cache.set_at(&tenant(&format!("wx-{idx}")), TokenSecret::new(format!("tok-{idx}")), now);
	}

	assert_eq!(cache.len(), 64);
	assert_eq!(cache.metrics().evictions(), 0);
}

#[test]
fn remove_drops_the_entry() {
	let cache = MemoryCredentialCache::default();
	let wx = tenant("wx001");

	cache.set(&wx, TokenSecret::new("tok-abc"));

	assert!(cache.remove(&wx));
	assert!(!cache.remove(&wx));
	assert_eq!(cache.get(&wx), None);
}

#[test]
fn metrics_count_hits_and_misses() {
	let cache = MemoryCredentialCache::default();
	let wx = tenant("wx001");

	assert_eq!(cache.get(&wx), None);

	cache.set(&wx, TokenSecret::new("tok-abc"));

	assert!(cache.get(&wx).is_some());
	assert!(cache.get(&wx).is_some());
	assert_eq!(cache.metrics().hits(), 2);
	assert_eq!(cache.metrics().misses(), 1);
}

#[test]
fn concurrent_writers_leave_one_of_their_values() {
	let cache = Arc::new(MemoryCredentialCache::default());
	let wx = tenant("wx-race");
	let handles = (0..8)
		.map(|idx| {
			let cache = cache.clone();
			let wx = wx.clone();

			thread::spawn(move || {
				for round in 0..100 {
					cache.set(&wx, TokenSecret::new(format!("tok-{idx}-{round}")));

					let seen = cache.get(&wx).expect("A live token should always be visible.");

					assert!(seen.expose().starts_with("tok-"));
				}
			})
		})
		.collect::<Vec<_>>();

	for handle in handles {
		handle.join().expect("Writer thread should not panic.");
	}

	let last = cache.get(&wx).expect("Final token should be present.");

	assert!(last.expose().ends_with("-99"));
	assert_eq!(cache.len(), 1);
}
