//! Multi-tenant WeChat Official Account broker: cached access tokens, JS-SDK signing, and
//! typed menu, tag, user, and template calls in one crate built for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod envelope;
pub mod error;
pub mod http;
pub mod obs;
pub mod platform;
pub mod sign;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		api::Broker,
		auth::TenantId,
		http::ReqwestHttpClient,
		platform::PlatformDescriptor,
		store::{CacheConfig, CredentialStore, MemoryCredentialCache},
	};

	/// Broker type alias used by reqwest-backed integration tests.
	pub type ReqwestTestBroker = Broker<ReqwestHttpClient>;

	/// Caches handed to a test broker so assertions can inspect them directly.
	#[derive(Clone, Debug)]
	pub struct TestCaches {
		/// Access-token cache.
		pub tokens: Arc<MemoryCredentialCache>,
		/// JS-API ticket cache.
		pub tickets: Arc<MemoryCredentialCache>,
	}

	/// Builds a descriptor that points every platform call at `base` (typically an
	/// `httpmock` server URL).
	pub fn test_descriptor(base: &str) -> PlatformDescriptor {
		PlatformDescriptor::builder()
			.api_base(Url::parse(base).expect("Mock API base URL should parse."))
			.build()
			.expect("Loopback descriptor should be accepted in tests.")
	}

	/// Constructs a [`Broker`] backed by fresh in-memory caches and the default reqwest
	/// transport.
	pub fn build_reqwest_test_broker(base: &str) -> (ReqwestTestBroker, TestCaches) {
		let tokens = Arc::new(MemoryCredentialCache::new(CacheConfig::default()));
		let tickets = Arc::new(MemoryCredentialCache::new(CacheConfig::default()));
		let token_store: Arc<dyn CredentialStore> = tokens.clone();
		let ticket_store: Arc<dyn CredentialStore> = tickets.clone();
		let broker = Broker::with_http_client(
			test_descriptor(base),
			token_store,
			ticket_store,
			ReqwestHttpClient::default(),
		);

		(broker, TestCaches { tokens, tickets })
	}

	/// Returns a tenant identifier fixture, panicking on invalid input.
	pub fn tenant(value: &str) -> TenantId {
		TenantId::new(value).expect("Tenant fixture should be valid.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
