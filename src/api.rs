//! Platform API operations powered by the broker facade.
//!
//! Every operation follows the same contract: the tenant's access token is read from the
//! injected token cache (a miss yields [`Error::CredentialUnavailable`] without any
//! network traffic), the request is dispatched to a fixed endpoint, and any non-zero
//! `errcode` in the response surfaces as [`Error::Remote`]. Tokens the platform reports
//! as invalid are dropped from the cache before the error is returned.

pub mod common;
pub mod jssdk;
pub mod menu;
pub mod tags;
pub mod template;
pub mod token;
pub mod user;

pub use template::TemplateMessage;
pub use token::{AccessTokenGrant, UserAccessGrant};

// self
use crate::{
	_prelude::*,
	auth::TenantId,
	http::ApiHttpClient,
	platform::PlatformDescriptor,
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport.
pub type ReqwestBroker = Broker<ReqwestHttpClient>;

/// Coordinates platform calls for any number of tenants.
///
/// The broker owns the HTTP client, the platform descriptor, and two credential caches:
/// one for access tokens and one for JS-API tickets. Keeping them apart lets both live
/// under the same tenant key without one shadowing the other. Clones share every cache
/// and guard.
#[derive(Clone)]
pub struct Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP client used for every outbound platform request.
	pub http_client: Arc<C>,
	/// Platform descriptor that defines the API base.
	pub descriptor: PlatformDescriptor,
	/// Access-token cache populated by [`Broker::issue_access_token`].
	pub tokens: Arc<dyn CredentialStore>,
	/// JS-API ticket cache populated by [`Broker::jsapi_ticket`].
	pub tickets: Arc<dyn CredentialStore>,
	ticket_guards: Arc<Mutex<HashMap<TenantId, Arc<AsyncMutex<()>>>>>,
}
impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a broker that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: PlatformDescriptor,
		tokens: Arc<dyn CredentialStore>,
		tickets: Arc<dyn CredentialStore>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			descriptor,
			tokens,
			tickets,
			ticket_guards: Default::default(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Broker<ReqwestHttpClient> {
	/// Creates a new broker with its own reqwest-backed transport.
	pub fn new(
		descriptor: PlatformDescriptor,
		tokens: Arc<dyn CredentialStore>,
		tickets: Arc<dyn CredentialStore>,
	) -> Self {
		Self::with_http_client(descriptor, tokens, tickets, ReqwestHttpClient::default())
	}
}
impl<C> Debug for Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("descriptor", &self.descriptor)
			.field("cached_tokens", &self.tokens.len())
			.field("cached_tickets", &self.tickets.len())
			.finish()
	}
}
