//! JS-API tickets and JS-SDK `wx.config` signatures.
//!
//! Tickets are cached separately from access tokens. A per-tenant singleflight guard keeps
//! concurrent callers from stampeding the ticket endpoint: the first caller fetches and
//! stores, the rest wait on the guard and then read the cache.

// self
use crate::{
	_prelude::*,
	api::{Broker, common},
	auth::{TenantId, TokenSecret},
	error::ArgumentError,
	http::ApiHttpClient,
	obs::Operation,
	sign::{self, JsSdkConfig},
};

#[derive(Deserialize)]
struct TicketGrant {
	ticket: TokenSecret,
}

impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Returns the cached JS-API ticket for `tenant`, fetching it when absent or expired.
	pub async fn jsapi_ticket(&self, tenant: &TenantId) -> Result<TokenSecret> {
		if let Some(ticket) = self.tickets.get(tenant) {
			return Ok(ticket);
		}

		common::observed(Operation::FetchTicket, tenant, async move {
			let guard = common::ticket_guard(self, tenant);
			let _singleflight = guard.lock().await;

			if let Some(ticket) = self.tickets.get(tenant) {
				return Ok(ticket);
			}

			let grant: TicketGrant = self
				.get_authorized(tenant, "cgi-bin/ticket/getticket", &[("type", "jsapi")])
				.await?;

			if grant.ticket.is_empty() {
				return Err(common::empty_credential("ticket endpoint returned an empty ticket"));
			}

			self.tickets.set(tenant, grant.ticket.clone());

			Ok(grant.ticket)
		})
		.await
	}

	/// Signs `url` for `wx.config` with a caller-chosen nonce and timestamp.
	///
	/// Inputs are validated before the ticket is looked up, so a bad argument never causes
	/// a ticket fetch.
	pub async fn js_sdk_signature(
		&self,
		tenant: &TenantId,
		nonce: &str,
		timestamp: &str,
		url: &str,
	) -> Result<String> {
		common::observed(Operation::JsSdkSignature, tenant, async move {
			ArgumentError::require("nonce", nonce)?;
			ArgumentError::require("timestamp", timestamp)?;
			ArgumentError::require("url", url)?;

			let ticket = self.jsapi_ticket(tenant).await?;

			Ok(sign::js_sdk_signature(ticket.expose(), nonce, timestamp, url)?)
		})
		.await
	}

	/// Produces a complete `wx.config` parameter set for `url` with a fresh nonce and the
	/// current timestamp.
	pub async fn js_sdk_config(&self, tenant: &TenantId, url: &str) -> Result<JsSdkConfig> {
		common::observed(Operation::JsSdkConfig, tenant, async move {
			let nonce_str = sign::generate_nonce();
			let timestamp = sign::unix_timestamp(OffsetDateTime::now_utc());
			let signature = self.js_sdk_signature(tenant, &nonce_str, &timestamp, url).await?;

			Ok(JsSdkConfig { nonce_str, timestamp, signature })
		})
		.await
	}
}
