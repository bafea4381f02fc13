//! Credential issuance: the account-wide access token and the per-follower OAuth exchange.
//!
//! [`Broker::issue_access_token`] is the only operation that writes the token cache. Every
//! other platform call reads the cached token through [`Broker::access_token`] and never
//! refreshes it implicitly.

// self
use crate::{
	_prelude::*,
	api::{Broker, common},
	auth::{OpenId, TenantId, TokenSecret},
	error::ArgumentError,
	http::{ApiHttpClient, ApiRequest},
	obs::Operation,
};

/// Access token granted for the whole Official Account.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AccessTokenGrant {
	/// Token attached to every subsequent call.
	pub access_token: TokenSecret,
	/// Lifetime reported by the platform, in seconds.
	#[serde(default)]
	pub expires_in: u64,
}

/// Web-authorization grant for one follower.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserAccessGrant {
	/// Follower-scoped access token.
	pub access_token: TokenSecret,
	/// Lifetime reported by the platform, in seconds.
	#[serde(default)]
	pub expires_in: u64,
	/// Refresh token for the follower-scoped access token.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Follower identifier within this Official Account.
	pub openid: OpenId,
	/// Scope the follower granted.
	#[serde(default)]
	pub scope: Option<String>,
	/// Cross-account identifier, present when the account is bound to an open platform.
	#[serde(default)]
	pub unionid: Option<String>,
}

impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Requests a fresh access token with the app secret and caches it for `tenant`.
	///
	/// The cached entry expires after the cache's configured lifetime, independent of the
	/// `expires_in` the platform reports.
	pub async fn issue_access_token(
		&self,
		tenant: &TenantId,
		secret: &TokenSecret,
	) -> Result<AccessTokenGrant> {
		common::observed(Operation::IssueAccessToken, tenant, async move {
			ArgumentError::require("secret", secret.expose())?;

			let mut url = self.descriptor.endpoint("cgi-bin/token")?;

			url.query_pairs_mut()
				.append_pair("grant_type", "client_credential")
				.append_pair("appid", tenant)
				.append_pair("secret", secret.expose());

			let grant: AccessTokenGrant = self.dispatch(ApiRequest::get(url)).await?;

			if grant.access_token.is_empty() {
				return Err(common::empty_credential(
					"token endpoint returned an empty access token",
				));
			}

			self.tokens.set(tenant, grant.access_token.clone());

			Ok(grant)
		})
		.await
	}

	/// Exchanges a follower's web-authorization `code` for their grant.
	///
	/// The grant is returned to the caller and never cached.
	pub async fn exchange_user_code(
		&self,
		tenant: &TenantId,
		secret: &TokenSecret,
		code: &str,
	) -> Result<UserAccessGrant> {
		common::observed(Operation::ExchangeUserCode, tenant, async move {
			ArgumentError::require("secret", secret.expose())?;
			ArgumentError::require("code", code)?;

			let mut url = self.descriptor.endpoint("sns/oauth2/access_token")?;

			url.query_pairs_mut()
				.append_pair("appid", tenant)
				.append_pair("secret", secret.expose())
				.append_pair("code", code)
				.append_pair("grant_type", "authorization_code");

			self.dispatch(ApiRequest::get(url)).await
		})
		.await
	}
}
