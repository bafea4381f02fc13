//! Follower profiles and the follower list.

// self
use crate::{
	_prelude::*,
	api::{Broker, common},
	auth::{OpenId, TenantId},
	http::ApiHttpClient,
	obs::Operation,
};

impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Fetches up to 100 follower profiles described by `payload` (`{"user_list": [...]}`).
	pub async fn batch_user_info(&self, tenant: &TenantId, payload: &Value) -> Result<Value> {
		common::observed(Operation::BatchUserInfo, tenant, async move {
			common::require_payload(payload)?;

			self.post_authorized(tenant, "cgi-bin/user/info/batchget", payload).await
		})
		.await
	}

	/// Returns one page of up to 10 000 followers, starting after `next_openid`.
	///
	/// The first page is requested without a cursor; the platform answers the last page
	/// with an empty `next_openid`.
	pub async fn list_followers(
		&self,
		tenant: &TenantId,
		next_openid: Option<&OpenId>,
	) -> Result<Value> {
		common::observed(Operation::ListFollowers, tenant, async move {
			let query = match next_openid {
				Some(cursor) => vec![("next_openid", cursor.as_ref())],
				None => Vec::new(),
			};

			self.get_authorized(tenant, "cgi-bin/user/get", &query).await
		})
		.await
	}
}
