//! Follower tags and tag membership.

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
	/// Creates a tag from `payload` (`{"tag": {"name": ...}}`) and returns the platform's
	/// answer, which carries the new tag id.
	pub async fn create_tag(&self, tenant: &TenantId, payload: &Value) -> Result<Value> {
		common::observed(Operation::CreateTag, tenant, async move {
			common::require_payload(payload)?;

			self.post_authorized(tenant, "cgi-bin/tags/create", payload).await
		})
		.await
	}

	/// Lists every tag created on the account.
	pub async fn query_tags(&self, tenant: &TenantId) -> Result<Value> {
		common::observed(Operation::QueryTags, tenant, async move {
			self.get_authorized(tenant, "cgi-bin/tags/get", &[]).await
		})
		.await
	}

	/// Renames a tag.
	pub async fn update_tag(&self, tenant: &TenantId, payload: &Value) -> Result<()> {
		common::observed(Operation::UpdateTag, tenant, async move {
			common::require_payload(payload)?;

			let _: Value = self.post_authorized(tenant, "cgi-bin/tags/update", payload).await?;

			Ok(())
		})
		.await
	}

	/// Deletes a tag.
	pub async fn delete_tag(&self, tenant: &TenantId, payload: &Value) -> Result<()> {
		common::observed(Operation::DeleteTag, tenant, async move {
			common::require_payload(payload)?;

			let _: Value = self.post_authorized(tenant, "cgi-bin/tags/delete", payload).await?;

			Ok(())
		})
		.await
	}

	/// Returns one page of followers carrying `tag_id`, starting after `next_openid`.
	pub async fn tag_followers(
		&self,
		tenant: &TenantId,
		tag_id: u64,
		next_openid: Option<&OpenId>,
	) -> Result<Value> {
		common::observed(Operation::TagFollowers, tenant, async move {
			let body = serde_json::json!({
				"tagid": tag_id,
				"next_openid": next_openid.map(AsRef::<str>::as_ref).unwrap_or_default(),
			});

			self.post_authorized(tenant, "cgi-bin/user/tag/get", &body).await
		})
		.await
	}

	/// Applies a tag to a batch of followers.
	pub async fn batch_tag(&self, tenant: &TenantId, payload: &Value) -> Result<()> {
		common::observed(Operation::BatchTag, tenant, async move {
			common::require_payload(payload)?;

			let _: Value =
				self.post_authorized(tenant, "cgi-bin/tags/members/batchtagging", payload).await?;

			Ok(())
		})
		.await
	}

	/// Removes a tag from a batch of followers.
	pub async fn batch_untag(&self, tenant: &TenantId, payload: &Value) -> Result<()> {
		common::observed(Operation::BatchUntag, tenant, async move {
			common::require_payload(payload)?;

			let _: Value = self
				.post_authorized(tenant, "cgi-bin/tags/members/batchuntagging", payload)
				.await?;

			Ok(())
		})
		.await
	}

	/// Returns the tag ids attached to `openid`.
	pub async fn user_tags(&self, tenant: &TenantId, openid: &OpenId) -> Result<Value> {
		common::observed(Operation::UserTags, tenant, async move {
			let body = serde_json::json!({ "openid": openid });

			self.post_authorized(tenant, "cgi-bin/tags/getidlist", &body).await
		})
		.await
	}
}
