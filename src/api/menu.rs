//! Custom menus, including conditional (personalized) menus.

// self
use crate::{
	_prelude::*,
	api::{Broker, common},
	auth::TenantId,
	error::ArgumentError,
	http::ApiHttpClient,
	obs::Operation,
};

/// The platform reports conditional menu ids as numbers on some API versions and as
/// strings on others.
#[derive(Deserialize)]
#[serde(untagged)]
enum MenuIdRepr {
	Text(String),
	Number(u64),
}
impl From<MenuIdRepr> for String {
	fn from(value: MenuIdRepr) -> Self {
		match value {
			MenuIdRepr::Text(text) => text,
			MenuIdRepr::Number(number) => number.to_string(),
		}
	}
}

#[derive(Deserialize)]
struct MenuCreated {
	menuid: MenuIdRepr,
}

impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Replaces the default menu with `payload` (`{"button": [...]}`).
	pub async fn create_menu(&self, tenant: &TenantId, payload: &Value) -> Result<()> {
		common::observed(Operation::CreateMenu, tenant, async move {
			common::require_payload(payload)?;

			let _: Value = self.post_authorized(tenant, "cgi-bin/menu/create", payload).await?;

			Ok(())
		})
		.await
	}

	/// Returns the current menu configuration, conditional menus included.
	pub async fn query_menu(&self, tenant: &TenantId) -> Result<Value> {
		common::observed(Operation::QueryMenu, tenant, async move {
			self.get_authorized(tenant, "cgi-bin/menu/get", &[]).await
		})
		.await
	}

	/// Deletes every menu, conditional menus included.
	pub async fn delete_menu(&self, tenant: &TenantId) -> Result<()> {
		common::observed(Operation::DeleteMenu, tenant, async move {
			let _: Value = self.get_authorized(tenant, "cgi-bin/menu/delete", &[]).await?;

			Ok(())
		})
		.await
	}

	/// Creates a conditional menu and returns its id.
	pub async fn create_conditional_menu(
		&self,
		tenant: &TenantId,
		payload: &Value,
	) -> Result<String> {
		common::observed(Operation::CreateConditionalMenu, tenant, async move {
			common::require_payload(payload)?;

			let created: MenuCreated =
				self.post_authorized(tenant, "cgi-bin/menu/addconditional", payload).await?;

			Ok(created.menuid.into())
		})
		.await
	}

	/// Deletes the conditional menu identified by `menuid`.
	pub async fn delete_conditional_menu(&self, tenant: &TenantId, menuid: &str) -> Result<()> {
		common::observed(Operation::DeleteConditionalMenu, tenant, async move {
			ArgumentError::require("menuid", menuid)?;

			let body = serde_json::json!({ "menuid": menuid });
			let _: Value = self.post_authorized(tenant, "cgi-bin/menu/delconditional", &body).await?;

			Ok(())
		})
		.await
	}

	/// Returns the menu a follower would see; `user_id` is an OpenID or a WeChat account.
	pub async fn try_match_menu(&self, tenant: &TenantId, user_id: &str) -> Result<Value> {
		common::observed(Operation::TryMatchMenu, tenant, async move {
			ArgumentError::require("user_id", user_id)?;

			let body = serde_json::json!({ "user_id": user_id });

			self.post_authorized(tenant, "cgi-bin/menu/trymatch", &body).await
		})
		.await
	}
}
