//! Template messages pushed to followers.

// self
use crate::{
	_prelude::*,
	api::{Broker, common},
	auth::{OpenId, TemplateId, TenantId},
	http::ApiHttpClient,
	obs::Operation,
};

/// Template message addressed to one follower.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TemplateMessage {
	/// Recipient follower.
	pub touser: OpenId,
	/// Template registered on the Official Account.
	pub template_id: TemplateId,
	/// Page opened when the follower taps the message.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	/// Template field values, passed through untouched.
	pub data: Value,
}
impl TemplateMessage {
	/// Creates a message without a jump URL.
	pub fn new(touser: OpenId, template_id: TemplateId, data: Value) -> Self {
		Self { touser, template_id, url: None, data }
	}

	/// Sets the page opened when the follower taps the message.
	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());

		self
	}
}

#[derive(Deserialize)]
struct TemplateSent {
	msgid: u64,
}

impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Sends `message` and returns the platform-assigned message id.
	pub async fn send_template(&self, tenant: &TenantId, message: &TemplateMessage) -> Result<u64> {
		common::observed(Operation::SendTemplate, tenant, async move {
			common::require_payload(&message.data)?;

			let sent: TemplateSent =
				self.post_authorized(tenant, "cgi-bin/message/template/send", message).await?;

			Ok(sent.msgid)
		})
		.await
	}
}
