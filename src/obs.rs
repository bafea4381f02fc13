//! Optional observability helpers for broker calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `wechat_mp_broker.call` with the
//!   `operation` and `tenant` fields.
//! - Enable `metrics` to increment the `wechat_mp_broker_call_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod counter;
mod span;

pub use counter::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Platform operations observed by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// `cgi-bin/token`.
	IssueAccessToken,
	/// `sns/oauth2/access_token`.
	ExchangeUserCode,
	/// `cgi-bin/message/template/send`.
	SendTemplate,
	/// `cgi-bin/menu/create`.
	CreateMenu,
	/// `cgi-bin/menu/get`.
	QueryMenu,
	/// `cgi-bin/menu/delete`.
	DeleteMenu,
	/// `cgi-bin/menu/addconditional`.
	CreateConditionalMenu,
	/// `cgi-bin/menu/delconditional`.
	DeleteConditionalMenu,
	/// `cgi-bin/menu/trymatch`.
	TryMatchMenu,
	/// `cgi-bin/tags/create`.
	CreateTag,
	/// `cgi-bin/tags/get`.
	QueryTags,
	/// `cgi-bin/tags/update`.
	UpdateTag,
	/// `cgi-bin/tags/delete`.
	DeleteTag,
	/// `cgi-bin/user/tag/get`.
	TagFollowers,
	/// `cgi-bin/tags/members/batchtagging`.
	BatchTag,
	/// `cgi-bin/tags/members/batchuntagging`.
	BatchUntag,
	/// `cgi-bin/tags/getidlist`.
	UserTags,
	/// `cgi-bin/user/info/batchget`.
	BatchUserInfo,
	/// `cgi-bin/user/get`.
	ListFollowers,
	/// `cgi-bin/ticket/getticket`.
	FetchTicket,
	/// Local signing of caller-chosen inputs with the cached ticket.
	JsSdkSignature,
	/// Local JS-SDK signing backed by the cached ticket.
	JsSdkConfig,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::IssueAccessToken => "issue_access_token",
			Operation::ExchangeUserCode => "exchange_user_code",
			Operation::SendTemplate => "send_template",
			Operation::CreateMenu => "create_menu",
			Operation::QueryMenu => "query_menu",
			Operation::DeleteMenu => "delete_menu",
			Operation::CreateConditionalMenu => "create_conditional_menu",
			Operation::DeleteConditionalMenu => "delete_conditional_menu",
			Operation::TryMatchMenu => "try_match_menu",
			Operation::CreateTag => "create_tag",
			Operation::QueryTags => "query_tags",
			Operation::UpdateTag => "update_tag",
			Operation::DeleteTag => "delete_tag",
			Operation::TagFollowers => "tag_followers",
			Operation::BatchTag => "batch_tag",
			Operation::BatchUntag => "batch_untag",
			Operation::UserTags => "user_tags",
			Operation::BatchUserInfo => "batch_user_info",
			Operation::ListFollowers => "list_followers",
			Operation::FetchTicket => "fetch_ticket",
			Operation::JsSdkSignature => "js_sdk_signature",
			Operation::JsSdkConfig => "js_sdk_config",
		}
	}

	/// Human-readable message relayed to callers when the operation succeeds.
	pub const fn success_message(self) -> &'static str {
		match self {
			Operation::IssueAccessToken => "Access token issued.",
			Operation::ExchangeUserCode => "User authorization code exchanged.",
			Operation::SendTemplate => "Template message sent.",
			Operation::CreateMenu => "Menu created.",
			Operation::QueryMenu => "Menu retrieved.",
			Operation::DeleteMenu => "Menu deleted.",
			Operation::CreateConditionalMenu => "Conditional menu created.",
			Operation::DeleteConditionalMenu => "Conditional menu deleted.",
			Operation::TryMatchMenu => "Menu match tested.",
			Operation::CreateTag => "Tag created.",
			Operation::QueryTags => "Tags retrieved.",
			Operation::UpdateTag => "Tag updated.",
			Operation::DeleteTag => "Tag deleted.",
			Operation::TagFollowers => "Tag followers retrieved.",
			Operation::BatchTag => "Followers tagged.",
			Operation::BatchUntag => "Followers untagged.",
			Operation::UserTags => "Follower tags retrieved.",
			Operation::BatchUserInfo => "Follower profiles retrieved.",
			Operation::ListFollowers => "Followers listed.",
			Operation::FetchTicket => "JS-API ticket issued.",
			Operation::JsSdkSignature => "JS-SDK signature computed.",
			Operation::JsSdkConfig => "JS-SDK configuration signed.",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a broker operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
