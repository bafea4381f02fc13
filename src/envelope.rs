//! Normalized `{code, message, data}` shape for relaying broker outcomes upstream.
//!
//! Successful operations relay `code = 200` with the operation's success message. Failures
//! relay the platform `errcode` for remote errors and an HTTP-like status otherwise, so an
//! upstream handler can forward the envelope without inspecting [`Error`] itself.

// self
use crate::{_prelude::*, obs::Operation};

/// Relay envelope for one broker operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
	/// `200` on success, otherwise the failure code.
	pub code: i64,
	/// Human-readable outcome.
	pub message: String,
	/// Operation result, omitted for operations without one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
}
impl Envelope {
	/// Code relayed for successful operations.
	pub const SUCCESS: i64 = 200;
	/// Code relayed for rejected caller input.
	pub const INVALID_ARGUMENT: i64 = 400;
	/// Code relayed when the tenant must issue a new access token.
	pub const CREDENTIAL_UNAVAILABLE: i64 = 401;
	/// Code relayed for local configuration failures.
	pub const CONFIG: i64 = 500;
	/// Code relayed for transport and decoding failures.
	pub const UPSTREAM: i64 = 502;

	/// Builds a success envelope carrying `data`.
	pub fn success(operation: Operation, data: Option<Value>) -> Self {
		Self { code: Self::SUCCESS, message: operation.success_message().into(), data }
	}

	/// Builds a failure envelope for `err`.
	pub fn failure(err: &Error) -> Self {
		Self { code: error_code(err), message: failure_message(err), data: None }
	}

	/// Converts an operation result, serializing the success value into `data`.
	///
	/// Values that serialize to `null` (such as `()`) leave `data` empty.
	pub fn from_result<T>(operation: Operation, result: &Result<T>) -> Self
	where
		T: Serialize,
	{
		match result {
			Ok(value) => match serde_json::to_value(value) {
				Ok(Value::Null) => Self::success(operation, None),
				Ok(data) => Self::success(operation, Some(data)),
				Err(e) => Self { code: Self::CONFIG, message: e.to_string(), data: None },
			},
			Err(e) => Self::failure(e),
		}
	}

	/// Returns `true` for success envelopes.
	pub fn is_success(&self) -> bool {
		self.code == Self::SUCCESS
	}
}
impl From<&Error> for Envelope {
	fn from(err: &Error) -> Self {
		Self::failure(err)
	}
}

/// Maps an error onto the code an envelope relays.
pub fn error_code(err: &Error) -> i64 {
	match err {
		Error::InvalidArgument(_) => Envelope::INVALID_ARGUMENT,
		Error::CredentialUnavailable { .. } => Envelope::CREDENTIAL_UNAVAILABLE,
		Error::Remote(remote) => remote.errcode,
		Error::Transient(_) | Error::Transport(_) => Envelope::UPSTREAM,
		Error::Config(_) => Envelope::CONFIG,
	}
}

fn failure_message(err: &Error) -> String {
	match err {
		Error::Remote(remote) if !remote.errmsg.is_empty() => remote.errmsg.clone(),
		_ => err.to_string(),
	}
}
