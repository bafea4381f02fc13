//! Broker-level error types shared across caches, signing, transport, and API calls.

// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, TenantId},
};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// A required input was missing or malformed; never retried.
	#[error(transparent)]
	InvalidArgument(#[from] ArgumentError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The platform answered with a non-zero `errcode`.
	#[error(transparent)]
	Remote(#[from] RemoteError),

	/// No live access token is cached for the tenant.
	#[error("Access token for tenant `{tenant}` is missing or expired; issue a new one.")]
	CredentialUnavailable {
		/// Tenant whose credential is unavailable.
		tenant: TenantId,
	},
}
impl From<IdentifierError> for Error {
	fn from(e: IdentifierError) -> Self {
		ArgumentError::from(e).into()
	}
}

/// Caller-input failures detected before any work is attempted.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ArgumentError {
	/// A required string or payload parameter was empty.
	#[error("Required argument `{field}` is empty.")]
	Empty {
		/// Name of the rejected parameter.
		field: &'static str,
	},
	/// An identifier failed validation.
	#[error(transparent)]
	Identifier(#[from] IdentifierError),
}
impl ArgumentError {
	/// Returns `Err(Empty)` when `value` is empty.
	pub fn require(field: &'static str, value: &str) -> Result<(), Self> {
		if value.is_empty() { Err(Self::Empty { field }) } else { Ok(()) }
	}
}

/// Error object returned by the platform (`{errcode, errmsg}`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("Platform returned errcode {errcode}: {errmsg}.")]
pub struct RemoteError {
	/// Platform error code; never zero.
	pub errcode: i64,
	/// Platform error message.
	#[serde(default)]
	pub errmsg: String,
}
impl RemoteError {
	/// Error codes meaning the access token itself was rejected (invalid, mismatched, or
	/// expired upstream).
	pub const CREDENTIAL_REJECTED: [i64; 3] = [40001, 40014, 42001];

	/// Returns `true` when the platform rejected the access token used for the call.
	pub fn is_credential_rejected(&self) -> bool {
		Self::CREDENTIAL_REJECTED.contains(&self.errcode)
	}
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// An endpoint path could not be joined onto the API base.
	#[error("Endpoint `{path}` cannot be resolved against the API base.")]
	InvalidEndpoint {
		/// Relative endpoint path.
		path: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized.
	#[error("Request body for `{path}` could not be serialized.")]
	RequestBody {
		/// Relative endpoint path.
		path: &'static str,
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Platform descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::platform::PlatformDescriptorError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Platform returned a non-success HTTP status without an `errcode`.
	#[error("Platform returned an unexpected response: {message}.")]
	UnexpectedStatus {
		/// Short summary of the response body.
		message: String,
		/// HTTP status code.
		status: u16,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Platform responded with JSON that could not be parsed into the expected shape.
	#[error("Platform returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the platform.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the platform.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifier_errors_surface_as_invalid_argument() {
		let err: Error = TenantId::new("").expect_err("Empty tenant must fail.").into();

		assert!(matches!(err, Error::InvalidArgument(ArgumentError::Identifier(_))));
		assert_eq!(err.to_string(), "Tenant identifier cannot be empty.");
	}

	#[test]
	fn require_rejects_empty_values_only() {
		assert_eq!(ArgumentError::require("url", ""), Err(ArgumentError::Empty { field: "url" }));
		assert!(ArgumentError::require("url", "https://example.com").is_ok());
	}

	#[test]
	fn remote_error_flags_rejected_credentials() {
		let expired = RemoteError { errcode: 42001, errmsg: "access_token expired".into() };
		let other = RemoteError { errcode: 45009, errmsg: "api freq out of limit".into() };

		assert!(expired.is_credential_rejected());
		assert!(!other.is_credential_rejected());
		assert_eq!(other.to_string(), "Platform returned errcode 45009: api freq out of limit.");
	}

	#[test]
	fn credential_unavailable_names_the_tenant() {
		let tenant = TenantId::new("wx001").expect("Tenant fixture should be valid.");
		let err = Error::CredentialUnavailable { tenant };

		assert!(err.to_string().contains("`wx001`"));
	}
}
