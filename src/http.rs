//! Transport primitives for platform API calls.
//!
//! The module exposes [`ApiHttpClient`] alongside [`ApiRequest`] and [`ApiResponse`] so
//! downstream crates can plug in a custom HTTP stack. Implementations only move bytes:
//! decoding, `errcode` inspection, and error classification stay in the broker.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	Method,
	header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER},
};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::_prelude::*;

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing platform calls.
///
/// The trait is the broker's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so one transport can be shared by every clone of a broker, and
/// the returned future must be `Send` so calls can hop executors.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Dispatches `request` and resolves to the raw response.
	///
	/// Non-success HTTP statuses are returned as responses, not errors; only failures to
	/// obtain a response at all belong in [`Self::TransportError`].
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, ApiResponse, Self::TransportError>;
}

/// HTTP verbs used by the platform API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiMethod {
	/// Query-only request.
	Get,
	/// Request carrying a JSON body.
	Post,
}
impl ApiMethod {
	/// Returns the canonical verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			ApiMethod::Get => "GET",
			ApiMethod::Post => "POST",
		}
	}
}
impl Display for ApiMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outbound request with a fully resolved URL.
#[derive(Clone)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: ApiMethod,
	/// Target URL including the query string.
	pub url: Url,
	/// Serialized JSON body for [`ApiMethod::Post`].
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Builds a body-less GET request.
	pub fn get(url: Url) -> Self {
		Self { method: ApiMethod::Get, url, body: None }
	}

	/// Builds a POST request carrying `body` as JSON.
	pub fn post(url: Url, body: Vec<u8>) -> Self {
		Self { method: ApiMethod::Post, url, body: Some(body) }
	}
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut redacted = self.url.clone();
		let pairs = self
			.url
			.query_pairs()
			.map(|(key, value)| match key.as_ref() {
				"access_token" | "secret" | "code" => (key.into_owned(), "<redacted>".to_owned()),
				_ => (key.into_owned(), value.into_owned()),
			})
			.collect::<Vec<_>>();

		if !pairs.is_empty() {
			redacted.query_pairs_mut().clear().extend_pairs(pairs);
		}

		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("url", &redacted.as_str())
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.finish()
	}
}

/// Raw response handed back by an [`ApiHttpClient`].
#[derive(Clone, Debug, Default)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, ApiResponse, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				ApiMethod::Get => Method::GET,
				ApiMethod::Post => Method::POST,
			};
			let mut builder = client.request(method, request.url);

			if let Some(body) = request.body {
				builder = builder.header(CONTENT_TYPE, "application/json").body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, retry_after, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(secs as i64));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_debug_redacts_credentials() {
		let url = Url::parse(
			"https://api.weixin.qq.com/cgi-bin/token?grant_type=client_credential&appid=wx1&secret=s3cr3t",
		)
		.expect("Fixture URL should parse.");
		let rendered = format!("{:?}", ApiRequest::get(url));

		assert!(rendered.contains("appid=wx1"));
		assert!(!rendered.contains("s3cr3t"));
	}

	#[test]
	fn success_covers_only_2xx() {
		assert!(ApiResponse { status: 204, ..Default::default() }.is_success());
		assert!(!ApiResponse { status: 503, ..Default::default() }.is_success());
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn retry_after_accepts_delta_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, "12".parse().expect("Header value should parse."));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(12)));
	}
}
