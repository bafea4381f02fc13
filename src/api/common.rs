//! Shared plumbing for platform operations (token lookup, dispatch, `errcode` checks, guards).

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	api::Broker,
	auth::{TenantId, TokenSecret},
	error::{ArgumentError, ConfigError, RemoteError, TransientError, TransportError},
	http::{ApiHttpClient, ApiRequest, ApiResponse},
	obs::{self, CallOutcome, CallSpan, Operation},
};

const BODY_PREVIEW_LEN: usize = 256;

impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Returns the live access token cached for `tenant`.
	///
	/// A miss never contacts the platform; callers decide when to call
	/// [`Broker::issue_access_token`].
	pub fn access_token(&self, tenant: &TenantId) -> Result<TokenSecret> {
		self.tokens.get(tenant).ok_or_else(|| Error::CredentialUnavailable { tenant: tenant.clone() })
	}

	/// Issues an authorized GET against `path` with `query` appended after the access token.
	pub(crate) async fn get_authorized<T>(
		&self,
		tenant: &TenantId,
		path: &'static str,
		query: &[(&str, &str)],
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let token = self.access_token(tenant)?;
		let url = self.authorized_url(path, &token, query)?;

		self.dispatch_authorized(tenant, ApiRequest::get(url)).await
	}

	/// Issues an authorized POST against `path` carrying `body` as JSON.
	pub(crate) async fn post_authorized<T, B>(
		&self,
		tenant: &TenantId,
		path: &'static str,
		body: &B,
	) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let token = self.access_token(tenant)?;
		let url = self.authorized_url(path, &token, &[])?;
		let body =
			serde_json::to_vec(body).map_err(|source| ConfigError::RequestBody { path, source })?;

		self.dispatch_authorized(tenant, ApiRequest::post(url, body)).await
	}

	/// Sends `request` and decodes the response, classifying failures.
	pub(crate) async fn dispatch<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response =
			self.http_client.execute(request).await.map_err(TransportError::network)?;

		decode_response(response)
	}

	fn authorized_url(
		&self,
		path: &'static str,
		token: &TokenSecret,
		query: &[(&str, &str)],
	) -> Result<Url> {
		let mut url = self.descriptor.endpoint(path)?;

		{
			let mut pairs = url.query_pairs_mut();

			pairs.append_pair("access_token", token.expose());

			for (key, value) in query {
				pairs.append_pair(key, value);
			}
		}

		Ok(url)
	}

	async fn dispatch_authorized<T>(&self, tenant: &TenantId, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		match self.dispatch(request).await {
			Err(Error::Remote(remote)) if remote.is_credential_rejected() => {
				self.tokens.remove(tenant);

				Err(remote.into())
			},
			other => other,
		}
	}
}

/// Runs `fut` inside an operation span and records its attempt and outcome.
pub(crate) async fn observed<T, Fut>(
	operation: Operation,
	tenant: &TenantId,
	fut: Fut,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = CallSpan::new(operation, tenant);

	obs::record_call_outcome(operation, CallOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => obs::record_call_outcome(operation, CallOutcome::Success),
		Err(_) => obs::record_call_outcome(operation, CallOutcome::Failure),
	}

	result
}

/// Rejects `null` JSON payloads before any network work happens.
pub(crate) fn require_payload(payload: &Value) -> Result<(), ArgumentError> {
	if payload.is_null() { Err(ArgumentError::Empty { field: "payload" }) } else { Ok(()) }
}

/// Returns (and creates on demand) the singleflight guard for a tenant's ticket fetch.
///
/// Guards nobody holds any more are pruned on every call, so the map only tracks tenants
/// with a fetch in flight.
pub(crate) fn ticket_guard<C>(broker: &Broker<C>, tenant: &TenantId) -> Arc<AsyncMutex<()>>
where
	C: ?Sized + ApiHttpClient,
{
	let mut guards = broker.ticket_guards.lock();

	guards.retain(|_, guard| Arc::strong_count(guard) > 1);
	guards.entry(tenant.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
}

/// Error for a success response whose credential field came back empty.
pub(crate) fn empty_credential(message: &'static str) -> Error {
	TransientError::UnexpectedStatus { message: message.into(), status: 200, retry_after: None }
		.into()
}

/// Extracts the platform error object when `value` carries a non-zero `errcode`.
pub(crate) fn remote_error(value: &Value) -> Option<RemoteError> {
	let errcode = value.get("errcode").and_then(Value::as_i64).filter(|code| *code != 0)?;
	let errmsg = value.get("errmsg").and_then(Value::as_str).unwrap_or_default().to_owned();

	Some(RemoteError { errcode, errmsg })
}

fn decode_response<T>(response: ApiResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = response.status;
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
	let value = match serde_path_to_error::deserialize::<_, Value>(&mut deserializer) {
		Ok(value) => value,
		Err(_) if !response.is_success() => return Err(unexpected_status(&response).into()),
		Err(source) =>
			return Err(TransientError::ResponseParse { source, status: Some(status) }.into()),
	};

	if let Some(remote) = remote_error(&value) {
		return Err(remote.into());
	}
	if !response.is_success() {
		return Err(unexpected_status(&response).into());
	}

	serde_path_to_error::deserialize(value)
		.map_err(|source| TransientError::ResponseParse { source, status: Some(status) }.into())
}

fn unexpected_status(response: &ApiResponse) -> TransientError {
	let body = String::from_utf8_lossy(&response.body);
	let message = if body.trim().is_empty() {
		format!("HTTP {}", response.status)
	} else {
		body.chars().take(BODY_PREVIEW_LEN).collect()
	};

	TransientError::UnexpectedStatus {
		message,
		status: response.status,
		retry_after: response.retry_after,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	struct OfflineClient;
	impl ApiHttpClient for OfflineClient {
		type TransportError = std::io::Error;

		fn execute(
			&self,
			_request: ApiRequest,
		) -> crate::http::HttpFuture<'_, ApiResponse, Self::TransportError> {
			Box::pin(async { Err(std::io::Error::other("offline")) })
		}
	}

	fn offline_broker() -> Broker<OfflineClient> {
		Broker::with_http_client(
			crate::platform::PlatformDescriptor::default(),
			Arc::new(crate::store::MemoryCredentialCache::default()),
			Arc::new(crate::store::MemoryCredentialCache::default()),
			OfflineClient,
		)
	}

	fn tenant(value: &str) -> TenantId {
		TenantId::new(value).expect("Tenant fixture should be valid.")
	}

	fn response(status: u16, body: &str) -> ApiResponse {
		ApiResponse { status, retry_after: None, body: body.as_bytes().to_vec() }
	}

	#[test]
	fn zero_or_missing_errcode_is_success() {
		assert_eq!(remote_error(&serde_json::json!({ "errcode": 0, "errmsg": "ok" })), None);
		assert_eq!(remote_error(&serde_json::json!({ "menuid": "208379533" })), None);
	}

	#[test]
	fn non_zero_errcode_wins_over_http_status() {
		let err = decode_response::<Value>(response(200, r#"{"errcode":40013,"errmsg":"invalid appid"}"#))
			.expect_err("Non-zero errcode must fail.");

		assert!(matches!(
			err,
			Error::Remote(RemoteError { errcode: 40013, ref errmsg }) if errmsg == "invalid appid"
		));
	}

	#[test]
	fn non_json_error_status_is_transient() {
		let err = decode_response::<Value>(response(502, "<html>bad gateway</html>"))
			.expect_err("Gateway failures must surface.");

		assert!(matches!(
			err,
			Error::Transient(TransientError::UnexpectedStatus { status: 502, .. })
		));
	}

	#[test]
	fn shape_mismatch_reports_the_path() {
		#[derive(Debug, Deserialize)]
		struct Sent {
			#[allow(dead_code)]
			msgid: u64,
		}

		let err = decode_response::<Sent>(response(200, r#"{"msgid":"not-a-number"}"#))
			.expect_err("Shape mismatch must fail.");
		let Error::Transient(TransientError::ResponseParse { source, status }) = err else {
			panic!("Expected a parse failure, got {err:?}.");
		};

		assert_eq!(source.path().to_string(), "msgid");
		assert_eq!(status, Some(200));
	}

	#[test]
	fn null_payloads_are_rejected() {
		assert_eq!(require_payload(&Value::Null), Err(ArgumentError::Empty { field: "payload" }));
		assert!(require_payload(&serde_json::json!({ "button": [] })).is_ok());
	}

	#[test]
	fn released_ticket_guards_are_pruned() {
		let broker = offline_broker();

		for app_id in ["wx001", "wx002", "wx003", "wx004"] {
			drop(ticket_guard(&broker, &tenant(app_id)));
		}

		assert!(broker.ticket_guards.lock().len() <= 1);

		let held = ticket_guard(&broker, &tenant("wx-held"));
		let again = ticket_guard(&broker, &tenant("wx-held"));
		let _other = ticket_guard(&broker, &tenant("wx-other"));

		assert!(Arc::ptr_eq(&held, &again), "A held guard must be shared, not replaced.");
		assert_eq!(broker.ticket_guards.lock().len(), 2);
	}

	#[test]
	fn empty_credentials_are_transient() {
		assert!(matches!(
			empty_credential("token endpoint returned an empty access token"),
			Error::Transient(TransientError::UnexpectedStatus { status: 200, .. })
		));
	}
}
