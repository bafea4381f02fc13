//! JS-SDK signing helpers: canonical query strings, SHA-1 digests, nonces, and timestamps.
//!
//! The client SDK recomputes the signature from the same four fields, so every step here
//! is deterministic: keys are lower-cased, sorted ascending, joined as `k=v` pairs with
//! `&`, and hashed with SHA-1 into lowercase hex.

// crates.io
use rand::{Rng, distr::Alphanumeric};
use sha1::{Digest, Sha1};
// self
use crate::{_prelude::*, error::ArgumentError};

/// Field map assembled for a JS-SDK signature.
pub type SigningContext = BTreeMap<String, String>;

const NONCE_LEN: usize = 16;

/// Parameters a front-end passes to `wx.config` to open a JS-SDK session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsSdkConfig {
	/// Random string that was signed.
	pub nonce_str: String,
	/// Unix timestamp (seconds) that was signed.
	pub timestamp: String,
	/// Lowercase hex SHA-1 signature.
	pub signature: String,
}

/// Joins `fields` into `k1=v1&k2=v2...` with lower-cased keys in ascending order.
///
/// Keys that collide after lower-casing keep the value of the key that sorts last in its
/// original casing (`Foo` loses to `foo`), independent of iteration order.
pub fn canonicalize<I, K, V>(fields: I) -> String
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: Display,
{
	let ordered = fields
		.into_iter()
		.map(|(key, value)| (key.as_ref().to_owned(), value.to_string()))
		.collect::<BTreeMap<_, _>>();
	let lowered = ordered
		.into_iter()
		.map(|(key, value)| (key.to_lowercase(), value))
		.collect::<BTreeMap<_, _>>();
	let mut buf = String::new();

	for (idx, (key, value)) in lowered.iter().enumerate() {
		if idx > 0 {
			buf.push('&');
		}

		buf.push_str(key);
		buf.push('=');
		buf.push_str(value);
	}

	buf
}

/// Returns the lowercase hex SHA-1 digest of [`canonicalize`]`(fields)`.
pub fn sign<I, K, V>(fields: I) -> String
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: Display,
{
	let canonical = canonicalize(fields);
	let mut hasher = Sha1::new();

	hasher.update(canonical.as_bytes());

	hex::encode(hasher.finalize())
}

/// Assembles the `jsapi_ticket`, `nonceStr`, `timestamp`, and `url` fields for signing.
pub fn build_signing_context(
	ticket: &str,
	nonce: &str,
	timestamp: &str,
	url: &str,
) -> Result<SigningContext, ArgumentError> {
	ArgumentError::require("ticket", ticket)?;
	ArgumentError::require("nonce", nonce)?;
	ArgumentError::require("timestamp", timestamp)?;
	ArgumentError::require("url", url)?;

	Ok(SigningContext::from([
		("jsapi_ticket".into(), ticket.into()),
		("nonceStr".into(), nonce.into()),
		("timestamp".into(), timestamp.into()),
		("url".into(), url.into()),
	]))
}

/// Signs the four JS-SDK fields in one step.
pub fn js_sdk_signature(
	ticket: &str,
	nonce: &str,
	timestamp: &str,
	url: &str,
) -> Result<String, ArgumentError> {
	build_signing_context(ticket, nonce, timestamp, url).map(sign)
}

/// Generates a random alphanumeric nonce for `wx.config`.
pub fn generate_nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

/// Formats `instant` as whole Unix seconds.
pub fn unix_timestamp(instant: OffsetDateTime) -> String {
	instant.unix_timestamp().to_string()
}
