// self
use crate::{_prelude::*, platform::PlatformDescriptor};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum PlatformDescriptorError {
	/// The API base must use HTTPS outside of loopback test servers.
	#[error("The API base must use HTTPS: {url}.")]
	InsecureApiBase {
		/// URL that failed validation.
		url: String,
	},
	/// The API base cannot carry a query or fragment, since endpoints are joined onto it.
	#[error("The API base must not carry a query or fragment: {url}.")]
	ApiBaseHasQuery {
		/// URL that failed validation.
		url: String,
	},
}

/// Builder for [`PlatformDescriptor`] values.
#[derive(Debug)]
pub struct PlatformDescriptorBuilder {
	/// Base URL for every endpoint.
	pub api_base: Url,
}
impl PlatformDescriptorBuilder {
	/// Overrides the API base (for proxies, regional hosts, or mock servers).
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = url;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<PlatformDescriptor, PlatformDescriptorError> {
		let mut api_base = self.api_base;

		validate_api_base(&api_base)?;

		if !api_base.path().ends_with('/') {
			let path = format!("{}/", api_base.path());

			api_base.set_path(&path);
		}

		Ok(PlatformDescriptor { api_base })
	}
}
impl Default for PlatformDescriptorBuilder {
	fn default() -> Self {
		Self { api_base: PlatformDescriptor::default().api_base }
	}
}

fn validate_api_base(url: &Url) -> Result<(), PlatformDescriptorError> {
	if url.query().is_some() || url.fragment().is_some() {
		return Err(PlatformDescriptorError::ApiBaseHasQuery { url: url.to_string() });
	}
	if url.scheme() == "https" || is_loopback(url) {
		Ok(())
	} else {
		Err(PlatformDescriptorError::InsecureApiBase { url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain == "localhost",
		Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
		Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
		None => false,
	}
}
