//! Validated platform metadata consumed by the broker.

/// Builder API for assembling platform descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Immutable description of the remote API the broker talks to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformDescriptor {
	/// Base URL every endpoint path is joined onto; always ends with `/`.
	pub api_base: Url,
}
impl PlatformDescriptor {
	/// Production API host for Official Accounts.
	pub const DEFAULT_API_BASE: &'static str = "https://api.weixin.qq.com/";

	/// Creates a new builder seeded with the production API base.
	pub fn builder() -> PlatformDescriptorBuilder {
		PlatformDescriptorBuilder::default()
	}

	/// Resolves a relative endpoint path such as `cgi-bin/menu/get`.
	pub fn endpoint(&self, path: &'static str) -> Result<Url, ConfigError> {
		self.api_base.join(path).map_err(|source| ConfigError::InvalidEndpoint { path, source })
	}
}
impl Default for PlatformDescriptor {
	fn default() -> Self {
		Self {
			api_base: Url::parse(Self::DEFAULT_API_BASE)
				.expect("Default API base is a valid URL literal."),
		}
	}
}
