// self
use crate::_prelude::*;

/// Provider-specific quirks that influence how requests are signed and flows behave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Realm placed first in the `Authorization` header.
	pub realm: Option<String>,
	/// Indicates whether the optional `oauth_version=1.0` parameter is sent.
	pub include_version: bool,
	/// Indicates whether the request-token response must carry
	/// `oauth_callback_confirmed=true` (1.0a only).
	pub require_callback_confirmed: bool,
	/// Callback used when the caller does not supply one; `oob` selects PIN-based
	/// authorization.
	pub default_callback: String,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self {
			realm: None,
			include_version: true,
			require_callback_confirmed: true,
			default_callback: "oob".into(),
		}
	}
}
