//! Client configuration loaded from a JSON file or `TWITTER_*` environment variables.

// std
use std::{fs, path::Path};
// self
use crate::{
	_prelude::*,
	auth::{ConsumerCredential, TokenCredential},
	error::ConfigError,
};

/// Environment variable holding the consumer key.
pub const CONSUMER_KEY_VAR: &str = "TWITTER_CONSUMER_KEY";
/// Environment variable holding the consumer secret.
pub const CONSUMER_SECRET_VAR: &str = "TWITTER_CONSUMER_SECRET";
/// Environment variable holding a previously issued access token.
pub const ACCESS_TOKEN_VAR: &str = "TWITTER_ACCESS_TOKEN";
/// Environment variable holding the access token secret.
pub const ACCESS_TOKEN_SECRET_VAR: &str = "TWITTER_ACCESS_TOKEN_SECRET";
/// Environment variable holding the callback URL.
pub const CALLBACK_VAR: &str = "TWITTER_CALLBACK";

/// Application credentials plus an optional saved access token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
	/// Consumer key.
	pub consumer_key: String,
	/// Consumer secret.
	pub consumer_secret: String,
	/// Access token from an earlier authorization.
	#[serde(default)]
	pub access_token: Option<String>,
	/// Secret of [`access_token`](Self::access_token).
	#[serde(default)]
	pub access_token_secret: Option<String>,
	/// Callback URL for the request-token call; `oob` when unset.
	#[serde(default)]
	pub callback: Option<String>,
}
impl ClientConfig {
	/// Reads a JSON configuration file.
	///
	/// Parse errors carry the path of the offending field.
	pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let display = path.display().to_string();
		let raw = fs::read_to_string(path)
			.map_err(|source| ConfigError::ReadConfig { path: display.clone(), source })?;
		let de = &mut serde_json::Deserializer::from_str(&raw);

		serde_path_to_error::deserialize(de)
			.map_err(|source| ConfigError::ParseConfig { path: display, source })
	}

	/// Reads the `TWITTER_*` variables from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_vars(std::env::vars())
	}

	/// Reads the `TWITTER_*` variables from `vars`; empty values count as unset.
	pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		let mut vars = vars
			.into_iter()
			.map(|(name, value)| (name.as_ref().to_owned(), value.into()))
			.filter(|(_, value)| !value.is_empty())
			.collect::<HashMap<_, _>>();
		let mut required = |name: &'static str| {
			vars.remove(name).ok_or(ConfigError::MissingVariable { name })
		};
		let consumer_key = required(CONSUMER_KEY_VAR)?;
		let consumer_secret = required(CONSUMER_SECRET_VAR)?;

		Ok(Self {
			consumer_key,
			consumer_secret,
			access_token: vars.remove(ACCESS_TOKEN_VAR),
			access_token_secret: vars.remove(ACCESS_TOKEN_SECRET_VAR),
			callback: vars.remove(CALLBACK_VAR),
		})
	}

	/// Builds the credential: `Access` when both token values are present, no token when
	/// neither is.
	pub fn credential(&self) -> Result<TokenCredential> {
		let consumer = ConsumerCredential::new(&self.consumer_key, &self.consumer_secret)?;

		match (&self.access_token, &self.access_token_secret) {
			(Some(token), Some(secret)) =>
				Ok(TokenCredential::with_access_token(consumer, token, secret)?),
			(None, None) => Ok(TokenCredential::new(consumer)),
			_ => Err(ConfigError::IncompleteAccessToken.into()),
		}
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("consumer_key", &self.consumer_key)
			.field("consumer_secret", &"<redacted>")
			.field("access_token", &self.access_token)
			.field("access_token_secret", &self.access_token_secret.as_ref().map(|_| "<redacted>"))
			.field("callback", &self.callback)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::env;
	// self
	use super::*;
	use crate::auth::TokenKind;

	fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
		pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
	}

	#[test]
	fn vars_build_an_access_credential() {
		let config = ClientConfig::from_vars(vars(&[
			(CONSUMER_KEY_VAR, "xvz1evFS4wEEPTGEFPHBog"),
			(CONSUMER_SECRET_VAR, "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw"),
			(ACCESS_TOKEN_VAR, "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb"),
			(ACCESS_TOKEN_SECRET_VAR, "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"),
			("UNRELATED", "ignored"),
		]))
		.expect("Complete variables should load.");
		let credential = config.credential().expect("Credential should build.");

		assert_eq!(credential.kind(), TokenKind::Access);
		assert_eq!(config.callback, None);
		assert!(!format!("{config:?}").contains("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw"));
	}

	#[test]
	fn missing_and_partial_values_are_reported() {
		let err = ClientConfig::from_vars(vars(&[(CONSUMER_KEY_VAR, "key")]))
			.expect_err("Missing secret should fail.");

		assert!(matches!(err, ConfigError::MissingVariable { name: CONSUMER_SECRET_VAR }));

		let config = ClientConfig::from_vars(vars(&[
			(CONSUMER_KEY_VAR, "key"),
			(CONSUMER_SECRET_VAR, "secret"),
			(ACCESS_TOKEN_VAR, "token"),
			(ACCESS_TOKEN_SECRET_VAR, ""),
		]))
		.expect("Consumer values should load.");

		assert!(matches!(
			config.credential(),
			Err(Error::Config(ConfigError::IncompleteAccessToken))
		));
	}

	#[test]
	fn json_file_errors_name_the_field() {
		let dir = env::temp_dir().join(format!("twitter-oauth1-config-{}", std::process::id()));

		fs::create_dir_all(&dir).expect("Temp dir should be creatable.");

		let good = dir.join("good.json");
		let bad = dir.join("bad.json");

		fs::write(&good, r#"{"consumer_key":"key","consumer_secret":"secret","callback":"oob"}"#)
			.expect("Fixture should be writable.");
		fs::write(&bad, r#"{"consumer_key":"key","consumer_secret":42}"#)
			.expect("Fixture should be writable.");

		let config = ClientConfig::from_json_file(&good).expect("Valid file should load.");

		assert_eq!(config.callback.as_deref(), Some("oob"));
		assert_eq!(
			config.credential().expect("Credential should build.").kind(),
			TokenKind::Invalid
		);

		match ClientConfig::from_json_file(&bad) {
			Err(ConfigError::ParseConfig { source, .. }) =>
				assert_eq!(source.path().to_string(), "consumer_secret"),
			other => panic!("Expected a parse error, got {other:?}."),
		}

		assert!(matches!(
			ClientConfig::from_json_file(dir.join("missing.json")),
			Err(ConfigError::ReadConfig { .. })
		));

		let _ = fs::remove_dir_all(&dir);
	}
}
