//! OAuth 1.0a (RFC 5849) request signing and a flow-driving client for the Twitter REST API:
//! temporary credentials, user authorization, token exchange, and signed resource calls over a
//! pluggable HTTP transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod request;
pub mod signer;
pub mod store;
pub mod twitter;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{AccountId, ConsumerCredential, TokenCredential},
		flows::OAuthClient,
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
		provider::{DefaultProviderStrategy, ProviderStrategy, ServiceProviderDescription},
		store::{CredentialStore, MemoryStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = OAuthClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Account grants are stored under by [`build_reqwest_test_client`].
	pub const TEST_ACCOUNT: &str = "test-account";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs an [`OAuthClient`] holding no token, backed by an in-memory store attached
	/// under [`TEST_ACCOUNT`], the default provider strategy, and the test reqwest transport.
	pub fn build_reqwest_test_client(
		description: ServiceProviderDescription,
		consumer_key: &str,
		consumer_secret: &str,
	) -> (ReqwestTestClient, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let strategy: Arc<dyn ProviderStrategy> = Arc::new(DefaultProviderStrategy);
		let consumer = ConsumerCredential::new(consumer_key, consumer_secret)
			.expect("Test consumer credential should be valid.");
		let account = AccountId::new(TEST_ACCOUNT).expect("Test account identifier should be valid.");
		let client = OAuthClient::with_http_client(
			description,
			strategy,
			TokenCredential::new(consumer),
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		)
		.with_store(store, account);

		(client, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
