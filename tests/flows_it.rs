#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
// self
use twitter_oauth1::{
	_preludet::*,
	auth::{AccountId, CredentialError, ProviderId, TokenKind},
	flows::{AuthorizationCallback, AuthorizeOptions},
	provider::{OAuthEndPoint, ProtocolVersion, ServiceProviderDescription},
	store::CredentialStore,
};

const CONSUMER_KEY: &str = "dpf43f3p2l4k3l03";
const CONSUMER_SECRET: &str = "kd94hf93k423kf44";
const CALLBACK: &str = "https://client.example.com/cb";

fn server_url(server: &MockServer, path: &str) -> Url {
	Url::parse(&server.url(path)).expect("Mock endpoint should parse successfully.")
}

fn build_description(server: &MockServer, version: ProtocolVersion) -> ServiceProviderDescription {
	let provider_id =
		ProviderId::new("mock-twitter").expect("Provider identifier should be valid for flow test.");

	ServiceProviderDescription::builder(provider_id)
		.request_token_endpoint(OAuthEndPoint::post(server_url(server, "/oauth/request_token")))
		.authorize_endpoint(server_url(server, "/oauth/authorize"))
		.authenticate_endpoint(server_url(server, "/oauth/authenticate"))
		.access_token_endpoint(OAuthEndPoint::post(server_url(server, "/oauth/access_token")))
		.version(version)
		.build()
		.expect("Provider description should build successfully.")
}

fn callback_url(query: &str) -> Url {
	Url::parse(&format!("{CALLBACK}?{query}")).expect("Callback URL should parse.")
}

#[tokio::test]
async fn pin_less_flow_reaches_access_and_persists_grant() {
	let server = MockServer::start_async().await;
	let description = build_description(&server, ProtocolVersion::V1_0a);
	let (client, store) =
		build_reqwest_test_client(description.clone(), CONSUMER_KEY, CONSUMER_SECRET);
	let request_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/request_token").header_exists("authorization");
			then.status(200).header("content-type", "application/x-www-form-urlencoded").body(
				"oauth_token=hh5s93j4hdidpola&oauth_token_secret=hdhd0244k9j7ao03&oauth_callback_confirmed=true",
			);
		})
		.await;
	let pair = client
		.request_token(Some(CALLBACK))
		.await
		.expect("Request-token call should succeed against the mock provider.");

	request_mock.assert_async().await;

	assert_eq!(pair.key(), "hh5s93j4hdidpola");
	assert_eq!(client.token_kind(), TokenKind::Request);

	let authorize_url = client.authorize_url().expect("Authorize URL should build.");

	assert_eq!(authorize_url.path(), "/oauth/authorize");
	assert_eq!(authorize_url.query(), Some("oauth_token=hh5s93j4hdidpola"));

	let authenticate_url = client
		.authorize_url_with(&AuthorizeOptions::default().authenticate().force_login())
		.expect("Authenticate URL should build.");

	assert_eq!(authenticate_url.path(), "/oauth/authenticate");
	assert_eq!(authenticate_url.query(), Some("oauth_token=hh5s93j4hdidpola&force_login=true"));

	let access_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token").header_exists("authorization");
			then.status(200).header("content-type", "application/x-www-form-urlencoded").body(
				"oauth_token=nnch734d00sl2jdk&oauth_token_secret=pfkkdhi9sl3r4s00&user_id=6253282&screen_name=twitterapi",
			);
		})
		.await;
	let callback = AuthorizationCallback::from_url(&callback_url(
		"oauth_token=hh5s93j4hdidpola&oauth_verifier=hfdp7dh39dks9884",
	))
	.expect("Approved callback should parse.");
	let grant = client
		.complete_authorization(&callback)
		.await
		.expect("Access-token exchange should succeed against the mock provider.");

	access_mock.assert_async().await;

	assert_eq!(grant.token.key(), "nnch734d00sl2jdk");
	assert_eq!(grant.user_id.as_deref(), Some("6253282"));
	assert_eq!(grant.screen_name.as_deref(), Some("twitterapi"));
	assert_eq!(client.token_kind(), TokenKind::Access);

	let key = client.store_key().expect("Test client should carry a store key.");
	let stored = store
		.fetch(&key)
		.await
		.expect("Memory store fetch should succeed.")
		.expect("Grant should be persisted after the exchange.");

	assert_eq!(stored, grant);

	let (fresh, _) = build_reqwest_test_client(description, CONSUMER_KEY, CONSUMER_SECRET);
	let account = AccountId::new(TEST_ACCOUNT).expect("Test account identifier should be valid.");
	let fresh = fresh.with_store(store, account);
	let restored = fresh
		.restore()
		.await
		.expect("Restore should succeed.")
		.expect("Restore should find the persisted grant.");

	assert_eq!(restored.token.key(), "nnch734d00sl2jdk");
	assert_eq!(fresh.token_kind(), TokenKind::Access);
}

#[tokio::test]
async fn unconfirmed_callback_is_rejected() {
	let server = MockServer::start_async().await;
	let description = build_description(&server, ProtocolVersion::V1_0a);
	let (client, _) = build_reqwest_test_client(description, CONSUMER_KEY, CONSUMER_SECRET);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/request_token");
			then.status(200)
				.header("content-type", "application/x-www-form-urlencoded")
				.body("oauth_token=hh5s93j4hdidpola&oauth_token_secret=hdhd0244k9j7ao03");
		})
		.await;
	let err = client
		.request_token(None)
		.await
		.expect_err("A response without oauth_callback_confirmed should be rejected.");

	mock.assert_async().await;

	assert!(matches!(err, Error::CallbackNotConfirmed));
	assert_eq!(client.token_kind(), TokenKind::Invalid);
}

#[tokio::test]
async fn version_1_0_moves_callback_to_authorize_url() {
	let server = MockServer::start_async().await;
	let description = build_description(&server, ProtocolVersion::V1_0);
	let (client, _) = build_reqwest_test_client(description, CONSUMER_KEY, CONSUMER_SECRET);
	let request_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/request_token");
			then.status(200)
				.header("content-type", "application/x-www-form-urlencoded")
				.body("oauth_token=legacy-request&oauth_token_secret=legacy-secret");
		})
		.await;

	client.request_token(Some(CALLBACK)).await.expect("Legacy request-token call should succeed.");
	request_mock.assert_async().await;

	let authorize_url = client.authorize_url().expect("Authorize URL should build.");
	let pairs = authorize_url.query_pairs().into_owned().collect::<Vec<_>>();

	assert_eq!(
		pairs,
		vec![
			("oauth_token".to_owned(), "legacy-request".to_owned()),
			("oauth_callback".to_owned(), CALLBACK.to_owned()),
		]
	);

	let access_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(200)
				.header("content-type", "application/x-www-form-urlencoded")
				.body("oauth_token=legacy-access&oauth_token_secret=legacy-access-secret");
		})
		.await;
	let callback = AuthorizationCallback::from_url(&callback_url("oauth_token=legacy-request"))
		.expect("Callback without verifier should parse.");
	let grant = client
		.complete_authorization(&callback)
		.await
		.expect("Legacy exchange should not need a verifier.");

	access_mock.assert_async().await;

	assert_eq!(grant.token.key(), "legacy-access");
	assert_eq!(grant.user_id, None);
}

#[tokio::test]
async fn denied_and_mismatched_callbacks_fail_locally() {
	let server = MockServer::start_async().await;
	let description = build_description(&server, ProtocolVersion::V1_0a);
	let (client, _) = build_reqwest_test_client(description, CONSUMER_KEY, CONSUMER_SECRET);
	let request_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/request_token");
			then.status(200).header("content-type", "application/x-www-form-urlencoded").body(
				"oauth_token=hh5s93j4hdidpola&oauth_token_secret=hdhd0244k9j7ao03&oauth_callback_confirmed=true",
			);
		})
		.await;
	let access_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(500);
		})
		.await;

	client.request_token(None).await.expect("Request-token call should succeed.");

	let mismatch = AuthorizationCallback::from_url(&callback_url(
		"oauth_token=someone-else&oauth_verifier=hfdp7dh39dks9884",
	))
	.expect("Callback should parse.");
	let err = client
		.complete_authorization(&mismatch)
		.await
		.expect_err("Callback for another token should be rejected.");

	assert!(matches!(err, Error::Credential(CredentialError::TokenMismatch)));
	assert_eq!(client.token_kind(), TokenKind::Request);

	let missing_verifier =
		AuthorizationCallback::from_url(&callback_url("oauth_token=hh5s93j4hdidpola"))
			.expect("Callback should parse.");
	let err = client
		.complete_authorization(&missing_verifier)
		.await
		.expect_err("1.0a callbacks must carry a verifier.");

	assert!(matches!(err, Error::Callback(_)));

	let denied = AuthorizationCallback::from_url(&callback_url("denied=hh5s93j4hdidpola"))
		.expect("Denied callback should parse.");
	let err =
		client.complete_authorization(&denied).await.expect_err("Denied callback should fail.");

	assert!(matches!(err, Error::TokenRejected { .. }));
	assert_eq!(client.token_kind(), TokenKind::Invalid);

	request_mock.assert_async().await;
	access_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn access_token_requires_a_request_token() {
	let server = MockServer::start_async().await;
	let description = build_description(&server, ProtocolVersion::V1_0a);
	let (client, _) = build_reqwest_test_client(description, CONSUMER_KEY, CONSUMER_SECRET);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(200);
		})
		.await;
	let err = client
		.access_token("hfdp7dh39dks9884")
		.await
		.expect_err("Exchange without a request token should fail.");

	mock.assert_calls_async(0).await;

	assert!(matches!(
		err,
		Error::Credential(CredentialError::UnexpectedTokenKind {
			expected: TokenKind::Request,
			actual: TokenKind::Invalid,
		})
	));
}

#[tokio::test]
async fn consumer_problems_are_classified() {
	let server = MockServer::start_async().await;
	let description = build_description(&server, ProtocolVersion::V1_0a);
	let (client, _) = build_reqwest_test_client(description, CONSUMER_KEY, CONSUMER_SECRET);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/request_token");
			then.status(401)
				.header("content-type", "application/x-www-form-urlencoded")
				.body("oauth_problem=consumer_key_unknown");
		})
		.await;
	let err = client.request_token(None).await.expect_err("Unknown consumer should be rejected.");

	mock.assert_async().await;

	match err {
		Error::InvalidConsumer { reason } => assert!(reason.contains("consumer_key_unknown")),
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
