// std
use std::{
	collections::VecDeque,
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};
// crates.io
use parking_lot::Mutex;
use time::Duration;
// self
use twitter_oauth1::{
	auth::{AccessGrant, AccountId, ConsumerCredential, ProviderId, TokenCredential, TokenKind},
	error::{ConfigError, Error, TransientError},
	flows::OAuthClient,
	http::{HttpResponse, OAuthHttpClient, ResponseMetadata, ResponseMetadataSlot, TransportFuture},
	oauth::TransportErrorMapper,
	provider::{
		DefaultProviderStrategy, OAuthEndPoint, OAuthFlow, ProviderStrategy,
		ServiceProviderDescription,
	},
	request::{PreparedRequest, ResourceRequest},
	signer::{AuthorizationHeader, Signer},
	store::{CredentialStore, StoreError, StoreFuture, StoreKey},
	twitter::{AccessType, TwitterStrategy},
};

const CONSUMER_KEY: &str = "fake-consumer";
const CONSUMER_SECRET: &str = "fake-consumer-secret";

#[derive(Debug)]
enum FakeTransportError {
	Throttled,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Throttled => write!(f, "Transport throttled."),
		}
	}
}
impl StdError for FakeTransportError {}

/// Replays canned responses in order; an empty queue behaves like a throttled network.
#[derive(Default)]
struct FakeHttpClient {
	responses: Mutex<VecDeque<HttpResponse>>,
	requests: Mutex<Vec<PreparedRequest>>,
}
impl FakeHttpClient {
	fn replying(bodies: &[(u16, &str)]) -> Self {
		let responses = bodies
			.iter()
			.map(|(status, body)| {
				http::Response::builder()
					.status(*status)
					.header("content-type", "application/x-www-form-urlencoded")
					.body(body.as_bytes().to_vec())
					.expect("Canned response should build.")
			})
			.collect();

		Self { responses: Mutex::new(responses), requests: Mutex::default() }
	}

	fn recorded(&self) -> Vec<PreparedRequest> {
		self.requests.lock().clone()
	}
}
impl OAuthHttpClient for FakeHttpClient {
	type TransportError = FakeTransportError;

	fn execute(
		&self,
		request: PreparedRequest,
		slot: ResponseMetadataSlot,
	) -> TransportFuture<'_, Self::TransportError> {
		self.requests.lock().push(request);

		let next = self.responses.lock().pop_front();

		Box::pin(async move {
			assert!(
				slot.take().is_none(),
				"ResponseMetadataSlot must be clear before dispatching a request."
			);

			match next {
				Some(response) => {
					slot.store(ResponseMetadata::from_parts(
						response.status().as_u16(),
						response.headers(),
					));

					Ok(response)
				},
				None => {
					slot.store(ResponseMetadata {
						status: Some(429),
						retry_after: Some(Duration::seconds(5)),
						rate_limit: None,
					});

					Err(FakeTransportError::Throttled)
				},
			}
		})
	}
}

#[derive(Clone, Default)]
struct RecordingTransportErrorMapper {
	metadata: Arc<Mutex<Vec<(OAuthFlow, Option<ResponseMetadata>)>>>,
}
impl TransportErrorMapper<FakeTransportError> for RecordingTransportErrorMapper {
	fn map_transport_error(
		&self,
		strategy: &dyn ProviderStrategy,
		flow: OAuthFlow,
		meta: Option<&ResponseMetadata>,
		err: FakeTransportError,
	) -> Error {
		let _ = strategy;

		self.metadata.lock().push((flow, meta.cloned()));

		TransientError::Endpoint {
			message: format!("Fake transport error: {err}"),
			status: meta.and_then(|value| value.status),
			retry_after: meta.and_then(|value| value.retry_after),
		}
		.into()
	}
}

/// Store whose writes and removals always fail.
struct UnavailableStore;
impl CredentialStore for UnavailableStore {
	fn save(&self, _: StoreKey, _: AccessGrant) -> StoreFuture<'_, ()> {
		Box::pin(async { Err(StoreError::Backend { message: "disk full".into() }) })
	}

	fn fetch<'a>(&'a self, _: &'a StoreKey) -> StoreFuture<'a, Option<AccessGrant>> {
		Box::pin(async { Ok(None) })
	}

	fn remove<'a>(&'a self, _: &'a StoreKey) -> StoreFuture<'a, Option<AccessGrant>> {
		Box::pin(async { Err(StoreError::Backend { message: "disk gone".into() }) })
	}
}

type FakeClient = OAuthClient<FakeHttpClient, RecordingTransportErrorMapper>;

fn description() -> ServiceProviderDescription {
	let url = |path: &str| {
		url::Url::parse(&format!("https://fake.example.com{path}"))
			.expect("Fake endpoint should parse.")
	};

	ServiceProviderDescription::builder(
		ProviderId::new("fake-provider").expect("Provider identifier should be valid."),
	)
	.request_token_endpoint(OAuthEndPoint::post(url("/oauth/request_token")))
	.authorize_endpoint(url("/oauth/authorize"))
	.access_token_endpoint(OAuthEndPoint::post(url("/oauth/access_token")))
	.build()
	.expect("Fake provider description should build.")
}

fn consumer() -> ConsumerCredential {
	ConsumerCredential::new(CONSUMER_KEY, CONSUMER_SECRET).expect("Consumer fixture should be valid.")
}

fn build_client(
	http_client: Arc<FakeHttpClient>,
	mapper: Arc<RecordingTransportErrorMapper>,
	strategy: Arc<dyn ProviderStrategy>,
) -> FakeClient {
	OAuthClient::with_http_client(
		description(),
		strategy,
		TokenCredential::new(consumer()),
		http_client,
		mapper,
	)
}

fn header_of(request: &PreparedRequest) -> AuthorizationHeader {
	AuthorizationHeader::parse(request.authorization().expect("Request should be signed."))
		.expect("Authorization header should parse.")
}

#[tokio::test]
async fn token_exchanges_are_signed_with_the_right_secrets() {
	let http_client = Arc::new(FakeHttpClient::replying(&[
		(200, "oauth_token=temp&oauth_token_secret=temp-secret&oauth_callback_confirmed=true"),
		(200, "oauth_token=final&oauth_token_secret=final-secret&screen_name=fake"),
	]));
	let client = build_client(
		http_client.clone(),
		Arc::new(RecordingTransportErrorMapper::default()),
		Arc::new(TwitterStrategy::with_access_type(AccessType::Read)),
	);
	let request_pair = client
		.request_token(Some("https://client.example.com/cb"))
		.await
		.expect("Request-token call should succeed.");
	let grant = client.access_token("verifier-1").await.expect("Exchange should succeed.");

	assert_eq!(grant.screen_name.as_deref(), Some("fake"));
	assert_eq!(client.token_kind(), TokenKind::Access);

	let recorded = http_client.recorded();

	assert_eq!(recorded.len(), 2);

	let first = header_of(&recorded[0]);

	assert_eq!(first.get("oauth_callback"), Some("https://client.example.com/cb"));
	assert_eq!(first.get("x_auth_access_type"), Some("read"));
	assert_eq!(first.get("oauth_token"), None);
	assert!(
		Signer::default()
			.verify(
				&consumer(),
				None,
				&ResourceRequest::post(recorded[0].url.clone()),
				&first
			)
			.expect("Verification should run.")
	);

	let second = header_of(&recorded[1]);

	assert_eq!(second.get("oauth_verifier"), Some("verifier-1"));
	assert_eq!(second.get("oauth_token"), Some("temp"));
	assert_eq!(second.get("x_auth_access_type"), None);
	assert!(
		Signer::default()
			.verify(
				&consumer(),
				Some(&request_pair),
				&ResourceRequest::post(recorded[1].url.clone()),
				&second
			)
			.expect("Verification should run.")
	);
}

#[tokio::test]
async fn transport_failures_flow_through_the_mapper() {
	let http_client = Arc::new(FakeHttpClient::default());
	let mapper = Arc::new(RecordingTransportErrorMapper::default());
	let client = build_client(http_client, mapper.clone(), Arc::new(DefaultProviderStrategy));
	let err = client.request_token(None).await.expect_err("Throttled transport should fail.");

	match &err {
		Error::Transient(TransientError::Endpoint { status, retry_after, .. }) => {
			assert_eq!(*status, Some(429));
			assert_eq!(*retry_after, Some(Duration::seconds(5)));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert!(err.is_retryable());

	let recorded = mapper.metadata.lock().clone();

	assert_eq!(recorded.len(), 1);
	assert_eq!(recorded[0].0, OAuthFlow::RequestToken);
	assert_eq!(recorded[0].1.as_ref().and_then(|meta| meta.status), Some(429));
	assert_eq!(client.token_kind(), TokenKind::Invalid);
}

#[tokio::test]
async fn malformed_token_response_is_transient() {
	let http_client = Arc::new(FakeHttpClient::replying(&[(200, "oauth_token=only-half")]));
	let client = build_client(
		http_client,
		Arc::new(RecordingTransportErrorMapper::default()),
		Arc::new(DefaultProviderStrategy),
	);
	let err = client.request_token(None).await.expect_err("Half a token should be rejected.");

	assert!(matches!(err, Error::Transient(TransientError::MalformedResponse { .. })));
}

#[tokio::test]
async fn restore_requires_an_attached_store() {
	let client = build_client(
		Arc::new(FakeHttpClient::default()),
		Arc::new(RecordingTransportErrorMapper::default()),
		Arc::new(DefaultProviderStrategy),
	);
	let err = client.restore().await.expect_err("Restore without a store should fail.");

	assert!(matches!(err, Error::Config(ConfigError::StoreNotAttached)));
}

#[tokio::test]
async fn failed_grant_save_keeps_the_request_token() {
	let http_client = Arc::new(FakeHttpClient::replying(&[
		(200, "oauth_token=temp&oauth_token_secret=temp-secret&oauth_callback_confirmed=true"),
		(200, "oauth_token=final&oauth_token_secret=final-secret&screen_name=fake"),
	]));
	let client = build_client(
		http_client,
		Arc::new(RecordingTransportErrorMapper::default()),
		Arc::new(DefaultProviderStrategy),
	)
	.with_store(
		Arc::new(UnavailableStore),
		AccountId::new("bot").expect("Account fixture should be valid."),
	);

	client.request_token(None).await.expect("Request-token call should succeed.");

	let err = client.access_token("verifier-1").await.expect_err("Failed save should surface.");

	assert!(matches!(err, Error::Storage(StoreError::Backend { .. })));
	assert_eq!(client.token_kind(), TokenKind::Request);
}

#[tokio::test]
async fn rejection_survives_a_failing_store_removal() {
	let http_client = Arc::new(FakeHttpClient::replying(&[(
		401,
		r#"{"errors":[{"code":89,"message":"Invalid or expired token."}]}"#,
	)]));
	let credential = TokenCredential::with_access_token(consumer(), "access", "access-secret")
		.expect("Access credential should be valid.");
	let client = build_client(
		http_client,
		Arc::new(RecordingTransportErrorMapper::default()),
		Arc::new(DefaultProviderStrategy),
	)
	.with_store(
		Arc::new(UnavailableStore),
		AccountId::new("bot").expect("Account fixture should be valid."),
	);

	client.set_credential(credential);

	let url = url::Url::parse("https://fake.example.com/1.1/account/verify_credentials.json")
		.expect("Resource URL should parse.");
	let err = client.send(ResourceRequest::get(url)).await.expect_err("Expired token should fail.");

	assert!(matches!(err, Error::TokenRejected { .. }), "Unexpected error: {err:?}.");
	assert_eq!(client.token_kind(), TokenKind::Invalid);
}

#[tokio::test]
async fn authenticate_url_falls_back_to_authorize_endpoint() {
	let http_client = Arc::new(FakeHttpClient::replying(&[(
		200,
		"oauth_token=temp&oauth_token_secret=temp-secret&oauth_callback_confirmed=true",
	)]));
	let client = build_client(
		http_client,
		Arc::new(RecordingTransportErrorMapper::default()),
		Arc::new(DefaultProviderStrategy),
	);

	client.request_token(None).await.expect("Request-token call should succeed.");

	let url = client.authenticate_url().expect("Authenticate URL should build.");

	assert_eq!(url.path(), "/oauth/authorize");
	assert_eq!(url.query(), Some("oauth_token=temp"));
	assert_eq!(url, client.authorize_url().expect("Authorize URL should build."));
}
