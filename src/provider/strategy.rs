//! Provider strategy hooks that customize OAuth requests.
//!
//! Implementations decorate outgoing protocol parameters and normalize error mapping
//! without tying flows to any particular HTTP client.

// self
use crate::{_prelude::*, provider::descriptor::OAuthFlow};

/// Strategy hook that allows providers to decorate requests and classify errors.
///
/// Implementors are required to be `Send + Sync`, and the hooks use crate-owned data types
/// so downstream crates never depend on reqwest-specific structures. Only
/// [`classify_error`](ProviderStrategy::classify_error) is mandatory.
pub trait ProviderStrategy: Send + Sync {
	/// Maps a failed response into the crate's error taxonomy.
	fn classify_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind;

	/// Gives providers a chance to add protocol parameters before signing.
	///
	/// Parameters added here are signed and placed in the `Authorization` header. Twitter's
	/// `x_auth_access_type` on the request-token call is the typical use.
	fn augment_protocol_params(&self, _flow: OAuthFlow, _params: &mut BTreeMap<String, String>) {}
}

/// Canonical provider error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// Consumer key unknown, rejected, or signed incorrectly.
	InvalidConsumer,
	/// Token unknown, expired, used, or revoked.
	TokenRejected,
	/// Failure is temporary and should be retried.
	Transient,
	/// Any other failure; the request should not be retried unchanged.
	Rejected,
}

/// Context passed to provider strategies when classifying errors.
///
/// The struct keeps only primitive data (status code, problem-reporting fields, Twitter
/// error code, body preview) so strategies stay decoupled from any HTTP client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// Flow associated with the failing request.
	pub flow: OAuthFlow,
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// `oauth_problem` from the OAuth problem-reporting extension.
	pub oauth_problem: Option<String>,
	/// `oauth_problem_advice` from the OAuth problem-reporting extension.
	pub problem_advice: Option<String>,
	/// Twitter API error code (`errors[0].code`).
	pub api_error_code: Option<u32>,
	/// Twitter API error message (`errors[0].message`).
	pub api_error_message: Option<String>,
	/// Preview of the response body.
	pub body_preview: Option<String>,
	/// Indicates whether the failure originated from the network/transport layer.
	pub network_error: bool,
}
impl ProviderErrorContext {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates a new context scoped to the provided flow.
	pub fn new(flow: OAuthFlow) -> Self {
		Self {
			flow,
			http_status: None,
			oauth_problem: None,
			problem_advice: None,
			api_error_code: None,
			api_error_message: None,
			body_preview: None,
			network_error: false,
		}
	}

	/// Convenience constructor for transport-level/network failures.
	pub fn network_failure(flow: OAuthFlow) -> Self {
		let mut ctx = Self::new(flow);

		ctx.network_error = true;

		ctx
	}

	/// Adds an HTTP status code (e.g., 400, 401, 500).
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the `oauth_problem` value.
	pub fn with_oauth_problem(mut self, problem: impl Into<String>) -> Self {
		self.oauth_problem = Some(problem.into());

		self
	}

	/// Adds the `oauth_problem_advice` value.
	pub fn with_problem_advice(mut self, advice: impl Into<String>) -> Self {
		self.problem_advice = Some(advice.into());

		self
	}

	/// Adds a Twitter API error code and message.
	pub fn with_api_error(mut self, code: u32, message: impl Into<String>) -> Self {
		self.api_error_code = Some(code);
		self.api_error_message = Some(message.into());

		self
	}

	/// Adds a body preview, truncated to 256 characters.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(body.into()));

		self
	}

	/// Fills the problem-reporting fields and the Twitter error from a response body.
	///
	/// Form-encoded bodies are scanned for `oauth_problem`; JSON bodies for
	/// `{"errors":[{"code":..,"message":..}]}`. The preview is always recorded.
	pub fn with_response_body(mut self, body: &str) -> Self {
		let trimmed = body.trim_start();

		if trimmed.starts_with('{') {
			if let Some((code, message)) = parse_api_error(trimmed) {
				self = self.with_api_error(code, message);
			}
		} else {
			for (name, value) in crate::signer::encode::parse_form(trimmed) {
				match name.as_str() {
					"oauth_problem" => self.oauth_problem = Some(value),
					"oauth_problem_advice" => self.problem_advice = Some(value),
					_ => {},
				}
			}
		}

		if body.is_empty() { self } else { self.with_body_preview(body) }
	}

	/// Best human-readable reason for the failure.
	pub fn reason(&self) -> String {
		if let Some(message) = &self.api_error_message {
			return match self.api_error_code {
				Some(code) => format!("{message} (code {code})"),
				None => message.clone(),
			};
		}
		if let Some(problem) = &self.oauth_problem {
			return match &self.problem_advice {
				Some(advice) => format!("{problem}: {advice}"),
				None => problem.clone(),
			};
		}
		if let Some(preview) = self.body_preview.as_deref().filter(|p| !p.trim().is_empty()) {
			return preview.trim().to_owned();
		}

		match self.http_status {
			Some(status) => format!("HTTP {status}"),
			None => "no response".into(),
		}
	}
}

/// Default strategy tuned for Twitter and RFC 5849 providers.
///
/// It prioritizes the problem-reporting `oauth_problem` field, then the Twitter error code,
/// then body text hints, and finally the HTTP status code. Network failures are always
/// treated as transient.
#[derive(Debug, Default)]
pub struct DefaultProviderStrategy;
impl Display for DefaultProviderStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-provider-strategy")
	}
}
impl ProviderStrategy for DefaultProviderStrategy {
	fn classify_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		if ctx.network_error {
			return ProviderErrorKind::Transient;
		}

		if let Some(kind) = ctx.oauth_problem.as_deref().and_then(classify_problem) {
			return kind;
		}
		if let Some(kind) = ctx.api_error_code.and_then(classify_api_code) {
			return kind;
		}
		if let Some(kind) = classify_body(ctx.body_preview.as_deref()) {
			return kind;
		}

		classify_status(ctx.flow, ctx.http_status)
	}
}

#[derive(Deserialize)]
struct ApiErrors {
	errors: Vec<ApiError>,
}

#[derive(Deserialize)]
struct ApiError {
	code: u32,
	#[serde(default)]
	message: String,
}

fn parse_api_error(body: &str) -> Option<(u32, String)> {
	let parsed = serde_json::from_str::<ApiErrors>(body).ok()?;
	let first = parsed.errors.into_iter().next()?;

	Some((first.code, first.message))
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= ProviderErrorContext::BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= ProviderErrorContext::BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}

fn classify_problem(problem: &str) -> Option<ProviderErrorKind> {
	match problem {
		"consumer_key_unknown" | "consumer_key_rejected" | "consumer_key_refused" =>
			Some(ProviderErrorKind::InvalidConsumer),
		"token_used" | "token_expired" | "token_revoked" | "token_rejected" | "permission_denied" =>
			Some(ProviderErrorKind::TokenRejected),
		"timestamp_refused" | "nonce_used" => Some(ProviderErrorKind::Transient),
		"version_rejected"
		| "parameter_absent"
		| "parameter_rejected"
		| "signature_method_rejected"
		| "signature_invalid"
		| "additional_authorization_required"
		| "permission_unknown"
		| "user_refused" => Some(ProviderErrorKind::Rejected),
		_ => None,
	}
}

fn classify_api_code(code: u32) -> Option<ProviderErrorKind> {
	match code {
		// Invalid or expired token.
		89 => Some(ProviderErrorKind::TokenRejected),
		// Could not authenticate you / Bad authentication data.
		32 | 215 => Some(ProviderErrorKind::InvalidConsumer),
		// Rate limit exceeded, over capacity, internal error, timestamp out of bounds.
		88 | 130 | 131 | 135 => Some(ProviderErrorKind::Transient),
		_ => None,
	}
}

fn classify_body(body: Option<&str>) -> Option<ProviderErrorKind> {
	let body = body?;
	let lowered = body.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid or expired token") || text.contains("token_rejected") =>
			Some(ProviderErrorKind::TokenRejected),
		text if text.contains("consumer key") || text.contains("could not authenticate") =>
			Some(ProviderErrorKind::InvalidConsumer),
		text if text.contains("over capacity") || text.contains("try again") =>
			Some(ProviderErrorKind::Transient),
		_ => None,
	}
}

fn classify_status(flow: OAuthFlow, status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(401) if flow == OAuthFlow::RequestToken => ProviderErrorKind::InvalidConsumer,
		Some(401) => ProviderErrorKind::TokenRejected,
		Some(420 | 429) => ProviderErrorKind::Transient,
		Some(code) if code >= 500 => ProviderErrorKind::Transient,
		Some(_) => ProviderErrorKind::Rejected,
		None => ProviderErrorKind::Transient,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn classify(ctx: ProviderErrorContext) -> ProviderErrorKind {
		DefaultProviderStrategy.classify_error(&ctx)
	}

	#[test]
	fn problem_reporting_takes_precedence() {
		let ctx = ProviderErrorContext::new(OAuthFlow::AccessToken)
			.with_http_status(401)
			.with_response_body("oauth_problem=consumer_key_rejected&oauth_problem_advice=banned");

		assert_eq!(ctx.oauth_problem.as_deref(), Some("consumer_key_rejected"));
		assert_eq!(ctx.reason(), "consumer_key_rejected: banned");
		assert_eq!(classify(ctx), ProviderErrorKind::InvalidConsumer);
		assert_eq!(
			classify(ProviderErrorContext::new(OAuthFlow::Resource).with_oauth_problem("nonce_used")),
			ProviderErrorKind::Transient
		);
	}

	#[test]
	fn twitter_error_codes_are_recognized() {
		let ctx = ProviderErrorContext::new(OAuthFlow::Resource)
			.with_http_status(401)
			.with_response_body(r#"{"errors":[{"code":89,"message":"Invalid or expired token."}]}"#);

		assert_eq!(ctx.api_error_code, Some(89));
		assert_eq!(ctx.reason(), "Invalid or expired token. (code 89)");
		assert_eq!(classify(ctx), ProviderErrorKind::TokenRejected);

		let ctx = ProviderErrorContext::new(OAuthFlow::Resource)
			.with_http_status(429)
			.with_response_body(r#"{"errors":[{"code":88,"message":"Rate limit exceeded"}]}"#);

		assert_eq!(classify(ctx), ProviderErrorKind::Transient);
	}

	#[test]
	fn status_fallback_depends_on_flow() {
		let request_token = ProviderErrorContext::new(OAuthFlow::RequestToken).with_http_status(401);
		let resource = ProviderErrorContext::new(OAuthFlow::Resource).with_http_status(401);

		assert_eq!(classify(request_token), ProviderErrorKind::InvalidConsumer);
		assert_eq!(classify(resource), ProviderErrorKind::TokenRejected);
		assert_eq!(
			classify(ProviderErrorContext::new(OAuthFlow::Resource).with_http_status(404)),
			ProviderErrorKind::Rejected
		);
		assert_eq!(
			classify(ProviderErrorContext::new(OAuthFlow::Resource).with_http_status(503)),
			ProviderErrorKind::Transient
		);
		assert_eq!(
			classify(ProviderErrorContext::network_failure(OAuthFlow::AccessToken)),
			ProviderErrorKind::Transient
		);
	}

	#[test]
	fn body_preview_is_truncated() {
		let ctx = ProviderErrorContext::new(OAuthFlow::Resource).with_body_preview("x".repeat(300));
		let preview = ctx.body_preview.expect("Preview should be recorded.");

		assert_eq!(preview.chars().count(), ProviderErrorContext::BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}
}
