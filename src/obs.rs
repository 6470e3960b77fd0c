//! Optional observability helpers for OAuth flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `twitter_oauth1.flow` with `flow`, `stage`,
//!   `token_kind` (the token a request is signed with) and `endpoint` (host and path) fields.
//! - Enable `metrics` to increment the `twitter_oauth1_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and the
//!   `twitter_oauth1_flow_errors_total` counter labeled by `flow` + `error`.
//!
//! Flows wrap their bodies in [`observe`], which opens the span, records the attempt, and
//! records the outcome once the future resolves.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// OAuth flow kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Temporary credential request.
	RequestToken,
	/// Verifier exchange for token credentials.
	AccessToken,
	/// Signed API call.
	Resource,
	/// Credential reload from a store.
	Restore,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::RequestToken => "request_token",
			FlowKind::AccessToken => "access_token",
			FlowKind::Resource => "resource",
			FlowKind::Restore => "restore",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a [`FlowSpan`] and records attempt, outcome, and error kind.
pub async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(kind, stage);

	record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_flow_outcome(kind, FlowOutcome::Success),
		Err(e) => {
			#[cfg(feature = "tracing")]
			::tracing::warn!(flow = kind.as_str(), stage, error = %e, "OAuth flow failed");

			record_flow_outcome(kind, FlowOutcome::Failure);
			record_flow_error(kind, e);
		},
	}

	result
}

/// Stable label describing which error family a failure belongs to.
pub fn error_label(error: &Error) -> &'static str {
	match error {
		Error::Storage(_) => "storage",
		Error::Config(_) => "config",
		Error::Credential(_) => "credential",
		Error::Transient(_) => "transient",
		Error::Transport(_) => "transport",
		Error::InvalidConsumer { .. } => "invalid_consumer",
		Error::TokenRejected { .. } => "token_rejected",
		Error::Rejected { .. } => "rejected",
		Error::Callback(_) => "callback",
		Error::CallbackNotConfirmed => "callback_not_confirmed",
	}
}
