//! `twitter_oauth1.flow` spans. Everything here is a no-op without the `tracing` feature.

// self
use crate::{_prelude::*, auth::TokenKind, obs::FlowKind};

/// Span around one flow stage.
///
/// Opened with `flow` and `stage`; `token_kind` and `endpoint` start empty and are filled in by
/// [`record_token_kind`] and [`record_endpoint`] once the flow knows them.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	inner: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `stage` of `kind`.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				inner: tracing::info_span!(
					"twitter_oauth1.flow",
					flow = kind.as_str(),
					stage,
					token_kind = tracing::field::Empty,
					endpoint = tracing::field::Empty,
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Runs a synchronous section inside the span.
	pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
		#[cfg(feature = "tracing")]
		{
			self.inner.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}

	/// Attaches the span to `fut` so it is entered on every poll.
	pub fn instrument<Fut>(&self, fut: Fut) -> impl Future<Output = Fut::Output>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.inner.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Records which token the current flow signs with.
pub fn record_token_kind(kind: TokenKind) {
	#[cfg(feature = "tracing")]
	tracing::Span::current().record("token_kind", kind.as_str());
	#[cfg(not(feature = "tracing"))]
	let _ = kind;
}

/// Records the endpoint the current flow calls, as host and path; the query is left out.
pub fn record_endpoint(url: &Url) {
	#[cfg(feature = "tracing")]
	{
		let endpoint = format!("{}{}", url.host_str().unwrap_or_default(), url.path());

		tracing::Span::current().record("endpoint", endpoint.as_str());
	}
	#[cfg(not(feature = "tracing"))]
	let _ = url;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn in_scope_returns_the_closure_value() {
		let span = FlowSpan::new(FlowKind::Resource, "sign");
		let url = Url::parse("https://api.twitter.com/1.1/statuses/update.json?status=hi")
			.expect("Fixture URL should parse.");
		let value = span.in_scope(|| {
			record_token_kind(TokenKind::Access);
			record_endpoint(&url);

			"signed"
		});

		assert_eq!(value, "signed");
	}

	#[tokio::test]
	async fn instrument_passes_output_through() {
		let span = FlowSpan::new(FlowKind::RequestToken, "request_token");
		let value = span
			.instrument(async {
				record_token_kind(TokenKind::Invalid);

				42
			})
			.await;

		assert_eq!(value, 42);
	}
}
