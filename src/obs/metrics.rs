// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowOutcome},
};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"twitter_oauth1_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records which error family ended a flow (when enabled).
pub fn record_flow_error(kind: FlowKind, error: &Error) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"twitter_oauth1_flow_errors_total",
			"flow" => kind.as_str(),
			"error" => super::error_label(error)
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, error);
	}
}
