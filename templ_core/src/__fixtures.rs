use serde_json::Value;

use crate::Context;
use crate::report::MetricEntry;
use crate::report::MetricsIndex;
use crate::report::ReportRequest;

/// Build a context from a `json!` object literal.
pub(crate) fn ctx(value: Value) -> Context {
	match Context::try_from(value) {
		Ok(context) => context,
		Err(error) => panic!("fixture context must be an object: {error}"),
	}
}

pub(crate) fn report_request() -> ReportRequest {
	ReportRequest {
		application: "fenix".into(),
		channel: "release".into(),
		metric: "browser.search.in_content".into(),
		error: "invalid_label".into(),
		date_from: "2024-01-01".into(),
		date_to: "2024-01-07".into(),
		looker_url: None,
	}
}

pub(crate) fn metrics_index() -> MetricsIndex {
	MetricsIndex {
		metrics: vec![
			MetricEntry {
				name: "browser.search.in_content".into(),
			},
			MetricEntry {
				name: "metrics.search_count".into(),
			},
		],
	}
}
