//! The metric error report: the fixed report template, the values that fill
//! it, and the Glean dictionary lookups used to build them.

use serde::Deserialize;
use serde::Serialize;

use crate::Context;
use crate::TemplError;
use crate::TemplResult;
use crate::Template;

/// Base URL of the Glean dictionary.
pub const DICTIONARY_BASE_URL: &str = "https://dictionary.telemetry.mozilla.org";

/// The report text. `looker_url` is optional and renders empty when unset.
pub const REPORT_TEMPLATE: &str = "We're seeing an increase in {{=error}} metric errors for the \
                                   [{{=metric}}]({{=metric_dictionary_url}}) metric.

Error: {{=error}}
Channel: {{=channel}}
Date range: {{=date_from}} to {{=date_to}}
Looker graph: {{=looker_url}}

* TODO

See also [the docs](https://mozilla.github.io/glean/book/reference/metrics/labeled_counters.html#recorded-errors).
";

/// Known application ids and their display names.
pub const APPLICATIONS: [(&str, &str); 3] = [
	("firefox_desktop", "Firefox Desktop"),
	("firefox_ios", "Firefox for iOS"),
	("fenix", "Firefox for Android"),
];

/// Example metric names offered before an application's index is loaded.
pub const SAMPLE_METRICS: [&str; 2] = [
	"browser.search.in_content",
	"localstorage.database.request_allow_to_close_response_time",
];

/// The display name of a known application id.
pub fn application_name(id: &str) -> Option<&'static str> {
	APPLICATIONS
		.iter()
		.find(|(known, _)| *known == id)
		.map(|(_, name)| *name)
}

/// The dictionary page of `metric` in `app`.
///
/// Only the first `.` of the metric name becomes `_`, matching the links the
/// report has always produced.
pub fn dictionary_url(app: &str, metric: &str) -> String {
	let metric = metric.replacen('.', "_", 1);
	format!("{DICTIONARY_BASE_URL}/apps/{app}/metrics/{metric}")
}

/// The dictionary's metric index for `app`.
pub fn metrics_index_url(app: &str) -> String {
	format!("{DICTIONARY_BASE_URL}/data/{app}/index.json")
}

/// The values a report is rendered from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportRequest {
	/// Application id, e.g. `fenix`.
	pub application: String,
	/// Release channel, e.g. `release` or `nightly`.
	pub channel: String,
	/// Full metric name, e.g. `browser.search.in_content`.
	pub metric: String,
	/// Glean error type, e.g. `invalid_value`.
	pub error: String,
	/// First day of the affected range.
	pub date_from: String,
	/// Last day of the affected range.
	pub date_to: String,
	/// Link to a Looker graph showing the errors.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub looker_url: Option<String>,
}

impl ReportRequest {
	/// Fill every empty field of `self` from `defaults`.
	pub fn fill_from(&mut self, defaults: &ReportRequest) {
		let pairs = [
			(&mut self.application, &defaults.application),
			(&mut self.channel, &defaults.channel),
			(&mut self.metric, &defaults.metric),
			(&mut self.error, &defaults.error),
			(&mut self.date_from, &defaults.date_from),
			(&mut self.date_to, &defaults.date_to),
		];

		for (field, default) in pairs {
			if field.is_empty() {
				field.clone_from(default);
			}
		}

		if self.looker_url.is_none() {
			self.looker_url.clone_from(&defaults.looker_url);
		}
	}

	/// The render context for this request.
	pub fn context(&self) -> Context {
		let mut context = Context::new()
			.with("application", self.application.as_str())
			.with("channel", self.channel.as_str())
			.with("metric", self.metric.as_str())
			.with("error", self.error.as_str())
			.with("date_from", self.date_from.as_str())
			.with("date_to", self.date_to.as_str())
			.with(
				"metric_dictionary_url",
				dictionary_url(&self.application, &self.metric),
			);

		if let Some(name) = application_name(&self.application) {
			context.insert("application_name".to_string(), name.into());
		}

		if let Some(looker_url) = &self.looker_url {
			context.insert("looker_url".to_string(), looker_url.as_str().into());
		}

		context
	}

	/// Render the standard report.
	pub fn render(&self) -> String {
		self.render_with(&Template::new(REPORT_TEMPLATE))
	}

	/// Render a custom report template against this request.
	pub fn render_with(&self, template: &Template) -> String {
		template.render(&self.context())
	}
}

/// The metric index the dictionary publishes for each application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MetricsIndex {
	#[serde(default)]
	pub metrics: Vec<MetricEntry>,
}

/// One metric listed in a [`MetricsIndex`]. Fields other than the name are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetricEntry {
	pub name: String,
}

impl MetricsIndex {
	/// Parse an `index.json` document. `source_name` is used in errors.
	pub fn from_json(content: &str, source_name: &str) -> TemplResult<Self> {
		serde_json::from_str(content).map_err(|e| {
			TemplError::MetricsIndex {
				source_name: source_name.to_string(),
				reason: e.to_string(),
			}
		})
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.metrics.iter().map(|metric| metric.name.as_str())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.names().any(|known| known == name)
	}
}

/// Clear the requested metric when the application's index does not list
/// it. Returns whether the metric was cleared.
pub fn reconcile_metric(request: &mut ReportRequest, index: &MetricsIndex) -> bool {
	if request.metric.is_empty() || index.contains(&request.metric) {
		return false;
	}

	tracing::warn!(
		metric = %request.metric,
		application = %request.application,
		"metric is not listed for this application; clearing it"
	);
	request.metric.clear();
	true
}
