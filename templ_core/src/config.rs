use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

use crate::Context;
use crate::TemplError;
use crate::TemplResult;
use crate::context::value_kind;
use crate::report::ReportRequest;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["templ.toml", ".templ.toml", ".config/templ.toml"];

/// Data source entry for a `[data]` namespace.
///
/// A plain string is a path whose extension picks the format:
///
/// ```toml
/// [data]
/// build = "build.json"
/// ```
///
/// Typed entries name the format explicitly:
///
/// ```toml
/// [data]
/// release = { path = "release-info", format = "yaml" }
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum DataSource {
	Path(PathBuf),
	Typed(TypedDataSource),
}

impl DataSource {
	pub fn path(&self) -> &Path {
		match self {
			Self::Path(path) => path.as_path(),
			Self::Typed(typed) => typed.path.as_path(),
		}
	}

	/// The explicit format, or the one implied by the file extension.
	pub fn format(&self) -> String {
		match self {
			Self::Path(path) => {
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("")
					.to_ascii_lowercase()
			}
			Self::Typed(typed) => typed.format.trim().to_ascii_lowercase(),
		}
	}
}

/// Typed data source configuration for `[data]` entries.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct TypedDataSource {
	pub path: PathBuf,
	pub format: String,
}

/// Configuration loaded from a `templ.toml` file.
///
/// ```toml
/// template = "templates/report.md"
///
/// [data]
/// build = "build.json"
///
/// [report]
/// application = "fenix"
/// channel = "release"
/// error = "invalid_value"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct TemplConfig {
	/// Custom report template, relative to the project root. The built-in
	/// report is used when absent.
	#[serde(default)]
	pub template: Option<PathBuf>,
	/// Map of namespace name to data file. Each file is available to
	/// templates under its namespace, e.g. `{{=build.version}}`.
	#[serde(default)]
	pub data: BTreeMap<String, DataSource>,
	/// Defaults for report fields not given on the command line.
	#[serde(default)]
	pub report: ReportRequest,
}

impl TemplConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	#[tracing::instrument(level = "debug")]
	pub fn load(root: &Path) -> TemplResult<Option<TemplConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	pub fn parse(content: &str) -> TemplResult<TemplConfig> {
		toml::from_str(content).map_err(|e| TemplError::ConfigParse(e.to_string()))
	}

	/// Read the custom report template, if one is configured.
	pub fn load_template(&self, root: &Path) -> TemplResult<Option<String>> {
		let Some(path) = &self.template else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(root.join(path)).map_err(|e| {
			TemplError::DataFile {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})?;

		Ok(Some(content))
	}

	/// Read each data file into a context keyed by namespace.
	pub fn load_data(&self, root: &Path) -> TemplResult<Context> {
		let mut context = Context::new();

		for (namespace, source) in &self.data {
			let rel_path = source.path();
			let value = load_data_file(&root.join(rel_path), &source.format(), rel_path)?;
			context.insert(namespace.clone(), value);
		}

		Ok(context)
	}
}

/// Read a data file whose top level is an object, for merging into the root
/// of a render context. The format comes from the file extension.
pub fn load_context_file(path: &Path) -> TemplResult<Context> {
	let format = path
		.extension()
		.and_then(|e| e.to_str())
		.unwrap_or("")
		.to_ascii_lowercase();
	let value = load_data_file(path, &format, path)?;

	match value {
		Value::Object(map) => Ok(Context::from(map)),
		other => {
			Err(TemplError::DataFile {
				path: path.display().to_string(),
				reason: format!("expected an object at the top level, found {}", value_kind(&other)),
			})
		}
	}
}

fn load_data_file(path: &Path, format: &str, display_path: &Path) -> TemplResult<Value> {
	let path_display = display_path.display().to_string();
	let content = std::fs::read_to_string(path).map_err(|e| {
		TemplError::DataFile {
			path: path_display.clone(),
			reason: e.to_string(),
		}
	})?;

	parse_data_file(&content, format, &path_display)
}

/// Parse a data file's content into a `serde_json::Value` based on its
/// format.
pub fn parse_data_file(content: &str, format: &str, path_display: &str) -> TemplResult<Value> {
	let data_error = |reason: String| {
		TemplError::DataFile {
			path: path_display.to_string(),
			reason,
		}
	};

	match format {
		"text" | "string" | "raw" | "txt" => Ok(Value::String(content.to_string())),
		"json" => serde_json::from_str(content).map_err(|e| data_error(e.to_string())),
		"toml" => {
			let table: toml::Table =
				toml::from_str(content).map_err(|e| data_error(e.to_string()))?;
			Ok(toml_to_json(toml::Value::Table(table)))
		}
		"yaml" | "yml" => serde_yaml_ng::from_str(content).map_err(|e| data_error(e.to_string())),
		other => Err(TemplError::UnsupportedDataFormat(other.to_string())),
	}
}

/// Convert a `toml::Value` to a `serde_json::Value`, keeping table order.
fn toml_to_json(value: toml::Value) -> Value {
	match value {
		toml::Value::String(s) => Value::String(s),
		toml::Value::Integer(i) => Value::from(i),
		// TOML floats may be NaN or infinite, which JSON cannot hold.
		toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
		toml::Value::Boolean(b) => Value::Bool(b),
		toml::Value::Datetime(dt) => Value::String(dt.to_string()),
		toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
		toml::Value::Table(table) => {
			let map = table
				.into_iter()
				.map(|(key, value)| (key, toml_to_json(value)))
				.collect();
			Value::Object(map)
		}
	}
}
