use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum TemplError {
	#[error(transparent)]
	#[diagnostic(code(templ::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(templ::config_parse),
		help("check that templ.toml is valid TOML with `template`, [data] and/or [report] entries")
	)]
	ConfigParse(String),

	#[error("failed to load data file `{path}`: {reason}")]
	#[diagnostic(code(templ::data_file))]
	DataFile { path: String, reason: String },

	#[error("unsupported data file format: `{0}`")]
	#[diagnostic(
		code(templ::unsupported_format),
		help("supported formats: text, json, toml, yaml, yml")
	)]
	UnsupportedDataFormat(String),

	#[error("render context must be an object, got {0}")]
	#[diagnostic(
		code(templ::context_not_object),
		help("templates resolve names against a mapping; wrap the value in an object")
	)]
	ContextNotObject(String),

	#[error("failed to serialize render context: {0}")]
	#[diagnostic(code(templ::serialize))]
	Serialize(String),

	#[error("invalid metrics index `{source_name}`: {reason}")]
	#[diagnostic(
		code(templ::metrics_index),
		help("the index must look like {{\"metrics\": [{{\"name\": \"...\"}}]}}")
	)]
	MetricsIndex { source_name: String, reason: String },

	#[error("invalid assignment `{0}`")]
	#[diagnostic(
		code(templ::invalid_assignment),
		help("assignments take the form `key=value`")
	)]
	InvalidAssignment(String),
}

pub type TemplResult<T> = Result<T, TemplError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
