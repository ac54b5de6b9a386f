use derive_more::Deref;
use derive_more::DerefMut;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::TemplError;
use crate::TemplResult;

/// The variables a template is rendered against.
///
/// Keys keep their insertion order, which is also the order `{{@key}}`
/// iterates a mapping in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Deref, DerefMut)]
#[serde(transparent)]
pub struct Context(
	#[deref]
	#[deref_mut]
	Map<String, Value>,
);

impl Context {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a context from anything that serializes to a JSON object.
	pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> TemplResult<Self> {
		let value =
			serde_json::to_value(value).map_err(|e| TemplError::Serialize(e.to_string()))?;
		Self::try_from(value)
	}

	/// Set `key` to `value`, returning `self` for chaining.
	#[must_use]
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.0.insert(key.into(), value.into());
		self
	}

	/// Copy every entry of `other` into this context, replacing existing keys.
	pub fn merge(&mut self, other: Context) {
		for (key, value) in other.0 {
			self.0.insert(key, value);
		}
	}

	pub fn into_inner(self) -> Map<String, Value> {
		self.0
	}
}

impl From<Map<String, Value>> for Context {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

impl TryFrom<Value> for Context {
	type Error = TemplError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Object(map) => Ok(Self(map)),
			other => Err(TemplError::ContextNotObject(value_kind(&other).to_string())),
		}
	}
}

/// A short human name for the JSON type of `value`.
pub(crate) fn value_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
