use std::borrow::Cow;

use serde_json::Value;

use crate::Context;

/// Name bound to the current key while iterating.
pub const LOOP_KEY: &str = "_key";
/// Name bound to the current value while iterating.
pub const LOOP_VALUE: &str = "_val";

/// The loop variables of one `{{@key}}` iteration step.
#[derive(Debug)]
struct Frame<'a> {
	key: Value,
	value: &'a Value,
}

/// Names visible while rendering: the caller's context overlaid by the loop
/// variables of every enclosing iteration block.
///
/// Binding loop variables creates a child scope instead of writing into the
/// context, so the caller's context is never modified and sibling or outer
/// blocks never observe an inner loop's variables.
#[derive(Debug)]
pub struct Scope<'a> {
	context: &'a Context,
	frame: Option<Frame<'a>>,
	parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
	pub fn new(context: &'a Context) -> Self {
		Self {
			context,
			frame: None,
			parent: None,
		}
	}

	/// A child scope where `_key` is `key` and `_val` is `value`.
	pub fn bind<'s>(&'s self, key: impl Into<String>, value: &'s Value) -> Scope<'s> {
		Scope {
			context: self.context,
			frame: Some(Frame {
				key: Value::String(key.into()),
				value,
			}),
			parent: Some(self),
		}
	}

	/// Look up a top-level name. Loop variables of the innermost iteration
	/// shadow context entries of the same name.
	pub fn lookup(&self, name: &str) -> Option<&Value> {
		let mut scope = Some(self);

		while let Some(current) = scope {
			if let Some(frame) = &current.frame {
				match name {
					LOOP_KEY => return Some(&frame.key),
					LOOP_VALUE => return Some(frame.value),
					_ => {}
				}
			}

			scope = current.parent;
		}

		self.context.get(name)
	}
}

/// Resolve a dotted path such as `user.name.first`.
///
/// Every segment must name an own key of an object, or the index of an array
/// element written in canonical decimal form. Resolution stops with `None` as
/// soon as a segment is missing or the current value cannot be descended into.
pub fn resolve<'s>(scope: &'s Scope<'_>, path: &str) -> Option<&'s Value> {
	let mut segments = path.split('.');
	let first = segments.next()?;
	let mut current = scope.lookup(first)?;

	for segment in segments {
		current = child(current, segment)?;
	}

	Some(current)
}

fn child<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
	match value {
		Value::Object(map) => map.get(segment),
		Value::Array(items) => {
			let index: usize = segment.parse().ok()?;
			// `01` and `+1` are not array keys.
			if index.to_string() != segment {
				return None;
			}
			items.get(index)
		}
		_ => None,
	}
}

/// Whether a value counts as present for block directives: `null`, `false`,
/// `0` and `""` do not; every array and object does, even when empty.
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Whether a value is the number zero. Value directives render zero even
/// though block directives treat it as absent.
pub fn is_zero(value: &Value) -> bool {
	match value {
		Value::Number(number) => number.as_f64().is_some_and(|n| n == 0.0),
		_ => false,
	}
}

/// The text a value directive emits for `value`.
///
/// Strings are emitted verbatim. Integral numbers print without a fraction
/// (`1.0` prints as `1`, `-0.0` as `0`). Arrays and objects print as compact
/// JSON.
pub fn to_display_string(value: &Value) -> Cow<'_, str> {
	match value {
		Value::Null => Cow::Borrowed(""),
		Value::Bool(flag) => Cow::Borrowed(if *flag { "true" } else { "false" }),
		Value::String(text) => Cow::Borrowed(text),
		Value::Number(number) => {
			if number.is_i64() || number.is_u64() {
				return Cow::Owned(number.to_string());
			}

			match number.as_f64() {
				Some(n) if n == 0.0 => Cow::Borrowed("0"),
				Some(n) => Cow::Owned(n.to_string()),
				None => Cow::Owned(number.to_string()),
			}
		}
		Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
	}
}
