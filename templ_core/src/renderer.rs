use serde::Serialize;

use crate::Block;
use crate::Context;
use crate::Node;
use crate::ParseDiagnostic;
use crate::Sigil;
use crate::TemplResult;
use crate::ValueDirective;
use crate::escape::escape_html;
use crate::parse;
use crate::parse_with_diagnostics;
use crate::resolver::Scope;
use crate::resolver::is_truthy;
use crate::resolver::is_zero;
use crate::resolver::resolve;
use crate::resolver::to_display_string;

/// A template source string that can be rendered any number of times.
///
/// Rendering never fails: unknown names and falsy values render as nothing
/// and malformed tags are emitted as literal text. Use
/// [`Template::diagnostics`] to find malformed tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
	source: String,
}

impl Template {
	pub fn new(source: impl Into<String>) -> Self {
		Self {
			source: source.into(),
		}
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	/// Render against `context`. The context is only read.
	#[tracing::instrument(level = "debug", skip_all, fields(template_len = self.source.len()))]
	pub fn render(&self, context: &Context) -> String {
		render(&self.source, context)
	}

	/// Render against any value that serializes to a JSON object.
	pub fn render_serialize<T: Serialize + ?Sized>(&self, context: &T) -> TemplResult<String> {
		let context = Context::from_serialize(context)?;
		Ok(self.render(&context))
	}

	/// Tags in the template that could not be paired.
	pub fn diagnostics(&self) -> Vec<ParseDiagnostic> {
		parse_with_diagnostics(&self.source).1
	}
}

/// Render `source` against `context`.
pub fn render(source: &str, context: &Context) -> String {
	let nodes = parse(source);
	let scope = Scope::new(context);
	let mut output = String::with_capacity(source.len());
	render_nodes(&nodes, &scope, &mut output);
	output
}

fn render_nodes(nodes: &[Node], scope: &Scope<'_>, output: &mut String) {
	for node in nodes {
		match node {
			Node::Text(text) => output.push_str(text),
			Node::Value(directive) => render_value(directive, scope, output),
			Node::Block(block) => render_block(block, scope, output),
		}
	}
}

fn render_value(directive: &ValueDirective, scope: &Scope<'_>, output: &mut String) {
	let Some(value) = resolve(scope, &directive.key) else {
		tracing::trace!(key = %directive.key, "unresolved value");
		return;
	};

	if !is_truthy(value) && !is_zero(value) {
		return;
	}

	let text = to_display_string(value);
	if directive.escape {
		output.push_str(&escape_html(&text));
	} else {
		output.push_str(&text);
	}
}

fn render_block(block: &Block, scope: &Scope<'_>, output: &mut String) {
	let value = resolve(scope, &block.key).filter(|value| is_truthy(value));

	match (block.sigil, value) {
		(Sigil::Negated, None) => {
			// The whole inner text renders; an else tag has no meaning here.
			render_nodes(&block.body, scope, output);
			if let Some(alternate) = &block.alternate {
				output.push_str(&format!("{{{{:{}}}}}", block.tag()));
				render_nodes(alternate, scope, output);
			}
		}
		(Sigil::Negated, Some(_)) => {}
		(Sigil::Conditional | Sigil::Iteration, None) => {
			tracing::trace!(key = %block.key, "block value absent");
			if let Some(alternate) = &block.alternate {
				render_nodes(alternate, scope, output);
			}
		}
		(Sigil::Conditional, Some(_)) => render_nodes(&block.body, scope, output),
		(Sigil::Iteration, Some(value)) => {
			match value {
				serde_json::Value::Object(entries) => {
					for (key, item) in entries {
						render_nodes(&block.body, &scope.bind(key.as_str(), item), output);
					}
				}
				serde_json::Value::Array(items) => {
					for (index, item) in items.iter().enumerate() {
						render_nodes(&block.body, &scope.bind(index.to_string(), item), output);
					}
				}
				serde_json::Value::String(text) => {
					for (index, ch) in text.chars().enumerate() {
						let item = serde_json::Value::String(ch.to_string());
						render_nodes(&block.body, &scope.bind(index.to_string(), &item), output);
					}
				}
				_ => {}
			}
		}
	}
}
