use std::fmt::Display;

use crate::Position;
use crate::lexer::tokenize;
use crate::tokens::Sigil;
use crate::tokens::TokenKind;

/// A parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	/// Literal text, emitted unchanged.
	Text(String),
	/// A value substitution.
	Value(ValueDirective),
	/// A conditional, negated or iteration block.
	Block(Block),
}

/// `{{=key}}` or `{{%key}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDirective {
	/// The dotted path to resolve.
	pub key: String,
	/// Whether the resolved value is HTML-escaped before it is emitted.
	pub escape: bool,
}

/// A paired `{{tag}} ... {{/tag}}` region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
	pub sigil: Sigil,
	/// The dotted path whose value controls the block.
	pub key: String,
	/// Nodes between the opening tag and the else tag (or the closing tag when
	/// there is no else tag).
	pub body: Vec<Node>,
	/// Nodes between `{{:tag}}` and the closing tag.
	pub alternate: Option<Vec<Node>>,
	/// Where the opening tag was found.
	pub opening: Position,
}

impl Block {
	/// The opening tag text, sigil included. Else and close tags must repeat
	/// it exactly.
	pub fn tag(&self) -> String {
		format!("{}{}", self.sigil, self.key)
	}
}

/// A problem found while pairing tags. Parsing always completes: the
/// offending tags are kept as literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseDiagnostic {
	/// A block was opened but never closed.
	UnclosedBlock {
		tag: String,
		line: usize,
		column: usize,
	},
	/// A closing tag has no open block with the same tag text.
	UnmatchedClose {
		tag: String,
		line: usize,
		column: usize,
	},
	/// An else tag does not belong to the innermost open block, or that block
	/// already has an else branch.
	StrayElse {
		tag: String,
		line: usize,
		column: usize,
	},
}

impl ParseDiagnostic {
	/// 1-indexed line and column of the offending tag.
	pub fn location(&self) -> (usize, usize) {
		match self {
			Self::UnclosedBlock { line, column, .. }
			| Self::UnmatchedClose { line, column, .. }
			| Self::StrayElse { line, column, .. } => (*line, *column),
		}
	}
}

impl Display for ParseDiagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::UnclosedBlock { tag, line, column } => {
				write!(f, "{line}:{column}: block `{{{{{tag}}}}}` is never closed")
			}
			Self::UnmatchedClose { tag, line, column } => {
				write!(f, "{line}:{column}: `{{{{/{tag}}}}}` does not close any open block")
			}
			Self::StrayElse { tag, line, column } => {
				write!(
					f,
					"{line}:{column}: `{{{{:{tag}}}}}` is not inside a matching open block"
				)
			}
		}
	}
}

/// An opening tag waiting for its close tag.
struct PendingBlock {
	sigil: Sigil,
	key: String,
	opening: Position,
	body: Vec<Node>,
	alternate: Option<Vec<Node>>,
}

impl PendingBlock {
	fn tag(&self) -> String {
		format!("{}{}", self.sigil, self.key)
	}

	fn branch_mut(&mut self) -> &mut Vec<Node> {
		match &mut self.alternate {
			Some(alternate) => alternate,
			None => &mut self.body,
		}
	}

	fn into_block(self) -> Block {
		Block {
			sigil: self.sigil,
			key: self.key,
			body: self.body,
			alternate: self.alternate,
			opening: self.opening,
		}
	}

	/// Turn an unclosed block back into the literal text it was parsed from.
	/// Nested blocks that did close are kept.
	fn into_literal(self) -> Vec<Node> {
		let tag = self.tag();
		let mut nodes = Vec::with_capacity(self.body.len() + 2);
		nodes.push(Node::Text(format!("{{{{{tag}}}}}")));
		nodes.extend(self.body);

		if let Some(alternate) = self.alternate {
			nodes.push(Node::Text(format!("{{{{:{tag}}}}}")));
			nodes.extend(alternate);
		}

		nodes
	}
}

#[derive(Default)]
struct BlockBuilder {
	root: Vec<Node>,
	pending: Vec<PendingBlock>,
	diagnostics: Vec<ParseDiagnostic>,
}

impl BlockBuilder {
	/// Append a node to the innermost open branch, merging adjacent text.
	fn push(&mut self, node: Node) {
		let nodes = match self.pending.last_mut() {
			Some(pending) => pending.branch_mut(),
			None => &mut self.root,
		};

		if let (Node::Text(text), Some(Node::Text(previous))) = (&node, nodes.last_mut()) {
			previous.push_str(text);
			return;
		}

		nodes.push(node);
	}

	/// Pop the innermost pending block and splice it back in as literal text.
	fn abandon_innermost(&mut self) {
		let Some(pending) = self.pending.pop() else {
			return;
		};

		tracing::debug!(tag = %pending.tag(), "unclosed block kept as text");
		self.diagnostics.push(ParseDiagnostic::UnclosedBlock {
			tag: pending.tag(),
			line: pending.opening.start.line,
			column: pending.opening.start.column,
		});

		for node in pending.into_literal() {
			self.push(node);
		}
	}

	fn open(&mut self, sigil: Sigil, key: String, opening: Position) {
		self.pending.push(PendingBlock {
			sigil,
			key,
			opening,
			body: vec![],
			alternate: None,
		});
	}

	fn otherwise(&mut self, tag: String, position: Position) {
		if let Some(pending) = self.pending.last_mut() {
			if pending.alternate.is_none() && pending.tag() == tag {
				pending.alternate = Some(vec![]);
				return;
			}
		}

		self.diagnostics.push(ParseDiagnostic::StrayElse {
			line: position.start.line,
			column: position.start.column,
			tag: tag.clone(),
		});
		self.push(Node::Text(format!("{{{{:{tag}}}}}")));
	}

	fn close(&mut self, tag: String, position: Position) {
		// Find the most recent matching open block (search from the end).
		let Some(index) = self.pending.iter().rposition(|pending| pending.tag() == tag) else {
			self.diagnostics.push(ParseDiagnostic::UnmatchedClose {
				line: position.start.line,
				column: position.start.column,
				tag: tag.clone(),
			});
			self.push(Node::Text(format!("{{{{/{tag}}}}}")));
			return;
		};

		while self.pending.len() > index + 1 {
			self.abandon_innermost();
		}

		if let Some(pending) = self.pending.pop() {
			self.push(Node::Block(pending.into_block()));
		}
	}

	fn finish(mut self) -> (Vec<Node>, Vec<ParseDiagnostic>) {
		while !self.pending.is_empty() {
			self.abandon_innermost();
		}

		(self.root, self.diagnostics)
	}
}

/// Parse template source into nodes. Malformed tags are kept as literal text.
pub fn parse(source: &str) -> Vec<Node> {
	parse_with_diagnostics(source).0
}

/// Parse template source into nodes together with diagnostics describing
/// every tag that could not be paired.
pub fn parse_with_diagnostics(source: &str) -> (Vec<Node>, Vec<ParseDiagnostic>) {
	let mut builder = BlockBuilder::default();

	for token in tokenize(source) {
		match token.kind {
			TokenKind::Text(text) => builder.push(Node::Text(text)),
			TokenKind::Value { key, escape } => {
				builder.push(Node::Value(ValueDirective { key, escape }));
			}
			TokenKind::Open { sigil, key } => builder.open(sigil, key, token.position),
			TokenKind::Else(tag) => builder.otherwise(tag, token.position),
			TokenKind::Close(tag) => builder.close(tag, token.position),
		}
	}

	builder.finish()
}
