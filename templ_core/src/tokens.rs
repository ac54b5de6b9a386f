use std::fmt::Display;

use crate::Position;

/// The leading marker of an opening block tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sigil {
	/// `{{key}}` renders its body when `key` is truthy.
	Conditional,
	/// `{{!key}}` renders its body when `key` is falsy.
	Negated,
	/// `{{@key}}` renders its body once per entry of `key`.
	Iteration,
}

impl Sigil {
	/// Parse a sigil from the first character of a tag.
	pub fn from_char(ch: char) -> Option<Self> {
		match ch {
			'!' => Some(Self::Negated),
			'@' => Some(Self::Iteration),
			_ => None,
		}
	}

	/// The source text of the sigil. Empty for plain conditionals.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Conditional => "",
			Self::Negated => "!",
			Self::Iteration => "@",
		}
	}
}

impl Display for Sigil {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A lexical unit of template source. Directives are delimited by `{{` and
/// `}}`; everything else is literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
	/// Literal text, including anything that looked like a directive but was
	/// never completed.
	Text(String),
	/// `{{=key}}` when `escape` is false, `{{%key}}` when it is true.
	Value { key: String, escape: bool },
	/// `{{key}}`, `{{!key}}` or `{{@key}}`.
	Open { sigil: Sigil, key: String },
	/// `{{:tag}}` where `tag` is the full opening tag text, sigil included.
	Else(String),
	/// `{{/tag}}` where `tag` is the full opening tag text, sigil included.
	Close(String),
}

/// A token together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	pub kind: TokenKind,
	pub position: Position,
}

impl Display for TokenKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TokenKind::Text(text) => f.write_str(text),
			TokenKind::Value { key, escape } => {
				let marker = if *escape { '%' } else { '=' };
				write!(f, "{{{{{marker}{key}}}}}")
			}
			TokenKind::Open { sigil, key } => write!(f, "{{{{{sigil}{key}}}}}"),
			TokenKind::Else(tag) => write!(f, "{{{{:{tag}}}}}"),
			TokenKind::Close(tag) => write!(f, "{{{{/{tag}}}}}"),
		}
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.kind.fmt(f)
	}
}
