use logos::Logos;

use crate::Point;
use crate::Position;
use crate::tokens::Sigil;
use crate::tokens::Token;
use crate::tokens::TokenKind;

/// Raw pieces produced by logos. Directives are assembled from these by the
/// [`TokenWalker`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
	#[token("{{")]
	DirectiveOpen,
	#[token("}}")]
	DirectiveClose,
	/// A directive can never span one of these.
	#[regex(r"[\n\r\x{2028}\x{2029}]")]
	LineBreak,
	#[token("{")]
	#[token("}")]
	Brace,
	#[regex(r"[^{}\n\r\x{2028}\x{2029}]+")]
	Text,
}

/// Walks the logos token stream, turning `{{ ... }}` runs into directive
/// tokens and coalescing everything else into literal text.
struct TokenWalker<'a> {
	/// The template source.
	source: &'a str,
	/// The collected raw tokens and their byte spans.
	raw_tokens: Vec<(Result<RawToken, ()>, std::ops::Range<usize>)>,
	/// Current index into `raw_tokens`.
	cursor: usize,
	/// Where the pending literal text starts.
	text_start: Point,
	/// Literal text not yet emitted.
	text: String,
	/// The location of the next unconsumed byte.
	point: Point,
	/// Completed tokens.
	tokens: Vec<Token>,
}

impl<'a> TokenWalker<'a> {
	fn new(source: &'a str) -> Self {
		let raw_tokens: Vec<_> = RawToken::lexer(source).spanned().collect();

		Self {
			source,
			raw_tokens,
			cursor: 0,
			text_start: Point::default(),
			text: String::new(),
			point: Point::default(),
			tokens: vec![],
		}
	}

	/// Append `slice` to the pending literal text.
	fn push_text(&mut self, slice: &str) {
		if self.text.is_empty() {
			self.text_start = self.point;
		}

		self.text.push_str(slice);
		self.point.advance_str(slice);
	}

	/// Emit the pending literal text, if any.
	fn flush_text(&mut self) {
		if self.text.is_empty() {
			return;
		}

		let text = std::mem::take(&mut self.text);
		let position = Position {
			start: self.text_start,
			end: self.point,
		};
		self.tokens.push(Token {
			kind: TokenKind::Text(text),
			position,
		});
	}

	/// Scan raw tokens from index `from` for the `}}` that ends a directive
	/// whose inner text starts at byte `inner_start`. Returns the inner text
	/// and the index of the closing raw token.
	///
	/// Fails on a line break, and on another `{{` before the close: that later
	/// `{{` starts the directive instead.
	fn scan_directive(&self, inner_start: usize, from: usize) -> Option<(&'a str, usize)> {
		let source = self.source;

		for (index, (result, span)) in self.raw_tokens.iter().enumerate().skip(from) {
			match result {
				Ok(RawToken::DirectiveClose) => {
					let inner = &source[inner_start..span.start];
					return (!inner.is_empty()).then_some((inner, index));
				}
				Ok(RawToken::DirectiveOpen | RawToken::LineBreak) => return None,
				_ => {}
			}
		}

		None
	}

	fn process(&mut self) {
		let source = self.source;

		while self.cursor < self.raw_tokens.len() {
			let (result, span) = self.raw_tokens[self.cursor].clone();
			let slice = &source[span.clone()];

			if result != Ok(RawToken::DirectiveOpen) {
				// Text, stray braces and bytes logos could not classify are
				// all literal.
				self.push_text(slice);
				self.cursor += 1;
				continue;
			}

			// In a `{{{` run the directive opens at the last two braces.
			let (open_start, scan_from) = match self.raw_tokens.get(self.cursor + 1) {
				Some((Ok(RawToken::Brace), next)) if &source[next.clone()] == "{" => {
					(span.start + 1, self.cursor + 2)
				}
				_ => (span.start, self.cursor + 1),
			};

			let Some((inner, close_index)) = self.scan_directive(open_start + 2, scan_from) else {
				// An unfinished `{{` is literal; keep scanning right after it
				// so a later directive on the line is still found.
				self.push_text(slice);
				self.cursor += 1;
				continue;
			};

			if open_start > span.start {
				self.push_text(&source[span.start..open_start]);
			}
			let raw = &source[open_start..self.raw_tokens[close_index].1.end];
			self.cursor = close_index + 1;

			match classify(inner) {
				Some(kind) => {
					self.flush_text();
					let position = Position::spanning(self.point, raw);
					self.point = position.end;
					self.tokens.push(Token { kind, position });
				}
				None => self.push_text(raw),
			}
		}

		self.flush_text();
	}
}

/// Decide what a directive's inner text means. A marker followed by nothing
/// falls through to the next interpretation, so `{{!}}` opens a plain
/// conditional named `!`.
fn classify(inner: &str) -> Option<TokenKind> {
	let mut chars = inner.chars();
	let first = chars.next()?;
	let rest = chars.as_str();

	if !rest.is_empty() {
		match first {
			'=' | '%' => {
				return Some(TokenKind::Value {
					key: rest.to_string(),
					escape: first == '%',
				});
			}
			'/' => return Some(TokenKind::Close(rest.to_string())),
			':' => return Some(TokenKind::Else(rest.to_string())),
			_ => {}
		}

		if let Some(sigil) = Sigil::from_char(first) {
			return Some(TokenKind::Open {
				sigil,
				key: rest.to_string(),
			});
		}
	}

	Some(TokenKind::Open {
		sigil: Sigil::Conditional,
		key: inner.to_string(),
	})
}

/// Split template source into literal text and directive tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
	let mut walker = TokenWalker::new(source);
	walker.process();
	walker.tokens
}
