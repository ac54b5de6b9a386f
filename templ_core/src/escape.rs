use std::borrow::Cow;

/// Escape text for inclusion in HTML.
///
/// Encodes `&`, `<`, `>` and non-breaking spaces the way an HTML text node
/// is serialized, and additionally encodes `"` so the result is also safe
/// inside a double-quoted attribute. Single quotes are left alone.
pub fn escape_html(text: &str) -> Cow<'_, str> {
	if !text.contains(['&', '<', '>', '"', '\u{a0}']) {
		return Cow::Borrowed(text);
	}

	let mut escaped = String::with_capacity(text.len() + 16);

	for ch in text.chars() {
		match ch {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'\u{a0}' => escaped.push_str("&nbsp;"),
			'"' => escaped.push_str("&quot;"),
			_ => escaped.push(ch),
		}
	}

	Cow::Owned(escaped)
}
