//! Plain-text rendering of markup

use std::io::{self, Write};

/// Character entities decoded in text content
const ENTITIES: &[(&str, char)] = &[
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&amp;", '&'),
    ("&quot;", '"'),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InText,
    InTag,
}

/// Markup-stripping text renderer
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    decode_entities: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Create a renderer with entity decoding enabled
    pub fn new() -> Self {
        Self {
            decode_entities: true,
        }
    }

    /// Enable or disable decoding of `&lt;`, `&gt;`, `&amp;` and `&quot;`
    pub fn decode_entities(mut self, enable: bool) -> Self {
        self.decode_entities = enable;
        self
    }

    /// Write the text content of `body` to `sink`
    ///
    /// Everything between `<` and `>` is dropped. With `view_source` set,
    /// every character is written unchanged.
    pub fn render<W: Write + ?Sized>(
        &self,
        body: &str,
        view_source: bool,
        sink: &mut W,
    ) -> io::Result<()> {
        if view_source {
            return sink.write_all(body.as_bytes());
        }

        let mut state = State::InText;
        let mut buf = [0u8; 4];
        let mut chars = body.char_indices();

        while let Some((idx, c)) = chars.next() {
            match (state, c) {
                (State::InText, '<') => state = State::InTag,
                (State::InTag, '>') => state = State::InText,
                (State::InTag, _) => {}
                (State::InText, '&') if self.decode_entities => {
                    match match_entity(&body[idx..]) {
                        Some((entity, decoded)) => {
                            sink.write_all(decoded.encode_utf8(&mut buf).as_bytes())?;
                            // Entities are ASCII, so one char per byte
                            chars.nth(entity.len() - 2);
                        }
                        None => sink.write_all(b"&")?,
                    }
                }
                (State::InText, _) => sink.write_all(c.encode_utf8(&mut buf).as_bytes())?,
            }
        }

        Ok(())
    }

    /// Render into a new `String`
    pub fn render_to_string(&self, body: &str, view_source: bool) -> String {
        let mut out = Vec::with_capacity(body.len());
        // Writing to a Vec cannot fail
        let _ = self.render(body, view_source, &mut out);
        // Output is built only from whole chars of `body`
        String::from_utf8(out).unwrap_or_default()
    }
}

/// Write the plain-text rendering of `body` with entity decoding enabled
pub fn render<W: Write + ?Sized>(body: &str, view_source: bool, sink: &mut W) -> io::Result<()> {
    Renderer::new().render(body, view_source, sink)
}

/// Render `body` into a `String` with entity decoding enabled
pub fn render_to_string(body: &str, view_source: bool) -> String {
    Renderer::new().render_to_string(body, view_source)
}

/// Match a known entity at the start of `rest`
///
/// `starts_with` never looks past the end of `rest`, so a truncated entity
/// near the end of input simply fails to match.
fn match_entity(rest: &str) -> Option<(&'static str, char)> {
    ENTITIES
        .iter()
        .find(|(entity, _)| rest.starts_with(entity))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        assert_eq!(render_to_string("a<b>c</b>d", false), "acd");
    }

    #[test]
    fn test_view_source_passthrough() {
        assert_eq!(render_to_string("a<b>c</b>d", true), "a<b>c</b>d");
        assert_eq!(render_to_string("&lt;p&gt;", true), "&lt;p&gt;");
    }

    #[test]
    fn test_decodes_entities() {
        assert_eq!(render_to_string("x &lt;&gt; y", false), "x <> y");
        assert_eq!(
            render_to_string("<p>&quot;a&quot; &amp; b</p>", false),
            "\"a\" & b"
        );
    }

    #[test]
    fn test_entities_disabled() {
        let renderer = Renderer::new().decode_entities(false);
        assert_eq!(renderer.render_to_string("x &lt; y", false), "x &lt; y");
    }

    #[test]
    fn test_unknown_entity_left_alone() {
        assert_eq!(render_to_string("&copy; &nbsp;", false), "&copy; &nbsp;");
        assert_eq!(render_to_string("fish & chips", false), "fish & chips");
    }

    #[test]
    fn test_truncated_entity_at_end_of_input() {
        assert_eq!(render_to_string("a &", false), "a &");
        assert_eq!(render_to_string("a &l", false), "a &l");
        assert_eq!(render_to_string("a &lt", false), "a &lt");
        assert_eq!(render_to_string("a &lt;", false), "a <");
    }

    #[test]
    fn test_entities_inside_tags_are_dropped() {
        assert_eq!(render_to_string("<a title=\"&lt;\">x</a>", false), "x");
    }

    #[test]
    fn test_decoded_lt_does_not_open_tag() {
        assert_eq!(render_to_string("&lt;b&gt;bold", false), "<b>bold");
    }

    #[test]
    fn test_unterminated_tag_swallows_rest() {
        assert_eq!(render_to_string("before<div class=", false), "before");
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(render_to_string("<p>héllo — wörld</p>", false), "héllo — wörld");
    }

    #[test]
    fn test_render_to_sink() {
        let mut out = Vec::new();
        render("<h1>Title</h1>", false, &mut out).unwrap();
        assert_eq!(out, b"Title");
    }
}
