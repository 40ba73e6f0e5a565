//! Inline decorations within a single line.
//!
//! `**` and `__` toggle bold and emphasis. `((…))` and `[[…]]` nest: each open
//! bracket gets a frame on an explicit stack, its enclosed span is decorated
//! first, then the strip decoration removes every lowercase `c` and the digest
//! decoration replaces the result with its MD5 hex digest.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

/// An inline decoration marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoration {
    Bold,
    Emphasis,
    Strip,
    Digest,
}

const BRACKETS: [Decoration; 2] = [Decoration::Strip, Decoration::Digest];
const TOGGLES: [Decoration; 2] = [Decoration::Bold, Decoration::Emphasis];

impl Decoration {
    /// Marker text that opens the decoration.
    pub fn opener(self) -> &'static str {
        match self {
            Decoration::Bold => "**",
            Decoration::Emphasis => "__",
            Decoration::Strip => "((",
            Decoration::Digest => "[[",
        }
    }

    /// Marker text that closes the decoration.
    pub fn closer(self) -> &'static str {
        match self {
            Decoration::Bold => "**",
            Decoration::Emphasis => "__",
            Decoration::Strip => "))",
            Decoration::Digest => "]]",
        }
    }

    /// Transform the decorated content of a bracket decoration.
    fn apply(self, inner: String) -> String {
        match self {
            Decoration::Strip => inner.replace('c', ""),
            Decoration::Digest => format!("{:x}", md5::compute(inner.as_bytes())),
            Decoration::Bold | Decoration::Emphasis => inner,
        }
    }
}

impl fmt::Display for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opener())
    }
}

/// A decoration was opened but its span ended first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unterminated `{0}` decoration")]
pub struct Unterminated(pub Decoration);

/// Replaces inline markers with their HTML or derived equivalents.
#[derive(Debug, Clone, Copy)]
pub struct Decorator {
    /// Fail on unterminated decorations instead of passing them through.
    pub strict: bool,
    /// Render `__` as `<b>` inside headings.
    pub emphasis_as_bold: bool,
}

impl Default for Decorator {
    fn default() -> Self {
        Self {
            strict: true,
            emphasis_as_bold: true,
        }
    }
}

/// Decorate `span` with the default settings.
pub fn decorate(span: &str, inside_header: bool) -> Result<String, Unterminated> {
    Decorator::default().decorate(span, inside_header)
}

/// Text decorated so far for one span, with its toggles still open.
#[derive(Default)]
struct Output {
    text: String,
    open: Vec<Decoration>,
}

/// A bracket span whose closer has not been reached yet.
struct Frame {
    kind: Decoration,
    /// Byte offset of the opener.
    start: usize,
    output: Output,
}

impl Decorator {
    pub fn decorate(&self, span: &str, inside_header: bool) -> Result<String, Unterminated> {
        let mut top = Output {
            text: String::with_capacity(span.len()),
            open: Vec::new(),
        };
        // Innermost bracket span last
        let mut nested: Vec<Frame> = Vec::new();
        // Openers whose span ran out of input; only filled in lenient mode
        let mut unclosed: HashSet<(usize, Decoration)> = HashSet::new();
        let mut i = 0;

        while i < span.len() || !nested.is_empty() {
            let rest = &span[i..];

            if let Some(kind) = nested.last().map(|frame| frame.kind) {
                if rest.is_empty() {
                    if self.strict {
                        return Err(Unterminated(kind));
                    }
                    // Opener becomes literal text, rescan right after it
                    if let Some(frame) = nested.pop() {
                        log::warn!("passing through unterminated `{kind}`");
                        unclosed.insert((frame.start, kind));
                        current(&mut top, &mut nested).text.push_str(kind.opener());
                        i = frame.start + kind.opener().len();
                    }
                    continue;
                }
                if rest.starts_with(kind.closer()) {
                    if let Some(mut frame) = nested.pop() {
                        self.close_open(&mut frame.output, inside_header)?;
                        let text = kind.apply(frame.output.text);
                        current(&mut top, &mut nested).text.push_str(&text);
                        i += kind.closer().len();
                    }
                    continue;
                }
            }

            if let Some(kind) = marker_at(rest, &BRACKETS) {
                if unclosed.contains(&(i, kind)) {
                    current(&mut top, &mut nested).text.push_str(kind.opener());
                } else {
                    nested.push(Frame {
                        kind,
                        start: i,
                        output: Output::default(),
                    });
                }
                i += kind.opener().len();
                continue;
            }

            let output = current(&mut top, &mut nested);

            if let Some(kind) = marker_at(rest, &TOGGLES) {
                let (open_tag, close_tag) = self.tags(kind, inside_header);
                match output.open.iter().position(|&d| d == kind) {
                    Some(pos) => {
                        output.open.remove(pos);
                        output.text.push_str(close_tag);
                    }
                    None => {
                        output.open.push(kind);
                        output.text.push_str(open_tag);
                    }
                }
                i += kind.opener().len();
                continue;
            }

            let Some(ch) = rest.chars().next() else {
                break;
            };
            output.text.push(ch);
            i += ch.len_utf8();
        }

        self.close_open(&mut top, inside_header)?;
        Ok(top.text)
    }

    /// Handle toggles still open at the end of a span.
    fn close_open(&self, output: &mut Output, inside_header: bool) -> Result<(), Unterminated> {
        if let Some(&first) = output.open.first() {
            if self.strict {
                return Err(Unterminated(first));
            }
            log::warn!("closing unterminated `{first}` at end of span");
        }
        for kind in output.open.drain(..).rev() {
            output.text.push_str(self.tags(kind, inside_header).1);
        }
        Ok(())
    }

    fn tags(&self, kind: Decoration, inside_header: bool) -> (&'static str, &'static str) {
        match kind {
            Decoration::Emphasis if !(inside_header && self.emphasis_as_bold) => ("<em>", "</em>"),
            _ => ("<b>", "</b>"),
        }
    }
}

fn current<'a>(top: &'a mut Output, nested: &'a mut [Frame]) -> &'a mut Output {
    match nested.last_mut() {
        Some(frame) => &mut frame.output,
        None => top,
    }
}

fn marker_at(rest: &str, candidates: &[Decoration]) -> Option<Decoration> {
    candidates
        .iter()
        .copied()
        .find(|kind| rest.starts_with(kind.opener()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const HELLO_MD5: &str = "5d41402abc4b2a76b9719d911017c592";

    fn lenient() -> Decorator {
        Decorator {
            strict: false,
            ..Decorator::default()
        }
    }

    #[rstest]
    #[case("plain text", "plain text")]
    #[case("**bold**", "<b>bold</b>")]
    #[case("__em__", "<em>em</em>")]
    #[case("a **b** c __d__ e", "a <b>b</b> c <em>d</em> e")]
    #[case("**a __b** c__", "<b>a <em>b</b> c</em>")]
    #[case("**one** and **two**", "<b>one</b> and <b>two</b>")]
    #[case("café **crème**", "café <b>crème</b>")]
    #[case("a single * and _ stay", "a single * and _ stay")]
    #[case("stray )) and ]] stay", "stray )) and ]] stay")]
    fn toggles_outside_heading(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decorate(input, false).unwrap(), expected);
    }

    #[rstest]
    #[case("__em__", "<b>em</b>")]
    #[case("**bold** __em__", "<b>bold</b> <b>em</b>")]
    fn emphasis_is_bold_inside_heading(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decorate(input, true).unwrap(), expected);
    }

    #[test]
    fn emphasis_as_bold_can_be_disabled() {
        let decorator = Decorator {
            emphasis_as_bold: false,
            ..Decorator::default()
        };
        assert_eq!(decorator.decorate("__em__", true).unwrap(), "<em>em</em>");
    }

    #[rstest]
    #[case("((abcabc))", "ababab")]
    #[case("((Chocolate))", "Choolate")]
    #[case("x ((cc)) y", "x  y")]
    #[case("((**Cc**))", "<b>C</b>")]
    #[case("((a((bc))c))", "ab")]
    #[case("(((x)))", "(x)")]
    fn strip_decoration(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decorate(input, false).unwrap(), expected);
    }

    #[test]
    fn digest_of_plain_text() {
        assert_eq!(decorate("[[hello]]", false).unwrap(), HELLO_MD5);
        assert_eq!(
            decorate("say [[hello]]!", false).unwrap(),
            format!("say {HELLO_MD5}!")
        );
    }

    #[test]
    fn digest_hashes_decorated_markup() {
        let expected = format!("{:x}", md5::compute("<b>a</b>"));
        assert_eq!(decorate("[[**a**]]", false).unwrap(), expected);
    }

    #[test]
    fn digest_inside_heading_hashes_heading_markup() {
        let expected = format!("{:x}", md5::compute("<b>a</b>"));
        assert_eq!(decorate("[[__a__]]", true).unwrap(), expected);
    }

    #[test]
    fn strip_applies_to_nested_digest() {
        assert_eq!(
            decorate("(([[hello]]))", false).unwrap(),
            "5d41402ab4b2a76b9719d911017592"
        );
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let out = decorate("[[Hello World]]", false).unwrap();
        assert_eq!(out.len(), 32);
        assert!(out.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[rstest]
    #[case("**bold", Decoration::Bold)]
    #[case("__em", Decoration::Emphasis)]
    #[case("((abc", Decoration::Strip)]
    #[case("[[abc", Decoration::Digest)]
    #[case("[[a **b]]", Decoration::Bold)]
    #[case("((a [[b))", Decoration::Digest)]
    #[case("**a __b**", Decoration::Emphasis)]
    fn strict_mode_rejects_unterminated(#[case] input: &str, #[case] missing: Decoration) {
        assert_eq!(decorate(input, false), Err(Unterminated(missing)));
    }

    #[rstest]
    #[case("**bold", "<b>bold</b>")]
    #[case("**a __b", "<b>a <em>b</em></b>")]
    #[case("((abc", "((abc")]
    #[case("[[abc", "[[abc")]
    #[case("((a [[b))", "a [[b")]
    fn lenient_mode_passes_through(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(lenient().decorate(input, false).unwrap(), expected);
    }

    #[test]
    fn lenient_mode_closes_toggles_before_digest() {
        let expected = format!("{:x}", md5::compute("a <b>b</b>"));
        assert_eq!(lenient().decorate("[[a **b]]", false).unwrap(), expected);
    }

    #[rstest]
    #[case("[[")]
    #[case("((")]
    fn lenient_mode_long_run_of_openers_stays_literal(#[case] opener: &str) {
        let input = opener.repeat(1000);
        assert_eq!(lenient().decorate(&input, false).unwrap(), input);
    }

    #[test]
    fn lenient_mode_pairs_innermost_opener_in_a_run() {
        let input = format!("{}]]", "[[".repeat(30));
        let expected = format!("{}{:x}", "[[".repeat(29), md5::compute(""));
        assert_eq!(lenient().decorate(&input, false).unwrap(), expected);
    }

    #[test]
    fn lenient_mode_rescans_after_unclosed_outer_bracket() {
        let expected = format!("[[ {HELLO_MD5}");
        assert_eq!(lenient().decorate("[[ [[hello]]", false).unwrap(), expected);
    }

    #[test]
    fn deep_nesting_does_not_exhaust_the_stack() {
        let depth = 200_000;
        let input = format!("{}x{}", "((".repeat(depth), "))".repeat(depth));
        assert_eq!(decorate(&input, false).unwrap(), "x");
    }

    #[test]
    fn deep_unterminated_nesting_is_reported() {
        let input = format!("{}x", "[[".repeat(200_000));
        assert_eq!(decorate(&input, false), Err(Unterminated(Decoration::Digest)));
    }

    #[test]
    fn unterminated_message_names_marker() {
        let err = decorate("text [[oops", false).unwrap_err();
        assert_eq!(err.to_string(), "unterminated `[[` decoration");
    }
}
