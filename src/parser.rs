use crate::block::Line;

/// Deepest heading level the dialect recognises.
const MAX_HEADING_LEVEL: usize = 6;

/// Parse markdown text into one classified line per input line.
pub fn parse(markdown: &str) -> Vec<Line<'_>> {
    markdown.lines().map(classify).collect()
}

/// Classify a single line, with or without its terminator.
///
/// Markers are checked in priority order: heading, `- `, `* `, blank, text.
pub fn classify(raw: &str) -> Line<'_> {
    let line = strip_terminator(raw);

    if let Some((level, rest)) = heading_marker(line) {
        return Line::Heading {
            level,
            text: rest.trim(),
        };
    }
    if let Some(rest) = line.strip_prefix("- ") {
        return Line::UnorderedItem(rest);
    }
    if let Some(rest) = line.strip_prefix("* ") {
        return Line::OrderedItem(rest);
    }

    match line.trim() {
        "" => Line::Blank,
        text => Line::Text(text),
    }
}

fn strip_terminator(raw: &str) -> &str {
    raw.trim_end_matches(['\r', '\n'])
}

/// Split `### rest` into `(3, "rest")`.
fn heading_marker(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=MAX_HEADING_LEVEL).contains(&level) {
        return None;
    }
    let rest = line[level..].strip_prefix(' ')?;
    Some((level as u8, rest))
}
