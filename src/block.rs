/// A single input line, classified by its block-level marker.
///
/// Payloads borrow from the line they were classified from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `#` to `######` followed by a space; `text` is trimmed.
    Heading { level: u8, text: &'a str },
    /// `- item`
    UnorderedItem(&'a str),
    /// `* item`
    OrderedItem(&'a str),
    /// Anything else with visible content, trimmed.
    Text(&'a str),
    Blank,
}

/// The kind of block left open by the previously processed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockContext {
    #[default]
    None,
    Paragraph,
    UnorderedList,
    OrderedList,
    Heading,
}

impl BlockContext {
    /// Tag that closes this context, if it leaves anything open.
    pub fn closing_tag(self) -> Option<&'static str> {
        match self {
            BlockContext::Paragraph => Some("</p>"),
            BlockContext::UnorderedList => Some("</ul>"),
            BlockContext::OrderedList => Some("</ol>"),
            BlockContext::None | BlockContext::Heading => None,
        }
    }

    /// Whether `line` ends this context before it is rendered.
    pub fn is_closed_by(self, line: &Line<'_>) -> bool {
        match self {
            BlockContext::Paragraph => !matches!(line, Line::Text(_)),
            BlockContext::UnorderedList => !matches!(line, Line::UnorderedItem(_)),
            BlockContext::OrderedList => !matches!(line, Line::OrderedItem(_)),
            BlockContext::None | BlockContext::Heading => false,
        }
    }
}
