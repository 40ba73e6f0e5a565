use std::io::Write;

use crate::block::{BlockContext, Line};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::inline::{Decorator, Unterminated};
use crate::parser;

/// Streams classified lines out as HTML blocks.
///
/// The open block is carried from one line to the next; `finish` closes
/// whatever is still open once input runs out.
pub struct HtmlRenderer<W: Write> {
    out: W,
    context: BlockContext,
    line_no: usize,
    decorator: Decorator,
    line_breaks: bool,
}

impl<W: Write> HtmlRenderer<W> {
    pub fn new(out: W, config: &Config) -> Self {
        Self {
            out,
            context: BlockContext::None,
            line_no: 0,
            decorator: Decorator {
                strict: config.decorations.strict,
                emphasis_as_bold: config.headings.emphasis_as_bold,
            },
            line_breaks: config.output.line_breaks,
        }
    }

    /// Block context left by the last line.
    pub fn context(&self) -> BlockContext {
        self.context
    }

    /// Render one input line, with or without its terminator.
    pub fn push_line(&mut self, raw: &str) -> Result<()> {
        self.line_no += 1;
        let line = parser::classify(raw);
        log::trace!("line {}: {:?}", self.line_no, line);
        self.context = self.step(self.context, line)?;
        Ok(())
    }

    /// Close the open block, flush, and hand back the sink.
    pub fn finish(mut self) -> Result<W> {
        self.close(self.context)?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn step(&mut self, context: BlockContext, line: Line<'_>) -> Result<BlockContext> {
        let inline = match line {
            Line::Heading { text, .. } => self.decorate(text, true)?,
            Line::UnorderedItem(text) | Line::OrderedItem(text) => {
                self.decorate(text.trim(), false)?
            }
            Line::Text(text) => self.decorate(text, false)?,
            Line::Blank => String::new(),
        };

        let context = if context.is_closed_by(&line) {
            self.close(context)?;
            BlockContext::None
        } else {
            context
        };

        let next = match line {
            Line::Heading { level, .. } => {
                write!(self.out, "<h{level}>{inline}</h{level}>")?;
                self.end_line()?;
                BlockContext::Heading
            }
            Line::UnorderedItem(_) => {
                self.item(context, BlockContext::UnorderedList, "<ul>", &inline)?
            }
            Line::OrderedItem(_) => self.item(context, BlockContext::OrderedList, "<ol>", &inline)?,
            Line::Text(_) => {
                if context == BlockContext::Paragraph {
                    self.out.write_all(b"<br>")?;
                    self.end_line()?;
                } else {
                    self.out.write_all(b"<p>")?;
                }
                self.out.write_all(inline.as_bytes())?;
                BlockContext::Paragraph
            }
            Line::Blank => BlockContext::None,
        };

        if next != context {
            log::debug!("line {}: {:?} -> {:?}", self.line_no, context, next);
        }
        Ok(next)
    }

    fn item(
        &mut self,
        context: BlockContext,
        list: BlockContext,
        open_tag: &str,
        inline: &str,
    ) -> Result<BlockContext> {
        if context != list {
            self.out.write_all(open_tag.as_bytes())?;
            self.end_line()?;
        }
        write!(self.out, "<li>{inline}</li>")?;
        self.end_line()?;
        Ok(list)
    }

    fn close(&mut self, context: BlockContext) -> Result<()> {
        if let Some(tag) = context.closing_tag() {
            self.out.write_all(tag.as_bytes())?;
            self.end_line()?;
        }
        Ok(())
    }

    fn end_line(&mut self) -> Result<()> {
        if self.line_breaks {
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    fn decorate(&self, text: &str, inside_header: bool) -> Result<String> {
        self.decorator
            .decorate(text, inside_header)
            .map_err(|Unterminated(marker)| Error::MalformedDecoration {
                line: self.line_no,
                marker,
            })
    }
}
