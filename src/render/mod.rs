//! Markdown rendering for the post reader.
//!
//! `render_markdown` turns post text into styled ratatui lines and records
//! where each fenced code block landed, so copy controls and highlighting
//! can be layered on afterwards.

mod highlight;

pub use highlight::{Highlighter, KeywordHighlighter};

use crate::theme::ColorPalette;
use crate::util::strip_control_chars;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use ratatui::text::{Line, Span};

/// A fenced or indented code block inside a rendered post.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// Info-string language, if any (`rust` in ```` ```rust ````).
    pub language: Option<String>,
    /// Literal block text, as copied to the clipboard.
    pub code: String,
    /// Index in `RenderedPost::lines` of the first code line.
    pub start: usize,
    /// Number of code lines.
    pub len: usize,
    /// Index of the copy-control line, once decorated.
    pub control_line: Option<usize>,
}

/// Styled post body plus code block positions.
#[derive(Debug, Clone, Default)]
pub struct RenderedPost {
    pub lines: Vec<Line<'static>>,
    pub code_blocks: Vec<CodeBlock>,
}

impl RenderedPost {
    /// Literal text of the 1-based `n`th code block.
    pub fn code_block_text(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|idx| self.code_blocks.get(idx))
            .map(|block| block.code.as_str())
    }

    /// Insert a copy-control line above every code block.
    ///
    /// Blocks that already carry a control are left alone, so calling this
    /// repeatedly never stacks controls.
    pub fn decorate_copy_controls(&mut self, palette: &ColorPalette) {
        let mut offset = 0;
        for (idx, block) in self.code_blocks.iter_mut().enumerate() {
            block.start += offset;
            if let Some(line) = block.control_line.as_mut() {
                *line += offset;
                continue;
            }

            let label = match &block.language {
                Some(lang) => format!(" [{}] Copy · {} ", idx + 1, lang),
                None => format!(" [{}] Copy ", idx + 1),
            };
            self.lines
                .insert(block.start, Line::from(Span::styled(label, palette.copy_control)));
            block.control_line = Some(block.start);
            block.start += 1;
            offset += 1;
        }
    }
}

#[derive(Default)]
struct InlineState {
    heading: bool,
    emphasis: bool,
    strong: bool,
    quote: bool,
    image: bool,
    link: Option<String>,
}

/// Convert markdown to styled lines.
///
/// Control characters and terminal escape sequences are stripped first.
pub fn render_markdown(md: &str, palette: &ColorPalette) -> RenderedPost {
    let md = strip_control_chars(md);
    let parser = Parser::new(&md);

    let mut post = RenderedPost {
        lines: Vec::with_capacity(md.lines().count()),
        code_blocks: Vec::new(),
    };
    let mut current_spans: Vec<Span<'static>> = Vec::with_capacity(4);
    let mut state = InlineState::default();
    let mut code: Option<(Option<String>, String)> = None;
    let mut list_depth = 0usize;

    let flush = |spans: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>| {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    };

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => state.heading = true,
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut current_spans, &mut post.lines);
                post.lines.push(Line::from(""));
                state.heading = false;
            }
            Event::Start(Tag::Paragraph) => {
                if state.quote && current_spans.is_empty() {
                    current_spans.push(Span::styled("│ ", palette.reader_quote));
                }
            }
            Event::End(TagEnd::Paragraph) => {
                flush(&mut current_spans, &mut post.lines);
                if list_depth == 0 {
                    post.lines.push(Line::from(""));
                }
            }
            Event::Start(Tag::BlockQuote(_)) => state.quote = true,
            Event::End(TagEnd::BlockQuote(_)) => state.quote = false,
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    post.lines.push(Line::from(""));
                }
            }
            Event::Start(Tag::Item) => {
                flush(&mut current_spans, &mut post.lines);
                let indent = "  ".repeat(list_depth.saturating_sub(1));
                current_spans.push(Span::styled(format!("{}• ", indent), palette.reader_body));
            }
            Event::End(TagEnd::Item) => flush(&mut current_spans, &mut post.lines),
            Event::Start(Tag::CodeBlock(kind)) => {
                flush(&mut current_spans, &mut post.lines);
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .filter(|lang| !lang.is_empty())
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                code = Some((language, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, text)) = code.take() {
                    let start = post.lines.len();
                    for line in text.lines() {
                        post.lines
                            .push(Line::from(Span::styled(line.to_string(), palette.reader_code_block)));
                    }
                    let len = post.lines.len() - start;
                    post.code_blocks.push(CodeBlock {
                        language,
                        code: text.trim_end_matches('\n').to_string(),
                        start,
                        len,
                        control_line: None,
                    });
                }
                post.lines.push(Line::from(""));
            }
            Event::Start(Tag::Emphasis) => state.emphasis = true,
            Event::End(TagEnd::Emphasis) => state.emphasis = false,
            Event::Start(Tag::Strong) => state.strong = true,
            Event::End(TagEnd::Strong) => state.strong = false,
            Event::Start(Tag::Link { dest_url, .. }) => {
                state.link = Some(dest_url.into_string());
            }
            Event::End(TagEnd::Link) => {
                if let Some(url) = state.link.take() {
                    current_spans.push(Span::styled(format!(" <{}>", url), palette.reader_link));
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                state.image = true;
                current_spans.push(Span::styled(
                    format!("[Image: {}]", dest_url),
                    palette.reader_image,
                ));
            }
            Event::End(TagEnd::Image) => state.image = false,
            Event::Text(text) => {
                if let Some((_, buf)) = code.as_mut() {
                    buf.push_str(&text);
                    continue;
                }
                if state.image {
                    // Alt text is already represented by the image marker
                    continue;
                }
                let style = if state.heading {
                    palette.reader_heading
                } else if state.link.is_some() {
                    palette.reader_link
                } else if state.strong {
                    palette.reader_strong
                } else if state.emphasis {
                    palette.reader_emphasis
                } else if state.quote {
                    palette.reader_quote
                } else {
                    palette.reader_body
                };
                // CowStr::into_string() avoids a copy for the Boxed variant
                current_spans.push(Span::styled(text.into_string(), style));
            }
            Event::Code(inline) => {
                current_spans.push(Span::styled(
                    format!("`{}`", inline),
                    palette.reader_inline_code,
                ));
            }
            Event::SoftBreak => current_spans.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut current_spans, &mut post.lines),
            Event::Rule => {
                flush(&mut current_spans, &mut post.lines);
                post.lines
                    .push(Line::from(Span::styled("─".repeat(40), palette.panel_border)));
            }
            _ => {}
        }
    }

    flush(&mut current_spans, &mut post.lines);
    post
}
