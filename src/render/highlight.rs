use super::RenderedPost;
use crate::theme::ColorPalette;
use ratatui::text::{Line, Span};

/// Applies syntax colors to the code blocks of a rendered post.
///
/// Implementations must be idempotent: highlighting twice gives the same
/// lines as highlighting once.
pub trait Highlighter {
    fn highlight(&self, post: &mut RenderedPost, palette: &ColorPalette);
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "case", "catch", "class", "const", "continue", "def",
    "default", "do", "else", "enum", "export", "extends", "false", "final", "fn", "for",
    "from", "func", "function", "if", "impl", "import", "in", "interface", "let", "match",
    "mut", "new", "null", "package", "private", "protected", "pub", "public", "return",
    "self", "static", "struct", "super", "switch", "this", "throw", "throws", "trait",
    "true", "try", "type", "use", "var", "void", "while", "yield",
    // SQL and Dockerfile keywords are conventionally upper case
    "SELECT", "FROM", "WHERE", "GROUP", "ORDER", "BY", "JOIN", "INSERT", "UPDATE", "DELETE",
    "RUN", "COPY", "CMD", "ENTRYPOINT", "EXPOSE", "ENV", "WORKDIR",
];

const COMMENT_PREFIXES: &[&str] = &["//", "#", "--"];

/// Language-agnostic highlighter: comments, quoted strings and a shared
/// keyword list.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordHighlighter;

impl KeywordHighlighter {
    fn highlight_line(line: &str, palette: &ColorPalette) -> Line<'static> {
        let trimmed = line.trim_start();
        if COMMENT_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            return Line::from(Span::styled(line.to_string(), palette.code_comment));
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut plain = String::new();
        let mut chars = line.char_indices().peekable();

        let flush_plain = |plain: &mut String, spans: &mut Vec<Span<'static>>| {
            if !plain.is_empty() {
                spans.push(Span::styled(std::mem::take(plain), palette.reader_code_block));
            }
        };

        while let Some((start, c)) = chars.next() {
            if c == '"' || c == '\'' {
                flush_plain(&mut plain, &mut spans);
                let mut end = line.len();
                let mut escaped = false;
                for (idx, next) in chars.by_ref() {
                    if !escaped && next == c {
                        end = idx + next.len_utf8();
                        break;
                    }
                    escaped = !escaped && next == '\\';
                }
                spans.push(Span::styled(line[start..end].to_string(), palette.code_string));
            } else if c.is_alphabetic() || c == '_' {
                let mut end = start + c.len_utf8();
                while let Some(&(idx, next)) = chars.peek() {
                    if !(next.is_alphanumeric() || next == '_') {
                        break;
                    }
                    end = idx + next.len_utf8();
                    chars.next();
                }
                let word = &line[start..end];
                if KEYWORDS.contains(&word) {
                    flush_plain(&mut plain, &mut spans);
                    spans.push(Span::styled(word.to_string(), palette.code_keyword));
                } else {
                    plain.push_str(word);
                }
            } else {
                plain.push(c);
            }
        }
        flush_plain(&mut plain, &mut spans);

        if spans.is_empty() {
            return Line::from(Span::styled(String::new(), palette.reader_code_block));
        }
        Line::from(spans)
    }
}

impl Highlighter for KeywordHighlighter {
    fn highlight(&self, post: &mut RenderedPost, palette: &ColorPalette) {
        for block in &post.code_blocks {
            // Rebuild from the literal code so repeated passes are stable
            for (offset, source) in block.code.lines().enumerate().take(block.len) {
                if let Some(line) = post.lines.get_mut(block.start + offset) {
                    *line = Self::highlight_line(source, palette);
                }
            }
        }
    }
}
