//! Column-tracking markup sink
//!
//! Text is written in chunks. The writer remembers the output column and a
//! nominal indent; a chunk written at the start of a line is preceded by
//! the indent, and a "pretty" chunk whose next word would pass
//! [`LINE_WIDTH`] is moved to a fresh indented line instead.

use std::borrow::Cow;

use super::defaults::{LINE_WIDTH, TAB_WIDTH};

/// Which characters get replaced by entities
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Escape {
    None,
    /// `& < >`
    CharData,
    /// `& < > '`
    SingleQuoted,
    /// `& < > "`
    DoubleQuoted,
    /// `& < > " '`
    PcData,
}

impl Escape {
    fn specials(self) -> &'static [char] {
        match self {
            Escape::None => &[],
            Escape::CharData => &['&', '<', '>'],
            Escape::SingleQuoted => &['&', '<', '>', '\''],
            Escape::DoubleQuoted => &['&', '<', '>', '"'],
            Escape::PcData => &['&', '<', '>', '"', '\''],
        }
    }
}

fn entity(c: char) -> &'static str {
    match c {
        '&' => "&amp;",
        '<' => "&lt;",
        '>' => "&gt;",
        '"' => "&quot;",
        _ => "&apos;",
    }
}

/// Control characters are not allowed in XML 1.0 character data
fn strip_controls(text: &str) -> Cow<'_, str> {
    let bad = |c: char| c.is_control() && !matches!(c, '\t' | '\n' | '\r') && (c as u32) < 0x20;
    if text.contains(bad) {
        Cow::Owned(text.chars().filter(|&c| !bad(c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

#[derive(Debug, Default)]
pub struct OutputWriter {
    out: String,
    /// `None` at the start of a line, before the indent is written
    column: Option<usize>,
    indent: usize,
}

impl OutputWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn push_indent(&mut self, by: usize) {
        self.indent += by;
    }

    pub fn pop_indent(&mut self, by: usize) {
        self.indent = self.indent.saturating_sub(by);
    }

    /// Write without wrapping or escaping
    pub fn raw(&mut self, text: &str) {
        self.chunk(text, false);
    }

    /// Write, wrapping words that would pass the line width
    pub fn pretty(&mut self, text: &str) {
        self.chunk(text, true);
    }

    /// Write with entity escaping and control characters removed
    pub fn escaped(&mut self, text: &str, escape: Escape, pretty: bool) {
        let text = strip_controls(text);
        let specials = escape.specials();
        let mut rest: &str = &text;
        while let Some(at) = rest.find(specials) {
            let (plain, tail) = rest.split_at(at);
            self.chunk(plain, pretty);
            let mut chars = tail.chars();
            if let Some(c) = chars.next() {
                self.chunk(entity(c), pretty);
            }
            rest = chars.as_str();
        }
        self.chunk(rest, pretty);
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    fn write_indent(&mut self, columns: usize) {
        let mut left = columns;
        let mut written = 0;
        while left > 0 && written < LINE_WIDTH {
            if left >= TAB_WIDTH {
                self.out.push('\t');
                left -= TAB_WIDTH;
            } else {
                self.out.push(' ');
                left -= 1;
            }
            written += 1;
        }
    }

    fn chunk(&mut self, text: &str, pretty: bool) {
        let mut rest = text;
        while !rest.is_empty() {
            let start = match self.column {
                Some(c) => c,
                None => {
                    self.write_indent(self.indent);
                    self.indent
                }
            };

            let mut column = start;
            let gap = rest.find(|c| c != ' ' && c != '\t').unwrap_or(rest.len());
            for c in rest[..gap].chars() {
                column += if c == '\t' { TAB_WIDTH - column % TAB_WIDTH } else { 1 };
            }
            let (space, tail) = rest.split_at(gap);

            if let Some(after) = tail.strip_prefix('\n') {
                self.out.push('\n');
                self.column = None;
                rest = after;
                continue;
            }

            let word_len = tail.find([' ', '\t', '\n']).unwrap_or(tail.len());
            let (word, after) = tail.split_at(word_len);
            let word_width = word.chars().count();
            column += word_width;

            if pretty && column > LINE_WIDTH {
                if start > 0 {
                    self.out.push('\n');
                }
                let wrapped = if word_width > LINE_WIDTH { 0 } else { self.indent };
                self.write_indent(wrapped);
                self.out.push_str(word);
                self.column = Some(wrapped + word_width);
            } else {
                self.out.push_str(space);
                self.out.push_str(word);
                self.column = Some(column);
            }
            rest = after;
        }
    }
}
