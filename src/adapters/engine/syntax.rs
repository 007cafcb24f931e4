//! Minimal Kotlin lexing
//!
//! Classifies every byte of a source file as code, comment or string literal
//! and checks that braces balance. This is all the builtin rules need.

use crate::core::ports::EngineError;

/// What a byte belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Ordinary code
    Code,
    /// Line or block comment
    Comment,
    /// String or character literal
    Str,
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Str,
    RawStr,
    Template(usize),
}

/// A lexed source file
#[derive(Debug, Clone)]
pub struct Source<'a> {
    text: &'a str,
    kinds: Vec<Kind>,
    line_starts: Vec<usize>,
}

/// One line of a [`Source`]
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    /// 1-based line number
    pub number: usize,
    /// Byte offset of the first character
    pub start: usize,
    /// Content without the line terminator
    pub content: &'a str,
}

impl<'a> Source<'a> {
    /// Lex `text`
    ///
    /// Fails on unbalanced braces or unterminated literals and comments.
    pub fn parse(text: &'a str) -> Result<Self, EngineError> {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        let mut source = Self {
            text,
            kinds: vec![Kind::Code; text.len()],
            line_starts,
        };
        source.classify()?;
        Ok(source)
    }

    /// The source text
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Classification of the byte at `offset`; past the end counts as code
    #[must_use]
    pub fn kind(&self, offset: usize) -> Kind {
        self.kinds.get(offset).copied().unwrap_or(Kind::Code)
    }

    /// Whether the byte at `offset` is code
    #[must_use]
    pub fn is_code(&self, offset: usize) -> bool {
        self.kind(offset) == Kind::Code
    }

    /// 1-based `(line, col)` of a byte offset, columns counted in characters
    #[must_use]
    pub fn position(&self, offset: usize) -> (i32, i32) {
        let line = self.line_starts.partition_point(|&start| start <= offset).max(1);
        let start = self.line_starts[line - 1];
        let col = self.text.get(start..offset).map_or(0, |s| s.chars().count()) + 1;
        (to_i32(line), to_i32(col))
    }

    /// Lines with their offsets; a trailing newline does not start a new line
    pub fn lines(&self) -> impl Iterator<Item = Line<'a>> + '_ {
        let text = self.text;
        self.line_starts
            .iter()
            .enumerate()
            .filter(move |(_, start)| **start < text.len())
            .map(move |(index, &start)| {
                let end = text[start..].find('\n').map_or(text.len(), |i| start + i);
                Line {
                    number: index + 1,
                    start,
                    content: text[start..end].trim_end_matches('\r'),
                }
            })
    }

    /// The text with every non-code byte replaced by a space
    #[must_use]
    pub fn code_only(&self, start: usize, end: usize) -> String {
        self.text
            .get(start..end)
            .unwrap_or_default()
            .char_indices()
            .map(|(i, c)| if self.is_code(start + i) { c } else { ' ' })
            .collect()
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> EngineError {
        let (line, col) = self.position(offset);
        EngineError::Parse {
            line,
            col,
            message: message.into(),
        }
    }

    fn mark(&mut self, start: usize, end: usize, kind: Kind) {
        let end = end.min(self.kinds.len());
        for slot in &mut self.kinds[start..end] {
            *slot = kind;
        }
    }

    fn classify(&mut self) -> Result<(), EngineError> {
        let bytes = self.text.as_bytes();
        let at = |i: usize, pattern: &[u8]| bytes.get(i..i + pattern.len()) == Some(pattern);

        let mut frames: Vec<(Frame, usize)> = Vec::new();
        let mut braces: Vec<usize> = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            match frames.last().copied() {
                None | Some((Frame::Template(_), _)) => {
                    if at(i, b"//") {
                        let end = self.text[i..].find('\n').map_or(bytes.len(), |n| i + n);
                        self.mark(i, end, Kind::Comment);
                        i = end;
                    } else if at(i, b"/*") {
                        let end = block_comment_end(bytes, i).ok_or_else(|| self.error(i, "Unclosed comment"))?;
                        self.mark(i, end, Kind::Comment);
                        i = end;
                    } else if at(i, b"\"\"\"") {
                        frames.push((Frame::RawStr, i));
                        self.mark(i, i + 3, Kind::Str);
                        i += 3;
                    } else if bytes[i] == b'"' {
                        frames.push((Frame::Str, i));
                        self.mark(i, i + 1, Kind::Str);
                        i += 1;
                    } else if bytes[i] == b'\'' {
                        let end = char_literal_end(bytes, i).ok_or_else(|| self.error(i, "Unclosed character literal"))?;
                        self.mark(i, end, Kind::Str);
                        i = end;
                    } else if bytes[i] == b'{' {
                        match frames.last_mut() {
                            Some((Frame::Template(depth), _)) => *depth += 1,
                            _ => braces.push(i),
                        }
                        i += 1;
                    } else if bytes[i] == b'}' {
                        match frames.last_mut() {
                            Some((Frame::Template(0), _)) => {
                                frames.pop();
                                self.mark(i, i + 1, Kind::Str);
                            },
                            Some((Frame::Template(depth), _)) => *depth -= 1,
                            _ => {
                                if braces.pop().is_none() {
                                    return Err(self.error(i, "Unexpected '}'"));
                                }
                            },
                        }
                        i += 1;
                    } else {
                        i += 1;
                    }
                },
                Some((frame @ (Frame::Str | Frame::RawStr), start)) => {
                    let raw = matches!(frame, Frame::RawStr);
                    if raw && at(i, b"\"\"\"") {
                        let mut end = i + 3;
                        while bytes.get(end) == Some(&b'"') {
                            end += 1;
                        }
                        self.mark(i, end, Kind::Str);
                        frames.pop();
                        i = end;
                    } else if at(i, b"${") {
                        self.mark(i, i + 2, Kind::Str);
                        frames.push((Frame::Template(0), i));
                        i += 2;
                    } else if !raw && bytes[i] == b'\\' {
                        self.mark(i, i + 2, Kind::Str);
                        i += 2;
                    } else if !raw && bytes[i] == b'"' {
                        self.mark(i, i + 1, Kind::Str);
                        frames.pop();
                        i += 1;
                    } else if !raw && bytes[i] == b'\n' {
                        return Err(self.error(start, "Unclosed string literal"));
                    } else {
                        self.mark(i, i + 1, Kind::Str);
                        i += 1;
                    }
                },
            }
        }

        if let Some((_, start)) = frames.last() {
            return Err(self.error(*start, "Unclosed string literal"));
        }
        if let Some(open) = braces.last() {
            return Err(self.error(*open, "Missing '}'"));
        }
        Ok(())
    }
}

/// Offset just past a (possibly nested) block comment starting at `start`
fn block_comment_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = start;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            },
            (b'*', b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return Some(i);
                }
            },
            _ => i += 1,
        }
    }
    None
}

/// Offset just past a character literal starting at `start`
fn char_literal_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\'' => return Some(i + 1),
            b'\n' => return None,
            _ => i += 1,
        }
    }
    None
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
