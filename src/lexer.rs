//! Splits source text into tokens.
//!
//! The lexer is a single left-to-right pass over the characters of the
//! source. Parentheses are always tokens of their own, a double-quoted
//! string is one token including both quotes (embedded whitespace and
//! parentheses included), and every other run of characters up to the next
//! whitespace, parenthesis or quote is one token. Tokens carry no type; the
//! parser decides what they mean.

use std::fmt;

use crate::LexError;

/// One lexical unit and the byte offset where it starts in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    offset: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, offset: usize) -> Self {
        Token {
            text: text.into(),
            offset,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn is_open(&self) -> bool {
        self.text == "("
    }

    pub(crate) fn is_close(&self) -> bool {
        self.text == ")"
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Accumulates the characters of the token currently being scanned.
struct Pending {
    start: usize,
    text: String,
}

impl Pending {
    fn new() -> Self {
        Pending {
            start: 0,
            text: String::new(),
        }
    }

    fn push(&mut self, offset: usize, c: char) {
        if self.text.is_empty() {
            self.start = offset;
        }
        self.text.push(c);
    }

    /// Emit the pending token, if any, and reset.
    fn flush(&mut self, tokens: &mut Vec<Token>) {
        if !self.text.is_empty() {
            tokens.push(Token::new(std::mem::take(&mut self.text), self.start));
        }
    }
}

/// Tokenize a program string.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut pending = Pending::new();
    let mut inside_string = false;

    for (offset, c) in source.char_indices() {
        if inside_string {
            pending.push(offset, c);
            if c == '"' {
                inside_string = false;
                pending.flush(&mut tokens);
            }
            continue;
        }

        match c {
            '(' | ')' => {
                pending.flush(&mut tokens);
                tokens.push(Token::new(c, offset));
            }
            '"' => {
                pending.flush(&mut tokens);
                inside_string = true;
                pending.push(offset, c);
            }
            c if is_separator(c) => pending.flush(&mut tokens),
            c => pending.push(offset, c),
        }
    }

    if inside_string {
        return Err(LexError::UnterminatedString {
            offset: pending.start,
        });
    }
    pending.flush(&mut tokens);

    tracing::trace!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}
