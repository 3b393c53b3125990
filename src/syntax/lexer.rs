//! Hand-rolled scanner. Produces one token per call; lexical faults are
//! reported as `ParseError` so the whole syntax phase shares one error
//! surface.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::errors::ParseError;
use crate::syntax::token::{Span, Token, TokenKind};

pub struct Lexer<'src> {
    src: &'src str,
    chars: Peekable<CharIndices<'src>>,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();

        let Some((start, ch)) = self.chars.next() else {
            let end = self.src.len();
            return Ok(Token {
                kind: TokenKind::Eof,
                span: Span { start: end, end },
            });
        };

        let kind = match ch {
            '=' => {
                if self.eat('=') {
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '"' => return self.read_string(start),
            ch if ch.is_ascii_digit() => return self.read_integer(start),
            ch if is_ident_start(ch) => return Ok(self.read_identifier(start)),
            ch => {
                return Err(ParseError::IllegalCharacter {
                    character: ch,
                    span: Span {
                        start,
                        end: start + ch.len_utf8(),
                    }
                    .into(),
                })
            }
        };

        Ok(Token {
            kind,
            span: Span {
                start,
                end: self.position(),
            },
        })
    }

    fn skip_whitespace(&mut self) {
        while self
            .chars
            .peek()
            .is_some_and(|(_, ch)| ch.is_whitespace())
        {
            self.chars.next();
        }
    }

    /// Consumes the next char iff it equals `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek().is_some_and(|&(_, ch)| ch == expected) {
            self.chars.next();
            return true;
        }
        false
    }

    /// Byte offset just past the last consumed char.
    fn position(&mut self) -> usize {
        self.chars.peek().map_or(self.src.len(), |&(i, _)| i)
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self.chars.peek().is_some_and(|&(_, ch)| is_ident_char(ch)) {
            self.chars.next();
        }
        let end = self.position();
        Token {
            kind: TokenKind::from_ident(&self.src[start..end]),
            span: Span { start, end },
        }
    }

    fn read_integer(&mut self, start: usize) -> Result<Token, ParseError> {
        while self
            .chars
            .peek()
            .is_some_and(|(_, ch)| ch.is_ascii_digit())
        {
            self.chars.next();
        }
        let end = self.position();
        let literal = &self.src[start..end];
        let value = literal
            .parse::<i64>()
            .map_err(|_| ParseError::IntegerOutOfRange {
                literal: literal.to_string(),
                span: Span { start, end }.into(),
            })?;
        Ok(Token {
            kind: TokenKind::Int(value),
            span: Span { start, end },
        })
    }

    fn read_string(&mut self, start: usize) -> Result<Token, ParseError> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => break,
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    // Unknown escapes pass the character through untouched.
                    Some((_, other)) => value.push(other),
                    None => {
                        return Err(ParseError::UnterminatedString {
                            span: Span {
                                start,
                                end: start + 1,
                            }
                            .into(),
                        })
                    }
                },
                Some((_, ch)) => value.push(ch),
                None => {
                    return Err(ParseError::UnterminatedString {
                        span: Span {
                            start,
                            end: start + 1,
                        }
                        .into(),
                    })
                }
            }
        }
        Ok(Token {
            kind: TokenKind::Str(value),
            span: Span {
                start,
                end: self.position(),
            },
        })
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
