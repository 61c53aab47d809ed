//! Token classification for colouring generated Cypher.
//!
//! This is a display-only scanner: it never rejects input, and concatenating
//! the returned token texts always reproduces the source string.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Property,
    Label,
    RelationshipType,
    String,
    Number,
    Parameter,
    Comment,
    Punctuation,
    Whitespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CypherToken<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

const KEYWORDS: &[&str] = &[
    "ALL", "AND", "AS", "ASC", "ASCENDING", "BY", "CALL", "CASE", "CONTAINS", "CREATE", "DELETE",
    "DESC", "DESCENDING", "DETACH", "DISTINCT", "ELSE", "END", "ENDS", "EXISTS", "FALSE", "IN",
    "IS", "LIMIT", "MATCH", "MERGE", "NOT", "NULL", "ON", "OPTIONAL", "OR", "ORDER", "REMOVE",
    "RETURN", "SET", "SKIP", "STARTS", "THEN", "TRUE", "UNION", "UNWIND", "WHEN", "WHERE", "WITH",
    "XOR", "YIELD",
];

#[must_use]
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(word))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameContext {
    Plain,
    AfterColon,
    AfterDot,
}

struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.source[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.bump();
        }
    }

    fn eat_quoted(&mut self, quote: char) {
        while let Some(ch) = self.bump() {
            if ch == '\\' {
                self.bump();
            } else if ch == quote {
                break;
            }
        }
    }

    fn eat_block_comment(&mut self) {
        while let Some(ch) = self.bump() {
            if ch == '*' && self.peek() == Some('/') {
                self.bump();
                break;
            }
        }
    }

    fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.pos]
    }
}

fn is_name_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[must_use]
pub fn highlight(source: &str) -> Vec<CypherToken<'_>> {
    let mut scanner = Scanner { source, pos: 0 };
    let mut tokens = Vec::new();
    let mut context = NameContext::Plain;
    let mut bracket_depth = 0_usize;
    let mut brace_depth = 0_usize;

    while let Some(ch) = scanner.bump() {
        let start = scanner.pos - ch.len_utf8();
        let kind = match ch {
            c if c.is_whitespace() => {
                scanner.eat_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            '/' if scanner.peek() == Some('/') => {
                scanner.eat_while(|c| c != '\n');
                TokenKind::Comment
            }
            '/' if scanner.peek() == Some('*') => {
                scanner.bump();
                scanner.eat_block_comment();
                TokenKind::Comment
            }
            '\'' | '"' => {
                scanner.eat_quoted(ch);
                TokenKind::String
            }
            '$' => {
                scanner.eat_while(is_name_char);
                TokenKind::Parameter
            }
            '`' => {
                scanner.eat_while(|c| c != '`');
                scanner.bump();
                name_kind(context, bracket_depth, None)
            }
            c if c.is_ascii_digit() => {
                scanner.eat_while(|c| c.is_ascii_digit());
                if scanner.peek() == Some('.')
                    && scanner.peek_second().is_some_and(|c| c.is_ascii_digit())
                {
                    scanner.bump();
                    scanner.eat_while(|c| c.is_ascii_digit());
                }
                TokenKind::Number
            }
            c if is_name_start(c) => {
                scanner.eat_while(is_name_char);
                name_kind(context, bracket_depth, Some(scanner.slice_from(start)))
            }
            _ => TokenKind::Punctuation,
        };

        if kind == TokenKind::Punctuation {
            match ch {
                '[' => bracket_depth += 1,
                ']' => bracket_depth = bracket_depth.saturating_sub(1),
                '{' => brace_depth += 1,
                '}' => brace_depth = brace_depth.saturating_sub(1),
                _ => {}
            }
            context = match ch {
                ':' if brace_depth == 0 => NameContext::AfterColon,
                '|' if bracket_depth > 0 => NameContext::AfterColon,
                '.' => NameContext::AfterDot,
                _ => NameContext::Plain,
            };
        } else if !matches!(kind, TokenKind::Whitespace | TokenKind::Comment) {
            context = NameContext::Plain;
        }

        tokens.push(CypherToken {
            kind,
            text: scanner.slice_from(start),
        });
    }

    tokens
}

fn name_kind(context: NameContext, bracket_depth: usize, word: Option<&str>) -> TokenKind {
    match context {
        NameContext::AfterColon if bracket_depth > 0 => TokenKind::RelationshipType,
        NameContext::AfterColon => TokenKind::Label,
        NameContext::AfterDot => TokenKind::Property,
        NameContext::Plain if word.is_some_and(is_keyword) => TokenKind::Keyword,
        NameContext::Plain => TokenKind::Identifier,
    }
}
