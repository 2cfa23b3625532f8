//! SQL tokenizer adapter
//!
//! The substitution engine never parses SQL itself; it consumes a token
//! stream from a [`SqlTokenizer`] and only rewrites tokens flagged as
//! literal candidates. The default [`GenericSqlTokenizer`] is a total,
//! best-effort lexer: anything it cannot classify comes back as a
//! pass-through token, so joining the stream always reproduces the
//! statement byte for byte.

use crate::domain::result::Result;

/// Quoting applied to a literal token in the source statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `'value'`
    Single,
    /// `"value"`
    Double,
    /// Bare token, no quote layer
    None,
}

impl QuoteStyle {
    /// Wraps a replacement value in this quote style
    pub fn wrap(&self, value: &str) -> String {
        match self {
            QuoteStyle::Single => format!("'{value}'"),
            QuoteStyle::Double => format!("\"{value}\""),
            QuoteStyle::None => value.to_string(),
        }
    }
}

/// One token of a statement, carrying its exact source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlToken {
    /// Exact source slice, quotes included
    pub text: String,
    /// True when the token may be looked up in the mapping tables
    pub is_literal: bool,
    /// Quote layer around the token, if any
    pub quote_style: QuoteStyle,
}

impl SqlToken {
    /// Token that is emitted unchanged
    pub fn passthrough(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_literal: false,
            quote_style: QuoteStyle::None,
        }
    }

    /// Literal candidate token
    pub fn literal(text: impl Into<String>, quote_style: QuoteStyle) -> Self {
        Self {
            text: text.into(),
            is_literal: true,
            quote_style,
        }
    }

    /// The token text with its quote layer stripped
    pub fn unquoted(&self) -> &str {
        match self.quote_style {
            QuoteStyle::Single | QuoteStyle::Double if self.text.len() >= 2 => {
                &self.text[1..self.text.len() - 1]
            }
            _ => &self.text,
        }
    }
}

/// Splits a statement into substitution-ready tokens
///
/// Implementations must be lossless: concatenating the returned token
/// texts reproduces the input exactly. A tokenizer that cannot produce a
/// stream at all returns an error, which the substituter downgrades to
/// pass-through.
pub trait SqlTokenizer: Send + Sync {
    fn tokenize(&self, statement: &str) -> Result<Vec<SqlToken>>;
}

/// Words never treated as literal candidates, sorted for binary search
const KEYWORDS: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "AS", "ASC", "AVG", "BETWEEN", "BY", "CASE", "CAST", "COLUMN",
    "COUNT", "CREATE", "CROSS", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXISTS",
    "FROM", "FULL", "GROUP", "HAVING", "IN", "INDEX", "INNER", "INSERT", "INTO", "IS", "JOIN",
    "LEFT", "LIKE", "LIMIT", "MAX", "MIN", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER",
    "RIGHT", "SELECT", "SET", "SUM", "TABLE", "THEN", "UNION", "UPDATE", "VALUES", "VIEW",
    "WHEN", "WHERE",
];

fn is_keyword(word: &str) -> bool {
    KEYWORDS
        .binary_search(&word.to_ascii_uppercase().as_str())
        .is_ok()
}

/// Default whitespace/comment/string-aware lexer
///
/// Strings honor the doubled-quote escape (`'O''Brien'`). Bare words
/// that are not SQL keywords are literal candidates with
/// [`QuoteStyle::None`], matching how unquoted predicate values like
/// `name = infosys` are written. An unterminated string or comment
/// degrades to a pass-through token covering the rest of the input.
#[derive(Debug, Default)]
pub struct GenericSqlTokenizer;

impl GenericSqlTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl SqlTokenizer for GenericSqlTokenizer {
    fn tokenize(&self, statement: &str) -> Result<Vec<SqlToken>> {
        let chars: Vec<(usize, char)> = statement.char_indices().collect();
        let n = chars.len();
        let slice = |from: usize, to: usize| -> &str {
            let start = chars[from].0;
            let end = if to < n { chars[to].0 } else { statement.len() };
            &statement[start..end]
        };

        let mut tokens = Vec::new();
        let mut i = 0;
        while i < n {
            let c = chars[i].1;

            if c.is_whitespace() {
                let mut j = i + 1;
                while j < n && chars[j].1.is_whitespace() {
                    j += 1;
                }
                tokens.push(SqlToken::passthrough(slice(i, j)));
                i = j;
            } else if c == '\'' || c == '"' {
                let quote = c;
                let mut j = i + 1;
                let mut terminated = false;
                while j < n {
                    if chars[j].1 == quote {
                        if j + 1 < n && chars[j + 1].1 == quote {
                            // doubled quote escape stays inside the token
                            j += 2;
                            continue;
                        }
                        j += 1;
                        terminated = true;
                        break;
                    }
                    j += 1;
                }
                if terminated {
                    let style = if quote == '\'' {
                        QuoteStyle::Single
                    } else {
                        QuoteStyle::Double
                    };
                    tokens.push(SqlToken::literal(slice(i, j), style));
                } else {
                    tokens.push(SqlToken::passthrough(slice(i, j)));
                }
                i = j;
            } else if c == '-' && i + 1 < n && chars[i + 1].1 == '-' {
                let mut j = i + 2;
                while j < n && chars[j].1 != '\n' {
                    j += 1;
                }
                tokens.push(SqlToken::passthrough(slice(i, j)));
                i = j;
            } else if c == '/' && i + 1 < n && chars[i + 1].1 == '*' {
                // unterminated block comments swallow the rest of the input
                let mut j = i + 2;
                while j < n {
                    if chars[j].1 == '*' && j + 1 < n && chars[j + 1].1 == '/' {
                        j += 2;
                        break;
                    }
                    j += 1;
                }
                tokens.push(SqlToken::passthrough(slice(i, j)));
                i = j;
            } else if c.is_ascii_digit() {
                let mut j = i + 1;
                while j < n && (chars[j].1.is_ascii_digit() || chars[j].1 == '.') {
                    j += 1;
                }
                tokens.push(SqlToken::literal(slice(i, j), QuoteStyle::None));
                i = j;
            } else if c.is_alphanumeric() || c == '_' {
                let mut j = i + 1;
                while j < n && (chars[j].1.is_alphanumeric() || chars[j].1 == '_') {
                    j += 1;
                }
                let word = slice(i, j);
                if is_keyword(word) {
                    tokens.push(SqlToken::passthrough(word));
                } else {
                    tokens.push(SqlToken::literal(word, QuoteStyle::None));
                }
                i = j;
            } else {
                tokens.push(SqlToken::passthrough(slice(i, i + 1)));
                i += 1;
            }
        }

        Ok(tokens)
    }
}
