//! Row filter expressions.
//!
//! Supports the dataframe-query subset the location sources are filtered
//! with, e.g. `` `Country/Region` == 'United Kingdom' ``:
//!
//! - column references, backtick-quoted or bare identifiers
//! - string literals (single or double quotes) and numeric literals
//! - `==` and `!=`
//! - `and` / `&`, `or` / `|`, `not` / `~`, and parentheses
//!
//! An empty filter matches every row.

use crate::error::DatasetError;
use crate::table::Row;

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Compare {
        column: String,
        op: CompareOp,
        value: Literal,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

/// A parsed boolean row filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    source: String,
    expr: Option<Expr>,
}

impl Predicate {
    /// Parses a filter expression.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidFilter`] when the expression does not parse.
    pub fn parse(source: &str) -> Result<Self, DatasetError> {
        let invalid = |reason: String| DatasetError::InvalidFilter {
            filter: source.to_string(),
            reason,
        };

        let tokens = tokenize(source).map_err(invalid)?;
        if tokens.is_empty() {
            return Ok(Self {
                source: source.to_string(),
                expr: None,
            });
        }

        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.parse_or().map_err(invalid)?;
        if let Some(token) = parser.peek() {
            return Err(invalid(format!("unexpected trailing token {token:?}")));
        }

        Ok(Self {
            source: source.to_string(),
            expr: Some(expr),
        })
    }

    /// A filter that keeps every row.
    #[must_use]
    pub fn all() -> Self {
        Self {
            source: String::new(),
            expr: None,
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Column names referenced by the filter, in first-mention order.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(expr) = &self.expr {
            collect_columns(expr, &mut out);
        }
        out
    }

    /// Checks every referenced column against the table headers.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnknownColumn`] for the first column the
    /// headers do not contain.
    pub fn validate(&self, headers: &[String]) -> Result<(), DatasetError> {
        match self
            .columns()
            .into_iter()
            .find(|col| !headers.iter().any(|h| h == col))
        {
            Some(missing) => Err(DatasetError::UnknownColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        self.expr.as_ref().is_none_or(|expr| eval(expr, row))
    }
}

fn collect_columns<'a>(expr: &'a Expr, out: &mut Vec<&'a str>) {
    match expr {
        Expr::Compare { column, .. } => {
            if !out.contains(&column.as_str()) {
                out.push(column);
            }
        }
        Expr::And(lhs, rhs) | Expr::Or(lhs, rhs) => {
            collect_columns(lhs, out);
            collect_columns(rhs, out);
        }
        Expr::Not(inner) => collect_columns(inner, out),
    }
}

#[allow(clippy::float_cmp)]
fn eval(expr: &Expr, row: &Row) -> bool {
    match expr {
        Expr::Compare { column, op, value } => {
            let cell = row.get(column).unwrap_or_default();
            let equal = match value {
                Literal::Text(text) => cell == text.as_str(),
                Literal::Number(n) => cell.trim().parse::<f64>().is_ok_and(|v| v == *n),
            };
            match op {
                CompareOp::Eq => equal,
                CompareOp::Ne => !equal,
            }
        }
        Expr::And(lhs, rhs) => eval(lhs, row) && eval(rhs, row),
        Expr::Or(lhs, rhs) => eval(lhs, row) || eval(rhs, row),
        Expr::Not(inner) => !eval(inner, row),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Column(String),
    Text(String),
    Number(f64),
    Eq,
    Ne,
    And,
    Or,
    Not,
    LParen,
    RParen,
}

fn tokenize(source: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(idx, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '`' | '\'' | '"' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    if c == ch {
                        closed = true;
                        break;
                    }
                    if c == '\\' && ch != '`' {
                        if let Some((_, escaped)) = chars.next() {
                            text.push(escaped);
                        }
                        continue;
                    }
                    text.push(c);
                }
                if !closed {
                    return Err(format!("unterminated quote starting at offset {idx}"));
                }
                tokens.push(if ch == '`' {
                    Token::Column(text)
                } else {
                    Token::Text(text)
                });
            }
            '=' | '!' => {
                chars.next();
                match chars.next() {
                    Some((_, '=')) => tokens.push(if ch == '=' { Token::Eq } else { Token::Ne }),
                    _ => return Err(format!("expected '=' after '{ch}' at offset {idx}")),
                }
            }
            '&' => {
                chars.next();
                tokens.push(Token::And);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Or);
            }
            '~' => {
                chars.next();
                tokens.push(Token::Not);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            c if c.is_ascii_digit() || c == '-' || c == '.' => {
                let mut text = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '-' || c == '.' || c == 'e' || c == 'E' {
                        text.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = text
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number {text:?} at offset {idx}"))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(match word.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    _ => Token::Column(word),
                });
            }
            other => return Err(format!("unexpected character {other:?} at offset {idx}")),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn parse_or(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_not()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.parse_not()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Expr, String> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            return Ok(Expr::Not(Box::new(self.parse_not()?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let inner = self.parse_or()?;
            return match self.next() {
                Some(Token::RParen) => Ok(inner),
                other => Err(format!("expected ')', found {other:?}")),
            };
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, String> {
        let lhs = self.next().ok_or("expected a comparison, found end of input")?;
        let op = match self.next() {
            Some(Token::Eq) => CompareOp::Eq,
            Some(Token::Ne) => CompareOp::Ne,
            other => return Err(format!("expected '==' or '!=', found {other:?}")),
        };
        let rhs = self
            .next()
            .ok_or("expected a value after comparison operator")?;

        let (column, value) = match (lhs, rhs) {
            (Token::Column(column), value) | (value, Token::Column(column)) => (column, value),
            (lhs, rhs) => return Err(format!("comparison needs a column: {lhs:?} vs {rhs:?}")),
        };
        let value = match value {
            Token::Text(text) => Literal::Text(text),
            Token::Number(n) => Literal::Number(n),
            Token::Column(other) => {
                return Err(format!("column-to-column comparison is not supported ({other})"))
            }
            other => return Err(format!("expected a literal, found {other:?}")),
        };

        Ok(Expr::Compare { column, op, value })
    }
}
