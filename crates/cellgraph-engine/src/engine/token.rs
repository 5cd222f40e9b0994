//! Formula tokenizer.
//!
//! Splits formula text into lexemes. Recognized tokens are parentheses, the
//! four arithmetic operators, variables (`[a-zA-Z]+[0-9]+`) and decimal
//! literals with an optional exponent. Whitespace only separates tokens.
//! Any other run of characters becomes an [`Lexeme::Invalid`] lexeme; the
//! tokenizer never fails, validation happens in [`super::Formula::new`].

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::cell_name::VARIABLE_PATTERN;

/// Arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn from_symbol(symbol: &str) -> Option<Operator> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            "*" => Some(Operator::Multiply),
            "/" => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// True for `*` and `/`.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }
}

/// A valid formula token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    /// Canonical (upper-case) variable name.
    Variable(String),
    Operator(Operator),
    LeftParen,
    RightParen,
}

impl Token {
    /// Number, variable or closing paren: something that ends an operand.
    pub(crate) fn ends_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Variable(_) | Token::RightParen)
    }

    /// Number, variable or opening paren: something that can start an operand.
    pub(crate) fn starts_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Variable(_) | Token::LeftParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Variable(name) => f.write_str(name),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
        }
    }
}

/// One unit of tokenizer output.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme<'a> {
    Token(Token),
    /// Text matching no token pattern.
    Invalid(&'a str),
    /// A numeric literal too large to represent as a finite f64.
    OutOfRange(&'a str),
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        let pattern = format!(
            r"(?x)
            (?P<lp>\() |
            (?P<rp>\)) |
            (?P<op>[+\-*/]) |
            (?P<var>{VARIABLE_PATTERN}) |
            (?P<num>(?:[0-9]+\.[0-9]*|[0-9]*\.[0-9]+|[0-9]+)(?:[eE][+-]?[0-9]+)?) |
            (?P<ws>\s+)"
        );
        Regex::new(&pattern).expect("formula token regex must compile")
    })
}

/// Split a formula into lexemes, left to right, dropping whitespace.
pub fn tokenize(formula: &str) -> Vec<Lexeme<'_>> {
    let mut lexemes = Vec::new();
    let mut last_end = 0;

    for caps in token_re().captures_iter(formula) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last_end {
            lexemes.push(Lexeme::Invalid(&formula[last_end..whole.start()]));
        }
        last_end = whole.end();

        let text = whole.as_str();
        let lexeme = if caps.name("ws").is_some() {
            continue;
        } else if caps.name("lp").is_some() {
            Lexeme::Token(Token::LeftParen)
        } else if caps.name("rp").is_some() {
            Lexeme::Token(Token::RightParen)
        } else if let Some(op) = caps.name("op").and_then(|m| Operator::from_symbol(m.as_str())) {
            Lexeme::Token(Token::Operator(op))
        } else if caps.name("var").is_some() {
            Lexeme::Token(Token::Variable(text.to_ascii_uppercase()))
        } else {
            match text.parse::<f64>() {
                Ok(n) if n.is_finite() => Lexeme::Token(Token::Number(n)),
                _ => Lexeme::OutOfRange(text),
            }
        };
        lexemes.push(lexeme);
    }

    if last_end < formula.len() {
        lexemes.push(Lexeme::Invalid(&formula[last_end..]));
    }

    lexemes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(formula: &str) -> Vec<Lexeme<'_>> {
        tokenize(formula)
    }

    #[test]
    fn test_tokenize_simple_expression() {
        assert_eq!(
            tokens("a1 + 2.5*(B2)"),
            vec![
                Lexeme::Token(Token::Variable("A1".into())),
                Lexeme::Token(Token::Operator(Operator::Add)),
                Lexeme::Token(Token::Number(2.5)),
                Lexeme::Token(Token::Operator(Operator::Multiply)),
                Lexeme::Token(Token::LeftParen),
                Lexeme::Token(Token::Variable("B2".into())),
                Lexeme::Token(Token::RightParen),
            ]
        );
    }

    #[test]
    fn test_tokenize_whitespace_only_is_empty() {
        assert!(tokens("").is_empty());
        assert!(tokens("  \t\n").is_empty());
    }

    #[test]
    fn test_tokenize_number_forms() {
        assert_eq!(tokens("3e-6"), vec![Lexeme::Token(Token::Number(3e-6))]);
        assert_eq!(tokens(".5"), vec![Lexeme::Token(Token::Number(0.5))]);
        assert_eq!(tokens("5."), vec![Lexeme::Token(Token::Number(5.0))]);
        assert_eq!(tokens("4E3"), vec![Lexeme::Token(Token::Number(4000.0))]);
    }

    #[test]
    fn test_tokenize_invalid_runs() {
        assert_eq!(tokens("@"), vec![Lexeme::Invalid("@")]);
        assert_eq!(tokens("thing"), vec![Lexeme::Invalid("thing")]);
        assert_eq!(
            tokens("a1$ + 3"),
            vec![
                Lexeme::Token(Token::Variable("A1".into())),
                Lexeme::Invalid("$"),
                Lexeme::Token(Token::Operator(Operator::Add)),
                Lexeme::Token(Token::Number(3.0)),
            ]
        );
    }

    #[test]
    fn test_tokenize_letters_then_number_split() {
        // "2x" is a number followed by an invalid lexeme, not a variable.
        assert_eq!(
            tokens("2x"),
            vec![Lexeme::Token(Token::Number(2.0)), Lexeme::Invalid("x")]
        );
    }

    #[test]
    fn test_tokenize_huge_literal_is_out_of_range() {
        assert_eq!(tokens("1e999"), vec![Lexeme::OutOfRange("1e999")]);
    }
}
