//! Validated infix formulas.
//!
//! A [`Formula`] is built once from text and is always well-formed afterwards:
//! construction runs the tokenizer and checks every syntax rule in a single
//! left-to-right pass. The canonical string (no whitespace, upper-case
//! variables, normalized numbers) defines equality and hashing.
//!
//! Evaluation uses an operand stack and an operator stack. Multiplication and
//! division are resolved as soon as their right operand is known, so `*` and `/`
//! bind tighter than `+` and `-` without precedence climbing.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

use super::token::{Lexeme, Operator, Token, tokenize};

/// A formula string that failed the syntax rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid formula: {reason}")]
pub struct FormulaFormatError {
    pub reason: String,
}

impl FormulaFormatError {
    fn new(reason: impl Into<String>) -> Self {
        FormulaFormatError {
            reason: reason.into(),
        }
    }
}

/// The result of a formula that could not be evaluated.
///
/// This is a value, not a failure of the caller's operation: it is stored as a
/// cell's value and read by dependent formulas like any other value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaError {
    pub reason: String,
}

impl FormulaError {
    pub fn new(reason: impl Into<String>) -> Self {
        FormulaError {
            reason: reason.into(),
        }
    }

    pub(crate) fn undefined_variable() -> Self {
        FormulaError::new("Undefined variable")
    }

    pub(crate) fn division_by_zero() -> Self {
        FormulaError::new("Division by 0")
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Why a lookup capability could not produce a number for a variable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot resolve {name}: {reason}")]
pub struct LookupError {
    pub name: String,
    pub reason: String,
}

impl LookupError {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        LookupError {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// An immutable, syntactically valid formula.
#[derive(Clone, Debug)]
pub struct Formula {
    tokens: Vec<Token>,
    canonical: String,
}

impl Formula {
    /// Parse and validate a formula written in standard infix notation.
    pub fn new(formula: &str) -> Result<Formula, FormulaFormatError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut open_parens = 0usize;
        let mut close_parens = 0usize;

        for lexeme in tokenize(formula) {
            let token = match lexeme {
                Lexeme::Token(token) => token,
                Lexeme::Invalid(text) => {
                    return Err(FormulaFormatError::new(format!(
                        "Invalid token '{text}'. Tokens must be numbers, variables, operators, or parentheses."
                    )));
                }
                Lexeme::OutOfRange(text) => {
                    return Err(FormulaFormatError::new(format!(
                        "Number literal '{text}' is out of range."
                    )));
                }
            };

            match tokens.last() {
                None if !token.starts_operand() => {
                    return Err(FormulaFormatError::new(
                        "The first token must be a number, variable, or opening parenthesis.",
                    ));
                }
                Some(previous) if previous.ends_operand() => {
                    if !matches!(token, Token::Operator(_) | Token::RightParen) {
                        return Err(FormulaFormatError::new(format!(
                            "'{token}' cannot follow '{previous}'; expected an operator or closing parenthesis."
                        )));
                    }
                }
                Some(previous) => {
                    if !token.starts_operand() {
                        return Err(FormulaFormatError::new(format!(
                            "'{token}' cannot follow '{previous}'; expected a number, variable, or opening parenthesis."
                        )));
                    }
                }
                None => {}
            }

            match token {
                Token::LeftParen => open_parens += 1,
                Token::RightParen => {
                    close_parens += 1;
                    if close_parens > open_parens {
                        return Err(FormulaFormatError::new(
                            "Unbalanced parentheses: too many closing parentheses.",
                        ));
                    }
                }
                _ => {}
            }

            tokens.push(token);
        }

        let Some(last) = tokens.last() else {
            return Err(FormulaFormatError::new(
                "The formula must contain at least one token.",
            ));
        };
        if !last.ends_operand() {
            return Err(FormulaFormatError::new(
                "The last token must be a number, variable, or closing parenthesis.",
            ));
        }
        if open_parens != close_parens {
            return Err(FormulaFormatError::new(
                "Unbalanced parentheses: too many opening parentheses.",
            ));
        }

        let canonical = tokens.iter().map(Token::to_string).collect();
        Ok(Formula { tokens, canonical })
    }

    /// The canonical form: no spaces, upper-case variables, normalized numbers.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The distinct canonical variable names referenced by the formula.
    pub fn variables(&self) -> HashSet<String> {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                Token::Variable(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Evaluate the formula, resolving variables through `lookup`.
    ///
    /// `lookup` receives canonical variable names. A failed lookup or a
    /// division by zero ends evaluation with a [`FormulaError`].
    pub fn evaluate<F>(&self, lookup: F) -> Result<f64, FormulaError>
    where
        F: Fn(&str) -> Result<f64, LookupError>,
    {
        let mut stacks = EvalStacks::default();

        for token in &self.tokens {
            match token {
                Token::Number(n) => stacks.push_operand(*n)?,
                Token::Variable(name) => {
                    let value = lookup(name.as_str()).map_err(|err| {
                        log::trace!("formula {}: {}", self.canonical, err);
                        FormulaError::undefined_variable()
                    })?;
                    stacks.push_operand(value)?;
                }
                Token::Operator(op) if op.is_multiplicative() => {
                    stacks.ops.push(Pending::Op(*op));
                }
                Token::Operator(op) => {
                    stacks.resolve_additive()?;
                    stacks.ops.push(Pending::Op(*op));
                }
                Token::LeftParen => stacks.ops.push(Pending::LeftParen),
                Token::RightParen => {
                    stacks.resolve_additive()?;
                    stacks.ops.pop();
                    if let Some(op) = stacks.pending_multiplicative() {
                        stacks.ops.pop();
                        let right = stacks.pop_operand()?;
                        let left = stacks.pop_operand()?;
                        stacks.values.push(apply(left, op, right)?);
                    }
                }
            }
        }

        match stacks.ops.pop() {
            None => stacks.pop_operand(),
            Some(Pending::Op(op)) => {
                let right = stacks.pop_operand()?;
                let left = stacks.pop_operand()?;
                apply(left, op, right)
            }
            Some(Pending::LeftParen) => Err(FormulaError::new("Unbalanced parentheses")),
        }
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Formula {
    type Err = FormulaFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::new(s)
    }
}

/// Operator-stack entry.
#[derive(Clone, Copy, Debug)]
enum Pending {
    Op(Operator),
    LeftParen,
}

#[derive(Default)]
struct EvalStacks {
    values: Vec<f64>,
    ops: Vec<Pending>,
}

impl EvalStacks {
    fn pop_operand(&mut self) -> Result<f64, FormulaError> {
        self.values
            .pop()
            .ok_or_else(|| FormulaError::new("Missing operand"))
    }

    fn pending_multiplicative(&self) -> Option<Operator> {
        match self.ops.last() {
            Some(Pending::Op(op)) if op.is_multiplicative() => Some(*op),
            _ => None,
        }
    }

    /// Push an operand, folding it into a pending `*` or `/`.
    fn push_operand(&mut self, value: f64) -> Result<(), FormulaError> {
        match self.pending_multiplicative() {
            Some(op) => {
                self.ops.pop();
                let left = self.pop_operand()?;
                self.values.push(apply(left, op, value)?);
            }
            None => self.values.push(value),
        }
        Ok(())
    }

    /// Apply a pending `+` or `-` on top of the operator stack.
    fn resolve_additive(&mut self) -> Result<(), FormulaError> {
        if let Some(Pending::Op(op)) = self.ops.last().copied()
            && !op.is_multiplicative()
        {
            self.ops.pop();
            let right = self.pop_operand()?;
            let left = self.pop_operand()?;
            self.values.push(apply(left, op, right)?);
        }
        Ok(())
    }
}

fn apply(left: f64, op: Operator, right: f64) -> Result<f64, FormulaError> {
    match op {
        Operator::Add => Ok(left + right),
        Operator::Subtract => Ok(left - right),
        Operator::Multiply => Ok(left * right),
        Operator::Divide if right == 0.0 => Err(FormulaError::division_by_zero()),
        Operator::Divide => Ok(left / right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn canonical(formula: &str) -> String {
        Formula::new(formula).unwrap().canonical().to_string()
    }

    fn no_vars(_: &str) -> Result<f64, LookupError> {
        Ok(0.0)
    }

    fn eval(formula: &str) -> Result<f64, FormulaError> {
        Formula::new(formula).unwrap().evaluate(no_vars)
    }

    fn eval_with(formula: &str, vars: &[(&str, f64)]) -> Result<f64, FormulaError> {
        let vars: HashMap<String, f64> = vars.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        Formula::new(formula).unwrap().evaluate(|name| {
            vars.get(name)
                .copied()
                .ok_or_else(|| LookupError::new(name, "not defined"))
        })
    }

    #[test]
    fn test_valid_formulas() {
        for formula in [
            "1",
            "3.14159",
            "3e-6",
            "a1",
            "(x1) / (4)",
            "(x1 * (( 7 )))",
            "9.99E10 + 3",
            "(99) + 2",
            "u123 + 3.8",
            "21 + c69",
        ] {
            assert!(Formula::new(formula).is_ok(), "{formula} should parse");
        }
    }

    #[test]
    fn test_invalid_formulas() {
        for formula in [
            "",
            " ",
            "@",
            "A",
            "thing",
            "6^3",
            "6 = (3 + 3)",
            "1 #",
            ")",
            "1 + 1 )",
            " ) 1 + 0.7",
            "((1 * 3) + 2",
            "(",
            "a + 13",
            "8 + B",
            "8 +",
            "(4 + 1) 5",
            "1 + + 2",
            "1 ( + 2)",
            "(4 * 5) (2)",
            "4 5 6 7",
            "a40 6",
            "b23 a79",
            "+ / *",
            "+3 * 5",
            "a1$ + 3",
            "2x+5",
            "()",
            "1e999",
        ] {
            assert!(Formula::new(formula).is_err(), "{formula:?} should be rejected");
        }
    }

    #[test]
    fn test_error_reason_is_descriptive() {
        let err = Formula::new("(1").unwrap_err();
        assert!(err.reason.contains("opening"), "{}", err.reason);
        let err = Formula::new("").unwrap_err();
        assert!(err.reason.contains("at least one token"), "{}", err.reason);
    }

    #[test]
    fn test_canonical_form() {
        assert_eq!(canonical("ga22*a1 + 4E3- 22.0 / Ga22"), "GA22*A1+4000-22/GA22");
        assert_eq!(canonical("0001 + 0023"), "1+23");
        assert_eq!(canonical("0.1E1 + 2"), "1+2");
        assert_eq!(canonical("longVariableName1 + 3"), "LONGVARIABLENAME1+3");
        assert_eq!(canonical("3.14159265358979 + 1"), "3.14159265358979+1");
        assert_eq!(canonical("  3 + 2  "), "3+2");
        assert_eq!(canonical("(1) + 2"), "(1)+2");
        assert_eq!(canonical("X1 + 5.0000"), "X1+5");
    }

    #[test]
    fn test_variables_are_deduplicated_and_uppercased() {
        let vars = Formula::new("x1+X1").unwrap().variables();
        assert_eq!(vars, HashSet::from(["X1".to_string()]));

        let vars = Formula::new("(a1 + b2) * (c3 - d4) / e5 + f6").unwrap().variables();
        assert_eq!(vars.len(), 6);

        assert!(Formula::new("5 + 4 - 3").unwrap().variables().is_empty());
    }

    #[test]
    fn test_equality_uses_canonical_form() {
        assert_eq!(Formula::new("x1 + 2").unwrap(), Formula::new("X1+2.0").unwrap());
        assert_ne!(Formula::new("x1 + 2").unwrap(), Formula::new("x2 + 2").unwrap());
        assert_ne!(Formula::new("1 + 2").unwrap(), Formula::new("2 + 1").unwrap());
    }

    #[test]
    fn test_equal_formulas_hash_equally() {
        let set: HashSet<Formula> = ["x1 + y1", "X1+Y1", "y1 + x1"]
            .into_iter()
            .map(|f| Formula::new(f).unwrap())
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_from_str_and_display() {
        let f: Formula = "a1 *  2".parse().unwrap();
        assert_eq!(f.to_string(), "A1*2");
        assert!("1 +".parse::<Formula>().is_err());
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+3*4"), Ok(14.0));
        assert_eq!(eval("(2+3)*4"), Ok(20.0));
        assert_eq!(eval("2*3+4"), Ok(10.0));
        assert_eq!(eval("2+3"), Ok(5.0));
        assert_eq!(eval("10-4-3"), Ok(3.0));
        assert_eq!(eval("16/4/2"), Ok(2.0));
        assert_eq!(eval("2*(3+4)*5"), Ok(70.0));
        assert_eq!(eval("((((1))))"), Ok(1.0));
        assert_eq!(eval("(1+2)*(3+4)/(5-4)"), Ok(21.0));
        assert_eq!(eval("1-(2-(3-4))"), Ok(-2.0));
    }

    #[test]
    fn test_division_by_zero_is_error_value() {
        assert_eq!(eval("10/(5-5)"), Err(FormulaError::new("Division by 0")));
        assert_eq!(eval("1/0"), Err(FormulaError::new("Division by 0")));
        assert_eq!(eval("2*(1/0)+1"), Err(FormulaError::new("Division by 0")));
    }

    #[test]
    fn test_variables_resolve_through_lookup() {
        assert_eq!(eval_with("a1 * b1 + 1", &[("A1", 2.0), ("B1", 4.5)]), Ok(10.0));
        assert_eq!(eval_with("x1 / x1", &[("X1", 3.0)]), Ok(1.0));
    }

    #[test]
    fn test_failed_lookup_is_undefined_variable() {
        assert_eq!(
            eval_with("x1 + 3", &[]),
            Err(FormulaError::new("Undefined variable"))
        );
        assert_eq!(
            eval_with("a1 / b1", &[("A1", 1.0), ("B1", 0.0)]),
            Err(FormulaError::new("Division by 0"))
        );
    }

    fn formula_strategy() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            (0u32..10_000).prop_map(|n| n.to_string()),
            (0u32..1000, 0u32..1000).prop_map(|(a, b)| format!("{a}.{b}")),
            // Leading and trailing zeros: 0001, 007.50, 22.0
            "0{1,3}[0-9]{1,3}(\\.[0-9]{0,2}0{1,2})?",
            // Exponents, including magnitudes that underflow to zero.
            "[0-9]{1,4}(\\.[0-9]{0,3})?[eE][+-]?[0-9]{1,3}"
                .prop_filter("finite literal", |s: &String| {
                    s.parse::<f64>().is_ok_and(f64::is_finite)
                }),
            "[a-zA-Z]{1,3}[0-9]{1,3}",
        ];
        leaf.prop_recursive(4, 32, 2, |inner| {
            prop_oneof![
                (inner.clone(), "[+*/-]", inner.clone())
                    .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
                inner.prop_map(|e| format!("( {e} )")),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_canonical_is_idempotent(text in formula_strategy()) {
            let once = Formula::new(&text).unwrap();
            let twice = Formula::new(once.canonical()).unwrap();
            prop_assert_eq!(once.canonical(), twice.canonical());
            prop_assert_eq!(once, twice);
        }
    }
}
