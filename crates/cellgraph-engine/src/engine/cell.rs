//! Cell data structures.
//!
//! - [`CellContents`] - what the user put into a cell (number, text or formula)
//! - [`CellValue`] - what the cell evaluates to (number, text or formula error)
//! - [`Cell`] - contents plus the cached value

use super::formula::{Formula, FormulaError, FormulaFormatError};

/// The contents of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContents {
    Number(f64),
    Text(String),
    Formula(Formula),
}

impl CellContents {
    /// Classify raw user input.
    ///
    /// - Parses as a number (surrounding whitespace allowed) -> Number
    /// - Starts with '=' -> Formula of the remainder
    /// - Otherwise -> Text, verbatim (including "")
    pub fn parse(input: &str) -> Result<CellContents, FormulaFormatError> {
        if let Ok(n) = input.trim().parse::<f64>() {
            return Ok(CellContents::Number(n));
        }
        if let Some(formula) = input.strip_prefix('=') {
            return Formula::new(formula).map(CellContents::Formula);
        }
        Ok(CellContents::Text(input.to_string()))
    }

    /// Empty text contents mean "no cell".
    pub fn is_empty(&self) -> bool {
        matches!(self, CellContents::Text(s) if s.is_empty())
    }

    /// The string that reproduces these contents when set again.
    pub fn string_form(&self) -> String {
        match self {
            CellContents::Number(n) => n.to_string(),
            CellContents::Text(s) => s.clone(),
            CellContents::Formula(f) => format!("={}", f),
        }
    }
}

impl Default for CellContents {
    fn default() -> Self {
        CellContents::Text(String::new())
    }
}

/// The evaluated value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

/// A stored cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub contents: CellContents,
    pub value: CellValue,
}

impl Cell {
    /// Create a cell whose value is known without evaluation.
    /// Formula cells start with a placeholder value until recomputed.
    pub fn new(contents: CellContents) -> Cell {
        let value = match &contents {
            CellContents::Number(n) => CellValue::Number(*n),
            CellContents::Text(s) => CellValue::Text(s.clone()),
            CellContents::Formula(_) => CellValue::Number(0.0),
        };
        Cell { contents, value }
    }

    pub fn string_form(&self) -> String {
        self.contents.string_form()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_number() {
        assert_eq!(CellContents::parse("42").unwrap(), CellContents::Number(42.0));
        assert_eq!(CellContents::parse("  -2.5 ").unwrap(), CellContents::Number(-2.5));
        assert_eq!(CellContents::parse("1e3").unwrap(), CellContents::Number(1000.0));
    }

    #[test]
    fn test_parse_overflowing_number_stays_numeric() {
        assert_eq!(
            CellContents::parse("1e400").unwrap(),
            CellContents::Number(f64::INFINITY)
        );
        assert_eq!(
            CellContents::parse("-1e400").unwrap(),
            CellContents::Number(f64::NEG_INFINITY)
        );
        assert!(matches!(
            CellContents::parse("NaN").unwrap(),
            CellContents::Number(n) if n.is_nan()
        ));
    }

    #[test]
    fn test_non_finite_string_form_parses_back() {
        for input in ["1e400", "-1e400", "NaN"] {
            let form = CellContents::parse(input).unwrap().string_form();
            match CellContents::parse(&form).unwrap() {
                CellContents::Number(n) => {
                    assert_eq!(n.to_string(), form);
                }
                other => panic!("{input} re-parsed as {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_formula() {
        let contents = CellContents::parse("=a1 + 2").unwrap();
        assert_eq!(contents, CellContents::Formula(Formula::new("A1+2").unwrap()));
        assert!(CellContents::parse("=1 +").is_err());
    }

    #[test]
    fn test_parse_text_verbatim() {
        assert_eq!(CellContents::parse(" hi ").unwrap(), CellContents::Text(" hi ".into()));
        assert!(CellContents::parse("").unwrap().is_empty());
        // A leading space means this is not a formula.
        assert_eq!(CellContents::parse(" =1").unwrap(), CellContents::Text(" =1".into()));
    }

    #[test]
    fn test_string_form() {
        assert_eq!(CellContents::Number(5.0).string_form(), "5");
        assert_eq!(CellContents::Number(0.25).string_form(), "0.25");
        assert_eq!(CellContents::parse("=x1 *  2").unwrap().string_form(), "=X1*2");
        assert_eq!(CellContents::Text("abc".into()).string_form(), "abc");
    }
}
