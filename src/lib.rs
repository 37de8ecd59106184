//! A small language for tabletop dice expressions.
//!
//! ```
//! let outcomes = dicelang::roll("{1, 2, 3, 4, 5}k2, 10 / {0}").unwrap();
//! assert_eq!(outcomes[0].to_string(), "{1, 2, 3, 4, 5}kh2 -> [4, 5]");
//! assert_eq!(outcomes[1].value().unwrap(), dicelang::Finalized::Int(10));
//! assert_eq!(outcomes[1].warnings, vec![dicelang::RollWarning::ZeroSumDivisor]);
//! ```
//!
//! [`parse`] turns text into a [`Roll`], which is evaluated against a
//! [`RollContext`] into one [`RollResult`] per comma-separated expression.

mod common;
mod error;
pub mod parse;
pub mod roll;

use std::fmt;

pub use common::{Int, ModKind, NonEmpty, Operator};
pub use error::Error;
pub use parse::{ast::Roll, parse, ParseError, ParseErrorKind};
pub use roll::{
    Finalized, RollContext, RollError, RollResult, RollWarning, Roller, ShapeError,
    ValidationReason,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// One evaluated top-level expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The expression in its canonical form.
    pub expression: String,
    pub result: Result<RollResult, RollError>,
    pub warnings: Vec<RollWarning>,
}

impl Outcome {
    pub fn value(&self) -> Result<Finalized> {
        match &self.result {
            Ok(x) => Ok(x.finalize()),
            Err(err) => Err((*err).into()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(x) => write!(f, "{} -> {}", self.expression, x),
            Err(err) => write!(f, "{} -> error: {}", self.expression, err),
        }
    }
}

/// Parses and evaluates `text` with a default [`RollContext`].
pub fn roll(text: &str) -> Result<Vec<Outcome>> {
    roll_with(text, &mut RollContext::default())
}

pub fn roll_with<R: Roller>(text: &str, ctx: &mut RollContext<R>) -> Result<Vec<Outcome>> {
    let parsed = parse(text)?;
    let results = parsed.eval_to_list(ctx);

    let warnings = ctx.take_warnings();
    let outcomes = parsed
        .expressions
        .iter()
        .zip(results)
        .enumerate()
        .map(|(i, (expr, result))| Outcome {
            expression: expr.to_string(),
            result,
            warnings: warnings
                .iter()
                .filter(|(index, _)| *index == i)
                .map(|&(_, warning)| warning)
                .collect(),
        })
        .collect();
    Ok(outcomes)
}
