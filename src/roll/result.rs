use super::{error::*, RResult};
use crate::common::Int;
use std::fmt;

/// The value of an evaluated expression: a single total or an ordered,
/// possibly nested, group of results.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum RollResult {
    Scalar(Int),
    Composite(Vec<RollResult>),
}

impl RollResult {
    pub const ZERO: Self = Self::Scalar(0);

    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// The total of every leaf, however deeply nested.
    pub fn sum(&self) -> RResult<Int> {
        match self {
            Self::Scalar(x) => Ok(*x),
            Self::Composite(values) => values.iter().try_fold(0, |acc: Int, value| {
                acc.checked_add(value.sum()?).ok_or(RollError::Overflow)
            }),
        }
    }

    pub fn collapse(&self) -> RResult<Self> {
        self.sum().map(Self::Scalar)
    }

    /// Concatenates two groups; anything else adds up to a scalar.
    pub fn try_add(self, rhs: Self) -> RResult<Self> {
        match (self, rhs) {
            (Self::Composite(mut left), Self::Composite(right)) => {
                left.extend(right);
                Ok(Self::Composite(left))
            }
            (left, right) => checked(left.sum()?.checked_add(right.sum()?)),
        }
    }

    pub fn try_sub(&self, rhs: &Self) -> RResult<Self> {
        checked(self.sum()?.checked_sub(rhs.sum()?))
    }

    pub fn try_mul(&self, rhs: &Self) -> RResult<Self> {
        checked(self.sum()?.checked_mul(rhs.sum()?))
    }

    /// Floor division of both totals.
    ///
    /// Dividing by a bare zero fails. A group that merely sums to zero is
    /// replaced by a divisor of one and reported through the returned warning.
    pub fn try_div(&self, rhs: &Self) -> RResult<(Self, Option<RollWarning>)> {
        let dividend = self.sum()?;
        let (divisor, warning) = match (rhs.sum()?, rhs) {
            (0, Self::Scalar(_)) => return Err(RollError::ZeroDivision),
            (0, Self::Composite(_)) => (1, Some(RollWarning::ZeroSumDivisor)),
            (divisor, _) => (divisor, None),
        };
        Ok((Self::Scalar(floor_div(dividend, divisor)?), warning))
    }

    pub fn try_neg(self) -> RResult<Self> {
        match self {
            Self::Scalar(x) => checked(x.checked_neg()),
            Self::Composite(_) => Err(ShapeError::NegateGroup.into()),
        }
    }

    /// Converts the result into plain data for display.
    pub fn finalize(&self) -> Finalized {
        match self {
            Self::Scalar(x) => Finalized::Int(*x),
            Self::Composite(values) => {
                Finalized::List(values.iter().map(Self::finalize).collect())
            }
        }
    }
}

fn checked(x: Option<Int>) -> RResult<RollResult> {
    x.map(RollResult::Scalar).ok_or(RollError::Overflow)
}

fn floor_div(a: Int, b: Int) -> RResult<Int> {
    let q = a.checked_div(b).ok_or(RollError::Overflow)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

impl From<Int> for RollResult {
    fn from(x: Int) -> Self {
        Self::Scalar(x)
    }
}

impl From<Vec<Int>> for RollResult {
    fn from(values: Vec<Int>) -> Self {
        Self::Composite(values.into_iter().map(Self::Scalar).collect())
    }
}

impl From<Vec<RollResult>> for RollResult {
    fn from(values: Vec<RollResult>) -> Self {
        Self::Composite(values)
    }
}

impl From<Finalized> for RollResult {
    fn from(x: Finalized) -> Self {
        match x {
            Finalized::Int(x) => Self::Scalar(x),
            Finalized::List(values) => {
                Self::Composite(values.into_iter().map(Self::from).collect())
            }
        }
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.finalize(), f)
    }
}

/// A finalized roll result, free of any evaluation machinery.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Finalized {
    Int(Int),
    List(Vec<Finalized>),
}

impl fmt::Display for Finalized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(x) => fmt::Display::fmt(x, f),
            Self::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(value, f)?;
                }
                f.write_str("]")
            }
        }
    }
}
