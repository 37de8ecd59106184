use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum RollError {
    #[error("{0}")]
    Validation(#[from] ValidationReason),
    #[error("{0}")]
    Shape(#[from] ShapeError),
    #[error("cannot divide by zero")]
    ZeroDivision,
    #[error("result is too large")]
    Overflow,
    #[error("too many dice rolled")]
    TooManyRolls,
}

impl RollError {
    /// A stable identifier callers can use to look up a localized message.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(reason) => reason.code(),
            Self::Shape(err) => err.code(),
            Self::ZeroDivision => "DICE_DIVISION_BY_ZERO",
            Self::Overflow => "DICE_OVERFLOW",
            Self::TooManyRolls => "DICE_TOO_MANY_ROLLS",
        }
    }
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum ValidationReason {
    #[error("repeat requires a positive argument")]
    RepeatArgument,
    #[error("keep high requires a positive argument")]
    KeepHighArgument,
    #[error("drop low requires a positive argument")]
    DiscardLowArgument,
    #[error("dice need a positive number of faces")]
    InvalidDice,
}

impl ValidationReason {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RepeatArgument => "DICE_REPEAT_ARGUMENT",
            Self::KeepHighArgument => "DICE_KEEP_HIGH_ARGUMENT",
            Self::DiscardLowArgument => "DICE_DROP_LOW_ARGUMENT",
            Self::InvalidDice => "DICE_INVALID_DICE",
        }
    }
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShapeError {
    #[error("cannot explode a group")]
    ExplodeGroup,
    #[error("cannot negate a group")]
    NegateGroup,
}

impl ShapeError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ExplodeGroup => "DICE_EXPLOSION_DICE_ONLY",
            Self::NegateGroup => "DICE_NEGATE_GROUP",
        }
    }
}

/// Problems that do not stop evaluation but should be reported to the user.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RollWarning {
    /// A group used as a divisor summed to zero; the division was skipped.
    ZeroSumDivisor,
}

impl RollWarning {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ZeroSumDivisor => "DICE_DIVISION_BY_ZERO_SUM",
        }
    }
}

impl fmt::Display for RollWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSumDivisor => f.write_str("divisor group summed to zero, division skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            RollError::from(ValidationReason::RepeatArgument).code(),
            "DICE_REPEAT_ARGUMENT"
        );
        assert_eq!(
            RollError::from(ShapeError::ExplodeGroup).code(),
            "DICE_EXPLOSION_DICE_ONLY"
        );
        assert_eq!(RollError::ZeroDivision.code(), "DICE_DIVISION_BY_ZERO");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            RollError::from(ShapeError::ExplodeGroup).to_string(),
            "cannot explode a group"
        );
        assert_eq!(
            RollError::from(ValidationReason::KeepHighArgument).to_string(),
            "keep high requires a positive argument"
        );
    }
}
