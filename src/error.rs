use crate::{parse::ParseError, roll::RollError};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Roll(#[from] RollError),
}

impl Error {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "DICE_SYNTAX",
            Self::Roll(err) => err.code(),
        }
    }
}
