use std::fmt;
pub use vec1::vec1;

pub type Int = i64;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// Arithmetic operators, used both between values and as a value's sign.
///
/// `None` marks a value that was written without a leading sign.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Mul,
    Div,
    None,
}

impl Operator {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::None => "",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ModKind {
    Explode,
    KeepHigh,
    DiscardLow,
    Repeat,
    Sum,
}

impl ModKind {
    /// Lower priorities are applied closer to the dice.
    pub const fn priority(&self) -> u8 {
        match self {
            Self::Explode => 0,
            Self::KeepHigh | Self::DiscardLow | Self::Repeat | Self::Sum => 10,
        }
    }

    pub const fn marker(&self) -> &'static str {
        match self {
            Self::Explode => "!",
            Self::KeepHigh => "kh",
            Self::DiscardLow => "dl",
            Self::Repeat => "@",
            Self::Sum => "s",
        }
    }
}

impl fmt::Display for ModKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}
