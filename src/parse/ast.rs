use crate::common::*;
use std::fmt;

/// The comma-separated list of independent expressions submitted in one go.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Roll {
    pub expressions: NonEmpty<Expression>,
}

impl Roll {
    pub fn new(expressions: NonEmpty<Expression>) -> Self {
        Self { expressions }
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_joined(f, self.expressions.iter(), ", ")
    }
}

/// A left-to-right chain of values at a single precedence level.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Expression {
    pub values: NonEmpty<Value>,
    pub operators: Vec<Operator>,
}

impl Expression {
    pub fn new(values: NonEmpty<Value>, operators: Vec<Operator>) -> Self {
        debug_assert_eq!(operators.len() + 1, values.len());
        Self { values, operators }
    }

    /// Each value paired with the operator joining it to the running result.
    pub fn rest(&self) -> impl Iterator<Item = (Operator, &Value)> + '_ {
        self.operators.iter().copied().zip(self.values.iter().skip(1))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values.first())?;
        for (op, value) in self.rest() {
            write!(f, " {} {}", op, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Value {
    pub inner: ValueKind,
    pub unary: Operator,
}

impl Value {
    pub fn new(inner: ValueKind, unary: Operator) -> Self {
        Self { inner, unary }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.unary, self.inner)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ValueKind {
    Dice(DiceExpression),
    Number(Int),
    /// A parenthesized expression.
    Group(Expression),
    /// A `*`/`/` chain sitting inside a `+`/`-` chain.
    Term(Expression),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dice(x) => fmt::Display::fmt(x, f),
            Self::Number(x) => fmt::Display::fmt(x, f),
            Self::Group(x) => write!(f, "({})", x),
            Self::Term(x) => fmt::Display::fmt(x, f),
        }
    }
}

/// Anything a modifier can be attached to.
#[derive(Debug, Clone, Eq, PartialEq)]
#[enum_dispatch::enum_dispatch(Eval)]
pub enum DiceExpression {
    Dice(Dice),
    Sequence(Sequence),
    Mod(Mod),
}

impl DiceExpression {
    /// Wraps `self` in the given modifiers.
    ///
    /// Modifiers are stably sorted by priority first, so explosions always end
    /// up innermost while the rest keep the order they were written in.
    pub fn with_mods(self, mut mods: Vec<ModSpec>) -> Self {
        mods.sort_by_key(|m| m.kind.priority());
        mods.into_iter().fold(self, |inner, spec| {
            Self::Mod(Mod::new(spec.kind, spec.argument, inner))
        })
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dice(x) => fmt::Display::fmt(x, f),
            Self::Sequence(x) => fmt::Display::fmt(x, f),
            Self::Mod(x) => fmt::Display::fmt(x, f),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Dice {
    pub base: Int,
    pub num_of_dice: Int,
}

impl Dice {
    pub const fn new(base: Int, num_of_dice: Int) -> Self {
        Self { base, num_of_dice }
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.num_of_dice, self.base)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Sequence {
    pub values: NonEmpty<Expression>,
}

impl Sequence {
    pub fn new(values: NonEmpty<Expression>) -> Self {
        Self { values }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        fmt_joined(f, self.values.iter(), ", ")?;
        f.write_str("}")
    }
}

/// A modifier as written, before it has been linked to the expression it
/// applies to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ModSpec {
    pub kind: ModKind,
    pub argument: Option<Int>,
}

impl ModSpec {
    pub const fn new(kind: ModKind, argument: Option<Int>) -> Self {
        Self { kind, argument }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Mod {
    pub kind: ModKind,
    pub argument: Option<Int>,
    pub inner: Box<DiceExpression>,
}

impl Mod {
    pub fn new(kind: ModKind, argument: Option<Int>, inner: DiceExpression) -> Self {
        Self {
            kind,
            argument,
            inner: Box::new(inner),
        }
    }
}

impl fmt::Display for Mod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.inner, self.kind)?;
        if let Some(argument) = self.argument {
            write!(f, "{}", argument)?;
        }
        Ok(())
    }
}

fn fmt_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    mut items: impl Iterator<Item = T>,
    sep: &str,
) -> fmt::Result {
    if let Some(first) = items.next() {
        write!(f, "{}", first)?;
    }
    for item in items {
        write!(f, "{}{}", sep, item)?;
    }
    Ok(())
}
