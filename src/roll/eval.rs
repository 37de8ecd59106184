use super::{mods, roller::Roller, RResult, RollContext, RollResult};
use crate::common::*;
use crate::parse::ast::*;

/// Evaluation of an AST node against a [`RollContext`].
#[enum_dispatch::enum_dispatch]
pub trait Eval {
    fn eval<R: crate::roll::Roller>(
        &self,
        ctx: &mut crate::roll::RollContext<R>,
    ) -> crate::roll::RResult<crate::roll::RollResult>;
}

impl Eval for Dice {
    fn eval<R: Roller>(&self, ctx: &mut RollContext<R>) -> RResult<RollResult> {
        let faces = ctx.roll(self.num_of_dice, self.base)?;
        log::debug!("rolled {}: {:?}", self, faces);
        Ok(faces.into())
    }
}

impl Eval for Sequence {
    fn eval<R: Roller>(&self, ctx: &mut RollContext<R>) -> RResult<RollResult> {
        let values = self
            .values
            .iter()
            .map(|expr| ctx.eval(expr))
            .collect::<RResult<Vec<_>>>()?;
        Ok(values.into())
    }
}

impl Eval for Mod {
    fn eval<R: Roller>(&self, ctx: &mut RollContext<R>) -> RResult<RollResult> {
        mods::apply(ctx, self)
    }
}

impl Eval for ValueKind {
    fn eval<R: Roller>(&self, ctx: &mut RollContext<R>) -> RResult<RollResult> {
        match self {
            Self::Dice(x) => x.eval(ctx),
            Self::Number(x) => Ok(RollResult::Scalar(*x)),
            Self::Group(x) | Self::Term(x) => x.eval(ctx),
        }
    }
}

impl Eval for Value {
    fn eval<R: Roller>(&self, ctx: &mut RollContext<R>) -> RResult<RollResult> {
        let value = self.inner.eval(ctx)?;
        match self.unary {
            Operator::Minus => value.try_neg(),
            _ => Ok(value),
        }
    }
}

impl Eval for Expression {
    fn eval<R: Roller>(&self, ctx: &mut RollContext<R>) -> RResult<RollResult> {
        let mut acc = self.values.first().eval(ctx)?;
        for (op, value) in self.rest() {
            let rhs = value.eval(ctx)?;
            acc = match op {
                Operator::Plus => acc.try_add(rhs)?,
                Operator::Minus => acc.try_sub(&rhs)?,
                Operator::Mul => acc.try_mul(&rhs)?,
                Operator::Div => {
                    let (quotient, warning) = acc.try_div(&rhs)?;
                    if let Some(warning) = warning {
                        ctx.warn(warning);
                    }
                    quotient
                }
                Operator::None => unreachable!("binary operator expected"),
            };
        }
        Ok(acc)
    }
}

impl Roll {
    /// Evaluates every expression on its own.
    ///
    /// An error only ends the expression that raised it; warnings end up in
    /// `ctx`, tagged with the expression's index.
    pub fn eval_to_list<R: Roller>(&self, ctx: &mut RollContext<R>) -> Vec<RResult<RollResult>> {
        self.expressions
            .iter()
            .enumerate()
            .map(|(i, expr)| {
                ctx.begin_expression(i);
                let result = ctx.eval(expr);
                if let Err(err) = &result {
                    log::debug!("{} failed: {}", expr, err);
                }
                result
            })
            .collect()
    }
}
