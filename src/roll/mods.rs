use super::{error::*, roller::Roller, RResult, RollContext, RollResult};
use crate::common::*;
use crate::parse::ast::{DiceExpression, Mod};
use std::cmp::Reverse;
use std::collections::HashSet;

pub(super) fn apply<R: Roller>(ctx: &mut RollContext<R>, m: &Mod) -> RResult<RollResult> {
    match m.kind {
        ModKind::Explode => explode(ctx, &m.inner, m.argument),
        ModKind::KeepHigh => keep_high(ctx, &m.inner, m.argument),
        ModKind::DiscardLow => discard_low(ctx, &m.inner, m.argument),
        ModKind::Repeat => repeat(ctx, &m.inner, m.argument),
        ModKind::Sum => sum(ctx, &m.inner, m.argument),
    }
}

/// Evaluates `inner` `argument` times, independently.
pub fn repeat<R: Roller>(
    ctx: &mut RollContext<R>,
    inner: &DiceExpression,
    argument: Option<Int>,
) -> RResult<RollResult> {
    let n = positive(argument, ValidationReason::RepeatArgument)?;
    let mut results = Vec::new();
    for _ in 0..n {
        ctx.count_rolls(1)?;
        results.push(ctx.eval(inner)?);
    }
    Ok(results.into())
}

/// Rolls extra dice for every maximum face until a round shows none.
///
/// Only dice explode; exploding an explosion just evaluates it again.
pub fn explode<R: Roller>(
    ctx: &mut RollContext<R>,
    inner: &DiceExpression,
    _argument: Option<Int>,
) -> RResult<RollResult> {
    let dice = match inner {
        DiceExpression::Dice(dice) => dice,
        DiceExpression::Mod(m) if m.kind == ModKind::Explode => return ctx.eval(m),
        _ => return Err(ShapeError::ExplodeGroup.into()),
    };

    let mut faces = ctx.roll(dice.num_of_dice, dice.base)?;
    let mut round = faces.len();
    loop {
        let maxed = faces[faces.len() - round..]
            .iter()
            .filter(|&&face| face == dice.base)
            .count();
        if maxed == 0 {
            break;
        }
        log::trace!("{} exploded {} time(s)", dice, maxed);
        faces.extend(ctx.roll(maxed as Int, dice.base)?);
        round = maxed;
    }
    Ok(faces.into())
}

pub fn keep_high<R: Roller>(
    ctx: &mut RollContext<R>,
    inner: &DiceExpression,
    argument: Option<Int>,
) -> RResult<RollResult> {
    let n = positive(argument, ValidationReason::KeepHighArgument)?;
    keep_highest(ctx.eval(inner)?, n)
}

pub fn discard_low<R: Roller>(
    ctx: &mut RollContext<R>,
    inner: &DiceExpression,
    argument: Option<Int>,
) -> RResult<RollResult> {
    let n = positive(argument, ValidationReason::DiscardLowArgument)?;
    discard_lowest(ctx.eval(inner)?, n)
}

pub fn sum<R: Roller>(
    ctx: &mut RollContext<R>,
    inner: &DiceExpression,
    _argument: Option<Int>,
) -> RResult<RollResult> {
    ctx.eval(inner)?.collapse()
}

fn positive(argument: Option<Int>, reason: ValidationReason) -> RResult<usize> {
    match argument {
        Some(x) if x > 0 => usize::try_from(x).map_err(|_| reason.into()),
        _ => Err(reason.into()),
    }
}

fn keep_highest(result: RollResult, n: usize) -> RResult<RollResult> {
    let values = match result {
        RollResult::Composite(values) if values.len() > n => values,
        other => return Ok(other),
    };
    let kept: HashSet<_> = ranked(&values, true)?.into_iter().take(n).collect();
    Ok(retain(values, |i| kept.contains(&i)))
}

fn discard_lowest(result: RollResult, n: usize) -> RResult<RollResult> {
    let values = match result {
        RollResult::Composite(values) if values.len() > n => values,
        RollResult::Composite(_) => return Ok(RollResult::ZERO),
        scalar => return Ok(scalar),
    };
    let dropped: HashSet<_> = ranked(&values, false)?.into_iter().take(n).collect();
    Ok(retain(values, |i| !dropped.contains(&i)))
}

/// Indices of `values` ordered by total. Equal totals keep their order.
fn ranked(values: &[RollResult], highest_first: bool) -> RResult<Vec<usize>> {
    let totals = values
        .iter()
        .map(RollResult::sum)
        .collect::<RResult<Vec<_>>>()?;
    let mut indices: Vec<_> = (0..values.len()).collect();
    if highest_first {
        indices.sort_by_key(|&i| Reverse(totals[i]));
    } else {
        indices.sort_by_key(|&i| totals[i]);
    }
    Ok(indices)
}

fn retain(values: Vec<RollResult>, keep: impl Fn(usize) -> bool) -> RollResult {
    values
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep(*i))
        .map(|(_, value)| value)
        .collect::<Vec<_>>()
        .into()
}
