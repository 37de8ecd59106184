use super::{error::*, eval::Eval, roller::Roller, RResult, RollResult};
use crate::common::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

pub type DefaultRoller = rand::prelude::ThreadRng;

/// How many dice and repeats a single expression may use by default.
pub const DEFAULT_MAX_ROLLS: usize = 10_000;

/// Holds the roller and the bookkeeping for one evaluation.
pub struct RollContext<R = DefaultRoller> {
    max_rolls: Option<usize>,
    rolls: usize,
    roller: R,
    expression: usize,
    warnings: Vec<(usize, RollWarning)>,
}

impl<R: Roller> RollContext<R> {
    pub fn new(max_rolls: Option<usize>, roller: R) -> Self {
        Self {
            max_rolls,
            rolls: 0,
            roller,
            expression: 0,
            warnings: Vec::new(),
        }
    }

    pub fn new_bounded(max_rolls: usize, roller: R) -> Self {
        Self::new(Some(max_rolls), roller)
    }

    pub fn new_unbounded(roller: R) -> Self {
        Self::new(None, roller)
    }

    pub(crate) fn count_rolls(&mut self, n: usize) -> RResult<()> {
        self.rolls = self.rolls.saturating_add(n);
        if self.max_rolls.map_or(false, |max| self.rolls > max) {
            log::debug!("roll budget of {:?} exhausted", self.max_rolls);
            Err(RollError::TooManyRolls)
        } else {
            Ok(())
        }
    }

    /// Rolls `num` dice numbered `1..=sides`.
    pub fn roll(&mut self, num: Int, sides: Int) -> RResult<Vec<Int>> {
        let num = usize::try_from(num).map_err(|_| ValidationReason::InvalidDice)?;
        if sides < 1 {
            return Err(ValidationReason::InvalidDice.into());
        }
        self.count_rolls(num)?;
        Ok(self.roller.roll_n(num, sides))
    }

    /// Starts the top-level expression at `index`, refilling the roll budget.
    pub fn begin_expression(&mut self, index: usize) {
        self.expression = index;
        self.rolls = 0;
    }

    pub fn warn(&mut self, warning: RollWarning) {
        log::warn!("expression {}: {}", self.expression, warning);
        self.warnings.push((self.expression, warning));
    }

    pub fn warnings(&self) -> &[(usize, RollWarning)] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<(usize, RollWarning)> {
        std::mem::take(&mut self.warnings)
    }

    pub fn eval<E: Eval>(&mut self, expr: &E) -> RResult<RollResult> {
        expr.eval(self)
    }
}

impl RollContext<ChaCha20Rng> {
    /// A context whose rolls are fully determined by `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new_bounded(DEFAULT_MAX_ROLLS, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl Default for RollContext {
    fn default() -> Self {
        Self::new_bounded(DEFAULT_MAX_ROLLS, rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::roller::StepRoller;

    #[test]
    fn test_roll_counts_against_budget() {
        let mut ctx = RollContext::new_bounded(5, StepRoller::new(1, 1));
        assert_eq!(ctx.roll(3, 6), Ok(vec![1, 2, 3]));
        assert_eq!(ctx.roll(2, 6), Ok(vec![4, 5]));
        assert_eq!(ctx.roll(1, 6), Err(RollError::TooManyRolls));

        ctx.begin_expression(1);
        assert_eq!(ctx.roll(5, 6), Ok(vec![6, 1, 2, 3, 4]));
    }

    #[test]
    fn test_unbounded() {
        let mut ctx = RollContext::new_unbounded(StepRoller::new(1, 1));
        assert_eq!(ctx.roll(100_000, 2).map(|faces| faces.len()), Ok(100_000));
    }

    #[test]
    fn test_invalid_dice() {
        let mut ctx = RollContext::new_unbounded(StepRoller::new(1, 1));
        let err = Err(RollError::Validation(ValidationReason::InvalidDice));
        assert_eq!(ctx.roll(1, 0), err);
        assert_eq!(ctx.roll(-1, 6), err);
        assert_eq!(ctx.roll(0, 6), Ok(vec![]));
    }

    #[test]
    fn test_warnings_are_tagged() {
        let mut ctx = RollContext::new_unbounded(StepRoller::new(1, 1));
        ctx.warn(RollWarning::ZeroSumDivisor);
        ctx.begin_expression(3);
        ctx.warn(RollWarning::ZeroSumDivisor);
        assert_eq!(
            ctx.warnings(),
            &[(0, RollWarning::ZeroSumDivisor), (3, RollWarning::ZeroSumDivisor)]
        );
        assert_eq!(ctx.take_warnings().len(), 2);
        assert!(ctx.take_warnings().is_empty());
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let roll = crate::parse::parse("4d6, 1d20!, {2d8, 3}@3").unwrap();
        let a = roll.eval_to_list(&mut RollContext::seeded(99));
        let b = roll.eval_to_list(&mut RollContext::seeded(99));
        assert_eq!(a, b);
    }
}
