use crate::common::Int;
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};

/// A source of die faces.
///
/// Implemented for every [`rand::Rng`]; tests swap in predictable rollers.
pub trait Roller {
    /// Rolls a single die numbered `1..=sides`.
    fn roll(&mut self, sides: Int) -> Int;

    fn roll_n(&mut self, num: usize, sides: Int) -> Vec<Int> {
        (0..num).map(|_| self.roll(sides)).collect()
    }
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, sides: Int) -> Int {
        self.gen_range(1..=sides)
    }

    fn roll_n(&mut self, num: usize, sides: Int) -> Vec<Int> {
        Uniform::new_inclusive(1, sides)
            .sample_iter(self)
            .take(num)
            .collect()
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;
