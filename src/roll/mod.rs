mod ctx;
mod error;
mod eval;
pub mod mods;
mod result;
mod roller;

pub(crate) type RResult<T> = Result<T, RollError>;

pub use ctx::{DefaultRoller, RollContext, DEFAULT_MAX_ROLLS};
pub use error::{RollError, RollWarning, ShapeError, ValidationReason};
pub use eval::Eval;
pub use result::{Finalized, RollResult};
pub use roller::Roller;
