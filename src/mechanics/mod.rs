pub mod pacing;
pub mod stoch;
pub mod tier;

pub use pacing::*;
pub use stoch::*;
pub use tier::*;
