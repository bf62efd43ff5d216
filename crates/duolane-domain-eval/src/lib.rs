pub mod judge;
pub mod score;

pub use judge::*;
pub use score::*;
