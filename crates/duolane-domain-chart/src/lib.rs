pub mod load;
pub mod model;

pub use load::*;
pub use model::*;
