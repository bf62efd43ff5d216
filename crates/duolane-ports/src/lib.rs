pub mod audio;
pub mod input;
pub mod library;
pub mod storage;
pub mod types;

pub use audio::*;
pub use input::*;
pub use library::*;
pub use storage::*;
pub use types::*;
