pub mod app;
pub mod clock;
pub mod input;
pub mod ipc;
pub mod manual_audio;
pub mod scheduler;
pub mod session;

pub use app::*;
pub use clock::*;
pub use input::*;
pub use ipc::*;
pub use manual_audio::*;
pub use scheduler::*;
pub use session::*;
