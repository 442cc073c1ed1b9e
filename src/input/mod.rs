pub mod buffer;
pub mod handler;

pub use buffer::{InputBuffer, PendingInput};
pub use handler::InputHandler;
