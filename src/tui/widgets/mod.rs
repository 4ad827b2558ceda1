pub mod chat;
pub mod input;

pub use chat::{ChatWidget, ScrollState};
pub use input::{InputAction, InputWidget};
