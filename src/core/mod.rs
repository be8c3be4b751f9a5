//! Frontend-neutral building blocks: input events and semantic commands.

pub mod command;
pub mod event;

pub use command::Command;
pub use event::{
    InputEvent, Key, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
