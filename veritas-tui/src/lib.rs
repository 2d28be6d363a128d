//! Terminal front end: the UI state machine plus the ratatui actor that
//! renders it.
mod command;
mod feeders;
mod input;
pub mod state;
mod styles;
mod tui;
mod view;

pub use feeders::spawn_tui_feeders;
pub use tui::{TuiActor, TuiMsg};
