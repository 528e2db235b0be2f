//! Core state machine for lazyhcloud
//!
//! Everything the dashboard knows lives in one [`AppState`] value. Key presses
//! and completed background work arrive as [`Message`]s; [`transition`] folds a
//! message into the state and returns the [`Command`]s the runtime should run
//! next. Nothing in this crate performs I/O.

mod cache;
mod detail;
mod environment;
mod input;
mod menu;
mod message;
mod state;
mod update;

pub use cache::*;
pub use detail::*;
pub use environment::*;
pub use input::*;
pub use menu::*;
pub use message::*;
pub use state::*;
pub use update::*;
