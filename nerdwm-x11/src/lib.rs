//! Minimal, safe wrapper around the X11 wire protocol.
//!
//! Only the requests and event kinds `nerdwm` actually needs are exposed.
//! Everything here is a thin, synchronous layer over the `xcb` crate: cookies
//! are resolved immediately, and replies are converted into plain owned
//! structs so the rest of the window manager never touches raw XCB types.

pub mod context;
pub mod error;
pub mod event;
pub mod keysym;

pub use xcb;

pub use context::Context;
pub use error::{Error, Result};
pub use event::Event;
