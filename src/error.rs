//! Error types for the window manager.

use std::fmt;

/// Everything that can go wrong while managing windows.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// The low-level X11 wrapper failed (connection, wrapped XCB reply, stale
    /// window, or a resource that couldn't be found).
    X11(nerdwm_x11::Error),
    /// Setup ran out of memory allocating a client or list node.
    OutOfMemory,
    /// A fatal condition during startup: no modifier keycodes, a color name
    /// that doesn't resolve, or another window manager already holds
    /// substructure-redirect on the root.
    FatalInit(&'static str),
}

impl From<nerdwm_x11::Error> for Error {
    fn from(e: nerdwm_x11::Error) -> Self {
        Self::X11(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X11(e) => write!(f, "{}", e),
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::FatalInit(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type NerdResult<T> = Result<T, Error>;
