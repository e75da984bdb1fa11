//! Error types for the low-level X11 wrapper.

use std::fmt;

/// Helper macro to implement conversions for native XCB error types.
macro_rules! xcb_error_impl {
    ($(
        $name:ident => $type:ty,
    )*) => {
        /// All XCB error types this wrapper can receive.
        pub enum XcbError {
            $($name($type),)*
        }

        $(
            impl From<$type> for XcbError {
                fn from(e: $type) -> Self {
                    Self::$name(e)
                }
            }

            impl From<$type> for Error {
                fn from(e: $type) -> Self {
                    Self::Xcb(XcbError::from(e))
                }
            }
        )*

        impl fmt::Debug for XcbError {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(
                        Self::$name(_) => write!(f, stringify!($name)),
                    )*
                }
            }
        }

        impl fmt::Display for XcbError {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "X server returned an error reply")
            }
        }
    };
}

xcb_error_impl! {
    Generic => xcb::GenericError,
    Atom => xcb::AtomError,
    Value => xcb::ValueError,
    Window => xcb::WindowError,
}

/// Errors that can occur while talking to the X server.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// The connection itself failed or was closed.
    Connection(xcb::ConnError),
    /// A request came back with an X error reply.
    Xcb(XcbError),
    /// A reply was expected but the resource no longer exists
    /// (the window was destroyed between request and reply).
    Stale(&'static str),
    /// A required resource could not be found at all (e.g. no screen).
    NotFound(&'static str),
}

impl From<xcb::ConnError> for Error {
    fn from(e: xcb::ConnError) -> Self {
        Self::Connection(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(e) => write!(f, "X connection error: {:?}", e),
            Self::Xcb(e) => write!(f, "{}", e),
            Self::Stale(what) => write!(f, "stale window reference: {}", what),
            Self::NotFound(what) => write!(f, "not found: {}", what),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
