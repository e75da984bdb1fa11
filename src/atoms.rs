//! Interned atoms this window manager cares about.
//!
//! Only three: the single EWMH hint we support, and the two atoms needed to
//! speak `WM_DELETE_WINDOW`. Everything else about atom interning (caching,
//! concurrency) is out of scope — this is a plain struct filled in once at
//! startup, read from the single event-loop thread afterwards.

use nerdwm_x11::{xcb, Context, Result};

#[derive(Debug, Clone, Copy)]
pub struct Atoms {
    pub net_wm_desktop: xcb::Atom,
    pub wm_delete_window: xcb::Atom,
    pub wm_protocols: xcb::Atom,
}

impl Atoms {
    pub fn intern(ctx: &Context) -> Result<Self> {
        Ok(Self {
            net_wm_desktop: ctx.intern_atom("_NET_WM_DESKTOP")?,
            wm_delete_window: ctx.intern_atom("WM_DELETE_WINDOW")?,
            wm_protocols: ctx.intern_atom("WM_PROTOCOLS")?,
        })
    }
}
