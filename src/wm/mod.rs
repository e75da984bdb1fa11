//! The central owned context: connection, configuration, client registry,
//! workspace table, focus, mode and signal flag, plus bootstrap/teardown
//! and the event dispatch loop that drives everything else.

mod focus;
mod handlers;
mod ops;

use log::{debug, info, warn};
use nerdwm_x11::{xcb, Context};

use crate::atoms::Atoms;
use crate::client::ClientRegistry;
use crate::config::{Config, NET_WM_FIXED, NET_WM_NO_HINT, WORKSPACE_COUNT};
use crate::error::{Error, NerdResult};
use crate::input::Bindings;
use crate::signals;
use crate::workspace::Workspaces;

/// Saved pointer position relative to a window at the moment a drag began,
/// used to decide where to warp the pointer back to on release.
pub type DragAnchor = (i16, i16);

/// Internal modal state. Move/Resize carry the window being dragged and
/// the pointer position relative to it at grab time (`anchor`), used to
/// warp the pointer back to the same spot on button-release. Resize
/// additionally carries the window's origin at grab time (needed to
/// compute the new size from the live pointer position). Tabbing has no
/// payload of its own — `last_focus` on `WindowManager` carries that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Move { window: xcb::Window, anchor: DragAnchor },
    Resize { window: xcb::Window, origin: (i16, i16), anchor: DragAnchor },
    Tabbing,
}

pub struct WindowManager {
    ctx: Context,
    config: Config,
    atoms: Atoms,
    bindings: Bindings,

    registry: ClientRegistry,
    workspaces: Workspaces,

    root: xcb::Window,
    root_width: u16,
    root_height: u16,

    focus: Option<xcb::Window>,
    last_focus: Option<xcb::Window>,
    mode: Mode,

    focus_pixel: u32,
    unfocus_pixel: u32,
    fixed_pixel: u32,
}

impl WindowManager {
    /// Connects, resolves colors and atoms, adopts pre-existing windows,
    /// installs grabs and registers for substructure-redirect. Fails with
    /// `FatalInit` if another window manager already owns that selection.
    pub fn bootstrap(config: Config) -> NerdResult<Self> {
        signals::install().map_err(Error::FatalInit)?;

        let ctx = Context::connect()?;
        let root = ctx.root()?;
        let root_geom = ctx.root_geometry()?;
        let colormap = ctx.default_colormap()?;

        let focus_pixel = ctx.alloc_named_color(colormap, &config.focus_color)?;
        let unfocus_pixel = ctx.alloc_named_color(colormap, &config.unfocus_color)?;
        let fixed_pixel = ctx.alloc_named_color(colormap, &config.fixed_color)?;

        let atoms = Atoms::intern(&ctx)?;
        let bindings = Bindings::resolve(&ctx).ok_or(Error::FatalInit(
            "couldn't find any keycodes to the main modifier key",
        ))?;

        let mut wm = Self {
            ctx,
            config,
            atoms,
            bindings,
            registry: ClientRegistry::new(),
            workspaces: Workspaces::new(),
            root,
            root_width: root_geom.width,
            root_height: root_geom.height,
            focus: None,
            last_focus: None,
            mode: Mode::Idle,
            focus_pixel,
            unfocus_pixel,
            fixed_pixel,
        };

        wm.adopt_existing_windows()?;
        wm.bindings.grab_keys(&wm.ctx, wm.root);
        crate::input::grab_buttons(&wm.ctx, wm.root);

        wm.register_substructure_redirect()?;

        let pointer = wm.ctx.query_pointer(wm.root)?;
        wm.set_focus(wm.registry.contains(pointer.child).then(|| pointer.child));

        wm.ctx.flush();
        info!("bootstrap complete: root {}x{}", wm.root_width, wm.root_height);
        Ok(wm)
    }

    fn register_substructure_redirect(&self) -> NerdResult<()> {
        let mask = xcb::EVENT_MASK_SUBSTRUCTURE_REDIRECT
            | xcb::EVENT_MASK_STRUCTURE_NOTIFY
            | xcb::EVENT_MASK_SUBSTRUCTURE_NOTIFY;
        self.ctx
            .change_window_attributes_checked(self.root, &[(xcb::CW_EVENT_MASK, mask)])
            .map_err(|_| {
                Error::FatalInit("can't get substructure redirect — another window manager running?")
            })
    }

    fn adopt_existing_windows(&mut self) -> NerdResult<()> {
        for window in self.ctx.query_tree(self.root)? {
            let attrs = match self.ctx.get_window_attributes(window) {
                Ok(attrs) => attrs,
                Err(_) => continue,
            };
            if attrs.override_redirect || !attrs.mapped {
                continue;
            }

            let adopted = self.registry.adopt(
                &self.ctx,
                &self.config,
                window,
                self.unfocus_pixel,
                self.root_width,
                self.root_height,
            );
            if adopted.is_none() {
                continue;
            }

            let hint = self.ctx.get_property_u32(window, self.atoms.net_wm_desktop).ok().flatten();
            match hint {
                Some(NET_WM_FIXED) => {
                    self.set_fixed(window, true, false);
                    self.add_to_workspace(window, 0);
                }
                Some(ws) if (ws as usize) < WORKSPACE_COUNT => {
                    self.add_to_workspace(window, ws as usize);
                    if ws != 0 {
                        self.ctx.unmap_window(window);
                    }
                }
                _ => {
                    let _ = NET_WM_NO_HINT;
                    self.add_to_workspace(window, 0);
                }
            }
        }
        Ok(())
    }

    fn add_to_workspace(&mut self, window: xcb::Window, ws: usize) {
        let node = self.workspaces.add(ws, window);
        if let Some(client) = self.registry.find_mut(window) {
            client.set_workspace_node(ws, Some(node));
            if !client.fixed {
                self.ctx.change_property_u32(window, self.atoms.net_wm_desktop, xcb::ATOM_CARDINAL, &[ws as u32]);
            }
        }
    }

    fn remove_from_workspace(&mut self, window: xcb::Window, ws: usize) {
        if let Some(client) = self.registry.find_mut(window) {
            if let Some(node) = client.workspace_node(ws) {
                self.workspaces.remove(ws, node);
                client.set_workspace_node(ws, None);
            }
        }
    }

    /// Runs the event loop until a signal is caught, then tears down.
    pub fn run(&mut self) {
        loop {
            if let Some(event) = self.ctx.poll_for_event() {
                self.dispatch(event);
                continue;
            }

            match wait_for_readable(self.ctx.as_raw_fd()) {
                WaitResult::Readable => continue,
                WaitResult::Interrupted => break,
                WaitResult::Error => {
                    warn!("poll() on the X connection failed unexpectedly");
                    break;
                }
            }
        }

        self.teardown(signals::caught());
    }

    fn teardown(&mut self, sigcode: i32) {
        self.ctx.set_input_focus(None, xcb::CURRENT_TIME);
        for client in self.registry.iter() {
            self.ctx.map_window(client.window);
        }
        self.ctx.flush();

        if sigcode == libc::SIGSEGV {
            unsafe { libc::abort() };
        }
        debug!("clean shutdown (signal {})", sigcode);
    }
}

enum WaitResult {
    Readable,
    Interrupted,
    Error,
}

/// Blocks until the connection's fd is readable or a signal interrupts the
/// wait — the Rust equivalent of the reference implementation's
/// `select()`-over-`poll_for_event` loop.
fn wait_for_readable(fd: std::os::unix::io::RawFd) -> WaitResult {
    let mut pfd = libc::pollfd { fd, events: libc::POLLIN, revents: 0 };
    let rc = unsafe { libc::poll(&mut pfd, 1, -1) };
    if rc >= 0 {
        WaitResult::Readable
    } else {
        let errno = std::io::Error::last_os_error().raw_os_error();
        if errno == Some(libc::EINTR) {
            WaitResult::Interrupted
        } else {
            WaitResult::Error
        }
    }
}
