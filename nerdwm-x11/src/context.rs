//! The X server connection and every wire request `nerdwm` issues against it.

use std::os::unix::io::{AsRawFd, RawFd};

use crate::error::{Error, Result};
use crate::event::Event;

/// Live geometry of a window, in root coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

/// A snapshot of the pointer relative to a window.
#[derive(Debug, Clone, Copy)]
pub struct PointerState {
    pub root_x: i16,
    pub root_y: i16,
    pub win_x: i16,
    pub win_y: i16,
    pub child: xcb::Window,
}

/// The subset of `WM_NORMAL_HINTS` this window manager cares about.
#[derive(Debug, Clone, Copy)]
pub struct SizeHints {
    pub user_coord: bool,
    pub min_width: u16,
    pub min_height: u16,
    pub max_width: u16,
    pub max_height: u16,
    pub width_inc: u16,
    pub height_inc: u16,
    pub base_width: u16,
    pub base_height: u16,
}

const SIZE_HINT_US_POSITION: u32 = 1 << 0;
const SIZE_HINT_P_MIN_SIZE: u32 = 1 << 4;
const SIZE_HINT_P_MAX_SIZE: u32 = 1 << 5;
const SIZE_HINT_P_RESIZE_INC: u32 = 1 << 6;
const SIZE_HINT_P_BASE_SIZE: u32 = 1 << 8;

/// Whether a window is currently mapped, per `get_window_attributes`.
#[derive(Debug, Clone, Copy)]
pub struct WindowAttributes {
    pub override_redirect: bool,
    pub mapped: bool,
}

/// The X server connection, and every request this window manager issues.
///
/// All requests that have a reply are resolved synchronously; there is no
/// async-with-reply path on the hot event loop (see the error handling
/// design: replies are awaited within the handler that issued them).
pub struct Context {
    conn: xcb::Connection,
    screen_num: i32,
}

impl Context {
    /// Connects to the display named by `$DISPLAY`.
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = xcb::Connection::connect(None)?;
        Ok(Self { conn, screen_num })
    }

    pub fn conn(&self) -> &xcb::Connection {
        &self.conn
    }

    pub fn flush(&self) {
        self.conn.flush();
    }

    pub fn has_error(&self) -> Result<()> {
        self.conn.has_error().map_err(Error::from)
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.conn.as_raw_fd()
    }

    pub fn poll_for_event(&self) -> Option<Event> {
        self.conn.poll_for_event().map(Event::from)
    }

    fn screen(&self) -> Result<xcb::Screen<'_>> {
        self.conn
            .get_setup()
            .roots()
            .nth(self.screen_num as usize)
            .ok_or(Error::NotFound("screen"))
    }

    pub fn root(&self) -> Result<xcb::Window> {
        Ok(self.screen()?.root())
    }

    pub fn default_colormap(&self) -> Result<xcb::Colormap> {
        Ok(self.screen()?.default_colormap())
    }

    pub fn root_geometry(&self) -> Result<Geometry> {
        let root = self.root()?;
        self.get_geometry(root)
    }

    // -- window queries --------------------------------------------------

    pub fn get_window_attributes(&self, window: xcb::Window) -> Result<WindowAttributes> {
        let reply = xcb::get_window_attributes(&self.conn, window)
            .get_reply()
            .map_err(|_| Error::Stale("get_window_attributes"))?;
        Ok(WindowAttributes {
            override_redirect: reply.override_redirect(),
            mapped: reply.map_state() as u32 == xcb::MAP_STATE_VIEWABLE,
        })
    }

    pub fn query_tree(&self, window: xcb::Window) -> Result<Vec<xcb::Window>> {
        let reply = xcb::query_tree(&self.conn, window)
            .get_reply()
            .map_err(|_| Error::Stale("query_tree"))?;
        Ok(reply.children().to_vec())
    }

    pub fn get_geometry(&self, drawable: xcb::Drawable) -> Result<Geometry> {
        let reply = xcb::get_geometry(&self.conn, drawable)
            .get_reply()
            .map_err(|_| Error::Stale("get_geometry"))?;
        Ok(Geometry {
            x: reply.x(),
            y: reply.y(),
            width: reply.width(),
            height: reply.height(),
        })
    }

    pub fn query_pointer(&self, window: xcb::Window) -> Result<PointerState> {
        let reply = xcb::query_pointer(&self.conn, window)
            .get_reply()
            .map_err(|_| Error::Stale("query_pointer"))?;
        Ok(PointerState {
            root_x: reply.root_x(),
            root_y: reply.root_y(),
            win_x: reply.win_x(),
            win_y: reply.win_y(),
            child: reply.child(),
        })
    }

    /// Rows of keycodes that generate each of the eight fixed modifiers
    /// (shift, lock, control, mod1..mod5), in that order.
    pub fn get_modifier_mapping(&self) -> Result<Vec<Vec<u8>>> {
        let reply = xcb::get_modifier_mapping(&self.conn)
            .get_reply()
            .map_err(|_| Error::Stale("get_modifier_mapping"))?;
        let per = reply.keycodes_per_modifier() as usize;
        let codes = reply.keycodes();
        Ok(codes.chunks(per).map(|c| c.to_vec()).collect())
    }

    pub fn get_wm_normal_hints(&self, window: xcb::Window, atom: xcb::Atom) -> Result<Option<SizeHints>> {
        let reply = xcb::get_property(&self.conn, false, window, atom, xcb::ATOM_ANY, 0, 18)
            .get_reply()
            .map_err(|_| Error::Stale("get_property(WM_NORMAL_HINTS)"))?;
        let words = reply.value::<u32>();
        if words.is_empty() {
            return Ok(None);
        }
        let word = |i: usize| -> u32 { words.get(i).copied().unwrap_or(0) };
        let flags = word(0);
        Ok(Some(SizeHints {
            user_coord: flags & SIZE_HINT_US_POSITION != 0,
            min_width: if flags & SIZE_HINT_P_MIN_SIZE != 0 { word(5) as u16 } else { 0 },
            min_height: if flags & SIZE_HINT_P_MIN_SIZE != 0 { word(6) as u16 } else { 0 },
            max_width: if flags & SIZE_HINT_P_MAX_SIZE != 0 { word(7) as u16 } else { 0 },
            max_height: if flags & SIZE_HINT_P_MAX_SIZE != 0 { word(8) as u16 } else { 0 },
            width_inc: if flags & SIZE_HINT_P_RESIZE_INC != 0 { word(9) as u16 } else { 1 },
            height_inc: if flags & SIZE_HINT_P_RESIZE_INC != 0 { word(10) as u16 } else { 1 },
            base_width: if flags & SIZE_HINT_P_BASE_SIZE != 0 { word(15) as u16 } else { 0 },
            base_height: if flags & SIZE_HINT_P_BASE_SIZE != 0 { word(16) as u16 } else { 0 },
        }))
    }

    // -- grabs -------------------------------------------------------------

    pub fn grab_server(&self) -> Result<()> {
        xcb::grab_server_checked(&self.conn)
            .request_check()
            .map_err(Error::from)
    }

    pub fn ungrab_server(&self) -> Result<()> {
        xcb::ungrab_server_checked(&self.conn)
            .request_check()
            .map_err(Error::from)
    }

    pub fn grab_key(&self, grab_window: xcb::Window, modifiers: u16, keycode: u8) {
        xcb::grab_key(
            &self.conn,
            true,
            grab_window,
            modifiers,
            keycode,
            xcb::GRAB_MODE_ASYNC as u8,
            xcb::GRAB_MODE_ASYNC as u8,
        );
    }

    pub fn ungrab_key(&self, grab_window: xcb::Window, keycode: u8, modifiers: u16) {
        xcb::ungrab_key(&self.conn, keycode, grab_window, modifiers);
    }

    pub fn ungrab_all_keys(&self, grab_window: xcb::Window) {
        xcb::ungrab_key(&self.conn, xcb::GRAB_ANY as u8, grab_window, xcb::MOD_MASK_ANY as u16);
    }

    pub fn grab_button(&self, grab_window: xcb::Window, modifiers: u16, button: u8) {
        xcb::grab_button(
            &self.conn,
            false,
            grab_window,
            (xcb::EVENT_MASK_BUTTON_PRESS | xcb::EVENT_MASK_BUTTON_RELEASE) as u16,
            xcb::GRAB_MODE_ASYNC as u8,
            xcb::GRAB_MODE_ASYNC as u8,
            xcb::NONE,
            xcb::NONE,
            button,
            modifiers,
        );
    }

    pub fn grab_pointer_for_drag(&self, root: xcb::Window, time: xcb::Timestamp) -> Result<()> {
        let cookie = xcb::grab_pointer(
            &self.conn,
            false,
            root,
            (xcb::EVENT_MASK_BUTTON_RELEASE | xcb::EVENT_MASK_POINTER_MOTION) as u16,
            xcb::GRAB_MODE_ASYNC as u8,
            xcb::GRAB_MODE_ASYNC as u8,
            root,
            xcb::NONE,
            time,
        );
        let _ = cookie.get_reply().map_err(|_| Error::Stale("grab_pointer"))?;
        Ok(())
    }

    pub fn ungrab_pointer(&self, time: xcb::Timestamp) {
        xcb::ungrab_pointer(&self.conn, time);
    }

    // -- window mutation -----------------------------------------------

    pub fn configure_window(&self, window: xcb::Window, values: &[(u16, u32)]) {
        xcb::configure_window(&self.conn, window, values);
    }

    pub fn map_window(&self, window: xcb::Window) {
        xcb::map_window(&self.conn, window);
    }

    pub fn unmap_window(&self, window: xcb::Window) {
        xcb::unmap_window(&self.conn, window);
    }

    pub fn change_window_attributes(&self, window: xcb::Window, values: &[(u32, u32)]) {
        xcb::change_window_attributes(&self.conn, window, values);
    }

    pub fn change_window_attributes_checked(&self, window: xcb::Window, values: &[(u32, u32)]) -> Result<()> {
        xcb::change_window_attributes_checked(&self.conn, window, values)
            .request_check()
            .map_err(Error::from)
    }

    pub fn set_border_width(&self, window: xcb::Window, width: u32) {
        self.configure_window(window, &[(xcb::CONFIG_WINDOW_BORDER_WIDTH as u16, width)]);
    }

    pub fn set_border_pixel(&self, window: xcb::Window, pixel: u32) {
        self.change_window_attributes(window, &[(xcb::CW_BORDER_PIXEL, pixel)]);
    }

    pub fn set_input_focus(&self, window: Option<xcb::Window>, time: xcb::Timestamp) {
        match window {
            Some(w) => xcb::set_input_focus(&self.conn, xcb::INPUT_FOCUS_POINTER_ROOT as u8, w, time),
            None => xcb::set_input_focus(
                &self.conn,
                xcb::INPUT_FOCUS_NONE as u8,
                xcb::INPUT_FOCUS_POINTER_ROOT as u32,
                time,
            ),
        };
    }

    pub fn warp_pointer(&self, dst: xcb::Window, x: i16, y: i16) {
        xcb::warp_pointer(&self.conn, xcb::NONE, dst, 0, 0, 0, 0, x, y);
    }

    pub fn warp_pointer_root(&self, root: xcb::Window, x: i16, y: i16) {
        self.warp_pointer(root, x, y);
    }

    pub fn raise_window(&self, window: xcb::Window, root: xcb::Window) {
        if window == 0 || window == root {
            return;
        }
        self.configure_window(window, &[(xcb::CONFIG_WINDOW_STACK_MODE as u16, xcb::STACK_MODE_ABOVE)]);
    }

    pub fn raise_if_occluded(&self, window: xcb::Window) {
        self.configure_window(window, &[(xcb::CONFIG_WINDOW_STACK_MODE as u16, xcb::STACK_MODE_TOP_IF)]);
    }

    pub fn lower_window(&self, window: xcb::Window) {
        self.configure_window(window, &[(xcb::CONFIG_WINDOW_STACK_MODE as u16, xcb::STACK_MODE_BELOW)]);
    }

    pub fn move_window(&self, window: xcb::Window, x: i32, y: i32) {
        self.configure_window(
            window,
            &[
                (xcb::CONFIG_WINDOW_X as u16, x as u32),
                (xcb::CONFIG_WINDOW_Y as u16, y as u32),
            ],
        );
    }

    pub fn resize_window(&self, window: xcb::Window, width: u32, height: u32) {
        self.configure_window(
            window,
            &[
                (xcb::CONFIG_WINDOW_WIDTH as u16, width),
                (xcb::CONFIG_WINDOW_HEIGHT as u16, height),
            ],
        );
    }

    // -- colors ------------------------------------------------------------

    pub fn alloc_named_color(&self, colormap: xcb::Colormap, name: &str) -> Result<u32> {
        let reply = xcb::alloc_named_color(&self.conn, colormap, name)
            .get_reply()
            .map_err(|_| Error::NotFound("color name"))?;
        Ok(reply.pixel())
    }

    // -- atoms & properties --------------------------------------------

    pub fn intern_atom(&self, name: &str) -> Result<xcb::Atom> {
        let reply = xcb::intern_atom(&self.conn, false, name)
            .get_reply()
            .map_err(|_| Error::NotFound("atom"))?;
        Ok(reply.atom())
    }

    pub fn change_property_u32(&self, window: xcb::Window, property: xcb::Atom, type_: xcb::Atom, data: &[u32]) {
        xcb::change_property(
            &self.conn,
            xcb::PROP_MODE_REPLACE as u8,
            window,
            property,
            type_,
            32,
            data,
        );
    }

    pub fn get_property_u32(&self, window: xcb::Window, property: xcb::Atom) -> Result<Option<u32>> {
        let reply = xcb::get_property(&self.conn, false, window, property, xcb::ATOM_ANY, 0, 1)
            .get_reply()
            .map_err(|_| Error::Stale("get_property"))?;
        Ok(reply.value::<u32>().first().copied())
    }

    /// Reads an atom-valued property list (used for `WM_PROTOCOLS`).
    pub fn get_property_atoms(&self, window: xcb::Window, property: xcb::Atom) -> Result<Vec<xcb::Atom>> {
        let reply = xcb::get_property(&self.conn, false, window, property, xcb::ATOM_ATOM, 0, 32)
            .get_reply()
            .map_err(|_| Error::Stale("get_property(atoms)"))?;
        Ok(reply.value::<xcb::Atom>().to_vec())
    }

    // -- messages & lifecycle -----------------------------------------

    pub fn send_protocol_message(&self, window: xcb::Window, protocols_atom: xcb::Atom, value: xcb::Atom, time: xcb::Timestamp) {
        let data = xcb::ClientMessageData::from_data32([value, time, 0, 0, 0]);
        let event = xcb::ClientMessageEvent::new(32, window, protocols_atom, data);
        xcb::send_event(&self.conn, false, window, 0, &event);
    }

    pub fn forward_key_event(&self, window: xcb::Window, event: &xcb::KeyPressEvent) {
        xcb::send_event(&self.conn, true, window, xcb::EVENT_MASK_KEY_PRESS, event);
    }

    pub fn kill_client(&self, window: xcb::Window) {
        xcb::kill_client(&self.conn, window);
    }

    pub fn circulate_window(&self, window: xcb::Window, place: u8) {
        xcb::circulate_window(&self.conn, window, place);
    }
}
