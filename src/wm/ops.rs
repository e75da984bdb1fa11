//! Geometry policies and workspace/fixed-window operations: the IO glue
//! around the pure arithmetic in `geometry.rs`.

use nerdwm_x11::xcb;

use crate::config::{BORDER_WIDTH, MOVE_STEP, NET_WM_FIXED, WORKSPACE_COUNT};
use crate::geometry::{self, Corner, Direction, Rect};

use super::WindowManager;

impl WindowManager {
    pub(super) fn client_rect(&self, window: xcb::Window) -> Option<Rect> {
        let geom = self.ctx.get_geometry(window).ok()?;
        Some(Rect::new(geom.x, geom.y, geom.width, geom.height))
    }

    /// Writes the un-maximize geometry. Preserves the original's
    /// inconsistent mask between the full-maximize and vertical-maximize
    /// restore paths: vertical restore never touches `x`.
    fn unmax(&mut self, window: xcb::Window) {
        let client = match self.registry.find(window) {
            Some(c) => c,
            None => return,
        };
        if client.maxed {
            self.ctx.configure_window(
                window,
                &[
                    (xcb::CONFIG_WINDOW_X as u16, client.x as u32),
                    (xcb::CONFIG_WINDOW_Y as u16, client.y as u32),
                    (xcb::CONFIG_WINDOW_WIDTH as u16, client.width as u32),
                    (xcb::CONFIG_WINDOW_HEIGHT as u16, client.height as u32),
                    (xcb::CONFIG_WINDOW_BORDER_WIDTH as u16, BORDER_WIDTH as u32),
                ],
            );
        } else {
            self.ctx.configure_window(
                window,
                &[
                    (xcb::CONFIG_WINDOW_Y as u16, client.y as u32),
                    (xcb::CONFIG_WINDOW_WIDTH as u16, client.width as u32),
                    (xcb::CONFIG_WINDOW_HEIGHT as u16, client.height as u32),
                ],
            );
        }
        self.ctx.warp_pointer(window, 1, 1);
        self.ctx.flush();
    }

    /// Toggles full maximize: borderless, full-root rectangle.
    pub(super) fn toggle_maximize(&mut self, window: xcb::Window) {
        let maxed = match self.registry.find(window) {
            Some(c) => c.maxed,
            None => return,
        };
        if maxed {
            self.unmax(window);
            if let Some(client) = self.registry.find_mut(window) {
                client.maxed = false;
            }
            return;
        }

        let rect = match self.client_rect(window) {
            Some(r) => r,
            None => return,
        };
        self.ctx.raise_window(window, self.root);

        let target = geometry::maximize_rect(self.root_width, self.root_height);
        self.ctx.configure_window(
            window,
            &[
                (xcb::CONFIG_WINDOW_BORDER_WIDTH as u16, 0),
                (xcb::CONFIG_WINDOW_X as u16, target.x as u32),
                (xcb::CONFIG_WINDOW_Y as u16, target.y as u32),
                (xcb::CONFIG_WINDOW_WIDTH as u16, target.width as u32),
                (xcb::CONFIG_WINDOW_HEIGHT as u16, target.height as u32),
            ],
        );
        self.ctx.flush();

        if let Some(client) = self.registry.find_mut(window) {
            client.x = rect.x;
            client.y = rect.y;
            client.width = rect.width;
            client.height = rect.height;
            client.maxed = true;
        }
    }

    /// Toggles vertical maximize: full root height, x and width preserved.
    pub(super) fn toggle_maxvert(&mut self, window: xcb::Window) {
        let vertmaxed = match self.registry.find(window) {
            Some(c) => c.vertmaxed,
            None => return,
        };
        if vertmaxed {
            self.unmax(window);
            if let Some(client) = self.registry.find_mut(window) {
                client.vertmaxed = false;
            }
            return;
        }

        self.ctx.raise_window(window, self.root);
        let rect = match self.client_rect(window) {
            Some(r) => r,
            None => return,
        };

        let (height_inc, base_height) = self
            .registry
            .find(window)
            .map(|c| (c.height_inc, c.base_height))
            .unwrap_or((1, 0));
        let height = geometry::vertmax_height(self.root_height, BORDER_WIDTH, height_inc, base_height);

        self.ctx.configure_window(
            window,
            &[(xcb::CONFIG_WINDOW_Y as u16, 0), (xcb::CONFIG_WINDOW_HEIGHT as u16, height as u32)],
        );
        self.ctx.flush();

        if let Some(client) = self.registry.find_mut(window) {
            client.x = rect.x;
            client.y = rect.y;
            client.width = rect.width;
            client.height = rect.height;
            client.vertmaxed = true;
        }
    }

    pub(super) fn raise_or_lower(&mut self, window: xcb::Window) {
        self.ctx.configure_window(window, &[(xcb::CONFIG_WINDOW_STACK_MODE as u16, xcb::STACK_MODE_OPPOSITE)]);
        self.ctx.flush();
    }

    /// Translates `window` one step in `dir`. Preserves the pointer's
    /// in-window position across the move if it had one.
    pub(super) fn step_move(&mut self, window: xcb::Window, dir: Direction) {
        let maxed = self.registry.find(window).map(|c| c.maxed).unwrap_or(true);
        if maxed {
            return;
        }
        let pointer = match self.ctx.query_pointer(window) {
            Ok(p) => p,
            Err(_) => return,
        };
        let rect = match self.client_rect(window) {
            Some(r) => r,
            None => return,
        };

        self.ctx.raise_window(window, self.root);
        let moved = geometry::step_move(rect, dir, MOVE_STEP, self.root_width, self.root_height, BORDER_WIDTH);
        self.ctx.move_window(window, moved.x as i32, moved.y as i32);

        let width_with_border = rect.width + 2 * BORDER_WIDTH;
        let height_with_border = rect.height + 2 * BORDER_WIDTH;
        if pointer.win_x > -(BORDER_WIDTH as i16)
            && pointer.win_x < width_with_border as i16
            && pointer.win_y > -(BORDER_WIDTH as i16)
            && pointer.win_y < height_with_border as i16
        {
            self.ctx.warp_pointer(window, pointer.win_x, pointer.win_y);
        }
        self.ctx.flush();
    }

    /// Grows or shrinks `window` one size-hint step in `dir`.
    pub(super) fn step_resize(&mut self, window: xcb::Window, dir: Direction) {
        let (maxed, width_inc, height_inc, min_width, min_height) = match self.registry.find(window) {
            Some(c) => (c.maxed, c.width_inc, c.height_inc, c.min_width, c.min_height),
            None => return,
        };
        if maxed {
            return;
        }
        let pointer = match self.ctx.query_pointer(window) {
            Ok(p) => p,
            Err(_) => return,
        };
        let rect = match self.client_rect(window) {
            Some(r) => r,
            None => return,
        };
        self.ctx.raise_window(window, self.root);

        let resized = geometry::step_resize(
            rect,
            dir,
            width_inc,
            height_inc,
            min_width,
            min_height,
            self.root_width,
            self.root_height,
            BORDER_WIDTH,
        );
        self.ctx.resize_window(window, resized.width as u32, resized.height as u32);

        if let Some(client) = self.registry.find_mut(window) {
            client.vertmaxed = false;
        }

        let pointer_in_window = (pointer.win_x > -(BORDER_WIDTH as i16)
            && pointer.win_x < rect.width as i16 + BORDER_WIDTH as i16
            && pointer.win_y > -(BORDER_WIDTH as i16)
            && pointer.win_y < rect.height as i16 + BORDER_WIDTH as i16)
            .then(|| (pointer.win_x, pointer.win_y));

        if let Some(warp) = geometry::warp_after_resize(
            pointer_in_window,
            rect,
            resized,
            width_inc.max(1),
            height_inc.max(1),
        ) {
            self.ctx.warp_pointer(window, warp.0, warp.1);
        }
        self.ctx.flush();
    }

    /// Continuous drag-move: clamp the live pointer into the valid origin
    /// range and configure the window there.
    pub(super) fn mouse_move(&mut self, window: xcb::Window, root_x: i16, root_y: i16) {
        let rect = match self.client_rect(window) {
            Some(r) => r,
            None => return,
        };
        let (x, y) =
            geometry::mouse_move_clamp(root_x, root_y, rect.width, rect.height, self.root_width, self.root_height, BORDER_WIDTH);
        self.ctx.move_window(window, x as i32, y as i32);
        self.ctx.flush();
    }

    /// Continuous drag-resize from the saved grab-time origin.
    pub(super) fn mouse_resize(&mut self, window: xcb::Window, root_x: i16, root_y: i16, origin: (i16, i16)) {
        let (base_width, base_height, width_inc, height_inc, min_width, min_height) = match self.registry.find(window) {
            Some(c) => (c.base_width, c.base_height, c.width_inc, c.height_inc, c.min_width, c.min_height),
            None => return,
        };
        let (width, height) = geometry::mouse_resize_dims(
            root_x,
            root_y,
            origin.0,
            origin.1,
            base_width,
            base_height,
            width_inc,
            height_inc,
            min_width,
            min_height,
            self.root_width,
            self.root_height,
            BORDER_WIDTH,
        );
        self.ctx.resize_window(window, width as u32, height as u32);
        if let Some(client) = self.registry.find_mut(window) {
            client.vertmaxed = false;
        }
        self.ctx.flush();
    }

    pub(super) fn place_corner(&mut self, window: xcb::Window, corner: Corner) {
        self.ctx.raise_window(window, self.root);
        let pointer = match self.ctx.query_pointer(window) {
            Ok(p) => p,
            Err(_) => return,
        };
        let rect = match self.client_rect(window) {
            Some(r) => r,
            None => return,
        };
        let (x, y) = geometry::corner_origin(corner, rect.width, rect.height, self.root_width, self.root_height, BORDER_WIDTH);
        self.ctx.move_window(window, x as i32, y as i32);
        self.ctx.warp_pointer(window, pointer.win_x, pointer.win_y);
        self.ctx.flush();
    }

    /// Reflows every managed client to fit a new root size: clamp, clear
    /// `maxed`/`vertmaxed`, and restore the border on any client that was
    /// maximized.
    pub(super) fn screen_fit_reflow(&mut self, root_width: u16, root_height: u16) {
        let windows: Vec<xcb::Window> = self.registry.iter().map(|c| c.window).collect();
        for window in windows {
            let rect = match self.client_rect(window) {
                Some(r) => r,
                None => continue,
            };
            let fitted = geometry::clamp_to_root(rect, root_width, root_height, BORDER_WIDTH);

            let was_maxed = self.registry.find(window).map(|c| c.maxed).unwrap_or(false);
            if was_maxed {
                self.ctx.set_border_width(window, BORDER_WIDTH as u32);
            }
            if fitted != rect {
                self.ctx.configure_window(
                    window,
                    &[
                        (xcb::CONFIG_WINDOW_X as u16, fitted.x as u32),
                        (xcb::CONFIG_WINDOW_Y as u16, fitted.y as u32),
                        (xcb::CONFIG_WINDOW_WIDTH as u16, fitted.width as u32),
                        (xcb::CONFIG_WINDOW_HEIGHT as u16, fitted.height as u32),
                    ],
                );
            }
            if let Some(client) = self.registry.find_mut(window) {
                client.maxed = false;
                client.vertmaxed = false;
            }
        }
        self.ctx.flush();
    }

    /// Flips `fixed`, migrating the `_NET_WM_DESKTOP` hint between the
    /// current workspace index and the sticky sentinel. Raises the window
    /// first when becoming fixed so switching workspaces can't occlude it.
    pub(super) fn set_fixed(&mut self, window: xcb::Window, fixed: bool, paint_border: bool) {
        let current = self.workspaces.current();
        if fixed {
            self.ctx.raise_window(window, self.root);
        }
        if let Some(client) = self.registry.find_mut(window) {
            client.fixed = fixed;
        }
        let hint = if fixed { NET_WM_FIXED } else { current as u32 };
        self.ctx.change_property_u32(window, self.atoms.net_wm_desktop, xcb::ATOM_CARDINAL, &[hint]);

        if paint_border && self.config.borders {
            let pixel = if fixed { self.fixed_pixel } else { self.focus_pixel };
            self.ctx.change_window_attributes(window, &[(xcb::CW_BORDER_PIXEL, pixel)]);
        }
        self.ctx.flush();
    }

    pub(super) fn toggle_fixed(&mut self, window: xcb::Window) {
        let fixed = self.registry.find(window).map(|c| c.fixed).unwrap_or(false);
        self.set_fixed(window, !fixed, true);
    }

    /// Switches to workspace `ws`: unfocuses a non-fixed current focus,
    /// migrates fixed clients to the new list, unmaps everything else on
    /// the old list, maps everything new, then updates `current`.
    pub(super) fn change_workspace(&mut self, ws: usize) {
        let current = self.workspaces.current();
        if ws == current || ws >= WORKSPACE_COUNT {
            return;
        }

        if let Some(focused) = self.focus {
            let fixed = self.registry.find(focused).map(|c| c.fixed).unwrap_or(false);
            if !fixed {
                self.set_focus(None);
            }
        }

        let members: Vec<xcb::Window> = self.workspaces.iter(current).collect();
        for window in members {
            let fixed = self.registry.find(window).map(|c| c.fixed).unwrap_or(false);
            if fixed {
                self.add_to_workspace(window, ws);
                self.remove_from_workspace(window, current);
            } else {
                self.ctx.unmap_window(window);
            }
        }

        for window in self.workspaces.iter(ws).collect::<Vec<_>>() {
            let fixed = self.registry.find(window).map(|c| c.fixed).unwrap_or(false);
            if !fixed {
                self.ctx.map_window(window);
            }
        }

        self.ctx.flush();
        self.workspaces.set_current(ws);
    }

    /// Sends `WM_DELETE_WINDOW` if the client advertises it in
    /// `WM_PROTOCOLS`, otherwise forcibly kills the connection.
    pub(super) fn delete_focused(&mut self) {
        let window = match self.focus {
            Some(w) => w,
            None => return,
        };
        let advertises_delete = self
            .ctx
            .get_property_atoms(window, self.atoms.wm_protocols)
            .map(|atoms| atoms.contains(&self.atoms.wm_delete_window))
            .unwrap_or(false);

        if advertises_delete {
            self.ctx.send_protocol_message(window, self.atoms.wm_protocols, self.atoms.wm_delete_window, xcb::CURRENT_TIME);
        } else {
            self.ctx.kill_client(window);
        }
        self.ctx.flush();
    }

    pub(super) fn spawn_terminal(&self) {
        crate::terminal::spawn(&self.config.terminal);
    }
}
