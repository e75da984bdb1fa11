//! The event dispatch loop: one arm per protocol event kind this window
//! manager handles (§4.7). Each handler mutates the owned context and
//! issues whatever protocol requests its policy calls for; nothing here
//! blocks except the requests' own synchronous replies.

use log::warn;

use nerdwm_x11::{xcb, Event};

use crate::config::BORDER_WIDTH;
use crate::geometry::{self, Rect};
use crate::input::{Action, Bindings};

use super::{Mode, WindowManager};

impl WindowManager {
    pub(super) fn dispatch(&mut self, event: Event) {
        match event {
            Event::WindowMapRequest(e) => self.handle_map_request(e),
            Event::WindowDestroy(e) => self.handle_destroy_notify(e),
            Event::WindowUnmap(e) => self.handle_unmap_notify(e),
            Event::WindowConfigureRequest(e) => self.handle_configure_request(e),
            Event::RootConfigureNotify(e) => self.handle_root_configure_notify(e),
            Event::CirculateRequest(e) => self.handle_circulate_request(e),
            Event::ButtonPress(e) => self.handle_button_press(e),
            Event::ButtonRelease(e) => self.handle_button_release(e),
            Event::PointerMotion(e) => self.handle_motion_notify(e),
            Event::KeyPress(e) => self.handle_key_press(e),
            Event::KeyRelease(e) => self.handle_key_release(e),
            Event::EnterNotify(e) => self.handle_enter_notify(e),
            Event::MappingNotify(e) => self.handle_mapping_notify(e),
            Event::WindowCreate(_) | Event::Unknown => {}
            _ => {}
        }
    }

    /// Adopts an unknown window, places it near the pointer (or at its own
    /// position if it asked for one), clamps it onto the screen, maps it
    /// and warps the pointer to its center. A window we already manage
    /// asking to map itself is silently ignored — it's unmapped because
    /// it belongs to another workspace, not because it wants to appear.
    fn handle_map_request(&mut self, event: xcb::MapRequestEvent) {
        let window = event.window();
        if self.registry.contains(window) {
            return;
        }

        let pointer = self.ctx.query_pointer(self.root).ok();
        if self
            .registry
            .adopt(&self.ctx, &self.config, window, self.unfocus_pixel, self.root_width, self.root_height)
            .is_none()
        {
            return;
        }

        let current = self.workspaces.current();
        self.add_to_workspace(window, current);

        let rect = match self.client_rect(window) {
            Some(r) => r,
            None => return,
        };
        let user_coord = self.registry.find(window).map(|c| c.user_coord).unwrap_or(false);
        let (origin_x, origin_y) = if user_coord {
            (rect.x, rect.y)
        } else if let Some(pointer) = pointer {
            (pointer.root_x, pointer.root_y)
        } else {
            (rect.x, rect.y)
        };

        let placed = geometry::clamp_to_root(
            Rect::new(origin_x, origin_y, rect.width, rect.height),
            self.root_width,
            self.root_height,
            BORDER_WIDTH,
        );
        self.ctx.configure_window(
            window,
            &[
                (xcb::CONFIG_WINDOW_X as u16, placed.x as u32),
                (xcb::CONFIG_WINDOW_Y as u16, placed.y as u32),
                (xcb::CONFIG_WINDOW_WIDTH as u16, placed.width as u32),
                (xcb::CONFIG_WINDOW_HEIGHT as u16, placed.height as u32),
            ],
        );
        self.ctx.map_window(window);
        self.ctx.warp_pointer(window, (placed.width / 2) as i16, (placed.height / 2) as i16);
        self.ctx.flush();
    }

    /// Clears any focus references to the destroyed window — a later
    /// enter-notify will pick a new focus if the pointer lands elsewhere
    /// — then forgets it outright.
    fn handle_destroy_notify(&mut self, event: xcb::DestroyNotifyEvent) {
        let window = event.window();
        self.clear_focus_references(window);
        self.registry.forget(window, &mut self.workspaces);
    }

    /// Forgets the window only if it was on the *current* workspace list.
    /// Unmaps produced by switching workspaces leave it on a non-current
    /// list, and unmaps for windows we never adopted are no-ops.
    fn handle_unmap_notify(&mut self, event: xcb::UnmapNotifyEvent) {
        let window = event.window();
        if !self.registry.contains(window) {
            return;
        }
        let current = self.workspaces.current();
        if self.workspaces.iter(current).any(|w| w == window) {
            self.clear_focus_references(window);
            self.registry.forget(window, &mut self.workspaces);
        }
    }

    /// Honors only the fields actually present in the request's value
    /// mask; border-width requests are always dropped (every managed
    /// window's border is under our control, not the application's).
    fn handle_configure_request(&mut self, event: xcb::ConfigureRequestEvent) {
        let mask = event.value_mask();
        let mut values = Vec::with_capacity(6);

        if mask & xcb::CONFIG_WINDOW_X as u16 != 0 {
            values.push((xcb::CONFIG_WINDOW_X as u16, event.x() as u32));
        }
        if mask & xcb::CONFIG_WINDOW_Y as u16 != 0 {
            values.push((xcb::CONFIG_WINDOW_Y as u16, event.y() as u32));
        }
        if mask & xcb::CONFIG_WINDOW_WIDTH as u16 != 0 {
            values.push((xcb::CONFIG_WINDOW_WIDTH as u16, event.width() as u32));
        }
        if mask & xcb::CONFIG_WINDOW_HEIGHT as u16 != 0 {
            values.push((xcb::CONFIG_WINDOW_HEIGHT as u16, event.height() as u32));
        }
        if mask & xcb::CONFIG_WINDOW_SIBLING as u16 != 0 {
            values.push((xcb::CONFIG_WINDOW_SIBLING as u16, event.sibling() as u32));
        }
        if mask & xcb::CONFIG_WINDOW_STACK_MODE as u16 != 0 {
            values.push((xcb::CONFIG_WINDOW_STACK_MODE as u16, event.stack_mode() as u32));
        }

        if !values.is_empty() {
            self.ctx.configure_window(event.window(), &values);
            self.ctx.flush();
        }
    }

    /// Root geometry changed — re-fit every client onto the new screen.
    fn handle_root_configure_notify(&mut self, event: xcb::ConfigureNotifyEvent) {
        if event.window() != self.root {
            return;
        }
        let (width, height) = (event.width(), event.height());
        if width != self.root_width || height != self.root_height {
            self.root_width = width;
            self.root_height = height;
            self.screen_fit_reflow(width, height);
        }
    }

    fn handle_circulate_request(&mut self, event: xcb::CirculateRequestEvent) {
        self.ctx.circulate_window(event.window(), event.place());
        self.ctx.flush();
    }

    /// Button 2 raises-or-lowers. Buttons 1 and 3 enter Move/Resize,
    /// saving the pointer's in-window position so button-release can
    /// restore it, then grab the pointer on the root for the rest of the
    /// drag.
    fn handle_button_press(&mut self, event: xcb::ButtonPressEvent) {
        let child = event.child();
        if child == 0 {
            return;
        }

        match event.detail() {
            2 => self.raise_or_lower(child),
            1 | 3 => {
                let pointer = match self.ctx.query_pointer(child) {
                    Ok(p) => p,
                    Err(_) => return,
                };
                let rect = match self.client_rect(child) {
                    Some(r) => r,
                    None => return,
                };
                self.ctx.raise_window(child, self.root);

                let anchor = (pointer.win_x, pointer.win_y);
                if event.detail() == 1 {
                    self.mode = Mode::Move { window: child, anchor };
                    self.ctx.warp_pointer(child, 1, 1);
                } else {
                    self.mode = Mode::Resize { window: child, origin: (rect.x, rect.y), anchor };
                    self.ctx.warp_pointer(child, rect.width as i16, rect.height as i16);
                }

                if self.ctx.grab_pointer_for_drag(self.root, event.time()).is_err() {
                    warn!("couldn't grab the pointer for move/resize, aborting drag");
                    self.mode = Mode::Idle;
                    return;
                }
                self.ctx.flush();
            }
            _ => {}
        }
    }

    fn handle_motion_notify(&mut self, event: xcb::MotionNotifyEvent) {
        match self.mode {
            Mode::Move { window, .. } => {
                if !self.registry.find(window).map(|c| c.maxed).unwrap_or(true) {
                    self.mouse_move(window, event.root_x(), event.root_y());
                }
            }
            Mode::Resize { window, origin, .. } => {
                if !self.registry.find(window).map(|c| c.maxed).unwrap_or(true) {
                    self.mouse_resize(window, event.root_x(), event.root_y(), origin);
                }
            }
            Mode::Idle | Mode::Tabbing => {}
        }
    }

    /// Warps the pointer back to its saved in-window position (or a safe
    /// interior point if the window shrank past it) before releasing the
    /// grab, so ungrabbing doesn't generate a spurious enter-notify into
    /// whatever window now sits under the pointer.
    fn handle_button_release(&mut self, _event: xcb::ButtonReleaseEvent) {
        let (window, anchor) = match self.mode {
            Mode::Move { window, anchor } => (window, anchor),
            Mode::Resize { window, anchor, .. } => (window, anchor),
            Mode::Idle | Mode::Tabbing => {
                self.ctx.ungrab_pointer(xcb::CURRENT_TIME);
                self.ctx.flush();
                return;
            }
        };

        if let Some(rect) = self.client_rect(window) {
            let (x, y) = geometry::restore_drag_anchor(anchor, rect.width, rect.height);
            self.ctx.warp_pointer(window, x, y);
        }
        self.ctx.ungrab_pointer(xcb::CURRENT_TIME);
        self.mode = Mode::Idle;
        self.ctx.flush();
    }

    /// Looks the keycode up in the binding table and runs the bound
    /// action; an unbound key is forwarded to the focused window
    /// untouched. A non-Tab key arriving mid-Tabbing finalizes the cycle
    /// first.
    fn handle_key_press(&mut self, event: xcb::KeyPressEvent) {
        let shifted = event.state() as u32 & xcb::MOD_MASK_SHIFT != 0;
        let action = match self.bindings.action_for(event.detail(), shifted) {
            Some(action) => action,
            None => {
                self.ctx.forward_key_event(self.focus.unwrap_or(self.root), &event);
                self.ctx.flush();
                return;
            }
        };

        if self.mode == Mode::Tabbing && action != Action::TabNext {
            self.finish_tabbing();
        }

        self.run_action(action);
    }

    fn run_action(&mut self, action: Action) {
        use crate::geometry::{Corner, Direction};

        match action {
            Action::SpawnTerminal => self.spawn_terminal(),
            Action::Fix => {
                if let Some(w) = self.focus {
                    self.toggle_fixed(w);
                }
            }
            Action::MoveLeft => self.step_move_focused(Direction::Left),
            Action::MoveDown => self.step_move_focused(Direction::Down),
            Action::MoveUp => self.step_move_focused(Direction::Up),
            Action::MoveRight => self.step_move_focused(Direction::Right),
            Action::ResizeLeft => self.step_resize_focused(Direction::Left),
            Action::ResizeDown => self.step_resize_focused(Direction::Down),
            Action::ResizeUp => self.step_resize_focused(Direction::Up),
            Action::ResizeRight => self.step_resize_focused(Direction::Right),
            Action::TabNext => self.focus_next(),
            Action::MaxVert => {
                if let Some(w) = self.focus {
                    self.toggle_maxvert(w);
                }
            }
            Action::RaiseOrLower => {
                if let Some(w) = self.focus {
                    self.raise_or_lower(w);
                }
            }
            Action::Maximize => {
                if let Some(w) = self.focus {
                    self.toggle_maximize(w);
                }
            }
            Action::Workspace(ws) => self.change_workspace(ws),
            Action::TopLeft => self.place_corner_focused(Corner::TopLeft),
            Action::TopRight => self.place_corner_focused(Corner::TopRight),
            Action::BottomLeft => self.place_corner_focused(Corner::BottomLeft),
            Action::BottomRight => self.place_corner_focused(Corner::BottomRight),
            Action::DeleteWindow => self.delete_focused(),
        }
    }

    fn step_move_focused(&mut self, dir: crate::geometry::Direction) {
        if let Some(w) = self.focus {
            self.step_move(w, dir);
        }
    }

    fn step_resize_focused(&mut self, dir: crate::geometry::Direction) {
        if let Some(w) = self.focus {
            self.step_resize(w, dir);
        }
    }

    fn place_corner_focused(&mut self, corner: crate::geometry::Corner) {
        if let Some(w) = self.focus {
            self.place_corner(w, corner);
        }
    }

    /// Key-release is only meaningful while Tabbing: releasing one of the
    /// modifier's own keycodes ends the cycle.
    fn handle_key_release(&mut self, event: xcb::KeyReleaseEvent) {
        if self.mode == Mode::Tabbing && self.bindings.is_modifier_keycode(event.detail()) {
            self.finish_tabbing();
        }
    }

    /// Ignored unless this is a normal or post-ungrab enter (grabs during
    /// move/resize/menus generate other modes we don't want stealing
    /// focus), and ignored while Tabbing so the cycle owns focus changes.
    fn handle_enter_notify(&mut self, event: xcb::EnterNotifyEvent) {
        let notify_mode = event.mode();
        if notify_mode != xcb::NOTIFY_MODE_NORMAL as u8 && notify_mode != xcb::NOTIFY_MODE_UNGRAB as u8 {
            return;
        }
        if self.mode == Mode::Tabbing {
            return;
        }

        let window = event.event();
        if Some(window) == self.focus || !self.registry.contains(window) {
            return;
        }

        let ws = self.workspaces.current();
        if let Some(old) = self.focus {
            if let Some(node) = self.registry.find(old).and_then(|c| c.workspace_node(ws)) {
                self.workspaces.move_to_head(ws, node);
            }
        }
        if let Some(node) = self.registry.find(window).and_then(|c| c.workspace_node(ws)) {
            self.workspaces.move_to_head(ws, node);
        }
        self.set_focus(Some(window));
    }

    /// A keyboard or modifier remap invalidates every grabbed keycode —
    /// ungrab everything and recompute the binding table from scratch.
    /// Pointer-mapping notifications are irrelevant and ignored.
    fn handle_mapping_notify(&mut self, event: xcb::MappingNotifyEvent) {
        let request = event.request();
        if request != xcb::MAPPING_MODIFIER as u8 && request != xcb::MAPPING_KEYBOARD as u8 {
            return;
        }

        self.bindings.ungrab_keys(&self.ctx, self.root);
        match Bindings::resolve(&self.ctx) {
            Some(bindings) => {
                self.bindings = bindings;
                self.bindings.grab_keys(&self.ctx, self.root);
                crate::input::grab_buttons(&self.ctx, self.root);
            }
            None => warn!("couldn't re-resolve key bindings after a keyboard mapping change"),
        }
    }
}
