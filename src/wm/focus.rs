//! Setting focus, and the modal Tab-cycle built on top of it.

use nerdwm_x11::xcb;

use super::{Mode, WindowManager};

impl WindowManager {
    /// Sets focus to `window`, or clears it and follows the pointer when
    /// `None`. No-op if `window` is already focused or is the root.
    pub(super) fn set_focus(&mut self, window: Option<xcb::Window>) {
        let window = match window {
            None => {
                self.focus = None;
                self.ctx.set_input_focus(None, xcb::CURRENT_TIME);
                self.ctx.flush();
                return;
            }
            Some(w) => w,
        };

        if window == self.root || Some(window) == self.focus {
            return;
        }

        if self.config.borders {
            let pixel = if self.registry.find(window).map(|c| c.fixed).unwrap_or(false) {
                self.fixed_pixel
            } else {
                self.focus_pixel
            };
            self.ctx.change_window_attributes(window, &[(xcb::CW_BORDER_PIXEL, pixel)]);

            if let Some(previous) = self.focus {
                self.ctx.change_window_attributes(previous, &[(xcb::CW_BORDER_PIXEL, self.unfocus_pixel)]);
            }
        }

        self.ctx.set_input_focus(Some(window), xcb::CURRENT_TIME);
        self.ctx.flush();
        self.focus = Some(window);
    }

    /// Clears focus/last_focus if either referenced `window`, e.g. because
    /// it was just destroyed.
    pub(super) fn clear_focus_references(&mut self, window: xcb::Window) {
        if self.focus == Some(window) {
            self.focus = None;
        }
        if self.last_focus == Some(window) {
            self.last_focus = None;
        }
    }

    /// Advances the Tab cycle by one step on the current workspace,
    /// entering Tabbing mode on the first call. Raises the target only if
    /// occluded, warps the pointer into it, then sets focus.
    pub(super) fn focus_next(&mut self) {
        let ws = self.workspaces.current();
        if self.workspaces.is_empty(ws) {
            return;
        }

        if self.mode != Mode::Tabbing {
            self.last_focus = self.focus;
            self.mode = Mode::Tabbing;
        }

        let next = match self.focus {
            None => self.workspaces.head(ws),
            Some(focused) => self.next_after(ws, focused),
        };

        if let Some(window) = next {
            self.ctx.raise_if_occluded(window);
            self.ctx.warp_pointer(window, 0, 0);
            self.set_focus(Some(window));
        }
    }

    /// The workspace-list successor of `window`, wrapping to the head.
    fn next_after(&self, ws: usize, window: xcb::Window) -> Option<xcb::Window> {
        let members: Vec<xcb::Window> = self.workspaces.iter(ws).collect();
        let pos = members.iter().position(|&w| w == window)?;
        members.get(pos + 1).copied().or_else(|| members.first().copied())
    }

    /// Ends Tabbing mode: moves `last_focus` then `focus` to the head of
    /// the current workspace list, the deferred reordering that would
    /// otherwise happen on every single Tab press.
    pub(super) fn finish_tabbing(&mut self) {
        self.mode = Mode::Idle;
        let ws = self.workspaces.current();

        if let Some(last) = self.last_focus.take() {
            if let Some(node) = self.registry.find(last).and_then(|c| c.workspace_node(ws)) {
                self.workspaces.move_to_head(ws, node);
            }
        }
        if let Some(focused) = self.focus {
            if let Some(node) = self.registry.find(focused).and_then(|c| c.workspace_node(ws)) {
                self.workspaces.move_to_head(ws, node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::workspace::Workspaces;

    #[test]
    fn tab_cycle_wraps_to_head() {
        let mut workspaces = Workspaces::new();
        workspaces.add(0, 1);
        workspaces.add(0, 2);
        workspaces.add(0, 3);
        let members: Vec<_> = workspaces.iter(0).collect();
        assert_eq!(members, vec![1, 2, 3]);

        let pos = members.iter().position(|&w| w == 3).unwrap();
        let next = members.get(pos + 1).copied().or_else(|| members.first().copied());
        assert_eq!(next, Some(1));
    }
}
