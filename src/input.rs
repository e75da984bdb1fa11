//! The key binding table, modifier-keycode discovery, and grab management.

use log::error;
use nerdwm_x11::keysym::KeySymbols;
use nerdwm_x11::{xcb, Context};

use crate::config::{MODIFIER_MASK, MOUSE_MODIFIER_MASK};

/// A bound command, independent of which physical key or shift state
/// triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SpawnTerminal,
    Fix,
    MoveLeft,
    MoveDown,
    MoveUp,
    MoveRight,
    ResizeLeft,
    ResizeDown,
    ResizeUp,
    ResizeRight,
    TabNext,
    MaxVert,
    RaiseOrLower,
    Maximize,
    Workspace(usize),
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    DeleteWindow,
}

/// One entry in the fixed binding table: the keysym that produces it, and
/// whether it fires shifted or unshifted.
struct Binding {
    keysym: xcb::Keysym,
    shifted: bool,
    action: Action,
}

/// X11 keysym constants (from `X11/keysymdef.h`) for the keys this window
/// manager binds. Kept local rather than pulled in as a `x11-keysymdefs`
/// dependency since only twenty-odd values are needed.
mod keysyms {
    pub const RETURN: u32 = 0xff0d;
    pub const TAB: u32 = 0xff09;
    pub const END: u32 = 0xff57;
    pub const F: u32 = 0x0066;
    pub const H: u32 = 0x0068;
    pub const J: u32 = 0x006a;
    pub const K: u32 = 0x006b;
    pub const L: u32 = 0x006c;
    pub const M: u32 = 0x006d;
    pub const R: u32 = 0x0072;
    pub const X: u32 = 0x0078;
    pub const Y: u32 = 0x0079;
    pub const U: u32 = 0x0075;
    pub const B: u32 = 0x0062;
    pub const N: u32 = 0x006e;
    pub const NUM_1: u32 = 0x0031;
    pub const NUM_0: u32 = 0x0030;
}

fn bindings() -> Vec<Binding> {
    use keysyms::*;
    let mut table = vec![
        Binding { keysym: RETURN, shifted: false, action: Action::SpawnTerminal },
        Binding { keysym: F, shifted: false, action: Action::Fix },
        Binding { keysym: H, shifted: false, action: Action::MoveLeft },
        Binding { keysym: J, shifted: false, action: Action::MoveDown },
        Binding { keysym: K, shifted: false, action: Action::MoveUp },
        Binding { keysym: L, shifted: false, action: Action::MoveRight },
        Binding { keysym: H, shifted: true, action: Action::ResizeLeft },
        Binding { keysym: J, shifted: true, action: Action::ResizeDown },
        Binding { keysym: K, shifted: true, action: Action::ResizeUp },
        Binding { keysym: L, shifted: true, action: Action::ResizeRight },
        Binding { keysym: TAB, shifted: false, action: Action::TabNext },
        Binding { keysym: M, shifted: false, action: Action::MaxVert },
        Binding { keysym: R, shifted: false, action: Action::RaiseOrLower },
        Binding { keysym: X, shifted: false, action: Action::Maximize },
        Binding { keysym: Y, shifted: false, action: Action::TopLeft },
        Binding { keysym: U, shifted: false, action: Action::TopRight },
        Binding { keysym: B, shifted: false, action: Action::BottomLeft },
        Binding { keysym: N, shifted: false, action: Action::BottomRight },
        Binding { keysym: END, shifted: false, action: Action::DeleteWindow },
    ];
    for i in 0..10 {
        let sym = if i == 9 { NUM_0 } else { NUM_1 + i as u32 };
        table.push(Binding { keysym: sym, shifted: false, action: Action::Workspace(i as usize) });
    }
    table
}

struct ResolvedBinding {
    keycode: u8,
    shifted: bool,
    action: Action,
}

/// Keeps the resolved keycodes for every bound action plus the set of
/// physical keycodes that generate the configured modifier mask.
///
/// Recomputed wholesale on every keyboard-mapping-notify, since the
/// X server gives no cheaper way to know when a remap finished.
pub struct Bindings {
    resolved: Vec<ResolvedBinding>,
    modifier_keycodes: Vec<u8>,
}

impl Bindings {
    /// Resolves every bound keysym to a keycode and finds the keycodes that
    /// generate `MODIFIER_MASK`. Fails if no modifier keycode exists or if
    /// any bound keysym has no keycode on this keyboard.
    pub fn resolve(ctx: &Context) -> Option<Self> {
        let keysyms = KeySymbols::new(ctx.conn());

        let modifier_keycodes = modifier_keycodes(ctx)?;
        if modifier_keycodes.is_empty() {
            error!("no keycode generates the configured modifier mask");
            return None;
        }

        let mut resolved = Vec::new();
        for binding in bindings() {
            let keycode = keysyms.get_keycode(binding.keysym).next();
            match keycode {
                Some(keycode) if keycode != 0 => resolved.push(ResolvedBinding {
                    keycode,
                    shifted: binding.shifted,
                    action: binding.action,
                }),
                _ => {
                    error!("couldn't resolve keysym {:#x} to a keycode", binding.keysym);
                    return None;
                }
            }
        }

        Some(Self { resolved, modifier_keycodes })
    }

    pub fn is_modifier_keycode(&self, keycode: u8) -> bool {
        self.modifier_keycodes.contains(&keycode)
    }

    /// Looks up the action bound to `keycode`, honoring `shifted`.
    pub fn action_for(&self, keycode: u8, shifted: bool) -> Option<Action> {
        self.resolved
            .iter()
            .find(|b| b.keycode == keycode && b.shifted == shifted)
            .map(|b| b.action)
    }

    /// Installs every keyboard grab on `root`: each modifier keycode with
    /// `mod=ANY` (so releases are reported regardless of other state), then
    /// each bound action keycode with the plain and shifted modifier mask.
    pub fn grab_keys(&self, ctx: &Context, root: xcb::Window) {
        for &keycode in &self.modifier_keycodes {
            ctx.grab_key(root, xcb::MOD_MASK_ANY as u16, keycode);
        }
        for binding in &self.resolved {
            ctx.grab_key(root, MODIFIER_MASK, binding.keycode);
            ctx.grab_key(root, MODIFIER_MASK | xcb::MOD_MASK_SHIFT as u16, binding.keycode);
        }
        ctx.flush();
    }

    pub fn ungrab_keys(&self, ctx: &Context, root: xcb::Window) {
        ctx.ungrab_all_keys(root);
    }
}

fn modifier_keycodes(ctx: &Context) -> Option<Vec<u8>> {
    const MASKS: [u32; 8] = [
        xcb::MOD_MASK_SHIFT,
        xcb::MOD_MASK_LOCK,
        xcb::MOD_MASK_CONTROL,
        xcb::MOD_MASK_1,
        xcb::MOD_MASK_2,
        xcb::MOD_MASK_3,
        xcb::MOD_MASK_4,
        xcb::MOD_MASK_5,
    ];
    let rows = ctx.get_modifier_mapping().ok()?;
    let idx = MASKS.iter().position(|&m| m == MODIFIER_MASK as u32)?;
    let row = rows.get(idx)?;
    Some(row.iter().copied().filter(|&code| code != 0).collect())
}

/// Installs the three mouse-button grabs (left/middle/right) on `root`
/// with the configured pointer modifier.
pub fn grab_buttons(ctx: &Context, root: xcb::Window) {
    for button in 1..=3u8 {
        ctx.grab_button(root, MOUSE_MODIFIER_MASK, button);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_cover_all_ten_workspaces() {
        let count = bindings().iter().filter(|b| matches!(b.action, Action::Workspace(_))).count();
        assert_eq!(count, 10);
    }

    #[test]
    fn hjkl_have_both_shifted_and_unshifted_entries() {
        for sym in [keysyms::H, keysyms::J, keysyms::K, keysyms::L] {
            let unshifted = bindings().iter().any(|b| b.keysym == sym && !b.shifted);
            let shifted = bindings().iter().any(|b| b.keysym == sym && b.shifted);
            assert!(unshifted && shifted);
        }
    }
}
