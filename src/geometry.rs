//! Pure geometry arithmetic, separated from the server round-trips that
//! drive it. Every function here takes and returns plain numbers so the
//! policies in §4.4 are exercised directly by `#[test]`s with no live
//! X connection.

/// A window rectangle in root coordinates, not counting its border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Does this rectangle fit inside a `root_width` x `root_height` screen,
    /// border included on both sides of each axis?
    pub fn fits(&self, root_width: u16, root_height: u16, border: u16) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x as i32 + self.width as i32 + 2 * border as i32 <= root_width as i32
            && self.y as i32 + self.height as i32 + 2 * border as i32 <= root_height as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Down,
    Up,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Clamps a live rectangle into `root_width` x `root_height`, shrinking it
/// first if it no longer fits at all, then sliding it so the trailing edge
/// is on screen. Used for screen-fit reflow on root resize.
pub fn clamp_to_root(rect: Rect, root_width: u16, root_height: u16, border: u16) -> Rect {
    let max_w = root_width.saturating_sub(2 * border);
    let max_h = root_height.saturating_sub(2 * border);
    let width = rect.width.min(max_w).max(1);
    let height = rect.height.min(max_h).max(1);

    let max_x = root_width as i32 - width as i32 - 2 * border as i32;
    let max_y = root_height as i32 - height as i32 - 2 * border as i32;
    let x = (rect.x as i32).min(max_x.max(0)).max(0) as i16;
    let y = (rect.y as i32).min(max_y.max(0)).max(0) as i16;

    Rect::new(x, y, width, height)
}

/// Translates `rect` one step in `dir`, clamped so it stays fully on
/// screen border-inclusive.
pub fn step_move(rect: Rect, dir: Direction, step: i16, root_width: u16, root_height: u16, border: u16) -> Rect {
    let (dx, dy) = match dir {
        Direction::Left => (-step, 0),
        Direction::Right => (step, 0),
        Direction::Up => (0, -step),
        Direction::Down => (0, step),
    };
    let max_x = (root_width as i32 - rect.width as i32 - 2 * border as i32).max(0);
    let max_y = (root_height as i32 - rect.height as i32 - 2 * border as i32).max(0);
    let x = (rect.x as i32 + dx as i32).max(0).min(max_x) as i16;
    let y = (rect.y as i32 + dy as i32).max(0).min(max_y) as i16;
    Rect::new(x, y, rect.width, rect.height)
}

/// Grows or shrinks `rect` by one size-hint step in `dir`, clamped to
/// `min_width`/`min_height` and to fit on screen.
pub fn step_resize(
    rect: Rect,
    dir: Direction,
    width_inc: u16,
    height_inc: u16,
    min_width: u16,
    min_height: u16,
    root_width: u16,
    root_height: u16,
    border: u16,
) -> Rect {
    let w_step = width_inc.max(1);
    let h_step = height_inc.max(1);

    let mut width = rect.width;
    let mut height = rect.height;

    match dir {
        Direction::Left => {
            if w_step < width {
                width -= w_step;
            }
        }
        Direction::Right => {
            width = width.saturating_add(w_step);
        }
        Direction::Up => {
            if h_step < height {
                height -= h_step;
            }
        }
        Direction::Down => {
            height = height.saturating_add(h_step);
        }
    }

    width = width.max(min_width.max(1));
    height = height.max(min_height.max(1));

    let max_w = root_width.saturating_sub(rect.x.max(0) as u16 + 2 * border);
    let max_h = root_height.saturating_sub(rect.y.max(0) as u16 + 2 * border);
    width = width.min(max_w.max(1));
    height = height.min(max_h.max(1));

    Rect::new(rect.x, rect.y, width, height)
}

/// Where to warp the pointer after a step-resize, given the pointer's
/// position relative to the window *before* the resize. Returns `None` if
/// the pointer was outside the window and so should be left alone.
///
/// If the pointer would now fall outside the shrunk window (within one
/// step of the new edge), it's recentered — but never to `(0, 0)`, which
/// would make a second warp to the same spot a no-op downstream.
pub fn warp_after_resize(
    pointer_in_window: Option<(i16, i16)>,
    old_rect: Rect,
    new_rect: Rect,
    w_step: u16,
    h_step: u16,
) -> Option<(i16, i16)> {
    let (px, py) = pointer_in_window?;
    let _ = old_rect;
    let out_of_bounds = px > new_rect.width as i16 - w_step as i16 || py > new_rect.height as i16 - h_step as i16;
    if !out_of_bounds {
        return Some((px, py));
    }
    let cx = (new_rect.width / 2).max(1);
    let cy = (new_rect.height / 2).max(1);
    Some((cx, cy))
}

/// Clamps a root-relative pointer position into the valid top-left origin
/// range for a window of the given size, for continuous mouse-move.
pub fn mouse_move_clamp(
    pointer_root_x: i16,
    pointer_root_y: i16,
    width: u16,
    height: u16,
    root_width: u16,
    root_height: u16,
    border: u16,
) -> (i16, i16) {
    let max_x = (root_width as i32 - width as i32 - 2 * border as i32).max(0);
    let max_y = (root_height as i32 - height as i32 - 2 * border as i32).max(0);
    let x = (pointer_root_x as i32).max(0).min(max_x) as i16;
    let y = (pointer_root_y as i32).max(0).min(max_y) as i16;
    (x, y)
}

/// New window dimensions for continuous mouse-resize: the raw
/// pointer-to-origin delta, snapped down to the size-hint grid, clamped to
/// minimums and to fit on screen.
pub fn mouse_resize_dims(
    pointer_root_x: i16,
    pointer_root_y: i16,
    origin_x: i16,
    origin_y: i16,
    base_width: u16,
    base_height: u16,
    width_inc: u16,
    height_inc: u16,
    min_width: u16,
    min_height: u16,
    root_width: u16,
    root_height: u16,
    border: u16,
) -> (u16, u16) {
    let raw_w = (pointer_root_x - origin_x).unsigned_abs().max(1);
    let raw_h = (pointer_root_y - origin_y).unsigned_abs().max(1);

    let w_inc = width_inc.max(1);
    let h_inc = height_inc.max(1);
    let snapped_w = if raw_w > base_width {
        raw_w - (raw_w - base_width) % w_inc
    } else {
        raw_w
    };
    let snapped_h = if raw_h > base_height {
        raw_h - (raw_h - base_height) % h_inc
    } else {
        raw_h
    };

    let max_w = root_width.saturating_sub(origin_x.max(0) as u16 + 2 * border);
    let max_h = root_height.saturating_sub(origin_y.max(0) as u16 + 2 * border);

    let width = snapped_w.max(min_width.max(1)).min(max_w.max(1));
    let height = snapped_h.max(min_height.max(1)).min(max_h.max(1));
    (width, height)
}

/// Where to warp the pointer back to on button-release, given the
/// in-window position saved when the drag began. If that position no
/// longer fits inside the (possibly resized) window, recenter instead —
/// but never to `(0, 0)`.
pub fn restore_drag_anchor(anchor: (i16, i16), width: u16, height: u16) -> (i16, i16) {
    let clamp = |v: i16, dim: u16| -> i16 {
        if v > dim as i16 {
            let half = (dim / 2) as i16;
            if half == 0 {
                1
            } else {
                half
            }
        } else {
            v
        }
    };
    (clamp(anchor.0, width), clamp(anchor.1, height))
}

/// The full-screen rectangle a maximized client occupies (border width 0).
pub fn maximize_rect(root_width: u16, root_height: u16) -> Rect {
    Rect::new(0, 0, root_width, root_height)
}

/// The height a vertically-maximized client occupies, snapped down to its
/// height increment relative to `base_height`; x and width are left
/// untouched by the caller.
pub fn vertmax_height(root_height: u16, border: u16, height_inc: u16, base_height: u16) -> u16 {
    let raw = root_height.saturating_sub(2 * border);
    let inc = height_inc.max(1);
    raw - (raw.saturating_sub(base_height)) % inc
}

/// The origin for placing a window of `width` x `height` in `corner`.
pub fn corner_origin(corner: Corner, width: u16, height: u16, root_width: u16, root_height: u16, border: u16) -> (i16, i16) {
    let right_x = (root_width as i32 - width as i32 - 2 * border as i32).max(0) as i16;
    let bottom_y = (root_height as i32 - height as i32 - 2 * border as i32).max(0) as i16;
    match corner {
        Corner::TopLeft => (0, 0),
        Corner::TopRight => (right_x, 0),
        Corner::BottomLeft => (0, bottom_y),
        Corner::BottomRight => (right_x, bottom_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_to_root_shrinks_then_slides_oversized_rect() {
        let rect = Rect::new(1900, 1000, 300, 300);
        let clamped = clamp_to_root(rect, 1920, 1080, 1);
        assert!(clamped.fits(1920, 1080, 1));
    }

    #[test]
    fn step_move_clamps_at_left_edge() {
        let rect = Rect::new(5, 100, 100, 100);
        let moved = step_move(rect, Direction::Left, 27, 1920, 1080, 1);
        assert_eq!(moved.x, 0);
    }

    #[test]
    fn step_resize_right_then_left_round_trips_width() {
        let rect = Rect::new(0, 0, 100, 100);
        let grown = step_resize(rect, Direction::Right, 10, 10, 1, 1, 1920, 1080, 1);
        assert_eq!(grown.width, 110);
        let shrunk = step_resize(grown, Direction::Left, 10, 10, 1, 1, 1920, 1080, 1);
        assert_eq!(shrunk.width, 100);
    }

    #[test]
    fn step_resize_respects_min_width() {
        let rect = Rect::new(0, 0, 15, 100);
        let shrunk = step_resize(rect, Direction::Left, 10, 10, 10, 1, 1920, 1080, 1);
        assert_eq!(shrunk.width, 10);
    }

    #[test]
    fn warp_after_resize_recenters_when_pointer_falls_outside() {
        let old = Rect::new(0, 0, 100, 100);
        let new = Rect::new(0, 0, 50, 100);
        let warp = warp_after_resize(Some((95, 10)), old, new, 10, 10);
        assert_eq!(warp, Some((25, 50)));
    }

    #[test]
    fn warp_after_resize_leaves_pointer_in_place_when_still_inside() {
        let old = Rect::new(0, 0, 100, 100);
        let new = Rect::new(0, 0, 90, 100);
        let warp = warp_after_resize(Some((10, 10)), old, new, 10, 10);
        assert_eq!(warp, Some((10, 10)));
    }

    #[test]
    fn mouse_move_clamp_keeps_window_on_screen() {
        let (x, y) = mouse_move_clamp(-5, 2000, 200, 200, 1920, 1080, 1);
        assert_eq!(x, 0);
        assert_eq!(y, 1080 - 200 - 2);
    }

    #[test]
    fn mouse_resize_dims_snaps_to_increment_grid() {
        let (w, _h) = mouse_resize_dims(104, 50, 0, 0, 4, 4, 10, 10, 1, 1, 1920, 1080, 1);
        assert_eq!((w - 4) % 10, 0);
    }

    #[test]
    fn restore_drag_anchor_keeps_position_inside_window() {
        assert_eq!(restore_drag_anchor((10, 20), 100, 100), (10, 20));
    }

    #[test]
    fn restore_drag_anchor_recenters_when_outside() {
        assert_eq!(restore_drag_anchor((150, 20), 100, 100), (50, 20));
    }

    #[test]
    fn restore_drag_anchor_never_warps_to_origin() {
        assert_eq!(restore_drag_anchor((5, 5), 1, 1), (1, 1));
    }

    #[test]
    fn maximize_rect_covers_whole_root() {
        let rect = maximize_rect(1920, 1080);
        assert_eq!(rect, Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn vertmax_height_snaps_down_to_increment() {
        let h = vertmax_height(1080, 1, 10, 4);
        assert_eq!(h, 1078 - (1078 - 4) % 10);
    }

    #[test]
    fn corner_origin_bottom_right_accounts_for_border() {
        let (x, y) = corner_origin(Corner::BottomRight, 300, 200, 1920, 1080, 1);
        assert_eq!(x, 1920 - 300 - 2);
        assert_eq!(y, 1080 - 200 - 2);
    }
}
