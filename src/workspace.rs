//! Virtual workspaces: ten independent stacking orders over the same
//! screen. A client belongs to exactly one workspace unless it's fixed
//! (visible on all of them), in which case it has a node on every list.

use nerdwm_x11::xcb;

use crate::config::WORKSPACE_COUNT;
use crate::list::{List, NodeId};

pub struct Workspaces {
    lists: [List<xcb::Window>; WORKSPACE_COUNT],
    current: usize,
}

impl Default for Workspaces {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspaces {
    pub fn new() -> Self {
        Self {
            lists: Default::default(),
            current: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn set_current(&mut self, ws: usize) {
        assert!(ws < WORKSPACE_COUNT, "workspace index out of range");
        self.current = ws;
    }

    /// Appends `window` to workspace `ws` and returns the node handle the
    /// owning `Client` should remember for later `remove`/`move_to_head`.
    pub fn add(&mut self, ws: usize, window: xcb::Window) -> NodeId {
        self.lists[ws].append(window)
    }

    pub fn remove(&mut self, ws: usize, node: NodeId) {
        self.lists[ws].remove(node);
    }

    /// Raises `node` to the top of workspace `ws`'s stacking order, the
    /// model-side half of a focus-raise.
    pub fn move_to_head(&mut self, ws: usize, node: NodeId) {
        self.lists[ws].move_to_head(node);
    }

    pub fn head(&self, ws: usize) -> Option<xcb::Window> {
        self.lists[ws].head().map(|node| *self.lists[ws].get(node))
    }

    pub fn iter(&self, ws: usize) -> impl Iterator<Item = xcb::Window> + '_ {
        self.lists[ws].iter().map(|(_, window)| *window)
    }

    pub fn is_empty(&self, ws: usize) -> bool {
        self.lists[ws].is_empty()
    }

    pub fn len(&self, ws: usize) -> usize {
        self.lists[ws].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_workspaces_start_on_zero_and_empty() {
        let workspaces = Workspaces::new();
        assert_eq!(workspaces.current(), 0);
        for ws in 0..WORKSPACE_COUNT {
            assert!(workspaces.is_empty(ws));
        }
    }

    #[test]
    fn add_and_remove_round_trip() {
        let mut workspaces = Workspaces::new();
        let node = workspaces.add(2, 7);
        assert_eq!(workspaces.len(2), 1);
        assert_eq!(workspaces.head(2), Some(7));

        workspaces.remove(2, node);
        assert!(workspaces.is_empty(2));
    }

    #[test]
    fn fixed_window_lives_on_every_workspace_independently() {
        let mut workspaces = Workspaces::new();
        let nodes: Vec<NodeId> = (0..WORKSPACE_COUNT).map(|ws| workspaces.add(ws, 99)).collect();
        for ws in 0..WORKSPACE_COUNT {
            assert_eq!(workspaces.iter(ws).collect::<Vec<_>>(), vec![99]);
        }
        workspaces.remove(3, nodes[3]);
        assert!(workspaces.is_empty(3));
        assert!(!workspaces.is_empty(4));
    }

    #[test]
    fn move_to_head_reorders_single_workspace_stack() {
        let mut workspaces = Workspaces::new();
        let a = workspaces.add(0, 1);
        workspaces.add(0, 2);
        let c = workspaces.add(0, 3);

        assert_eq!(workspaces.iter(0).collect::<Vec<_>>(), vec![1, 2, 3]);
        workspaces.move_to_head(0, c);
        assert_eq!(workspaces.iter(0).collect::<Vec<_>>(), vec![3, 1, 2]);
        workspaces.move_to_head(0, a);
        assert_eq!(workspaces.iter(0).collect::<Vec<_>>(), vec![1, 3, 2]);
    }

    #[test]
    #[should_panic]
    fn set_current_rejects_out_of_range() {
        let mut workspaces = Workspaces::new();
        workspaces.set_current(WORKSPACE_COUNT);
    }
}
