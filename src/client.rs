//! One managed top-level window, and the registry of all of them.

use std::collections::HashMap;

use log::{debug, warn};
use nerdwm_x11::{xcb, Context};

use crate::config::{Config, WORKSPACE_COUNT};
use crate::list::{List, NodeId};

/// A managed top-level window.
///
/// The geometry cache (`x`, `y`, `width`, `height`) is only meaningful while
/// `maxed` or `vertmaxed` is set — it holds the pre-maximize rectangle to
/// restore on toggle-off. Live geometry is always queried from the server.
pub struct Client {
    pub window: xcb::Window,

    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,

    pub min_width: u16,
    pub min_height: u16,
    pub max_width: u16,
    pub max_height: u16,
    pub base_width: u16,
    pub base_height: u16,
    pub width_inc: u16,
    pub height_inc: u16,

    pub user_coord: bool,
    pub vertmaxed: bool,
    pub maxed: bool,
    pub fixed: bool,

    global_node: NodeId,
    workspace_nodes: [Option<NodeId>; WORKSPACE_COUNT],
}

impl Client {
    fn new(window: xcb::Window, global_node: NodeId, root_width: u16, root_height: u16) -> Self {
        Self {
            window,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            min_width: 0,
            min_height: 0,
            max_width: root_width,
            max_height: root_height,
            base_width: 0,
            base_height: 0,
            width_inc: 1,
            height_inc: 1,
            user_coord: false,
            vertmaxed: false,
            maxed: false,
            fixed: false,
            global_node,
            workspace_nodes: [None; WORKSPACE_COUNT],
        }
    }

    pub fn workspace_node(&self, ws: usize) -> Option<NodeId> {
        self.workspace_nodes[ws]
    }

    pub fn set_workspace_node(&mut self, ws: usize, node: Option<NodeId>) {
        self.workspace_nodes[ws] = node;
    }

    /// The workspaces this client currently belongs to (normally exactly
    /// one, unless it's fixed and mid-migration).
    pub fn workspaces(&self) -> impl Iterator<Item = usize> + '_ {
        self.workspace_nodes
            .iter()
            .enumerate()
            .filter_map(|(ws, node)| node.map(|_| ws))
    }
}

/// The set of all managed top-level windows, keyed by window id.
///
/// The global list tracks insertion order; a client's own `global_node`
/// lets `forget` remove it in O(1) without scanning.
pub struct ClientRegistry {
    clients: HashMap<xcb::Window, Client>,
    global: List<xcb::Window>,
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            global: List::new(),
        }
    }

    pub fn find(&self, window: xcb::Window) -> Option<&Client> {
        self.clients.get(&window)
    }

    pub fn find_mut(&mut self, window: xcb::Window) -> Option<&mut Client> {
        self.clients.get_mut(&window)
    }

    pub fn contains(&self, window: xcb::Window) -> bool {
        self.clients.contains_key(&window)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.global.iter().map(move |(_, window)| &self.clients[window])
    }

    /// Sets up border, event mask and size hints for a new top-level window
    /// and appends it to the global list. Returns `None` if the window was
    /// destroyed between the map-request and this call (§4.2).
    pub fn adopt(
        &mut self,
        ctx: &Context,
        config: &Config,
        window: xcb::Window,
        unfocus_pixel: u32,
        root_width: u16,
        root_height: u16,
    ) -> Option<&mut Client> {
        if config.borders {
            ctx.set_border_pixel(window, unfocus_pixel);
            ctx.set_border_width(window, crate::config::BORDER_WIDTH as u32);
        }

        if ctx
            .change_window_attributes_checked(
                window,
                &[(xcb::CW_EVENT_MASK, xcb::EVENT_MASK_ENTER_WINDOW)],
            )
            .is_err()
        {
            warn!("adopt: window {} vanished before setup completed", window);
            return None;
        }

        let global_node = self.global.append(window);
        let mut client = Client::new(window, global_node, root_width, root_height);

        if let Ok(Some(hints)) = ctx.get_wm_normal_hints(window, xcb::ATOM_WM_NORMAL_HINTS) {
            client.user_coord = hints.user_coord;
            if hints.min_width != 0 || hints.min_height != 0 {
                client.min_width = hints.min_width;
                client.min_height = hints.min_height;
            }
            if hints.max_width != 0 || hints.max_height != 0 {
                client.max_width = hints.max_width;
                client.max_height = hints.max_height;
            }
            client.width_inc = hints.width_inc.max(1);
            client.height_inc = hints.height_inc.max(1);
            client.base_width = hints.base_width;
            client.base_height = hints.base_height;
        }

        debug!("adopted window {}", window);
        self.clients.insert(window, client);
        self.clients.get_mut(&window)
    }

    /// Removes `window` from the global list and every workspace list it
    /// appeared in. Idempotent: forgetting an unknown window is a no-op.
    pub fn forget(
        &mut self,
        window: xcb::Window,
        workspaces: &mut crate::workspace::Workspaces,
    ) -> Option<Client> {
        let client = self.clients.remove(&window)?;
        for ws in 0..WORKSPACE_COUNT {
            if let Some(node) = client.workspace_node(ws) {
                workspaces.remove(ws, node);
            }
        }
        self.global.remove(client.global_node);
        debug!("forgot window {}", window);
        Some(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspaces;

    fn registry_with(window: xcb::Window) -> (ClientRegistry, NodeId) {
        let mut registry = ClientRegistry::new();
        let global_node = registry.global.append(window);
        let client = Client::new(window, global_node, 1920, 1080);
        registry.clients.insert(window, client);
        (registry, global_node)
    }

    #[test]
    fn forget_removes_from_every_workspace_list() {
        let (mut registry, _) = registry_with(42);
        let mut workspaces = Workspaces::new();
        let node0 = workspaces.add(0, 42);
        let node3 = workspaces.add(3, 42);
        registry.find_mut(42).unwrap().set_workspace_node(0, Some(node0));
        registry.find_mut(42).unwrap().set_workspace_node(3, Some(node3));

        registry.forget(42, &mut workspaces);

        assert!(registry.find(42).is_none());
        assert_eq!(workspaces.iter(0).count(), 0);
        assert_eq!(workspaces.iter(3).count(), 0);
    }

    #[test]
    fn forget_is_a_noop_for_unknown_window() {
        let (mut registry, _) = registry_with(1);
        let mut workspaces = Workspaces::new();
        assert!(registry.forget(999, &mut workspaces).is_none());
        assert!(registry.find(1).is_some());
    }
}
