//! The mount seam.
//!
//! The compiler never touches a real rendering surface; it hands finished
//! nodes to a [`DomBackend`] and stores the opaque handle it gets back.
//! Mounting happens bottom-up per subtree and at most once per node.

use crate::node::{NodeId, VTree};

/// Opaque reference to a live platform element, owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountHandle(pub u64);

pub trait DomBackend {
    fn mount_element(&mut self, tree: &VTree, id: NodeId) -> MountHandle;
    fn mount_text(&mut self, tree: &VTree, id: NodeId) -> MountHandle;
}

/// Reference backend: hands out sequential handles and records the mount
/// order. Used by tests and as the double for embedders without a real
/// rendering surface.
#[derive(Debug, Default)]
pub struct RecordingDom {
    next: u64,
    mounted: Vec<(MountHandle, String)>,
}

impl RecordingDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount_count(&self) -> usize {
        self.mounted.len()
    }

    /// `(handle, tag name)` pairs in mount order.
    pub fn mounted(&self) -> &[(MountHandle, String)] {
        &self.mounted
    }

    fn next_handle(&mut self) -> MountHandle {
        let handle = MountHandle(self.next);
        self.next += 1;
        handle
    }
}

impl DomBackend for RecordingDom {
    fn mount_element(&mut self, tree: &VTree, id: NodeId) -> MountHandle {
        let handle = self.next_handle();
        self.mounted.push((handle, tree.get(id).tag_name.clone()));
        handle
    }

    fn mount_text(&mut self, tree: &VTree, id: NodeId) -> MountHandle {
        let handle = self.next_handle();
        let text = tree.get(id).text.clone().unwrap_or_default();
        self.mounted.push((handle, text));
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use std::collections::HashMap;

    #[test]
    fn test_recording_dom_hands_out_unique_handles() {
        let mut tree = VTree::new();
        let a = tree.create_element("div", Map::new(), HashMap::new());
        let b = tree.create_text("hi", None);

        let mut dom = RecordingDom::new();
        let ha = dom.mount_element(&tree, a);
        let hb = dom.mount_text(&tree, b);

        assert_ne!(ha, hb);
        assert_eq!(dom.mount_count(), 2);
        assert_eq!(dom.mounted()[0].1, "div");
        assert_eq!(dom.mounted()[1].1, "hi");
    }
}
