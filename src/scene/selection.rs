//! # Selection Set
//!
//! Explicit ownership-tracked collection of the currently selected dynamic
//! bodies. Membership toggles on click, every member carries a visual
//! marker (an overridden outline stroke), and `replace` keeps membership
//! consistent when a body is rebuilt in place by the radius-edit flow.

use rapier2d::prelude::RigidBodyHandle;

use super::body::{Color, Stroke};
use super::registry::SceneRegistry;

/// Marker stroke painted on selected bodies.
pub const SELECTION_STROKE: Stroke = Stroke {
    color: Color::new(255, 255, 255),
    alpha: 0.9,
    width: 3.0,
};

pub struct SelectionSet {
    members: Vec<RigidBodyHandle>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Toggles membership of a dynamic body and its visual marker.
    /// Static bodies are never selectable; toggling one is a no-op.
    ///
    /// Returns whether the body is selected after the call.
    pub fn toggle(&mut self, registry: &mut SceneRegistry, handle: RigidBodyHandle) -> bool {
        let Some(body) = registry.get(handle) else { return false };
        if body.is_static {
            return false;
        }

        if let Some(index) = self.members.iter().position(|&h| h == handle) {
            self.members.remove(index);
            set_marker(registry, handle, false);
            false
        } else {
            self.members.push(handle);
            set_marker(registry, handle, true);
            true
        }
    }

    /// Removes membership if present; a no-op otherwise (the unselect
    /// tool's semantics).
    pub fn deselect(&mut self, registry: &mut SceneRegistry, handle: RigidBodyHandle) {
        if let Some(index) = self.members.iter().position(|&h| h == handle) {
            self.members.remove(index);
            set_marker(registry, handle, false);
        }
    }

    /// Unmarks and removes every member.
    pub fn clear_all(&mut self, registry: &mut SceneRegistry) {
        for handle in std::mem::take(&mut self.members) {
            set_marker(registry, handle, false);
        }
    }

    /// Substitutes `new` for `old` at the same relative position, used when
    /// a body is reconstructed under a stable logical identity. Membership
    /// is untouched when `old` was not selected.
    pub fn replace(&mut self, old: RigidBodyHandle, new: RigidBodyHandle) {
        if let Some(index) = self.members.iter().position(|&h| h == old) {
            self.members[index] = new;
        }
    }

    /// Drops a handle without touching markers — for bodies that no longer
    /// exist in the registry.
    pub fn purge(&mut self, handle: RigidBodyHandle) {
        self.members.retain(|&h| h != handle);
    }

    /// Empties the set without marker cleanup, for a cleared world.
    pub fn drop_all(&mut self) {
        self.members.clear();
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.members.contains(&handle)
    }

    pub fn handles(&self) -> &[RigidBodyHandle] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self::new()
    }
}

fn set_marker(registry: &mut SceneRegistry, handle: RigidBodyHandle, on: bool) {
    if let Some(body) = registry.get_mut(handle) {
        body.appearance.stroke = on.then_some(SELECTION_STROKE);
    }
}
