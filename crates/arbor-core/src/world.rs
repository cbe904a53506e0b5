use crate::scene::EntityId;

/// A parent-less collection of top-level entities that several viewports
/// can render.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub name: String,
    pub(crate) members: Vec<EntityId>,
}

impl World {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: Vec::new(),
        }
    }

    /// Top-level entities in insertion order.
    pub fn members(&self) -> &[EntityId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
