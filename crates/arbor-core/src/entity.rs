use crate::camera::CameraData;
use crate::scene::{EntityId, WorldId};
use crate::transform::Transform;
use crate::viewport::ViewportData;
use crate::visual::SharedVisual;

/// What an entity is, beyond a placed node.
#[derive(Debug, Clone, Default)]
pub enum EntityKind {
    #[default]
    Plain,
    Camera(CameraData),
    Viewport(ViewportData),
}

impl EntityKind {
    pub fn camera(data: CameraData) -> Self {
        EntityKind::Camera(data)
    }

    pub fn viewport() -> Self {
        EntityKind::Viewport(ViewportData::new())
    }

    pub fn is_camera(&self) -> bool {
        matches!(self, EntityKind::Camera(_))
    }

    pub fn is_viewport(&self) -> bool {
        matches!(self, EntityKind::Viewport(_))
    }
}

/// The list an entity is a member of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Entity(EntityId),
    World(WorldId),
}

/// A node of the scene tree. Lives in a [`crate::Scene`] arena and is
/// addressed by [`EntityId`].
#[derive(Debug)]
pub struct Entity {
    pub name: String,
    /// Local-to-parent placement.
    pub transform: Transform,
    pub(crate) kind: EntityKind,
    pub(crate) owner: Option<Owner>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) visual: Option<SharedVisual>,
}

impl Entity {
    pub(crate) fn new(name: &str, kind: EntityKind) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::IDENTITY,
            kind,
            owner: None,
            children: Vec::new(),
            visual: None,
        }
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn owner(&self) -> Option<Owner> {
        self.owner
    }

    /// The owning entity, if the owner is an entity rather than a world.
    pub fn parent(&self) -> Option<EntityId> {
        match self.owner {
            Some(Owner::Entity(id)) => Some(id),
            _ => None,
        }
    }

    /// Direct children in insertion order.
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn visual(&self) -> Option<&SharedVisual> {
        self.visual.as_ref()
    }

    pub fn is_camera(&self) -> bool {
        self.kind.is_camera()
    }

    pub fn is_viewport(&self) -> bool {
        self.kind.is_viewport()
    }
}
