use slotmap::{new_key_type, SlotMap};
use uuid::Uuid;

use crate::camera::{CameraData, Orbit, Projection};
use crate::color::Color;
use crate::entity::{Entity, EntityKind, Owner};
use crate::error::{Result, SceneError};
use crate::transform::Transform;
use crate::viewport::{resolution_of, SubScene, ViewportData};
use crate::visual::SharedVisual;
use crate::world::World;

new_key_type! {
    /// Arena key of an entity.
    pub struct EntityId;
    /// Arena key of a world.
    pub struct WorldId;
}

/// Arena holding every entity and world of one host.
///
/// Parent/child links are arena keys. Each entity is a member of at most one
/// owner list (an entity's children or a world's members), exactly once.
#[derive(Debug)]
pub struct Scene {
    /// Scene identifier.
    pub id: Uuid,
    pub name: String,
    entities: SlotMap<EntityId, Entity>,
    worlds: SlotMap<WorldId, World>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("scene")
    }
}

impl Scene {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            entities: SlotMap::with_key(),
            worlds: SlotMap::with_key(),
        }
    }

    // ── Entity lifecycle ─────────────────────────────────────────────

    /// Create an entity, optionally attached to `parent`.
    pub fn spawn(&mut self, name: &str, kind: EntityKind, parent: Option<EntityId>) -> Result<EntityId> {
        let id = self.entities.insert(Entity::new(name, kind));
        if parent.is_some() {
            if let Err(err) = self.set_parent(id, parent) {
                self.entities.remove(id);
                return Err(err);
            }
        }
        Ok(id)
    }

    pub fn spawn_camera(&mut self, name: &str, projection: Projection, parent: Option<EntityId>) -> Result<EntityId> {
        self.spawn(name, EntityKind::camera(CameraData::new(projection)), parent)
    }

    pub fn spawn_viewport(&mut self, name: &str, parent: Option<EntityId>) -> Result<EntityId> {
        self.spawn(name, EntityKind::viewport(), parent)
    }

    /// Remove an entity together with its whole subtree.
    pub fn despawn(&mut self, id: EntityId) -> Result<()> {
        self.get(id)?;
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(entity) = self.entities.remove(next) {
                stack.extend(entity.children);
            }
        }
        log::debug!("Despawned entity {:?} and its subtree", id);
        Ok(())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Result<&Entity> {
        self.entities.get(id).ok_or(SceneError::UnknownEntity(id))
    }

    fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities.get_mut(id).ok_or(SceneError::UnknownEntity(id))
    }

    pub fn kind(&self, id: EntityId) -> Result<&EntityKind> {
        Ok(&self.get(id)?.kind)
    }

    pub fn is_viewport(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some_and(Entity::is_viewport)
    }

    pub fn is_camera(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some_and(Entity::is_camera)
    }

    // ── Hierarchy ────────────────────────────────────────────────────

    /// Move `child` under `parent`, or detach it with `None`.
    ///
    /// The child leaves every list it was in before being appended to the
    /// new parent's children. Rejects the child itself and any of its
    /// descendants as parent.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> Result<()> {
        self.get(child)?;
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(SceneError::InvalidParent {
                    child,
                    reason: format!("{:?} is not an entity of this scene", parent),
                });
            }
            if parent == child {
                return Err(SceneError::InvalidParent {
                    child,
                    reason: "an entity cannot be its own parent".to_string(),
                });
            }
            if self.is_ancestor(child, parent) {
                return Err(SceneError::InvalidParent {
                    child,
                    reason: format!("{:?} is a descendant and would form a cycle", parent),
                });
            }
        }

        self.detach(child);
        if let Some(parent) = parent {
            let siblings = &mut self.get_mut(parent)?.children;
            siblings.retain(|c| *c != child);
            siblings.push(child);
            self.get_mut(child)?.owner = Some(Owner::Entity(parent));
        }
        Ok(())
    }

    /// Move `child` into the members of `world`.
    pub fn add_to_world(&mut self, child: EntityId, world: WorldId) -> Result<()> {
        self.get(child)?;
        if !self.worlds.contains_key(world) {
            return Err(SceneError::UnknownWorld(world));
        }
        self.detach(child);
        if let Some(w) = self.worlds.get_mut(world) {
            w.members.retain(|c| *c != child);
            w.members.push(child);
        }
        self.get_mut(child)?.owner = Some(Owner::World(world));
        Ok(())
    }

    /// Remove `child` from its owner's list (every occurrence) and clear the
    /// back-reference.
    fn detach(&mut self, child: EntityId) {
        let owner = match self.entities.get_mut(child) {
            Some(entity) => entity.owner.take(),
            None => return,
        };
        match owner {
            Some(Owner::Entity(parent)) => {
                if let Some(p) = self.entities.get_mut(parent) {
                    p.children.retain(|c| *c != child);
                }
            }
            Some(Owner::World(world)) => {
                if let Some(w) = self.worlds.get_mut(world) {
                    w.members.retain(|c| *c != child);
                }
            }
            None => {}
        }
    }

    /// True when `ancestor` is reachable from `id` by following parents.
    pub fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut node = self.entities.get(id).and_then(Entity::parent);
        while let Some(current) = node {
            if current == ancestor {
                return true;
            }
            node = self.entities.get(current).and_then(Entity::parent);
        }
        false
    }

    pub fn parent(&self, id: EntityId) -> Result<Option<EntityId>> {
        Ok(self.get(id)?.parent())
    }

    pub fn owner(&self, id: EntityId) -> Result<Option<Owner>> {
        Ok(self.get(id)?.owner)
    }

    /// Snapshot of the direct children, in insertion order.
    pub fn children(&self, id: EntityId) -> Result<Vec<EntityId>> {
        Ok(self.get(id)?.children.clone())
    }

    /// Parents from nearest to root.
    pub fn ancestors(&self, id: EntityId) -> Result<Vec<EntityId>> {
        let mut chain = Vec::new();
        let mut node = self.get(id)?.parent();
        while let Some(current) = node {
            chain.push(current);
            node = self.get(current)?.parent();
        }
        Ok(chain)
    }

    // ── Components ───────────────────────────────────────────────────

    pub fn transform(&self, id: EntityId) -> Result<&Transform> {
        Ok(&self.get(id)?.transform)
    }

    pub fn transform_mut(&mut self, id: EntityId) -> Result<&mut Transform> {
        Ok(&mut self.get_mut(id)?.transform)
    }

    pub fn set_transform(&mut self, id: EntityId, transform: Transform) -> Result<()> {
        self.get_mut(id)?.transform = transform;
        Ok(())
    }

    pub fn set_visual(&mut self, id: EntityId, visual: Option<SharedVisual>) -> Result<()> {
        self.get_mut(id)?.visual = visual;
        Ok(())
    }

    pub fn visual(&self, id: EntityId) -> Result<Option<SharedVisual>> {
        Ok(self.get(id)?.visual.clone())
    }

    pub fn camera_data(&self, id: EntityId) -> Result<&CameraData> {
        match &self.get(id)?.kind {
            EntityKind::Camera(data) => Ok(data),
            _ => Err(SceneError::TypeConstraint(id, "camera")),
        }
    }

    pub fn camera_data_mut(&mut self, id: EntityId) -> Result<&mut CameraData> {
        match &mut self.get_mut(id)?.kind {
            EntityKind::Camera(data) => Ok(data),
            _ => Err(SceneError::TypeConstraint(id, "camera")),
        }
    }

    pub fn viewport_data(&self, id: EntityId) -> Result<&ViewportData> {
        match &self.get(id)?.kind {
            EntityKind::Viewport(data) => Ok(data),
            _ => Err(SceneError::TypeConstraint(id, "viewport")),
        }
    }

    fn viewport_data_mut(&mut self, id: EntityId) -> Result<&mut ViewportData> {
        match &mut self.get_mut(id)?.kind {
            EntityKind::Viewport(data) => Ok(data),
            _ => Err(SceneError::TypeConstraint(id, "viewport")),
        }
    }

    // ── Cameras ──────────────────────────────────────────────────────

    /// The camera-to-scene (view) matrix of `camera`.
    ///
    /// Composes the camera transform with its ancestors up to, not
    /// including, the nearest enclosing viewport (or the root), then inverts.
    pub fn resolve_view_transform(&self, camera: EntityId) -> Result<Transform> {
        let data = self.camera_data(camera)?;
        let entity = self.get(camera)?;
        let mut accum = if data.strip_scale {
            entity.transform.without_scale()
        } else {
            entity.transform
        };

        let mut node = entity.parent();
        while let Some(current) = node {
            let ancestor = self.get(current)?;
            if ancestor.is_viewport() {
                break;
            }
            accum = ancestor.transform.compose(&accum);
            node = ancestor.parent();
        }

        accum.inverse().ok_or(SceneError::SingularTransform(camera))
    }

    /// The projection of `camera` when rendering into `viewport`.
    pub fn projection(&self, camera: EntityId, viewport: EntityId) -> Result<Transform> {
        let resolution = self.resolution(viewport)?;
        Ok(self.camera_data(camera)?.projection.matrix(resolution))
    }

    /// Set a 2D camera's field of view and center from axis limits.
    pub fn set_limits(&mut self, camera: EntityId, xlim: (f32, f32), ylim: (f32, f32)) -> Result<()> {
        let data = self.camera_data_mut(camera)?;
        match &mut data.projection {
            Projection::TwoD { fov } => *fov = ((xlim.1 - xlim.0).abs(), (ylim.1 - ylim.0).abs()),
            _ => return Err(SceneError::TypeConstraint(camera, "2D camera")),
        }
        let transform = self.transform_mut(camera)?;
        let z = transform.matrix().w_axis.z;
        transform.set_translation(0.5 * (xlim.0 + xlim.1), 0.5 * (ylim.0 + ylim.1), z);
        Ok(())
    }

    /// The x and y axis limits a 2D camera currently shows.
    pub fn limits(&self, camera: EntityId) -> Result<((f32, f32), (f32, f32))> {
        let (w, h) = self.two_d_fov(camera)?;
        let (x, y) = self.transform(camera)?.translation_xy();
        Ok(((x - 0.5 * w, x + 0.5 * w), (y - 0.5 * h, y + 0.5 * h)))
    }

    /// Shift a 2D camera's center by a delta in scene units.
    pub fn pan(&mut self, camera: EntityId, dx: f32, dy: f32) -> Result<()> {
        self.two_d_fov(camera)?;
        let transform = self.transform_mut(camera)?;
        let (x, y) = transform.translation_xy();
        let z = transform.matrix().w_axis.z;
        transform.set_translation(x + dx, y + dy, z);
        Ok(())
    }

    /// Zoom a 2D camera about its center. A factor above one zooms in.
    pub fn zoom(&mut self, camera: EntityId, factor: f32) -> Result<()> {
        let (w, h) = self.two_d_fov(camera)?;
        if !(factor.is_finite() && factor > 0.0) {
            log::warn!("Ignoring zoom factor {} for camera {:?}", factor, camera);
            return Ok(());
        }
        self.camera_data_mut(camera)?.projection = Projection::TwoD {
            fov: (w / factor, h / factor),
        };
        Ok(())
    }

    fn two_d_fov(&self, camera: EntityId) -> Result<(f32, f32)> {
        match self.camera_data(camera)?.projection {
            Projection::TwoD { fov } => Ok(fov),
            _ => Err(SceneError::TypeConstraint(camera, "2D camera")),
        }
    }

    /// Drive `camera`'s transform from orbit angles.
    pub fn set_orbit(&mut self, camera: EntityId, orbit: Orbit) -> Result<()> {
        self.camera_data_mut(camera)?.orbit = Some(orbit);
        self.set_transform(camera, orbit.transform())
    }

    /// Turn an orbit camera by angle deltas in degrees and refresh its
    /// transform.
    pub fn rotate_orbit(&mut self, camera: EntityId, d_azimuth: f32, d_elevation: f32) -> Result<()> {
        let mut orbit = self
            .camera_data(camera)?
            .orbit
            .ok_or(SceneError::TypeConstraint(camera, "orbit camera"))?;
        orbit.rotate(d_azimuth, d_elevation);
        self.set_orbit(camera, orbit)
    }

    // ── Viewports ────────────────────────────────────────────────────

    pub fn bgcolor(&self, viewport: EntityId) -> Result<Color> {
        Ok(self.viewport_data(viewport)?.bgcolor)
    }

    /// Set the background from 3 (opaque) or 4 components.
    pub fn set_bgcolor(&mut self, viewport: EntityId, components: &[f32]) -> Result<()> {
        let color = Color::from_slice(components)?;
        self.viewport_data_mut(viewport)?.bgcolor = color;
        Ok(())
    }

    pub fn resolution(&self, viewport: EntityId) -> Result<(u32, u32)> {
        self.viewport_data(viewport)?;
        Ok(resolution_of(self.transform(viewport)?))
    }

    /// Host resize path: write the pixel size into the scale diagonal.
    pub fn resize_viewport(&mut self, viewport: EntityId, width: u32, height: u32) -> Result<()> {
        self.viewport_data(viewport)?;
        self.transform_mut(viewport)?
            .set_scale_xy(width as f32, height as f32);
        log::info!("Viewport {:?} resized to {}x{}", viewport, width, height);
        Ok(())
    }

    /// Top-level entities rendered by `viewport`, in insertion order.
    pub fn sub_scene(&self, viewport: EntityId) -> Result<Vec<EntityId>> {
        match self.viewport_data(viewport)?.source {
            SubScene::Children => self.children(viewport),
            SubScene::World(world) => Ok(self.world(world)?.members.clone()),
        }
    }

    /// Every camera of the viewport's sub-scene, depth-first, without
    /// entering nested viewports.
    pub fn cameras(&self, viewport: EntityId) -> Result<Vec<EntityId>> {
        let mut found = Vec::new();
        self.collect_cameras(&self.sub_scene(viewport)?, &mut found)?;
        Ok(found)
    }

    fn collect_cameras(&self, ids: &[EntityId], found: &mut Vec<EntityId>) -> Result<()> {
        for &id in ids {
            let entity = self.get(id)?;
            if entity.is_camera() {
                found.push(id);
            }
            if !entity.is_viewport() {
                self.collect_cameras(&entity.children, found)?;
            }
        }
        Ok(())
    }

    /// The viewport's active camera: the assigned one, else the first camera
    /// of its sub-scene. The result is cached until reassigned or removed.
    pub fn active_camera(&self, viewport: EntityId) -> Result<Option<EntityId>> {
        let data = self.viewport_data(viewport)?;
        if let Some(cached) = data.camera.get() {
            if self.is_camera(cached) {
                return Ok(Some(cached));
            }
            log::debug!("Dropping stale camera {:?} of viewport {:?}", cached, viewport);
            data.camera.set(None);
        }

        let found = self.cameras(viewport)?.first().copied();
        if let Some(camera) = found {
            log::debug!("Viewport {:?} bound to camera {:?}", viewport, camera);
            data.camera.set(Some(camera));
        }
        Ok(found)
    }

    /// Assign the active camera, or clear it so the next access searches
    /// the sub-scene again.
    pub fn set_camera(&mut self, viewport: EntityId, camera: Option<EntityId>) -> Result<()> {
        if let Some(camera) = camera {
            self.camera_data(camera)?;
        }
        self.viewport_data(viewport)?.camera.set(camera);
        Ok(())
    }

    // ── Worlds ───────────────────────────────────────────────────────

    pub fn create_world(&mut self, name: &str) -> WorldId {
        self.worlds.insert(World::new(name))
    }

    pub fn world(&self, id: WorldId) -> Result<&World> {
        self.worlds.get(id).ok_or(SceneError::UnknownWorld(id))
    }

    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    /// Render `world` in `viewport` instead of the viewport's children, or
    /// switch back to the children with `None`.
    pub fn set_world(&mut self, viewport: EntityId, world: Option<WorldId>) -> Result<()> {
        if let Some(world) = world {
            self.world(world)?;
        }
        let data = self.viewport_data_mut(viewport)?;
        data.source = world.map_or(SubScene::Children, SubScene::World);
        data.camera.set(None);
        Ok(())
    }

    fn world_in_use(&self, world: WorldId) -> bool {
        self.entities.values().any(|e| match &e.kind {
            EntityKind::Viewport(data) => data.source == SubScene::World(world),
            _ => false,
        })
    }

    /// Destroy an unreferenced world and every entity it owns.
    pub fn remove_world(&mut self, world: WorldId) -> Result<()> {
        self.world(world)?;
        if self.world_in_use(world) {
            return Err(SceneError::WorldInUse(world));
        }
        let members = self.world(world)?.members.clone();
        for member in members {
            self.despawn(member)?;
        }
        self.worlds.remove(world);
        Ok(())
    }

    /// Destroy every world no viewport renders. Returns how many went.
    pub fn collect_unused_worlds(&mut self) -> Result<usize> {
        let unused: Vec<WorldId> = self
            .worlds
            .keys()
            .filter(|w| !self.world_in_use(*w))
            .collect();
        for world in &unused {
            self.remove_world(*world)?;
        }
        Ok(unused.len())
    }
}
