// Physics collaborator boundary.
//
// The pipeline drives settling exclusively through this trait: it registers
// one body per room, steps the space while any body is awake, reads
// positions back, and unregisters bodies on reset. Implementations live
// outside the generation core (RapierSpace for the demo, a scripted fake in
// the pipeline tests).

use glam::Vec2;

/// Opaque handle for a registered body, minted by the space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

/// Everything the pipeline specifies about a room's rigid body. Half
/// extents already include the collider padding.
#[derive(Clone, Copy, Debug)]
pub struct BodySpec {
    pub position: Vec2,
    pub half_extents: Vec2,
    pub mass: f32,
    pub restitution: f32,
    pub friction: f32,
}

pub trait PhysicsSpace {
    /// Register a rigid body with a box collider. The returned id stays
    /// valid until `remove_body`.
    fn add_body(&mut self, spec: &BodySpec) -> BodyId;

    /// Unregister a body and its collider. The id must be live.
    fn remove_body(&mut self, id: BodyId);

    /// Advance the simulation by a fixed timestep.
    fn step(&mut self, dt: f32);

    /// Current body position. The id must be live.
    fn position(&self, id: BodyId) -> Vec2;

    /// True once the solver considers the body settled.
    fn is_asleep(&self, id: BodyId) -> bool;
}
