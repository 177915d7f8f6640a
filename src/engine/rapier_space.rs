// Rapier-backed physics space.
//
// Zero gravity, rotation-locked dynamic boxes. Rooms shove each other apart
// through contact resolution alone and fall asleep once the solver damps
// them out, which is exactly the settling signal the pipeline waits on.

use std::collections::HashMap;

use glam::Vec2;
use rapier2d::prelude::*;

use super::physics::{BodyId, BodySpec, PhysicsSpace};

pub struct RapierSpace {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    handles: HashMap<BodyId, RigidBodyHandle>,
    next_id: u32,
}

impl RapierSpace {
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, 0.0],
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            handles: HashMap::new(),
            next_id: 0,
        }
    }
}

impl Default for RapierSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsSpace for RapierSpace {
    fn add_body(&mut self, spec: &BodySpec) -> BodyId {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![spec.position.x, spec.position.y])
            .lock_rotations()
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(spec.half_extents.x, spec.half_extents.y)
            .mass(spec.mass)
            .restitution(spec.restitution)
            .friction(spec.friction)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.handles.insert(id, handle);
        id
    }

    fn remove_body(&mut self, id: BodyId) {
        if let Some(handle) = self.handles.remove(&id) {
            // true: take the attached collider down with the body.
            self.bodies.remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
    }

    fn step(&mut self, dt: f32) {
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    fn position(&self, id: BodyId) -> Vec2 {
        let body = &self.bodies[self.handles[&id]];
        let t = body.translation();
        Vec2::new(t.x, t.y)
    }

    fn is_asleep(&self, id: BodyId) -> bool {
        self.bodies[self.handles[&id]].is_sleeping()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_spec(x: f32, y: f32) -> BodySpec {
        BodySpec {
            position: Vec2::new(x, y),
            half_extents: Vec2::new(20.0, 15.0),
            mass: 600.0,
            restitution: 0.0,
            friction: 1.0,
        }
    }

    #[test]
    fn test_position_roundtrip() {
        let mut space = RapierSpace::new();
        let id = space.add_body(&room_spec(100.0, 250.0));
        assert_eq!(space.position(id), Vec2::new(100.0, 250.0));
        assert!(!space.is_asleep(id));
    }

    #[test]
    fn test_remove_then_reuse() {
        let mut space = RapierSpace::new();
        let a = space.add_body(&room_spec(0.0, 0.0));
        let b = space.add_body(&room_spec(100.0, 0.0));
        space.remove_body(a);
        // Remaining body is untouched and ids are never recycled.
        assert_eq!(space.position(b), Vec2::new(100.0, 0.0));
        let c = space.add_body(&room_spec(50.0, 50.0));
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_overlapping_bodies_push_apart() {
        let mut space = RapierSpace::new();
        let a = space.add_body(&room_spec(400.0, 400.0));
        let b = space.add_body(&room_spec(410.0, 400.0));
        let before = space.position(a).distance(space.position(b));
        for _ in 0..240 {
            space.step(1.0 / 60.0);
        }
        let after = space.position(a).distance(space.position(b));
        assert!(after > before);
    }
}
