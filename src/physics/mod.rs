pub mod builder;
pub mod joint;
pub mod user_data;

use super::*;
pub use builder::*;
pub use joint::*;
use user_data::*;

/// Owns the rapier world the vessels live in.
///
/// Everything here is in simulation units.
#[derive(Default)]
pub struct Physics {
    physics_pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}
impl Physics {
    pub fn new(configs: &PhysicsConfigs) -> Self {
        Self {
            integration_parameters: IntegrationParameters {
                dt: configs.dt,
                min_ccd_dt: configs.dt / 100.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &vector![0.0, 0.0],
            &self.integration_parameters,
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

    /// Vessels never rotate.
    pub fn add_vessel_body(
        &mut self,
        vessel: EntityId,
        translation: Vector<Real>,
        mass: f32,
        linear_damping: f32,
    ) -> RigidBodyHandle {
        let mut body = make_vessel_body(mass, linear_damping);
        body.user_data = UserData::Vessel(vessel).pack();
        body.set_translation(translation, true);

        self.bodies.insert(body)
    }

    /// Static wall segment from `a` to `b`.
    pub fn add_static_edge(
        &mut self,
        a: Point<Real>,
        b: Point<Real>,
        friction: f32,
    ) -> RigidBodyHandle {
        let mut body = make_static_body();
        body.user_data = UserData::Wall.pack();
        let handle = self.bodies.insert(body);

        self.colliders.insert_with_parent(
            make_edge_collider(a, b, friction),
            handle,
            &mut self.bodies,
        );

        handle
    }

    /// Remove the body, its colliders and joints.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        let _ = self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Anchors in `kind` are world points. They are converted to each body's local frame.
    pub fn add_joint(
        &mut self,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        kind: JointKind,
    ) -> ImpulseJointHandle {
        let position1 = *self.bodies[body1].position();
        let position2 = *self.bodies[body2].position();

        let joint = kind.build(&position1, &position2);

        self.impulse_joints.insert(body1, body2, joint, true)
    }

    pub fn remove_joint(&mut self, handle: ImpulseJointHandle) {
        let _ = self.impulse_joints.remove(handle, true);
    }

    /// World position of the joint's two anchors.
    pub fn joint_world_anchors(
        &self,
        handle: ImpulseJointHandle,
    ) -> Option<(Point<Real>, Point<Real>)> {
        let joint = self.impulse_joints.get(handle)?;
        let body1 = self.bodies.get(joint.body1)?;
        let body2 = self.bodies.get(joint.body2)?;

        Some((
            body1.position() * joint.data.local_anchor1(),
            body2.position() * joint.data.local_anchor2(),
        ))
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    /// Static edges are the only walls.
    pub fn is_wall(&self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .get(handle)
            .is_some_and(|body| UserData::unpack(body.user_data) == UserData::Wall)
    }

    pub fn body(&self, rb: RigidBodyHandle) -> &RigidBody {
        &self.bodies[rb]
    }

    pub fn body_mut(&mut self, rb: RigidBodyHandle) -> &mut RigidBody {
        &mut self.bodies[rb]
    }

    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }
}
