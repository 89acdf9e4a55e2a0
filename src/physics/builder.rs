use super::*;

const DEFAULT_ANGULAR_DAMPING: f32 = 0.01;

pub const GROUP_WALL: Group = Group::GROUP_1;
pub const GROUP_CHARACTER: Group = Group::GROUP_2;

pub fn make_vessel_body(mass: f32, linear_damping: f32) -> RigidBody {
    // Inertia is irrelevant with locked rotations but must not be zero.
    let mprops = MassProperties::new(Point::origin(), mass, mass);

    RigidBodyBuilder::dynamic()
        .additional_mass_properties(mprops)
        .lock_rotations()
        .linear_damping(linear_damping)
        .angular_damping(DEFAULT_ANGULAR_DAMPING)
        .build()
}

pub fn make_static_body() -> RigidBody {
    RigidBodyBuilder::fixed().build()
}

/// Thin wall, only collides with what walks inside vessels.
pub fn make_edge_collider(a: Point<Real>, b: Point<Real>, friction: f32) -> Collider {
    ColliderBuilder::segment(a, b)
        .collision_groups(InteractionGroups::new(GROUP_WALL, GROUP_CHARACTER))
        .friction(friction)
        .build()
}
