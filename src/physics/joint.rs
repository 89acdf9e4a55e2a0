use super::*;
use std::f32::consts::TAU;

/// Joint between two vessels. Anchors are world points in simulation units.
///
/// Switching kind is always remove then add.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointKind {
    /// Spring pulling both anchors together.
    Compliant {
        anchor1: Point<Real>,
        anchor2: Point<Real>,
        frequency: f32,
        damping: f32,
    },
    /// Anchors locked together. Rotation is sprung at `frequency` (0 locks it too).
    Rigid {
        anchor1: Point<Real>,
        anchor2: Point<Real>,
        frequency: f32,
    },
}
impl JointKind {
    pub fn is_compliant(&self) -> bool {
        matches!(self, JointKind::Compliant { .. })
    }

    pub fn anchors(&self) -> (Point<Real>, Point<Real>) {
        match *self {
            JointKind::Compliant {
                anchor1, anchor2, ..
            }
            | JointKind::Rigid {
                anchor1, anchor2, ..
            } => (anchor1, anchor2),
        }
    }

    pub(super) fn build(
        &self,
        position1: &Isometry<Real>,
        position2: &Isometry<Real>,
    ) -> GenericJoint {
        let (anchor1, anchor2) = self.anchors();
        let local_anchor1 = position1.inverse_transform_point(&anchor1);
        let local_anchor2 = position2.inverse_transform_point(&anchor2);

        match *self {
            JointKind::Compliant {
                frequency, damping, ..
            } => {
                let omega = TAU * frequency;
                let stiffness = omega * omega;
                let damping = 2.0 * damping * omega;

                GenericJointBuilder::new(JointAxesMask::empty())
                    .local_anchor1(local_anchor1)
                    .local_anchor2(local_anchor2)
                    .motor_position(JointAxis::X, 0.0, stiffness, damping)
                    .motor_position(JointAxis::Y, 0.0, stiffness, damping)
                    .contacts_enabled(true)
                    .build()
            }
            JointKind::Rigid { frequency, .. } => {
                if frequency > 0.0 {
                    let omega = TAU * frequency;

                    GenericJointBuilder::new(JointAxesMask::LOCKED_REVOLUTE_AXES)
                        .local_anchor1(local_anchor1)
                        .local_anchor2(local_anchor2)
                        .motor_position(JointAxis::AngX, 0.0, omega * omega, 0.0)
                        .contacts_enabled(true)
                        .build()
                } else {
                    GenericJointBuilder::new(JointAxesMask::LOCKED_FIXED_AXES)
                        .local_anchor1(local_anchor1)
                        .local_anchor2(local_anchor2)
                        .contacts_enabled(true)
                        .build()
                }
            }
        }
    }
}

/// Joint currently held by a docking port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockingJoint {
    pub handle: ImpulseJointHandle,
    pub compliant: bool,
}
