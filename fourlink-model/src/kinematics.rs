use crate::error::{check_joint_count, Result};
use crate::robot::Robot;
use nalgebra::{DMatrix, Isometry3, Matrix3, Vector3};

impl Robot {
    /// Pose of the tool in the world frame
    pub fn fkine(&self, q: &[f64]) -> Result<Isometry3<f64>> {
        let frames = self.link_frames(q)?;
        // link_frames never returns an empty list
        let last = frames[frames.len() - 1];
        Ok(last * self.tool())
    }

    /// Base frame followed by the frame of every link, tool not included
    pub fn link_frames(&self, q: &[f64]) -> Result<Vec<Isometry3<f64>>> {
        check_joint_count(self.dof(), q.len())?;
        let mut frames = Vec::with_capacity(self.dof() + 1);
        let mut transform = *self.base();
        frames.push(transform);
        for (link, angle) in self.links().iter().zip(q.iter()) {
            transform *= link.transform(*angle);
            frames.push(transform);
        }
        Ok(frames)
    }

    /// Geometric Jacobian in the world frame.
    ///
    /// Rows 0..3 map joint rates to linear velocity of the tool point,
    /// rows 3..6 to angular velocity.
    pub fn jacob0(&self, q: &[f64]) -> Result<DMatrix<f64>> {
        let frames = self.link_frames(q)?;
        let tool_position = self.fkine(q)?.translation.vector;
        let mut jacobian = DMatrix::zeros(6, self.dof());

        for (i, link) in self.links().iter().enumerate() {
            // joint i moves about z of the frame before it for standard DH
            // and about z of its own frame for modified DH
            let joint_frame = if self.is_modified_dh() {
                &frames[i + 1]
            } else {
                &frames[i]
            };
            let axis = joint_frame.rotation * Vector3::z();
            let origin = joint_frame.translation.vector;

            let (linear, angular) = if link.is_revolute() {
                (axis.cross(&(tool_position - origin)), axis)
            } else {
                (axis, Vector3::zeros())
            };
            jacobian.fixed_view_mut::<3, 1>(0, i).copy_from(&linear);
            jacobian.fixed_view_mut::<3, 1>(3, i).copy_from(&angular);
        }
        Ok(jacobian)
    }

    /// Geometric Jacobian expressed in the tool frame
    pub fn jacobn(&self, q: &[f64]) -> Result<DMatrix<f64>> {
        let jacobian = self.jacob0(q)?;
        let rotation: Matrix3<f64> = self.fkine(q)?.rotation.to_rotation_matrix().into_inner();
        let rotation_t = rotation.transpose();
        let mut local = DMatrix::zeros(6, self.dof());
        local
            .view_mut((0, 0), (3, self.dof()))
            .copy_from(&(rotation_t * jacobian.rows(0, 3)));
        local
            .view_mut((3, 0), (3, self.dof()))
            .copy_from(&(rotation_t * jacobian.rows(3, 3)));
        Ok(local)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ModelError;
    use crate::link::{Convention, Link};
    use crate::models::fourlink3d;
    use crate::robot::Robot;
    use approx::assert_relative_eq;
    use nalgebra::{Isometry3, Vector3};
    use std::f64::consts::FRAC_PI_2;

    /// Tool point of the upright arm from planar geometry
    fn upright_arm_tip(q: &[f64]) -> Vector3<f64> {
        let reach = 2.0 * q[1].cos() + 2.0 * (q[1] + q[2]).cos() + (q[1] + q[2] + q[3]).cos();
        let height =
            2.0 + 2.0 * q[1].sin() + 2.0 * (q[1] + q[2]).sin() + (q[1] + q[2] + q[3]).sin();
        Vector3::new(reach * q[0].cos(), reach * q[0].sin(), height)
    }

    #[test]
    fn zero_pose_points_along_x() {
        let robot = fourlink3d::robot().unwrap();
        let pose = robot.fkine(fourlink3d::qz().joints()).unwrap();
        assert_relative_eq!(
            pose.translation.vector,
            Vector3::new(5.0, 0.0, 2.0),
            epsilon = 1e-12
        );
        // first link twists the chain upright
        assert_relative_eq!(pose.rotation * Vector3::z(), -Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn named_poses_match_planar_geometry() {
        let robot = fourlink3d::robot().unwrap();
        for pose in fourlink3d::poses().unwrap().iter() {
            let tip = robot.fkine(pose.joints()).unwrap().translation.vector;
            assert_relative_eq!(tip, upright_arm_tip(pose.joints()), epsilon = 1e-12);
        }
    }

    #[test]
    fn link_frames_start_at_base() {
        let robot = fourlink3d::robot()
            .unwrap()
            .with_base(Isometry3::translation(1.0, 0.0, 0.0));
        let frames = robot.link_frames(&[0.0; 4]).unwrap();
        assert_eq!(frames.len(), 5);
        assert_relative_eq!(
            frames[0].translation.vector,
            Vector3::new(1.0, 0.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            frames[1].translation.vector,
            Vector3::new(1.0, 0.0, 2.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            frames[4].translation.vector,
            Vector3::new(6.0, 0.0, 2.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn tool_offset_is_applied_last() {
        let robot = fourlink3d::robot()
            .unwrap()
            .with_tool(Isometry3::translation(0.5, 0.0, 0.0));
        let pose = robot.fkine(&[0.0; 4]).unwrap();
        assert_relative_eq!(
            pose.translation.vector,
            Vector3::new(5.5, 0.0, 2.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn rejects_wrong_joint_count() {
        let robot = fourlink3d::robot().unwrap();
        assert!(matches!(
            robot.fkine(&[0.0; 3]),
            Err(ModelError::JointCountMismatch {
                expected: 4,
                actual: 3
            })
        ));
        assert!(robot.jacob0(&[0.0; 5]).is_err());
    }

    #[test]
    fn jacobian_at_zero_pose() {
        let robot = fourlink3d::robot().unwrap();
        let jacobian = robot.jacob0(&[0.0; 4]).unwrap();
        // base joint swings the tip sideways
        assert_relative_eq!(
            jacobian.fixed_view::<6, 1>(0, 0).into_owned(),
            nalgebra::Vector6::new(0.0, 5.0, 0.0, 0.0, 0.0, 1.0),
            epsilon = 1e-12
        );
        // remaining joints lift it by their distance to the tip
        for (column, lever) in [(1, 5.0), (2, 3.0), (3, 1.0)] {
            assert_relative_eq!(
                jacobian.fixed_view::<6, 1>(0, column).into_owned(),
                nalgebra::Vector6::new(0.0, 0.0, lever, 0.0, -1.0, 0.0),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn jacobian_matches_finite_difference() {
        let robot = fourlink3d::robot().unwrap();
        let q = fourlink3d::qn();
        let q = q.joints();
        let jacobian = robot.jacob0(q).unwrap();
        let step = 1e-6;
        for joint in 0..4 {
            let mut forward = q.to_vec();
            let mut backward = q.to_vec();
            forward[joint] += step;
            backward[joint] -= step;
            let delta = (robot.fkine(&forward).unwrap().translation.vector
                - robot.fkine(&backward).unwrap().translation.vector)
                / (2.0 * step);
            assert_relative_eq!(
                jacobian.fixed_view::<3, 1>(0, joint).into_owned(),
                delta,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn tool_frame_jacobian_rotates_rows() {
        let robot = fourlink3d::robot().unwrap();
        let q = fourlink3d::qt();
        let world = robot.jacob0(q.joints()).unwrap();
        let local = robot.jacobn(q.joints()).unwrap();
        let rotation = robot.fkine(q.joints()).unwrap().rotation;
        for joint in 0..4 {
            let linear = local.fixed_view::<3, 1>(0, joint).into_owned();
            let angular = local.fixed_view::<3, 1>(3, joint).into_owned();
            assert_relative_eq!(
                rotation * linear,
                world.fixed_view::<3, 1>(0, joint).into_owned(),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                rotation * angular,
                world.fixed_view::<3, 1>(3, joint).into_owned(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn modified_dh_uses_own_frame_axis() {
        let links = vec![
            Link::revolute(0.0, 0.0, 0.0)
                .unwrap()
                .with_convention(Convention::Modified),
            Link::revolute(FRAC_PI_2, 1.0, 0.0)
                .unwrap()
                .with_convention(Convention::Modified),
        ];
        let robot = Robot::new(links, "modified").unwrap();
        let jacobian = robot.jacob0(&[0.0, 0.0]).unwrap();
        // second joint axis is twisted onto -y and sits at the tip
        assert_relative_eq!(
            jacobian.fixed_view::<6, 1>(0, 1).into_owned(),
            nalgebra::Vector6::new(0.0, 0.0, 0.0, 0.0, -1.0, 0.0),
            epsilon = 1e-12
        );
        // first joint sees the tip one unit along x
        assert_relative_eq!(
            jacobian.fixed_view::<6, 1>(0, 0).into_owned(),
            nalgebra::Vector6::new(0.0, 1.0, 0.0, 0.0, 0.0, 1.0),
            epsilon = 1e-12
        );
    }
}
