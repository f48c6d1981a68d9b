//! Rigid body dynamics for standard DH chains.
//!
//! Inverse dynamics use the recursive Newton-Euler formulation of Luh, Walker
//! and Paul. Gravity enters as an upward acceleration of the base, so the
//! returned torques are those the actuators must supply.
use crate::error::{check_joint_count, ModelError, Result};
use crate::link::JointType;
use crate::robot::Robot;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3, Vector6};

impl Robot {
    /// Joint torques for the given motion under the robot's gravity
    pub fn rne(&self, q: &[f64], qd: &[f64], qdd: &[f64]) -> Result<DVector<f64>> {
        self.rne_with(q, qd, qdd, self.gravity(), &Vector6::zeros())
    }

    /// Joint torques with explicit gravity and a wrench `[fx fy fz mx my mz]`
    /// applied by the last link on the environment, in the last link frame.
    pub fn rne_with(
        &self,
        q: &[f64],
        qd: &[f64],
        qdd: &[f64],
        gravity: &Vector3<f64>,
        fext: &Vector6<f64>,
    ) -> Result<DVector<f64>> {
        let n = self.dof();
        check_joint_count(n, q.len())?;
        check_joint_count(n, qd.len())?;
        check_joint_count(n, qdd.len())?;
        if self.is_modified_dh() {
            return Err(ModelError::ModifiedDhDynamics);
        }

        let z0 = Vector3::z();
        let mut w = Vector3::zeros();
        let mut wd = Vector3::zeros();
        let mut vd = self.base().rotation.inverse() * gravity;

        let mut rotations: Vec<Matrix3<f64>> = Vec::with_capacity(n);
        let mut offsets: Vec<Vector3<f64>> = Vec::with_capacity(n);
        let mut forces: Vec<Vector3<f64>> = Vec::with_capacity(n);
        let mut moments: Vec<Vector3<f64>> = Vec::with_capacity(n);

        for (j, link) in self.links().iter().enumerate() {
            let rotation = link
                .transform(q[j])
                .rotation
                .to_rotation_matrix()
                .into_inner();
            let rotation_t = rotation.transpose();
            let d = match link.joint_type() {
                JointType::Revolute => link.d(),
                JointType::Prismatic => q[j] + link.offset(),
            };
            // origin of frame j relative to frame j-1, in frame j
            let offset = Vector3::new(link.a(), d * link.alpha().sin(), d * link.alpha().cos());

            match link.joint_type() {
                JointType::Revolute => {
                    wd = rotation_t * (wd + z0 * qdd[j] + w.cross(&(z0 * qd[j])));
                    w = rotation_t * (w + z0 * qd[j]);
                    vd = wd.cross(&offset) + w.cross(&w.cross(&offset)) + rotation_t * vd;
                }
                JointType::Prismatic => {
                    w = rotation_t * w;
                    wd = rotation_t * wd;
                    vd = rotation_t * (z0 * qdd[j] + vd)
                        + wd.cross(&offset)
                        + 2.0 * w.cross(&(rotation_t * z0 * qd[j]))
                        + w.cross(&w.cross(&offset));
                }
            }

            let cog = link.cog();
            let cog_acceleration = wd.cross(cog) + w.cross(&w.cross(cog)) + vd;
            let inertia = link.inertia();
            forces.push(link.mass() * cog_acceleration);
            moments.push(inertia * wd + w.cross(&(inertia * w)));
            rotations.push(rotation);
            offsets.push(offset);
        }

        let mut force: Vector3<f64> = fext.fixed_rows::<3>(0).into_owned();
        let mut moment: Vector3<f64> = fext.fixed_rows::<3>(3).into_owned();
        let mut tau = DVector::zeros(n);

        for (j, link) in self.links().iter().enumerate().rev() {
            let next_rotation = rotations.get(j + 1).copied().unwrap_or_else(Matrix3::identity);
            let offset = offsets[j];
            moment = next_rotation * (moment + (next_rotation.transpose() * offset).cross(&force))
                + (offset + link.cog()).cross(&forces[j])
                + moments[j];
            force = next_rotation * force + forces[j];

            let axis = rotations[j].transpose() * z0;
            let load = match link.joint_type() {
                JointType::Revolute => moment.dot(&axis),
                JointType::Prismatic => force.dot(&axis),
            };
            let gear = link.gear_ratio();
            tau[j] = load + gear * gear * link.motor_inertia() * qdd[j] + link.friction(qd[j]);
        }
        Ok(tau)
    }

    /// Torque holding the arm still against gravity
    pub fn gravload(&self, q: &[f64]) -> Result<DVector<f64>> {
        let zeros = vec![0.0; self.dof()];
        self.nofriction()
            .rne_with(q, &zeros, &zeros, self.gravity(), &Vector6::zeros())
    }

    /// Joint space inertia matrix, motor inertia included
    pub fn inertia(&self, q: &[f64]) -> Result<DMatrix<f64>> {
        check_joint_count(self.dof(), q.len())?;
        let n = self.dof();
        let frictionless = self.nofriction();
        let zeros = vec![0.0; n];
        let mut inertia = DMatrix::zeros(n, n);
        for column in 0..n {
            let mut qdd = vec![0.0; n];
            qdd[column] = 1.0;
            let tau =
                frictionless.rne_with(q, &zeros, &qdd, &Vector3::zeros(), &Vector6::zeros())?;
            inertia.set_column(column, &tau);
        }
        Ok(inertia)
    }

    /// Centripetal and Coriolis torque, C(q, qd) * qd
    pub fn coriolis(&self, q: &[f64], qd: &[f64]) -> Result<DVector<f64>> {
        let zeros = vec![0.0; self.dof()];
        self.nofriction()
            .rne_with(q, qd, &zeros, &Vector3::zeros(), &Vector6::zeros())
    }

    /// Torque needed to produce `qdd` from rest without gravity
    pub fn itorque(&self, q: &[f64], qdd: &[f64]) -> Result<DVector<f64>> {
        check_joint_count(self.dof(), qdd.len())?;
        let inertia = self.inertia(q)?;
        Ok(inertia * DVector::from_column_slice(qdd))
    }

    /// Forward dynamics, joint acceleration produced by torque `tau`
    pub fn accel(&self, q: &[f64], qd: &[f64], tau: &[f64]) -> Result<DVector<f64>> {
        check_joint_count(self.dof(), tau.len())?;
        let inertia = self.inertia(q)?;
        let zeros = vec![0.0; self.dof()];
        // gravity, velocity products and friction at zero acceleration
        let bias = self.rne(q, qd, &zeros)?;
        let rhs = DVector::from_column_slice(tau) - bias;
        inertia.lu().solve(&rhs).ok_or(ModelError::SingularInertia)
    }
}
