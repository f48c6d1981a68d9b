use crate::error::{check_finite, check_joint_count, ModelError, Result};
use crate::pose::Pose;
use nalgebra::DVector;

/// Straight line in joint space.
///
/// Every step moves the joint furthest from the target by `max_step` and
/// scales the others so all joints arrive together. The last item is always
/// the target itself.
pub struct JointMotion {
    target: DVector<f64>,
    current: DVector<f64>,
    max_step: f64,
}

impl JointMotion {
    pub fn new(start: &[f64], target: &[f64], max_step: f64) -> Result<Self> {
        check_joint_count(start.len(), target.len())?;
        for value in start.iter().chain(target.iter()) {
            check_finite("joints", *value)?;
        }
        if !(max_step.is_finite() && max_step > 0.0) {
            return Err(ModelError::InvalidParameter {
                name: "max_step",
                reason: format!("{} isn't a positive step", max_step),
            });
        }
        Ok(JointMotion {
            target: DVector::from_column_slice(target),
            current: DVector::from_column_slice(start),
            max_step,
        })
    }

    pub fn between(start: &Pose, target: &Pose, max_step: f64) -> Result<Self> {
        JointMotion::new(start.joints(), target.joints(), max_step)
    }
}

impl Iterator for JointMotion {
    type Item = DVector<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.current.move_towards(&self.target, self.max_step) {
            Some(next) => {
                self.current = next.clone();
                Some(next)
            }
            None => None,
        }
    }
}

trait MoveTowards: Sized {
    fn move_towards(&self, target: &Self, max_step: f64) -> Option<Self>;
}

impl MoveTowards for DVector<f64> {
    fn move_towards(&self, target: &Self, max_step: f64) -> Option<Self> {
        if self == target {
            return None;
        }
        let translation = target - self;
        let distance = translation.amax();
        if distance <= max_step {
            return Some(target.clone());
        }
        Some(self + translation * (max_step / distance))
    }
}
