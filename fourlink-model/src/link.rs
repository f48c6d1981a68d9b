use crate::error::{check_finite, ModelError, Result};
use nalgebra::{Isometry3, Matrix3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum JointType {
    /// sigma = 0
    #[default]
    Revolute,
    /// sigma = 1
    Prismatic,
}

impl JointType {
    pub fn from_sigma(sigma: u8) -> Result<JointType> {
        match sigma {
            0 => Ok(JointType::Revolute),
            1 => Ok(JointType::Prismatic),
            other => Err(ModelError::InvalidParameter {
                name: "sigma",
                reason: format!("{} is neither 0 nor 1", other),
            }),
        }
    }

    pub fn sigma(&self) -> u8 {
        match self {
            JointType::Revolute => 0,
            JointType::Prismatic => 1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    #[default]
    Standard,
    Modified,
}

/// One rigid segment of a serial chain.
///
/// Geometry follows Denavit-Hartenberg notation. Inertial values are expressed
/// in the link's own frame: `r` is the centre of gravity and `inertia` is the
/// tensor about that centre. Actuator values are motor referred.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Link {
    alpha: f64,
    a: f64,
    d: f64,
    #[serde(default)]
    theta: f64,
    #[serde(default)]
    offset: f64,
    #[serde(default)]
    joint_type: JointType,
    #[serde(default)]
    convention: Convention,
    #[serde(default)]
    mass: f64,
    #[serde(default = "zero_vector")]
    r: Vector3<f64>,
    #[serde(default = "zero_tensor")]
    inertia: Matrix3<f64>,
    #[serde(default)]
    motor_inertia: f64,
    #[serde(default = "unit_gear_ratio")]
    gear_ratio: f64,
    #[serde(default)]
    viscous_friction: f64,
    /// [positive direction, negative direction]
    #[serde(default)]
    coulomb_friction: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    qlim: Option<[f64; 2]>,
}

fn unit_gear_ratio() -> f64 {
    1.0
}

fn zero_vector() -> Vector3<f64> {
    Vector3::zeros()
}

fn zero_tensor() -> Matrix3<f64> {
    Matrix3::zeros()
}

impl Link {
    pub fn new(alpha: f64, a: f64, d: f64, joint_type: JointType) -> Result<Link> {
        Ok(Link {
            alpha: check_finite("alpha", alpha)?,
            a: check_finite("a", a)?,
            d: check_finite("d", d)?,
            theta: 0.0,
            offset: 0.0,
            joint_type,
            convention: Convention::Standard,
            mass: 0.0,
            r: Vector3::zeros(),
            inertia: Matrix3::zeros(),
            motor_inertia: 0.0,
            gear_ratio: 1.0,
            viscous_friction: 0.0,
            coulomb_friction: [0.0, 0.0],
            qlim: None,
        })
    }

    pub fn revolute(alpha: f64, a: f64, d: f64) -> Result<Link> {
        Link::new(alpha, a, d, JointType::Revolute)
    }

    /// Prismatic link, `theta` is the fixed joint angle
    pub fn prismatic(alpha: f64, a: f64, theta: f64) -> Result<Link> {
        let mut link = Link::new(alpha, a, 0.0, JointType::Prismatic)?;
        link.theta = check_finite("theta", theta)?;
        Ok(link)
    }

    pub fn with_convention(mut self, convention: Convention) -> Link {
        self.convention = convention;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Result<Link> {
        self.offset = check_finite("offset", offset)?;
        Ok(self)
    }

    pub fn with_mass(mut self, mass: f64) -> Result<Link> {
        self.mass = check_mass(mass)?;
        Ok(self)
    }

    pub fn with_cog(mut self, r: Vector3<f64>) -> Result<Link> {
        for value in r.iter() {
            check_finite("r", *value)?;
        }
        self.r = r;
        Ok(self)
    }

    /// Accepts `[Ixx, Iyy, Izz, Ixy, Iyz, Ixz]` or a row major 3x3 tensor
    pub fn with_inertia(mut self, values: &[f64]) -> Result<Link> {
        for value in values {
            check_finite("inertia", *value)?;
        }
        let inertia = match values.len() {
            6 => {
                let (ixx, iyy, izz, ixy, iyz, ixz) = (
                    values[0], values[1], values[2], values[3], values[4], values[5],
                );
                Matrix3::new(ixx, ixy, ixz, ixy, iyy, iyz, ixz, iyz, izz)
            }
            9 => Matrix3::from_row_slice(values),
            other => return Err(ModelError::InertiaLength(other)),
        };
        check_inertia(&inertia)?;
        self.inertia = inertia;
        Ok(self)
    }

    pub fn with_motor_inertia(mut self, jm: f64) -> Result<Link> {
        self.motor_inertia = check_finite("Jm", jm)?;
        Ok(self)
    }

    pub fn with_gear_ratio(mut self, g: f64) -> Result<Link> {
        self.gear_ratio = check_gear_ratio(g)?;
        Ok(self)
    }

    pub fn with_viscous_friction(mut self, b: f64) -> Result<Link> {
        self.viscous_friction = check_finite("B", b)?;
        Ok(self)
    }

    pub fn with_coulomb_friction(mut self, positive: f64, negative: f64) -> Result<Link> {
        self.coulomb_friction = [
            check_finite("Tc", positive)?,
            check_finite("Tc", negative)?,
        ];
        Ok(self)
    }

    pub fn with_limits(mut self, lower: f64, upper: f64) -> Result<Link> {
        check_limits(lower, upper)?;
        self.qlim = Some([lower, upper]);
        Ok(self)
    }

    /// Re-checks everything the builders check.
    ///
    /// Deserialized links skip the builders so loaders call this.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("a", self.a),
            ("d", self.d),
            ("theta", self.theta),
            ("offset", self.offset),
            ("Jm", self.motor_inertia),
            ("B", self.viscous_friction),
            ("Tc", self.coulomb_friction[0]),
            ("Tc", self.coulomb_friction[1]),
        ] {
            check_finite(name, value)?;
        }
        for value in self.r.iter().chain(self.inertia.iter()) {
            check_finite("inertial", *value)?;
        }
        check_mass(self.mass)?;
        check_gear_ratio(self.gear_ratio)?;
        check_inertia(&self.inertia)?;
        if let Some([lower, upper]) = self.qlim {
            check_limits(lower, upper)?;
        }
        Ok(())
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn joint_type(&self) -> JointType {
        self.joint_type
    }

    pub fn is_revolute(&self) -> bool {
        self.joint_type == JointType::Revolute
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn cog(&self) -> &Vector3<f64> {
        &self.r
    }

    pub fn inertia(&self) -> &Matrix3<f64> {
        &self.inertia
    }

    pub fn motor_inertia(&self) -> f64 {
        self.motor_inertia
    }

    pub fn gear_ratio(&self) -> f64 {
        self.gear_ratio
    }

    pub fn viscous_friction(&self) -> f64 {
        self.viscous_friction
    }

    pub fn coulomb_friction(&self) -> [f64; 2] {
        self.coulomb_friction
    }

    pub fn limits(&self) -> Option<[f64; 2]> {
        self.qlim
    }

    /// Link transform for joint coordinate `q`
    pub fn transform(&self, q: f64) -> Isometry3<f64> {
        let (theta, d) = match self.joint_type {
            JointType::Revolute => (q + self.offset, self.d),
            JointType::Prismatic => (self.theta, q + self.offset),
        };
        let rot_z = Isometry3::rotation(Vector3::z() * theta);
        let trans_z = Isometry3::translation(0.0, 0.0, d);
        let trans_x = Isometry3::translation(self.a, 0.0, 0.0);
        let rot_x = Isometry3::rotation(Vector3::x() * self.alpha);
        match self.convention {
            Convention::Standard => rot_z * trans_z * trans_x * rot_x,
            Convention::Modified => rot_x * trans_x * rot_z * trans_z,
        }
    }

    /// Joint referred torque needed to overcome friction at joint rate `qd`
    ///
    /// Coulomb friction contributes nothing when the joint is at rest.
    pub fn friction(&self, qd: f64) -> f64 {
        let gear = self.gear_ratio.abs();
        let mut tau = self.viscous_friction * gear * qd;
        if qd > 0.0 {
            tau += self.coulomb_friction[0];
        } else if qd < 0.0 {
            tau += self.coulomb_friction[1];
        }
        gear * tau
    }

    pub fn nofriction(&self) -> Link {
        Link {
            viscous_friction: 0.0,
            coulomb_friction: [0.0, 0.0],
            ..self.clone()
        }
    }

    pub fn within_limits(&self, q: f64) -> bool {
        match self.qlim {
            Some([lower, upper]) => q >= lower && q <= upper,
            None => true,
        }
    }
}

fn check_mass(mass: f64) -> Result<f64> {
    if check_finite("mass", mass)? < 0.0 {
        return Err(ModelError::InvalidParameter {
            name: "mass",
            reason: format!("{} is negative", mass),
        });
    }
    Ok(mass)
}

fn check_gear_ratio(g: f64) -> Result<f64> {
    if check_finite("G", g)? == 0.0 {
        return Err(ModelError::InvalidParameter {
            name: "G",
            reason: "gear ratio can't be zero".to_owned(),
        });
    }
    Ok(g)
}

fn check_limits(lower: f64, upper: f64) -> Result<()> {
    if check_finite("qlim", lower)? > check_finite("qlim", upper)? {
        return Err(ModelError::InvalidParameter {
            name: "qlim",
            reason: format!("lower {} above upper {}", lower, upper),
        });
    }
    Ok(())
}

fn check_inertia(inertia: &Matrix3<f64>) -> Result<()> {
    let asymmetry = (inertia - inertia.transpose()).abs().max();
    if asymmetry > 1e-12 {
        return Err(ModelError::InvalidParameter {
            name: "inertia",
            reason: "tensor isn't symmetric".to_owned(),
        });
    }
    Ok(())
}
