use crate::error::{check_finite, ModelError, Result};
use crate::link::{Convention, JointType, Link};
use nalgebra::{Isometry3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard gravity pointing up the base z axis.
///
/// Dynamics treat gravity as an upward acceleration of the base.
pub const DEFAULT_GRAVITY: [f64; 3] = [0.0, 0.0, 9.81];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DisplayHandles {
    /// draw in 3D
    pub p3d: bool,
    /// annotation scale
    pub mag: f64,
}

impl Default for DisplayHandles {
    fn default() -> Self {
        DisplayHandles {
            p3d: false,
            mag: 1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PlotOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xlim: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ylim: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zlim: Option<[f64; 2]>,
}

/// Serial link manipulator
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Robot {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    links: Vec<Link>,
    #[serde(default = "identity")]
    base: Isometry3<f64>,
    #[serde(default = "identity")]
    tool: Isometry3<f64>,
    #[serde(default = "default_gravity")]
    gravity: Vector3<f64>,
    #[serde(default)]
    handles: DisplayHandles,
    #[serde(default)]
    plot_options: PlotOptions,
}

fn identity() -> Isometry3<f64> {
    Isometry3::identity()
}

fn default_gravity() -> Vector3<f64> {
    Vector3::from(DEFAULT_GRAVITY)
}

impl Robot {
    pub fn new(links: Vec<Link>, name: impl Into<String>) -> Result<Robot> {
        let robot = Robot {
            name: name.into(),
            manufacturer: None,
            comment: None,
            links,
            base: Isometry3::identity(),
            tool: Isometry3::identity(),
            gravity: default_gravity(),
            handles: DisplayHandles::default(),
            plot_options: PlotOptions::default(),
        };
        robot.validate()?;
        Ok(robot)
    }

    pub fn validate(&self) -> Result<()> {
        let first = self.links.first().ok_or(ModelError::EmptyChain)?;
        if self
            .links
            .iter()
            .any(|link| link.convention() != first.convention())
        {
            return Err(ModelError::MixedConvention);
        }
        for link in &self.links {
            link.validate()?;
        }
        for value in self.gravity.iter() {
            check_finite("gravity", *value)?;
        }
        check_isometry("base", &self.base)?;
        check_isometry("tool", &self.tool)?;
        check_finite("mag", self.handles.mag)?;
        for (name, range) in [
            ("xlim", self.plot_options.xlim),
            ("ylim", self.plot_options.ylim),
            ("zlim", self.plot_options.zlim),
        ] {
            if let Some(range) = range {
                check_range(name, range)?;
            }
        }
        Ok(())
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Robot {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Robot {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_base(mut self, base: Isometry3<f64>) -> Robot {
        self.base = base;
        self
    }

    pub fn with_tool(mut self, tool: Isometry3<f64>) -> Robot {
        self.tool = tool;
        self
    }

    pub fn with_gravity(mut self, gravity: Vector3<f64>) -> Result<Robot> {
        for value in gravity.iter() {
            check_finite("gravity", *value)?;
        }
        self.gravity = gravity;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.manufacturer.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn dof(&self) -> usize {
        self.links.len()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link(&self, index: usize) -> Option<&Link> {
        self.links.get(index)
    }

    pub fn base(&self) -> &Isometry3<f64> {
        &self.base
    }

    pub fn tool(&self) -> &Isometry3<f64> {
        &self.tool
    }

    pub fn gravity(&self) -> &Vector3<f64> {
        &self.gravity
    }

    pub fn handles(&self) -> &DisplayHandles {
        &self.handles
    }

    pub fn plot_options(&self) -> &PlotOptions {
        &self.plot_options
    }

    pub fn is_modified_dh(&self) -> bool {
        self.links
            .first()
            .map(|link| link.convention() == Convention::Modified)
            .unwrap_or(false)
    }

    /// Joint types as a string, R for revolute and P for prismatic
    pub fn config(&self) -> String {
        self.links
            .iter()
            .map(|link| match link.joint_type() {
                JointType::Revolute => 'R',
                JointType::Prismatic => 'P',
            })
            .collect()
    }

    /// Known keys are `p3D` and `mag`
    pub fn set_handle(&mut self, key: &str, value: f64) -> Result<()> {
        let value = check_finite("handle", value)?;
        match key {
            "p3D" => self.handles.p3d = value != 0.0,
            "mag" => self.handles.mag = value,
            _ => return Err(ModelError::UnknownHandle(key.to_owned())),
        }
        Ok(())
    }

    /// Known keys are `xlim`, `ylim` and `zlim`
    pub fn set_plotopt(&mut self, key: &str, range: [f64; 2]) -> Result<()> {
        let (name, slot) = match key {
            "xlim" => ("xlim", &mut self.plot_options.xlim),
            "ylim" => ("ylim", &mut self.plot_options.ylim),
            "zlim" => ("zlim", &mut self.plot_options.zlim),
            _ => return Err(ModelError::UnknownPlotOption(key.to_owned())),
        };
        *slot = Some(check_range(name, range)?);
        Ok(())
    }

    /// Copy of the robot with friction removed from every link
    pub fn nofriction(&self) -> Robot {
        Robot {
            links: self.links.iter().map(Link::nofriction).collect(),
            ..self.clone()
        }
    }

    pub fn within_limits(&self, q: &[f64]) -> bool {
        q.len() == self.dof()
            && self
                .links
                .iter()
                .zip(q.iter())
                .all(|(link, q)| link.within_limits(*q))
    }
}

fn check_range(name: &'static str, range: [f64; 2]) -> Result<[f64; 2]> {
    let [low, high] = range;
    if check_finite(name, low)? >= check_finite(name, high)? {
        return Err(ModelError::InvalidParameter {
            name,
            reason: format!("range {} to {} is empty", low, high),
        });
    }
    Ok(range)
}

fn check_isometry(name: &'static str, isometry: &Isometry3<f64>) -> Result<()> {
    let translation = isometry.translation.vector.iter();
    let rotation = isometry.rotation.coords.iter();
    for value in translation.chain(rotation) {
        check_finite(name, *value)?;
    }
    Ok(())
}

impl fmt::Display for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let convention = if self.is_modified_dh() {
            "modDH"
        } else {
            "stdDH"
        };
        writeln!(
            f,
            "{} ({} axis, {}, {})",
            self.name,
            self.dof(),
            self.config(),
            convention
        )?;
        if let Some(manufacturer) = &self.manufacturer {
            writeln!(f, "{}", manufacturer)?;
        }
        if let Some(comment) = &self.comment {
            writeln!(f, "{}", comment)?;
        }
        let separator = "+---+-----------+-----------+-----------+-----------+";
        writeln!(f, "{}", separator)?;
        writeln!(
            f,
            "| j | {:>9} | {:>9} | {:>9} | {:>9} |",
            "theta", "d", "a", "alpha"
        )?;
        writeln!(f, "{}", separator)?;
        for (index, link) in self.links.iter().enumerate() {
            let (theta, d) = match link.joint_type() {
                JointType::Revolute => (format!("q{}", index + 1), format!("{:.4}", link.d())),
                JointType::Prismatic => {
                    (format!("{:.4}", link.theta()), format!("q{}", index + 1))
                }
            };
            writeln!(
                f,
                "|{:>2} | {:>9} | {:>9} | {:>9.4} | {:>9.4} |",
                index + 1,
                theta,
                d,
                link.a(),
                link.alpha()
            )?;
        }
        write!(f, "{}", separator)
    }
}
