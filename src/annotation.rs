use crate::{error::Error, geometry::Point};
use num_traits::{FromPrimitive, ToPrimitive};
use std::str::FromStr;

/// Annotation flag attached to every joint.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, num_derive::FromPrimitive, num_derive::ToPrimitive,
)]
pub enum Visibility {
    Unlabeled = 0,
    Visible = 1,
    LabeledNotVisible = 2,
}

impl Visibility {
    /// Codes must be exactly 0, 1 or 2; fractional values are rejected rather
    /// than truncated.
    pub fn from_code<T: ToPrimitive + Copy>(code: T) -> Result<Self, Error> {
        let exact = code.to_f64().unwrap_or(f64::NAN);
        code.to_i64()
            .filter(|&integral| integral as f64 == exact)
            .and_then(Self::from_i64)
            .ok_or(Error::UnknownVisibilityCode(exact))
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Rule deciding which visibility codes count as present when building a map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VisibilityPolicy {
    VisibleOnly,
    VisibleOrLabeled,
}

impl VisibilityPolicy {
    pub const ALL: [VisibilityPolicy; 2] = [Self::VisibleOnly, Self::VisibleOrLabeled];

    pub fn admits(self, visibility: Visibility) -> bool {
        match self {
            Self::VisibleOnly => visibility == Visibility::Visible,
            Self::VisibleOrLabeled => matches!(
                visibility,
                Visibility::Visible | Visibility::LabeledNotVisible
            ),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Joint {
    pub point: Point,
    pub visibility: Visibility,
}

impl Joint {
    pub fn new(x: f32, y: f32, visibility: Visibility) -> Result<Self, Error> {
        Ok(Self {
            point: Point::new(x, y)?,
            visibility,
        })
    }

    /// Construct a joint from a raw `(x, y, v)` annotation triple.
    pub fn from_raw<T: ToPrimitive + Copy>(x: f32, y: f32, code: T) -> Result<Self, Error> {
        Self::new(x, y, Visibility::from_code(code)?)
    }

    pub fn unlabeled() -> Self {
        Self {
            point: Point::default(),
            visibility: Visibility::Unlabeled,
        }
    }
}

/// Parses `x,y,v`.
impl FromStr for Joint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || Error::ParseJoint(s.to_owned());
        let mut fields = s.split(',').map(str::trim);
        let mut next = || fields.next().ok_or_else(parse_error);
        let x = next()?.parse().map_err(|_| parse_error())?;
        let y = next()?.parse().map_err(|_| parse_error())?;
        let code: i64 = next()?.parse().map_err(|_| parse_error())?;
        if fields.next().is_some() {
            return Err(parse_error());
        }
        Self::from_raw(x, y, code)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Person {
    pub joints: Vec<Joint>,
}

impl Person {
    pub fn new(joints: Vec<Joint>) -> Self {
        Self { joints }
    }

    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }
}

/// Parses joints separated by whitespace or `;`, e.g. `"10,20,1 30,40,2"`.
impl FromStr for Person {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c == ';' || c.is_whitespace())
            .filter(|joint| !joint.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

/// The people of one annotated scene.
///
/// A `Crowd` is never empty and all of its people have the same number of
/// joints.
#[derive(Debug, Clone, PartialEq)]
pub struct Crowd {
    people: Vec<Person>,
}

impl Crowd {
    pub fn new(people: Vec<Person>) -> Result<Self, Error> {
        let expected = people.first().ok_or(Error::EmptyScene)?.num_joints();
        if let Some((person, got)) = people
            .iter()
            .map(Person::num_joints)
            .enumerate()
            .find(|&(_, got)| got != expected)
        {
            return Err(Error::JointCountMismatch {
                person,
                expected,
                got,
            });
        }
        Ok(Self { people })
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn num_joints(&self) -> usize {
        self.people[0].num_joints()
    }

    /// The joint at `joint_index` of every person, in person order.
    pub fn joints(&self, joint_index: usize) -> Result<impl Iterator<Item = &Joint> + '_, Error> {
        let num_joints = self.num_joints();
        if joint_index >= num_joints {
            return Err(Error::JointIndexOutOfRange(joint_index, num_joints));
        }
        Ok(self
            .people
            .iter()
            .map(move |person| &person.joints[joint_index]))
    }
}
