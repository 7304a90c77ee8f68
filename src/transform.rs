//! Affine transforms that can be pushed onto the drawing stack or attached to
//! a geometry

use crate::error::Result;
use crate::format::{deserialize_list, serialize_list, Affine, Point, Serializable, Vec2};
use crate::ids::TransformationId;
use crate::reader::BufferReader;
use crate::writer::BufferWriter;

/// Angles are given in degrees, rotations and shears happen around `center`
#[derive(Debug, PartialEq, Clone)]
pub enum Transform {
    Identity,
    Translation {
        x: f64,
        y: f64,
    },
    Rotation {
        angle: f64,
        center: Point,
    },
    Scaling {
        scale_x: f64,
        scale_y: f64,
        center: Point,
    },
    Shear {
        angle_x: f64,
        angle_y: f64,
        center: Point,
    },
    Matrix {
        m11: f64,
        m12: f64,
        m21: f64,
        m22: f64,
        offset_x: f64,
        offset_y: f64,
    },
    /// Children are applied in order, the first child first
    Group(Vec<Transform>),
}

impl Default for Transform {
    fn default() -> Self {
        Transform::Identity
    }
}

impl Transform {
    /// Move by `x`, `y`
    pub fn translation(x: f64, y: f64) -> Self {
        Transform::Translation { x, y }
    }

    /// Rotate by `angle` degrees around the origin
    pub fn rotation(angle: f64) -> Self {
        Transform::Rotation {
            angle,
            center: Point::ZERO,
        }
    }

    /// Scale around the origin
    pub fn scaling(scale_x: f64, scale_y: f64) -> Self {
        Transform::Scaling {
            scale_x,
            scale_y,
            center: Point::ZERO,
        }
    }

    /// Identifier written in front of the transform
    pub fn id(&self) -> TransformationId {
        match self {
            Transform::Identity => TransformationId::Identity,
            Transform::Translation { .. } => TransformationId::Translation,
            Transform::Rotation { .. } => TransformationId::Rotation,
            Transform::Scaling { .. } => TransformationId::Scaling,
            Transform::Shear { .. } => TransformationId::Shear,
            Transform::Matrix { .. } => TransformationId::Matrix,
            Transform::Group(_) => TransformationId::Group,
        }
    }

    /// Whether the transform leaves every point in place
    pub fn is_identity(&self) -> bool {
        match self {
            Transform::Identity => true,
            Transform::Group(children) => children.iter().all(Transform::is_identity),
            _ => false,
        }
    }

    /// The transform as a `kurbo` affine mapping local to parent coordinates
    pub fn to_affine(&self) -> Affine {
        match self {
            Transform::Identity => Affine::IDENTITY,
            Transform::Translation { x, y } => Affine::translate(Vec2::new(*x, *y)),
            Transform::Rotation { angle, center } => {
                around(*center, Affine::rotate(angle.to_radians()))
            }
            Transform::Scaling {
                scale_x,
                scale_y,
                center,
            } => around(*center, Affine::scale_non_uniform(*scale_x, *scale_y)),
            Transform::Shear {
                angle_x,
                angle_y,
                center,
            } => around(
                *center,
                Affine::new([
                    1.0,
                    angle_y.to_radians().tan(),
                    angle_x.to_radians().tan(),
                    1.0,
                    0.0,
                    0.0,
                ]),
            ),
            Transform::Matrix {
                m11,
                m12,
                m21,
                m22,
                offset_x,
                offset_y,
            } => Affine::new([*m11, *m12, *m21, *m22, *offset_x, *offset_y]),
            Transform::Group(children) => children
                .iter()
                .fold(Affine::IDENTITY, |acc, child| child.to_affine() * acc),
        }
    }
}

fn around(center: Point, affine: Affine) -> Affine {
    let offset = center.to_vec2();

    Affine::translate(offset) * affine * Affine::translate(-offset)
}

impl Serializable for Transform {
    fn serialize(&self, target: &mut BufferWriter) -> Result<()> {
        target.write_byte(self.id().into());

        match self {
            Transform::Identity => {}
            Transform::Translation { x, y } => {
                target.write_double(*x);
                target.write_double(*y);
            }
            Transform::Rotation { angle, center } => {
                target.write_double(*angle);
                center.serialize(target)?;
            }
            Transform::Scaling {
                scale_x,
                scale_y,
                center,
            } => {
                target.write_double(*scale_x);
                target.write_double(*scale_y);
                center.serialize(target)?;
            }
            Transform::Shear {
                angle_x,
                angle_y,
                center,
            } => {
                target.write_double(*angle_x);
                target.write_double(*angle_y);
                center.serialize(target)?;
            }
            Transform::Matrix {
                m11,
                m12,
                m21,
                m22,
                offset_x,
                offset_y,
            } => {
                for value in [m11, m12, m21, m22, offset_x, offset_y] {
                    target.write_double(*value);
                }
            }
            Transform::Group(children) => serialize_list(children, target)?,
        }

        Ok(())
    }

    fn deserialize(source: &mut BufferReader<'_>) -> Result<Self> {
        let transform = match TransformationId::try_from(source.read_byte()?)? {
            TransformationId::Identity => Transform::Identity,
            TransformationId::Translation => Transform::Translation {
                x: source.read_double()?,
                y: source.read_double()?,
            },
            TransformationId::Rotation => Transform::Rotation {
                angle: source.read_double()?,
                center: Point::deserialize(source)?,
            },
            TransformationId::Scaling => Transform::Scaling {
                scale_x: source.read_double()?,
                scale_y: source.read_double()?,
                center: Point::deserialize(source)?,
            },
            TransformationId::Shear => Transform::Shear {
                angle_x: source.read_double()?,
                angle_y: source.read_double()?,
                center: Point::deserialize(source)?,
            },
            TransformationId::Matrix => Transform::Matrix {
                m11: source.read_double()?,
                m12: source.read_double()?,
                m21: source.read_double()?,
                m22: source.read_double()?,
                offset_x: source.read_double()?,
                offset_y: source.read_double()?,
            },
            TransformationId::Group => {
                Transform::Group(source.nested(|source| deserialize_list(source))?)
            }
        };

        Ok(transform)
    }
}
