use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};

/// Property types the body simulation patcher understands. The variant names
/// are the literal type tags stored in the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PropertyKind {
    #[default]
    DoubleProperty,
    FloatProperty,
    BoolProperty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyType {
    pub kind: PropertyKind,
    pub tag: &'static [u8],
    pub width: usize,
}

pub const DOUBLE: PropertyType = PropertyType {
    kind: PropertyKind::DoubleProperty,
    tag: b"DoubleProperty",
    width: 8,
};

pub const FLOAT: PropertyType = PropertyType {
    kind: PropertyKind::FloatProperty,
    tag: b"FloatProperty",
    width: 4,
};

pub const BOOL: PropertyType = PropertyType {
    kind: PropertyKind::BoolProperty,
    tag: b"BoolProperty",
    width: 1,
};

impl PropertyKind {
    pub fn descriptor(self) -> &'static PropertyType {
        match self {
            Self::DoubleProperty => &DOUBLE,
            Self::FloatProperty => &FLOAT,
            Self::BoolProperty => &BOOL,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DoubleProperty => "DoubleProperty",
            Self::FloatProperty => "FloatProperty",
            Self::BoolProperty => "BoolProperty",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Double(f64),
    Float(f32),
    Bool(bool),
}

impl PropertyValue {
    /// Narrows `value` to the representation of `kind`. Booleans follow the
    /// usual truthiness rule: anything non-zero is `true`. A finite value too
    /// large for a 32-bit float is rejected instead of becoming infinity.
    pub fn encode(kind: PropertyKind, value: f64) -> Result<Self, CoreError> {
        match kind {
            PropertyKind::DoubleProperty => Ok(Self::Double(value)),
            PropertyKind::FloatProperty => {
                let narrowed = value as f32;
                if value.is_finite() && narrowed.is_infinite() {
                    return Err(CoreError::new(
                        CoreErrorCode::InvalidInput,
                        format!("{value} is out of range for {kind}"),
                    ));
                }
                Ok(Self::Float(narrowed))
            }
            PropertyKind::BoolProperty => Ok(Self::Bool(value != 0.0)),
        }
    }

    pub fn decode(kind: PropertyKind, bytes: &[u8]) -> Result<Self, CoreError> {
        let width = kind.descriptor().width;
        if bytes.len() != width {
            return Err(CoreError::new(
                CoreErrorCode::Truncated,
                format!("{kind} value needs {width} bytes, got {}", bytes.len()),
            ));
        }

        Ok(match kind {
            PropertyKind::DoubleProperty => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(bytes);
                Self::Double(f64::from_le_bytes(buf))
            }
            PropertyKind::FloatProperty => {
                let mut buf = [0u8; 4];
                buf.copy_from_slice(bytes);
                Self::Float(f32::from_le_bytes(buf))
            }
            PropertyKind::BoolProperty => Self::Bool(bytes[0] != 0),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            Self::Double(v) => v.to_le_bytes().to_vec(),
            Self::Float(v) => v.to_le_bytes().to_vec(),
            Self::Bool(v) => vec![u8::from(v)],
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Double(v) => write!(f, "{v:?}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}
