use crate::shape::ShapeType;
use thiserror::Error;

pub type Result<T, E = CollisionError> = std::result::Result<T, E>;

/// Misuse of the world or of a shape.
///
/// Every variant is a programming error reported at the point of misuse,
/// nothing in this crate retries or recovers from them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// Something was registered twice (a tag name, for instance)
    #[error("duplicate registration: {0}")]
    DuplicateRegistration(String),

    /// A handle or child index that does not belong to the container asked
    #[error("not a member: {0}")]
    NotAMember(String),

    #[error("unsupported shapes collision test: '{a}' <-> '{b}'")]
    UnsupportedShapePair { a: ShapeType, b: ShapeType },

    /// The operation exists on some shape variants but not on this one
    #[error("'{operation}' is not implemented for {shape}")]
    NotImplemented {
        operation: &'static str,
        shape: ShapeType,
    },

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Every bit of the tag mask is already assigned to a name
    #[error("cannot define tag '{name}': all {limit} tag bits are in use")]
    TagLimitReached { name: String, limit: u32 },
}
