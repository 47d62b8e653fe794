use crate::error::{GeometryError, Result};

/// Opaque handle naming the coordinate frame a primitive is expressed in.
///
/// The kernel never converts between frames. Operations on two primitives
/// either assume a shared frame or check it explicitly with
/// [`FrameId::ensure_same`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FrameId(u32);

impl FrameId {
    /// The frame used when none is given.
    pub const DEFAULT: Self = Self(0);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Fails when the two frames differ.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::FrameMismatch` if `self != other`.
    pub fn ensure_same(self, other: FrameId) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(GeometryError::FrameMismatch {
                left: self,
                right: other,
            }
            .into())
        }
    }
}
