//! Rotational flag probing.

use crate::Rotational;

/// Probing operations trait.
pub trait RotationalOps {
    /// Read the kernel's rotational flag for a whole disk (best-effort).
    ///
    /// Never fails: anything that cannot be read is [`Rotational::Unknown`].
    fn rotational(&self, device: &str) -> Rotational;
}
