use thiserror::Error;

use crate::TypeIdentity;

/// Typed access to a slot did not match the type the slot holds.
///
/// Carries both identities so the caller can see exactly what the slot held
/// and what was asked for. An empty slot reports the identity of `()` as its
/// stored type, which never matches any request because empty slots are
/// screened out by the occupancy check before identities are compared.
///
/// # Example
///
/// ```
/// use std::any::TypeId;
///
/// use opaque_slot::Slot;
///
/// let slot = Slot::<16>::of(7_i32);
///
/// let error = slot.get::<f32>().unwrap_err();
/// assert_eq!(error.stored().id(), TypeId::of::<i32>());
/// assert_eq!(error.requested().id(), TypeId::of::<f32>());
/// ```
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("slot type mismatch: stored type is {stored}, requested type is {requested}")]
pub struct TypeMismatchError {
    stored: TypeIdentity,
    requested: TypeIdentity,
}

impl TypeMismatchError {
    pub(crate) fn new(stored: TypeIdentity, requested: TypeIdentity) -> Self {
        Self { stored, requested }
    }

    /// The identity the slot reported at the time of the failed access.
    #[must_use]
    pub fn stored(&self) -> TypeIdentity {
        self.stored
    }

    /// The identity of the type the caller requested.
    #[must_use]
    pub fn requested(&self) -> TypeIdentity {
        self.requested
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;
    use crate::identity_of;

    assert_impl_all!(TypeMismatchError: Send, Sync, Debug);

    #[test]
    fn message_names_both_types() {
        let error = TypeMismatchError::new(identity_of::<i32>(), identity_of::<f32>());

        let message = error.to_string();
        assert!(message.contains("i32"));
        assert!(message.contains("f32"));
    }

    #[test]
    fn accessors_expose_the_identities() {
        let error = TypeMismatchError::new(identity_of::<String>(), identity_of::<u8>());

        assert_eq!(error.stored(), identity_of::<String>());
        assert_eq!(error.requested(), identity_of::<u8>());
    }
}
