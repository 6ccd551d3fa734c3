use crate::{Slot, TypeIdentity, TypeMismatchError};

/// Typed shared access to a slot's value; `None` on empty or mismatch.
///
/// This is the non-failing counterpart of [`any_cast`]: instead of reporting
/// which types were involved, a mismatch simply yields `None` with no side
/// effects.
///
/// # Example
///
/// ```
/// use opaque_slot::{Slot, try_any_cast};
///
/// let slot = Slot::<16>::of(7_i32);
///
/// assert_eq!(try_any_cast::<i32, 16>(&slot), Some(&7));
/// assert_eq!(try_any_cast::<f32, 16>(&slot), None);
/// ```
#[must_use]
pub fn try_any_cast<T, const CAPACITY: usize>(slot: &Slot<CAPACITY>) -> Option<&T>
where
    T: Clone + 'static,
{
    if slot.contains::<T>() {
        // SAFETY: `contains` confirmed the bound dispatcher was derived for
        // T, so the buffer holds a live, properly aligned T; the shared
        // receiver keeps the reference valid for its lifetime.
        Some(unsafe { &*slot.value_ptr().cast::<T>() })
    } else {
        None
    }
}

/// Typed exclusive access to a slot's value; `None` on empty or mismatch.
#[must_use]
pub fn try_any_cast_mut<T, const CAPACITY: usize>(slot: &mut Slot<CAPACITY>) -> Option<&mut T>
where
    T: Clone + 'static,
{
    if slot.contains::<T>() {
        // SAFETY: `contains` confirmed the bound dispatcher was derived for
        // T; the exclusive receiver guarantees sole access.
        Some(unsafe { &mut *slot.value_ptr_mut().cast::<T>() })
    } else {
        None
    }
}

/// Typed shared access to a slot's value, failing with a
/// [`TypeMismatchError`] that names both the stored and the requested type.
///
/// # Example
///
/// ```
/// use opaque_slot::{Slot, any_cast};
///
/// let slot = Slot::<16>::of(7_i32);
///
/// assert_eq!(any_cast::<i32, 16>(&slot).unwrap(), &7);
///
/// let error = any_cast::<f32, 16>(&slot).unwrap_err();
/// assert_eq!(error.stored().name(), "i32");
/// assert_eq!(error.requested().name(), "f32");
/// ```
pub fn any_cast<T, const CAPACITY: usize>(
    slot: &Slot<CAPACITY>,
) -> Result<&T, TypeMismatchError>
where
    T: Clone + 'static,
{
    if slot.contains::<T>() {
        // SAFETY: `contains` confirmed the bound dispatcher was derived for
        // T, so the buffer holds a live, properly aligned T.
        Ok(unsafe { &*slot.value_ptr().cast::<T>() })
    } else {
        Err(TypeMismatchError::new(
            slot.type_identity(),
            TypeIdentity::of::<T>(),
        ))
    }
}

/// Typed exclusive access to a slot's value, failing with a
/// [`TypeMismatchError`] that names both the stored and the requested type.
pub fn any_cast_mut<T, const CAPACITY: usize>(
    slot: &mut Slot<CAPACITY>,
) -> Result<&mut T, TypeMismatchError>
where
    T: Clone + 'static,
{
    if slot.contains::<T>() {
        // SAFETY: `contains` confirmed the bound dispatcher was derived for
        // T; the exclusive receiver guarantees sole access.
        Ok(unsafe { &mut *slot.value_ptr_mut().cast::<T>() })
    } else {
        Err(TypeMismatchError::new(
            slot.type_identity(),
            TypeIdentity::of::<T>(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::any::TypeId;

    use super::*;

    #[test]
    fn pointer_form_returns_value_on_match() {
        let slot = Slot::<16>::of(7_i32);

        assert_eq!(try_any_cast::<i32, 16>(&slot), Some(&7));
    }

    #[test]
    fn pointer_form_returns_none_on_mismatch() {
        let slot = Slot::<16>::of(7_i32);

        assert_eq!(try_any_cast::<f32, 16>(&slot), None);
        assert!(!slot.is_empty());
    }

    #[test]
    fn pointer_form_returns_none_on_empty() {
        let slot = Slot::<16>::new();

        assert_eq!(try_any_cast::<i32, 16>(&slot), None);
    }

    #[test]
    fn mutable_pointer_form_allows_mutation() {
        let mut slot = Slot::<16>::of(7_i32);

        *try_any_cast_mut::<i32, 16>(&mut slot).unwrap() = 8;

        assert_eq!(slot.get::<i32>().unwrap(), &8);
    }

    #[test]
    fn reference_form_reports_both_identities() {
        let slot = Slot::<16>::of(7_i32);

        let error = any_cast::<f32, 16>(&slot).unwrap_err();
        assert_eq!(error.stored().id(), TypeId::of::<i32>());
        assert_eq!(error.requested().id(), TypeId::of::<f32>());
    }

    #[test]
    fn reference_form_on_empty_slot_reports_unit_as_stored() {
        let slot = Slot::<16>::new();

        let error = any_cast::<i32, 16>(&slot).unwrap_err();
        assert_eq!(error.stored().id(), TypeId::of::<()>());
        assert_eq!(error.requested().id(), TypeId::of::<i32>());
    }

    #[test]
    fn mutable_reference_form_allows_mutation() {
        let mut slot = Slot::<16>::of(7_i32);

        *any_cast_mut::<i32, 16>(&mut slot).unwrap() = 9;

        assert_eq!(slot.get::<i32>().unwrap(), &9);
    }

    #[test]
    fn mutable_reference_form_fails_like_the_shared_form() {
        let mut slot = Slot::<16>::of(7_i32);

        let error = any_cast_mut::<String, 16>(&mut slot).unwrap_err();
        assert_eq!(error.requested().id(), TypeId::of::<String>());
    }
}
