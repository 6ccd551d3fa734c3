use std::fmt;
use std::marker::PhantomData;

use crate::{BUFFER_ALIGNMENT, RawBuffer};

/// A fixed-capacity inline container for `Copy` values, with no type
/// tracking.
///
/// This is the raw-byte sibling of [`Slot`](crate::Slot) for payloads that
/// are trivially copyable: storing a value is a plain byte copy, the
/// container itself is `Copy`, and nothing needs to be dropped. In exchange,
/// the container keeps no record of what was stored, so typed reads are
/// `unsafe` and the caller must already know the type.
///
/// Prefer [`Slot`](crate::Slot) unless the bookkeeping-free representation
/// is the point.
///
/// # Example
///
/// ```
/// use opaque_slot::TrivialSlot;
///
/// let slot = TrivialSlot::<8>::of(7_i32);
/// let copy = slot;
///
/// // SAFETY: The slot was populated with an i32 above.
/// let value = unsafe { copy.get::<i32>() };
/// assert_eq!(value, &7);
/// ```
#[derive(Clone, Copy)]
pub struct TrivialSlot<const CAPACITY: usize> {
    /// Raw payload bytes; uninitialized until the first `set`.
    buffer: RawBuffer<CAPACITY>,

    /// A `Copy` payload may still be thread-bound (a raw pointer, say), and
    /// nothing records what was stored, so the slot opts out of both auto
    /// traits.
    _not_send_sync: PhantomData<*const ()>,
}

impl<const CAPACITY: usize> TrivialSlot<CAPACITY> {
    /// Compile-time gate: a value of type `T` must fit the buffer, both in
    /// size and in alignment requirement.
    const fn assert_fits<T>() {
        assert!(
            size_of::<T>() <= CAPACITY,
            "value type does not fit within the slot capacity"
        );
        assert!(
            align_of::<T>() <= BUFFER_ALIGNMENT,
            "value type requires stricter alignment than slot storage provides"
        );
    }

    /// Creates a slot with uninitialized contents.
    ///
    /// Nothing may be read from the slot until a value has been stored.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: RawBuffer::uninit(),
            _not_send_sync: PhantomData,
        }
    }

    /// Creates a slot holding the bytes of `value`.
    #[must_use]
    pub fn of<T>(value: T) -> Self
    where
        T: Copy,
    {
        let mut slot = Self::new();
        slot.set(value);
        slot
    }

    /// Stores the bytes of `value`, overwriting whatever was stored before.
    ///
    /// No destructor runs for previous contents; `Copy` types have none.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::TrivialSlot;
    ///
    /// let mut slot = TrivialSlot::<8>::new();
    /// slot.set(1234_u64);
    ///
    /// // SAFETY: The slot was populated with a u64 above.
    /// assert_eq!(unsafe { slot.get::<u64>() }, &1234);
    /// ```
    pub fn set<T>(&mut self, value: T)
    where
        T: Copy,
    {
        const { Self::assert_fits::<T>() };

        // SAFETY: The compile-time check guarantees the value fits and the
        // buffer's alignment suffices; T: Copy means the byte image is the
        // complete value.
        unsafe {
            self.buffer.as_mut_ptr().cast::<T>().write(value);
        }
    }

    /// A shared reference to the stored bytes reinterpreted as `T`.
    ///
    /// # Safety
    ///
    /// The slot must currently hold a value stored via [`set()`](Self::set)
    /// or [`of()`](Self::of) with this exact type `T`. The slot keeps no
    /// record of what was stored; reading uninitialized contents or reading
    /// as a different type than was stored is undefined behavior.
    #[must_use]
    pub unsafe fn get<T>(&self) -> &T
    where
        T: Copy,
    {
        const { Self::assert_fits::<T>() };

        // SAFETY: The caller guarantees a T was stored, which implies the
        // bytes are initialized and the buffer alignment suffices.
        unsafe { &*self.buffer.as_ptr().cast::<T>() }
    }

    /// An exclusive reference to the stored bytes reinterpreted as `T`.
    ///
    /// # Safety
    ///
    /// Same contract as [`get()`](Self::get).
    #[must_use]
    pub unsafe fn get_mut<T>(&mut self) -> &mut T
    where
        T: Copy,
    {
        const { Self::assert_fits::<T>() };

        // SAFETY: The caller guarantees a T was stored; the exclusive
        // receiver guarantees sole access.
        unsafe { &mut *self.buffer.as_mut_ptr().cast::<T>() }
    }

    /// The number of payload bytes the slot can hold.
    #[must_use]
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

impl<const CAPACITY: usize> Default for TrivialSlot<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAPACITY: usize> fmt::Debug for TrivialSlot<CAPACITY> {
    #[cfg_attr(test, mutants::skip)] // The rendering is cosmetic; there is no behavioral contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrivialSlot")
            .field("capacity", &CAPACITY)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use static_assertions::assert_not_impl_any;

    use super::*;

    assert_not_impl_any!(TrivialSlot<16>: Send, Sync);

    #[test]
    fn stores_and_reads_back() {
        let slot = TrivialSlot::<4>::of(7_i32);

        assert_eq!(unsafe { slot.get::<i32>() }, &7);
    }

    #[test]
    fn copying_the_slot_copies_the_bytes() {
        let slot = TrivialSlot::<4>::of(7_i32);
        let copy = slot;

        assert_eq!(unsafe { copy.get::<i32>() }, &7);
        assert_eq!(unsafe { slot.get::<i32>() }, &7);
    }

    #[test]
    fn set_overwrites_previous_contents() {
        let mut slot = TrivialSlot::<8>::of(1_u64);

        slot.set(2_u64);

        assert_eq!(unsafe { slot.get::<u64>() }, &2);
    }

    #[test]
    fn mutation_through_get_mut_is_visible() {
        let mut slot = TrivialSlot::<8>::of(5_u32);

        unsafe {
            *slot.get_mut::<u32>() += 1;
        }

        assert_eq!(unsafe { slot.get::<u32>() }, &6);
    }

    #[test]
    fn capacity_reports_the_parameter() {
        let slot = TrivialSlot::<24>::new();

        assert_eq!(slot.capacity(), 24);
    }
}
