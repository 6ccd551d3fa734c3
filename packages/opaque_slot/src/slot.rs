use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ptr;

use scopeguard::ScopeGuard;

use crate::{
    BUFFER_ALIGNMENT, OpFn, RawBuffer, SlotOp, TypeIdentity, TypeMismatchError, op_fn_for,
    query_identity, query_size,
};

/// A fixed-capacity inline container for a single value of any type that fits.
///
/// The slot reserves `CAPACITY` bytes of storage inside itself and can hold
/// one value of any `Clone + 'static` type whose size fits that capacity,
/// without allocating. The stored type is recovered at runtime through a
/// per-type dispatcher function bound when the value is stored; there is no
/// boxing, no v-table and no registry.
///
/// # Key features
///
/// - **No heap allocation**: the value lives inside the slot itself.
/// - **Compile-time capacity checking**: storing a type that does not fit, or
///   copying from a larger-capacity slot, is a compile error rather than a
///   runtime failure.
/// - **Runtime type recovery**: [`get()`](Self::get) and the
///   [`any_cast`](crate::any_cast) family validate the requested type before
///   handing out references.
/// - **Correct value semantics**: cloning a slot clones the stored value,
///   dropping or resetting a slot runs the stored value's destructor.
/// - **Failure rollback**: a fallible constructor that fails leaves the slot
///   holding exactly the value it held before the attempt.
///
/// # Examples
///
/// Basic storage and typed recovery:
///
/// ```
/// use opaque_slot::Slot;
///
/// let mut slot = Slot::<32>::of(1234_i32);
///
/// assert!(!slot.is_empty());
/// assert!(slot.contains::<i32>());
/// assert_eq!(slot.get::<i32>().unwrap(), &1234);
///
/// // Assigning a different type replaces both value and reported type.
/// slot.assign("text".to_string());
/// assert!(slot.contains::<String>());
/// assert!(!slot.contains::<i32>());
/// ```
///
/// A value that does not fit is rejected at compile time:
///
/// ```compile_fail
/// use opaque_slot::Slot;
///
/// // 16 bytes of payload cannot hold a 24-byte array.
/// let slot = Slot::<16>::of([0_u8; 24]);
/// ```
///
/// # Thread safety
///
/// The slot is neither [`Send`] nor [`Sync`]. Type erasure hides whether the
/// stored value is thread-safe or thread-mobile (an `Rc` is storable, for
/// example), so the conservative bound is the only sound one. The slot itself
/// performs no synchronization.
pub struct Slot<const CAPACITY: usize> {
    /// Inline storage for the erased value. Holds a live value of the bound
    /// dispatcher's type iff `op_fn` is `Some`.
    buffer: RawBuffer<CAPACITY>,

    /// Dispatcher for the stored type; `Some` iff the buffer holds a live
    /// value. This reference is the slot's only runtime type knowledge.
    op_fn: Option<OpFn>,

    /// Stored contents may be neither thread-safe nor thread-mobile, and
    /// erasure hides which, so the slot opts out of both auto traits.
    _not_send_sync: PhantomData<*const ()>,
}

impl<const CAPACITY: usize> Slot<CAPACITY> {
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

    /// Compile-time gate: contents may only move between slots when the
    /// destination capacity is at least the source capacity.
    const fn assert_widening<const M: usize>() {
        assert!(
            M <= CAPACITY,
            "cannot construct or assign from a slot with larger capacity"
        );
    }

    /// Creates an empty slot.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let slot = Slot::<16>::new();
    ///
    /// assert!(slot.is_empty());
    /// assert_eq!(slot.size(), 0);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: RawBuffer::uninit(),
            op_fn: None,
            _not_send_sync: PhantomData,
        }
    }

    /// Creates a slot holding `value`.
    ///
    /// The value is moved into the slot's buffer; nothing is cloned.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let slot = Slot::<32>::of("payload".to_string());
    ///
    /// assert_eq!(slot.get::<String>().unwrap(), "payload");
    /// ```
    #[must_use]
    pub fn of<T>(value: T) -> Self
    where
        T: Clone + 'static,
    {
        const { Self::assert_fits::<T>() };

        let mut slot = Self::new();
        slot.write_value(value);
        slot
    }

    /// Creates a slot from a fallible constructor.
    ///
    /// If the constructor fails, its error is returned unmodified and no slot
    /// exists at all; there is no partially constructed state to observe.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let slot = Slot::<16>::try_of_with(|| "31337".parse::<i32>()).unwrap();
    /// assert_eq!(slot.get::<i32>().unwrap(), &31337);
    ///
    /// let failed = Slot::<16>::try_of_with(|| "not a number".parse::<i32>());
    /// assert!(failed.is_err());
    /// ```
    pub fn try_of_with<T, E>(f: impl FnOnce() -> Result<T, E>) -> Result<Self, E>
    where
        T: Clone + 'static,
    {
        const { Self::assert_fits::<T>() };

        let mut slot = Self::new();
        slot.write_value(f()?);
        Ok(slot)
    }

    /// Creates a slot holding a clone of another slot's value.
    ///
    /// The source may have a smaller capacity; copying from a larger-capacity
    /// slot is a compile-time error. An empty source yields an empty slot.
    ///
    /// The clone runs through the source's own dispatcher, and that same
    /// dispatcher reference is bound into the new slot, so no type knowledge
    /// is re-derived.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let small = Slot::<16>::of(7_i32);
    /// let big = Slot::<32>::clone_from_slot(&small);
    ///
    /// assert_eq!(small.get::<i32>().unwrap(), &7);
    /// assert_eq!(big.get::<i32>().unwrap(), &7);
    /// ```
    ///
    /// Narrowing does not compile:
    ///
    /// ```compile_fail
    /// use opaque_slot::Slot;
    ///
    /// let big = Slot::<32>::of(7_i32);
    /// let small = Slot::<16>::clone_from_slot(&big);
    /// ```
    #[must_use]
    pub fn clone_from_slot<const M: usize>(source: &Slot<M>) -> Self {
        const { Self::assert_widening::<M>() };

        let mut slot = Self::new();

        if let Some(op_fn) = source.op_fn {
            // SAFETY: The occupancy invariant says `source` holds a live value
            // of the dispatcher's type. Our buffer is vacant, shares the same
            // alignment guarantee and fits the value (M <= CAPACITY, checked
            // at compile time).
            unsafe {
                op_fn(SlotOp::Clone, slot.buffer.as_mut_ptr(), source.buffer.as_ptr());
            }

            slot.op_fn = Some(op_fn);
        }

        slot
    }

    /// Creates a slot by moving another slot's value out, leaving the source
    /// empty.
    ///
    /// Relocation is bitwise and infallible; nothing is cloned and no
    /// destructor runs. An empty source yields an empty slot.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let mut source = Slot::<16>::of(7_i32);
    /// let taken = Slot::<32>::take_from_slot(&mut source);
    ///
    /// assert!(source.is_empty());
    /// assert_eq!(taken.get::<i32>().unwrap(), &7);
    /// ```
    #[must_use]
    pub fn take_from_slot<const M: usize>(source: &mut Slot<M>) -> Self {
        const { Self::assert_widening::<M>() };

        let mut slot = Self::new();

        if let Some(op_fn) = source.op_fn.take() {
            // SAFETY: `source` held a live value owned by this dispatcher.
            // Taking the dispatcher reference above withdrew the source's
            // claim on the value, so ownership transfers cleanly; our vacant
            // buffer fits it (compile-time check) at the same alignment.
            unsafe {
                op_fn(
                    SlotOp::Relocate,
                    slot.buffer.as_mut_ptr(),
                    source.buffer.as_ptr(),
                );
            }

            slot.op_fn = Some(op_fn);
        }

        slot
    }

    /// Stores `value`, replacing any current occupant.
    ///
    /// The previous occupant's destructor runs first. The incoming value is
    /// already constructed and merely relocates into the buffer, which cannot
    /// fail, so no rollback snapshot is needed on this path.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let mut slot = Slot::<32>::of(7_i32);
    ///
    /// slot.assign(2.5_f64);
    ///
    /// assert!(!slot.contains::<i32>());
    /// assert_eq!(slot.get::<f64>().unwrap(), &2.5);
    /// ```
    pub fn assign<T>(&mut self, value: T)
    where
        T: Clone + 'static,
    {
        const { Self::assert_fits::<T>() };

        self.destroy();
        self.write_value(value);
    }

    /// Constructs a `T` from its [`Default`] impl directly in the slot.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let mut slot = Slot::<32>::new();
    /// slot.emplace::<u64>();
    ///
    /// assert_eq!(slot.get::<u64>().unwrap(), &0);
    /// ```
    pub fn emplace<T>(&mut self)
    where
        T: Clone + Default + 'static,
    {
        self.emplace_with(T::default);
    }

    /// Constructs a value in the slot from an infallible constructor,
    /// replacing any current occupant.
    ///
    /// If the constructor panics, the previous occupant is restored and the
    /// panic propagates.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let mut slot = Slot::<32>::new();
    /// slot.emplace_with(|| vec![1_u8, 2, 3].len());
    ///
    /// assert_eq!(slot.get::<usize>().unwrap(), &3);
    /// ```
    pub fn emplace_with<T>(&mut self, f: impl FnOnce() -> T)
    where
        T: Clone + 'static,
    {
        self.try_emplace_with(|| Ok::<_, Infallible>(f()))
            .unwrap_or_else(|error| match error {});
    }

    /// Constructs a value in the slot from a fallible constructor, replacing
    /// the current occupant only if construction succeeds.
    ///
    /// The previous occupant is moved aside before the constructor runs and
    /// is destroyed only once the replacement exists. If the constructor
    /// returns an error or panics, the occupant moves back and the slot ends
    /// in exactly its pre-call state; the error propagates unmodified.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let mut slot = Slot::<32>::of(1234_i32);
    ///
    /// // A failing constructor leaves the previous value untouched.
    /// let result = slot.try_emplace_with(|| "oops".parse::<f64>());
    /// assert!(result.is_err());
    /// assert_eq!(slot.get::<i32>().unwrap(), &1234);
    ///
    /// // A succeeding one replaces it.
    /// slot.try_emplace_with(|| "2.5".parse::<f64>()).unwrap();
    /// assert_eq!(slot.get::<f64>().unwrap(), &2.5);
    /// ```
    pub fn try_emplace_with<T, E>(&mut self, f: impl FnOnce() -> Result<T, E>) -> Result<(), E>
    where
        T: Clone + 'static,
    {
        const { Self::assert_fits::<T>() };

        let saved = Self::take_from_slot(self);

        // If the constructor fails or panics, the prior occupant moves back
        // so the slot ends in exactly its pre-call state.
        let guard = scopeguard::guard((self, saved), |(slot, saved)| {
            slot.adopt(saved);
        });

        let value = f()?;

        let (slot, saved) = ScopeGuard::into_inner(guard);

        // The prior occupant dies only once its replacement exists.
        drop(saved);
        slot.write_value(value);

        Ok(())
    }

    /// Replaces this slot's contents with a clone of another slot's value.
    ///
    /// An empty source empties this slot. The clone is produced into a
    /// detached slot first, so a panicking `Clone` impl leaves this slot
    /// exactly as it was; the previous occupant is destroyed only when the
    /// replacement takes its place.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let source = Slot::<16>::of(7_i32);
    /// let mut target = Slot::<32>::of("old".to_string());
    ///
    /// target.clone_assign_from(&source);
    ///
    /// assert_eq!(target.get::<i32>().unwrap(), &7);
    /// assert_eq!(source.get::<i32>().unwrap(), &7);
    /// ```
    pub fn clone_assign_from<const M: usize>(&mut self, source: &Slot<M>) {
        *self = Self::clone_from_slot(source);
    }

    /// Replaces this slot's contents by moving another slot's value out,
    /// leaving the source empty.
    ///
    /// An empty source empties this slot.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let mut source = Slot::<16>::of(7_i32);
    /// let mut target = Slot::<32>::of("old".to_string());
    ///
    /// target.take_assign_from(&mut source);
    ///
    /// assert!(source.is_empty());
    /// assert_eq!(target.get::<i32>().unwrap(), &7);
    /// ```
    pub fn take_assign_from<const M: usize>(&mut self, source: &mut Slot<M>) {
        *self = Self::take_from_slot(source);
    }

    /// Destroys the current occupant, if any, leaving the slot empty.
    ///
    /// Idempotent: resetting an empty slot does nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let mut slot = Slot::<16>::of(7_i32);
    ///
    /// slot.reset();
    ///
    /// assert!(slot.is_empty());
    /// assert_eq!(slot.size(), 0);
    /// ```
    pub fn reset(&mut self) {
        self.destroy();
    }

    /// Whether the slot currently holds no value.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.op_fn.is_none()
    }

    /// The size in bytes of the stored value's type, or 0 when empty.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let mut slot = Slot::<32>::new();
    /// assert_eq!(slot.size(), 0);
    ///
    /// slot.assign(7_i32);
    /// assert_eq!(slot.size(), size_of::<i32>());
    ///
    /// slot.assign("text".to_string());
    /// assert_eq!(slot.size(), size_of::<String>());
    /// ```
    #[must_use]
    pub fn size(&self) -> usize {
        self.op_fn.map_or(0, query_size)
    }

    /// The number of payload bytes the slot can hold. Invariant over the
    /// slot's entire lifetime, regardless of contents.
    #[must_use]
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// The runtime identity of the stored value's type.
    ///
    /// An empty slot reports the identity of `()`, which never matches any
    /// request because [`contains()`](Self::contains) screens out empty slots
    /// before identities are compared.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::TypeId;
    ///
    /// use opaque_slot::Slot;
    ///
    /// let mut slot = Slot::<32>::of(7_i32);
    /// assert_eq!(slot.type_identity().id(), TypeId::of::<i32>());
    ///
    /// slot.assign("text".to_string());
    /// assert_eq!(slot.type_identity().id(), TypeId::of::<String>());
    /// ```
    #[must_use]
    pub fn type_identity(&self) -> TypeIdentity {
        self.op_fn.map_or_else(TypeIdentity::of::<()>, query_identity)
    }

    /// The diagnostic name of the stored value's type; `"()"` when empty.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_identity().name()
    }

    /// Whether the slot currently holds a value of type `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let slot = Slot::<16>::of(77_i32);
    ///
    /// assert!(slot.contains::<i32>());
    /// assert!(!slot.contains::<f64>());
    /// ```
    #[must_use]
    pub fn contains<T>(&self) -> bool
    where
        T: Clone + 'static,
    {
        let Some(op_fn) = self.op_fn else {
            return false;
        };

        // Fast path: within one compilation artifact the dispatcher for T is
        // a single instantiation, so pointer equality settles the question.
        if ptr::fn_addr_eq(op_fn, op_fn_for::<T>()) {
            return true;
        }

        // Slow path: a separately compiled or dynamically loaded artifact may
        // carry its own instantiation of the dispatcher for the same type at
        // a different address, so compare the identities by value.
        query_identity(op_fn) == TypeIdentity::of::<T>()
    }

    /// A shared reference to the stored value as `T`.
    ///
    /// Fails with a [`TypeMismatchError`] naming both types if the slot is
    /// empty or holds a different type.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let slot = Slot::<16>::of(7_i32);
    ///
    /// assert_eq!(slot.get::<i32>().unwrap(), &7);
    /// assert!(slot.get::<f32>().is_err());
    /// ```
    pub fn get<T>(&self) -> Result<&T, TypeMismatchError>
    where
        T: Clone + 'static,
    {
        crate::any_cast(self)
    }

    /// An exclusive reference to the stored value as `T`.
    ///
    /// Fails with a [`TypeMismatchError`] naming both types if the slot is
    /// empty or holds a different type.
    ///
    /// # Example
    ///
    /// ```
    /// use opaque_slot::Slot;
    ///
    /// let mut slot = Slot::<16>::of(7_i32);
    ///
    /// *slot.get_mut::<i32>().unwrap() = 6;
    ///
    /// assert_eq!(slot.get::<i32>().unwrap(), &6);
    /// ```
    pub fn get_mut<T>(&mut self) -> Result<&mut T, TypeMismatchError>
    where
        T: Clone + 'static,
    {
        crate::any_cast_mut(self)
    }

    /// Pointer to the stored value's first byte.
    pub(crate) fn value_ptr(&self) -> *const u8 {
        self.buffer.as_ptr()
    }

    /// Mutable pointer to the stored value's first byte.
    pub(crate) fn value_ptr_mut(&mut self) -> *mut u8 {
        self.buffer.as_mut_ptr()
    }

    /// Moves `value` into the vacant buffer and binds its dispatcher.
    ///
    /// Callers must have passed the compile-time fit checks for `T` and the
    /// slot must be empty.
    fn write_value<T>(&mut self, value: T)
    where
        T: Clone + 'static,
    {
        debug_assert!(self.op_fn.is_none());

        // SAFETY: Every public entry point verified at compile time that T
        // fits the buffer and that the buffer's alignment suffices; the slot
        // is empty, so no live value is overwritten.
        unsafe {
            self.buffer.as_mut_ptr().cast::<T>().write(value);
        }

        self.op_fn = Some(op_fn_for::<T>());
    }

    /// Runs the occupant's destructor and clears the dispatcher reference.
    fn destroy(&mut self) {
        if let Some(op_fn) = self.op_fn.take() {
            // SAFETY: The occupancy invariant says a bound dispatcher implies
            // a live value of its type in the buffer; taking the reference
            // above ensures the value is dropped exactly once.
            unsafe {
                op_fn(SlotOp::Drop, self.buffer.as_mut_ptr(), ptr::null());
            }
        }
    }

    /// Takes over the occupant of a same-capacity slot by bitwise adoption.
    ///
    /// The receiving slot must be empty. The source is consumed without its
    /// destructor running, so ownership of the occupant transfers.
    fn adopt(&mut self, source: Self) {
        debug_assert!(self.op_fn.is_none());

        let mut source = ManuallyDrop::new(source);
        self.buffer = source.buffer;
        self.op_fn = source.op_fn.take();
    }
}

impl<const CAPACITY: usize> Default for Slot<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAPACITY: usize> Clone for Slot<CAPACITY> {
    fn clone(&self) -> Self {
        Self::clone_from_slot(self)
    }
}

impl<const CAPACITY: usize> Drop for Slot<CAPACITY> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<const CAPACITY: usize> fmt::Debug for Slot<CAPACITY> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stored_type = self.op_fn.map(|op_fn| query_identity(op_fn).name());

        f.debug_struct("Slot")
            .field("capacity", &CAPACITY)
            .field("stored_type", &stored_type)
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::items_after_statements,
    clippy::float_cmp,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use std::any::TypeId;
    use std::cell::Cell;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::rc::Rc;

    use static_assertions::assert_not_impl_any;

    use super::*;

    assert_not_impl_any!(Slot<16>: Send, Sync);

    /// Test helper that counts clones and drops of every instance sharing
    /// its counters.
    struct Probe {
        clones: Rc<Cell<usize>>,
        drops: Rc<Cell<usize>>,
    }

    impl Probe {
        fn new() -> (Self, Rc<Cell<usize>>, Rc<Cell<usize>>) {
            let clones = Rc::new(Cell::new(0));
            let drops = Rc::new(Cell::new(0));
            (
                Self {
                    clones: Rc::clone(&clones),
                    drops: Rc::clone(&drops),
                },
                clones,
                drops,
            )
        }
    }

    impl Clone for Probe {
        fn clone(&self) -> Self {
            self.clones.set(self.clones.get() + 1);
            Self {
                clones: Rc::clone(&self.clones),
                drops: Rc::clone(&self.drops),
            }
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    /// Test helper whose `Clone` impl always panics.
    struct PanicOnClone;

    impl Clone for PanicOnClone {
        fn clone(&self) -> Self {
            panic!("cloning is forbidden for this type");
        }
    }

    #[test]
    fn default_constructed_is_empty() {
        let slot = Slot::<16>::new();

        assert!(slot.is_empty());
        assert_eq!(slot.size(), 0);
        assert_eq!(slot.type_identity().id(), TypeId::of::<()>());
    }

    #[test]
    fn constructed_with_value_is_not_empty() {
        let slot = Slot::<16>::of(77_i32);

        assert!(!slot.is_empty());
    }

    #[test]
    fn contains_matches_only_the_stored_type() {
        let slot = Slot::<16>::of(77_i32);

        assert!(slot.contains::<i32>());
        assert!(!slot.contains::<f64>());
        assert!(!slot.contains::<u32>());
    }

    #[test]
    fn capacity_is_invariant_across_lifecycle() {
        let mut slot = Slot::<32>::new();
        assert_eq!(slot.capacity(), 32);

        slot.assign("hello world".to_string());
        assert_eq!(slot.capacity(), 32);

        slot.reset();
        assert_eq!(slot.capacity(), 32);
    }

    #[test]
    fn size_tracks_the_bound_type() {
        let mut slot = Slot::<32>::new();
        assert_eq!(slot.size(), 0);

        slot.assign(1234_i32);
        assert_eq!(slot.size(), size_of::<i32>());

        slot.assign("foobar".to_string());
        assert_eq!(slot.size(), size_of::<String>());

        slot.reset();
        assert_eq!(slot.size(), 0);
    }

    #[test]
    fn get_returns_the_stored_value() {
        let slot = Slot::<16>::of(7_i32);

        assert_eq!(slot.get::<i32>().unwrap(), &7);
    }

    #[test]
    fn get_wrong_type_reports_both_identities() {
        let slot = Slot::<16>::of(7_i32);

        let error = slot.get::<f64>().unwrap_err();
        assert_eq!(error.stored().id(), TypeId::of::<i32>());
        assert_eq!(error.requested().id(), TypeId::of::<f64>());
    }

    #[test]
    fn get_on_empty_slot_fails() {
        let slot = Slot::<16>::new();

        let error = slot.get::<f64>().unwrap_err();
        assert_eq!(error.stored().id(), TypeId::of::<()>());
        assert_eq!(error.requested().id(), TypeId::of::<f64>());
    }

    #[test]
    fn mutation_is_visible_through_shared_access() {
        let mut slot = Slot::<16>::of(7_i32);

        *slot.get_mut::<i32>().unwrap() = 6;

        assert_eq!(slot.get::<i32>().unwrap(), &6);
    }

    #[test]
    fn assignment_replaces_value_and_type() {
        let mut slot = Slot::<16>::of(7_i32);
        assert!(slot.contains::<i32>());

        slot.assign(2.5_f64);

        assert!(!slot.contains::<i32>());
        assert!(slot.contains::<f64>());
        assert_eq!(slot.get::<f64>().unwrap(), &2.5);
    }

    #[test]
    fn reset_empties_and_is_idempotent() {
        let mut slot = Slot::<16>::of(7_i32);

        slot.reset();
        assert!(slot.is_empty());
        assert!(!slot.contains::<i32>());

        slot.reset();
        assert!(slot.is_empty());
    }

    #[test]
    fn construction_from_value_does_not_clone() {
        let (probe, clones, drops) = Probe::new();

        let slot = Slot::<32>::of(probe);

        assert_eq!(clones.get(), 0);
        assert_eq!(drops.get(), 0);
        drop(slot);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn dropping_the_slot_drops_the_value() {
        let (probe, _clones, drops) = Probe::new();

        {
            let _slot = Slot::<32>::of(probe);
        }

        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn reset_drops_the_value() {
        let (probe, _clones, drops) = Probe::new();
        let mut slot = Slot::<32>::of(probe);

        slot.reset();

        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn reassignment_drops_the_old_value_once() {
        let (probe, _clones, drops) = Probe::new();
        let mut slot = Slot::<32>::of(probe);

        slot.assign(7_i32);

        assert_eq!(drops.get(), 1);
        assert_eq!(slot.get::<i32>().unwrap(), &7);
    }

    #[test]
    fn clone_from_slot_clones_exactly_once() {
        let (probe, clones, drops) = Probe::new();
        let source = Slot::<32>::of(probe);

        let copy = Slot::<32>::clone_from_slot(&source);

        assert_eq!(clones.get(), 1);
        assert_eq!(drops.get(), 0);
        assert!(!source.is_empty());
        assert!(!copy.is_empty());
    }

    #[test]
    fn take_from_slot_does_not_clone_and_empties_the_source() {
        let (probe, clones, drops) = Probe::new();
        let mut source = Slot::<32>::of(probe);

        let taken = Slot::<32>::take_from_slot(&mut source);

        assert_eq!(clones.get(), 0);
        assert_eq!(drops.get(), 0);
        assert!(source.is_empty());
        assert!(!taken.is_empty());

        drop(taken);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn cloning_an_empty_slot_yields_an_empty_slot() {
        let source = Slot::<16>::new();

        let copy = Slot::<16>::clone_from_slot(&source);

        assert!(source.is_empty());
        assert!(copy.is_empty());
    }

    #[test]
    fn clone_impl_preserves_value_and_type() {
        let source = Slot::<32>::of("Hello".to_string());

        let copy = source.clone();

        assert_eq!(copy.get::<String>().unwrap(), "Hello");
        assert_eq!(source.get::<String>().unwrap(), "Hello");
    }

    #[test]
    fn widening_copy_preserves_value_and_type() {
        let small = Slot::<16>::of(1_i32);

        let mut big = Slot::<32>::of(2_i32);
        big.clone_assign_from(&small);

        assert_eq!(big.get::<i32>().unwrap(), &1);
        assert_eq!(big.type_identity().id(), TypeId::of::<i32>());
    }

    #[test]
    fn clone_assign_from_empty_source_empties_the_target() {
        let source = Slot::<16>::new();
        let mut target = Slot::<16>::of(1234_i32);

        target.clone_assign_from(&source);

        assert!(target.is_empty());
    }

    #[test]
    fn take_assign_from_moves_value_and_empties_source() {
        let mut source = Slot::<16>::of(7_i32);
        let mut target = Slot::<32>::of("old".to_string());

        target.take_assign_from(&mut source);

        assert!(source.is_empty());
        assert_eq!(target.get::<i32>().unwrap(), &7);
    }

    #[test]
    fn emplace_uses_the_default_impl() {
        #[derive(Clone)]
        struct WithDefaults {
            x: i64,
            y: f64,
        }

        impl Default for WithDefaults {
            fn default() -> Self {
                Self { x: 1, y: 2.0 }
            }
        }

        let mut slot = Slot::<32>::new();
        slot.emplace::<WithDefaults>();

        assert!(!slot.is_empty());
        let stored = slot.get::<WithDefaults>().unwrap();
        assert_eq!(stored.x, 1);
        assert_eq!(stored.y, 2.0);
    }

    #[test]
    fn emplace_with_constructs_from_arguments() {
        #[derive(Clone)]
        struct Pair {
            x: i32,
            y: i32,
        }

        let mut slot = Slot::<32>::new();
        slot.emplace_with(|| Pair { x: 77, y: 88 });

        let stored = slot.get::<Pair>().unwrap();
        assert_eq!(stored.x, 77);
        assert_eq!(stored.y, 88);
    }

    #[test]
    fn emplaced_value_is_dropped_with_the_slot() {
        let (probe, _clones, drops) = Probe::new();

        {
            let mut slot = Slot::<32>::new();
            slot.emplace_with(move || probe);
        }

        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn failed_construction_yields_no_slot() {
        let result = Slot::<16>::try_of_with(|| "xyz".parse::<i32>());

        assert!(result.is_err());
    }

    #[test]
    fn failed_emplace_on_empty_slot_leaves_it_empty() {
        let mut slot = Slot::<16>::new();

        let result = slot.try_emplace_with(|| "xyz".parse::<i32>());

        assert!(result.is_err());
        assert!(slot.is_empty());
    }

    #[test]
    fn failed_emplace_restores_the_previous_occupant() {
        let mut slot = Slot::<32>::of(1234_i32);

        let result = slot.try_emplace_with(|| "xyz".parse::<f64>());

        assert!(result.is_err());
        assert!(!slot.is_empty());
        assert_eq!(slot.get::<i32>().unwrap(), &1234);
        assert_eq!(slot.type_identity().id(), TypeId::of::<i32>());
    }

    #[test]
    fn failed_emplace_propagates_the_error_unmodified() {
        let mut slot = Slot::<16>::of(7_i32);

        let error = slot
            .try_emplace_with(|| Err::<i32, &str>("custom failure"))
            .unwrap_err();

        assert_eq!(error, "custom failure");
    }

    #[test]
    fn panicking_emplace_restores_the_previous_occupant() {
        let mut slot = Slot::<32>::of(1234_i32);

        let panic = catch_unwind(AssertUnwindSafe(|| {
            slot.emplace_with(|| -> String { panic!("constructor exploded") });
        }));

        assert!(panic.is_err());
        assert_eq!(slot.get::<i32>().unwrap(), &1234);
    }

    #[test]
    fn panicking_clone_during_clone_assign_leaves_target_untouched() {
        let source = Slot::<16>::of(PanicOnClone);
        let mut target = Slot::<16>::of(1234_i32);

        let panic = catch_unwind(AssertUnwindSafe(|| {
            target.clone_assign_from(&source);
        }));

        assert!(panic.is_err());
        assert!(!target.is_empty());
        assert_eq!(target.get::<i32>().unwrap(), &1234);
        assert_eq!(target.type_identity().id(), TypeId::of::<i32>());
    }

    #[test]
    fn take_assign_always_succeeds_even_for_unclonable_payloads() {
        let mut source = Slot::<16>::of(PanicOnClone);
        let mut target = Slot::<32>::of(1234_i32);

        target.take_assign_from(&mut source);

        assert!(source.is_empty());
        assert!(target.contains::<PanicOnClone>());
    }

    #[test]
    fn unit_value_is_storable_and_distinct_from_empty() {
        let occupied = Slot::<16>::of(());
        let empty = Slot::<16>::new();

        assert!(!occupied.is_empty());
        assert!(occupied.contains::<()>());
        assert!(empty.is_empty());
        assert!(!empty.contains::<()>());
    }

    #[test]
    fn debug_output_names_the_stored_type() {
        let slot = Slot::<16>::of(7_i32);
        let rendered = format!("{slot:?}");

        assert!(rendered.contains("i32"));
        assert!(rendered.contains("16"));

        let empty = Slot::<16>::new();
        let rendered = format!("{empty:?}");

        assert!(rendered.contains("None"));
    }
}
