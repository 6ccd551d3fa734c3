use std::ptr;

use crate::{TypeIdentity, identity_of};

/// Selects what a slot's per-type dispatcher does in one call.
///
/// A single dispatcher instantiation exists per stored type and covers every
/// operation the slot ever needs for that type, standing in for what a
/// v-table would provide under virtual dispatch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SlotOp {
    /// Report the runtime identity of the dispatcher's type.
    TypeIdentity,

    /// Report the size in bytes of the dispatcher's type.
    Size,

    /// Clone-construct a value from `other` into `this`.
    Clone,

    /// Bitwise-relocate the value from `other` into `this`. Ownership
    /// transfers; the source bytes must not be treated as a live value
    /// afterwards.
    Relocate,

    /// Drop the value stored in `this`, in place.
    Drop,
}

/// The answer a dispatcher returns from one call.
///
/// Query operations answer through the matching variant; operations with
/// side effects only answer [`Done`](OpReply::Done).
#[derive(Clone, Copy, Debug)]
pub(crate) enum OpReply {
    /// The operation had side effects only.
    Done,

    /// Answer to [`SlotOp::TypeIdentity`].
    TypeIdentity(TypeIdentity),

    /// Answer to [`SlotOp::Size`].
    Size(usize),
}

/// A per-type dispatcher.
///
/// `this` points at the target buffer and `other` at the source buffer for
/// the buffer-to-buffer operations; query operations ignore both pointers.
pub(crate) type OpFn = unsafe fn(op: SlotOp, this: *mut u8, other: *const u8) -> OpReply;

/// Returns the dispatcher monomorphized for `T`.
///
/// Obtaining this function pointer is the only "registration" a type ever
/// needs: there is no registry and no allocation, just an instantiation of
/// [`dispatch`]. Note that separately compiled artifacts may each carry
/// their own instantiation at a distinct address, so pointer equality
/// implies same-type but pointer inequality implies nothing.
pub(crate) fn op_fn_for<T: Clone + 'static>() -> OpFn {
    dispatch::<T>
}

/// The dispatcher body behind every [`OpFn`].
///
/// # Safety
///
/// For [`SlotOp::Clone`], [`SlotOp::Relocate`] and [`SlotOp::Drop`] the
/// caller must provide pointers that are valid, properly aligned storage for
/// `T`: `other` must point at a live `T` for `Clone` and `Relocate`, `this`
/// must point at a live `T` for `Drop` and at writable vacant storage for
/// `Clone` and `Relocate`, and the two regions must not overlap. After
/// `Relocate`, the caller must no longer treat the source bytes as a live
/// value; after `Drop`, likewise for the target bytes. The query operations
/// ignore both pointers entirely.
unsafe fn dispatch<T: Clone + 'static>(op: SlotOp, this: *mut u8, other: *const u8) -> OpReply {
    match op {
        SlotOp::TypeIdentity => OpReply::TypeIdentity(identity_of::<T>()),
        SlotOp::Size => OpReply::Size(size_of::<T>()),
        SlotOp::Clone => {
            // Clone into a local first so a panicking `Clone` impl cannot
            // leave half-written bytes behind in the target buffer.
            // SAFETY: Caller guarantees `other` points at a live, aligned T.
            let source = unsafe { &*other.cast::<T>() };

            let clone = source.clone();

            // SAFETY: Caller guarantees `this` is valid vacant storage for T.
            unsafe {
                this.cast::<T>().write(clone);
            }

            OpReply::Done
        }
        SlotOp::Relocate => {
            // SAFETY: Caller guarantees both pointers are valid aligned
            // storage for T with a live value behind `other`, the regions do
            // not overlap, and ownership of the value transfers to `this`.
            unsafe {
                ptr::copy_nonoverlapping(other.cast::<T>(), this.cast::<T>(), 1);
            }

            OpReply::Done
        }
        SlotOp::Drop => {
            // SAFETY: Caller guarantees `this` points at a live T that will
            // not be dropped again afterwards.
            unsafe {
                ptr::drop_in_place(this.cast::<T>());
            }

            OpReply::Done
        }
    }
}

/// Asks a dispatcher for the identity of the type it was instantiated for.
pub(crate) fn query_identity(op_fn: OpFn) -> TypeIdentity {
    // SAFETY: Query operations do not touch the buffer pointers.
    let reply = unsafe { op_fn(SlotOp::TypeIdentity, ptr::null_mut(), ptr::null()) };

    match reply {
        OpReply::TypeIdentity(identity) => identity,
        OpReply::Done | OpReply::Size(_) => {
            unreachable!("dispatcher answered a TypeIdentity query with the wrong reply variant")
        }
    }
}

/// Asks a dispatcher for the size of the type it was instantiated for.
pub(crate) fn query_size(op_fn: OpFn) -> usize {
    // SAFETY: Query operations do not touch the buffer pointers.
    let reply = unsafe { op_fn(SlotOp::Size, ptr::null_mut(), ptr::null()) };

    match reply {
        OpReply::Size(size) => size,
        OpReply::Done | OpReply::TypeIdentity(_) => {
            unreachable!("dispatcher answered a Size query with the wrong reply variant")
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use std::cell::Cell;
    use std::mem::MaybeUninit;
    use std::rc::Rc;

    use super::*;

    /// Test helper that tracks whether it has been dropped.
    #[derive(Clone)]
    struct DropTracker {
        dropped: Rc<Cell<bool>>,
    }

    impl DropTracker {
        fn new() -> (Self, Rc<Cell<bool>>) {
            let dropped = Rc::new(Cell::new(false));
            (
                Self {
                    dropped: Rc::clone(&dropped),
                },
                dropped,
            )
        }
    }

    impl Drop for DropTracker {
        fn drop(&mut self) {
            self.dropped.set(true);
        }
    }

    #[test]
    fn queries_report_the_instantiated_type() {
        let op_fn = op_fn_for::<String>();

        assert_eq!(query_identity(op_fn), identity_of::<String>());
        assert_eq!(query_size(op_fn), size_of::<String>());
    }

    #[test]
    fn queries_distinguish_types() {
        assert_ne!(
            query_identity(op_fn_for::<u32>()),
            query_identity(op_fn_for::<i32>())
        );
    }

    #[test]
    fn clone_constructs_into_the_target() {
        let op_fn = op_fn_for::<String>();
        let source = "erased".to_string();
        let mut target = MaybeUninit::<String>::uninit();

        unsafe {
            op_fn(
                SlotOp::Clone,
                target.as_mut_ptr().cast(),
                (&raw const source).cast(),
            );
        }

        let cloned = unsafe { target.assume_init() };
        assert_eq!(cloned, "erased");
        assert_eq!(source, "erased");
    }

    #[test]
    fn relocate_transfers_ownership() {
        let op_fn = op_fn_for::<DropTracker>();
        let (tracker, dropped) = DropTracker::new();
        let source = MaybeUninit::new(tracker);
        let mut target = MaybeUninit::<DropTracker>::uninit();

        unsafe {
            op_fn(
                SlotOp::Relocate,
                target.as_mut_ptr().cast(),
                source.as_ptr().cast(),
            );
        }

        // The source bytes are dead now; only the relocated value remains
        // and dropping it must run the destructor exactly once.
        assert!(!dropped.get());

        drop(unsafe { target.assume_init() });
        assert!(dropped.get());
    }

    #[test]
    fn drop_runs_the_destructor_in_place() {
        let op_fn = op_fn_for::<DropTracker>();
        let (tracker, dropped) = DropTracker::new();
        let mut storage = MaybeUninit::new(tracker);

        assert!(!dropped.get());

        unsafe {
            op_fn(SlotOp::Drop, storage.as_mut_ptr().cast(), ptr::null());
        }

        assert!(dropped.get());
    }
}
