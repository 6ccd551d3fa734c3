//! Fixed-capacity, type-erased value containers with no heap allocation.
//!
//! This crate provides [`Slot`], an inline container of a statically chosen
//! byte capacity that can hold one value of *any* type that fits, while
//! preserving correct clone, move and drop semantics and allowing safe
//! runtime recovery of the stored type. A byte-copy-only sibling,
//! [`TrivialSlot`], covers `Copy` payloads that need no bookkeeping at all.
//!
//! The stored type is remembered through a single per-type dispatcher
//! function bound into the slot when a value is stored. That function pointer
//! plays the role a v-table would play under virtual dispatch, but it is
//! obtained once per type through monomorphization, so there is no boxing,
//! no registry and no allocation anywhere.
//!
//! # Key features
//!
//! - **Inline storage**: the value lives inside the slot; `Slot<64>` is just
//!   a 64-byte buffer plus one function pointer.
//! - **Compile-time capacity checks**: a type that does not fit, a type with
//!   an extended alignment requirement, or a copy from a larger-capacity slot
//!   is a compile error, never a runtime one.
//! - **Runtime type recovery**: [`Slot::get()`], [`Slot::contains()`] and the
//!   [`any_cast`] family validate the requested type, reporting both the
//!   stored and the requested [`TypeIdentity`] on mismatch.
//! - **Failure rollback**: a fallible in-place constructor that fails leaves
//!   the slot holding exactly what it held before the attempt.
//! - **Cross-artifact identity**: type checks fall back from fast
//!   function-pointer comparison to by-value [`TypeIdentity`] comparison, so
//!   they stay correct when separately compiled artifacts each carry their
//!   own dispatcher instantiation for the same type.
//!
//! # Examples
//!
//! Basic storage and typed recovery:
//!
//! ```
//! use opaque_slot::Slot;
//!
//! let mut slot = Slot::<32>::of(1234_i32);
//!
//! assert_eq!(slot.get::<i32>().unwrap(), &1234);
//! assert!(slot.get::<f64>().is_err());
//!
//! slot.assign("Hello world".to_string());
//! assert_eq!(slot.get::<String>().unwrap(), "Hello world");
//! ```
//!
//! Failed construction keeps the previous occupant:
//!
//! ```
//! use opaque_slot::Slot;
//!
//! let mut slot = Slot::<32>::of(1234_i32);
//!
//! let result = slot.try_emplace_with(|| "not a float".parse::<f64>());
//!
//! assert!(result.is_err());
//! assert_eq!(slot.get::<i32>().unwrap(), &1234);
//! ```
//!
//! Byte-copy storage for `Copy` payloads:
//!
//! ```
//! use opaque_slot::TrivialSlot;
//!
//! let slot = TrivialSlot::<8>::of(7_i32);
//!
//! // SAFETY: The slot was populated with an i32 above.
//! assert_eq!(unsafe { slot.get::<i32>() }, &7);
//! ```
//!
//! # Thread safety
//!
//! Slots are neither [`Send`] nor [`Sync`]: type erasure hides whether the
//! stored value is thread-safe or thread-mobile, so the conservative bound is
//! the only sound one. The containers perform no synchronization of their
//! own.

mod buffer;
mod cast;
mod error;
mod identity;
mod ops;
mod slot;
mod trivial;

pub(crate) use buffer::*;
pub use cast::*;
pub use error::*;
pub use identity::*;
pub(crate) use ops::*;
pub use slot::*;
pub use trivial::*;
