//! Integration tests for the `opaque_slot` package.
//!
//! These exercise the public surface end to end: storage and typed recovery,
//! cross-capacity transfers, failure rollback and the `any_cast` family.

use std::any::TypeId;
use std::cell::Cell;
use std::rc::Rc;

use opaque_slot::{Slot, TrivialSlot, any_cast, try_any_cast, try_any_cast_mut};

#[test]
fn round_trip_for_assorted_types() {
    let int_slot = Slot::<32>::of(1234_i32);
    assert_eq!(int_slot.get::<i32>().unwrap(), &1234);

    let string_slot = Slot::<32>::of("Hello world".to_string());
    assert_eq!(string_slot.get::<String>().unwrap(), "Hello world");

    let vec_slot = Slot::<32>::of(vec![1_u8, 2, 3]);
    assert_eq!(vec_slot.get::<Vec<u8>>().unwrap(), &[1, 2, 3]);
}

#[test]
fn occupancy_follows_the_lifecycle() {
    let mut slot = Slot::<32>::new();
    assert!(slot.is_empty());

    slot.assign(7_i32);
    assert!(!slot.is_empty());

    slot.reset();
    assert!(slot.is_empty());

    slot.emplace::<u32>();
    assert!(!slot.is_empty());
}

#[test]
fn capacity_and_size_report_independently() {
    let mut slot = Slot::<32>::new();

    assert_eq!(slot.capacity(), 32);
    assert_eq!(slot.size(), 0);

    slot.assign("foobar".to_string());
    assert_eq!(slot.capacity(), 32);
    assert_eq!(slot.size(), size_of::<String>());

    slot.reset();
    assert_eq!(slot.capacity(), 32);
    assert_eq!(slot.size(), 0);
}

#[test]
fn failed_assignment_keeps_value_and_type() {
    // A slot holding the integer 1234 is assigned a value whose constructor
    // fails; afterwards everything is as before.
    let mut slot = Slot::<32>::of(1234_i32);

    let result = slot.try_emplace_with(|| "boom".parse::<f64>());

    assert!(result.is_err());
    assert!(!slot.is_empty());
    assert_eq!(slot.get::<i32>().unwrap(), &1234);
    assert_eq!(slot.type_identity().id(), TypeId::of::<i32>());
}

#[test]
fn mismatch_error_names_stored_and_requested_types() {
    let slot = Slot::<16>::of(7_i32);

    let error = any_cast::<f32, 16>(&slot).unwrap_err();

    assert_eq!(error.stored().id(), TypeId::of::<i32>());
    assert_eq!(error.requested().id(), TypeId::of::<f32>());

    let message = error.to_string();
    assert!(message.contains("i32"));
    assert!(message.contains("f32"));
}

#[test]
fn pointer_form_casts_have_no_side_effects() {
    let mut slot = Slot::<16>::of(7_i32);

    assert_eq!(try_any_cast::<f32, 16>(&slot), None);
    assert_eq!(try_any_cast_mut::<f32, 16>(&mut slot), None);

    // The failed casts changed nothing.
    assert_eq!(slot.get::<i32>().unwrap(), &7);
}

#[test]
fn emplace_with_default_yields_default_field_values() {
    #[derive(Clone)]
    struct Config {
        retries: u32,
        verbose: bool,
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                retries: 3,
                verbose: false,
            }
        }
    }

    let mut slot = Slot::<16>::new();
    slot.emplace::<Config>();

    assert!(!slot.is_empty());
    let config = slot.get::<Config>().unwrap();
    assert_eq!(config.retries, 3);
    assert!(!config.verbose);
}

#[test]
fn widening_transfers_preserve_value_and_type() {
    let small = Slot::<16>::of(1_i32);

    let widened = Slot::<32>::clone_from_slot(&small);
    assert_eq!(widened.get::<i32>().unwrap(), &1);
    assert_eq!(widened.type_identity().id(), TypeId::of::<i32>());

    let mut target = Slot::<64>::of("occupied".to_string());
    target.clone_assign_from(&widened);
    assert_eq!(target.get::<i32>().unwrap(), &1);
}

#[test]
fn moving_between_slots_transfers_ownership_exactly_once() {
    struct Tracked {
        drops: Rc<Cell<usize>>,
    }

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            Self {
                drops: Rc::clone(&self.drops),
            }
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    let drops = Rc::new(Cell::new(0));
    let mut source = Slot::<32>::of(Tracked {
        drops: Rc::clone(&drops),
    });

    let mut target = Slot::<32>::new();
    target.take_assign_from(&mut source);

    assert!(source.is_empty());
    assert!(!target.is_empty());

    // Dropping the now-empty source must not touch the transferred value.
    drop(source);
    assert_eq!(drops.get(), 0);

    drop(target);
    assert_eq!(drops.get(), 1);
}

#[test]
fn reassignment_swaps_the_reported_type() {
    let mut slot = Slot::<32>::of(7_i32);
    assert!(slot.contains::<i32>());
    assert!(!slot.contains::<String>());

    slot.assign("seven".to_string());
    assert!(!slot.contains::<i32>());
    assert!(slot.contains::<String>());
    assert_eq!(slot.get::<String>().unwrap(), "seven");
}

#[test]
fn slots_of_slots_are_just_values() {
    // A slot is itself a value with clone and drop semantics, so one slot
    // can store another, erased like anything else.
    let inner = Slot::<16>::of(7_i32);
    let outer = Slot::<64>::of(inner);

    let inner_again = outer.get::<Slot<16>>().unwrap();
    assert_eq!(inner_again.get::<i32>().unwrap(), &7);
}

#[test]
fn trivial_slot_round_trip() {
    let mut slot = TrivialSlot::<16>::of([1_u32, 2, 3, 4]);

    // SAFETY: The slot was populated with a [u32; 4] above.
    let values = unsafe { slot.get::<[u32; 4]>() };
    assert_eq!(values, &[1, 2, 3, 4]);

    // SAFETY: Same stored type as above.
    unsafe {
        *slot.get_mut::<[u32; 4]>() = [9, 2, 3, 4];
    }

    // SAFETY: Same stored type as above.
    assert_eq!(unsafe { slot.get::<[u32; 4]>() }, &[9, 2, 3, 4]);
}

#[test]
fn trivial_slot_copies_are_independent() {
    let mut original = TrivialSlot::<8>::of(1_u64);
    let copy = original;

    original.set(2_u64);

    // SAFETY: Both slots hold u64 values.
    unsafe {
        assert_eq!(original.get::<u64>(), &2);
        assert_eq!(copy.get::<u64>(), &1);
    }
}
