//! Example demonstrating failure rollback in `Slot`.
//!
//! A fallible in-place constructor that fails leaves the slot holding
//! exactly the value it held before the attempt.

use opaque_slot::Slot;

fn main() {
    println!("=== Slot: Failure Rollback ===");

    let mut slot = Slot::<32>::of(1234_i32);
    println!("Initial occupant: {}", slot.get::<i32>().unwrap());

    // Attempt to replace the occupant with the result of a parse that fails.
    let result = slot.try_emplace_with(|| "definitely not a float".parse::<f64>());
    println!("Construction failed: {}", result.is_err());

    // The slot still holds the original value, with the original type.
    println!("Occupant after failure: {}", slot.get::<i32>().unwrap());
    println!("Reported type after failure: {}", slot.type_name());

    // A succeeding construction replaces the occupant normally.
    slot.try_emplace_with(|| "2.5".parse::<f64>())
        .expect("literal is a valid float");
    println!("Occupant after success: {}", slot.get::<f64>().unwrap());
}
