//! Example demonstrating basic usage of `Slot`.
//!
//! Shows storage of different types in the same slot over time, typed
//! recovery, and the lifecycle operations.

use opaque_slot::Slot;

fn main() {
    println!("=== Slot: Fixed-capacity Type-erased Storage ===");

    // One 32-byte slot, no heap allocation for the container itself.
    let mut slot = Slot::<32>::of(1234_i32);
    println!("Stored an i32: {}", slot.get::<i32>().unwrap());
    println!("Reported type: {}", slot.type_name());
    println!("Value size: {} of {} bytes", slot.size(), slot.capacity());

    // Assigning a different type replaces both the value and the type.
    slot.assign("Hello world".to_string());
    println!("Now a String: {}", slot.get::<String>().unwrap());
    println!("Reported type: {}", slot.type_name());

    // Asking for the wrong type fails gracefully, naming both types.
    match slot.get::<i32>() {
        Ok(value) => println!("Unexpected: {value}"),
        Err(error) => println!("Mismatch as expected: {error}"),
    }

    // Mutation through typed access.
    slot.get_mut::<String>().unwrap().push_str("!!");
    println!("After mutation: {}", slot.get::<String>().unwrap());

    // Reset destroys the value and empties the slot.
    slot.reset();
    println!("After reset, empty: {}", slot.is_empty());
}
