//! Example demonstrating `TrivialSlot`, the byte-copy variant for `Copy`
//! payloads.
//!
//! The trivial slot keeps no record of what was stored, so typed reads are
//! `unsafe` and the caller must already know the type.

use opaque_slot::TrivialSlot;

fn main() {
    println!("=== TrivialSlot: Raw Byte Storage for Copy Types ===");

    let mut slot = TrivialSlot::<16>::of(0xDEAD_BEEF_u64);

    // SAFETY: The slot was populated with a u64 above.
    let value = unsafe { slot.get::<u64>() };
    println!("Stored: {value:#x}");

    // The slot itself is Copy; copies are independent byte images.
    let copy = slot;
    slot.set([1.5_f32, 2.5, 3.5, 4.5]);

    // SAFETY: `copy` still holds the u64 image, `slot` now holds the floats.
    unsafe {
        println!("Copy still holds: {:#x}", copy.get::<u64>());
        println!("Original now holds: {:?}", slot.get::<[f32; 4]>());
    }
}
