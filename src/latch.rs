//! Button-pressed flag shared between the interrupt and the main loop.
//!
//! The interrupt context only ever calls [`ButtonLatch::press`]; the Manual
//! handler reads it with [`ButtonLatch::is_pressed`] and resets it with
//! [`ButtonLatch::clear`] once the alarm sequence is over. Presses arriving
//! while the flag is already set are absorbed.
//!
//! Only atomic loads and stores are used, so the latch works on cores
//! without compare-and-swap (ESP32-C3).
//!
//! # Example
//!
//! ```rust
//! use rs_junction::ButtonLatch;
//!
//! static LATCH: ButtonLatch = ButtonLatch::new();
//!
//! LATCH.press();
//! assert!(LATCH.is_pressed());
//! LATCH.clear();
//! assert!(!LATCH.is_pressed());
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

/// Interrupt-safe button-pressed flag.
#[derive(Debug, Default)]
pub struct ButtonLatch {
    pressed: AtomicBool,
}

impl ButtonLatch {
    /// Creates a released latch. Usable in `static` items.
    pub const fn new() -> Self {
        Self {
            pressed: AtomicBool::new(false),
        }
    }

    /// Latch a press. Safe to call from interrupt context.
    #[inline]
    pub fn press(&self) {
        if !self.pressed.load(Ordering::Acquire) {
            self.pressed.store(true, Ordering::Release);
        }
    }

    /// Returns true if a press is pending.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Acquire)
    }

    /// Release the latch.
    #[inline]
    pub fn clear(&self) {
        self.pressed.store(false, Ordering::Release);
    }
}
