use core::sync::atomic::{AtomicBool, Ordering};

/// Single-slot "new frame available" signal shared between the INT line
/// handler and the task polling the driver.
///
/// Raising an already raised flag is a no-op, so bursts of interrupts
/// collapse into one read of the latest frame.
///
/// ```ignore
/// static TOUCH_IRQ: InterruptFlag = InterruptFlag::new();
///
/// #[interrupt]
/// fn GPIO() {
///     TOUCH_IRQ.raise();
/// }
/// ```
#[derive(Debug, Default)]
pub struct InterruptFlag {
    raised: AtomicBool,
}

impl InterruptFlag {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Signal that the controller has a new frame. Safe to call from
    /// interrupt context.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Clear the flag, returning whether it was raised.
    ///
    /// Plain load/store so thumbv6m targets without compare-and-swap work.
    /// A raise racing with this call is folded into the frame read next.
    pub fn take(&self) -> bool {
        let raised = self.raised.load(Ordering::Acquire);
        if raised {
            self.raised.store(false, Ordering::Release);
        }
        raised
    }
}
