/// Iteration count of the stock inter-line pause.
///
/// This is a loop count, not a duration: how long it takes depends entirely
/// on the core it runs on.
pub const DEFAULT_DELAY_ITERATIONS: u32 = 5_000_000;

/// Pause between output lines.
pub trait Delay {
    fn pause(&mut self);
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn pause(&mut self) {
        (**self).pause()
    }
}

/// Spins on a volatile counter. Blocks the only thread of control and
/// consumes cycles the whole time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyWait {
    iterations: u32,
}

impl BusyWait {
    pub const fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl Default for BusyWait {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_ITERATIONS)
    }
}

impl Delay for BusyWait {
    fn pause(&mut self) {
        let mut i: u32 = 0;
        let p = &mut i as *mut u32;
        // SAFETY: `p` points at a live local for the whole loop.
        unsafe {
            while core::ptr::read_volatile(p) < self.iterations {
                core::ptr::write_volatile(p, core::ptr::read_volatile(p) + 1);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn pause(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_five_million() {
        assert_eq!(BusyWait::default().iterations(), 5_000_000);
    }

    #[test]
    fn test_busy_wait_terminates() {
        BusyWait::new(0).pause();
        BusyWait::new(1).pause();
        BusyWait::new(10_000).pause();
        NoDelay.pause();
    }
}
