//! Enable sequence for ARM PL011 compatible UARTs.
//!
//! Only what the harness needs: 8 data bits, FIFOs on, transmitter on. Baud
//! rate is left at whatever the platform (or its model) defaults to.

use crate::uart::UartId;

pub const UARTLCR_H: usize = 0x2C;
pub const UARTCR: usize = 0x30;

pub const LCR_H_FEN: u32 = 1 << 4;
pub const LCR_H_WLEN_8: u32 = 0b11 << 5;

pub const CR_UARTEN: u32 = 1 << 0;
pub const CR_TXE: u32 = 1 << 8;

/// One-time peripheral bring-up, run before the first character goes out.
pub trait UartInit {
    fn init(&mut self, uart: UartId);
}

impl<F: FnMut(UartId)> UartInit for F {
    fn init(&mut self, uart: UartId) {
        self(uart)
    }
}

/// Programs the PL011 register block starting at `base`.
///
/// # Safety
///
/// `base` must point at a PL011 register block (at least `UARTCR + 4`
/// bytes, word aligned) valid for volatile writes.
pub unsafe fn enable(base: *mut u32) {
    let lcr_h = base.byte_add(UARTLCR_H);
    let cr = base.byte_add(UARTCR);

    core::ptr::write_volatile(cr, 0);
    core::ptr::write_volatile(lcr_h, LCR_H_WLEN_8 | LCR_H_FEN);
    core::ptr::write_volatile(cr, CR_UARTEN | CR_TXE);
}

/// [`UartInit`] that drives the real register block at the UART's base.
#[derive(Debug, Default)]
pub struct Pl011Init {
    _private: (),
}

impl Pl011Init {
    /// # Safety
    ///
    /// Every UART this is asked to initialize must be a PL011 mapped at its
    /// [`UartId::base_address`].
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl UartInit for Pl011Init {
    fn init(&mut self, uart: UartId) {
        // SAFETY: guaranteed by `Pl011Init::new`.
        unsafe { enable(uart.base_address() as *mut u32) }
    }
}
