//! Bare-metal UART bring-up harness.
//!
//! Prints a four digit counter followed by `Hello world!\r\n` to one of four
//! memory-mapped UARTs, forever. The pieces are split so the counting and
//! emission logic runs against any [`CharSink`], which lets host tests record
//! the byte stream instead of poking hardware.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod counter;
pub mod delay;
pub mod harness;
pub mod pl011;
pub mod printer;
pub mod uart;

pub use counter::Counter;
pub use delay::{BusyWait, Delay, NoDelay, DEFAULT_DELAY_ITERATIONS};
pub use harness::Harness;
pub use pl011::{Pl011Init, UartInit};
pub use printer::{print_bytes, print_str, GREETING};
pub use uart::{CharSink, ParseUartIdError, TxRegister, UartId};
