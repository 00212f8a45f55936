// Hello UART - bare-metal UART bring-up harness
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

#![no_main]
#![no_std]

mod boot;

use hello_uart_core::{BusyWait, Harness, Pl011Init, TxRegister, UartId, DEFAULT_DELAY_ITERATIONS};
use panic_halt as _;

#[cfg(not(any(
    all(feature = "uart0", not(any(feature = "uart1", feature = "uart2", feature = "uart3"))),
    all(feature = "uart1", not(any(feature = "uart0", feature = "uart2", feature = "uart3"))),
    all(feature = "uart2", not(any(feature = "uart0", feature = "uart1", feature = "uart3"))),
    all(feature = "uart3", not(any(feature = "uart0", feature = "uart1", feature = "uart2"))),
)))]
compile_error!("enable exactly one of the `uart0`..`uart3` features");

#[cfg(feature = "uart0")]
const ACTIVE_UART: UartId = UartId::Uart0;
#[cfg(feature = "uart1")]
const ACTIVE_UART: UartId = UartId::Uart1;
#[cfg(feature = "uart2")]
const ACTIVE_UART: UartId = UartId::Uart2;
#[cfg(feature = "uart3")]
const ACTIVE_UART: UartId = UartId::Uart3;

fn kernel_main() -> ! {
    // SAFETY: the FVP motherboard maps a PL011 at each UartId base and this
    // is the only code touching it.
    let (tx, init) = unsafe { (TxRegister::new(ACTIVE_UART), Pl011Init::new()) };

    Harness::boot(ACTIVE_UART, init, tx, BusyWait::new(DEFAULT_DELAY_ITERATIONS)).run_forever()
}
