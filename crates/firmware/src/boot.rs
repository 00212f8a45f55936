// Hello UART - bare-metal UART bring-up harness
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! AArch64 entry: `_start` parks secondary cores, zeroes `.bss`, sets up the
//! boot core's stack and jumps here.

use core::arch::global_asm;

global_asm!(
    include_str!("boot.s"),
    // Aff2..Aff0 of MPIDR_EL1; all zero only on the boot core.
    CONST_CORE_ID_MASK = const 0x00FF_FFFF
);

/// # Safety
///
/// Only called once, from `_start`, on the boot core with a valid stack.
#[no_mangle]
pub unsafe extern "C" fn _start_rust() -> ! {
    crate::kernel_main()
}
