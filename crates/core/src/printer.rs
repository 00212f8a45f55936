use core::ffi::CStr;

use crate::uart::CharSink;

pub const GREETING: &CStr = c"Hello world!\r\n";

/// Emits every byte of `s` in order. The NUL terminator is not sent.
pub fn print_str<S: CharSink + ?Sized>(sink: &mut S, s: &CStr) {
    for &c in s.to_bytes() {
        sink.put_char(c);
    }
}

/// Emits `s` up to, but not including, the first NUL (or the whole slice if
/// there is none).
pub fn print_bytes<S: CharSink + ?Sized>(sink: &mut S, s: &[u8]) {
    for &c in s.iter().take_while(|&&c| c != 0) {
        sink.put_char(c);
    }
}
