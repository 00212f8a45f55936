use hello_uart_core::CharSink;
use std::io::{self, Write};

/// Host stand-in for the UART data register.
///
/// Like the hardware it replaces, `put_char` never reports failure. The first
/// I/O error is parked and every later byte is dropped; the runner picks the
/// error up at the next line boundary through [`HostUart::end_line`].
pub struct HostUart<W: Write> {
    out: W,
    error: Option<io::Error>,
    bytes: u64,
}

impl<W: Write> HostUart<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            error: None,
            bytes: 0,
        }
    }

    /// Bytes accepted by the underlying writer so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Flushes the line and surfaces any write error seen since the last call.
    pub fn end_line(&mut self) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CharSink for HostUart<W> {
    fn put_char(&mut self, c: u8) {
        if self.error.is_some() {
            return;
        }
        match self.out.write_all(&[c]) {
            Ok(()) => self.bytes += 1,
            Err(e) => {
                tracing::debug!("UART write failed: {}", e);
                self.error = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Limited {
        buf: Vec<u8>,
        cap: usize,
    }

    impl Write for Limited {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            if self.buf.len() + data.len() > self.cap {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_passes_bytes_through() {
        let mut uart = HostUart::new(Vec::new());
        for &c in b"OK\r\n" {
            uart.put_char(c);
        }
        assert!(uart.end_line().is_ok());
        assert_eq!(uart.bytes_written(), 4);
        assert_eq!(uart.into_inner(), b"OK\r\n");
    }

    #[test]
    fn test_error_parked_until_line_end() {
        let mut uart = HostUart::new(Limited {
            buf: Vec::new(),
            cap: 2,
        });
        for &c in b"abcd" {
            uart.put_char(c);
        }
        assert_eq!(uart.bytes_written(), 2);

        let err = uart.end_line().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(uart.into_inner().buf, b"ab");
    }
}
