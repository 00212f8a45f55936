use core::fmt;
use core::str::FromStr;

/// One of the four UART instances on the Versatile Express style memory map.
///
/// `Uart2` is the default: it is the instance the harness drives unless told
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UartId {
    Uart0,
    Uart1,
    #[default]
    Uart2,
    Uart3,
}

impl UartId {
    pub const ALL: [UartId; 4] = [UartId::Uart0, UartId::Uart1, UartId::Uart2, UartId::Uart3];

    /// Base of the peripheral. The data register (UARTDR) sits at offset 0.
    pub const fn base_address(self) -> usize {
        match self {
            UartId::Uart0 => 0x1C09_0000,
            UartId::Uart1 => 0x1C0A_0000,
            UartId::Uart2 => 0x1C0B_0000,
            UartId::Uart3 => 0x1C0C_0000,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            UartId::Uart0 => 0,
            UartId::Uart1 => 1,
            UartId::Uart2 => 2,
            UartId::Uart3 => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            UartId::Uart0 => "uart0",
            UartId::Uart1 => "uart1",
            UartId::Uart2 => "uart2",
            UartId::Uart3 => "uart3",
        }
    }
}

impl fmt::Display for UartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseUartIdError;

impl fmt::Display for ParseUartIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unsupported UART; supported: uart0, uart1, uart2, uart3")
    }
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for ParseUartIdError {}

impl FromStr for UartId {
    type Err = ParseUartIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let v = value.trim();
        let v = match v.get(..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("uart") => &v[4..],
            _ => v,
        };
        match v {
            "0" => Ok(UartId::Uart0),
            "1" => Ok(UartId::Uart1),
            "2" => Ok(UartId::Uart2),
            "3" => Ok(UartId::Uart3),
            _ => Err(ParseUartIdError),
        }
    }
}

/// Serialized by name; deserialized through [`FromStr`], so config files
/// accept the same spellings as the command line.
#[cfg(feature = "serde")]
impl serde::Serialize for UartId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UartId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UartIdVisitor;

        impl serde::de::Visitor<'_> for UartIdVisitor {
            type Value = UartId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a UART name (uart0..uart3) or index (0..3)")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<UartId, E> {
                v.parse()
                    .map_err(|_| E::invalid_value(serde::de::Unexpected::Str(v), &self))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<UartId, E> {
                UartId::ALL
                    .get(v as usize)
                    .copied()
                    .ok_or_else(|| E::invalid_value(serde::de::Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<UartId, E> {
                u64::try_from(v)
                    .map_err(|_| E::invalid_value(serde::de::Unexpected::Signed(v), &self))
                    .and_then(|v| self.visit_u64(v))
            }
        }

        deserializer.deserialize_any(UartIdVisitor)
    }
}

/// Anything that accepts one character at a time.
///
/// Writes are fire-and-forget: there is no status, no retry and no way to
/// report a lost byte.
pub trait CharSink {
    fn put_char(&mut self, c: u8);
}

impl<S: CharSink + ?Sized> CharSink for &mut S {
    fn put_char(&mut self, c: u8) {
        (**self).put_char(c)
    }
}

/// Recording sink for host-side runs and tests.
#[cfg(any(test, feature = "std"))]
impl CharSink for std::vec::Vec<u8> {
    fn put_char(&mut self, c: u8) {
        self.push(c);
    }
}

/// Transmit data register of a memory-mapped UART.
///
/// Each character is a single 32-bit volatile store of the raw byte value,
/// so the compiler can neither drop nor reorder the writes.
#[derive(Debug)]
pub struct TxRegister {
    dr: *mut u32,
}

impl TxRegister {
    /// Binds to the data register of `uart`.
    ///
    /// # Safety
    ///
    /// The UART must be mapped at [`UartId::base_address`] and nothing else
    /// may hold a handle to its data register.
    pub unsafe fn new(uart: UartId) -> Self {
        Self::from_ptr(uart.base_address() as *mut u32)
    }

    /// # Safety
    ///
    /// `dr` must be valid for volatile `u32` writes for the lifetime of the
    /// returned value.
    pub unsafe fn from_ptr(dr: *mut u32) -> Self {
        Self { dr }
    }
}

impl CharSink for TxRegister {
    fn put_char(&mut self, c: u8) {
        // SAFETY: validity of `dr` is the constructor's contract.
        unsafe { core::ptr::write_volatile(self.dr, c as u32) }
    }
}
