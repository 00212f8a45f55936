/// Four decimal digits, most significant first, counting "0000" to "9999"
/// and wrapping back to "0000".
///
/// As an iterator it never ends: each call yields the current digits and then
/// advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    digits: [u8; 4],
}

impl Counter {
    pub const MODULUS: u16 = 10_000;

    pub const fn new() -> Self {
        Self { digits: [b'0'; 4] }
    }

    /// Starts at `value % 10000`.
    pub fn from_value(value: u32) -> Self {
        let mut v = value % Self::MODULUS as u32;
        let mut digits = [b'0'; 4];
        for d in digits.iter_mut().rev() {
            *d = b'0' + (v % 10) as u8;
            v /= 10;
        }
        Self { digits }
    }

    pub fn digits(&self) -> [u8; 4] {
        self.digits
    }

    pub fn value(&self) -> u16 {
        self.digits
            .iter()
            .fold(0u16, |acc, &d| acc * 10 + (d - b'0') as u16)
    }

    /// Innermost digit moves fastest; a carry out of the top digit is dropped.
    pub fn advance(&mut self) {
        for d in self.digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                return;
            }
        }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Counter {
    type Item = [u8; 4];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.digits;
        self.advance();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
