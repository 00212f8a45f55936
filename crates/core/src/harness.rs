use crate::counter::Counter;
use crate::delay::Delay;
use crate::pl011::UartInit;
use crate::printer::{print_str, GREETING};
use crate::uart::{CharSink, UartId};

/// The entry loop.
///
/// A `Harness` only exists once its UART has been initialized, so holding
/// one means the program is in the counting state. From there it emits
/// `<dddd>Hello world!\r\n` followed by a pause, forever.
#[derive(Debug)]
pub struct Harness<S, D> {
    uart: UartId,
    sink: S,
    delay: D,
    counter: Counter,
}

impl<S: CharSink, D: Delay> Harness<S, D> {
    /// Runs `init` exactly once for `uart`, before any output.
    pub fn boot<I: UartInit>(uart: UartId, mut init: I, sink: S, delay: D) -> Self {
        init.init(uart);
        Self {
            uart,
            sink,
            delay,
            counter: Counter::new(),
        }
    }

    /// Emits one line for the current counter value, pauses, then advances.
    pub fn emit_line(&mut self) {
        for c in self.counter.digits() {
            self.sink.put_char(c);
        }
        print_str(&mut self.sink, GREETING);
        self.delay.pause();
        self.counter.advance();
    }

    pub fn run_for(&mut self, lines: u64) {
        for _ in 0..lines {
            self.emit_line();
        }
    }

    pub fn run_forever(mut self) -> ! {
        loop {
            self.emit_line();
        }
    }

    pub fn uart(&self) -> UartId {
        self.uart
    }

    /// Value the next line will carry.
    pub fn counter(&self) -> Counter {
        self.counter
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
