use crate::models::{CurrencyFormat, Price};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Line-oriented handle for the interactive protocol output.
///
/// Cloning is cheap, every clone writes to the same sink and each line is
/// written under the lock so lines from different tasks never interleave.
#[derive(Clone)]
pub struct Console {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
    currency: Arc<CurrencyFormat>,
}

impl Console {
    pub fn new(sink: impl Write + Send + 'static, currency: CurrencyFormat) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(sink))),
            currency: Arc::new(currency),
        }
    }
    pub fn stdout(currency: CurrencyFormat) -> Self {
        Self::new(io::stdout(), currency)
    }
    pub fn line(&self, line: impl AsRef<str>) -> io::Result<()> {
        let mut sink = self
            .sink
            .lock()
            .map_err(|_| io::Error::other("console sink poisoned"))?;
        sink.write_all(line.as_ref().as_bytes())?;
        sink.write_all(b"\n")?;
        sink.flush()
    }
    pub fn amount(&self, price: Price) -> String {
        self.currency.format(price)
    }
}

#[cfg(test)]
pub(crate) mod capture {
    use super::*;

    /// In-memory sink shared between a `Console` and the test reading it.
    #[derive(Clone, Default)]
    pub(crate) struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        pub(crate) fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
        pub(crate) fn lines(&self) -> Vec<String> {
            self.text().lines().map(str::to_string).collect()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub(crate) fn console() -> (Console, Captured) {
        let captured = Captured::default();
        (
            Console::new(captured.clone(), CurrencyFormat::default()),
            captured,
        )
    }
}
