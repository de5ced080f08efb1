//! Tests for the logging facade.


use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// Tests that touch the process-wide registry run one at a time.
static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

pub(crate) fn lock_global() -> MutexGuard<'static, ()> {
    GLOBAL_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `io::Write` into a buffer the test keeps a handle to.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
