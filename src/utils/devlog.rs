//! Developer trace lines (pseudo "level 6") with an opt-in per-thread capture.
//!
//! Lines always go to the `adoptlite::dev6` log target. While a [`Capture`] is alive on
//! a thread, lines emitted on that thread are also buffered so tests can assert on them
//! without installing a global logger.

use std::cell::RefCell;

thread_local! {
    static CAPTURED: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// Active capture on the current thread; dropping it stops capturing.
pub struct Capture(());

impl Capture {
    /// Lines captured so far, left in place.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        CAPTURED.with(|c| c.borrow().clone().unwrap_or_default())
    }

    /// Lines captured so far, clearing the buffer.
    #[must_use]
    pub fn take(&self) -> Vec<String> {
        CAPTURED.with(|c| c.borrow_mut().as_mut().map(std::mem::take).unwrap_or_default())
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        CAPTURED.with(|c| *c.borrow_mut() = None);
    }
}

/// Starts capturing on the current thread, discarding anything captured earlier.
#[must_use]
pub fn capture() -> Capture {
    CAPTURED.with(|c| *c.borrow_mut() = Some(Vec::new()));
    Capture(())
}

#[doc(hidden)]
pub fn record(line: &str) {
    CAPTURED.with(|c| {
        if let Some(buf) = c.borrow_mut().as_mut() {
            buf.push(line.to_owned());
        }
    });
}

/// Emit a developer trace line.
#[macro_export]
macro_rules! dev6 {
    ($($arg:tt)*) => {{
        let __line = format!($($arg)*);
        $crate::utils::devlog::record(&__line);
        log::log!(target: "adoptlite::dev6", log::Level::Trace, "{}", __line);
    }};
}
