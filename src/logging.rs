//! Logging bridge: every diagnostic goes to the system log through the `log`
//! facade and, with the same text, to a sink supplied by the host.

use std::fmt::{self, Write as _};

use crate::config::{LOG_CAPACITY, LOG_TAG};

/// Receives every message reported through a [`Logger`].
///
/// On Android this is the activity's `log(String)` method; tests record the
/// lines.
pub trait LogSink {
    /// Deliver one formatted message.
    fn write(&self, message: &str);
}

/// A sink that drops everything. The system log still receives each message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn write(&self, _message: &str) {}
}

/// Formats messages into a bounded buffer and fans them out to the system
/// log and a [`LogSink`].
#[derive(Clone, Copy)]
pub struct Logger<'a> {
    sink: &'a dyn LogSink,
}

impl<'a> Logger<'a> {
    /// Wrap a host sink.
    pub fn new(sink: &'a dyn LogSink) -> Self {
        Self { sink }
    }

    /// Format and deliver a message. Use the [`report!`](crate::report)
    /// macro rather than calling this directly.
    pub fn report(&self, args: fmt::Arguments<'_>) {
        let message = bounded_format(args, LOG_CAPACITY);
        log::info!(target: LOG_TAG, "{message}");
        self.sink.write(&message);
    }
}

impl fmt::Debug for Logger<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

/// Report a `format!`-style message through a [`Logger`].
#[macro_export]
macro_rules! report {
    ($logger:expr, $($arg:tt)+) => {
        $logger.report(::std::format_args!($($arg)+))
    };
}

/// Render `args` into at most `capacity` bytes, cutting on a character
/// boundary.
fn bounded_format(args: fmt::Arguments<'_>, capacity: usize) -> String {
    let mut out = Bounded {
        buf: String::new(),
        capacity,
    };
    // `Bounded` never fails; it stops accepting text once full.
    let _ = out.write_fmt(args);
    out.buf
}

struct Bounded {
    buf: String,
    capacity: usize,
}

impl fmt::Write for Bounded {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.capacity - self.buf.len();
        if s.len() <= room {
            self.buf.push_str(s);
        } else {
            let mut end = room;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            self.buf.push_str(&s[..end]);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Sink that keeps every line, for assertions.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) lines: RefCell<Vec<String>>,
    }

    impl RecordingSink {
        pub(crate) fn lines(&self) -> Vec<String> {
            self.lines.borrow().clone()
        }
    }

    impl LogSink for RecordingSink {
        fn write(&self, message: &str) {
            self.lines.borrow_mut().push(message.to_owned());
        }
    }

    #[test]
    fn report_forwards_formatted_text() {
        let sink = RecordingSink::default();
        let logger = Logger::new(&sink);
        report!(logger, "Drawn {:08x} using {}", 0x88bf_360c_u32, "OpenGL");
        assert_eq!(sink.lines(), vec!["Drawn 88bf360c using OpenGL"]);
    }

    #[test]
    fn long_messages_are_truncated() {
        let long = "x".repeat(LOG_CAPACITY * 2);
        assert_eq!(bounded_format(format_args!("{long}"), LOG_CAPACITY).len(), LOG_CAPACITY);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Each 'é' is two bytes; a capacity of 3 can only hold one.
        let text = bounded_format(format_args!("{}", "ééé"), 3);
        assert_eq!(text, "é");
    }

    #[test]
    fn pieces_after_the_limit_are_dropped() {
        let text = bounded_format(format_args!("{}{}{}", "ab", "cd", "ef"), 3);
        assert_eq!(text, "abc");
    }
}
