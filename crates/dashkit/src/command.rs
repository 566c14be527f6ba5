//! Commands for deferred work.
//!
//! A [`Cmd`] is a lazy unit of work that produces a [`Message`] when run. Controls
//! never sleep or spawn on their own; they hand back commands and the caller
//! decides where to run them (inline, on a worker thread, or not at all in
//! tests that deliver the resulting message by hand).

use std::fmt;
use std::time::{Duration, Instant};

use crate::message::Message;

/// A command that produces a message when executed.
///
/// # Example
///
/// ```rust
/// use dashkit::command::Cmd;
/// use dashkit::message::Message;
///
/// let cmd = Cmd::new(|| Message::new(7_u32));
/// let msg = cmd.execute().unwrap();
/// assert_eq!(msg.downcast::<u32>(), Some(7));
/// ```
pub struct Cmd(Box<dyn FnOnce() -> Message + Send + 'static>);

impl Cmd {
    /// Create a new command from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Message + Send + 'static,
    {
        Self(Box::new(f))
    }

    /// Execute the command and return the resulting message.
    pub fn execute(self) -> Option<Message> {
        Some((self.0)())
    }
}

impl fmt::Debug for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cmd").finish_non_exhaustive()
    }
}

/// Command that delivers a message after `duration` has elapsed.
///
/// The wait blocks whichever thread runs the command.
pub fn tick<F>(duration: Duration, f: F) -> Cmd
where
    F: FnOnce(Instant) -> Message + Send + 'static,
{
    Cmd::new(move || {
        std::thread::sleep(duration);
        f(Instant::now())
    })
}
