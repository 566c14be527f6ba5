//! Message types.
//!
//! Controls are driven by messages: user input, focus changes and their own
//! deferred timer events all arrive through `update(Message)`.

use std::any::Any;
use std::fmt;

/// A type-erased message container.
///
/// Messages can be any type that is `Send + 'static`. Use [`Message::new`] to create
/// a message and [`Message::downcast`] to retrieve the original type.
///
/// # Example
///
/// ```rust
/// use dashkit::message::{KeyMsg, Message};
///
/// let msg = Message::new(KeyMsg::new("enter"));
/// assert_eq!(msg.downcast_ref::<KeyMsg>().map(|k| k.key.as_str()), Some("enter"));
/// ```
pub struct Message(Box<dyn Any + Send>);

impl Message {
    /// Create a new message from any sendable type.
    pub fn new<M: Any + Send + 'static>(msg: M) -> Self {
        Self(Box::new(msg))
    }

    /// Try to downcast to a specific message type.
    pub fn downcast<M: Any + Send + 'static>(self) -> Option<M> {
        self.0.downcast::<M>().ok().map(|b| *b)
    }

    /// Try to get a reference to the message as a specific type.
    pub fn downcast_ref<M: Any + Send + 'static>(&self) -> Option<&M> {
        self.0.downcast_ref::<M>()
    }

    /// Check if the message is of a specific type.
    pub fn is<M: Any + Send + 'static>(&self) -> bool {
        self.0.is::<M>()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message").finish_non_exhaustive()
    }
}

/// A named key press, e.g. `"enter"`, `"esc"`, `"up"`, `"7"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMsg {
    /// Key name as matched by [`Binding`](crate::key::Binding).
    pub key: String,
}

impl KeyMsg {
    /// Creates a key message.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl fmt::Display for KeyMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// The control gained input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusMsg;

/// The control lost input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurMsg;
