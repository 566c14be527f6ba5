//! Bounded numeric control with debounced commits.
//!
//! A [`NumericControl`] mirrors a caller-owned value in `[0, ceiling]` and asks
//! the caller to change it through a commit callback. The local value always
//! reflects the user's latest action; the callback fires:
//!
//! - immediately for stepper and drag interactions,
//! - after a quiet period for typed input (one commit per quiet period),
//! - immediately on Enter or blur when a typed edit is pending.
//!
//! Typed text that is not a finite number never reaches the callback: when it
//! would be committed the field snaps back to the last committed value.
//!
//! An external update ([`NumericControl::sync_external`]) always wins: it
//! discards any in-flight edit and resynchronizes the display.
//!
//! The control does not watch the outcome of a commit. If the caller's write
//! fails, the caller restores the authoritative value with `sync_external`.
//!
//! # Example
//!
//! ```rust
//! use dashkit::numeric::NumericControl;
//! use std::sync::{Arc, Mutex};
//!
//! let commits = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&commits);
//! let mut control = NumericControl::new(3.0, 10.0, move |v| sink.lock().unwrap().push(v));
//!
//! control.increment();
//! assert_eq!(control.value(), 4.0);
//! assert_eq!(*commits.lock().unwrap(), vec![4.0]);
//! ```

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;

use crate::command::Cmd;
use crate::debounce::{DebounceMsg, Debouncer};
use crate::key::{Binding, help_line, matches};
use crate::message::{BlurMsg, FocusMsg, KeyMsg, Message};

/// Quiet period before typed input is committed, unless configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Decimal places kept when stepping, to keep `0.1 + 0.2` at `0.3`.
const PRECISION: f64 = 1e9;

/// The mutex makes the control `Sync`; the callback itself need only be `Send`.
type CommitFn = Mutex<Box<dyn FnMut(f64) + Send>>;

/// How far one stepper click moves the value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StepPolicy {
    /// Derive the step from the ceiling's magnitude.
    #[default]
    ByCeiling,
    /// Always use this step.
    Fixed(f64),
}

impl StepPolicy {
    /// Returns the step for a control with the given ceiling.
    ///
    /// A fixed step that is not a positive finite number falls back to the
    /// ceiling-derived step.
    #[must_use]
    pub fn step_for(self, ceiling: f64) -> f64 {
        match self {
            Self::Fixed(step) if step.is_finite() && step > 0.0 => step,
            Self::Fixed(step) => {
                tracing::warn!(step, "ignoring unusable fixed step");
                step_for_ceiling(ceiling)
            }
            Self::ByCeiling => step_for_ceiling(ceiling),
        }
    }
}

/// Step bucketed by ceiling magnitude; never decreases as the ceiling grows.
///
/// | ceiling       | step |
/// |---------------|------|
/// | ≤ 1           | 0.1  |
/// | ≤ 100         | 1    |
/// | ≤ 1000        | 10   |
/// | above         | 100  |
#[must_use]
pub fn step_for_ceiling(ceiling: f64) -> f64 {
    if ceiling <= 1.0 {
        0.1
    } else if ceiling <= 100.0 {
        1.0
    } else if ceiling <= 1000.0 {
        10.0
    } else {
        100.0
    }
}

/// Interaction phase of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The local value mirrors the last committed or synced value.
    Idle,
    /// A typed edit is waiting for its quiet period to end.
    DirtyPending,
}

/// Key bindings for the control.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Step up.
    pub increment: Binding,
    /// Step down.
    pub decrement: Binding,
    /// Commit the pending edit now.
    pub confirm: Binding,
    /// Drop the pending edit.
    pub revert: Binding,
    /// Delete the last typed character.
    pub delete_character_backward: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            increment: Binding::new().keys(&["up"]).help("↑", "increase"),
            decrement: Binding::new().keys(&["down"]).help("↓", "decrease"),
            confirm: Binding::new().keys(&["enter"]).help("enter", "commit"),
            revert: Binding::new().keys(&["esc"]).help("esc", "revert"),
            delete_character_backward: Binding::new()
                .keys(&["backspace"])
                .help("backspace", "delete"),
        }
    }
}

impl KeyMap {
    /// One-line summary of the bindings, e.g. `↑ increase · ↓ decrease`.
    #[must_use]
    pub fn help_view(&self) -> String {
        help_line(&[
            &self.increment,
            &self.decrement,
            &self.confirm,
            &self.revert,
            &self.delete_character_backward,
        ])
    }
}

/// Parses typed input; only finite numbers are accepted.
#[must_use]
pub fn parse_input(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats a value the way the control displays it (`4`, `0.3`, `12.5`).
#[must_use]
#[expect(clippy::cast_possible_truncation, reason = "guarded by the range check")]
pub fn format_value(v: f64) -> String {
    let v = tidy(v);
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

fn tidy(v: f64) -> f64 {
    (v * PRECISION).round() / PRECISION
}

/// Bounded numeric control with debounced commits.
///
/// Each control has its own debounce identity; timer messages from one control
/// are ignored by every other.
pub struct NumericControl {
    /// Local value, always within `[0, ceiling]`.
    value: f64,
    /// Last value handed to the callback or received from the caller.
    committed: f64,
    ceiling: f64,
    /// Raw text as typed, including transient invalid states.
    input: String,
    step: StepPolicy,
    debouncer: Debouncer,
    on_commit: CommitFn,
    focus: bool,
    disposed: bool,
    /// Key bindings.
    pub key_map: KeyMap,
}

impl fmt::Debug for NumericControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericControl")
            .field("value", &self.value)
            .field("committed", &self.committed)
            .field("ceiling", &self.ceiling)
            .field("input", &self.input)
            .field("step", &self.step)
            .field("debouncer", &self.debouncer)
            .field("focus", &self.focus)
            .field("disposed", &self.disposed)
            .field("on_commit", &"<fn>")
            .finish_non_exhaustive()
    }
}

impl NumericControl {
    /// Creates a control for `current` out of `ceiling`.
    ///
    /// A negative or NaN ceiling is treated as 0. The displayed value is
    /// clamped into range; the callback is not invoked.
    pub fn new<F>(current: f64, ceiling: f64, on_commit: F) -> Self
    where
        F: FnMut(f64) + Send + 'static,
    {
        let ceiling = if ceiling.is_nan() { 0.0 } else { ceiling.max(0.0) };
        let value = clamp_into(current, ceiling);
        let on_commit: Box<dyn FnMut(f64) + Send> = Box::new(on_commit);
        Self {
            value,
            committed: value,
            ceiling,
            input: format_value(value),
            step: StepPolicy::default(),
            debouncer: Debouncer::new(DEFAULT_DEBOUNCE),
            on_commit: Mutex::new(on_commit),
            focus: false,
            disposed: false,
            key_map: KeyMap::default(),
        }
    }

    /// Sets the quiet period for typed input.
    #[must_use]
    pub fn debounce(mut self, window: Duration) -> Self {
        self.debouncer.set_window(window);
        self
    }

    /// Sets the stepper policy.
    #[must_use]
    pub fn step_policy(mut self, step: StepPolicy) -> Self {
        self.step = step;
        self
    }

    /// Returns the control's unique ID.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.debouncer.id()
    }

    /// Returns the local (displayed) value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the last committed or synced value.
    #[must_use]
    pub fn committed_value(&self) -> f64 {
        self.committed
    }

    /// Returns the ceiling.
    #[must_use]
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Returns the raw input text.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the current stepper increment.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step.step_for(self.ceiling)
    }

    /// Returns the interaction phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.debouncer.pending() {
            Phase::DirtyPending
        } else {
            Phase::Idle
        }
    }

    /// Returns `value / ceiling`, or 0 when the ceiling is 0.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.ceiling > 0.0 {
            self.value / self.ceiling
        } else {
            0.0
        }
    }

    /// Returns whether the control has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Returns whether the control has input focus.
    #[must_use]
    pub fn focused(&self) -> bool {
        self.focus
    }

    /// Steps the value up and commits it immediately.
    pub fn increment(&mut self) {
        self.step_by(self.step());
    }

    /// Steps the value down and commits it immediately.
    pub fn decrement(&mut self) {
        self.step_by(-self.step());
    }

    fn step_by(&mut self, delta: f64) {
        if self.disposed {
            return;
        }
        self.debouncer.cancel();
        let next = clamp_into(tidy(self.value + delta), self.ceiling);
        self.commit(next);
    }

    /// Sets the value to `fraction` of the ceiling and commits it immediately.
    pub fn drag_to(&mut self, fraction: f64) {
        if self.disposed || fraction.is_nan() {
            return;
        }
        self.debouncer.cancel();
        let target = tidy(fraction.clamp(0.0, 1.0) * self.ceiling);
        let next = clamp_into(target, self.ceiling);
        self.commit(next);
    }

    /// Replaces the typed text and (re)starts the quiet period.
    ///
    /// The text is kept verbatim. If it parses, the local value follows it
    /// (clamped) right away. Run the returned command and feed its message back
    /// through [`update`](Self::update) to commit once typing pauses.
    pub fn set_input(&mut self, text: impl Into<String>) -> Option<Cmd> {
        if self.disposed {
            return None;
        }
        self.input = text.into();
        if let Some(v) = parse_input(&self.input) {
            self.value = clamp_into(v, self.ceiling);
        }
        Some(self.debouncer.trigger())
    }

    /// Commits a pending typed edit now (the Enter key).
    pub fn confirm(&mut self) {
        self.flush();
    }

    /// Drops a pending typed edit and restores the committed value.
    pub fn cancel_edit(&mut self) {
        if self.disposed {
            return;
        }
        self.debouncer.cancel();
        self.revert();
    }

    /// Gives the control input focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Removes focus, committing any pending typed edit.
    pub fn blur(&mut self) {
        self.focus = false;
        self.flush();
    }

    /// Resynchronizes to a value changed elsewhere, discarding local edits.
    ///
    /// The callback is not invoked.
    pub fn sync_external(&mut self, value: f64) {
        if self.disposed {
            return;
        }
        self.debouncer.cancel();
        let value = clamp_into(value, self.ceiling);
        tracing::debug!(id = self.id(), value, "synced from external value");
        self.value = value;
        self.committed = value;
        self.input = format_value(value);
    }

    /// Cancels any pending quiet period and stops all further commits.
    pub fn dispose(&mut self) {
        self.debouncer.cancel();
        self.disposed = true;
        self.focus = false;
    }

    /// Handles key, focus, blur and debounce messages.
    pub fn update(&mut self, msg: Message) -> Option<Cmd> {
        if self.disposed {
            return None;
        }

        if let Some(tick) = msg.downcast_ref::<DebounceMsg>() {
            if self.debouncer.accept(tick) {
                self.commit_input();
            }
            return None;
        }

        if msg.is::<BlurMsg>() {
            self.blur();
            return None;
        }

        if msg.is::<FocusMsg>() {
            self.focus();
            return None;
        }

        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key);
        }

        None
    }

    fn handle_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        if matches(key, &[&self.key_map.confirm]) {
            self.confirm();
        } else if matches(key, &[&self.key_map.revert]) {
            self.cancel_edit();
        } else if matches(key, &[&self.key_map.increment]) {
            self.increment();
        } else if matches(key, &[&self.key_map.decrement]) {
            self.decrement();
        } else if matches(key, &[&self.key_map.delete_character_backward]) {
            let mut text = self.input.clone();
            text.pop();
            return self.set_input(text);
        } else if is_numeric_char(&key.key) {
            let text = format!("{}{}", self.input, key.key);
            return self.set_input(text);
        }
        None
    }

    /// Renders the value against its ceiling, e.g. `7 / 10`.
    #[must_use]
    pub fn view(&self) -> String {
        format!("{} / {}", self.input, format_value(self.ceiling))
    }

    fn flush(&mut self) {
        if self.disposed || !self.debouncer.pending() {
            return;
        }
        self.debouncer.cancel();
        self.commit_input();
    }

    fn commit_input(&mut self) {
        match parse_input(&self.input) {
            Some(v) => self.commit(clamp_into(v, self.ceiling)),
            None => self.revert(),
        }
    }

    fn revert(&mut self) {
        tracing::debug!(id = self.id(), input = %self.input, "reverting to committed value");
        self.value = self.committed;
        self.input = format_value(self.committed);
    }

    fn commit(&mut self, value: f64) {
        tracing::debug!(id = self.id(), value, "commit");
        self.value = value;
        self.committed = value;
        self.input = format_value(value);
        let callback = self.on_commit.get_mut();
        callback(value);
    }
}

fn clamp_into(v: f64, ceiling: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, ceiling) }
}

fn is_numeric_char(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), None) if c.is_ascii_digit() || c == '.' || c == '-'
    )
}
