//! Line-driven sessions of a numeric target control.
//!
//! Each input line is one user event. Commits are written out as
//! `commit <value>` in the order the control makes them. Timers do not run in
//! the background: a `wait` line lets the pending quiet period elapse.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use dashkit::command::Cmd;
use dashkit::message::{BlurMsg, FocusMsg, KeyMsg, Message};
use dashkit::numeric::{NumericControl, Phase, StepPolicy, format_value};

/// One session event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// `+`: step up.
    Increment,
    /// `-`: step down.
    Decrement,
    /// `type <text>`: replace the typed text.
    Type(String),
    /// `key <name>`: a raw key press.
    Key(String),
    /// `enter`: commit the pending edit now.
    Enter,
    /// `esc`: drop the pending edit.
    Escape,
    /// `focus`
    Focus,
    /// `blur`: leave the field, committing a pending edit.
    Blur,
    /// `wait`: let the quiet period elapse.
    Wait,
    /// `sync <value>`: the value changed elsewhere.
    Sync(f64),
    /// `drag <fraction>`: move the slider.
    Drag(f64),
    /// `help`: print the key bindings.
    Help,
}

impl FromStr for Event {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let number = |what: &str| {
            rest.trim()
                .parse::<f64>()
                .map_err(|_| format!("{what} needs a number, got {rest:?}"))
        };
        match word {
            "+" => Ok(Self::Increment),
            "-" => Ok(Self::Decrement),
            "type" => Ok(Self::Type(rest.to_string())),
            "key" if !rest.is_empty() => Ok(Self::Key(rest.trim().to_string())),
            "enter" => Ok(Self::Enter),
            "esc" => Ok(Self::Escape),
            "focus" => Ok(Self::Focus),
            "blur" => Ok(Self::Blur),
            "wait" => Ok(Self::Wait),
            "help" => Ok(Self::Help),
            "sync" => number("sync").map(Self::Sync),
            "drag" => number("drag").map(Self::Drag),
            _ => Err(format!("unknown event {line:?}")),
        }
    }
}

/// Settings for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    /// Starting value.
    pub current: f64,
    /// Upper bound.
    pub ceiling: f64,
    /// Fixed step, or `None` to derive it from the ceiling.
    pub step: Option<f64>,
    /// Quiet period for typed input.
    pub debounce: Duration,
}

/// A numeric control plus the commits it has made.
#[derive(Debug)]
pub struct Session {
    control: NumericControl,
    commits: Receiver<f64>,
    pending: Option<Cmd>,
}

impl Session {
    /// Creates a session with a fresh control.
    #[must_use]
    pub fn new(options: SessionOptions) -> Self {
        let (tx, commits) = mpsc::channel();
        let step = options.step.map_or(StepPolicy::ByCeiling, StepPolicy::Fixed);
        let control = NumericControl::new(options.current, options.ceiling, move |value| {
            if tx.send(value).is_err() {
                tracing::warn!(value, "commit dropped; session already closed");
            }
        })
        .debounce(options.debounce)
        .step_policy(step);
        Self {
            control,
            commits,
            pending: None,
        }
    }

    /// Returns the control.
    #[must_use]
    pub fn control(&self) -> &NumericControl {
        &self.control
    }

    /// Applies one event.
    pub fn apply(&mut self, event: Event) {
        tracing::debug!(?event, "event");
        match event {
            Event::Increment => self.control.increment(),
            Event::Decrement => self.control.decrement(),
            Event::Type(text) => {
                let cmd = self.control.set_input(text);
                self.schedule(cmd);
            }
            Event::Key(key) => self.send(KeyMsg::new(key)),
            Event::Enter => self.send(KeyMsg::new("enter")),
            Event::Escape => self.send(KeyMsg::new("esc")),
            Event::Focus => self.send(FocusMsg),
            Event::Blur => self.send(BlurMsg),
            Event::Wait => self.wait(),
            Event::Sync(value) => self.control.sync_external(value),
            Event::Drag(fraction) => self.control.drag_to(fraction),
            Event::Help => {}
        }
    }

    fn send<M: std::any::Any + Send>(&mut self, msg: M) {
        let cmd = self.control.update(Message::new(msg));
        self.schedule(cmd);
    }

    fn schedule(&mut self, cmd: Option<Cmd>) {
        if cmd.is_some() {
            self.pending = cmd;
        }
    }

    /// Runs the latest timer, if an edit is still waiting on it, and feeds its
    /// message back.
    fn wait(&mut self) {
        let Some(cmd) = self.pending.take() else {
            return;
        };
        if self.control.phase() != Phase::DirtyPending {
            return;
        }
        if let Some(msg) = cmd.execute() {
            let follow_up = self.control.update(msg);
            self.schedule(follow_up);
        }
    }

    /// Returns the commits made since the last call.
    pub fn drain_commits(&mut self) -> Vec<f64> {
        self.commits.try_iter().collect()
    }

    /// Disposes the control, dropping any pending edit.
    pub fn finish(&mut self) {
        self.pending = None;
        self.control.dispose();
    }
}

/// Runs a session over `input`, writing each commit to `out`.
///
/// Unknown or malformed lines are logged and skipped. Blank lines and lines
/// starting with `#` are ignored.
///
/// # Errors
///
/// Returns an error if reading `input` or writing `out` fails.
pub fn run<R: BufRead, W: Write>(options: SessionOptions, input: R, out: &mut W) -> io::Result<()> {
    let mut session = Session::new(options);
    for (number, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match trimmed.parse::<Event>() {
            Ok(Event::Help) => {
                writeln!(out, "keys {}", session.control().key_map.help_view())?;
            }
            Ok(event) => session.apply(event),
            Err(reason) => {
                tracing::warn!(line = number + 1, %reason, "skipping event");
            }
        }
        for value in session.drain_commits() {
            writeln!(out, "commit {}", format_value(value))?;
        }
    }
    session.finish();
    tracing::info!(
        value = session.control().value(),
        committed = session.control().committed_value(),
        "session finished"
    );
    Ok(())
}
