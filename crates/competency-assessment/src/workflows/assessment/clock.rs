use serde::Serialize;
use std::fmt;

type ExpiryCallback = Box<dyn FnOnce() + Send>;

/// Lifecycle of a [`TestClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    Idle,
    Running,
    Stopped,
    Expired,
}

/// Result of advancing the clock by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Still counting down.
    Running { remaining_seconds: u32 },
    /// This tick brought the countdown to zero.
    Expired,
    /// Not running; nothing changed.
    Inert,
}

/// One-second resolution countdown for a timed test.
///
/// The clock is driven by [`TestClock::tick`], so hosts decide where the
/// seconds come from (a tokio timer or a test loop). It can be
/// started once and never paused or restarted.
pub struct TestClock {
    duration_seconds: u32,
    remaining_seconds: u32,
    state: ClockState,
    on_expire: Vec<ExpiryCallback>,
}

impl TestClock {
    pub fn new(duration_seconds: u32) -> Self {
        Self {
            duration_seconds,
            remaining_seconds: duration_seconds,
            state: ClockState::Idle,
            on_expire: Vec::new(),
        }
    }

    pub fn start(&mut self) -> Result<ClockTick, ClockError> {
        if self.state != ClockState::Idle {
            return Err(ClockError::AlreadyStarted(self.state));
        }

        self.state = ClockState::Running;
        if self.remaining_seconds == 0 {
            self.expire();
            return Ok(ClockTick::Expired);
        }

        Ok(ClockTick::Running {
            remaining_seconds: self.remaining_seconds,
        })
    }

    pub fn tick(&mut self) -> ClockTick {
        if self.state != ClockState::Running {
            return ClockTick::Inert;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.expire();
            ClockTick::Expired
        } else {
            ClockTick::Running {
                remaining_seconds: self.remaining_seconds,
            }
        }
    }

    /// Halts the countdown. Stopping a clock that is not running is a no-op.
    pub fn stop(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Stopped;
            self.on_expire.clear();
        }
    }

    /// Registers a one-shot callback fired when the countdown reaches zero.
    ///
    /// Callbacks registered after the clock stopped or expired never run.
    pub fn on_expire<F>(&mut self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if matches!(self.state, ClockState::Idle | ClockState::Running) {
            self.on_expire.push(Box::new(callback));
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.duration_seconds - self.remaining_seconds
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    fn expire(&mut self) {
        self.state = ClockState::Expired;
        for callback in self.on_expire.drain(..) {
            callback();
        }
    }
}

impl fmt::Debug for TestClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestClock")
            .field("duration_seconds", &self.duration_seconds)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("state", &self.state)
            .field("pending_callbacks", &self.on_expire.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("clock cannot be started again (currently {0:?})")]
    AlreadyStarted(ClockState),
}

/// Formats seconds as the `m:ss` countdown shown to candidates.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
