//! Three-tier map fallback: interactive tiles, static SVG, full reload.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

/// Rendering tier currently selected for the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    /// Tile-based interactive map.
    Interactive,
    /// Pre-rendered static map.
    Static,
    /// Full reload requested by the user.
    Reload,
}

impl fmt::Display for MapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interactive => "interactive",
            Self::Static => "static",
            Self::Reload => "reload",
        })
    }
}

/// What the caller should do after a load error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorAction {
    /// Retry loading the interactive map after `delay`.
    Retry {
        /// 1-based count of failures so far.
        attempt: u32,
        /// Backoff before the next attempt.
        delay: Duration,
    },
    /// Retries are exhausted; render the static map.
    FellBack,
    /// The interactive map is not active; the error is ignored.
    Ignored,
}

/// Map loader state machine with bounded exponential backoff.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use gridmind::map::fallback::{LoadErrorAction, MapFallback, MapMode};
///
/// let mut map = MapFallback::new(2, Duration::from_millis(100));
/// assert!(matches!(map.on_load_error(), LoadErrorAction::Retry { .. }));
/// assert_eq!(map.on_load_error(), LoadErrorAction::FellBack);
/// assert_eq!(map.mode(), MapMode::Static);
/// ```
#[derive(Debug, Clone)]
pub struct MapFallback {
    mode: MapMode,
    attempts: u32,
    max_retries: u32,
    base_delay: Duration,
}

/// Milliseconds in `d`, clamped to `u64::MAX`.
fn whole_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl MapFallback {
    /// Creates a loader in interactive mode.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            mode: MapMode::Interactive,
            attempts: 0,
            max_retries,
            base_delay,
        }
    }

    /// Current tier.
    pub fn mode(&self) -> MapMode {
        self.mode
    }

    /// Consecutive failures since the last success or manual retry.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Failures tolerated before falling back.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Backoff before retrying after the `attempt`-th failure.
    ///
    /// Doubles per attempt starting from the base delay.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << shift)
    }

    /// Handles a tile or library load error reported by the map widget.
    pub fn on_load_error(&mut self) -> LoadErrorAction {
        if self.mode != MapMode::Interactive {
            return LoadErrorAction::Ignored;
        }
        self.attempts += 1;
        if self.attempts >= self.max_retries {
            warn!(attempts = self.attempts, "map load failed, switching to static map");
            self.mode = MapMode::Static;
            return LoadErrorAction::FellBack;
        }
        let delay = self.backoff(self.attempts);
        warn!(
            attempt = self.attempts,
            delay_ms = whole_millis(delay),
            "map load failed, retrying"
        );
        LoadErrorAction::Retry {
            attempt: self.attempts,
            delay,
        }
    }

    /// Records a successful load, clearing the failure count.
    pub fn on_load_success(&mut self) {
        if self.mode == MapMode::Interactive {
            self.attempts = 0;
        }
    }

    /// Manual retry: back to the interactive tier with a fresh counter.
    pub fn request_interactive(&mut self) {
        info!(from = %self.mode, "interactive map requested");
        self.mode = MapMode::Interactive;
        self.attempts = 0;
    }

    /// Manual full reload.
    pub fn request_reload(&mut self) {
        info!(from = %self.mode, "full map reload requested");
        self.mode = MapMode::Reload;
    }
}
