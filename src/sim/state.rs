//! Round state and value types
//!
//! Everything the presentation layer can observe about a round lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_MARGIN;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundState {
    /// No round played yet (or reset), waiting for start
    #[default]
    Idle,
    /// Countdown running, taps score
    Running,
    /// Countdown hit zero
    Ended,
}

/// The tappable shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Center of the shape in playfield coordinates (y grows downward)
    pub center: Vec2,
    /// Diameter
    pub size: f32,
    /// Hue in [0, 1), rerolled on every placement
    pub hue: f32,
}

impl Target {
    pub fn half(&self) -> f32 {
        self.size / 2.0
    }

    /// Left/top corner, for hosts that position shapes by their corner
    pub fn top_left(&self) -> Vec2 {
        self.center - Vec2::splat(self.half())
    }
}

/// Playfield rectangle reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    /// Header/status bar inset at the top of the playfield
    pub reserved_top: f32,
    /// Minimum gap between a target and any edge
    pub margin: f32,
}

impl Bounds {
    /// Bounds with the default margin and no header inset
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            reserved_top: 0.0,
            margin: DEFAULT_MARGIN,
        }
    }

    pub fn with_reserved_top(mut self, reserved_top: f32) -> Self {
        self.reserved_top = reserved_top;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Replace NaN, infinite or negative fields with 0
    pub fn sanitized(self) -> Self {
        fn clean(v: f32) -> f32 {
            if v.is_finite() && v > 0.0 { v } else { 0.0 }
        }
        Self {
            width: clean(self.width),
            height: clean(self.height),
            reserved_top: clean(self.reserved_top),
            margin: clean(self.margin),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// What caused a state-change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh round began
    Started,
    /// One second elapsed
    Ticked,
    /// The target was tapped
    Hit,
    /// The countdown reached zero
    Ended { new_best: bool },
    /// Back to idle
    Reset,
}

/// Immutable view of a session handed to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: RoundState,
    pub score: u32,
    pub time_remaining: u32,
    pub round_secs: u32,
    /// None while idle
    pub target: Option<Target>,
    pub best: u32,
    pub cause: GameEvent,
}

impl Snapshot {
    /// Fraction of the round still left (1.0 = full, 0.0 = over)
    pub fn progress(&self) -> f32 {
        if self.round_secs == 0 {
            return 0.0;
        }
        self.time_remaining as f32 / self.round_secs as f32
    }

    pub fn is_running(&self) -> bool {
        self.state == RoundState::Running
    }

    /// JSON form handed to JavaScript hosts
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
