#![forbid(unsafe_code)]

//! Slide direction and the keyframes it selects.
//!
//! There is one canonical representation of a direction: [`SlideDirection`].
//! JS hosts that pass directions as strings (`"from_left"`, `"from_right"`) or
//! numbers (`0`, `1`) convert through [`FromStr`] and
//! [`SlideDirection::from_u8`].

use std::fmt;
use std::str::FromStr;

/// Which edge the incoming panel slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideDirection {
    /// Start one panel-width to the left and move right. Used for "back".
    FromLeft,
    /// Start one panel-width to the right and move left. Used for "forward".
    FromRight,
}

/// Largest slide travel: one full panel width.
pub const MAX_SLIDE_DISTANCE_PERCENT: u16 = 100;

/// Slide the new panel in from the left edge.
pub const SLIDE_FROM_LEFT: SlideDirection = SlideDirection::FromLeft;
/// Slide the new panel in from the right edge.
pub const SLIDE_FROM_RIGHT: SlideDirection = SlideDirection::FromRight;

impl SlideDirection {
    /// Stable string label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FromLeft => "from_left",
            Self::FromRight => "from_right",
        }
    }

    /// Numeric code used by JS callers.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::FromLeft => 0,
            Self::FromRight => 1,
        }
    }

    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::FromLeft),
            1 => Some(Self::FromRight),
            _ => None,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::FromLeft => Self::FromRight,
            Self::FromRight => Self::FromLeft,
        }
    }

    /// Keyframes for this direction with the given travel distance (percent of
    /// the panel's own width). Distances above
    /// [`MAX_SLIDE_DISTANCE_PERCENT`] are clamped to it.
    #[must_use]
    pub const fn keyframes(self, distance_percent: u16) -> SlideKeyframes {
        let clamped = if distance_percent > MAX_SLIDE_DISTANCE_PERCENT {
            MAX_SLIDE_DISTANCE_PERCENT
        } else {
            distance_percent
        };
        let distance = clamped as i16;
        let from_percent = match self {
            Self::FromLeft => -distance,
            Self::FromRight => distance,
        };
        SlideKeyframes {
            from_percent,
            to_percent: 0,
        }
    }
}

impl fmt::Display for SlideDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized direction label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError(pub String);

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown slide direction: {:?}", self.0)
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for SlideDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "from_left" | "left" => Ok(Self::FromLeft),
            "from_right" | "right" => Ok(Self::FromRight),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// A two-frame horizontal translation, in percent of the element's width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideKeyframes {
    pub from_percent: i16,
    pub to_percent: i16,
}

impl SlideKeyframes {
    /// CSS `transform` values for the first and last keyframe.
    #[must_use]
    pub fn css_transforms(&self) -> [String; 2] {
        [
            translate_x(self.from_percent),
            translate_x(self.to_percent),
        ]
    }

    /// Offset at normalized progress `t` (clamped to `[0, 1]`), linear.
    #[must_use]
    pub fn offset_at(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let from = f32::from(self.from_percent);
        let to = f32::from(self.to_percent);
        from + (to - from) * t
    }
}

fn translate_x(percent: i16) -> String {
    if percent == 0 {
        "translateX(0)".to_string()
    } else {
        format!("translateX({percent}%)")
    }
}
