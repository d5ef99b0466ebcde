//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note card record shared by store, layout and
//!   persistence.
//! - Provide validated value types for priority and color.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `width` and `height` are never below `MIN_NOTE_SIZE`.
//! - `priority` is always within `1..=5`; out-of-range values are
//!   unrepresentable.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Smallest width/height a note may ever have, in pixels.
pub const MIN_NOTE_SIZE: f64 = 200.0;
/// Size used for new notes when the caller does not supply one.
pub const DEFAULT_NOTE_SIZE: f64 = 200.0;

/// Stable identifier for one note card.
pub type NoteId = Uuid;

/// Validation failures for note input and persisted records.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteValidationError {
    /// Priority outside `1..=5`.
    PriorityOutOfRange(i64),
    /// Color name not in the palette.
    UnknownColor(String),
    /// Geometry contains NaN or infinite values.
    NonFiniteGeometry,
    /// Width or height below the minimum size.
    BelowMinimumSize { width: f64, height: f64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PriorityOutOfRange(value) => {
                write!(f, "priority {value} is outside the allowed range 1..=5")
            }
            Self::UnknownColor(value) => write!(f, "unknown note color `{value}`"),
            Self::NonFiniteGeometry => write!(f, "note geometry must be finite"),
            Self::BelowMinimumSize { width, height } => write!(
                f,
                "note size {width}x{height} is below the minimum {MIN_NOTE_SIZE}x{MIN_NOTE_SIZE}"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// Palette of note colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    #[default]
    Yellow,
    Pink,
    Blue,
    Green,
    Orange,
}

impl NoteColor {
    /// All palette entries in display order.
    pub const ALL: [NoteColor; 5] = [
        NoteColor::Yellow,
        NoteColor::Pink,
        NoteColor::Blue,
        NoteColor::Green,
        NoteColor::Orange,
    ];

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Pink => "pink",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Orange => "orange",
        }
    }
}

impl Display for NoteColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteColor {
    type Err = NoteValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == normalized)
            .ok_or_else(|| NoteValidationError::UnknownColor(value.to_string()))
    }
}

/// Stacking priority. `1` renders on top, `5` at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(1);
    pub const LOWEST: Priority = Priority(5);
    /// Priority assigned to freshly created notes.
    pub const DEFAULT: Priority = Priority(3);

    /// Returns `None` when `value` is outside `1..=5`.
    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for Priority {
    type Error = NoteValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Priority::new)
            .ok_or(NoteValidationError::PriorityOutOfRange(value))
    }
}

impl From<Priority> for i64 {
    fn from(value: Priority) -> Self {
        i64::from(value.0)
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One sticky note card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Free text body.
    pub content: String,
    pub color: NoteColor,
    pub priority: Priority,
    /// Derived stacking order; see `layout::layering`.
    pub z_index: i64,
}

impl Note {
    /// Creates a note with a generated id and default attributes.
    ///
    /// `z_index` starts at zero; the store assigns the real value.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::with_id(Uuid::new_v4(), x, y, width, height)
    }

    /// Creates a note with a caller-provided id.
    pub fn with_id(id: NoteId, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            content: String::new(),
            color: NoteColor::default(),
            priority: Priority::default(),
            z_index: 0,
        }
    }

    /// Checks geometry invariants of a record coming from outside the store.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|value| value.is_finite());
        if !finite {
            return Err(NoteValidationError::NonFiniteGeometry);
        }
        if self.width < MIN_NOTE_SIZE || self.height < MIN_NOTE_SIZE {
            return Err(NoteValidationError::BelowMinimumSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Partial update applied by `NoteStore::update`.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub content: Option<String>,
    pub color: Option<NoteColor>,
    pub priority: Option<Priority>,
}

impl NotePatch {
    /// Patch moving the note to `(x, y)`.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch replacing the full geometry.
    pub fn geometry(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn color(color: NoteColor) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    pub fn priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Self::default()
        }
    }

    /// Returns whether the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
