//! Project status labels and their display mapping.
//!
//! # Responsibility
//! - Own the enumerated status set offered by the project form.
//! - Map any status label to an icon/tint pair for list rows.
//!
//! # Invariants
//! - `status_icon` is total: unknown or empty input yields `StatusDisplay::DEFAULT`.
//! - `ProjectStatus::ALL` order is the dropdown order.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Lifecycle stage of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectStatus {
    Backlog,
    NotStarted,
    InProgress,
    Paused,
    InReview,
    Completed,
    Maintenance,
    Blocked,
}

impl ProjectStatus {
    /// Dropdown order; the first entry is the create-form default.
    pub const ALL: [ProjectStatus; 8] = [
        ProjectStatus::NotStarted,
        ProjectStatus::Backlog,
        ProjectStatus::InProgress,
        ProjectStatus::Paused,
        ProjectStatus::InReview,
        ProjectStatus::Completed,
        ProjectStatus::Maintenance,
        ProjectStatus::Blocked,
    ];

    /// Stored label for this status.
    pub fn label(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Paused => "Paused",
            Self::InReview => "In Review",
            Self::Completed => "Completed",
            Self::Maintenance => "Maintenance",
            Self::Blocked => "Blocked",
        }
    }

    /// Parses a stored label. Matching is exact after trimming.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Backlog" => Some(Self::Backlog),
            "Not Started" => Some(Self::NotStarted),
            "In Progress" => Some(Self::InProgress),
            "Paused" => Some(Self::Paused),
            "In Review" => Some(Self::InReview),
            "Completed" => Some(Self::Completed),
            "Maintenance" => Some(Self::Maintenance),
            "Blocked" => Some(Self::Blocked),
            _ => None,
        }
    }

    pub fn display(self) -> StatusDisplay {
        let (icon, tint) = match self {
            Self::Backlog => (Icon::CircleEllipsis, Tint::Purple),
            Self::NotStarted => (Icon::Circle, Tint::Red),
            Self::InProgress => (Icon::CircleProgress25, Tint::Yellow),
            Self::Paused => (Icon::Pause, Tint::Orange),
            Self::InReview => (Icon::CircleProgress50, Tint::Magenta),
            Self::Completed => (Icon::CircleProgress100, Tint::Green),
            Self::Maintenance => (Icon::CircleProgress75, Tint::Blue),
            Self::Blocked => (Icon::XMarkCircle, Tint::Red),
        };
        StatusDisplay {
            icon,
            color: Some(tint),
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Glyph names understood by the host icon set.
///
/// Serialized names match `Icon::name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Icon {
    #[serde(rename = "circle")]
    Circle,
    #[serde(rename = "circle-ellipsis")]
    CircleEllipsis,
    #[serde(rename = "circle-progress-25")]
    CircleProgress25,
    #[serde(rename = "circle-progress-50")]
    CircleProgress50,
    #[serde(rename = "circle-progress-75")]
    CircleProgress75,
    #[serde(rename = "circle-progress-100")]
    CircleProgress100,
    #[serde(rename = "pause")]
    Pause,
    #[serde(rename = "xmark-circle")]
    XMarkCircle,
}

impl Icon {
    pub const ALL: [Icon; 8] = [
        Icon::Circle,
        Icon::CircleEllipsis,
        Icon::CircleProgress25,
        Icon::CircleProgress50,
        Icon::CircleProgress75,
        Icon::CircleProgress100,
        Icon::Pause,
        Icon::XMarkCircle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::CircleEllipsis => "circle-ellipsis",
            Self::CircleProgress25 => "circle-progress-25",
            Self::CircleProgress50 => "circle-progress-50",
            Self::CircleProgress75 => "circle-progress-75",
            Self::CircleProgress100 => "circle-progress-100",
            Self::Pause => "pause",
            Self::XMarkCircle => "xmark-circle",
        }
    }
}

/// Tint colors understood by the host palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tint {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Magenta,
}

impl Tint {
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Magenta => "magenta",
        }
    }
}

/// Icon plus optional tint for one status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusDisplay {
    pub icon: Icon,
    pub color: Option<Tint>,
}

impl StatusDisplay {
    /// Plain circle without tint, used for empty and unknown labels.
    pub const DEFAULT: StatusDisplay = StatusDisplay {
        icon: Icon::Circle,
        color: None,
    };
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Maps a status label to its display pair. Never fails.
pub fn status_icon(status: &str) -> StatusDisplay {
    ProjectStatus::from_label(status)
        .map(ProjectStatus::display)
        .unwrap_or(StatusDisplay::DEFAULT)
}
