//! Step model - one unit of work in a service workflow.

use serde::{Deserialize, Serialize};
use crate::id::StepId;

/// A step is one discrete stage of a service job (inspection, installation, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Unique identifier
    pub id: StepId,

    /// Step title
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Current status
    pub status: StepStatus,

    /// Estimated duration in minutes
    pub estimated_duration: u32,

    /// Actual duration in minutes, only present once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<u32>,

    /// Attached media, in upload order
    #[serde(default)]
    pub media_refs: Vec<MediaRef>,
}

impl Step {
    /// Create a new pending step.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        estimated_duration: u32,
    ) -> Self {
        Self {
            id: StepId::new(),
            title: title.into(),
            description: description.into(),
            status: StepStatus::Pending,
            estimated_duration,
            actual_duration: None,
            media_refs: Vec::new(),
        }
    }

    /// Seed the step with a status (used when a job is created mid-way).
    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    /// Seed the actual duration of a completed step.
    pub fn with_actual_duration(mut self, minutes: u32) -> Self {
        self.actual_duration = Some(minutes);
        self
    }

    /// Seed attached media.
    pub fn with_media(mut self, media: impl IntoIterator<Item = MediaRef>) -> Self {
        self.media_refs.extend(media);
        self
    }

    /// Minutes to show for this step: actual when known, otherwise the estimate.
    pub fn display_minutes(&self) -> u32 {
        self.actual_duration.unwrap_or(self.estimated_duration)
    }

    /// Check if the step is completed.
    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }

    /// Iterate over attached images.
    pub fn images(&self) -> impl Iterator<Item = &MediaRef> {
        self.media_refs.iter().filter(|m| m.kind == MediaKind::Image)
    }

    /// Iterate over attached videos.
    pub fn videos(&self) -> impl Iterator<Item = &MediaRef> {
        self.media_refs.iter().filter(|m| m.kind == MediaKind::Video)
    }
}

/// Step status. Steps only move forward: Pending -> InProgress -> Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Not started yet
    Pending,
    /// Currently being worked on
    InProgress,
    /// Done (terminal)
    Completed,
}

impl StepStatus {
    /// The status that follows this one, if any.
    pub fn next(self) -> Option<StepStatus> {
        match self {
            StepStatus::Pending => Some(StepStatus::InProgress),
            StepStatus::InProgress => Some(StepStatus::Completed),
            StepStatus::Completed => None,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of attached media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Photo
    Image,
    /// Video clip
    Video,
}

/// Opaque reference to a photo or video resolved by an external asset loader.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaRef {
    /// Media kind
    pub kind: MediaKind,

    /// Opaque identifier (file name, object key, ...)
    pub id: String,
}

impl MediaRef {
    /// Reference an image.
    pub fn image(id: impl Into<String>) -> Self {
        Self { kind: MediaKind::Image, id: id.into() }
    }

    /// Reference a video.
    pub fn video(id: impl Into<String>) -> Self {
        Self { kind: MediaKind::Video, id: id.into() }
    }
}
