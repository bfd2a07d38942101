//! Tracking screen view model.

use wraptrack_core::{StepId, StepStatus};
use wraptrack_progress::ProgressTracker;
use crate::content::Disclosure;

/// One step card.
#[derive(Debug, Clone, PartialEq)]
pub struct StepCard {
    /// Step id
    pub id: StepId,
    /// 1-based position
    pub position: usize,
    /// Title
    pub title: String,
    /// Status
    pub status: StepStatus,
    /// Minutes shown on the card
    pub minutes: u32,
    /// Description, only when the card is expanded
    pub details: Option<String>,
    /// Number of attached images
    pub images: usize,
    /// Number of attached videos
    pub videos: usize,
}

/// Everything the tracking screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingView {
    /// Exact percentage for the progress bar
    pub percent: f64,
    /// Rounded percentage for the label
    pub label: String,
    /// Cards in step order
    pub cards: Vec<StepCard>,
}

impl TrackingView {
    /// Build the view from a tracker and the current card expansion.
    pub fn build(tracker: &ProgressTracker, expansion: &Disclosure<StepId>) -> Self {
        let percent = tracker.progress_percent();
        let cards = tracker
            .steps_view()
            .into_iter()
            .enumerate()
            .map(|(i, step)| StepCard {
                id: step.id,
                position: i + 1,
                minutes: step.display_minutes(),
                images: step.images().count(),
                videos: step.videos().count(),
                details: expansion
                    .is_expanded(&step.id)
                    .then(|| step.description.clone()),
                title: step.title,
                status: step.status,
            })
            .collect();

        Self {
            percent,
            label: format!("Overall progress: {}%", percent.round() as u32),
            cards,
        }
    }
}

/// Text bar of `width` cells, e.g. `[######----]`.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Single-character status marker.
pub fn status_marker(status: StepStatus) -> char {
    match status {
        StepStatus::Pending => ' ',
        StepStatus::InProgress => '~',
        StepStatus::Completed => 'x',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wraptrack_progress::sample_tracker;

    #[test]
    fn test_sample_view() {
        let tracker = sample_tracker().unwrap();
        let mut expansion = Disclosure::new();
        let second = tracker.step_at(1).unwrap().id;
        expansion.toggle(second);

        let view = TrackingView::build(&tracker, &expansion);
        assert_eq!(view.label, "Overall progress: 30%");
        assert_eq!(view.cards.len(), 5);
        assert_eq!(view.cards[0].minutes, 55);
        assert_eq!(view.cards[0].images, 2);
        assert!(view.cards[0].details.is_none());
        assert_eq!(view.cards[1].details.as_deref(), Some("準備貼膜材料，確認尺寸和裁切"));
        assert_eq!(view.cards[2].minutes, 180);
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 10), "[----------]");
        assert_eq!(progress_bar(30.0, 10), "[###-------]");
        assert_eq!(progress_bar(100.0, 4), "[####]");
        assert_eq!(progress_bar(150.0, 4), "[####]");
    }
}
