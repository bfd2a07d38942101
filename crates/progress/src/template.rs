//! Workflow templates - the step lists a new job starts from.

use serde::{Deserialize, Serialize};
use wraptrack_core::{MediaRef, Result, Step, StepStatus};
use crate::tracker::ProgressTracker;

/// One step definition in a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateStep {
    /// Step title
    pub title: String,

    /// Description
    pub description: String,

    /// Estimated duration in minutes
    pub estimated_duration: u32,
}

/// An ordered list of step definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    /// Template name
    pub name: String,

    /// Steps in order
    pub steps: Vec<TemplateStep>,
}

impl WorkflowTemplate {
    /// Create an empty template.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Add a step.
    pub fn step(
        mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        estimated_duration: u32,
    ) -> Self {
        self.steps.push(TemplateStep {
            title: title.into(),
            description: description.into(),
            estimated_duration,
        });
        self
    }

    /// The standard car wrap service.
    pub fn car_wrap() -> Self {
        Self::new("car-wrap")
            .step("車輛檢查和清潔", "詳細檢查車輛狀況，進行深層清潔", 60)
            .step("貼膜準備", "準備貼膜材料，確認尺寸和裁切", 45)
            .step("貼膜施工", "專業施工貼膜過程", 180)
            .step("品質檢查", "全面檢查貼膜品質", 30)
            .step("完工展示", "最終成果展示和客戶確認", 20)
    }

    /// Fresh pending steps with new ids.
    pub fn instantiate(&self) -> Vec<Step> {
        self.steps
            .iter()
            .map(|s| Step::new(&s.title, &s.description, s.estimated_duration))
            .collect()
    }

    /// Build a tracker from this template.
    pub fn tracker(&self) -> Result<ProgressTracker> {
        ProgressTracker::new(self.instantiate())
    }
}

/// The demo job shown by the tracking screen: inspection done, prep under way.
pub fn sample_tracker() -> Result<ProgressTracker> {
    let mut steps = WorkflowTemplate::car_wrap().instantiate().into_iter();
    let mut seeded = Vec::new();

    if let Some(first) = steps.next() {
        seeded.push(
            first
                .with_status(StepStatus::Completed)
                .with_actual_duration(55)
                .with_media([MediaRef::image("inspection1.jpg"), MediaRef::image("cleaning1.jpg")]),
        );
    }
    if let Some(second) = steps.next() {
        seeded.push(
            second
                .with_status(StepStatus::InProgress)
                .with_media([MediaRef::image("preparation1.jpg")]),
        );
    }
    seeded.extend(steps);

    ProgressTracker::new(seeded)
}
