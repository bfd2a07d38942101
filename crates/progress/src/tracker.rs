//! Progress tracking for a single service job.

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use wraptrack_core::{
    JobId, JobRecord, MediaRef, Result, Step, StepId, StepStatus, TrackerError, TrackerPolicy,
};

/// Owns the ordered steps of one job and governs their status transitions.
///
/// The step list is fixed at construction. Statuses only move forward, and a
/// failed operation leaves the tracker untouched. There is no internal
/// locking: a tracker has a single writer, callers sharing one across tasks
/// must wrap it in a mutex themselves.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    steps: Vec<Step>,
    index: HashMap<StepId, usize>,
    staged: HashMap<StepId, u32>,
    policy: TrackerPolicy,
}

/// A snapshot of progress at a point in time.
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    /// When snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Overall percentage (0-100)
    pub percentage: f64,

    /// Completed steps
    pub completed: usize,

    /// Steps in progress
    pub in_progress: usize,

    /// Steps not started
    pub pending: usize,

    /// Steps in creation order
    pub steps: Vec<Step>,
}

impl ProgressTracker {
    /// Create a tracker with the default policy.
    pub fn new(steps: Vec<Step>) -> Result<Self> {
        Self::with_policy(steps, TrackerPolicy::default())
    }

    /// Create a tracker with an explicit policy.
    ///
    /// Steps may be seeded in any status; after this point only forward
    /// transitions are possible.
    pub fn with_policy(steps: Vec<Step>, policy: TrackerPolicy) -> Result<Self> {
        if steps.is_empty() {
            return Err(TrackerError::EmptyWorkflow);
        }

        let mut index = HashMap::with_capacity(steps.len());
        for (position, step) in steps.iter().enumerate() {
            validate_seed(step)?;
            if index.insert(step.id, position).is_some() {
                return Err(TrackerError::DuplicateStep(step.id));
            }
        }

        Ok(Self {
            steps,
            index,
            staged: HashMap::new(),
            policy,
        })
    }

    /// Rebuild a tracker from a stored job record.
    pub fn from_record(record: &JobRecord) -> Result<Self> {
        let mut tracker = Self::with_policy(record.steps.clone(), record.policy)?;
        for &(id, minutes) in &record.staged_durations {
            let step = tracker.step(id).ok_or(TrackerError::UnknownStep(id))?;
            if step.status != StepStatus::InProgress {
                return Err(TrackerError::InvalidStep {
                    id,
                    reason: format!("duration recorded while {}", step.status),
                });
            }
            if minutes == 0 {
                return Err(TrackerError::InvalidDuration(0));
            }
            tracker.staged.insert(id, minutes);
        }
        Ok(tracker)
    }

    /// Build a new job record holding the tracker state.
    pub fn into_record(self, id: JobId, label: impl Into<String>) -> JobRecord {
        let now = Utc::now();
        let mut record = JobRecord {
            id,
            label: label.into(),
            policy: self.policy,
            steps: Vec::new(),
            staged_durations: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.write_record(&mut record);
        record
    }

    /// Write the tracker state into an existing job record.
    pub fn write_record(&self, record: &mut JobRecord) {
        record.policy = self.policy;
        record.steps = self.steps_view();
        let mut staged: Vec<(StepId, u32)> =
            self.staged.iter().map(|(id, minutes)| (*id, *minutes)).collect();
        staged.sort_by_key(|(id, _)| self.index[id]);
        record.staged_durations = staged;
        record.updated_at = Utc::now();
    }

    /// Move a step to its next status.
    ///
    /// Completing a step without a recorded duration uses its estimate.
    pub fn advance(&mut self, id: StepId) -> Result<()> {
        let position = self.position(id)?;
        let from = self.steps[position].status;
        let to = from.next().ok_or(TrackerError::TerminalState(id))?;
        validate_transition(id, from, to, self.policy)?;
        if to == StepStatus::Completed {
            self.finish(position, None);
        } else {
            self.steps[position].status = to;
        }
        Ok(())
    }

    /// Complete a step in one call, optionally supplying its actual duration.
    ///
    /// A pending step can only be completed directly when the policy allows it.
    pub fn complete(&mut self, id: StepId, actual_minutes: Option<i64>) -> Result<()> {
        let position = self.position(id)?;
        let minutes = actual_minutes.map(positive_minutes).transpose()?;
        validate_transition(id, self.steps[position].status, StepStatus::Completed, self.policy)?;
        self.finish(position, minutes);
        Ok(())
    }

    /// Record the actual duration of an in-progress step.
    ///
    /// The value is held until the step completes, so `actual_duration` stays
    /// empty on unfinished steps.
    pub fn set_actual_duration(&mut self, id: StepId, minutes: i64) -> Result<()> {
        let position = self.position(id)?;
        let minutes = positive_minutes(minutes)?;
        // Only a step whose next move is completion can carry a duration.
        validate_transition(
            id,
            self.steps[position].status,
            StepStatus::Completed,
            TrackerPolicy::default(),
        )?;
        self.staged.insert(id, minutes);
        Ok(())
    }

    /// Append a media reference to a step.
    pub fn attach_media(&mut self, id: StepId, media: MediaRef) -> Result<()> {
        let position = self.position(id)?;
        self.steps[position].media_refs.push(media);
        Ok(())
    }

    /// Overall completion: `(completed + 0.5 * in_progress) / total * 100`.
    ///
    /// In-progress steps earn half credit regardless of their estimates.
    pub fn progress_percent(&self) -> f64 {
        let (_, in_progress, completed) = self.counts();
        let credit = completed as f64 + 0.5 * in_progress as f64;
        credit / self.steps.len() as f64 * 100.0
    }

    /// Copy of the steps in creation order.
    pub fn steps_view(&self) -> Vec<Step> {
        self.steps.clone()
    }

    /// Take a progress snapshot.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let (pending, in_progress, completed) = self.counts();
        ProgressSnapshot {
            timestamp: Utc::now(),
            percentage: self.progress_percent(),
            completed,
            in_progress,
            pending,
            steps: self.steps_view(),
        }
    }

    /// Look up a step by id.
    pub fn step(&self, id: StepId) -> Option<&Step> {
        self.index.get(&id).map(|&position| &self.steps[position])
    }

    /// Look up a step by its zero-based position.
    pub fn step_at(&self, position: usize) -> Option<&Step> {
        self.steps.get(position)
    }

    /// First step that is not completed yet.
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.iter().find(|s| !s.is_completed())
    }

    /// Duration recorded for an in-progress step, if any.
    pub fn staged_duration(&self, id: StepId) -> Option<u32> {
        self.staged.get(&id).copied()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: a tracker holds at least one step.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check if every step is completed.
    pub fn is_finished(&self) -> bool {
        self.steps.iter().all(Step::is_completed)
    }

    /// Tracker configuration.
    pub fn policy(&self) -> TrackerPolicy {
        self.policy
    }

    fn position(&self, id: StepId) -> Result<usize> {
        self.index.get(&id).copied().ok_or(TrackerError::UnknownStep(id))
    }

    fn finish(&mut self, position: usize, minutes: Option<u32>) {
        let id = self.steps[position].id;
        let staged = self.staged.remove(&id);
        let step = &mut self.steps[position];
        step.actual_duration = Some(minutes.or(staged).unwrap_or(step.estimated_duration));
        step.status = StepStatus::Completed;
    }

    fn counts(&self) -> (usize, usize, usize) {
        self.steps.iter().fold((0, 0, 0), |(p, i, c), step| match step.status {
            StepStatus::Pending => (p + 1, i, c),
            StepStatus::InProgress => (p, i + 1, c),
            StepStatus::Completed => (p, i, c + 1),
        })
    }
}

fn positive_minutes(minutes: i64) -> Result<u32> {
    if minutes <= 0 {
        return Err(TrackerError::InvalidDuration(minutes));
    }
    u32::try_from(minutes).map_err(|_| TrackerError::InvalidDuration(minutes))
}

fn validate_seed(step: &Step) -> Result<()> {
    if step.estimated_duration == 0 {
        return Err(TrackerError::InvalidDuration(0));
    }
    match step.actual_duration {
        Some(0) => Err(TrackerError::InvalidDuration(0)),
        Some(_) if step.status != StepStatus::Completed => Err(TrackerError::InvalidStep {
            id: step.id,
            reason: format!("actual duration set while {}", step.status),
        }),
        _ => Ok(()),
    }
}

/// Check that a status change respects the forward-only machine.
pub fn validate_transition(
    id: StepId,
    from: StepStatus,
    to: StepStatus,
    policy: TrackerPolicy,
) -> Result<()> {
    match (from, to) {
        (StepStatus::Completed, _) => Err(TrackerError::TerminalState(id)),
        (StepStatus::Pending, StepStatus::InProgress)
        | (StepStatus::InProgress, StepStatus::Completed) => Ok(()),
        (StepStatus::Pending, StepStatus::Completed) if policy.allow_direct_completion => Ok(()),
        _ => Err(TrackerError::InvalidTransition { id, from, to }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn steps_with(statuses: &[StepStatus]) -> Vec<Step> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                let step = Step::new(format!("Step {}", i + 1), "", 30).with_status(*status);
                if *status == StepStatus::Completed {
                    step.with_actual_duration(25)
                } else {
                    step
                }
            })
            .collect()
    }

    fn pending(n: usize) -> ProgressTracker {
        ProgressTracker::new(steps_with(&vec![StepStatus::Pending; n])).unwrap()
    }

    #[test]
    fn test_progress_half_credit() {
        use StepStatus::*;
        let tracker = ProgressTracker::new(steps_with(&[
            Completed, InProgress, Pending, Pending, Pending,
        ]))
        .unwrap();
        assert!((tracker.progress_percent() - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_advance_twice_completes_step() {
        let mut tracker = pending(3);
        let id = tracker.step_at(0).unwrap().id;

        tracker.advance(id).unwrap();
        assert_eq!(tracker.step(id).unwrap().status, StepStatus::InProgress);
        assert!((tracker.progress_percent() - 50.0 / 3.0).abs() < EPSILON);

        tracker.advance(id).unwrap();
        let step = tracker.step(id).unwrap();
        assert_eq!(step.status, StepStatus::Completed);
        assert_eq!(step.actual_duration, Some(30));
        assert!((tracker.progress_percent() - 100.0 / 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_percent_bounds() {
        let mut tracker = pending(4);
        assert_eq!(tracker.progress_percent(), 0.0);

        let ids: Vec<StepId> = tracker.steps_view().iter().map(|s| s.id).collect();
        for id in &ids {
            tracker.advance(*id).unwrap();
            let p = tracker.progress_percent();
            assert!(p > 0.0 && p < 100.0);
        }
        for id in &ids {
            tracker.advance(*id).unwrap();
        }
        assert!((tracker.progress_percent() - 100.0).abs() < EPSILON);
        assert!(tracker.is_finished());
    }

    #[test]
    fn test_advance_completed_is_terminal() {
        let mut tracker = ProgressTracker::new(steps_with(&[StepStatus::Completed])).unwrap();
        let id = tracker.step_at(0).unwrap().id;
        let before = tracker.steps_view();

        for _ in 0..3 {
            assert_eq!(tracker.advance(id), Err(TrackerError::TerminalState(id)));
        }
        assert_eq!(tracker.steps_view(), before);
    }

    #[test]
    fn test_unknown_step_leaves_state() {
        let mut tracker = pending(2);
        let before = tracker.steps_view();
        let stranger = StepId::new();

        assert_eq!(tracker.advance(stranger), Err(TrackerError::UnknownStep(stranger)));
        assert_eq!(
            tracker.set_actual_duration(stranger, 10),
            Err(TrackerError::UnknownStep(stranger))
        );
        assert_eq!(tracker.steps_view(), before);
    }

    #[test]
    fn test_actual_duration_absent_until_completed() {
        let mut tracker = pending(1);
        let id = tracker.step_at(0).unwrap().id;

        tracker.advance(id).unwrap();
        tracker.set_actual_duration(id, 42).unwrap();
        assert_eq!(tracker.step(id).unwrap().actual_duration, None);
        assert_eq!(tracker.staged_duration(id), Some(42));

        tracker.advance(id).unwrap();
        assert_eq!(tracker.step(id).unwrap().actual_duration, Some(42));
        assert_eq!(tracker.staged_duration(id), None);
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let mut tracker = pending(1);
        let id = tracker.step_at(0).unwrap().id;
        tracker.advance(id).unwrap();
        let before = tracker.steps_view();

        assert_eq!(tracker.set_actual_duration(id, 0), Err(TrackerError::InvalidDuration(0)));
        assert_eq!(tracker.set_actual_duration(id, -5), Err(TrackerError::InvalidDuration(-5)));
        assert_eq!(tracker.steps_view(), before);
        assert_eq!(tracker.staged_duration(id), None);
    }

    #[test]
    fn test_set_duration_requires_in_progress() {
        let mut tracker = ProgressTracker::new(steps_with(&[
            StepStatus::Pending,
            StepStatus::Completed,
        ]))
        .unwrap();
        let first = tracker.step_at(0).unwrap().id;
        let second = tracker.step_at(1).unwrap().id;

        assert!(matches!(
            tracker.set_actual_duration(first, 10),
            Err(TrackerError::InvalidTransition { .. })
        ));
        assert_eq!(
            tracker.set_actual_duration(second, 10),
            Err(TrackerError::TerminalState(second))
        );
        assert_eq!(tracker.step(second).unwrap().actual_duration, Some(25));
    }

    #[test]
    fn test_direct_completion_follows_policy() {
        let mut strict = pending(1);
        let id = strict.step_at(0).unwrap().id;
        assert_eq!(
            strict.complete(id, None),
            Err(TrackerError::InvalidTransition {
                id,
                from: StepStatus::Pending,
                to: StepStatus::Completed,
            })
        );
        assert_eq!(strict.step(id).unwrap().status, StepStatus::Pending);

        let mut lenient =
            ProgressTracker::with_policy(steps_with(&[StepStatus::Pending]), TrackerPolicy::permissive())
                .unwrap();
        let id = lenient.step_at(0).unwrap().id;
        lenient.complete(id, Some(12)).unwrap();
        assert_eq!(lenient.step(id).unwrap().actual_duration, Some(12));
    }

    #[test]
    fn test_complete_with_duration_overrides_staged() {
        let mut tracker = pending(1);
        let id = tracker.step_at(0).unwrap().id;
        tracker.advance(id).unwrap();
        tracker.set_actual_duration(id, 20).unwrap();

        assert_eq!(tracker.complete(id, Some(0)), Err(TrackerError::InvalidDuration(0)));
        assert_eq!(tracker.step(id).unwrap().status, StepStatus::InProgress);

        tracker.complete(id, Some(35)).unwrap();
        assert_eq!(tracker.step(id).unwrap().actual_duration, Some(35));
    }

    #[test]
    fn test_steps_view_is_a_copy() {
        let mut tracker = pending(2);
        let mut view = tracker.steps_view();
        view[0].status = StepStatus::Completed;
        view[0].title.push_str(" (edited)");

        assert_eq!(tracker.step_at(0).unwrap().status, StepStatus::Pending);
        assert_eq!(tracker.step_at(0).unwrap().title, "Step 1");

        let id = tracker.step_at(0).unwrap().id;
        tracker.advance(id).unwrap();
        assert_eq!(view[1].status, StepStatus::Pending);
    }

    #[test]
    fn test_construction_validation() {
        assert_eq!(ProgressTracker::new(vec![]).unwrap_err(), TrackerError::EmptyWorkflow);

        let step = Step::new("A", "", 10);
        let dup = step.clone();
        assert_eq!(
            ProgressTracker::new(vec![step, dup.clone()]).unwrap_err(),
            TrackerError::DuplicateStep(dup.id)
        );

        let zero = Step::new("B", "", 0);
        assert_eq!(ProgressTracker::new(vec![zero]).unwrap_err(), TrackerError::InvalidDuration(0));

        let early = Step::new("C", "", 10).with_actual_duration(8);
        assert!(matches!(
            ProgressTracker::new(vec![early]),
            Err(TrackerError::InvalidStep { .. })
        ));
    }

    #[test]
    fn test_attach_media_appends() {
        let mut tracker = pending(1);
        let id = tracker.step_at(0).unwrap().id;
        tracker.attach_media(id, MediaRef::image("a.jpg")).unwrap();
        tracker.attach_media(id, MediaRef::video("b.mp4")).unwrap();

        let ids: Vec<_> = tracker.step(id).unwrap().media_refs.iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids, vec!["a.jpg", "b.mp4"]);
    }

    #[test]
    fn test_record_round_trip_keeps_staged() {
        let mut tracker = pending(2);
        let id = tracker.step_at(0).unwrap().id;
        tracker.advance(id).unwrap();
        tracker.set_actual_duration(id, 17).unwrap();

        let record = tracker.clone().into_record(JobId::new(), "ABC-1234");
        assert_eq!(record.label, "ABC-1234");
        assert_eq!(record.steps, tracker.steps_view());
        assert_eq!(record.staged_durations, vec![(id, 17)]);

        let mut restored = ProgressTracker::from_record(&record).unwrap();
        restored.advance(id).unwrap();
        assert_eq!(restored.step(id).unwrap().actual_duration, Some(17));

        let mut updated = record.clone();
        restored.write_record(&mut updated);
        assert!(updated.staged_durations.is_empty());
        assert_eq!(updated.created_at, record.created_at);
    }

    #[test]
    fn test_from_record_rejects_bad_staged_durations() {
        let mut tracker = pending(2);
        let first = tracker.step_at(0).unwrap().id;
        let second = tracker.step_at(1).unwrap().id;
        tracker.advance(first).unwrap();
        let record = tracker.into_record(JobId::new(), "XYZ-9");

        let mut on_pending = record.clone();
        on_pending.staged_durations = vec![(second, 10)];
        assert!(matches!(
            ProgressTracker::from_record(&on_pending),
            Err(TrackerError::InvalidStep { id, .. }) if id == second
        ));

        let mut zero = record.clone();
        zero.staged_durations = vec![(first, 0)];
        assert_eq!(
            ProgressTracker::from_record(&zero).unwrap_err(),
            TrackerError::InvalidDuration(0)
        );

        let stranger = StepId::new();
        let mut unknown = record;
        unknown.staged_durations = vec![(stranger, 10)];
        assert_eq!(
            ProgressTracker::from_record(&unknown).unwrap_err(),
            TrackerError::UnknownStep(stranger)
        );
    }

    #[test]
    fn test_complete_completed_is_terminal() {
        let mut tracker = ProgressTracker::with_policy(
            vec![Step::new("Done", "", 30).with_status(StepStatus::Completed)],
            TrackerPolicy::permissive(),
        )
        .unwrap();
        let id = tracker.step_at(0).unwrap().id;
        let before = tracker.steps_view();

        assert_eq!(tracker.complete(id, None), Err(TrackerError::TerminalState(id)));
        assert_eq!(tracker.complete(id, Some(40)), Err(TrackerError::TerminalState(id)));
        assert_eq!(tracker.step(id).unwrap().actual_duration, None);
        assert_eq!(tracker.steps_view(), before);
    }

    #[test]
    fn test_attach_media_unknown_step() {
        let mut tracker = pending(1);
        let before = tracker.steps_view();
        let stranger = StepId::new();

        assert_eq!(
            tracker.attach_media(stranger, MediaRef::image("x.jpg")),
            Err(TrackerError::UnknownStep(stranger))
        );
        assert_eq!(tracker.steps_view(), before);
    }

    #[test]
    fn test_duration_above_u32_rejected() {
        let mut tracker = pending(1);
        let id = tracker.step_at(0).unwrap().id;
        tracker.advance(id).unwrap();

        let too_long = i64::from(u32::MAX) + 1;
        assert_eq!(
            tracker.set_actual_duration(id, too_long),
            Err(TrackerError::InvalidDuration(too_long))
        );
        assert_eq!(tracker.complete(id, Some(too_long)), Err(TrackerError::InvalidDuration(too_long)));
        assert_eq!(tracker.staged_duration(id), None);
        assert_eq!(tracker.step(id).unwrap().status, StepStatus::InProgress);

        tracker.set_actual_duration(id, i64::from(u32::MAX)).unwrap();
        assert_eq!(tracker.staged_duration(id), Some(u32::MAX));
    }

    #[test]
    fn test_validate_transition() {
        let id = StepId::new();
        let policy = TrackerPolicy::default();
        assert!(validate_transition(id, StepStatus::Pending, StepStatus::InProgress, policy).is_ok());
        assert!(validate_transition(id, StepStatus::InProgress, StepStatus::Pending, policy).is_err());
        assert!(validate_transition(id, StepStatus::Pending, StepStatus::Pending, policy).is_err());
        assert_eq!(
            validate_transition(id, StepStatus::Completed, StepStatus::Completed, policy),
            Err(TrackerError::TerminalState(id))
        );
        assert!(validate_transition(
            id,
            StepStatus::Pending,
            StepStatus::Completed,
            TrackerPolicy::permissive()
        )
        .is_ok());
    }

    #[test]
    fn test_snapshot_counts() {
        use StepStatus::*;
        let tracker = ProgressTracker::new(steps_with(&[Completed, Completed, InProgress, Pending]))
            .unwrap();
        let snapshot = tracker.snapshot();
        assert_eq!((snapshot.completed, snapshot.in_progress, snapshot.pending), (2, 1, 1));
        assert!((snapshot.percentage - 62.5).abs() < EPSILON);
        assert_eq!(snapshot.steps, tracker.steps_view());
        assert_eq!(tracker.current_step().unwrap().id, tracker.step_at(2).unwrap().id);
    }
}
