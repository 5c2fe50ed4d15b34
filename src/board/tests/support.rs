//! Shared fixtures for board unit tests.

use crate::board::domain::{
    Priority, ProjectId, Task, TaskDraft, TaskStatus, TaskTitle, ordering::MovePlan,
};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::atomic::{AtomicI64, Ordering};

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct TestClock {
    millis: AtomicI64,
}

impl TestClock {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(instant.timestamp_millis()),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.millis
            .fetch_add(delta.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::at(start_instant())
    }
}

impl Clock for TestClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn title(value: &str) -> TaskTitle {
    TaskTitle::new(value).expect("test titles are non-empty")
}

/// Builds a task; advances the clock so creation order is strict.
pub fn task(
    clock: &TestClock,
    project_id: ProjectId,
    name: &str,
    status: TaskStatus,
    position: usize,
) -> Task {
    clock.advance(TimeDelta::seconds(1));
    let mut draft = TaskDraft::new(project_id, title(name));
    draft.status = status;
    Task::new(draft, position, clock)
}

pub fn task_with_priority(
    clock: &TestClock,
    name: &str,
    priority: Priority,
    position: usize,
) -> Task {
    clock.advance(TimeDelta::seconds(1));
    let mut draft = TaskDraft::new(ProjectId::new(), title(name));
    draft.priority = priority;
    Task::new(draft, position, clock)
}

/// Applies a plan's placements the way the board service does.
pub fn apply_plan(tasks: &mut [Task], plan: &MovePlan, clock: &TestClock) {
    for placement in &plan.changes {
        if let Some(task) = tasks.iter_mut().find(|task| task.id() == placement.task_id) {
            task.place(placement.status, placement.position, clock);
        }
    }
}

/// Titles of `status`'s column in manual order, with their positions.
pub fn column(tasks: &[Task], status: TaskStatus) -> Vec<(String, usize)> {
    let mut entries: Vec<&Task> = tasks.iter().filter(|task| task.status() == status).collect();
    entries.sort_by_key(|task| task.position());
    entries
        .into_iter()
        .map(|task| (task.title().as_str().to_owned(), task.position()))
        .collect()
}

pub fn positions_are_dense(tasks: &[Task]) -> bool {
    TaskStatus::ALL.into_iter().all(|status| {
        let mut positions: Vec<usize> = tasks
            .iter()
            .filter(|task| task.status() == status)
            .map(Task::position)
            .collect();
        positions.sort_unstable();
        let expected: Vec<usize> = (0..positions.len()).collect();
        positions == expected
    })
}
