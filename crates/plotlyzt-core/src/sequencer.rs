//! Timed multi-stage intro sequencing
//!
//! The sequencer only owns timing and the stage cursor; what each stage looks
//! like is up to whoever renders [`StageProgress`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::Ignored;
use crate::task::{lock, TaskScope};

/// One named, fixed-length stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub name: String,
    pub duration: Duration,
}

impl Stage {
    pub fn new(name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            duration: Duration::from_millis(duration_ms),
        }
    }
}

/// Ordered stages with a forward-only cursor and a terminal flag
#[derive(Debug, Clone)]
pub struct StageSequence {
    stages: Vec<Stage>,
    current: usize,
    completed: bool,
}

impl StageSequence {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self {
            stages,
            current: 0,
            completed: false,
        }
    }

    /// The running stage, `None` once completed (or if there are no stages)
    pub fn current(&self) -> Option<&Stage> {
        if self.completed {
            return None;
        }
        self.stages.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    /// Move to the next stage. Returns `false` when the current stage was
    /// the last one; the cursor never moves past the end.
    pub fn advance(&mut self) -> bool {
        if self.completed || self.current + 1 >= self.stages.len() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Mark completed. Returns `false` if it already was.
    pub fn complete(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        true
    }
}

/// How a sequence came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Exhausted,
    Skipped,
}

/// Snapshot published on every stage change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageProgress {
    pub index: usize,
    pub name: Option<String>,
    pub completed: bool,
}

impl StageProgress {
    fn of(sequence: &StageSequence) -> Self {
        Self {
            index: sequence.current_index(),
            name: sequence.current().map(|s| s.name.clone()),
            completed: sequence.is_completed(),
        }
    }
}

/// Result of a skip request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipOutcome {
    Completed,
    Ignored(Ignored),
}

type OnComplete = Box<dyn FnOnce(Completion) + Send>;

struct SequencerState {
    sequence: StageSequence,
    on_complete: Option<OnComplete>,
    torn_down: bool,
}

struct Inner {
    name: &'static str,
    state: Mutex<SequencerState>,
    progress: watch::Sender<StageProgress>,
}

impl Inner {
    /// Duration of the running stage, if the sequence is still live
    fn current_duration(&self) -> Option<Duration> {
        let state = lock(&self.state);
        if state.torn_down {
            return None;
        }
        state.sequence.current().map(|s| s.duration)
    }

    fn advance(&self) -> bool {
        let mut state = lock(&self.state);
        if state.torn_down || !state.sequence.advance() {
            return false;
        }
        let progress = StageProgress::of(&state.sequence);
        drop(state);

        debug!(sequence = self.name, stage = ?progress.name, "Stage started");
        self.progress.send_replace(progress);
        true
    }

    /// The single completion path for both exhaustion and skip
    fn finish(&self, how: Completion) -> bool {
        let mut state = lock(&self.state);
        if state.torn_down || !state.sequence.complete() {
            return false;
        }
        let callback = state.on_complete.take();
        let progress = StageProgress::of(&state.sequence);
        drop(state);

        info!(sequence = self.name, ?how, "Sequence completed");
        self.progress.send_replace(progress);
        if let Some(callback) = callback {
            callback(how);
        }
        true
    }
}

/// Runs stages in order and fires the completion callback exactly once
pub struct StageSequencer {
    inner: Arc<Inner>,
    started_at: Instant,
    scope: TaskScope,
}

impl StageSequencer {
    /// Start running `stages` immediately. `on_complete` is invoked when the
    /// last stage ends or on the first [`skip`](Self::skip), whichever comes
    /// first, and never after [`teardown`](Self::teardown).
    pub fn run<F>(name: &'static str, stages: Vec<Stage>, on_complete: F) -> Self
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        let sequence = StageSequence::new(stages);
        let progress = watch::Sender::new(StageProgress::of(&sequence));
        debug!(
            sequence = name,
            stages = sequence.len(),
            total_ms = sequence.total_duration().as_millis() as u64,
            "Sequence started"
        );

        let inner = Arc::new(Inner {
            name,
            state: Mutex::new(SequencerState {
                sequence,
                on_complete: Some(Box::new(on_complete)),
                torn_down: false,
            }),
            progress,
        });

        let mut scope = TaskScope::new(name);
        scope.spawn(drive(Arc::clone(&inner)));

        Self {
            inner,
            started_at: Instant::now(),
            scope,
        }
    }

    /// End the sequence now through the normal completion path
    pub fn skip(&mut self) -> SkipOutcome {
        if !self.inner.finish(Completion::Skipped) {
            debug!(sequence = self.inner.name, "Skip ignored");
            return SkipOutcome::Ignored(Ignored::RedundantTransition);
        }
        self.scope.reset();
        SkipOutcome::Completed
    }

    /// Cancel pending stage timers without completing.
    ///
    /// Returns `false` if already torn down.
    pub fn teardown(&mut self) -> bool {
        if !self.scope.teardown() {
            return false;
        }
        let mut state = lock(&self.inner.state);
        state.torn_down = true;
        state.on_complete = None;
        true
    }

    pub fn is_completed(&self) -> bool {
        lock(&self.inner.state).sequence.is_completed()
    }

    pub fn progress(&self) -> StageProgress {
        self.inner.progress.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StageProgress> {
        self.inner.progress.subscribe()
    }

    /// Time since the sequence started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

async fn drive(inner: Arc<Inner>) {
    while let Some(delay) = inner.current_duration() {
        tokio::time::sleep(delay).await;
        if !inner.advance() {
            break;
        }
    }
    inner.finish(Completion::Exhausted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn abc() -> Vec<Stage> {
        vec![
            Stage::new("A", 1000),
            Stage::new("B", 1000),
            Stage::new("C", 1000),
        ]
    }

    struct Recorder {
        calls: Arc<AtomicUsize>,
        fired_at: Arc<Mutex<Option<(Instant, Completion)>>>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                fired_at: Arc::new(Mutex::new(None)),
            }
        }

        fn callback(&self) -> impl FnOnce(Completion) + Send + 'static {
            let calls = self.calls.clone();
            let fired_at = self.fired_at.clone();
            move |how| {
                calls.fetch_add(1, Ordering::SeqCst);
                *fired_at.lock().unwrap() = Some((Instant::now(), how));
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn fired(&self) -> Option<(Instant, Completion)> {
            *self.fired_at.lock().unwrap()
        }
    }

    #[test]
    fn test_sequence_cursor_moves_forward_only() {
        let mut seq = StageSequence::new(abc());
        assert_eq!(seq.current().unwrap().name, "A");
        assert!(seq.advance());
        assert!(seq.advance());
        assert_eq!(seq.current_index(), 2);
        assert!(!seq.advance());
        assert_eq!(seq.current_index(), 2);
        assert!(seq.complete());
        assert!(!seq.complete());
        assert!(seq.current().is_none());
        assert_eq!(seq.total_duration(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_natural_completion_after_all_stages() {
        let recorder = Recorder::new();
        let start = Instant::now();
        let sequencer = StageSequencer::run("test", abc(), recorder.callback());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(recorder.calls(), 0);
        assert_eq!(sequencer.progress().name.as_deref(), Some("C"));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(recorder.calls(), 1);
        let (at, how) = recorder.fired().unwrap();
        assert_eq!(how, Completion::Exhausted);
        assert!(at - start >= Duration::from_millis(3000));
        assert!(sequencer.is_completed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_completes_once_at_skip_time() {
        let recorder = Recorder::new();
        let start = Instant::now();
        let mut sequencer = StageSequencer::run("test", abc(), recorder.callback());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(sequencer.skip(), SkipOutcome::Completed);

        let (at, how) = recorder.fired().unwrap();
        assert_eq!(how, Completion::Skipped);
        let elapsed = at - start;
        assert!(elapsed >= Duration::from_millis(500) && elapsed < Duration::from_millis(600));

        assert_eq!(
            sequencer.skip(),
            SkipOutcome::Ignored(Ignored::RedundantTransition)
        );
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(recorder.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_without_callback() {
        let recorder = Recorder::new();
        let mut sequencer = StageSequencer::run("test", abc(), recorder.callback());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(sequencer.teardown());
        assert!(!sequencer.teardown());

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(recorder.calls(), 0);
        assert!(matches!(sequencer.skip(), SkipOutcome::Ignored(_)));
        assert_eq!(recorder.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_reports_each_stage() {
        let recorder = Recorder::new();
        let sequencer = StageSequencer::run("test", abc(), recorder.callback());
        let mut rx = sequencer.subscribe();

        let mut seen = vec![rx.borrow_and_update().name.clone()];
        while rx.changed().await.is_ok() {
            let progress = rx.borrow_and_update().clone();
            if progress.completed {
                break;
            }
            seen.push(progress.name);
        }
        let names: Vec<_> = seen.into_iter().flatten().collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_sequence_completes_immediately() {
        let recorder = Recorder::new();
        let _sequencer = StageSequencer::run("test", Vec::new(), recorder.callback());
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(recorder.calls(), 1);
        assert_eq!(recorder.fired().unwrap().1, Completion::Exhausted);
    }
}
