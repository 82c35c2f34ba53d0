//! Scoped background tasks
//!
//! Every timer, observer loop and scroll subscription a component starts is
//! spawned into that component's [`TaskScope`]. Tearing the scope down (or
//! dropping it) aborts all of them together.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::JoinSet;
use tracing::debug;

/// Lock a mutex, recovering the guard if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A named set of tasks released together
pub struct TaskScope {
    name: &'static str,
    tasks: JoinSet<()>,
    torn_down: bool,
}

impl TaskScope {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tasks: JoinSet::new(),
            torn_down: false,
        }
    }

    /// Spawn a task owned by this scope.
    ///
    /// Must be called from within a tokio runtime. Spawning into a scope
    /// that was already torn down is a no-op.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.torn_down {
            debug!(scope = self.name, "Ignoring spawn on torn-down scope");
            return;
        }
        // Reap finished tasks so long-lived scopes don't accumulate results
        while self.tasks.try_join_next().is_some() {}
        self.tasks.spawn(task);
    }

    /// Abort tasks without closing the scope (used when inputs change and
    /// the subscriptions are about to be re-created)
    pub fn reset(&mut self) {
        self.tasks.abort_all();
        while self.tasks.try_join_next().is_some() {}
    }

    /// Abort every task and close the scope.
    ///
    /// Returns `false` when the scope was already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        self.tasks.abort_all();
        debug!(scope = self.name, "Scope torn down");
        true
    }

    #[inline]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Number of tasks still tracked (finished tasks are counted until reaped)
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl std::fmt::Debug for TaskScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScope")
            .field("name", &self.name)
            .field("tasks", &self.tasks.len())
            .field("torn_down", &self.torn_down)
            .finish()
    }
}
