use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::task::TaskScope;

use super::gate::{GateOptions, VisibilityGate};
use super::observer::IntersectionSource;

/// The "active section" signal behind navigation highlighting.
///
/// Navigation writes it directly on link clicks; sections registered with
/// [`ActiveSection::track`] write it whenever they scroll into view.
pub struct ActiveSection {
    active_tx: Arc<watch::Sender<String>>,
    gates: Vec<VisibilityGate>,
    scope: TaskScope,
}

impl ActiveSection {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            active_tx: Arc::new(watch::Sender::new(initial.into())),
            gates: Vec::new(),
            scope: TaskScope::new("active-section"),
        }
    }

    /// Report `name` as active every time `target` turns visible
    pub fn track(
        &mut self,
        source: &dyn IntersectionSource,
        name: &str,
        target: &str,
        ratio: f64,
        fallback: Duration,
    ) {
        if self.scope.is_torn_down() {
            return;
        }

        let gate = VisibilityGate::observe(source, target, GateOptions::live(ratio), fallback);
        let mut visible_rx = gate.subscribe();
        let active_tx = Arc::clone(&self.active_tx);
        let name = name.to_string();

        self.scope.spawn(async move {
            while visible_rx.changed().await.is_ok() {
                let visible = *visible_rx.borrow_and_update();
                if visible {
                    debug!(section = %name, "Section entered view");
                    set_if_changed(&active_tx, &name);
                }
            }
        });
        self.gates.push(gate);
    }

    /// Set the active section; returns whether it changed
    pub fn set(&self, name: &str) -> bool {
        set_if_changed(&self.active_tx, name)
    }

    pub fn current(&self) -> String {
        self.active_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.active_tx.subscribe()
    }

    pub fn tracked(&self) -> usize {
        self.gates.len()
    }

    /// Stop every section gate. Returns `false` if already torn down.
    pub fn teardown(&mut self) -> bool {
        if !self.scope.teardown() {
            return false;
        }
        for gate in &mut self.gates {
            gate.teardown();
        }
        true
    }
}

fn set_if_changed(tx: &watch::Sender<String>, name: &str) -> bool {
    tx.send_if_modified(|current| {
        if current == name {
            return false;
        }
        *current = name.to_string();
        true
    })
}
