use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info};

use plotlyzt_core::page::{ProcessingState, REVEALED_SECTIONS};
use plotlyzt_core::sequencer::StageProgress;
use plotlyzt_core::visibility::AnchorResolver;
use plotlyzt_core::{AppConfig, Page, PagePhase, Viewport};

pub struct TraceOptions {
    pub width: u32,
    pub height: u32,
    pub step_px: u32,
    pub frame_ms: u64,
    pub skip_intro: bool,
    pub settle_ms: u64,
}

#[derive(Serialize)]
struct TraceRecord {
    t_ms: u64,
    signal: String,
    value: Value,
}

type Change = (String, Value);

/// Merges watched page signals into one stream of named changes
struct Forwarder {
    tasks: JoinSet<()>,
    tx: mpsc::UnboundedSender<Change>,
}

impl Forwarder {
    fn new(tx: mpsc::UnboundedSender<Change>) -> Self {
        Self {
            tasks: JoinSet::new(),
            tx,
        }
    }

    /// Forward every value of `rx` (the current one first) as `signal`
    fn watch<T, F>(&mut self, signal: impl Into<String>, mut rx: watch::Receiver<T>, encode: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&T) -> Value + Send + 'static,
    {
        let signal = signal.into();
        let tx = self.tx.clone();
        self.tasks.spawn(async move {
            loop {
                let value = encode(&rx.borrow_and_update());
                if tx.send((signal.clone(), value)).is_err() {
                    return;
                }
                if rx.changed().await.is_err() {
                    return;
                }
            }
        });
    }

    /// Stop registering; the stream ends once every watched signal closes
    fn finish(self) -> JoinSet<()> {
        self.tasks
    }
}

fn emit(started: Instant, signal: String, value: Value) -> Result<()> {
    let record = TraceRecord {
        t_ms: started.elapsed().as_millis() as u64,
        signal,
        value,
    };
    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}

pub async fn run(config: Arc<AppConfig>, options: TraceOptions) -> Result<()> {
    let viewport = Viewport::new(options.width, options.height);
    let mut page = Page::mount(config.as_ref().clone(), viewport);
    let started = Instant::now();

    println!(
        "{}",
        json!({
            "generated_at": Utc::now().to_rfc3339(),
            "viewport": viewport,
            "content_height": page.tracker().content_height(),
        })
    );

    let (tx, mut rx) = mpsc::unbounded_channel::<Change>();
    let mut changes = Forwarder::new(tx);

    changes.watch("phase", page.shell().subscribe_phase(), |p: &PagePhase| json!(p));
    changes.watch("hero_visible", page.shell().subscribe_hero(), |v: &bool| json!(v));
    changes.watch("intro_stage", page.shell().subscribe_intro(), |p: &StageProgress| {
        json!({ "index": p.index, "name": p.name, "completed": p.completed })
    });
    changes.watch("scroller", page.scroller().subscribe(), |h| {
        json!(h.as_ref().map(ToString::to_string))
    });
    changes.watch("active_section", page.nav().subscribe_active(), |s: &String| json!(s));
    for id in REVEALED_SECTIONS {
        let gate = page.gate(id)?;
        changes.watch(format!("revealed.{}", id), gate.subscribe(), |v: &bool| json!(v));
    }
    changes.watch("flow.index", page.flow().panel_index(), |i: &usize| json!(i));
    changes.watch("flow.pinned", page.flow().pinned(), |v: &bool| json!(v));
    changes.watch("chart_view", page.chart_view().subscribe(), |v| json!(v));
    changes.watch("marking_mode", page.marking_mode().subscribe(), |v| json!(v));
    changes.watch("waveform", page.waveform().subscribe(), |v| json!(v));
    changes.watch("processing", page.processing().subscribe(), |p: &ProcessingState| json!(p));
    let mut tasks = changes.finish();

    if options.skip_intro {
        let outcome = page.shell_mut().skip_intro();
        debug!(?outcome, "Intro skip requested");
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(options.frame_ms.max(1)));
    let mut bottom_reached: Option<Instant> = None;
    info!(width = options.width, height = options.height, "Trace started");

    loop {
        tokio::select! {
            Some((signal, value)) = rx.recv() => emit(started, signal, value)?,
            _ = ticker.tick() => {
                if let Some(at) = bottom_reached {
                    if at.elapsed() >= Duration::from_millis(options.settle_ms) {
                        break;
                    }
                    continue;
                }
                if page.shell().phase() != PagePhase::Ready {
                    continue;
                }

                let tracker = page.tracker();
                let max = tracker.max_scroll();
                let y = (tracker.scroll_y() + options.step_px as f64).min(max);
                tracker.set_scroll(y);
                emit(started, "scroll_y".into(), json!(y))?;
                if y >= max {
                    bottom_reached = Some(Instant::now());
                }
            }
        }
    }

    // Drain changes already queued
    while let Ok((signal, value)) = rx.try_recv() {
        emit(started, signal, value)?;
    }
    tasks.abort_all();

    emit(started, "snapshot".into(), serde_json::to_value(page.snapshot())?)?;
    page.teardown();
    info!("Trace finished");
    Ok(())
}
