//! Game loop controller
//!
//! A dedicated thread drives `sim::tick` at a fixed 20 ms cadence. Pointer
//! input arrives from other threads over a channel and is buffered until the
//! top of the next tick, so the simulation never reads input concurrently
//! with a write. Pause is advisory: a paused loop mutates nothing but keeps
//! its thread alive. Shutdown is cooperative: the flag is observed at the
//! top of the next tick, never mid-tick, and the observer reference is
//! released on exit.
//!
//! The loop body itself lives in `LoopCore`, which a test harness can drive
//! synchronously without any thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::consts::TICK_MS;
use crate::observer::GameObserver;
use crate::scores::ScoreStore;
use crate::sim::{
    FieldSize, GameEvent, GamePhase, GameState, PointerEvent, Renderer, TickInput, draw, tick,
};

/// Field dimension provider, read once per tick (may change between ticks)
pub trait FieldSource: Send {
    fn dimensions(&self) -> FieldSize;
}

/// Fixed dimensions for headless hosts and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedField(pub FieldSize);

impl FieldSource for FixedField {
    fn dimensions(&self) -> FieldSize {
        self.0
    }
}

/// Control messages handed to the loop thread
enum ControlMsg {
    Pointer(PointerEvent),
    Start,
}

/// One frame of the game loop, with every collaborator injected.
///
/// Owns the simulation state plus the renderer, observer, score store and
/// field source. `run_once` is the whole per-frame protocol; the thread in
/// `GameLoop` just calls it on a timer.
pub struct LoopCore {
    pub state: GameState,
    renderer: Box<dyn Renderer + Send>,
    observer: Option<Box<dyn GameObserver>>,
    store: Box<dyn ScoreStore>,
    field_source: Box<dyn FieldSource>,
}

impl LoopCore {
    pub fn new(
        seed: u64,
        renderer: Box<dyn Renderer + Send>,
        observer: Box<dyn GameObserver>,
        store: Box<dyn ScoreStore>,
        field_source: Box<dyn FieldSource>,
    ) -> Self {
        let field = field_source.dimensions();
        let mut state = GameState::new(seed, field);
        state.best_score = store.high_score();
        Self {
            state,
            renderer,
            observer: Some(observer),
            store,
            field_source,
        }
    }

    /// Advance one frame: apply a queued start request, tick with the
    /// buffered input, forward events, run the game-over store transaction,
    /// and hand the frame's render commands to the renderer.
    pub fn run_once(&mut self, pointer: Vec<PointerEvent>, start_requested: bool) {
        if start_requested && self.state.phase == GamePhase::NotStarted {
            self.state.start_round();
        }

        let mut input = TickInput::new(self.field_source.dimensions());
        input.pointer = pointer;
        tick(&mut self.state, &input);

        for event in self.state.take_events() {
            if let GameEvent::GameOver { score } = event {
                self.finalize_round(score);
            }
            if let Some(observer) = self.observer.as_mut() {
                observer.notify(&event);
            }
        }

        let commands = draw(&self.state);
        self.renderer.render(&commands);
    }

    /// Persist the round's score iff it beats the stored best, then refresh
    /// the best-score mirror for the game-over panel
    fn finalize_round(&mut self, score: u32) {
        if self.store.is_new_best(score) {
            if let Err(err) = self.store.store(score) {
                log::warn!("failed to persist best score: {err}");
            }
        }
        self.state.best_score = self.store.high_score();
    }

    /// Drop the observer reference; later notifications are silently skipped
    fn release(&mut self) {
        self.observer = None;
    }
}

/// Handle to the running loop thread
pub struct GameLoop {
    control_tx: Sender<ControlMsg>,
    paused: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl GameLoop {
    /// Start the dedicated tick thread
    pub fn spawn(core: LoopCore) -> Self {
        let (control_tx, control_rx) = mpsc::channel();
        let paused = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));

        let thread_paused = Arc::clone(&paused);
        let thread_shutdown = Arc::clone(&shutdown);
        let handle = thread::spawn(move || {
            run_loop(core, control_rx, thread_paused, thread_shutdown);
        });

        Self {
            control_tx,
            paused,
            shutdown,
            handle: Some(handle),
        }
    }

    /// Start a round while idle; a synonym for a tap on the splash screen
    pub fn start(&self) {
        let _ = self.control_tx.send(ControlMsg::Start);
    }

    /// Hand a pointer event to the loop; consumed at the next tick
    pub fn on_pointer(&self, event: PointerEvent) {
        let _ = self.control_tx.send(ControlMsg::Pointer(event));
    }

    /// Suspend ticking without resetting state. Idempotent.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Resume ticking. Idempotent; a no-op while not paused.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Request a cooperative stop and wait for the thread to exit
    pub fn shutdown(mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_loop(
    mut core: LoopCore,
    control_rx: Receiver<ControlMsg>,
    paused: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
) {
    let budget = Duration::from_millis(TICK_MS);
    while !shutdown.load(Ordering::SeqCst) {
        let frame_start = Instant::now();

        if paused.load(Ordering::SeqCst) {
            // Advisory pause: no mutation, thread stays warm for resume
            thread::sleep(budget);
            continue;
        }

        let mut pointer = Vec::new();
        let mut start_requested = false;
        while let Ok(msg) = control_rx.try_recv() {
            match msg {
                ControlMsg::Pointer(event) => pointer.push(event),
                ControlMsg::Start => start_requested = true,
            }
        }

        core.run_once(pointer, start_requested);

        // An overrun gets no idle gap before the next tick; no catch-up
        let elapsed = frame_start.elapsed();
        if elapsed < budget {
            thread::sleep(budget - elapsed);
        }
    }
    core.release();
    log::info!("game loop stopped");
}
