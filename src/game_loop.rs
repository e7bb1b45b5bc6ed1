//! Fixed-cadence simulation thread
//!
//! The simulation state moves onto a dedicated thread and is never touched
//! from outside again. The input side only writes atomic flags for held
//! controls or queues lifecycle commands, pause and resume included, so they
//! apply in the order sent. Both are read at the top of an iteration, never
//! mid-tick. Frames and game over events come back over channels.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::{FrameState, GameOverEvent, SimulationState, TickInput, Viewport, clamp_dt, tick};

/// Frames buffered for a slow consumer before new ones are dropped
const FRAME_QUEUE_DEPTH: usize = 2;

/// Lifecycle commands, applied between ticks in the order sent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopCommand {
    Launch,
    Reset,
    Pause,
    Resume,
    Resize { width: f32, height: f32 },
}

/// Flags written by the input side, read once per iteration
#[derive(Debug, Default)]
struct SharedInput {
    running: AtomicBool,
    climb: AtomicBool,
    dive: AtomicBool,
}

/// Handle to a running simulation thread
pub struct GameLoop {
    shared: Arc<SharedInput>,
    tx_cmd: Sender<LoopCommand>,
    rx_frame: Receiver<FrameState>,
    rx_game_over: Receiver<GameOverEvent>,
    thread: Option<JoinHandle<SimulationState>>,
}

impl GameLoop {
    /// Move `state` onto a new simulation thread and start ticking at 60 Hz
    pub fn start(state: SimulationState) -> Result<Self, SimError> {
        let (tx_cmd, rx_cmd) = mpsc::channel::<LoopCommand>();
        let (tx_frame, rx_frame) = mpsc::sync_channel::<FrameState>(FRAME_QUEUE_DEPTH);
        let (tx_game_over, rx_game_over) = mpsc::channel::<GameOverEvent>();

        let shared = Arc::new(SharedInput::default());
        shared.running.store(true, Ordering::Release);

        let thread_shared = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name("folded-flight-sim".to_string())
            .spawn(move || run(state, thread_shared, rx_cmd, tx_frame, tx_game_over))?;

        log::info!("Simulation thread started");
        Ok(Self {
            shared,
            tx_cmd,
            rx_frame,
            rx_game_over,
            thread: Some(thread),
        })
    }

    /// Hold or release climb. Pressing climb releases dive.
    pub fn set_climb_pressed(&self, pressed: bool) {
        self.shared.climb.store(pressed, Ordering::Relaxed);
        if pressed {
            self.shared.dive.store(false, Ordering::Relaxed);
        }
    }

    /// Hold or release dive. Pressing dive releases climb.
    pub fn set_dive_pressed(&self, pressed: bool) {
        self.shared.dive.store(pressed, Ordering::Relaxed);
        if pressed {
            self.shared.climb.store(false, Ordering::Relaxed);
        }
    }

    pub fn pause(&self) -> bool {
        self.send(LoopCommand::Pause)
    }

    pub fn resume(&self) -> bool {
        self.send(LoopCommand::Resume)
    }

    pub fn send(&self, cmd: LoopCommand) -> bool {
        self.tx_cmd.send(cmd).is_ok()
    }

    pub fn launch(&self) -> bool {
        self.send(LoopCommand::Launch)
    }

    pub fn reset(&self) -> bool {
        self.send(LoopCommand::Reset)
    }

    /// Queue a screen size change; bad sizes are rejected here
    pub fn resize(&self, width: f32, height: f32) -> Result<bool, SimError> {
        Viewport::new(width, height).validate()?;
        Ok(self.send(LoopCommand::Resize { width, height }))
    }

    /// Oldest undelivered frame, if any
    pub fn try_recv_frame(&self) -> Option<FrameState> {
        self.rx_frame.try_recv().ok()
    }

    /// Drain the frame queue and keep only the newest frame
    pub fn latest_frame(&self) -> Option<FrameState> {
        self.rx_frame.try_iter().last()
    }

    pub fn recv_frame_timeout(&self, timeout: Duration) -> Option<FrameState> {
        self.rx_frame.recv_timeout(timeout).ok()
    }

    pub fn try_recv_game_over(&self) -> Option<GameOverEvent> {
        self.rx_game_over.try_recv().ok()
    }

    pub fn recv_game_over_timeout(&self, timeout: Duration) -> Option<GameOverEvent> {
        self.rx_game_over.recv_timeout(timeout).ok()
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop ticking and wait for the current tick to finish. Returns the
    /// final state the first time; later calls are no-ops.
    pub fn stop(&mut self) -> Option<SimulationState> {
        let thread = self.thread.take()?;
        self.shared.running.store(false, Ordering::Release);
        match thread.join() {
            Ok(state) => {
                log::info!("Simulation thread stopped");
                Some(state)
            }
            Err(_) => {
                log::error!("Simulation thread panicked");
                None
            }
        }
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

fn apply_command(state: &mut SimulationState, shared: &SharedInput, cmd: LoopCommand) {
    match cmd {
        LoopCommand::Launch => {
            if let Err(err) = state.launch() {
                log::warn!("Ignored launch: {}", err);
            }
        }
        LoopCommand::Reset => {
            state.reset();
            // Reset leaves nothing held
            shared.climb.store(false, Ordering::Relaxed);
            shared.dive.store(false, Ordering::Relaxed);
        }
        LoopCommand::Pause => state.pause(),
        LoopCommand::Resume => state.resume(),
        LoopCommand::Resize { width, height } => {
            if let Err(err) = state.on_resize(width, height) {
                log::warn!("Ignored resize: {}", err);
            }
        }
    }
}

fn run(
    mut state: SimulationState,
    shared: Arc<SharedInput>,
    rx_cmd: Receiver<LoopCommand>,
    tx_frame: SyncSender<FrameState>,
    tx_game_over: Sender<GameOverEvent>,
) -> SimulationState {
    let frame_time = Duration::from_secs_f32(FRAME_DT);
    let mut last_frame = Instant::now();

    while shared.running.load(Ordering::Acquire) {
        let frame_start = Instant::now();

        loop {
            match rx_cmd.try_recv() {
                Ok(cmd) => apply_command(&mut state, &shared, cmd),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    shared.running.store(false, Ordering::Release);
                    break;
                }
            }
        }

        if state.is_paused() {
            // Keep the clock current so resuming never sees the paused span
            last_frame = frame_start;
        }

        let dt = clamp_dt(frame_start.duration_since(last_frame).as_secs_f32());
        last_frame = frame_start;

        let input = TickInput::held(
            shared.climb.load(Ordering::Relaxed),
            shared.dive.load(Ordering::Relaxed),
        );
        if let Some(event) = tick(&mut state, &input, dt) {
            let _ = tx_game_over.send(event);
        }

        match tx_frame.try_send(state.frame()) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("Frame consumer gone");
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }

    state
}
