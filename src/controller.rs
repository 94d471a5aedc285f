//! Play/stop control and the per-frame analysis loop.
//!
//! All transitions go through [`PlaybackController::handle`]; the window
//! only forwards clicks, load results and frame ticks as [`ControlEvent`]s.

use tracing::{debug, info};

use crate::analysis::{MapperConfig, map_to_grid};
use crate::audio::{AudioOutput, AudioPipeline, DecodedTrack, PlaybackState};
use crate::error::LoadError;
use crate::grid::Grid;

pub const LABEL_LOADING: &str = "Loading…";
pub const LABEL_PLAY: &str = "Play";
pub const LABEL_STOP: &str = "Stop";
pub const LABEL_ERROR: &str = "Error loading audio";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlState {
    Disabled,
    Ready,
    Playing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug)]
pub enum ControlEvent {
    LoadStarted,
    Loaded(Result<DecodedTrack, LoadError>),
    /// The play/stop button was clicked.
    Activate,
    TrackEnded,
    /// The display is ready for the next frame.
    Frame,
}

/// The next-frame request. At most one is pending; cancelling it guarantees
/// no further frame work until a new one is scheduled.
#[derive(Debug, Default)]
pub struct FrameLoop {
    pending: Option<u64>,
    issued: u64,
}

impl FrameLoop {
    pub fn schedule(&mut self) -> u64 {
        self.issued += 1;
        self.pending = Some(self.issued);
        self.issued
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Consumes the pending request, if any.
    fn take(&mut self) -> Option<u64> {
        self.pending.take()
    }
}

/// Everything one run of the app mutates, created at start-up.
pub struct Session<O: AudioOutput> {
    pub grid: Grid,
    pub pipeline: AudioPipeline<O>,
    pub mapper: MapperConfig,
}

impl<O: AudioOutput> Session<O> {
    pub fn new(grid: Grid, pipeline: AudioPipeline<O>) -> Self {
        Self {
            grid,
            pipeline,
            mapper: MapperConfig::default(),
        }
    }
}

pub struct PlaybackController<O: AudioOutput> {
    state: ControlState,
    button: Button,
    frames: FrameLoop,
    session: Session<O>,
}

impl<O: AudioOutput> PlaybackController<O> {
    pub fn new(session: Session<O>) -> Self {
        Self {
            state: ControlState::Disabled,
            button: Button {
                label: LABEL_LOADING,
                enabled: false,
            },
            frames: FrameLoop::default(),
            session,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn button(&self) -> &Button {
        &self.button
    }

    pub fn session(&self) -> &Session<O> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<O> {
        &mut self.session
    }

    pub fn frames(&self) -> &FrameLoop {
        &self.frames
    }

    /// Called once per display frame: reports a finished track first, then
    /// runs the pending frame if there is one.
    pub fn tick(&mut self) {
        if self.session.pipeline.has_ended() {
            self.handle(ControlEvent::TrackEnded);
        }
        if self.frames.is_scheduled() {
            self.handle(ControlEvent::Frame);
        }
    }

    pub fn handle(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::LoadStarted => self.session.pipeline.begin_loading(),
            ControlEvent::Loaded(result) => self.on_loaded(result),
            ControlEvent::Activate => match self.state {
                ControlState::Disabled => debug!("button is disabled, ignoring activation"),
                ControlState::Ready => self.play(),
                ControlState::Playing => {
                    self.session.pipeline.stop();
                    self.to_ready();
                }
            },
            ControlEvent::TrackEnded => {
                if self.state == ControlState::Playing && self.session.pipeline.finish() {
                    self.to_ready();
                }
            }
            ControlEvent::Frame => self.on_frame(),
        }
    }

    fn on_loaded(&mut self, result: Result<DecodedTrack, LoadError>) {
        if self.session.pipeline.state() != PlaybackState::Loading {
            debug!("load result arrived outside of loading, ignoring");
            return;
        }
        match self.session.pipeline.finish_loading(result) {
            Ok(()) => {
                self.state = ControlState::Ready;
                self.button = Button {
                    label: LABEL_PLAY,
                    enabled: true,
                };
            }
            Err(_) => {
                self.state = ControlState::Disabled;
                self.button = Button {
                    label: LABEL_ERROR,
                    enabled: false,
                };
            }
        }
    }

    fn play(&mut self) {
        if !self.session.pipeline.start() {
            return;
        }
        self.state = ControlState::Playing;
        self.button.label = LABEL_STOP;
        info!("Starting frequency analysis");
        self.run_frame();
    }

    fn on_frame(&mut self) {
        if self.state != ControlState::Playing || self.frames.take().is_none() {
            return;
        }
        self.run_frame();
    }

    fn run_frame(&mut self) {
        let Session {
            grid,
            pipeline,
            mapper,
        } = &mut self.session;
        map_to_grid(pipeline.snapshot(), grid, mapper);
        self.frames.schedule();
    }

    fn to_ready(&mut self) {
        self.frames.cancel();
        info!("Stopped frequency analysis");
        self.session.grid.reset_all();
        self.state = ControlState::Ready;
        self.button.label = LABEL_PLAY;
    }
}
