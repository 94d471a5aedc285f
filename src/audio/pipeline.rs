use std::path::Path;
use tracing::{error, info, warn};

use super::output::AudioOutput;
use super::tap::{self, TapReader};
use super::track::{self, DecodedTrack};
use crate::analysis::{FFT_SIZE, FrequencyAnalyser};
use crate::error::LoadError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Loading,
    Ready,
    Playing,
    Stopped,
    Error,
}

/// Owns the decoded track, the playing source and the analysis stage.
/// Calls made in the wrong state are no-ops.
pub struct AudioPipeline<O: AudioOutput> {
    state: PlaybackState,
    output: Option<O>,
    track: Option<DecodedTrack>,
    reader: Option<TapReader>,
    analyser: FrequencyAnalyser,
    window: Vec<f32>,
    snapshot: Vec<u8>,
}

impl<O: AudioOutput> AudioPipeline<O> {
    pub fn new() -> Self {
        let analyser = FrequencyAnalyser::new(FFT_SIZE);
        let bins = analyser.bin_count();
        Self {
            state: PlaybackState::Idle,
            output: None,
            track: None,
            reader: None,
            analyser,
            window: Vec::with_capacity(FFT_SIZE),
            snapshot: vec![0; bins],
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn output(&self) -> Option<&O> {
        self.output.as_ref()
    }

    pub fn output_mut(&mut self) -> Option<&mut O> {
        self.output.as_mut()
    }

    pub fn attach_output(&mut self, output: O) {
        self.output = Some(output);
    }

    pub fn begin_loading(&mut self) {
        if self.state == PlaybackState::Idle {
            self.state = PlaybackState::Loading;
        }
    }

    /// Takes the outcome of a load started with `begin_loading`.
    pub fn finish_loading(&mut self, result: Result<DecodedTrack, LoadError>) -> Result<(), LoadError> {
        match result {
            Ok(track) => {
                info!(
                    sample_rate = track.sample_rate,
                    channels = track.channels,
                    duration_sec = %format!("{:.1}", track.duration_sec),
                    bins = self.analyser.bin_count(),
                    "Audio loaded successfully"
                );
                self.track = Some(track);
                self.state = PlaybackState::Ready;
                Ok(())
            }
            Err(e) => {
                error!("Error loading audio: {e}");
                self.state = PlaybackState::Error;
                Err(e)
            }
        }
    }

    /// Fetches and decodes on the calling thread.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        self.begin_loading();
        self.finish_loading(track::load(path))
    }

    /// Plays the track from the beginning through the analysis stage.
    /// Returns whether playback actually started.
    pub fn start(&mut self) -> bool {
        if !matches!(self.state, PlaybackState::Ready | PlaybackState::Stopped) {
            return false;
        }
        let (Some(track), Some(output)) = (self.track.as_ref(), self.output.as_mut()) else {
            return false;
        };

        let (source, reader) = tap::tap(track, FFT_SIZE);
        if let Err(e) = output.play(source) {
            warn!("Could not start playback: {e:#}");
            return false;
        }

        self.reader = Some(reader);
        self.state = PlaybackState::Playing;
        info!("Playback started");
        true
    }

    /// Halts the playing source immediately.
    pub fn stop(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.halt();
        info!("Playback stopped");
        true
    }

    /// True while playing once the source has run dry.
    pub fn has_ended(&self) -> bool {
        self.is_playing() && self.reader.as_ref().is_some_and(TapReader::has_ended)
    }

    /// Moves a naturally finished playback to `Stopped`.
    pub fn finish(&mut self) -> bool {
        if !self.has_ended() {
            return false;
        }
        self.halt();
        info!("Playback ended");
        true
    }

    /// Refreshes the byte spectrum from what has been played so far. Outside
    /// `Playing` the last snapshot (all zeros after a stop) is returned as is.
    pub fn snapshot(&mut self) -> &[u8] {
        if let (PlaybackState::Playing, Some(reader)) = (self.state, self.reader.as_mut()) {
            reader.read_window(&mut self.window, FFT_SIZE);
            self.analyser.process(&self.window, &mut self.snapshot);
        }
        &self.snapshot
    }

    fn halt(&mut self) {
        if let Some(output) = self.output.as_mut() {
            output.halt();
        }
        self.reader = None;
        self.analyser.reset();
        self.snapshot.fill(0);
        self.state = PlaybackState::Stopped;
    }
}

impl<O: AudioOutput> Default for AudioPipeline<O> {
    fn default() -> Self {
        Self::new()
    }
}
