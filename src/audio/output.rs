use anyhow::Context;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use super::tap::TapSource;
use crate::error::LoadError;

/// Where played audio goes. One source plays at a time; `play` replaces
/// whatever was playing.
pub trait AudioOutput {
    fn play(&mut self, source: TapSource) -> anyhow::Result<()>;
    fn halt(&mut self);
}

/// The default sound device, one fresh `Sink` per start.
pub struct RodioOutput {
    _stream: OutputStream, // must stay alive for audio to keep playing
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl RodioOutput {
    pub fn open() -> Result<Self, LoadError> {
        let (_stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream,
            handle,
            sink: None,
        })
    }
}

impl AudioOutput for RodioOutput {
    fn play(&mut self, source: TapSource) -> anyhow::Result<()> {
        self.halt();
        let sink = Sink::try_new(&self.handle).context("Failed to create audio sink")?;
        sink.append(source);
        self.sink = Some(sink);
        Ok(())
    }

    fn halt(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

/// Output driven by hand: tests decide how many samples get "played".
#[cfg(test)]
#[derive(Default)]
pub struct ManualOutput {
    pub source: Option<TapSource>,
    pub plays: usize,
    pub refuse: bool,
}

#[cfg(test)]
impl ManualOutput {
    /// Plays up to `n` samples, returns how many were available.
    pub fn pull(&mut self, n: usize) -> usize {
        match self.source.as_mut() {
            Some(source) => source.by_ref().take(n).count(),
            None => 0,
        }
    }
}

#[cfg(test)]
impl AudioOutput for ManualOutput {
    fn play(&mut self, source: TapSource) -> anyhow::Result<()> {
        if self.refuse {
            anyhow::bail!("output refused to play");
        }
        self.plays += 1;
        self.source = Some(source);
        Ok(())
    }

    fn halt(&mut self) {
        self.source = None;
    }
}
