//! Background music playback.
//!
//! The track is decoded up front from a WAV file (hound) into interleaved
//! `f32` samples and streamed to the default output device (cpal). The output
//! stream is built lazily on the first play request so a missing device only
//! shows up as a blocked play, never as a startup failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample, Stream, StreamConfig};

use super::{AudioSink, PlayOutcome};

/// Decoded PCM track.
#[derive(Debug, Clone)]
pub struct Track {
    /// Interleaved samples in [-1, 1]
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl Track {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to open music file {}", path.display()))?;
        let spec = reader.spec();
        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        if spec.channels == 0 {
            anyhow::bail!("Music file {} has no channels", path.display());
        }
        tracing::debug!(
            path = %path.display(),
            channels = spec.channels,
            sample_rate = spec.sample_rate,
            frames = samples.len() / spec.channels as usize,
            "music track decoded"
        );
        Ok(Self::from_samples(samples, spec.channels, spec.sample_rate))
    }

    pub fn from_samples(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples,
            channels: channels.max(1),
            sample_rate,
        }
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Sample for output channel `channel` of source frame `frame`. Mono is
    /// duplicated to every output channel; extra output channels reuse the last
    /// source channel.
    fn sample(&self, frame: usize, channel: usize) -> f32 {
        let src_channel = channel.min(self.channels as usize - 1);
        self.samples
            .get(frame * self.channels as usize + src_channel)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Read position in the track, advanced by the audio callback.
struct Cursor {
    track: Arc<Track>,
    position: f64,
    step: f64,
    looping: bool,
}

impl Cursor {
    fn new(track: Arc<Track>, output_rate: u32, looping: bool) -> Self {
        let step = if output_rate == 0 {
            1.0
        } else {
            track.sample_rate as f64 / output_rate as f64
        };
        Self {
            track,
            position: 0.0,
            step,
            looping,
        }
    }

    /// Fill one interleaved output buffer. Nearest-frame resampling.
    fn fill<T>(&mut self, data: &mut [T], out_channels: usize, volume: f32)
    where
        T: SizedSample + FromSample<f32>,
    {
        let frames = self.track.frames();
        for out_frame in data.chunks_mut(out_channels) {
            let mut src = self.position as usize;
            if src >= frames && self.looping && frames > 0 {
                self.position -= frames as f64;
                src = self.position as usize;
            }
            for (channel, sample) in out_frame.iter_mut().enumerate() {
                let value = if src < frames {
                    self.track.sample(src, channel) * volume
                } else {
                    0.0
                };
                *sample = T::from_sample(value);
            }
            if src < frames {
                self.position += self.step;
            }
        }
    }
}

/// [`AudioSink`] for the deck's background track.
pub struct MusicPlayer {
    source: Option<PathBuf>,
    track: Option<Arc<Track>>,
    load_error: Option<String>,
    looping: bool,
    volume: Arc<AtomicU32>,
    stream: Option<Stream>,
}

impl MusicPlayer {
    /// Decode `path` if given. A decode failure is remembered and reported as a
    /// blocked play rather than aborting startup.
    pub fn new(path: Option<&Path>, looping: bool) -> Self {
        let (track, load_error) = match path.map(Track::load) {
            Some(Ok(track)) => (Some(Arc::new(track)), None),
            Some(Err(e)) => {
                tracing::warn!("{e:#}");
                (None, Some(format!("{e:#}")))
            }
            None => (None, None),
        };
        Self {
            source: path.map(Path::to_path_buf),
            track,
            load_error,
            looping,
            volume: Arc::new(AtomicU32::new(1.0_f32.to_bits())),
            stream: None,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_deref()
    }

    fn build_stream(&self, track: Arc<Track>) -> Result<Stream> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("No audio output device found"))?;
        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();

        tracing::debug!(
            device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            ?sample_format,
            "opening audio output"
        );

        match sample_format {
            SampleFormat::F32 => self.build_typed::<f32>(&device, &config, track),
            SampleFormat::I16 => self.build_typed::<i16>(&device, &config, track),
            SampleFormat::U16 => self.build_typed::<u16>(&device, &config, track),
            SampleFormat::I32 => self.build_typed::<i32>(&device, &config, track),
            other => anyhow::bail!("Unsupported output sample format {other:?}"),
        }
    }

    fn build_typed<T>(
        &self,
        device: &cpal::Device,
        config: &StreamConfig,
        track: Arc<Track>,
    ) -> Result<Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let channels = config.channels as usize;
        let mut cursor = Cursor::new(track, config.sample_rate.0, self.looping);
        let volume = Arc::clone(&self.volume);
        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let vol = f32::from_bits(volume.load(Ordering::Relaxed));
                cursor.fill(data, channels, vol);
            },
            |err| {
                tracing::error!("Audio stream error: {}", err);
            },
            None,
        )?;
        Ok(stream)
    }
}

impl AudioSink for MusicPlayer {
    fn play(&mut self, volume: f32) -> PlayOutcome {
        self.volume
            .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);

        if self.stream.is_none() {
            let Some(track) = self.track.clone() else {
                let reason = self
                    .load_error
                    .clone()
                    .unwrap_or_else(|| "no music configured".to_string());
                return PlayOutcome::Blocked(reason);
            };
            match self.build_stream(track) {
                Ok(stream) => self.stream = Some(stream),
                Err(e) => return PlayOutcome::Blocked(format!("{e:#}")),
            }
        }

        match self.stream.as_ref().map(StreamTrait::play) {
            Some(Ok(())) => PlayOutcome::Started,
            Some(Err(e)) => {
                // Drop the stream so the next attempt rebuilds it from scratch
                self.stream = None;
                PlayOutcome::Blocked(e.to_string())
            }
            None => PlayOutcome::Blocked("audio stream unavailable".to_string()),
        }
    }

    fn pause(&mut self) {
        if let Some(stream) = &self.stream {
            if let Err(e) = stream.pause() {
                tracing::warn!("Failed to pause music: {e}");
            }
        }
    }
}
