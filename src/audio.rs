//! One-shot sound cues.
//!
//! Every cue is synthesized once with fundsp into a sample buffer, and each
//! trigger plays a fresh copy on its own detached rodio sink, so rapid repeats
//! always start from the beginning. Audio never affects the game: when no
//! output device is available the game runs with [`Silent`].

use fundsp::prelude32::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use std::time::Duration;

const SAMPLE_RATE: u32 = 44100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Jump,
    Score,
    Hit,
    Die,
    Start,
}

impl Cue {
    pub const ALL: [Cue; 5] = [Cue::Jump, Cue::Score, Cue::Hit, Cue::Die, Cue::Start];

    fn index(self) -> usize {
        self as usize
    }
}

/// Fire-and-forget cue playback.
pub trait Audio {
    fn play(&mut self, cue: Cue);
    /// Schedule a cue. It plays even if the session that asked for it is over
    /// by then; playback has no way back into game state.
    fn play_after(&mut self, cue: Cue, delay: Duration);
}

#[derive(Debug, Default)]
pub struct Silent;

impl Audio for Silent {
    fn play(&mut self, _cue: Cue) {}
    fn play_after(&mut self, _cue: Cue, _delay: Duration) {}
}

pub struct SynthAudio {
    stream: OutputStream,
    bank: Vec<Vec<f32>>,
}

impl SynthAudio {
    pub fn open() -> Option<Self> {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("No audio output available: {}", e);
                return None;
            }
        };
        // The drop notice goes to stderr, which would land on the game screen.
        stream.log_on_drop(false);
        let bank = Cue::ALL.iter().map(|&cue| synthesize(cue)).collect();
        tracing::info!("Audio ready, {} cues synthesized", Cue::ALL.len());
        Some(Self { stream, bank })
    }

    fn source(&self, cue: Cue) -> SamplesBuffer {
        SamplesBuffer::new(1, SAMPLE_RATE, self.bank[cue.index()].clone())
    }

    fn append(&self, source: impl Source + Send + 'static) {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.detach();
    }
}

impl Audio for SynthAudio {
    fn play(&mut self, cue: Cue) {
        self.append(self.source(cue));
    }

    fn play_after(&mut self, cue: Cue, delay: Duration) {
        self.append(self.source(cue).delay(delay));
    }
}

/// Open the sound device unless muted, falling back to silence.
pub fn open(mute: bool) -> Box<dyn Audio> {
    if mute {
        tracing::info!("Audio muted");
        return Box::new(Silent);
    }
    match SynthAudio::open() {
        Some(audio) => Box::new(audio),
        None => Box::new(Silent),
    }
}

// ── Synthesis ───────────────────────────────────────────────────────────────

fn sweep(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

fn bake(mut unit: Box<dyn AudioUnit>, secs: f32) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let len = (SAMPLE_RATE as f32 * secs) as usize;
    (0..len).map(|_| unit.get_mono()).collect()
}

fn synthesize(cue: Cue) -> Vec<f32> {
    match cue {
        // Short upward chirp
        Cue::Jump => {
            let freq = lfo(|t: f32| sweep(500.0, 900.0, t / 0.08));
            let gain = lfo(|t: f32| sweep(0.2, 0.0, t / 0.1));
            bake(Box::new((freq >> sine()) * gain), 0.1)
        }
        // Two-tone coin blip
        Cue::Score => {
            let freq = lfo(|t: f32| if t < 0.07 { 988.0 } else { 1319.0 });
            let gain = lfo(|t: f32| sweep(0.12, 0.0, (t - 0.07) / 0.18));
            bake(Box::new((freq >> square()) * gain), 0.25)
        }
        // Muffled thump
        Cue::Hit => {
            let gain = lfo(|t: f32| sweep(0.3, 0.0, t / 0.12));
            bake(Box::new(noise() * gain >> lowpole_hz(1500.0)), 0.15)
        }
        // Falling sawtooth, 400Hz down to 80Hz
        Cue::Die => {
            let freq = lfo(|t: f32| sweep(400.0, 80.0, t / 0.4));
            let gain = lfo(|t: f32| sweep(0.15, 0.0, t / 0.5));
            bake(Box::new((freq >> saw()) * gain), 0.5)
        }
        // Swoosh: filtered noise swelling in and out
        Cue::Start => {
            let gain = lfo(|t: f32| (t / 0.35 * std::f32::consts::PI).sin().max(0.0) * 0.15);
            bake(Box::new(noise() * gain >> lowpole_hz(900.0)), 0.35)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cue_renders_audible_samples() {
        for cue in Cue::ALL {
            let samples = synthesize(cue);
            assert!(!samples.is_empty(), "{:?} is empty", cue);
            assert!(samples.iter().all(|s| s.is_finite()));
            assert!(samples.iter().any(|s| s.abs() > 1e-4), "{:?} is silent", cue);
            assert!(samples.iter().all(|s| s.abs() <= 1.0));
        }
    }

    #[test]
    fn test_cue_indices_are_distinct() {
        let mut seen: Vec<usize> = Cue::ALL.iter().map(|c| c.index()).collect();
        seen.dedup();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_muted_audio_is_silent() {
        let mut audio = open(true);
        audio.play(Cue::Jump);
        audio.play_after(Cue::Die, Duration::from_millis(200));
    }
}
