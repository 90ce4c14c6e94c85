//! Audio sources feeding the analyser.
//!
//! A source pushes mono samples into a ring buffer; an analysis thread drains
//! it, runs the [`FrequencyAnalyser`] about sixty times per second of audio and
//! publishes the newest byte frame through a [`SpectrumTap`].

use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use arc_swap::ArcSwap;
use ringbuf::traits::{Consumer as _, Producer as _, Split as _};
use ringbuf::HeapRb;

#[cfg(feature = "capture")]
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
#[cfg(feature = "capture")]
use cpal::{Sample, SampleFormat};

use crate::analyzer::{AnalyserSettings, FrequencyAnalyser};
use crate::config::AudioSource;

const SYNTH_SAMPLE_RATE: u32 = 48_000;
/// Analyses per second of audio; matches the display rate the smoothing
/// constant was tuned for.
const ANALYSES_PER_SECOND: usize = 60;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_millis(0))
        .as_millis() as u64
}

/// Latest frequency frame, shared between the analysis thread and the UI.
pub struct SpectrumTap {
    latest: ArcSwap<Vec<u8>>,
    updated_ms: AtomicU64,
}

impl SpectrumTap {
    pub fn new(bins: usize) -> Self {
        Self {
            latest: ArcSwap::from_pointee(vec![0; bins]),
            updated_ms: AtomicU64::new(0),
        }
    }

    pub fn store(&self, frame: Vec<u8>) {
        self.latest.store(Arc::new(frame));
        self.updated_ms.store(now_ms(), Ordering::Relaxed);
    }

    pub fn load(&self) -> Arc<Vec<u8>> {
        self.latest.load_full()
    }

    /// Copies the latest frame into `out`, reusing its allocation.
    pub fn copy_into(&self, out: &mut Vec<u8>) {
        let frame = self.latest.load();
        out.clear();
        out.extend_from_slice(&frame);
    }

    pub fn age_ms(&self) -> f32 {
        let t = self.updated_ms.load(Ordering::Relaxed);
        if t == 0 {
            return f32::INFINITY;
        }
        now_ms().saturating_sub(t) as f32
    }
}

#[cfg(feature = "capture")]
pub fn list_input_devices() -> anyhow::Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host.input_devices().context("enumerate input devices")?;
    Ok(devices
        .map(|d| d.name().unwrap_or_else(|_| "<unknown>".to_string()))
        .collect())
}

#[cfg(not(feature = "capture"))]
pub fn list_input_devices() -> anyhow::Result<Vec<String>> {
    anyhow::bail!("device listing needs a build with the `capture` feature")
}

enum AudioBackend {
    #[cfg(feature = "capture")]
    Cpal(cpal::Stream),
    Synth,
}

pub struct AudioSystem {
    backend: AudioBackend,
    stop: Arc<AtomicBool>,
    workers: Vec<thread::JoinHandle<()>>,
    tap: Arc<SpectrumTap>,
    pub sample_rate_hz: u32,
}

impl AudioSystem {
    pub fn new(
        source: AudioSource,
        device_query: Option<&str>,
        settings: AnalyserSettings,
    ) -> anyhow::Result<Self> {
        let analyser = FrequencyAnalyser::new(settings).context("configure analyser")?;
        match source {
            AudioSource::Synth => Self::new_synth(analyser),
            AudioSource::Mic => Self::new_mic(device_query, analyser),
        }
    }

    fn new_synth(analyser: FrequencyAnalyser) -> anyhow::Result<Self> {
        let sample_rate_hz = SYNTH_SAMPLE_RATE;
        let rb = HeapRb::<f32>::new(sample_rate_hz as usize);
        let (mut prod, cons) = rb.split();

        let stop = Arc::new(AtomicBool::new(false));
        let tap = Arc::new(SpectrumTap::new(analyser.bin_count()));

        let stop_gen = Arc::clone(&stop);
        let generator = thread::Builder::new()
            .name("synth-signal".into())
            .spawn(move || {
                let mut signal = SynthSignal::new(sample_rate_hz);
                let mut chunk = vec![0.0f32; sample_rate_hz as usize / 200];
                let started = Instant::now();
                let mut produced = 0u64;
                while !stop_gen.load(Ordering::Relaxed) {
                    let due = (started.elapsed().as_secs_f64() * f64::from(sample_rate_hz)) as u64;
                    if produced >= due {
                        thread::sleep(Duration::from_millis(2));
                        continue;
                    }
                    signal.fill(&mut chunk);
                    prod.push_slice(&chunk);
                    produced += chunk.len() as u64;
                }
            })
            .context("spawn synth thread")?;

        let analyzer = match spawn_analyzer(cons, analyser, sample_rate_hz, &stop, &tap) {
            Ok(h) => h,
            Err(err) => {
                stop.store(true, Ordering::Relaxed);
                let _ = generator.join();
                return Err(err);
            }
        };

        Ok(Self {
            backend: AudioBackend::Synth,
            stop,
            workers: vec![generator, analyzer],
            tap,
            sample_rate_hz,
        })
    }

    #[cfg(feature = "capture")]
    fn new_mic(device_query: Option<&str>, analyser: FrequencyAnalyser) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = select_mic_input_device(&host, device_query)?;
        let supported = device
            .default_input_config()
            .context("get default input config")?;
        let sample_rate_hz = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let config: cpal::StreamConfig = supported.clone().into();

        let rb = HeapRb::<f32>::new((sample_rate_hz as usize).saturating_mul(4));
        let (mut prod, cons) = rb.split();

        let stop = Arc::new(AtomicBool::new(false));
        let tap = Arc::new(SpectrumTap::new(analyser.bin_count()));

        let err_fn = |err| log::warn!("audio stream error: {err}");
        let stream = match supported.sample_format() {
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _| push_interleaved(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _| push_interleaved(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            SampleFormat::U16 => device.build_input_stream(
                &config,
                move |data: &[u16], _| push_interleaved(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            fmt => anyhow::bail!("unsupported sample format: {fmt:?}"),
        };
        stream.play().context("start input stream")?;
        log::info!("capturing from input device at {sample_rate_hz} Hz, {channels} ch");

        let analyzer = spawn_analyzer(cons, analyser, sample_rate_hz, &stop, &tap)?;

        Ok(Self {
            backend: AudioBackend::Cpal(stream),
            stop,
            workers: vec![analyzer],
            tap,
            sample_rate_hz,
        })
    }

    #[cfg(not(feature = "capture"))]
    fn new_mic(_device_query: Option<&str>, _analyser: FrequencyAnalyser) -> anyhow::Result<Self> {
        anyhow::bail!("--source mic needs a build with the `capture` feature")
    }

    pub fn tap(&self) -> Arc<SpectrumTap> {
        Arc::clone(&self.tap)
    }
}

impl Drop for AudioSystem {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        for h in self.workers.drain(..) {
            let _ = h.join();
        }
        match &self.backend {
            // The input stream stops when it is dropped with `self`.
            #[cfg(feature = "capture")]
            AudioBackend::Cpal(_stream) => {}
            AudioBackend::Synth => {}
        }
    }
}

fn spawn_analyzer(
    mut cons: ringbuf::HeapCons<f32>,
    analyser: FrequencyAnalyser,
    sample_rate_hz: u32,
    stop: &Arc<AtomicBool>,
    tap: &Arc<SpectrumTap>,
) -> anyhow::Result<thread::JoinHandle<()>> {
    let stop = Arc::clone(stop);
    let tap = Arc::clone(tap);
    thread::Builder::new()
        .name("spectrum-analyser".into())
        .spawn(move || analyze_loop(&mut cons, analyser, sample_rate_hz, &stop, &tap))
        .context("spawn analyser thread")
}

fn analyze_loop(
    cons: &mut ringbuf::HeapCons<f32>,
    mut analyser: FrequencyAnalyser,
    sample_rate_hz: u32,
    stop: &AtomicBool,
    tap: &SpectrumTap,
) {
    let hop = (sample_rate_hz as usize / ANALYSES_PER_SECOND).max(1);
    let mut pending = Vec::with_capacity(hop);
    let mut frame = Vec::with_capacity(analyser.bin_count());

    while !stop.load(Ordering::Relaxed) {
        let mut got_any = false;
        while let Some(s) = cons.try_pop() {
            got_any = true;
            pending.push(s);
            if pending.len() >= hop {
                analyser.push_samples(&pending);
                pending.clear();
                analyser.byte_frequency_data(&mut frame);
                tap.store(frame.clone());
            }
        }
        if !got_any {
            thread::sleep(Duration::from_millis(1));
        }
    }
}

#[cfg(feature = "capture")]
fn select_mic_input_device(
    host: &cpal::Host,
    device_query: Option<&str>,
) -> anyhow::Result<cpal::Device> {
    let devices = host
        .input_devices()
        .context("enumerate input devices")?
        .collect::<Vec<_>>();

    if let Some(want) = device_query.map(str::to_lowercase) {
        return devices
            .into_iter()
            .find(|d| d.name().map(|n| n.to_lowercase().contains(&want)).unwrap_or(false))
            .ok_or_else(|| anyhow::anyhow!("no input device matching: {want}"));
    }

    host.default_input_device()
        .ok_or_else(|| anyhow::anyhow!("no default input device found"))
}

#[cfg(feature = "capture")]
fn push_interleaved<T: Sample<Float = f32> + Copy>(
    data: &[T],
    channels: usize,
    prod: &mut ringbuf::HeapProd<f32>,
) {
    for frame in data.chunks(channels.max(1)) {
        let acc: f32 = frame.iter().map(|s| s.to_float_sample()).sum();
        let _ = prod.try_push(acc / frame.len() as f32);
    }
}

/// Endless test signal: a 120 BPM kick, off-beat hats, a slow pad chord and a
/// looping 120 Hz to 8 kHz sweep.
pub struct SynthSignal {
    sample_rate: f32,
    n: u64,
    phases: [f32; 5],
    rng: fastrand::Rng,
}

impl SynthSignal {
    const BEAT_SECONDS: f32 = 0.5;
    const SWEEP_SECONDS: f32 = 8.0;
    const PAD_HZ: [f32; 3] = [220.0, 277.18, 329.63];

    pub fn new(sample_rate: u32) -> Self {
        Self::with_rng(sample_rate, fastrand::Rng::new())
    }

    pub fn with_rng(sample_rate: u32, rng: fastrand::Rng) -> Self {
        Self {
            sample_rate: sample_rate.max(1) as f32,
            n: 0,
            phases: [0.0; 5],
            rng,
        }
    }

    pub fn fill(&mut self, out: &mut [f32]) {
        for s in out {
            *s = self.next_sample();
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let t = self.n as f32 / self.sample_rate;
        self.n += 1;

        let beat_t = t % Self::BEAT_SECONDS;
        // Kick: pitch drops from 110 Hz to 50 Hz with an exponential decay.
        let kick_hz = 50.0 + 60.0 * (-beat_t * 30.0).exp();
        let kick = self.advance(0, kick_hz).sin() * (-beat_t * 9.0).exp();

        let hat_t = (t + Self::BEAT_SECONDS / 2.0) % Self::BEAT_SECONDS;
        let hat = (self.rng.f32() * 2.0 - 1.0) * (-hat_t * 60.0).exp() * 0.25;

        let lfo = 0.5 + 0.5 * (TAU * 0.1 * t).sin();
        let mut pad = 0.0;
        for (i, hz) in Self::PAD_HZ.into_iter().enumerate() {
            pad += self.advance(1 + i, hz).sin();
        }
        let pad = pad / 3.0 * 0.15 * lfo;

        let sweep_pos = (t % Self::SWEEP_SECONDS) / Self::SWEEP_SECONDS;
        let sweep_hz = 120.0 * (8_000.0f32 / 120.0).powf(sweep_pos);
        let sweep = self.advance(4, sweep_hz).sin() * 0.2;

        (kick * 0.8 + hat + pad + sweep).clamp(-1.0, 1.0)
    }

    fn advance(&mut self, osc: usize, hz: f32) -> f32 {
        let phase = self.phases[osc];
        self.phases[osc] = (phase + TAU * hz / self.sample_rate) % TAU;
        phase
    }
}
