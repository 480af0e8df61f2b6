use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, Stream};
use std::sync::{Arc, RwLock};

use crate::config::ToneConfig;
use crate::core::Synth;

/// A running output stream and the synth feeding it
pub struct AudioOutput {
    pub synth: Arc<RwLock<Synth>>,
    _stream: Stream,
}

impl AudioOutput {
    /// Open the default output device. Without one the piano cannot run.
    pub fn open(tone: ToneConfig) -> Result<Self> {
        let host = cpal::default_host();
        log::info!("Using audio host: {}", host.id().name());

        let device = host.default_output_device()
            .ok_or_else(|| anyhow::anyhow!("No output device available"))?;
        log::info!("Using output device: {}", device.name().unwrap_or_else(|_| "<unnamed>".into()));

        let config = device.default_output_config()
            .context("Failed to query output config")?;
        log::info!("Device config: {:?}", config);

        let sample_format = config.sample_format();
        let config = cpal::StreamConfig::from(config);
        let sample_rate = config.sample_rate.0 as f32;

        let synth = Arc::new(RwLock::new(Synth::new(sample_rate, tone)));

        let stream = match sample_format {
            SampleFormat::F32 => create_stream::<f32>(&device, &config, Arc::clone(&synth)),
            SampleFormat::I16 => create_stream::<i16>(&device, &config, Arc::clone(&synth)),
            SampleFormat::U16 => create_stream::<u16>(&device, &config, Arc::clone(&synth)),
            other => anyhow::bail!("Unsupported sample format {:?}", other),
        }?;

        stream.play().context("Failed to start output stream")?;
        log::info!("Audio stream started at {} Hz", sample_rate);

        Ok(Self { synth, _stream: stream })
    }
}

fn create_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    synth: Arc<RwLock<Synth>>,
) -> Result<Stream>
where
    T: Sample + Send + 'static + cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let err_fn = |err| log::error!("an error occurred on the audio stream: {}", err);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let mut synth = synth.write().ok();
            for frame in data.chunks_mut(channels) {
                let value = synth.as_mut().map_or(0.0, |s| s.next_sample());
                let value_t = T::from_sample(value);

                for sample in frame.iter_mut() {
                    *sample = value_t;
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
