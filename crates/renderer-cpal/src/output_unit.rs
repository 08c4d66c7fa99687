// cpal-based default output unit

use crate::render::RenderEngine;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use halout_core::{
    lookup, AudioError, EventDispatcher, OutputEvent, OutputListener, OutputState, OutputStateContainer, Result,
    StreamDescription, VolumeControl, VolumeCurve,
};
use halout_renderer_api::{AudioRenderer, BufferSize, OutputConfig, RenderCallback};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default output device driven through a pull callback
pub struct CpalOutputUnit {
    device: Option<Device>,
    stream: Option<Stream>,
    description: Option<StreamDescription>,
    volume: Arc<VolumeControl>,
    volume_curve: VolumeCurve,
    is_playing: Arc<AtomicBool>,
    state: OutputStateContainer,
    events: EventDispatcher,
}

impl CpalOutputUnit {
    /// Open the default output device of the default host
    pub fn open_default() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AudioError::DeviceError("Failed to open default audio device.".to_string()))?;

        log::info!(
            "Using audio device: {} ({:?})",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            host.id()
        );

        Ok(Self::with_device(Some(device)))
    }

    fn with_device(device: Option<Device>) -> Self {
        Self {
            device,
            stream: None,
            description: None,
            volume: Arc::new(VolumeControl::new()),
            volume_curve: VolumeCurve::default(),
            is_playing: Arc::new(AtomicBool::new(false)),
            state: OutputStateContainer::new(),
            events: EventDispatcher::new(),
        }
    }

    pub fn device_name(&self) -> Option<String> {
        self.device.as_ref().and_then(|d| d.name().ok())
    }

    fn transition(&self, to: OutputState) -> Result<()> {
        let old_state = self.state.transition(to)?;
        self.events.dispatch(OutputEvent::StateChanged {
            old_state,
            new_state: to,
        });
        Ok(())
    }

    /// Fails unless the device offers an f32 config for the requested
    /// channel count and rate. No resampling or channel remapping happens.
    fn check_stream_format(device: &Device, config: &OutputConfig) -> Result<()> {
        let supported: Vec<_> = device
            .supported_output_configs()
            .map_err(|e| {
                AudioError::InitializationError(format!("Unable to initialize audio unit instance: {}", e))
            })?
            .collect();

        log::debug!("Supported output configs: {:?}", supported);

        let rate = cpal::SampleRate(config.sample_rate);
        let found = supported.iter().any(|c| {
            c.sample_format() == cpal::SampleFormat::F32
                && c.channels() == config.channels
                && c.min_sample_rate() <= rate
                && c.max_sample_rate() >= rate
        });

        if found {
            Ok(())
        } else {
            Err(AudioError::StreamFormatError(format!(
                "Failed to set audio unit input property. ({} channels at {}Hz not supported)",
                config.channels, config.sample_rate
            )))
        }
    }

    fn build_stream(&self, device: &Device, config: &OutputConfig, mut engine: RenderEngine) -> Result<Stream> {
        let stream_config = StreamConfig {
            channels: config.channels,
            sample_rate: cpal::SampleRate(config.sample_rate),
            buffer_size: match config.buffer_size {
                BufferSize::Default => cpal::BufferSize::Default,
                BufferSize::Fixed(frames) => cpal::BufferSize::Fixed(frames),
            },
        };

        log::debug!("Stream config: {:?}", stream_config);

        let is_playing = self.is_playing.clone();
        let events = self.events.clone();

        device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !is_playing.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }
                    engine.render(data);
                },
                move |err| {
                    log::error!("Audio stream error: {}", err);
                    events.dispatch(OutputEvent::StreamError {
                        message: err.to_string(),
                    });
                },
                None,
            )
            .map_err(|e| {
                AudioError::InitializationError(format!(
                    "Unable to attach an IOProc to the selected audio unit: {}",
                    e
                ))
            })
    }

    fn restart(&mut self) -> Result<()> {
        let result = match &self.stream {
            Some(stream) => stream.play().map_err(|e| e.to_string()),
            None => Err("no stream attached".to_string()),
        };

        match result {
            Ok(()) => {
                self.is_playing.store(true, Ordering::Relaxed);
                self.transition(OutputState::Playing)
            }
            Err(e) => {
                log::error!("Unable to restart audio unit after pausing.");
                self.close()?;
                Err(AudioError::PlaybackError(format!(
                    "Unable to restart audio unit after pausing: {}",
                    e
                )))
            }
        }
    }
}

impl AudioRenderer for CpalOutputUnit {
    fn open(&mut self, config: OutputConfig, callback: RenderCallback) -> Result<()> {
        let state = self.state.get_state();
        if !matches!(state, OutputState::Idle | OutputState::Closed) {
            return Err(AudioError::InvalidState(format!("Cannot open audio while {:?}", state)));
        }

        config.validate()?;

        let desc = lookup(config.format).ok_or_else(|| {
            AudioError::UnsupportedFormat(format!(
                "The requested audio format {} is unsupported.",
                config.format.code()
            ))
        })?;

        let device = self
            .device
            .as_ref()
            .ok_or_else(|| AudioError::DeviceError("Failed to open default audio device.".to_string()))?;

        Self::check_stream_format(device, &config)?;

        let description = StreamDescription::new(desc, config.sample_rate, config.channels);
        description.log_summary();

        // Reapply the stored value in case the curve changed
        self.volume_curve = config.volume_curve;
        self.volume.set(self.volume.value(), self.volume_curve);

        let engine = RenderEngine::new(config.format, config.channels, self.volume.clone(), callback)?;
        let stream = self.build_stream(device, &config, engine)?;

        self.is_playing.store(true, Ordering::Relaxed);
        if let Err(e) = stream.play() {
            self.is_playing.store(false, Ordering::Relaxed);
            return Err(AudioError::PlaybackError(format!("Unable to start audio unit: {}", e)));
        }

        self.stream = Some(stream);
        self.description = Some(description);
        self.transition(OutputState::Playing)
    }

    fn close(&mut self) -> Result<()> {
        match self.state.get_state() {
            OutputState::Idle | OutputState::Closed => return Ok(()),
            OutputState::Released => {
                return Err(AudioError::InvalidState("Output unit already released".to_string()));
            }
            OutputState::Playing | OutputState::Paused => {}
        }

        self.is_playing.store(false, Ordering::Relaxed);
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                log::warn!("Failed to stop stream: {}", e);
            }
        }
        self.description = None;

        self.transition(OutputState::Closed)
    }

    fn pause(&mut self, paused: bool) -> Result<()> {
        match (self.state.get_state(), paused) {
            (OutputState::Paused, true) | (OutputState::Playing, false) => Ok(()),
            (OutputState::Playing, true) => {
                // The flag alone keeps the callback silent if the host can't pause
                self.is_playing.store(false, Ordering::Relaxed);
                if let Some(stream) = &self.stream {
                    if let Err(e) = stream.pause() {
                        log::warn!("Failed to pause stream: {}", e);
                    }
                }
                self.transition(OutputState::Paused)
            }
            (OutputState::Paused, false) => self.restart(),
            (state, _) => Err(AudioError::InvalidState(format!("Cannot pause audio while {:?}", state))),
        }
    }

    fn set_volume(&mut self, value: u8) -> Result<()> {
        if self.state.get_state() == OutputState::Released {
            return Err(AudioError::InvalidState("Output unit already released".to_string()));
        }

        let factor = self.volume.set(value, self.volume_curve);
        log::debug!("Volume set to {} (factor {:.4})", self.volume.value(), factor);
        self.events.dispatch(OutputEvent::VolumeChanged {
            value: self.volume.value(),
            factor,
        });
        Ok(())
    }

    fn volume(&self) -> u8 {
        self.volume.value()
    }

    fn state(&self) -> OutputState {
        self.state.get_state()
    }

    fn stream_description(&self) -> Option<StreamDescription> {
        self.description
    }

    fn set_listener(&mut self, listener: Option<Arc<dyn OutputListener>>) {
        self.events.clear_listeners();
        if let Some(listener) = listener {
            self.events.add_listener(listener);
        }
    }

    fn release(&mut self) -> Result<()> {
        if self.state.get_state() == OutputState::Released {
            return Ok(());
        }

        self.close()?;
        self.device = None;
        self.transition(OutputState::Released)
    }
}

impl Drop for CpalOutputUnit {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("Failed to release output unit: {}", e);
        }
    }
}
