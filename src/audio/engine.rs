// Click output - cpal stream rendering metronome clicks
//
// The stream is opened once at startup and released once at shutdown. The
// controller never touches the stream directly: clicks travel through a
// lock-free ring buffer and the callback renders them with a `ClickVoice`.
//
// Supported device sample formats are F32, I16 and U16. Rendering is done in
// f32 and converted per frame with cpal's `FromSample`.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use log::{debug, error, info};
use ringbuf::traits::{Consumer, Producer};

use crate::audio::click::ClickVoice;
use crate::audio::sink::ClickSink;
use crate::audio::status::{AtomicDeviceStatus, DeviceStatus};
use crate::error::AudioError;
use crate::messaging::channels::{ClickConsumer, ClickProducer, create_click_channel};
use crate::messaging::command::ClickCommand;

// A 16th note at 200 BPM is 75ms, far longer than any callback period, so the
// callback drains this between two clicks.
const CLICK_CHANNEL_CAPACITY: usize = 64;

pub struct ClickOutput {
    stream: Option<Stream>,
    click_tx: ClickProducer,
    sample_rate: f32,
    status: AtomicDeviceStatus,
}

impl ClickOutput {
    /// Acquire the default output device and start the click stream
    pub fn open() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        info!(
            "Audio device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        debug!("Audio config: {:?}", supported_config);

        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = usize::from(supported_config.channels());
        let config: StreamConfig = supported_config.into();

        let (click_tx, click_rx) = create_click_channel(CLICK_CHANNEL_CAPACITY);
        let voice = ClickVoice::new(sample_rate);
        let status = AtomicDeviceStatus::new(DeviceStatus::Unavailable);

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config,
                channels,
                click_rx,
                voice,
                status.clone(),
            ),
            SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config,
                channels,
                click_rx,
                voice,
                status.clone(),
            ),
            SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config,
                channels,
                click_rx,
                voice,
                status.clone(),
            ),
            other => return Err(AudioError::UnsupportedFormat(other)),
        }?;

        stream.play()?;
        status.set(DeviceStatus::Connected);

        info!(
            "Audio output started: {} Hz, {} channels, {:?}",
            sample_rate, channels, sample_format
        );

        Ok(Self {
            stream: Some(stream),
            click_tx,
            sample_rate,
            status,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Stop the stream and release the device
    ///
    /// Returns false when the output was already released.
    pub fn close(&mut self) -> bool {
        let Some(stream) = self.stream.take() else {
            return false;
        };

        drop(stream);
        self.status.set(DeviceStatus::Closed);
        info!("Audio output released");
        true
    }

    fn send(&mut self, command: ClickCommand) {
        if self.stream.is_none() {
            return;
        }

        if self.click_tx.try_push(command).is_err() {
            debug!("click channel full, dropping {:?}", command);
        }
    }

    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        channels: usize,
        mut click_rx: ClickConsumer,
        mut voice: ClickVoice,
        status: AtomicDeviceStatus,
    ) -> Result<Stream, AudioError>
    where
        T: SizedSample + FromSample<f32> + Send + 'static,
    {
        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // Real-time thread: no allocation or locking past this point
                while let Some(command) = click_rx.try_pop() {
                    voice.handle(command);
                }

                for frame in data.chunks_mut(channels) {
                    let value = <T as Sample>::from_sample(voice.next_sample());
                    for channel_sample in frame.iter_mut() {
                        *channel_sample = value;
                    }
                }
            },
            move |err| {
                error!("Audio stream error: {}", err);
                status.set(DeviceStatus::Error);
            },
            None,
        )?;

        Ok(stream)
    }
}

impl ClickSink for ClickOutput {
    fn click(&mut self, accent: bool, volume: f32) {
        self.send(ClickCommand::Trigger { accent, volume });
    }

    fn silence(&mut self) {
        self.send(ClickCommand::Silence);
    }

    fn release(&mut self) {
        self.close();
    }

    fn status(&self) -> DeviceStatus {
        self.status.get()
    }
}

impl Drop for ClickOutput {
    fn drop(&mut self) {
        self.close();
    }
}
