use std::sync::mpsc::{self, Receiver, SyncSender};
use std::time::Duration;
use std::vec;

/// Where the frame loop pushes interleaved stereo PCM16 samples, at the
/// sample rate the plugin declared in its `SystemAvInfo`.
pub trait AudioSink {
    fn push_samples(&mut self, samples: &[i16]);
    fn push_sample(&mut self, left: i16, right: i16);
}

/// Default [`AudioSink`], bridging a bounded channel into a `rodio`
/// playback thread. The channel decouples the frame-loop thread (which
/// only ever pushes) from `rodio`'s own internal mixer thread.
pub struct RodioSink {
    tx: SyncSender<Vec<i16>>,
    _stream: rodio::OutputStream,
}

impl RodioSink {
    /// `sample_rate` must be the plugin's real declared rate — the sink is
    /// constructed only after `get_system_av_info`, per the mandated
    /// startup order.
    pub fn new(sample_rate: u32) -> anyhow::Result<Self> {
        let (stream, stream_handle) = rodio::OutputStream::try_default()?;
        let (tx, rx) = mpsc::sync_channel(64);

        let source = RetroAudio {
            rx,
            current_frame: Vec::new().into_iter(),
            sample_rate,
        };

        std::thread::spawn(move || {
            use rodio::Source;

            if let Err(err) = stream_handle.play_raw(source.convert_samples()) {
                log::error!("audio playback thread exited: {err}");
            }
        });

        Ok(Self { tx, _stream: stream })
    }
}

impl AudioSink for RodioSink {
    fn push_samples(&mut self, samples: &[i16]) {
        if self.tx.send(samples.to_vec()).is_err() {
            log::error!("audio playback thread is gone, dropping samples");
        }
    }

    fn push_sample(&mut self, left: i16, right: i16) {
        self.push_samples(&[left, right]);
    }
}

struct RetroAudio {
    rx: Receiver<Vec<i16>>,
    current_frame: vec::IntoIter<i16>,
    sample_rate: u32,
}

impl rodio::Source for RetroAudio {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        2
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

impl Iterator for RetroAudio {
    type Item = i16;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(sample) = self.current_frame.next() {
            return Some(sample);
        }

        self.current_frame = self.rx.recv().ok()?.into_iter();
        self.current_frame.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSink {
        samples: Vec<i16>,
    }

    impl AudioSink for RecordingSink {
        fn push_samples(&mut self, samples: &[i16]) {
            self.samples.extend_from_slice(samples);
        }

        fn push_sample(&mut self, left: i16, right: i16) {
            self.samples.extend_from_slice(&[left, right]);
        }
    }

    #[test]
    fn push_sample_appends_one_stereo_frame() {
        let mut sink = RecordingSink { samples: Vec::new() };

        sink.push_sample(1, -1);
        sink.push_samples(&[2, -2, 3, -3]);

        assert_eq!(sink.samples, vec![1, -1, 2, -2, 3, -3]);
    }
}
