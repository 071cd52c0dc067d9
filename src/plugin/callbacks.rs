use std::cell::RefCell;
use std::ffi::{c_uint, c_void};

use crate::environment_command::Command;
use crate::video::Frame;

pub mod ffi;

thread_local! {
    pub static CALLBACKS: RefCell<Box<dyn Callbacks>> = RefCell::new(Stub.boxed());
}

pub fn register(callbacks: Box<dyn Callbacks>) {
    CALLBACKS.set(callbacks);
}

pub fn drop() {
    CALLBACKS.set(Stub.boxed());
}

/// Everything a plugin calls back into the host for, during `retro_run()`
/// and during the environment-command channel.
pub trait Callbacks {
    fn video_refresh(&mut self, frame: Option<Frame>);
    fn audio_sample(&mut self, left: i16, right: i16);
    fn audio_samples(&mut self, samples: &[i16]) -> usize;
    fn input_poll(&mut self);
    fn input_state(&self, port: c_uint, device: c_uint, index: c_uint, id: c_uint) -> i16;

    /// Dispatches one `retro_environment` command. `data` has whatever
    /// shape the command's doc comment in [`Command`] specifies.
    unsafe fn environment(&mut self, command: Command, data: *mut c_void) -> bool;

    fn boxed(self) -> Box<Self>
    where
        Self: Sized,
    {
        Box::new(self)
    }
}

pub struct Stub;

impl Callbacks for Stub {
    fn video_refresh(&mut self, _frame: Option<Frame>) {
        log::warn!("video_refresh called with no plugin loaded");
    }

    fn audio_sample(&mut self, _left: i16, _right: i16) {
        log::warn!("audio_sample called with no plugin loaded");
    }

    fn audio_samples(&mut self, samples: &[i16]) -> usize {
        log::warn!("audio_samples called with no plugin loaded");
        samples.len() / 2
    }

    fn input_poll(&mut self) {
        log::warn!("input_poll called with no plugin loaded");
    }

    fn input_state(&self, _port: c_uint, _device: c_uint, _index: c_uint, _id: c_uint) -> i16 {
        log::warn!("input_state called with no plugin loaded");
        0
    }

    unsafe fn environment(&mut self, _command: Command, _data: *mut c_void) -> bool {
        log::warn!("environment called with no plugin loaded");
        false
    }
}
