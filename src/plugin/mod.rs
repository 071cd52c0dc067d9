use core::slice;
use std::borrow::Cow;
use std::ffi::CStr;
use std::os::raw::c_void;
use std::path::Path;
use std::ptr::null;

use libretro_sys::{GameGeometry, GameInfo, SystemAvInfo, SystemTiming};

use crate::error::HostError;
use crate::game::Game;

use self::api::Api;

mod api;

pub mod callbacks;
pub use callbacks::Callbacks;

mod state;
pub use state::STATE;

const EXPECTED_LIB_RETRO_VERSION: u32 = 1;

/// An open, `dlopen`ed plugin and the one libretro-API dance it is allowed
/// to go through per process lifetime: open, init, load a single game, run
/// frames, unload the game, deinit, drop.
pub struct Plugin {
    api: Api,
}

impl Plugin {
    /// Opens the shared object, resolves every required symbol, checks the
    /// ABI version, and installs the host's callback trampolines. Does not
    /// call `retro_init` yet.
    pub unsafe fn open(
        path: impl AsRef<Path>,
        callbacks: Box<dyn Callbacks>,
    ) -> Result<Self, HostError> {
        let already_loaded = STATE.with_borrow(|state| state.is_plugin_loaded);

        if already_loaded {
            return Err(HostError::PluginLoad {
                path: path.as_ref().to_owned(),
                source: anyhow::anyhow!("a plugin is already loaded on this thread"),
            });
        }

        let api = Api::load(path.as_ref())?;
        let mut plugin = Plugin { api };

        plugin.check_api_version_match()?;
        plugin.register_callbacks(callbacks);

        STATE.with_borrow_mut(|state| state.is_plugin_loaded = true);

        Ok(plugin)
    }

    pub unsafe fn init(&mut self) {
        (self.api.retro_init)();
    }

    pub unsafe fn deinit(&mut self) {
        (self.api.retro_deinit)();
        callbacks::drop();
        STATE.set(state::State::new());
    }

    pub fn get_system_info(&self) -> SystemInfo {
        let mut system_info = libretro_sys::SystemInfo {
            library_name: null(),
            library_version: null(),
            valid_extensions: null(),
            need_fullpath: false,
            block_extract: false,
        };

        unsafe {
            (self.api.retro_get_system_info)(&mut system_info);
            SystemInfo::from_raw(system_info)
        }
    }

    pub fn get_system_av_info(&self) -> SystemAvInfo {
        let mut system_av_info = SystemAvInfo {
            geometry: GameGeometry {
                aspect_ratio: f32::NAN,
                base_width: 0,
                base_height: 0,
                max_width: 0,
                max_height: 0,
            },
            timing: SystemTiming {
                fps: 0.,
                sample_rate: 0.,
            },
        };

        unsafe {
            (self.api.retro_get_system_av_info)(&mut system_av_info);
        }

        system_av_info
    }

    pub unsafe fn load_game(&mut self, game: &Game) -> Result<(), HostError> {
        let game_info = GameInfo {
            path: null(),
            data: game.bytes.as_ptr().cast(),
            size: game.bytes.len(),
            meta: null(),
        };

        let ok = (self.api.retro_load_game)(&game_info);

        if !ok {
            return Err(HostError::PluginReported {
                what: "retro_load_game returned false",
            });
        }

        Ok(())
    }

    pub unsafe fn unload_game(&mut self) {
        (self.api.retro_unload_game)();
    }

    pub unsafe fn run(&mut self) {
        (self.api.retro_run)();
    }

    pub unsafe fn reset(&mut self) {
        (self.api.retro_reset)();
    }

    pub unsafe fn set_controller_port_device(&mut self, port: u32, device: u32) {
        (self.api.retro_set_controller_port_device)(port, device);
    }

    pub unsafe fn get_region(&self) -> u32 {
        (self.api.retro_get_region)()
    }

    pub unsafe fn serialize_size(&self) -> usize {
        (self.api.retro_serialize_size)()
    }

    pub unsafe fn serialize(&self, buf: &mut [u8]) -> bool {
        (self.api.retro_serialize)(buf.as_mut_ptr().cast::<c_void>(), buf.len())
    }

    pub unsafe fn unserialize(&mut self, buf: &[u8]) -> bool {
        (self.api.retro_unserialize)(buf.as_ptr().cast::<c_void>(), buf.len())
    }

    pub unsafe fn get_memory_data(&self, id: u32) -> *mut c_void {
        (self.api.retro_get_memory_data)(id)
    }

    pub unsafe fn get_memory_size(&self, id: u32) -> usize {
        (self.api.retro_get_memory_size)(id)
    }

    pub unsafe fn save_ram(&self) -> &[u8] {
        self.memory_region(libretro_sys::MEMORY_SAVE_RAM)
    }

    pub unsafe fn save_ram_mut(&mut self) -> &mut [u8] {
        self.memory_region_mut(libretro_sys::MEMORY_SAVE_RAM)
    }

    unsafe fn memory_region(&self, id: u32) -> &[u8] {
        let ptr = self.get_memory_data(id);
        let len = self.get_memory_size(id);

        if ptr.is_null() || len == 0 {
            return &[];
        }

        slice::from_raw_parts(ptr.cast::<u8>(), len)
    }

    unsafe fn memory_region_mut(&mut self, id: u32) -> &mut [u8] {
        let ptr = self.get_memory_data(id);
        let len = self.get_memory_size(id);

        if ptr.is_null() || len == 0 {
            return &mut [];
        }

        slice::from_raw_parts_mut(ptr.cast::<u8>(), len)
    }
}

impl Plugin {
    unsafe fn check_api_version_match(&mut self) -> Result<(), HostError> {
        let found = (self.api.retro_api_version)();

        if found != EXPECTED_LIB_RETRO_VERSION {
            return Err(HostError::AbiMismatch {
                found,
                expected: EXPECTED_LIB_RETRO_VERSION,
            });
        }

        Ok(())
    }

    unsafe fn register_callbacks(&mut self, callbacks: Box<dyn Callbacks>) {
        callbacks::register(callbacks);

        (self.api.retro_set_environment)(callbacks::ffi::environment);
        (self.api.retro_set_video_refresh)(callbacks::ffi::video_refresh);
        (self.api.retro_set_audio_sample)(callbacks::ffi::audio_sample);
        (self.api.retro_set_audio_sample_batch)(callbacks::ffi::audio_sample_batch);
        (self.api.retro_set_input_poll)(callbacks::ffi::input_poll);
        (self.api.retro_set_input_state)(callbacks::ffi::input_state);
    }
}

pub struct SystemInfo<'a> {
    pub library_name: Cow<'a, str>,
    pub library_version: Cow<'a, str>,
    pub valid_extensions: Cow<'a, str>,
    pub need_fullpath: bool,
    pub block_extract: bool,
}

impl SystemInfo<'_> {
    unsafe fn from_raw(system_info: libretro_sys::SystemInfo) -> Self {
        let library_name = system_info
            .library_name
            .as_ref()
            .map(|p| CStr::from_ptr(p).to_string_lossy())
            .unwrap_or_default();
        let library_version = system_info
            .library_version
            .as_ref()
            .map(|p| CStr::from_ptr(p).to_string_lossy())
            .unwrap_or_default();
        let valid_extensions = system_info
            .valid_extensions
            .as_ref()
            .map(|p| CStr::from_ptr(p).to_string_lossy())
            .unwrap_or_default();

        SystemInfo {
            library_name,
            library_version,
            valid_extensions,
            need_fullpath: system_info.need_fullpath,
            block_extract: system_info.block_extract,
        }
    }
}
