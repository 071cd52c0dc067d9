use std::ops::Deref;
use std::path::Path;
use std::ptr;

use anyhow::Context;
use libloading::Library;
use libretro_sys::CoreAPI;

use crate::error::HostError;

pub(super) struct Api {
    _library: Library,
    core_api: CoreAPI,
    _opt_out_of_send_sync: *const (),
}

impl Api {
    pub unsafe fn load(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref();
        let library = Library::new(path).map_err(|err| HostError::PluginLoad {
            path: path.to_owned(),
            source: anyhow::Error::new(err).context("failed to open shared object"),
        })?;

        let core_api = (|| -> anyhow::Result<CoreAPI> {
            Ok(CoreAPI {
                retro_set_environment: deref_symbol(&library, "retro_set_environment")?,
                retro_set_video_refresh: deref_symbol(&library, "retro_set_video_refresh")?,
                retro_set_audio_sample: deref_symbol(&library, "retro_set_audio_sample")?,
                retro_set_audio_sample_batch: deref_symbol(&library, "retro_set_audio_sample_batch")?,
                retro_set_input_poll: deref_symbol(&library, "retro_set_input_poll")?,
                retro_set_input_state: deref_symbol(&library, "retro_set_input_state")?,

                retro_init: deref_symbol(&library, "retro_init")?,
                retro_deinit: deref_symbol(&library, "retro_deinit")?,

                retro_api_version: deref_symbol(&library, "retro_api_version")?,

                retro_get_system_info: deref_symbol(&library, "retro_get_system_info")?,
                retro_get_system_av_info: deref_symbol(&library, "retro_get_system_av_info")?,
                retro_set_controller_port_device: deref_symbol(
                    &library,
                    "retro_set_controller_port_device",
                )?,

                retro_reset: deref_symbol(&library, "retro_reset")?,
                retro_run: deref_symbol(&library, "retro_run")?,

                retro_serialize_size: deref_symbol(&library, "retro_serialize_size")?,
                retro_serialize: deref_symbol(&library, "retro_serialize")?,
                retro_unserialize: deref_symbol(&library, "retro_unserialize")?,

                retro_cheat_reset: deref_symbol(&library, "retro_cheat_reset")?,
                retro_cheat_set: deref_symbol(&library, "retro_cheat_set")?,

                retro_load_game: deref_symbol(&library, "retro_load_game")?,
                retro_load_game_special: deref_symbol(&library, "retro_load_game_special")
                    .unwrap_or(stub_load_game_special),
                retro_unload_game: deref_symbol(&library, "retro_unload_game")?,

                retro_get_region: deref_symbol(&library, "retro_get_region")?,
                retro_get_memory_data: deref_symbol(&library, "retro_get_memory_data")?,
                retro_get_memory_size: deref_symbol(&library, "retro_get_memory_size")?,
            })
        })()
        .map_err(|err| HostError::PluginLoad {
            path: path.to_owned(),
            source: err,
        })?;

        Ok(Self {
            _library: library,
            core_api,
            _opt_out_of_send_sync: ptr::null(),
        })
    }
}

unsafe fn deref_symbol<T: Copy>(library: &Library, symbol: &str) -> anyhow::Result<T> {
    let item = library
        .get::<T>(symbol.as_bytes())
        .with_context(|| format!("failed to load symbol `{symbol}` from plugin"))?;

    Ok(*item)
}

/// `retro_load_game_special` is optional per the ABI; a plugin that omits
/// it is never asked to use it (the host only ever calls `retro_load_game`),
/// so a stub that refuses is a safe stand-in for the missing symbol.
unsafe extern "C" fn stub_load_game_special(
    _game_type: std::os::raw::c_uint,
    _info: *const libretro_sys::GameInfo,
    _num_info: usize,
) -> bool {
    false
}

impl Deref for Api {
    type Target = CoreAPI;

    fn deref(&self) -> &Self::Target {
        &self.core_api
    }
}
