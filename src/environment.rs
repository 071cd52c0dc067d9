use std::ffi::{c_uint, c_void, CStr, CString};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use libretro_sys::PixelFormat;

use crate::abi;
use crate::environment_command::Command;
use crate::paths::Paths;
use crate::plugin::STATE;

/// Backs every `retro_environment` command the broker understands: the
/// core-options variable table, the directories a plugin can ask for, and
/// the handful of optional interfaces (disk control, audio buffer status)
/// a plugin can register.
pub struct EnvironmentStore {
    variables: IndexMap<String, Variable>,
    system_directory: CString,
    disk_control: Option<abi::DiskControlExtCallback>,
    audio_buffer_status: Option<abi::AudioBufferStatusFn>,
    fps: f64,
    audio_buffer_override_frames: Option<u32>,
}

impl EnvironmentStore {
    pub fn new(paths: &Paths) -> Result<Self> {
        let system_directory = path_to_cstring(&paths.system_directory())?;

        Ok(Self {
            variables: IndexMap::new(),
            system_directory,
            disk_control: None,
            audio_buffer_status: None,
            fps: 60.0,
            audio_buffer_override_frames: None,
        })
    }

    pub fn set_fps(&mut self, fps: f64) {
        self.fps = fps;
    }

    pub fn get_variable(&self, key: &str) -> Option<&CStr> {
        self.variables.get(key).map(|var| var.value.as_c_str())
    }

    /// The last in-range (`< 30` frames) `SET_MINIMUM_AUDIO_LATENCY` hint a
    /// plugin requested, if any.
    pub fn audio_buffer_override_frames(&self) -> Option<u32> {
        self.audio_buffer_override_frames
    }

    /// Dispatches a single environment command. `data` must point to
    /// whatever type the command's libretro documentation specifies; see
    /// [`Command`] for the per-variant shape.
    pub unsafe fn dispatch(&mut self, command: Command, data: *mut c_void) -> bool {
        match command {
            Command::GET_OVERSCAN => {
                write_out(data, true);
                true
            }
            Command::GET_CAN_DUPE => {
                write_out(data, true);
                true
            }
            Command::SET_MESSAGE => {
                if let Some(message) = data.cast_const().cast::<RetroMessage>().as_ref() {
                    if !message.msg.is_null() {
                        log::info!("{}", CStr::from_ptr(message.msg).to_string_lossy());
                    }
                }
                true
            }
            Command::GET_SYSTEM_DIRECTORY => {
                write_out(data, self.system_directory.as_ptr());
                true
            }
            Command::SET_PIXEL_FORMAT => {
                let requested = *data.cast_const().cast::<c_uint>();
                let Some(requested) = PixelFormat::from_uint(requested) else {
                    log::warn!("plugin requested unknown pixel format `{requested}`");
                    return false;
                };

                if requested != PixelFormat::RGB565 {
                    log::warn!(
                        "plugin requested unsupported pixel format `{requested:?}`, only RGB565 is supported"
                    );
                    return false;
                }

                STATE.with_borrow_mut(|state| state.pixel_format = requested);
                true
            }
            Command::SET_INPUT_DESCRIPTORS => {
                let descriptors = data.cast_const().cast::<InputDescriptor>();

                if descriptors.is_null() {
                    return true;
                }

                let mut i = 0;
                loop {
                    let descriptor = &*descriptors.add(i);
                    if descriptor.description.is_null() {
                        break;
                    }

                    log::debug!(
                        "input descriptor {}: {}",
                        descriptor.id,
                        CStr::from_ptr(descriptor.description).to_string_lossy()
                    );

                    i += 1;
                }

                // The frontend does not surface input-descriptor labels
                // anywhere a user can see them, so it reports them as
                // unhandled, matching the behavior this was ported from.
                false
            }
            Command::SET_DISK_CONTROL_INTERFACE => {
                let Some(basic) = data.cast_const().cast::<abi::DiskControlCallback>().as_ref() else {
                    return true;
                };

                self.disk_control = Some(abi::DiskControlExtCallback::from_basic(basic));
                true
            }
            Command::SET_DISK_CONTROL_EXT_INTERFACE => {
                let ptr = data.cast_const().cast::<abi::DiskControlExtCallback>();

                if let Some(ext) = ptr.as_ref() {
                    self.disk_control = Some(abi::DiskControlExtCallback {
                        set_eject_state: ext.set_eject_state,
                        get_eject_state: ext.get_eject_state,
                        get_image_index: ext.get_image_index,
                        set_image_index: ext.set_image_index,
                        get_num_images: ext.get_num_images,
                        replace_image_index: ext.replace_image_index,
                        add_image_index: ext.add_image_index,
                        set_initial_image: ext.set_initial_image,
                        get_image_path: ext.get_image_path,
                        get_image_label: ext.get_image_label,
                    });
                }

                true
            }
            Command::GET_VARIABLE => {
                let Some(variable) = data.cast::<libretro_sys::Variable>().as_mut() else {
                    return false;
                };

                let Some(key) = variable.key.as_ref() else {
                    return false;
                };
                let key = CStr::from_ptr(key).to_string_lossy();

                match self.get_variable(&key) {
                    Some(value) => variable.value = value.as_ptr(),
                    None => variable.value = std::ptr::null(),
                }

                true
            }
            Command::SET_VARIABLES => {
                let vars = data.cast_const().cast::<libretro_sys::Variable>();

                if vars.is_null() {
                    return true;
                }

                let mut i = 0;
                loop {
                    let var = &*vars.add(i);
                    if var.key.is_null() {
                        break;
                    }

                    let key = CStr::from_ptr(var.key).to_string_lossy().into_owned();
                    let value = CStr::from_ptr(var.value).to_string_lossy();

                    if let Err(err) = self.set_variable(key.clone(), &value) {
                        log::warn!("failed to parse variable `{key}` = `{value}`: {err}");
                    }

                    i += 1;
                }

                true
            }
            Command::GET_VARIABLE_UPDATE => {
                write_out(data, false);
                true
            }
            Command::GET_LOG_INTERFACE => {
                // retro_log_callback::log is a variadic C function pointer;
                // stable Rust cannot define a matching extern "C" function,
                // so this interface is not offered. Plugins fall back to
                // stderr, matching their documented behavior.
                false
            }
            Command::GET_SAVE_DIRECTORY => {
                // Reserved: SRAM paths are derived from `Paths::sram_path`,
                // not requested through this directory.
                write_out(data, std::ptr::null::<std::os::raw::c_char>());
                true
            }
            Command::GET_INPUT_BITMASKS => {
                write_out(data, true);
                true
            }
            Command::GET_CORE_OPTIONS_VERSION => {
                write_out(data, 1u32);
                true
            }
            Command::SET_CORE_OPTIONS => {
                let defs = *data.cast_const().cast::<*const abi::CoreOptionDefinition>();
                self.ingest_core_option_definitions(defs, false);
                true
            }
            Command::SET_CORE_OPTIONS_INTL => {
                let Some(intl) = data.cast_const().cast::<abi::CoreOptionsIntl>().as_ref() else {
                    return true;
                };

                if !intl.us.is_null() {
                    self.ingest_core_option_definitions(intl.us, true);
                }

                true
            }
            Command::SET_CORE_OPTIONS_DISPLAY => {
                if let Some(display) = data.cast_const().cast::<abi::CoreOptionDisplay>().as_ref() {
                    log::debug!(
                        "option `{}` visible: {}",
                        CStr::from_ptr(display.key).to_string_lossy(),
                        display.visible
                    );
                }

                true
            }
            Command::GET_DISK_CONTROL_INTERFACE_VERSION => {
                write_out(data, 1u32);
                true
            }
            Command::SET_AUDIO_BUFFER_STATUS_CALLBACK => {
                let cb = data.cast_const().cast::<abi::AudioBufferStatusCallback>();
                self.audio_buffer_status = cb.as_ref().and_then(|cb| cb.callback);
                true
            }
            Command::SET_MINIMUM_AUDIO_LATENCY => {
                if let Some(latency_ms) = data.cast_const().cast::<c_uint>().as_ref() {
                    let frames = (*latency_ms as f64 * self.fps / 1000.0) as u32;

                    if frames < 30 {
                        log::debug!("minimum audio latency requested: {frames} frames");
                        self.audio_buffer_override_frames = Some(frames);
                    } else {
                        log::warn!(
                            "ignoring out-of-range minimum audio latency request ({frames} frames)"
                        );
                    }
                }

                true
            }
            _ => {
                log::debug!("unsupported environment command `{command:?}`");
                false
            }
        }
    }

    fn set_variable(&mut self, key: String, raw_value: &str) -> Result<()> {
        let variable = Variable::parse(raw_value)?;
        self.variables.insert(key, variable);
        Ok(())
    }

    unsafe fn ingest_core_option_definitions(
        &mut self,
        defs: *const abi::CoreOptionDefinition,
        apply_gpsp_quirk: bool,
    ) {
        if defs.is_null() {
            return;
        }

        let mut i = 0;
        loop {
            let def = &*defs.add(i);
            if def.key.is_null() {
                break;
            }

            let key = CStr::from_ptr(def.key).to_string_lossy().into_owned();
            let mut default_value = CStr::from_ptr(def.default_value).to_string_lossy().into_owned();

            // gpSP's libretro port defaults to a save method this host
            // cannot honor (it writes saves outside the normal SRAM
            // interface); force it back to the interface every other core
            // uses. This is an explicit per-plugin patch, not a general
            // rule.
            if apply_gpsp_quirk && key == "gpsp_save_method" {
                default_value = "libretro".to_owned();
            }

            match CString::new(default_value.clone()) {
                Ok(value) => {
                    self.variables.insert(
                        key,
                        Variable {
                            options: vec![default_value],
                            value,
                        },
                    );
                }
                Err(err) => log::warn!("option `{key}` default value contains NUL: {err}"),
            }

            i += 1;
        }
    }
}

#[derive(Debug)]
struct Variable {
    options: Vec<String>,
    value: CString,
}

impl Variable {
    /// Parses the `SET_VARIABLES`-style value shape: `"label; opt1|opt2|..."`.
    /// The first option is the default, per the libretro documentation.
    fn parse(s: &str) -> Result<Self> {
        let (_label, options) = s.split_once("; ").context("variable is missing `; `")?;
        let options = options.split('|').map(<_>::to_owned).collect::<Vec<_>>();
        let default = options.first().cloned().unwrap_or_default();
        let value = CString::new(default).context("variable value contains NUL")?;

        Ok(Self { options, value })
    }
}

#[repr(C)]
struct RetroMessage {
    msg: *const std::os::raw::c_char,
    frames: c_uint,
}

#[repr(C)]
struct InputDescriptor {
    port: c_uint,
    device: c_uint,
    index: c_uint,
    id: c_uint,
    description: *const std::os::raw::c_char,
}

unsafe fn write_out<T>(data: *mut c_void, value: T) {
    if !data.is_null() {
        *data.cast::<T>() = value;
    }
}

fn path_to_cstring(path: &std::path::Path) -> Result<CString> {
    CString::new(path.to_string_lossy().into_owned()).context("path contains NUL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_parse_uses_first_option_as_default() {
        let var = Variable::parse("Speed hack coprocessor X; false|true").unwrap();

        assert_eq!(var.options, vec!["false", "true"]);
        assert_eq!(var.value.to_str().unwrap(), "false");
    }

    #[test]
    fn variable_parse_rejects_missing_separator() {
        assert!(Variable::parse("no separator here").is_err());
    }
}
