use std::ffi::c_uint;

use strum::FromRepr;

// If set, this call is not part of the public libretro API yet. It can
// change or be removed at any time.
pub const ENVIRONMENT_EXPERIMENTAL: c_uint = 0x10000;

// Environment callback to be used internally in frontend.
pub const ENVIRONMENT_PRIVATE: c_uint = 0x20000;

#[derive(FromRepr, Debug, Clone, Copy, PartialEq)]
#[repr(u32)]
pub enum Command {
    // const unsigned * --
    // Sets screen rotation of graphics.
    // Is only implemented if rotation can be accelerated by hardware.
    // Valid values are 0, 1, 2, 3, which rotates screen by 0, 90, 180,
    // 270 degrees counter-clockwise respectively.
    SET_ROTATION = 1,

    //  bool * --
    // Boolean value whether or not the implementation should use overscan,
    // or crop away overscan.
    GET_OVERSCAN = 2,

    // bool * --
    // Boolean value whether or not frontend supports frame duping,
    // passing NULL to video frame callback.
    GET_CAN_DUPE = 3,

    // Environ 4, 5 are no longer supported (GET_VARIABLE / SET_VARIABLES),
    // and reserved to avoid possible ABI clash.

    // const struct Message * --
    // Sets a message to be displayed in implementation-specific manner
    // for a certain amount of 'frames'. Should not be used for trivial
    // messages, which should simply be logged via GET_LOG_INTERFACE (or
    // as a fallback, stderr).
    SET_MESSAGE = 6,

    // N/A (NULL) --
    // Requests the frontend to shutdown.
    SHUTDOWN = 7,

    // const unsigned * --
    // Gives a hint to the frontend how demanding this implementation is on
    // a system.
    SET_PERFORMANCE_LEVEL = 8,

    // const char ** --
    // Returns the "system" directory of the frontend. Used to store
    // system-specific content such as BIOSes, configuration data, etc.
    GET_SYSTEM_DIRECTORY = 9,

    // const enum PixelFormat * --
    // Sets the internal pixel format used by the implementation.
    // Should be called inside retro_load_game() or retro_get_system_av_info().
    SET_PIXEL_FORMAT = 10,

    // const struct InputDescriptor * --
    // Sets an array of retro_input_descriptors, terminated by an entry
    // whose description is NULL.
    SET_INPUT_DESCRIPTORS = 11,

    // const struct KeyboardCallback * --
    // Sets a callback function used to notify core about keyboard events.
    SET_KEYBOARD_CALLBACK = 12,

    // const struct DiskControlCallback * --
    // Sets an interface which the frontend can use to eject and insert
    // disk images, for games which consist of multiple images.
    SET_DISK_CONTROL_INTERFACE = 13,

    // struct HwRenderCallback * --
    // Sets an interface to let a libretro core render with hardware
    // acceleration.
    SET_HW_RENDER = 14,

    // struct Variable * --
    // Interface to acquire user-defined information that cannot feasibly
    // be supported in a multi-system way. 'key' must already have been set
    // by SET_VARIABLES.
    GET_VARIABLE = 15,

    // const struct Variable * --
    // Allows an implementation to signal the environment which variables
    // it might want to check for later using GET_VARIABLE. Terminated by
    // a { NULL, NULL } element. First option is treated as the default.
    SET_VARIABLES = 16,

    // bool * --
    // Result is set to true if some variables were updated since the last
    // call to GET_VARIABLE_UPDATE.
    GET_VARIABLE_UPDATE = 17,

    // const bool * --
    // If true, the implementation supports retro_load_game(NULL).
    SET_SUPPORT_NO_GAME = 18,

    // const char ** --
    // Retrieves the absolute path this plugin was loaded from.
    GET_LIBRETRO_PATH = 19,

    // const struct FrameTimeCallback * --
    // Lets the core know how much time has passed since the last
    // retro_run() invocation.
    SET_FRAME_TIME_CALLBACK = 21,

    // const struct AudioCallback * --
    // Sets an interface used to notify a core about audio being available
    // for writing.
    SET_AUDIO_CALLBACK = 22,

    // struct RumbleInterface * --
    // Gets an interface used to set the state of rumble motors.
    GET_RUMBLE_INTERFACE = 23,

    // uint64_t * --
    // Gets a bitmask of device types expected to be handled in
    // retro_input_state_t.
    GET_INPUT_DEVICE_CAPABILITIES = 24,

    // struct SensorInterface * --
    GET_SENSOR_INTERFACE = 25 | ENVIRONMENT_EXPERIMENTAL,

    // struct CameraCallback * --
    GET_CAMERA_INTERFACE = 26 | ENVIRONMENT_EXPERIMENTAL,

    // struct LogCallback * --
    // Gets an interface for logging in a cross-platform way. If unused,
    // cores should log to stderr.
    GET_LOG_INTERFACE = 27,

    // struct PerfCallback * --
    GET_PERF_INTERFACE = 28,

    // struct LocationCallback * --
    GET_LOCATION_INTERFACE = 29,

    // const char ** --
    // Returns the "core assets" directory of the frontend.
    GET_CORE_ASSETS_DIRECTORY = 30,

    // const char ** --
    // Returns the "save" directory of the frontend, for SRAM, memory
    // cards, high scores, etc.
    GET_SAVE_DIRECTORY = 31,

    // const struct SystemAvInfo * --
    // Sets a new av_info structure. Can only be called from retro_run().
    SET_SYSTEM_AV_INFO = 32,

    // const struct GetProcAddressInterface * --
    SET_PROC_ADDRESS_CALLBACK = 33,

    // const struct SubsystemInfo * --
    SET_SUBSYSTEM_INFO = 34,

    // const struct ControllerInfo * --
    SET_CONTROLLER_INFO = 35,

    // const struct MemoryMap * --
    SET_MEMORY_MAPS = 36 | ENVIRONMENT_EXPERIMENTAL,

    // const struct GameGeometry * --
    // Similar to SET_SYSTEM_AV_INFO but guarantees drivers will not be
    // reinitialized. Can only be called from retro_run().
    SET_GEOMETRY = 37,

    // const char ** --
    GET_USERNAME = 38,

    // unsigned * --
    GET_LANGUAGE = 39,

    // struct Framebuffer * --
    GET_CURRENT_SOFTWARE_FRAMEBUFFER = 40 | ENVIRONMENT_EXPERIMENTAL,

    // const struct HwRenderInterface ** --
    GET_HW_RENDER_INTERFACE = 41 | ENVIRONMENT_EXPERIMENTAL,

    // uint64_t * --
    // Gets a bitmask telling which device-id values can be queried with a
    // single GET_INPUT_BITMASKS read of RETRO_DEVICE_ID_JOYPAD_MASK,
    // instead of one input_state_t call per button.
    GET_INPUT_BITMASKS = 51 | ENVIRONMENT_EXPERIMENTAL,

    // unsigned * --
    // Returns the version of the core options API supported (0 or 1). If
    // the frontend does not support this call, the core falls back to
    // SET_VARIABLES.
    GET_CORE_OPTIONS_VERSION = 52,

    // const struct CoreOptionDefinition ** --
    // v1 replacement for SET_VARIABLES that carries human-readable labels
    // per value alongside each key.
    SET_CORE_OPTIONS = 53,

    // const struct CoreOptionsIntl * --
    // Localized variant of SET_CORE_OPTIONS: `us` is the English fallback
    // definitions, `local` is the frontend-language set (may be NULL).
    SET_CORE_OPTIONS_INTL = 54,

    // const struct CoreOptionDisplay * --
    // Tells the frontend whether a previously-registered option should be
    // shown in its menu.
    SET_CORE_OPTIONS_DISPLAY = 55,

    // unsigned * --
    // Returns the version of the disk control interface supported.
    GET_DISK_CONTROL_INTERFACE_VERSION = 57,

    // const struct DiskControlExtCallback * --
    // v1 replacement for SET_DISK_CONTROL_INTERFACE with image path/label
    // queries and an initial-image hint.
    SET_DISK_CONTROL_EXT_INTERFACE = 58,

    // const struct AudioBufferStatusCallback * --
    // Lets the core be notified of the frontend's audio buffer occupancy,
    // useful for adaptive frameskip.
    SET_AUDIO_BUFFER_STATUS_CALLBACK = 62,

    // const unsigned * --
    // Hints the minimum amount of audio latency, in milliseconds, the
    // frontend should target.
    SET_MINIMUM_AUDIO_LATENCY = 63,
}
