//! Hand-written ABI surfaces not covered by `libretro-sys 0.1.1`.
//!
//! `libretro-sys` only models the original, stable subset of the libretro
//! API. The environment commands this host supports beyond that subset
//! (core options v1/intl/display, the disk control extension, audio buffer
//! status, minimum audio latency) need their C layouts written out by hand,
//! matching the public `libretro.h` struct shapes byte for byte.

use std::os::raw::{c_char, c_uint};

pub const RETRO_NUM_CORE_OPTION_VALUES_MAX: usize = 128;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct CoreOptionValue {
    pub value: *const c_char,
    pub label: *const c_char,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct CoreOptionDefinition {
    pub key: *const c_char,
    pub desc: *const c_char,
    pub info: *const c_char,
    pub values: [CoreOptionValue; RETRO_NUM_CORE_OPTION_VALUES_MAX],
    pub default_value: *const c_char,
}

#[repr(C)]
pub struct CoreOptionsIntl {
    pub us: *const CoreOptionDefinition,
    pub local: *const CoreOptionDefinition,
}

#[repr(C)]
pub struct CoreOptionDisplay {
    pub key: *const c_char,
    pub visible: bool,
}

pub type AudioBufferStatusFn = unsafe extern "C" fn(active: bool, occupancy: c_uint, underrun_likely: bool);

#[repr(C)]
pub struct AudioBufferStatusCallback {
    pub callback: Option<AudioBufferStatusFn>,
}

pub type SetEjectStateFn = unsafe extern "C" fn(ejected: bool) -> bool;
pub type GetEjectStateFn = unsafe extern "C" fn() -> bool;
pub type GetImageIndexFn = unsafe extern "C" fn() -> c_uint;
pub type SetImageIndexFn = unsafe extern "C" fn(index: c_uint) -> bool;
pub type GetNumImagesFn = unsafe extern "C" fn() -> c_uint;
pub type ReplaceImageIndexFn =
    unsafe extern "C" fn(index: c_uint, info: *const libretro_sys::GameInfo) -> bool;
pub type AddImageIndexFn = unsafe extern "C" fn() -> bool;
pub type SetInitialImageFn = unsafe extern "C" fn(index: c_uint, path: *const c_char) -> bool;
pub type GetImagePathFn = unsafe extern "C" fn(index: c_uint, path: *mut c_char, len: usize) -> bool;
pub type GetImageLabelFn = unsafe extern "C" fn(index: c_uint, label: *mut c_char, len: usize) -> bool;

#[repr(C)]
pub struct DiskControlCallback {
    pub set_eject_state: Option<SetEjectStateFn>,
    pub get_eject_state: Option<GetEjectStateFn>,
    pub get_image_index: Option<GetImageIndexFn>,
    pub set_image_index: Option<SetImageIndexFn>,
    pub get_num_images: Option<GetNumImagesFn>,
    pub replace_image_index: Option<ReplaceImageIndexFn>,
    pub add_image_index: Option<AddImageIndexFn>,
}

#[repr(C)]
pub struct DiskControlExtCallback {
    pub set_eject_state: Option<SetEjectStateFn>,
    pub get_eject_state: Option<GetEjectStateFn>,
    pub get_image_index: Option<GetImageIndexFn>,
    pub set_image_index: Option<SetImageIndexFn>,
    pub get_num_images: Option<GetNumImagesFn>,
    pub replace_image_index: Option<ReplaceImageIndexFn>,
    pub add_image_index: Option<AddImageIndexFn>,
    pub set_initial_image: Option<SetInitialImageFn>,
    pub get_image_path: Option<GetImagePathFn>,
    pub get_image_label: Option<GetImageLabelFn>,
}

impl DiskControlExtCallback {
    pub unsafe fn from_basic(basic: &DiskControlCallback) -> Self {
        Self {
            set_eject_state: basic.set_eject_state,
            get_eject_state: basic.get_eject_state,
            get_image_index: basic.get_image_index,
            set_image_index: basic.set_image_index,
            get_num_images: basic.get_num_images,
            replace_image_index: basic.replace_image_index,
            add_image_index: basic.add_image_index,
            set_initial_image: None,
            get_image_path: None,
            get_image_label: None,
        }
    }
}
