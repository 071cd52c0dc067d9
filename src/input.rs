use std::ffi::c_uint;

use enumset::{EnumSet, EnumSetType};
use minifb::{Key, Window};

/// One of the 16 libretro joypad ids this host can answer `input_state`
/// queries for.
#[derive(EnumSetType, Debug)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    Start,
    Select,
    L,
    L2,
    L3,
    R,
    R2,
    R3,
}

impl Button {
    pub fn from_raw_retro_joypad_device_id(device_id_joypad: c_uint) -> Option<Self> {
        Some(match device_id_joypad {
            libretro_sys::DEVICE_ID_JOYPAD_UP => Button::Up,
            libretro_sys::DEVICE_ID_JOYPAD_DOWN => Button::Down,
            libretro_sys::DEVICE_ID_JOYPAD_LEFT => Button::Left,
            libretro_sys::DEVICE_ID_JOYPAD_RIGHT => Button::Right,
            libretro_sys::DEVICE_ID_JOYPAD_A => Button::A,
            libretro_sys::DEVICE_ID_JOYPAD_B => Button::B,
            libretro_sys::DEVICE_ID_JOYPAD_X => Button::X,
            libretro_sys::DEVICE_ID_JOYPAD_Y => Button::Y,
            libretro_sys::DEVICE_ID_JOYPAD_SELECT => Button::Select,
            libretro_sys::DEVICE_ID_JOYPAD_START => Button::Start,
            libretro_sys::DEVICE_ID_JOYPAD_L => Button::L,
            libretro_sys::DEVICE_ID_JOYPAD_L2 => Button::L2,
            libretro_sys::DEVICE_ID_JOYPAD_L3 => Button::L3,
            libretro_sys::DEVICE_ID_JOYPAD_R => Button::R,
            libretro_sys::DEVICE_ID_JOYPAD_R2 => Button::R2,
            libretro_sys::DEVICE_ID_JOYPAD_R3 => Button::R3,
            _ => return None,
        })
    }

    const fn bit(self) -> i16 {
        1i16 << (self as u8)
    }
}

/// Physical device buttons the host itself reads, distinct from the
/// libretro joypad id space [`Button`] answers queries in. POWER and MENU
/// never reach the plugin; they only drive host-side control flow.
#[derive(EnumSetType, Debug)]
pub enum DeviceButton {
    Power,
    Menu,
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    Start,
    Select,
    L1,
    L2,
    R1,
    R2,
}

/// A polled, edge-triggered source of device button state. `poll` must
/// return a fresh, independent snapshot on every call.
pub trait InputDevice {
    fn poll(&mut self) -> EnumSet<DeviceButton>;
}

/// A hotkey fired by [`InputMap::poll`]'s edge detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    None,
    LoadState,
    SaveState,
}

/// Owns the one-snapshot-per-poll discipline: `poll` takes a fresh reading
/// from the device, evaluates the MENU+L1/R1 hotkey policy against it, and
/// the snapshot then answers every `input_state` query until the next
/// poll.
pub struct InputMap {
    previous: EnumSet<DeviceButton>,
    current: EnumSet<DeviceButton>,
}

impl InputMap {
    pub fn new() -> Self {
        Self {
            previous: EnumSet::empty(),
            current: EnumSet::empty(),
        }
    }

    pub fn poll(&mut self, device: &mut dyn InputDevice) -> Hotkey {
        self.previous = self.current;
        self.current = device.poll();

        if self.current.contains(DeviceButton::Menu) {
            if self.just_pressed(DeviceButton::L1) {
                return Hotkey::LoadState;
            }

            if self.just_pressed(DeviceButton::R1) {
                return Hotkey::SaveState;
            }
        }

        Hotkey::None
    }

    pub fn power_just_released(&self) -> bool {
        self.previous.contains(DeviceButton::Power) && !self.current.contains(DeviceButton::Power)
    }

    fn just_pressed(&self, button: DeviceButton) -> bool {
        self.current.contains(button) && !self.previous.contains(button)
    }

    /// Answers an `input_state` query: `id == JOYPAD_MASK` returns the
    /// whole bitmask, any other recognized id returns just that bit.
    pub fn query(&self, device_id_joypad: c_uint) -> i16 {
        if device_id_joypad == libretro_sys::DEVICE_ID_JOYPAD_MASK {
            return self.bitmask();
        }

        match Button::from_raw_retro_joypad_device_id(device_id_joypad) {
            Some(button) if self.joypad_buttons().contains(button) => 1,
            _ => 0,
        }
    }

    fn bitmask(&self) -> i16 {
        self.joypad_buttons()
            .iter()
            .fold(0, |mask, button| mask | button.bit())
    }

    fn joypad_buttons(&self) -> EnumSet<Button> {
        let mut buttons = EnumSet::empty();

        let mut set = |device: DeviceButton, button: Button| {
            if self.current.contains(device) {
                buttons.insert(button);
            }
        };

        set(DeviceButton::Up, Button::Up);
        set(DeviceButton::Down, Button::Down);
        set(DeviceButton::Left, Button::Left);
        set(DeviceButton::Right, Button::Right);
        set(DeviceButton::A, Button::A);
        set(DeviceButton::B, Button::B);
        set(DeviceButton::X, Button::X);
        set(DeviceButton::Y, Button::Y);
        set(DeviceButton::Start, Button::Start);
        set(DeviceButton::Select, Button::Select);
        set(DeviceButton::L1, Button::L);
        set(DeviceButton::L2, Button::L2);
        set(DeviceButton::R1, Button::R);
        set(DeviceButton::R2, Button::R2);

        buttons
    }
}

impl Default for InputMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Default [`InputDevice`] backed by a `minifb` window's keyboard state.
/// POWER is bound to Escape, MENU to Tab, since there is no real handheld
/// chassis behind a desktop window.
pub struct MinifbInputDevice;

impl MinifbInputDevice {
    fn read(window: &Window) -> EnumSet<DeviceButton> {
        let mut buttons = EnumSet::empty();

        let mut bind = |key: Key, button: DeviceButton| {
            if window.is_key_down(key) {
                buttons.insert(button);
            }
        };

        bind(Key::Escape, DeviceButton::Power);
        bind(Key::Tab, DeviceButton::Menu);
        bind(Key::Up, DeviceButton::Up);
        bind(Key::Down, DeviceButton::Down);
        bind(Key::Left, DeviceButton::Left);
        bind(Key::Right, DeviceButton::Right);
        bind(Key::X, DeviceButton::A);
        bind(Key::Z, DeviceButton::B);
        bind(Key::S, DeviceButton::X);
        bind(Key::A, DeviceButton::Y);
        bind(Key::Enter, DeviceButton::Start);
        bind(Key::RightShift, DeviceButton::Select);
        bind(Key::Q, DeviceButton::L1);
        bind(Key::W, DeviceButton::L2);
        bind(Key::E, DeviceButton::R1);
        bind(Key::R, DeviceButton::R2);

        buttons
    }
}

/// Polls keyboard state from a `minifb` window borrowed for the duration
/// of the call.
pub struct WindowInputDevice<'a> {
    pub window: &'a Window,
}

impl InputDevice for WindowInputDevice<'_> {
    fn poll(&mut self) -> EnumSet<DeviceButton> {
        MinifbInputDevice::read(self.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeDevice(EnumSet<DeviceButton>);

    impl InputDevice for FakeDevice {
        fn poll(&mut self) -> EnumSet<DeviceButton> {
            self.0
        }
    }

    #[test]
    fn menu_plus_just_pressed_l1_loads_state() {
        let mut map = InputMap::new();
        let mut device = FakeDevice(DeviceButton::Menu | DeviceButton::L1);

        assert_eq!(map.poll(&mut device), Hotkey::LoadState);
    }

    #[test]
    fn l1_held_across_polls_does_not_repeat_hotkey() {
        let mut map = InputMap::new();
        let mut device = FakeDevice(DeviceButton::Menu | DeviceButton::L1);

        assert_eq!(map.poll(&mut device), Hotkey::LoadState);
        assert_eq!(map.poll(&mut device), Hotkey::None);
    }

    #[test]
    fn menu_plus_just_pressed_r1_saves_state() {
        let mut map = InputMap::new();
        let mut device = FakeDevice(EnumSet::empty());
        map.poll(&mut device);

        let mut device = FakeDevice(DeviceButton::Menu | DeviceButton::R1);
        assert_eq!(map.poll(&mut device), Hotkey::SaveState);
    }

    #[test]
    fn joypad_mask_matches_individual_bit_queries() {
        let mut map = InputMap::new();
        let mut device = FakeDevice(DeviceButton::A | DeviceButton::Up);
        map.poll(&mut device);

        let mask = map.query(libretro_sys::DEVICE_ID_JOYPAD_MASK);
        assert_eq!(mask & Button::A.bit(), Button::A.bit());
        assert_eq!(map.query(libretro_sys::DEVICE_ID_JOYPAD_A), 1);
        assert_eq!(map.query(libretro_sys::DEVICE_ID_JOYPAD_B), 0);
    }

    #[test]
    fn power_release_edge_is_detected_once() {
        let mut map = InputMap::new();
        let mut device = FakeDevice(DeviceButton::Power.into());
        map.poll(&mut device);
        assert!(!map.power_just_released());

        let mut device = FakeDevice(EnumSet::empty());
        map.poll(&mut device);
        assert!(map.power_just_released());

        map.poll(&mut device);
        assert!(!map.power_just_released());
    }
}
