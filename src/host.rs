//! Wires [`Paths`], [`Persistence`](crate::persistence), [`Scaler`],
//! [`InputMap`], [`EnvironmentStore`], [`Plugin`], [`VideoSink`] and
//! [`AudioSink`] behind the one callback surface `Plugin::open` installs,
//! and drives the per-frame loop described in spec.md §4.6.

use std::cell::RefCell;
use std::ffi::{c_uint, c_void};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use libretro_sys::PixelFormat;

use crate::audio::{AudioSink, RodioSink};
use crate::environment::EnvironmentStore;
use crate::environment_command::Command;
use crate::game::{self, Game};
use crate::input::{Hotkey, InputMap, WindowInputDevice};
use crate::paths::Paths;
use crate::persistence;
use crate::plugin::{Callbacks, Plugin, STATE};
use crate::scaler::{Scaler, ScalerKind};
use crate::video::{Frame, MinifbSink, VideoSink};

/// Save-state slot the MENU+L1/R1 hotkeys read and write, matching the
/// reference frontend's default slot before a user has picked one from a
/// menu this host does not implement.
const HOTKEY_SLOT: u8 = 0;

const DEFAULT_SCREEN_WIDTH: usize = 640;
const DEFAULT_SCREEN_HEIGHT: usize = 480;

pub struct HostConfig {
    pub plugin_path: PathBuf,
    pub rom_path: PathBuf,
    pub tag: Option<String>,
    pub sdcard: PathBuf,
    pub platform: String,
    pub scaler: ScalerKind,
}

/// Everything the frame loop needs that is not the plugin's own function
/// table: the environment broker, scaler, input map, and the video/audio
/// sinks. Held behind `Rc<RefCell<_>>` so the same instance can both back
/// the plugin's thread-local callback trampolines (reentered from inside
/// `retro_run`) and be inspected by [`FrameLoop`] between `run` calls,
/// where the hotkey a poll captured is drained and the render cadence is
/// logged.
struct HostState {
    environment: EnvironmentStore,
    scaler: Scaler,
    input: InputMap,
    video: MinifbSink,
    // `None` until the plugin's real sample rate is known (after
    // `get_system_av_info`, per the mandated startup order in spec.md
    // §4.6) — callbacks may be installed and even fire before then, so
    // audio samples delivered that early are simply dropped.
    audio: Option<RodioSink>,
    pending_hotkey: Hotkey,
    rendered_frames: u64,
}

impl HostState {
    fn video_refresh(&mut self, frame: Option<Frame>) {
        // A dupe frame (data == NULL, GET_CAN_DUPE having reported true)
        // is explicitly tolerated: skip the redraw, keep the prior frame.
        let Some(frame) = frame else { return };

        let pixel_format_ok = STATE.with_borrow(|state| state.pixel_format == PixelFormat::RGB565);
        if !pixel_format_ok {
            log::warn!("video_refresh called before pixel format negotiated to RGB565, skipping frame");
            return;
        }

        self.scaler.scale(&frame, &mut self.video);

        if let Err(err) = self.video.present() {
            log::error!("failed to present video frame: {err}");
        }

        self.rendered_frames += 1;
    }

    fn input_poll(&mut self) {
        let mut device = WindowInputDevice {
            window: self.video.window(),
        };

        self.pending_hotkey = self.input.poll(&mut device);
    }

    fn power_just_released(&self) -> bool {
        self.input.power_just_released()
    }

    fn window_open(&self) -> bool {
        self.video.window().is_open()
    }

    fn take_pending_hotkey(&mut self) -> Hotkey {
        std::mem::replace(&mut self.pending_hotkey, Hotkey::None)
    }
}

/// The `Box<dyn Callbacks>` the plugin's trampolines actually call into.
/// Delegates every method to the shared [`HostState`], which [`FrameLoop`]
/// also holds a clone of.
struct SharedHost(Rc<RefCell<HostState>>);

impl Callbacks for SharedHost {
    fn video_refresh(&mut self, frame: Option<Frame>) {
        self.0.borrow_mut().video_refresh(frame)
    }

    fn audio_sample(&mut self, left: i16, right: i16) {
        if let Some(audio) = &mut self.0.borrow_mut().audio {
            audio.push_sample(left, right);
        }
    }

    fn audio_samples(&mut self, samples: &[i16]) -> usize {
        if let Some(audio) = &mut self.0.borrow_mut().audio {
            audio.push_samples(samples);
        }
        samples.len() / 2
    }

    fn input_poll(&mut self) {
        self.0.borrow_mut().input_poll()
    }

    fn input_state(&self, _port: c_uint, _device: c_uint, _index: c_uint, id: c_uint) -> i16 {
        self.0.borrow().input.query(id)
    }

    unsafe fn environment(&mut self, command: Command, data: *mut c_void) -> bool {
        self.0.borrow_mut().environment.dispatch(command, data)
    }
}

/// Drives the mandatory startup → per-frame → shutdown ordering from
/// spec.md §4.6. Owns the plugin, the game, and the shared host state for
/// the duration of one run.
pub struct FrameLoop {
    plugin: Plugin,
    // Kept alive for as long as the plugin has the game loaded: the ABI
    // does not copy the rom bytes handed to `retro_load_game`, it borrows
    // them for the lifetime of the load.
    game: Game,
    paths: Paths,
    state: Rc<RefCell<HostState>>,
}

impl FrameLoop {
    /// Startup order (must not be reordered): init graphics → open plugin →
    /// plugin init → open game → plugin load_game → SRAM_read →
    /// get_system_av_info → init audio sink with (fps, sample_rate).
    pub fn start(config: HostConfig) -> Result<Self> {
        // `tag`/`plugin_name`/`game_basename` only need the rom and plugin
        // *paths*, not the rom's contents, so `Paths` and the plugin's
        // system directory can be set up ahead of `Game::open` (the "open
        // game" step) without disturbing the mandated order below.
        let tag = config
            .tag
            .unwrap_or_else(|| game::tag_from_rom_path(&config.rom_path));
        let plugin_name = plugin_name_from_path(&config.plugin_path);
        let game_basename = game::basename_from_path(&config.rom_path)?;

        let paths = Paths::new(
            config.sdcard,
            config.platform,
            tag,
            plugin_name,
            game_basename,
        );

        std::fs::create_dir_all(paths.system_directory())
            .context("failed to create plugin system directory")?;

        let environment = EnvironmentStore::new(&paths).context("failed to initialize environment store")?;

        // init graphics
        let video = MinifbSink::new("retrohost", DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT)
            .context("failed to open video window")?;

        let state = Rc::new(RefCell::new(HostState {
            environment,
            scaler: Scaler::new(config.scaler),
            input: InputMap::new(),
            video,
            audio: None,
            pending_hotkey: Hotkey::None,
            rendered_frames: 0,
        }));

        let callbacks: Box<dyn Callbacks> = Box::new(SharedHost(Rc::clone(&state)));

        // open plugin
        //
        // Safety: single-threaded host, one plugin per process, callbacks
        // installed before `init` per the invariant in spec.md §3.
        let mut plugin = unsafe { Plugin::open(&config.plugin_path, callbacks) }
            .context("failed to open plugin")?;

        let system_info = plugin.get_system_info();
        log::info!(
            "loaded plugin `{}` ({})",
            system_info.library_name,
            system_info.library_version
        );

        // plugin init
        unsafe { plugin.init() };

        // open game
        let game = Game::open(&config.rom_path).context("failed to read rom")?;

        // plugin load_game
        unsafe { plugin.load_game(&game) }.context("failed to load game")?;

        // SRAM_read
        unsafe { persistence::read_sram(&paths, &mut plugin) };

        // get_system_av_info
        let av_info = plugin.get_system_av_info();
        let fps = av_info.timing.fps;
        let sample_rate = av_info.timing.sample_rate;

        log::info!("system av info: fps={fps} sample_rate={sample_rate}");

        // init audio sink with (fps, sample_rate)
        let audio = RodioSink::new(sample_rate as u32).context("failed to open audio sink")?;

        {
            let mut state = state.borrow_mut();
            state.environment.set_fps(fps);
            state.audio = Some(audio);
        }

        Ok(Self {
            plugin,
            game,
            paths,
            state,
        })
    }

    /// Runs frames until the POWER button is released, then tears the
    /// plugin down in the mandated shutdown order: close game → shutdown
    /// audio → SRAM_write → plugin unload_game → plugin deinit → close
    /// handle → free screen → shutdown graphics.
    pub fn run(mut self) -> Result<()> {
        let mut last_log = Instant::now();
        let mut emulated_frames = 0u64;

        loop {
            let state = self.state.borrow();
            if state.power_just_released() || !state.window_open() {
                break;
            }
            drop(state);

            unsafe { self.plugin.run() };
            emulated_frames += 1;

            let hotkey = self.state.borrow_mut().take_pending_hotkey();
            match hotkey {
                Hotkey::LoadState => unsafe {
                    persistence::read_state(&self.paths, &mut self.plugin, HOTKEY_SLOT)
                },
                Hotkey::SaveState => unsafe {
                    persistence::write_state(&self.paths, &self.plugin, HOTKEY_SLOT)
                },
                Hotkey::None => {}
            }

            if last_log.elapsed() >= Duration::from_secs(1) {
                let rendered_frames = self.state.borrow().rendered_frames;
                log::info!("cadence: emulated={emulated_frames} rendered={rendered_frames}");
                last_log = Instant::now();
            }
        }

        self.shutdown()
    }

    fn shutdown(mut self) -> Result<()> {
        unsafe { persistence::write_sram(&self.paths, &self.plugin) };
        unsafe { self.plugin.unload_game() };
        unsafe { self.plugin.deinit() };

        Ok(())
    }
}

/// A plugin's name is its shared-object file stem with everything from
/// the last underscore onward stripped (`gambatte_libretro.so` → `gambatte`).
fn plugin_name_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match stem.rfind('_') {
        Some(idx) => stem[..idx].to_owned(),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_name_strips_from_last_underscore() {
        assert_eq!(
            plugin_name_from_path(Path::new("/cores/gambatte_libretro.so")),
            "gambatte"
        );
        assert_eq!(
            plugin_name_from_path(Path::new("/cores/mgba_libretro_android.so")),
            "mgba_libretro"
        );
    }

    #[test]
    fn plugin_name_with_no_underscore_is_the_whole_stem() {
        assert_eq!(plugin_name_from_path(Path::new("/cores/gambatte.so")), "gambatte");
    }
}
