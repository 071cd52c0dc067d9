use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::host::{FrameLoop, HostConfig};
use crate::scaler::ScalerKind;

mod abi;
mod audio;
mod environment;
mod environment_command;
mod error;
mod game;
mod host;
mod input;
mod paths;
mod persistence;
mod plugin;
mod scaler;
mod video;

#[derive(clap::Parser)]
#[command(version, about = "Loads a libretro-ABI plugin and drives it frame by frame")]
struct Cli {
    /// Path to the plugin's shared object (the libretro "core").
    #[clap(long, env = "RETROHOST_PLUGIN")]
    plugin: PathBuf,

    /// Path to the game image the plugin should load.
    #[clap(long, env = "RETROHOST_ROM")]
    rom: PathBuf,

    /// Overrides the tag derived from the rom's file stem.
    #[clap(long)]
    tag: Option<String>,

    /// Root directory standing in for the handheld's SDCARD.
    #[clap(long, env = "RETROHOST_SDCARD", default_value = ".")]
    sdcard: PathBuf,

    /// Platform identifier used in the save-state directory layout.
    #[clap(long, env = "RETROHOST_PLATFORM", default_value = "native")]
    platform: String,

    /// Scaler kernel used to present the plugin's framebuffer.
    #[clap(long, value_enum, default_value = "nearest")]
    scaler: ScalerArg,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ScalerArg {
    Nearest,
    Lcd,
    Dmg,
}

impl From<ScalerArg> for ScalerKind {
    fn from(scaler: ScalerArg) -> Self {
        match scaler {
            ScalerArg::Nearest => ScalerKind::Nearest,
            ScalerArg::Lcd => ScalerKind::Lcd,
            ScalerArg::Dmg => ScalerKind::Dmg,
        }
    }
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let config = HostConfig {
        plugin_path: cli.plugin,
        rom_path: cli.rom,
        tag: cli.tag,
        sdcard: cli.sdcard,
        platform: cli.platform,
        scaler: cli.scaler.into(),
    };

    let frame_loop = match FrameLoop::start(config) {
        Ok(frame_loop) => frame_loop,
        Err(err) => {
            log::error!("fatal: failed to start host: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = frame_loop.run() {
        log::error!("host exited with error: {err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
