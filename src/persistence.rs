//! Battery-backed SRAM and numbered save-state persistence.

use std::fs::{self, File};
use std::io::{Read, Write};

use crate::paths::Paths;
use crate::plugin::Plugin;

/// Slot 8 is the "default snapshot, may be absent" slot — a missing file
/// there is expected, not an error.
const SILENT_SLOT: u8 = 8;

/// Reads battery-backed SRAM from disk into the plugin's memory region. A
/// missing file, a zero-sized region, or a short read are all logged and
/// swallowed — emulation continues with whatever the plugin already has.
pub unsafe fn read_sram(paths: &Paths, plugin: &mut Plugin) {
    let region = plugin.save_ram_mut();

    if region.is_empty() {
        return;
    }

    let path = paths.sram_path();

    let mut file = match File::open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return,
        Err(err) => {
            log::error!("failed to open SRAM file `{}`: {err}", path.display());
            return;
        }
    };

    match file.read(region) {
        Ok(n) if n == region.len() => {}
        Ok(n) => log::warn!(
            "short SRAM read from `{}`: got {n} of {} bytes",
            path.display(),
            region.len()
        ),
        Err(err) => log::error!("failed to read SRAM file `{}`: {err}", path.display()),
    }
}

/// Writes the plugin's SRAM region to disk, fsyncing afterwards. A zero-
/// sized region is a no-op.
pub unsafe fn write_sram(paths: &Paths, plugin: &Plugin) {
    let region = plugin.save_ram();

    if region.is_empty() {
        return;
    }

    let path = paths.sram_path();

    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            log::error!("failed to create save directory `{}`: {err}", parent.display());
            return;
        }
    }

    if let Err(err) = write_exact_and_sync(&path, region) {
        log::error!("failed to write SRAM file `{}`: {err}", path.display());
    }
}

/// Reads save-state `slot` from disk and restores it into the plugin.
/// Missing files are silent for [`SILENT_SLOT`] and logged for every other
/// slot.
pub unsafe fn read_state(paths: &Paths, plugin: &mut Plugin, slot: u8) {
    let path = paths.state_path(slot);
    let size = plugin.serialize_size();

    if size == 0 {
        log::error!("plugin reports zero-sized state, cannot load slot {slot}");
        return;
    }

    let mut buf = vec![0u8; size];

    let mut file = match File::open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            if slot != SILENT_SLOT {
                log::error!("no save state at `{}`", path.display());
            }
            return;
        }
        Err(err) => {
            log::error!("failed to open state file `{}`: {err}", path.display());
            return;
        }
    };

    if let Err(err) = file.read_exact(&mut buf) {
        log::error!("failed to read state file `{}`: {err}", path.display());
        return;
    }

    if !plugin.unserialize(&buf) {
        log::error!("plugin rejected state loaded from `{}`", path.display());
    }
}

/// Serializes the plugin's full state and writes it to `slot`, fsyncing
/// afterwards.
pub unsafe fn write_state(paths: &Paths, plugin: &Plugin, slot: u8) {
    let path = paths.state_path(slot);
    let size = plugin.serialize_size();

    if size == 0 {
        log::error!("plugin reports zero-sized state, cannot save slot {slot}");
        return;
    }

    let mut buf = vec![0u8; size];

    if !plugin.serialize(&mut buf) {
        log::error!("plugin failed to serialize state for slot {slot}");
        return;
    }

    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            log::error!("failed to create state directory `{}`: {err}", parent.display());
            return;
        }
    }

    if let Err(err) = write_exact_and_sync(&path, &buf) {
        log::error!("failed to write state file `{}`: {err}", path.display());
    }
}

fn write_exact_and_sync(path: &std::path::Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tempdir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "retrohost-persistence-test-{name}-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn write_exact_and_sync_round_trips() {
        let dir = tempdir("write-sync");
        let path = dir.join("blob.bin");

        write_exact_and_sync(&path, &[1, 2, 3, 4]).unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn paths_route_slot_8_separately_from_other_slots() {
        let paths = Paths::new(
            tempdir("slots"),
            "miyoo354".to_owned(),
            "GBC".to_owned(),
            "gambatte".to_owned(),
            "game".to_owned(),
        );

        assert_ne!(paths.state_path(8), paths.state_path(0));
    }
}
