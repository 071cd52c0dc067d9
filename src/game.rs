use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A loaded game image and the names derived from its path.
pub struct Game {
    pub path: PathBuf,
    pub basename: String,
    pub bytes: Vec<u8>,
}

impl Game {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let bytes = fs::read(&path).with_context(|| format!("failed to read rom `{}`", path.display()))?;
        let basename = basename_from_path(&path)?;

        Ok(Self {
            path,
            basename,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Derives a short uppercase tag from the rom's file stem, the way a
    /// frontend picks a default tag when the user has not overridden one.
    pub fn default_tag(&self) -> String {
        tag_from_rom_path(&self.path)
    }
}

/// The file name a rom path's basename is derived from, without reading its
/// contents — needed before the rom is actually opened, since [`Paths`](crate::paths::Paths)
/// and the plugin's system directory are set up ahead of `Game::open` in the
/// mandated startup order.
pub fn basename_from_path(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .context("rom path has no file name")
}

/// Derives a short uppercase tag from a rom path's file stem without
/// reading the rom, for the same reason as [`basename_from_path`].
pub fn tag_from_rom_path(path: &Path) -> String {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();

    stem.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(7)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_tag_uppercases_and_truncates() {
        let dir = tempfile_dir();
        let path = dir.join("pokemoncrystal.gbc");
        fs::File::create(&path).unwrap().write_all(b"x").unwrap();

        let game = Game::open(&path).unwrap();

        assert_eq!(game.default_tag(), "POKEMON");
    }

    #[test]
    fn basename_from_path_does_not_require_the_file_to_exist() {
        let basename = basename_from_path(Path::new("/roms/Tetris (World).gb")).unwrap();
        assert_eq!(basename, "Tetris (World).gb");
    }

    #[test]
    fn tag_from_rom_path_matches_default_tag() {
        assert_eq!(tag_from_rom_path(Path::new("/roms/pokemoncrystal.gbc")), "POKEMON");
    }

    fn tempfile_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("retrohost-game-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}
