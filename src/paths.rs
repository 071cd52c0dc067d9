use std::path::PathBuf;

/// Single source of truth for every path the host derives from the sdcard
/// root, the platform identifier, the plugin tag, and the game's basename.
pub struct Paths {
    root: PathBuf,
    platform: String,
    tag: String,
    plugin_name: String,
    game_name: String,
}

impl Paths {
    pub fn new(
        root: PathBuf,
        platform: String,
        tag: String,
        plugin_name: String,
        game_name: String,
    ) -> Self {
        Self {
            root,
            platform,
            tag,
            plugin_name,
            game_name,
        }
    }

    pub fn system_directory(&self) -> PathBuf {
        self.root
            .join(".userdata")
            .join(&self.platform)
            .join(format!("{}-{}", self.tag, self.plugin_name))
    }

    pub fn save_directory(&self) -> PathBuf {
        self.root.join("Saves").join(&self.tag)
    }

    pub fn sram_path(&self) -> PathBuf {
        self.save_directory()
            .join(format!("{}.sav", self.game_name))
    }

    pub fn state_path(&self, slot: u8) -> PathBuf {
        self.system_directory()
            .join(format!("{}.st{}", self.game_name, slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> Paths {
        Paths::new(
            PathBuf::from("/sdcard"),
            "miyoo354".to_owned(),
            "GBC".to_owned(),
            "gambatte".to_owned(),
            "Pokemon Crystal".to_owned(),
        )
    }

    #[test]
    fn sram_path_shape() {
        assert_eq!(
            paths().sram_path(),
            PathBuf::from("/sdcard/Saves/GBC/Pokemon Crystal.sav"),
        );
    }

    #[test]
    fn state_path_shape() {
        assert_eq!(
            paths().state_path(3),
            PathBuf::from("/sdcard/.userdata/miyoo354/GBC-gambatte/Pokemon Crystal.st3"),
        );
    }

    #[test]
    fn system_directory_is_shared_with_state_path() {
        assert!(paths().state_path(0).starts_with(paths().system_directory()));
    }
}
