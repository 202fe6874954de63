use serde::{Deserialize, Serialize};

fn default_combination() -> String {
    "CmdOrCtrl+Shift+T".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Global shortcut, in `global-hotkey` syntax
    #[serde(default = "default_combination")]
    pub combination: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            combination: default_combination(),
        }
    }
}
