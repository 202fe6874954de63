use serde::{Deserialize, Serialize};

fn default_always_on_top() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    /// Keep the selection overlay above every other window
    #[serde(default = "default_always_on_top")]
    pub always_on_top: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            always_on_top: default_always_on_top(),
        }
    }
}
