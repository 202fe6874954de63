use serde::{Deserialize, Serialize};

fn default_endpoint() -> String {
    "https://api.mymemory.translated.net/get".to_string()
}

fn default_source_lang() -> String {
    "de".to_string()
}

fn default_target_lang() -> String {
    "en".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    /// The provider rejects requests without a User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl TranslatorConfig {
    /// `de|en` style pair the provider expects
    pub fn language_pair(&self) -> String {
        format!("{}|{}", self.source_lang, self.target_lang)
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            user_agent: default_user_agent(),
        }
    }
}
