use anyhow::bail;
use lesen_translator::Translator;

use crate::error::PipelineError;

const PROBE_TEXT: &str = "Hallo";

/// Translate a single word to see whether the provider answers
pub async fn check_translator(translator: &dyn Translator) -> anyhow::Result<String> {
    let meta = translator.metadata();
    tracing::info!(
        "Checking translation service {} ({})",
        meta.name,
        meta.language_pair
    );

    match translator.translate(PROBE_TEXT).await {
        Ok(result) => {
            tracing::info!("Translation service answered");
            Ok(format!(
                "{} is working: \"{}\" -> \"{}\"",
                meta.name, PROBE_TEXT, result.translated_text
            ))
        }
        Err(e) => {
            let error = PipelineError::from(e);
            tracing::error!("Translation service check failed: {:?}", error);
            bail!("{} check failed: {}", meta.name, error)
        }
    }
}
