/// Time until the provider's daily quota resets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetEstimate {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

const MARKER: &str = "NEXT AVAILABLE IN";

impl ResetEstimate {
    /// Find `NEXT AVAILABLE IN <h> HOURS <m> MINUTES [<s> SECONDS]`, any case
    pub fn parse(text: &str) -> Option<Self> {
        let upper = text.to_uppercase();
        let start = upper.find(MARKER)? + MARKER.len();
        let mut tokens = upper[start..].split_whitespace();

        let hours = number(tokens.next()?)?;
        is_unit(tokens.next()?, "HOUR").then_some(())?;
        let minutes = number(tokens.next()?)?;
        is_unit(tokens.next()?, "MINUTE").then_some(())?;

        let seconds = match (tokens.next(), tokens.next()) {
            (Some(value), Some(unit)) if is_unit(unit, "SECOND") => number(value).unwrap_or(0),
            _ => 0,
        };

        Some(Self {
            hours,
            minutes,
            seconds,
        })
    }

    pub fn describe(&self) -> String {
        if self.hours > 0 {
            format!(
                "Limit resets in {} and {}",
                counted(self.hours, "hour"),
                counted(self.minutes, "minute")
            )
        } else if self.minutes > 0 {
            format!("Limit resets in {}", counted(self.minutes, "minute"))
        } else {
            format!("Limit resets in {}", counted(self.seconds, "second"))
        }
    }
}

/// Message for a quota-exhausted response, with a reset time when one is given
pub fn quota_message(translated_text: &str) -> String {
    let when = ResetEstimate::parse(translated_text)
        .map(|estimate| estimate.describe())
        .unwrap_or_else(|| "Please try again later".to_string());
    format!("The daily limit of the free translation service has been reached. {when}.")
}

fn number(token: &str) -> Option<u64> {
    token.parse().ok()
}

fn is_unit(token: &str, unit: &str) -> bool {
    let word = token.trim_end_matches(|c: char| !c.is_ascii_alphabetic());
    word == unit || word.strip_suffix('S') == Some(unit)
}

fn counted(count: u64, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}
