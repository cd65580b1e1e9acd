use anyhow::Result;
use fantoccini::elements::Element;
use rand::rngs::OsRng;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

#[derive(Debug, Clone, Default)]
/// Produces human-like delays and typing behavior.
///
/// The portal's front-end re-renders between most interactions; every pause
/// here is either jittered (before probes) or a fixed settle after an action
/// the page needs to absorb.
pub struct Cadence {}

impl Cadence {
    pub fn new() -> Self {
        Self {}
    }

    /// Sleep for a random duration between `min` and `max` milliseconds.
    pub async fn random_delay(&self, min: u64, max: u64) {
        let mut rng = OsRng;
        let ms = rng.gen_range(min..=max);
        sleep(Duration::from_millis(ms)).await;
    }

    /// Fixed pause after an action that triggers a re-render or navigation.
    pub async fn settle(&self, ms: u64) {
        debug!(target: "browser.cadence", ms, "settling");
        sleep(Duration::from_millis(ms)).await;
    }

    /// Type the provided text with small random delays between characters.
    pub async fn type_text_human_like(&self, element: &Element, text: &str) -> Result<()> {
        for ch in text.chars() {
            element.send_keys(&ch.to_string()).await?;
            self.random_delay(30, 150).await;
        }
        Ok(())
    }
}
