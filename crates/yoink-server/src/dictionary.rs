use std::collections::HashSet;
use std::time::Duration;

use yoink_core::dictionary::Dictionary;

use crate::config::DictionaryConfig;

/// Load the process-wide dictionary. Every configured URL is fetched and the
/// successful lists are merged; if nothing usable loads, the built-in
/// fallback set keeps the server playable. Runs to completion before the
/// listener binds, so rooms never see a partially loaded set.
pub async fn load_dictionary(config: &DictionaryConfig) -> Dictionary {
    if config.urls.is_empty() {
        tracing::info!("No dictionary sources configured, using built-in fallback set");
        return Dictionary::fallback();
    }

    let client = match reqwest::Client::builder()
        .user_agent(concat!("yoink-server/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client, using fallback dictionary");
            return Dictionary::fallback();
        },
    };

    let mut words: HashSet<String> = HashSet::new();
    for url in &config.urls {
        match fetch_word_list(&client, url).await {
            Ok(list) => {
                tracing::info!(url = %url, words = list.len(), "Loaded dictionary source");
                words.extend(list);
            },
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to load dictionary source");
            },
        }
    }

    if words.is_empty() {
        tracing::warn!("All dictionary sources failed, using built-in fallback set");
        return Dictionary::fallback();
    }

    let dictionary = Dictionary::from_words(words);
    tracing::info!(words = dictionary.len(), "Dictionary ready");
    dictionary
}

async fn fetch_word_list(client: &reqwest::Client, url: &str) -> Result<Vec<String>, reqwest::Error> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(parse_word_list(&body))
}

/// One word per line, case-insensitive. Lines with non-alphabetic characters
/// or fewer than two letters are skipped.
fn parse_word_list(body: &str) -> Vec<String> {
    body.lines()
        .map(|line| line.trim().to_ascii_uppercase())
        .filter(|w| w.len() >= 2 && w.bytes().all(|b| b.is_ascii_uppercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DictionaryConfig;

    #[test]
    fn parse_filters_junk_lines() {
        let body = "cat\nDOG\n  bird  \nx\n123\ndon't\n\n";
        let words = parse_word_list(body);
        assert_eq!(words, vec!["CAT", "DOG", "BIRD"]);
    }

    #[tokio::test]
    async fn no_sources_yields_fallback() {
        let dict = load_dictionary(&DictionaryConfig::default()).await;
        assert!(dict.contains("CAT"));
        assert!(!dict.is_empty());
    }

    #[tokio::test]
    async fn unreachable_source_yields_fallback() {
        let config = DictionaryConfig {
            urls: vec!["http://127.0.0.1:1/words.txt".to_string()],
            fetch_timeout_secs: 1,
        };
        let dict = load_dictionary(&config).await;
        assert!(dict.contains("CAT"), "fallback keeps the game playable");
    }
}
