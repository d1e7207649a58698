// SPDX-License-Identifier: MIT

//! Inspirational quote client.

use serde::Deserialize;

/// Shown whenever the quote endpoint is unreachable or returns nonsense.
const FALLBACK_QUOTE: &str =
    "Success is not final, failure is not fatal: it is the courage to continue that counts.";

/// Quote endpoint client. Infallible by design: any failure degrades to
/// the hardcoded fallback.
#[derive(Clone)]
pub struct QuoteClient {
    http: reqwest::Client,
    url: String,
}

impl QuoteClient {
    pub fn new(url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }

    /// Fetch a random quote, falling back on any failure.
    pub async fn random_quote(&self) -> String {
        match self.fetch().await {
            Ok(quote) => quote,
            Err(e) => {
                tracing::warn!(error = %e, "Quote fetch failed, using fallback");
                FALLBACK_QUOTE.to_string()
            }
        }
    }

    async fn fetch(&self) -> Result<String, reqwest::Error> {
        #[derive(Deserialize)]
        struct QuoteResponse {
            #[serde(default)]
            success: bool,
            data: Option<QuoteData>,
        }
        #[derive(Deserialize)]
        struct QuoteData {
            #[serde(default)]
            content: String,
        }

        let response: QuoteResponse = self.http.get(&self.url).send().await?.json().await?;

        match response.data {
            Some(data) if response.success && !data.content.is_empty() => Ok(data.content),
            _ => Ok(FALLBACK_QUOTE.to_string()),
        }
    }
}
