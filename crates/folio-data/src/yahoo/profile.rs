//! Company profile and analyst data from the Yahoo quoteSummary endpoint.
//!
//! The quoteSummary API requires a session cookie plus a "crumb" token; the
//! client fetches the pair lazily, caches it, and drops it when Yahoo
//! rejects it so the next call re-authenticates.

use crate::error::{DataError, Result};
use serde::Deserialize;
use tokio::sync::Mutex;

const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

/// Classification and analyst fields for a symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyProfile {
    /// Sector classification.
    pub sector: Option<String>,
    /// Industry classification.
    pub industry: Option<String>,
    /// Mean analyst price target.
    pub analyst_target: Option<f64>,
}

#[derive(Debug, Clone)]
struct Crumb {
    cookie: String,
    value: String,
}

/// HTTP client for the quoteSummary endpoint with cached crumb auth.
#[derive(Debug)]
pub(crate) struct ProfileClient {
    client: reqwest::Client,
    crumb: Mutex<Option<Crumb>>,
}

impl ProfileClient {
    pub(crate) fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            crumb: Mutex::new(None),
        }
    }

    /// Fetch sector, industry and analyst target for a symbol.
    pub(crate) async fn fetch(&self, symbol: &str) -> Result<CompanyProfile> {
        let crumb = self.ensure_crumb().await?;
        let url = format!("{}/{}", QUOTE_SUMMARY_URL, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("modules", "summaryProfile,financialData"),
                ("crumb", crumb.value.as_str()),
            ])
            .header(reqwest::header::COOKIE, &crumb.cookie)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // Crumb expired; force re-authentication on the next call.
            self.clear_crumb().await;
            return Err(DataError::YahooApi(
                "quoteSummary rejected the session crumb".to_string(),
            ));
        }

        let body: QuoteSummaryResponse = response.error_for_status()?.json().await?;
        let result = body
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| DataError::QuoteLookup {
                symbol: symbol.to_string(),
                reason: "empty quoteSummary result".to_string(),
            })?;

        Ok(CompanyProfile::from(result))
    }

    async fn ensure_crumb(&self) -> Result<Crumb> {
        {
            let guard = self.crumb.lock().await;
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }
        self.refresh_crumb().await
    }

    async fn refresh_crumb(&self) -> Result<Crumb> {
        let response = self.client.get(COOKIE_URL).send().await?;
        let cookie = response
            .headers()
            .get(reqwest::header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
            .ok_or_else(|| DataError::YahooApi("no session cookie returned".to_string()))?;

        let value = self
            .client
            .get(CRUMB_URL)
            .header(reqwest::header::COOKIE, &cookie)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if value.is_empty() {
            return Err(DataError::YahooApi("empty crumb returned".to_string()));
        }

        let crumb = Crumb { cookie, value };
        *self.crumb.lock().await = Some(crumb.clone());
        Ok(crumb)
    }

    async fn clear_crumb(&self) {
        *self.crumb.lock().await = None;
    }
}

impl From<QuoteSummaryResult> for CompanyProfile {
    fn from(result: QuoteSummaryResult) -> Self {
        Self {
            sector: result
                .summary_profile
                .as_ref()
                .and_then(|profile| profile.sector.clone()),
            industry: result
                .summary_profile
                .as_ref()
                .and_then(|profile| profile.industry.clone()),
            analyst_target: result
                .financial_data
                .as_ref()
                .and_then(|data| data.target_mean_price.as_ref())
                .and_then(|detail| detail.raw),
        }
    }
}

/// Main response wrapper for the quoteSummary API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    // Null when Yahoo reports an error for the symbol.
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    summary_profile: Option<SummaryProfile>,
    financial_data: Option<FinancialData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryProfile {
    sector: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    target_mean_price: Option<RawValue>,
}

/// Yahoo wraps numbers as `{"raw": 123.45, "fmt": "123.45"}` and sends an
/// empty object when no value is available.
#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}
