//! Shared types for company-name → ticker resolution.

use serde::{Deserialize, Serialize};

/// Which reference feed a registry entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedOrigin {
    /// Exchange-annotated feed, loaded first and authoritative
    PrimaryFeed,
    /// Plain company/ticker feed, fills in tickers the primary lacks
    SecondaryFeed,
}

/// A known (company name, ticker) pair from the reference registry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub name: String,
    pub ticker: String,
    pub origin: FeedOrigin,
}

/// An unverified ticker-like token pulled out of retrieved text
#[derive(Debug, Clone)]
pub struct Candidate {
    pub token: String,
    /// Query that produced the text the token was found in
    pub source_query: String,
    /// Context snippet the token was extracted from
    pub source_text: String,
}

/// Where a resolution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Local,
    YahooHistorical,
    SecEdgar,
    InvestmentSite,
    WebSearch,
    NotFound,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::YahooHistorical => "yahoo_historical",
            Self::SecEdgar => "sec_edgar",
            Self::InvestmentSite => "investment_site",
            Self::WebSearch => "web_search",
            Self::NotFound => "not_found",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "local" => Some(Self::Local),
            "yahoo_historical" => Some(Self::YahooHistorical),
            "sec_edgar" => Some(Self::SecEdgar),
            "investment_site" => Some(Self::InvestmentSite),
            "web_search" => Some(Self::WebSearch),
            "not_found" => Some(Self::NotFound),
            _ => None,
        }
    }
}

/// Trading status of a resolved ticker
///
/// `Active` means the ticker was matched against the current registry;
/// anything found online (possibly delisted) stays `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Active,
    Unknown,
}

impl ResolutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Unknown => "unknown",
        }
    }
}

/// Outcome of resolving a single company name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    pub ticker: Option<String>,
    pub company_name: String,
    /// Display name of whatever the ticker was matched against
    pub matched_name: Option<String>,
    pub similarity: Option<f64>,
    pub source: ResolutionSource,
    pub status: ResolutionStatus,
}

impl ResolutionResult {
    /// Resolution that found nothing; ticker stays empty
    pub fn not_found(company_name: &str) -> Self {
        Self {
            ticker: None,
            company_name: company_name.to_string(),
            matched_name: None,
            similarity: None,
            source: ResolutionSource::NotFound,
            status: ResolutionStatus::Unknown,
        }
    }

    /// Match against the local registry, considered actively traded
    pub fn local(company_name: &str, entry: &RegistryEntry, similarity: f64) -> Self {
        Self {
            ticker: Some(entry.ticker.clone()),
            company_name: company_name.to_string(),
            matched_name: Some(entry.name.clone()),
            similarity: Some(similarity),
            source: ResolutionSource::Local,
            status: ResolutionStatus::Active,
        }
    }

    /// Match found through an online search strategy
    pub fn online(
        company_name: &str,
        ticker: String,
        source: ResolutionSource,
        matched_name: Option<String>,
        similarity: Option<f64>,
    ) -> Self {
        Self {
            ticker: Some(ticker),
            company_name: company_name.to_string(),
            matched_name,
            similarity,
            source,
            status: ResolutionStatus::Unknown,
        }
    }

    pub fn is_found(&self) -> bool {
        self.ticker.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_roundtrip() {
        for source in [
            ResolutionSource::Local,
            ResolutionSource::YahooHistorical,
            ResolutionSource::SecEdgar,
            ResolutionSource::InvestmentSite,
            ResolutionSource::WebSearch,
            ResolutionSource::NotFound,
        ] {
            assert_eq!(ResolutionSource::from_str(source.as_str()), Some(source));
        }
    }

    #[test]
    fn test_not_found_has_no_ticker() {
        let result = ResolutionResult::not_found("Vanished Corp");
        assert_eq!(result.source, ResolutionSource::NotFound);
        assert!(result.ticker.is_none());
        assert!(!result.is_found());
    }
}
