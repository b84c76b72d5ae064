//! Resolution facade
//!
//! The public entry point. Local registry lookup always runs first; the
//! online waterfall is only consulted when the registry has no trustworthy
//! match. Whatever happens inside, the caller always gets a well-formed
//! [`ResolutionResult`] — failures degrade to `NotFound`.

use crate::local::{search_local, LOCAL_MATCH_THRESHOLD};
use crate::models::ResolutionResult;
use crate::online;
use crate::registry::Registry;

pub struct Resolver {
    registry: Registry,
}

impl Resolver {
    /// Build a resolver around an already-loaded registry.
    ///
    /// The registry is owned here and read-only for the resolver's lifetime.
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolve a company name to a ticker.
    ///
    /// Blank input short-circuits to `NotFound` without touching the
    /// network. With `use_online = false` the resolver never leaves the
    /// local registry.
    pub async fn resolve(&self, company_name: &str, use_online: bool) -> ResolutionResult {
        let name = company_name.trim();
        if name.is_empty() {
            return ResolutionResult::not_found(name);
        }

        log::info!("Resolving: {}", name);

        let local_matches = search_local(&self.registry, name, LOCAL_MATCH_THRESHOLD);
        if let Some((entry, score)) = local_matches.first() {
            log::info!(
                "Local match: '{}' -> {} (similarity {:.2})",
                entry.name,
                entry.ticker,
                score
            );
            return ResolutionResult::local(name, entry, *score);
        }

        if use_online {
            if let Some(result) = online::resolve_online(name).await {
                return result;
            }
            log::info!("No ticker found for: {}", name);
        }

        ResolutionResult::not_found(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedOrigin, RegistryEntry, ResolutionSource, ResolutionStatus};

    fn entry(name: &str, ticker: &str) -> RegistryEntry {
        RegistryEntry {
            name: name.to_string(),
            ticker: ticker.to_string(),
            origin: FeedOrigin::PrimaryFeed,
        }
    }

    fn resolver() -> Resolver {
        Resolver::new(Registry::from_entries(vec![
            entry("APPLE INC", "AAPL"),
            entry("E M C CORP MASS", "EMC"),
            entry("MICROSOFT CORP", "MSFT"),
        ]))
    }

    #[tokio::test]
    async fn test_empty_input_is_not_found_without_network() {
        // use_online = true, but the blank input must short-circuit
        let result = resolver().resolve("", true).await;
        assert_eq!(result.source, ResolutionSource::NotFound);
        assert!(result.ticker.is_none());

        let result = resolver().resolve("   ", true).await;
        assert_eq!(result.source, ResolutionSource::NotFound);
    }

    #[tokio::test]
    async fn test_local_resolution() {
        let result = resolver().resolve("Apple Inc.", false).await;
        assert_eq!(result.ticker.as_deref(), Some("AAPL"));
        assert_eq!(result.source, ResolutionSource::Local);
        assert_eq!(result.status, ResolutionStatus::Active);
        assert_eq!(result.matched_name.as_deref(), Some("APPLE INC"));
        assert!(result.similarity.unwrap() >= 0.85);
    }

    #[tokio::test]
    async fn test_spaced_abbreviation_resolves_locally() {
        let result = resolver().resolve("EMC Corp", false).await;
        assert_eq!(result.ticker.as_deref(), Some("EMC"));
        assert_eq!(result.source, ResolutionSource::Local);
    }

    #[tokio::test]
    async fn test_offline_miss_is_not_found() {
        let result = resolver().resolve("Vanished Industries Ltd", false).await;
        assert_eq!(result.source, ResolutionSource::NotFound);
        assert!(result.ticker.is_none());
    }
}
