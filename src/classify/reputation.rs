//! IP reputation lookup
//!
//! The reputation collaborator is consumed through the [`ReputationLookup`]
//! trait: given an address, return a 0-100 abuse-confidence score or a
//! lookup error. Errors are values here; the classifier maps them to a
//! degraded alert rather than letting them cross the pipeline.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::ReputationConfig;
use crate::error::LookupError;

/// Risk level assigned to a packet whose blocklist check hit.
/// The blocklist is a higher-confidence signal than any third-party score.
pub const BLOCKLIST_RISK_LEVEL: u8 = 8;

/// Maximum risk level an alert can carry
pub const MAX_RISK_LEVEL: u8 = 10;

/// A 0-100 abuse-confidence score returned by the reputation service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReputationScore(pub u8);

/// Capability: given an IP, return an abuse-confidence score.
///
/// Lookups are outbound network calls and may be slow; callers must keep
/// them off the capture thread and off the subscriber delivery path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReputationLookup: Send + Sync {
    /// Look up the abuse-confidence score for an address
    async fn lookup(&self, ip: &str) -> Result<ReputationScore, LookupError>;
}

/// Map a 0-100 abuse score to a 0-10 risk level and a descriptive reason.
pub fn map_score(ip: &str, score: ReputationScore) -> (u8, String) {
    let ReputationScore(score) = score;
    let risk_level = (score / 10).min(MAX_RISK_LEVEL);
    let reason = if score > 80 {
        format!("Highly abusive IP {} (score: {})", ip, score)
    } else if score > 50 {
        format!("Suspicious IP {} (score: {})", ip, score)
    } else if score > 20 {
        format!("Potentially suspicious IP {} (score: {})", ip, score)
    } else {
        format!("Clean IP {} (score: {})", ip, score)
    };
    (risk_level, reason)
}

/// Map a lookup failure to the degraded classification outcome.
///
/// Classification never propagates a lookup error; it only downgrades
/// confidence to risk level 0 with a reason describing the failure.
pub fn map_failure(ip: &str, error: &LookupError) -> (u8, String) {
    (0, format!("Reputation lookup failed for {}: {}", ip, error))
}

/// Wire shape of the reputation API response
#[derive(Debug, Deserialize)]
struct CheckResponse {
    data: CheckData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckData {
    #[serde(default)]
    abuse_confidence_score: u8,
}

/// AbuseIPDB-style reputation client over outbound HTTPS
#[derive(Debug)]
pub struct AbuseIpdbClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_age_days: u32,
}

impl AbuseIpdbClient {
    /// Build a client from configuration.
    ///
    /// Returns None when lookups are disabled or no API key is configured.
    pub fn from_config(config: &ReputationConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let api_key = config.api_key.clone()?;
        Some(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: config.endpoint.clone(),
            api_key,
            max_age_days: config.max_age_days,
        })
    }
}

#[async_trait]
impl ReputationLookup for AbuseIpdbClient {
    async fn lookup(&self, ip: &str) -> Result<ReputationScore, LookupError> {
        debug!(ip = ip, "Sending reputation lookup");

        let response = self
            .client
            .get(&self.endpoint)
            .header("Key", &self.api_key)
            .header("Accept", "application/json")
            .query(&[
                ("ipAddress", ip),
                ("maxAgeInDays", &self.max_age_days.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LookupError::NetworkTimeout
                } else if e.is_connect() {
                    LookupError::ConnectionRefused
                } else {
                    LookupError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::ApiError(status.as_u16()));
        }

        let body: CheckResponse = response
            .json()
            .await
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

        Ok(ReputationScore(body.data.abuse_confidence_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: Score mapping thresholds and risk level arithmetic
    #[test]
    fn test_map_score_thresholds() {
        let (risk, reason) = map_score("1.2.3.4", ReputationScore(95));
        assert_eq!(risk, 9);
        assert!(reason.contains("Highly abusive"));
        assert!(reason.contains("1.2.3.4"));

        let (risk, reason) = map_score("1.2.3.4", ReputationScore(60));
        assert_eq!(risk, 6);
        assert!(reason.contains("Suspicious IP"));

        let (risk, reason) = map_score("1.2.3.4", ReputationScore(35));
        assert_eq!(risk, 3);
        assert!(reason.contains("Potentially suspicious"));

        let (risk, reason) = map_score("1.2.3.4", ReputationScore(10));
        assert_eq!(risk, 1);
        assert!(reason.contains("Clean IP"));
    }

    // Test 2: Risk level is capped at 10
    #[test]
    fn test_map_score_capped_at_ten() {
        let (risk, _) = map_score("1.2.3.4", ReputationScore(100));
        assert_eq!(risk, 10);
    }

    // Test 3: Boundary scores fall on the conservative side
    #[test]
    fn test_map_score_boundaries() {
        let (_, reason) = map_score("1.2.3.4", ReputationScore(80));
        assert!(reason.contains("Suspicious IP"));

        let (_, reason) = map_score("1.2.3.4", ReputationScore(81));
        assert!(reason.contains("Highly abusive"));

        let (_, reason) = map_score("1.2.3.4", ReputationScore(20));
        assert!(reason.contains("Clean IP"));

        let (_, reason) = map_score("1.2.3.4", ReputationScore(21));
        assert!(reason.contains("Potentially suspicious"));
    }

    // Test 4: Lookup failures degrade to risk level 0 with the error named
    #[test]
    fn test_map_failure() {
        let (risk, reason) = map_failure("1.2.3.4", &LookupError::ApiError(503));
        assert_eq!(risk, 0);
        assert!(reason.contains("1.2.3.4"));
        assert!(reason.contains("HTTP 503"));
    }

    // Test 5: Client is only constructed when enabled with a key
    #[test]
    fn test_from_config_requires_enabled_and_key() {
        let disabled = ReputationConfig::default();
        assert!(AbuseIpdbClient::from_config(&disabled).is_none());

        let no_key = ReputationConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(AbuseIpdbClient::from_config(&no_key).is_none());

        let ready = ReputationConfig {
            enabled: true,
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(AbuseIpdbClient::from_config(&ready).is_some());
    }

    // Test 6: Mocked lookups drive the mapping end to end
    #[tokio::test]
    async fn test_mocked_lookup_maps_to_alert_fields() {
        let mut mock = MockReputationLookup::new();
        mock.expect_lookup()
            .returning(|_| Ok(ReputationScore(95)));

        let score = mock.lookup("203.0.113.9").await.unwrap();
        let (risk, reason) = map_score("203.0.113.9", score);
        assert_eq!(risk, 9);
        assert!(reason.contains("Highly abusive"));
    }
}
