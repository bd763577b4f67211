//! reqwest-backed implementation of [`ApiClient`].
//!
//! Reads go through GraphQL (`POST {graphql_base}{operation}`), votes through
//! the older REST endpoint (`POST {rest_base}/1/likes/batch`). Every call
//! carries the browser-like headers and the operator's cookie list.

use crate::error::{ClientError, Result};
use crate::queries::{QueryCatalog, GLOBAL_PREFERENCES_QUERY, SELF_PROFILE_QUERY, STACKS_MENU_QUERY};
use crate::wire::{
    into_batch, GlobalPreferencesEnvelope, GraphQlResponse, MeEnvelope, SelfProfileWire,
    StacksEnvelope,
};
use crate::{ApiClient, VoteAck};
use async_trait::async_trait;
use profile_data::{Batch, CandidateId, Preferences, SelfProfile, Settings};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, COOKIE, ORIGIN, REFERER, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error, info};

/// Where and how to reach the service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// e.g. `https://okcupid.com/graphql/`
    pub graphql_base: String,
    /// e.g. `https://api.okcupid.com`
    pub rest_base: String,
    /// Value of the `Authority` header
    pub authority: String,
    pub origin: String,
    pub user_agent: String,
    pub cookie: String,
}

impl ClientConfig {
    pub fn from_settings(settings: &Settings, cookie: impl Into<String>) -> Self {
        Self {
            graphql_base: format!(
                "https://{}/{}",
                settings.base_url, settings.graphql_api_suffix
            ),
            rest_base: format!("https://{}{}", settings.legacy_api_prefix, settings.base_url),
            authority: settings.base_url.clone(),
            origin: settings.origin_url.clone(),
            user_agent: settings.user_agent.clone(),
            cookie: cookie.into(),
        }
    }
}

pub struct OkCupidClient {
    http: reqwest::Client,
    config: ClientConfig,
    queries: QueryCatalog,
}

impl OkCupidClient {
    /// Build a client. Fails when a required query is missing or a header
    /// value (usually the cookie) cannot be sent.
    pub fn new(config: ClientConfig, queries: QueryCatalog) -> Result<Self> {
        queries.ensure_required()?;

        let http = reqwest::Client::builder()
            .default_headers(default_headers(&config)?)
            .build()
            .map_err(ClientError::Build)?;

        info!("Client ready for {}", config.graphql_base);
        Ok(Self {
            http,
            config,
            queries,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST a JSON body and return the decoded JSON response.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

        if status != reqwest::StatusCode::OK {
            error!("{} answered {}", url, status);
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Run a named GraphQL operation and return what is under `data.me`.
    async fn query_me<T: DeserializeOwned>(&self, operation: &str, variables: Value) -> Result<T> {
        let url = format!("{}{}", self.config.graphql_base, operation);
        let body = json!({
            "operationName": operation,
            "variables": variables,
            "query": self.queries.get(operation)?,
        });

        debug!("Running {}", operation);
        let raw = self.post_json(&url, &body).await?;
        let response: GraphQlResponse<MeEnvelope<T>> =
            serde_json::from_value(raw).map_err(|e| ClientError::InvalidResponse {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let missing = |path: &str| ClientError::MissingField {
            operation: operation.to_string(),
            path: path.to_string(),
        };

        match response.data {
            Some(MeEnvelope { me: Some(me) }) => Ok(me),
            Some(MeEnvelope { me: None }) => Err(missing("data.me")),
            None => match response.errors {
                Some(errors) if !errors.is_empty() => Err(ClientError::GraphQl {
                    operation: operation.to_string(),
                    messages: errors
                        .into_iter()
                        .map(|e| e.message)
                        .collect::<Vec<_>>()
                        .join("; "),
                }),
                _ => Err(missing("data")),
            },
        }
    }
}

#[async_trait]
impl ApiClient for OkCupidClient {
    async fn fetch_batch(&self) -> Result<Batch> {
        let envelope: StacksEnvelope = self
            .query_me(STACKS_MENU_QUERY, json!({ "includeProfileDetails": false }))
            .await?;

        let stacks = envelope.stacks.ok_or_else(|| ClientError::MissingField {
            operation: STACKS_MENU_QUERY.to_string(),
            path: "data.me.stacks".to_string(),
        })?;

        Ok(into_batch(stacks))
    }

    async fn vote(&self, id: &CandidateId, like: bool) -> Result<VoteAck> {
        let url = format!("{}/1/likes/batch", self.config.rest_base);
        let body = json!({
            "source": "PROFILE",
            "votes": [{
                "like": like,
                "time_from_request": 0,
                "userid": id.as_str(),
            }],
        });

        debug!("Voting {} on {}", if like { "like" } else { "pass" }, id);
        let response = self.post_json(&url, &body).await?;
        Ok(VoteAck { response })
    }

    async fn fetch_self_profile(&self) -> Result<SelfProfile> {
        let profile: SelfProfileWire = self.query_me(SELF_PROFILE_QUERY, json!({})).await?;
        Ok(profile.into())
    }

    async fn fetch_preferences(&self) -> Result<Preferences> {
        let envelope: GlobalPreferencesEnvelope = self
            .query_me(GLOBAL_PREFERENCES_QUERY, json!({ "isNonMonogamous": false }))
            .await?;

        envelope
            .global_preferences
            .and_then(|prefs| prefs.into_preferences())
            .ok_or_else(|| ClientError::MissingField {
                operation: GLOBAL_PREFERENCES_QUERY.to_string(),
                path: "data.me.globalPreferences".to_string(),
            })
    }
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let value = |name: &str, raw: &str| {
        HeaderValue::from_str(raw).map_err(|_| ClientError::InvalidHeader(name.to_string()))
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("authority"),
        value("Authority", &config.authority)?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(COOKIE, value("Cookie", &config.cookie)?);
    headers.insert(ORIGIN, value("Origin", &config.origin)?);
    headers.insert(REFERER, value("Referer", &format!("{}/", config.origin))?);
    headers.insert(USER_AGENT, value("User-Agent", &config.user_agent)?);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_settings() {
        let config = ClientConfig::from_settings(&Settings::default(), "a=b");

        assert_eq!(config.graphql_base, "https://okcupid.com/graphql/");
        assert_eq!(config.rest_base, "https://api.okcupid.com");
        assert_eq!(config.origin, "https://okcupid.com");
        assert_eq!(config.cookie, "a=b");
    }

    #[test]
    fn test_cookie_with_newline_is_rejected() {
        let mut config = ClientConfig::from_settings(&Settings::default(), "a=b");
        config.cookie = "a=b\nc=d".to_string();

        let mut queries = QueryCatalog::new();
        for op in crate::queries::REQUIRED_QUERIES {
            queries.insert(*op, "query {}");
        }

        assert!(matches!(
            OkCupidClient::new(config, queries),
            Err(ClientError::InvalidHeader(name)) if name == "Cookie"
        ));
    }

    #[test]
    fn test_missing_query_is_rejected() {
        let config = ClientConfig::from_settings(&Settings::default(), "a=b");
        assert!(matches!(
            OkCupidClient::new(config, QueryCatalog::new()),
            Err(ClientError::MissingQuery(_))
        ));
    }
}
