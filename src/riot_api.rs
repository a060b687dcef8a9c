use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::RiotApiError;

const API_KEY_HEADER: &str = "X-Riot-Token";

#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub puuid: String,
    #[serde(rename = "gameName")]
    pub game_name: Option<String>,
    #[serde(rename = "tagLine")]
    pub tag_line: Option<String>,
}

fn build_headers(api_key: &str) -> Result<HeaderMap, RiotApiError> {
    let mut headers = HeaderMap::new();
    let mut token = HeaderValue::from_str(api_key)?;
    token.set_sensitive(true);
    headers.insert(API_KEY_HEADER, token);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Ok(headers)
}

/// Blocking client for the account and TFT match endpoints. Every call is a
/// single request; anything other than `200 OK` is returned as
/// [`RiotApiError::Upstream`].
pub struct RiotClient {
    client: Client,
    headers: HeaderMap,
    base_url: String,
}

impl RiotClient {
    pub fn new(config: &ApiConfig) -> Result<Self, RiotApiError> {
        Ok(Self {
            client: Client::new(),
            headers: build_headers(config.api_key())?,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountResponse, RiotApiError> {
        let url = format!(
            "{}/riot/account/v1/accounts/by-riot-id/{}/{}",
            self.base_url, game_name, tag_line
        );

        self.get_json(&url)
    }

    /// Resolves a Riot ID (`game_name#tag_line`) to the player's puuid.
    pub fn resolve_player(&self, game_name: &str, tag_line: &str) -> Result<String, RiotApiError> {
        let account = self.get_account_by_riot_id(game_name, tag_line)?;
        Ok(account.puuid)
    }

    /// Match ids are returned in the order the API gives them (most recent
    /// first).
    pub fn list_match_ids(
        &self,
        puuid: &str,
        start: usize,
        count: usize,
    ) -> Result<Vec<String>, RiotApiError> {
        let url = format!(
            "{}/tft/match/v1/matches/by-puuid/{}/ids?start={}&count={}",
            self.base_url, puuid, start, count
        );

        self.get_json(&url)
    }

    pub fn fetch_match(&self, match_id: &str) -> Result<Value, RiotApiError> {
        let url = format!("{}/tft/match/v1/matches/{}", self.base_url, match_id);

        self.get_json(&url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RiotApiError> {
        let response = self.request(url)?;
        Ok(response.json()?)
    }

    fn request(&self, url: &str) -> Result<Response, RiotApiError> {
        debug!(url, "GET");

        let response = self.client.get(url).headers(self.headers.clone()).send()?;
        let status = response.status();

        debug!(url, status = status.as_u16(), "response");

        if status != StatusCode::OK {
            return Err(RiotApiError::Upstream {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }
}
