use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum RiotApiError {
    #[error("Request to {url} failed with status {status}")]
    Upstream { url: String, status: StatusCode },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API key is not a valid header value: {0}")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),
}

impl RiotApiError {
    /// Status code returned by the API, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RiotApiError::Upstream { status, .. } => Some(*status),
            RiotApiError::Http(err) => err.status(),
            RiotApiError::InvalidApiKey(_) => None,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FlattenError {
    #[error("unit {character_id} (rarity {rarity}, tier {tier}) overflows its value column")]
    UnitValueOverflow {
        character_id: String,
        rarity: i64,
        tier: u32,
    },
}
