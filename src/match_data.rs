use serde::Deserialize;

/// The subset of a TFT match-v1 document the preprocessing stage reads.
/// Every field listed here is required; unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRecord {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchMetadata {
    pub match_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchInfo {
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Participant {
    pub puuid: String,
    pub placement: i64,
    pub total_damage_to_players: i64,
    pub time_eliminated: f64,
    pub gold_left: i64,
    pub last_round: i64,
    pub level: i64,
    pub augments: Vec<String>,
    pub traits: Vec<TraitEntry>,
    pub units: Vec<UnitEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraitEntry {
    pub name: String,
    pub style: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnitEntry {
    pub character_id: String,
    /// Star level.
    pub tier: u32,
    /// Cost class, zero-based.
    pub rarity: i64,
}
