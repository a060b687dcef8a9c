#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub target: String,
    pub headers: HashMap<String, String>,
}

/// Minimal HTTP/1.1 stub standing in for the Riot API. Each route maps a
/// request target (path plus query) to a status and a JSON body; unknown
/// targets get a 404.
pub struct StubApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubApi {
    pub fn start(routes: Vec<(&str, u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        let addr = listener.local_addr().expect("stub address");
        let routes: HashMap<String, (u16, String)> = routes
            .into_iter()
            .map(|(target, status, body)| (target.to_string(), (status, body)))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else {
                    continue;
                };
                handle(stream, &routes, &recorded);
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("stub request log").clone()
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, (u16, String)>,
    recorded: &Mutex<Vec<RecordedRequest>>,
) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    recorded
        .lock()
        .expect("stub request log")
        .push(RecordedRequest {
            target: target.clone(),
            headers,
        });

    let (status, body) = routes
        .get(&target)
        .cloned()
        .unwrap_or((404, r#"{"status":{"message":"Data not found","status_code":404}}"#.to_string()));

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json;charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        if status == 200 { "OK" } else { "Error" },
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

pub fn match_document(match_id: &str, participants: &[serde_json::Value]) -> serde_json::Value {
    serde_json::json!({
        "metadata": {
            "data_version": "5",
            "match_id": match_id,
            "participants": participants
                .iter()
                .map(|p| p["puuid"].clone())
                .collect::<Vec<_>>(),
        },
        "info": {
            "game_datetime": 1_700_000_000_000_i64,
            "game_length": 2100.5,
            "participants": participants,
            "queue_id": 1100,
            "tft_set_number": 9,
        }
    })
}

pub fn participant(
    puuid: &str,
    placement: i64,
    traits: &[(&str, i64)],
    units: &[(&str, u32, i64)],
) -> serde_json::Value {
    serde_json::json!({
        "augments": ["TFT9_Augment_Commander", "TFT9_Augment_Ascension"],
        "companion": {"content_ID": "abc", "item_ID": 1, "skin_ID": 1, "species": "PetChibi"},
        "gold_left": 2,
        "last_round": 32,
        "level": 8,
        "placement": placement,
        "players_eliminated": 1,
        "puuid": puuid,
        "time_eliminated": 1980.75,
        "total_damage_to_players": 97,
        "traits": traits
            .iter()
            .map(|(name, style)| serde_json::json!({
                "name": name,
                "num_units": 2,
                "style": style,
                "tier_current": 1,
                "tier_total": 3
            }))
            .collect::<Vec<_>>(),
        "units": units
            .iter()
            .map(|(id, tier, rarity)| serde_json::json!({
                "character_id": id,
                "itemNames": [],
                "name": "",
                "rarity": rarity,
                "tier": tier
            }))
            .collect::<Vec<_>>(),
    })
}
