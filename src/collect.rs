use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

use crate::riot_api::RiotClient;

#[derive(Debug, Clone)]
pub struct CollectArgs {
    pub game_name: String,
    pub tag_line: String,
    pub start: usize,
    pub count: usize,
    pub save_path: PathBuf,
}

#[derive(Debug)]
pub struct CollectSummary {
    pub puuid: String,
    pub written: Vec<PathBuf>,
}

/// Resolves the player, lists `count` match ids from `start` and saves each
/// match document as `<save_path>/<match_id>.json`. The first failure aborts
/// the run; files written before it are left in place.
pub fn collect_matches(client: &RiotClient, args: &CollectArgs) -> Result<CollectSummary> {
    fs::create_dir_all(&args.save_path)
        .with_context(|| format!("creating {}", args.save_path.display()))?;

    let puuid = client
        .resolve_player(&args.game_name, &args.tag_line)
        .with_context(|| format!("resolving {}#{}", args.game_name, args.tag_line))?;
    info!(game_name = %args.game_name, tag_line = %args.tag_line, %puuid, "resolved player");

    let match_ids = client
        .list_match_ids(&puuid, args.start, args.count)
        .with_context(|| format!("listing matches for {}", puuid))?;
    let total = match_ids.len();
    info!(total, start = args.start, "listed match ids");

    let mut written = Vec::with_capacity(total);

    for (idx, match_id) in match_ids.iter().enumerate() {
        let match_json = client
            .fetch_match(match_id)
            .with_context(|| format!("fetching match {}", match_id))?;

        let played_at = match_json
            .get("info")
            .and_then(|info| info.get("game_datetime"))
            .and_then(|v| v.as_i64())
            .map(format_ts_millis)
            .unwrap_or_default();
        info!("Downloaded match {}/{}: {} {}", idx + 1, total, match_id, played_at);

        let path = save_match(&args.save_path, match_id, &match_json)?;
        written.push(path);
    }

    Ok(CollectSummary { puuid, written })
}

fn format_ts_millis(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

/// Match ids come from the API and become file names, so anything that is
/// not a single plain path component is refused.
fn check_match_id(match_id: &str) -> Result<()> {
    let mut components = Path::new(match_id).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == match_id
    );
    if !single_normal {
        bail!("refusing to save match with unsafe id {:?}", match_id);
    }
    Ok(())
}

fn save_match(out_dir: &Path, match_id: &str, match_json: &Value) -> Result<PathBuf> {
    check_match_id(match_id)?;
    let serialized = to_pretty_json(match_json)?;
    let file_path = out_dir.join(format!("{}.json", match_id));
    fs::write(&file_path, serialized)
        .with_context(|| format!("writing {}", file_path.display()))?;
    Ok(file_path)
}

/// Four-space indentation, keys in the order the API sent them.
fn to_pretty_json(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(buf)
}
