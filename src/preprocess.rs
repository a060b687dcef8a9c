use anyhow::{Context, Result};
use csv::Writer;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::FlattenError;
use crate::match_data::{MatchRecord, Participant, UnitEntry};

/// Trait name fragment used by the anniversary event mode. Participants
/// playing it are dropped.
pub const EVENT_TRAIT_MARKER: &str = "TFTEvent5YR";
pub const OUTPUT_FILE_NAME: &str = "tft_match_data.csv";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(v) => f.write_str(v),
        }
    }
}

/// One participant of one match, as named cells in insertion order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FlatRow {
    order: Vec<String>,
    cells: HashMap<String, Cell>,
}

impl FlatRow {
    /// Overwrites the value of an existing column without moving it.
    fn set(&mut self, column: impl Into<String>, value: Cell) {
        let column = column.into();
        if self.cells.insert(column.clone(), value).is_none() {
            self.order.push(column);
        }
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// `(rarity + 1) * 3^tier`, or `None` when it doesn't fit in an `i64`.
pub fn unit_value(rarity: i64, tier: u32) -> Option<i64> {
    rarity.checked_add(1)?.checked_mul(3_i64.checked_pow(tier)?)
}

fn unit_cells(unit: &UnitEntry) -> Result<(i64, i64), FlattenError> {
    let overflow = || FlattenError::UnitValueOverflow {
        character_id: unit.character_id.clone(),
        rarity: unit.rarity,
        tier: unit.tier,
    };
    let cost = unit.rarity.checked_add(1).ok_or_else(overflow)?;
    let value = unit_value(unit.rarity, unit.tier).ok_or_else(overflow)?;
    Ok((cost, value))
}

/// Returns `Ok(None)` when the participant played the event mode.
pub fn flatten_participant(
    match_id: &str,
    participant: &Participant,
) -> Result<Option<FlatRow>, FlattenError> {
    let mut row = FlatRow::default();

    row.set("match_id", Cell::Text(match_id.to_string()));
    row.set("puuid", Cell::Text(participant.puuid.clone()));
    row.set("placement", Cell::Int(participant.placement));
    row.set(
        "total_damage_to_players",
        Cell::Int(participant.total_damage_to_players),
    );
    row.set("time_eliminated", Cell::Float(participant.time_eliminated));
    row.set("gold_left", Cell::Int(participant.gold_left));
    row.set("last_round", Cell::Int(participant.last_round));
    row.set("level", Cell::Int(participant.level));
    row.set("augments", Cell::Text(participant.augments.join(", ")));

    for t in &participant.traits {
        if t.name.contains(EVENT_TRAIT_MARKER) {
            return Ok(None);
        }
        row.set(format!("{}_style", t.name), Cell::Int(t.style));
    }

    for unit in &participant.units {
        let id = &unit.character_id;
        let (cost, value) = unit_cells(unit)?;
        row.set(format!("{}_tier", id), Cell::Int(i64::from(unit.tier)));
        row.set(format!("{}_rarity", id), Cell::Int(cost));
        row.set(format!("{}_value", id), Cell::Int(value));
    }

    Ok(Some(row))
}

/// Flattens every participant of a match. The second value counts the
/// participants left out by the event filter.
pub fn flatten_match(record: &MatchRecord) -> Result<(Vec<FlatRow>, usize), FlattenError> {
    let mut rows = Vec::with_capacity(record.info.participants.len());
    let mut excluded = 0;

    for participant in &record.info.participants {
        match flatten_participant(&record.metadata.match_id, participant)? {
            Some(row) => rows.push(row),
            None => {
                debug!(
                    match_id = %record.metadata.match_id,
                    puuid = %participant.puuid,
                    "skipping event participant"
                );
                excluded += 1;
            }
        }
    }

    Ok((rows, excluded))
}

/// Rows plus the union of their columns, ordered by first appearance.
#[derive(Debug, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<FlatRow>,
}

impl Table {
    pub fn from_rows(rows: Vec<FlatRow>) -> Self {
        let mut columns = Vec::new();
        {
            let mut seen: HashSet<&str> = HashSet::new();
            for row in &rows {
                for column in row.columns() {
                    if seen.insert(column) {
                        columns.push(column.to_string());
                    }
                }
            }
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes the header and one fully keyed record per row. Cells a row
    /// doesn't have are written as `0`.
    pub fn write_csv<W: io::Write>(&self, writer: &mut Writer<W>) -> csv::Result<()> {
        if !self.columns.is_empty() {
            writer.write_record(&self.columns)?;
        }

        let zero = Cell::Int(0);
        for row in &self.rows {
            writer.write_record(
                self.columns
                    .iter()
                    .map(|column| row.get(column).unwrap_or(&zero).to_string()),
            )?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct PreprocessSummary {
    pub files_read: usize,
    pub rows_written: usize,
    pub participants_excluded: usize,
    pub columns: usize,
    pub output: PathBuf,
}

/// Flattens `raw_dir/*.json` into `processed_dir/tft_match_data.csv`.
pub fn preprocess(raw_dir: &Path, processed_dir: &Path) -> Result<PreprocessSummary> {
    flatten(raw_dir, &processed_dir.join(OUTPUT_FILE_NAME))
}

/// Every input is parsed before anything is written, and the CSV is built in
/// a temp file next to `output_csv` that only replaces it once complete. A
/// failed run leaves any previous dataset untouched.
pub fn flatten(input_dir: &Path, output_csv: &Path) -> Result<PreprocessSummary> {
    let files = collect_json_files(input_dir)?;
    let mut rows = Vec::new();
    let mut participants_excluded = 0;

    for path in &files {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let record: MatchRecord = serde_json::from_str(&contents)
            .with_context(|| format!("parsing match file {}", path.display()))?;

        let (match_rows, excluded) = flatten_match(&record)
            .with_context(|| format!("flattening match file {}", path.display()))?;
        debug!(
            file = %path.display(),
            rows = match_rows.len(),
            excluded,
            "flattened match"
        );
        rows.extend(match_rows);
        participants_excluded += excluded;
    }

    let table = Table::from_rows(rows);

    write_atomically(&table, output_csv)?;

    info!(
        files = files.len(),
        rows = table.len(),
        columns = table.columns().len(),
        excluded = participants_excluded,
        output = %output_csv.display(),
        "wrote dataset"
    );

    Ok(PreprocessSummary {
        files_read: files.len(),
        rows_written: table.len(),
        participants_excluded,
        columns: table.columns().len(),
        output: output_csv.to_path_buf(),
    })
}

fn write_atomically(table: &Table, output_csv: &Path) -> Result<()> {
    let parent = match output_csv.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;

    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("creating temp file in {}", parent.display()))?;
    {
        let mut writer = Writer::from_writer(&mut temp);
        table
            .write_csv(&mut writer)
            .with_context(|| format!("writing {}", output_csv.display()))?;
    }

    // the temp file is removed on drop if this fails
    temp.persist(output_csv)
        .map_err(|err| err.error)
        .with_context(|| format!("replacing {}", output_csv.display()))?;
    Ok(())
}

/// Direct children of `dir` whose name ends in `.json`, sorted by name.
fn collect_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        let is_json = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(".json"));
        if is_json && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
