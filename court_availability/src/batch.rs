use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared_kernel::eastern_date_time::EasternTZDateTime;
use std::path::Path;

/// A scraped offering with its schedule resolved to fixed-zone instants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSlot {
    pub name: String,
    pub start: EasternTZDateTime,
    pub end: Option<EasternTZDateTime>,
    pub price: String,
    pub can_reserve: bool,
}

/// Everything one scrape produced, in page order. Built once per invocation
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationBatch {
    pub slots: Vec<NormalizedSlot>,
    pub source_url: String,
    pub captured_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotRecord {
    name: String,
    date: String,
    start_time: String,
    end_time: String,
    price: String,
    can_reserve: bool,
}

impl From<&NormalizedSlot> for SlotRecord {
    fn from(slot: &NormalizedSlot) -> Self {
        SlotRecord {
            name: slot.name.clone(),
            date: slot.start.to_date_time().format("%A %d %B %Y").to_string(),
            start_time: slot.start.to_date_time().format("%H:%M").to_string(),
            end_time: slot
                .end
                .as_ref()
                .map(|end| end.to_date_time().format("%H:%M").to_string())
                .unwrap_or_default(),
            price: slot.price.clone(),
            can_reserve: slot.can_reserve,
        }
    }
}

#[derive(Serialize)]
struct BatchRecord {
    reservations: Vec<SlotRecord>,
    url: String,
    timestamp: String,
}

impl ReservationBatch {
    pub fn bookable_slots(&self) -> impl Iterator<Item = &NormalizedSlot> {
        self.slots.iter().filter(|slot| slot.can_reserve)
    }

    fn to_result_record(&self) -> BatchRecord {
        BatchRecord {
            reservations: self.slots.iter().map(SlotRecord::from).collect(),
            url: self.source_url.clone(),
            timestamp: self.captured_at.to_rfc3339(),
        }
    }

    /// Writes the test-mode result file. The shape (`reservations`, `url`,
    /// ISO-8601 `timestamp`) is the one on-disk format downstream tooling
    /// reads, so it stays stable.
    pub fn write_result_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(&self.to_result_record())
            .context("Failed to serialize the reservation batch")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write results to {}", path.display()))
    }
}
