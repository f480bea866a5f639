pub mod batch;
pub mod extractor;
pub mod normalize;
pub mod page_reader;
pub mod panel;

use crate::batch::ReservationBatch;
use crate::extractor::extract_slots;
use crate::normalize::normalize_slot;
use crate::panel::HtmlPanel;
use chrono::{DateTime, Utc};
use scraper::Html;

/// Turns one captured results page into a batch of normalized slots.
///
/// A slot whose date or time text defeats every parsing strategy is logged
/// with the offending raw strings and dropped; the rest of the batch is kept.
/// Zero panels is the ordinary "no results" outcome, not an error.
pub fn assemble_batch(html: &str, source_url: &str, captured_at: DateTime<Utc>) -> ReservationBatch {
    let document = Html::parse_document(html);
    let panels = HtmlPanel::panels_in(&document);
    tracing::info!("Found {} reservation panels", panels.len());

    let raw_slots = extract_slots(&panels);

    let mut slots = Vec::new();
    for raw in &raw_slots {
        match normalize_slot(raw, captured_at) {
            Ok(slot) => slots.push(slot),
            Err(err) => {
                tracing::warn!(name = %raw.name, "Skipping slot with unparseable schedule: {err}");
            }
        }
    }

    ReservationBatch {
        slots,
        source_url: source_url.to_string(),
        captured_at,
    }
}

#[cfg(test)]
mod tests {
    use super::assemble_batch;
    use chrono::{TimeZone, Utc};

    const RESULTS_PAGE: &str = r#"
        <html><body>
        <div class="panel panel-default panel-facilityReservation">
            <div class="panel-heading"><a class="fake-link">Test Court</a></div>
            <div class="panel-body">
                <div class="when">Monday, 15 mai, 18:00</div>
                <div class="when">19:00</div>
                <span class="ng-binding">Badminton</span>
                <span class="ng-binding">$15.00</span>
                <button id="reserve-btn-1" ng-click="vm.onReserve()" class="btn btn-primary">Reserve</button>
            </div>
        </div>
        <div class="panel panel-default panel-facilityReservation">
            <div class="panel-heading"><a class="fake-link">Broken Court</a></div>
            <div class="panel-body">
                <div class="when">Monday, not a date, nope</div>
                <button ng-click="vm.onReserve()" class="btn btn-primary">Reserve</button>
            </div>
        </div>
        </body></html>
    "#;

    #[test]
    fn one_malformed_slot_does_not_abort_the_batch() {
        let reference = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        let batch = assemble_batch(RESULTS_PAGE, "https://example.org/search", reference);

        assert_eq!(batch.slots.len(), 1);
        let slot = &batch.slots[0];
        assert_eq!(slot.name, "Test Court");
        assert_eq!(slot.price, "15.00");
        assert!(slot.can_reserve);
        assert_eq!(
            slot.start.to_date_time().format("%Y-%m-%d %H:%M").to_string(),
            "2025-05-15 18:00"
        );
        let end = slot.end.as_ref().unwrap();
        assert_eq!(
            end.to_date_time().format("%Y-%m-%d %H:%M").to_string(),
            "2025-05-15 19:00"
        );
    }

    #[test]
    fn a_page_without_panels_yields_an_empty_batch() {
        let reference = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        let batch = assemble_batch("<html><body></body></html>", "", reference);
        assert!(batch.slots.is_empty());
    }
}
