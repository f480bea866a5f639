use court_availability::batch::{NormalizedSlot, ReservationBatch};
use std::fmt::Write;

/// Renders the bookable slots of a batch as a Telegram-HTML summary.
///
/// Returns `None` when nothing is bookable — the everyday outcome, not an
/// error — so callers can skip delivery entirely.
pub fn build_message(batch: &ReservationBatch) -> Option<String> {
    let bookable: Vec<&NormalizedSlot> = batch.bookable_slots().collect();
    if bookable.is_empty() {
        return None;
    }

    let mut message = String::from("🏸 <b>Badminton Reservations Available:</b>\n\n");
    for (index, slot) in bookable.iter().enumerate() {
        let start = slot.start.to_date_time();
        let end = slot
            .end
            .as_ref()
            .map(|end| end.to_date_time().format("%H:%M").to_string())
            .unwrap_or_else(|| "N/A".to_string());

        let _ = writeln!(message, "{}. <b>{}</b>", index + 1, slot.name);
        let _ = writeln!(
            message,
            "   📅 {} {} - {}",
            start.format("%A %d %B"),
            start.format("%H:%M"),
            end
        );
        let _ = writeln!(message, "   💰 ${}\n", slot.price);
    }

    if !batch.source_url.is_empty() {
        let _ = write!(message, "\n🔗 <a href='{}'>Book Now</a>", batch.source_url);
    }

    Some(message)
}
