use crate::panel::{PanelElement, PanelHandle};

const NAME_SELECTOR: &str = ".panel-heading .fake-link";
const WHEN_SELECTOR: &str = ".panel-body .when";
const PRICE_SELECTOR: &str = ".panel-body .ng-binding";
const RESERVE_BUTTON_SELECTOR: &str = r#"button[ng-click*="vm.onReserve"]"#;

/// One scraped reservation offering, before any date/time resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawSlot {
    pub name: String,
    pub raw_date: String,
    pub raw_start_time: String,
    pub raw_end_time: String,
    /// Currency marker already stripped, surrounding whitespace trimmed.
    pub raw_price: String,
    pub can_reserve: bool,
    /// Identifier of the reserve control, kept for traceability only.
    pub action_id: Option<String>,
}

/// Produces one [`RawSlot`] per panel, preserving input order. A panel
/// missing any sub-element degrades the matching fields to their defaults;
/// extraction itself cannot fail.
pub fn extract_slots<P: PanelHandle>(panels: &[P]) -> Vec<RawSlot> {
    panels.iter().map(extract_slot).collect()
}

fn extract_slot<P: PanelHandle>(panel: &P) -> RawSlot {
    let name = panel
        .query(NAME_SELECTOR)
        .map(|heading| heading.text().trim().to_string())
        .unwrap_or_default();

    let when_elements = panel.query_all(WHEN_SELECTOR);

    let mut raw_date = String::new();
    let mut raw_start_time = String::new();
    if let Some(first) = when_elements.first() {
        let text = first.text();
        let mut parts = text.split(',');
        // Part 0 is the weekday; the date and start time follow it.
        parts.next();
        if let Some(date) = parts.next() {
            raw_date = date.trim().to_string();
        }
        if let Some(start) = parts.next() {
            raw_start_time = start.trim().to_string();
        }
    }

    let raw_end_time = when_elements
        .get(1)
        .map(|second| second.text().trim().to_string())
        .unwrap_or_default();

    let raw_price = panel
        .query_all(PRICE_SELECTOR)
        .iter()
        .map(PanelElement::text)
        .filter(|text| text.contains('$'))
        .last()
        .map(|text| text.replace('$', "").trim().to_string())
        .unwrap_or_default();

    let mut can_reserve = false;
    let mut action_id = None;
    if let Some(button) = panel.query(RESERVE_BUTTON_SELECTOR) {
        can_reserve = button
            .attribute("class")
            .map(|classes| !classes.contains("disabled"))
            .unwrap_or(false);
        action_id = button.attribute("id");
    }

    RawSlot {
        name,
        raw_date,
        raw_start_time,
        raw_end_time,
        raw_price,
        can_reserve,
        action_id,
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_slots, RawSlot};
    use crate::panel::{PanelElement, PanelHandle};
    use std::collections::HashMap;

    #[derive(Clone, Default)]
    struct FakeElement {
        text: String,
        attributes: HashMap<&'static str, String>,
    }

    impl FakeElement {
        fn with_text(text: &str) -> Self {
            FakeElement {
                text: text.to_string(),
                ..Default::default()
            }
        }

        fn with_attribute(mut self, name: &'static str, value: &str) -> Self {
            self.attributes.insert(name, value.to_string());
            self
        }
    }

    impl PanelElement for FakeElement {
        fn text(&self) -> String {
            self.text.clone()
        }

        fn attribute(&self, name: &str) -> Option<String> {
            self.attributes.get(name).cloned()
        }
    }

    #[derive(Default)]
    struct FakePanel {
        elements: Vec<(&'static str, FakeElement)>,
    }

    impl FakePanel {
        fn add(mut self, selector: &'static str, element: FakeElement) -> Self {
            self.elements.push((selector, element));
            self
        }
    }

    impl PanelHandle for FakePanel {
        type Element = FakeElement;

        fn query(&self, selector: &str) -> Option<FakeElement> {
            self.elements
                .iter()
                .find(|(registered, _)| *registered == selector)
                .map(|(_, element)| element.clone())
        }

        fn query_all(&self, selector: &str) -> Vec<FakeElement> {
            self.elements
                .iter()
                .filter(|(registered, _)| *registered == selector)
                .map(|(_, element)| element.clone())
                .collect()
        }
    }

    fn bookable_panel() -> FakePanel {
        FakePanel::default()
            .add(
                ".panel-heading .fake-link",
                FakeElement::with_text("Test Court"),
            )
            .add(
                ".panel-body .when",
                FakeElement::with_text("Monday, 15 mai, 18:00"),
            )
            .add(".panel-body .when", FakeElement::with_text("19:00"))
            .add(".panel-body .ng-binding", FakeElement::with_text("$15.00"))
            .add(
                r#"button[ng-click*="vm.onReserve"]"#,
                FakeElement::default()
                    .with_attribute("class", "btn btn-primary")
                    .with_attribute("id", "reserve-btn-1"),
            )
    }

    #[test]
    fn a_fully_populated_panel_extracts_every_field() {
        let slots = extract_slots(&[bookable_panel()]);

        assert_eq!(
            slots,
            vec![RawSlot {
                name: "Test Court".to_string(),
                raw_date: "15 mai".to_string(),
                raw_start_time: "18:00".to_string(),
                raw_end_time: "19:00".to_string(),
                raw_price: "15.00".to_string(),
                can_reserve: true,
                action_id: Some("reserve-btn-1".to_string()),
            }]
        );
    }

    #[test]
    fn a_disabled_reserve_button_is_not_bookable() {
        let panel = FakePanel::default().add(
            r#"button[ng-click*="vm.onReserve"]"#,
            FakeElement::default().with_attribute("class", "btn btn-primary disabled"),
        );

        let slots = extract_slots(&[panel]);
        assert!(!slots[0].can_reserve);
    }

    #[test]
    fn a_button_without_a_class_attribute_is_not_bookable() {
        let panel = FakePanel::default().add(
            r#"button[ng-click*="vm.onReserve"]"#,
            FakeElement::default().with_attribute("id", "reserve-btn-1"),
        );

        let slots = extract_slots(&[panel]);
        assert!(!slots[0].can_reserve);
        assert_eq!(slots[0].action_id.as_deref(), Some("reserve-btn-1"));
    }

    #[test]
    fn an_empty_panel_degrades_every_field_to_its_default() {
        let slots = extract_slots(&[FakePanel::default()]);
        assert_eq!(slots, vec![RawSlot::default()]);
    }

    #[test]
    fn the_last_currency_marked_price_wins() {
        let panel = FakePanel::default()
            .add(".panel-body .ng-binding", FakeElement::with_text("Badminton"))
            .add(".panel-body .ng-binding", FakeElement::with_text("$12.00"))
            .add(
                ".panel-body .ng-binding",
                FakeElement::with_text("  $15.50  "),
            )
            .add(".panel-body .ng-binding", FakeElement::with_text("1 court"));

        let slots = extract_slots(&[panel]);
        assert_eq!(slots[0].raw_price, "15.50");
    }

    #[test]
    fn a_single_when_element_without_a_time_part_leaves_the_start_empty() {
        let panel = FakePanel::default().add(
            ".panel-body .when",
            FakeElement::with_text("Monday, 15 mai"),
        );

        let slots = extract_slots(&[panel]);
        assert_eq!(slots[0].raw_date, "15 mai");
        assert_eq!(slots[0].raw_start_time, "");
        assert_eq!(slots[0].raw_end_time, "");
    }

    #[test]
    fn input_order_is_preserved() {
        let panels = vec![
            FakePanel::default().add(
                ".panel-heading .fake-link",
                FakeElement::with_text("Court A"),
            ),
            FakePanel::default().add(
                ".panel-heading .fake-link",
                FakeElement::with_text("Court B"),
            ),
        ];

        let names: Vec<String> = extract_slots(&panels)
            .into_iter()
            .map(|slot| slot.name)
            .collect();
        assert_eq!(names, vec!["Court A", "Court B"]);
    }
}
