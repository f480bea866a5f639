use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use shared_kernel::eastern_date_time::EasternTZDateTime;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{info, warn};

const PANEL_SELECTOR: &str = ".panel.panel-default.panel-facilityReservation";
const CALENDAR_BUTTON_SELECTOR: &str = "#u6510_btnFacilityReservationSearchReserveDateCalendar";
const START_TIME_HH_SELECTOR: &str =
    "#u6510_edFacilityReservationSearchStartTime input[placeholder='HH']";
const START_TIME_MM_SELECTOR: &str =
    "#u6510_edFacilityReservationSearchStartTime input[placeholder='MM']";
const END_TIME_HH_SELECTOR: &str =
    "#u6510_edFacilityReservationSearchEndTime input[placeholder='HH']";

const SEARCH_START_HOUR: &str = "18";
const SEARCH_START_MINUTE: &str = "00";
const SEARCH_END_HOUR: &str = "22";

/// One fixed ceiling on the wait for search results. Zero panels after this
/// is "no results", not a failure.
const RESULTS_WAIT: StdDuration = StdDuration::from_secs(10);

/// How many days of the rolling window to select in the calendar widget.
const DAYS_TO_CHECK: i64 = 4;

/// The results page as captured at the end of the navigation, ready for
/// offline extraction.
pub struct CapturedPage {
    pub html: String,
    pub url: String,
}

/// Drives the booking site UI in a headless browser: badminton category,
/// neighborhood filter, evening time window, the next few days in the
/// calendar. Entirely blocking; callers on an async runtime should wrap
/// [`PageReader::capture`] in `spawn_blocking`.
pub struct PageReader {
    headless: bool,
    action_delay: StdDuration,
}

impl PageReader {
    pub fn new(headless: bool, action_delay_ms: u64) -> Self {
        Self {
            headless,
            action_delay: StdDuration::from_millis(action_delay_ms),
        }
    }

    pub fn capture(&self, booking_url: &str, neighborhoods: &[String]) -> Result<CapturedPage> {
        let launch_options = LaunchOptions {
            headless: self.headless,
            sandbox: false,
            ..Default::default()
        };
        let browser = Browser::new(launch_options).context("Failed to launch headless browser")?;
        let tab = browser.new_tab().context("Failed to create new tab")?;

        info!("Navigating to {booking_url}");
        tab.navigate_to(booking_url)
            .context("Failed to navigate to the booking site")?;
        tab.wait_until_navigated()
            .context("Failed to wait for page navigation")?;

        self.click(tab.wait_for_xpath("//a[contains(., 'Reserve a space')]")?)?;
        self.click(tab.wait_for_xpath("//button[contains(., 'Accepter tout')]")?)?;
        self.click(tab.wait_for_xpath("//a[contains(., 'Badminton')]")?)?;

        self.select_neighborhoods(&tab, neighborhoods)?;
        self.select_time_window(&tab)?;
        self.select_dates(&tab)?;

        if tab
            .wait_for_element_with_custom_timeout(PANEL_SELECTOR, RESULTS_WAIT)
            .is_err()
        {
            warn!(
                "No reservation panels appeared within {}s; treating as no results",
                RESULTS_WAIT.as_secs()
            );
        }

        let html = tab.get_content().context("Failed to get page content")?;
        let url = tab.get_url();
        Ok(CapturedPage { html, url })
    }

    fn select_neighborhoods(&self, tab: &Arc<Tab>, neighborhoods: &[String]) -> Result<()> {
        self.click(tab.wait_for_xpath("//*[contains(text(), 'Arrondissement Tous')]")?)?;

        for neighborhood in neighborhoods {
            info!("Selecting neighborhood: {neighborhood}");
            let checkbox = tab.find_element_by_xpath(&format!(
                "//label[contains(normalize-space(.), \"{neighborhood}\")]//input[@type='checkbox']"
            ));
            match checkbox {
                Ok(checkbox) => self.click(checkbox)?,
                Err(err) => warn!("Could not find neighborhood {neighborhood}: {err}"),
            }
        }

        self.click(tab.wait_for_xpath("//button[contains(., 'Confirmer')]")?)
    }

    fn select_time_window(&self, tab: &Arc<Tab>) -> Result<()> {
        self.click(tab.wait_for_element(START_TIME_HH_SELECTOR)?)?;
        tab.type_str(SEARCH_START_HOUR)?;
        self.click(tab.wait_for_element(START_TIME_MM_SELECTOR)?)?;
        tab.type_str(SEARCH_START_MINUTE)?;

        self.click(tab.wait_for_element(END_TIME_HH_SELECTOR)?)?;
        tab.type_str(SEARCH_END_HOUR)?;
        tab.press_key("Enter")?;
        Ok(())
    }

    /// Selects every matching day button for each of the upcoming days,
    /// re-opening the calendar between clicks since a click closes it.
    fn select_dates(&self, tab: &Arc<Tab>) -> Result<()> {
        let today = EasternTZDateTime::now().date();
        for day_label in upcoming_day_labels(today) {
            self.click(tab.wait_for_element(CALENDAR_BUTTON_SELECTOR)?)?;
            let day_buttons = tab
                .find_elements_by_xpath(&format!(
                    "//button[.//span[contains(text(), '{day_label}')]]"
                ))
                .unwrap_or_default();
            let count = day_buttons.len();
            for (index, button) in day_buttons.into_iter().enumerate() {
                self.click(button)?;
                if index + 1 < count {
                    self.click(tab.wait_for_element(CALENDAR_BUTTON_SELECTOR)?)?;
                }
            }
        }
        Ok(())
    }

    fn click(&self, element: Element) -> Result<()> {
        element.click().context("Failed to click element")?;
        std::thread::sleep(self.action_delay);
        Ok(())
    }
}

/// Two-digit day-of-month labels for today and the next few days, as the
/// calendar widget renders them.
fn upcoming_day_labels(today: NaiveDate) -> Vec<String> {
    (0..DAYS_TO_CHECK)
        .map(|offset| (today + Duration::days(offset)).format("%d").to_string())
        .collect()
}
