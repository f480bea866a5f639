use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

/// One sub-element of a reservation panel. The scraped page only ever needs
/// to answer three questions per element: what does it say, what elements sit
/// under it, and what are its attributes. Extraction is written against these
/// traits so it runs unchanged over fakes in tests.
pub trait PanelElement {
    fn text(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;
}

pub trait PanelHandle {
    type Element: PanelElement;

    fn query(&self, selector: &str) -> Option<Self::Element>;
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;
}

const PANEL_SELECTOR: &str = ".panel.panel-default.panel-facilityReservation";

lazy_static! {
    static ref PANEL: Selector =
        Selector::parse(PANEL_SELECTOR).expect("PANEL selector to compile");
}

/// A reservation panel backed by a parsed results page.
pub struct HtmlPanel<'a>(ElementRef<'a>);

impl<'a> HtmlPanel<'a> {
    pub fn panels_in(document: &'a Html) -> Vec<HtmlPanel<'a>> {
        document.select(&PANEL).map(HtmlPanel).collect()
    }
}

pub struct HtmlPanelElement<'a>(ElementRef<'a>);

impl PanelElement for HtmlPanelElement<'_> {
    fn text(&self) -> String {
        self.0.text().collect::<String>()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.value().attr(name).map(str::to_string)
    }
}

impl<'a> PanelHandle for HtmlPanel<'a> {
    type Element = HtmlPanelElement<'a>;

    fn query(&self, selector: &str) -> Option<Self::Element> {
        let selector = Selector::parse(selector).ok()?;
        self.0.select(&selector).next().map(HtmlPanelElement)
    }

    fn query_all(&self, selector: &str) -> Vec<Self::Element> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.0.select(&selector).map(HtmlPanelElement).collect()
    }
}
