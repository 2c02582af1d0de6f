// src/services/extractor.rs

//! Listing extraction from search result markup.
//!
//! Selectors target the DSFR card grid used by the Crous search results
//! page. Upstream markup is not guaranteed stable, so a card missing a
//! sub-element falls back to a named default instead of failing.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Listing, NO_LINK, NO_PRICE_INFO, UNKNOWN_LOCATION, UNKNOWN_TITLE};
use crate::utils::{clean_text, resolve_url};

/// Base origin used to resolve relative offer links.
pub const BASE_ORIGIN: &str = "https://trouverunlogement.lescrous.fr";

/// Heading shown when the search matched nothing.
const NO_RESULTS_SELECTOR: &str = "h2.SearchResults-desktop.fr-h4.svelte-11sc5my";

/// Phrase inside the heading that confirms an empty result set.
const NO_RESULTS_MARKER: &str = "Aucun logement trouvé";

/// One listing card in the result grid.
const CARD_SELECTOR: &str =
    "ul.fr-grid-row.svelte-11sc5my > li.fr-col-12.fr-col-sm-6.fr-col-md-4.fr-col-lg-4";

const TITLE_SELECTOR: &str = "h3.fr-card__title";
const LOCATION_SELECTOR: &str = "p.fr-card__desc";
const PRICE_SELECTOR: &str = "p.fr-badge";
const LINK_SELECTOR: &str = "a[href]";

/// Extracts listing records from fetched markup.
pub struct ListingExtractor {
    base: Url,
    no_results: Selector,
    card: Selector,
    title: Selector,
    location: Selector,
    price: Selector,
    link: Selector,
}

impl ListingExtractor {
    /// Create an extractor with all selectors parsed up front.
    pub fn new() -> Result<Self> {
        Ok(Self {
            base: Url::parse(BASE_ORIGIN)?,
            no_results: parse_selector(NO_RESULTS_SELECTOR)?,
            card: parse_selector(CARD_SELECTOR)?,
            title: parse_selector(TITLE_SELECTOR)?,
            location: parse_selector(LOCATION_SELECTOR)?,
            price: parse_selector(PRICE_SELECTOR)?,
            link: parse_selector(LINK_SELECTOR)?,
        })
    }

    /// Extract all listings from the page, preserving document order.
    ///
    /// An explicit no-results heading and zero matching cards both yield an
    /// empty list, not an error.
    pub fn extract(&self, html: &str) -> Vec<Listing> {
        let document = Html::parse_document(html);

        if self.is_no_results_page(&document) {
            return Vec::new();
        }

        document
            .select(&self.card)
            .map(|card| self.extract_card(&card))
            .collect()
    }

    fn is_no_results_page(&self, document: &Html) -> bool {
        document.select(&self.no_results).any(|heading| {
            heading
                .text()
                .collect::<String>()
                .contains(NO_RESULTS_MARKER)
        })
    }

    fn extract_card(&self, card: &ElementRef) -> Listing {
        let title = self
            .select_text(card, &self.title)
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let location = self
            .select_text(card, &self.location)
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
        let price = self
            .select_text(card, &self.price)
            .unwrap_or_else(|| NO_PRICE_INFO.to_string());

        let link = card
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| resolve_url(&self.base, href))
            .unwrap_or_else(|| NO_LINK.to_string());

        Listing::new(title, location, price, link)
    }

    /// Text of the first matching sub-element, entity-decoded and cleaned.
    /// None when the sub-element is absent or blank.
    fn select_text(&self, card: &ElementRef, selector: &Selector) -> Option<String> {
        let element = card.select(selector).next()?;
        let text = clean_text(&element.text().collect::<String>());
        if text.is_empty() { None } else { Some(text) }
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
