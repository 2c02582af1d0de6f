//! Listing data structure.

use serde::{Deserialize, Serialize};

/// Fallback title when a card has no title element.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Fallback location when a card has no description element.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Fallback price when a card has no price badge.
pub const NO_PRICE_INFO: &str = "No Price Info";

/// Fallback link when a card has no anchor.
pub const NO_LINK: &str = "No Link";

/// A housing offer scraped from the search page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    /// Stable key derived from title and link
    pub id: String,

    /// Offer title
    pub title: String,

    /// Residence location
    pub location: String,

    /// Price as displayed on the card (free text)
    pub price: String,

    /// Full URL to the offer detail page
    pub link: String,
}

impl Listing {
    /// Build a listing, deriving its id from title and link.
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        price: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let link = link.into();

        Self {
            id: Self::derive_id(&title, &link),
            title,
            location: location.into(),
            price: price.into(),
            link,
        }
    }

    /// Derive the stable listing key.
    ///
    /// Two listings with identical title and link are the same listing
    /// across runs, even if other fields changed.
    pub fn derive_id(title: &str, link: &str) -> String {
        format!("{title}-{link}")
    }
}
