//! New-listing detection between the previous snapshot and the current
//! extraction.
//!
//! Membership by id is the only criterion; removals and field changes on
//! an existing id do not count as new.

use std::collections::HashSet;

use crate::models::Listing;

/// True iff at least one current listing id is absent from the previous set.
///
/// Short-circuits on the first new id.
pub fn has_new_listings(previous: &[Listing], current: &[Listing]) -> bool {
    let previous_ids: HashSet<&str> = previous.iter().map(|l| l.id.as_str()).collect();

    current
        .iter()
        .any(|listing| !previous_ids.contains(listing.id.as_str()))
}
