// src/pipeline/check.rs

//! Single watcher run orchestration.
//!
//! Sequence: fetch → extract → load previous snapshot → diff →
//! [notify if new] → persist current listings as the new snapshot.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::diff::has_new_listings;
use crate::services::{ListingExtractor, ListingNotifier, PageFetcher};
use crate::storage::SnapshotStore;

/// What happened to the notification during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// No new listings, nothing to send
    Skipped,
    /// Notification delivered
    Sent,
    /// Delivery attempted and failed; the run continued
    Failed(String),
}

/// Summary of a single watcher run.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Number of listings extracted from the page
    pub listing_count: usize,

    /// Whether any extracted listing was absent from the previous snapshot
    pub has_new: bool,

    /// Outcome of the notification step
    pub delivery: DeliveryStatus,
}

/// Run one complete check against the configured search page.
///
/// A fetch failure aborts before the snapshot is read or written and before
/// anything is sent.
pub async fn run_check(
    config: &Config,
    store: &dyn SnapshotStore,
    notifier: &dyn ListingNotifier,
) -> Result<CheckOutcome> {
    log::info!(
        "Checking for new Crous listings at {}",
        config.watch.search_url
    );

    let fetcher = PageFetcher::new(&config.http)?;
    let html = fetcher.fetch(&config.watch.search_url).await?;

    let extractor = ListingExtractor::new()?;
    process_page(&extractor, &html, store, notifier).await
}

/// Deterministic core of a run: everything after the fetch.
///
/// Given a fixed page body and a fixed previous snapshot, the outcome
/// (notification attempted or not, new snapshot content) is fully
/// determined.
pub async fn process_page(
    extractor: &ListingExtractor,
    html: &str,
    store: &dyn SnapshotStore,
    notifier: &dyn ListingNotifier,
) -> Result<CheckOutcome> {
    let started_at = Utc::now();

    let current = extractor.extract(html);
    if current.is_empty() {
        // An empty extraction still replaces the snapshot below.
        log::warn!("No listings extracted from the page");
    } else {
        log::info!("Extracted {} listings", current.len());
    }

    let previous = store.load().await?;
    let has_new = has_new_listings(&previous, &current);

    let delivery = if has_new {
        match notifier.notify(&current).await {
            Ok(()) => {
                log::info!("Sent update covering {} listings", current.len());
                DeliveryStatus::Sent
            }
            Err(e) => {
                log::error!("Failed to send notification: {e}");
                DeliveryStatus::Failed(e.to_string())
            }
        }
    } else {
        log::info!("No new listings detected; nothing sent");
        DeliveryStatus::Skipped
    };

    store.save(&current).await?;

    Ok(CheckOutcome {
        started_at,
        finished_at: Utc::now(),
        listing_count: current.len(),
        has_new,
        delivery,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::error::AppError;
    use crate::models::Listing;
    use crate::storage::LocalSnapshotStore;

    /// Notifier double that records every delivered listing set.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Vec<Listing>>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn sent(&self) -> Vec<Vec<Listing>> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ListingNotifier for RecordingNotifier {
        async fn notify(&self, listings: &[Listing]) -> crate::error::Result<()> {
            if self.fail {
                return Err(AppError::notify("telegram unreachable"));
            }
            self.sent.lock().unwrap().push(listings.to_vec());
            Ok(())
        }
    }

    fn card(title: &str, href: &str) -> String {
        format!(
            r#"<li class="fr-col-12 fr-col-sm-6 fr-col-md-4 fr-col-lg-4">
                 <h3 class="fr-card__title"><a href="{href}">{title}</a></h3>
                 <p class="fr-card__desc">Lyon</p>
                 <p class="fr-badge">245 €</p>
               </li>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!(
            r#"<html><body><ul class="fr-grid-row svelte-11sc5my">{}</ul></body></html>"#,
            cards.join("\n")
        )
    }

    fn store_in(tmp: &TempDir) -> LocalSnapshotStore {
        LocalSnapshotStore::new(tmp.path().join("previous_listings.json"))
    }

    #[tokio::test]
    async fn test_unchanged_set_sends_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let notifier = RecordingNotifier::default();
        let extractor = ListingExtractor::new().unwrap();

        let html = page(&[card("A", "/residence/1"), card("B", "/residence/2")]);
        store.save(&extractor.extract(&html)).await.unwrap();

        let outcome = process_page(&extractor, &html, &store, &notifier)
            .await
            .unwrap();

        assert!(!outcome.has_new);
        assert_eq!(outcome.delivery, DeliveryStatus::Skipped);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_new_listing_notifies_with_full_set_and_persists_it() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let notifier = RecordingNotifier::default();
        let extractor = ListingExtractor::new().unwrap();

        store
            .save(&extractor.extract(&page(&[card("A", "/residence/1")])))
            .await
            .unwrap();

        let html = page(&[card("A", "/residence/1"), card("C", "/residence/3")]);
        let outcome = process_page(&extractor, &html, &store, &notifier)
            .await
            .unwrap();

        assert!(outcome.has_new);
        assert_eq!(outcome.delivery, DeliveryStatus::Sent);
        assert_eq!(outcome.listing_count, 2);

        // The message covers the full current set, not just the new entry
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].len(), 2);

        // The persisted snapshot is exactly the current extraction
        let snapshot = store.load().await.unwrap();
        assert_eq!(snapshot, extractor.extract(&html));
    }

    #[tokio::test]
    async fn test_delivery_failure_still_persists_snapshot() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let notifier = RecordingNotifier::failing();
        let extractor = ListingExtractor::new().unwrap();

        let html = page(&[card("A", "/residence/1")]);
        let outcome = process_page(&extractor, &html, &store, &notifier)
            .await
            .unwrap();

        assert!(outcome.has_new);
        assert!(matches!(outcome.delivery, DeliveryStatus::Failed(_)));
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_overwrites_snapshot_without_sending() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let notifier = RecordingNotifier::default();
        let extractor = ListingExtractor::new().unwrap();

        store
            .save(&extractor.extract(&page(&[card("A", "/residence/1")])))
            .await
            .unwrap();

        let outcome = process_page(&extractor, &page(&[]), &store, &notifier)
            .await
            .unwrap();

        assert!(!outcome.has_new);
        assert_eq!(outcome.listing_count, 0);
        assert_eq!(outcome.delivery, DeliveryStatus::Skipped);
        assert!(notifier.sent().is_empty());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_first_run_on_empty_snapshot_notifies() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let notifier = RecordingNotifier::default();
        let extractor = ListingExtractor::new().unwrap();

        let html = page(&[card("A", "/residence/1")]);
        let outcome = process_page(&extractor, &html, &store, &notifier)
            .await
            .unwrap();

        assert!(outcome.has_new);
        assert_eq!(outcome.delivery, DeliveryStatus::Sent);
        assert_eq!(store.load().await.unwrap().len(), 1);
    }
}
