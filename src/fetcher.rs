//! Incremental page retrieval for a single mounted screen.
//!
//! [`PageFetcher`] does not perform I/O. Issuing a request hands back a
//! [`PageRequest`] ticket; the caller executes it and feeds the outcome back
//! through [`PageFetcher::complete`]. At most one ticket is outstanding at a
//! time, which is what keeps page merges strictly ordered.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::LoadError;
use crate::types::{CatalogItem, Page};

/// Ordered, append-only collection with unique ids.
#[derive(Debug, Clone)]
pub struct Catalog<T: CatalogItem> {
    items: Vec<T>,
    seen: HashSet<T::Id>,
}

impl<T: CatalogItem> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<T: CatalogItem> Catalog<T> {
    /// Append items in order, dropping any whose id is already present.
    /// Returns how many were actually added.
    pub fn extend<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.items.len();
        for item in items {
            if self.seen.insert(item.id()) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    NextPage,
}

/// Ticket for one outstanding page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub kind: LoadKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCursor {
    pub next_page: u32,
    /// Unknown until the first successful response.
    pub total_pages: Option<u32>,
    pub in_flight: Option<PageRequest>,
}

impl Default for FetchCursor {
    fn default() -> Self {
        Self {
            next_page: 1,
            total_pages: None,
            in_flight: None,
        }
    }
}

#[derive(Debug)]
pub struct PageFetcher<T: CatalogItem> {
    catalog: Catalog<T>,
    cursor: FetchCursor,
    last_error: Option<LoadError>,
}

impl<T: CatalogItem> Default for PageFetcher<T> {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            cursor: FetchCursor::default(),
            last_error: None,
        }
    }
}

impl<T: CatalogItem> PageFetcher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading page 1. Only valid while the catalog is empty and idle.
    pub fn request_initial_load(&mut self) -> Option<PageRequest> {
        if self.cursor.in_flight.is_some() || !self.catalog.is_empty() {
            return None;
        }
        Some(self.issue(1, LoadKind::Initial))
    }

    /// Request the next page if one may be issued right now.
    ///
    /// Safe to call at any frequency: while a request is outstanding, before
    /// the initial load has produced items, or once the last page is reached,
    /// this returns `None` and leaves state untouched.
    pub fn request_next_page(&mut self) -> Option<PageRequest> {
        if self.cursor.in_flight.is_some() || self.catalog.is_empty() || !self.has_more() {
            return None;
        }
        Some(self.issue(self.cursor.next_page, LoadKind::NextPage))
    }

    fn issue(&mut self, page: u32, kind: LoadKind) -> PageRequest {
        let request = PageRequest { page, kind };
        self.cursor.in_flight = Some(request);
        self.last_error = None;
        debug!(page, ?kind, "page request issued");
        request
    }

    /// Apply the outcome of `request`. Returns `false` (and changes nothing)
    /// when `request` is not the ticket currently in flight.
    pub fn complete(&mut self, request: PageRequest, outcome: Result<Page<T>, String>) -> bool {
        if self.cursor.in_flight != Some(request) {
            debug!(page = request.page, "ignoring completion for a request not in flight");
            return false;
        }
        self.cursor.in_flight = None;

        match outcome {
            Ok(page) => {
                if page.page != request.page {
                    warn!(
                        requested = request.page,
                        reported = page.page,
                        "source reported a different page number"
                    );
                }
                let received = page.items.len();
                let added = self.catalog.extend(page.items);
                self.cursor.next_page = request.page + 1;
                // An empty page ends the listing regardless of the reported total.
                self.cursor.total_pages = if received == 0 {
                    Some(request.page.min(page.total_pages))
                } else {
                    Some(page.total_pages)
                };
                debug!(
                    page = request.page,
                    received,
                    added,
                    total_pages = page.total_pages,
                    "page loaded"
                );
            }
            Err(message) => {
                warn!(page = request.page, %message, "page load failed");
                self.last_error = Some(match request.kind {
                    LoadKind::Initial => LoadError::InitialLoadFailed(message),
                    LoadKind::NextPage => LoadError::PageLoadFailed {
                        page: request.page,
                        message,
                    },
                });
            }
        }
        true
    }

    pub fn items(&self) -> &[T] {
        self.catalog.items()
    }

    pub fn catalog(&self) -> &Catalog<T> {
        &self.catalog
    }

    pub fn cursor(&self) -> FetchCursor {
        self.cursor
    }

    pub fn is_loading_initial(&self) -> bool {
        matches!(
            self.cursor.in_flight,
            Some(PageRequest {
                kind: LoadKind::Initial,
                ..
            })
        )
    }

    pub fn is_loading_more(&self) -> bool {
        matches!(
            self.cursor.in_flight,
            Some(PageRequest {
                kind: LoadKind::NextPage,
                ..
            })
        )
    }

    pub fn has_more(&self) -> bool {
        match self.cursor.total_pages {
            None => true,
            Some(total) => self.cursor.next_page <= total,
        }
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{movie, Movie, MovieId};

    fn page(n: u32, total: u32, movies: Vec<Movie>) -> Page<Movie> {
        Page {
            items: movies,
            page: n,
            total_pages: total,
        }
    }

    fn ids(fetcher: &PageFetcher<Movie>) -> Vec<u64> {
        fetcher.items().iter().map(|m| m.id.0).collect()
    }

    fn loaded(total: u32, movies: Vec<Movie>) -> PageFetcher<Movie> {
        let mut fetcher = PageFetcher::new();
        let req = fetcher.request_initial_load().unwrap();
        assert!(fetcher.complete(req, Ok(page(1, total, movies))));
        fetcher
    }

    #[test]
    fn two_page_source_loads_then_stops() {
        let mut fetcher = PageFetcher::new();
        let req = fetcher.request_initial_load().unwrap();
        assert_eq!(req.page, 1);
        assert!(fetcher.is_loading_initial());
        fetcher.complete(req, Ok(page(1, 2, vec![movie(1, "Alpha")])));
        assert_eq!(ids(&fetcher), vec![1]);
        assert!(fetcher.has_more());
        assert!(!fetcher.is_loading_initial());

        let req = fetcher.request_next_page().unwrap();
        assert_eq!(req.page, 2);
        assert!(fetcher.is_loading_more());
        fetcher.complete(req, Ok(page(2, 2, vec![movie(2, "Beta")])));
        assert_eq!(ids(&fetcher), vec![1, 2]);
        assert!(!fetcher.has_more());

        let before = fetcher.cursor();
        assert_eq!(fetcher.request_next_page(), None);
        assert_eq!(fetcher.cursor(), before);
    }

    #[test]
    fn duplicate_within_one_page_is_kept_once() {
        let fetcher = loaded(1, vec![movie(1, "Alpha"), movie(1, "Alpha again")]);
        assert_eq!(ids(&fetcher), vec![1]);
        assert_eq!(fetcher.items()[0].title, "Alpha");
    }

    #[test]
    fn overlap_across_pages_preserves_first_position() {
        let mut fetcher = loaded(3, vec![movie(1, "A"), movie(2, "B")]);
        let req = fetcher.request_next_page().unwrap();
        fetcher.complete(req, Ok(page(2, 3, vec![movie(2, "B"), movie(3, "C")])));
        let req = fetcher.request_next_page().unwrap();
        fetcher.complete(req, Ok(page(3, 3, vec![movie(1, "A"), movie(4, "D")])));

        assert_eq!(ids(&fetcher), vec![1, 2, 3, 4]);
        assert_eq!(fetcher.items()[1].id, MovieId(2));
    }

    #[test]
    fn rapid_next_page_calls_issue_a_single_request() {
        let mut fetcher = loaded(5, vec![movie(1, "A")]);
        let issued: Vec<_> = (0..50).filter_map(|_| fetcher.request_next_page()).collect();
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].page, 2);
    }

    #[test]
    fn next_page_is_a_no_op_before_initial_load() {
        let mut fetcher: PageFetcher<Movie> = PageFetcher::new();
        assert_eq!(fetcher.request_next_page(), None);

        let _req = fetcher.request_initial_load().unwrap();
        assert_eq!(fetcher.request_next_page(), None);
        assert_eq!(fetcher.request_initial_load(), None);
    }

    #[test]
    fn initial_load_is_rejected_once_catalog_has_items() {
        let mut fetcher = loaded(2, vec![movie(1, "A")]);
        assert_eq!(fetcher.request_initial_load(), None);
    }

    #[test]
    fn initial_failure_leaves_catalog_empty_and_allows_retry() {
        let mut fetcher: PageFetcher<Movie> = PageFetcher::new();
        let req = fetcher.request_initial_load().unwrap();
        fetcher.complete(req, Err("HTTP error! Status: 503".to_string()));

        assert!(fetcher.items().is_empty());
        assert!(!fetcher.is_loading_initial());
        assert_eq!(
            fetcher.last_error(),
            Some(&LoadError::InitialLoadFailed("HTTP error! Status: 503".to_string()))
        );

        let retry = fetcher.request_initial_load().unwrap();
        assert_eq!(retry.page, 1);
        assert_eq!(fetcher.last_error(), None);
        fetcher.complete(retry, Ok(page(1, 1, vec![movie(1, "A")])));
        assert_eq!(ids(&fetcher), vec![1]);
    }

    #[test]
    fn page_failure_keeps_items_and_retries_same_page() {
        let mut fetcher = loaded(3, vec![movie(1, "A")]);
        let req = fetcher.request_next_page().unwrap();
        fetcher.complete(req, Err("timeout".to_string()));

        assert_eq!(ids(&fetcher), vec![1]);
        assert_eq!(fetcher.cursor().next_page, 2);
        assert!(matches!(
            fetcher.last_error(),
            Some(LoadError::PageLoadFailed { page: 2, .. })
        ));

        let retry = fetcher.request_next_page().unwrap();
        assert_eq!(retry.page, 2);
    }

    #[test]
    fn failure_does_not_retry_on_its_own() {
        let mut fetcher = loaded(3, vec![movie(1, "A")]);
        let req = fetcher.request_next_page().unwrap();
        fetcher.complete(req, Err("boom".to_string()));
        assert_eq!(fetcher.cursor().in_flight, None);
    }

    #[test]
    fn latest_total_pages_wins() {
        let mut fetcher = loaded(2, vec![movie(1, "A")]);
        let req = fetcher.request_next_page().unwrap();
        fetcher.complete(req, Ok(page(2, 4, vec![movie(2, "B")])));
        assert_eq!(fetcher.cursor().total_pages, Some(4));
        assert!(fetcher.has_more());
    }

    #[test]
    fn shrinking_total_stops_pagination_immediately() {
        let mut fetcher = loaded(5, vec![movie(1, "A")]);
        let req = fetcher.request_next_page().unwrap();
        fetcher.complete(req, Ok(page(2, 1, vec![movie(2, "B")])));

        assert!(!fetcher.has_more());
        assert_eq!(fetcher.request_next_page(), None);
    }

    #[test]
    fn empty_page_ends_the_listing() {
        let mut fetcher = loaded(10, vec![movie(1, "A")]);
        let req = fetcher.request_next_page().unwrap();
        fetcher.complete(req, Ok(page(2, 10, vec![])));

        assert!(!fetcher.has_more());
        assert_eq!(fetcher.request_next_page(), None);
    }

    #[test]
    fn empty_first_page_can_be_reloaded() {
        let mut fetcher = loaded(1, vec![]);
        assert!(fetcher.items().is_empty());
        assert!(!fetcher.has_more());
        assert!(fetcher.request_initial_load().is_some());
    }

    #[test]
    fn completion_for_other_ticket_is_ignored() {
        let mut fetcher = loaded(3, vec![movie(1, "A")]);
        let stale = PageRequest {
            page: 7,
            kind: LoadKind::NextPage,
        };
        assert!(!fetcher.complete(stale, Ok(page(7, 9, vec![movie(9, "Z")]))));
        assert_eq!(ids(&fetcher), vec![1]);
        assert_eq!(fetcher.cursor().total_pages, Some(3));

        let req = fetcher.request_next_page().unwrap();
        fetcher.complete(req, Ok(page(2, 3, vec![movie(2, "B")])));
        assert!(!fetcher.complete(req, Ok(page(2, 3, vec![movie(3, "C")]))));
        assert_eq!(ids(&fetcher), vec![1, 2]);
    }

    #[test]
    fn catalog_never_shrinks() {
        let mut fetcher = loaded(6, vec![movie(1, "A"), movie(2, "B")]);
        let mut last_len = fetcher.items().len();
        let batches = [
            Ok(vec![movie(2, "B")]),
            Err("flaky".to_string()),
            Ok(vec![movie(3, "C"), movie(1, "A")]),
            Ok(vec![]),
        ];
        for batch in batches {
            let Some(req) = fetcher.request_next_page() else {
                break;
            };
            let outcome = batch.map(|items| page(req.page, 6, items));
            fetcher.complete(req, outcome);
            assert!(fetcher.items().len() >= last_len);
            last_len = fetcher.items().len();
        }
        assert_eq!(ids(&fetcher), vec![1, 2, 3]);
    }
}
