//! List and detail state for the content browser
//!
//! Everything here is UI-independent: the app issues tickets, runs the
//! requests on its runtime and feeds the results back in. Each list request
//! carries a sequence number and only the newest issued request may change
//! what is displayed, so a slow response for an old title can never
//! overwrite the results of a newer one.

use crate::error::{FetchError, InputError};
use crate::types::{Content, ContentId};
use std::collections::HashSet;
use tracing::{debug, error, warn};

/// Reject blank titles. The title is sent as typed; the service matches it exactly.
pub fn validate_title(input: &str) -> Result<&str, InputError> {
    if input.trim().is_empty() {
        Err(InputError::EmptyTitle)
    } else {
        Ok(input)
    }
}

/// One rendered entry of the list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    content: Content,
}

impl ListItem {
    pub fn id(&self) -> &ContentId {
        &self.content.id
    }

    pub fn title(&self) -> &str {
        &self.content.title
    }

    /// Present iff the record has a photo.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.content.photo_url.as_deref()
    }

    pub fn alt_text(&self) -> String {
        photo_alt(&self.content.title)
    }

    pub fn content(&self) -> &Content {
        &self.content
    }
}

pub fn photo_alt(title: &str) -> String {
    format!("Photo of {}", title)
}

/// The displayed list and detail, mutated only through explicit setters.
#[derive(Debug, Default)]
pub struct RenderState {
    items: Vec<ListItem>,
    detail: Option<Content>,
}

impl RenderState {
    /// Replace the list with one item per content, in service order.
    pub fn set_list(&mut self, contents: Vec<Content>) {
        self.items.clear();
        self.items
            .extend(contents.into_iter().map(|content| ListItem { content }));
    }

    pub fn clear_list(&mut self) {
        self.items.clear();
    }

    pub fn set_detail(&mut self, content: Content) {
        self.detail = Some(content);
    }

    pub fn clear_detail(&mut self) {
        self.detail = None;
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn detail(&self) -> Option<&Content> {
        self.detail.as_ref()
    }
}

/// Handle for an issued list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub title: String,
}

/// Handle for an issued detail refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub seq: u64,
    pub id: ContentId,
}

/// What applying a response did to the displayed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// List replaced with this many items.
    Listed(usize),
    /// Detail replaced with the refreshed record.
    Refreshed,
    /// Request failed; list cleared, detail untouched.
    Failed,
    /// Superseded by a newer request; nothing changed.
    Stale,
}

#[derive(Debug, Default)]
pub struct ContentBrowser {
    state: RenderState,
    selected: Option<usize>,
    issued: u64,
    applied: u64,
    in_flight: Option<FetchTicket>,
    last_title: Option<String>,
    detail_seq: u64,
    refresh_in_flight: Option<RefreshTicket>,
}

impl ContentBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_in_flight.is_some()
    }

    /// Photo URLs currently on screen: list thumbnails and the detail photo.
    pub fn photo_urls(&self) -> HashSet<&str> {
        self.state
            .items()
            .iter()
            .filter_map(ListItem::thumbnail_url)
            .chain(self.state.detail().and_then(|c| c.photo_url.as_deref()))
            .collect()
    }

    /// Title of the last list that was applied successfully.
    pub fn last_title(&self) -> Option<&str> {
        self.last_title.as_deref()
    }

    /// Validate the input and issue a ticket for exactly one request.
    pub fn request_list(&mut self, input: &str) -> Result<FetchTicket, InputError> {
        let title = validate_title(input)?;
        self.issued += 1;
        let ticket = FetchTicket {
            seq: self.issued,
            title: title.to_string(),
        };
        if let Some(previous) = self.in_flight.replace(ticket.clone()) {
            debug!(seq = previous.seq, title = %previous.title, "Superseding in-flight request");
        }
        Ok(ticket)
    }

    /// Apply a list response. Responses older than the newest issued ticket are dropped.
    pub fn apply_list(
        &mut self,
        seq: u64,
        result: Result<Vec<Content>, FetchError>,
    ) -> Applied {
        if seq != self.issued || seq <= self.applied {
            debug!(seq, latest = self.issued, "Discarding stale list response");
            return Applied::Stale;
        }
        self.applied = seq;
        let title = self
            .in_flight
            .take()
            .map(|ticket| ticket.title)
            .unwrap_or_default();
        self.selected = None;

        match result {
            Ok(contents) => {
                let count = contents.len();
                self.state.set_list(contents);
                debug!(title = %title, count, "List updated");
                self.last_title = Some(title);
                Applied::Listed(count)
            }
            Err(e) => {
                error!(title = %title, error = %e, "Error fetching contents");
                self.state.clear_list();
                Applied::Failed
            }
        }
    }

    /// Show the detail of the list item at `index`. Returns false if out of range.
    pub fn select(&mut self, index: usize) -> bool {
        let Some(item) = self.state.items().get(index) else {
            warn!(index, "Selection out of range");
            return false;
        };
        let content = item.content().clone();
        self.show_detail(content);
        self.selected = Some(index);
        true
    }

    /// Replace the detail with an in-memory record.
    pub fn show_detail(&mut self, content: Content) {
        self.detail_seq += 1;
        self.refresh_in_flight = None;
        self.selected = self
            .state
            .items()
            .iter()
            .position(|item| item.content() == &content);
        self.state.set_detail(content);
    }

    pub fn clear_detail(&mut self) {
        self.detail_seq += 1;
        self.refresh_in_flight = None;
        self.selected = None;
        self.state.clear_detail();
    }

    /// Ticket for re-fetching the shown record, if one is shown and has a usable id.
    pub fn request_refresh(&mut self) -> Option<RefreshTicket> {
        let detail = self.state.detail()?;
        if !detail.id.is_object_id() {
            debug!(id = %detail.id, "Detail id cannot be fetched individually");
            return None;
        }
        self.detail_seq += 1;
        let ticket = RefreshTicket {
            seq: self.detail_seq,
            id: detail.id.clone(),
        };
        self.refresh_in_flight = Some(ticket.clone());
        Some(ticket)
    }

    /// Apply a refresh response if the same record is still shown.
    pub fn apply_refresh(
        &mut self,
        ticket: &RefreshTicket,
        result: Result<Content, FetchError>,
    ) -> Applied {
        let current = self.state.detail().map(|c| &c.id);
        if ticket.seq != self.detail_seq || current != Some(&ticket.id) {
            debug!(id = %ticket.id, "Discarding stale detail refresh");
            return Applied::Stale;
        }
        self.refresh_in_flight = None;

        match result {
            Ok(content) => {
                self.state.set_detail(content);
                Applied::Refreshed
            }
            Err(e) => {
                error!(id = %ticket.id, error = %e, "Error refreshing content");
                Applied::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::Level;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Records the level and fields of every event it sees.
    #[derive(Clone, Default)]
    struct EventCapture {
        events: Arc<Mutex<Vec<(Level, HashMap<String, String>)>>>,
    }

    impl<S: tracing::Subscriber> Layer<S> for EventCapture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = FieldMap::default();
            event.record(&mut fields);
            self.events
                .lock()
                .unwrap()
                .push((*event.metadata().level(), fields.0));
        }
    }

    #[derive(Default)]
    struct FieldMap(HashMap<String, String>);

    impl Visit for FieldMap {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.0.insert(field.name().to_string(), format!("{:?}", value));
        }
    }

    fn status_error() -> FetchError {
        FetchError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "Error retrieving content".into(),
        }
    }

    #[test]
    fn blank_titles_issue_no_ticket() {
        let mut browser = ContentBrowser::new();
        assert_eq!(browser.request_list(""), Err(InputError::EmptyTitle));
        assert_eq!(browser.request_list("   \t"), Err(InputError::EmptyTitle));
        assert!(!browser.is_loading());
    }

    #[test]
    fn each_request_gets_a_fresh_ticket() {
        let mut browser = ContentBrowser::new();
        let first = browser.request_list(" Dune ").unwrap();
        let second = browser.request_list("Alien").unwrap();
        assert_eq!(first.title, " Dune ");
        assert!(second.seq > first.seq);
        assert!(browser.is_loading());
    }

    #[test]
    fn single_item_scenario() {
        let mut browser = ContentBrowser::new();
        let ticket = browser.request_list("A").unwrap();
        let applied = browser.apply_list(ticket.seq, Ok(vec![Content::sample("1", "A", "d", None)]));
        assert_eq!(applied, Applied::Listed(1));

        let items = browser.state().items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title(), "A");
        assert_eq!(items[0].id().as_str(), "1");
        assert_eq!(items[0].thumbnail_url(), None);

        assert!(browser.select(0));
        let detail = browser.state().detail().unwrap();
        assert_eq!(detail.title, "A");
        assert_eq!(detail.description, "d");
        assert_eq!(detail.photo_url, None);
        assert_eq!(browser.selected(), Some(0));
    }

    #[test]
    fn items_keep_service_order_and_thumbnails_match_photos() {
        let mut browser = ContentBrowser::new();
        let ticket = browser.request_list("Dune").unwrap();
        browser.apply_list(
            ticket.seq,
            Ok(vec![
                Content::sample("z", "Zeta", "", Some("http://img/z.png")),
                Content::sample("a", "Alpha", "", None),
                Content::sample("m", "Mu", "", Some("http://img/m.png")),
            ]),
        );

        let items = browser.state().items();
        let titles: Vec<&str> = items.iter().map(ListItem::title).collect();
        assert_eq!(titles, ["Zeta", "Alpha", "Mu"]);
        let thumbs: Vec<bool> = items.iter().map(|i| i.thumbnail_url().is_some()).collect();
        assert_eq!(thumbs, [true, false, true]);
        assert_eq!(items[0].alt_text(), "Photo of Zeta");
        assert_eq!(browser.last_title(), Some("Dune"));
        assert!(!browser.is_loading());
    }

    #[test]
    fn new_list_replaces_previous_items() {
        let mut browser = ContentBrowser::new();
        let t1 = browser.request_list("One").unwrap();
        browser.apply_list(
            t1.seq,
            Ok(vec![Content::sample("1", "One", "", None), Content::sample("2", "One", "", None)]),
        );
        let t2 = browser.request_list("Two").unwrap();
        browser.apply_list(t2.seq, Ok(vec![Content::sample("3", "Two", "", None)]));

        assert_eq!(browser.state().items().len(), 1);
        assert_eq!(browser.state().items()[0].id().as_str(), "3");
    }

    #[test]
    fn late_response_for_older_request_is_discarded() {
        let mut browser = ContentBrowser::new();
        let old = browser.request_list("Old").unwrap();
        let new = browser.request_list("New").unwrap();

        let applied = browser.apply_list(new.seq, Ok(vec![Content::sample("n", "New", "", None)]));
        assert_eq!(applied, Applied::Listed(1));

        let late = browser.apply_list(old.seq, Ok(vec![Content::sample("o", "Old", "", None)]));
        assert_eq!(late, Applied::Stale);
        assert_eq!(browser.state().items()[0].title(), "New");
    }

    #[test]
    fn older_response_arriving_first_does_not_settle_newer_request() {
        let mut browser = ContentBrowser::new();
        let old = browser.request_list("Old").unwrap();
        let _new = browser.request_list("New").unwrap();

        let applied = browser.apply_list(old.seq, Ok(vec![Content::sample("o", "Old", "", None)]));
        assert_eq!(applied, Applied::Stale);
        assert!(browser.state().items().is_empty());
        assert!(browser.is_loading());
    }

    #[test]
    fn failed_fetch_logs_one_error_with_the_title() {
        let capture = EventCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        let mut browser = ContentBrowser::new();
        let ok = browser.request_list("Alien").unwrap();
        let failed = browser.request_list("Dune").unwrap();
        let applied = tracing::subscriber::with_default(subscriber, || {
            assert_eq!(browser.apply_list(ok.seq, Ok(Vec::new())), Applied::Stale);
            browser.apply_list(failed.seq, Err(status_error()))
        });
        assert_eq!(applied, Applied::Failed);

        let events = capture.events.lock().unwrap();
        let errors: Vec<_> = events
            .iter()
            .filter(|(level, _)| *level == Level::ERROR)
            .map(|(_, fields)| fields)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].get("title").map(String::as_str), Some("Dune"));
        assert!(errors[0]["error"].contains("500"));
    }

    #[test]
    fn failure_clears_list_but_keeps_detail() {
        let mut browser = ContentBrowser::new();
        let t1 = browser.request_list("Dune").unwrap();
        browser.apply_list(t1.seq, Ok(vec![Content::sample("1", "Dune", "Sand", None)]));
        browser.select(0);

        let t2 = browser.request_list("Alien").unwrap();
        let applied = browser.apply_list(t2.seq, Err(status_error()));
        assert_eq!(applied, Applied::Failed);
        assert!(browser.state().items().is_empty());
        assert_eq!(browser.state().detail().map(|c| c.title.as_str()), Some("Dune"));
        assert_eq!(browser.selected(), None);
        assert!(!browser.is_loading());
        assert_eq!(browser.last_title(), Some("Dune"));
    }

    #[test]
    fn photo_urls_cover_list_and_detail() {
        let mut browser = ContentBrowser::new();
        let t1 = browser.request_list("Dune").unwrap();
        browser.apply_list(
            t1.seq,
            Ok(vec![Content::sample("1", "Dune", "Sand", Some("http://img/dune.png"))]),
        );
        browser.select(0);

        let t2 = browser.request_list("Alien").unwrap();
        browser.apply_list(
            t2.seq,
            Ok(vec![
                Content::sample("2", "Alien", "", Some("http://img/alien.png")),
                Content::sample("3", "Aliens", "", None),
            ]),
        );

        let urls = browser.photo_urls();
        assert_eq!(urls.len(), 2);
        assert!(urls.contains("http://img/dune.png"));
        assert!(urls.contains("http://img/alien.png"));

        browser.clear_detail();
        assert_eq!(browser.photo_urls().len(), 1);
    }

    #[test]
    fn selecting_replaces_prior_detail() {
        let mut browser = ContentBrowser::new();
        let t = browser.request_list("X").unwrap();
        browser.apply_list(
            t.seq,
            Ok(vec![
                Content::sample("1", "First", "one", Some("http://img/1.png")),
                Content::sample("2", "Second", "two", None),
            ]),
        );

        browser.select(0);
        assert_eq!(
            browser.state().detail().and_then(|c| c.photo_url.as_deref()),
            Some("http://img/1.png")
        );

        browser.select(1);
        let detail = browser.state().detail().unwrap();
        assert_eq!(detail.title, "Second");
        assert_eq!(detail.description, "two");
        assert_eq!(detail.photo_url, None);
        assert_eq!(browser.selected(), Some(1));

        assert!(!browser.select(5));
        assert_eq!(browser.selected(), Some(1));
    }

    #[test]
    fn list_update_leaves_detail_alone() {
        let mut browser = ContentBrowser::new();
        browser.show_detail(Content::sample("1", "Kept", "", None));
        let t = browser.request_list("Other").unwrap();
        browser.apply_list(t.seq, Ok(vec![Content::sample("2", "Other", "", None)]));
        assert_eq!(browser.state().detail().map(|c| c.title.as_str()), Some("Kept"));
    }

    #[test]
    fn refresh_applies_only_to_same_record() {
        let hex = "65f1a2b3c4d5e6f708192a3b";
        let mut browser = ContentBrowser::new();
        assert!(browser.request_refresh().is_none());

        browser.show_detail(Content::sample(hex, "Dune", "old", None));
        let ticket = browser.request_refresh().unwrap();
        assert!(browser.is_refreshing());
        let applied =
            browser.apply_refresh(&ticket, Ok(Content::sample(hex, "Dune", "new", None)));
        assert_eq!(applied, Applied::Refreshed);
        assert_eq!(browser.state().detail().unwrap().description, "new");

        let ticket = browser.request_refresh().unwrap();
        browser.show_detail(Content::sample("other", "Alien", "", None));
        let applied =
            browser.apply_refresh(&ticket, Ok(Content::sample(hex, "Dune", "newer", None)));
        assert_eq!(applied, Applied::Stale);
        assert_eq!(browser.state().detail().unwrap().title, "Alien");
        assert!(!browser.is_refreshing());
    }

    #[test]
    fn failed_refresh_keeps_detail() {
        let hex = "65f1a2b3c4d5e6f708192a3b";
        let mut browser = ContentBrowser::new();
        browser.show_detail(Content::sample(hex, "Dune", "old", None));
        let ticket = browser.request_refresh().unwrap();
        assert_eq!(browser.apply_refresh(&ticket, Err(status_error())), Applied::Failed);
        assert_eq!(browser.state().detail().unwrap().description, "old");
    }

    #[test]
    fn refresh_needs_object_id() {
        let mut browser = ContentBrowser::new();
        browser.show_detail(Content::sample("1", "A", "d", None));
        assert!(browser.request_refresh().is_none());
    }

    #[test]
    fn clear_detail_resets_selection() {
        let mut browser = ContentBrowser::new();
        let t = browser.request_list("A").unwrap();
        browser.apply_list(t.seq, Ok(vec![Content::sample("1", "A", "d", None)]));
        browser.select(0);
        browser.clear_detail();
        assert!(browser.state().detail().is_none());
        assert_eq!(browser.selected(), None);
    }
}
