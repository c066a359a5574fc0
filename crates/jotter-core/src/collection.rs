use std::sync::Arc;

use log::{debug, error, warn};
use tokio::sync::RwLock;

use crate::alert::AlertController;
use crate::api::NotesApi;
use crate::error::{ApiError, CollectionError};
use crate::model::{Note, NoteId, NotePage};


/// What the client currently displays. Exactly one mode is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Page(PageView),
    Search(SearchView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub notes: Vec<Note>,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub query: String,
    pub results: Vec<Note>,
}

impl ViewState {
    /// Notes in display order, whichever mode is active
    pub fn notes(&self) -> &[Note] {
        match self {
            ViewState::Page(view) => &view.notes,
            ViewState::Search(view) => &view.results,
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, ViewState::Search(_))
    }

    pub fn find(&self, id: NoteId) -> Option<&Note> {
        self.notes().iter().find(|note| note.id == id)
    }
}

/// The one thing the client is busy with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Loading,
    Searching,
    /// Bulk generation; `progress` is a percentage
    Generating { progress: u8 },
}

impl Activity {
    pub fn is_generating(&self) -> bool {
        matches!(self, Activity::Generating { .. })
    }
}

/// Whether a fetch ended up on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Applied,
    /// A newer request was issued before this one resolved; its result was
    /// dropped.
    Superseded,
}

/// Point-in-time copy of the collection state for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSnapshot {
    pub view: ViewState,
    /// Last page shown in page mode, kept while searching
    pub page: u32,
    pub total_pages: u32,
    pub activity: Activity,
}

impl CollectionSnapshot {
    pub fn can_go_prev(&self) -> bool {
        !self.view.is_search() && self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        !self.view.is_search() && self.page < self.total_pages
    }
}

struct CollectionState {
    view: ViewState,
    page: u32,
    total_pages: u32,
    activity: Activity,
    /// Sequence number of the latest request that targets `view`
    issued: u64,
}

impl CollectionState {
    fn new() -> Self {
        Self {
            view: ViewState::Page(PageView {
                notes: Vec::new(),
                page: 1,
                total_pages: 1,
            }),
            page: 1,
            total_pages: 1,
            activity: Activity::Idle,
            issued: 0,
        }
    }

    /// Start a request: it becomes the only one whose response may apply.
    fn begin(&mut self, activity: Activity) -> u64 {
        self.issued += 1;
        if !self.activity.is_generating() {
            self.activity = activity;
        }
        self.issued
    }

    /// True if `seq` is still the latest request; settles the activity if so.
    fn settle(&mut self, seq: u64) -> bool {
        if seq != self.issued {
            return false;
        }
        if matches!(self.activity, Activity::Loading | Activity::Searching) {
            self.activity = Activity::Idle;
        }
        true
    }
}

/// Keeps the local view of the remote collection in sync.
///
/// Pagination and search are mutually exclusive modes. Every fetch that
/// targets the view carries a sequence number, and only the response to the
/// most recently issued request is applied, so out-of-order completions can
/// never put stale data on screen.
///
/// Remote failures are turned into error alerts here; the returned errors are
/// informational.
#[derive(Clone)]
pub struct CollectionController {
    api: Arc<dyn NotesApi>,
    alerts: AlertController,
    page_size: u32,
    state: Arc<RwLock<CollectionState>>,
}

impl CollectionController {
    pub fn new(api: Arc<dyn NotesApi>, alerts: AlertController, page_size: u32) -> Self {
        Self {
            api,
            alerts,
            page_size,
            state: Arc::new(RwLock::new(CollectionState::new())),
        }
    }

    pub async fn snapshot(&self) -> CollectionSnapshot {
        let state = self.state.read().await;
        CollectionSnapshot {
            view: state.view.clone(),
            page: state.page,
            total_pages: state.total_pages,
            activity: state.activity,
        }
    }

    pub async fn view(&self) -> ViewState {
        self.state.read().await.view.clone()
    }

    pub async fn current_page(&self) -> u32 {
        self.state.read().await.page
    }

    pub async fn activity(&self) -> Activity {
        self.state.read().await.activity
    }

    // ------------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------------

    /// Show `page`. Pages outside `1..=total_pages` are rejected without
    /// touching the network.
    pub async fn load_page(&self, page: u32) -> Result<LoadStatus, CollectionError> {
        let total_pages = self.state.read().await.total_pages;
        if page < 1 || page > total_pages {
            debug!("rejecting page {} (total {})", page, total_pages);
            return Err(CollectionError::PageOutOfRange { page, total_pages });
        }
        self.fetch_page(page).await
    }

    /// Refetch the last known page, leaving search mode.
    pub async fn reload(&self) -> Result<LoadStatus, CollectionError> {
        let page = self.state.read().await.page;
        self.fetch_page(page).await
    }

    pub async fn next_page(&self) -> Result<LoadStatus, CollectionError> {
        let page = self.state.read().await.page;
        self.load_page(page.saturating_add(1)).await
    }

    pub async fn prev_page(&self) -> Result<LoadStatus, CollectionError> {
        let page = self.state.read().await.page;
        self.load_page(page.saturating_sub(1)).await
    }

    /// Jump to a page typed in by the user. Anything that is not a page
    /// number in range is reported with a warning alert.
    pub async fn goto_page(&self, input: &str) -> Result<LoadStatus, CollectionError> {
        let total_pages = self.state.read().await.total_pages;
        let page = match input.trim().parse::<u32>() {
            Ok(page) if (1..=total_pages).contains(&page) => page,
            Ok(page) => {
                self.warn_page_range(total_pages);
                return Err(CollectionError::PageOutOfRange { page, total_pages });
            }
            Err(_) => {
                self.warn_page_range(total_pages);
                return Err(CollectionError::InvalidPageInput(input.to_string()));
            }
        };
        self.load_page(page).await
    }

    fn warn_page_range(&self, total_pages: u32) {
        self.alerts.warning(format!(
            "Please enter a valid page number between 1 and {}.",
            total_pages
        ));
    }

    async fn fetch_page(&self, page: u32) -> Result<LoadStatus, CollectionError> {
        let seq = self.state.write().await.begin(Activity::Loading);
        debug!("loading page {} (request {})", page, seq);
        let result = self.api.list_page(page).await;
        self.apply_page(seq, page, result).await
    }

    async fn apply_page(
        &self,
        seq: u64,
        page: u32,
        result: Result<NotePage, ApiError>,
    ) -> Result<LoadStatus, CollectionError> {
        let mut state = self.state.write().await;
        if !state.settle(seq) {
            debug!("discarding stale page {} response (request {})", page, seq);
            return Ok(LoadStatus::Superseded);
        }
        match result {
            Ok(notes) => {
                let total_pages = notes.total_pages(self.page_size);
                state.page = page;
                state.total_pages = total_pages;
                state.view = ViewState::Page(PageView {
                    notes: notes.items,
                    page,
                    total_pages,
                });
                Ok(LoadStatus::Applied)
            }
            Err(e) => {
                drop(state);
                error!("failed to load page {}: {}", page, e);
                self.alerts.error("Failed to load notes.");
                Err(e.into())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------------

    /// Search the collection. A blank query returns to the last known page.
    pub async fn run_search(&self, query: &str) -> Result<LoadStatus, CollectionError> {
        let query = query.trim();
        if query.is_empty() {
            return self.reload().await;
        }

        let seq = self.state.write().await.begin(Activity::Searching);
        debug!("searching for {:?} (request {})", query, seq);
        let result = self.api.search(query).await;

        let mut state = self.state.write().await;
        if !state.settle(seq) {
            debug!("discarding stale search response (request {})", seq);
            return Ok(LoadStatus::Superseded);
        }
        match result {
            Ok(results) => {
                state.view = ViewState::Search(SearchView {
                    query: query.to_string(),
                    results,
                });
                Ok(LoadStatus::Applied)
            }
            Err(e) => {
                drop(state);
                error!("search for {:?} failed: {}", query, e);
                self.alerts.error("Failed to search notes.");
                Err(e.into())
            }
        }
    }

    /// Leave search mode and show the last known page again.
    pub async fn clear_search(&self) -> Result<LoadStatus, CollectionError> {
        self.reload().await
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Resynchronize with the server after a create, update or delete.
    ///
    /// If the current page no longer exists (its last note was deleted), the
    /// previous page is shown instead.
    pub async fn after_mutation(&self) -> Result<LoadStatus, CollectionError> {
        let (page, seq) = {
            let mut state = self.state.write().await;
            let page = state.page;
            (page, state.begin(Activity::Loading))
        };
        let result = self.api.list_page(page).await;

        match result {
            Err(e) if e.is_not_found() && page > 1 => {
                // Check and reissue under one lock so a newer request keeps the view
                let step_seq = {
                    let mut state = self.state.write().await;
                    if state.issued != seq {
                        debug!("discarding stale 404 for page {} (request {})", page, seq);
                        return Ok(LoadStatus::Superseded);
                    }
                    state.begin(Activity::Loading)
                };
                warn!("page {} vanished after mutation, stepping back", page);
                let result = self.api.list_page(page - 1).await;
                self.apply_page(step_seq, page - 1, result).await
            }
            result => self.apply_page(seq, page, result).await,
        }
    }

    pub async fn delete_note(&self, id: NoteId) -> Result<(), CollectionError> {
        match self.api.delete(id).await {
            Ok(()) => {
                debug!("deleted note {}", id);
                self.alerts.success("Note deleted successfully.");
                // A failed reload has already raised its own alert
                let _ = self.after_mutation().await;
                Ok(())
            }
            Err(e) => {
                error!("failed to delete note {}: {}", id, e);
                self.alerts.error("Failed to delete note.");
                Err(e.into())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Bulk generation bookkeeping
    // ------------------------------------------------------------------------

    /// Enter `Generating`; false if a generation is already running.
    pub(crate) async fn begin_generation(&self) -> bool {
        let mut state = self.state.write().await;
        if state.activity.is_generating() {
            return false;
        }
        state.activity = Activity::Generating { progress: 0 };
        true
    }

    pub(crate) async fn set_generation_progress(&self, progress: u8) {
        let mut state = self.state.write().await;
        if state.activity.is_generating() {
            state.activity = Activity::Generating { progress };
        }
    }

    pub(crate) async fn end_generation(&self) {
        let mut state = self.state.write().await;
        if state.activity.is_generating() {
            state.activity = Activity::Idle;
        }
    }
}
