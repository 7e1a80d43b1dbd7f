use crate::fetcher::PageRequest;
use crate::types::{Category, Movie, Page};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    /// Esc: close overlay, then clear search, then quit
    Back,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // Detail overlay
    Select,
    Dismiss,

    // Pagination
    LoadInitial,
    Retry,
    Reload,
    PageLoaded {
        request: PageRequest,
        page: Page<Movie>,
        load_id: u64,
    },
    PageFailed {
        request: PageRequest,
        message: String,
        load_id: u64,
    },

    // Categories
    NextCategory,
    PrevCategory,
    SwitchCategory(Category),

    // Search
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,
    ClearSearch,

    OpenInBrowser,
    YankUrl,

    Error(String),
    None,
}
