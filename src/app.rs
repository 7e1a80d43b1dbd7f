use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use tokio::sync::mpsc;
use tracing::debug;

use crate::action::Action;
use crate::event::Event;
use crate::fetcher::{PageFetcher, PageRequest};
use crate::filter::FilterState;
use crate::selection::SelectionController;
use crate::source::CatalogSource;
use crate::types::{Category, Movie};

const PAGE_SCROLL: usize = 10;

pub struct App {
    pub category: Category,
    pub fetcher: PageFetcher<Movie>,
    pub filter: FilterState,
    pub selection: SelectionController<Movie>,
    /// Index into the filtered list, not the catalog
    pub list_index: usize,
    pub search_mode: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub should_quit: bool,
    load_more_threshold: usize,
    // Bumped on every mount; completions from older mounts are dropped.
    load_id: u64,
    source: Arc<dyn CatalogSource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        category: Category,
        load_more_threshold: usize,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            category,
            fetcher: PageFetcher::new(),
            filter: FilterState::default(),
            selection: SelectionController::new(),
            list_index: 0,
            search_mode: false,
            error: None,
            notice: None,
            should_quit: false,
            load_more_threshold,
            load_id: 0,
            source,
            action_tx,
        }
    }

    pub fn source(&self) -> &dyn CatalogSource {
        self.source.as_ref()
    }

    /// The rendered list: the catalog narrowed by the current search text.
    pub fn visible(&self) -> Vec<&Movie> {
        self.filter.apply(self.fetcher.items())
    }

    pub fn highlighted(&self) -> Option<&Movie> {
        self.visible().get(self.list_index).copied()
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::LoadInitial,
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown if !self.selection.is_open() => Action::ScrollDown,
                MouseEventKind::ScrollUp if !self.selection.is_open() => Action::ScrollUp,
                _ => Action::None,
            },
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if self.selection.is_open() {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                    Action::Dismiss
                }
                KeyCode::Char('o') => Action::OpenInBrowser,
                KeyCode::Char('y') => Action::YankUrl,
                _ => Action::None,
            };
        }

        if self.search_mode {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => Action::ExitSearchMode,
                KeyCode::Backspace => Action::SearchBackspace,
                KeyCode::Down => Action::ScrollDown,
                KeyCode::Up => Action::ScrollUp,
                KeyCode::Char('u') if ctrl => Action::ClearSearch,
                KeyCode::Char(c) if !ctrl => Action::SearchInput(c),
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Esc => Action::Back,
            KeyCode::Char('d') if ctrl => Action::PageDown,
            KeyCode::Char('u') if ctrl => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('/') => Action::EnterSearchMode,
            KeyCode::Tab | KeyCode::Char('l') => Action::NextCategory,
            KeyCode::BackTab | KeyCode::Char('h') => Action::PrevCategory,
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                Action::SwitchCategory(Category::ALL[idx])
            }
            KeyCode::Char('r') => Action::Retry,
            KeyCode::Char('R') => Action::Reload,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('y') => Action::YankUrl,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        let background = matches!(
            action,
            Action::PageLoaded { .. } | Action::PageFailed { .. } | Action::None
        );
        if !background {
            self.error = None;
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => {
                if self.selection.is_open() {
                    self.selection.dismiss();
                } else if self.filter.is_active() {
                    self.filter.clear();
                    self.list_index = 0;
                } else {
                    self.should_quit = true;
                }
            }
            Action::ScrollUp => {
                self.list_index = self.list_index.saturating_sub(1);
            }
            Action::ScrollDown => {
                self.move_down(1);
            }
            Action::PageUp => {
                self.list_index = self.list_index.saturating_sub(PAGE_SCROLL);
            }
            Action::PageDown => {
                self.move_down(PAGE_SCROLL);
            }
            Action::GoToTop => {
                self.list_index = 0;
            }
            Action::GoToBottom => {
                self.move_down(usize::MAX);
            }

            Action::Select => {
                if let Some(movie) = self.highlighted().cloned() {
                    self.selection.select(movie);
                }
            }
            Action::Dismiss => {
                self.selection.dismiss();
            }

            Action::LoadInitial => {
                self.start_initial_load();
            }
            Action::Retry => {
                if self.fetcher.items().is_empty() {
                    self.start_initial_load();
                } else {
                    self.on_scroll_near_end();
                }
            }
            Action::Reload => {
                self.mount(self.category);
            }
            Action::PageLoaded {
                request,
                page,
                load_id,
            } => {
                if self.is_current(load_id) {
                    self.fetcher.complete(request, Ok(page));
                    self.clamp_index();
                }
            }
            Action::PageFailed {
                request,
                message,
                load_id,
            } => {
                if self.is_current(load_id) {
                    self.fetcher.complete(request, Err(message));
                }
            }

            Action::NextCategory => {
                self.mount(self.category.next());
            }
            Action::PrevCategory => {
                self.mount(self.category.prev());
            }
            Action::SwitchCategory(category) => {
                if category != self.category {
                    self.mount(category);
                }
            }

            Action::EnterSearchMode => {
                self.search_mode = true;
            }
            Action::ExitSearchMode => {
                self.search_mode = false;
            }
            Action::SearchInput(c) => {
                self.filter.push(c);
                self.list_index = 0;
            }
            Action::SearchBackspace => {
                self.filter.pop();
                self.list_index = 0;
            }
            Action::ClearSearch => {
                self.filter.clear();
                self.list_index = 0;
            }

            Action::OpenInBrowser => {
                if let Some(url) = self.target_url() {
                    if let Err(e) = open::that(&url) {
                        self.report_error(format!("Could not open {}: {}", url, e));
                    }
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.target_url() {
                    match arboard::Clipboard::new().and_then(|mut c| c.set_text(url.clone())) {
                        Ok(()) => self.notice = Some(format!("Copied {}", url)),
                        Err(e) => self.report_error(format!("Clipboard error: {}", e)),
                    }
                }
            }

            Action::Error(msg) => {
                self.error = Some(msg);
            }
            Action::None => {}
        }
    }

    /// Tear down the current screen state and start over on `category`.
    fn mount(&mut self, category: Category) {
        self.load_id += 1;
        self.category = category;
        self.fetcher = PageFetcher::new();
        self.filter.clear();
        self.selection.dismiss();
        self.list_index = 0;
        self.search_mode = false;
        debug!(category = category.as_api_str(), load_id = self.load_id, "screen mounted");
        self.start_initial_load();
    }

    fn is_current(&self, load_id: u64) -> bool {
        if load_id != self.load_id {
            debug!(load_id, current = self.load_id, "dropping result for torn-down screen");
            return false;
        }
        true
    }

    fn move_down(&mut self, by: usize) {
        let len = self.visible().len();
        if len > 0 {
            self.list_index = self.list_index.saturating_add(by).min(len - 1);
        }
        // Within `load_more_threshold` rows of the last one, counting the last row itself.
        if self.list_index.saturating_add(self.load_more_threshold).saturating_add(1) >= len {
            self.on_scroll_near_end();
        }
    }

    /// Surface a failure on the next loop turn, like any other action.
    fn report_error(&self, msg: String) {
        self.action_tx.send(Action::Error(msg)).ok();
    }

    fn clamp_index(&mut self) {
        let len = self.visible().len();
        self.list_index = self.list_index.min(len.saturating_sub(1));
    }

    fn start_initial_load(&mut self) {
        if let Some(request) = self.fetcher.request_initial_load() {
            self.spawn_fetch(request);
        }
    }

    fn on_scroll_near_end(&mut self) {
        if let Some(request) = self.fetcher.request_next_page() {
            self.spawn_fetch(request);
        }
    }

    fn target_url(&self) -> Option<String> {
        self.selection
            .selected()
            .or_else(|| self.highlighted())
            .map(|movie| self.source.web_url(movie))
    }

    fn spawn_fetch(&self, request: PageRequest) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        let category = self.category;
        let load_id = self.load_id;
        tokio::spawn(async move {
            let action = match source.fetch_page(category, request.page).await {
                Ok(page) => Action::PageLoaded {
                    request,
                    page,
                    load_id,
                },
                Err(e) => Action::PageFailed {
                    request,
                    message: e.to_string(),
                    load_id,
                },
            };
            // The receiver is gone once the app has shut down.
            tx.send(action).ok();
        });
    }
}
