//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates terminal events into core `Action`s, and carries out the
//! `Effect`s the core asks for.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Effects
//!
//! Network and cache work runs on tokio tasks. Each task reports back by
//! sending an `Action` over a std channel that the event loop drains between
//! frames, so `update` only ever runs on the loop thread.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 250ms waiting for input and
//! only redraws after an event or a background result.

mod component;
mod components;
mod event;
pub mod theme;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use tui_scrollview::ScrollViewState;

use crate::bible::{BollsClient, ScriptureSource, TranslationCache};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::settings;
use crate::core::state::App;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// TUI-specific presentation state (not part of core business logic)
#[derive(Default)]
pub struct TuiState {
    pub reader_scroll: ScrollViewState,
    pub comparison_scroll: ScrollViewState,
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse capture)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let cache = config.cache_dir.clone().map(|dir| {
        Arc::new(TranslationCache::new(dir, Some(config.download_url.clone())))
    });
    let mut client = BollsClient::new(config.base_url.clone());
    if let Some(cache) = &cache {
        client = client.with_cache(cache.clone());
    }
    let source: Arc<dyn ScriptureSource> = Arc::new(client);
    info!("Using {} for scripture text", source.name());

    let mut app = App::from_config(&config);
    let mut tui = TuiState::default();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut runner = EffectRunner::new(source, cache, tx);

    let size = terminal.size()?;
    let (width, height) = ui::viewport_size(size.width, size.height);
    let effects = update(&mut app, Action::Resize { width, height });
    let mut should_quit = runner.run_all(&app, effects);
    let effects = update(&mut app, Action::Init);
    should_quit |= runner.run_all(&app, effects);

    let mut needs_redraw = true;
    while !should_quit {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Process first event + drain ALL pending events before next draw
        let first_event = poll_event_timeout(POLL_TIMEOUT);
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            needs_redraw = true;
            let action = match event {
                TuiEvent::Key(key) => Action::Key(key),
                TuiEvent::Wheel(lines) => Action::Scroll(lines),
                TuiEvent::Resize => {
                    let size = terminal.size()?;
                    let (width, height) = ui::viewport_size(size.width, size.height);
                    Action::Resize { width, height }
                }
            };
            let effects = update(&mut app, action);
            if runner.run_all(&app, effects) {
                should_quit = true;
                break;
            }
        }

        // Handle background task results
        while !should_quit && let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effects = update(&mut app, action);
            should_quit = runner.run_all(&app, effects);
        }
    }

    ratatui::restore();
    info!("Lectern exiting");
    Ok(())
}

/// Carries out effects on behalf of the event loop.
struct EffectRunner {
    source: Arc<dyn ScriptureSource>,
    cache: Option<Arc<TranslationCache>>,
    tx: mpsc::Sender<Action>,
    clipboard: Option<arboard::Clipboard>,
}

impl EffectRunner {
    fn new(
        source: Arc<dyn ScriptureSource>,
        cache: Option<Arc<TranslationCache>>,
        tx: mpsc::Sender<Action>,
    ) -> Self {
        let clipboard = arboard::Clipboard::new()
            .inspect_err(|e| warn!("Clipboard unavailable: {}", e))
            .ok();
        Self {
            source,
            cache,
            tx,
            clipboard,
        }
    }

    /// Runs every effect in order. Returns true when one of them was `Quit`.
    fn run_all(&mut self, app: &App, effects: Vec<Effect>) -> bool {
        let mut quit = false;
        for effect in effects {
            debug!("Running effect: {:?}", effect);
            match effect {
                Effect::Quit => quit = true,
                other => self.run(app, other),
            }
        }
        quit
    }

    fn run(&mut self, app: &App, effect: Effect) {
        match effect {
            Effect::Quit => {}
            Effect::FetchTranslations => {
                let source = self.source.clone();
                self.spawn(async move {
                    match source.translations().await {
                        Ok(list) => Action::TranslationsLoaded(list),
                        Err(e) => Action::RequestFailed(format!("Could not load translations: {e}")),
                    }
                });
            }
            Effect::FetchBooks { translation } => {
                let source = self.source.clone();
                self.spawn(async move {
                    match source.books(&translation).await {
                        Ok(books) => Action::BooksLoaded { translation, books },
                        Err(e) => Action::RequestFailed(format!("Could not load books for {translation}: {e}")),
                    }
                });
            }
            Effect::FetchChapter(request) => {
                let source = self.source.clone();
                self.spawn(async move {
                    let token = request.token;
                    match source
                        .chapter(&request.translation, request.book_id, request.chapter)
                        .await
                    {
                        Ok(verses) => Action::ChapterLoaded { token, verses },
                        Err(e) => Action::ChapterFailed {
                            token,
                            message: format!("Could not load chapter {}: {e}", request.chapter),
                        },
                    }
                });
            }
            Effect::FetchParallel(request) => {
                let source = self.source.clone();
                self.spawn(async move {
                    let token = request.token;
                    match source
                        .parallel(
                            &request.translations,
                            request.book_id,
                            request.chapter,
                            &request.verses,
                        )
                        .await
                    {
                        Ok(chapter) => Action::ParallelLoaded { token, chapter },
                        Err(e) => Action::ParallelFailed {
                            token,
                            message: format!("Could not load comparison: {e}"),
                        },
                    }
                });
            }
            Effect::CopyToClipboard(text) => match self.clipboard.as_mut() {
                Some(clipboard) => {
                    if let Err(e) = clipboard.set_text(text) {
                        debug!("Clipboard write failed: {}", e);
                    }
                }
                None => debug!("No clipboard, dropping {} bytes", text.len()),
            },
            Effect::ListCached => self.list_cached(),
            Effect::DownloadTranslation(translation) => {
                let Some(cache) = self.cache.clone() else {
                    let _ = self.tx.send(Action::DownloadFinished {
                        translation,
                        error: Some("no cache directory".to_string()),
                    });
                    return;
                };
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let error = cache.download(&translation).await.err().map(|e| e.to_string());
                    let finished = Action::DownloadFinished { translation, error };
                    if tx.send(finished).is_err() {
                        warn!("Failed to report download: receiver dropped");
                    }
                });
            }
            Effect::RemoveTranslation(translation) => {
                if let Some(cache) = &self.cache
                    && let Err(e) = cache.remove(&translation)
                {
                    warn!("Failed to remove {} from cache: {}", translation, e);
                    let _ = self
                        .tx
                        .send(Action::RequestFailed(format!("Could not remove {translation}: {e}")));
                }
                self.list_cached();
            }
            Effect::SaveSettings => {
                if let Err(e) = settings::save(&app.settings()) {
                    warn!("Failed to save settings: {}", e);
                }
            }
        }
    }

    fn list_cached(&self) {
        let listing = match &self.cache {
            Some(cache) => cached_listing(cache),
            None => Action::CacheListed {
                translations: Vec::new(),
                size_bytes: 0,
            },
        };
        if self.tx.send(listing).is_err() {
            warn!("Failed to send cache listing: receiver dropped");
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let action = task.await;
            if tx.send(action).is_err() {
                warn!("Failed to send background result: receiver dropped");
            }
        });
    }
}

fn cached_listing(cache: &TranslationCache) -> Action {
    let translations = cache.list_cached().unwrap_or_else(|e| {
        warn!("Failed to list cache: {}", e);
        Vec::new()
    });
    let size_bytes = cache.size_bytes().unwrap_or(0);
    Action::CacheListed {
        translations,
        size_bytes,
    }
}
