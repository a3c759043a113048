use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use ws_core::{Article, BookmarkedArticle};
use ws_feed::{FeedController, FeedStatus, GestureTranslator, InputEvent, Key};
use ws_inference::{ChatSession, ConversationBridge};
use ws_storage::BookmarkStore;

/// One crossterm wheel notch, expressed in pixels so it clears the wheel threshold.
const WHEEL_NOTCH: f64 = 100.0;
const TICK: Duration = Duration::from_millis(150);

pub struct ChatOverlay {
    session: ChatSession,
    input: String,
    waiting: bool,
}

pub struct BookmarksOverlay {
    entries: Vec<BookmarkedArticle>,
    selected: usize,
}

pub enum Overlay {
    None,
    Chat(ChatOverlay),
    Bookmarks(BookmarksOverlay),
}

#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
    /// A chat question is ready; call [`Browser::answer`] after redrawing
    Ask(String),
}

/// Everything the terminal viewer shows, independent of the terminal itself.
pub struct Browser {
    controller: FeedController,
    gestures: GestureTranslator,
    bookmarks: Arc<BookmarkStore>,
    bookmarked: HashSet<u64>,
    bridge: ConversationBridge,
    overlay: Overlay,
}

impl Browser {
    pub async fn new(controller: FeedController, bookmarks: Arc<BookmarkStore>, bridge: ConversationBridge) -> Self {
        let mut browser = Self {
            controller,
            gestures: GestureTranslator::default(),
            bookmarks,
            bookmarked: HashSet::new(),
            bridge,
            overlay: Overlay::None,
        };
        browser.refresh_bookmarks().await;
        browser
    }

    pub fn controller(&self) -> &FeedController {
        &self.controller
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    async fn refresh_bookmarks(&mut self) {
        self.bookmarked = self.bookmarks.bookmarks().await.iter().map(|b| b.id()).collect();
    }

    fn set_overlay(&mut self, overlay: Overlay) {
        self.gestures.set_overlay_open(!matches!(overlay, Overlay::None));
        self.overlay = overlay;
    }

    fn current(&self) -> Option<Article> {
        self.controller.current().cloned()
    }

    fn navigate(&mut self, event: InputEvent) {
        if let Some(direction) = self.gestures.translate(event) {
            self.controller.navigate(direction);
        }
    }

    pub fn tick(&mut self) -> usize {
        self.controller.poll_batches()
    }

    pub fn handle_wheel(&mut self, kind: MouseEventKind) {
        let delta_y = match kind {
            MouseEventKind::ScrollDown => WHEEL_NOTCH,
            MouseEventKind::ScrollUp => -WHEEL_NOTCH,
            _ => return,
        };
        self.navigate(InputEvent::Wheel { delta_y });
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }
        match self.overlay {
            Overlay::None => self.handle_feed_key(key.code).await,
            Overlay::Chat(_) => self.handle_chat_key(key.code),
            Overlay::Bookmarks(_) => self.handle_bookmarks_key(key.code).await,
        }
    }

    async fn handle_feed_key(&mut self, code: KeyCode) -> KeyOutcome {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Down => self.navigate(InputEvent::Key(Key::Down)),
            KeyCode::Char(' ') => self.navigate(InputEvent::Key(Key::Space)),
            KeyCode::Up => self.navigate(InputEvent::Key(Key::Up)),
            KeyCode::Char('b') => {
                if let Some(article) = self.current() {
                    let saved = self.bookmarks.toggle_bookmark(&article).await;
                    tracing::debug!("Bookmark for {} is now {}", article.id, saved);
                    self.refresh_bookmarks().await;
                }
            }
            KeyCode::Char('c') => {
                if let Some(article) = self.current() {
                    self.set_overlay(Overlay::Chat(ChatOverlay {
                        session: ChatSession::open(article),
                        input: String::new(),
                        waiting: false,
                    }));
                }
            }
            KeyCode::Char('l') => {
                let entries = self.bookmarks.bookmarks().await;
                self.set_overlay(Overlay::Bookmarks(BookmarksOverlay { entries, selected: 0 }));
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn handle_chat_key(&mut self, code: KeyCode) -> KeyOutcome {
        if code == KeyCode::Esc {
            self.set_overlay(Overlay::None);
            return KeyOutcome::Continue;
        }
        let Overlay::Chat(chat) = &mut self.overlay else {
            return KeyOutcome::Continue;
        };
        if chat.waiting {
            return KeyOutcome::Continue;
        }
        match code {
            KeyCode::Enter => {
                let prompt = std::mem::take(&mut chat.input);
                if prompt.trim().is_empty() {
                    return KeyOutcome::Continue;
                }
                chat.waiting = true;
                return KeyOutcome::Ask(prompt);
            }
            KeyCode::Backspace => {
                chat.input.pop();
            }
            KeyCode::Char(c) => chat.input.push(c),
            _ => {}
        }
        KeyOutcome::Continue
    }

    /// Send a question to the open chat and wait for its answer.
    pub async fn answer(&mut self, prompt: &str) {
        if let Overlay::Chat(chat) = &mut self.overlay {
            chat.session.send(&self.bridge, prompt).await;
            chat.waiting = false;
        }
    }

    async fn handle_bookmarks_key(&mut self, code: KeyCode) -> KeyOutcome {
        let Overlay::Bookmarks(list) = &mut self.overlay else {
            return KeyOutcome::Continue;
        };
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.set_overlay(Overlay::None),
            KeyCode::Down => list.selected = (list.selected + 1).min(list.entries.len().saturating_sub(1)),
            KeyCode::Up => list.selected = list.selected.saturating_sub(1),
            KeyCode::Enter => {
                if let Some(entry) = list.entries.get(list.selected) {
                    let article = entry.article.clone();
                    self.controller.select_bookmarked(article);
                    self.set_overlay(Overlay::None);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(entry) = list.entries.get(list.selected) {
                    let id = entry.id();
                    let index = list.selected;
                    self.bookmarks.remove_bookmark(id).await;
                    self.refresh_bookmarks().await;
                    let entries = self.bookmarks.bookmarks().await;
                    let selected = index.min(entries.len().saturating_sub(1));
                    self.overlay = Overlay::Bookmarks(BookmarksOverlay { entries, selected });
                }
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    pub fn render(&self, width: usize, height: usize) -> Vec<String> {
        let width = width.max(20);
        let mut lines = match &self.overlay {
            Overlay::None => self.render_feed(width),
            Overlay::Chat(chat) => render_chat(chat, width),
            Overlay::Bookmarks(list) => render_bookmarks(list, width),
        };
        lines.truncate(height);
        lines
    }

    fn render_feed(&self, width: usize) -> Vec<String> {
        let mut header = if self.controller.is_empty() {
            "WisdomScroll".to_string()
        } else {
            format!("WisdomScroll  {} / {}", self.controller.position() + 1, self.controller.len())
        };
        if self.controller.is_loading() {
            header.push_str("  ⏳ loading more");
        }
        let mut lines = vec![header, String::new()];

        match (self.controller.status(), self.controller.current()) {
            (_, Some(article)) => {
                let marker = if self.bookmarked.contains(&article.id) { "★ " } else { "" };
                lines.push(format!("{}{}", marker, article.title));
                lines.push(String::new());
                lines.extend(wrap(&article.extract, width));
                lines.push(String::new());
                lines.push(article.url.clone());
                if let Some(thumbnail) = &article.thumbnail {
                    lines.push(format!("🖼  {}", thumbnail.source));
                }
            }
            (FeedStatus::Ready, None) => {
                lines.push("No articles could be loaded. Press ↓ to try again.".to_string());
            }
            (_, None) => lines.push("Loading articles…".to_string()),
        }

        lines.push(String::new());
        lines.push("↓/space next  ↑ back  b bookmark  c chat  l bookmarks  q quit".to_string());
        lines
    }
}

fn render_chat(chat: &ChatOverlay, width: usize) -> Vec<String> {
    let mut lines = vec![format!("Chat: {}", chat.session.article().title), String::new()];
    for message in chat.session.messages() {
        let speaker = match message.role {
            ws_core::Role::User => "You",
            ws_core::Role::Assistant => "Guide",
        };
        lines.extend(wrap(&format!("{}: {}", speaker, message.content), width));
        lines.push(String::new());
    }
    if chat.waiting {
        lines.push("Guide is thinking…".to_string());
    } else {
        lines.push(format!("> {}", chat.input));
    }
    lines.push("enter send  esc close".to_string());
    lines
}

fn render_bookmarks(list: &BookmarksOverlay, width: usize) -> Vec<String> {
    let mut lines = vec![format!("Bookmarks ({})", list.entries.len()), String::new()];
    if list.entries.is_empty() {
        lines.push("Nothing saved yet. Press b on an article to keep it here.".to_string());
    }
    for (i, entry) in list.entries.iter().enumerate() {
        let cursor = if i == list.selected { ">" } else { " " };
        let line = format!(
            "{} {}  ({})",
            cursor,
            entry.article.title,
            entry.bookmarked_at.format("%Y-%m-%d")
        );
        lines.push(line.chars().take(width).collect());
    }
    lines.push(String::new());
    lines.push("↑/↓ move  enter open  x remove  esc close".to_string());
    lines
}

/// Greedy word wrap on char counts.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() { 0 } else { 1 } + word.chars().count();
        if !line.is_empty() && line.chars().count() + needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Restores the terminal however the viewer exits.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn draw(browser: &Browser) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    let mut stdout = io::stdout();
    queue!(stdout, Clear(ClearType::All))?;
    for (row, line) in browser.render(width as usize, height as usize).iter().enumerate() {
        queue!(stdout, MoveTo(0, row as u16), Print(line))?;
    }
    stdout.flush()
}

pub async fn run(mut browser: Browser) -> anyhow::Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);

    browser.controller.initialize();
    tracing::info!("📜 Browser started");

    loop {
        draw(&browser)?;
        tokio::select! {
            _ = ticker.tick() => {
                browser.tick();
            }
            event = events.next() => {
                let Some(event) = event else { break };
                match event? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => match browser.handle_key(key).await {
                        KeyOutcome::Continue => {}
                        KeyOutcome::Quit => break,
                        KeyOutcome::Ask(prompt) => {
                            draw(&browser)?;
                            browser.answer(&prompt).await;
                        }
                    },
                    Event::Mouse(mouse) => browser.handle_wheel(mouse.kind),
                    _ => {}
                }
            }
        }
    }

    tracing::info!("👋 Browser closed at {} of {} articles", browser.controller.position() + 1, browser.controller.len());
    Ok(())
}
