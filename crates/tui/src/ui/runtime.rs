//! Runtime: terminal lifecycle and the event loop.
//!
//! A dedicated input task forwards crossterm events over a channel. The
//! loop selects over input, service signals, finished content fetches and a
//! ticker; the ticker runs fast only while a deferred layout step (resize
//! debounce, backdrop teardown) is pending. `Effect`s returned by [`App`] are
//! executed here since they need to await.
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use lms_types::Signal;
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::{
    app::{App, Effect},
    content::{ContentData, fetch_page_data},
};

type PendingFetch = JoinHandle<(String, ContentData)>;

/// Spawn a task that blocks on terminal input and forwards `crossterm`
/// events over a Tokio channel. Mouse moves are throttled to one per 16 ms.
async fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    let mut last_mouse_event: Option<Instant> = Some(Instant::now());

    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            if event::poll(sixteen_ms).is_ok_and(|ready| ready) {
                match event::read() {
                    Ok(event) => {
                        let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                        let should_send = !is_mouse_move || last_mouse_event.is_some_and(|last| last.elapsed() >= sixteen_ms);
                        if is_mouse_move && should_send {
                            last_mouse_event = Some(Instant::now());
                        }

                        if should_send && let Err(e) = sender.send(event).await {
                            tracing::warn!("Failed to send event: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read event: {}", e);
                        break;
                    }
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture, DisableFocusChange)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|frame| super::main::draw(frame, app))?;
    Ok(())
}

fn handle_input_event(app: &mut App, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => app.handle_key(key_event),
        Event::Mouse(mouse_event) => app.handle_mouse(mouse_event),
        Event::Resize(width, _) => {
            app.handle_resize(width, Instant::now());
            Vec::new()
        }
        Event::FocusGained => app.handle_focus_gained(),
        Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Entry point for the shell: sets up the terminal, runs the event loop and
/// restores the terminal on exit.
pub async fn run_app(mut app: App, mut signal_receiver: mpsc::UnboundedReceiver<Signal>) -> Result<()> {
    let mut input_receiver = spawn_input_thread().await;

    let mut effects: Vec<Effect> = Vec::with_capacity(4);
    if let Some(signal) = app.locale.init().await {
        effects.extend(app.handle_signal(&signal));
    }
    effects.extend(app.restore_session());

    let mut terminal = setup_terminal()?;
    let mut pending_fetches: FuturesUnordered<PendingFetch> = FuturesUnordered::new();
    process_effects(&mut app, std::mem::take(&mut effects), &mut pending_fetches).await;

    // Fast while a deferred layout step is due, slow otherwise.
    let fast_interval = Duration::from_millis(50);
    let idle_interval = Duration::from_millis(1000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app)?;

    // Some terminals drop resize notifications; compare against the last
    // known size every iteration.
    let mut last_size: Option<(u16, u16)> = crossterm::terminal::size().ok();

    loop {
        let target_interval = if app.navigation.next_deadline().is_some() { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }
        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                if let Some(event) = maybe_event {
                    if let Event::Key(key_event) = event
                        && key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
                            break;
                        }
                    effects.extend(handle_input_event(&mut app, event));
                } else {
                    break;
                }
                needs_render = true;
            }

            Some(signal) = signal_receiver.recv() => {
                effects.extend(app.handle_signal(&signal));
                needs_render = true;
            }

            Some(joined) = pending_fetches.next(), if !pending_fetches.is_empty() => {
                match joined {
                    Ok((page_id, data)) => app.content_loaded(&page_id, data),
                    Err(error) => tracing::warn!(error = %error, "content fetch task failed"),
                }
                needs_render = true;
            }

            _ = ticker.tick() => {
                let was_pending = app.navigation.next_deadline().is_some();
                app.tick(Instant::now());
                needs_render = was_pending;
            }

            _ = signal::ctrl_c() => { break; }
        }

        if !effects.is_empty() {
            process_effects(&mut app, std::mem::take(&mut effects), &mut pending_fetches).await;
            needs_render = true;
        }

        if let Ok((w, h)) = crossterm::terminal::size()
            && last_size != Some((w, h))
        {
            last_size = Some((w, h));
            app.handle_resize(w, Instant::now());
            needs_render = true;
        }

        if app.should_quit {
            break;
        }
        if needs_render {
            render(&mut terminal, &mut app)?;
        }
    }

    cleanup_terminal(&mut terminal)?;
    Ok(())
}

/// Executes effects, feeding any follow-up effects back in until none remain.
async fn process_effects(app: &mut App, mut effects: Vec<Effect>, pending_fetches: &mut FuturesUnordered<PendingFetch>) {
    while !effects.is_empty() {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::LoadLanguage(language) => {
                    if let Some(signal) = app.locale.set_language(language).await {
                        follow_up.extend(app.handle_signal(&signal));
                    }
                }
                Effect::FetchContent { page_id, source } => {
                    let session = app.session.clone();
                    let language = app.locale.language();
                    pending_fetches.push(tokio::spawn(async move {
                        let data = fetch_page_data(session, source, language).await;
                        (page_id, data)
                    }));
                }
            }
        }
        effects = follow_up;
    }
}
