mod app;
mod render;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use nlq_core::api::GraphQueryApi;
use nlq_core::state::{Effect, Msg as ViewMsg};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::app::{DirectionKey, Msg, TuiApp};
pub use crate::app::TuiSettings;

const TICK_RATE: Duration = Duration::from_millis(120);

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Runs backend calls off the UI thread and hands completions back to it.
struct EffectRunner {
    runtime: Runtime,
    api: Arc<dyn GraphQueryApi>,
    sender: UnboundedSender<ViewMsg>,
    receiver: UnboundedReceiver<ViewMsg>,
}

impl EffectRunner {
    fn new(api: Arc<dyn GraphQueryApi>) -> Result<Self, TuiError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (sender, receiver) = mpsc::unbounded_channel();
        Ok(Self {
            runtime,
            api,
            sender,
            receiver,
        })
    }

    fn spawn(&self, effect: Effect) {
        debug!(?effect, "spawning backend call");
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let completion = effect.run(api.as_ref()).await;
            if sender.send(completion).is_err() {
                debug!("ui closed before backend call completed");
            }
        });
    }

    fn drain(&mut self) -> Vec<ViewMsg> {
        let mut completions = Vec::new();
        while let Ok(completion) = self.receiver.try_recv() {
            completions.push(completion);
        }
        completions
    }
}

pub fn run(api: Arc<dyn GraphQueryApi>, settings: TuiSettings) -> Result<(), TuiError> {
    let mut effects = EffectRunner::new(api)?;
    info!(backend_url = %settings.backend_url, "starting terminal ui");

    let mut terminal = setup_terminal()?;
    let run_result = run_loop(&mut terminal, &mut effects, settings);
    let restore_result = restore_terminal(&mut terminal);

    if let Err(error) = run_result {
        restore_result?;
        return Err(error);
    }

    restore_result?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), TuiError> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    effects: &mut EffectRunner,
    settings: TuiSettings,
) -> Result<(), TuiError> {
    let mut app = TuiApp::new(settings);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render::render(frame, &app))?;

        let timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(effect) = map_key_event(key).and_then(|msg| app.handle(msg)) {
                        effects.spawn(effect);
                    }
                }
            }
        }

        for completion in effects.drain() {
            if let Some(effect) = app.apply(completion) {
                effects.spawn(effect);
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.handle(Msg::Tick);
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn map_key_event(key: KeyEvent) -> Option<Msg> {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Msg::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => Some(Msg::ClearInput),
        (_, KeyCode::F(1)) => Some(Msg::ToggleHelp),
        (_, KeyCode::Tab) => Some(Msg::FocusNext),
        (_, KeyCode::BackTab) => Some(Msg::FocusPrevious),
        (_, KeyCode::Enter) => Some(Msg::Activate),
        (_, KeyCode::Up) => Some(Msg::Navigate(DirectionKey::Up)),
        (_, KeyCode::Down) => Some(Msg::Navigate(DirectionKey::Down)),
        (_, KeyCode::PageUp) => Some(Msg::ScrollResults(DirectionKey::Up)),
        (_, KeyCode::PageDown) => Some(Msg::ScrollResults(DirectionKey::Down)),
        (_, KeyCode::Backspace) => Some(Msg::Backspace),
        (modifiers, KeyCode::Char(ch)) if !modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Msg::Char(ch))
        }
        _ => None,
    }
}
