use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    prelude::Frame,
    widgets::Clear,
    Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::client::{CalculationClient, CalculationOutcome, HttpCalculationClient};
use crate::config::Settings;
use crate::controller::{SubmitTicket, UiController};
use crate::defaults::Defaults;
use crate::render::PanelRenderer;
use crate::screens::{CalculatorScreen, ConfirmQuitScreen};
use crate::store::{FileStore, FormStateStore};

pub enum Transition {
    Stay,
    Push(Box<dyn ScreenWidget>),
    Pop,
    Quit,
}

pub type Completion = (SubmitTicket, CalculationOutcome);

/// State shared by every screen on the stack.
pub struct AppCtx {
    pub controller: UiController<PanelRenderer, FileStore>,
    client: Arc<dyn CalculationClient>,
    completions: UnboundedSender<Completion>,
}

impl AppCtx {
    pub fn new(
        controller: UiController<PanelRenderer, FileStore>,
        client: Arc<dyn CalculationClient>,
        completions: UnboundedSender<Completion>,
    ) -> Self {
        Self { controller, client, completions }
    }

    /// Start a submission for the active form; the result comes back through
    /// the completion channel.
    pub fn submit(&mut self) {
        let Some(sub) = self.controller.begin_submit() else {
            return;
        };
        let client = Arc::clone(&self.client);
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let outcome = client.submit(&sub.request).await;
            // receiver gone means the UI already shut down
            let _ = tx.send((sub.ticket, outcome));
        });
    }

    fn drain_completions(&mut self, rx: &mut UnboundedReceiver<Completion>) {
        while let Ok((ticket, outcome)) = rx.try_recv() {
            self.controller.complete_submit(ticket, outcome);
        }
    }
}

pub trait ScreenWidget {
    fn title(&self) -> &str { "Wireless Calculator" }
    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &AppCtx);
    fn on_key(&mut self, key: KeyEvent, ctx: &mut AppCtx) -> Result<Transition>;
}

pub async fn run_tui(settings: &Settings) -> Result<()> {
    let client: Arc<dyn CalculationClient> = Arc::new(HttpCalculationClient::new(
        &settings.api_base,
        settings.flavor,
        settings.timeout,
    )?);
    let store = FormStateStore::new(FileStore::new(&settings.state_dir));
    let controller = UiController::new(PanelRenderer::default(), store, settings.export_dir.clone());
    let (tx, mut rx) = unbounded_channel();
    let mut ctx = AppCtx::new(controller, client, tx);

    info!(api = %settings.api_base, flavor = ?settings.flavor, "starting interactive calculator");

    // terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let res = event_loop(&mut terminal, &mut ctx, &mut rx);

    // restore, even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    ctx: &mut AppCtx,
    rx: &mut UnboundedReceiver<Completion>,
) -> Result<()> {
    let mut stack: Vec<Box<dyn ScreenWidget>> = vec![Box::new(CalculatorScreen::new(&ctx.controller))];

    loop {
        ctx.drain_completions(rx);
        ctx.controller.renderer_mut().prune(Instant::now());

        terminal.draw(|f| {
            let size = f.size();
            if let Some(top) = stack.last() {
                top.draw(f, size, ctx);
            } else {
                f.render_widget(Clear, size);
            }
        })?;

        if !event::poll(Defaults::TICK)? {
            continue;
        }
        let Event::Key(k) = event::read()? else { continue };
        if k.kind != KeyEventKind::Press {
            continue;
        }

        // GLOBAL HOTKEY: Ctrl+Q shows confirm quit from anywhere
        if k.modifiers.contains(KeyModifiers::CONTROL) && matches!(k.code, KeyCode::Char('q' | 'Q')) {
            stack.push(Box::new(ConfirmQuitScreen::new()));
            continue;
        }

        let Some(top) = stack.last_mut() else { break };
        match top.on_key(k, ctx)? {
            Transition::Stay => {}
            Transition::Push(s) => stack.push(s),
            Transition::Pop => {
                stack.pop();
                if stack.is_empty() {
                    break;
                }
            }
            Transition::Quit => break,
        }
    }

    debug!("event loop finished");
    Ok(())
}
