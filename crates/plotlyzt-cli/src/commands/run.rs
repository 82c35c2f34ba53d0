use std::io::{self, Stdout};
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tracing::info;

use plotlyzt_core::{AppConfig, PagePhase};
use plotlyzt_tui::{
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{HelpWidget, NavbarWidget, PageWidget, SplashWidget, StatusBarWidget},
    App, Theme,
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Plotlyzt"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, config: Arc<AppConfig>) -> Result<()> {
    let size = terminal.size()?;
    let theme = Theme::from_name(&config.ui.theme);
    let mut app = App::new(config.clone(), theme, size.width, size.height);
    info!(cols = size.width, rows = size.height, "TUI started");

    let event_handler =
        EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.scroll.animation_fps);

    // Checked at the end of each iteration to pick the next poll rate
    let mut needs_fast_update = true;

    loop {
        terminal.draw(|frame| draw(frame, &app))?;

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };

        match event {
            Some(AppEvent::Key(key)) => {
                let action = handle_key_event(key, &app);
                app.handle_action(action);
            }
            Some(AppEvent::Wheel(steps)) => {
                if !app.is_loading() {
                    app.wheel(steps);
                }
            }
            Some(AppEvent::Click { column, row }) => app.click(column, row),
            Some(AppEvent::Resize(cols, rows)) => app.resize(cols, rows),
            Some(AppEvent::Tick) | None => {}
        }

        if app.should_quit {
            break;
        }

        // Event polling blocks this thread; let page timers run
        tokio::task::yield_now().await;

        let animating = app.update();
        needs_fast_update = animating
            || app.is_loading()
            || app.page.chart_view().is_locked()
            || app.page.marking_mode().is_locked();
    }

    app.page.teardown();
    info!("TUI stopped");
    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.phase() == PagePhase::Loading {
        SplashWidget::render(frame, area, app);
        return;
    }

    // Navbar, page, status bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    PageWidget::render(frame, layout[1], app);
    NavbarWidget::render(frame, layout[0], app);
    StatusBarWidget::render(frame, layout[2], app);

    if app.page.nav().is_menu_open() {
        NavbarWidget::render_menu(frame, area, app);
    }
    if app.show_help {
        HelpWidget::render(frame, app);
    }
}
