use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use todai::client::TaskClient;
use todai::client::transport::HttpTaskTransport;
use todai::config;
use todai::ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let transport = HttpTaskTransport::new(config::api_url_from_env());
    let mut app = App::new(TaskClient::new(transport));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App<HttpTaskTransport>) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    app.start();

    while !app.should_quit() {
        terminal.draw(|f| app.draw(f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Ignore repeats and releases.
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        app.drain();
        app.tick(Instant::now());
    }
    Ok(())
}
