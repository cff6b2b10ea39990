//! Astrogation - a transfer planning overlay in the terminal.

use anyhow::Result;
use astrogation::app::{App, ContextFlag, SCALE_STEP};
use astrogation::columns::{SortKey, ViewContext};
use astrogation::geometry::ScreenSize;
use astrogation::host::SimulatedHost;
use astrogation::model::JsonCatalog;
use astrogation::settings::{DisplayUnits, SettingsFile, SettingsStore};
use astrogation::ui;
use astrogation::util::LayoutConfig;
use astrogation::view::{DataProblem, ViewController};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "astrogation")]
#[command(about = "A terminal transfer planning overlay", long_about = None)]
struct Args {
    /// Path to the JSON transfer catalog
    #[arg(long, default_value = "transfers.json")]
    transfers: PathBuf,

    /// Path to the JSON settings file, created on first change
    #[arg(long, default_value = "astrogation.json")]
    settings: PathBuf,

    /// Initial host UI scale
    #[arg(long, default_value_t = 1.0)]
    ui_scale: f32,

    /// A controllable vessel is present
    #[arg(long)]
    vessel: bool,

    /// Maneuver nodes are unlocked
    #[arg(long)]
    unlocked: bool,

    /// The vessel is landed
    #[arg(long)]
    landed: bool,

    /// Print the table as tab-separated text and exit
    #[arg(long)]
    print: bool,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(log_file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting Astrogation");
    }

    let layout = LayoutConfig::default();
    let settings = SettingsFile::open_or_default(&args.settings);
    let catalog = JsonCatalog::open(&args.transfers, &settings.load()?);
    let context = ViewContext {
        has_controllable_vessel: args.vessel,
        capability_unlocked: args.unlocked,
        is_landed: args.landed,
    };
    // The terminal loop resizes the screen to the real terminal every frame.
    let screen = ScreenSize {
        width: 1920.0,
        height: 1080.0,
    };
    let host = SimulatedHost::new(screen, args.ui_scale)
        .with_measurement_delay(layout.terminal.measurement_delay_frames);
    let controller = ViewController::new(host, catalog, settings, context, layout.clone());

    if args.print {
        if let Some(problem) = DataProblem::of(controller.model()) {
            eprintln!("Error: {}", problem.message());
            std::process::exit(1);
        }
        print!("{}", controller.projected_table()?.to_tsv());
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let app = App::new(controller, layout);
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    if args.log.is_some() {
        tracing::info!("Astrogation exited");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        let size = terminal.size()?;
        let [screen, _, _] = ui::screen_layout(Rect::new(0, 0, size.width, size.height));
        app.sync_screen(screen.width, screen.height);
        app.tick();

        terminal.draw(|f| ui::draw(f, &app))?;

        if !event::poll(std::time::Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => {
                app.controller.close();
                return Ok(());
            },
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                return Ok(());
            },

            // Window
            (KeyModifiers::NONE, KeyCode::Char('o')) | (KeyModifiers::NONE, KeyCode::Esc) => {
                app.toggle_window();
            },
            (KeyModifiers::NONE, KeyCode::Left) => app.move_window(-1, 0),
            (KeyModifiers::NONE, KeyCode::Right) => app.move_window(1, 0),
            (KeyModifiers::NONE, KeyCode::Up) => app.move_window(0, -1),
            (KeyModifiers::NONE, KeyCode::Down) => app.move_window(0, 1),
            (_, KeyCode::Char('+')) | (KeyModifiers::NONE, KeyCode::Char('=')) => {
                app.change_scale(SCALE_STEP);
            },
            (KeyModifiers::NONE, KeyCode::Char('-')) => {
                app.change_scale(-SCALE_STEP);
            },

            // Header clicks
            (KeyModifiers::NONE, KeyCode::Char('n')) => app.click_header(SortKey::Name),
            (KeyModifiers::NONE, KeyCode::Char('t')) => app.click_header(SortKey::Time),
            (KeyModifiers::NONE, KeyCode::Char('d')) => app.click_header(SortKey::DeltaV),
            (KeyModifiers::NONE, KeyCode::Char('b')) => app.click_header(SortKey::BurnDuration),

            // Settings
            (KeyModifiers::NONE, KeyCode::Char('s')) => app.toggle_settings(),
            (KeyModifiers::NONE, KeyCode::Char(c @ '0'..='9')) => {
                let digit = c as usize - '0' as usize;
                app.toggle_setting_at((digit + 9) % 10);
            },
            (KeyModifiers::NONE, KeyCode::Char('m')) => app.select_units(DisplayUnits::Metric),
            (KeyModifiers::NONE, KeyCode::Char('i')) => {
                app.select_units(DisplayUnits::UnitedStatesCustomary);
            },

            // Context
            (KeyModifiers::NONE, KeyCode::Char('v')) => app.toggle_context(ContextFlag::Vessel),
            (KeyModifiers::NONE, KeyCode::Char('u')) => app.toggle_context(ContextFlag::Unlocked),
            (KeyModifiers::NONE, KeyCode::Char('l')) => app.toggle_context(ContextFlag::Landed),
            (KeyModifiers::NONE, KeyCode::Char('r')) => app.reset(),

            (KeyModifiers::NONE, KeyCode::Char('y')) => app.copy_table(),
            (KeyModifiers::SHIFT, KeyCode::Char('T')) => app.cycle_theme(),

            _ => {},
        }
    }
}
