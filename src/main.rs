mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keytutor::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, Difficulty, FileConfigStore},
    lesson::LessonCategory,
    logging::init_file_logging,
    runtime::{EventPump, FixedTicker},
    LessonCatalog, ProgressLedger,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::Arc,
    time::Duration,
};
use tracing::info;

const TICK_RATE_MS: u64 = 100;

/// typing tutor tui with guided lessons and coaching
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing tutor TUI with warmups, accuracy builders and fluency runs, live scoring, session history and coaching notes."
)]
pub struct Cli {
    /// start straight into the lesson with this id
    #[clap(short = 'l', long)]
    lesson: Option<String>,

    /// start straight into a random lesson from this category
    #[clap(short = 'r', long, value_parser = parse_category)]
    random: Option<LessonCategory>,

    /// print the lesson catalog and exit
    #[clap(long)]
    list_lessons: bool,

    /// coaching intensity; sets the countdown length
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// words per minute to aim for
    #[clap(short = 't', long)]
    target_wpm: Option<u32>,

    /// persist the given options as the new defaults
    #[clap(long)]
    save_config: bool,
}

fn parse_category(s: &str) -> Result<LessonCategory, String> {
    LessonCategory::ALL
        .into_iter()
        .find(|c| c.to_string().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("expected one of warmup, accuracy, fluency; got {s}"))
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(target) = self.target_wpm {
            config.target_wpm = target;
        }
        config
    }
}

fn print_lessons(catalog: &LessonCatalog) {
    for category in LessonCategory::ALL {
        println!("{category}");
        for lesson in catalog.lessons(category) {
            println!("  {:<24} {}", lesson.id, lesson);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let catalog = LessonCatalog::builtin()?;

    if cli.list_lessons {
        print_lessons(&catalog);
        return Ok(());
    }

    if let Some(path) = AppDirs::log_path() {
        init_file_logging(&path);
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
    }

    let first_lesson = match (&cli.lesson, cli.random) {
        (Some(id), _) => Some(catalog.find(id)?.clone()),
        (None, Some(category)) => catalog.random(category).cloned(),
        (None, None) => None,
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    info!(difficulty = %config.difficulty, target_wpm = config.target_wpm, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(catalog, config, Arc::new(ProgressLedger::new()));
    app.start_coaching();
    if let Some(lesson) = first_lesson {
        app.begin(lesson);
    }

    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(sessions = app.manager.ledger().len(), "exiting");
    res
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let pump = EventPump::terminal(FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    terminal.draw(|f| ui::render(app, f))?;

    while app.handle_event(pump.next()) == Control::Continue {
        terminal.draw(|f| ui::render(app, f))?;
    }

    Ok(())
}
