mod tui;

use buzz_pie_common::Config;
use buzz_pie_core::{
    print_summary, spawn_consumer, summary_json, LineSource, RecordSource, Tally,
};
use clap::{Args, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::atomic::Ordering;
use std::{io, path::Path, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui::app::App;
use tui::events::handle_key;
use tui::ui::render;

fn parse_share(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("not a float: {s}"))?;
    if (0.0..=1.0).contains(&v) { Ok(v) } else { Err(format!("min share must be in [0.0, 1.0], got {v}")) }
}

#[derive(Parser)]
#[command(name = "buzz-pie", version, about = "Live pie chart of a categorical field in a JSON event stream")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SourceArgs {
    /// Newline-delimited JSON file, or `-` for stdin. Kafka is used when omitted.
    #[arg(long)] input: Option<String>,
    #[arg(long)] topic: Option<String>,
    #[arg(long)] group: Option<String>,
    #[arg(long)] brokers: Option<String>,
    /// Event field to group by
    #[arg(long)] field: Option<String>,
    #[arg(long, value_parser = parse_share)] min_share: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Live terminal chart
    Watch {
        #[command(flatten)] source: SourceArgs,
        #[arg(long)] theme: Option<String>,
    },
    /// Headless: count until end of input or Ctrl-C, then print the slices
    Tally {
        #[command(flatten)] source: SourceArgs,
        #[arg(long)] json: bool,
    },
    Completions { shell: clap_complete::Shell },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Watch { source, theme } => {
            let mut config = load_config(&source)?;
            if let Some(t) = theme { config.display.theme = t; }
            init_logging(&config, true)?;
            run_watch(config, &source)?
        }
        Commands::Tally { source, json } => {
            let config = load_config(&source)?;
            init_logging(&config, false)?;
            run_tally(config, &source, json)?
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "buzz-pie", &mut io::stdout());
        }
    }
    Ok(())
}

fn load_config(args: &SourceArgs) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(v) = &args.topic { config.kafka.topic = v.clone(); }
    if let Some(v) = &args.group { config.kafka.group_id = v.clone(); }
    if let Some(v) = &args.brokers { config.kafka.brokers = v.clone(); }
    if let Some(v) = &args.field { config.chart.category_field = v.clone(); }
    if let Some(v) = args.min_share { config.chart.min_share = v; }
    config.validate()?;
    Ok(config)
}

/// TUI runs log to a file so the alternate screen stays clean.
fn init_logging(config: &Config, to_file: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() { std::fs::create_dir_all(parent)?; }
        let file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
    }
    Ok(())
}

fn open_source(args: &SourceArgs, config: &Config) -> anyhow::Result<Box<dyn RecordSource>> {
    match args.input.as_deref() {
        Some("-") => Ok(Box::new(LineSource::stdin())),
        Some(path) => Ok(Box::new(LineSource::open(Path::new(path))?)),
        None => open_kafka(config),
    }
}

#[cfg(feature = "kafka")]
fn open_kafka(config: &Config) -> anyhow::Result<Box<dyn RecordSource>> {
    Ok(Box::new(buzz_pie_core::KafkaSource::connect(&config.kafka)?))
}

#[cfg(not(feature = "kafka"))]
fn open_kafka(config: &Config) -> anyhow::Result<Box<dyn RecordSource>> {
    anyhow::bail!(
        "no --input given and this build has no Kafka support (topic '{}'); rebuild with --features kafka",
        config.kafka.topic
    )
}

fn run_watch(config: Config, args: &SourceArgs) -> anyhow::Result<()> {
    info!("START consumer (pie by {}).", config.chart.category_field);
    let source = open_source(args, &config)?;
    let consumer = spawn_consumer(source, config.display.channel_capacity)?;
    let tick = Duration::from_millis(config.display.tick_ms.max(1));
    let mut app = App::new(config, consumer);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.pump();
        terminal.draw(|f| render(f, &app))?;
        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? { handle_key(&mut app, key); }
        }
        if app.should_quit { break; }
    }
    app.consumer.stop();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("END consumer for {} ({} processed, {} dropped).", app.source_name, app.tally.processed(), app.tally.dropped());
    Ok(())
}

fn run_tally(config: Config, args: &SourceArgs, json: bool) -> anyhow::Result<()> {
    info!("START consumer (tally by {}).", config.chart.category_field);
    let source = open_source(args, &config)?;
    let mut consumer = spawn_consumer(source, config.display.channel_capacity)?;
    let stop = consumer.stop_flag();
    ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed))?;
    let mut tally = Tally::new(&config.chart);
    let tick = Duration::from_millis(config.display.tick_ms.max(1));
    tally.consume(&consumer, tick);
    consumer.stop();
    info!("END consumer for {}.", consumer.source_name());
    if json {
        println!("{}", serde_json::to_string_pretty(&summary_json(&tally))?);
    } else {
        print_summary(&tally);
    }
    Ok(())
}
