use crate::tui::theme::Theme;
use buzz_pie_common::Config;
use buzz_pie_core::{ConsumerHandle, Outcome, PieChart, SourceEvent, Tally};
use std::sync::atomic::Ordering;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Chart,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConsumerState {
    Running,
    /// Operator stopped consumption; the chart stays up.
    Stopped,
    /// Source reached its end (or gave up).
    Exhausted,
}

pub struct App {
    pub config: Config,
    pub tally: Tally,
    pub chart: PieChart,
    pub consumer: ConsumerHandle,
    pub consumer_state: ConsumerState,
    pub source_name: String,
    pub source_errors: u64,
    pub last_source_error: Option<String>,
    pub view: View,
    pub theme: Theme,
    pub theme_name: String,
    pub status_msg: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, consumer: ConsumerHandle) -> Self {
        let tally = Tally::new(&config.chart);
        let chart = tally.chart();
        Self {
            source_name: consumer.source_name().to_owned(),
            theme: Theme::from_name(&config.display.theme),
            theme_name: config.display.theme.clone(),
            config,
            tally,
            chart,
            consumer,
            consumer_state: ConsumerState::Running,
            source_errors: 0,
            last_source_error: None,
            view: View::Chart,
            status_msg: "Waiting for messages — q:quit s:stop ?:help".into(),
            should_quit: false,
        }
    }

    /// Apply everything the consumer has queued since the last tick, then
    /// rebuild the chart once. Returns the number of records handled.
    pub fn pump(&mut self) -> usize {
        if self.consumer_state != ConsumerState::Running {
            return 0;
        }
        self.apply_queued(self.config.display.channel_capacity)
    }

    fn apply_queued(&mut self, budget: usize) -> usize {
        let mut handled = 0;
        for event in self.consumer.drain(budget) {
            match event {
                SourceEvent::Record(record) => {
                    handled += 1;
                    match self.tally.process(record) {
                        Outcome::Counted { key, count } => {
                            self.status_msg = format!("{key} → {count}");
                        }
                        Outcome::Dropped(e) => {
                            self.status_msg = format!("dropped message: {e}");
                        }
                    }
                }
                SourceEvent::Error(e) => {
                    self.source_errors += 1;
                    self.last_source_error = Some(e);
                }
                SourceEvent::Closed => {
                    info!("Source {} finished", self.source_name);
                    self.consumer_state = ConsumerState::Exhausted;
                    self.status_msg = "Input finished — chart frozen. q:quit".into();
                    break;
                }
            }
        }
        if handled > 0 {
            self.chart = self.tally.chart();
        }
        handled
    }

    /// Operator interrupt: stop consuming, keep the window open.
    pub fn interrupt(&mut self) {
        if self.consumer_state != ConsumerState::Running {
            return;
        }
        warn!("Consumer interrupted by user.");
        self.consumer.stop_flag().store(true, Ordering::Relaxed);
        // already pulled records still count
        self.apply_queued(usize::MAX);
        self.consumer.stop();
        self.consumer_state = ConsumerState::Stopped;
        self.status_msg = "Consumer stopped — chart left open for inspection. q:quit".into();
    }

    pub fn cycle_theme(&mut self) {
        let next = Theme::next_name(&self.theme_name);
        self.theme = Theme::from_name(next);
        self.theme_name = next.to_owned();
        self.status_msg = format!("theme: {next}");
    }

    pub fn toggle_help(&mut self) {
        self.view = match self.view {
            View::Help => View::Chart,
            View::Chart => View::Help,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buzz_pie_core::{spawn_consumer, LineSource};
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    fn app_with(input: &'static [u8]) -> App {
        let src = LineSource::new(Cursor::new(input.to_vec()), "mem");
        let handle = spawn_consumer(Box::new(src), 16).unwrap();
        App::new(Config::default(), handle)
    }

    fn pump_until_exhausted(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.consumer_state == ConsumerState::Running && Instant::now() < deadline {
            app.pump();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn pump_counts_and_freezes_on_end() {
        let mut app = app_with(b"{\"category\":\"a\"}\n{\"category\":\"B\"}\nnope\n");
        assert!(app.chart.is_placeholder());
        pump_until_exhausted(&mut app);
        assert_eq!(app.consumer_state, ConsumerState::Exhausted);
        assert_eq!(app.tally.processed(), 3);
        assert_eq!(app.tally.dropped(), 1);
        assert_eq!(app.chart.slices.len(), 2);
        assert_eq!(app.pump(), 0);
    }

    #[test]
    fn interrupt_keeps_chart() {
        let mut app = app_with(b"");
        app.interrupt();
        assert_eq!(app.consumer_state, ConsumerState::Stopped);
        assert!(app.chart.is_placeholder());
        assert_eq!(app.pump(), 0);
        assert!(!app.should_quit);
    }

    #[test]
    fn interrupt_counts_records_already_queued() {
        let mut app = app_with(b"{\"category\":\"a\"}\n{\"category\":\"a\"}\n{\"category\":\"b\"}\n");
        std::thread::sleep(Duration::from_millis(200)); // let the reader fill the channel
        app.interrupt();
        assert_eq!(app.consumer_state, ConsumerState::Stopped);
        assert_eq!(app.tally.processed(), 3);
        assert_eq!(app.chart.slices[0], buzz_pie_core::DisplaySlice::new("a", 2));
    }

    #[test]
    fn help_and_theme_toggle() {
        let mut app = app_with(b"");
        app.toggle_help();
        assert_eq!(app.view, View::Help);
        app.toggle_help();
        assert_eq!(app.view, View::Chart);
        app.cycle_theme();
        assert_eq!(app.theme_name, "light");
    }
}
