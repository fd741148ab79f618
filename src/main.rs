use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mindful::config::{FilePrefsStore, PrefsStore};
use mindful::dispatch::{dispatch, Command};
use mindful::effect::{BrowserMusicPlayer, EffectRunner, NotifySend};
use mindful::runtime::{Runner, StdinEventSource, TimerEvent};
use mindful::timer::Timer;
use mindful::util::format_mm_ss;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// background pomodoro timer with ambient music and daily focus stats
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A background Pomodoro timer. Reads one JSON request per line on stdin \
                  (startTimer, pauseTimer, resetTimer, setTime, startEditing, stopEditing, \
                  toggleMusic, getTime) and answers getTime with a one-line JSON snapshot \
                  on stdout."
)]
pub struct Cli {
    /// focus session length in minutes for this run (overrides the saved default)
    #[clap(short = 'm', long, value_parser = clap::value_parser!(u32).range(1..=60))]
    focus_mins: Option<u32>,

    /// ambient music URL, saved to preferences before the loop starts
    #[clap(long)]
    music_url: Option<String>,

    /// start the countdown immediately instead of waiting for startTimer
    #[clap(long)]
    autostart: bool,

    /// alternate preferences file (defaults to the user config directory)
    #[clap(long)]
    prefs: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let store = match &cli.prefs {
        Some(path) => FilePrefsStore::with_path(path),
        None => FilePrefsStore::new(),
    };
    if store.seed_if_missing()? {
        info!("first run: seeded default preferences");
    }

    if let Some(url) = &cli.music_url {
        let prefs = mindful::config::Preferences {
            music_url: url.clone(),
            ..store.load()
        };
        store.save(&prefs)?;
    }

    let prefs = store.load();
    let focus_session_length = cli
        .focus_mins
        .map(|mins| mins * 60)
        .unwrap_or(prefs.default_focus_time);

    let mut timer = Timer::new(focus_session_length);
    let effect_runner = EffectRunner::new(
        Box::new(NotifySend),
        Box::new(BrowserMusicPlayer),
        store.clone(),
    );
    let runner = Runner::new(StdinEventSource::new(TICK_INTERVAL));

    if cli.autostart {
        effect_runner.run(&timer.start());
    }
    info!(
        "ready: {} ({})",
        timer.state.phase,
        format_mm_ss(timer.state.seconds_remaining)
    );

    let mut stdout = io::stdout();
    loop {
        match runner.step() {
            TimerEvent::Tick => {
                let phase_before = timer.state.phase;
                let effects = timer.tick(Local::now().date_naive());
                effect_runner.run(&effects);
                if timer.state.phase != phase_before {
                    info!(
                        "{} ({})",
                        timer.state.phase,
                        format_mm_ss(timer.state.seconds_remaining)
                    );
                }
            }
            TimerEvent::Request(value) => match Command::from_value(value) {
                Some(command) => {
                    let today = Local::now().date_naive();
                    let (effects, response) = dispatch(&mut timer, command, today);
                    effect_runner.run(&effects);
                    if let Some(snapshot) = response {
                        writeln!(stdout, "{}", serde_json::to_string(&snapshot)?)?;
                        stdout.flush()?;
                    }
                }
                None => debug!("ignoring unrecognized request"),
            },
            TimerEvent::Closed => break,
        }
    }

    info!("command channel closed; shutting down");
    Ok(())
}
