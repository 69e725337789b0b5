use std::future::Future;
use std::io::BufRead;

use clap::{Args, Subcommand};
use podomoro_core::{
    Config, Event, IntervalTicks, ManualTicks, TickSource, TimerCommand, TimerDriver,
    TimerEngine, TimerMode, TimerView,
};
use tracing::{info, warn};

#[derive(Args, Debug, Default)]
pub struct ModeArgs {
    /// Timer mode: fifty-ten, thirty-five or custom
    #[arg(long)]
    mode: Option<TimerMode>,
    /// Custom focus minutes (used when the mode is custom)
    #[arg(long)]
    focus: Option<String>,
    /// Custom break minutes (used when the mode is custom)
    #[arg(long = "break")]
    break_minutes: Option<String>,
}

impl ModeArgs {
    /// Configured defaults with command-line overrides applied.
    fn engine(&self, config: &Config) -> TimerEngine {
        let mut engine = config.engine();
        if let Some(text) = &self.focus {
            engine.set_custom_focus_input(text);
        }
        if let Some(text) = &self.break_minutes {
            engine.set_custom_break_input(text);
        }
        if let Some(mode) = self.mode {
            engine.select_mode(mode);
        }
        engine
    }
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground.
    ///
    /// Reads commands from stdin: s(tart), p(ause), t(oggle), r(eset),
    /// m(ode) <name>, f(ocus) <minutes>, b(reak) <minutes>, q(uit).
    Run {
        #[command(flatten)]
        args: ModeArgs,
        /// Tick as fast as possible instead of once per second
        #[arg(long, requires = "max_ticks")]
        fast: bool,
        /// Stop after this many ticks
        #[arg(long)]
        max_ticks: Option<u64>,
        /// Wait for a start command instead of starting right away
        #[arg(long)]
        paused: bool,
    },
    /// Print the timer screen view model as JSON
    View {
        #[command(flatten)]
        args: ModeArgs,
    },
    /// Start, advance the given number of seconds instantly, print the state
    Simulate {
        #[command(flatten)]
        args: ModeArgs,
        /// Number of one-second ticks to apply
        #[arg(long)]
        ticks: u64,
    },
}

/// Caps another tick source at a fixed number of ticks.
struct Bounded<T> {
    inner: T,
    left: Option<u64>,
}

impl<T> Bounded<T> {
    fn new(inner: T, limit: Option<u64>) -> Self {
        Self { inner, left: limit }
    }
}

impl<T: TickSource + Send> TickSource for Bounded<T> {
    fn restart(&mut self) {
        self.inner.restart();
    }

    fn next_tick(&mut self) -> impl Future<Output = bool> + Send {
        async move {
            if self.left == Some(0) {
                return false;
            }
            let alive = self.inner.next_tick().await;
            if let Some(left) = self.left.as_mut() {
                *left -= 1;
            }
            alive
        }
    }
}

/// Parse one line of interactive input.
fn parse_command(line: &str) -> Option<TimerCommand> {
    let mut parts = line.trim().splitn(2, char::is_whitespace);
    let head = parts.next()?;
    let rest = parts.next().map(str::trim).unwrap_or("");
    let command = match head {
        "s" | "start" => TimerCommand::Start,
        "p" | "pause" => TimerCommand::Pause,
        "t" | "toggle" => TimerCommand::Toggle,
        "r" | "reset" => TimerCommand::Reset,
        "q" | "quit" => TimerCommand::Shutdown,
        "m" | "mode" => TimerCommand::SelectMode(rest.parse().ok()?),
        "f" | "focus" => TimerCommand::SetCustomFocus(rest.to_string()),
        "b" | "break" => TimerCommand::SetCustomBreak(rest.to_string()),
        _ => return None,
    };
    Some(command)
}

fn spawn_stdin_reader(tx: tokio::sync::mpsc::Sender<TimerCommand>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(command) => {
                    let quit = command == TimerCommand::Shutdown;
                    if tx.blocking_send(command).is_err() || quit {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => eprintln!("unknown command: {}", line.trim()),
            }
        }
    });
}

fn print_event(event: &Event) {
    match serde_json::to_string(event) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!("failed to encode event: {e}"),
    }
}

async fn drive<T: TickSource>(
    engine: TimerEngine,
    ticks: T,
    start: bool,
    show_clock: bool,
) -> Result<TimerEngine, Box<dyn std::error::Error>> {
    let (driver, tx) = TimerDriver::new(engine, ticks);
    if start {
        tx.send(TimerCommand::Start).await?;
    }
    spawn_stdin_reader(tx);

    let engine = driver
        .run(|engine, event| match event {
            Some(event) => print_event(event),
            None if show_clock && engine.is_running() => println!(
                "{} {} {:>3.0}%",
                engine.phase().title(),
                engine.clock_text(),
                engine.progress() * 100.0
            ),
            None => {}
        })
        .await;
    Ok(engine)
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            args,
            fast,
            max_ticks,
            paused,
        } => {
            let engine = args.engine(config);
            if !paused && !engine.is_config_valid() {
                return Err("focus and break must both be at least 1 minute".into());
            }
            info!(
                mode = engine.mode().name(),
                focus_minutes = engine.focus_minutes(),
                break_minutes = engine.break_minutes(),
                "running timer"
            );
            let rt = tokio::runtime::Runtime::new()?;
            let engine = rt.block_on(async {
                if fast {
                    let ticks = Bounded::new(ManualTicks::unbounded(), max_ticks);
                    drive(engine, ticks, !paused, false).await
                } else {
                    let ticks = Bounded::new(IntervalTicks::new(), max_ticks);
                    drive(engine, ticks, !paused, true).await
                }
            })?;
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
        TimerAction::View { args } => {
            let engine = args.engine(config);
            println!("{}", serde_json::to_string_pretty(&TimerView::of(&engine))?);
        }
        TimerAction::Simulate { args, ticks } => {
            let engine = args.engine(config);
            if !engine.is_config_valid() {
                warn!("configuration is invalid, the timer will not start");
            }
            let (driver, tx) = TimerDriver::new(engine, ManualTicks::new(ticks));
            tx.try_send(TimerCommand::Start)?;
            drop(tx);
            let rt = tokio::runtime::Runtime::new()?;
            let engine = rt.block_on(driver.run(|_, _| {}));
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
    }
    Ok(())
}
