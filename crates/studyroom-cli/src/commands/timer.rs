use std::io::Write;

use clap::Subcommand;
use studyroom_core::storage::{Database, DatabaseSink};
use studyroom_core::{
    Config, Event, FocusSession, FocusTimer, IntervalTicker, MemorySessionLog, NotificationSink,
    SessionSink, SubjectDirectory,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run an interactive focus session in the foreground
    Run {
        /// Subject the first work session is attributed to
        #[arg(long)]
        subject: Option<String>,
        /// Stop after this many completed work sessions
        #[arg(long)]
        cycles: Option<u32>,
        /// Start counting down immediately
        #[arg(long)]
        autostart: bool,
        /// Keep completed sessions in memory only
        #[arg(long)]
        no_save: bool,
    },
    /// Print the initial timer state as JSON
    Status,
}

/// A line typed while the timer runs.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Start,
    Pause,
    Reset,
    Status,
    Subject(Option<String>),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Status);
    };
    let cmd = match head {
        "start" | "s" | "resume" => Command::Start,
        "pause" | "p" => Command::Pause,
        "reset" | "r" => Command::Reset,
        "status" => Command::Status,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "subject" => match words.next() {
            None => return Err("usage: subject <id>|none".into()),
            Some("none") => Command::Subject(None),
            Some(id) => Command::Subject(Some(id.to_string())),
        },
        other => return Err(format!("unknown command: {other} (type 'help')")),
    };
    if words.next().is_some() {
        return Err(format!("unexpected arguments after '{head}'"));
    }
    Ok(cmd)
}

const HELP: &str = "commands: start|s, pause|p, reset|r, status, subject <id>|none, quit|q";

/// Prints notifications on their own line.
struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&mut self, title: &str, message: &str) {
        println!("\n[{title}] {message}");
    }
}

fn progress_line(timer: &FocusTimer) -> String {
    format!(
        "\r{} {}  {:>5.1}%   ",
        timer.session_type().label(),
        timer.formatted_time(),
        timer.progress_pct()
    )
}

fn render_progress(session: &FocusSession<IntervalTicker>) {
    print!("{}", progress_line(session.timer()));
    let _ = std::io::stdout().flush();
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

/// What one delivered tick prints: the event line, if the tick produced
/// one, followed by the redrawn progress line for the now-current phase.
fn tick_output(event: Option<&Event>, timer: &FocusTimer) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    if let Some(event) = event {
        out.push_str(&serde_json::to_string(event)?);
        out.push('\n');
    }
    out.push_str(&progress_line(timer));
    Ok(out)
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        TimerAction::Status => {
            let timer = FocusTimer::new().with_policy(config.session.duration_policy);
            println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
        }
        TimerAction::Run {
            subject,
            cycles,
            autostart,
            no_save,
        } => {
            if let Some(id) = subject.as_deref() {
                if config.find_subject(id).is_none() {
                    return Err(format!("unknown subject: {id}").into());
                }
            }

            let sink: Box<dyn SessionSink> = if no_save {
                Box::new(MemorySessionLog::new())
            } else {
                Box::new(DatabaseSink::new(
                    Database::open()?,
                    config.user_id().map(str::to_string),
                ))
            };

            let timer = FocusTimer::new().with_policy(config.session.duration_policy);
            let mut session = FocusSession::new(
                timer,
                IntervalTicker::every_second(),
                sink,
                Box::new(ConsoleNotifier),
            )
            .with_notifications(config.notifications.enabled);

            if subject.is_some() {
                session.select_subject(subject);
            }

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(async move {
                if autostart {
                    session.start();
                }
                drive(session, &config, cycles).await
            });
            // Stdin is read on a blocking thread that cannot be interrupted.
            runtime.shutdown_background();
            result?;
        }
    }
    Ok(())
}

async fn drive(
    mut session: FocusSession<IntervalTicker>,
    config: &Config,
    cycles: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut completed_work = 0u32;

    println!("{HELP}");
    render_progress(&session);

    loop {
        tokio::select! {
            event = session.next_tick() => {
                if let Some(Event::PhaseCompleted { session: Some(_), .. }) = &event {
                    completed_work += 1;
                }
                print!("{}", tick_output(event.as_ref(), session.timer())?);
                std::io::stdout().flush()?;
                if cycles.is_some_and(|c| completed_work >= c) {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Status) => print_event(&session.snapshot())?,
                    Ok(Command::Start) => {
                        if let Some(event) = session.start() {
                            print_event(&event)?;
                        }
                    }
                    Ok(Command::Pause) => {
                        if let Some(event) = session.pause() {
                            print_event(&event)?;
                        }
                    }
                    Ok(Command::Reset) => {
                        if let Some(event) = session.reset() {
                            print_event(&event)?;
                        }
                    }
                    Ok(Command::Subject(id)) => {
                        let unknown = id.as_deref().filter(|id| config.find_subject(id).is_none());
                        if let Some(unknown) = unknown {
                            println!("unknown subject: {unknown}");
                        } else if session.select_subject(id) {
                            let selected = session.timer().selected_subject_id().unwrap_or("none");
                            println!("subject: {selected}");
                        } else {
                            println!("subject can only change while a work session is stopped");
                        }
                    }
                    Err(msg) => println!("{msg}"),
                }
                render_progress(&session);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted");
                break;
            }
        }
    }

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!(parse_command("s"), Ok(Command::Start));
        assert_eq!(parse_command("resume"), Ok(Command::Start));
        assert_eq!(parse_command("  pause "), Ok(Command::Pause));
        assert_eq!(parse_command("r"), Ok(Command::Reset));
        assert_eq!(parse_command("q"), Ok(Command::Quit));
        assert_eq!(parse_command(""), Ok(Command::Status));
    }

    #[test]
    fn parses_subject_selection() {
        assert_eq!(
            parse_command("subject math-1"),
            Ok(Command::Subject(Some("math-1".into())))
        );
        assert_eq!(parse_command("subject none"), Ok(Command::Subject(None)));
        assert!(parse_command("subject").is_err());
    }

    #[test]
    fn phase_completion_redraws_the_next_phase() {
        let mut timer = FocusTimer::new();
        timer.start();
        let mut completion = None;
        for _ in 0..1500 {
            completion = timer.tick().or(completion);
        }

        let out = tick_output(completion.as_ref(), &timer).unwrap();
        let (event_line, progress) = out.split_once('\n').unwrap();
        assert!(event_line.contains("\"type\":\"PhaseCompleted\""));
        assert_eq!(progress, "\rBreak 05:00    0.0%   ");
    }

    #[test]
    fn plain_tick_only_redraws_progress() {
        let mut timer = FocusTimer::new();
        timer.start();
        let event = timer.tick();
        assert!(event.is_none());
        let out = tick_output(event.as_ref(), &timer).unwrap();
        assert_eq!(out, "\rWork Session 24:59    0.1%   ");
    }

    #[test]
    fn rejects_unknown_and_trailing_words() {
        assert!(parse_command("skip").is_err());
        assert!(parse_command("start now").is_err());
    }
}
