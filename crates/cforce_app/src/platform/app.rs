use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use cforce_core::{update, AppState, Msg, Page};
use cforce_engine::EngineHandle;
use cforce_logging::{cforce_debug, cforce_info};

use super::effects::EffectRunner;
use super::render;

const TICK_INTERVAL: Duration = Duration::from_millis(75);

/// One line of user input, interpreted against the active page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Messages(Vec<Msg>),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str, page: Page) -> Self {
        let line = line.trim();
        let msgs = match line {
            "/quit" | "/exit" => return Command::Quit,
            "/help" => return Command::Help,
            "" => Vec::new(),
            "/scan" => vec![Msg::PageSelected(Page::Scanner)],
            "/osint" => vec![Msg::PageSelected(Page::Osint)],
            "/trace" => vec![Msg::PageSelected(Page::IpExplorer)],
            "/assistant" | "/ask" => vec![Msg::PageSelected(Page::Assistant)],
            "/export" => vec![Msg::ExportClicked],
            text if page == Page::Assistant => {
                vec![Msg::ChatInputChanged(text.to_string()), Msg::ChatSubmitted]
            }
            text => vec![Msg::TargetChanged(text.to_string()), Msg::RunSubmitted],
        };
        Command::Messages(msgs)
    }
}

enum Input {
    Line(String),
    Closed,
}

pub fn run_app(engine: EngineHandle, start_page: Page) -> io::Result<()> {
    let runner = EffectRunner::new(engine);
    let (input_tx, input_rx) = mpsc::channel::<Input>();

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(Input::Line(line)).is_err() {
                return;
            }
        }
        let _ = input_tx.send(Input::Closed);
    });

    let mut state = AppState::new();
    let mut stdout = io::stdout();
    dispatch(&mut state, &runner, Msg::PageSelected(start_page));
    draw(&mut stdout, &state)?;

    loop {
        match input_rx.recv_timeout(TICK_INTERVAL) {
            Ok(Input::Line(line)) => match Command::parse(&line, state.page()) {
                Command::Quit => break,
                Command::Help => {
                    writeln!(stdout, "\n{}", render::HELP)?;
                    stdout.flush()?;
                }
                Command::Messages(msgs) => {
                    for msg in msgs {
                        dispatch(&mut state, &runner, msg);
                    }
                }
            },
            Ok(Input::Closed) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => dispatch(&mut state, &runner, Msg::Tick),
        }

        for msg in runner.drain() {
            dispatch(&mut state, &runner, msg);
        }
        if state.consume_dirty() {
            draw(&mut stdout, &state)?;
        }
    }

    cforce_info!("cforce session ended");
    Ok(())
}

fn dispatch(state: &mut AppState, runner: &EffectRunner, msg: Msg) {
    cforce_debug!("dispatch {:?}", msg_name(&msg));
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;
    runner.enqueue(effects);
}

fn draw(out: &mut impl Write, state: &AppState) -> io::Result<()> {
    out.write_all(render::render(&state.view()).as_bytes())?;
    out.flush()
}

fn msg_name(msg: &Msg) -> &'static str {
    match msg {
        Msg::PageSelected(_) => "PageSelected",
        Msg::TargetChanged(_) => "TargetChanged",
        Msg::RunSubmitted => "RunSubmitted",
        Msg::ProgressTick { .. } => "ProgressTick",
        Msg::PipelineSucceeded { .. } => "PipelineSucceeded",
        Msg::PipelineFailed { .. } => "PipelineFailed",
        Msg::RunSettled { .. } => "RunSettled",
        Msg::ChatInputChanged(_) => "ChatInputChanged",
        Msg::ChatSubmitted => "ChatSubmitted",
        Msg::AssistantReplied { .. } => "AssistantReplied",
        Msg::ExportClicked => "ExportClicked",
        Msg::ExportFinished(_) => "ExportFinished",
        Msg::Tick => "Tick",
        Msg::NoOp => "NoOp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_on_pipeline_page_runs_target() {
        assert_eq!(
            Command::parse("  example.com \n", Page::Osint),
            Command::Messages(vec![
                Msg::TargetChanged("example.com".to_string()),
                Msg::RunSubmitted
            ])
        );
    }

    #[test]
    fn text_on_assistant_page_is_a_question() {
        assert_eq!(
            Command::parse("what is HSTS?", Page::Assistant),
            Command::Messages(vec![
                Msg::ChatInputChanged("what is HSTS?".to_string()),
                Msg::ChatSubmitted
            ])
        );
    }

    #[test]
    fn slash_commands_are_page_independent() {
        for page in Page::ALL {
            assert_eq!(Command::parse("/quit", page), Command::Quit);
            assert_eq!(
                Command::parse("/trace", page),
                Command::Messages(vec![Msg::PageSelected(Page::IpExplorer)])
            );
            assert_eq!(
                Command::parse("/export", page),
                Command::Messages(vec![Msg::ExportClicked])
            );
        }
        assert_eq!(Command::parse("   ", Page::Scanner), Command::Messages(Vec::new()));
    }
}
