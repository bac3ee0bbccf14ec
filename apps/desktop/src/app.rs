//! Event loop: typed lines and server frames, one at a time, against one controller.

use std::io::{self, Write};

use anyhow::Result;
use client_core::{
    transport::{Connection, TransportEvent},
    AccusationOutcome, ControllerError, FrameSink, GameController,
};
use shared::domain::Screen;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::{
    input::{parse_line, UiCommand, HELP},
    view::Renderer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<S: FrameSink> {
    game: GameController<S>,
    renderer: Renderer,
    connected: bool,
}

impl<S: FrameSink> App<S> {
    pub fn new(game: GameController<S>) -> Self {
        Self {
            game,
            renderer: Renderer::default(),
            connected: true,
        }
    }

    pub fn game(&self) -> &GameController<S> {
        &self.game
    }

    pub fn draw(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.renderer.refresh(&self.game, out)
    }

    pub fn on_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        let command = parse_line(line);
        debug!(?command, "ui command");

        if self.game.accusation_open() {
            return self.on_accusation_input(command, out);
        }

        let screen = self.game.screen();
        match command {
            UiCommand::Quit => return Ok(Flow::Quit),
            UiCommand::Help => writeln!(out, "{HELP}")?,
            UiCommand::Unknown(raw) => writeln!(out, "! unknown command {raw}, try /help")?,
            UiCommand::Start if screen == Screen::Start => self.game.start_game(),
            UiCommand::Restart if matches!(screen, Screen::Victory | Screen::Defeat) => {
                self.game.start_game()
            }
            UiCommand::Back if screen != Screen::Start => self.game.go_to_start(),
            UiCommand::Prev if screen == Screen::Game => {
                self.game.prev();
            }
            UiCommand::Next if screen == Screen::Game => {
                self.game.next();
            }
            UiCommand::Solve if screen == Screen::Game => match self.game.solve_case() {
                Ok(prompt) => {
                    writeln!(out, "{}", prompt.render())?;
                    writeln!(out, "Enter a number, or /cancel.")?;
                }
                Err(err) => self.report(&err, out)?,
            },
            UiCommand::Text(text) if screen == Screen::Game => {
                self.game.set_draft(text);
                if let Err(err) = self.game.submit_draft() {
                    self.report(&err, out)?;
                }
            }
            UiCommand::Text(text) if text.trim().is_empty() => {}
            _ => writeln!(out, "! not available on this screen, try /help")?,
        }
        self.draw(out)?;
        Ok(Flow::Continue)
    }

    fn on_accusation_input(
        &mut self,
        command: UiCommand,
        out: &mut impl Write,
    ) -> io::Result<Flow> {
        let choice = match command {
            UiCommand::Quit => return Ok(Flow::Quit),
            UiCommand::Cancel => None,
            UiCommand::Text(text) if text.trim().is_empty() => None,
            UiCommand::Text(text) => Some(text),
            _ => {
                writeln!(out, "! answer the accusation first, or /cancel")?;
                return Ok(Flow::Continue);
            }
        };

        match self.game.resolve_accusation(choice.as_deref()) {
            Ok(AccusationOutcome::Cancelled) => writeln!(out, "Accusation withdrawn.")?,
            Ok(AccusationOutcome::Solved { accused } | AccusationOutcome::Failed { accused }) => {
                info!(accused = %accused, screen = ?self.game.screen(), "accusation resolved");
            }
            Err(err) => self.report(&err, out)?,
        }
        self.draw(out)?;
        Ok(Flow::Continue)
    }

    pub fn on_transport(&mut self, event: TransportEvent, out: &mut impl Write) -> io::Result<()> {
        match event {
            TransportEvent::Frame(frame) => {
                let before = self.game.case_facts().cloned();
                match self.game.handle_frame(&frame) {
                    Ok(()) => {
                        let after = self.game.case_facts();
                        if after != before.as_ref() {
                            if let Some(facts) = after {
                                for name in &facts.missing_on_server {
                                    writeln!(out, "! the server does not know suspect {name}")?;
                                }
                            }
                            self.renderer.invalidate();
                        }
                    }
                    Err(err) => self.report(&err, out)?,
                }
            }
            TransportEvent::Failed(reason) => {
                writeln!(out, "! connection error: {reason}")?;
            }
            TransportEvent::Closed => {
                self.connected = false;
                writeln!(out, "! the game server closed the connection")?;
            }
        }
        // the Start screen has no briefing; skip redraws there
        if self.game.screen() != Screen::Start {
            self.draw(out)?;
        }
        Ok(())
    }

    fn report(&self, err: &ControllerError, out: &mut impl Write) -> io::Result<()> {
        warn!(%err, "action failed");
        writeln!(out, "! {err}")
    }
}

pub async fn run<S: FrameSink>(mut app: App<S>, mut conn: Connection) -> Result<()> {
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    info!(url = %conn.url, "interrogation session started");
    app.draw(&mut stdout)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                if app.on_line(&line, &mut stdout)? == Flow::Quit {
                    break;
                }
            }
            event = conn.next_event(), if app.connected => {
                match event {
                    Some(event) => app.on_transport(event, &mut stdout)?,
                    None => app.connected = false,
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
