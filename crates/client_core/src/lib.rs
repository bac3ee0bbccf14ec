use serde_json::Value;
use shared::{
    domain::{Roster, Screen, Suspect},
    error::ValidationError,
    protocol::{character_names, ClientFrame, ServerEvent},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub mod error;
pub mod transcript;
pub mod transport;

pub use error::{ControllerError, TransportError};
pub use transcript::{ChatMessage, Transcript};

/// Outbound half of the live connection.
pub trait FrameSink {
    fn send_frame(&self, frame: ClientFrame) -> Result<(), TransportError>;
}

impl FrameSink for mpsc::UnboundedSender<ClientFrame> {
    fn send_frame(&self, frame: ClientFrame) -> Result<(), TransportError> {
        self.send(frame).map_err(|_| TransportError::Closed)
    }
}

/// Case setup delivered once by the server's `intro` event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseFacts {
    pub briefing: Option<String>,
    pub killer: Option<String>,
    pub characters: Value,
    /// Local suspects the server did not list. Empty when the server sent no names.
    pub missing_on_server: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccusationPrompt {
    pub title: String,
    pub options: Vec<String>,
}

impl AccusationPrompt {
    pub fn render(&self) -> String {
        let mut out = self.title.clone();
        for (i, name) in self.options.iter().enumerate() {
            out.push_str(&format!("\n{}. {name}", i + 1));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccusationOutcome {
    Solved { accused: String },
    Failed { accused: String },
    Cancelled,
}

/// Owns every piece of client-side game state. All mutation goes through
/// its methods, which are called from UI handlers and inbound-frame handlers.
///
/// Replies carry no correlation id: an `answer` is attributed to whichever
/// suspect is selected when it arrives, not to the one that was asked.
pub struct GameController<S: FrameSink> {
    roster: Roster,
    sink: S,
    screen: Screen,
    current: usize,
    transcript: Transcript,
    draft: String,
    case: Option<CaseFacts>,
    accusation_open: bool,
}

impl<S: FrameSink> GameController<S> {
    pub fn new(roster: Roster, sink: S) -> Self {
        Self {
            roster,
            sink,
            screen: Screen::Start,
            current: 0,
            transcript: Transcript::default(),
            draft: String::new(),
            case: None,
            accusation_open: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_active(&self, screen: Screen) -> bool {
        self.screen == screen
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_suspect(&self) -> &Suspect {
        // index is clamped to the roster on every move and the roster is never empty
        &self.roster.suspects()[self.current]
    }

    /// 1-indexed "position/total" label.
    pub fn position_label(&self) -> String {
        format!("{}/{}", self.current + 1, self.roster.len())
    }

    pub fn can_go_prev(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current < self.roster.last_index()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn case_facts(&self) -> Option<&CaseFacts> {
        self.case.as_ref()
    }

    pub fn accusation_open(&self) -> bool {
        self.accusation_open
    }

    pub fn go_to_start(&mut self) {
        self.switch_screen(Screen::Start);
    }

    pub fn start_game(&mut self) {
        self.switch_screen(Screen::Game);
        self.load_suspect(0);
    }

    pub fn prev(&mut self) -> bool {
        if self.screen != Screen::Game || !self.can_go_prev() {
            return false;
        }
        self.move_to(self.current - 1);
        true
    }

    pub fn next(&mut self) -> bool {
        if self.screen != Screen::Game || !self.can_go_next() {
            return false;
        }
        self.move_to(self.current + 1);
        true
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Enter / send-button handler for the question input.
    pub fn submit_draft(&mut self) -> Result<bool, ControllerError> {
        let draft = self.draft.clone();
        self.send_question(&draft)
    }

    /// Returns `Ok(false)` without side effects for blank input or when no
    /// interrogation is on screen.
    pub fn send_question(&mut self, text: &str) -> Result<bool, ControllerError> {
        let question = text.trim();
        if question.is_empty() || self.screen != Screen::Game {
            return Ok(false);
        }

        self.transcript.push_detective(question);
        self.draft.clear();

        let suspect = self.current_suspect().name.clone();
        debug!(suspect = %suspect, "sending question");
        self.sink.send_frame(ClientFrame::Route { suspect })?;
        self.sink.send_frame(ClientFrame::Question {
            text: question.to_string(),
        })?;
        Ok(true)
    }

    /// Parses and applies one inbound text frame. Malformed frames leave state untouched.
    pub fn handle_frame(&mut self, frame: &str) -> Result<(), ControllerError> {
        let event = ServerEvent::parse(frame).inspect_err(|err| {
            warn!(%err, frame_len = frame.len(), "dropping malformed server frame");
        })?;
        self.apply_event(event);
        Ok(())
    }

    pub fn apply_event(&mut self, event: ServerEvent) {
        debug!(kind = event.kind(), "applying server event");
        match event {
            ServerEvent::Intro {
                message,
                characters,
                killer,
            } => {
                if self.case.is_some() {
                    info!("replacing case facts from a repeated intro");
                }
                let missing_on_server = self.reconcile_roster(&characters);
                self.case = Some(CaseFacts {
                    briefing: message,
                    killer,
                    characters,
                    missing_on_server,
                });
            }
            ServerEvent::Answer { message } => {
                let name = self.current_suspect().name.clone();
                self.transcript.push_suspect(&name, message);
            }
            ServerEvent::Other => {}
        }
    }

    /// Opens the accusation dialog and returns the numbered roster to show.
    /// Only available on the game screen.
    pub fn solve_case(&mut self) -> Result<AccusationPrompt, ControllerError> {
        self.ensure_in_game()?;
        self.accusation_open = true;
        Ok(AccusationPrompt {
            title: "Who is the killer?".to_string(),
            options: self.roster.iter().map(|s| s.name.clone()).collect(),
        })
    }

    /// Closes the dialog. `None` means the player cancelled.
    ///
    /// An invalid choice aborts with a validation error and leaves the screen
    /// as it was; the player may open the dialog again.
    pub fn resolve_accusation(
        &mut self,
        choice: Option<&str>,
    ) -> Result<AccusationOutcome, ControllerError> {
        if !self.accusation_open {
            return Err(ControllerError::NoAccusationOpen);
        }
        self.accusation_open = false;
        self.ensure_in_game()?;

        let Some(choice) = choice else {
            return Ok(AccusationOutcome::Cancelled);
        };

        let max = self.roster.len();
        let accused = choice
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=max).contains(n))
            .and_then(|n| self.roster.get(n - 1))
            .ok_or_else(|| ValidationError::InvalidChoice {
                input: choice.to_string(),
                max,
            })?
            .name
            .clone();

        let killer = self.case.as_ref().and_then(|c| c.killer.as_deref());
        if killer.is_none() {
            warn!("accusation judged before the server sent case facts");
        }

        if killer == Some(accused.as_str()) {
            self.switch_screen(Screen::Victory);
            Ok(AccusationOutcome::Solved { accused })
        } else {
            self.switch_screen(Screen::Defeat);
            Ok(AccusationOutcome::Failed { accused })
        }
    }

    fn ensure_in_game(&self) -> Result<(), ControllerError> {
        if self.screen != Screen::Game {
            return Err(ControllerError::NotInGame {
                screen: self.screen,
            });
        }
        Ok(())
    }

    fn switch_screen(&mut self, screen: Screen) {
        self.accusation_open = false;
        self.screen = screen;
        debug!(?screen, "screen switched");
    }

    fn move_to(&mut self, index: usize) {
        self.load_suspect(index);
        self.transcript.push_system(format!(
            "Switching to suspect {} of {}",
            index + 1,
            self.roster.len()
        ));
    }

    fn load_suspect(&mut self, index: usize) {
        self.current = index.min(self.roster.last_index());
        self.transcript.clear();
    }

    fn reconcile_roster(&self, characters: &Value) -> Vec<String> {
        let server_names = character_names(characters);
        if server_names.is_empty() {
            return Vec::new();
        }
        let missing: Vec<String> = self
            .roster
            .iter()
            .filter(|s| !server_names.iter().any(|n| n == &s.name))
            .map(|s| s.name.clone())
            .collect();
        for name in &missing {
            warn!(suspect = %name, "local suspect is not known to the server");
        }
        missing
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
