//! Maps typed lines onto the game's controls.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Start,
    Prev,
    Next,
    Solve,
    Back,
    Restart,
    Cancel,
    Help,
    Quit,
    Unknown(String),
    /// Free text: a question, or the accusation choice while the dialog is open.
    Text(String),
}

pub fn parse_line(line: &str) -> UiCommand {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return UiCommand::Text(line.trim_end_matches(['\r', '\n']).to_string());
    };
    match command.to_ascii_lowercase().as_str() {
        "start" => UiCommand::Start,
        "prev" | "p" => UiCommand::Prev,
        "next" | "n" => UiCommand::Next,
        "solve" => UiCommand::Solve,
        "back" => UiCommand::Back,
        "restart" => UiCommand::Restart,
        "cancel" => UiCommand::Cancel,
        "help" | "?" => UiCommand::Help,
        "quit" | "exit" => UiCommand::Quit,
        _ => UiCommand::Unknown(trimmed.to_string()),
    }
}

pub const HELP: &str = "\
Commands:
  /start            begin the investigation
  /prev, /next      switch suspect
  /solve            accuse a suspect
  /back             return to the start screen
  /restart          play again from the first suspect
  /cancel           close the accusation prompt
  /quit             leave the game
Anything else you type on the game screen is asked to the current suspect.";
