//! Terminal rendering of the active screen and incremental transcript output.

use std::io::{self, Write};

use client_core::{FrameSink, GameController};
use shared::domain::Screen;

const RULE: &str = "------------------------------------------------------------";

/// Remembers what has been printed so only new transcript lines are written
/// unless the screen or the suspect changed.
#[derive(Debug, Default)]
pub struct Renderer {
    shown: Option<(Screen, usize)>,
    printed: usize,
}

impl Renderer {
    pub fn refresh<S: FrameSink>(
        &mut self,
        game: &GameController<S>,
        out: &mut impl Write,
    ) -> io::Result<()> {
        let key = (game.screen(), game.current_index());
        if self.shown != Some(key) || game.transcript().len() < self.printed {
            self.shown = Some(key);
            self.printed = 0;
            render_screen(game, out)?;
        }
        if game.screen() == Screen::Game {
            for message in &game.transcript().messages()[self.printed..] {
                writeln!(out, "{}", message.render())?;
            }
            self.printed = game.transcript().len();
        }
        out.flush()
    }

    /// Forces a full redraw on the next refresh.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }
}

pub fn render_screen<S: FrameSink>(
    game: &GameController<S>,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    match game.screen() {
        Screen::Start => {
            writeln!(out, "THE MIDNIGHT CIRCUS")?;
            writeln!(out, "Someone has died under the big top. Type /start to investigate.")?;
        }
        Screen::Game => {
            if let Some(briefing) = game.case_facts().and_then(|c| c.briefing.as_deref()) {
                writeln!(out, "{briefing}")?;
                writeln!(out)?;
            }
            let suspect = game.current_suspect();
            writeln!(
                out,
                "Suspect {}  {} ({})",
                game.position_label(),
                suspect.name,
                suspect.role
            )?;
            writeln!(
                out,
                "{}  {}  /solve  /back",
                control("/prev", game.can_go_prev()),
                control("/next", game.can_go_next()),
            )?;
        }
        Screen::Victory => {
            writeln!(out, "CASE CLOSED. You caught the killer.")?;
            writeln!(out, "/back  /restart")?;
        }
        Screen::Defeat => {
            writeln!(out, "WRONG SUSPECT. The killer slipped away into the night.")?;
            writeln!(out, "/back  /restart")?;
        }
    }
    writeln!(out, "{RULE}")
}

fn control(label: &str, enabled: bool) -> String {
    if enabled {
        label.to_string()
    } else {
        format!("({label})")
    }
}
