use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suspect {
    pub name: String,
    pub role: String,
}

impl Suspect {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Detective,
    Suspect,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Start,
    Game,
    Victory,
    Defeat,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Start, Screen::Game, Screen::Victory, Screen::Defeat];
}

/// Ordered, non-empty suspect list. Order drives navigation and numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RosterFile", into = "RosterFile")]
pub struct Roster {
    suspects: Vec<Suspect>,
}

impl Roster {
    pub fn new(suspects: Vec<Suspect>) -> Result<Self, ValidationError> {
        if suspects.is_empty() {
            return Err(ValidationError::EmptyRoster);
        }
        if let Some(blank) = suspects.iter().position(|s| s.name.trim().is_empty()) {
            return Err(ValidationError::BlankSuspectName { position: blank + 1 });
        }
        Ok(Self { suspects })
    }

    /// The circus cast the interrogation server ships with.
    pub fn circus() -> Self {
        Self {
            suspects: vec![
                Suspect::new("Jack Domador", "Domador"),
                Suspect::new("Madame Seraphine", "Vidente"),
                Suspect::new("Mefisto Bombita", "Payaso"),
                Suspect::new("Silvana Funambula", "Equilibrista"),
                Suspect::new("Ñopin Desfijo", "Director y maestro de ceremonias"),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.suspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suspects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Suspect> {
        self.suspects.get(index)
    }

    pub fn suspects(&self) -> &[Suspect] {
        &self.suspects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Suspect> {
        self.suspects.iter()
    }

    pub fn last_index(&self) -> usize {
        self.suspects.len() - 1
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::circus()
    }
}

/// On-disk shape of a roster file: a list of `[[suspects]]` tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterFile {
    pub suspects: Vec<Suspect>,
}

impl TryFrom<RosterFile> for Roster {
    type Error = ValidationError;

    fn try_from(value: RosterFile) -> Result<Self, Self::Error> {
        Roster::new(value.suspects)
    }
}

impl From<Roster> for RosterFile {
    fn from(value: Roster) -> Self {
        Self {
            suspects: value.suspects,
        }
    }
}
