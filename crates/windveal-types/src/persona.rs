//! Persona: the identity-priming text prepended to every provider call.

use serde::{Deserialize, Serialize};

/// A few-shot example exchange from the persona file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaExample {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub bot: String,
}

/// Fixed system instruction and examples, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Display name the assistant answers to.
    #[serde(default = "default_persona_name")]
    pub name: String,
    pub system_instruction: String,
    #[serde(default)]
    pub examples: Vec<PersonaExample>,
}

fn default_persona_name() -> String {
    "WindVeal".to_string()
}

impl Persona {
    /// Examples with both sides present. Half-filled entries are skipped.
    pub fn usable_examples(&self) -> impl Iterator<Item = &PersonaExample> {
        self.examples
            .iter()
            .filter(|ex| !ex.user.trim().is_empty() && !ex.bot.trim().is_empty())
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: default_persona_name(),
            system_instruction: "You are WindVeal, a friendly and helpful chat assistant. \
                Answer clearly and concisely, and always respond as WindVeal."
                .to_string(),
            examples: Vec::new(),
        }
    }
}
