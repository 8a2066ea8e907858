//! Persona file loader.
//!
//! The persona is a small JSON document read once at startup:
//! `{"name"?, "system_instruction", "examples"?: [{"user", "bot"}]}`.

use std::io::ErrorKind;
use std::path::Path;

use windveal_types::error::PersonaError;
use windveal_types::persona::Persona;

/// Read and validate a persona file.
pub async fn load_persona(path: &Path) -> Result<Persona, PersonaError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => PersonaError::NotFound(path.display().to_string()),
        _ => PersonaError::Io(format!("{}: {e}", path.display())),
    })?;

    let persona: Persona = serde_json::from_str(&raw)
        .map_err(|e| PersonaError::Invalid(format!("{}: {e}", path.display())))?;

    if persona.system_instruction.trim().is_empty() {
        return Err(PersonaError::Invalid(format!(
            "{}: system_instruction is empty",
            path.display()
        )));
    }

    let skipped = persona.examples.len() - persona.usable_examples().count();
    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "Ignoring incomplete persona examples");
    }

    Ok(persona)
}

/// Like [`load_persona`], but a missing file yields the built-in persona.
///
/// Unreadable or malformed files are still errors.
pub async fn load_persona_or_default(path: &Path) -> Result<Persona, PersonaError> {
    match load_persona(path).await {
        Err(PersonaError::NotFound(_)) => {
            tracing::warn!(path = %path.display(), "Persona file not found, using built-in persona");
            Ok(Persona::default())
        }
        other => other,
    }
}
