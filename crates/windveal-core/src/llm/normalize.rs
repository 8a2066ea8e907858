//! History normalization.
//!
//! Turns a persona plus an ordered conversation into what an upstream
//! provider expects: either a role-tagged dialogue or a single flattened
//! prompt string ending in an `"Assistant:"` cue. None of these functions can
//! fail; unknown roles were already coerced to `user` when the turns were
//! deserialized.

use windveal_types::chat::{ChatTurn, TurnRole};
use windveal_types::llm::{DialogueMessage, DialogueRole};
use windveal_types::persona::Persona;

/// Cue that ends a flattened prompt. The provider continues from here.
pub const ASSISTANT_CUE: &str = "Assistant:";

/// How the persona's system instruction enters a dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPlacement {
    /// As a leading `system` message.
    Native,
    /// As a leading user/assistant exchange, for providers without a system role.
    SyntheticExchange,
}

/// Persona messages that precede the real history: the system instruction
/// followed by every usable example pair.
pub fn persona_preamble(persona: &Persona, placement: SystemPlacement) -> Vec<DialogueMessage> {
    let mut messages = match placement {
        SystemPlacement::Native => vec![DialogueMessage::new(
            DialogueRole::System,
            persona.system_instruction.clone(),
        )],
        SystemPlacement::SyntheticExchange => vec![
            DialogueMessage::new(
                DialogueRole::User,
                format!("System Instruction: {}", persona.system_instruction),
            ),
            DialogueMessage::new(
                DialogueRole::Assistant,
                format!("Understood. I will act as {}.", persona.name),
            ),
        ],
    };

    for example in persona.usable_examples() {
        messages.push(DialogueMessage::new(DialogueRole::User, example.user.clone()));
        messages.push(DialogueMessage::new(
            DialogueRole::Assistant,
            example.bot.clone(),
        ));
    }

    messages
}

/// Full dialogue: persona preamble, then history in order, then the new
/// user message.
pub fn dialogue_messages(
    persona: &Persona,
    history: &[ChatTurn],
    message: &str,
    placement: SystemPlacement,
) -> Vec<DialogueMessage> {
    let mut messages = persona_preamble(persona, placement);
    messages.reserve(history.len() + 1);
    messages.extend(
        history
            .iter()
            .map(|turn| DialogueMessage::new(turn.role.into(), turn.content.clone())),
    );
    messages.push(DialogueMessage::new(DialogueRole::User, message));
    messages
}

fn role_label(role: TurnRole) -> &'static str {
    match role {
        TurnRole::User => "User",
        TurnRole::Bot => "Assistant",
    }
}

/// Single-string prompt for providers without structured roles.
///
/// Layout: system instruction, a blank line, one `"<Role>: <content>"` line
/// per history turn, the new `"User: <message>"` line, and a final
/// `"Assistant:"` cue.
pub fn flattened_prompt(persona: &Persona, history: &[ChatTurn], message: &str) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(history.len() + 4);
    lines.push(persona.system_instruction.clone());
    lines.push(String::new());
    for turn in history {
        lines.push(format!("{}: {}", role_label(turn.role), turn.content));
    }
    lines.push(format!("User: {message}"));
    lines.push(ASSISTANT_CUE.to_string());
    lines.join("\n")
}

/// Recover the newly generated reply from a response that echoes the prompt.
///
/// Takes the text after the last `"Assistant:"` cue, trimmed. When the cue is
/// absent, or nothing follows it, the whole text (trimmed) is returned.
pub fn strip_echoed_prompt(text: &str) -> &str {
    match text.rfind(ASSISTANT_CUE) {
        Some(idx) => {
            let suffix = text[idx + ASSISTANT_CUE.len()..].trim();
            if suffix.is_empty() { text.trim() } else { suffix }
        }
        None => text.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windveal_types::persona::PersonaExample;

    fn persona() -> Persona {
        Persona {
            name: "WindVeal".to_string(),
            system_instruction: "You are WindVeal.".to_string(),
            examples: vec![PersonaExample {
                user: "Who are you?".to_string(),
                bot: "I am WindVeal.".to_string(),
            }],
        }
    }

    fn history() -> Vec<ChatTurn> {
        vec![
            ChatTurn::user("hello"),
            ChatTurn::bot("hi there"),
            ChatTurn::user("what's up"),
            ChatTurn::bot("not much"),
        ]
    }

    #[test]
    fn test_native_placement_leads_with_system() {
        let messages = dialogue_messages(&persona(), &[], "Hi", SystemPlacement::Native);
        assert_eq!(messages[0].role, DialogueRole::System);
        assert_eq!(messages[0].content, "You are WindVeal.");
        // system + one example pair + new message
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[3], DialogueMessage::new(DialogueRole::User, "Hi"));
    }

    #[test]
    fn test_synthetic_exchange_establishes_identity() {
        let messages =
            dialogue_messages(&persona(), &[], "Hi", SystemPlacement::SyntheticExchange);
        assert_eq!(messages[0].role, DialogueRole::User);
        assert_eq!(messages[0].content, "System Instruction: You are WindVeal.");
        assert_eq!(messages[1].role, DialogueRole::Assistant);
        assert_eq!(messages[1].content, "Understood. I will act as WindVeal.");
        assert_eq!(messages[2].content, "Who are you?");
        assert_eq!(messages[3].content, "I am WindVeal.");
        assert!(messages.iter().all(|m| m.role != DialogueRole::System));
    }

    #[test]
    fn test_history_order_preserved_after_preamble() {
        let persona = persona();
        let history = history();
        for placement in [SystemPlacement::Native, SystemPlacement::SyntheticExchange] {
            let preamble_len = persona_preamble(&persona, placement).len();
            let messages = dialogue_messages(&persona, &history, "next", placement);
            for (i, turn) in history.iter().enumerate() {
                let mapped = &messages[preamble_len + i];
                assert_eq!(mapped.content, turn.content);
                assert_eq!(mapped.role, DialogueRole::from(turn.role));
            }
            assert_eq!(messages.len(), preamble_len + history.len() + 1);
        }
    }

    #[test]
    fn test_empty_history_is_zero_turns() {
        let persona = persona();
        let preamble_len = persona_preamble(&persona, SystemPlacement::Native).len();
        let messages = dialogue_messages(&persona, &[], "solo", SystemPlacement::Native);
        assert_eq!(messages.len(), preamble_len + 1);
    }

    #[test]
    fn test_flattened_prompt_layout() {
        let history = vec![ChatTurn::user("hello"), ChatTurn::bot("hi there")];
        let prompt = flattened_prompt(&persona(), &history, "how are you?");
        assert_eq!(
            prompt,
            "You are WindVeal.\n\nUser: hello\nAssistant: hi there\nUser: how are you?\nAssistant:"
        );
    }

    #[test]
    fn test_flattened_prompt_without_history() {
        let prompt = flattened_prompt(&persona(), &[], "Hi");
        assert_eq!(prompt, "You are WindVeal.\n\nUser: Hi\nAssistant:");
    }

    #[test]
    fn test_strip_recovers_generated_suffix() {
        let history = history();
        let prompt = flattened_prompt(&persona(), &history, "and now?");
        let echoed = format!("{prompt} Fine, thanks for asking!");
        assert_eq!(strip_echoed_prompt(&echoed), "Fine, thanks for asking!");
    }

    #[test]
    fn test_strip_uses_last_marker() {
        let text = "Assistant: old\nUser: q\nAssistant:   new answer  ";
        assert_eq!(strip_echoed_prompt(text), "new answer");
    }

    #[test]
    fn test_strip_without_marker_returns_whole_text() {
        assert_eq!(strip_echoed_prompt("  just a reply \n"), "just a reply");
    }

    #[test]
    fn test_strip_with_empty_suffix_falls_back() {
        assert_eq!(strip_echoed_prompt("User: hi\nAssistant:  "), "User: hi\nAssistant:");
    }
}
