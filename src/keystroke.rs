/// Semantic action derived from a raw key label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Advance/submit the current unit (Enter, or Space when space
    /// submission is enabled).
    Submit,
    Backspace,
    /// Printable single-character input.
    Char(char),
    /// Not typing input: modifier keys, function keys, events on
    /// editable host controls.
    Ignored,
}

/// Maps a raw key label to the character it produces, if any.
/// Control keys map to their textual equivalents; any other
/// multi-character label produces nothing.
pub fn key_to_char(label: &str) -> Option<char> {
    match label {
        "Enter" => Some('\n'),
        "Tab" => Some('\t'),
        "Space" => Some(' '),
        _ => {
            let mut chars = label.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
    }
}

/// Classifies a raw key event into a typing action.
///
/// Events targeting an editable host control are never typing input.
/// Multi-character labels other than the recognized control keys are
/// ignored and must not count as keystrokes.
pub fn classify(label: &str, target_editable: bool, space_submits: bool) -> KeyAction {
    if target_editable {
        return KeyAction::Ignored;
    }
    match label {
        "Enter" => KeyAction::Submit,
        "Backspace" => KeyAction::Backspace,
        " " | "Space" if space_submits => KeyAction::Submit,
        " " | "Space" => KeyAction::Char(' '),
        "Tab" => KeyAction::Char('\t'),
        _ => match key_to_char(label) {
            Some(c) => KeyAction::Char(c),
            None => KeyAction::Ignored,
        },
    }
}

/// Exact-match predicate between the expected character at the cursor
/// and a typed key label. Case-sensitive for visible characters.
pub fn is_match(expected: char, typed_label: &str) -> bool {
    key_to_char(typed_label) == Some(expected)
}
