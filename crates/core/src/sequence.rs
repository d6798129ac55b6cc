//! Character frames supplied by the sequence interpreter.
//!
//! The engine does not animate characters itself. Whatever runs the character
//! sequence tables implements [`SequenceInterpreter`]; the image list builder reads
//! one [`CharacterFrame`] per character per cycle.

use crate::types::{ActionCode, CharacterIdentity, Facing};

/// Current frame of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacterFrame {
    pub identity: CharacterIdentity,
    pub screen: u8,
    /// Position in bytes/lines before the frame delta is applied.
    pub x: i16,
    pub y: i16,
    /// Frame image within the identity's sprite set.
    pub image: u8,
    pub face: Facing,
    pub action: ActionCode,
    /// Per-frame positional delta `(dx, dy)`.
    pub delta: (i8, i8),
}

impl CharacterFrame {
    /// Draw position after the frame delta.
    pub fn position(&self) -> (i16, i16) {
        (self.x + self.delta.0 as i16, self.y + self.delta.1 as i16)
    }
}

pub trait SequenceInterpreter {
    fn character_count(&self) -> usize;

    /// Frame of the character in `slot`, or `None` if the slot is inactive.
    fn character(&self, slot: usize) -> Option<CharacterFrame>;
}

/// Interpreter for scenes without characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCharacters;

impl SequenceInterpreter for NoCharacters {
    fn character_count(&self) -> usize {
        0
    }

    fn character(&self, _slot: usize) -> Option<CharacterFrame> {
        None
    }
}

/// Fixed set of frames, e.g. a scripted scene or a test fixture.
impl SequenceInterpreter for [CharacterFrame] {
    fn character_count(&self) -> usize {
        self.len()
    }

    fn character(&self, slot: usize) -> Option<CharacterFrame> {
        self.get(slot).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_applies_to_position() {
        let f = CharacterFrame {
            identity: CharacterIdentity::Kid,
            screen: 1,
            x: 20,
            y: 118,
            image: 15,
            face: Facing::Right,
            action: ActionCode::STAND,
            delta: (-2, 1),
        };
        assert_eq!(f.position(), (18, 119));
    }

    #[test]
    fn slice_interpreter() {
        let frames: [CharacterFrame; 0] = [];
        assert_eq!(frames[..].character_count(), 0);
        assert!(NoCharacters.character(0).is_none());
    }
}
