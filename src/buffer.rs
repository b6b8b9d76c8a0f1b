//! Live text buffer mirroring the host input field.
//!
//! The buffer is the single owner of the in-progress message. Every mutator
//! returns the event the change produced; the coordinator routes that event
//! to the scheduler and reconciler synchronously, so no other component ever
//! writes the text.

/// Outcome of a buffer mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferEvent {
    /// The buffer changed and is non-empty; carries a snapshot of the text.
    Changed(String),
    /// The buffer became (or was made) empty. Consumers must treat this as
    /// "go to SAFE, cancel everything" - it bypasses debounce entirely.
    Cleared,
}

#[derive(Debug, Default)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text committed by the host keyboard (a character, or a chunk from
    /// autocorrect/paste).
    pub fn on_text_committed(&mut self, text: &str) -> BufferEvent {
        self.text.push_str(text);
        self.event_after_mutation()
    }

    /// Remove the last character.
    pub fn on_backspace(&mut self) -> BufferEvent {
        self.text.pop();
        self.event_after_mutation()
    }

    /// The host input field changed (focus moved, message sent).
    pub fn on_field_reset(&mut self) -> BufferEvent {
        self.text.clear();
        BufferEvent::Cleared
    }

    /// The editing session ended.
    pub fn on_session_end(&mut self) -> BufferEvent {
        self.text.clear();
        BufferEvent::Cleared
    }

    /// Re-align with the actual field content when the host reports a
    /// snapshot (cursor moves, external edits).
    pub fn sync(&mut self, snapshot: &str) -> BufferEvent {
        self.text = snapshot.to_string();
        self.event_after_mutation()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn event_after_mutation(&self) -> BufferEvent {
        if self.text.is_empty() {
            BufferEvent::Cleared
        } else {
            BufferEvent::Changed(self.text.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_emits_changed_snapshot() {
        let mut buffer = InputBuffer::new();
        assert_eq!(
            buffer.on_text_committed("hi"),
            BufferEvent::Changed("hi".into())
        );
        assert_eq!(
            buffer.on_text_committed(" there"),
            BufferEvent::Changed("hi there".into())
        );
    }

    #[test]
    fn test_backspace_is_char_aware() {
        let mut buffer = InputBuffer::new();
        buffer.on_text_committed("héé");
        buffer.on_backspace();
        assert_eq!(buffer.as_str(), "hé");
    }

    #[test]
    fn test_backspace_to_empty_emits_cleared() {
        let mut buffer = InputBuffer::new();
        buffer.on_text_committed("a");
        assert_eq!(buffer.on_backspace(), BufferEvent::Cleared);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_field_reset_always_clears() {
        let mut buffer = InputBuffer::new();
        buffer.on_text_committed("draft");
        assert_eq!(buffer.on_field_reset(), BufferEvent::Cleared);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_sync_replaces_content() {
        let mut buffer = InputBuffer::new();
        buffer.on_text_committed("stale");
        assert_eq!(
            buffer.sync("fresh text"),
            BufferEvent::Changed("fresh text".into())
        );
        assert_eq!(buffer.sync(""), BufferEvent::Cleared);
    }
}
