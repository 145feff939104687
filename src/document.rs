//! The text a host edits, and a plain in-memory implementation with undo.

use std::ops::Range;

use crate::error::EditError;

/// A replacement of a byte range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    /// The replaced range, in bytes.
    pub range: Range<usize>,
    /// The new text.
    pub text: String,
}

impl TextEdit {
    /// Apply the edit to `text`.
    pub fn apply(&self, text: &mut String) -> Result<(), EditError> {
        let Range { start, end } = self.range;

        if start > end || end > text.len() {
            return Err(EditError::OutOfBounds {
                range: self.range.clone(),
                length: text.len(),
            });
        }
        for offset in [start, end] {
            if !text.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary(offset));
            }
        }

        text.replace_range(start..end, &self.text);
        Ok(())
    }
}

/// A document edits are written to.
pub trait Document {
    /// The current text.
    fn text(&self) -> &str;

    /// Replace a range as one undoable step labelled `command`.
    fn replace(&mut self, command: &str, edit: TextEdit) -> Result<(), EditError>;
}

struct UndoStep {
    command: String,
    text: String,
}

/// A [`Document`] kept in memory. Consecutive edits with the same command
/// label are merged into one undo step until [`TextDocument::finish_command`]
/// is called.
#[derive(Default)]
pub struct TextDocument {
    text: String,
    undo: Vec<UndoStep>,
    open: bool,
}

impl TextDocument {
    /// Create a document holding `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            undo: Vec::new(),
            open: false,
        }
    }

    /// Close the current command, so the next edit starts a new undo step.
    pub fn finish_command(&mut self) {
        self.open = false;
    }

    /// The number of steps that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Revert the last step. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.open = false;
        match self.undo.pop() {
            Some(step) => {
                self.text = step.text;
                true
            }
            None => false,
        }
    }
}

impl Document for TextDocument {
    fn text(&self) -> &str {
        &self.text
    }

    fn replace(&mut self, command: &str, edit: TextEdit) -> Result<(), EditError> {
        let before = self.text.clone();
        edit.apply(&mut self.text)?;

        let merge = self.open
            && self
                .undo
                .last()
                .map(|step| step.command == command)
                .unwrap_or(false);
        if !merge {
            self.undo.push(UndoStep {
                command: command.to_string(),
                text: before,
            });
        }
        self.open = true;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(range: Range<usize>, text: &str) -> TextEdit {
        TextEdit {
            range,
            text: text.to_string(),
        }
    }

    #[test]
    fn apply() {
        let mut text = String::from("rgb(0.5)");
        edit(3..8, "(0.1, 0.2, 0.3)").apply(&mut text).unwrap();
        assert_eq!(text, "rgb(0.1, 0.2, 0.3)");

        assert_eq!(
            edit(3..40, "").apply(&mut text),
            Err(EditError::OutOfBounds {
                range: 3..40,
                length: 18
            })
        );
        let mut accented = String::from("é");
        assert_eq!(
            edit(1..2, "").apply(&mut accented),
            Err(EditError::NotCharBoundary(1))
        );
    }

    #[test]
    fn edits_merge_until_the_command_finishes() {
        let mut document = TextDocument::new("abc");
        document.replace("Change color", edit(0..1, "x")).unwrap();
        document.replace("Change color", edit(1..2, "y")).unwrap();
        assert_eq!(document.text(), "xyc");
        assert_eq!(document.undo_depth(), 1);

        document.finish_command();
        document.replace("Change color", edit(2..3, "z")).unwrap();
        assert_eq!(document.undo_depth(), 2);

        assert!(document.undo());
        assert_eq!(document.text(), "xyc");
        assert!(document.undo());
        assert_eq!(document.text(), "abc");
        assert!(!document.undo());
    }

    #[test]
    fn other_commands_start_new_steps() {
        let mut document = TextDocument::new("abc");
        document.replace("Change color", edit(0..1, "x")).unwrap();
        document.replace("Rename", edit(1..2, "y")).unwrap();
        assert_eq!(document.undo_depth(), 2);
    }

    #[test]
    fn failed_edits_leave_no_step() {
        let mut document = TextDocument::new("abc");
        assert!(document.replace("Change color", edit(2..9, "x")).is_err());
        assert_eq!(document.undo_depth(), 0);
        assert_eq!(document.text(), "abc");
    }
}
