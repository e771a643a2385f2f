//! Append-only message history.

use crate::core::message::DisplayMessage;

/// Insertion-ordered list of display messages.
///
/// Only `append` mutates. Nothing is ever edited, removed, reordered or
/// deduplicated, and there is no size bound.
#[derive(Debug, Default, Clone)]
pub struct MessageStore {
    messages: Vec<DisplayMessage>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: DisplayMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DisplayMessage> {
        self.messages.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DisplayMessage> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[DisplayMessage] {
        &self.messages
    }
}

impl<'a> IntoIterator for &'a MessageStore {
    type Item = &'a DisplayMessage;
    type IntoIter = std::slice::Iter<'a, DisplayMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
