//! Topic list screen for one forum, with the delete confirmation overlay.

use crate::bbs::roles::Role;
use crate::storage::{Forum, Topic};
use crate::tui::message::Key;
use crate::tui::theme;

#[derive(Debug, Clone)]
pub struct TopicsScreen {
    pub forum: Forum,
    pub topics: Vec<Topic>,
    pub cursor: usize,
    pub loading: bool,
    /// Delete confirmation overlay. While set, every binding except
    /// confirm/deny is suppressed.
    pub confirming_delete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopicsEvent {
    None,
    Open(Topic),
    NewTopic,
    /// Confirmed delete of the topic under the cursor.
    Delete { id: i64 },
    Back,
    Quit,
}

impl TopicsScreen {
    pub fn new(forum: Forum) -> Self {
        TopicsScreen {
            forum,
            topics: Vec::new(),
            cursor: 0,
            loading: true,
            confirming_delete: false,
        }
    }

    pub fn apply_loaded(&mut self, topics: Vec<Topic>) {
        self.topics = topics;
        self.loading = false;
        if self.cursor >= self.topics.len() {
            self.cursor = self.topics.len().saturating_sub(1);
        }
    }

    pub fn handle_key(&mut self, key: Key, role: Role) -> TopicsEvent {
        if self.confirming_delete {
            return match key {
                Key::Char('y') | Key::Char('Y') => {
                    self.confirming_delete = false;
                    match self.topics.get(self.cursor) {
                        Some(topic) => TopicsEvent::Delete { id: topic.id },
                        None => TopicsEvent::None,
                    }
                }
                Key::Char('n') | Key::Char('N') | Key::Esc => {
                    self.confirming_delete = false;
                    TopicsEvent::None
                }
                _ => TopicsEvent::None,
            };
        }

        match key {
            Key::Up | Key::Char('k') => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                TopicsEvent::None
            }
            Key::Down | Key::Char('j') => {
                if self.cursor + 1 < self.topics.len() {
                    self.cursor += 1;
                }
                TopicsEvent::None
            }
            Key::Enter => match self.topics.get(self.cursor) {
                Some(topic) => TopicsEvent::Open(topic.clone()),
                None => TopicsEvent::None,
            },
            Key::Char('n') => {
                if role.at_least(Role::Moderator) {
                    TopicsEvent::NewTopic
                } else {
                    TopicsEvent::None
                }
            }
            Key::Char('d') => {
                if role.at_least(Role::Moderator) && !self.topics.is_empty() {
                    self.confirming_delete = true;
                }
                TopicsEvent::None
            }
            Key::Esc => TopicsEvent::Back,
            Key::Char('q') | Key::CtrlC => TopicsEvent::Quit,
            _ => TopicsEvent::None,
        }
    }

    pub fn render(&self) -> String {
        let mut body = String::new();
        body.push_str(&theme::header(&format!("Topics in '{}'", self.forum.name)));
        body.push_str("\n\n");
        if self.loading {
            body.push_str("Loading topics...\n");
            return body;
        }
        if self.topics.is_empty() {
            body.push_str("No topics found.\n");
        } else {
            for (i, topic) in self.topics.iter().enumerate() {
                let line = format!("{} (by {})", topic.title, topic.author);
                body.push_str(&theme::list_line(i == self.cursor, &line));
                body.push('\n');
            }
        }
        if self.confirming_delete {
            if let Some(topic) = self.topics.get(self.cursor) {
                body.push_str(&format!(
                    "\nDelete topic '{}'? This removes all of its posts. (y/n)\n",
                    topic.title
                ));
            }
        }
        body
    }

    pub fn help(&self, role: Role) -> String {
        if self.confirming_delete {
            return "y confirm • n cancel".to_string();
        }
        let mut parts = vec!["↑/k up", "↓/j down", "enter open"];
        if role.at_least(Role::Moderator) {
            parts.push("n new");
            parts.push("d delete");
        }
        parts.push("esc back");
        parts.push("q quit");
        parts.join(" • ")
    }
}
