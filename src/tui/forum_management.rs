//! Forum management screen for admins. Lists forums with create, edit and
//! delete actions; deletion asks for a y/n confirmation first.

use crate::storage::Forum;
use crate::tui::message::Key;
use crate::tui::theme;

#[derive(Debug, Clone)]
pub struct ForumManagementScreen {
    pub forums: Vec<Forum>,
    pub cursor: usize,
    pub loading: bool,
    pub confirming_delete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForumManagementEvent {
    None,
    NewForum,
    EditForum(Forum),
    Delete { id: i64 },
    Back,
    Quit,
}

impl ForumManagementScreen {
    pub fn new() -> Self {
        ForumManagementScreen {
            forums: Vec::new(),
            cursor: 0,
            loading: true,
            confirming_delete: false,
        }
    }

    pub fn apply_loaded(&mut self, forums: Vec<Forum>) {
        self.forums = forums;
        self.loading = false;
        self.confirming_delete = false;
        if self.cursor >= self.forums.len() {
            self.cursor = self.forums.len().saturating_sub(1);
        }
    }

    pub fn handle_key(&mut self, key: Key) -> ForumManagementEvent {
        if self.confirming_delete {
            return match key {
                Key::Char('y') | Key::Char('Y') => {
                    self.confirming_delete = false;
                    match self.forums.get(self.cursor) {
                        Some(forum) => ForumManagementEvent::Delete { id: forum.id },
                        None => ForumManagementEvent::None,
                    }
                }
                Key::Char('n') | Key::Char('N') | Key::Esc => {
                    self.confirming_delete = false;
                    ForumManagementEvent::None
                }
                _ => ForumManagementEvent::None,
            };
        }
        match key {
            Key::Up | Key::Char('k') => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                ForumManagementEvent::None
            }
            Key::Down | Key::Char('j') => {
                if self.cursor + 1 < self.forums.len() {
                    self.cursor += 1;
                }
                ForumManagementEvent::None
            }
            Key::Char('n') => ForumManagementEvent::NewForum,
            Key::Char('e') => match self.forums.get(self.cursor) {
                Some(forum) => ForumManagementEvent::EditForum(forum.clone()),
                None => ForumManagementEvent::None,
            },
            Key::Char('d') => {
                if !self.forums.is_empty() {
                    self.confirming_delete = true;
                }
                ForumManagementEvent::None
            }
            Key::Esc => ForumManagementEvent::Back,
            Key::Char('q') | Key::CtrlC => ForumManagementEvent::Quit,
            _ => ForumManagementEvent::None,
        }
    }

    pub fn render(&self) -> String {
        let mut body = String::from("Forum Management:\n\n");
        if self.loading {
            body.push_str("Loading forums...\n");
            return body;
        }
        if self.forums.is_empty() {
            body.push_str("No forums yet. Press 'n' to create one.\n");
        }
        for (i, forum) in self.forums.iter().enumerate() {
            let line = format!("{} - {}", forum.name, forum.description);
            body.push_str(&theme::list_line(i == self.cursor, &line));
            body.push('\n');
        }
        if self.confirming_delete {
            if let Some(forum) = self.forums.get(self.cursor) {
                body.push('\n');
                body.push_str(&theme::red(&format!(
                    "Delete forum '{}' and all its topics and posts? (y/n)",
                    forum.name
                )));
                body.push('\n');
            }
        }
        body
    }

    pub fn help(&self) -> &'static str {
        if self.confirming_delete {
            "y confirm • n cancel"
        } else {
            "↑/k up • ↓/j down • n new • e edit • d delete • esc back • q quit"
        }
    }
}
