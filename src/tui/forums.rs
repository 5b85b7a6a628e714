//! Forum list screen: the entry point into the board hierarchy.

use crate::bbs::roles::Role;
use crate::storage::Forum;
use crate::tui::message::Key;
use crate::tui::theme;

#[derive(Debug, Clone)]
pub struct ForumsScreen {
    pub forums: Vec<Forum>,
    pub cursor: usize,
    pub loading: bool,
}

/// What the forum list asks the controller to do after a keystroke.
#[derive(Debug, Clone, PartialEq)]
pub enum ForumsEvent {
    None,
    Open(Forum),
    Back,
    Quit,
}

impl ForumsScreen {
    pub fn new() -> Self {
        ForumsScreen {
            forums: Vec::new(),
            cursor: 0,
            loading: true,
        }
    }

    /// Replace the list with freshly loaded data, keeping the cursor in
    /// bounds.
    pub fn apply_loaded(&mut self, forums: Vec<Forum>) {
        self.forums = forums;
        self.loading = false;
        if self.cursor >= self.forums.len() {
            self.cursor = self.forums.len().saturating_sub(1);
        }
    }

    pub fn handle_key(&mut self, key: Key, _role: Role) -> ForumsEvent {
        match key {
            Key::Up => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                ForumsEvent::None
            }
            Key::Down => {
                if self.cursor + 1 < self.forums.len() {
                    self.cursor += 1;
                }
                ForumsEvent::None
            }
            Key::Char('k') => self.handle_key(Key::Up, _role),
            Key::Char('j') => self.handle_key(Key::Down, _role),
            Key::Enter => match self.forums.get(self.cursor) {
                Some(forum) => ForumsEvent::Open(forum.clone()),
                None => ForumsEvent::None,
            },
            Key::Esc => ForumsEvent::Back,
            Key::Char('q') | Key::CtrlC => ForumsEvent::Quit,
            _ => ForumsEvent::None,
        }
    }

    pub fn render(&self) -> String {
        let mut body = String::new();
        if self.loading {
            body.push_str("Loading forums...\n");
            return body;
        }
        if self.forums.is_empty() {
            body.push_str("No forums yet.\n");
            return body;
        }
        for (i, forum) in self.forums.iter().enumerate() {
            let line = if forum.description.is_empty() {
                forum.name.clone()
            } else {
                format!("{} - {}", forum.name, forum.description)
            };
            body.push_str(&theme::list_line(i == self.cursor, &line));
            body.push('\n');
        }
        body
    }

    pub fn help(&self) -> &'static str {
        "↑/k up • ↓/j down • enter open • esc back • q quit"
    }
}
