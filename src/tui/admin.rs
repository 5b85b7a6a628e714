//! Administration menu. Reachable only through the main menu entry that is
//! hidden from non-admin sessions; the menu itself is the gate.

use crate::tui::message::Key;
use crate::tui::theme;

#[derive(Debug, Clone)]
pub struct AdminScreen {
    pub cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminEvent {
    None,
    UserManagement,
    ForumManagement,
    Back,
}

const CHOICES: [(&str, &str); 2] = [
    ("User Management", "Edit, delete and change user roles"),
    ("Forum Management", "Create, edit and delete forums"),
];

impl AdminScreen {
    pub fn new() -> Self {
        AdminScreen { cursor: 0 }
    }

    pub fn handle_key(&mut self, key: Key) -> AdminEvent {
        match key {
            Key::Up | Key::Char('k') => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                AdminEvent::None
            }
            Key::Down | Key::Char('j') => {
                if self.cursor + 1 < CHOICES.len() {
                    self.cursor += 1;
                }
                AdminEvent::None
            }
            Key::Enter => match self.cursor {
                0 => AdminEvent::UserManagement,
                _ => AdminEvent::ForumManagement,
            },
            Key::Esc => AdminEvent::Back,
            _ => AdminEvent::None,
        }
    }

    pub fn render(&self) -> String {
        let mut body = String::from("Administration Menu\n\n");
        for (i, (title, desc)) in CHOICES.iter().enumerate() {
            body.push_str(&theme::list_line(i == self.cursor, title));
            body.push('\n');
            body.push_str("    ");
            body.push_str(&theme::faint(desc));
            body.push('\n');
        }
        body
    }

    pub fn help(&self) -> &'static str {
        "↑/k up • ↓/j down • enter select • esc back"
    }
}
