//! Settings menu. The choice list depends on the session role: everyone can
//! change their password, moderators can manage users, admins can create
//! accounts directly.

use crate::bbs::roles::Role;
use crate::tui::message::Key;
use crate::tui::theme;

#[derive(Debug, Clone)]
pub struct SettingsScreen {
    pub choices: Vec<&'static str>,
    pub cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    None,
    ChangePassword,
    ManageUsers,
    CreateUser,
    Back,
}

const CHANGE_PASSWORD: &str = "Change Password";
const MANAGE_USERS: &str = "Manage Users";
const CREATE_USER: &str = "Create New User";

impl SettingsScreen {
    pub fn new(role: Role) -> Self {
        let mut choices = vec![CHANGE_PASSWORD];
        if role.at_least(Role::Moderator) {
            choices.push(MANAGE_USERS);
        }
        if role == Role::Admin {
            choices.push(CREATE_USER);
        }
        SettingsScreen { choices, cursor: 0 }
    }

    pub fn handle_key(&mut self, key: Key) -> SettingsEvent {
        match key {
            Key::Up | Key::Char('k') => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                SettingsEvent::None
            }
            Key::Down | Key::Char('j') => {
                if self.cursor + 1 < self.choices.len() {
                    self.cursor += 1;
                }
                SettingsEvent::None
            }
            Key::Enter => match self.choices[self.cursor] {
                CHANGE_PASSWORD => SettingsEvent::ChangePassword,
                MANAGE_USERS => SettingsEvent::ManageUsers,
                CREATE_USER => SettingsEvent::CreateUser,
                _ => SettingsEvent::None,
            },
            Key::Esc => SettingsEvent::Back,
            _ => SettingsEvent::None,
        }
    }

    pub fn render(&self) -> String {
        let mut body = String::from("Select a settings option:\n\n");
        for (i, choice) in self.choices.iter().enumerate() {
            body.push_str(&theme::list_line(i == self.cursor, choice));
            body.push('\n');
        }
        body
    }

    pub fn help(&self) -> &'static str {
        "↑/k up • ↓/j down • enter select • esc back"
    }
}
