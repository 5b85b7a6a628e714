//! User management screen with its three-state sub-machine:
//! Browsing → ActionSelect → RoleSelect.
//!
//! Reachable both from the admin menu and from the moderator-visible
//! settings entry. No role re-check happens at the action level; the menus
//! that lead here are the only gates (observed behavior, kept as-is).

use crate::bbs::roles::Role;
use crate::storage::UserRecord;
use crate::tui::message::Key;
use crate::tui::theme;

/// Default password applied by the "Reset Password" action.
pub const RESET_PASSWORD_DEFAULT: &str = "password";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UmMode {
    Browsing,
    ActionSelect,
    RoleSelect,
}

#[derive(Debug, Clone)]
pub struct UserManagementScreen {
    pub users: Vec<UserRecord>,
    pub cursor: usize,
    pub mode: UmMode,
    pub selected: Option<UserRecord>,
    pub action_cursor: usize,
    pub role_cursor: usize,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserManagementEvent {
    None,
    SetRole { username: String, role: Role },
    DeleteUser { username: String },
    ResetPassword { username: String },
    Back,
}

const ACTIONS: [&str; 3] = ["Change Role", "Delete User", "Reset Password"];
const ROLES: [Role; 3] = [Role::User, Role::Moderator, Role::Admin];

impl UserManagementScreen {
    pub fn new() -> Self {
        UserManagementScreen {
            users: Vec::new(),
            cursor: 0,
            mode: UmMode::Browsing,
            selected: None,
            action_cursor: 0,
            role_cursor: 0,
            loading: true,
        }
    }

    pub fn apply_loaded(&mut self, users: Vec<UserRecord>) {
        self.users = users;
        self.loading = false;
        if self.cursor >= self.users.len() {
            self.cursor = self.users.len().saturating_sub(1);
        }
    }

    pub fn handle_key(&mut self, key: Key) -> UserManagementEvent {
        match self.mode {
            UmMode::Browsing => self.handle_browsing(key),
            UmMode::ActionSelect => self.handle_action_select(key),
            UmMode::RoleSelect => self.handle_role_select(key),
        }
    }

    fn handle_browsing(&mut self, key: Key) -> UserManagementEvent {
        match key {
            Key::Up | Key::Char('k') => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                UserManagementEvent::None
            }
            Key::Down | Key::Char('j') => {
                if self.cursor + 1 < self.users.len() {
                    self.cursor += 1;
                }
                UserManagementEvent::None
            }
            Key::Enter => {
                if let Some(user) = self.users.get(self.cursor) {
                    self.selected = Some(user.clone());
                    self.mode = UmMode::ActionSelect;
                    self.action_cursor = 0;
                }
                UserManagementEvent::None
            }
            Key::Esc => UserManagementEvent::Back,
            _ => UserManagementEvent::None,
        }
    }

    fn handle_action_select(&mut self, key: Key) -> UserManagementEvent {
        match key {
            Key::Up | Key::Char('k') => {
                if self.action_cursor > 0 {
                    self.action_cursor -= 1;
                }
                UserManagementEvent::None
            }
            Key::Down | Key::Char('j') => {
                if self.action_cursor + 1 < ACTIONS.len() {
                    self.action_cursor += 1;
                }
                UserManagementEvent::None
            }
            Key::Enter => {
                let Some(user) = self.selected.clone() else {
                    self.mode = UmMode::Browsing;
                    return UserManagementEvent::None;
                };
                match self.action_cursor {
                    0 => {
                        self.mode = UmMode::RoleSelect;
                        self.role_cursor = 0;
                        UserManagementEvent::None
                    }
                    1 => {
                        // Delete commits immediately and returns to Browsing.
                        self.mode = UmMode::Browsing;
                        self.selected = None;
                        UserManagementEvent::DeleteUser {
                            username: user.username,
                        }
                    }
                    _ => {
                        self.mode = UmMode::Browsing;
                        self.selected = None;
                        UserManagementEvent::ResetPassword {
                            username: user.username,
                        }
                    }
                }
            }
            Key::Esc => {
                self.mode = UmMode::Browsing;
                self.selected = None;
                UserManagementEvent::None
            }
            _ => UserManagementEvent::None,
        }
    }

    fn handle_role_select(&mut self, key: Key) -> UserManagementEvent {
        match key {
            Key::Up | Key::Char('k') => {
                if self.role_cursor > 0 {
                    self.role_cursor -= 1;
                }
                UserManagementEvent::None
            }
            Key::Down | Key::Char('j') => {
                if self.role_cursor + 1 < ROLES.len() {
                    self.role_cursor += 1;
                }
                UserManagementEvent::None
            }
            Key::Enter => {
                let Some(user) = self.selected.take() else {
                    self.mode = UmMode::Browsing;
                    return UserManagementEvent::None;
                };
                self.mode = UmMode::Browsing;
                UserManagementEvent::SetRole {
                    username: user.username,
                    role: ROLES[self.role_cursor],
                }
            }
            Key::Esc => {
                self.mode = UmMode::Browsing;
                self.selected = None;
                UserManagementEvent::None
            }
            _ => UserManagementEvent::None,
        }
    }

    pub fn render(&self) -> String {
        match self.mode {
            UmMode::Browsing => self.render_browsing(),
            UmMode::ActionSelect => self.render_action_select(),
            UmMode::RoleSelect => self.render_role_select(),
        }
    }

    fn render_browsing(&self) -> String {
        let mut body = String::from("User Management:\n\n");
        if self.loading {
            body.push_str("Loading users...\n");
            return body;
        }
        for (i, user) in self.users.iter().enumerate() {
            let line = format!("{} ({})", user.username, user.role);
            body.push_str(&theme::list_line(i == self.cursor, &line));
            body.push('\n');
        }
        body
    }

    fn render_action_select(&self) -> String {
        let name = self
            .selected
            .as_ref()
            .map(|u| u.username.as_str())
            .unwrap_or("?");
        let mut body = format!("Actions for {}:\n\n", name);
        for (i, action) in ACTIONS.iter().enumerate() {
            body.push_str(&theme::list_line(i == self.action_cursor, action));
            body.push('\n');
        }
        body
    }

    fn render_role_select(&self) -> String {
        let name = self
            .selected
            .as_ref()
            .map(|u| u.username.as_str())
            .unwrap_or("?");
        let mut body = format!("Change role for {}:\n\n", name);
        for (i, role) in ROLES.iter().enumerate() {
            body.push_str(&theme::list_line(i == self.role_cursor, role.name()));
            body.push('\n');
        }
        body
    }

    pub fn help(&self) -> &'static str {
        match self.mode {
            UmMode::Browsing => "↑/k up • ↓/j down • enter actions • esc back",
            _ => "↑/k up • ↓/j down • enter select • esc cancel",
        }
    }
}
