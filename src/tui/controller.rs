//! # Navigation controller
//!
//! One controller per channel session. It owns all UI state: the active
//! screen, the breadcrumb stack, the transient status banner and the
//! retained screen instances. [`Controller::update`] consumes one [`Msg`]
//! at a time, mutates state synchronously and returns the commands to run
//! off-thread; [`Controller::render`] is pure and can be called after every
//! message.
//!
//! A result message is applied only when the context that issued it is
//! still the active one. Results for screens the user has already left are
//! discarded silently, which is the session's whole concurrency story:
//! exactly one message ever touches mutable state at a time.

use std::time::Duration;

use crate::bbs::roles::Role;
use crate::tui::admin::{AdminEvent, AdminScreen};
use crate::tui::form::{FormEvent, FormKind, FormScreen};
use crate::tui::forum_management::{ForumManagementEvent, ForumManagementScreen};
use crate::tui::forums::{ForumsEvent, ForumsScreen};
use crate::tui::message::{Command, Key, Msg};
use crate::tui::posts::{PostsEvent, PostsScreen};
use crate::tui::settings::{SettingsEvent, SettingsScreen};
use crate::tui::theme;
use crate::tui::topics::{TopicsEvent, TopicsScreen};
use crate::tui::user_management::{UserManagementEvent, UserManagementScreen};
use crate::validation;

const STATUS_TTL: Duration = Duration::from_secs(5);
const PASSWORD_TTL: Duration = Duration::from_secs(3);

/// Which screen category is active. Breadcrumbs bind labels to these so
/// `NavigateBack` can restore the retained instance for the new top crumb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    MainMenu,
    Forums,
    Topics,
    Posts,
    Form,
    Settings,
    Admin,
    UserManagement,
    ForumManagement,
}

#[derive(Debug, Clone)]
pub struct Crumb {
    pub label: String,
    pub screen: ScreenKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Error,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub text: String,
    pub severity: Severity,
    pub token: u64,
}

pub struct Controller {
    pub username: String,
    /// Snapshot taken when the shell started. Role edits made while the
    /// session is open do not take effect until the next channel.
    pub role: Role,
    pub bbs_name: String,
    pub welcome: String,
    pub active: ScreenKind,
    pub crumbs: Vec<Crumb>,
    pub banner: Option<Banner>,
    banner_token: u64,
    pub cols: u16,
    pub rows: u16,
    pub menu_cursor: usize,
    pub forums: Option<ForumsScreen>,
    pub topics: Option<TopicsScreen>,
    pub posts: Option<PostsScreen>,
    pub form: Option<FormScreen>,
    pub settings: Option<SettingsScreen>,
    pub admin: Option<AdminScreen>,
    pub user_management: Option<UserManagementScreen>,
    pub forum_management: Option<ForumManagementScreen>,
}

impl Controller {
    pub fn new(username: String, role: Role, bbs_name: String, welcome: String) -> Self {
        Controller {
            username,
            role,
            bbs_name,
            welcome,
            active: ScreenKind::MainMenu,
            crumbs: vec![Crumb {
                label: "Home".to_string(),
                screen: ScreenKind::MainMenu,
            }],
            banner: None,
            banner_token: 0,
            cols: 80,
            rows: 24,
            menu_cursor: 0,
            forums: None,
            topics: None,
            posts: None,
            form: None,
            settings: None,
            admin: None,
            user_management: None,
            forum_management: None,
        }
    }

    pub fn breadcrumb_labels(&self) -> Vec<&str> {
        self.crumbs.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn banner_text(&self) -> Option<&str> {
        self.banner.as_ref().map(|b| b.text.as_str())
    }

    fn menu_entries(&self) -> Vec<&'static str> {
        let mut entries = vec!["Forums", "Settings"];
        if self.role == Role::Admin {
            entries.push("Administration");
        }
        entries.push("Quit");
        entries
    }

    fn push_screen(&mut self, label: &str, screen: ScreenKind) {
        self.crumbs.push(Crumb {
            label: label.to_string(),
            screen,
        });
        self.active = screen;
    }

    fn navigate_back(&mut self) {
        if self.crumbs.len() > 1 {
            self.crumbs.pop();
            if let Some(top) = self.crumbs.last() {
                self.active = top.screen;
            }
        }
    }

    fn set_banner(&mut self, severity: Severity, text: String, ttl: Duration) -> Command {
        self.banner_token += 1;
        self.banner = Some(Banner {
            text,
            severity,
            token: self.banner_token,
        });
        Command::ExpireStatus {
            token: self.banner_token,
            after: ttl,
        }
    }

    /// Apply one message and return the commands it scheduled.
    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Resize { cols, rows } => {
                self.cols = cols;
                self.rows = rows;
                Vec::new()
            }
            Msg::ForumsLoaded {
                for_management,
                forums,
            } => {
                if for_management {
                    if self.active == ScreenKind::ForumManagement {
                        if let Some(screen) = self.forum_management.as_mut() {
                            screen.apply_loaded(forums);
                        }
                    }
                } else if self.active == ScreenKind::Forums {
                    if let Some(screen) = self.forums.as_mut() {
                        screen.apply_loaded(forums);
                    }
                }
                Vec::new()
            }
            Msg::TopicsLoaded { forum_id, topics } => {
                if self.active == ScreenKind::Topics {
                    if let Some(screen) = self.topics.as_mut() {
                        if screen.forum.id == forum_id {
                            screen.apply_loaded(topics);
                        }
                    }
                }
                Vec::new()
            }
            Msg::PostsLoaded { topic_id, posts } => {
                if self.active == ScreenKind::Posts {
                    if let Some(screen) = self.posts.as_mut() {
                        if screen.topic.id == topic_id {
                            screen.apply_loaded(posts);
                        }
                    }
                }
                Vec::new()
            }
            Msg::UsersLoaded(users) => {
                if self.active == ScreenKind::UserManagement {
                    if let Some(screen) = self.user_management.as_mut() {
                        screen.apply_loaded(users);
                    }
                }
                Vec::new()
            }
            Msg::TopicCreated { forum } => {
                let on_form = self.active == ScreenKind::Form
                    && matches!(
                        self.form.as_ref().map(|f| &f.kind),
                        Some(FormKind::NewTopic { .. })
                    );
                if !on_form {
                    return Vec::new();
                }
                self.navigate_back();
                if let Some(screen) = self.topics.as_mut() {
                    screen.loading = true;
                }
                let banner =
                    self.set_banner(Severity::Ok, "Topic created".to_string(), STATUS_TTL);
                vec![Command::LoadTopics { forum_id: forum.id }, banner]
            }
            Msg::PostCreated { topic } => {
                let on_form = self.active == ScreenKind::Form
                    && matches!(
                        self.form.as_ref().map(|f| &f.kind),
                        Some(FormKind::NewPost { .. })
                    );
                if !on_form {
                    return Vec::new();
                }
                self.navigate_back();
                if let Some(screen) = self.posts.as_mut() {
                    screen.loading = true;
                }
                let banner = self.set_banner(Severity::Ok, "Reply posted".to_string(), STATUS_TTL);
                vec![Command::LoadPosts { topic_id: topic.id }, banner]
            }
            Msg::PasswordUpdated => {
                let on_form = self.active == ScreenKind::Form
                    && matches!(
                        self.form.as_ref().map(|f| &f.kind),
                        Some(FormKind::ChangePassword)
                    );
                if !on_form {
                    return Vec::new();
                }
                self.navigate_back();
                let banner =
                    self.set_banner(Severity::Ok, "Password changed".to_string(), PASSWORD_TTL);
                vec![banner]
            }
            Msg::OperationSucceeded { text } => self.handle_success(text),
            Msg::OperationFailed { text } => {
                self.clear_loading();
                vec![self.set_banner(Severity::Error, text, STATUS_TTL)]
            }
            Msg::NavigateBack => {
                self.navigate_back();
                Vec::new()
            }
            Msg::StatusExpired(token) => {
                if self.banner.as_ref().map(|b| b.token) == Some(token) {
                    self.banner = None;
                }
                Vec::new()
            }
            Msg::Closed => vec![Command::Quit],
        }
    }

    /// A failed command leaves its screen as it was before the command,
    /// banner aside. Lists flip to loading when a delete or reload is
    /// issued, so the flag has to come back down or the still-intact list
    /// would never render again.
    fn clear_loading(&mut self) {
        match self.active {
            ScreenKind::Forums => {
                if let Some(screen) = self.forums.as_mut() {
                    screen.loading = false;
                }
            }
            ScreenKind::Topics => {
                if let Some(screen) = self.topics.as_mut() {
                    screen.loading = false;
                }
            }
            ScreenKind::Posts => {
                if let Some(screen) = self.posts.as_mut() {
                    screen.loading = false;
                }
            }
            ScreenKind::UserManagement => {
                if let Some(screen) = self.user_management.as_mut() {
                    screen.loading = false;
                }
            }
            ScreenKind::ForumManagement => {
                if let Some(screen) = self.forum_management.as_mut() {
                    screen.loading = false;
                }
            }
            _ => {}
        }
    }

    /// Success routing for management-style operations: pop a form back to
    /// its parent and reload the list the operation touched.
    fn handle_success(&mut self, text: String) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.active == ScreenKind::Form {
            self.navigate_back();
            if self.active == ScreenKind::ForumManagement {
                if let Some(screen) = self.forum_management.as_mut() {
                    screen.loading = true;
                }
                commands.push(Command::LoadForums {
                    for_management: true,
                });
            }
        } else if self.active == ScreenKind::UserManagement {
            if let Some(screen) = self.user_management.as_mut() {
                screen.loading = true;
            }
            commands.push(Command::LoadUsers);
        } else {
            // Originating screen is gone; stale outcome, drop it.
            return commands;
        }
        commands.push(self.set_banner(Severity::Ok, text, STATUS_TTL));
        commands
    }

    fn handle_key(&mut self, key: Key) -> Vec<Command> {
        match self.active {
            ScreenKind::MainMenu => self.handle_menu_key(key),
            ScreenKind::Forums => {
                let Some(screen) = self.forums.as_mut() else {
                    return Vec::new();
                };
                match screen.handle_key(key, self.role) {
                    ForumsEvent::None => Vec::new(),
                    ForumsEvent::Open(forum) => {
                        let reuse = self
                            .topics
                            .as_ref()
                            .map(|t| t.forum.id == forum.id)
                            .unwrap_or(false);
                        if !reuse {
                            self.topics = Some(TopicsScreen::new(forum.clone()));
                        }
                        if let Some(screen) = self.topics.as_mut() {
                            screen.loading = true;
                        }
                        self.push_screen(&forum.name, ScreenKind::Topics);
                        vec![Command::LoadTopics { forum_id: forum.id }]
                    }
                    ForumsEvent::Back => {
                        self.navigate_back();
                        Vec::new()
                    }
                    ForumsEvent::Quit => vec![Command::Quit],
                }
            }
            ScreenKind::Topics => {
                let Some(screen) = self.topics.as_mut() else {
                    return Vec::new();
                };
                let forum = screen.forum.clone();
                match screen.handle_key(key, self.role) {
                    TopicsEvent::None => Vec::new(),
                    TopicsEvent::Open(topic) => {
                        let reuse = self
                            .posts
                            .as_ref()
                            .map(|p| p.topic.id == topic.id)
                            .unwrap_or(false);
                        if !reuse {
                            self.posts = Some(PostsScreen::new(topic.clone()));
                        }
                        if let Some(screen) = self.posts.as_mut() {
                            screen.loading = true;
                        }
                        self.push_screen(&topic.title, ScreenKind::Posts);
                        vec![Command::LoadPosts { topic_id: topic.id }]
                    }
                    TopicsEvent::NewTopic => {
                        self.form = Some(FormScreen::new_topic(forum));
                        self.push_screen("New Topic", ScreenKind::Form);
                        Vec::new()
                    }
                    TopicsEvent::Delete { id } => {
                        screen.loading = true;
                        vec![Command::DeleteTopic {
                            id,
                            forum_id: forum.id,
                        }]
                    }
                    TopicsEvent::Back => {
                        self.navigate_back();
                        Vec::new()
                    }
                    TopicsEvent::Quit => vec![Command::Quit],
                }
            }
            ScreenKind::Posts => {
                let Some(screen) = self.posts.as_mut() else {
                    return Vec::new();
                };
                let topic = screen.topic.clone();
                match screen.handle_key(key, self.role) {
                    PostsEvent::None => Vec::new(),
                    PostsEvent::NewPost => {
                        self.form = Some(FormScreen::new_post(topic));
                        self.push_screen("New Reply", ScreenKind::Form);
                        Vec::new()
                    }
                    PostsEvent::Delete { id } => {
                        screen.loading = true;
                        vec![Command::DeletePost {
                            id,
                            topic_id: topic.id,
                        }]
                    }
                    PostsEvent::Back => {
                        self.navigate_back();
                        Vec::new()
                    }
                    PostsEvent::Quit => vec![Command::Quit],
                }
            }
            ScreenKind::Form => self.handle_form_key(key),
            ScreenKind::Settings => {
                let Some(screen) = self.settings.as_mut() else {
                    return Vec::new();
                };
                match screen.handle_key(key) {
                    SettingsEvent::None => Vec::new(),
                    SettingsEvent::ChangePassword => {
                        self.form = Some(FormScreen::change_password());
                        self.push_screen("Change Password", ScreenKind::Form);
                        Vec::new()
                    }
                    SettingsEvent::ManageUsers => self.open_user_management(),
                    SettingsEvent::CreateUser => {
                        self.form = Some(FormScreen::new_user());
                        self.push_screen("New User", ScreenKind::Form);
                        Vec::new()
                    }
                    SettingsEvent::Back => {
                        self.navigate_back();
                        Vec::new()
                    }
                }
            }
            ScreenKind::Admin => {
                let Some(screen) = self.admin.as_mut() else {
                    return Vec::new();
                };
                match screen.handle_key(key) {
                    AdminEvent::None => Vec::new(),
                    AdminEvent::UserManagement => self.open_user_management(),
                    AdminEvent::ForumManagement => {
                        if self.forum_management.is_none() {
                            self.forum_management = Some(ForumManagementScreen::new());
                        }
                        if let Some(screen) = self.forum_management.as_mut() {
                            screen.loading = true;
                        }
                        self.push_screen("Forum Management", ScreenKind::ForumManagement);
                        vec![Command::LoadForums {
                            for_management: true,
                        }]
                    }
                    AdminEvent::Back => {
                        self.navigate_back();
                        Vec::new()
                    }
                }
            }
            ScreenKind::UserManagement => {
                let Some(screen) = self.user_management.as_mut() else {
                    return Vec::new();
                };
                match screen.handle_key(key) {
                    UserManagementEvent::None => Vec::new(),
                    UserManagementEvent::SetRole { username, role } => {
                        vec![Command::SetRole { username, role }]
                    }
                    UserManagementEvent::DeleteUser { username } => {
                        vec![Command::DeleteUser { username }]
                    }
                    UserManagementEvent::ResetPassword { username } => {
                        vec![Command::ResetPassword { username }]
                    }
                    UserManagementEvent::Back => {
                        self.navigate_back();
                        Vec::new()
                    }
                }
            }
            ScreenKind::ForumManagement => {
                let Some(screen) = self.forum_management.as_mut() else {
                    return Vec::new();
                };
                match screen.handle_key(key) {
                    ForumManagementEvent::None => Vec::new(),
                    ForumManagementEvent::NewForum => {
                        self.form = Some(FormScreen::new_forum());
                        self.push_screen("New Forum", ScreenKind::Form);
                        Vec::new()
                    }
                    ForumManagementEvent::EditForum(forum) => {
                        self.form = Some(FormScreen::edit_forum(&forum));
                        self.push_screen("Edit Forum", ScreenKind::Form);
                        Vec::new()
                    }
                    ForumManagementEvent::Delete { id } => {
                        screen.loading = true;
                        vec![Command::DeleteForum { id }]
                    }
                    ForumManagementEvent::Back => {
                        self.navigate_back();
                        Vec::new()
                    }
                    ForumManagementEvent::Quit => vec![Command::Quit],
                }
            }
        }
    }

    fn open_user_management(&mut self) -> Vec<Command> {
        if self.user_management.is_none() {
            self.user_management = Some(UserManagementScreen::new());
        }
        if let Some(screen) = self.user_management.as_mut() {
            screen.loading = true;
        }
        self.push_screen("User Management", ScreenKind::UserManagement);
        vec![Command::LoadUsers]
    }

    fn handle_menu_key(&mut self, key: Key) -> Vec<Command> {
        let entries = self.menu_entries();
        match key {
            Key::Up | Key::Char('k') => {
                if self.menu_cursor > 0 {
                    self.menu_cursor -= 1;
                }
                Vec::new()
            }
            Key::Down | Key::Char('j') => {
                if self.menu_cursor + 1 < entries.len() {
                    self.menu_cursor += 1;
                }
                Vec::new()
            }
            Key::Char('q') | Key::CtrlC => vec![Command::Quit],
            Key::Enter => match entries.get(self.menu_cursor).copied() {
                Some("Forums") => {
                    if self.forums.is_none() {
                        self.forums = Some(ForumsScreen::new());
                    }
                    if let Some(screen) = self.forums.as_mut() {
                        screen.loading = true;
                    }
                    self.push_screen("Forums", ScreenKind::Forums);
                    vec![Command::LoadForums {
                        for_management: false,
                    }]
                }
                Some("Settings") => {
                    if self.settings.is_none() {
                        self.settings = Some(SettingsScreen::new(self.role));
                    }
                    self.push_screen("Settings", ScreenKind::Settings);
                    Vec::new()
                }
                Some("Administration") => {
                    if self.admin.is_none() {
                        self.admin = Some(AdminScreen::new());
                    }
                    self.push_screen("Administration", ScreenKind::Admin);
                    Vec::new()
                }
                Some("Quit") => vec![Command::Quit],
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn handle_form_key(&mut self, key: Key) -> Vec<Command> {
        let Some(form) = self.form.as_mut() else {
            return Vec::new();
        };
        match form.handle_key(key) {
            FormEvent::None => Vec::new(),
            FormEvent::Cancel => {
                self.navigate_back();
                Vec::new()
            }
            FormEvent::Submit => self.submit_form(),
        }
    }

    /// Builds the store command for the submitted form. Required fields and
    /// the role string are validated here, before anything reaches the
    /// store; a local rejection renders exactly like a store failure.
    fn submit_form(&mut self) -> Vec<Command> {
        let Some(form) = self.form.as_ref() else {
            return Vec::new();
        };
        let kind = form.kind.clone();
        match kind {
            FormKind::NewTopic { forum } => {
                let title = form.value(0).trim().to_string();
                if let Err(e) = validation::require_field("title", &title) {
                    return vec![self.set_banner(Severity::Error, e.to_string(), STATUS_TTL)];
                }
                vec![Command::CreateTopic {
                    forum,
                    author: self.username.clone(),
                    title,
                }]
            }
            FormKind::NewPost { topic } => {
                let content = form.value(0).trim().to_string();
                if let Err(e) = validation::require_field("content", &content) {
                    return vec![self.set_banner(Severity::Error, e.to_string(), STATUS_TTL)];
                }
                vec![Command::CreatePost {
                    topic,
                    author: self.username.clone(),
                    content,
                }]
            }
            FormKind::ChangePassword => {
                let current = form.value(0).to_string();
                let new = form.value(1).to_string();
                for (name, value) in [("current password", &current), ("new password", &new)] {
                    if let Err(e) = validation::require_field(name, value) {
                        return vec![self.set_banner(Severity::Error, e.to_string(), STATUS_TTL)];
                    }
                }
                vec![Command::ChangePassword {
                    username: self.username.clone(),
                    current,
                    new,
                }]
            }
            FormKind::NewUser => {
                let username = form.value(0).trim().to_string();
                let password = form.value(1).to_string();
                let role_text = form.value(2).trim().to_string();
                for (name, value) in [("username", &username), ("password", &password)] {
                    if let Err(e) = validation::require_field(name, value) {
                        return vec![self.set_banner(Severity::Error, e.to_string(), STATUS_TTL)];
                    }
                }
                let role = match validation::validate_role(&role_text) {
                    Ok(role) => role,
                    Err(e) => {
                        return vec![self.set_banner(Severity::Error, e.to_string(), STATUS_TTL)];
                    }
                };
                vec![Command::CreateUser {
                    username,
                    password,
                    role,
                }]
            }
            FormKind::NewForum => {
                let name = form.value(0).trim().to_string();
                let description = form.value(1).trim().to_string();
                if let Err(e) = validation::require_field("name", &name) {
                    return vec![self.set_banner(Severity::Error, e.to_string(), STATUS_TTL)];
                }
                vec![Command::CreateForum { name, description }]
            }
            FormKind::EditForum { id } => {
                let name = form.value(0).trim().to_string();
                let description = form.value(1).trim().to_string();
                if let Err(e) = validation::require_field("name", &name) {
                    return vec![self.set_banner(Severity::Error, e.to_string(), STATUS_TTL)];
                }
                vec![Command::UpdateForum {
                    id,
                    name,
                    description,
                }]
            }
        }
    }

    fn render_menu(&self) -> String {
        let mut body = String::new();
        if !self.welcome.is_empty() {
            body.push_str(&self.welcome);
            body.push_str("\n\n");
        }
        body.push_str(&format!("Logged in as {} ({})\n\n", self.username, self.role));
        for (i, entry) in self.menu_entries().iter().enumerate() {
            body.push_str(&theme::list_line(i == self.menu_cursor, entry));
            body.push('\n');
        }
        body
    }

    /// Full frame for the current state. Pure; safe to call repeatedly.
    pub fn render(&self) -> String {
        let mut frame = String::new();
        frame.push_str(&theme::header(&self.bbs_name));
        frame.push('\n');
        frame.push_str(&theme::faint(&self.breadcrumb_labels().join(" > ")));
        frame.push_str("\n\n");

        let (body, help) = match self.active {
            ScreenKind::MainMenu => (
                self.render_menu(),
                "↑/k up • ↓/j down • enter select • q quit".to_string(),
            ),
            ScreenKind::Forums => match self.forums.as_ref() {
                Some(s) => (s.render(), s.help().to_string()),
                None => (String::new(), String::new()),
            },
            ScreenKind::Topics => match self.topics.as_ref() {
                Some(s) => (s.render(), s.help(self.role)),
                None => (String::new(), String::new()),
            },
            ScreenKind::Posts => match self.posts.as_ref() {
                Some(s) => (s.render(), s.help(self.role)),
                None => (String::new(), String::new()),
            },
            ScreenKind::Form => match self.form.as_ref() {
                Some(s) => (s.render(), s.help().to_string()),
                None => (String::new(), String::new()),
            },
            ScreenKind::Settings => match self.settings.as_ref() {
                Some(s) => (s.render(), s.help().to_string()),
                None => (String::new(), String::new()),
            },
            ScreenKind::Admin => match self.admin.as_ref() {
                Some(s) => (s.render(), s.help().to_string()),
                None => (String::new(), String::new()),
            },
            ScreenKind::UserManagement => match self.user_management.as_ref() {
                Some(s) => (s.render(), s.help().to_string()),
                None => (String::new(), String::new()),
            },
            ScreenKind::ForumManagement => match self.forum_management.as_ref() {
                Some(s) => (s.render(), s.help().to_string()),
                None => (String::new(), String::new()),
            },
        };
        frame.push_str(&body);

        if let Some(banner) = &self.banner {
            frame.push('\n');
            let styled = match banner.severity {
                Severity::Ok => theme::green(&banner.text),
                Severity::Error => theme::red(&banner.text),
            };
            frame.push_str(&styled);
            frame.push('\n');
        }

        frame.push('\n');
        frame.push_str(&theme::faint(&help));
        frame.push('\n');
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(role: Role) -> Controller {
        Controller::new(
            "tester".to_string(),
            role,
            "Test BBS".to_string(),
            String::new(),
        )
    }

    #[test]
    fn back_from_home_is_a_no_op() {
        let mut c = controller(Role::User);
        c.update(Msg::NavigateBack);
        assert_eq!(c.breadcrumb_labels(), vec!["Home"]);
        assert_eq!(c.active, ScreenKind::MainMenu);
    }

    #[test]
    fn admin_entry_hidden_for_non_admins() {
        let c = controller(Role::Moderator);
        assert!(!c.menu_entries().contains(&"Administration"));
        let c = controller(Role::Admin);
        assert!(c.menu_entries().contains(&"Administration"));
    }

    #[test]
    fn stale_banner_timer_does_not_clear_newer_banner() {
        let mut c = controller(Role::User);
        let first = c.update(Msg::OperationFailed {
            text: "first".to_string(),
        });
        let Some(Command::ExpireStatus { token: stale, .. }) = first.first().cloned() else {
            panic!("expected expiry command");
        };
        c.update(Msg::OperationFailed {
            text: "second".to_string(),
        });
        c.update(Msg::StatusExpired(stale));
        assert_eq!(c.banner_text(), Some("second"));
    }
}
