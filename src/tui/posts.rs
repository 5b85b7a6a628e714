//! Post list screen for one topic.
//!
//! Any authenticated role may reply; deleting needs moderator or better.

use crate::bbs::roles::Role;
use crate::storage::{Post, Topic};
use crate::tui::message::Key;
use crate::tui::theme;

#[derive(Debug, Clone)]
pub struct PostsScreen {
    pub topic: Topic,
    pub posts: Vec<Post>,
    pub cursor: usize,
    pub loading: bool,
    pub confirming_delete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostsEvent {
    None,
    NewPost,
    Delete { id: i64 },
    Back,
    Quit,
}

impl PostsScreen {
    pub fn new(topic: Topic) -> Self {
        PostsScreen {
            topic,
            posts: Vec::new(),
            cursor: 0,
            loading: true,
            confirming_delete: false,
        }
    }

    pub fn apply_loaded(&mut self, posts: Vec<Post>) {
        self.posts = posts;
        self.loading = false;
        if self.cursor >= self.posts.len() {
            self.cursor = self.posts.len().saturating_sub(1);
        }
    }

    pub fn handle_key(&mut self, key: Key, role: Role) -> PostsEvent {
        if self.confirming_delete {
            return match key {
                Key::Char('y') | Key::Char('Y') => {
                    self.confirming_delete = false;
                    match self.posts.get(self.cursor) {
                        Some(post) => PostsEvent::Delete { id: post.id },
                        None => PostsEvent::None,
                    }
                }
                Key::Char('n') | Key::Char('N') | Key::Esc => {
                    self.confirming_delete = false;
                    PostsEvent::None
                }
                _ => PostsEvent::None,
            };
        }

        match key {
            Key::Up | Key::Char('k') => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                PostsEvent::None
            }
            Key::Down | Key::Char('j') => {
                if self.cursor + 1 < self.posts.len() {
                    self.cursor += 1;
                }
                PostsEvent::None
            }
            Key::Char('n') => PostsEvent::NewPost,
            Key::Char('d') => {
                if role.at_least(Role::Moderator) && !self.posts.is_empty() {
                    self.confirming_delete = true;
                }
                PostsEvent::None
            }
            Key::Esc => PostsEvent::Back,
            Key::Char('q') | Key::CtrlC => PostsEvent::Quit,
            _ => PostsEvent::None,
        }
    }

    pub fn render(&self) -> String {
        let mut body = String::new();
        body.push_str(&theme::header(&format!("Reading: {}", self.topic.title)));
        body.push_str("\n\n");
        if self.loading {
            body.push_str("Loading posts...\n");
            return body;
        }
        if self.posts.is_empty() {
            body.push_str("No posts in this topic yet.\n");
        } else {
            for (i, post) in self.posts.iter().enumerate() {
                let selected = i == self.cursor;
                let byline = format!(
                    "From: {} at {}",
                    post.author,
                    post.created_at.format("%Y-%m-%d %H:%M UTC")
                );
                body.push_str(&theme::list_line(selected, &byline));
                body.push('\n');
                for line in post.content.lines() {
                    body.push_str("    ");
                    body.push_str(line);
                    body.push('\n');
                }
                body.push_str(&theme::faint("---"));
                body.push('\n');
            }
        }
        if self.confirming_delete && !self.posts.is_empty() {
            body.push_str("\nDelete the selected post? (y/n)\n");
        }
        body
    }

    pub fn help(&self, role: Role) -> String {
        if self.confirming_delete {
            return "y confirm • n cancel".to_string();
        }
        let mut parts = vec!["↑/k up", "↓/j down", "n reply"];
        if role.at_least(Role::Moderator) {
            parts.push("d delete");
        }
        parts.push("esc back");
        parts.push("q quit");
        parts.join(" • ")
    }
}
