//! Message and command types for the navigation event loop.
//!
//! A [`Msg`] is an immutable event consumed exactly once by the controller:
//! either a keystroke decoded from the channel byte stream or the outcome of
//! an asynchronous command. A [`Command`] is work the controller schedules in
//! response; each command runs off the session thread and reports back as
//! exactly one `Msg` re-injected into the session queue.

use std::time::Duration;

use crate::bbs::roles::Role;
use crate::storage::{Forum, Post, Topic, UserRecord};

/// A decoded keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Char(char),
    CtrlC,
    CtrlS,
}

/// One unit of the session event loop.
#[derive(Debug, Clone)]
pub enum Msg {
    Key(Key),
    Resize { cols: u16, rows: u16 },
    /// Forum list arrived; `for_management` tells which screen asked.
    ForumsLoaded { for_management: bool, forums: Vec<Forum> },
    TopicsLoaded { forum_id: i64, topics: Vec<Topic> },
    PostsLoaded { topic_id: i64, posts: Vec<Post> },
    UsersLoaded(Vec<UserRecord>),
    TopicCreated { forum: Forum },
    PostCreated { topic: Topic },
    PasswordUpdated,
    OperationSucceeded { text: String },
    OperationFailed { text: String },
    NavigateBack,
    /// A banner expiry timer fired. The token guards against a stale timer
    /// clearing a newer banner.
    StatusExpired(u64),
    /// The underlying channel went away; the session loop must stop.
    Closed,
}

/// Asynchronous work scheduled by the controller. Every variant except
/// `Quit` resolves to exactly one [`Msg`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadForums { for_management: bool },
    LoadTopics { forum_id: i64 },
    LoadPosts { topic_id: i64 },
    LoadUsers,
    CreateTopic { forum: Forum, author: String, title: String },
    CreatePost { topic: Topic, author: String, content: String },
    CreateForum { name: String, description: String },
    UpdateForum { id: i64, name: String, description: String },
    CreateUser { username: String, password: String, role: Role },
    ChangePassword { username: String, current: String, new: String },
    SetRole { username: String, role: Role },
    DeleteUser { username: String },
    ResetPassword { username: String },
    /// Delete then re-list; the reload result doubles as the success signal.
    DeleteForum { id: i64 },
    DeleteTopic { id: i64, forum_id: i64 },
    DeletePost { id: i64, topic_id: i64 },
    ExpireStatus { token: u64, after: Duration },
    Quit,
}
