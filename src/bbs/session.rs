//! # Channel session worker
//!
//! One worker task per accepted shell. The worker owns the session's
//! [`Controller`] and its message queue: it applies one message at a time,
//! spawns the resulting commands against the store, and pushes a fresh
//! frame down the channel after every message. Command outcomes re-enter
//! the same queue, so controller state is only ever touched from this one
//! task.

use std::sync::Arc;

use log::{debug, info, warn};
use russh::server::Handle;
use russh::{ChannelId, CryptoVec};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::bbs::roles::Role;
use crate::logutil::escape_log;
use crate::storage::Store;
use crate::tui::message::{Command, Msg};
use crate::tui::user_management::RESET_PASSWORD_DEFAULT;
use crate::tui::Controller;

pub struct SessionWorker {
    handle: Handle,
    channel: ChannelId,
    rx: UnboundedReceiver<Msg>,
    tx: UnboundedSender<Msg>,
    store: Arc<Store>,
    controller: Controller,
}

impl SessionWorker {
    pub fn new(
        handle: Handle,
        channel: ChannelId,
        rx: UnboundedReceiver<Msg>,
        tx: UnboundedSender<Msg>,
        store: Arc<Store>,
        username: String,
        role: Role,
        bbs_name: String,
        welcome: String,
    ) -> Self {
        let controller = Controller::new(username, role, bbs_name, welcome);
        SessionWorker {
            handle,
            channel,
            rx,
            tx,
            store,
            controller,
        }
    }

    /// Drive the session until the user quits or the channel goes away.
    pub async fn run(mut self) {
        let user = self.controller.username.clone();
        info!("Session started for {}", escape_log(&user));

        if !self.send_frame().await {
            return;
        }

        'outer: while let Some(msg) = self.rx.recv().await {
            debug!("Session {} message: {:?}", escape_log(&user), msg);
            let commands = self.controller.update(msg);
            for command in commands {
                if command == Command::Quit {
                    break 'outer;
                }
                spawn_command(command, self.store.clone(), self.tx.clone());
            }
            if !self.send_frame().await {
                break;
            }
        }

        let _ = self.handle.close(self.channel).await;
        info!("Session ended for {}", escape_log(&user));
    }

    /// Render the controller and write the frame. Returns false when the
    /// channel is gone.
    async fn send_frame(&mut self) -> bool {
        let frame = self.controller.render();
        let mut out = String::with_capacity(frame.len() + 16);
        out.push_str("\x1b[2J\x1b[H");
        for line in frame.split('\n') {
            out.push_str(line);
            out.push_str("\r\n");
        }
        self.handle
            .data(self.channel, CryptoVec::from(out.into_bytes()))
            .await
            .is_ok()
    }
}

/// Run one command off the session task. Every command resolves to exactly
/// one message sent back into the session queue; a dropped queue just means
/// the session already ended.
pub fn spawn_command(command: Command, store: Arc<Store>, tx: UnboundedSender<Msg>) {
    tokio::spawn(async move {
        let msg = execute(command, &store).await;
        if tx.send(msg).is_err() {
            debug!("Discarding command result for a closed session");
        }
    });
}

async fn execute(command: Command, store: &Store) -> Msg {
    match command {
        Command::LoadForums { for_management } => match store.list_forums().await {
            Ok(forums) => Msg::ForumsLoaded {
                for_management,
                forums,
            },
            Err(e) => fail("Failed to load forums", e),
        },
        Command::LoadTopics { forum_id } => match store.list_topics(forum_id).await {
            Ok(topics) => Msg::TopicsLoaded { forum_id, topics },
            Err(e) => fail("Failed to load topics", e),
        },
        Command::LoadPosts { topic_id } => match store.list_posts(topic_id).await {
            Ok(posts) => Msg::PostsLoaded { topic_id, posts },
            Err(e) => fail("Failed to load posts", e),
        },
        Command::LoadUsers => match store.list_users().await {
            Ok(users) => Msg::UsersLoaded(users),
            Err(e) => fail("Failed to load users", e),
        },
        Command::CreateTopic {
            forum,
            author,
            title,
        } => match store.create_topic(forum.id, &author, &title).await {
            Ok(_) => Msg::TopicCreated { forum },
            Err(e) => fail("Failed to create topic", e),
        },
        Command::CreatePost {
            topic,
            author,
            content,
        } => match store.create_post(topic.id, &author, &content).await {
            Ok(_) => Msg::PostCreated { topic },
            Err(e) => fail("Failed to post reply", e),
        },
        Command::CreateForum { name, description } => {
            match store.create_forum(&name, &description).await {
                Ok(forum) => Msg::OperationSucceeded {
                    text: format!("Forum '{}' created", forum.name),
                },
                Err(e) => fail("Failed to create forum", e),
            }
        }
        Command::UpdateForum {
            id,
            name,
            description,
        } => match store.update_forum(id, &name, &description).await {
            Ok(forum) => Msg::OperationSucceeded {
                text: format!("Forum '{}' updated", forum.name),
            },
            Err(e) => fail("Failed to update forum", e),
        },
        Command::CreateUser {
            username,
            password,
            role,
        } => match store.create_user(&username, &password, role).await {
            Ok(user) => Msg::OperationSucceeded {
                text: format!("User '{}' created", user.username),
            },
            Err(e) => fail("Failed to create user", e),
        },
        Command::ChangePassword {
            username,
            current,
            new,
        } => match store.change_password(&username, &current, &new).await {
            Ok(()) => Msg::PasswordUpdated,
            Err(e) => fail("Failed to change password", e),
        },
        Command::SetRole { username, role } => match store.set_role(&username, role).await {
            Ok(user) => Msg::OperationSucceeded {
                text: format!("{} is now {}", user.username, user.role),
            },
            Err(e) => fail("Failed to change role", e),
        },
        Command::DeleteUser { username } => match store.delete_user(&username).await {
            Ok(()) => Msg::OperationSucceeded {
                text: format!("User '{}' deleted", username),
            },
            Err(e) => fail("Failed to delete user", e),
        },
        Command::ResetPassword { username } => {
            match store.reset_password(&username, RESET_PASSWORD_DEFAULT).await {
                Ok(()) => Msg::OperationSucceeded {
                    text: format!("Password reset for '{}'", username),
                },
                Err(e) => fail("Failed to reset password", e),
            }
        }
        Command::DeleteForum { id } => {
            if let Err(e) = store.delete_forum(id).await {
                return fail("Failed to delete forum", e);
            }
            match store.list_forums().await {
                Ok(forums) => Msg::ForumsLoaded {
                    for_management: true,
                    forums,
                },
                Err(e) => fail("Failed to reload forums", e),
            }
        }
        Command::DeleteTopic { id, forum_id } => {
            if let Err(e) = store.delete_topic(id).await {
                return fail("Failed to delete topic", e);
            }
            match store.list_topics(forum_id).await {
                Ok(topics) => Msg::TopicsLoaded { forum_id, topics },
                Err(e) => fail("Failed to reload topics", e),
            }
        }
        Command::DeletePost { id, topic_id } => {
            if let Err(e) = store.delete_post(id).await {
                return fail("Failed to delete post", e);
            }
            match store.list_posts(topic_id).await {
                Ok(posts) => Msg::PostsLoaded { topic_id, posts },
                Err(e) => fail("Failed to reload posts", e),
            }
        }
        Command::ExpireStatus { token, after } => {
            tokio::time::sleep(after).await;
            Msg::StatusExpired(token)
        }
        // Quit never reaches the runner; the worker loop intercepts it.
        Command::Quit => Msg::Closed,
    }
}

fn fail(what: &str, err: anyhow::Error) -> Msg {
    warn!("{}: {}", what, err);
    Msg::OperationFailed {
        text: format!("{}: {}", what, err),
    }
}
