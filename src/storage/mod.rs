//! # Storage Module - Content Store
//!
//! File-backed persistence for users, forums, topics and posts.
//!
//! ## Layout
//!
//! ```text
//! data/
//! ├── users/          ← one JSON file per account (argon2id password hash)
//! └── board.json      ← forums, topics and posts in a single document
//! ```
//!
//! Every mutation rewrites exactly one file through an atomic
//! write-temp-then-rename under an exclusive lock, so each call is
//! independently transactional. Cascade deletes (forum → topics → posts)
//! edit the single board document, which makes them all-or-nothing: a reader
//! can never observe a partially applied cascade.
//!
//! Lookups that find nothing return `Ok(None)` / `Ok(false)`; only I/O and
//! corrupt-data conditions are `Err`.

use anyhow::{anyhow, Result};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::warn;
use password_hash::{PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::bbs::roles::Role;
use crate::validation::{safe_filename, validate_password, validate_username};

/// A stored account. The password hash never leaves this module except
/// embedded in this record; the UI layers only read `username` and `role`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Forum {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Topic {
    pub id: i64,
    pub forum_id: i64,
    pub author: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: i64,
    pub topic_id: i64,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// The whole board in one document. `next_id` allocates ids across all
/// three record kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoardData {
    next_id: i64,
    forums: Vec<Forum>,
    topics: Vec<Topic>,
    posts: Vec<Post>,
}

impl Default for BoardData {
    fn default() -> Self {
        BoardData {
            next_id: 1,
            forums: Vec::new(),
            topics: Vec::new(),
            posts: Vec::new(),
        }
    }
}

/// Main storage interface. Shared between all sessions behind an `Arc`;
/// board writes are serialized by an internal mutex, reads go straight to
/// the (atomically replaced) files.
pub struct Store {
    data_dir: PathBuf,
    argon2: Argon2<'static>,
    board_write: tokio::sync::Mutex<()>,
}

impl Store {
    /// Initialize storage with the given data directory, creating it and the
    /// `users/` subdirectory if they do not exist yet.
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| anyhow!("Failed to create data directory {}: {}", data_dir.display(), e))?;
        fs::create_dir_all(data_dir.join("users")).await?;
        Ok(Store {
            data_dir,
            argon2: Argon2::default(),
            board_write: tokio::sync::Mutex::new(()),
        })
    }

    /// Return the base data directory used by this store.
    pub fn base_dir(&self) -> &Path {
        &self.data_dir
    }

    // ── users ───────────────────────────────────────────────────────────────

    fn user_path(&self, username: &str) -> PathBuf {
        self.data_dir
            .join("users")
            .join(format!("{}.json", safe_filename(username)))
    }

    /// Look up a user by name. Not finding one is a normal `Ok(None)`.
    pub async fn get_user(&self, username: &str) -> Result<Option<UserRecord>> {
        let path = self.user_path(username);
        match fs::read_to_string(&path).await {
            Ok(content) => {
                let user: UserRecord = serde_json::from_str(&content)
                    .map_err(|e| anyhow!("Corrupt user record {}: {}", path.display(), e))?;
                Ok(Some(user))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow!("Failed reading user {}: {}", path.display(), e)),
        }
    }

    /// All accounts, ordered by username.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let users_dir = self.data_dir.join("users");
        let mut users = Vec::new();
        let mut entries = fs::read_dir(&users_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path).await?;
            match serde_json::from_str::<UserRecord>(&content) {
                Ok(user) => users.push(user),
                Err(e) => warn!("Skipping unreadable user file {}: {}", path.display(), e),
            }
        }
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    /// Verify a credential pair. Unknown user and wrong password are both
    /// `Ok(false)`; the caller cannot tell which case occurred.
    pub async fn verify_credential(&self, username: &str, secret: &str) -> Result<bool> {
        match self.get_user(username).await? {
            Some(user) => {
                let parsed = password_hash::PasswordHash::new(&user.password_hash)
                    .map_err(|e| anyhow!("Corrupt password hash for '{}': {}", username, e))?;
                Ok(self
                    .argon2
                    .verify_password(secret.as_bytes(), &parsed)
                    .is_ok())
            }
            None => Ok(false),
        }
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = password_hash::SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("Password hash failure: {e}"))?;
        Ok(hash.to_string())
    }

    /// Create a new account; fails if the name is taken or invalid.
    pub async fn create_user(&self, username: &str, password: &str, role: Role) -> Result<UserRecord> {
        let username = validate_username(username).map_err(|e| anyhow!("Invalid username: {e}"))?;
        validate_password(password).map_err(|e| anyhow!("{e}"))?;
        if self.get_user(&username).await?.is_some() {
            return Err(anyhow!("Username '{}' is already taken", username));
        }
        let user = UserRecord {
            username: username.clone(),
            role,
            password_hash: self.hash_password(password)?,
            created_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&user)?;
        write_file_locked(&self.user_path(&username), &content)?;
        Ok(user)
    }

    /// Remove an account. Content authored by the user stays attributed to
    /// the (now dangling) name; the original system behaves the same way.
    pub async fn delete_user(&self, username: &str) -> Result<()> {
        let path = self.user_path(username);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(anyhow!("User '{}' not found", username))
            }
            Err(e) => Err(anyhow!("Failed deleting user '{}': {}", username, e)),
        }
    }

    async fn rewrite_user<F>(&self, username: &str, mutate: F) -> Result<UserRecord>
    where
        F: FnOnce(&mut UserRecord) -> Result<()>,
    {
        let mut user = self
            .get_user(username)
            .await?
            .ok_or_else(|| anyhow!("User '{}' not found", username))?;
        mutate(&mut user)?;
        let content = serde_json::to_string_pretty(&user)?;
        write_file_locked(&self.user_path(username), &content)?;
        Ok(user)
    }

    /// Set a user's role.
    pub async fn set_role(&self, username: &str, role: Role) -> Result<UserRecord> {
        self.rewrite_user(username, |user| {
            user.role = role;
            Ok(())
        })
        .await
    }

    /// Administrative password reset: overwrites the hash without checking
    /// the old secret.
    pub async fn reset_password(&self, username: &str, new_password: &str) -> Result<()> {
        validate_password(new_password).map_err(|e| anyhow!("{e}"))?;
        let hash = self.hash_password(new_password)?;
        self.rewrite_user(username, move |user| {
            user.password_hash = hash;
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Self-service password change: the current secret must verify first.
    pub async fn change_password(&self, username: &str, current: &str, new_password: &str) -> Result<()> {
        if !self.verify_credential(username, current).await? {
            return Err(anyhow!("Current password is incorrect"));
        }
        self.reset_password(username, new_password).await
    }

    /// First-run bootstrap: create the default `admin`, `mod` and `user`
    /// accounts when absent. Idempotent; existing accounts are untouched.
    pub async fn ensure_seed(&self) -> Result<()> {
        let defaults = [
            ("admin", "adminpass", Role::Admin),
            ("mod", "modpass123", Role::Moderator),
            ("user", "userpass", Role::User),
        ];
        for (name, pass, role) in defaults {
            if self.get_user(name).await?.is_none() {
                self.create_user(name, pass, role).await?;
            }
        }
        Ok(())
    }

    // ── board ───────────────────────────────────────────────────────────────

    fn board_path(&self) -> PathBuf {
        self.data_dir.join("board.json")
    }

    async fn load_board(&self) -> Result<BoardData> {
        match fs::read_to_string(self.board_path()).await {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| anyhow!("Corrupt board data: {}", e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BoardData::default()),
            Err(e) => Err(anyhow!("Failed reading board data: {}", e)),
        }
    }

    /// Apply one mutation to the board document under the write lock and
    /// persist it atomically. The closure either returns a value to hand
    /// back to the caller or an error, in which case nothing is written.
    async fn with_board<T, F>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut BoardData) -> Result<T>,
    {
        let _guard = self.board_write.lock().await;
        let mut board = self.load_board().await?;
        let out = mutate(&mut board)?;
        let content = serde_json::to_string_pretty(&board)?;
        write_file_locked(&self.board_path(), &content)?;
        Ok(out)
    }

    /// All forums, ordered alphabetically by name.
    pub async fn list_forums(&self) -> Result<Vec<Forum>> {
        let mut forums = self.load_board().await?.forums;
        forums.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(forums)
    }

    pub async fn create_forum(&self, name: &str, description: &str) -> Result<Forum> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(anyhow!("Forum name cannot be empty"));
        }
        let description = description.trim().to_string();
        self.with_board(move |board| {
            if board.forums.iter().any(|f| f.name == name) {
                return Err(anyhow!("Forum '{}' already exists", name));
            }
            let forum = Forum {
                id: board.next_id,
                name,
                description,
                created_at: Utc::now(),
            };
            board.next_id += 1;
            board.forums.push(forum.clone());
            Ok(forum)
        })
        .await
    }

    pub async fn update_forum(&self, id: i64, name: &str, description: &str) -> Result<Forum> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(anyhow!("Forum name cannot be empty"));
        }
        let description = description.trim().to_string();
        self.with_board(move |board| {
            if board.forums.iter().any(|f| f.name == name && f.id != id) {
                return Err(anyhow!("Forum '{}' already exists", name));
            }
            let forum = board
                .forums
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or_else(|| anyhow!("Forum {} not found", id))?;
            forum.name = name;
            forum.description = description;
            Ok(forum.clone())
        })
        .await
    }

    /// Delete a forum together with its topics and their posts. The cascade
    /// is a single document rewrite: either everything goes or nothing does.
    pub async fn delete_forum(&self, id: i64) -> Result<()> {
        self.with_board(move |board| {
            if !board.forums.iter().any(|f| f.id == id) {
                return Err(anyhow!("Forum {} not found", id));
            }
            let topic_ids: Vec<i64> = board
                .topics
                .iter()
                .filter(|t| t.forum_id == id)
                .map(|t| t.id)
                .collect();
            board.posts.retain(|p| !topic_ids.contains(&p.topic_id));
            board.topics.retain(|t| t.forum_id != id);
            board.forums.retain(|f| f.id != id);
            Ok(())
        })
        .await
    }

    /// Topics in a forum, newest first.
    pub async fn list_topics(&self, forum_id: i64) -> Result<Vec<Topic>> {
        let board = self.load_board().await?;
        let mut topics: Vec<Topic> = board
            .topics
            .into_iter()
            .filter(|t| t.forum_id == forum_id)
            .collect();
        topics.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(topics)
    }

    pub async fn create_topic(&self, forum_id: i64, author: &str, title: &str) -> Result<Topic> {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(anyhow!("Topic title cannot be empty"));
        }
        let author = author.to_string();
        self.with_board(move |board| {
            if !board.forums.iter().any(|f| f.id == forum_id) {
                return Err(anyhow!("Forum {} not found", forum_id));
            }
            let topic = Topic {
                id: board.next_id,
                forum_id,
                author,
                title,
                created_at: Utc::now(),
            };
            board.next_id += 1;
            board.topics.push(topic.clone());
            Ok(topic)
        })
        .await
    }

    /// Delete a topic and its posts atomically.
    pub async fn delete_topic(&self, id: i64) -> Result<()> {
        self.with_board(move |board| {
            if !board.topics.iter().any(|t| t.id == id) {
                return Err(anyhow!("Topic {} not found", id));
            }
            board.posts.retain(|p| p.topic_id != id);
            board.topics.retain(|t| t.id != id);
            Ok(())
        })
        .await
    }

    /// Posts in a topic, oldest first.
    pub async fn list_posts(&self, topic_id: i64) -> Result<Vec<Post>> {
        let board = self.load_board().await?;
        let mut posts: Vec<Post> = board
            .posts
            .into_iter()
            .filter(|p| p.topic_id == topic_id)
            .collect();
        posts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(posts)
    }

    pub async fn create_post(&self, topic_id: i64, author: &str, content: &str) -> Result<Post> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(anyhow!("Post content cannot be empty"));
        }
        let author = author.to_string();
        self.with_board(move |board| {
            if !board.topics.iter().any(|t| t.id == topic_id) {
                return Err(anyhow!("Topic {} not found", topic_id));
            }
            let post = Post {
                id: board.next_id,
                topic_id,
                author,
                content,
                created_at: Utc::now(),
            };
            board.next_id += 1;
            board.posts.push(post.clone());
            Ok(post)
        })
        .await
    }

    pub async fn delete_post(&self, id: i64) -> Result<()> {
        self.with_board(move |board| {
            if !board.posts.iter().any(|p| p.id == id) {
                return Err(anyhow!("Post {} not found", id));
            }
            board.posts.retain(|p| p.id != id);
            Ok(())
        })
        .await
    }
}

/// Write content to a file via a unique temp file and atomic rename, holding
/// an exclusive lock on the destination for the duration. Readers either see
/// the old document or the new one, never a partial write.
fn write_file_locked(path: &Path, content: &str) -> Result<()> {
    use std::fs::{File, OpenOptions};
    use std::io::Write;

    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(path)?;
    lock_file.lock_exclusive()?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let base = path.file_name().and_then(|s| s.to_str()).unwrap_or("data.json");
    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut tmp) => {
                tmp.write_all(content.as_bytes())?;
                tmp.flush()?;
                let _ = tmp.sync_all();
                break candidate;
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
                continue;
            }
            Err(e) => return Err(anyhow!("Failed to create temp file for atomic write: {}", e)),
        }
    };

    std::fs::rename(&tmp_path, path)?;
    if let Ok(dir_file) = File::open(dir) {
        let _ = dir_file.sync_all();
    }
    drop(lock_file);
    Ok(())
}
