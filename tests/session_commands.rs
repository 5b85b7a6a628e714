//! The off-thread command runner: every command resolves to exactly one
//! message sent back into the session queue.

use std::sync::Arc;
use std::time::Duration;

use shellbbs::bbs::session::spawn_command;
use shellbbs::bbs::Role;
use shellbbs::storage::Store;
use shellbbs::tui::message::{Command, Msg};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

#[test]
fn delete_forum_reports_back_as_a_management_reload() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let tmpdir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::new(tmpdir.path().join("data")).await.unwrap());
        let doomed = store.create_forum("Doomed", "bye").await.unwrap();
        store.create_forum("Kept", "hi").await.unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_command(Command::DeleteForum { id: doomed.id }, store.clone(), tx);

        match rx.recv().await.unwrap() {
            Msg::ForumsLoaded {
                for_management,
                forums,
            } => {
                assert!(for_management);
                assert_eq!(forums.len(), 1);
                assert_eq!(forums[0].name, "Kept");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    });
}

#[test]
fn failed_store_calls_come_back_as_operation_failed() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let tmpdir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::new(tmpdir.path().join("data")).await.unwrap());

        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_command(
            Command::SetRole {
                username: "ghost".to_string(),
                role: Role::Admin,
            },
            store.clone(),
            tx,
        );

        match rx.recv().await.unwrap() {
            Msg::OperationFailed { text } => assert!(text.contains("role")),
            other => panic!("unexpected message: {:?}", other),
        }
    });
}

#[test]
fn change_password_success_is_its_own_message_kind() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let tmpdir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::new(tmpdir.path().join("data")).await.unwrap());
        store
            .create_user("alice", "initialpass", Role::User)
            .await
            .unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_command(
            Command::ChangePassword {
                username: "alice".to_string(),
                current: "initialpass".to_string(),
                new: "newpassword".to_string(),
            },
            store.clone(),
            tx,
        );

        assert!(matches!(rx.recv().await.unwrap(), Msg::PasswordUpdated));
        assert!(store
            .verify_credential("alice", "newpassword")
            .await
            .unwrap());
    });
}

#[test]
fn expire_status_fires_after_its_delay() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let tmpdir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::new(tmpdir.path().join("data")).await.unwrap());

        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_command(
            Command::ExpireStatus {
                token: 42,
                after: Duration::from_millis(10),
            },
            store,
            tx,
        );

        match rx.recv().await.unwrap() {
            Msg::StatusExpired(token) => assert_eq!(token, 42),
            other => panic!("unexpected message: {:?}", other),
        }
    });
}
