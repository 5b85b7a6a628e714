//! Controller navigation: breadcrumbs, retained screens and banner routing.

use chrono::Utc;
use shellbbs::bbs::Role;
use shellbbs::storage::{Forum, Post, Topic};
use shellbbs::tui::message::Command;
use shellbbs::tui::{Controller, Key, Msg, ScreenKind};

fn controller(role: Role) -> Controller {
    Controller::new("tester".to_string(), role, "Test BBS".to_string(), String::new())
}

fn press(c: &mut Controller, key: Key) -> Vec<Command> {
    c.update(Msg::Key(key))
}

fn forum(id: i64, name: &str) -> Forum {
    Forum {
        id,
        name: name.to_string(),
        description: String::new(),
        created_at: Utc::now(),
    }
}

fn topic(id: i64, forum_id: i64, title: &str) -> Topic {
    Topic {
        id,
        forum_id,
        author: "tester".to_string(),
        title: title.to_string(),
        created_at: Utc::now(),
    }
}

fn post(id: i64, topic_id: i64, content: &str) -> Post {
    Post {
        id,
        topic_id,
        author: "tester".to_string(),
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

/// Walk from the main menu down to the posts of one topic.
fn open_posts(c: &mut Controller) {
    let cmds = press(c, Key::Enter);
    assert_eq!(
        cmds,
        vec![Command::LoadForums {
            for_management: false
        }]
    );
    c.update(Msg::ForumsLoaded {
        for_management: false,
        forums: vec![forum(1, "General"), forum(2, "Random")],
    });
    let cmds = press(c, Key::Enter);
    assert_eq!(cmds, vec![Command::LoadTopics { forum_id: 1 }]);
    c.update(Msg::TopicsLoaded {
        forum_id: 1,
        topics: vec![topic(10, 1, "Hello"), topic(11, 1, "World")],
    });
    let cmds = press(c, Key::Enter);
    assert_eq!(cmds, vec![Command::LoadPosts { topic_id: 10 }]);
    c.update(Msg::PostsLoaded {
        topic_id: 10,
        posts: vec![post(100, 10, "first post")],
    });
}

#[test]
fn breadcrumbs_shrink_by_one_per_back_step_until_home() {
    let mut c = controller(Role::User);
    open_posts(&mut c);
    assert_eq!(c.breadcrumb_labels(), vec!["Home", "Forums", "General", "Hello"]);

    c.update(Msg::NavigateBack);
    assert_eq!(c.breadcrumb_labels().len(), 3);
    assert_eq!(c.active, ScreenKind::Topics);
    c.update(Msg::NavigateBack);
    assert_eq!(c.breadcrumb_labels().len(), 2);
    c.update(Msg::NavigateBack);
    assert_eq!(c.breadcrumb_labels(), vec!["Home"]);
    assert_eq!(c.active, ScreenKind::MainMenu);

    // Further back-steps are no-ops.
    c.update(Msg::NavigateBack);
    assert_eq!(c.breadcrumb_labels(), vec!["Home"]);
}

#[test]
fn going_back_restores_the_retained_cursor() {
    let mut c = controller(Role::User);
    open_posts(&mut c);

    c.update(Msg::NavigateBack);
    // Cursor still on the first topic, move it down.
    press(&mut c, Key::Down);
    assert_eq!(c.topics.as_ref().unwrap().cursor, 1);

    // Open the second topic, then come back: cursor position survives.
    press(&mut c, Key::Enter);
    c.update(Msg::PostsLoaded {
        topic_id: 11,
        posts: vec![],
    });
    c.update(Msg::NavigateBack);
    assert_eq!(c.active, ScreenKind::Topics);
    assert_eq!(c.topics.as_ref().unwrap().cursor, 1);
    // Retained data is still there without a reload.
    assert_eq!(c.topics.as_ref().unwrap().topics.len(), 2);
}

#[test]
fn esc_on_a_list_screen_navigates_back() {
    let mut c = controller(Role::User);
    open_posts(&mut c);
    press(&mut c, Key::Esc);
    assert_eq!(c.active, ScreenKind::Topics);
    press(&mut c, Key::Esc);
    assert_eq!(c.active, ScreenKind::Forums);
}

#[test]
fn quit_from_main_menu_and_from_list_screens() {
    let mut c = controller(Role::User);
    assert_eq!(press(&mut c, Key::Char('q')), vec![Command::Quit]);

    let mut c = controller(Role::User);
    open_posts(&mut c);
    assert_eq!(press(&mut c, Key::Char('q')), vec![Command::Quit]);
    let mut c = controller(Role::User);
    assert_eq!(press(&mut c, Key::CtrlC), vec![Command::Quit]);
}

#[test]
fn new_post_form_routes_back_to_posts_with_reload() {
    let mut c = controller(Role::User);
    open_posts(&mut c);
    press(&mut c, Key::Char('n'));
    assert_eq!(c.active, ScreenKind::Form);
    assert_eq!(c.breadcrumb_labels().len(), 5);

    for ch in "hi there".chars() {
        press(&mut c, Key::Char(ch));
    }
    let cmds = press(&mut c, Key::CtrlS);
    assert!(matches!(cmds.as_slice(), [Command::CreatePost { .. }]));
    // Form stays up until the store answers.
    assert_eq!(c.active, ScreenKind::Form);

    let cmds = c.update(Msg::PostCreated {
        topic: topic(10, 1, "Hello"),
    });
    assert_eq!(c.active, ScreenKind::Posts);
    assert_eq!(c.breadcrumb_labels().len(), 4);
    assert!(cmds.contains(&Command::LoadPosts { topic_id: 10 }));
    assert_eq!(c.banner_text(), Some("Reply posted"));
}

#[test]
fn operation_failure_leaves_screen_and_breadcrumbs_alone() {
    let mut c = controller(Role::User);
    open_posts(&mut c);
    let crumbs_before = c.breadcrumb_labels().len();
    c.update(Msg::OperationFailed {
        text: "storage exploded".to_string(),
    });
    assert_eq!(c.active, ScreenKind::Posts);
    assert_eq!(c.breadcrumb_labels().len(), crumbs_before);
    assert_eq!(c.banner_text(), Some("storage exploded"));
}

#[test]
fn failed_delete_puts_the_list_back_on_screen() {
    let mut c = controller(Role::Moderator);
    open_posts(&mut c);
    c.update(Msg::NavigateBack);

    // Confirmed delete flips the list to loading while the store works.
    press(&mut c, Key::Char('d'));
    press(&mut c, Key::Char('y'));
    assert!(c.topics.as_ref().unwrap().loading);

    // The delete fails; the untouched list must render again, not a
    // loading placeholder.
    c.update(Msg::OperationFailed {
        text: "delete failed".to_string(),
    });
    assert!(!c.topics.as_ref().unwrap().loading);
    let frame = c.render();
    assert!(frame.contains("Hello"));
    assert!(!frame.contains("Loading topics"));
    assert_eq!(c.banner_text(), Some("delete failed"));
}

#[test]
fn status_banner_expiry_is_token_guarded() {
    let mut c = controller(Role::User);
    let cmds = c.update(Msg::OperationFailed {
        text: "first".to_string(),
    });
    let Some(Command::ExpireStatus { token: first, .. }) = cmds.first().cloned() else {
        panic!("expected an expiry command");
    };
    c.update(Msg::OperationFailed {
        text: "second".to_string(),
    });

    // The stale timer fires; the newer banner must survive.
    c.update(Msg::StatusExpired(first));
    assert_eq!(c.banner_text(), Some("second"));

    let cmds = c.update(Msg::OperationFailed {
        text: "third".to_string(),
    });
    let Some(Command::ExpireStatus { token: third, .. }) = cmds.first().cloned() else {
        panic!("expected an expiry command");
    };
    c.update(Msg::StatusExpired(third));
    assert_eq!(c.banner_text(), None);
}

#[test]
fn rendering_twice_is_idempotent() {
    let mut c = controller(Role::Admin);
    open_posts(&mut c);
    let first = c.render();
    let second = c.render();
    assert_eq!(first, second);
}

#[test]
fn channel_close_quits_the_session() {
    let mut c = controller(Role::User);
    assert_eq!(c.update(Msg::Closed), vec![Command::Quit]);
}

#[test]
fn delete_confirmation_resolves_into_the_same_screen() {
    let mut c = controller(Role::Moderator);
    open_posts(&mut c);
    c.update(Msg::NavigateBack);

    // Raise the overlay on Topics, then deny it.
    press(&mut c, Key::Char('d'));
    assert!(c.topics.as_ref().unwrap().confirming_delete);
    // While the overlay is up, navigation keys are swallowed.
    press(&mut c, Key::Down);
    assert_eq!(c.topics.as_ref().unwrap().cursor, 0);
    press(&mut c, Key::Char('n'));
    assert!(!c.topics.as_ref().unwrap().confirming_delete);
    assert_eq!(c.active, ScreenKind::Topics);

    // Raise it again and confirm; a delete command goes out.
    press(&mut c, Key::Char('d'));
    let cmds = press(&mut c, Key::Char('y'));
    assert_eq!(
        cmds,
        vec![Command::DeleteTopic {
            id: 10,
            forum_id: 1
        }]
    );
    assert_eq!(c.active, ScreenKind::Topics);
}
