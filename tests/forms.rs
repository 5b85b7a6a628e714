//! Form focus model, submission and local validation.

use chrono::Utc;
use shellbbs::bbs::Role;
use shellbbs::storage::Forum;
use shellbbs::tui::form::{FormEvent, FormScreen};
use shellbbs::tui::message::Command;
use shellbbs::tui::{Controller, Key, Msg, ScreenKind};

fn type_text(form: &mut FormScreen, text: &str) {
    for ch in text.chars() {
        form.handle_key(Key::Char(ch));
    }
}

#[test]
fn tab_cycles_focus_with_wraparound() {
    let mut form = FormScreen::new_user();
    assert_eq!(form.focus, 0);
    form.handle_key(Key::Tab);
    assert_eq!(form.focus, 1);
    form.handle_key(Key::Tab);
    form.handle_key(Key::Tab);
    assert_eq!(form.focus, 0);
    form.handle_key(Key::BackTab);
    assert_eq!(form.focus, 2);
}

#[test]
fn enter_advances_single_line_fields_and_submits_on_the_last() {
    let mut form = FormScreen::change_password();
    type_text(&mut form, "oldpass");
    assert_eq!(form.handle_key(Key::Enter), FormEvent::None);
    assert_eq!(form.focus, 1);
    type_text(&mut form, "newpass");
    assert_eq!(form.handle_key(Key::Enter), FormEvent::Submit);
    assert_eq!(form.value(0), "oldpass");
    assert_eq!(form.value(1), "newpass");
}

#[test]
fn multi_line_fields_take_enter_literally_and_need_the_submit_key() {
    let forum = Forum {
        id: 1,
        name: "General".to_string(),
        description: String::new(),
        created_at: Utc::now(),
    };
    let mut form = FormScreen::new_topic(forum.clone());
    // Topic titles are single-line; replies are multi-line.
    let topic = shellbbs::storage::Topic {
        id: 10,
        forum_id: 1,
        author: "tester".to_string(),
        title: "Hello".to_string(),
        created_at: Utc::now(),
    };
    let mut reply = FormScreen::new_post(topic);
    type_text(&mut reply, "line one");
    assert_eq!(reply.handle_key(Key::Enter), FormEvent::None);
    type_text(&mut reply, "line two");
    assert_eq!(reply.value(0), "line one\nline two");
    assert_eq!(reply.handle_key(Key::CtrlS), FormEvent::Submit);

    type_text(&mut form, "title");
    assert_eq!(form.handle_key(Key::Enter), FormEvent::Submit);
}

#[test]
fn backspace_removes_the_last_character() {
    let mut form = FormScreen::new_forum();
    type_text(&mut form, "abc");
    form.handle_key(Key::Backspace);
    assert_eq!(form.value(0), "ab");
    form.handle_key(Key::Backspace);
    form.handle_key(Key::Backspace);
    form.handle_key(Key::Backspace);
    assert_eq!(form.value(0), "");
}

#[test]
fn masked_fields_render_asterisks() {
    let mut form = FormScreen::change_password();
    type_text(&mut form, "secret");
    let rendered = form.render();
    assert!(!rendered.contains("secret"));
    assert!(rendered.contains("******"));
}

#[test]
fn empty_required_field_is_rejected_before_any_command() {
    let mut c = Controller::new("tester".to_string(), Role::Admin, "Test BBS".to_string(), String::new());
    c.update(Msg::Key(Key::Enter));
    c.update(Msg::ForumsLoaded {
        for_management: false,
        forums: vec![Forum {
            id: 1,
            name: "General".to_string(),
            description: String::new(),
            created_at: Utc::now(),
        }],
    });
    c.update(Msg::Key(Key::Enter));
    c.update(Msg::TopicsLoaded {
        forum_id: 1,
        topics: vec![],
    });
    c.update(Msg::Key(Key::Char('n')));
    assert_eq!(c.active, ScreenKind::Form);

    // Submit with an empty title: a banner, no store command, form intact.
    let cmds = c.update(Msg::Key(Key::Enter));
    assert!(matches!(
        cmds.as_slice(),
        [Command::ExpireStatus { .. }]
    ));
    assert!(c.banner_text().is_some());
    assert_eq!(c.active, ScreenKind::Form);
}

#[test]
fn invalid_role_string_is_rejected_locally() {
    let mut c = Controller::new("tester".to_string(), Role::Admin, "Test BBS".to_string(), String::new());
    // Settings -> Create New User
    c.update(Msg::Key(Key::Down));
    c.update(Msg::Key(Key::Enter));
    c.update(Msg::Key(Key::Down));
    c.update(Msg::Key(Key::Down));
    c.update(Msg::Key(Key::Enter));
    assert_eq!(c.active, ScreenKind::Form);

    for ch in "newuser".chars() {
        c.update(Msg::Key(Key::Char(ch)));
    }
    c.update(Msg::Key(Key::Tab));
    for ch in "password1".chars() {
        c.update(Msg::Key(Key::Char(ch)));
    }
    c.update(Msg::Key(Key::Tab));
    for ch in "wizard".chars() {
        c.update(Msg::Key(Key::Char(ch)));
    }
    let cmds = c.update(Msg::Key(Key::Enter));
    assert!(matches!(
        cmds.as_slice(),
        [Command::ExpireStatus { .. }]
    ));
    assert_eq!(c.active, ScreenKind::Form);
}

#[test]
fn cancel_returns_to_the_previous_screen() {
    let mut c = Controller::new("tester".to_string(), Role::User, "Test BBS".to_string(), String::new());
    c.update(Msg::Key(Key::Down));
    c.update(Msg::Key(Key::Enter));
    assert_eq!(c.active, ScreenKind::Settings);
    c.update(Msg::Key(Key::Enter));
    assert_eq!(c.active, ScreenKind::Form);
    c.update(Msg::Key(Key::Esc));
    assert_eq!(c.active, ScreenKind::Settings);
}
