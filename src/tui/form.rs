//! Generic form screen used for all text-entry flows: new topic, new post,
//! change password, new user, new and edited forums.
//!
//! Focus moves with Tab / Shift-Tab and wraps at both ends. Enter advances
//! through single-line fields and submits from the last one; inside a
//! multi-line field Enter inserts a newline and Ctrl-S submits instead.

use crate::storage::{Forum, Topic};
use crate::tui::message::Key;
use crate::tui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    SingleLine,
    MultiLine,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub value: String,
    pub masked: bool,
}

impl Field {
    fn single(name: &'static str) -> Self {
        Field {
            name,
            kind: FieldKind::SingleLine,
            value: String::new(),
            masked: false,
        }
    }

    fn multi(name: &'static str) -> Self {
        Field {
            name,
            kind: FieldKind::MultiLine,
            value: String::new(),
            masked: false,
        }
    }

    fn masked(name: &'static str) -> Self {
        Field {
            name,
            kind: FieldKind::SingleLine,
            value: String::new(),
            masked: true,
        }
    }
}

/// Which flow this form belongs to. The controller uses this to build the
/// right store command out of the submitted values.
#[derive(Debug, Clone, PartialEq)]
pub enum FormKind {
    NewTopic { forum: Forum },
    NewPost { topic: Topic },
    ChangePassword,
    NewUser,
    NewForum,
    EditForum { id: i64 },
}

#[derive(Debug, Clone)]
pub struct FormScreen {
    pub kind: FormKind,
    pub title: String,
    pub fields: Vec<Field>,
    pub focus: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    None,
    Submit,
    Cancel,
}

impl FormScreen {
    pub fn new_topic(forum: Forum) -> Self {
        FormScreen {
            title: format!("New topic in {}", forum.name),
            kind: FormKind::NewTopic { forum },
            fields: vec![Field::single("Title")],
            focus: 0,
        }
    }

    pub fn new_post(topic: Topic) -> Self {
        FormScreen {
            title: format!("Reply to {}", topic.title),
            kind: FormKind::NewPost { topic },
            fields: vec![Field::multi("Content")],
            focus: 0,
        }
    }

    pub fn change_password() -> Self {
        FormScreen {
            kind: FormKind::ChangePassword,
            title: "Change Password".to_string(),
            fields: vec![
                Field::masked("Current Password"),
                Field::masked("New Password"),
            ],
            focus: 0,
        }
    }

    pub fn new_user() -> Self {
        FormScreen {
            kind: FormKind::NewUser,
            title: "Create New User".to_string(),
            fields: vec![
                Field::single("Username"),
                Field::masked("Password"),
                Field::single("Role (user/moderator/admin)"),
            ],
            focus: 0,
        }
    }

    pub fn new_forum() -> Self {
        FormScreen {
            kind: FormKind::NewForum,
            title: "New Forum".to_string(),
            fields: vec![Field::single("Name"), Field::single("Description")],
            focus: 0,
        }
    }

    pub fn edit_forum(forum: &Forum) -> Self {
        let mut name = Field::single("Name");
        name.value = forum.name.clone();
        let mut description = Field::single("Description");
        description.value = forum.description.clone();
        FormScreen {
            kind: FormKind::EditForum { id: forum.id },
            title: format!("Edit forum {}", forum.name),
            fields: vec![name, description],
            focus: 0,
        }
    }

    /// Value of the field at `index`, empty string if out of range.
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn focus_prev(&mut self) {
        if self.focus == 0 {
            self.focus = self.fields.len() - 1;
        } else {
            self.focus -= 1;
        }
    }

    pub fn handle_key(&mut self, key: Key) -> FormEvent {
        match key {
            Key::Tab => {
                self.focus_next();
                FormEvent::None
            }
            Key::BackTab => {
                self.focus_prev();
                FormEvent::None
            }
            Key::Enter => {
                let field = &mut self.fields[self.focus];
                match field.kind {
                    FieldKind::MultiLine => {
                        field.value.push('\n');
                        FormEvent::None
                    }
                    FieldKind::SingleLine => {
                        if self.focus + 1 == self.fields.len() {
                            FormEvent::Submit
                        } else {
                            self.focus_next();
                            FormEvent::None
                        }
                    }
                }
            }
            Key::CtrlS => FormEvent::Submit,
            Key::Backspace => {
                self.fields[self.focus].value.pop();
                FormEvent::None
            }
            Key::Char(c) => {
                self.fields[self.focus].value.push(c);
                FormEvent::None
            }
            Key::Esc | Key::CtrlC => FormEvent::Cancel,
            _ => FormEvent::None,
        }
    }

    pub fn render(&self) -> String {
        let mut body = format!("{}\n\n", theme::bold(&self.title));
        for (i, field) in self.fields.iter().enumerate() {
            let marker = if i == self.focus { "> " } else { "  " };
            let shown = if field.masked {
                "*".repeat(field.value.chars().count())
            } else {
                field.value.clone()
            };
            match field.kind {
                FieldKind::SingleLine => {
                    body.push_str(&format!("{}{}: {}\n", marker, field.name, shown));
                }
                FieldKind::MultiLine => {
                    body.push_str(&format!("{}{}:\n", marker, field.name));
                    for line in shown.split('\n') {
                        body.push_str("    ");
                        body.push_str(line);
                        body.push('\n');
                    }
                }
            }
        }
        body
    }

    pub fn help(&self) -> &'static str {
        match self.fields[self.focus].kind {
            FieldKind::MultiLine => "tab next field • ctrl+s submit • esc cancel",
            FieldKind::SingleLine => "tab next field • enter next/submit • esc cancel",
        }
    }
}
