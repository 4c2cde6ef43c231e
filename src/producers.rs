//! Capture builders for the common UI affordances.
//!
//! Producers own their listener wiring; these helpers only classify what
//! they observed and shape it into a [`Capture`] so every producer reports
//! the same keys.

use serde_json::{json, Value};

use crate::envelope::{Capture, ElementType, EventType};

/// Centre of the clicked element, in client and page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickLocation {
    pub x: f64,
    pub y: f64,
    pub page_x: f64,
    pub page_y: f64,
}

impl ClickLocation {
    /// From a bounding client rect and the current scroll offset.
    pub fn from_rect(left: f64, top: f64, width: f64, height: f64, scroll_x: f64, scroll_y: f64) -> Self {
        let x = left + width / 2.0;
        let y = top + height / 2.0;
        Self {
            x,
            y,
            page_x: scroll_x + x,
            page_y: scroll_y + y,
        }
    }

    fn to_value(self) -> Value {
        json!({ "x": self.x, "y": self.y, "page_x": self.page_x, "page_y": self.page_y })
    }
}

pub fn button_context(class_name: &str) -> &'static str {
    let has = |class: &str| class_name.split_whitespace().any(|c| c == class);
    if has("btn-primary") {
        "primary_action"
    } else if has("btn-secondary") {
        "secondary_action"
    } else if has("btn-success") {
        "success_action"
    } else if has("btn-danger") {
        "danger_action"
    } else if has("btn-large") {
        "large_action"
    } else {
        "unknown"
    }
}

pub fn link_context(href: &str) -> &'static str {
    if href.contains("/course/") {
        "course_navigation"
    } else if href.contains("/lesson/") {
        "lesson_navigation"
    } else if href.contains("/dashboard") {
        "dashboard_navigation"
    } else if href.contains("/admin/") {
        "admin_navigation"
    } else if href.contains("/login") || href.contains("/register") {
        "auth_navigation"
    } else {
        "unknown"
    }
}

pub fn form_context(action: &str) -> &'static str {
    // "/admin/login" also contains "/login", so it is checked first.
    if action.contains("/admin/login") {
        "admin_login_form"
    } else if action.contains("/login") {
        "login_form"
    } else if action.contains("/register") {
        "register_form"
    } else {
        "unknown"
    }
}

fn first_non_empty(primary: &str, fallback: &str) -> String {
    let primary = primary.trim();
    if primary.is_empty() {
        fallback.trim().to_string()
    } else {
        primary.to_string()
    }
}

pub fn button_click(text: &str, class_name: &str, location: ClickLocation) -> Capture {
    Capture::new(EventType::Click, first_non_empty(text, class_name), ElementType::Button)
        .with("button_text", text.trim())
        .with("button_class", class_name)
        .with("button_type", "general_button")
        .with("button_context", button_context(class_name))
        .with("click_location", location.to_value())
}

pub fn link_click(href: &str, text: &str, location: ClickLocation) -> Capture {
    Capture::new(EventType::Click, href, ElementType::Link)
        .with("link_text", text.trim())
        .with("link_href", href)
        .with("link_type", "general_link")
        .with("link_context", link_context(href))
        .with("click_location", location.to_value())
}

pub fn form_submit(form_id: Option<&str>, action: Option<&str>, location: ClickLocation) -> Capture {
    Capture::new(EventType::Click, "form_submit", ElementType::Form)
        .with("form_id", form_id.unwrap_or("unknown"))
        .with("input_type", "submit")
        .with("form_type", "general_form")
        .with("form_context", action.map(form_context).unwrap_or("unknown"))
        .with("click_location", location.to_value())
}

/// A radio button or checkbox, possibly inside a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizInputKind {
    Radio,
    Checkbox,
}

impl QuizInputKind {
    fn as_str(&self) -> &'static str {
        match self {
            QuizInputKind::Radio => "radio",
            QuizInputKind::Checkbox => "checkbox",
        }
    }
}

/// Where a radio button or checkbox sits relative to a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizQuestion<'a> {
    /// Not inside a `.quiz-question` container.
    Outside,
    /// Inside a question container that has no heading or prompt text.
    Untitled,
    /// Inside a question container with this prompt text.
    Text(&'a str),
}

pub fn quiz_selection(
    kind: QuizInputKind,
    name: &str,
    value: &str,
    question: QuizQuestion<'_>,
    location: ClickLocation,
) -> Capture {
    let (quiz_context, question_text) = match question {
        QuizQuestion::Outside => ("general_quiz", "Not a quiz question"),
        QuizQuestion::Untitled => ("quiz_answer_selection", "Unknown question"),
        QuizQuestion::Text(text) => ("quiz_answer_selection", text.trim()),
    };
    Capture::new(EventType::Click, first_non_empty(value, name), ElementType::QuizInput)
        .with("input_type", kind.as_str())
        .with("input_name", name)
        .with("input_value", value)
        .with("quiz_context", quiz_context)
        .with("question_text", question_text)
        .with("click_location", location.to_value())
}

pub fn navigation_click(text: &str, class_name: &str, location: ClickLocation) -> Capture {
    Capture::new(EventType::Click, first_non_empty(text, class_name), ElementType::NavigationMenu)
        .with("menu_item", text.trim())
        .with("menu_class", class_name)
        .with("click_location", location.to_value())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAction {
    Focus,
    Change { selected_value: String },
}

pub fn form_field(name: &str, id: &str, field_type: &str, action: FieldAction) -> Capture {
    let element_id = match (name.is_empty(), id.is_empty()) {
        (false, _) => name.to_string(),
        (true, false) => id.to_string(),
        (true, true) => "unknown_field".to_string(),
    };
    let capture = Capture::new(EventType::FormInteraction, element_id, ElementType::FormField)
        .with("field_name", name)
        .with("field_type", field_type);
    match action {
        FieldAction::Focus => capture.with("action", "focus"),
        FieldAction::Change { selected_value } => capture
            .with("action", "change")
            .with("selected_value", selected_value),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

/// Keyboard shortcuts only: nothing is reported unless Ctrl or Cmd is held.
pub fn key_combo(key: &str, modifiers: Modifiers) -> Option<Capture> {
    if !modifiers.ctrl && !modifiers.meta {
        return None;
    }
    let mut combo = String::new();
    if modifiers.ctrl {
        combo.push_str("Ctrl+");
    }
    if modifiers.meta {
        combo.push_str("Cmd+");
    }
    combo.push_str(&key.to_uppercase());

    Some(
        Capture::new(EventType::Keyboard, combo, ElementType::Keyboard)
            .with("key", key)
            .with("ctrl_key", modifiers.ctrl)
            .with("meta_key", modifiers.meta)
            .with("shift_key", modifiers.shift)
            .with("alt_key", modifiers.alt),
    )
}

pub fn visibility(hidden: bool, page_url: &str) -> Capture {
    let (element_id, action) = if hidden {
        ("page_hidden", "hidden")
    } else {
        ("page_visible", "visible")
    };
    Capture::new(EventType::VisibilityChange, element_id, ElementType::Visibility)
        .with("action", action)
        .with("page_url", page_url)
}
