use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened. Fixed vocabulary, serialized as snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PageView,
    Click,
    FormInteraction,
    TimeOnPage,
    PageExit,
    MouseMovement,
    Keyboard,
    WindowResize,
    VisibilityChange,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PageView => "page_view",
            EventType::Click => "click",
            EventType::FormInteraction => "form_interaction",
            EventType::TimeOnPage => "time_on_page",
            EventType::PageExit => "page_exit",
            EventType::MouseMovement => "mouse_movement",
            EventType::Keyboard => "keyboard",
            EventType::WindowResize => "window_resize",
            EventType::VisibilityChange => "visibility_change",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse category of the element (or pseudo-element) an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Button,
    Link,
    Form,
    FormField,
    QuizInput,
    Page,
    Time,
    Mouse,
    Keyboard,
    Window,
    Visibility,
    NavigationMenu,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Button => "button",
            ElementType::Link => "link",
            ElementType::Form => "form",
            ElementType::FormField => "form_field",
            ElementType::QuizInput => "quiz_input",
            ElementType::Page => "page",
            ElementType::Time => "time",
            ElementType::Mouse => "mouse",
            ElementType::Keyboard => "keyboard",
            ElementType::Window => "window",
            ElementType::Visibility => "visibility",
            ElementType::NavigationMenu => "navigation_menu",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
