use clickstream::envelope::{ElementType, EventType};
use clickstream::producers::{
    button_click, button_context, form_context, form_field, form_submit, key_combo, link_click, link_context,
    quiz_selection, visibility, ClickLocation, FieldAction, Modifiers, QuizInputKind, QuizQuestion,
};
use serde_json::json;

fn here() -> ClickLocation {
    ClickLocation::from_rect(100.0, 40.0, 80.0, 20.0, 0.0, 600.0)
}

#[test]
fn test_click_location_is_element_centre() {
    let loc = here();
    assert_eq!((loc.x, loc.y), (140.0, 50.0));
    assert_eq!((loc.page_x, loc.page_y), (140.0, 650.0));
}

#[test]
fn test_button_classification() {
    assert_eq!(button_context("btn btn-primary"), "primary_action");
    assert_eq!(button_context("btn btn-danger btn-large"), "danger_action");
    assert_eq!(button_context("btn-primaryish"), "unknown");

    let capture = button_click("  Enroll  ", "btn btn-success", here());
    assert_eq!(capture.event_type, EventType::Click);
    assert_eq!(capture.element_id, "Enroll");
    assert_eq!(capture.element_type, ElementType::Button);
    assert_eq!(capture.additional_data["button_context"], json!("success_action"));
    assert_eq!(capture.additional_data["click_location"]["page_y"], json!(650.0));

    // Icon-only button falls back to its class.
    assert_eq!(button_click("", "btn-close", here()).element_id, "btn-close");
}

#[test]
fn test_link_classification() {
    assert_eq!(link_context("/course/3"), "course_navigation");
    assert_eq!(link_context("/lesson/7"), "lesson_navigation");
    assert_eq!(link_context("/dashboard"), "dashboard_navigation");
    assert_eq!(link_context("/admin/users"), "admin_navigation");
    assert_eq!(link_context("/register"), "auth_navigation");
    assert_eq!(link_context("https://docs.python.org"), "unknown");

    let capture = link_click("/lesson/7", " Next ", here());
    assert_eq!(capture.element_id, "/lesson/7");
    assert_eq!(capture.additional_data["link_text"], json!("Next"));
}

#[test]
fn test_form_classification() {
    assert_eq!(form_context("/admin/login"), "admin_login_form");
    assert_eq!(form_context("/login"), "login_form");
    assert_eq!(form_context("/register"), "register_form");

    let capture = form_submit(None, None, here());
    assert_eq!(capture.element_id, "form_submit");
    assert_eq!(capture.additional_data["form_id"], json!("unknown"));
    assert_eq!(capture.additional_data["form_context"], json!("unknown"));
}

#[test]
fn test_quiz_selection() {
    let answer = quiz_selection(QuizInputKind::Radio, "q1", "b", QuizQuestion::Text(" What is a list? "), here());
    assert_eq!(answer.element_type, ElementType::QuizInput);
    assert_eq!(answer.element_id, "b");
    assert_eq!(answer.additional_data["quiz_context"], json!("quiz_answer_selection"));
    assert_eq!(answer.additional_data["question_text"], json!("What is a list?"));

    let untitled = quiz_selection(QuizInputKind::Radio, "q2", "a", QuizQuestion::Untitled, here());
    assert_eq!(untitled.additional_data["quiz_context"], json!("quiz_answer_selection"));
    assert_eq!(untitled.additional_data["question_text"], json!("Unknown question"));

    let plain = quiz_selection(QuizInputKind::Checkbox, "newsletter", "", QuizQuestion::Outside, here());
    assert_eq!(plain.element_id, "newsletter");
    assert_eq!(plain.additional_data["input_type"], json!("checkbox"));
    assert_eq!(plain.additional_data["question_text"], json!("Not a quiz question"));
}

#[test]
fn test_form_field_identity_fallbacks() {
    assert_eq!(form_field("email", "email-input", "email", FieldAction::Focus).element_id, "email");
    assert_eq!(form_field("", "email-input", "email", FieldAction::Focus).element_id, "email-input");
    assert_eq!(form_field("", "", "text", FieldAction::Focus).element_id, "unknown_field");

    let change = form_field(
        "difficulty",
        "",
        "select-one",
        FieldAction::Change { selected_value: "advanced".to_string() },
    );
    assert_eq!(change.event_type, EventType::FormInteraction);
    assert_eq!(change.additional_data["action"], json!("change"));
    assert_eq!(change.additional_data["selected_value"], json!("advanced"));
}

#[test]
fn test_key_combo_requires_ctrl_or_cmd() {
    assert!(key_combo("s", Modifiers { shift: true, ..Default::default() }).is_none());

    let save = key_combo("s", Modifiers { ctrl: true, ..Default::default() }).unwrap();
    assert_eq!(save.element_id, "Ctrl+S");
    assert_eq!(save.element_type, ElementType::Keyboard);

    let both = key_combo("k", Modifiers { ctrl: true, meta: true, ..Default::default() }).unwrap();
    assert_eq!(both.element_id, "Ctrl+Cmd+K");
}

#[test]
fn test_visibility_change() {
    let hidden = visibility(true, "/course/1");
    assert_eq!(hidden.event_type, EventType::VisibilityChange);
    assert_eq!(hidden.element_id, "page_hidden");
    assert_eq!(visibility(false, "/course/1").additional_data["action"], json!("visible"));
}
