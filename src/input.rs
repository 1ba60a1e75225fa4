use flock_core::SessionRole;

/// Role of the page from its `<body data-page>` value. Anything other than
/// `editor` plays edits back.
#[inline]
pub fn page_role(data_page: Option<&str>) -> SessionRole {
    match data_page.map(str::trim) {
        Some(p) if p.eq_ignore_ascii_case("editor") => SessionRole::Editor,
        _ => SessionRole::Home,
    }
}

/// Elements that keep their own keystrokes.
#[inline]
pub fn is_text_entry_tag(tag: &str) -> bool {
    matches!(
        tag.to_ascii_uppercase().as_str(),
        "INPUT" | "TEXTAREA" | "SELECT" | "BUTTON" | "A"
    )
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyPress<'a> {
    pub code: &'a str,
    pub repeat: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    /// Tag name of the event target, if it is an element.
    pub target_tag: Option<&'a str>,
    pub target_editable: bool,
}

/// Whether a keydown should reach the action dispatcher.
#[inline]
pub fn should_dispatch(key: &KeyPress<'_>) -> bool {
    if key.repeat || key.ctrl || key.meta || key.alt {
        return false;
    }
    if key.target_editable {
        return false;
    }
    !key.target_tag.is_some_and(is_text_entry_tag)
}

/// Space scrolls the page unless the default is suppressed.
#[inline]
pub fn suppresses_default(code: &str) -> bool {
    code == "Space"
}
