//! Visibility and keyboard handling for the search dropdown
//!
//! The dropdown never touches a UI directly. Hosts feed it [`Event`]s and
//! apply the [`Effect`]s it returns.

use arrayvec::ArrayVec;

use crate::index::{Outcome, SearchIndex};

/// Most effects a single event can produce
pub const MAX_EFFECTS: usize = 2;

/// Whether the result dropdown is visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// No dropdown
    #[default]
    Hidden,
    /// Results or a "no results" message are visible
    Shown,
}

/// Keys the dropdown reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Escape key
    Escape,
    /// Down arrow
    ArrowDown,
    /// Any printable key
    Char(char),
}

/// A key press with its modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// Pressed key
    pub key:  Key,
    /// Control held
    pub ctrl: bool,
    /// Command (meta) held
    pub meta: bool,
}

impl KeyPress {
    /// Key press without modifiers
    pub const fn plain(key: Key) -> Self {
        Self { key, ctrl: false, meta: false }
    }

    /// Key press with control held
    pub const fn ctrl(key: Key) -> Self {
        Self { key, ctrl: true, meta: false }
    }

    /// Key press with command held
    pub const fn meta(key: Key) -> Self {
        Self { key, ctrl: false, meta: true }
    }

    /// Ctrl+K or Cmd+K
    pub fn is_search_shortcut(&self) -> bool {
        (self.ctrl || self.meta) && matches!(self.key, Key::Char(c) if c.eq_ignore_ascii_case(&'k'))
    }
}

/// Input from the host page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The search input's text changed
    Input(String),
    /// A click landed outside the search container
    ClickOutside,
    /// A key was pressed anywhere on the page
    Key(KeyPress),
}

/// Instruction for the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Render the current outcome and show the dropdown
    Show,
    /// Hide the dropdown
    Hide,
    /// Remove focus from the search input
    BlurInput,
    /// Focus the search input
    FocusInput,
    /// Focus the first result link
    FocusFirstResult,
    /// Suppress the browser's default action for the event
    PreventDefault,
}

/// Effects produced by one event
pub type Effects = ArrayVec<Effect, MAX_EFFECTS>;

/// Search dropdown bound to one index
#[derive(Debug)]
pub struct Dropdown<'i> {
    /// Index to query; `None` when the host lacks the search elements
    index:      Option<&'i SearchIndex>,
    /// Current visibility
    visibility: Visibility,
    /// Outcome of the latest input
    outcome:    Outcome<'i>,
}

impl<'i> Dropdown<'i> {
    /// Create a hidden dropdown over `index`
    pub const fn new(index: &'i SearchIndex) -> Self {
        Self { index: Some(index), visibility: Visibility::Hidden, outcome: Outcome::Hidden }
    }

    /// Create a dropdown that ignores every event
    pub const fn inert() -> Self {
        Self { index: None, visibility: Visibility::Hidden, outcome: Outcome::Hidden }
    }

    /// Whether events are ignored
    pub const fn is_inert(&self) -> bool {
        self.index.is_none()
    }

    /// Current visibility
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Outcome to render while shown
    pub const fn outcome(&self) -> &Outcome<'i> {
        &self.outcome
    }

    /// Apply one event and return what the host must do
    pub fn handle(&mut self, event: &Event) -> Effects {
        let mut effects = Effects::new();
        let Some(index) = self.index else {
            return effects;
        };

        match event {
            Event::Input(text) => {
                self.outcome = index.query(text);
                if self.outcome.is_shown() {
                    self.visibility = Visibility::Shown;
                    effects.push(Effect::Show);
                } else {
                    self.hide(&mut effects);
                }
            },
            Event::ClickOutside => self.hide(&mut effects),
            Event::Key(press) if press.is_search_shortcut() => {
                effects.push(Effect::FocusInput);
                effects.push(Effect::PreventDefault);
            },
            Event::Key(press) => match press.key {
                Key::Escape => {
                    self.hide(&mut effects);
                    effects.push(Effect::BlurInput);
                },
                Key::ArrowDown if self.visibility == Visibility::Shown => {
                    let has_hits = self.outcome.results().is_some_and(|r| !r.is_empty());
                    if has_hits {
                        effects.push(Effect::FocusFirstResult);
                        effects.push(Effect::PreventDefault);
                    }
                },
                Key::ArrowDown | Key::Char(_) => {},
            },
        }

        assert!(effects.len() <= MAX_EFFECTS, "Effect buffer overflow");
        effects
    }

    fn hide(&mut self, effects: &mut Effects) {
        self.visibility = Visibility::Hidden;
        effects.push(Effect::Hide);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Document;

    fn fixture() -> SearchIndex {
        SearchIndex::from_documents(vec![
            Document::new("Intro", "/intro", "Getting started with Riddlen", ""),
            Document::new("FAQ", "/faq", "Frequently asked questions", ""),
        ])
    }

    fn input(text: &str) -> Event {
        Event::Input(text.to_owned())
    }

    #[test]
    fn test_initially_hidden() {
        let index = fixture();
        let dropdown = Dropdown::new(&index);
        assert_eq!(dropdown.visibility(), Visibility::Hidden);
        assert_eq!(dropdown.outcome(), &Outcome::Hidden);
    }

    #[test]
    fn test_input_shows_and_hides() {
        let index = fixture();
        let mut dropdown = Dropdown::new(&index);

        assert_eq!(dropdown.handle(&input("started")).as_slice(), [Effect::Show]);
        assert_eq!(dropdown.visibility(), Visibility::Shown);
        assert_eq!(dropdown.outcome().results().unwrap().len(), 1);

        assert_eq!(dropdown.handle(&input("s")).as_slice(), [Effect::Hide]);
        assert_eq!(dropdown.visibility(), Visibility::Hidden);
    }

    #[test]
    fn test_no_results_still_shown() {
        let index = fixture();
        let mut dropdown = Dropdown::new(&index);
        assert_eq!(dropdown.handle(&input("zzz")).as_slice(), [Effect::Show]);
        assert_eq!(dropdown.visibility(), Visibility::Shown);
        assert!(dropdown.outcome().results().unwrap().is_empty());
    }

    #[test]
    fn test_click_outside_hides() {
        let index = fixture();
        let mut dropdown = Dropdown::new(&index);
        dropdown.handle(&input("faq"));
        assert_eq!(dropdown.handle(&Event::ClickOutside).as_slice(), [Effect::Hide]);
        assert_eq!(dropdown.visibility(), Visibility::Hidden);
    }

    #[test]
    fn test_escape_hides_and_blurs() {
        let index = fixture();
        let mut dropdown = Dropdown::new(&index);
        dropdown.handle(&input("faq"));
        let effects = dropdown.handle(&Event::Key(KeyPress::plain(Key::Escape)));
        assert_eq!(effects.as_slice(), [Effect::Hide, Effect::BlurInput]);
        assert_eq!(dropdown.visibility(), Visibility::Hidden);
    }

    #[test]
    fn test_arrow_down_focuses_first_result_only_when_shown() {
        let index = fixture();
        let mut dropdown = Dropdown::new(&index);
        let down = Event::Key(KeyPress::plain(Key::ArrowDown));

        assert!(dropdown.handle(&down).is_empty());

        dropdown.handle(&input("faq"));
        let effects = dropdown.handle(&down);
        assert_eq!(effects.as_slice(), [Effect::FocusFirstResult, Effect::PreventDefault]);
        assert_eq!(dropdown.visibility(), Visibility::Shown);

        dropdown.handle(&input("zzz"));
        assert!(dropdown.handle(&down).is_empty());
    }

    #[test]
    fn test_search_shortcut_in_any_state() {
        let index = fixture();
        let mut dropdown = Dropdown::new(&index);
        let expected = [Effect::FocusInput, Effect::PreventDefault];

        assert_eq!(dropdown.handle(&Event::Key(KeyPress::ctrl(Key::Char('k')))).as_slice(), expected);
        dropdown.handle(&input("faq"));
        assert_eq!(dropdown.handle(&Event::Key(KeyPress::meta(Key::Char('K')))).as_slice(), expected);
        assert_eq!(dropdown.visibility(), Visibility::Shown);

        assert!(dropdown.handle(&Event::Key(KeyPress::plain(Key::Char('k')))).is_empty());
    }

    #[test]
    fn test_inert_dropdown_ignores_events() {
        let mut dropdown = Dropdown::inert();
        assert!(dropdown.is_inert());
        assert!(dropdown.handle(&input("started")).is_empty());
        assert!(dropdown.handle(&Event::Key(KeyPress::ctrl(Key::Char('k')))).is_empty());
        assert_eq!(dropdown.visibility(), Visibility::Hidden);
    }
}
