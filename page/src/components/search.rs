//! Live filtering of event cards by the search box.

use crate::actions::{PageAction, SearchAction};
use crate::config::SearchMode;
use crate::dom::{Document, NodeId};
use crate::environment::PageEnvironment;
use crate::hooks;
use crate::state::PageState;
use eventdesk_core::{effect::Effect, reducer::Reducer, SmallVec};

fn card_text(document: &Document, card: NodeId, class: &str) -> String {
    document
        .first_by_class_within(card, class)
        .map(|node| document.text_content(node).to_lowercase())
        .unwrap_or_default()
}

/// Whether `card` matches an already lowercased `term`
#[must_use]
pub fn card_matches(document: &Document, card: NodeId, term: &str, mode: SearchMode) -> bool {
    if card_text(document, card, hooks::CARD_TITLE).contains(term) {
        return true;
    }
    mode == SearchMode::TitleAndDescription
        && card_text(document, card, hooks::CARD_TEXT).contains(term)
}

/// Show matching cards and hide the rest
///
/// Returns the number of visible cards.
pub fn filter_cards(document: &mut Document, query: &str, mode: SearchMode) -> usize {
    let term = query.to_lowercase();
    let mut visible = 0;

    for card in document.elements_by_class(hooks::EVENT_CARD) {
        let matches = card_matches(document, card, &term, mode);
        let Some(element) = document.element_mut(card) else {
            continue;
        };
        if matches {
            element.set_display(Some("block"));
            element.add_class(hooks::FADE_IN);
            visible += 1;
        } else {
            element.set_display(Some("none"));
        }
    }
    visible
}

/// Reducer for [`SearchAction`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchReducer;

impl SearchReducer {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for SearchReducer {
    type State = PageState;
    type Action = PageAction;
    type Environment = PageEnvironment;

    fn reduce(
        &self,
        state: &mut PageState,
        action: PageAction,
        env: &PageEnvironment,
    ) -> SmallVec<[Effect<PageAction>; 4]> {
        if let PageAction::Search(SearchAction::QueryChanged { query }) = action {
            let Some(input) = state.document.element_by_id(hooks::EVENT_SEARCH_ID) else {
                tracing::debug!("Search input ignored: no search box on page");
                return SmallVec::new();
            };
            if let Some(element) = state.document.element_mut(input) {
                element.set_value(query.as_str());
            }
            let visible = filter_cards(&mut state.document, &query, env.config.search_mode);
            tracing::debug!(%query, visible, "Event cards filtered");
        }
        SmallVec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;
    use crate::config::PageConfig;
    use crate::dom::ElementBuilder;
    use crate::test_support::test_environment;
    use eventdesk_testing::ReducerTest;

    fn search_page() -> (PageState, Vec<NodeId>) {
        let mut document = Document::new();
        let body = document.body();
        document.append(body, ElementBuilder::new("input").id("eventSearch"));
        let cards = [
            ("Jazz Night", "Smooth saxophone downtown"),
            ("Rock Festival", "Three stages of guitars"),
            ("Poetry Slam", "Open mic with jazz backing"),
        ]
        .iter()
        .filter_map(|(title, text)| {
            document.append(
                body,
                ElementBuilder::new("div")
                    .class("card event-card")
                    .child(ElementBuilder::new("h5").class("card-title").text(title))
                    .child(ElementBuilder::new("p").class("card-text").text(text)),
            )
        })
        .collect();
        (PageState::new(document), cards)
    }

    fn query(query: &str) -> PageAction {
        PageAction::Search(SearchAction::QueryChanged { query: query.to_string() })
    }

    fn visible(state: &PageState, cards: &[NodeId]) -> Vec<bool> {
        cards
            .iter()
            .map(|card| !state.document.element(*card).unwrap().is_hidden())
            .collect()
    }

    #[test]
    fn test_title_and_description_match() {
        let (state, cards) = search_page();

        ReducerTest::new(SearchReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(query("JAZZ"))
            .then_state(move |state| {
                assert_eq!(visible(state, &cards), vec![true, false, true]);
                let shown = state.document.element(cards[0]).unwrap();
                assert_eq!(shown.display(), Some("block"));
                assert!(shown.has_class("fade-in"));
                assert_eq!(state.document.element(cards[1]).unwrap().display(), Some("none"));
            })
            .run();
    }

    #[test]
    fn test_title_only_mode() {
        let (state, cards) = search_page();
        let mut env = test_environment();
        env.config = PageConfig {
            search_mode: SearchMode::TitleOnly,
            ..PageConfig::default()
        };

        ReducerTest::new(SearchReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(query("jazz"))
            .then_state(move |state| {
                assert_eq!(visible(state, &cards), vec![true, false, false]);
            })
            .run();
    }

    #[test]
    fn test_empty_query_shows_everything() {
        let (state, cards) = search_page();

        ReducerTest::new(SearchReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(query("nothing matches this"))
            .when_action(query(""))
            .then_state(move |state| {
                assert_eq!(visible(state, &cards), vec![true, true, true]);
                let input = state.element_by_id("eventSearch").unwrap();
                assert_eq!(state.document.element(input).unwrap().value(), "");
            })
            .run();
    }

    #[test]
    fn test_card_without_description_counts_as_empty() {
        let mut document = Document::new();
        let body = document.body();
        document.append(body, ElementBuilder::new("input").id("eventSearch"));
        let card = document
            .append(
                body,
                ElementBuilder::new("div")
                    .class("event-card")
                    .child(ElementBuilder::new("h5").class("card-title").text("Opera")),
            )
            .unwrap();

        assert!(card_matches(&document, card, "op", SearchMode::TitleAndDescription));
        assert!(!card_matches(&document, card, "jazz", SearchMode::TitleAndDescription));
        assert_eq!(filter_cards(&mut document, "jazz", SearchMode::TitleAndDescription), 0);
    }

    #[test]
    fn test_no_search_box_means_no_filtering() {
        let (mut state, cards) = search_page();
        let input = state.element_by_id("eventSearch").unwrap();
        state.document.remove(input);

        ReducerTest::new(SearchReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(query("rock"))
            .then_state(move |state| {
                assert!(cards
                    .iter()
                    .all(|card| state.document.element(*card).unwrap().display().is_none()));
            })
            .run();
    }
}
