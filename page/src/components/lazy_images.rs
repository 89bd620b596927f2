//! Deferred image loading.
//!
//! On mount every `img.lazy-load` is observed. When the observer reports an
//! image intersecting the viewport its `data-src` becomes its `src` and it is
//! no longer observed.

use crate::actions::{Intersection, LazyImageAction, PageAction};
use crate::dom::{Document, NodeId};
use crate::environment::PageEnvironment;
use crate::hooks;
use crate::state::PageState;
use eventdesk_core::{effect::Effect, reducer::Reducer, SmallVec};
use std::collections::BTreeSet;

/// Set of images waiting to intersect
#[derive(Debug, Clone, Default)]
pub struct LazyImageObserver {
    observed: BTreeSet<NodeId>,
}

impl LazyImageObserver {
    /// Observe every connected `img.lazy-load`; returns how many are observed
    pub fn observe_all(&mut self, document: &Document) -> usize {
        let images = document.select(|element| {
            element.tag() == "img" && element.has_class(hooks::LAZY_LOAD)
        });
        self.observed.extend(images);
        self.observed.len()
    }

    /// Whether `image` is still observed
    #[must_use]
    pub fn is_observed(&self, image: NodeId) -> bool {
        self.observed.contains(&image)
    }

    /// Number of observed images
    #[must_use]
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    /// Whether nothing is observed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Load every intersecting observed image; returns how many were loaded
    pub fn handle(&mut self, document: &mut Document, entries: &[Intersection]) -> usize {
        let mut loaded = 0;
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            if !self.observed.remove(&entry.target) {
                continue;
            }
            let Some(image) = document.element_mut(entry.target) else {
                continue;
            };
            match image.attr(hooks::DATA_SRC).map(str::to_string) {
                Some(src) => image.set_attr("src", src),
                None => tracing::debug!(image = %entry.target, "Lazy image has no data-src"),
            }
            image.remove_class(hooks::LAZY_LOAD);
            loaded += 1;
        }
        loaded
    }

    /// Stop observing images that left the document
    pub fn forget_detached(&mut self, document: &Document) {
        self.observed.retain(|image| document.is_connected(*image));
    }
}

/// Reducer for [`LazyImageAction`]s and page lifecycle
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyImageReducer;

impl LazyImageReducer {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for LazyImageReducer {
    type State = PageState;
    type Action = PageAction;
    type Environment = PageEnvironment;

    fn reduce(
        &self,
        state: &mut PageState,
        action: PageAction,
        env: &PageEnvironment,
    ) -> SmallVec<[Effect<PageAction>; 4]> {
        match action {
            PageAction::Mounted if env.config.lazy_images => {
                let observed = state.lazy_images.observe_all(&state.document);
                tracing::debug!(observed, "Observing lazy images");
            },
            PageAction::Mounted => {
                tracing::debug!("Intersection observation unavailable; images left as-is");
            },
            PageAction::LazyImage(LazyImageAction::Intersections { entries }) => {
                let loaded = state.lazy_images.handle(&mut state.document, &entries);
                tracing::trace!(loaded, "Lazy images loaded");
            },
            PageAction::RemoveElement { .. } => state.lazy_images.forget_detached(&state.document),
            _ => {},
        }
        SmallVec::new()
    }
}
