//! Reducer composition utilities
//!
//! Page components share one state and one action type. Each component owns
//! the action variants it understands and ignores the rest, so the page
//! reducer is simply every component reducer run in a fixed order.
//!
//! Order matters: a later reducer observes the state changes made by an
//! earlier one for the same action. The page controller relies on this to
//! detach elements first and let components react to the detached state after.

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Boxed reducer over a shared state, action and environment
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
///
/// # Examples
///
/// ```
/// use eventdesk_core::{Effect, Reducer, SmallVec};
/// use eventdesk_core::composition::combine_reducers;
///
/// #[derive(Default)]
/// struct PickerState {
///     selected: Vec<String>,
///     messages: Vec<String>,
/// }
///
/// #[derive(Clone)]
/// enum PickerAction {
///     Pick(String),
///     Notify(String),
/// }
///
/// struct PickReducer;
/// struct NotifyReducer;
///
/// impl Reducer for PickReducer {
///     type State = PickerState;
///     type Action = PickerAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut PickerState, action: PickerAction, _env: &()) -> SmallVec<[Effect<PickerAction>; 4]> {
///         if let PickerAction::Pick(seat) = action {
///             state.selected.push(seat);
///         }
///         SmallVec::new()
///     }
/// }
///
/// impl Reducer for NotifyReducer {
///     type State = PickerState;
///     type Action = PickerAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut PickerState, action: PickerAction, _env: &()) -> SmallVec<[Effect<PickerAction>; 4]> {
///         if let PickerAction::Notify(message) = action {
///             state.messages.push(message);
///         }
///         SmallVec::new()
///     }
/// }
///
/// let combined = combine_reducers(vec![Box::new(PickReducer), Box::new(NotifyReducer)]);
///
/// let mut state = PickerState::default();
/// let _ = combined.reduce(&mut state, PickerAction::Pick("A1".into()), &());
/// assert_eq!(state.selected, vec!["A1".to_string()]);
/// assert!(state.messages.is_empty());
/// ```
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E> {
    /// Number of reducers in the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether the chain is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(
                effects
                    .into_iter()
                    .filter(|effect| !matches!(effect, Effect::None)),
            );
        }

        all_effects
    }
}
