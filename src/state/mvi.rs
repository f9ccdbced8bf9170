//! Intent/reducer primitives shared by the client stores.
//!
//! ```text
//! intent ──→ Reducer::reduce(state, intent) ──→ next state
//! ```
//!
//! Reducers are pure. Anything with side effects (fetching, persisting,
//! navigating) happens around the reduce call, never inside it.

/// An action a store can fold into its state.
pub trait Intent: Send + 'static {}

/// A store's state value. Reducers take it by value and hand back the
/// next one, so equality is enough to detect a no-op transition.
pub trait StoreState: Clone + PartialEq + Default + Send + 'static {}

pub trait Reducer {
    type State: StoreState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;

    /// Fold a sequence of intents, starting from `state`.
    fn reduce_all<I>(state: Self::State, intents: I) -> Self::State
    where
        I: IntoIterator<Item = Self::Intent>,
    {
        intents.into_iter().fold(state, Self::reduce)
    }
}
