//! Finite State Machine (FSM) implementation

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A state in the state machine
pub trait State: Clone + Eq + Hash + Debug {}

/// Transition condition
pub type TransitionCondition<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// A state transition
pub struct Transition<S, C> {
    /// Target state
    pub to: S,
    /// Condition function
    pub condition: TransitionCondition<C>,
    /// Priority (higher = checked first)
    pub priority: i32,
}

impl<S, C> Transition<S, C> {
    /// Create a new transition
    pub fn new<F>(to: S, condition: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self {
            to,
            condition: Box::new(condition),
            priority: 0,
        }
    }

    /// Set priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Check if transition should occur
    pub fn should_transition(&self, context: &C) -> bool {
        (self.condition)(context)
    }
}

/// Finite State Machine with a time-in-state counter.
///
/// The only way to change state is `set_state` (directly, or through a
/// transition firing in `evaluate`). Setting the current state again does
/// nothing, so the timer keeps running.
pub struct StateMachine<S, C>
where
    S: State,
{
    /// Current state
    current: S,
    /// Previous state
    previous: Option<S>,
    /// Seconds since entering the current state
    timer: f32,
    /// Transitions from each state, highest priority first
    transitions: HashMap<S, Vec<Transition<S, C>>>,
}

impl<S, C> StateMachine<S, C>
where
    S: State,
{
    /// Create a new state machine
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            previous: None,
            timer: 0.0,
            transitions: HashMap::new(),
        }
    }

    /// Add a transition
    pub fn add_transition<F>(&mut self, from: S, to: S, condition: F)
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.add_transition_priority(from, to, condition, 0);
    }

    /// Add a transition with priority. Equal priorities keep insertion order.
    pub fn add_transition_priority<F>(&mut self, from: S, to: S, condition: F, priority: i32)
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        let list = self.transitions.entry(from).or_default();
        let index = list
            .iter()
            .position(|t| t.priority < priority)
            .unwrap_or(list.len());
        list.insert(index, Transition::new(to, condition).with_priority(priority));
    }

    /// Get current state
    pub fn current(&self) -> &S {
        &self.current
    }

    /// Get previous state
    pub fn previous(&self) -> Option<&S> {
        self.previous.as_ref()
    }

    /// Seconds spent in the current state
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Check if in a specific state
    pub fn is_in(&self, state: &S) -> bool {
        &self.current == state
    }

    /// Change state. Returns false when already there.
    pub fn set_state(&mut self, to: S) -> bool {
        if self.current == to {
            return false;
        }
        log::trace!("State {:?} -> {:?}", self.current, to);
        self.previous = Some(std::mem::replace(&mut self.current, to));
        self.timer = 0.0;
        true
    }

    /// Hard reset to a state, forgetting history
    pub fn reset(&mut self, state: S) {
        self.current = state;
        self.previous = None;
        self.timer = 0.0;
    }

    /// Advance the state timer
    pub fn tick(&mut self, delta_time: f32) {
        self.timer += delta_time;
    }

    /// Fire the first matching transition out of the current state.
    ///
    /// Returns the new state if one fired.
    pub fn evaluate(&mut self, context: &C) -> Option<S> {
        let to = self
            .transitions
            .get(&self.current)?
            .iter()
            .find(|t| t.should_transition(context))
            .map(|t| t.to.clone())?;

        if self.set_state(to.clone()) {
            Some(to)
        } else {
            None
        }
    }

    /// Tick the timer, then evaluate
    pub fn update(&mut self, context: &C, delta_time: f32) -> Option<S> {
        self.tick(delta_time);
        self.evaluate(context)
    }
}
