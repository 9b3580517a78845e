pub mod app;
pub mod graphics;
pub mod regression;
pub mod surface;
pub mod ui;

/// Linear state history with a movable cursor.
///
/// Recording while rewound drops the "future" and branches from the current frame.
#[derive(Debug, Clone)]
pub struct TimeMachine<State> {
    states: Vec<State>,
    frame: usize,
    limit: Option<usize>,
}

impl<State> TimeMachine<State> {
    pub fn new(initial_state: State) -> Self {
        Self {
            states: vec![initial_state],
            frame: 0,
            limit: None,
        }
    }

    /// Keeps at most `limit` states (minimum 1), forgetting the oldest first.
    pub fn with_limit(initial_state: State, limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::new(initial_state)
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn state(&self) -> &State {
        &self.states[self.frame]
    }

    pub fn history(&self) -> &[State] {
        &self.states
    }

    pub fn can_rewind(&self) -> bool {
        self.frame > 0
    }

    pub fn can_forward(&self) -> bool {
        self.frame + 1 < self.states.len()
    }

    pub fn rewind(&mut self, frames: usize) -> usize {
        self.frame = self.frame.saturating_sub(frames);
        self.frame
    }

    pub fn forward(&mut self, frames: usize) -> usize {
        let max_frame = self.states.len().saturating_sub(1);
        self.frame = self.frame.saturating_add(frames).min(max_frame);
        self.frame
    }

    pub fn record(&mut self, state: State) -> usize {
        if self.frame + 1 < self.states.len() {
            self.states.truncate(self.frame + 1);
        }
        self.states.push(state);
        self.frame += 1;
        if let Some(limit) = self.limit {
            let excess = self.states.len().saturating_sub(limit);
            if excess > 0 {
                self.states.drain(..excess);
                self.frame -= excess;
            }
        }
        self.frame
    }
}

/// A pure state machine: `next = step(&current, input)`.
///
/// Implementations must not mutate anything outside the returned state, so a runner can
/// replay or branch any recorded history.
pub trait TransitionLogic {
    type State;
    type Input;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State;
}

#[derive(Debug)]
pub struct HeadlessRunner<L: TransitionLogic> {
    logic: L,
    timemachine: TimeMachine<L::State>,
}

impl<L: TransitionLogic> HeadlessRunner<L> {
    pub fn new(logic: L) -> Self {
        let initial_state = logic.initial_state();
        Self {
            logic,
            timemachine: TimeMachine::new(initial_state),
        }
    }

    /// Like `new`, but bounds the recorded history to `limit` states.
    pub fn with_history_limit(logic: L, limit: usize) -> Self {
        let initial_state = logic.initial_state();
        Self {
            logic,
            timemachine: TimeMachine::with_limit(initial_state, limit),
        }
    }

    pub fn frame(&self) -> usize {
        self.timemachine.frame()
    }

    pub fn state(&self) -> &L::State {
        self.timemachine.state()
    }

    pub fn history(&self) -> &[L::State] {
        self.timemachine.history()
    }

    pub fn step(&mut self, input: L::Input) -> usize {
        let next_state = self.logic.step(self.timemachine.state(), input);
        let frame = self.timemachine.record(next_state);
        tracing::trace!(frame, "runner step");
        frame
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = L::Input>,
    {
        let mut last_frame = self.frame();
        for input in inputs {
            last_frame = self.step(input);
        }
        last_frame
    }

    pub fn can_rewind(&self) -> bool {
        self.timemachine.can_rewind()
    }

    pub fn can_forward(&self) -> bool {
        self.timemachine.can_forward()
    }

    pub fn rewind(&mut self, frames: usize) -> usize {
        self.timemachine.rewind(frames)
    }

    pub fn forward(&mut self, frames: usize) -> usize {
        self.timemachine.forward(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Additive;

    impl TransitionLogic for Additive {
        type State = i32;
        type Input = i32;

        fn initial_state(&self) -> Self::State {
            0
        }

        fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
            *state + input
        }
    }

    #[test]
    fn timemachine_rewind_and_branch() {
        let mut tm = TimeMachine::new(0);
        tm.record(1);
        tm.record(2);
        assert_eq!(tm.state(), &2);

        tm.rewind(1);
        assert_eq!(tm.state(), &1);

        tm.record(99);
        assert_eq!(tm.history(), &[0, 1, 99]);
        assert_eq!(tm.frame(), 2);
    }

    #[test]
    fn forward_stops_at_newest_state() {
        let mut tm = TimeMachine::new('a');
        tm.record('b');
        tm.rewind(1);
        assert!(!tm.can_rewind());
        assert!(tm.can_forward());
        assert_eq!(tm.forward(10), 1);
        assert_eq!(tm.state(), &'b');
        assert!(!tm.can_forward());
    }

    #[test]
    fn runner_steps_rewinds_and_forwards() {
        let mut runner = HeadlessRunner::new(Additive);
        runner.run([1, 2, 3]);
        assert_eq!(runner.frame(), 3);
        assert_eq!(runner.state(), &6);

        runner.rewind(2);
        assert_eq!(runner.state(), &1);

        runner.forward(1);
        assert_eq!(runner.state(), &3);
    }

    #[test]
    fn limited_history_forgets_oldest_states() {
        let mut runner = HeadlessRunner::with_history_limit(Additive, 3);
        runner.run([1, 1, 1, 1]);
        assert_eq!(runner.history(), &[2, 3, 4]);
        assert_eq!(runner.frame(), 2);
        assert_eq!(runner.rewind(5), 0);
        assert_eq!(runner.state(), &2);
    }
}
