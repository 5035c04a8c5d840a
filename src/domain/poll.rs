/// Attempt counter for the post-trigger poll loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollBudget {
    count: u32,
    max: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollStep {
    Continue,
    Exhausted,
}

/// How a poll loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The final attempt fetched live data.
    Completed,
    GaveUp,
}

impl PollBudget {
    pub fn new(max: u32) -> Self {
        Self { count: 0, max }
    }

    /// Records one attempt. `Exhausted` means this attempt was the last one.
    pub fn tick(&mut self) -> PollStep {
        self.count = self.count.saturating_add(1);
        if self.count >= self.max {
            PollStep::Exhausted
        } else {
            PollStep::Continue
        }
    }

    pub fn attempts(&self) -> u32 {
        self.count
    }

    pub fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.count)
    }
}
