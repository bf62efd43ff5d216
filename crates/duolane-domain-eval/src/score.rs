use crate::judge::Judgement;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgementTally {
    pub great: u32,
    pub good: u32,
    pub miss: u32,
}

impl JudgementTally {
    pub fn judged(&self) -> u32 {
        self.great + self.good + self.miss
    }
}

/// Score and combo accumulator for one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    score: u64,
    combo: u32,
    max_combo: u32,
    tally: JudgementTally,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one judgement and returns the points it added.
    pub fn register(&mut self, judgement: Judgement) -> u64 {
        match judgement {
            Judgement::Miss => {
                self.tally.miss += 1;
                self.combo = 0;
                0
            }
            Judgement::Great | Judgement::Good => {
                if judgement == Judgement::Great {
                    self.tally.great += 1;
                } else {
                    self.tally.good += 1;
                }
                self.combo += 1;
                self.max_combo = self.max_combo.max(self.combo);
                // Bonus uses the combo including this hit.
                let gained = judgement.base_points() + combo_bonus(self.combo);
                self.score += gained;
                gained
            }
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn tally(&self) -> JudgementTally {
        self.tally
    }

    /// Share of judged notes that were not misses, in `0.0..=1.0`.
    pub fn accuracy(&self) -> f32 {
        let judged = self.tally.judged();
        if judged == 0 {
            0.0
        } else {
            (self.tally.great + self.tally.good) as f32 / judged as f32
        }
    }
}

/// `floor(combo * 1.5)` in integer arithmetic.
fn combo_bonus(combo: u32) -> u64 {
    let combo = combo as u64;
    combo + combo / 2
}
