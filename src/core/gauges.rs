use serde::{Deserialize, Serialize};

use super::model::Need;

pub const MAX_LEVEL: u8 = 100;

/// Accumulated unmet-need levels for the growable needs, each in [0, 100].
///
/// Levels only rise (passive ticks, signal boosts) until the matching alert is
/// dismissed, which resets that level to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedGauges {
    pub food: u8,
    pub water: u8,
    pub restroom: u8,
}

impl NeedGauges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level for a growable need; `None` for Emergency and Calm.
    pub fn level(&self, need: Need) -> Option<u8> {
        match need {
            Need::Food => Some(self.food),
            Need::Water => Some(self.water),
            Need::Restroom => Some(self.restroom),
            Need::Emergency | Need::Calm => None,
        }
    }

    fn level_mut(&mut self, need: Need) -> Option<&mut u8> {
        match need {
            Need::Food => Some(&mut self.food),
            Need::Water => Some(&mut self.water),
            Need::Restroom => Some(&mut self.restroom),
            Need::Emergency | Need::Calm => None,
        }
    }

    /// Raise every growable level by `increment`, saturating at 100.
    pub fn passive_tick(&mut self, increment: u8) {
        for need in Need::GROWABLE {
            self.boost(need, increment);
        }
    }

    /// Raise one level by `amount`, saturating at 100. Returns false when the
    /// need has no gauge.
    pub fn boost(&mut self, need: Need, amount: u8) -> bool {
        match self.level_mut(need) {
            Some(level) => {
                *level = level.saturating_add(amount).min(MAX_LEVEL);
                true
            }
            None => false,
        }
    }

    /// Reset one level to exactly 0.
    pub fn reset(&mut self, need: Need) {
        if let Some(level) = self.level_mut(need) {
            *level = 0;
        }
    }

    /// `100 - average(levels)`, in [0, 100].
    pub fn comfort_score(&self) -> f64 {
        let total = f64::from(self.food) + f64::from(self.water) + f64::from(self.restroom);
        100.0 - total / 3.0
    }
}
