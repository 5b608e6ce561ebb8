/// Rarity tier: a presentation class derived from a reward amount.
use serde::{Deserialize, Serialize};

pub const RARE_FROM: u32 = 5;
pub const LEGENDARY_FROM: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Common = 0,
    Rare = 1,
    Legendary = 2,
}

impl Tier {
    /// The only way to obtain a tier: it is never chosen independently of the amount.
    #[inline]
    pub fn from_amount(amount: u32) -> Self {
        if amount >= LEGENDARY_FROM {
            Tier::Legendary
        } else if amount >= RARE_FROM {
            Tier::Rare
        } else {
            Tier::Common
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Common => "common",
            Tier::Rare => "rare",
            Tier::Legendary => "legendary",
        }
    }
}
