//! Personality categories
//!
//! The four quiz outcomes. Declaration order matters twice: it is the
//! tie-break order for winner selection and the 0-based enum encoding used by
//! the onchain contract. Both sides derive from `Category::ALL`, never from a
//! second table.

use serde::{Deserialize, Serialize};

/// One of the four fixed personality outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Bitcoin,
    Ethereum,
    Solana,
    Dogecoin,
}

impl Category {
    /// All categories in declaration order. Index in this array is the wire
    /// encoding expected by the contract.
    pub const ALL: [Category; 4] = [
        Category::Bitcoin,
        Category::Ethereum,
        Category::Solana,
        Category::Dogecoin,
    ];

    /// Number of categories.
    pub const COUNT: usize = Self::ALL.len();

    /// 0-based wire index (matches the contract's enum).
    pub fn as_index(self) -> u8 {
        match self {
            Category::Bitcoin => 0,
            Category::Ethereum => 1,
            Category::Solana => 2,
            Category::Dogecoin => 3,
        }
    }

    /// Inverse of [`as_index`](Self::as_index).
    pub fn from_index(index: u8) -> Option<Category> {
        Self::ALL.get(index as usize).copied()
    }

    /// Short name as shown to users.
    pub fn name(self) -> &'static str {
        match self {
            Category::Bitcoin => "Bitcoin",
            Category::Ethereum => "Ethereum",
            Category::Solana => "Solana",
            Category::Dogecoin => "Dogecoin",
        }
    }

    /// Result headline for this personality.
    pub fn title(self) -> &'static str {
        match self {
            Category::Bitcoin => "Bitcoin: The Pioneer",
            Category::Ethereum => "Ethereum: The Innovator",
            Category::Solana => "Solana: The Speedster",
            Category::Dogecoin => "Dogecoin: The Meme King/Queen",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
