//! Homebrew content and balance scoring.

mod balance;
mod content;

pub use balance::{
    analyze_balance, balance_score, power_band, power_budget, score_balance, BalanceResult,
    PowerBand, PowerBudget, BASE_BALANCE_SCORE,
};
pub use content::{
    template, validate_content, ClassAttributes, ContentAttributes, ContentReport, ContentType,
    HomebrewContent, ItemAttributes, RaceAttributes, Rarity, SpellAttributes,
};
