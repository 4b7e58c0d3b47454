//! Canned screening profiles for the two fund categories.
//!
//! "Papel" funds hold real-estate debt, "Tijolo" ("bricks") funds hold
//! physical property. Each category has an anchor (conservative) and a
//! growth variant.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dataset::Column;
use crate::filter::{BoundSide, RangeConstraint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    PaperAnchor,
    PaperGrowth,
    BrickAnchor,
    BrickGrowth,
}

/// Bounds written by a preset. Bounds not listed are left as they were.
pub type PresetBounds = &'static [(Column, BoundSide, Decimal)];

const PAPER_ANCHOR: PresetBounds = &[
    (Column::PriceToBook, BoundSide::Min, Decimal::from_parts(90, 0, 0, false, 2)),
    (Column::PriceToBook, BoundSide::Max, Decimal::ONE),
    (Column::DividendYield, BoundSide::Min, Decimal::from_parts(8, 0, 0, false, 2)),
];

const PAPER_GROWTH: PresetBounds = &[
    (Column::PriceToBook, BoundSide::Min, Decimal::from_parts(85, 0, 0, false, 2)),
    (Column::PriceToBook, BoundSide::Max, Decimal::ONE),
    (Column::DividendYield, BoundSide::Min, Decimal::from_parts(10, 0, 0, false, 2)),
];

const BRICK_ANCHOR: PresetBounds = &[
    (Column::PriceToBook, BoundSide::Min, Decimal::from_parts(94, 0, 0, false, 2)),
    (Column::PriceToBook, BoundSide::Max, Decimal::from_parts(105, 0, 0, false, 2)),
    (Column::DividendYield, BoundSide::Min, Decimal::from_parts(8, 0, 0, false, 2)),
];

const BRICK_GROWTH: PresetBounds = &[
    (Column::PriceToBook, BoundSide::Min, Decimal::from_parts(80, 0, 0, false, 2)),
    (Column::PriceToBook, BoundSide::Max, Decimal::from_parts(105, 0, 0, false, 2)),
    (Column::DividendYield, BoundSide::Min, Decimal::from_parts(10, 0, 0, false, 2)),
];

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::PaperAnchor,
        Preset::PaperGrowth,
        Preset::BrickAnchor,
        Preset::BrickGrowth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::PaperAnchor => "papel-anc",
            Preset::PaperGrowth => "papel-cresc",
            Preset::BrickAnchor => "tijolo-anc",
            Preset::BrickGrowth => "tijolo-cresc",
        }
    }

    pub fn bounds(self) -> PresetBounds {
        match self {
            Preset::PaperAnchor => PAPER_ANCHOR,
            Preset::PaperGrowth => PAPER_GROWTH,
            Preset::BrickAnchor => BRICK_ANCHOR,
            Preset::BrickGrowth => BRICK_GROWTH,
        }
    }

    /// Range the preset alone would give `column`.
    pub fn range(self, column: Column) -> RangeConstraint {
        let mut range = RangeConstraint::default();
        for &(c, side, value) in self.bounds() {
            if c == column {
                range.set(side, Some(value));
            }
        }
        range
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
                format!("Unknown preset '{}'. Use one of: {}", s, names.join(", "))
            })
    }
}
