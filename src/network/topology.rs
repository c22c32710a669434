//! Links grammar → closed topology tag.
//!
//! Two layouts are recognized, written as comma-separated `from-->to` hops
//! where `X` and `Y` are indices into the layout list:
//!
//! ```text
//! sense-->X,X-->out            OneTier
//! sense-->X,X-->Y,Y-->out      TwoTierFeedForward
//! ```

use std::fmt;

use crate::{Error, Result};

const SENSE: &str = "sense";
const OUT: &str = "out";
const HOP: &str = "-->";

/// Tier topology of a model; fields are layout indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    OneTier { tier1: usize },
    TwoTierFeedForward { tier1: usize, tier2: usize },
}

impl Topology {
    /// Parse a normalized links string (lowercase, no whitespace).
    ///
    /// Hop names between `sense` and `out` must be layout indices, and tiers
    /// run in the order the hops name them rather than layout order:
    /// `sense-->1,1-->0,0-->out` evaluates layout entry 1 first.
    pub fn parse(links: &str) -> Result<Self> {
        let unexpected = || Error::UnexpectedLayout(links.to_string());

        let hops = links
            .split(',')
            .map(|hop| hop.split_once(HOP).ok_or_else(unexpected))
            .collect::<Result<Vec<_>>>()?;

        match hops.as_slice() {
            [(SENSE, x), (x2, OUT)] if x == x2 => Ok(Topology::OneTier {
                tier1: layout_index(x).ok_or_else(unexpected)?,
            }),
            [(SENSE, x), (x2, y), (y2, OUT)] if x == x2 && y == y2 => {
                Ok(Topology::TwoTierFeedForward {
                    tier1: layout_index(x).ok_or_else(unexpected)?,
                    tier2: layout_index(y).ok_or_else(unexpected)?,
                })
            }
            _ => Err(unexpected()),
        }
    }

    pub fn n_tiers(&self) -> usize {
        match self {
            Topology::OneTier { .. } => 1,
            Topology::TwoTierFeedForward { .. } => 2,
        }
    }

    /// Layout indices in evaluation order.
    pub fn tier_indices(&self) -> Vec<usize> {
        match *self {
            Topology::OneTier { tier1 } => vec![tier1],
            Topology::TwoTierFeedForward { tier1, tier2 } => vec![tier1, tier2],
        }
    }

    /// Check a layout of `n_entries` component banks fits this topology:
    /// exactly one bank per tier, every index in range, no bank reused.
    pub fn check_layout(&self, n_entries: usize) -> Result<()> {
        if n_entries != self.n_tiers() {
            return Err(Error::Structure(format!(
                "{self} layout requires exactly {} component bank(s), found {n_entries}",
                self.n_tiers()
            )));
        }
        let indices = self.tier_indices();
        if let Some(i) = indices.iter().find(|&&i| i >= n_entries) {
            return Err(Error::Structure(format!(
                "links reference layout entry {i} but the layout has {n_entries}"
            )));
        }
        if indices.len() == 2 && indices[0] == indices[1] {
            return Err(Error::Structure(format!(
                "both tiers reference layout entry {}",
                indices[0]
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::OneTier { tier1 } => write!(f, "sense-->{tier1},{tier1}-->out"),
            Topology::TwoTierFeedForward { tier1, tier2 } => {
                write!(f, "sense-->{tier1},{tier1}-->{tier2},{tier2}-->out")
            }
        }
    }
}

fn layout_index(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
