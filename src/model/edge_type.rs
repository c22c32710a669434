//! Edge types: the 16 two-input boolean functions plus `NULL`.
//!
//! The numeric codes are the ones written by the trainer into model files,
//! so the discriminants here are part of the file format.

use std::fmt;

/// Number of edge types, `NULL` included.
pub const NUM_EDGE_TYPES: usize = 17;

/// Categorical state of an edge between two boolean nodes.
///
/// Each non-null variant names the two-input boolean function that an edge
/// represents. A freshly observed edge is labeled with the minterm its two
/// endpoint bits satisfy, so only `Nor`, `Nconv`, `Nimpl` and `And` are ever
/// produced by observation; the remaining functions only appear as learned
/// states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum EdgeType {
    /// n/a: in a learned state this matches any observed edge.
    #[default]
    Null = 0,
    T = 1,
    Nor = 2,
    Nconv = 3,
    Nx = 4,
    Nimpl = 5,
    Ny = 6,
    Xor = 7,
    Nand = 8,
    And = 9,
    Nxor = 10,
    Y = 11,
    Impl = 12,
    X = 13,
    Conv = 14,
    Or = 15,
    F = 16,
}

impl EdgeType {
    /// Every edge type in code order. `NULL` is always index 0.
    pub const ALL: [EdgeType; NUM_EDGE_TYPES] = [
        EdgeType::Null,
        EdgeType::T,
        EdgeType::Nor,
        EdgeType::Nconv,
        EdgeType::Nx,
        EdgeType::Nimpl,
        EdgeType::Ny,
        EdgeType::Xor,
        EdgeType::Nand,
        EdgeType::And,
        EdgeType::Nxor,
        EdgeType::Y,
        EdgeType::Impl,
        EdgeType::X,
        EdgeType::Conv,
        EdgeType::Or,
        EdgeType::F,
    ];

    /// Observed label for each two-bit code `2*a + b`.
    pub const OBSERVED: [EdgeType; 4] = [
        EdgeType::Nor,
        EdgeType::Nconv,
        EdgeType::Nimpl,
        EdgeType::And,
    ];

    /// Numeric code as stored in model files.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a numeric code. Returns `None` outside `0..=16`.
    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Label for an edge whose endpoints carry bits `a` and `b`.
    #[inline]
    pub const fn observe(a: bool, b: bool) -> Self {
        Self::OBSERVED[((a as usize) << 1) | b as usize]
    }

    pub const fn is_null(self) -> bool {
        matches!(self, EdgeType::Null)
    }

    pub const fn name(self) -> &'static str {
        match self {
            EdgeType::Null => "NULL",
            EdgeType::T => "T",
            EdgeType::Nor => "NOR",
            EdgeType::Nconv => "NCONV",
            EdgeType::Nx => "NX",
            EdgeType::Nimpl => "NIMPL",
            EdgeType::Ny => "NY",
            EdgeType::Xor => "XOR",
            EdgeType::Nand => "NAND",
            EdgeType::And => "AND",
            EdgeType::Nxor => "NXOR",
            EdgeType::Y => "Y",
            EdgeType::Impl => "IMPL",
            EdgeType::X => "X",
            EdgeType::Conv => "CONV",
            EdgeType::Or => "OR",
            EdgeType::F => "F",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
