//! Program representation: the table of named subroutines.
//!
//! A program is built once from the parsed source and never mutated while
//! it runs.

use std::collections::BTreeMap;

use crate::error::ProgramError;
use crate::instruction::{Block, Name};

/// Name of the subroutine execution starts from.
pub const ENTRY_POINT: &str = "main";

/// An Imperivm program: subroutine name to body.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    subroutines: BTreeMap<Name, Block>,
}

impl Program {
    /// Build a program from `(name, body)` pairs in definition order.
    ///
    /// Names must be unique and one of them must be [`ENTRY_POINT`].
    pub fn new<I>(subroutines: I) -> Result<Self, ProgramError>
    where
        I: IntoIterator<Item = (Name, Block)>,
    {
        let mut table = BTreeMap::new();
        for (name, block) in subroutines {
            if table.contains_key(&name) {
                return Err(ProgramError::DuplicateSubroutine { name });
            }
            table.insert(name, block);
        }

        if !table.contains_key(ENTRY_POINT) {
            return Err(ProgramError::MissingEntryPoint);
        }

        Ok(Self { subroutines: table })
    }

    /// Look up a subroutine body by name.
    pub fn subroutine(&self, name: &str) -> Option<&Block> {
        self.subroutines.get(name)
    }

    /// The body of `main`.
    pub fn entry(&self) -> &Block {
        // Presence is checked in `new`.
        &self.subroutines[ENTRY_POINT]
    }

    /// Iterate over `(name, body)` in name order.
    pub fn subroutines(&self) -> impl Iterator<Item = (&str, &Block)> {
        self.subroutines.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of subroutines.
    pub fn len(&self) -> usize {
        self.subroutines.len()
    }

    /// Always false for a constructed program, which has at least `main`.
    pub fn is_empty(&self) -> bool {
        self.subroutines.is_empty()
    }
}
