//! Imperivm common types.
//!
//! This crate provides the data shared by the front end and the executor:
//!
//! - [`Operand`]: a literal or an identifier, as written in source
//! - [`Instruction`] / [`Block`]: the instruction tree of a subroutine
//! - [`Value`]: runtime values held in bindings, on the stack and in the heap
//! - [`Program`]: the subroutine table with its `main` entry point
//! - [`ProgramError`]: errors from building a program
//! - [`ensure_sufficient_stack`]: stack growth for recursive parsing and execution
//!
//! # Dependencies
//!
//! This crate uses `thiserror` for errors and `stacker` for stack growth.

pub mod error;
pub mod instruction;
pub mod program;
pub mod stack;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::ProgramError;
pub use instruction::{ArithmeticOp, BitwiseOp, Block, Branch, Instruction, Name, Operand};
pub use program::{Program, ENTRY_POINT};
pub use stack::ensure_sufficient_stack;
pub use value::Value;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy that generates a random subroutine name.
    fn arb_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,8}"
    }

    proptest! {
        /// Any table of distinct names containing `main` builds, and every
        /// name can be looked up afterwards.
        #[test]
        fn distinct_names_with_main_build(
            names in prop::collection::btree_set(arb_name(), 0..12)
        ) {
            let mut entries: Vec<(Name, Block)> = names
                .iter()
                .filter(|n| n.as_str() != ENTRY_POINT)
                .map(|n| (n.clone(), Block::default()))
                .collect();
            entries.push((ENTRY_POINT.to_string(), Block::default()));

            let program = Program::new(entries.clone()).unwrap();
            prop_assert_eq!(program.len(), entries.len());
            for (name, _) in &entries {
                prop_assert!(program.subroutine(name).is_some());
            }
        }

        /// Integer truthiness matches "nonzero".
        #[test]
        fn integer_truthiness(n in any::<i64>()) {
            prop_assert_eq!(Value::Integer(n).is_truthy(), n != 0);
        }
    }
}
