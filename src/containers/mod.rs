//! Container types
//!
//! - [`FlexVec<T>`]: growable contiguous sequence with explicit allocation
//!   errors and doubling growth
//! - [`Stack<T>`]: LIFO adapter composing an owned `FlexVec`

mod flex_vec;
mod stack;

pub use flex_vec::FlexVec;
pub use stack::Stack;
