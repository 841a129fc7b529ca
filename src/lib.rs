//! Coral: in-memory container primitives
//!
//! Coral provides a growable contiguous sequence ([`FlexVec`]), a
//! red-black-tree-backed ordered map ([`OrdMap`]), and a LIFO adapter
//! ([`Stack`]) built on top of the sequence.
//!
//! All containers report fallible growth through [`Result`] instead of
//! aborting, and the ordered map hands out stable [`NodeId`] handles that
//! survive unrelated mutations.
//!
//! # Examples
//!
//! ```
//! use coral::{FlexVec, OrdMap, Stack};
//!
//! let mut xs = FlexVec::new();
//! xs.push(1)?;
//! xs.push(2)?;
//! assert_eq!(xs.as_slice(), &[1, 2]);
//!
//! let mut map = OrdMap::new();
//! map.insert("b", 2)?;
//! map.insert("a", 1)?;
//! assert_eq!(map.first(), Some((&"a", &1)));
//!
//! let mut stack = Stack::new();
//! stack.push("bottom")?;
//! stack.push("top")?;
//! assert_eq!(stack.pop(), Some("top"));
//! # Ok::<(), coral::CoralError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod containers;
pub mod error;
pub mod memory;
pub mod tree;

pub use containers::{FlexVec, Stack};
pub use error::{CoralError, Result};
pub use memory::NodeId;
pub use tree::{LessThan, Natural, OrdMap};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Announce the library on the `log` facade
///
/// Optional; containers work without it.
pub fn init() {
    log::debug!("coral containers v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_containers_work_together() {
        let mut index: OrdMap<&str, FlexVec<i32>> = OrdMap::new();
        index.get_or_default("evens").unwrap().push(2).unwrap();
        index.get_or_default("evens").unwrap().push(4).unwrap();
        index.get_or_default("odds").unwrap().push(1).unwrap();

        assert_eq!(index.at("evens").unwrap().as_slice(), &[2, 4]);

        let mut order = Stack::new();
        for key in index.keys() {
            order.push(*key).unwrap();
        }
        assert_eq!(order.pop(), Some("odds"));
        assert_eq!(order.pop(), Some("evens"));
    }
}
