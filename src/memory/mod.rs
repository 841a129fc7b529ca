//! Memory management for the containers
//!
//! Two allocation primitives back the public containers: `RawBuffer`, the
//! capacity-only storage unit behind [`FlexVec`](crate::FlexVec), and
//! `SlotArena`, the node-typed slab behind the ordered map's tree.

mod arena;
mod buffer;

pub use arena::NodeId;
pub(crate) use arena::SlotArena;
pub(crate) use buffer::RawBuffer;
