//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::BTreeMap;

/// SmallVec sized for component aliases (usually 1-2).
pub type SmallVec2<T> = SmallVec<[T; 2]>;

/// SmallVec sized for declared actions and subcomponents (usually <4).
pub type SmallVec4<T> = SmallVec<[T; 4]>;
