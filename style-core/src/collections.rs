//! Fast hash-map/set aliases built on `rustc-hash`, matching the teacher's
//! `types::collections` re-export.

pub type FxHashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;
pub type FxHashSet<T> = std::collections::HashSet<T, rustc_hash::FxBuildHasher>;
