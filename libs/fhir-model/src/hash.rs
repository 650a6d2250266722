//! Build-time structural hashes
//!
//! Nodes are immutable, so their hash is computed once when the builder
//! produces them and stored alongside the fields.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeHash(u64);

impl NodeHash {
    /// Hash a tuple of borrowed fields
    pub fn of<T: Hash + ?Sized>(fields: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        fields.hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Implements `Hash` for a node type by writing its stored [`NodeHash`].
macro_rules! impl_node_hash {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ::std::hash::Hash for $ty {
                fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                    state.write_u64(self.hash.get());
                }
            }
        )+
    };
}

pub(crate) use impl_node_hash;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_fields_same_hash() {
        let a = NodeHash::of(&("issue", Some(3), vec!["x"]));
        let b = NodeHash::of(&("issue", Some(3), vec!["x"]));
        assert_eq!(a, b);
        assert_ne!(a, NodeHash::of(&("issue", Some(4), vec!["x"])));
    }
}
