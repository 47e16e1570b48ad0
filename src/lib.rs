//! Primitive collections for heap-dump analysis.
//!
//! A heap dump holds tens of millions of objects, identified by 64-bit
//! addresses and, once indexed, by 32-bit ids. Generic collections box or
//! pad every entry; the containers here store flat arrays of primitives
//! instead. The hashed ones share one open-addressed table ([`table`]) with a
//! prime capacity, a fixed prime probe stride and tombstone-free removal;
//! [`HashMapObjectLong`] applies the same probing to hashable object keys.

pub mod array;
pub mod array_utils;
pub mod bit_field;
pub mod error;
pub mod hashers;
pub mod map_int_long;
pub mod map_int_object;
pub mod map_long_object;
pub mod map_object_long;
pub mod prime;
pub mod set_int;
pub mod set_long;
pub mod table;

pub use array::{ArrayInt, ArrayLong, PrimitiveArray};
pub use bit_field::ConcurrentBitField;
pub use error::{CollectError, CollectResult};
pub use hashers::{MurmurHasher, NoopHasher, StatelessU64Hasher};
pub use map_int_long::HashMapIntLong;
pub use map_int_object::HashMapIntObject;
pub use map_long_object::HashMapLongObject;
pub use map_object_long::HashMapObjectLong;
pub use set_int::SetInt;
pub use set_long::SetLong;
