//! Opaque handles to host objects.
//!
//! A handle is the address of a host object, carried as a plain integer so
//! it can cross the socket boundary. Handles are never null: host calls
//! that can return a null pointer produce `Option<Handle>` instead.
use serde_derive::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

macro_rules! impl_handle {
    ($name: ident, $type_name: literal) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        pub struct $name(u64);
        impl $name {
            /// Wrap a raw address. Returns None for null.
            pub fn new(address: u64) -> Option<Self> {
                match address {
                    0 => None,
                    addr => Some(Self(addr)),
                }
            }
            pub fn address(&self) -> u64 {
                self.0
            }
            pub(crate) fn from_ptr<T>(ptr: *mut T) -> Option<Self> {
                Self::new(ptr as usize as u64)
            }
            pub(crate) fn as_ptr<T>(&self) -> *mut T {
                self.0 as usize as *mut T
            }
        }
        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "({}){:#018x}", $type_name, self.0)
            }
        }
    };
}

impl_handle!(ProjectId, "ReaProject*");
impl_handle!(TrackId, "MediaTrack*");
impl_handle!(ItemId, "MediaItem*");
