//! Named frame stores for gem-rs.
//!
//! A [`FrameStore`] is a fixed-capacity array of image slots. Stores are bound
//! by name in a [`StoreRegistry`] so that [`PixBufferWrite`] and
//! [`PixBufferRead`] nodes anywhere in a patch can reach the store a
//! [`PixBuffer`] owns.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod error;
pub mod frame_store;
pub mod pix_buffer;
pub mod registry;

pub use error::{PixError, PixResult};
pub use frame_store::{FrameStore, DEFAULT_NUM_FRAMES};
pub use pix_buffer::{PixBuffer, PixBufferRead, PixBufferWrite};
pub use registry::{SharedStore, StoreId, StoreRegistry};
