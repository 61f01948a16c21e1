//! CARv1 framing: a DAG-CBOR header followed by length-prefixed blocks.
//!
//! See <https://ipld.io/specs/transport/car/carv1/>.

pub mod header;
pub mod util;

pub use header::CarHeader;
pub use util::{ld_size, ld_write, put_uvarint, uvarint_len, write_block};
