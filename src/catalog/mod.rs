//! Library catalog: the read-only table of tracked script assets.
//!
//! The catalog maps an asset filename (e.g. `jquery.min.js`) to its known
//! identity: where the minified build lives, the SHA-256 digest its content
//! is expected to have, and where the un-minified counterpart can be fetched.
//!
//! It is loaded once at startup from a JSON catalog file and never mutated
//! afterwards, so lookups during request processing need no locking.
//!
//! # Catalog file format
//!
//! ```json
//! {
//!   "libraries": [
//!     {
//!       "name": "jquery.min.js",
//!       "minURI": "https://code.jquery.com/jquery-3.7.1.min.js",
//!       "minSha256Digest": "fc9a93dd241f6b045cbff0481cf4e1901becd0e12fb45166a8f17f95823f0b1a",
//!       "maxURI": "https://code.jquery.com/jquery-3.7.1.js",
//!       "maxSha256Digest": "1dd7fc110fa01b0aae5e46d4af0bd60a42bb8f8c0e653b6f8b4e8c6e0d0a3a4e"
//!     }
//!   ]
//! }
//! ```
//!
//! `maxSha256Digest` is optional; the un-minified variant is not always
//! pinned to a digest.

mod error;
mod store;

pub use error::CatalogError;
pub use store::{Catalog, LibraryEntry};
