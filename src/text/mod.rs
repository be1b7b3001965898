/*!
 * Text primitives shared by all profiles: script detection and
 * normalization.
 */

pub mod normalize;
pub mod script;

pub use normalize::{char_len, collapse_whitespace, nfc, percent1, round1, truncate_chars};
pub use script::Script;
