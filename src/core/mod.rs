/*!
# Core Module

Error handling and source positions shared by every other module.
*/

pub mod errors;
pub mod position;

pub use errors::{Result, TreeGenError};
pub use position::{LineColumn, LineIndex, SourceSpan, UNKNOWN_OFFSET};
