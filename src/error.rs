use thiserror::Error;

/// Reasons a document is refused before or during parsing.
///
/// Malformed markup is never an error; it degrades to literal text. These
/// variants only guard against input too big or too deeply nested to handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input is {len} bytes, the limit is {max}")]
    InputTooLarge { len: usize, max: usize },

    #[error("markup nests deeper than {max_depth} levels")]
    InputTooComplex { max_depth: usize },
}
