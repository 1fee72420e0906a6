use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldDefError {
    #[error("Parse Error: {error_kind:?}")]
    ParseError { error_kind: nom::error::ErrorKind },

    #[error("Parse Error: incomplete input ({needed:?})")]
    ParseIncompleteError { needed: nom::Needed },

    #[error("Wrong space format field {fieldno}: {reason}")]
    WrongSpaceFormat { fieldno: u32, reason: String },

    #[error("Wrong space format: {reason}")]
    WrongFormat { reason: String },

    #[error("Illegal parameters, {reason}")]
    IllegalParams { reason: String },

    #[error("Invalid identifier '{name}' (expected printable symbols only or it is too long)")]
    InvalidIdentifier { name: String },

    #[error("Failed to allocate {size} bytes in {allocator} for {object}")]
    OutOfMemory {
        size: usize,
        allocator: &'static str,
        object: &'static str,
    },
}

impl FieldDefError {
    pub(crate) fn illegal_params<S: Into<String>>(reason: S) -> Self {
        Self::IllegalParams {
            reason: reason.into(),
        }
    }
}

impl<I> nom::error::ParseError<I> for FieldDefError {
    fn from_error_kind(_input: I, kind: nom::error::ErrorKind) -> Self {
        Self::ParseError { error_kind: kind }
    }

    fn append(_input: I, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

impl From<nom::Err<FieldDefError>> for FieldDefError {
    fn from(error: nom::Err<FieldDefError>) -> Self {
        match error {
            nom::Err::Incomplete(needed) => Self::ParseIncompleteError { needed },
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
        }
    }
}

pub type Result<T, E = FieldDefError> = std::result::Result<T, E>;
