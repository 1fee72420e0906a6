use crate::error::{FieldDefError, Result};

fn is_printable(c: char) -> bool {
    !(c.is_control() || c == '\u{2028}' || c == '\u{2029}')
}

/// Check that `name` is a usable identifier: non-empty UTF-8 made of printable
/// characters only.
pub fn identifier_check(name: &[u8]) -> Result<&str> {
    let invalid = || FieldDefError::InvalidIdentifier {
        name: String::from_utf8_lossy(name).into_owned(),
    };
    let name = std::str::from_utf8(name).map_err(|_| invalid())?;
    if name.is_empty() || !name.chars().all(is_printable) {
        return Err(invalid());
    }
    Ok(name)
}
