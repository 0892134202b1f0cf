use crate::error::{Result, StatementError};

/// Decodes a Brazilian-locale amount string into a signed float.
///
/// Transformation order: a wrapping `(` becomes a leading minus sign, `)` is
/// dropped, `.` (thousands separator) is dropped, `,` becomes the decimal
/// point, and the residue is parsed as a float.
///
/// `"(1.234,56)"` → `-1234.56`, `"1.000,00"` → `1000.0`, `"-500,00"` → `-500.0`.
pub fn decode_amount(text: &str) -> Result<f64> {
    let mut cleaned = String::with_capacity(text.len());

    for c in text.trim().chars() {
        match c {
            '(' => cleaned.push('-'),
            ')' | '.' => {}
            ',' => cleaned.push('.'),
            _ => cleaned.push(c),
        }
    }

    cleaned
        .trim()
        .parse::<f64>()
        .map_err(|_| StatementError::InvalidAmount(text.to_string()))
}
