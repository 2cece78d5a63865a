//! Integer arithmetic shared by the interpreter and the VM.

/// Division rounding toward negative infinity, so `-7 / 2 == -4` and
/// `7 / -2 == -4`. Returns `None` for a zero divisor or on overflow.
pub fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}
