//! Verification codes for phone login.
//!
//! There is no SMS gateway; codes are logged so they can be read off the
//! server output.

use rand::Rng;

/// Generate a numeric code of `length` digits with no leading zero.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let length = length.max(1);
    let mut code = String::with_capacity(length);
    code.push(char::from(b'0' + rng.gen_range(1..=9)));
    for _ in 1..length {
        code.push(char::from(b'0' + rng.gen_range(0..=9)));
    }
    code
}
