use rand::Rng;

pub const TOKEN_LEN: usize = 7;

/// True iff `line` is exactly seven lowercase ASCII letters.
pub fn is_valid_token(line: &[u8]) -> bool {
    line.len() == TOKEN_LEN && line.iter().all(u8::is_ascii_lowercase)
}

pub fn random_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TOKEN_LEN)
        .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
        .collect()
}
