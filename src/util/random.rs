use crate::core::types::StateNonce;

pub trait FromRandom {
    fn from_random() -> Self;
}

impl FromRandom for StateNonce {
    fn from_random() -> Self {
        StateNonce(random_string(32))
    }
}

fn random_string(size: usize) -> String {
    use rand::Rng;

    rand::thread_rng()
        .sample_iter(rand::distributions::Alphanumeric)
        .take(size)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonces_are_alphanumeric_and_distinct() {
        let a = StateNonce::from_random();
        let b = StateNonce::from_random();

        assert_eq!(a.0.len(), 32);
        assert!(a.0.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
