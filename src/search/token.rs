/// Identifies one outbound request. Later requests get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
pub struct TokenMint {
    last: u64,
}

impl TokenMint {
    pub fn mint(&mut self) -> RequestToken {
        self.last += 1;
        RequestToken(self.last)
    }
}

/// The one request allowed to update a piece of state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latest(Option<RequestToken>);

impl Latest {
    pub fn set(&mut self, token: RequestToken) {
        self.0 = Some(token);
    }

    pub fn invalidate(&mut self) {
        self.0 = None;
    }

    /// True (and releases the slot) only for the most recent token.
    pub fn complete(&mut self, token: RequestToken) -> bool {
        if self.0 == Some(token) {
            self.0 = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_increase() {
        let mut mint = TokenMint::default();
        let a = mint.mint();
        let b = mint.mint();
        assert!(b > a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_only_latest_completes() {
        let mut mint = TokenMint::default();
        let mut latest = Latest::default();
        let r1 = mint.mint();
        let r2 = mint.mint();

        latest.set(r1);
        latest.set(r2);
        assert!(!latest.complete(r1));
        assert!(latest.complete(r2));
        // Released: a duplicate delivery is ignored.
        assert!(!latest.complete(r2));
    }

    #[test]
    fn test_invalidate_rejects_everything() {
        let mut mint = TokenMint::default();
        let mut latest = Latest::default();
        let r1 = mint.mint();
        latest.set(r1);
        latest.invalidate();
        assert_eq!(latest, Latest::default());
        assert!(!latest.complete(r1));
    }
}
