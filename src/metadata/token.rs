use std::fmt;

/// A constant-pool token: the 1-based index of an entry in a class file's constant pool.
///
/// Index 0 never names an entry; it is used by the format to mean "absent" (for example a
/// class without a super class, or an inner-class record without an outer class).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u16);

impl Token {
    /// Creates a new token from a raw pool index
    #[must_use]
    pub fn new(value: u16) -> Self {
        Token(value)
    }

    /// Returns the raw pool index
    #[must_use]
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Returns the pool index as a `usize` for slice access
    #[must_use]
    pub fn index(&self) -> usize {
        usize::from(self.0)
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for Token {
    fn from(value: u16) -> Self {
        Token(value)
    }
}

impl From<Token> for u16 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(#{})", self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_token_value() {
        let token = Token::new(7);
        assert_eq!(token.value(), 7);
        assert_eq!(token.index(), 7);
        assert_eq!(u16::from(token), 7);
    }

    #[test]
    fn test_token_null() {
        assert!(Token(0).is_null());
        assert!(!Token(1).is_null());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(format!("{}", Token(12)), "#12");
        assert_eq!(format!("{:?}", Token(12)), "Token(#12)");
    }

    #[test]
    fn test_token_as_key() {
        let mut map = HashMap::new();
        map.insert(Token(1), "first");
        map.insert(Token::from(2), "second");

        assert_eq!(map.get(&Token(1)), Some(&"first"));
        assert_eq!(map.len(), 2);
    }
}
