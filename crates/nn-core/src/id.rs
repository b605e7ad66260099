use lasso::{Spur, ThreadedRodeo};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for page IDs: fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Number of characters in a page ID.
pub const ID_LEN: usize = 6;

/// Characters a page ID may contain.
pub const ID_ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Why a string was rejected as a page ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("page id `{0}` must be exactly 6 characters")]
    Length(String),
    #[error("page id `{0}` may only contain lowercase letters and digits")]
    Charset(String),
}

/// A validated, interned page identifier (`[a-z0-9]{6}`).
/// Internally a `Spur` index: 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(Spur);

impl PageId {
    /// Validate and intern `s`.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.len() != ID_LEN {
            return Err(IdError::Length(s.to_string()));
        }
        if !s.bytes().all(|b| ID_ALPHABET.contains(&b)) {
            return Err(IdError::Charset(s.to_string()));
        }
        Ok(PageId(INTERNER.get_or_intern(s)))
    }

    /// Draw a random ID. Uniqueness against the registry is the caller's job.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let s: String = (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        PageId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PageId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn interning_roundtrip() {
        let a = PageId::parse("a1b2c3").unwrap();
        let b = PageId::parse("a1b2c3").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "a1b2c3");
    }

    #[test]
    fn rejects_bad_ids() {
        assert_eq!(
            PageId::parse("abc"),
            Err(IdError::Length("abc".to_string()))
        );
        assert_eq!(
            PageId::parse("ABCDEF"),
            Err(IdError::Charset("ABCDEF".to_string()))
        );
        assert!(PageId::parse("abc-12").is_err());
    }

    #[test]
    fn generated_ids_are_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let id = PageId::generate(&mut rng);
            assert!(PageId::parse(id.as_str()).is_ok(), "bad id {id}");
        }
    }

    #[test]
    fn deserialize_validates() {
        let ok: PageId = serde_json::from_str("\"zz9900\"").unwrap();
        assert_eq!(ok.as_str(), "zz9900");
        assert!(serde_json::from_str::<PageId>("\"nope\"").is_err());
    }
}
