use crate::BlockId;
use crc32fast::Hasher;

/// Stable id prefix for a document, derived from its id or slug with CRC32
pub fn document_seed(document_key: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(document_key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential block id generator for one edit session
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(document_key: &str) -> Self {
        Self {
            seed: document_seed(document_key),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> BlockId {
        self.count += 1;
        BlockId::new(format!("{}-{}", self.seed, self.count))
    }

    /// Next sequential id that `is_taken` does not reject.
    ///
    /// Documents loaded from storage may already contain ids from an earlier
    /// session with the same seed.
    pub fn new_unused_id(&mut self, is_taken: impl Fn(&BlockId) -> bool) -> BlockId {
        loop {
            let id = self.new_id();
            if !is_taken(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_seed_is_stable() {
        assert_eq!(document_seed("home"), document_seed("home"));
        assert_ne!(document_seed("home"), document_seed("about"));
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("home");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.as_str().ends_with("-1"));
        assert!(id2.as_str().ends_with("-2"));
        assert!(id1.as_str().starts_with(gen.seed()));
    }

    #[test]
    fn test_skips_taken_ids() {
        let mut gen = IdGenerator::from_seed("p".to_string());
        let taken = [BlockId::new("p-1"), BlockId::new("p-2")];

        let id = gen.new_unused_id(|candidate| taken.contains(candidate));
        assert_eq!(id.as_str(), "p-3");
    }
}
