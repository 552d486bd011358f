use crate::{node::Node, scalar, types::{Digest, Randomness, SecretKey}};

const TAG_X: &[u8] = b"acca.prf.x";
const TAG_R: &[u8] = b"acca.prf.r";

/// Per-node pseudorandom values keyed by the trapdoor secret key.
///
/// Each output is `BLAKE3_keyed(sk, tag || node)`, re-hashed under the same
/// key until it is a canonical scalar.
pub struct Prf {
    key: [u8; 32],
}

impl Prf {
    #[must_use]
    pub const fn new(sk: &SecretKey) -> Self {
        Self { key: sk.0 }
    }

    /// Digest-domain value of `node`.
    #[must_use]
    pub fn x<const CT_LEN: usize>(&self, node: &Node<CT_LEN>) -> Digest {
        Digest(self.derive(TAG_X, node))
    }

    /// Randomness-domain value of `node`.
    #[must_use]
    pub fn r<const CT_LEN: usize>(&self, node: &Node<CT_LEN>) -> Randomness {
        Randomness(self.derive(TAG_R, node))
    }

    fn derive<const CT_LEN: usize>(&self, tag: &[u8], node: &Node<CT_LEN>) -> [u8; 32] {
        let mut h = blake3::Hasher::new_keyed(&self.key);
        h.update(tag);
        h.update(&node.to_bytes());
        let mut out = *h.finalize().as_bytes();
        while !scalar::is_canonical(&out) {
            out = *blake3::keyed_hash(&self.key, &out).as_bytes();
        }
        out
    }
}
