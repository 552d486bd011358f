use core::fmt;

use k256::elliptic_curve::Field;
use k256::Scalar;
use rand_core::CryptoRngCore;

use crate::errors::AccaError;

pub const SCALAR_LEN: usize = 32;              // big-endian scalar encoding
pub const DIGEST_LEN: usize = SCALAR_LEN;
pub const RAND_LEN: usize = SCALAR_LEN;
pub const SK_LEN: usize = SCALAR_LEN;
pub const BLINDING_LEN: usize = SCALAR_LEN;
pub const HASH_LEN: usize = 33;                // compressed SEC1 point
pub const PK_COMPRESSED_LEN: usize = 33;
pub const PK_UNCOMPRESSED_LEN: usize = 65;
pub const LEVEL_LEN: usize = RAND_LEN + HASH_LEN;

/// Scalar-domain digest of a message or of two child hashes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)] pub struct Digest(pub [u8; DIGEST_LEN]);

/// Chameleon hash randomness. Must encode a scalar below the group order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)] pub struct Randomness(pub [u8; RAND_LEN]);

/// Chameleon hash output: a compressed point, or a random-oracle output
/// whose last byte is forced to zero.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)] pub struct Hash(pub [u8; HASH_LEN]);

/// Scheme-wide blinding exponent `w`. Public.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)] pub struct Blinding(pub [u8; BLINDING_LEN]);

/// Trapdoor secret key.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)] pub struct SecretKey(pub [u8; SK_LEN]);

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

impl SecretKey {
    /// Sample a uniformly random non-zero secret key.
    pub fn generate(rng: &mut impl CryptoRngCore) -> Self {
        let s = loop {
            let s = Scalar::random(&mut *rng);
            if !bool::from(s.is_zero()) { break s; }
        };
        let mut out = [0u8; SK_LEN];
        out.copy_from_slice(&s.to_bytes());
        Self(out)
    }
}

/// SEC1 encoded chameleon public key, compressed (33 bytes) or uncompressed (65 bytes).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PublicKey(pub Vec<u8>);

impl PublicKey {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    #[must_use]
    pub fn is_compressed(&self) -> bool { self.0.len() == PK_COMPRESSED_LEN }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = AccaError;
    fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
        match b.len() {
            PK_COMPRESSED_LEN | PK_UNCOMPRESSED_LEN => Ok(Self(b.to_vec())),
            got => Err(AccaError::InvalidLength { expected: PK_COMPRESSED_LEN, got }),
        }
    }
}

// Exact-sized decode helpers
macro_rules! impl_tryfrom_slice {
    ($t:ty, $len:expr) => {
        impl TryFrom<&[u8]> for $t {
            type Error = AccaError;
            fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
                if b.len() != $len {
                    return Err(AccaError::InvalidLength { expected: $len, got: b.len() });
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(b);
                Ok(Self(arr))
            }
        }
    }
}
impl_tryfrom_slice!(Digest, DIGEST_LEN);
impl_tryfrom_slice!(Randomness, RAND_LEN);
impl_tryfrom_slice!(Hash, HASH_LEN);
impl_tryfrom_slice!(Blinding, BLINDING_LEN);
impl_tryfrom_slice!(SecretKey, SK_LEN);
