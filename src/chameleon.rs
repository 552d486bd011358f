//! Chameleon (trapdoor) hash over secp256k1.
//!
//! `ch(m, r, n) = g^(m + (sk + n·w)·r)`. The trapdoor holder evaluates the
//! exponent directly; everybody else evaluates `pk^r · g^(m + (n - n0)·w·r)`
//! against the public key `pk = g^(sk + n0·w)`. Both paths agree.

use hmac::{Hmac, Mac};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{ProjectivePoint, Scalar};
use log::info;
use sha2::{Digest as _, Sha256};

use crate::errors::AccaError;
use crate::scalar;
use crate::types::{Blinding, Digest, Hash, PublicKey, Randomness, SecretKey};

type HmacSha256 = Hmac<Sha256>;

const RANDOM_ORACLE_KEY: &[u8; 32] = b"RandomOracleGRandomOracleGRandom";

/// Evaluation of the chameleon hash. Available in every key state.
pub trait VerifierHash {
    /// Hash `digest` under randomness `r` at level weight `n`.
    ///
    /// # Errors
    /// `Overflow` if `r` is not a canonical scalar, `Serialization` if the
    /// result is the point at infinity.
    fn ch(&self, digest: &Digest, r: &Randomness, n: u32) -> Result<Hash, AccaError>;
}

/// Trapdoor operations. Fail with `MissingSecretKey` in verify-only mode.
pub trait HolderHash: VerifierHash {
    /// Whether the trapdoor is available.
    fn has_secret_key(&self) -> bool;

    /// Randomness `r2` with `ch(d1, r1, n1) == ch(d2, r2, n2)`.
    ///
    /// # Errors
    /// `DegenerateCollision` if the only solution is `r2 == r1`.
    fn collision(&self, d1: &Digest, r1: &Randomness, n1: u32, d2: &Digest, n2: u32) -> Result<Randomness, AccaError>;

    fn secret_key(&self) -> Result<SecretKey, AccaError>;
}

enum KeyState {
    Holder { sk: Scalar, sk_inv: Scalar },
    Verifier,
}

pub struct ChameleonHash {
    key: KeyState,
    pk: ProjectivePoint,
    w: Scalar,
    // weight the public key was published under
    base_weight: u32,
}

impl ChameleonHash {
    /// Holder instance; the public key is `g^(sk + n·w)`.
    ///
    /// # Errors
    /// `InvalidSecretKey` if `sk` reduces to zero.
    pub fn new(sk: &SecretKey, w: &Blinding, n: u32) -> Result<Self, AccaError> {
        let sk = scalar::reduced(&sk.0);
        let sk_inv = Option::<Scalar>::from(sk.invert()).ok_or(AccaError::InvalidSecretKey)?;
        let w = scalar::reduced(&w.0);
        let pk = ProjectivePoint::GENERATOR * (sk + scalar::weighted(&w, n));
        Ok(Self { key: KeyState::Holder { sk, sk_inv }, pk, w, base_weight: n })
    }

    /// Verify-only instance for a public key published under weight `n`.
    ///
    /// # Errors
    /// `InvalidPublicKey` if `pk` is not a valid SEC1 encoding of a curve point.
    pub fn from_public_key(pk: &PublicKey, w: &Blinding, n: u32) -> Result<Self, AccaError> {
        let point = k256::PublicKey::from_sec1_bytes(pk.as_bytes())
            .map_err(|_| AccaError::InvalidPublicKey)?;
        Ok(Self {
            key: KeyState::Verifier,
            pk: point.to_projective(),
            w: scalar::reduced(&w.0),
            base_weight: n,
        })
    }

    #[must_use]
    pub const fn has_secret_key(&self) -> bool {
        matches!(self.key, KeyState::Holder { .. })
    }

    #[must_use]
    pub const fn base_weight(&self) -> u32 { self.base_weight }

    /// The published public key `g^(sk + n0·w)`.
    ///
    /// # Errors
    /// `Serialization` if the key is the point at infinity.
    pub fn public_key(&self, compressed: bool) -> Result<PublicKey, AccaError> {
        encode_point(&self.pk, compressed).map(PublicKey)
    }

    /// Public key for level weight `n`: `g^(sk + n·w)`, computed from public data only.
    ///
    /// # Errors
    /// `Serialization` if the key is the point at infinity.
    pub fn public_key_at(&self, n: u32, compressed: bool) -> Result<PublicKey, AccaError> {
        let shift = scalar::weight_delta(&self.w, n, self.base_weight);
        encode_point(&(self.pk + ProjectivePoint::GENERATOR * shift), compressed).map(PublicKey)
    }

    /// Recover the secret key from a collision `ch(d1, r1, n1) == ch(d2, r2, n2)`
    /// and switch this instance to holder mode.
    ///
    /// # Errors
    /// `DegenerateCollision` if `r1 == r2`, `NotACollision` if the two inputs do
    /// not hash to the same value, `NonExtractable` if the recovered key is zero.
    pub fn extract(
        &mut self,
        d1: &Digest, r1: &Randomness, n1: u32,
        d2: &Digest, r2: &Randomness, n2: u32,
    ) -> Result<SecretKey, AccaError> {
        let r1s = scalar::strict(&r1.0, "randomness")?;
        let r2s = scalar::strict(&r2.0, "randomness")?;
        if r1s == r2s {
            return Err(AccaError::DegenerateCollision);
        }
        if self.ch(d1, r1, n1)? != self.ch(d2, r2, n2)? {
            return Err(AccaError::NotACollision);
        }

        // sk = ((d1 - d2) + w·(r1·n1 - r2·n2)) / (r2 - r1)
        let up = scalar::reduced(&d1.0) - scalar::reduced(&d2.0)
            + self.w * (scalar::weighted(&r1s, n1) - scalar::weighted(&r2s, n2));
        let down = Option::<Scalar>::from((r2s - r1s).invert()).ok_or(AccaError::DegenerateCollision)?;
        let sk = up * down;
        let sk_inv = Option::<Scalar>::from(sk.invert()).ok_or(AccaError::NonExtractable)?;

        debug_assert_eq!(
            ProjectivePoint::GENERATOR * (sk + scalar::weighted(&self.w, self.base_weight)),
            self.pk
        );
        if !self.has_secret_key() {
            info!("chameleon hash upgraded to holder mode by key extraction");
        }
        self.key = KeyState::Holder { sk, sk_inv };
        Ok(SecretKey(scalar::to_bytes(&sk)))
    }

    /// Map an arbitrary message to a canonical scalar encoding by iterating
    /// SHA-256 until the output is below the group order.
    #[must_use]
    pub fn digest(message: &[u8]) -> Digest {
        let mut out: [u8; 32] = Sha256::digest(message).into();
        while !scalar::is_canonical(&out) {
            out = Sha256::digest(out).into();
        }
        Digest(out)
    }

    /// Parent digest of two child hashes: `SHA-256(left || right)`.
    #[must_use]
    pub fn digest_pair(left: &Hash, right: &Hash) -> Digest {
        let mut h = Sha256::new();
        h.update(left.0);
        h.update(right.0);
        Digest(h.finalize().into())
    }

    /// `HMAC-SHA256(key, hash || r)` in the first 32 bytes, last byte zero.
    ///
    /// # Errors
    /// `Serialization` if the MAC cannot be keyed.
    pub fn random_oracle(hash: &Hash, r: &Randomness) -> Result<Hash, AccaError> {
        let mut mac = HmacSha256::new_from_slice(RANDOM_ORACLE_KEY).map_err(|_| AccaError::Serialization)?;
        mac.update(&hash.0);
        mac.update(&r.0);
        let mut out = [0u8; 33];
        out[..32].copy_from_slice(&mac.finalize().into_bytes());
        out[32] = 0;
        Ok(Hash(out))
    }

    /// Chameleon hash of an undigested message.
    ///
    /// # Errors
    /// As [`VerifierHash::ch`].
    pub fn ch_message(&self, message: &[u8], r: &Randomness, n: u32) -> Result<Hash, AccaError> {
        self.ch(&Self::digest(message), r, n)
    }
}

impl VerifierHash for ChameleonHash {
    fn ch(&self, digest: &Digest, r: &Randomness, n: u32) -> Result<Hash, AccaError> {
        // digests come either from digest() or from a raw SHA-256 of two hashes
        let m = scalar::reduced(&digest.0);
        let r = scalar::strict(&r.0, "randomness")?;
        let point = match &self.key {
            KeyState::Holder { sk, .. } => {
                ProjectivePoint::GENERATOR * (m + (*sk + scalar::weighted(&self.w, n)) * r)
            }
            KeyState::Verifier => {
                let shift = scalar::weight_delta(&self.w, n, self.base_weight) * r;
                self.pk * r + ProjectivePoint::GENERATOR * (m + shift)
            }
        };
        let bytes = encode_point(&point, true)?;
        Hash::try_from(bytes.as_slice()).map_err(|_| AccaError::Serialization)
    }
}

impl HolderHash for ChameleonHash {
    fn collision(&self, d1: &Digest, r1: &Randomness, n1: u32, d2: &Digest, n2: u32) -> Result<Randomness, AccaError> {
        let KeyState::Holder { sk, sk_inv } = &self.key else {
            return Err(AccaError::MissingSecretKey);
        };
        let r1 = scalar::strict(&r1.0, "randomness")?;

        // r2 = ((d1 - d2) + (sk + n1·w)·r1) / (sk + n2·w)
        let up = scalar::reduced(&d1.0) - scalar::reduced(&d2.0) + (*sk + scalar::weighted(&self.w, n1)) * r1;
        let down = if n2 == 0 {
            *sk_inv
        } else {
            Option::<Scalar>::from((*sk + scalar::weighted(&self.w, n2)).invert())
                .ok_or(AccaError::DegenerateCollision)?
        };
        let r2 = up * down;
        if r2 == r1 {
            return Err(AccaError::DegenerateCollision);
        }
        Ok(Randomness(scalar::to_bytes(&r2)))
    }

    fn has_secret_key(&self) -> bool {
        matches!(self.key, KeyState::Holder { .. })
    }

    fn secret_key(&self) -> Result<SecretKey, AccaError> {
        match &self.key {
            KeyState::Holder { sk, .. } => Ok(SecretKey(scalar::to_bytes(sk))),
            KeyState::Verifier => Err(AccaError::MissingSecretKey),
        }
    }
}

/// SEC1 encoding of a non-identity point.
pub(crate) fn encode_point(point: &ProjectivePoint, compressed: bool) -> Result<Vec<u8>, AccaError> {
    let encoded = point.to_affine().to_encoded_point(compressed);
    let expected = if compressed { 33 } else { 65 };
    if encoded.len() != expected {
        return Err(AccaError::Serialization);
    }
    Ok(encoded.as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const SK: SecretKey = SecretKey(hex!("0f1e2d3c4b5a69788796a5b4c3d2e1f00112233445566778899aabbccddeeff0"));
    const W: Blinding = Blinding(hex!("2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a"));

    fn rand(b: u8) -> Randomness { Randomness([b; 32]) }

    fn pair() -> (ChameleonHash, ChameleonHash) {
        let holder = ChameleonHash::new(&SK, &W, 5).unwrap();
        let pk = holder.public_key(true).unwrap();
        let verifier = ChameleonHash::from_public_key(&pk, &W, 5).unwrap();
        (holder, verifier)
    }

    #[test]
    fn holder_and_verifier_agree_at_every_weight() {
        let (holder, verifier) = pair();
        let d = ChameleonHash::digest(b"message");
        for n in [0u32, 1, 4, 5, 6, 1000] {
            assert_eq!(holder.ch(&d, &rand(3), n).unwrap(), verifier.ch(&d, &rand(3), n).unwrap());
        }
    }

    #[test]
    fn uncompressed_key_parses_to_same_point() {
        let holder = ChameleonHash::new(&SK, &W, 5).unwrap();
        let pk = holder.public_key(false).unwrap();
        assert_eq!(pk.0.len(), 65);
        let verifier = ChameleonHash::from_public_key(&pk, &W, 5).unwrap();
        assert_eq!(verifier.public_key(true).unwrap(), holder.public_key(true).unwrap());
    }

    #[test]
    fn collision_hits_same_hash_across_weights() {
        let (holder, verifier) = pair();
        let d1 = ChameleonHash::digest(b"first");
        let d2 = ChameleonHash::digest(b"second");
        let r2 = holder.collision(&d1, &rand(9), 5, &d2, 2).unwrap();
        let expected = holder.ch(&d1, &rand(9), 5).unwrap();
        assert_eq!(holder.ch(&d2, &r2, 2).unwrap(), expected);
        assert_eq!(verifier.ch(&d2, &r2, 2).unwrap(), expected);
        // weight zero goes through the cached inverse
        let r0 = holder.collision(&d1, &rand(9), 5, &d2, 0).unwrap();
        assert_eq!(holder.ch(&d2, &r0, 0).unwrap(), expected);
    }

    #[test]
    fn collision_needs_secret_key() {
        let (_, verifier) = pair();
        let d = ChameleonHash::digest(b"x");
        assert_eq!(verifier.collision(&d, &rand(1), 5, &d, 5), Err(AccaError::MissingSecretKey));
        assert_eq!(verifier.secret_key(), Err(AccaError::MissingSecretKey));
    }

    #[test]
    fn collision_onto_itself_is_degenerate() {
        let (holder, _) = pair();
        let d = ChameleonHash::digest(b"x");
        assert_eq!(holder.collision(&d, &rand(1), 5, &d, 5), Err(AccaError::DegenerateCollision));
        // same digest, other weight: a real second preimage exists
        let r2 = holder.collision(&d, &rand(1), 5, &d, 6).unwrap();
        assert_ne!(r2, rand(1));
        assert_eq!(holder.ch(&d, &r2, 6).unwrap(), holder.ch(&d, &rand(1), 5).unwrap());
    }

    #[test]
    fn extraction_upgrades_verifier() {
        let (holder, mut verifier) = pair();
        let d1 = ChameleonHash::digest(b"hello");
        let d2 = ChameleonHash::digest(b"world");
        let r2 = holder.collision(&d1, &rand(4), 5, &d2, 7).unwrap();
        assert!(!verifier.has_secret_key());
        let sk = verifier.extract(&d1, &rand(4), 5, &d2, &r2, 7).unwrap();
        assert_eq!(sk, SK);
        assert!(verifier.has_secret_key());
        assert_eq!(verifier.secret_key().unwrap(), SK);
        // the upgraded instance can now forge collisions itself
        let r3 = verifier.collision(&d1, &rand(4), 5, &d2, 1).unwrap();
        assert_eq!(holder.ch(&d2, &r3, 1).unwrap(), holder.ch(&d1, &rand(4), 5).unwrap());
    }

    #[test]
    fn extraction_rejects_degenerate_and_non_collisions() {
        let (_, mut verifier) = pair();
        let d1 = ChameleonHash::digest(b"a");
        let d2 = ChameleonHash::digest(b"b");
        assert_eq!(verifier.extract(&d1, &rand(1), 5, &d2, &rand(1), 5), Err(AccaError::DegenerateCollision));
        assert_eq!(verifier.extract(&d1, &rand(1), 5, &d2, &rand(2), 5), Err(AccaError::NotACollision));
        assert!(!verifier.has_secret_key());
    }

    #[test]
    fn zero_secret_key_and_bad_public_key_rejected() {
        assert!(matches!(ChameleonHash::new(&SecretKey([0u8; 32]), &W, 1), Err(AccaError::InvalidSecretKey)));
        let mut bad = vec![0x02u8];
        bad.extend_from_slice(&[0xff; 32]);
        assert!(matches!(
            ChameleonHash::from_public_key(&PublicKey(bad), &W, 1),
            Err(AccaError::InvalidPublicKey)
        ));
    }

    #[test]
    fn overflowing_randomness_rejected() {
        let (holder, verifier) = pair();
        let d = ChameleonHash::digest(b"m");
        assert_eq!(holder.ch(&d, &rand(0xff), 5), Err(AccaError::Overflow("randomness")));
        assert_eq!(verifier.ch(&d, &rand(0xff), 5), Err(AccaError::Overflow("randomness")));
    }

    #[test]
    fn public_key_at_matches_fresh_holder() {
        let (holder, verifier) = pair();
        for n in [0u32, 3, 5, 11] {
            let fresh = ChameleonHash::new(&SK, &W, n).unwrap().public_key(true).unwrap();
            assert_eq!(holder.public_key_at(n, true).unwrap(), fresh);
            assert_eq!(verifier.public_key_at(n, true).unwrap(), fresh);
        }
    }

    #[test]
    fn digests_and_random_oracle_shape() {
        let d = ChameleonHash::digest(b"");
        // SHA-256 of the empty string is already canonical
        assert_eq!(d.0, hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"));
        let h = Hash([7u8; 33]);
        let ro = ChameleonHash::random_oracle(&h, &rand(1)).unwrap();
        assert_eq!(ro.0[32], 0);
        assert_ne!(ro, ChameleonHash::random_oracle(&h, &rand(2)).unwrap());
        assert_ne!(ChameleonHash::digest_pair(&h, &ro), ChameleonHash::digest_pair(&ro, &h));
    }
}
