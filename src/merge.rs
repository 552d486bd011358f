//! Aggregation of several (state digest, leaf randomness) pairs into one hash.

use k256::{ProjectivePoint, Scalar};

use crate::chameleon::{encode_point, HolderHash};
use crate::errors::AccaError;
use crate::scalar;
use crate::types::{Digest, Hash, PublicKey, Randomness};

/// One message's contribution to an aggregate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MergeInput {
    pub digest: Digest,
    pub randomness: Randomness,
}

/// Combination rule for batch authentication.
///
/// `merge_holder` and `merge_public` must agree whenever `keys[i]` is the
/// holder's public key at `weights[i]`.
pub trait Merge {
    /// # Errors
    /// Implementations fail on length mismatch or malformed inputs.
    fn merge_holder<H: HolderHash + ?Sized>(&self, ch: &H, items: &[MergeInput], weights: &[u32]) -> Result<Hash, AccaError>;

    /// # Errors
    /// Implementations fail on length mismatch or malformed inputs.
    fn merge_public(&self, items: &[MergeInput], keys: &[PublicKey]) -> Result<Hash, AccaError>;
}

/// Product of the individual chameleon hashes:
/// `Π g^(d_i + (sk + n_i·w)·r_i) = Π pk_i^(r_i) · g^(Σ d_i)`.
#[derive(Clone, Copy, Default, Debug)]
pub struct ProductMerge;

impl Merge for ProductMerge {
    fn merge_holder<H: HolderHash + ?Sized>(&self, ch: &H, items: &[MergeInput], weights: &[u32]) -> Result<Hash, AccaError> {
        check_lengths(items.len(), weights.len())?;
        if !ch.has_secret_key() {
            return Err(AccaError::MissingSecretKey);
        }
        let mut acc = ProjectivePoint::IDENTITY;
        for (item, n) in items.iter().zip(weights) {
            let h = ch.ch(&item.digest, &item.randomness, *n)?;
            acc += decode_hash(&h)?;
        }
        to_hash(&acc)
    }

    fn merge_public(&self, items: &[MergeInput], keys: &[PublicKey]) -> Result<Hash, AccaError> {
        check_lengths(items.len(), keys.len())?;
        let mut acc = ProjectivePoint::IDENTITY;
        let mut digests = Scalar::ZERO;
        for (item, pk) in items.iter().zip(keys) {
            let point = k256::PublicKey::from_sec1_bytes(pk.as_bytes())
                .map_err(|_| AccaError::InvalidPublicKey)?
                .to_projective();
            acc += point * scalar::strict(&item.randomness.0, "randomness")?;
            digests += scalar::reduced(&item.digest.0);
        }
        to_hash(&(acc + ProjectivePoint::GENERATOR * digests))
    }
}

fn check_lengths(items: usize, other: usize) -> Result<(), AccaError> {
    if items == 0 {
        return Err(AccaError::EmptyBatch);
    }
    if items != other {
        return Err(AccaError::InvalidLength { expected: items, got: other });
    }
    Ok(())
}

fn decode_hash(h: &Hash) -> Result<ProjectivePoint, AccaError> {
    k256::PublicKey::from_sec1_bytes(&h.0)
        .map(|p| p.to_projective())
        .map_err(|_| AccaError::DecodeError("chameleon hash is not a curve point"))
}

fn to_hash(p: &ProjectivePoint) -> Result<Hash, AccaError> {
    Hash::try_from(encode_point(p, true)?.as_slice()).map_err(|_| AccaError::Serialization)
}
