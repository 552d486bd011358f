use crate::{
    authenticator::{Dpk, Token, TokenLevel},
    errors::AccaError,
    types::{
        Digest, Hash, PublicKey, Randomness, DIGEST_LEN, HASH_LEN, LEVEL_LEN, PK_COMPRESSED_LEN,
        PK_UNCOMPRESSED_LEN, RAND_LEN,
    },
};

/// Canonical `Token`: depth * ( randomness(32) || sibling hash(33) ), leaf level first.
#[must_use]
pub fn encode_token(token: &Token) -> Vec<u8> {
    let mut v = Vec::with_capacity(token.levels.len() * LEVEL_LEN);
    for level in &token.levels {
        v.extend_from_slice(&level.randomness.0);     // 32
        v.extend_from_slice(&level.sibling.0);        // 33
    }
    v
}

/// Decode a token of exactly `depth` levels.
///
/// # Errors
///
/// Returns `AccaError::InvalidLength` if `b` is not `depth * 65` bytes long,
/// `AccaError::DecodeError` if that length is not representable.
pub fn decode_token(b: &[u8], depth: usize) -> Result<Token, AccaError> {
    let expected = depth
        .checked_mul(LEVEL_LEN)
        .ok_or(AccaError::DecodeError("token depth too large"))?;
    if b.len() != expected {
        return Err(AccaError::InvalidLength { expected, got: b.len() });
    }
    let levels = b
        .chunks_exact(LEVEL_LEN)
        .map(|chunk| {
            Ok(TokenLevel {
                randomness: Randomness::try_from(&chunk[..RAND_LEN])?,
                sibling: Hash::try_from(&chunk[RAND_LEN..RAND_LEN + HASH_LEN])?,
            })
        })
        .collect::<Result<Vec<_>, AccaError>>()?;
    Ok(Token { levels })
}

/// Canonical `Dpk`: chameleon public key (33 or 65 bytes) || root digest (32).
#[must_use]
pub fn encode_dpk(dpk: &Dpk) -> Vec<u8> {
    let mut v = Vec::with_capacity(dpk.chpk.0.len() + DIGEST_LEN);
    v.extend_from_slice(dpk.chpk.as_bytes());
    v.extend_from_slice(&dpk.root_digest.0);
    v
}

/// Decode a `Dpk`. The public key is validated as a curve point.
///
/// # Errors
///
/// Returns `AccaError::InvalidLength` for a length other than 65 or 97 bytes,
/// `AccaError::InvalidPublicKey` if the key is not on the curve.
pub fn decode_dpk(b: &[u8]) -> Result<Dpk, AccaError> {
    let pk_len = match b.len().checked_sub(DIGEST_LEN) {
        Some(PK_COMPRESSED_LEN) => PK_COMPRESSED_LEN,
        Some(PK_UNCOMPRESSED_LEN) => PK_UNCOMPRESSED_LEN,
        _ => return Err(AccaError::InvalidLength { expected: PK_COMPRESSED_LEN + DIGEST_LEN, got: b.len() }),
    };
    let (pk, root) = b.split_at(pk_len);
    k256::PublicKey::from_sec1_bytes(pk).map_err(|_| AccaError::InvalidPublicKey)?;
    Ok(Dpk { chpk: PublicKey::try_from(pk)?, root_digest: Digest::try_from(root)? })
}
