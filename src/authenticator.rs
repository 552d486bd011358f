//! Accountable authentication tree.
//!
//! A holder commits once to a root digest. For every context it can produce a
//! token binding an arbitrary state to that root. Two tokens for the same
//! context with different states contain a chameleon hash collision, from
//! which anybody holding both recovers the holder's secret key.

use log::{debug, info, warn};

use crate::chameleon::{ChameleonHash, HolderHash, VerifierHash};
use crate::errors::AccaError;
use crate::merge::{Merge, MergeInput};
use crate::node::Node;
use crate::prf::Prf;
use crate::types::{Blinding, Digest, Hash, PublicKey, Randomness, SecretKey, LEVEL_LEN};

/// Context length used by [`DefaultAuthenticator`].
pub const DEFAULT_CT_LEN: usize = 8;

pub type DefaultAuthenticator = Authenticator<DEFAULT_CT_LEN>;

/// One tree level of a token.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TokenLevel {
    /// Randomness that makes the subtree digest hash to this node's value.
    pub randomness: Randomness,
    /// Chameleon hash of the sibling node.
    pub sibling: Hash,
}

/// Authentication path, leaf level first, root excluded.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub levels: Vec<TokenLevel>,
}

/// Public verification material of one instance.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Dpk {
    pub chpk: PublicKey,
    pub root_digest: Digest,
}

/// Per-level trace of a verification, leaf level first.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct VerifyLog {
    /// Chameleon hash outputs, before the random oracle on the leaf level.
    pub hashes: Vec<Hash>,
    /// Subtree digests that were hashed.
    pub digests: Vec<Digest>,
}

/// Tokens of a batch together with their aggregate hash.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BatchToken {
    pub tokens: Vec<Token>,
    pub aggregate: Hash,
}

pub struct Authenticator<const CT_LEN: usize> {
    ch: ChameleonHash,
    root_digest: Digest,
}

impl<const CT_LEN: usize> Authenticator<CT_LEN> {
    /// Number of non-root levels.
    pub const DEPTH: usize = CT_LEN * 8;
    pub const TOKEN_LEN: usize = Self::DEPTH * LEVEL_LEN;

    /// Holder instance. Computes the root digest from the two children of the root.
    ///
    /// # Errors
    /// `InvalidSecretKey` for a zero key, `InvalidLength` for an empty context length.
    pub fn new(sk: &SecretKey, w: &Blinding, n: u32) -> Result<Self, AccaError> {
        check_ct_len(CT_LEN)?;
        let ch = ChameleonHash::new(sk, w, n)?;
        let prf = Prf::new(&ch.secret_key()?);

        let mut node = Node::<CT_LEN>::left_child_of_root();
        let left = ch.ch(&prf.x(&node), &prf.r(&node), n)?;
        node.move_to_sibling();
        let right = ch.ch(&prf.x(&node), &prf.r(&node), n)?;

        let root_digest = ChameleonHash::digest_pair(&left, &right);
        debug!("authenticator set up: depth {}, weight {}", Self::DEPTH, n);
        Ok(Self { ch, root_digest })
    }

    /// Verify-only instance for a public key published under weight `n`.
    ///
    /// # Errors
    /// `InvalidPublicKey` if the chameleon public key does not parse.
    pub fn verifier(dpk: &Dpk, w: &Blinding, n: u32) -> Result<Self, AccaError> {
        check_ct_len(CT_LEN)?;
        let ch = ChameleonHash::from_public_key(&dpk.chpk, w, n)?;
        Ok(Self { ch, root_digest: dpk.root_digest })
    }

    #[must_use]
    pub const fn has_secret_key(&self) -> bool { self.ch.has_secret_key() }

    #[must_use]
    pub const fn root_digest(&self) -> &Digest { &self.root_digest }

    #[must_use]
    pub const fn weight(&self) -> u32 { self.ch.base_weight() }

    #[must_use]
    pub const fn chameleon_hash(&self) -> &ChameleonHash { &self.ch }

    /// # Errors
    /// `Serialization` if the public key cannot be encoded.
    pub fn dpk(&self, compressed: bool) -> Result<Dpk, AccaError> {
        Ok(Dpk { chpk: self.ch.public_key(compressed)?, root_digest: self.root_digest })
    }

    /// # Errors
    /// `MissingSecretKey` in verify-only mode.
    pub fn secret_key(&self) -> Result<SecretKey, AccaError> {
        self.ch.secret_key()
    }

    /// Token for `state` at the leaf `ct`, hashed at level weight `n`.
    ///
    /// # Errors
    /// `MissingSecretKey` in verify-only mode.
    pub fn authenticate(&self, ct: &[u8; CT_LEN], state: &[u8], n: u32) -> Result<Token, AccaError> {
        let prf = Prf::new(&self.ch.secret_key()?);
        let n0 = self.ch.base_weight();
        let mut node = Node::from_context(ct);
        let mut subtree = ChameleonHash::digest(state);
        let mut levels = Vec::with_capacity(Self::DEPTH);

        while !node.is_root() {
            let x = prf.x(&node);
            let r = prf.r(&node);
            let mut hash = self.ch.ch(&x, &r, n0)?;
            let subtree_r = self.ch.collision(&x, &r, n0, &subtree, n)?;
            if levels.is_empty() {
                hash = ChameleonHash::random_oracle(&hash, &subtree_r)?;
            }

            node.move_to_sibling();
            let sibling = self.ch.ch(&prf.x(&node), &prf.r(&node), n0)?;
            levels.push(TokenLevel { randomness: subtree_r, sibling });

            subtree = if node.is_left_child() {
                ChameleonHash::digest_pair(&sibling, &hash)
            } else {
                ChameleonHash::digest_pair(&hash, &sibling)
            };
            node.move_to_parent();
        }
        debug_assert_eq!(subtree, self.root_digest);
        Ok(Token { levels })
    }

    /// True iff `token` leads from `state` at leaf `ct` to the root digest.
    ///
    /// # Errors
    /// `InvalidLength` for a token of the wrong depth, `Overflow` for
    /// non-canonical randomness in the token.
    pub fn verify(&self, token: &Token, ct: &[u8; CT_LEN], state: &[u8], n: u32) -> Result<bool, AccaError> {
        let top = replay(&self.ch, token, ct, state, n, None)?;
        Ok(top == self.root_digest)
    }

    /// [`Self::verify`] that also returns the per-level trace.
    ///
    /// # Errors
    /// As [`Self::verify`].
    pub fn verify_logged(&self, token: &Token, ct: &[u8; CT_LEN], state: &[u8], n: u32) -> Result<(bool, VerifyLog), AccaError> {
        let mut log = VerifyLog {
            hashes: Vec::with_capacity(Self::DEPTH),
            digests: Vec::with_capacity(Self::DEPTH),
        };
        let top = replay(&self.ch, token, ct, state, n, Some(&mut log))?;
        Ok((top == self.root_digest, log))
    }

    /// Recover the secret key from two verifying tokens for the same context
    /// and different states. On success this instance becomes a holder.
    ///
    /// # Errors
    /// `VerificationFailed` if either token does not verify, `NonExtractable`
    /// if no level of the two tokens yields the key.
    #[allow(clippy::too_many_arguments)]
    pub fn extract(
        &mut self,
        t1: &Token, ct: &[u8; CT_LEN], st1: &[u8],
        t2: &Token, st2: &[u8],
        n1: u32, n2: u32,
    ) -> Result<SecretKey, AccaError> {
        let (ok1, log1) = self.verify_logged(t1, ct, st1, n1)?;
        if !ok1 {
            warn!("extraction: first token does not verify");
            return Err(AccaError::VerificationFailed("first token"));
        }
        let (ok2, log2) = self.verify_logged(t2, ct, st2, n2)?;
        if !ok2 {
            warn!("extraction: second token does not verify");
            return Err(AccaError::VerificationFailed("second token"));
        }

        let side1 = log1.digests.iter().zip(&log1.hashes).zip(&t1.levels);
        let side2 = log2.digests.iter().zip(&log2.hashes).zip(&t2.levels);
        for (level, (((x1, h1), l1), ((x2, h2), l2))) in side1.zip(side2).enumerate() {
            let (r1, r2) = (&l1.randomness, &l2.randomness);
            let differs = x1 != x2 || r1 != r2;
            if !differs || h1 != h2 {
                continue;
            }
            match self.ch.extract(x1, r1, n1, x2, r2, n2) {
                Ok(sk) => {
                    info!("secret key extracted from collision at level {level}");
                    return Ok(sk);
                }
                Err(e) => debug!("collision at level {level} not usable: {e}"),
            }
        }
        warn!("two verifying tokens without an extractable collision");
        Err(AccaError::NonExtractable)
    }

    /// Authenticate every state under `ct` and merge the leaf inputs into one aggregate hash.
    ///
    /// # Errors
    /// `EmptyBatch`, `InvalidLength` if `states` and `weights` differ in length,
    /// `MissingSecretKey` in verify-only mode.
    pub fn authenticate_batch<M: Merge>(
        &self,
        merge: &M,
        ct: &[u8; CT_LEN],
        states: &[&[u8]],
        weights: &[u32],
    ) -> Result<BatchToken, AccaError> {
        check_batch(states.len(), &[weights.len()])?;
        debug!("authenticating batch of {}", states.len());
        let tokens = states
            .iter()
            .zip(weights)
            .map(|(st, n)| self.authenticate(ct, st, *n))
            .collect::<Result<Vec<_>, _>>()?;
        let items = merge_inputs(&tokens, states)?;
        let aggregate = merge.merge_holder(&self.ch, &items, weights)?;
        Ok(BatchToken { tokens, aggregate })
    }

    /// Verify every token of a batch and its aggregate against per-message public keys.
    ///
    /// # Errors
    /// `EmptyBatch`, `InvalidLength` on mismatched inputs or malformed tokens.
    pub fn verify_batch<M: Merge>(
        &self,
        merge: &M,
        batch: &BatchToken,
        ct: &[u8; CT_LEN],
        states: &[&[u8]],
        weights: &[u32],
        keys: &[PublicKey],
    ) -> Result<bool, AccaError> {
        check_batch(batch.tokens.len(), &[states.len(), weights.len(), keys.len()])?;
        for ((token, st), n) in batch.tokens.iter().zip(states).zip(weights) {
            if !self.verify(token, ct, st, *n)? {
                debug!("batch member does not verify");
                return Ok(false);
            }
        }
        let items = merge_inputs(&batch.tokens, states)?;
        Ok(merge.merge_public(&items, keys)? == batch.aggregate)
    }
}

/// Walk from the leaf to the root and return the digest computed for the root.
fn replay<H: VerifierHash, const CT_LEN: usize>(
    ch: &H,
    token: &Token,
    ct: &[u8; CT_LEN],
    state: &[u8],
    n: u32,
    mut log: Option<&mut VerifyLog>,
) -> Result<Digest, AccaError> {
    let depth = Node::<CT_LEN>::DEPTH;
    if token.levels.len() != depth {
        return Err(AccaError::InvalidLength { expected: depth, got: token.levels.len() });
    }
    let mut node = Node::from_context(ct);
    let mut subtree = ChameleonHash::digest(state);

    for (i, level) in token.levels.iter().enumerate() {
        let raw = ch.ch(&subtree, &level.randomness, n)?;
        if let Some(log) = log.as_deref_mut() {
            log.hashes.push(raw);
            log.digests.push(subtree);
        }
        let hash = if i == 0 { ChameleonHash::random_oracle(&raw, &level.randomness)? } else { raw };

        subtree = if node.is_left_child() {
            ChameleonHash::digest_pair(&hash, &level.sibling)
        } else {
            ChameleonHash::digest_pair(&level.sibling, &hash)
        };
        node.move_to_parent();
    }
    debug_assert!(node.is_root());
    Ok(subtree)
}

fn merge_inputs(tokens: &[Token], states: &[&[u8]]) -> Result<Vec<MergeInput>, AccaError> {
    tokens
        .iter()
        .zip(states)
        .map(|(token, st)| {
            let leaf = token.levels.first().ok_or(AccaError::InvalidLength { expected: 1, got: 0 })?;
            Ok(MergeInput { digest: ChameleonHash::digest(st), randomness: leaf.randomness })
        })
        .collect()
}

fn check_batch(len: usize, others: &[usize]) -> Result<(), AccaError> {
    if len == 0 {
        return Err(AccaError::EmptyBatch);
    }
    match others.iter().find(|&&got| got != len) {
        Some(&got) => Err(AccaError::InvalidLength { expected: len, got }),
        None => Ok(()),
    }
}

const fn check_ct_len(ct_len: usize) -> Result<(), AccaError> {
    if ct_len == 0 {
        return Err(AccaError::InvalidLength { expected: 1, got: 0 });
    }
    Ok(())
}
