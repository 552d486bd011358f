#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::similar_names,
    clippy::many_single_char_names
)]

//! Accountable authentication over secp256k1 chameleon hashes.
//!
//! A holder of a trapdoor key commits to a single root digest and can then
//! authenticate any state under any fixed-length context. Authenticating the
//! same context twice with different states is self-incriminating: the two
//! tokens contain a chameleon hash collision and anybody holding both
//! extracts the secret key.

// Fixed cryptographic choices:
// - Group: secp256k1, SEC1 point encodings
// - Chameleon hash: ch(m, r, n) = g^(m + (sk + n·w)·r)
// - Message digest: iterated SHA-256 until below the group order
// - Tree combine: SHA-256(left || right)
// - Leaf blinding: HMAC-SHA256 random oracle
// - Per-node PRF: keyed BLAKE3

pub mod types;
pub mod errors;
mod scalar;
pub mod chameleon;
pub mod node;
pub mod prf;
pub mod merge;
pub mod authenticator;
pub mod ser;

pub use types::*;
pub use errors::AccaError;
pub use chameleon::{ChameleonHash, HolderHash, VerifierHash};
pub use node::Node;
pub use prf::Prf;
pub use merge::{Merge, MergeInput, ProductMerge};
pub use authenticator::{Authenticator, BatchToken, DefaultAuthenticator, Dpk, Token, TokenLevel, VerifyLog, DEFAULT_CT_LEN};
pub use ser::{decode_dpk, decode_token, encode_dpk, encode_token};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
