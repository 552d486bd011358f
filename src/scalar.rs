//! Scalar decoding and level weighting over the secp256k1 scalar field.

use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, Scalar, U256};

use crate::errors::AccaError;

/// Decode a big-endian scalar, rejecting encodings at or above the group order.
pub(crate) fn strict(bytes: &[u8; 32], what: &'static str) -> Result<Scalar, AccaError> {
    Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*bytes)))
        .ok_or(AccaError::Overflow(what))
}

/// Decode a big-endian scalar, reducing it modulo the group order.
pub(crate) fn reduced(bytes: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*bytes))
}

/// True iff `bytes` encodes a scalar below the group order.
pub(crate) fn is_canonical(bytes: &[u8; 32]) -> bool {
    bool::from(Scalar::from_repr(FieldBytes::from(*bytes)).is_some())
}

pub(crate) fn to_bytes(s: &Scalar) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&s.to_bytes());
    out
}

/// `n * x` by double-and-add over the bits of `n`.
pub(crate) fn weighted(x: &Scalar, mut n: u32) -> Scalar {
    let mut acc = Scalar::ZERO;
    let mut base = *x;
    while n != 0 {
        if n & 1 == 1 {
            acc += base;
        }
        base = base + base;
        n >>= 1;
    }
    acc
}

/// `(n - base) * x` for unsigned weights.
pub(crate) fn weight_delta(x: &Scalar, n: u32, base: u32) -> Scalar {
    if n >= base {
        weighted(x, n - base)
    } else {
        -weighted(x, base - n)
    }
}
