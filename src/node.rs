//! Position in the authentication tree over `CT_LEN`-byte contexts.
//!
//! A node is the prefix of a context's bits (most significant bit of byte 0
//! first) together with its depth. Bits below the depth are kept zero, so two
//! nodes are equal iff they denote the same tree position.

/// Tree position. The root has depth 0, leaves have depth `8 * CT_LEN`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Node<const CT_LEN: usize> {
    path: [u8; CT_LEN],
    depth: usize,
}

impl<const CT_LEN: usize> Node<CT_LEN> {
    pub const DEPTH: usize = CT_LEN * 8;

    /// The leaf selected by `ct`.
    #[must_use]
    pub const fn from_context(ct: &[u8; CT_LEN]) -> Self {
        Self { path: *ct, depth: Self::DEPTH }
    }

    #[must_use]
    pub const fn left_child_of_root() -> Self {
        Self { path: [0u8; CT_LEN], depth: 1 }
    }

    #[must_use]
    pub const fn depth(&self) -> usize { self.depth }

    #[must_use]
    pub const fn is_root(&self) -> bool { self.depth == 0 }

    /// True iff the last step from the parent went left. The root is no child.
    #[must_use]
    pub const fn is_left_child(&self) -> bool {
        !self.is_root() && !self.bit(self.depth - 1)
    }

    pub fn move_to_sibling(&mut self) {
        debug_assert!(!self.is_root());
        let (byte, mask) = Self::locate(self.depth - 1);
        self.path[byte] ^= mask;
    }

    pub fn move_to_parent(&mut self) {
        debug_assert!(!self.is_root());
        let (byte, mask) = Self::locate(self.depth - 1);
        self.path[byte] &= !mask;
        self.depth -= 1;
    }

    /// Canonical identity: `LE16(depth) || path`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(2 + CT_LEN);
        v.extend_from_slice(&u16::try_from(self.depth).unwrap_or(u16::MAX).to_le_bytes());
        v.extend_from_slice(&self.path);
        v
    }

    const fn bit(&self, i: usize) -> bool {
        let (byte, mask) = Self::locate(i);
        self.path[byte] & mask != 0
    }

    const fn locate(i: usize) -> (usize, u8) {
        (i / 8, 0x80 >> (i % 8))
    }
}
