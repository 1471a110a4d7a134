//! Fixed-capacity storage shared by a property's value, comment and name.
//!
//! Layout of the embedded buffer:
//!
//! ```text
//! 0        value_len          value_len+comment_len    CAP-name_len    CAP
//! | value bytes | comment bytes |     unused slack       | name bytes |
//! ```
//!
//! The value's inline bytes always start at offset zero, the comment's
//! inline bytes directly follow them, and the name's inline bytes grow
//! backward from the buffer's tail. Each member independently tracks where
//! its bytes currently live ([`Slot`]); the sum of the three inline lengths
//! never exceeds [`CARD_BYTES`].
//!
//! A member that spills to the heap never moves back inline, even when a
//! later mutation would fit. Collection-level accounting relies on heap
//! growth per member being monotonic, so a cleared heap member keeps a pin
//! that routes future sets straight back to the heap.
//!
//! String members (name, comment, string-typed value) are stored with a
//! trailing NUL so that their encoded sizes match the element counts of the
//! on-disk format this feeds into; the NUL is counted against the inline
//! budget but stripped again by the accessors in [`super`].

/// Capacity of the embedded buffer. One FITS card is 80 bytes; a standard
/// keyword (8 chars + NUL), the widest scalar (16 bytes) and a typical
/// comment all fit inline at once.
pub(super) const CARD_BYTES: usize = 80;

// inline lengths are stored as u16
const_assert!(CARD_BYTES <= u16::MAX as usize);

/// Placement state of one member. `Inline -> Heap` is a legal transition;
/// `Heap -> Inline` is not.
#[derive(Clone, Debug)]
pub(super) enum Slot {
    /// No bytes present. `pinned` records whether this member has ever
    /// spilled; once true, a later set goes straight back to the heap.
    Vacant { pinned: bool },
    /// Bytes live in the embedded buffer at the member's offset.
    Inline { len: u16 },
    /// Bytes live in an independently owned allocation.
    Heap(Vec<u8>),
}

impl Slot {
    fn inline_len(&self) -> usize {
        match self {
            Slot::Inline { len } => *len as usize,
            Slot::Vacant { .. } | Slot::Heap(_) => 0,
        }
    }

    fn is_vacant(&self) -> bool {
        matches!(self, Slot::Vacant { .. })
    }

    /// A fresh set must go to the heap instead of the embedded buffer.
    fn heap_bound(&self) -> bool {
        matches!(self, Slot::Heap(_) | Slot::Vacant { pinned: true })
    }
}

#[derive(Clone, Debug)]
pub(super) struct CardBuf {
    buf: [u8; CARD_BYTES],
    value: Slot,
    comment: Slot,
    name: Slot,
}

/// Overwrites a heap member with `src` plus a NUL, reusing the allocation
/// when it is large enough and reallocating otherwise.
fn refill_terminated(dst: &mut Vec<u8>, src: &[u8]) {
    if dst.capacity() < src.len() + 1 {
        *dst = Vec::with_capacity(src.len() + 1);
    }
    dst.clear();
    dst.extend_from_slice(src);
    dst.push(0);
}

fn to_terminated_vec(src: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(src.len() + 1);
    v.extend_from_slice(src);
    v.push(0);
    v
}

impl CardBuf {
    pub(super) fn new() -> CardBuf {
        CardBuf {
            buf: [0; CARD_BYTES],
            value: Slot::Vacant { pinned: false },
            comment: Slot::Vacant { pinned: false },
            name: Slot::Vacant { pinned: false },
        }
    }

    /// Installs a zero-filled value of `len` bytes. Called exactly once,
    /// at creation, before the name is stored.
    pub(super) fn init_value(&mut self, len: usize) {
        debug_assert!(self.value.is_vacant() && self.name.is_vacant());
        if len <= CARD_BYTES {
            self.value = Slot::Inline { len: len as u16 };
        } else {
            self.value = Slot::Heap(vec![0; len]);
        }
    }

    /// The value's stored bytes: the scalar encoding, or the NUL-terminated
    /// string for string-typed properties.
    pub(super) fn value_bytes(&self) -> &[u8] {
        match &self.value {
            Slot::Vacant { .. } => &[],
            Slot::Inline { len } => &self.buf[..*len as usize],
            Slot::Heap(v) => v.as_slice(),
        }
    }

    /// Mutable view of a fixed-width scalar value. Scalar values are
    /// installed inline at creation and never move.
    pub(super) fn value_bytes_mut(&mut self) -> &mut [u8] {
        match &mut self.value {
            Slot::Inline { len } => &mut self.buf[..*len as usize],
            Slot::Heap(v) => v.as_mut_slice(),
            Slot::Vacant { .. } => &mut [],
        }
    }

    pub(super) fn comment_bytes(&self) -> Option<&[u8]> {
        match &self.comment {
            Slot::Vacant { .. } => None,
            Slot::Inline { len } => {
                let off = self.value.inline_len();
                Some(&self.buf[off..off + *len as usize])
            }
            Slot::Heap(v) => Some(v.as_slice()),
        }
    }

    pub(super) fn name_bytes(&self) -> &[u8] {
        match &self.name {
            Slot::Vacant { .. } => &[],
            Slot::Inline { len } => &self.buf[CARD_BYTES - *len as usize..],
            Slot::Heap(v) => v.as_slice(),
        }
    }

    /// Replaces the (string typed) value with `bytes` plus a terminator.
    /// Growing or shrinking the inline value relocates an inline comment to
    /// the new boundary; spilling the value moves the comment to offset
    /// zero.
    pub(super) fn set_value(&mut self, bytes: &[u8]) {
        if let Slot::Heap(v) = &mut self.value {
            refill_terminated(v, bytes);
            return;
        }
        let size = bytes.len() + 1;
        let old = self.value.inline_len();
        let fits = !self.value.heap_bound()
            && size + self.comment.inline_len() + self.name.inline_len()
                <= CARD_BYTES;
        if fits {
            // the comment moves first so neither copy clobbers the other
            self.slide_inline_comment(old, size);
            self.buf[..size - 1].copy_from_slice(bytes);
            self.buf[size - 1] = 0;
            self.value = Slot::Inline { len: size as u16 };
        } else {
            self.slide_inline_comment(old, 0);
            self.value = Slot::Heap(to_terminated_vec(bytes));
        }
    }

    pub(super) fn set_comment(&mut self, bytes: &[u8]) {
        if let Slot::Heap(v) = &mut self.comment {
            refill_terminated(v, bytes);
            return;
        }
        let size = bytes.len() + 1;
        let fits = !self.comment.heap_bound()
            && self.value.inline_len() + size + self.name.inline_len()
                <= CARD_BYTES;
        if fits {
            let off = self.value.inline_len();
            self.buf[off..off + size - 1].copy_from_slice(bytes);
            self.buf[off + size - 1] = 0;
            self.comment = Slot::Inline { len: size as u16 };
        } else {
            self.comment = Slot::Heap(to_terminated_vec(bytes));
        }
    }

    /// Drops the comment. A heap-resident comment is released but stays
    /// pinned to the heap; an inline one merely clears its length.
    pub(super) fn clear_comment(&mut self) {
        self.comment = Slot::Vacant {
            pinned: self.comment.heap_bound(),
        };
    }

    /// Replaces the name. The name occupies the buffer's tail and never
    /// displaces the comment.
    pub(super) fn set_name(&mut self, bytes: &[u8]) {
        if let Slot::Heap(v) = &mut self.name {
            refill_terminated(v, bytes);
            return;
        }
        let size = bytes.len() + 1;
        let fits = !self.name.heap_bound()
            && self.value.inline_len() + self.comment.inline_len() + size
                <= CARD_BYTES;
        if fits {
            let off = CARD_BYTES - size;
            self.buf[off..CARD_BYTES - 1].copy_from_slice(bytes);
            self.buf[CARD_BYTES - 1] = 0;
            self.name = Slot::Inline { len: size as u16 };
        } else {
            self.name = Slot::Heap(to_terminated_vec(bytes));
        }
    }

    /// Moves an inline comment from the old value boundary to the new one.
    fn slide_inline_comment(&mut self, old_off: usize, new_off: usize) {
        if old_off == new_off {
            return;
        }
        if let Slot::Inline { len } = self.comment {
            let len = len as usize;
            self.buf.copy_within(old_off..old_off + len, new_off);
        }
    }

    #[cfg(test)]
    pub(super) fn placements(&self) -> (&Slot, &Slot, &Slot) {
        (&self.value, &self.comment, &self.name)
    }
}

#[cfg(test)]
mod test {
    use super::{CardBuf, Slot, CARD_BYTES};

    fn card_with_name(name: &[u8]) -> CardBuf {
        let mut c = CardBuf::new();
        c.init_value(8);
        c.set_name(name);
        c
    }

    #[test]
    fn members_start_inline() {
        let c = card_with_name(b"NAXIS");
        assert!(matches!(c.placements().0, Slot::Inline { len: 8 }));
        assert!(matches!(c.placements().2, Slot::Inline { len: 6 }));
        assert_eq!(c.name_bytes(), b"NAXIS\0");
        assert_eq!(c.value_bytes(), &[0u8; 8]);
    }

    #[test]
    fn comment_follows_value() {
        let mut c = card_with_name(b"KEY");
        c.set_comment(b"a comment");
        assert_eq!(c.comment_bytes().unwrap(), b"a comment\0");
        // value untouched by the comment write
        assert_eq!(c.value_bytes(), &[0u8; 8]);
    }

    #[test]
    fn oversized_name_spills_and_stays_spilled() {
        let mut c = CardBuf::new();
        c.init_value(16);
        let long = [b'N'; CARD_BYTES];
        c.set_name(&long);
        assert!(matches!(c.placements().2, Slot::Heap(_)));
        assert_eq!(&c.name_bytes()[..CARD_BYTES], &long[..]);

        // shrinking the name must not re-embed it
        c.set_name(b"N");
        assert!(matches!(c.placements().2, Slot::Heap(_)));
        assert_eq!(c.name_bytes(), b"N\0");
    }

    #[test]
    fn heap_allocation_is_reused_when_large_enough() {
        let mut c = CardBuf::new();
        c.init_value(8);
        let long = vec![b'x'; CARD_BYTES + 20];
        c.set_name(&long);
        let cap_before = match c.placements().2 {
            Slot::Heap(v) => v.capacity(),
            _ => unreachable!(),
        };
        c.set_name(b"short");
        let cap_after = match c.placements().2 {
            Slot::Heap(v) => v.capacity(),
            _ => unreachable!(),
        };
        assert_eq!(cap_before, cap_after);
    }

    #[test]
    fn growing_value_relocates_inline_comment() {
        let mut c = CardBuf::new();
        c.init_value(1);
        c.set_name(b"OBJECT");
        c.set_value(b"M31");
        c.set_comment(b"target name");
        c.set_value(b"NGC 224, the Andromeda galaxy");
        assert_eq!(c.comment_bytes().unwrap(), b"target name\0");
        assert_eq!(c.value_bytes(), b"NGC 224, the Andromeda galaxy\0");

        c.set_value(b"M31");
        assert_eq!(c.comment_bytes().unwrap(), b"target name\0");
        assert_eq!(c.value_bytes(), b"M31\0");
    }

    #[test]
    fn spilling_value_moves_comment_to_buffer_start() {
        let mut c = CardBuf::new();
        c.init_value(4);
        c.set_name(b"OBJECT");
        c.set_comment(b"target");
        let huge = vec![b'v'; CARD_BYTES + 1];
        c.set_value(&huge);
        assert!(matches!(c.placements().0, Slot::Heap(_)));
        assert!(matches!(c.placements().1, Slot::Inline { .. }));
        assert_eq!(c.comment_bytes().unwrap(), b"target\0");

        // value stays on the heap even after shrinking back
        c.set_value(b"v");
        assert!(matches!(c.placements().0, Slot::Heap(_)));
        assert_eq!(c.value_bytes(), b"v\0");
    }

    #[test]
    fn cleared_heap_comment_stays_pinned() {
        let mut c = card_with_name(b"KEY");
        let huge = vec![b'c'; CARD_BYTES + 1];
        c.set_comment(&huge);
        assert!(matches!(c.placements().1, Slot::Heap(_)));
        c.clear_comment();
        assert!(c.comment_bytes().is_none());
        c.set_comment(b"tiny");
        assert!(matches!(c.placements().1, Slot::Heap(_)));
        assert_eq!(c.comment_bytes().unwrap(), b"tiny\0");
    }

    #[test]
    fn cleared_inline_comment_may_embed_again() {
        let mut c = card_with_name(b"KEY");
        c.set_comment(b"inline");
        c.clear_comment();
        assert!(c.comment_bytes().is_none());
        c.set_comment(b"inline again");
        assert!(matches!(c.placements().1, Slot::Inline { .. }));
    }

    #[test]
    fn inline_budget_is_shared() {
        // value 16 + name 15 leaves 49 bytes for a terminated comment
        let mut c = CardBuf::new();
        c.init_value(16);
        c.set_name(b"LONGISHKEYWORD");
        let big = [b'c'; 49];
        c.set_comment(&big);
        assert!(matches!(c.placements().1, Slot::Heap(_)));

        let mut c = CardBuf::new();
        c.init_value(16);
        c.set_name(b"LONGISHKEYWORD");
        let exact = [b'c'; 48];
        c.set_comment(&exact);
        assert!(matches!(c.placements().1, Slot::Inline { len: 49 }));
    }
}
