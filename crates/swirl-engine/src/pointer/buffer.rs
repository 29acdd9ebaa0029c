/// Number of pointers the `pointers` uniform array holds.
pub const MAX_POINTERS: usize = 10;

/// Scalars stored per pointer (`x`, `y`).
pub const POINTER_COMPONENTS: usize = 2;

/// Total scalars in a [`PointerBuffer`].
pub const POINTER_SCALARS: usize = MAX_POINTERS * POINTER_COMPONENTS;

/// Fixed-capacity flat buffer of pointer coordinates.
///
/// Invariant: the length is always [`POINTER_SCALARS`]; unused slots are zero.
/// Pairs are stored row-major as `x0, y0, x1, y1, ...` in device pixels with a
/// bottom-left origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerBuffer {
    scalars: [f32; POINTER_SCALARS],
}

impl PointerBuffer {
    #[inline]
    pub const fn new() -> Self {
        Self {
            scalars: [0.0; POINTER_SCALARS],
        }
    }

    /// Zeroes every slot.
    #[inline]
    pub fn clear(&mut self) {
        self.scalars = [0.0; POINTER_SCALARS];
    }

    /// Writes pair `index`. Indices past capacity are ignored.
    #[inline]
    pub fn set_pair(&mut self, index: usize, pair: [f32; 2]) {
        if index >= MAX_POINTERS {
            return;
        }
        let at = index * POINTER_COMPONENTS;
        self.scalars[at] = pair[0];
        self.scalars[at + 1] = pair[1];
    }

    /// Returns pair `index`, or `None` past capacity.
    #[inline]
    pub fn pair(&self, index: usize) -> Option<[f32; 2]> {
        if index >= MAX_POINTERS {
            return None;
        }
        let at = index * POINTER_COMPONENTS;
        Some([self.scalars[at], self.scalars[at + 1]])
    }

    /// All scalars in upload order.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.scalars
    }

    #[inline]
    pub fn is_zeroed(&self) -> bool {
        self.scalars.iter().all(|v| *v == 0.0)
    }
}

impl Default for PointerBuffer {
    fn default() -> Self {
        Self::new()
    }
}
