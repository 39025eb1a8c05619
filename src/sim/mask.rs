//! Per-pixel occupancy masks
//!
//! Collisions are tested on opaque pixels only, so transparent sprite margins
//! never register as contact the way a bounding box would.

use glam::IVec2;

/// Alpha values above this count as opaque
pub const ALPHA_THRESHOLD: u8 = 127;

/// A rectangular bitmap of occupied pixels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Build a mask by sampling `occupied(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut occupied: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(occupied(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Fully opaque rectangle
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build a mask from a row-major alpha channel.
    ///
    /// Returns `None` if `alpha` does not hold exactly `width * height` values.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Option<Self> {
        if alpha.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            bits: alpha.iter().map(|&a| a > ALPHA_THRESHOLD).collect(),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether pixel (x, y) is occupied; out-of-bounds pixels are empty
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Number of occupied pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Mirror top-to-bottom
    pub fn flipped_vertical(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.get(x as i32, (self.height - 1 - y) as i32)
        })
    }

    /// First overlapping pixel between `self` and `other` placed at `offset`
    /// relative to `self`'s origin, in `self`'s coordinates.
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        let x_start = offset.x.max(0);
        let y_start = offset.y.max(0);
        let x_end = (offset.x + other.width as i32).min(self.width as i32);
        let y_end = (offset.y + other.height as i32).min(self.height as i32);

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }

    /// Whether any occupied pixels coincide
    #[inline]
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        self.overlap(other, offset).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(size: u32) -> Mask {
        // Opaque border, transparent interior
        Mask::from_fn(size, size, |x, y| x == 0 || y == 0 || x == size - 1 || y == size - 1)
    }

    #[test]
    fn test_filled_overlap() {
        let a = Mask::filled(10, 10);
        let b = Mask::filled(4, 4);
        assert_eq!(a.overlap(&b, IVec2::new(2, 3)), Some(IVec2::new(2, 3)));
        assert!(a.overlaps(&b, IVec2::new(-3, -3)));
        assert!(!a.overlaps(&b, IVec2::new(-4, 0)));
        assert!(!a.overlaps(&b, IVec2::new(10, 0)));
    }

    #[test]
    fn test_transparent_interior_is_not_a_hit() {
        // Bounding boxes overlap completely, but pixels never meet
        let outer = ring(20);
        let inner = Mask::filled(4, 4);
        assert!(!outer.overlaps(&inner, IVec2::new(8, 8)));
        assert!(outer.overlaps(&inner, IVec2::new(17, 8)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = ring(12);
        let b = Mask::from_fn(6, 9, |x, y| (x + y) % 3 == 0);
        for dx in -8..14 {
            for dy in -10..14 {
                let offset = IVec2::new(dx, dy);
                assert_eq!(a.overlaps(&b, offset), b.overlaps(&a, -offset), "{offset}");
            }
        }
    }

    #[test]
    fn test_from_alpha_threshold() {
        let mask = Mask::from_alpha(3, 1, &[0, 127, 128]).unwrap();
        assert!(!mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(mask.get(2, 0));
        assert!(Mask::from_alpha(2, 2, &[255; 3]).is_none());
    }

    #[test]
    fn test_flip() {
        let mask = Mask::from_fn(2, 3, |_, y| y == 0);
        let flipped = mask.flipped_vertical();
        assert!(flipped.get(0, 2));
        assert!(!flipped.get(0, 0));
        assert_eq!(mask.count(), flipped.count());
    }
}
