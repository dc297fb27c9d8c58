//! Bit-interleaving codecs.
//!
//! Two variants are kept: the 64-bit codec used for the hierarchical
//! index's locality sort (32 bits per axis), and a coarser 32-bit codec (16
//! bits per axis) for callers that only need a cheap spatial bucket key.

use layoutcore_geom::{Point, Rectangle};

/// Interleave a 32-bit value's bits with zeros: `0b...abcd` becomes
/// `0b...0a0b0c0d`. Six mask-and-shift steps spread 32 bits across the 64
/// even-bit positions of the result.
fn spread_u32(v: u32) -> u64 {
    let mut v = v as u64;
    v &= 0xFFFF_FFFF;
    v = (v | (v << 16)) & 0x0000_FFFF_0000_FFFF;
    v = (v | (v << 8)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333_3333_3333;
    v = (v | (v << 1)) & 0x5555_5555_5555_5555;
    v
}

/// Inverse of [`spread_u32`]: gather the even bits of a 64-bit value back
/// into a contiguous 32-bit value.
fn compact_u64(mut v: u64) -> u32 {
    v &= 0x5555_5555_5555_5555;
    v = (v | (v >> 1)) & 0x3333_3333_3333_3333;
    v = (v | (v >> 2)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v >> 4)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v >> 8)) & 0x0000_FFFF_0000_FFFF;
    v = (v | (v >> 16)) & 0x0000_0000_FFFF_FFFF;
    v as u32
}

/// Interleave two 32-bit coordinates into a 64-bit Morton code, `x` on the
/// even bits and `y` on the odd bits.
pub fn encode(x: u32, y: u32) -> u64 {
    spread_u32(x) | (spread_u32(y) << 1)
}

/// Inverse of [`encode`].
pub fn decode(code: u64) -> (u32, u32) {
    (compact_u64(code), compact_u64(code >> 1))
}

/// Encode a point's position within `bounds` as a 64-bit Morton code.
///
/// `point` is normalized to `bounds` and scaled to the full `u32` range
/// before interleaving. A `bounds` with zero width or height normalizes
/// that axis to `0`, matching the degenerate-bound clamp used throughout
/// `layoutcore-index`.
pub fn encode_point(point: Point, bounds: Rectangle) -> u64 {
    let nx = normalize(point.x, bounds.left(), bounds.width);
    let ny = normalize(point.y, bounds.bottom(), bounds.height);
    encode(nx, ny)
}

fn normalize(value: f64, origin: f64, extent: f64) -> u32 {
    if extent <= 0.0 {
        return 0;
    }
    let t = ((value - origin) / extent).clamp(0.0, 1.0);
    (t * u32::MAX as f64) as u32
}

/// Combine two [`u16`] integers into a coarse [`u32`] Morton code. Kept
/// from the original 32-bit/16-bit-per-axis codec for callers that only
/// need cheap spatial bucketing rather than full-precision locality.
pub fn morton_2d_u16(x: u16, y: u16) -> u32 {
    fn expand(mut v: u32) -> u32 {
        v = (v | (v << 8)) & 0x00FF_00FF;
        v = (v | (v << 4)) & 0x0F0F_0F0F;
        v = (v | (v << 2)) & 0x3333_3333;
        v = (v | (v << 1)) & 0x5555_5555;
        v
    }
    expand(x as u32) | (expand(y as u32) << 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_interleaving_matches_expected_pattern() {
        // x=1 (...01), y=0 -> even bit 0 set only.
        assert_eq!(encode(1, 0), 1);
        // x=0, y=1 (...01) -> odd bit 0 set only.
        assert_eq!(encode(0, 1), 2);
        assert_eq!(encode(1, 1), 3);
    }

    #[test]
    fn decode_undoes_encode() {
        let cases = [(0u32, 0u32), (1, 1), (u32::MAX, 0), (0, u32::MAX), (0xDEAD_BEEF, 0x1234_5678)];
        for (x, y) in cases {
            assert_eq!(decode(encode(x, y)), (x, y));
        }
    }

    #[test]
    fn encode_point_clamps_outside_bounds() {
        let bounds = Rectangle::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let inside = encode_point(Point::new(5.0, 5.0), bounds);
        let below = encode_point(Point::new(-5.0, -5.0), bounds);
        let origin = encode_point(Point::new(0.0, 0.0), bounds);
        assert_eq!(below, origin);
        assert!(inside > 0);
    }

    #[test]
    fn zero_extent_bounds_normalize_to_zero() {
        let degenerate = Rectangle::new(3.0, 3.0, 0.0, 0.0).unwrap();
        assert_eq!(encode_point(Point::new(3.0, 3.0), degenerate), 0);
    }

    #[test]
    fn nearby_points_share_far_more_leading_bits_than_distant_ones() {
        // Locality, not a fixed bit count: at this codec's 32-bits/axis
        // precision, a one-part-in-a-thousand step inside a 1000x1000
        // world still leaves the two codes sharing only a couple dozen
        // leading bits, so the scenario is checked relatively rather than
        // against a fixed threshold.
        let bounds = Rectangle::new(0.0, 0.0, 1000.0, 1000.0).unwrap();
        let near_a = encode_point(Point::new(100.0, 100.0), bounds);
        let near_b = encode_point(Point::new(101.0, 101.0), bounds);
        let far = encode_point(Point::new(900.0, 100.0), bounds);

        let shared_near = (near_a ^ near_b).leading_zeros();
        let shared_far = (near_a ^ far).leading_zeros();
        assert!(shared_near > shared_far + 10, "near={shared_near} far={shared_far}");
    }

    #[test]
    fn morton_2d_u16_matches_legacy_bucketing() {
        assert_eq!(morton_2d_u16(1, 0), 1);
        assert_eq!(morton_2d_u16(0, 1), 2);
        assert_eq!(morton_2d_u16(1, 1), 3);
    }

    proptest::proptest! {
        #[test]
        fn decode_encode_roundtrip_is_total(x: u32, y: u32) {
            let (dx, dy) = decode(encode(x, y));
            proptest::prop_assert_eq!((dx, dy), (x, y));
        }
    }
}
