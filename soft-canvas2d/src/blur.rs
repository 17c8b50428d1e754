//! Alpha-plane blur used for drop shadows.
//!
//! The kernel is a stack blur: a triangle of weights `r + 1 - |i|` over
//! `-r..=r`, applied separably along rows and then columns. Each axis is two
//! running box sums of width `r + 1`, so the cost is independent of the
//! radius. Pixels outside the plane count as transparent.

/// An 8-bit alpha image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaPlane {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl AlphaPlane {
    /// A fully transparent plane.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Size of the pixel data in bytes.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }
}

/// Blur `plane` with a stack blur of the given integer radius.
pub fn stack_blur(plane: &AlphaPlane, radius: u32) -> AlphaPlane {
    if radius == 0 || plane.data.is_empty() {
        return plane.clone();
    }
    let (w, h) = (plane.width as usize, plane.height as usize);
    let r = radius as usize;
    let norm = ((r + 1) * (r + 1)) as f64;

    let mut horizontal = vec![0f64; w * h];
    let mut line = vec![0f64; w.max(h)];
    let mut out = vec![0f64; w.max(h)];

    for y in 0..h {
        for x in 0..w {
            line[x] = plane.data[y * w + x] as f64;
        }
        triangle_pass(&line[..w], &mut out[..w], r);
        for x in 0..w {
            horizontal[y * w + x] = out[x] / norm;
        }
    }

    let mut data = vec![0u8; w * h];
    for x in 0..w {
        for y in 0..h {
            line[y] = horizontal[y * w + x];
        }
        triangle_pass(&line[..h], &mut out[..h], r);
        for y in 0..h {
            data[y * w + x] = (out[y] / norm).round().clamp(0.0, 255.0) as u8;
        }
    }

    AlphaPlane {
        width: plane.width,
        height: plane.height,
        data,
    }
}

/// Unnormalized triangle filter of one line: a forward box over
/// `[i, i + r]` followed by a backward box over `[i - r, i]`.
fn triangle_pass(src: &[f64], dst: &mut [f64], r: usize) {
    let n = src.len();
    let prefix = prefix_sums(src.iter().copied());
    let forward: Vec<f64> = (0..n)
        .map(|i| prefix[(i + r + 1).min(n)] - prefix[i])
        .collect();
    let prefix = prefix_sums(forward.iter().copied());
    for (i, d) in dst.iter_mut().enumerate() {
        *d = prefix[i + 1] - prefix[i.saturating_sub(r)];
    }
}

fn prefix_sums(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut sums = vec![0.0];
    let mut acc = 0.0;
    for v in values {
        acc += v;
        sums.push(acc);
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dot(size: u32, value: u8) -> AlphaPlane {
        let mut plane = AlphaPlane::new(size, size);
        let c = size / 2;
        plane.data[(c * size + c) as usize] = value;
        plane
    }

    #[test]
    fn test_zero_radius_is_identity() {
        let plane = dot(5, 200);
        assert_eq!(stack_blur(&plane, 0), plane);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(4)]
    fn test_dot_spreads_symmetrically(#[case] radius: u32) {
        let plane = dot(21, 255);
        let blurred = stack_blur(&plane, radius);
        let c = 10;
        let peak = blurred.get(c, c);
        let expected = 255.0 / ((radius + 1) as f64).powi(2);
        assert_eq!(peak, expected.round() as u8);
        for d in 1..=radius {
            assert_eq!(blurred.get(c - d, c), blurred.get(c + d, c));
            assert_eq!(blurred.get(c, c - d), blurred.get(c, c + d));
            assert!(blurred.get(c + d, c) <= peak);
        }
        // Nothing beyond the kernel support.
        assert_eq!(blurred.get(c + radius + 1, c), 0);
        assert_eq!(blurred.get(c, c + radius + 1), 0);
    }

    #[test]
    fn test_uniform_interior_is_preserved() {
        let mut plane = AlphaPlane::new(20, 20);
        plane.data.fill(180);
        let blurred = stack_blur(&plane, 3);
        assert_eq!(blurred.get(10, 10), 180);
        // Edges fade into the transparent surroundings.
        assert!(blurred.get(0, 0) < 180);
    }

    #[test]
    fn test_energy_is_conserved_away_from_edges() {
        let mut plane = AlphaPlane::new(40, 40);
        for y in 15..25 {
            for x in 15..25 {
                plane.data[y * 40 + x] = 255;
            }
        }
        let before: u32 = plane.data.iter().map(|&v| v as u32).sum();
        let after: u32 = stack_blur(&plane, 5).data.iter().map(|&v| v as u32).sum();
        let diff = (before as f64 - after as f64).abs() / before as f64;
        assert!(diff < 0.02, "before {} after {}", before, after);
    }
}
