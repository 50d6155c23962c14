use crate::BrdfError;

/// Side length of the lookup table in texels.
pub const LUT_SIZE: u32 = 256;

/// Side length of one workgroup in invocations. Must match
/// `@workgroup_size` in `integrate_brdf.wgsl`.
pub const TILE: u32 = 16;

/// A square compute dispatch of `size`² invocations in `tile`² groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchGrid {
    size: u32,
    tile: u32,
}

impl DispatchGrid {
    /// Fails unless `tile` divides `size` exactly, so every texel is
    /// written by exactly one invocation.
    pub fn new(size: u32, tile: u32) -> Result<Self, BrdfError> {
        if size == 0 || tile == 0 || size % tile != 0 {
            return Err(BrdfError::Indivisible { size, tile });
        }
        Ok(Self { size, tile })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn tile(&self) -> u32 {
        self.tile
    }

    /// Workgroup counts for `dispatch_workgroups`.
    pub fn workgroups(&self) -> (u32, u32, u32) {
        let groups = self.size / self.tile;
        (groups, groups, 1)
    }

    pub fn workgroup_count(&self) -> u32 {
        let (x, y, z) = self.workgroups();
        x * y * z
    }

    /// Texels written by the invocations of workgroup `(gx, gy)`.
    pub fn texels(&self, (gx, gy): (u32, u32)) -> impl Iterator<Item = (u32, u32)> {
        let tile = self.tile;
        (0..tile).flat_map(move |ly| (0..tile).map(move |lx| (gx * tile + lx, gy * tile + ly)))
    }
}

#[cfg(test)]
mod tests {
    use super::{DispatchGrid, LUT_SIZE, TILE};
    use crate::BrdfError;

    #[test]
    fn test_lut_grid() {
        let grid = DispatchGrid::new(LUT_SIZE, TILE).unwrap();
        assert_eq!(grid.workgroups(), (16, 16, 1));
        assert_eq!(grid.workgroup_count(), 256);
    }

    #[test]
    fn test_every_texel_once() {
        let grid = DispatchGrid::new(LUT_SIZE, TILE).unwrap();
        let size = grid.size() as usize;
        let mut hits = vec![0_u8; size * size];
        let (gx, gy, _) = grid.workgroups();
        for y in 0..gy {
            for x in 0..gx {
                for (tx, ty) in grid.texels((x, y)) {
                    hits[ty as usize * size + tx as usize] += 1;
                }
            }
        }
        assert!(hits.iter().all(|&count| count == 1));
    }

    #[test]
    fn test_rejects_partial_tiles() {
        assert!(matches!(
            DispatchGrid::new(250, 16),
            Err(BrdfError::Indivisible {
                size: 250,
                tile: 16
            })
        ));
        assert!(DispatchGrid::new(0, 16).is_err());
        assert!(DispatchGrid::new(256, 0).is_err());
        assert_eq!(DispatchGrid::new(32, 16).unwrap().workgroup_count(), 4);
    }
}
