//! Triangle-soup voxelization into occupancy grids.

use crate::error::Result;
use crate::geometry::BoxSize;
use crate::grid::Grid3;
use crate::mesh::Triangle;
use crate::variant_set::VariantSet;
use nalgebra::Point3;

/// Surface sampling pitch in voxels.
const SAMPLE_PITCH: f64 = 0.5;

/// Voxelizes triangles given in voxel coordinates.
///
/// Cell `(i, j, k)` covers `[i, i+1) x [j, j+1) x [k, k+1)`. The surface is
/// rasterized, then everything not reachable from outside the grid is solid.
/// Openings narrower than `min_hole` voxels are closed before the exterior
/// fill, so thin internal cavities come out solid.
pub fn voxelize_triangles(
    triangles: &[Triangle],
    grid: &mut Grid3<VariantSet>,
    variant: VariantSet,
    min_hole: usize,
) -> Result<usize> {
    let size = grid.size();
    if size.is_empty() {
        return Ok(0);
    }

    let radius = min_hole / 2;
    let pad = radius + 1;
    let padded = BoxSize::new(size.x + 2 * pad, size.y + 2 * pad, size.z + 2 * pad);

    let mut surface: Grid3<bool> = Grid3::try_new(padded)?;
    let skipped = triangles
        .iter()
        .filter(|t| !rasterize(t, &mut surface, pad))
        .count();
    if skipped > 0 {
        log::warn!("Voxelization skipped {} triangles with non-finite vertices", skipped);
    }

    let blocked = if radius > 0 {
        dilate(&surface, radius)?
    } else {
        surface.clone()
    };

    let mut exterior = flood_exterior(&blocked)?;
    if radius > 0 {
        exterior = dilate(&exterior, radius)?;
    }

    let mut solid = 0;
    for x in 0..size.x {
        for y in 0..size.y {
            for z in 0..size.z {
                let local = (x + pad, y + pad, z + pad);
                if surface[local] || !exterior[local] {
                    grid[(x, y, z)] |= variant;
                    solid += 1;
                }
            }
        }
    }

    Ok(solid)
}

/// Marks the cells a triangle passes through. Returns false if the triangle
/// has non-finite vertices.
fn rasterize(triangle: &Triangle, surface: &mut Grid3<bool>, pad: usize) -> bool {
    let [a, b, c] = triangle.vertices();
    if ![a, b, c].iter().all(|p| p.iter().all(|v| v.is_finite())) {
        return false;
    }

    let ab = b - a;
    let ac = c - a;
    let longest = ab.norm().max(ac.norm()).max((c - b).norm());
    let steps = ((longest / SAMPLE_PITCH).ceil() as usize).max(1);
    let n = steps as f64;

    for i in 0..=steps {
        for j in 0..=(steps - i) {
            let p = a + (ab * i as f64 + ac * j as f64) / n;
            mark(surface, &p, pad);
        }
    }
    true
}

fn mark(surface: &mut Grid3<bool>, p: &Point3<f64>, pad: usize) {
    let cell = |v: f64| {
        let shifted = v.floor() + pad as f64;
        (shifted >= 0.0).then_some(shifted as usize)
    };
    if let (Some(x), Some(y), Some(z)) = (cell(p.x), cell(p.y), cell(p.z)) {
        if let Some(c) = surface.get_mut(x, y, z) {
            *c = true;
        }
    }
}

/// Cells reachable from the grid corner through unblocked cells (6-connected).
fn flood_exterior(blocked: &Grid3<bool>) -> Result<Grid3<bool>> {
    let size = blocked.size();
    let mut exterior: Grid3<bool> = Grid3::try_new(size)?;
    let mut stack = vec![(0usize, 0usize, 0usize)];
    exterior[(0, 0, 0)] = true;

    while let Some((x, y, z)) = stack.pop() {
        let neighbours = [
            (x.wrapping_sub(1), y, z),
            (x + 1, y, z),
            (x, y.wrapping_sub(1), z),
            (x, y + 1, z),
            (x, y, z.wrapping_sub(1)),
            (x, y, z + 1),
        ];
        for (nx, ny, nz) in neighbours {
            let free = blocked.get(nx, ny, nz) == Some(&false);
            if free && exterior.get(nx, ny, nz) == Some(&false) {
                exterior[(nx, ny, nz)] = true;
                stack.push((nx, ny, nz));
            }
        }
    }

    Ok(exterior)
}

/// Chebyshev dilation by `radius`, done as three separable 1D passes.
fn dilate(grid: &Grid3<bool>, radius: usize) -> Result<Grid3<bool>> {
    let size = grid.size();
    let mut current = grid.clone();

    for axis in 0..3 {
        let mut next: Grid3<bool> = Grid3::try_new(size)?;
        for ((x, y, z), &set) in current.iter() {
            if !set {
                continue;
            }
            let (pos, len) = match axis {
                0 => (x, size.x),
                1 => (y, size.y),
                _ => (z, size.z),
            };
            let lo = pos.saturating_sub(radius);
            let hi = (pos + radius).min(len - 1);
            for p in lo..=hi {
                let cell = match axis {
                    0 => (p, y, z),
                    1 => (x, p, z),
                    _ => (x, y, p),
                };
                next[cell] = true;
            }
        }
        current = next;
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::mesh::Mesh;

    fn cube_at(origin: f64, edge: f64) -> Mesh {
        let mut mesh = Mesh::cuboid(edge, edge, edge);
        mesh.set_baseline(Point3::new(origin, origin, origin));
        mesh
    }

    #[test]
    fn test_solid_cube_fills_interior() {
        let mesh = cube_at(1.0, 4.0);
        let mut grid = Grid3::try_new(BoxSize::cube(6)).unwrap();
        let solid = voxelize_triangles(mesh.triangles(), &mut grid, VariantSet::single(0), 1)
            .unwrap();

        // Faces at 1.0 and 5.0 mark cells 1..=5 on each axis.
        assert_eq!(solid, 125);
        assert!(grid[(3, 3, 3)].contains(0));
        assert!(grid[(0, 0, 0)].is_empty());
    }

    #[test]
    fn test_variant_bits_accumulate() {
        let mesh = cube_at(1.0, 2.0);
        let mut grid = Grid3::try_new(BoxSize::cube(4)).unwrap();
        voxelize_triangles(mesh.triangles(), &mut grid, VariantSet::single(0), 1).unwrap();
        voxelize_triangles(mesh.triangles(), &mut grid, VariantSet::single(3), 1).unwrap();

        assert_eq!(grid[(2, 2, 2)], VariantSet::from_bits(0b1001));
    }

    #[test]
    fn test_enclosed_cavity_is_solid() {
        let mut mesh = cube_at(1.0, 8.0);
        let mut inner = Mesh::cuboid(2.0, 2.0, 2.0);
        inner.set_baseline(Point3::new(4.0, 4.0, 4.0));
        mesh.add(&inner, &nalgebra::Vector3::zeros());

        let mut grid = Grid3::try_new(BoxSize::cube(10)).unwrap();
        let solid = voxelize_triangles(mesh.triangles(), &mut grid, VariantSet::single(0), 1)
            .unwrap();
        assert_eq!(solid, 9 * 9 * 9);
    }

    #[test]
    fn test_min_hole_closes_narrow_gap() {
        // Two slabs separated by a one-voxel gap at x = 6.
        let mut mesh = Mesh::cuboid(4.0, 8.0, 8.0);
        mesh.set_baseline(Point3::new(1.0, 1.0, 1.0));
        let mut other = Mesh::cuboid(4.0, 8.0, 8.0);
        other.set_baseline(Point3::new(7.0, 1.0, 1.0));
        mesh.add(&other, &nalgebra::Vector3::zeros());

        let size = BoxSize::new(13, 11, 11);
        let mut open = Grid3::try_new(size).unwrap();
        let solid = voxelize_triangles(mesh.triangles(), &mut open, VariantSet::single(0), 1)
            .unwrap();
        assert_eq!(solid, 2 * 5 * 9 * 9);
        assert!(open[(6, 5, 5)].is_empty());

        let mut closed = Grid3::try_new(size).unwrap();
        let solid = voxelize_triangles(mesh.triangles(), &mut closed, VariantSet::single(0), 5)
            .unwrap();
        assert_eq!(solid, 2 * 5 * 9 * 9 + 9 * 9);
        assert!(closed[(6, 5, 5)].contains(0));
        assert!(closed[(6, 10, 5)].is_empty());
    }

    #[test]
    fn test_empty_grid() {
        let mesh = cube_at(0.0, 1.0);
        let mut grid = Grid3::try_new(BoxSize::new(0, 3, 3)).unwrap();
        let solid = voxelize_triangles(mesh.triangles(), &mut grid, VariantSet::single(0), 1)
            .unwrap();
        assert_eq!(solid, 0);
    }
}
