use anyhow::{anyhow, ensure, Result};
use geo::{BooleanOps, BoundingRect, Coord, Euclidean, Length, LineString, MultiLineString, MultiPolygon, Polygon};
use spade::{DelaunayTriangulation, Point2, Triangulation};

/// Voronoi cells of a point set, clipped to a boundary, with the
/// shared-edge adjacency of the clipped cells.
#[derive(Debug, Clone)]
pub(crate) struct Voronoi {
    /// One clipped cell per surviving site, in site order.
    pub cells: Vec<MultiPolygon<f64>>,
    /// Undirected shared-edge pairs, indexing into `cells`.
    pub edges: Vec<(u32, u32)>,
}

/// Compute the Voronoi tessellation of `sites` bounded by `boundary`.
///
/// Four frame points far outside the boundary are inserted first so that
/// every real site owns a bounded Voronoi face.  Two clipped cells are
/// adjacent when the Voronoi edge dual to their Delaunay edge keeps a
/// positive length inside the boundary.  Sites whose clipped cell is empty
/// are dropped.
pub(crate) fn bounded_voronoi(sites: &[Coord<f64>], boundary: &MultiPolygon<f64>) -> Result<Voronoi> {
    let bounds = boundary.bounding_rect()
        .ok_or_else(|| anyhow!("[bounded_voronoi] boundary is empty"))?;
    ensure!(sites.iter().all(|p| p.x.is_finite() && p.y.is_finite()),
        "[bounded_voronoi] all sites must have finite coordinates");

    let span = bounds.width().max(bounds.height()).max(1.0);
    let pad = 10.0 * span;
    let center = bounds.center();

    let mut triangulation = DelaunayTriangulation::<Point2<f64>>::new();
    for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        triangulation.insert(Point2::new(center.x + sx * pad, center.y + sy * pad))
            .map_err(|e| anyhow!("[bounded_voronoi] failed to insert frame point: {e:?}"))?;
    }

    // site_of[vertex index] = site index (frame vertices map to None).
    let mut handles = Vec::with_capacity(sites.len());
    let mut site_of = vec![None; 4];
    for (i, site) in sites.iter().enumerate() {
        let handle = triangulation.insert(Point2::new(site.x, site.y))
            .map_err(|e| anyhow!("[bounded_voronoi] failed to insert site {i}: {e:?}"))?;
        if site_of.len() <= handle.index() { site_of.resize(handle.index() + 1, None) }
        ensure!(site_of[handle.index()].is_none(),
            "[bounded_voronoi] site {i} duplicates site {:?} at ({}, {})", site_of[handle.index()], site.x, site.y);
        site_of[handle.index()] = Some(i);
        handles.push(handle);
    }

    // Clip each site's Voronoi face to the boundary.
    let mut cell_of_site = vec![None; sites.len()];
    let mut cells = Vec::with_capacity(sites.len());
    for (i, &handle) in handles.iter().enumerate() {
        let vertex = triangulation.vertex(handle);
        let mut corners = vertex.out_edges()
            .filter_map(|edge| edge.face().as_inner())
            .map(|face| {
                let c = face.circumcenter();
                Coord { x: c.x, y: c.y }
            })
            .collect::<Vec<_>>();

        // Voronoi faces are convex around their site; order corners by angle.
        let site = sites[i];
        corners.sort_by(|a, b| {
            (a.y - site.y).atan2(a.x - site.x).total_cmp(&(b.y - site.y).atan2(b.x - site.x))
        });
        corners.dedup_by(|a, b| (a.x - b.x).hypot(a.y - b.y) <= 1e-12 * span);
        if corners.len() < 3 { continue }
        corners.push(corners[0]);

        let face = MultiPolygon(vec![Polygon::new(LineString::from(corners), vec![])]);
        let clipped = face.intersection(boundary);
        if clipped.0.is_empty() { continue }

        cell_of_site[i] = Some(cells.len() as u32);
        cells.push(clipped);
    }

    // Dual edges: the Voronoi edge between two sites joins the circumcenters
    // of the two triangles on either side of their Delaunay edge.
    let min_length = 1e-9 * span;
    let mut edges = Vec::new();
    for edge in triangulation.undirected_edges() {
        let [a, b] = edge.vertices();
        let (Some(site_a), Some(site_b)) = (
            site_of.get(a.fix().index()).copied().flatten(),
            site_of.get(b.fix().index()).copied().flatten(),
        ) else { continue };
        let (Some(cell_a), Some(cell_b)) = (cell_of_site[site_a], cell_of_site[site_b]) else { continue };

        let directed = edge.as_directed();
        let (Some(left), Some(right)) = (directed.face().as_inner(), directed.rev().face().as_inner()) else { continue };
        let (p, q) = (left.circumcenter(), right.circumcenter());

        let segment = MultiLineString::new(vec![LineString::from(vec![
            Coord { x: p.x, y: p.y },
            Coord { x: q.x, y: q.y },
        ])]);
        if Euclidean.length(&boundary.clip(&segment, false)) > min_length {
            edges.push((cell_a.min(cell_b), cell_a.max(cell_b)));
        }
    }
    edges.sort_unstable();
    edges.dedup();

    Ok(Voronoi { cells, edges })
}
