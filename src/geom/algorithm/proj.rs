use anyhow::{anyhow, Context, Result};
use geo::{Coord, MapCoords, MultiPolygon, Point};
use proj4rs::{proj::Proj as Proj4, transform::transform};

/// PROJ.4 string for the geographic source CRS (degrees → radians handled in code).
const SOURCE_GEOG_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// A planar, area-accurate coordinate system shared by the boundary, the
/// districts and every grid cell.
///
/// Holds only the PROJ.4 definition; transforms are built on demand so the
/// value stays `Send + Sync` and cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    target: Option<String>, // None when inputs are already planar
}

impl Projection {
    /// Inputs are already planar; every transform is the identity.
    pub fn identity() -> Self { Self { target: None } }

    /// Lambert azimuthal equal-area projection centred on a lon/lat point.
    pub fn equal_area_at(center: Coord<f64>) -> Self {
        Self {
            target: Some(format!(
                "+proj=laea +lat_0={} +lon_0={} +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs +type=crs",
                center.y, center.x,
            )),
        }
    }

    /// Returns true if this projection leaves coordinates untouched.
    #[inline] pub fn is_identity(&self) -> bool { self.target.is_none() }

    /// The PROJ.4 definition of the planar system, if any.
    #[inline] pub fn definition(&self) -> Option<&str> { self.target.as_deref() }

    /// Build the (source, target) PROJ.4 pair.
    fn transforms(&self, target: &str) -> Result<(Proj4, Proj4)> {
        let from = Proj4::from_proj_string(SOURCE_GEOG_PROJ4)
            .with_context(|| anyhow!("failed to build source PROJ.4: {SOURCE_GEOG_PROJ4}"))?;
        let to = Proj4::from_proj_string(target)
            .with_context(|| anyhow!("failed to build target PROJ.4: {target}"))?;
        Ok((from, to))
    }

    /// Project lon/lat degrees into the planar system.
    pub fn project(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        let Some(target) = self.target.as_deref() else { return Ok(shape.clone()) };
        let (from, to) = self.transforms(target)?;

        shape.try_map_coords(|coord: Coord<f64>| {
            let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
            transform(&from, &to, &mut point).map(|_| Coord { x: point.0, y: point.1 })
        })
        .with_context(|| format!("CRS transform to {target} failed"))
    }

    /// Map planar coordinates back to lon/lat degrees.
    pub fn unproject(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        let Some(target) = self.target.as_deref() else { return Ok(shape.clone()) };
        let (from, to) = self.transforms(target)?;

        shape.try_map_coords(|coord: Coord<f64>| {
            let mut point = (coord.x, coord.y, 0.0);
            transform(&to, &from, &mut point)
                .map(|_| Coord { x: point.0.to_degrees(), y: point.1.to_degrees() })
        })
        .with_context(|| format!("CRS transform from {target} failed"))
    }

    /// Map a single planar point back to lon/lat degrees.
    pub fn unproject_point(&self, point: Point<f64>) -> Result<Point<f64>> {
        let Some(target) = self.target.as_deref() else { return Ok(point) };
        let (from, to) = self.transforms(target)?;

        let mut xyz = (point.x(), point.y(), 0.0);
        transform(&to, &from, &mut xyz)
            .with_context(|| format!("CRS transform from {target} failed"))?;
        Ok(Point::new(xyz.0.to_degrees(), xyz.1.to_degrees()))
    }
}
