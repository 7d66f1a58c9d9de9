use std::{fmt, sync::Arc};

use anyhow::{bail, Result};
use geo::Coord;

/// A coordinate reference system tag carried alongside geometries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Crs {
    /// Longitude/latitude in degrees on WGS84 (EPSG:4326).
    Wgs84,
    /// Ordnance Survey National Grid, metres (EPSG:27700).
    BritishNationalGrid,
    /// Spherical Web Mercator, metres (EPSG:3857).
    WebMercator,
    /// Any other planar CRS given as a PROJ.4 string, metres.
    Planar(Arc<str>),
}

impl Crs {
    /// Map an EPSG code onto a supported CRS.
    pub fn from_epsg(code: u32) -> Result<Self> {
        Ok(match code {
            4326 => Crs::Wgs84,
            27700 => Crs::BritishNationalGrid,
            3857 | 900913 => Crs::WebMercator,
            _ => bail!("[geom::crs] unsupported EPSG code: {code}"),
        })
    }

    /// EPSG code, if the CRS has one.
    pub fn epsg(&self) -> Option<u32> {
        match self {
            Crs::Wgs84 => Some(4326),
            Crs::BritishNationalGrid => Some(27700),
            Crs::WebMercator => Some(3857),
            Crs::Planar(_) => None,
        }
    }

    /// True when coordinates are angular (degrees) rather than metres.
    #[inline]
    pub fn is_geographic(&self) -> bool { matches!(self, Crs::Wgs84) }

    /// PROJ.4 definition used to build the transform.
    pub fn proj4(&self) -> &str {
        match self {
            Crs::Wgs84 => "+proj=longlat +datum=WGS84 +no_defs +type=crs",
            Crs::BritishNationalGrid => concat!(
                "+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 +y_0=-100000 ",
                "+ellps=airy +towgs84=446.448,-125.157,542.06,0.15,0.247,0.842,-20.489 ",
                "+units=m +no_defs +type=crs",
            ),
            Crs::WebMercator => concat!(
                "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 ",
                "+units=m +no_defs +type=crs",
            ),
            Crs::Planar(proj) => proj,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.epsg() {
            Some(code) => write!(f, "EPSG:{code}"),
            None => write!(f, "{}", self.proj4()),
        }
    }
}

/// How the working planar CRS is chosen for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanarStrategy {
    /// Lambert azimuthal equal-area centred on the area of interest.
    #[default]
    EqualArea,
    /// UTM zone containing the area of interest.
    Utm,
    /// Web Mercator. Inflates areas by 1/cos²(lat); kept for comparison runs.
    WebMercator,
}

impl PlanarStrategy {
    /// Build the planar CRS for an area of interest centred at `center` (lon/lat degrees).
    pub fn planar_crs(&self, center: Coord<f64>) -> Crs {
        match self {
            PlanarStrategy::EqualArea => Crs::Planar(Arc::from(format!(
                "+proj=laea +lat_0={:.6} +lon_0={:.6} +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs +type=crs",
                center.y, center.x,
            ))),
            PlanarStrategy::Utm => {
                let zone = (((center.x + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u32;
                let south = if center.y >= 0.0 { "" } else { " +south" };
                Crs::Planar(Arc::from(format!(
                    "+proj=utm +zone={zone}{south} +datum=WGS84 +units=m +no_defs +type=crs"
                )))
            }
            PlanarStrategy::WebMercator => Crs::WebMercator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsg_codes_round_trip() {
        for code in [4326, 27700, 3857] {
            assert_eq!(Crs::from_epsg(code).unwrap().epsg(), Some(code));
        }
        assert!(Crs::from_epsg(1234).is_err());
    }

    #[test]
    fn only_wgs84_is_geographic() {
        assert!(Crs::Wgs84.is_geographic());
        assert!(!Crs::BritishNationalGrid.is_geographic());
        assert!(!Crs::Planar(Arc::from("+proj=laea")).is_geographic());
    }

    #[test]
    fn utm_zone_for_london() {
        let crs = PlanarStrategy::Utm.planar_crs(Coord { x: -0.12, y: 51.5 });
        assert!(crs.proj4().contains("+zone=30 "));
        assert!(!crs.proj4().contains("+south"));
    }

    #[test]
    fn equal_area_is_centred_on_input() {
        let crs = PlanarStrategy::EqualArea.planar_crs(Coord { x: -0.1, y: 51.5 });
        assert!(crs.proj4().starts_with("+proj=laea +lat_0=51.500000 +lon_0=-0.100000"));
    }
}
