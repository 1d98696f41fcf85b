//! Lambert Conformal Conic projection.
//!
//! Maps a cone tangent to the Earth's surface at the domain's standard
//! parallel onto a flat plane. Used to project station lat/lon into map
//! coordinates (meters) before scattered points are handed to the
//! interpolation collaborator.

use std::f64::consts::PI;

use crate::domain::ConformalConicParams;

/// Below this cone constant the conic is treated as equatorial and the
/// projection uses its Mercator limiting form.
const EQUATORIAL_N: f64 = 1e-9;

/// Lambert Conformal Conic projection with a single standard parallel.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians.
    pub lon0: f64,
    /// Standard parallel in radians.
    pub lat0: f64,
    /// Earth radius (meters).
    pub earth_radius: f64,
    /// Cone constant (n). Exactly 0.0 for the equatorial Mercator limit.
    n: f64,
    /// F constant.
    f: f64,
    /// Rho at the standard parallel.
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection from derived domain parameters.
    ///
    /// This is a tangent cone: the single standard parallel doubles as the
    /// projection origin, so the domain center maps to (0, 0).
    ///
    /// At the equator the cone constant vanishes and the conic collapses;
    /// the projection falls back to its Mercator limiting form so that
    /// equator-centered domains still map to finite coordinates.
    pub fn from_params(params: &ConformalConicParams) -> Self {
        let to_rad = PI / 180.0;
        let lat0 = params.standard_parallel * to_rad;
        let lon0 = params.central_meridian * to_rad;

        // Spherical earth (WGS84 mean radius)
        let earth_radius = 6371229.0;

        // Tangent cone constant
        let n = lat0.sin();

        if n.abs() < EQUATORIAL_N {
            return Self {
                lon0,
                lat0,
                earth_radius,
                n: 0.0,
                f: 1.0,
                rho0: 0.0,
            };
        }

        let f = (lat0.cos() * (PI / 4.0 + lat0 / 2.0).tan().powf(n)) / n;
        let rho0 = earth_radius * f / (PI / 4.0 + lat0 / 2.0).tan().powf(n);

        Self {
            lon0,
            lat0,
            earth_radius,
            n,
            f,
            rho0,
        }
    }

    /// Project geographic coordinates (degrees) to map coordinates (meters).
    ///
    /// The domain center is the origin. NaN input yields NaN output.
    pub fn forward(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let to_rad = PI / 180.0;
        let lat = lat_deg * to_rad;
        let lon = lon_deg * to_rad;

        // Normalize longitude difference to [-π, π]
        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        if self.n == 0.0 {
            let x = self.earth_radius * dlon;
            let y = self.earth_radius * (PI / 4.0 + lat / 2.0).tan().ln();
            return (x, y);
        }

        let rho = self.earth_radius * self.f / (PI / 4.0 + lat / 2.0).tan().powf(self.n);
        let theta = self.n * dlon;

        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();

        (x, y)
    }

    /// Unproject map coordinates (meters) back to geographic degrees.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let to_deg = 180.0 / PI;

        if self.n == 0.0 {
            let lat = 2.0 * (y / self.earth_radius).exp().atan() - PI / 2.0;
            let lon = self.lon0 + x / self.earth_radius;
            return (lat * to_deg, lon * to_deg);
        }

        let rho = (x * x + (self.rho0 - y) * (self.rho0 - y)).sqrt();
        let rho = if self.n < 0.0 { -rho } else { rho };

        let theta = (x / (self.rho0 - y)).atan();

        let lat = 2.0 * ((self.earth_radius * self.f / rho).powf(1.0 / self.n)).atan() - PI / 2.0;
        let lon = self.lon0 + theta / self.n;

        (lat * to_deg, lon * to_deg)
    }
}
