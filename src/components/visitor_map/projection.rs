use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Maps geographic coordinates (degrees) to screen pixels and back.
pub trait Projection {
	/// `None` when the point has no finite screen position (e.g. the poles
	/// under Mercator).
	fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)>;

	fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)>;
}

/// Spherical Mercator with a uniform scale and a translation to the center
/// of the drawing area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mercator {
	pub scale: f64,
	pub translate: (f64, f64),
}

impl Mercator {
	/// Fit the full 360° of longitude across `width`, centered in the area.
	pub fn fit_width(width: f64, height: f64) -> Self {
		Self {
			scale: width / 2.0 / PI,
			translate: (width / 2.0, height / 2.0),
		}
	}
}

impl Projection for Mercator {
	fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
		// the poles sit at infinity
		if !(lat > -90.0 && lat < 90.0) {
			return None;
		}
		let (lambda, phi) = (lon.to_radians(), lat.to_radians());
		let x = self.translate.0 + self.scale * lambda;
		let y = self.translate.1 - self.scale * (FRAC_PI_4 + phi / 2.0).tan().ln();
		(x.is_finite() && y.is_finite()).then_some((x, y))
	}

	fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
		if self.scale == 0.0 {
			return None;
		}
		let lambda = (x - self.translate.0) / self.scale;
		let my = (self.translate.1 - y) / self.scale;
		let phi = 2.0 * my.exp().atan() - FRAC_PI_2;
		let (lon, lat) = (lambda.to_degrees(), phi.to_degrees());
		(lon.is_finite() && lat.is_finite()).then_some((lon, lat))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn origin_lands_on_the_center() {
		let m = Mercator::fit_width(960.0, 500.0);
		let (x, y) = m.project(0.0, 0.0).unwrap();
		assert!((x - 480.0).abs() < 1e-9);
		assert!((y - 250.0).abs() < 1e-9);
		let (x, _) = m.project(180.0, 0.0).unwrap();
		assert!((x - 960.0).abs() < 1e-9);
	}

	#[test]
	fn north_is_up() {
		let m = Mercator::fit_width(960.0, 500.0);
		let (_, north) = m.project(0.0, 45.0).unwrap();
		let (_, south) = m.project(0.0, -45.0).unwrap();
		assert!(north < 250.0 && south > 250.0);
	}

	#[test]
	fn poles_have_no_screen_position() {
		let m = Mercator::fit_width(960.0, 500.0);
		assert_eq!(m.project(10.0, 90.0), None);
		assert_eq!(m.project(f64::NAN, 10.0), None);
	}

	#[test]
	fn invert_round_trips() {
		let m = Mercator::fit_width(800.0, 600.0);
		let (x, y) = m.project(-73.9, 40.7).unwrap();
		let (lon, lat) = m.invert(x, y).unwrap();
		assert!((lon + 73.9).abs() < 1e-9);
		assert!((lat - 40.7).abs() < 1e-9);
	}
}
