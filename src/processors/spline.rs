use crate::{
    data_types::spline::SplineData,
    error::{Error, Result},
    logvbln,
};

/// Natural cubic spline through a set of points.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    // second derivatives
    y2: Vec<f64>,
}

impl CubicSpline {
    /// Points are sorted by x, equal x values are rejected.
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::InvalidInput(format!(
                "spline has {} x but {} y values",
                x.len(),
                y.len()
            )));
        }

        if x.len() < SplineData::MIN_POINTS {
            return Err(Error::InvalidInput(format!(
                "a spline needs at least {} points",
                SplineData::MIN_POINTS
            )));
        }

        let mut points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        if points.windows(2).any(|pair| pair[0].0 >= pair[1].0) {
            return Err(Error::InvalidInput(
                "spline x values must be distinct".to_string(),
            ));
        }

        let (x, y): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
        let len = x.len();

        let mut y2 = vec![0.; len];
        let mut u = vec![0.; len];

        for i in 1..len - 1 {
            let sig = (x[i] - x[i - 1]) / (x[i + 1] - x[i - 1]);
            let p = sig * y2[i - 1] + 2.;

            y2[i] = (sig - 1.) / p;
            u[i] = (y[i + 1] - y[i]) / (x[i + 1] - x[i]) - (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
            u[i] = (6. * u[i] / (x[i + 1] - x[i - 1]) - sig * u[i - 1]) / p;
        }

        for k in (0..len - 1).rev() {
            y2[k] = y2[k] * y2[k + 1] + u[k];
        }

        Ok(Self { x, y, y2 })
    }

    /// Values outside of the x range are extrapolated with the border polynomials.
    pub fn interpolate(&self, x: f64) -> f64 {
        let last = self.x.len() - 1;
        let high = self.x.partition_point(|value| *value < x).clamp(1, last);
        let low = high - 1;

        let h = self.x[high] - self.x[low];
        let a = (self.x[high] - x) / h;
        let b = (x - self.x[low]) / h;

        a * self.y[low]
            + b * self.y[high]
            + ((a.powi(3) - a) * self.y2[low] + (b.powi(3) - b) * self.y2[high]) * h * h / 6.
    }
}

pub struct SplineAdjuster {}

impl SplineAdjuster {
    const CC: &str = "Spline";

    /// Moves `altitude` towards `reference`: up to `last_index` every value gets the
    /// first slice difference, decreasing linearly to 0 at `last_index`, and the spline
    /// value at its x position. Values after `last_index` are not changed.
    pub fn adjust(
        altitude: &[f32],
        reference: &[f32],
        x_serie: &[f64],
        spline: &mut SplineData,
        last_index: usize,
    ) -> Result<Vec<f32>> {
        if altitude.is_empty() {
            return Err(Error::MissingData("altitude"));
        }

        if altitude.len() != reference.len() || altitude.len() != x_serie.len() {
            return Err(Error::InvalidInput(
                "altitude, reference and x series differ in length".to_string(),
            ));
        }

        let last_index = last_index.min(altitude.len() - 1);
        let right_pos = x_serie[last_index];

        if right_pos <= 0. {
            return Err(Error::InvalidInput(format!(
                "x position {right_pos} of the last adjusted index"
            )));
        }

        let first_diff = (reference[0] - altitude[0]) as f64;

        spline.update_graph_values(right_pos, first_diff);
        spline.map_to_serie(x_serie, right_pos);

        let curve = CubicSpline::new(&spline.pos_x_graph, &spline.pos_y_graph)?;

        let adjusted: Vec<f32> = altitude
            .iter()
            .zip(x_serie)
            .enumerate()
            .map(|(serie_index, (altitude, x))| {
                if serie_index > last_index {
                    return *altitude;
                }

                let linear = first_diff * (1. - x / right_pos);

                (*altitude as f64 + linear + curve.interpolate(*x)) as f32
            })
            .collect();

        logvbln!(
            "adjusted {} values, first diff {:.1}",
            last_index + 1,
            first_diff
        );

        Ok(adjusted)
    }
}
