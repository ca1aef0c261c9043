use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Control points of an editable elevation adjustment curve. All arrays are parallel,
/// a point is addressed by the same index in each of them.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SplineData {
    /// Position relative to the graph width, 0..1
    pub pos_x_relative: Vec<f64>,
    /// Position relative to the first time slice elevation difference
    pub pos_y_relative: Vec<f64>,

    pub pos_x_graph: Vec<f64>,
    pub pos_y_graph: Vec<f64>,

    pub pos_x_graph_min: Vec<f64>,
    pub pos_x_graph_max: Vec<f64>,

    pub is_point_movable: Vec<bool>,

    /// Data serie index for each point, set by `map_to_serie`
    pub serie_indices: Vec<usize>,
}

impl SplineData {
    pub const MIN_POINTS: usize = 3;

    // slightly outside 0..1 so the border points enclose the whole graph
    const BORDER_LEFT: f64 = -0.0000000000001;
    const BORDER_RIGHT: f64 = 1.0000000000001;

    /// Default curve: fixed start and end point and one movable point in the middle.
    pub fn with_three_points(last_relative_y: f64) -> Self {
        Self {
            pos_x_relative: vec![Self::BORDER_LEFT, 0.5, Self::BORDER_RIGHT],
            pos_y_relative: vec![0., 0., last_relative_y],
            pos_x_graph: vec![0.; 3],
            pos_y_graph: vec![0.; 3],
            pos_x_graph_min: vec![Self::BORDER_LEFT, 0., Self::BORDER_RIGHT],
            pos_x_graph_max: vec![Self::BORDER_LEFT, 0., Self::BORDER_RIGHT],
            is_point_movable: vec![false, true, false],
            serie_indices: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.is_point_movable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_point_movable.is_empty()
    }

    /// Inserts a movable point, keeping the points ordered by their relative x position.
    pub fn insert_point(&mut self, relative_x: f64, relative_y: f64) -> Result<usize> {
        if !(0. ..=1.).contains(&relative_x) {
            return Err(Error::InvalidInput(format!(
                "relative x position {relative_x} is outside of 0..1"
            )));
        }

        let index = self
            .pos_x_relative
            .iter()
            .position(|x| *x > relative_x)
            .unwrap_or(self.len());

        self.pos_x_relative.insert(index, relative_x);
        self.pos_y_relative.insert(index, relative_y);
        self.pos_x_graph.insert(index, 0.);
        self.pos_y_graph.insert(index, 0.);
        self.pos_x_graph_min.insert(index, 0.);
        self.pos_x_graph_max.insert(index, 0.);
        self.is_point_movable.insert(index, true);
        self.serie_indices.clear();

        Ok(index)
    }

    /// Removes a point, the curve keeps at least `MIN_POINTS` points.
    pub fn remove_point(&mut self, index: usize) -> Result<()> {
        if self.len() <= Self::MIN_POINTS {
            return Err(Error::InvalidInput(format!(
                "a spline needs at least {} points",
                Self::MIN_POINTS
            )));
        }

        if index >= self.len() {
            return Err(Error::NotFound(format!("spline point {index}")));
        }

        self.pos_x_relative.remove(index);
        self.pos_y_relative.remove(index);
        self.pos_x_graph.remove(index);
        self.pos_y_graph.remove(index);
        self.pos_x_graph_min.remove(index);
        self.pos_x_graph_max.remove(index);
        self.is_point_movable.remove(index);
        self.serie_indices.clear();

        Ok(())
    }

    /// Converts relative positions into graph values.
    pub fn update_graph_values(&mut self, right_pos: f64, first_diff: f64) {
        for index in 0..self.len() {
            self.pos_x_graph[index] = self.pos_x_relative[index] * right_pos;
            self.pos_y_graph[index] = self.pos_y_relative[index] * first_diff;
            self.pos_x_graph_min[index] = 0.;
            self.pos_x_graph_max[index] = right_pos;
        }
    }

    /// Finds for every point the first serie index at or after its absolute x position.
    pub fn map_to_serie(&mut self, x_serie: &[f64], right_pos: f64) {
        let Some(last_index) = x_serie.len().checked_sub(1) else {
            self.serie_indices.clear();
            return;
        };

        self.serie_indices = self
            .pos_x_relative
            .iter()
            .map(|relative_x| {
                let absolute_x = right_pos * relative_x;
                x_serie
                    .iter()
                    .position(|x| *x >= absolute_x)
                    .unwrap_or(last_index)
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_curve_has_fixed_borders() {
        let spline = SplineData::with_three_points(0.4);

        assert_eq!(spline.len(), 3);
        assert_eq!(spline.is_point_movable, vec![false, true, false]);
        assert_eq!(spline.pos_y_relative[2], 0.4);
    }

    #[test]
    fn insert_keeps_points_ordered() {
        let mut spline = SplineData::with_three_points(0.);

        assert_eq!(spline.insert_point(0.25, 1.).unwrap(), 1);
        assert_eq!(spline.insert_point(0.75, -1.).unwrap(), 3);
        assert_eq!(spline.len(), 5);
        assert!(spline.pos_x_relative.windows(2).all(|w| w[0] < w[1]));
        assert!(spline.insert_point(1.5, 0.).is_err());
    }

    #[test]
    fn remove_never_drops_below_three_points() {
        let mut spline = SplineData::with_three_points(0.);
        assert!(spline.remove_point(1).is_err());

        spline.insert_point(0.3, 0.).unwrap();
        spline.remove_point(1).unwrap();
        assert_eq!(spline.len(), 3);
        assert_eq!(spline.pos_x_graph_max.len(), 3);
        assert!(spline.remove_point(1).is_err());
    }

    #[test]
    fn points_are_mapped_to_serie_indices() {
        let mut spline = SplineData::with_three_points(0.);
        let x_serie = [0., 100., 200., 300., 400.];

        spline.map_to_serie(&x_serie, 400.);

        assert_eq!(spline.serie_indices, vec![0, 2, 4]);
    }

    #[test]
    fn graph_values_are_scaled() {
        let mut spline = SplineData::with_three_points(2.);
        spline.update_graph_values(1000., 10.);

        assert_eq!(spline.pos_x_graph[1], 500.);
        assert_eq!(spline.pos_y_graph[2], 20.);
        assert_eq!(spline.pos_x_graph_max[0], 1000.);
    }
}
