use geo::{algorithm::simplify::SimplifyIdx, Coord, LineString};

/// Douglas-Peucker line simplification on (x, y) points.
pub struct DouglasPeucker {
    tolerance: f64,
}

impl DouglasPeucker {
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance: tolerance as f64,
        }
    }

    /// Returns the sorted indices of the points which are kept. The first, the last and
    /// all forced indices are always kept.
    pub fn simplify(&self, x: &[f32], y: &[f32], forced_indices: &[usize]) -> Vec<usize> {
        let len = x.len().min(y.len());

        if len < 3 || self.tolerance <= 0. {
            return (0..len).collect();
        }

        let mut anchors: Vec<usize> = forced_indices
            .iter()
            .copied()
            .filter(|index| *index < len)
            .chain([0, len - 1])
            .collect();
        anchors.sort_unstable();
        anchors.dedup();

        // each part between two anchors is simplified on its own
        let mut kept = vec![0];
        for part in anchors.windows(2) {
            let (first, last) = (part[0], part[1]);

            let line: LineString<f64> = (first..=last)
                .map(|index| Coord {
                    x: x[index] as f64,
                    y: y[index] as f64,
                })
                .collect();

            kept.extend(
                line.simplify_idx(&self.tolerance)
                    .into_iter()
                    .skip(1)
                    .map(|index| first + index),
            );
        }

        kept
    }
}
