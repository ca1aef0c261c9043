pub struct Averages {}

impl Averages {
    /// Average of `values` between two serie indices, each value weighted with half of
    /// the time to its neighbours. Zero values and break slices are ignored.
    pub fn time_weighted(
        values: &[f32],
        time: &[i32],
        breaks: &[bool],
        first_index: usize,
        last_index: usize,
    ) -> f32 {
        if values.is_empty() || time.is_empty() || first_index > last_index {
            return 0.;
        }

        let last_index = last_index.min(values.len() - 1).min(time.len() - 1);

        if first_index >= last_index {
            return values[last_index];
        }

        if last_index - first_index == 1 {
            return (values[first_index] + values[last_index]) / 2.;
        }

        let is_break = |index: usize| breaks.get(index).copied().unwrap_or(false);

        let mut value_sum = 0.;
        let mut time_sum = 0.;

        for index in first_index..=last_index {
            let value = values[index];

            if value <= 0. || (index > first_index && is_break(index)) {
                continue;
            }

            let mut weight = 0.;

            if index > first_index {
                weight += (time[index] - time[index - 1]) as f64 / 2.;
            }

            if index < last_index && !is_break(index + 1) {
                weight += (time[index + 1] - time[index]) as f64 / 2.;
            }

            value_sum += value as f64 * weight;
            time_sum += weight;
        }

        if time_sum == 0. {
            0.
        } else {
            (value_sum / time_sum) as f32
        }
    }

    /// Arithmetic mean of the values after `first_index` up to `last_index`.
    pub fn power(values: &[f32], first_index: usize, last_index: usize) -> f32 {
        if values.is_empty() || last_index <= first_index {
            return 0.;
        }

        let last_index = last_index.min(values.len() - 1);
        let range = &values[(first_index + 1).min(last_index)..=last_index];

        range.iter().sum::<f32>() / (last_index - first_index) as f32
    }
}
