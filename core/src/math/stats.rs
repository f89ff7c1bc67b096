use crate::interface::BoundingBox;

pub struct StatsHelper;

impl StatsHelper {
    /// Converts a `[0, 1]` score into a whole percentage, rounding half away from zero.
    pub fn round_percent(score: f64) -> u32 {
        (score * 100.0).round() as u32
    }

    /// Rounded arithmetic mean of a set of percentages. Zero for an empty set.
    pub fn mean_rounded<'a, I>(values: I) -> u32
    where
        I: IntoIterator<Item = &'a u32>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0u64, 0usize), |(sum, count), &v| (sum + u64::from(v), count + 1));
        if count == 0 {
            return 0;
        }
        (sum as f64 / count as f64).round() as u32
    }

    /// Element-wise mean of `x`, `y`, `width` and `height`.
    pub fn mean_bbox<'a, I>(boxes: I) -> BoundingBox
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        let mut acc = [0.0f64; 4];
        let mut count = 0usize;
        for bbox in boxes {
            for (slot, value) in acc.iter_mut().zip(bbox.to_array()) {
                *slot += value;
            }
            count += 1;
        }
        if count == 0 {
            return BoundingBox::default();
        }
        acc.map(|v| v / count as f64).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_percent_rounds_half_away_from_zero() {
        assert_eq!(StatsHelper::round_percent(0.95), 95);
        assert_eq!(StatsHelper::round_percent(0.125), 13);
        assert_eq!(StatsHelper::round_percent(0.0), 0);
        assert_eq!(StatsHelper::round_percent(1.0), 100);
    }

    #[test]
    fn mean_rounded_handles_empty_and_halves() {
        assert_eq!(StatsHelper::mean_rounded(&[0u32; 0]), 0);
        assert_eq!(StatsHelper::mean_rounded(&[60, 61]), 61);
        assert_eq!(StatsHelper::mean_rounded(&[60, 60, 61]), 60);
    }

    #[test]
    fn mean_bbox_averages_each_component() {
        let boxes = [
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(10.0, 10.0, 10.0, 10.0),
        ];
        assert_eq!(
            StatsHelper::mean_bbox(&boxes),
            BoundingBox::new(5.0, 5.0, 10.0, 10.0)
        );
    }
}
