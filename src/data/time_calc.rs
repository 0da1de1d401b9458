use std::time::Duration;

/// Running totals of per-stage durations, one slot per stage index.
#[derive(Debug, Default, Clone)]
pub struct TimeCalc {
    runs: usize,
    duration: Vec<Duration>,
}

impl TimeCalc {
    pub fn total(&self) -> Duration {
        self.duration.iter().sum::<Duration>()
    }

    /// Number of completed runs, counted on stage 0.
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn avg(&self) -> Duration {
        match self.runs {
            0 => Duration::ZERO,
            n => self.total() / n as u32,
        }
    }

    pub fn add_or_push(&mut self, i: usize, x: Duration) {
        if i >= self.duration.len() {
            self.duration.resize(i + 1, Duration::ZERO);
        }
        self.duration[i] += x;
        if i == 0 {
            self.runs += 1;
        }
    }

    pub fn clear(&mut self) {
        self.runs = Default::default();
        self.duration = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_run_sums_stages() {
        let mut t = TimeCalc::default();
        t.add_or_push(0, Duration::from_millis(10));
        t.add_or_push(1, Duration::from_millis(2));
        t.add_or_push(0, Duration::from_millis(30));
        t.add_or_push(1, Duration::from_millis(4));

        assert_eq!(t.runs(), 2);
        assert_eq!(t.total(), Duration::from_millis(46));
        assert_eq!(t.avg(), Duration::from_millis(23));
    }

    #[test]
    fn test_empty_is_zero() {
        let mut t = TimeCalc::default();
        assert_eq!(t.avg(), Duration::ZERO);

        t.add_or_push(0, Duration::from_millis(5));
        t.clear();
        assert_eq!(t.runs(), 0);
        assert_eq!(t.avg(), Duration::ZERO);
    }
}
