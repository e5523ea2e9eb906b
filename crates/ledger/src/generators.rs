pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

#[derive(Debug, Clone)]
pub struct SeededRandomSource {
    state: u64,
}

impl SeededRandomSource {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RandomSource for SeededRandomSource {
    fn next_unit(&mut self) -> f64 {
        next_unit(&mut self.state)
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedRandomSource {
    units: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandomSource {
    pub fn new(units: Vec<f64>) -> Self {
        assert!(!units.is_empty(), "unit script must not be empty");
        assert!(
            units.iter().all(|unit| (0.0..1.0).contains(unit)),
            "scripted units must lie in [0, 1)"
        );

        Self { units, cursor: 0 }
    }
}

impl RandomSource for ScriptedRandomSource {
    fn next_unit(&mut self) -> f64 {
        let unit = self.units[self.cursor];
        self.cursor = (self.cursor + 1) % self.units.len();
        unit
    }
}

pub fn uniform(source: &mut dyn RandomSource, low: f64, high: f64) -> f64 {
    debug_assert!(low.is_finite() && high.is_finite() && low <= high);
    low + source.next_unit() * (high - low)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn next_u64(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

fn next_unit(state: &mut u64) -> f64 {
    let value = next_u64(state);
    (value as f64) / (u64::MAX as f64)
}
