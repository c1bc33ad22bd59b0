use crate::error::{GeneticError, Result};
use crate::rng::RandomSource;

/// One candidate on a roulette wheel together with the size of its slice.
#[derive(Debug, Clone, Copy)]
pub struct WheelSlice<'a, T> {
    pub item: &'a T,
    pub weight: f64,
}

impl<'a, T> WheelSlice<'a, T> {
    pub fn new(item: &'a T, weight: f64) -> Self {
        Self { item, weight }
    }
}

/// A validated roulette wheel with precomputed cumulative weights.
///
/// Building the wheel once and spinning it many times is how the selection
/// operators draw several entities from the same weights. Each spin consumes
/// exactly one draw from the random source.
///
/// # Examples
///
/// ```
/// use genevo::rng::RandomNumberGenerator;
/// use genevo::selection::roulette::{RouletteWheel, WheelSlice};
///
/// let items = ["a", "b", "c"];
/// let wheel = RouletteWheel::new(vec![
///     WheelSlice::new(&items[0], 1.0),
///     WheelSlice::new(&items[1], 2.0),
///     WheelSlice::new(&items[2], 7.0),
/// ])
/// .unwrap();
///
/// let mut rng = RandomNumberGenerator::from_seed(42);
/// let drawn = wheel.spin(&mut rng);
/// assert!(items.contains(drawn));
/// ```
#[derive(Debug, Clone)]
pub struct RouletteWheel<'a, T> {
    items: Vec<&'a T>,
    cumulative: Vec<f64>,
    total: f64,
}

impl<'a, T> RouletteWheel<'a, T> {
    /// Builds a wheel from the given slices.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidArgument` if `slices` is empty or any
    /// weight is not a strictly positive finite number.
    pub fn new(slices: Vec<WheelSlice<'a, T>>) -> Result<Self> {
        if slices.is_empty() {
            return Err(GeneticError::InvalidArgument(
                "Roulette wheel sampling requires at least one slice".to_string(),
            ));
        }

        if let Some(bad) = slices
            .iter()
            .position(|slice| !(slice.weight.is_finite() && slice.weight > 0.0))
        {
            return Err(GeneticError::InvalidArgument(format!(
                "Roulette wheel slice {} has non-positive weight {}",
                bad, slices[bad].weight
            )));
        }

        let mut items = Vec::with_capacity(slices.len());
        let mut cumulative = Vec::with_capacity(slices.len());
        let mut total = 0.0;
        for slice in slices {
            total += slice.weight;
            items.push(slice.item);
            cumulative.push(total);
        }

        if !total.is_finite() {
            return Err(GeneticError::InvalidArgument(
                "Roulette wheel weights overflow when summed".to_string(),
            ));
        }

        Ok(Self {
            items,
            cumulative,
            total,
        })
    }

    /// Number of slices on the wheel.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Draws one item with probability `weight / total`.
    pub fn spin(&self, rng: &mut dyn RandomSource) -> &'a T {
        let target = rng.next_ratio() * self.total;
        let index = self
            .cumulative
            .iter()
            .position(|&bound| target < bound)
            // Floating point rounding can leave the target at the very end.
            .unwrap_or(self.items.len() - 1);
        self.items[index]
    }
}

/// Draws single items proportionally to their weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouletteWheelSampler;

impl RouletteWheelSampler {
    /// Draws one item from `slices`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidArgument` if `slices` is empty or any
    /// weight is not strictly positive. Callers are expected to shift weights
    /// into the positive range beforehand.
    pub fn sample<'a, T>(
        slices: Vec<WheelSlice<'a, T>>,
        rng: &mut dyn RandomSource,
    ) -> Result<&'a T> {
        Ok(RouletteWheel::new(slices)?.spin(rng))
    }
}
