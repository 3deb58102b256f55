use rand::{rngs::StdRng, Rng, SeedableRng};
use tsample_tensor::{CpuAllocator, Tensor, Tensor1, TensorAllocator};

use crate::error::TensorOpsError;

/// Allowed deviation of the probability sum from one.
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-3;

/// Number of pool slots one unit of probability is quantized to.
const PROBABILITY_RESOLUTION: f64 = 1000.0;

/// Parameters for [`random_choice`] and [`random_choice_range`].
#[derive(Debug, Clone, PartialEq)]
pub struct RandomChoiceParams {
    /// Number of samples to draw.
    pub size: usize,
    /// Whether an element may be drawn more than once.
    pub replace: bool,
    /// Optional per-element probabilities. Must sum to one and requires `replace`.
    pub p: Option<Vec<f64>>,
    /// Optional seed for reproducible draws.
    pub random_seed: Option<u64>,
}

impl Default for RandomChoiceParams {
    fn default() -> Self {
        Self {
            size: 1,
            replace: true,
            p: None,
            random_seed: None,
        }
    }
}

/// Draw random elements from a 1-D tensor.
///
/// * Without `p` and with replacement, every draw picks a uniform index.
/// * Without `p` and without replacement, the result is the first `size`
///   entries of a random permutation of the indices.
/// * With `p`, index `i` occupies `round(p[i] * 1000)` slots of a pool and
///   every draw picks a uniform slot, so probabilities are honored to a
///   resolution of 1e-3.
///
/// # Errors
///
/// * `p` does not sum to one within 1e-3.
/// * `p` is given together with `replace = false`.
/// * `p` has a different length than `source`.
/// * `size` exceeds the population when sampling without replacement.
/// * `source` is empty and `size > 0`.
///
/// # Example
///
/// ```
/// use tsample_tensor::{CpuAllocator, Tensor1};
/// use tsample_tensor_ops::{random_choice, RandomChoiceParams};
///
/// let source = Tensor1::<u8, _>::from_shape_vec([4], vec![10, 20, 30, 40], CpuAllocator).unwrap();
/// let params = RandomChoiceParams {
///     size: 3,
///     replace: false,
///     random_seed: Some(7),
///     ..Default::default()
/// };
/// let picked = random_choice(&source, &params).unwrap();
/// assert_eq!(picked.shape, [3]);
/// ```
pub fn random_choice<T, A>(
    source: &Tensor1<T, A>,
    params: &RandomChoiceParams,
) -> Result<Tensor1<T, A>, TensorOpsError>
where
    T: Clone,
    A: TensorAllocator,
{
    let data = source.as_slice();
    let values = sample_indices(data.len(), params)?
        .into_iter()
        .map(|i| data[i].clone())
        .collect::<Vec<_>>();

    Ok(Tensor::from_shape_vec(
        [values.len()],
        values,
        source.storage.alloc().clone(),
    )?)
}

/// Draw random indices from `0..n`, with the same rules as [`random_choice`].
pub fn random_choice_range(
    n: usize,
    params: &RandomChoiceParams,
) -> Result<Tensor1<i64, CpuAllocator>, TensorOpsError> {
    let values = sample_indices(n, params)?
        .into_iter()
        .map(|i| i as i64)
        .collect::<Vec<_>>();

    Ok(Tensor::from_shape_vec([values.len()], values, CpuAllocator)?)
}

fn sample_indices(n: usize, params: &RandomChoiceParams) -> Result<Vec<usize>, TensorOpsError> {
    let size = params.size;

    log::debug!(
        "random_choice: {} samples from {} (replace: {}, weighted: {})",
        size,
        n,
        params.replace,
        params.p.is_some()
    );

    let mut rng = match params.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let Some(p) = &params.p else {
        if size == 0 {
            return Ok(Vec::new());
        }
        if n == 0 {
            return Err(TensorOpsError::EmptyPopulation);
        }
        if params.replace {
            return Ok((0..size).map(|_| rng.random_range(0..n)).collect());
        }
        if size > n {
            return Err(TensorOpsError::SampleSizeTooLarge {
                size,
                population: n,
            });
        }
        return Ok(rand::seq::index::sample(&mut rng, n, size).into_vec());
    };

    let total: f64 = p.iter().sum();
    if (1.0 - total).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(TensorOpsError::InvalidProbabilities(total));
    }
    if !params.replace {
        return Err(TensorOpsError::ReplaceRequired);
    }
    if p.len() != n {
        return Err(TensorOpsError::ShapeMismatch(vec![n], vec![p.len()]));
    }

    let pool = p
        .iter()
        .enumerate()
        .flat_map(|(i, &pi)| {
            let slots = (pi * PROBABILITY_RESOLUTION).round().max(0.0) as usize;
            std::iter::repeat_n(i, slots)
        })
        .collect::<Vec<_>>();

    if size == 0 {
        return Ok(Vec::new());
    }
    if pool.is_empty() {
        return Err(TensorOpsError::EmptyPopulation);
    }

    Ok((0..size)
        .map(|_| pool[rng.random_range(0..pool.len())])
        .collect())
}
