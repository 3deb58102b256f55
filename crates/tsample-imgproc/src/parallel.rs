use rayon::prelude::*;

use crate::error::ImgprocError;

/// Run `f` for every channel on the rayon global pool and concatenate the
/// per-channel outputs in channel order.
pub(crate) fn par_channels<T, F>(channels: usize, f: F) -> Result<Vec<T>, ImgprocError>
where
    T: Send,
    F: Fn(usize) -> Result<Vec<T>, ImgprocError> + Send + Sync,
{
    let per_channel = (0..channels)
        .into_par_iter()
        .map(f)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(per_channel.into_iter().flatten().collect())
}
