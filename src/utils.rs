use crate::error::{BuildError, Result};

/// Allocates a zero-initialized vector of the given length.
///
/// The large per-string buffers (key/position pairs, rank stores) go through
/// this helper so an allocation failure surfaces as a [`BuildError`] to the
/// caller instead of aborting the process.
pub(crate) fn try_vec<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(BuildError::Allocation)?;
    v.resize(len, T::default());
    Ok(v)
}

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_try_vec() {
        let v: Vec<u32> = try_vec(100).unwrap();
        assert_eq!(v.len(), 100);
        assert!(v.iter().all(|&x| x == 0));

        let empty: Vec<u64> = try_vec(0).unwrap();
        assert!(empty.is_empty());
    }
}
