//! Data-parallel folds over trials.
//!
//! The trial-heavy metrics draw their random keys sequentially from one seeded generator, then
//! hand a batch of keys to this module, which splits it over scoped worker threads. Each worker
//! folds its share into a private accumulator; the accumulators are returned in order for the
//! caller to merge. Since merging is a sum, the result does not depend on the number of workers.

use std::panic;

use crossbeam::thread;

use crate::error::Result;

/// Fold `items` into one accumulator per worker.
///
/// `init` creates an empty accumulator and `fold` adds one item to it. At most `workers`
/// accumulators are returned. With one worker (or one item) everything runs on the calling
/// thread.
///
/// A panic in a worker is resumed on the calling thread. The first error returned by `fold` is
/// returned and the partial accumulators are dropped.
pub fn fold<T, A, I, F>(items: &[T], workers: usize, init: I, fold: F) -> Result<Vec<A>>
where
    T: Sync,
    A: Send,
    I: Fn() -> A + Sync,
    F: Fn(&mut A, &T) -> Result<()> + Sync,
{
    if workers <= 1 || items.len() <= 1 {
        let mut acc = init();
        for item in items {
            fold(&mut acc, item)?;
        }
        return Ok(vec![acc]);
    }

    let chunk = (items.len() + workers - 1) / workers;
    let (init, fold) = (&init, &fold);
    let joined = thread::scope(|scope| {
        let handles: Vec<_> = items
            .chunks(chunk)
            .map(|chunk| {
                scope.spawn(move |_| -> Result<A> {
                    let mut acc = init();
                    for item in chunk {
                        fold(&mut acc, item)?;
                    }
                    Ok(acc)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<::std::thread::Result<Vec<_>>>()
    });

    match joined {
        Ok(Ok(accs)) => accs.into_iter().collect(),
        Ok(Err(payload)) | Err(payload) => panic::resume_unwind(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sum(items: &[u64], workers: usize) -> Result<u64> {
        let accs = fold(items, workers, || 0, |acc, x| {
            *acc += *x;
            Ok(())
        })?;
        assert!(accs.len() <= workers.max(1));
        Ok(accs.into_iter().sum())
    }

    #[test]
    fn independent_of_workers() {
        let items: Vec<u64> = (0..1000).collect();
        for workers in 0..9 {
            assert_eq!(sum(&items, workers), Ok(499500));
        }
        assert_eq!(sum(&[], 4), Ok(0));
    }

    #[test]
    fn error_propagates() {
        let items: Vec<u64> = (0..100).collect();
        let res = fold(&items, 4, || (), |_, x| {
            if *x == 77 {
                Err(Error::EmptyKeyset)
            } else {
                Ok(())
            }
        });
        assert_eq!(res.err(), Some(Error::EmptyKeyset));
    }

    #[test]
    #[should_panic]
    fn panic_propagates() {
        let items: Vec<u64> = (0..100).collect();
        let _ = fold(&items, 4, || (), |_, x| {
            assert!(*x != 50);
            Ok(())
        });
    }
}
