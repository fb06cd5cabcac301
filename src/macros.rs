/// Return early with an error if a condition does not hold.
///
/// The first argument is the condition. The second is the `Error` to return (it is only evaluated
/// if the condition fails).
///
/// # Example
///
/// ```rust,ignore
/// ensure!(reps > 0, Error::InvalidParameter("reps", "must be positive".to_owned()));
/// ```
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// Shorthand for `Error::InvalidParameter` with a formatted reason.
macro_rules! invalid {
    ($name:expr, $($rest:tt)*) => {
        $crate::error::Error::InvalidParameter($name, format!($($rest)*))
    };
}
