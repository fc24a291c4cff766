/// Combinators over a single [`Result`].
///
/// `map` is the standard [`Result::map`]; the extensions here cover what it
/// does not: folding both branches and chaining a step whose error type
/// differs from ours.
pub trait ResultExt<T, E>: Sized {
    /// Fold both branches into one value. Exactly one closure runs.
    fn fold<U>(self, on_ok: impl FnOnce(T) -> U, on_err: impl FnOnce(E) -> U) -> U;

    /// Monadic bind that widens the error type.
    ///
    /// On `Ok` runs `step`; on `Err` short-circuits without calling it. Both
    /// error types are converted into `G`, the union of the two.
    fn and_then_into<U, F, G>(self, step: impl FnOnce(T) -> Result<U, F>) -> Result<U, G>
    where
        E: Into<G>,
        F: Into<G>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn fold<U>(self, on_ok: impl FnOnce(T) -> U, on_err: impl FnOnce(E) -> U) -> U {
        match self {
            Ok(val) => on_ok(val),
            Err(err) => on_err(err),
        }
    }

    fn and_then_into<U, F, G>(self, step: impl FnOnce(T) -> Result<U, F>) -> Result<U, G>
    where
        E: Into<G>,
        F: Into<G>,
    {
        match self {
            Ok(val) => step(val).map_err(Into::into),
            Err(err) => Err(err.into()),
        }
    }
}

/// Collapse a result nested inside another result.
pub trait FlattenExt<T, E1, E2> {
    /// Outer error first; otherwise the inner result, unchanged apart from
    /// converting its error into `G`.
    fn flatten_into<G>(self) -> Result<T, G>
    where
        E1: Into<G>,
        E2: Into<G>;
}

impl<T, E1, E2> FlattenExt<T, E1, E2> for Result<Result<T, E1>, E2> {
    fn flatten_into<G>(self) -> Result<T, G>
    where
        E1: Into<G>,
        E2: Into<G>,
    {
        match self {
            Err(outer) => Err(outer.into()),
            Ok(inner) => inner.map_err(Into::into),
        }
    }
}

/// [`FlattenExt::flatten_into`] when both layers share an error type.
pub fn flatten<T, E>(nested: Result<Result<T, E>, E>) -> Result<T, E> {
    nested.flatten_into()
}
