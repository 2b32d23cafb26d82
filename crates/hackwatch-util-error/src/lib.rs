use std::{error, fmt, result};

pub type BoxedError = Box<dyn error::Error + Send + Sync + 'static>;
pub type BoxedErrorResult<T> = result::Result<T, BoxedError>;

/// Displays an error followed by its whole `source()` chain on one line,
/// separated with `: `.
///
/// Meant for structured log fields, e.g. `error = %err.fmt_compact()`.
pub struct FmtCompactError<'e, E: ?Sized>(pub &'e E);

impl<E> fmt::Display for FmtCompactError<'_, E>
where
    E: error::Error + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}", self.0))?;

        let mut source = self.0.source();
        while let Some(err) = source {
            f.write_str(": ")?;
            f.write_fmt(format_args!("{err}"))?;
            source = err.source();
        }

        Ok(())
    }
}

pub struct FmtCompactResult<'r, O, E>(pub &'r result::Result<O, E>);

impl<O, E> fmt::Display for FmtCompactResult<'_, O, E>
where
    E: error::Error,
    O: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Ok(o) => o.fmt(f),
            Err(e) => FmtCompactError(e).fmt(f),
        }
    }
}

pub trait FmtCompact {
    type Report: fmt::Display;
    fn fmt_compact(self) -> Self::Report;
}

impl<'e, E> FmtCompact for &'e E
where
    E: error::Error + ?Sized,
{
    type Report = FmtCompactError<'e, E>;

    fn fmt_compact(self) -> Self::Report {
        FmtCompactError(self)
    }
}

/// Erase a concrete error type into a [`BoxedError`]
pub trait BoxedErrorResultExt<T> {
    fn boxed(self) -> BoxedErrorResult<T>;
}

impl<T, E> BoxedErrorResultExt<T> for result::Result<T, E>
where
    E: error::Error + Send + Sync + 'static,
{
    fn boxed(self) -> BoxedErrorResult<T> {
        self.map_err(|e| Box::new(e) as BoxedError)
    }
}
