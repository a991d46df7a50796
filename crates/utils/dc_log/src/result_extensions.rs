/// Logging instead of propagating, for inputs that may fail one at a time.
pub trait ResultExt<T> {
    /// On `Err`, logs the error with its chain of causes and returns `None`.
    ///
    /// The caller's source location goes to `debug` level only.
    fn ok_or_log_error(self) -> Option<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    #[track_caller]
    fn ok_or_log_error(self) -> Option<T> {
        let location = std::panic::Location::caller();
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                log::error!("{err:#}");
                log::debug!("Error above was skipped at {location}");
                None
            }
        }
    }
}
