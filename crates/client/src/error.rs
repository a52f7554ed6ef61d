/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The session could not be established.
    Connection,
    /// The backend is rate limited.
    RateLimitExceeded,
    /// Any other errors.
    Other,
}
