pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] affinity_core::Error),
    #[error(transparent)]
    Layout(#[from] otter::Error),
}
