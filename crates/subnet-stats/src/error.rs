use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// The chain snapshot source failed or returned unusable data
    #[error("Failed to collect subnet data: {0:#}")]
    Source(anyhow::Error),

    /// Writing the report failed
    #[error("Failed to render report: {0}")]
    Render(#[from] std::io::Error),
}
