use thiserror::Error;

/// Errors raised while reading pipeline tables or writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write chart {path}: {source}")]
    Chart {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// The run index lacks a table the report needs.
    #[error("run index {path} has no {role:?} entry")]
    MissingIndexRole { path: String, role: String },
}

impl ReportError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.display().to_string(),
            source,
        }
    }
}
