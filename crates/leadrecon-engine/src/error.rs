use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to decode {file}: {source}")]
    Decode {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read workbook {file}: {source}")]
    Workbook {
        file: String,
        #[source]
        source: calamine::Error,
    },

    #[error("{file} is not valid UTF-8 text")]
    Encoding { file: String },

    #[error("{0}")]
    InputShape(String),

    #[error("failed to read rules file {path}: {source}")]
    RulesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules file: {0}")]
    RulesFileParse(#[from] serde_yaml::Error),

    #[error("rules validation error: {0}")]
    RulesValidation(String),
}

impl EngineError {
    /// `true` for problems with the shape of the upload itself (file counts,
    /// missing parts), as opposed to failures while processing file contents.
    #[must_use]
    pub fn is_input_shape(&self) -> bool {
        matches!(self, EngineError::InputShape(_))
    }
}
