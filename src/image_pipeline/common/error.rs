use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaiError {
    #[error("Failed to read input image: {0}")]
    ImageRead(String),

    #[error("Failed to write output file: {0}")]
    OutputWrite(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode diagnostic image: {0}")]
    Encode(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Input table error: {0}")]
    Table(String),

    #[error("Invalid configuration: {parameter} = {value}")]
    InvalidConfig { parameter: String, value: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Degenerate histogram: {0}")]
    DegenerateHistogram(String),

    #[error("Crown porosity {porosity} is not positive, PAI is undefined")]
    InvalidPorosity { porosity: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PaiError {
    pub fn invalid_config(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidConfig {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Short label used in log lines and in the `status` column.
    pub fn category(&self) -> &'static str {
        match self {
            PaiError::ImageRead(_) | PaiError::Io(_) => "io_failure",
            PaiError::Decode(_) | PaiError::InvalidDimensions(..) => "io_failure",
            PaiError::OutputWrite(_) | PaiError::Encode(_) => "output_failure",
            PaiError::Table(_) => "table_failure",
            PaiError::InvalidConfig { .. } => "invalid_config",
            PaiError::InvalidTimestamp(_) => "invalid_timestamp",
            PaiError::DegenerateHistogram(_) => "degenerate_histogram",
            PaiError::InvalidPorosity { .. } => "invalid_porosity",
        }
    }
}

pub type Result<T> = std::result::Result<T, PaiError>;
