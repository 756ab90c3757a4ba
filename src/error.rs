use thiserror::Error;

/// Errors that abort a whole generation run. When one of these is returned, no
/// sheet is produced.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("invalid layout: {0}")]
    /// The layout configuration cannot produce a printable sheet
    InvalidLayout(String),

    #[error(transparent)]
    /// Writing the finished PDF failed
    Io(#[from] std::io::Error),

    #[error("a page in the page order is missing from the document")]
    PageMissing,

    #[error("{0} is referenced by a page but was never written")]
    MissingObject(String),
}

/// Problems confined to a single source file or a single page of one. The run
/// carries on without that file (or page) and lists it in the
/// [RunReport](crate::RunReport).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("unsupported file format: {0:?}")]
    /// The filename extension isn't one of `pdf`, `jpg`, `jpeg` or `png`
    UnsupportedFormat(String),

    #[error("could not decode file: {0}")]
    /// The bytes don't parse as the declared kind of document
    Decode(String),

    #[error("could not render page: {0}")]
    /// Rasterizing or drawing a page failed
    Render(String),
}

impl From<image::ImageError> for SourceError {
    fn from(err: image::ImageError) -> Self {
        SourceError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SourceError::UnsupportedFormat("gif".into());
        assert_eq!(err.to_string(), "unsupported file format: \"gif\"");

        let err = SheetError::InvalidLayout("grid needs at least one column".into());
        assert_eq!(err.to_string(), "invalid layout: grid needs at least one column");
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WriteZero, "disk full");
        let err: SheetError = io_err.into();
        assert!(matches!(err, SheetError::Io(_)));
    }
}
