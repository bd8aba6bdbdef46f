use thiserror::Error;

pub type SheetResult<T> = Result<T, SheetError>;

/// Hard failures only. Malformed cells, short grids and missing start
/// markers are soft conditions handled inside the parser and never
/// surface here.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("upstream returned HTTP {status}")]
    Upstream { status: u16 },

    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("workbook decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SheetError {
    /// True for failures that map to a bad-gateway class status at the
    /// route boundary; everything else is a plain server error.
    pub fn is_upstream(&self) -> bool {
        matches!(self, SheetError::Upstream { .. } | SheetError::Http(_))
    }
}
