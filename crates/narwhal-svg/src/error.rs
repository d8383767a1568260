#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed SVG markup: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("missing <svg> root element")]
    MissingSvgRoot,
}

pub type Result<T> = std::result::Result<T, Error>;
