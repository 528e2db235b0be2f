use thiserror::Error;

#[derive(Error, Debug)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] lazyhcloud_config::ConfigError),
}

pub type TuiResult<T> = Result<T, TuiError>;
