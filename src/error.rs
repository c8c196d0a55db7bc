use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] crate::terraform::LoadError),

    #[error(transparent)]
    Match(#[from] crate::matcher::MatchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchError;
    use crate::terraform::LoadError;
    use std::path::PathBuf;

    #[test]
    fn test_load_error_from_conversion() {
        let load_err = LoadError::NoConfiguration {
            path: PathBuf::from("infra"),
        };
        let err: Error = load_err.into();
        assert!(matches!(err, Error::Load(_)));
        assert_eq!(err.to_string(), "no terraform files found in infra");
    }

    #[test]
    fn test_match_error_from_conversion() {
        let match_err = MatchError::ResourceNotFound {
            path: "aws_instance.hextris-server".to_string(),
        };
        let err: Error = match_err.into();
        assert!(matches!(err, Error::Match(_)));
        assert!(err.to_string().contains("aws_instance.hextris-server"));
    }
}
