use thiserror::Error;

pub type Result<T> = std::result::Result<T, SurvivalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurvivalError {
    #[error("bad parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    #[error("survival data is broken: {message}")]
    InvalidSurvivalData { message: String },
}

impl SurvivalError {
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    pub fn invalid_survival_data(message: impl Into<String>) -> Self {
        Self::InvalidSurvivalData { message: message.into() }
    }
}

/// reject anything that isn't a finite, strictly positive number
pub(crate) fn ensure_positive(parameter: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SurvivalError::invalid_parameter(parameter, value))
    }
}

/// censoring rates live in [0, 1) - a rate of 1 divides by zero
pub(crate) fn ensure_censoring_rate(parameter: &str, value: f64) -> Result<()> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(SurvivalError::invalid_parameter(parameter, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_checks() {
        assert!(ensure_positive("lambda", 0.1).is_ok());
        assert!(ensure_positive("lambda", 0.0).is_err());
        assert!(ensure_positive("lambda", f64::NAN).is_err());
        assert!(ensure_positive("lambda", f64::INFINITY).is_err());

        assert!(ensure_censoring_rate("censoring_rate", 0.0).is_ok());
        assert!(ensure_censoring_rate("censoring_rate", 0.99).is_ok());
        assert!(ensure_censoring_rate("censoring_rate", 1.0).is_err());
        assert!(ensure_censoring_rate("censoring_rate", -0.1).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = SurvivalError::invalid_parameter("censoring_rate", 1.0);
        assert_eq!(err.to_string(), "bad parameter: censoring_rate = 1");

        let err = SurvivalError::invalid_survival_data("time is NaN");
        assert_eq!(err.to_string(), "survival data is broken: time is NaN");
    }
}
