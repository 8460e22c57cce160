
//! Interpretation of the integer budget argument.

use crate::config::CodecConfig;
use crate::error::{Error, Result};


/// What to decode, as selected by a single integer argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {

    /// Decode both transforms once with the same whole-image budget
    /// and show the results next to each other.
    Single {

        /// Number of coefficients to retain in the whole image.
        budget: usize,
    },

    /// Run the dct progression, then the wavelet progression, independently.
    Progressive,

    /// Run the balanced progression that shows both transforms side by side.
    Balanced,
}

impl Request {

    /// The argument value that selects `Request::Progressive`.
    pub const PROGRESSIVE_ARGUMENT: i64 = -1;

    /// The argument value that selects `Request::Balanced`.
    pub const BALANCED_ARGUMENT: i64 = -2;

    /// Validate the argument before any transform work is done.
    /// Apart from the two sentinels, the argument must retain between one coefficient
    /// per block and all coefficients (4096 to 262144 for the default configuration).
    pub fn from_argument(argument: i64, config: &CodecConfig) -> Result<Self> {
        match argument {
            Self::PROGRESSIVE_ARGUMENT => Ok(Request::Progressive),
            Self::BALANCED_ARGUMENT => Ok(Request::Balanced),

            budget => {
                let accepted = config.min_budget() ..= config.max_budget();

                match usize::try_from(budget) {
                    Ok(budget) if accepted.contains(&budget) => Ok(Request::Single { budget }),

                    _ => Err(Error::invalid(format!(
                        "coefficient budget {} must be {}, {}, or between {} and {}",
                        budget, Self::PROGRESSIVE_ARGUMENT, Self::BALANCED_ARGUMENT,
                        accepted.start(), accepted.end()
                    ))),
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_select_progressions() {
        let config = CodecConfig::default();
        assert_eq!(Request::from_argument(-1, &config).unwrap(), Request::Progressive);
        assert_eq!(Request::from_argument(-2, &config).unwrap(), Request::Balanced);
    }

    #[test]
    fn single_budget_range_is_inclusive() {
        let config = CodecConfig::default();
        assert_eq!(Request::from_argument(4096, &config).unwrap(), Request::Single { budget: 4096 });
        assert_eq!(Request::from_argument(100_000, &config).unwrap(), Request::Single { budget: 100_000 });
        assert_eq!(Request::from_argument(262_144, &config).unwrap(), Request::Single { budget: 262_144 });
    }

    #[test]
    fn everything_else_is_rejected() {
        let config = CodecConfig::default();

        for argument in [-3, 0, 1, 4095, 262_145, i64::MAX, i64::MIN] {
            let result = Request::from_argument(argument, &config);
            assert!(matches!(result, Err(Error::Invalid(_))), "{} was accepted", argument);
        }
    }

    #[test]
    fn range_follows_the_configuration() {
        let config = CodecConfig::new(64, 8).unwrap();
        assert!(Request::from_argument(64, &config).is_ok());
        assert!(Request::from_argument(4096, &config).is_ok());
        assert!(Request::from_argument(4097, &config).is_err());
        assert!(Request::from_argument(63, &config).is_err());
    }
}
