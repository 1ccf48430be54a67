//! Error types for the campaign runner binary.

/// Top-level error for the campaign runner.
#[derive(Debug, thiserror::Error)]
pub enum CampaignRunnerError {
    /// Options could not be loaded.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: campaign_core::ConfigError,
    },

    /// A multi-day run failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: campaign_core::RunnerError,
    },

    /// The day count argument is not a number.
    #[error("invalid day count {value:?}; expected a whole number of days")]
    InvalidDays {
        /// The argument as given.
        value: String,
    },

    /// A veto persisted after every pending scenario was resolved.
    #[error("advance blocked on {date}: {reason}")]
    Stuck {
        /// Date the campaign is stuck on.
        date: chrono::NaiveDate,
        /// The listener's reason.
        reason: String,
    },
}
