//! Module parameters, replaceable by the authority.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_MAX_MEMO_LENGTH: u32 = 512;
pub const DEFAULT_MAX_USER_ID_LENGTH: u32 = 128;
pub const DEFAULT_MAX_REPORTS_PER_SUBMISSION: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Upper bound on `FastClient.memo`, in bytes.
    pub max_memo_length: u32,
    /// Upper bound on `FastUser.user_id`, in bytes.
    pub max_user_id_length: u32,
    /// Upper bound on the number of reports in one `SubmitReports` call.
    pub max_reports_per_submission: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_memo_length: DEFAULT_MAX_MEMO_LENGTH,
            max_user_id_length: DEFAULT_MAX_USER_ID_LENGTH,
            max_reports_per_submission: DEFAULT_MAX_REPORTS_PER_SUBMISSION,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_memo_length == 0 {
            return Err(ValidationError::InvalidParams(
                "max_memo_length must be positive".into(),
            ));
        }
        if self.max_user_id_length == 0 {
            return Err(ValidationError::InvalidParams(
                "max_user_id_length must be positive".into(),
            ));
        }
        if self.max_reports_per_submission == 0 {
            return Err(ValidationError::InvalidParams(
                "max_reports_per_submission must be positive".into(),
            ));
        }
        Ok(())
    }
}
