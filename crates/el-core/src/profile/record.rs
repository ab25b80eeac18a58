use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Persisted onboarding record, one per user.
///
/// Field names match the hosted `profiles` table columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: UserId,
    pub full_name: String,
    pub department: String,
    pub academic_year: String,
    pub date_of_birth: String,
    pub mobile_number: String,
}
