use serde::{Deserialize, Serialize};

use crate::ids::UserId;
use crate::profile::ProfileRecord;

pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Profile form as typed by the user.
///
/// The draft is never cleared by the activation flow; a failed save keeps it intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub full_name: String,
    pub department: String,
    pub academic_year: String,
    pub date_of_birth: String,
    pub country_code: String,
    pub phone_number: String,
}

impl Default for ProfileDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            department: String::new(),
            academic_year: String::new(),
            date_of_birth: String::new(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            phone_number: String::new(),
        }
    }
}

impl ProfileDraft {
    /// Draft pre-filled with the provider's display name.
    pub fn prefilled(display_name: Option<&str>) -> Self {
        Self {
            full_name: display_name.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }

    /// Department and phone number are the only required fields.
    pub fn is_complete(&self) -> bool {
        !self.department.trim().is_empty() && !self.phone_number.trim().is_empty()
    }

    pub fn mobile_number(&self) -> String {
        format!("{}{}", self.country_code.trim(), self.phone_number.trim())
    }

    pub fn to_record(&self, user_id: UserId) -> ProfileRecord {
        ProfileRecord {
            id: user_id,
            full_name: self.full_name.trim().to_string(),
            department: self.department.trim().to_string(),
            academic_year: self.academic_year.trim().to_string(),
            date_of_birth: self.date_of_birth.trim().to_string(),
            mobile_number: self.mobile_number(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ProfileDraft {
        ProfileDraft {
            full_name: "Asha Rao".into(),
            department: "CSE".into(),
            academic_year: "2023-2027".into(),
            date_of_birth: "2005-04-12".into(),
            country_code: "+91".into(),
            phone_number: "9999999999".into(),
        }
    }

    #[test]
    fn default_draft_uses_indian_country_code() {
        assert_eq!(ProfileDraft::default().country_code, "+91");
    }

    #[test]
    fn draft_requires_department_and_phone() {
        assert!(filled().is_complete());

        let mut no_department = filled();
        no_department.department = "  ".into();
        assert!(!no_department.is_complete());

        let mut no_phone = filled();
        no_phone.phone_number.clear();
        assert!(!no_phone.is_complete());
    }

    #[test]
    fn optional_fields_do_not_gate_completion() {
        let draft = ProfileDraft {
            department: "ECE".into(),
            phone_number: "12345".into(),
            ..ProfileDraft::default()
        };
        assert!(draft.is_complete());
    }

    #[test]
    fn record_joins_country_code_and_phone() {
        let record = filled().to_record(UserId::from("u-1"));
        assert_eq!(record.mobile_number, "+919999999999");
        assert_eq!(record.id, UserId::from("u-1"));
        assert_eq!(record.department, "CSE");
    }

    #[test]
    fn prefilled_draft_carries_display_name() {
        let draft = ProfileDraft::prefilled(Some("Asha Rao"));
        assert_eq!(draft.full_name, "Asha Rao");
        assert!(!draft.is_complete());
    }
}
