//! Site-wide texts and contact details, stored as a single row

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::util::validate_phone;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    pub id: i64,
    pub about_uz: String,
    pub about_ru: Option<String>,
    pub about_en: Option<String>,
    pub privacy_policy_uz: String,
    pub privacy_policy_ru: Option<String>,
    pub privacy_policy_en: Option<String>,
    pub email: String,
    pub phone_number: String,
    /// e.g. `{"instagram": "https://instagram.com/...", "telegram": "https://t.me/..."}`
    pub social_media: BTreeMap<String, String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Russian texts may only use Cyrillic letters besides digits and punctuation
fn validate_russian_text(text: &str) -> Result<(), validator::ValidationError> {
    let cyrillic = |c: char| ('\u{0400}'..='\u{04FF}').contains(&c);
    if text.chars().all(|c| !c.is_alphabetic() || cyrillic(c)) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("russian_text");
        err.message =
            Some("Russian text can only contain Russian characters, numbers and punctuation".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadataCreate {
    #[validate(length(min = 1, message = "aboutUz is required"))]
    pub about_uz: String,
    #[validate(custom(function = "validate_russian_text"))]
    pub about_ru: Option<String>,
    pub about_en: Option<String>,
    #[validate(length(min = 1, message = "privacyPolicyUz is required"))]
    pub privacy_policy_uz: String,
    #[validate(custom(function = "validate_russian_text"))]
    pub privacy_policy_ru: Option<String>,
    pub privacy_policy_en: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    pub social_media: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadataUpdate {
    #[validate(length(min = 1))]
    pub about_uz: Option<String>,
    #[validate(custom(function = "validate_russian_text"))]
    pub about_ru: Option<String>,
    pub about_en: Option<String>,
    #[validate(length(min = 1))]
    pub privacy_policy_uz: Option<String>,
    #[validate(custom(function = "validate_russian_text"))]
    pub privacy_policy_ru: Option<String>,
    pub privacy_policy_en: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: Option<String>,
    /// Replaces the stored links wholesale
    pub social_media: Option<BTreeMap<String, String>>,
}
