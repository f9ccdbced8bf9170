use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Shipping and contact details entered on the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub apartment: String,
    #[serde(default)]
    pub city: String,
    pub province: String,
    pub zip_code: String,
    pub phone: String,
    /// Remember these details for the next checkout.
    #[serde(default)]
    pub save_info: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Email,
    FirstName,
    LastName,
    Address,
    Province,
    ZipCode,
    Phone,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::Email => "email",
            FormField::FirstName => "first name",
            FormField::LastName => "last name",
            FormField::Address => "address",
            FormField::Province => "province",
            FormField::ZipCode => "zip code",
            FormField::Phone => "phone",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("The {0} field is required")]
    Missing(FormField),

    #[error("Email address is not valid")]
    InvalidEmail,
}

impl CheckoutForm {
    /// Check required fields, then the email format. The email format is
    /// only checked once every required field is present.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let required = [
            (FormField::Email, &self.email),
            (FormField::FirstName, &self.first_name),
            (FormField::LastName, &self.last_name),
            (FormField::Address, &self.address),
            (FormField::Province, &self.province),
            (FormField::ZipCode, &self.zip_code),
            (FormField::Phone, &self.phone),
        ];
        let missing: Vec<FieldError> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| FieldError::Missing(*field))
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(vec![FieldError::InvalidEmail]);
        }
        Ok(())
    }
}
