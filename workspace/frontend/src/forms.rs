//! Form drafts for sign-in, add-vendor and add-contract, with validation
//! and conversion into insert payloads.

use chrono::NaiveDate;
use model::{ComplianceStatus, ContractStatus, NewContract, NewVendor, RowId, VendorCategory};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Date format accepted by the contract form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// One or more fields failed validation; messages are in field order.
    #[error("{}", .0.join("; "))]
    Invalid(Vec<String>),

    /// The chosen vendor is not among the loaded vendors.
    #[error("Unknown vendor: {0}")]
    UnknownVendor(RowId),
}

impl From<ValidationErrors> for FormError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter()
                    .map(move |err| (field.clone(), describe(&field, err)))
            })
            .collect();
        fields.sort();
        FormError::Invalid(fields.into_iter().map(|(_, message)| message).collect())
    }
}

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let label = field_label(field);
    match &*error.code {
        "email" => "Enter a valid email address".to_string(),
        "required" | "length" => format!("{} is required", label),
        "negative" => format!("{} cannot be negative", label),
        "date" => format!("{} must be a date (YYYY-MM-DD)", label),
        other => format!("{} is invalid ({})", label, other),
    }
}

/// `total_spend` -> `Total spend`
fn field_label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Blank input is an error; anything else is coerced like `parseFloat`, so
/// only a negative leading number is rejected.
fn non_negative_amount(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if common::parse_amount(value) < Decimal::ZERO {
        return Err(ValidationError::new("negative"));
    }
    Ok(())
}

fn iso_date(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| ValidationError::new("date"))
}

/// Sign-in / sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn check(&self) -> Result<(), FormError> {
        self.validate().map_err(FormError::from)
    }
}

/// Add-vendor draft. Spend is kept as typed text until submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct VendorForm {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub category: VendorCategory,
    #[validate(custom(function = "non_negative_amount"))]
    pub total_spend: String,
    pub contact: String,
}

impl VendorForm {
    /// Validates the draft and builds the insert payload: owner stamped,
    /// spend coerced, compliance `compliant`.
    pub fn to_new_vendor(&self, user_id: Uuid) -> Result<NewVendor, FormError> {
        self.validate()?;
        let contact = self.contact.trim();
        Ok(NewVendor {
            user_id,
            name: self.name.trim().to_string(),
            category: self.category.clone(),
            total_spend: common::parse_amount(&self.total_spend),
            compliance_status: ComplianceStatus::Compliant,
            contact: (!contact.is_empty()).then(|| contact.to_string()),
        })
    }
}

/// Add-contract draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct ContractForm {
    #[validate(custom(function = "not_blank"))]
    pub contract_name: String,
    #[validate(required)]
    pub vendor_id: Option<RowId>,
    #[validate(custom(function = "iso_date"))]
    pub end_date: String,
    #[validate(custom(function = "non_negative_amount"))]
    pub value: String,
}

impl ContractForm {
    /// Validates the draft and builds the insert payload with
    /// `start_date = today` and `status = active`.
    pub fn to_new_contract(&self, user_id: Uuid, today: NaiveDate) -> Result<NewContract, FormError> {
        self.validate()?;
        let vendor_id = self
            .vendor_id
            .clone()
            .ok_or_else(|| FormError::Invalid(vec!["Vendor id is required".to_string()]))?;
        let end_date = NaiveDate::parse_from_str(self.end_date.trim(), DATE_FORMAT)
            .map_err(|_| FormError::Invalid(vec![describe("end_date", &ValidationError::new("date"))]))?;

        Ok(NewContract {
            vendor_id,
            contract_name: self.contract_name.trim().to_string(),
            end_date,
            value: common::parse_amount(&self.value),
            start_date: today,
            status: ContractStatus::Active,
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::new("buyer@example.com", "hunter22").check().is_ok());

        let err = Credentials::new("not-an-email", "").check().unwrap_err();
        assert_eq!(
            err,
            FormError::Invalid(vec![
                "Enter a valid email address".to_string(),
                "Password is required".to_string(),
            ])
        );
    }

    #[test]
    fn test_vendor_spend_is_coerced() {
        let user = Uuid::new_v4();
        let mut form = VendorForm {
            name: "  Acme Corp ".to_string(),
            category: VendorCategory::Hardware,
            total_spend: "1500.50".to_string(),
            contact: String::new(),
        };

        let payload = form.to_new_vendor(user).unwrap();
        assert_eq!(payload.name, "Acme Corp");
        assert_eq!(payload.total_spend, Decimal::new(15005, 1));
        assert_eq!(payload.compliance_status, ComplianceStatus::Compliant);
        assert_eq!(payload.contact, None);

        form.total_spend = "abc".to_string();
        assert_eq!(form.to_new_vendor(user).unwrap().total_spend, Decimal::ZERO);
    }

    #[test]
    fn test_vendor_required_fields_and_negative_spend() {
        let form = VendorForm {
            name: "   ".to_string(),
            total_spend: String::new(),
            ..Default::default()
        };
        let err = form.to_new_vendor(Uuid::nil()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Name is required; Total spend is required"
        );

        let form = VendorForm {
            name: "Acme".to_string(),
            total_spend: "-20".to_string(),
            ..Default::default()
        };
        assert_eq!(
            form.to_new_vendor(Uuid::nil()).unwrap_err().to_string(),
            "Total spend cannot be negative"
        );
    }

    #[test]
    fn test_contract_stamps_start_date_and_status() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let form = ContractForm {
            contract_name: "Annual Support".to_string(),
            vendor_id: Some(RowId::Int(4)),
            end_date: "2027-10-17".to_string(),
            value: "48000".to_string(),
        };

        let payload = form.to_new_contract(Uuid::nil(), today).unwrap();
        assert_eq!(payload.start_date, today);
        assert_eq!(payload.status, ContractStatus::Active);
        assert_eq!(payload.end_date, NaiveDate::from_ymd_opt(2027, 10, 17).unwrap());
        assert_eq!(payload.value, Decimal::from(48000));
    }

    #[test]
    fn test_contract_requires_vendor_and_date() {
        let form = ContractForm {
            contract_name: "Annual Support".to_string(),
            vendor_id: None,
            end_date: "17/10/2027".to_string(),
            value: "100".to_string(),
        };
        let err = form
            .to_new_contract(Uuid::nil(), NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "End date must be a date (YYYY-MM-DD); Vendor id is required"
        );
    }

    #[test]
    fn test_field_label() {
        assert_eq!(field_label("total_spend"), "Total spend");
        assert_eq!(field_label("email"), "Email");
    }
}
