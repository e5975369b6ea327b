use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::generators::validation::{validate_required, ValidationErrors};
use crate::generators::Validator;

/// A submitted passport declaration form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PassportDeclaration {
    #[schema(example = "2024-03-05")]
    pub date: String,
    #[schema(example = "Site Engineer")]
    pub designation: String,
    #[schema(example = "2024-01-01")]
    pub joining_date: String,
    #[schema(example = "Indian")]
    pub nationality: String,
    #[schema(example = "Z1234567")]
    pub passport_number: String,
    #[schema(example = "Mumbai")]
    pub issue_location: String,
    #[schema(example = "2020-06-10")]
    pub issue_date: String,
    #[schema(example = "2030-06-09")]
    pub expiry_date: String,
    #[schema(example = "Jane Doe")]
    pub employee_name: String,
    #[schema(example = "E123")]
    pub employee_code: String,
    /// Canvas signature as a base64 data URI.
    #[schema(example = "data:image/png;base64,iVBORw0KGgo...")]
    pub signature: String,
}

impl Validator for PassportDeclaration {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        validate_required(&self.date, "date", "Date", &mut errors);
        validate_required(&self.designation, "designation", "Designation", &mut errors);
        validate_required(&self.joining_date, "joiningDate", "Joining Date", &mut errors);
        validate_required(&self.nationality, "nationality", "Nationality", &mut errors);
        validate_required(
            &self.passport_number,
            "passportNumber",
            "Passport Number",
            &mut errors,
        );
        validate_required(
            &self.issue_location,
            "issueLocation",
            "Issue Location",
            &mut errors,
        );
        validate_required(&self.issue_date, "issueDate", "Issue Date", &mut errors);
        validate_required(&self.expiry_date, "expiryDate", "Expiry Date", &mut errors);
        validate_required(
            &self.employee_name,
            "employeeName",
            "Employee Name",
            &mut errors,
        );
        validate_required(
            &self.employee_code,
            "employeeCode",
            "Employee Code",
            &mut errors,
        );
        validate_required(&self.signature, "signature", "Signature", &mut errors);

        errors.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponse {
    #[schema(example = "Passport declaration submitted successfully")]
    pub message: String,
    pub data: PassportDeclaration,
    #[schema(example = "passport_E123_20240305101500.pdf")]
    pub pdf_file: String,
    #[schema(example = "pdf_output/passport_E123_20240305101500.pdf")]
    pub pdf_path: String,
    #[schema(example = "/download/passport_E123_20240305101500.pdf")]
    pub download_url: String,
    #[schema(example = "/view/passport_E123_20240305101500.pdf")]
    pub view_url: String,
    #[schema(example = "layout")]
    pub strategy: String,
}
