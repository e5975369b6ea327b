//! Template-substitution renderer.
//!
//! Fills the fixed HTML declaration letter with the submitted values and
//! converts it with the configured [`HtmlToPdfEngine`].

use super::common::{current_year, escape_html, format_long_date, COMPANY_ADDRESS, COMPANY_NAME};
use super::engine::HtmlToPdfEngine;
use super::traits::Renderer;
use super::GeneratorError;
use crate::declaration::models::PassportDeclaration;
use crate::storage::NamingScheme;

const STYLES: &str = r#"
        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; padding: 20px; }
        .header { text-align: center; margin-bottom: 30px; border-bottom: 2px solid #1a5ca3; padding-bottom: 20px; }
        .company-name { font-size: 24px; font-weight: bold; color: #1a5ca3; }
        .document-title { font-size: 20px; margin-top: 10px; }
        .section { margin-bottom: 20px; }
        .section-title { font-size: 18px; color: #1a5ca3; border-bottom: 1px solid #ddd; padding-bottom: 5px; margin-bottom: 10px; }
        .info-row { display: flex; margin-bottom: 8px; }
        .info-label { width: 200px; font-weight: bold; }
        .info-value { flex: 1; }
        .signature-area { margin-top: 40px; text-align: center; }
        .signature-img { max-width: 300px; border: 1px solid #ddd; margin-bottom: 10px; }
        .footer { margin-top: 50px; text-align: center; font-size: 14px; color: #777; }
"#;

fn info_row(label: &str, value: &str) -> String {
    format!(
        r#"            <div class="info-row">
                <div class="info-label">{}</div>
                <div class="info-value">{}</div>
            </div>
"#,
        label,
        escape_html(value)
    )
}

/// Render the declaration letter as a standalone HTML document.
pub fn render_html(declaration: &PassportDeclaration, year: i32) -> String {
    let d = declaration;

    let passport_rows = [
        info_row("Nationality:", &d.nationality),
        info_row("Passport Number:", &d.passport_number),
        info_row("Issued Location:", &d.issue_location),
        info_row("Date of Issue:", &format_long_date(&d.issue_date)),
        info_row("Date of Expiry:", &format_long_date(&d.expiry_date)),
    ]
    .concat();
    let employee_rows = [
        info_row("Employee Name:", &d.employee_name),
        info_row("Employee Code:", &d.employee_code),
    ]
    .concat();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Passport Declaration - {employee_name}</title>
    <style>{styles}    </style>
</head>
<body>
    <div class="header">
        <div class="company-name">{company}</div>
        <div class="document-title">PASSPORT DECLARATION</div>
    </div>

    <div class="section">
{date_row}    </div>

    <div class="section">
        <p>Dear Sir/Madam,</p>
        <p>I have joined {company} as a {designation} (Designation) on {joining_date} (Date of Joining).</p>
        <p>I request the company to retain my passport for safekeeping. The details of my passport are as follows;</p>
    </div>

    <div class="section">
        <div class="section-title">Passport Details</div>
{passport_rows}    </div>

    <div class="section">
        <p>I agree that my passport will be handed over to me whenever required by me as per my request and same will be returned to the company on the mentioned date.</p>
    </div>

    <div class="section">
        <div class="section-title">Employee Information</div>
{employee_rows}    </div>

    <div class="signature-area">
        <div>Signature:</div>
        <img class="signature-img" src="{signature}" alt="Signature">
    </div>

    <div class="footer">
        <p>{company} &copy; {year}. All rights reserved.</p>
        <p>{address}</p>
    </div>
</body>
</html>
"#,
        employee_name = escape_html(&d.employee_name),
        styles = STYLES,
        company = COMPANY_NAME,
        date_row = info_row("Date:", &format_long_date(&d.date)),
        designation = escape_html(&d.designation),
        joining_date = escape_html(&format_long_date(&d.joining_date)),
        passport_rows = passport_rows,
        employee_rows = employee_rows,
        signature = escape_html(&d.signature),
        year = year,
        address = COMPANY_ADDRESS,
    )
}

/// Fills the HTML template and converts it through an external engine.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    engine: HtmlToPdfEngine,
}

impl TemplateRenderer {
    pub fn new(engine: HtmlToPdfEngine) -> Self {
        Self { engine }
    }
}

impl Renderer for TemplateRenderer {
    fn name(&self) -> &'static str {
        "template"
    }

    fn naming_scheme(&self) -> NamingScheme {
        NamingScheme::RandomHex
    }

    fn render(&self, declaration: &PassportDeclaration) -> Result<Vec<u8>, GeneratorError> {
        let html = render_html(declaration, current_year());
        self.engine.convert(&html)
    }
}
