//! Form input: the job-posting details the user types, and the payload built from them.

use serde::{Deserialize, Serialize};

/// Shown when any required field is blank.
pub const MISSING_FIELDS_MESSAGE: &str =
    "Please provide job description, position, and company name";

/// Job-posting details. Freely mutable for the whole session, including while a
/// generation request is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub position: String,
    pub company_name: String,
    /// Optional context about the company, culture, or mission.
    #[serde(default)]
    pub about_company: String,
    pub job_description: String,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormUpdate {
    pub position: Option<String>,
    pub company_name: Option<String>,
    pub about_company: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Position,
    CompanyName,
    JobDescription,
}

impl FormInput {
    pub fn apply(&mut self, update: FormUpdate) {
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(company_name) = update.company_name {
            self.company_name = company_name;
        }
        if let Some(about_company) = update.about_company {
            self.about_company = about_company;
        }
        if let Some(job_description) = update.job_description {
            self.job_description = job_description;
        }
    }

    /// Required fields that are empty or whitespace-only.
    pub fn missing_required(&self) -> Vec<RequiredField> {
        [
            (RequiredField::Position, &self.position),
            (RequiredField::CompanyName, &self.company_name),
            (RequiredField::JobDescription, &self.job_description),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }
}

/// One submission's worth of generation input.
///
/// Built only by the coordinator after its submit guard passed, so holding one
/// implies the form was complete and the reference document was available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    sequence: u64,
    payload: String,
}

impl GenerationRequest {
    pub(super) fn new(sequence: u64, form: &FormInput) -> Self {
        Self {
            sequence,
            payload: compose_payload(form),
        }
    }

    /// Monotonic per-session token; later submissions carry larger values.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// Composes the generation payload. Field values are copied verbatim.
pub fn compose_payload(form: &FormInput) -> String {
    format!(
        "Position: {}\nCompany: {}\nAbout Company: {}\nJob Description: {}",
        form.position, form.company_name, form.about_company, form.job_description
    )
}
