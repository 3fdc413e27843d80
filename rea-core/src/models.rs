use serde::{Deserialize, Serialize};

/// Outcome of a remote lookup: the HTTP status is always carried, the body only
/// when the call succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResource<T> {
    pub http_status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<T>,
}

impl<T> ApiResource<T> {
    pub fn status_only(http_status_code: u16) -> Self {
        Self {
            http_status_code,
            resource: None,
        }
    }

    pub fn with_resource(http_status_code: u16, resource: T) -> Self {
        Self {
            http_status_code,
            resource: Some(resource),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_status_code)
    }

    /// The resource, if the call succeeded and returned a body.
    pub fn into_resource(self) -> Option<T> {
        if self.is_success() { self.resource } else { None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredOfficeAddress {
    #[serde(default)]
    pub premises: Option<String>,
    #[serde(default)]
    pub address_line_one: Option<String>,
    #[serde(default)]
    pub address_line_two: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl RegisteredOfficeAddress {
    /// Non-empty address parts in display order.
    pub fn lines(&self) -> Vec<String> {
        [
            &self.premises,
            &self.address_line_one,
            &self.address_line_two,
            &self.locality,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .flatten()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
    }
}

/// Company profile as held in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub company_number: String,
    pub company_name: String,
    #[serde(default)]
    pub company_status: Option<String>,
    #[serde(default, rename = "type")]
    pub company_type: Option<String>,
    #[serde(default)]
    pub date_of_creation: Option<String>,
    #[serde(default)]
    pub registered_office_address: Option<RegisteredOfficeAddress>,
}

/// Wire shape of `GET /company/{number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyProfileResource {
    pub company_number: String,
    pub company_name: String,
    #[serde(default)]
    pub company_status: Option<String>,
    #[serde(default, rename = "type")]
    pub company_type: Option<String>,
    #[serde(default)]
    pub date_of_creation: Option<String>,
    #[serde(default)]
    pub registered_office_address: Option<AddressResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressResource {
    #[serde(default)]
    pub premises: Option<String>,
    #[serde(default)]
    pub address_line_1: Option<String>,
    #[serde(default)]
    pub address_line_2: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl From<AddressResource> for RegisteredOfficeAddress {
    fn from(resource: AddressResource) -> Self {
        Self {
            premises: resource.premises,
            address_line_one: resource.address_line_1,
            address_line_two: resource.address_line_2,
            locality: resource.locality,
            region: resource.region,
            postal_code: resource.postal_code,
            country: resource.country,
        }
    }
}

impl From<CompanyProfileResource> for CompanyProfile {
    fn from(resource: CompanyProfileResource) -> Self {
        Self {
            company_number: resource.company_number,
            company_name: resource.company_name,
            company_status: resource.company_status,
            company_type: resource.company_type,
            date_of_creation: resource.date_of_creation,
            registered_office_address: resource.registered_office_address.map(Into::into),
        }
    }
}

/// A company's registered email address as held in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredEmailAddress {
    pub company_email: String,
}

/// Wire shape of `GET /company/{number}/registered-email-address`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredEmailAddressResource {
    pub registered_email_address: String,
}

impl From<RegisteredEmailAddressResource> for RegisteredEmailAddress {
    fn from(resource: RegisteredEmailAddressResource) -> Self {
        Self {
            company_email: resource.registered_email_address,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub company_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default = "default_transaction_status")]
    pub status: TransactionStatus,
}

fn default_transaction_status() -> TransactionStatus {
    TransactionStatus::Open
}

/// Body sent when opening a transaction.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRequest<'a> {
    pub company_number: &'a str,
    pub description: &'a str,
    pub reference: &'a str,
}
