//! Company number entry, confirmation and the "cannot use this service" page.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::PageResult;
use crate::clients::{CompanyProfileClient, EmailRegistryClient};
use crate::constants::{
    COMPANY_CONFIRM_PAGE_TITLE, COMPANY_INVALID_PAGE_TITLE, COMPANY_NUMBER_ERROR_ANCHOR,
    COMPANY_NUMBER_ERROR_KEY, COMPANY_NUMBER_NOT_FOUND, COMPANY_NUMBER_PAGE_TITLE,
    ERROR_TITLE_PREFIX, INVALID_COMPANY_NUMBER, NO_COMPANY_NUMBER_SUPPLIED,
    NO_COMPANY_PROFILE_FOUND,
};
use crate::models::CompanyProfile;
use crate::routes;
use crate::session::Session;
use crate::validation::{
    COMPANY_NUMBER_SCHEMA, FormValidator, is_valid_company_number, sanitize_company_number,
};
use crate::view::{ViewData, format_validation_error};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyNumberForm {
    #[serde(rename = "companyNumber", default)]
    pub company_number: Option<String>,
}

impl CompanyNumberForm {
    pub fn new(company_number: impl Into<String>) -> Self {
        Self {
            company_number: Some(company_number.into()),
        }
    }
}

/// What the confirm POST found when it looked up the company's current
/// registered email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    /// The registry answered with a non-success status.
    NoRegisteredEmail,
    /// The registry could not be reached.
    LookupFailed,
}

fn company_number_view(user_email: Option<String>) -> ViewData {
    ViewData {
        title: Some(COMPANY_NUMBER_PAGE_TITLE.to_string()),
        back_uri: Some(routes::HOME.to_string()),
        user_email,
        signout_banner: true,
        ..ViewData::default()
    }
}

fn reject_company_number(mut view_data: ViewData, message: &str) -> ViewData {
    view_data.title = Some(format!("{ERROR_TITLE_PREFIX}{COMPANY_NUMBER_PAGE_TITLE}"));
    view_data.errors = Some(format_validation_error(
        COMPANY_NUMBER_ERROR_KEY,
        COMPANY_NUMBER_ERROR_ANCHOR,
        message,
    ));
    view_data
}

async fn lookup_profile(
    profiles: &dyn CompanyProfileClient,
    company_number: &str,
) -> Option<CompanyProfile> {
    match profiles.get_company_profile(company_number).await {
        Ok(resource) if resource.is_success() => resource.into_resource(),
        Ok(resource) => {
            info!(
                company_number,
                status = resource.http_status_code,
                "company profile not found"
            );
            None
        }
        Err(err) => {
            error!(company_number, error = %err, "company profile lookup failed");
            None
        }
    }
}

pub struct CompanySearchHandler<'a> {
    validator: FormValidator,
    profiles: &'a dyn CompanyProfileClient,
    view_data: ViewData,
}

impl fmt::Debug for CompanySearchHandler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompanySearchHandler")
            .field("view_data", &self.view_data)
            .finish_non_exhaustive()
    }
}

impl<'a> CompanySearchHandler<'a> {
    pub fn new(
        validator: FormValidator,
        profiles: &'a dyn CompanyProfileClient,
        user_email: Option<String>,
    ) -> Self {
        Self {
            validator,
            profiles,
            view_data: company_number_view(user_email),
        }
    }

    pub fn get(self) -> ViewData {
        info!("GET request to enter company number");
        self.view_data
    }

    /// Normalises and validates the number, then stores the matching profile
    /// in session.
    pub async fn post(mut self, session: &mut Session, form: &CompanyNumberForm) -> PageResult {
        info!("POST request to look up company number");

        if self.validator.validate(form, &COMPANY_NUMBER_SCHEMA).is_some() {
            return Err(reject_company_number(self.view_data, NO_COMPANY_NUMBER_SUPPLIED));
        }

        let company_number =
            sanitize_company_number(form.company_number.as_deref().unwrap_or_default());
        self.view_data.company_number = Some(company_number.clone());
        if !is_valid_company_number(&company_number) {
            return Err(reject_company_number(self.view_data, INVALID_COMPANY_NUMBER));
        }

        let Some(profile) = lookup_profile(self.profiles, &company_number).await else {
            return Err(reject_company_number(self.view_data, COMPANY_NUMBER_NOT_FOUND));
        };

        let extra = session.extra_mut();
        extra.company_profile = Some(profile);
        extra.registered_email_address = None;
        Ok(self.view_data)
    }
}

pub struct ConfirmCompanyHandler<'a> {
    profiles: &'a dyn CompanyProfileClient,
    emails: &'a dyn EmailRegistryClient,
    view_data: ViewData,
}

impl fmt::Debug for ConfirmCompanyHandler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmCompanyHandler")
            .field("view_data", &self.view_data)
            .finish_non_exhaustive()
    }
}

impl<'a> ConfirmCompanyHandler<'a> {
    pub fn new(
        profiles: &'a dyn CompanyProfileClient,
        emails: &'a dyn EmailRegistryClient,
        user_email: Option<String>,
    ) -> Self {
        let view_data = ViewData {
            title: Some(COMPANY_CONFIRM_PAGE_TITLE.to_string()),
            back_uri: Some(routes::company::NUMBER.to_string()),
            user_email,
            signout_banner: true,
            ..ViewData::default()
        };

        Self {
            profiles,
            emails,
            view_data,
        }
    }

    /// Renders the stored profile. When `company_number` is given (the
    /// company lookup service forwards here with it) that company's profile
    /// is fetched and stored first.
    ///
    /// `Err` carries a company number view with the error to show.
    pub async fn get(mut self, session: &mut Session, company_number: Option<&str>) -> PageResult {
        info!("GET request to confirm company");

        if let Some(raw) = company_number.filter(|raw| !raw.trim().is_empty()) {
            let company_number = sanitize_company_number(raw);
            let profile = if is_valid_company_number(&company_number) {
                lookup_profile(self.profiles, &company_number).await
            } else {
                None
            };
            let Some(profile) = profile else {
                let mut view_data = company_number_view(self.view_data.user_email.take());
                view_data.company_number = Some(company_number);
                return Err(reject_company_number(view_data, COMPANY_NUMBER_NOT_FOUND));
            };
            let extra = session.extra_mut();
            extra.company_profile = Some(profile);
            extra.registered_email_address = None;
        }

        let Some(profile) = session.extra().company_profile.as_ref() else {
            warn!("company confirm requested with no company profile in session");
            let view_data = company_number_view(self.view_data.user_email.take());
            return Err(reject_company_number(view_data, NO_COMPANY_PROFILE_FOUND));
        };

        self.view_data.company_name = Some(profile.company_name.clone());
        self.view_data.company_number = Some(profile.company_number.clone());
        self.view_data.company_status = profile.company_status.clone();
        self.view_data.company_address = profile
            .registered_office_address
            .as_ref()
            .map(|address| address.lines())
            .unwrap_or_default();
        Ok(self.view_data)
    }

    /// Confirms the stored company: records its number as the flow's company
    /// and fetches its current registered email address.
    pub async fn post(mut self, session: &mut Session) -> Result<ConfirmOutcome, ViewData> {
        info!("POST request to confirm company");

        let Some(company_number) = session
            .extra()
            .company_profile
            .as_ref()
            .map(|profile| profile.company_number.clone())
        else {
            let view_data = company_number_view(self.view_data.user_email.take());
            return Err(reject_company_number(view_data, NO_COMPANY_PROFILE_FOUND));
        };

        session.extra_mut().company_number = Some(company_number.clone());

        let outcome = match self.emails.get_company_email(&company_number).await {
            Ok(resource) if resource.is_success() => match resource.into_resource() {
                Some(registered) => {
                    session.extra_mut().registered_email_address = Some(registered.company_email);
                    return Ok(ConfirmOutcome::Confirmed);
                }
                None => ConfirmOutcome::NoRegisteredEmail,
            },
            Ok(resource) => {
                info!(
                    company_number = %company_number,
                    status = resource.http_status_code,
                    "no registered email address for company"
                );
                ConfirmOutcome::NoRegisteredEmail
            }
            Err(err) => {
                error!(company_number = %company_number, error = %err, "registered email address lookup failed");
                ConfirmOutcome::LookupFailed
            }
        };

        session.extra_mut().registered_email_address = None;
        Ok(outcome)
    }
}

/// "You cannot use this service" page for the company held in session.
pub fn invalid_company_view(session: &Session, user_email: Option<String>) -> ViewData {
    let profile = session.extra().company_profile.as_ref();
    ViewData {
        title: Some(COMPANY_INVALID_PAGE_TITLE.to_string()),
        back_uri: Some(routes::company::NUMBER.to_string()),
        user_email,
        signout_banner: true,
        company_name: profile.map(|profile| profile.company_name.clone()),
        company_number: profile.map(|profile| profile.company_number.clone()),
        ..ViewData::default()
    }
}
