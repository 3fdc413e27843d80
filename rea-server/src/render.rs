use std::fmt;

use axum::response::Html;
use rea_core::{ViewData, constants, routes};
use tera::{Context, Tera};

use crate::infra::config::Config;
use crate::infra::errors::{AppError, AppResult};

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("includes/errors.html", include_str!("../templates/includes/errors.html")),
    (routes::views::HOME, include_str!("../templates/index/home.html")),
    (routes::views::SIGN_OUT, include_str!("../templates/index/signout.html")),
    (
        routes::views::ACCESSIBILITY_STATEMENT,
        include_str!("../templates/index/accessibility-statement.html"),
    ),
    (
        routes::views::THERE_IS_A_PROBLEM,
        include_str!("../templates/index/there-is-a-problem.html"),
    ),
    (routes::views::COMPANY_NUMBER, include_str!("../templates/company/number.html")),
    (routes::views::COMPANY_CONFIRM, include_str!("../templates/company/confirm.html")),
    (routes::views::COMPANY_INVALID, include_str!("../templates/company/invalid.html")),
    (
        routes::views::CHANGE_EMAIL_ADDRESS,
        include_str!("../templates/email/change-email-address.html"),
    ),
    (routes::views::CHECK_ANSWER, include_str!("../templates/email/check-your-answer.html")),
    (
        routes::views::UPDATE_SUBMITTED,
        include_str!("../templates/email/update-submitted.html"),
    ),
];

/// Values every page can use regardless of its view data.
#[derive(Debug, Clone)]
struct PageGlobals {
    cdn_host: String,
    piwik_url: String,
    piwik_site_id: String,
    piwik_start_goal_id: String,
}

/// Renders pages from the templates compiled into the binary.
pub struct Renderer {
    tera: Tera,
    globals: PageGlobals,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("globals", &self.globals)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    pub fn new(config: &Config) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;

        Ok(Self {
            tera,
            globals: PageGlobals {
                cdn_host: config.cdn_host.clone(),
                piwik_url: config.piwik_url.clone(),
                piwik_site_id: config.piwik_site_id.clone(),
                piwik_start_goal_id: config.piwik_start_goal_id.clone(),
            },
        })
    }

    pub fn render(&self, template: &str, view_data: &ViewData) -> AppResult<Html<String>> {
        let mut context = Context::from_serialize(view_data).map_err(|err| {
            tracing::error!(template, error = %err, "failed to build template context");
            AppError::internal("Failed to render page")
        })?;

        context.insert("serviceName", constants::SERVICE_NAME);
        context.insert("cdnHost", &self.globals.cdn_host);
        context.insert("piwikUrl", &self.globals.piwik_url);
        context.insert("piwikSiteId", &self.globals.piwik_site_id);
        context.insert("piwikStartGoalId", &self.globals.piwik_start_goal_id);
        context.insert("homeUri", routes::HOME);
        context.insert("signOutUri", routes::SIGN_OUT);
        context.insert("accessibilityStatementUri", routes::ACCESSIBILITY_STATEMENT);
        if view_data.feedback_link.is_none() {
            context.insert("feedbackLink", constants::FEEDBACK_LINK);
        }

        self.tera
            .render(template, &context)
            .map(Html)
            .map_err(|err| {
                tracing::error!(template, error = ?err, "template render failed");
                AppError::internal("Failed to render page")
            })
    }
}
