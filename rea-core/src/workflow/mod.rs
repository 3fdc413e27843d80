//! One handler per page of the flow.
//!
//! Handlers are built per request with the dependencies they need and a
//! [`ViewData`] seeded at construction. Soft failures (missing session state,
//! invalid input, a failed remote call) come back as `Err(view_data)` carrying
//! the errors to render, never as panics or transport errors.

pub mod change_email;
pub mod check_answer;
pub mod company;
pub mod home;
pub mod signout;
pub mod submitted;
pub mod transaction;

pub use change_email::{ChangeEmailAddressHandler, ChangeEmailForm};
pub use check_answer::{CheckAnswerForm, CheckAnswerHandler, CheckAnswerRejection, RejectionKind};
pub use company::{
    CompanyNumberForm, CompanySearchHandler, ConfirmCompanyHandler, ConfirmOutcome,
    invalid_company_view,
};
pub use home::{accessibility_statement_view, home_view, there_is_a_problem_view};
pub use signout::{SignOutDecision, SignOutForm, SignOutHandler};
pub use submitted::update_submitted_view;
pub use transaction::SubmissionStatus;

use crate::view::ViewData;

pub type PageResult = Result<ViewData, ViewData>;
