//! Per-page UI state and the handlers the presentation layer calls.
//!
//! A [`PortalSession`] is created once at startup next to the [`Registry`]
//! and lives for the page lifetime. Handlers return strings ready to render
//! or a [`SessionError`] whose `Display` is the message to show the user.

use chrono::NaiveDate;
use tracing::debug;

use crate::{
    codec::VoterIdCodec,
    core::validate::ValidationErrors,
    persist::PersistError,
    registry::{Registry, RegistryError},
    types::VoterId,
    voter::VoterDraft,
};

/// Shown on the dashboard when the registry is empty.
pub const NO_VOTERS_MESSAGE: &str = "No voters registered yet";
/// Shown after a successful export.
pub const EXPORT_SUCCESS_MESSAGE: &str = "Data exported successfully!";

/// Message-bearing failure returned to the presentation layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Submission broke one or more rules.
    #[error("Please fix the following errors:\n\n{0}")]
    Validation(ValidationErrors),
    /// Registration could not be persisted.
    #[error("Registration could not be saved: {0}")]
    Persist(PersistError),
    /// Admin username or password mismatch.
    #[error("Invalid credentials. Please try again.")]
    Authentication,
    /// Admin-only action without login.
    #[error("Admin login required")]
    NotLoggedIn,
    /// Nothing registered in this session yet.
    #[error("No voter ID available to copy")]
    NoVoterId,
    /// Snapshot serialization failed.
    #[error("Failed to export data.")]
    Export,
}

impl From<RegistryError> for SessionError {
    fn from(value: RegistryError) -> Self {
        match value {
            RegistryError::Validation(errors) => Self::Validation(errors),
            RegistryError::Persist(err) => Self::Persist(err),
        }
    }
}

/// Portal pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    /// Entry page.
    #[default]
    Landing,
    /// Registration form.
    Registration,
    /// Post-registration page showing the identifier.
    Success,
    /// Admin login or dashboard.
    Admin,
}

/// Which half of the admin page is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminView {
    /// Credentials form.
    Login,
    /// Voter table.
    Dashboard,
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Full identifier, for copy.
    pub voter_id: VoterId,
    /// Masked identifier, shown initially.
    pub display: String,
}

/// One dashboard table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRow {
    /// Identifier as displayed.
    pub masked_voter_id: String,
    /// Identifier for the copy button.
    pub voter_id: VoterId,
    /// `first last other`.
    pub full_name: String,
    /// Date of birth.
    pub dob: String,
    /// Sex.
    pub sex: String,
    /// Marital status.
    pub marital_status: String,
    /// Local government area.
    pub lga: String,
    /// Doctor identifier.
    pub doctor_id: String,
}

/// Admin dashboard contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    /// Registered voter count.
    pub total_voters: usize,
    /// Rows in registration order.
    pub rows: Vec<DashboardRow>,
}

impl Dashboard {
    /// Message to show in place of the table, if any.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.rows.is_empty().then_some(NO_VOTERS_MESSAGE)
    }
}

/// A file ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Download file name.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// UI state for one page lifetime.
#[derive(Debug, Clone, Default)]
pub struct PortalSession {
    admin_logged_in: bool,
    current_voter_id: Option<VoterId>,
    voter_id_visible: bool,
    page: Page,
}

impl PortalSession {
    /// Fresh session on the landing page, logged out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Page currently shown.
    pub fn page(&self) -> Page {
        self.page
    }

    /// True after a successful admin login.
    pub fn is_admin(&self) -> bool {
        self.admin_logged_in
    }

    /// True when the full identifier is shown.
    pub fn voter_id_visible(&self) -> bool {
        self.voter_id_visible
    }

    /// Identifier from the last successful submission.
    pub fn current_voter_id(&self) -> Option<&str> {
        self.current_voter_id.as_deref()
    }

    /// Switches page. Leaving the success page hides the identifier again.
    pub fn show_page(&mut self, page: Page) {
        if page != Page::Success {
            self.voter_id_visible = false;
        }
        self.page = page;
        debug!(?page, "page shown");
    }

    /// Admin view for the current login state.
    pub fn admin_view(&self) -> AdminView {
        if self.admin_logged_in {
            AdminView::Dashboard
        } else {
            AdminView::Login
        }
    }

    /// Validates and registers `draft`, then moves to the success page with
    /// the new identifier masked.
    pub fn submit_registration(
        &mut self,
        registry: &mut Registry,
        draft: VoterDraft,
    ) -> Result<SubmitOutcome, SessionError> {
        let rec = registry.register(draft)?;
        let display = VoterIdCodec::mask(Some(rec.voter_id.as_str()));

        self.current_voter_id = Some(rec.voter_id.clone());
        self.voter_id_visible = false;
        self.show_page(Page::Success);

        Ok(SubmitOutcome {
            voter_id: rec.voter_id,
            display,
        })
    }

    /// Flips identifier visibility and returns the text to display.
    pub fn toggle_voter_id_visibility(&mut self) -> String {
        self.voter_id_visible = !self.voter_id_visible;
        self.current_display()
    }

    /// Current identifier as it should be displayed.
    pub fn current_display(&self) -> String {
        match self.current_voter_id.as_deref() {
            Some(id) => VoterIdCodec::render(id, self.voter_id_visible),
            None => VoterIdCodec::mask(None),
        }
    }

    /// Full identifier for the clipboard, regardless of visibility.
    pub fn copy_voter_id(&self) -> Result<&str, SessionError> {
        self.current_voter_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(SessionError::NoVoterId)
    }

    /// Literal credential check. No lockout or rate limiting.
    pub fn admin_login(
        &mut self,
        registry: &Registry,
        username: &str,
        password: &str,
    ) -> Result<Dashboard, SessionError> {
        let admin = &registry.config().admin;
        if username != admin.username || password != admin.password {
            debug!("admin login rejected");
            return Err(SessionError::Authentication);
        }
        self.admin_logged_in = true;
        debug!("admin logged in");
        self.admin_dashboard(registry)
    }

    /// Ends the admin login.
    pub fn admin_logout(&mut self) {
        self.admin_logged_in = false;
        debug!("admin logged out");
    }

    /// Total and table rows; requires login.
    pub fn admin_dashboard(&self, registry: &Registry) -> Result<Dashboard, SessionError> {
        if !self.admin_logged_in {
            return Err(SessionError::NotLoggedIn);
        }

        let rows = registry
            .list()
            .iter()
            .map(|rec| DashboardRow {
                masked_voter_id: VoterIdCodec::mask(Some(rec.voter_id.as_str())),
                voter_id: rec.voter_id.clone(),
                full_name: rec.full_name(),
                dob: rec.dob.clone(),
                sex: rec.sex.clone(),
                marital_status: rec.marital_status.clone(),
                lga: rec.lga.clone(),
                doctor_id: rec.doctor_id.clone(),
            })
            .collect();

        Ok(Dashboard {
            total_voters: registry.len(),
            rows,
        })
    }

    /// Snapshot of every record, named for `today`.
    pub fn export_voter_data(
        &self,
        registry: &Registry,
        today: NaiveDate,
    ) -> Result<ExportFile, SessionError> {
        if !self.admin_logged_in {
            return Err(SessionError::NotLoggedIn);
        }
        let bytes = registry.export_snapshot().map_err(|err| {
            tracing::error!(error = %err, "export failed");
            SessionError::Export
        })?;
        Ok(ExportFile {
            file_name: registry.export_file_name(today),
            bytes,
        })
    }
}
