//! The four-step submission wizard.
//!
//! The wizard owns the draft, the current step and its own toast queue. Every
//! change to the draft is snapshotted to storage so a restart can pick the
//! draft back up, and the snapshot is removed when the wizard is torn down.

use std::path::Path;

use tracing::{error, info, warn};

use crate::{
    api::ApiClient,
    error::{PortalError, Result},
    model::{
        catalog::{self, BRANCHES, COURSES},
        draft::{
            BatchMember, Draft, FileHandle, FileKind, MAX_BATCH_MEMBERS, MIN_BATCH_MEMBERS,
            MemberField, SelectField, TextField,
        },
    },
    storage::{DRAFT_KEY, Storage},
    toast::{NewToast, Toaster},
};

pub mod validation;

pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 4;

pub struct Wizard<S: Storage> {
    step: u8,
    draft: Draft,
    storage: S,
    api: ApiClient,
    toasts: Toaster,
}

impl<S: Storage> Wizard<S> {
    /// Builds the wizard, restoring the stored draft if there is a usable one.
    pub fn mount(storage: S, api: ApiClient, toasts: Toaster) -> Self {
        let draft = match storage.get(DRAFT_KEY) {
            Some(raw) => match Draft::from_snapshot(&raw) {
                Ok(draft) => {
                    info!("Restored draft from storage");
                    draft
                }
                Err(e) => {
                    warn!("Ignoring unreadable draft snapshot: {e}");
                    Draft::default()
                }
            },
            None => Draft::default(),
        };

        Self {
            step: FIRST_STEP,
            draft,
            storage,
            api,
            toasts,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn toasts(&self) -> &Toaster {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut Toaster {
        &mut self.toasts
    }

    pub fn step_title(&self) -> &'static str {
        match self.step {
            1 => "Basic Information",
            2 => "Personal Details",
            3 => "Batch Members",
            _ => "Final Details",
        }
    }

    pub fn progress(&self) -> u8 {
        (u16::from(self.step) * 100 / u16::from(LAST_STEP)) as u8
    }

    /// Shown below the member list while it is shorter than the expected batch size.
    pub fn member_warning(&self) -> Option<&'static str> {
        (self.draft.batch_members.len() < MIN_BATCH_MEMBERS).then_some("Minimum 3 members required")
    }

    pub fn can_add_member(&self) -> bool {
        self.draft.batch_members.len() < MAX_BATCH_MEMBERS
    }

    /// Moves to the next step if the current one is complete.
    pub fn advance(&mut self) -> Result<u8> {
        let missing = validation::missing_fields(&self.draft, self.step);
        if !missing.is_empty() {
            self.toasts.toast(NewToast::destructive(
                "Missing Information",
                "Please fill all required fields before proceeding",
            ));
            return Err(PortalError::Validation(missing));
        }

        self.step = (self.step + 1).min(LAST_STEP);
        Ok(self.step)
    }

    pub fn retreat(&mut self) -> u8 {
        self.step = self.step.saturating_sub(1).max(FIRST_STEP);
        self.step
    }

    pub fn set_field(&mut self, field: TextField, value: impl Into<String>) {
        *self.draft.text_mut(field) = value.into();
        self.persist();
    }

    pub fn set_select(&mut self, field: SelectField, value: &str) -> Result<()> {
        let options = match field {
            SelectField::Branch => BRANCHES,
            SelectField::Course => COURSES,
        };

        if !catalog::contains(options, value) {
            return Err(self.invalid_input(format!("'{value}' is not a valid option")));
        }

        *self.draft.select_mut(field) = value.to_owned();
        self.persist();
        Ok(())
    }

    pub fn set_file(&mut self, kind: FileKind, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(self.invalid_input(format!("{} is not a readable file", path.display())));
        }
        if !kind.accepts(path) {
            let accepted = kind.accepted_extensions().join(", ");
            return Err(self.invalid_input(format!("{kind} must be one of: {accepted}")));
        }

        *self.draft.file_mut(kind) = Some(FileHandle::new(path));
        self.persist();
        Ok(())
    }

    pub fn add_batch_member(&mut self) {
        if !self.can_add_member() {
            return;
        }
        self.draft.batch_members.push(BatchMember::default());
        self.persist();
    }

    pub fn update_batch_member(&mut self, index: usize, field: MemberField, value: impl Into<String>) {
        let Some(member) = self.draft.batch_members.get_mut(index) else {
            return;
        };

        match field {
            MemberField::Name => member.name = value.into(),
            MemberField::RegistrationNumber => member.registration_number = value.into(),
        }
        self.persist();
    }

    /// Removes a member. The first member can never be removed.
    pub fn remove_batch_member(&mut self, index: usize) {
        if index == 0 || index >= self.draft.batch_members.len() {
            return;
        }
        self.draft.batch_members.remove(index);
        self.persist();
    }

    /// Sends the draft. On failure the step and draft are left as they were so
    /// the user can retry.
    pub async fn submit(&mut self) -> Result<()> {
        if self.step != LAST_STEP {
            return Err(self.invalid_input("Complete all steps before submitting".into()));
        }

        match self.api.submit(&self.draft).await {
            Ok(()) => {
                self.toasts.toast(NewToast::success(
                    "Submission Successful",
                    "Your documents have been submitted successfully.",
                ));
                self.draft = Draft::default();
                self.step = FIRST_STEP;
                if let Err(e) = self.storage.remove(DRAFT_KEY) {
                    warn!("Could not clear draft snapshot: {e}");
                }
                Ok(())
            }
            Err(e) => {
                error!("Submission failed: {e}");
                let description = match &e {
                    PortalError::Api { message, .. } => message.clone(),
                    _ => "There was an error submitting your documents. Please try again.".into(),
                };
                self.toasts.toast(NewToast::destructive("Submission Failed", description));
                Err(e)
            }
        }
    }

    fn persist(&mut self) {
        let result = self
            .draft
            .snapshot()
            .map_err(PortalError::from)
            .and_then(|raw| self.storage.set(DRAFT_KEY, raw));

        if let Err(e) = result {
            warn!("Could not save draft snapshot: {e}");
        }
    }

    fn invalid_input(&mut self, message: String) -> PortalError {
        self.toasts
            .toast(NewToast::destructive("Invalid Input", message.clone()));
        PortalError::InvalidInput(message)
    }
}

impl<S: Storage> Drop for Wizard<S> {
    fn drop(&mut self) {
        if let Err(e) = self.storage.remove(DRAFT_KEY) {
            warn!("Could not clear draft snapshot on teardown: {e}");
        }
    }
}
