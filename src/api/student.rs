use reqwest::multipart::{Form, Part};
use tokio::fs::read;
use tracing::info;

use crate::{
    api::{ApiClient, reject},
    error::{PortalError, Result},
    model::{
        draft::{Draft, FileKind},
        error_body::ErrorBody,
    },
};

impl ApiClient {
    /// Sends a finished draft to `POST /api/submit` as a multipart body.
    ///
    /// Scalar fields go as text parts, the member list as one JSON text part
    /// and both files as binary parts.
    pub async fn submit(&self, draft: &Draft) -> Result<()> {
        let form = build_form(draft).await?;

        let response = self
            .http
            .post(self.url("/api/submit"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(reject(response, ErrorBody::error_message, "Submission failed").await);
        }

        info!("Submission for batch {} accepted", draft.batch_info);
        Ok(())
    }
}

async fn build_form(draft: &Draft) -> Result<Form> {
    let mut form = Form::new()
        .text("branch", draft.branch.clone())
        .text("course", draft.course.clone())
        .text("rollNumber", draft.roll_number.clone())
        .text("section", draft.section.clone())
        .text("name", draft.name.clone())
        .text("batchInfo", draft.batch_info.clone());

    for kind in [FileKind::Ppt, FileKind::Ieee] {
        let Some(handle) = draft.file(kind) else {
            return Err(PortalError::InvalidInput(format!("no {kind} selected")));
        };
        let data = read(&handle.path).await?;
        form = form.part(kind.form_name(), Part::bytes(data).file_name(handle.filename.clone()));
    }

    Ok(form
        .text("batchMembers", serde_json::to_string(&draft.batch_members)?)
        .text("remarks", draft.remarks.clone()))
}
