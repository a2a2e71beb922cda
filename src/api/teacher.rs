use reqwest::header::AUTHORIZATION;
use tracing::info;

use crate::{
    api::{ApiClient, reject},
    error::Result,
    model::{
        error_body::ErrorBody,
        login_object::{LoginObject, LoginResponse},
        submission_record::SubmissionRecord,
    },
};

impl ApiClient {
    /// Exchanges teacher credentials for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let login = LoginObject {
            email: email.to_owned(),
            password: password.to_owned(),
        };

        let response = self
            .http
            .post(self.url("/api/teacher/login"))
            .json(&login)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(reject(response, ErrorBody::any_message, "Login failed").await);
        }

        let login_response = response.json::<LoginResponse>().await?;
        info!("Logged in as {}", login_response.teacher.name);
        Ok(login_response)
    }

    pub async fn list_submissions(&self, token: &str) -> Result<Vec<SubmissionRecord>> {
        let response = self
            .http
            .get(self.url("/api/submissions"))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(reject(response, |_| None, "Failed to fetch submissions").await);
        }

        Ok(response.json::<Vec<SubmissionRecord>>().await?)
    }

    /// Downloads a stored file by its resolved path.
    pub async fn fetch_file(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.http.get(self.url(path)).send().await?;

        if !response.status().is_success() {
            return Err(reject(response, |_| None, "Failed to fetch file").await);
        }

        Ok(response.bytes().await?.to_vec())
    }
}
