//! Versus session API.

use async_trait::async_trait;

use shortlist_types::{
    Choice, ChoiceOutcome, Result, Session, SessionSnapshot, VersusBackend,
};

use crate::client::ApiClient;
use crate::types::{ChoiceRequest, CreateSessionRequest, CreateSessionResponse};

/// Versus API client.
pub struct VersusApi {
    client: ApiClient,
}

impl VersusApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the current session and its pending round.
    pub async fn session(&self) -> Result<SessionSnapshot> {
        self.client.get("versus/session/").await
    }

    /// Create a new session. Round 1 is obtained with a follow-up
    /// [`session`](Self::session) call.
    pub async fn create(&self, total_rounds: u32) -> Result<Session> {
        let response: CreateSessionResponse = self
            .client
            .post("versus/session/", &CreateSessionRequest { total_rounds })
            .await?;
        Ok(response.session)
    }

    /// Submit the choice for one round.
    pub async fn submit_choice(&self, round_id: &str, choice: Choice) -> Result<ChoiceOutcome> {
        self.client
            .post(
                &format!("versus/round/{}/choice/", round_id),
                &ChoiceRequest { choice },
            )
            .await
    }
}

#[async_trait]
impl VersusBackend for VersusApi {
    async fn create_session(&self, total_rounds: u32) -> Result<Session> {
        self.create(total_rounds).await
    }

    async fn fetch_session(&self) -> Result<SessionSnapshot> {
        self.session().await
    }

    async fn submit_choice(&self, round_id: &str, choice: Choice) -> Result<ChoiceOutcome> {
        VersusApi::submit_choice(self, round_id, choice).await
    }
}
