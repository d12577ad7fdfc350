//! Resource-scoped accessors over the request pipeline.
//!
//! Each accessor borrows the [`HarboryClient`] and maps one backend route to
//! one method. None of them add behavior beyond choosing the method, the path
//! and the payload type.

use crate::client::{HarboryClient, RequestOptions};
use crate::models::{
    ChangePasswordRequest, ContainerDetails, ContainerSummary, HealthReport, ImageDetails,
    ImagePruneReport, ImageSummary, LoginRequest, LoginResponse, MessageResponse, Network, Node,
    SystemStats, Volume, VolumeList,
};
use harbory_core::ids::{ContainerId, ImageId, NetworkId, NodeId, VolumeName};
use harbory_core::{ApiResponse, EnvelopePolicy};
use tracing::{info, warn};

/// Container operations.
#[derive(Clone, Copy)]
pub struct Containers<'a> {
    client: &'a HarboryClient,
}

impl<'a> Containers<'a> {
    pub(crate) const fn new(client: &'a HarboryClient) -> Self {
        Self { client }
    }

    /// `GET /containers`
    pub async fn list(&self) -> ApiResponse<Vec<ContainerSummary>> {
        self.client
            .request("/containers", RequestOptions::get())
            .await
    }

    /// `GET /containers/:id`
    pub async fn get(&self, id: &ContainerId) -> ApiResponse<ContainerDetails> {
        self.client
            .request(&format!("/containers/{}", id.path_segment()), RequestOptions::get())
            .await
    }
}

/// Image operations.
#[derive(Clone, Copy)]
pub struct Images<'a> {
    client: &'a HarboryClient,
}

impl<'a> Images<'a> {
    pub(crate) const fn new(client: &'a HarboryClient) -> Self {
        Self { client }
    }

    /// `GET /images`
    pub async fn list(&self) -> ApiResponse<Vec<ImageSummary>> {
        self.client.request("/images", RequestOptions::get()).await
    }

    /// `GET /images/:id`
    pub async fn get(&self, id: &ImageId) -> ApiResponse<ImageDetails> {
        self.client
            .request(&format!("/images/{}", id.path_segment()), RequestOptions::get())
            .await
    }

    /// `POST /images/prune`: remove dangling images.
    ///
    /// The report carries its own `status` key, so it is always delivered
    /// as `data` rather than passed through as an envelope.
    pub async fn prune(&self) -> ApiResponse<ImagePruneReport> {
        let options = RequestOptions::post().with_envelope_policy(EnvelopePolicy::Strict);
        self.client.request("/images/prune", options).await
    }
}

/// Volume operations.
#[derive(Clone, Copy)]
pub struct Volumes<'a> {
    client: &'a HarboryClient,
}

impl<'a> Volumes<'a> {
    pub(crate) const fn new(client: &'a HarboryClient) -> Self {
        Self { client }
    }

    /// `GET /volumes`
    pub async fn list(&self) -> ApiResponse<VolumeList> {
        self.client.request("/volumes", RequestOptions::get()).await
    }

    /// `GET /volumes/:name`
    pub async fn get(&self, name: &VolumeName) -> ApiResponse<Volume> {
        self.client
            .request(&format!("/volumes/{}", name.path_segment()), RequestOptions::get())
            .await
    }
}

/// Network operations.
#[derive(Clone, Copy)]
pub struct Networks<'a> {
    client: &'a HarboryClient,
}

impl<'a> Networks<'a> {
    pub(crate) const fn new(client: &'a HarboryClient) -> Self {
        Self { client }
    }

    /// `GET /networks`
    pub async fn list(&self) -> ApiResponse<Vec<Network>> {
        self.client.request("/networks", RequestOptions::get()).await
    }

    /// `GET /networks/:id`
    pub async fn get(&self, id: &NetworkId) -> ApiResponse<Network> {
        self.client
            .request(&format!("/networks/{}", id.path_segment()), RequestOptions::get())
            .await
    }
}

/// Swarm node operations.
#[derive(Clone, Copy)]
pub struct Nodes<'a> {
    client: &'a HarboryClient,
}

impl<'a> Nodes<'a> {
    pub(crate) const fn new(client: &'a HarboryClient) -> Self {
        Self { client }
    }

    /// `GET /nodes`
    pub async fn list(&self) -> ApiResponse<Vec<Node>> {
        self.client.request("/nodes", RequestOptions::get()).await
    }

    /// `GET /nodes/:id`
    pub async fn get(&self, id: &NodeId) -> ApiResponse<Node> {
        self.client
            .request(&format!("/nodes/{}", id.path_segment()), RequestOptions::get())
            .await
    }
}

/// Backend health.
#[derive(Clone, Copy)]
pub struct Health<'a> {
    client: &'a HarboryClient,
}

impl<'a> Health<'a> {
    pub(crate) const fn new(client: &'a HarboryClient) -> Self {
        Self { client }
    }

    /// `GET /health`
    ///
    /// The report's top-level `status` is the backend's health verdict, not
    /// an envelope status, so it lands in `data`.
    pub async fn check(&self) -> ApiResponse<HealthReport> {
        let options = RequestOptions::get().with_envelope_policy(EnvelopePolicy::Strict);
        self.client.request("/health", options).await
    }
}

/// Host and daemon statistics.
#[derive(Clone, Copy)]
pub struct System<'a> {
    client: &'a HarboryClient,
}

impl<'a> System<'a> {
    pub(crate) const fn new(client: &'a HarboryClient) -> Self {
        Self { client }
    }

    /// `GET /system/stats`
    pub async fn stats(&self) -> ApiResponse<SystemStats> {
        self.client
            .request("/system/stats", RequestOptions::get())
            .await
    }
}

/// Authentication endpoints.
#[derive(Clone, Copy)]
pub struct Auth<'a> {
    client: &'a HarboryClient,
}

impl<'a> Auth<'a> {
    pub(crate) const fn new(client: &'a HarboryClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login` with `{"password": ...}`.
    ///
    /// Does not touch the credential store; see [`Auth::establish_session`].
    pub async fn login(&self, password: &str) -> ApiResponse<LoginResponse> {
        let body = LoginRequest { password };
        self.client
            .send("/auth/login", RequestOptions::post(), Some(&body))
            .await
    }

    /// `POST /auth/logout` with no body.
    pub async fn logout(&self) -> ApiResponse<MessageResponse> {
        self.client
            .request("/auth/logout", RequestOptions::post())
            .await
    }

    /// `GET /auth/verify`
    pub async fn verify(&self) -> ApiResponse<MessageResponse> {
        self.client
            .request("/auth/verify", RequestOptions::get())
            .await
    }

    /// `POST /auth/change-password` with `{"old_password", "new_password"}`.
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> ApiResponse<MessageResponse> {
        let body = ChangePasswordRequest {
            old_password,
            new_password,
        };
        self.client
            .send("/auth/change-password", RequestOptions::post(), Some(&body))
            .await
    }

    /// Log in and persist the returned token in the client's credential store.
    ///
    /// On success `data` holds the backend's login message.
    pub async fn establish_session(&self, password: &str) -> ApiResponse<MessageResponse> {
        let response = self.login(password).await;
        let ApiResponse {
            status,
            data,
            error,
            kind,
            extra,
        } = response;

        let Some(login) = data else {
            return ApiResponse {
                status,
                data: None,
                error,
                kind,
                extra,
            };
        };

        let message = login.message.clone();
        if let Err(err) = self.client.credentials().set(login.into_token()) {
            warn!(error = %err, "Failed to persist session credential");
            return ApiResponse::failure(&err);
        }

        info!("Session established");
        ApiResponse {
            status,
            data: Some(MessageResponse { message }),
            error,
            kind,
            extra,
        }
    }

    /// Log out and clear the credential store, whatever the backend answers.
    pub async fn end_session(&self) -> ApiResponse<MessageResponse> {
        let response = self.logout().await;
        if let Err(err) = self.client.credentials().clear() {
            warn!(error = %err, "Failed to clear session credential");
            return ApiResponse::failure(&err);
        }
        response
    }
}
