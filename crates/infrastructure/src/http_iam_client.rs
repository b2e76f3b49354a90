use std::time::Duration;

use async_trait::async_trait;
use iam_graph_application::{AssignmentGateway, AssignmentRequest, EntityCatalog};
use iam_graph_core::{AppError, AppResult};
use iam_graph_domain::{
    EntityId, Facultad, FacultadName, GraphMember, IdRol, MemberKey, Perfil, Rol, SubjectGraph,
    SubjectKind, SubjectRef,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

mod wire;

use wire::{AssignFacultadWire, AssignRolWire, FacultadWire, PerfilWire, RolWire, SubjectWire};

const FACULTAD_PATH: &str = "iam/facultad/facultad";
const ROL_PATH: &str = "iam/facultad/rol";
const PERFIL_PATH: &str = "iam/facultad/perfil";

/// Client for the remote IAM backend REST endpoints.
///
/// Reads are retried on transient statuses up to `max_attempts`; writes are
/// sent exactly once.
pub struct HttpIamClient {
    http_client: reqwest::Client,
    base_url: Url,
    max_attempts: u8,
    retry_backoff_ms: u64,
}

impl HttpIamClient {
    /// Creates a client for the backend rooted at `base_url`.
    pub fn new(base_url: Url, timeout: Duration, max_attempts: u8) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            http_client,
            base_url: with_trailing_slash(base_url),
            max_attempts: max_attempts.max(1),
            retry_backoff_ms: 200,
        })
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url.join(path).map_err(|error| {
            AppError::Internal(format!("invalid IAM backend path '{path}': {error}"))
        })
    }

    async fn get_optional<T>(&self, path: &str, query: (&str, &str)) -> AppResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().append_pair(query.0, query.1);
        let mut attempt = 0_u8;
        let mut last_error: Option<String> = None;

        while attempt < self.max_attempts {
            attempt = attempt.saturating_add(1);
            debug!(%url, attempt, "IAM backend read");
            let response = self.http_client.get(url.clone()).send().await;

            match response {
                Ok(response) if response.status() == reqwest::StatusCode::NOT_FOUND => {
                    return Ok(None);
                }
                Ok(response) if response.status().is_success() => {
                    let body = response.text().await.map_err(|error| {
                        AppError::Remote(format!("failed to read IAM backend response: {error}"))
                    })?;
                    if body.trim().is_empty() {
                        return Ok(None);
                    }
                    return serde_json::from_str(&body).map(Some).map_err(|error| {
                        AppError::Remote(format!(
                            "IAM backend returned an unreadable body for {path}: {error}"
                        ))
                    });
                }
                Ok(response)
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS =>
                {
                    last_error = Some(format!(
                        "transient HTTP status {} from IAM backend for {path}",
                        response.status()
                    ));
                }
                Ok(response) => return Err(status_error(path, response).await),
                Err(error) => {
                    last_error = Some(format!("IAM backend transport error: {error}"));
                }
            }

            if attempt < self.max_attempts {
                let delay = self.retry_backoff_ms.saturating_mul(u64::from(attempt));
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(AppError::Remote(last_error.unwrap_or_else(|| {
            format!("IAM backend read {path} exhausted retries")
        })))
    }

    async fn send_post<B>(&self, path: &str, body: &B) -> AppResult<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "IAM backend write");
        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|error| AppError::Remote(format!("IAM backend transport error: {error}")))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(status_error(path, response).await)
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_post(path, body)
            .await?
            .json::<T>()
            .await
            .map_err(|error| {
                AppError::Remote(format!(
                    "IAM backend returned an unreadable body for {path}: {error}"
                ))
            })
    }

    async fn post_assignment(&self, path: &str, request: &AssignmentRequest) -> AppResult<()> {
        let subject = SubjectWire::new(request.subject, &request.subject_caption);
        match &request.member {
            MemberKey::Facultad(name) => {
                let body = AssignFacultadWire {
                    nombre: name.as_str().to_owned(),
                    rol_dto: subject,
                };
                self.send_post(path, &body).await?;
            }
            MemberKey::Rol(id_rol) => {
                let body = AssignRolWire {
                    id_rol: id_rol.value(),
                    perfil_dto: subject,
                };
                self.send_post(path, &body).await?;
            }
        }

        Ok(())
    }

    async fn stored_member(&self, key: &MemberKey) -> AppResult<GraphMember> {
        let missing =
            || AppError::Remote(format!("IAM backend confirmed {key} but cannot find it"));

        match key {
            MemberKey::Facultad(name) => {
                let facultad = self
                    .get_optional::<FacultadWire>(
                        &format!("{FACULTAD_PATH}/by/nombre"),
                        ("nombre", name.as_str()),
                    )
                    .await?
                    .ok_or_else(missing)?
                    .into_domain()?;
                GraphMember::try_from(&facultad)
            }
            MemberKey::Rol(id_rol) => {
                let rol = self
                    .get_optional::<RolWire>(
                        &format!("{ROL_PATH}/by/idRol"),
                        ("idRol", &id_rol.value().to_string()),
                    )
                    .await?
                    .ok_or_else(missing)?
                    .into_domain()?;
                GraphMember::try_from(&rol)
            }
        }
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn status_error(path: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<response body unavailable>".to_owned());

    match status {
        reqwest::StatusCode::UNAUTHORIZED => {
            AppError::Unauthorized(format!("IAM backend rejected credentials for {path}"))
        }
        reqwest::StatusCode::FORBIDDEN => {
            AppError::Forbidden(format!("IAM backend denied access to {path}"))
        }
        reqwest::StatusCode::NOT_FOUND => {
            AppError::NotFound(format!("IAM backend has no resource at {path}"))
        }
        _ => AppError::Remote(format!(
            "IAM backend returned status {status} for {path}: {body}"
        )),
    }
}

fn assignment_path(request: &AssignmentRequest, action: &str) -> AppResult<String> {
    match (request.subject.kind, &request.member) {
        (SubjectKind::Rol, MemberKey::Facultad(_)) => Ok(format!("{ROL_PATH}/{action}/facultad")),
        (SubjectKind::Perfil, MemberKey::Rol(_)) => Ok(format!("{PERFIL_PATH}/{action}/rol")),
        _ => Err(AppError::Validation(format!(
            "{} cannot be assigned to {}",
            request.member, request.subject
        ))),
    }
}

#[async_trait]
impl AssignmentGateway for HttpIamClient {
    async fn fetch_subject_graph(&self, subject: SubjectRef) -> AppResult<SubjectGraph> {
        let id = subject.id.value().to_string();
        let missing = || AppError::NotFound(format!("{subject} does not exist"));

        match subject.kind {
            SubjectKind::Rol => {
                let rol = self
                    .get_optional::<RolWire>(&format!("{ROL_PATH}/by/id"), ("id", &id))
                    .await?
                    .ok_or_else(missing)?
                    .into_domain()?;
                SubjectGraph::from_rol(&rol)
            }
            SubjectKind::Perfil => {
                let perfil = self
                    .get_optional::<PerfilWire>(&format!("{PERFIL_PATH}/by/id"), ("id", &id))
                    .await?
                    .ok_or_else(missing)?
                    .into_domain()?;
                SubjectGraph::from_perfil(&perfil)
            }
        }
    }

    async fn assign(&self, request: &AssignmentRequest) -> AppResult<GraphMember> {
        let path = assignment_path(request, "add")?;
        self.post_assignment(&path, request).await?;
        self.stored_member(&request.member).await
    }

    async fn unassign(&self, request: &AssignmentRequest) -> AppResult<()> {
        let path = assignment_path(request, "delete")?;
        self.post_assignment(&path, request).await
    }
}

#[async_trait]
impl EntityCatalog for HttpIamClient {
    async fn is_facultad_name_unique(
        &self,
        name: &FacultadName,
        excluding: Option<EntityId>,
    ) -> AppResult<bool> {
        let found = self
            .get_optional::<FacultadWire>(
                &format!("{FACULTAD_PATH}/by/nombre"),
                ("nombre", name.as_str()),
            )
            .await?;

        Ok(match found {
            None => true,
            Some(facultad) => excluding.is_some_and(|id| facultad.id == Some(id.value())),
        })
    }

    async fn is_id_rol_unique(
        &self,
        id_rol: IdRol,
        excluding: Option<EntityId>,
    ) -> AppResult<bool> {
        let found = self
            .get_optional::<RolWire>(
                &format!("{ROL_PATH}/by/idRol"),
                ("idRol", &id_rol.value().to_string()),
            )
            .await?;

        Ok(match found {
            None => true,
            Some(rol) => excluding.is_some_and(|id| rol.id == Some(id.value())),
        })
    }

    async fn persist_facultad(&self, facultad: Facultad) -> AppResult<Facultad> {
        self.post_json::<_, FacultadWire>(
            &format!("{FACULTAD_PATH}/add"),
            &FacultadWire::from(&facultad),
        )
        .await?
        .into_domain()
    }

    async fn persist_rol(&self, rol: Rol) -> AppResult<Rol> {
        self.post_json::<_, RolWire>(&format!("{ROL_PATH}/add"), &RolWire::from(&rol))
            .await?
            .into_domain()
    }

    async fn persist_perfil(&self, perfil: Perfil) -> AppResult<Perfil> {
        self.post_json::<_, PerfilWire>(&format!("{PERFIL_PATH}/add"), &PerfilWire::from(&perfil))
            .await?
            .into_domain()
    }
}
