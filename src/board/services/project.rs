//! Service layer for projects and their live statistics.

use crate::board::{
    domain::{BoardDomainError, Project, ProjectId, ProjectName, ProjectStats},
    ports::{GatewayError, ProjectGateway, RecordRef, TaskFilter, TaskGateway},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for a partial project update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    name: Option<String>,
    description: Option<Option<String>>,
}

impl UpdateProjectRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Clears the description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Gateway operation failed.
    #[error(transparent)]
    Gateway(GatewayError),
    /// No project exists with the given identifier.
    #[error("project {0} not found")]
    NotFound(ProjectId),
}

impl From<GatewayError> for ProjectServiceError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(RecordRef::Project(id)) => Self::NotFound(id),
            other => Self::Gateway(other),
        }
    }
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project orchestration service.
#[derive(Clone)]
pub struct ProjectService<G, C>
where
    G: ProjectGateway + TaskGateway,
    C: Clock + Send + Sync,
{
    gateway: Arc<G>,
    clock: Arc<C>,
}

impl<G, C> ProjectService<G, C>
where
    G: ProjectGateway + TaskGateway,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(gateway: Arc<G>, clock: Arc<C>) -> Self {
        Self { gateway, clock }
    }

    async fn find_project_or_error(&self, id: ProjectId) -> ProjectServiceResult<Project> {
        self.gateway
            .find_project(id)
            .await?
            .ok_or(ProjectServiceError::NotFound(id))
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError`] when validation fails or the gateway
    /// rejects the write.
    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let name = ProjectName::new(request.name)?;
        let project = Project::new(name, request.description, &*self.clock);
        self.gateway.create_project(&project).await?;
        info!(project_id = %project.id(), "project created");
        Ok(project)
    }

    /// Applies a partial update. Unchanged projects are not written.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for unknown projects,
    /// validation errors, and gateway failures.
    pub async fn update_project(
        &self,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let name = request.name.map(ProjectName::new).transpose()?;
        let mut project = self.find_project_or_error(id).await?;
        let mut changed = false;
        if let Some(name) = name {
            changed |= project.rename(name, &*self.clock);
        }
        if let Some(description) = request.description {
            changed |= project.set_description(description, &*self.clock);
        }
        if changed {
            self.gateway.update_project(&project).await?;
        }
        Ok(project)
    }

    /// Deletes a project and its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for unknown projects and
    /// gateway failures.
    pub async fn delete_project(&self, id: ProjectId) -> ProjectServiceResult<()> {
        self.gateway.delete_project(id).await?;
        info!(project_id = %id, "project deleted");
        Ok(())
    }

    /// Finds a project by id.
    ///
    /// # Errors
    ///
    /// Returns gateway failures.
    pub async fn find_project(&self, id: ProjectId) -> ProjectServiceResult<Option<Project>> {
        Ok(self.gateway.find_project(id).await?)
    }

    /// Lists all projects.
    ///
    /// # Errors
    ///
    /// Returns gateway failures.
    pub async fn list_projects(&self) -> ProjectServiceResult<Vec<Project>> {
        Ok(self.gateway.list_projects().await?)
    }

    /// Recomputes a project's task statistics from its current tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for unknown projects and
    /// gateway failures.
    pub async fn stats(&self, id: ProjectId) -> ProjectServiceResult<ProjectStats> {
        self.find_project_or_error(id).await?;
        let tasks = self.gateway.list_tasks(&TaskFilter::for_project(id)).await?;
        Ok(ProjectStats::compute(id, &tasks))
    }
}
