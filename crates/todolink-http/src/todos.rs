//! CRUD calls on the todo collection.

use reqwest::Method;
use tracing::{debug, instrument};

use todolink_core::{NewTodo, Result, TodoId, TodoItem};

use crate::endpoints::GenericResponse;
use crate::pipeline::RequestPipeline;
use crate::request::OutboundRequest;

/// The protected todo endpoints, called through the [`RequestPipeline`].
///
/// A non-2xx final response is returned as [`todolink_core::Error::Protocol`].
#[derive(Debug, Clone)]
pub struct TodoGateway {
    pipeline: RequestPipeline,
    collection: String,
}

impl TodoGateway {
    pub fn new(pipeline: RequestPipeline, collection: impl Into<String>) -> Self {
        Self {
            pipeline,
            collection: collection.into().trim_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        self.pipeline.client().url(&self.collection)
    }

    fn item_url(&self, id: TodoId) -> String {
        self.pipeline
            .client()
            .url(&format!("{}/{}", self.collection, id))
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<TodoItem>> {
        debug!("Listing todos");
        let request = OutboundRequest::new(Method::GET, self.collection_url());
        self.pipeline
            .execute(request)
            .await?
            .error_for_status()?
            .json()
    }

    #[instrument(skip(self, todo), fields(title = %todo.title))]
    pub async fn create(&self, todo: &NewTodo) -> Result<GenericResponse> {
        debug!("Creating todo");
        let request = OutboundRequest::new(Method::POST, self.collection_url()).json(todo)?;
        self.pipeline
            .execute(request)
            .await?
            .error_for_status()?
            .json()
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: TodoId) -> Result<TodoItem> {
        debug!("Getting todo");
        let request = OutboundRequest::new(Method::GET, self.item_url(id));
        self.pipeline
            .execute(request)
            .await?
            .error_for_status()?
            .json()
    }

    #[instrument(skip(self, todo), fields(id = todo.todo_id))]
    pub async fn update(&self, todo: &TodoItem) -> Result<GenericResponse> {
        debug!("Updating todo");
        let request = OutboundRequest::new(Method::PUT, self.item_url(todo.todo_id)).json(todo)?;
        self.pipeline
            .execute(request)
            .await?
            .error_for_status()?
            .json()
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: TodoId) -> Result<GenericResponse> {
        debug!("Deleting todo");
        let request = OutboundRequest::new(Method::DELETE, self.item_url(id));
        self.pipeline
            .execute(request)
            .await?
            .error_for_status()?
            .json()
    }
}
