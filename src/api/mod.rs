//! Gateway to the REST task collection.
//!
//! [`TaskApi`] is the seam between the client and the backend: the HTTP
//! implementation lives in [`http`], the background dispatcher in [`worker`].
//! Every call the client makes is described by a [`Request`] and answered by
//! an [`Outcome`]; [`execute`] is the one place that maps the first onto the
//! second.

pub mod http;
pub mod worker;

use crate::model::task::{Change, NewTask, Task};

pub use http::HttpTaskApi;
pub use worker::Gateway;

/// Error type for calls against the task service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Connection refused, timeout, DNS failure, ...
    #[error("could not reach server: {0}")]
    Transport(String),
    /// Non-2xx response, with the body's `message` when it carried one
    #[error("server returned {status}{}", with_colon(.message))]
    Status { status: u16, message: Option<String> },
    #[error("could not decode response: {0}")]
    Decode(String),
}

fn with_colon(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl ApiError {
    /// The message the server put in its error body, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } if !m.trim().is_empty() => Some(m),
            _ => None,
        }
    }
}

/// The four operations of the task collection
pub trait TaskApi {
    /// `GET /tasks`
    fn list(&self) -> Result<Vec<Task>, ApiError>;
    /// `POST /tasks`
    fn create(&self, task: &NewTask) -> Result<Task, ApiError>;
    /// `PUT /tasks/{id}` with the full record
    fn update(&self, task: &Task) -> Result<(), ApiError>;
    /// `DELETE /tasks/{id}`
    fn delete(&self, id: &str) -> Result<(), ApiError>;
}

impl<T: TaskApi + ?Sized> TaskApi for Box<T> {
    fn list(&self) -> Result<Vec<Task>, ApiError> {
        (**self).list()
    }
    fn create(&self, task: &NewTask) -> Result<Task, ApiError> {
        (**self).create(task)
    }
    fn update(&self, task: &Task) -> Result<(), ApiError> {
        (**self).update(task)
    }
    fn delete(&self, id: &str) -> Result<(), ApiError> {
        (**self).delete(id)
    }
}

/// What a create call produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateKind {
    Task,
    List,
}

/// A call the controller wants made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Load,
    Create { payload: NewTask, kind: CreateKind },
    /// `record` is the full record with `change` already applied
    Update { record: Task, change: Change },
    Delete { id: String },
}

/// The answer to a [`Request`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Loaded(Result<Vec<Task>, ApiError>),
    Created {
        kind: CreateKind,
        result: Result<Task, ApiError>,
    },
    Updated {
        id: String,
        change: Change,
        result: Result<(), ApiError>,
    },
    Deleted {
        id: String,
        result: Result<(), ApiError>,
    },
}

impl Outcome {
    /// The error carried by this outcome, if the call failed
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Outcome::Loaded(r) => r.as_ref().err(),
            Outcome::Created { result, .. } => result.as_ref().err(),
            Outcome::Updated { result, .. } => result.as_ref().err(),
            Outcome::Deleted { result, .. } => result.as_ref().err(),
        }
    }

    /// Message shown when the server gave none
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Outcome::Loaded(_) => "Failed to fetch tasks",
            Outcome::Created {
                kind: CreateKind::Task,
                ..
            } => "Failed to add task",
            Outcome::Created {
                kind: CreateKind::List,
                ..
            } => "Failed to create list",
            Outcome::Updated { .. } => "Failed to update task",
            Outcome::Deleted { .. } => "Failed to delete task",
        }
    }
}

/// Perform one request. No retries.
pub fn execute<A: TaskApi + ?Sized>(api: &A, request: Request) -> Outcome {
    match request {
        Request::Load => Outcome::Loaded(api.list()),
        Request::Create { payload, kind } => Outcome::Created {
            kind,
            result: api.create(&payload),
        },
        Request::Update { record, change } => Outcome::Updated {
            result: api.update(&record),
            id: record.id,
            change,
        },
        Request::Delete { id } => Outcome::Deleted {
            result: api.delete(&id),
            id,
        },
    }
}
