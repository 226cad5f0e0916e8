use std::time::Duration;

use serde::Deserialize;

use super::{ApiError, TaskApi};
use crate::model::config::ServerConfig;
use crate::model::task::{NewTask, Task};

/// Origin a relative base path (e.g. `/api`) is resolved against
const LOCAL_ORIGIN: &str = "http://localhost:5000";

/// Error body the service sends alongside non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// [`TaskApi`] over HTTP/JSON
pub struct HttpTaskApi {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpTaskApi {
    pub fn new(config: &ServerConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build();
        HttpTaskApi {
            base_url: resolve_base_url(&config.base_url),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: &str) -> String {
        format!("{}/tasks/{}", self.base_url, id)
    }
}

/// Normalize a configured base address into an absolute URL without a trailing slash.
pub fn resolve_base_url(base: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else if base.is_empty() || base.starts_with('/') {
        format!("{}{}", LOCAL_ORIGIN, base)
    } else {
        format!("http://{}", base)
    }
}

fn map_error(method: &str, url: &str, err: ureq::Error) -> ApiError {
    let err = match err {
        ureq::Error::Status(status, response) => {
            let message = response
                .into_json::<ErrorBody>()
                .ok()
                .and_then(|body| body.message);
            ApiError::Status { status, message }
        }
        ureq::Error::Transport(t) => ApiError::Transport(t.to_string()),
    };
    tracing::warn!(method, url, error = %err, "request failed");
    err
}

impl TaskApi for HttpTaskApi {
    fn list(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.tasks_url();
        tracing::debug!(url = %url, "GET");
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| map_error("GET", &url, e))?;
        response
            .into_json::<Vec<Task>>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn create(&self, task: &NewTask) -> Result<Task, ApiError> {
        let url = self.tasks_url();
        tracing::debug!(url = %url, category = %task.category, "POST");
        let response = self
            .agent
            .post(&url)
            .send_json(task)
            .map_err(|e| map_error("POST", &url, e))?;
        response
            .into_json::<Task>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn update(&self, task: &Task) -> Result<(), ApiError> {
        let url = self.task_url(&task.id);
        tracing::debug!(url = %url, "PUT");
        self.agent
            .put(&url)
            .send_json(task)
            .map_err(|e| map_error("PUT", &url, e))?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.task_url(id);
        tracing::debug!(url = %url, "DELETE");
        self.agent
            .delete(&url)
            .call()
            .map_err(|e| map_error("DELETE", &url, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_resolution() {
        assert_eq!(resolve_base_url("http://localhost:5000/"), "http://localhost:5000");
        assert_eq!(resolve_base_url("https://tasks.example.com/api"), "https://tasks.example.com/api");
        assert_eq!(resolve_base_url("/api"), "http://localhost:5000/api");
        assert_eq!(resolve_base_url(""), "http://localhost:5000");
        assert_eq!(resolve_base_url("10.0.0.2:5000"), "http://10.0.0.2:5000");
    }

    #[test]
    fn routes() {
        let api = HttpTaskApi::new(&ServerConfig {
            base_url: "http://h:1/".into(),
            timeout_secs: 3,
        });
        assert_eq!(api.base_url(), "http://h:1");
        assert_eq!(api.tasks_url(), "http://h:1/tasks");
        assert_eq!(api.task_url("abc"), "http://h:1/tasks/abc");
    }
}
