//! A small in-process task service speaking the REST contract the client
//! consumes, with every request recorded for assertions.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{Value, json};

/// One request as the service saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct State {
    tasks: Vec<Value>,
    next_id: u32,
    requests: Vec<Recorded>,
    /// When set, every request is answered with this status and raw body
    fail_with: Option<(u16, String)>,
}

/// Handle to a running stub service. The listener thread lives until the
/// test process exits.
#[derive(Clone)]
pub struct StubServer {
    pub base_url: String,
    state: Arc<Mutex<State>>,
}

impl StubServer {
    pub fn start() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// Start with a seeded collection; records without an `id` get one.
    pub fn with_tasks(tasks: Vec<Value>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let mut state = State::default();
        for mut task in tasks {
            if task.get("id").is_none() {
                state.next_id += 1;
                task["id"] = json!(format!("t{}", state.next_id));
            }
            state.tasks.push(task);
        }
        let state = Arc::new(Mutex::new(state));

        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let shared = Arc::clone(&shared);
                thread::spawn(move || serve(stream, &shared));
            }
        });

        StubServer { base_url, state }
    }

    /// Answer everything from now on with `status` and `body`
    pub fn fail_with(&self, status: u16, body: &str) {
        self.state.lock().unwrap().fail_with = Some((status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests other than the initial `GET /tasks` loads
    pub fn writes(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != "GET")
            .collect()
    }

    pub fn tasks(&self) -> Vec<Value> {
        self.state.lock().unwrap().tasks.clone()
    }
}

/// Base URL of a port nothing listens on
pub fn dead_server_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn serve(stream: TcpStream, state: &Mutex<State>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 && reader.read_exact(&mut body).is_err() {
        return;
    }
    let body: Option<Value> = serde_json::from_slice(&body).ok();

    let (status, response) = {
        let mut state = state.lock().unwrap();
        state.requests.push(Recorded {
            method: method.clone(),
            path: path.clone(),
            body: body.clone(),
        });
        match state.fail_with.clone() {
            Some((status, raw)) => (status, raw),
            None => {
                let (status, value) = route(&mut state, &method, &path, body);
                (status, value.to_string())
            }
        }
    };

    let reason = match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Error",
    };
    let mut stream = stream;
    let _ = write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        response.len(),
        response
    );
    let _ = stream.flush();
}

fn route(state: &mut State, method: &str, path: &str, body: Option<Value>) -> (u16, Value) {
    let id = path.strip_prefix("/tasks/");
    match (method, id) {
        ("GET", None) if path == "/tasks" => (200, Value::Array(state.tasks.clone())),
        ("POST", None) if path == "/tasks" => {
            let body = body.unwrap_or_else(|| json!({}));
            let text = body["task"].as_str().unwrap_or_default();
            if text.is_empty() {
                return (400, json!({"message": "Task is required"}));
            }
            state.next_id += 1;
            let mut record = json!({
                "id": format!("t{}", state.next_id),
                "task": text,
                "completed": false,
                "category": body["category"].as_str().unwrap_or("general"),
                "dueDateTime": body["dueDateTime"].as_str().unwrap_or(""),
                "isImportant": body["isImportant"].as_bool().unwrap_or(false),
            });
            if let Some(items) = body.get("items") {
                record["items"] = items.clone();
            }
            state.tasks.push(record.clone());
            (201, record)
        }
        ("PUT", Some(id)) => match state.tasks.iter_mut().find(|t| t["id"] == id) {
            Some(task) => {
                if let Some(Value::Object(fields)) = body {
                    for (k, v) in fields {
                        if k != "id" {
                            task[k.as_str()] = v;
                        }
                    }
                }
                (200, json!({"message": "Task updated"}))
            }
            None => (404, json!({"message": "Task not found"})),
        },
        ("DELETE", Some(id)) => match state.tasks.iter().position(|t| t["id"] == id) {
            Some(pos) => {
                state.tasks.remove(pos);
                (200, json!({"message": "Task deleted"}))
            }
            None => (404, json!({"message": "Task not found"})),
        },
        _ => (404, json!({"message": "Not found"})),
    }
}
