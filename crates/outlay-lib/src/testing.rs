//! In-memory stand-ins for the browser and the backend.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::models::{Role, Session};
use crate::route::Route;
use crate::session::{MemorySessionStore, SessionStore};
use crate::transport::{Body, HttpRequest, HttpResponse, Method, Transport};

pub fn json_response(status: u16, value: serde_json::Value) -> HttpResponse {
    HttpResponse::new(status, value.to_string())
}

pub fn employee_session() -> Session {
    Session {
        token: Some("tok".to_string()),
        role: Some(Role::Employee),
        user_id: Some("u1".to_string()),
        user_name: Some("Jane".to_string()),
        company_id: Some("c1".to_string()),
    }
}

pub fn admin_session() -> Session {
    Session {
        token: Some("tok".to_string()),
        role: Some(Role::Admin),
        user_id: Some("a1".to_string()),
        user_name: Some("Root".to_string()),
        company_id: Some("c1".to_string()),
    }
}

pub struct RecordingHost {
    navigations: RefCell<Vec<Route>>,
    notices: RefCell<Vec<String>>,
    confirms: Cell<bool>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            navigations: RefCell::new(vec![]),
            notices: RefCell::new(vec![]),
            confirms: Cell::new(true),
        }
    }
}

impl RecordingHost {
    pub fn navigations(&self) -> Vec<Route> {
        self.navigations.borrow().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }

    pub fn answer_confirm(&self, answer: bool) {
        self.confirms.set(answer);
    }
}

impl Host for RecordingHost {
    fn navigate(&self, route: &Route) {
        self.navigations.borrow_mut().push(route.clone());
    }

    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, _message: &str) -> bool {
        self.confirms.get()
    }
}

/// Replies with queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<HttpResponse>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn push(&self, reply: Result<HttpResponse>) {
        self.replies.borrow_mut().push_back(reply);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Network("no scripted reply".to_string())))
    }
}

/// A tiny stateful expenses backend.
#[derive(Default)]
pub struct ExpenseServer {
    expenses: RefCell<Vec<serde_json::Value>>,
    requests: RefCell<Vec<HttpRequest>>,
    next_id: Cell<u32>,
}

impl ExpenseServer {
    pub fn with_expenses(expenses: Vec<serde_json::Value>) -> Self {
        let server = Self::default();
        *server.expenses.borrow_mut() = expenses;
        server
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for ExpenseServer {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request.clone());

        let response = match (request.method, request.endpoint.as_str(), request.body) {
            (Method::Get, "/api/expenses", _) => {
                json_response(200, serde_json::Value::Array(self.expenses.borrow().clone()))
            }
            (Method::Post, "/api/expenses", Body::Json(mut expense)) => {
                let id = format!("N{}", self.next_id.get());
                self.next_id.set(self.next_id.get() + 1);
                expense["expense_id"] = serde_json::Value::String(id.clone());
                self.expenses.borrow_mut().push(expense);
                json_response(
                    200,
                    serde_json::json!({"success": true, "message": "Expense created successfully", "expense_id": id}),
                )
            }
            (Method::Delete, endpoint, _) => {
                let id = endpoint.trim_start_matches("/api/expenses/");
                let mut expenses = self.expenses.borrow_mut();
                let before = expenses.len();
                expenses.retain(|expense| expense["expense_id"] != id);
                if expenses.len() < before {
                    json_response(200, serde_json::json!({"success": true}))
                } else {
                    json_response(404, serde_json::json!({"detail": "Expense not found"}))
                }
            }
            _ => json_response(404, serde_json::json!({"detail": "Not Found"})),
        };

        Ok(response)
    }
}

pub struct Harness<T: Transport + 'static> {
    pub client: Rc<ApiClient>,
    pub session: Rc<MemorySessionStore>,
    pub transport: Rc<T>,
    pub host: Rc<RecordingHost>,
}

impl Harness<ScriptedTransport> {
    pub fn new(session: Session) -> Self {
        Harness::with_transport(session, ScriptedTransport::default())
    }
}

impl<T: Transport + 'static> Harness<T> {
    pub fn with_transport(session: Session, transport: T) -> Self {
        let session = Rc::new(MemorySessionStore::with_session(&session));
        let transport = Rc::new(transport);
        let host = Rc::new(RecordingHost::default());
        let client = Rc::new(ApiClient::new(
            session.clone() as Rc<dyn SessionStore>,
            transport.clone() as Rc<dyn Transport>,
            host.clone() as Rc<dyn Host>,
        ));

        Self {
            client,
            session,
            transport,
            host,
        }
    }
}

pub fn expense_json(id: &str, description: &str) -> serde_json::Value {
    serde_json::json!({
        "expense_id": id,
        "user_id": "u1",
        "company_id": "c1",
        "employee": "Jane",
        "description": description,
        "date": "2024-01-01",
        "category": "Food",
        "paid_by": "Cash",
        "amount": 10.0,
        "status": "Pending"
    })
}
