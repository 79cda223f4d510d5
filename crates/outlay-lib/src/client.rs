use std::rc::Rc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::host::Host;
use crate::models::{
    Credentials, EmployeeCreated, Expense, ExpenseCreated, ForgotPasswordRequest, LoginResponse,
    Manager, MessageResponse, NewEmployee, NewExpense, OcrData, OcrResponse, ReceiptFile, Session,
    SignupRequest, SignupResponse, UserInfo,
};
use crate::route::Route;
use crate::session::{SessionKey, SessionStore};
use crate::transport::{Body, HttpRequest, HttpResponse, Method, Transport};
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Required,
    /// 401 on these endpoints means bad credentials, not an expired session.
    Public,
}

/// Talks to the expense backend on behalf of the signed-in user.
pub struct ApiClient {
    session: Rc<dyn SessionStore>,
    transport: Rc<dyn Transport>,
    host: Rc<dyn Host>,
}

impl ApiClient {
    pub fn new(
        session: Rc<dyn SessionStore>,
        transport: Rc<dyn Transport>,
        host: Rc<dyn Host>,
    ) -> Self {
        Self {
            session,
            transport,
            host,
        }
    }

    pub fn session(&self) -> &Rc<dyn SessionStore> {
        &self.session
    }

    pub fn host(&self) -> &Rc<dyn Host> {
        &self.host
    }

    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Body>,
    ) -> Result<HttpResponse> {
        let request = HttpRequest::new(method, endpoint).body(body.unwrap_or(Body::Empty));
        self.dispatch(request, Auth::Required).await
    }

    async fn dispatch(&self, mut request: HttpRequest, auth: Auth) -> Result<HttpResponse> {
        request.bearer = self.session.token();
        debug!("{:?} {}", request.method, request.endpoint);

        let response = self.transport.send(request).await?;

        if response.status == 401 && auth == Auth::Required {
            info!("session rejected by server, logging out");
            self.session.clear();
            self.host.navigate(&Route::Login);
            return Err(Error::Unauthenticated);
        }
        if !response.is_success() {
            return Err(response.api_error());
        }

        Ok(response)
    }

    fn json<T: Serialize>(value: &T) -> Result<Body> {
        Ok(Body::Json(serde_json::to_value(value)?))
    }

    /// Signs in and stores the returned session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let request = HttpRequest::new(Method::Post, "/api/login").body(Self::json(&credentials)?);
        let response = self.dispatch(request, Auth::Public).await?;

        let session = response.json::<LoginResponse>()?.into_session()?;
        self.session.clear();
        self.session.set(&session);
        info!("logged in as {:?}", session.role);

        Ok(session)
    }

    pub fn logout(&self) {
        self.session.clear();
        self.host.navigate(&Route::Login);
    }

    pub async fn signup(&self, data: &SignupRequest) -> Result<SignupResponse> {
        data.validate()?;
        let request = HttpRequest::new(Method::Post, "/api/signup").body(Self::json(data)?);
        self.dispatch(request, Auth::Public).await?.json()
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        let data = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        let request =
            HttpRequest::new(Method::Post, "/api/forgot-password").body(Self::json(&data)?);
        self.dispatch(request, Auth::Public).await?.json()
    }

    pub async fn current_user(&self) -> Result<UserInfo> {
        self.request("/api/me", Method::Get, None).await?.json()
    }

    pub async fn create_employee(&self, data: &NewEmployee) -> Result<EmployeeCreated> {
        data.validate()?;
        let body = Self::json(&data.payload())?;
        self.request("/api/create-employee", Method::Post, Some(body))
            .await?
            .json()
    }

    pub async fn managers(&self, company_id: &str) -> Result<Vec<Manager>> {
        let request = HttpRequest::new(Method::Get, "/api/managers").query("company_id", company_id);
        self.dispatch(request, Auth::Required).await?.json()
    }

    /// Lists expenses of `user_id`, or of the signed-in user when `None`.
    pub async fn expenses(&self, user_id: Option<&str>) -> Result<Vec<Expense>> {
        let user_id = user_id
            .map(str::to_string)
            .or_else(|| self.session.get(SessionKey::UserId));

        let mut request = HttpRequest::new(Method::Get, "/api/expenses");
        if let Some(user_id) = user_id {
            request = request.query("user_id", user_id);
        }
        self.dispatch(request, Auth::Required).await?.json()
    }

    pub async fn create_expense(&self, data: &NewExpense) -> Result<ExpenseCreated> {
        self.request("/api/expenses", Method::Post, Some(Self::json(data)?))
            .await?
            .json()
    }

    pub async fn delete_expense(&self, id: &str) -> Result<()> {
        let endpoint = format!("/api/expenses/{}", urlencoding::encode(id));
        self.request(&endpoint, Method::Delete, None).await?;
        Ok(())
    }

    /// Sends a receipt image to the OCR endpoint. The file is checked
    /// locally first and rejected without a request when it is not an
    /// accepted image or is too large.
    pub async fn upload_receipt_for_ocr(&self, file: ReceiptFile) -> Result<OcrData> {
        validate::receipt(&file.mime, file.size())?;

        let response = self
            .request("/api/ocr", Method::Post, Some(Body::Receipt(file)))
            .await?;
        let status = response.status;
        match response.json::<OcrResponse>()? {
            OcrResponse {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            OcrResponse { message, .. } => Err(Error::Api {
                status,
                detail: message
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| "Could not read the receipt".to_string()),
            }),
        }
    }
}
