//! Receipt upload, expense submission and the expense list.
//!
//! ```text
//! Idle -> Uploading -> Extracted -> Editing -> Submitting -> Success
//!            |                        ^            |
//!            +--------(failure)-------+------------+
//! ```
//!
//! The list shown after a change is always re-fetched from the server.

use std::rc::Rc;

use chrono::{Local, NaiveDate};
use futures_signals::signal::{Mutable, Signal};

use crate::client::ApiClient;
use crate::error::{Error, Field, FieldErrors, Result};
use crate::models::{
    Category, Expense, ExpenseStatus, NewExpense, OcrData, PaymentMethod, ReceiptFile, Session,
};
use crate::validate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this expense?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Uploading,
    Extracted,
    Editing,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Upload,
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseList {
    NotLoaded,
    Loading,
    Empty,
    Loaded(Vec<Expense>),
    Failed(String),
}

/// What the user sees in the expense form. Values stay as typed until
/// submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub employee: String,
    pub description: String,
    pub amount: String,
    pub date: String,
    pub category: Category,
    pub paid_by: PaymentMethod,
    pub remark: String,
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl ExpenseForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            employee: String::new(),
            description: String::new(),
            amount: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            category: Category::default(),
            paid_by: PaymentMethod::default(),
            remark: String::new(),
        }
    }

    pub fn from_ocr(data: OcrData, today: NaiveDate) -> Self {
        let date = data
            .date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok())
            .unwrap_or(today);

        Self {
            employee: data.employee.unwrap_or_default(),
            description: data.description.unwrap_or_default(),
            amount: data.amount.map(|amount| amount.to_string()).unwrap_or_default(),
            date: date.format(DATE_FORMAT).to_string(),
            category: data.category.as_deref().map(Category::from).unwrap_or_default(),
            paid_by: data.paid_by.as_deref().map(PaymentMethod::from).unwrap_or_default(),
            remark: data.remark.unwrap_or_default(),
        }
    }

    /// Checks the form and normalizes it into a request body.
    pub fn to_new_expense(&self, session: &Session) -> Result<NewExpense> {
        let mut errors = FieldErrors::new();

        validate::required(
            &mut errors,
            Field::Description,
            &self.description,
            "Description is required",
        );

        let amount = match self.amount.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() && amount > 0.0 => Some(amount),
            Ok(_) => {
                errors.push(Field::Amount, "Amount must be greater than 0");
                None
            }
            Err(_) if self.amount.trim().is_empty() => {
                errors.push(Field::Amount, "Amount is required");
                None
            }
            Err(_) => {
                errors.push(Field::Amount, "Amount must be a number");
                None
            }
        };

        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok();
        if date.is_none() {
            errors.push(Field::Date, "Please enter a valid date");
        }

        let (amount, date) = match (amount, date) {
            (Some(amount), Some(date)) if errors.is_empty() => (amount, date),
            _ => return Err(Error::Validation(errors)),
        };

        let employee = match self.employee.trim() {
            "" => session.user_name.clone().unwrap_or_default(),
            employee => employee.to_string(),
        };
        let remark = Some(self.remark.trim().to_string()).filter(|remark| !remark.is_empty());

        Ok(NewExpense {
            employee,
            description: self.description.trim().to_string(),
            date,
            category: self.category,
            paid_by: self.paid_by,
            remark,
            amount,
            status: ExpenseStatus::Pending,
            user_id: session.user_id.clone().unwrap_or_default(),
            company_id: session.company_id.clone().unwrap_or_default(),
        })
    }
}

pub struct ExpenseWorkflow {
    client: Rc<ApiClient>,
    pub stage: Mutable<Stage>,
    pub form: Mutable<ExpenseForm>,
    pub errors: Mutable<FieldErrors>,
    pub tab: Mutable<Tab>,
    pub expenses: Mutable<ExpenseList>,
}

impl ExpenseWorkflow {
    pub fn new(client: Rc<ApiClient>) -> Rc<Self> {
        Rc::new(Self {
            client,
            stage: Mutable::new(Stage::Idle),
            form: Mutable::new(ExpenseForm::new(today())),
            errors: Mutable::new(FieldErrors::new()),
            tab: Mutable::new(Tab::Upload),
            expenses: Mutable::new(ExpenseList::NotLoaded),
        })
    }

    /// Submit controls are disabled while this is `true`.
    pub fn is_submitting(&self) -> impl Signal<Item = bool> + use<> {
        self.stage.signal_ref(|stage| *stage == Stage::Submitting)
    }

    pub fn is_uploading(&self) -> impl Signal<Item = bool> + use<> {
        self.stage.signal_ref(|stage| *stage == Stage::Uploading)
    }

    pub fn show_tab(&self, tab: Tab) {
        self.tab.set_neq(tab);
    }

    /// Applies a user edit to one field and clears that field's error.
    pub fn edit<F>(&self, field: Field, f: F)
    where
        F: FnOnce(&mut ExpenseForm),
    {
        f(&mut self.form.lock_mut());
        self.errors.lock_mut().remove(field);

        let mut stage = self.stage.lock_mut();
        if matches!(
            *stage,
            Stage::Idle | Stage::Extracted | Stage::Success | Stage::Failed
        ) {
            *stage = Stage::Editing;
        }
    }

    /// Rejects a receipt locally before it is read or sent.
    pub fn check_receipt(&self, mime: &str, size: u64) -> Result<()> {
        validate::receipt(mime, size).inspect_err(|e| {
            if let Some(errors) = e.field_errors() {
                self.errors.set(errors.clone());
            }
            self.stage.set(Stage::Failed);
        })
    }

    pub async fn upload(&self, file: ReceiptFile) -> Result<()> {
        self.check_receipt(&file.mime, file.size())?;

        self.errors.set(FieldErrors::new());
        self.stage.set(Stage::Uploading);

        match self.client.upload_receipt_for_ocr(file).await {
            Ok(data) => {
                self.form.set(ExpenseForm::from_ocr(data, today()));
                self.stage.set(Stage::Extracted);
                Ok(())
            }
            Err(e) => {
                warn!("receipt extraction failed, falling back to manual entry: {}", e);
                self.stage.set(Stage::Failed);
                self.form.set(ExpenseForm::new(today()));
                self.stage.set(Stage::Editing);
                Err(e)
            }
        }
    }

    pub async fn submit(&self) -> Result<()> {
        let session = self.client.session().load();
        let expense = match self.form.lock_ref().to_new_expense(&session) {
            Ok(expense) => expense,
            Err(e) => {
                if let Some(errors) = e.field_errors() {
                    self.errors.set(errors.clone());
                }
                self.stage.set(Stage::Editing);
                return Err(e);
            }
        };

        self.errors.set(FieldErrors::new());
        self.stage.set(Stage::Submitting);

        match self.client.create_expense(&expense).await {
            Ok(created) => {
                info!("expense created: {:?}", created.expense_id);
                self.form.set(ExpenseForm::new(today()));
                self.stage.set(Stage::Success);
                self.tab.set(Tab::List);
                if let Err(e) = self.refresh().await {
                    warn!("error refreshing expenses after create: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                self.stage.set(Stage::Editing);
                Err(e)
            }
        }
    }

    /// Replaces the list with what the server has for the current user.
    pub async fn refresh(&self) -> Result<()> {
        self.expenses.set(ExpenseList::Loading);

        match self.client.expenses(None).await {
            Ok(expenses) if expenses.is_empty() => {
                self.expenses.set(ExpenseList::Empty);
                Ok(())
            }
            Ok(expenses) => {
                self.expenses.set(ExpenseList::Loaded(expenses));
                Ok(())
            }
            Err(e) => {
                self.expenses.set(ExpenseList::Failed(e.user_message()));
                Err(e)
            }
        }
    }

    /// Returns `Ok(false)` when the user declined the confirmation.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        if !self.client.host().confirm(DELETE_CONFIRMATION) {
            return Ok(false);
        }

        self.client.delete_expense(id).await?;
        if let Err(e) = self.refresh().await {
            warn!("error refreshing expenses after delete: {}", e);
        }

        Ok(true)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::session::SessionStore;
    use crate::testing::{ExpenseServer, Harness, employee_session, expense_json, json_response};
    use crate::transport::{Body, Method};
    use futures::executor::block_on;

    fn receipt() -> ReceiptFile {
        ReceiptFile::new("lunch.png", "image/png", vec![137, 80, 78, 71])
    }

    fn filled_form() -> ExpenseForm {
        ExpenseForm {
            employee: String::new(),
            description: "Team lunch".to_string(),
            amount: "42.50".to_string(),
            date: "2024-02-10".to_string(),
            category: Category::Food,
            paid_by: PaymentMethod::CreditCard,
            remark: "  ".to_string(),
        }
    }

    #[test]
    fn test_ocr_fills_form() {
        let harness = Harness::new(employee_session());
        harness.transport.push(Ok(json_response(
            200,
            serde_json::json!({
                "success": true,
                "data": {"description": "Lunch", "amount": 12.5, "date": "2024-01-01"}
            }),
        )));
        let workflow = ExpenseWorkflow::new(harness.client.clone());

        block_on(workflow.upload(receipt())).unwrap();

        let form = workflow.form.get_cloned();
        assert_eq!(form.description, "Lunch");
        assert_eq!(form.amount, "12.5");
        assert_eq!(form.date, "2024-01-01");
        assert_eq!(form.category, Category::Other);
        assert_eq!(form.paid_by, PaymentMethod::Cash);
        assert_eq!(workflow.stage.get(), Stage::Extracted);
    }

    #[test]
    fn test_ocr_defaults_missing_date_to_today() {
        let form = ExpenseForm::from_ocr(
            OcrData {
                date: Some("last tuesday".to_string()),
                category: Some("Medical".to_string()),
                paid_by: Some("UPI".to_string()),
                ..Default::default()
            },
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
        );

        assert_eq!(form.date, "2024-05-06");
        assert_eq!(form.category, Category::Medical);
        assert_eq!(form.paid_by, PaymentMethod::Upi);
        assert_eq!(form.amount, "");
    }

    #[test]
    fn test_invalid_receipt_fails_without_request() {
        let harness = Harness::new(employee_session());
        let workflow = ExpenseWorkflow::new(harness.client.clone());

        let result = block_on(workflow.upload(ReceiptFile::new("scan.pdf", "application/pdf", vec![1])));

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(workflow.stage.get(), Stage::Failed);
        assert!(workflow.errors.lock_ref().get(Field::Receipt).is_some());
        assert!(harness.transport.requests().is_empty());
    }

    #[test]
    fn test_failed_upload_falls_back_to_manual_entry() {
        let harness = Harness::new(employee_session());
        harness
            .transport
            .push(Ok(json_response(500, serde_json::json!({"detail": "Failed to process receipt"}))));
        let workflow = ExpenseWorkflow::new(harness.client.clone());
        workflow.edit(Field::Description, |form| form.description = "typed".to_string());

        let result = block_on(workflow.upload(receipt()));

        assert!(matches!(result, Err(Error::Api { status: 500, .. })));
        assert_eq!(workflow.stage.get(), Stage::Editing);
        assert_eq!(workflow.form.get_cloned(), ExpenseForm::new(today()));
    }

    #[test]
    fn test_empty_description_is_not_sent() {
        let harness = Harness::new(employee_session());
        let workflow = ExpenseWorkflow::new(harness.client.clone());
        workflow.form.set(ExpenseForm {
            description: String::new(),
            ..filled_form()
        });

        let result = block_on(workflow.submit());

        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(workflow.errors.lock_ref().get(Field::Description).is_some());
        assert_eq!(workflow.stage.get(), Stage::Editing);
        assert!(harness.transport.requests().is_empty());
    }

    #[test]
    fn test_amount_validation() {
        let session = employee_session();
        for (amount, message) in [
            ("", "Amount is required"),
            ("abc", "Amount must be a number"),
            ("0", "Amount must be greater than 0"),
            ("-3", "Amount must be greater than 0"),
        ] {
            let form = ExpenseForm {
                amount: amount.to_string(),
                ..filled_form()
            };
            let err = form.to_new_expense(&session).unwrap_err();
            assert_eq!(err.field_errors().unwrap().get(Field::Amount), Some(message));
        }

        let form = ExpenseForm {
            date: "10/02/2024".to_string(),
            ..filled_form()
        };
        let err = form.to_new_expense(&session).unwrap_err();
        assert!(err.field_errors().unwrap().get(Field::Date).is_some());
    }

    #[test]
    fn test_form_normalizes_into_request() {
        let expense = filled_form().to_new_expense(&employee_session()).unwrap();

        assert_eq!(expense.amount, 42.5);
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(expense.employee, "Jane");
        assert_eq!(expense.remark, None);
        assert_eq!(expense.user_id, "u1");
        assert_eq!(expense.company_id, "c1");
        assert_eq!(expense.status, ExpenseStatus::Pending);
    }

    #[test]
    fn test_submit_success_refreshes_list() {
        let harness = Harness::with_transport(employee_session(), ExpenseServer::default());
        let workflow = ExpenseWorkflow::new(harness.client.clone());
        workflow.form.set(filled_form());

        block_on(workflow.submit()).unwrap();

        assert_eq!(workflow.stage.get(), Stage::Success);
        assert_eq!(workflow.tab.get(), Tab::List);
        assert_eq!(workflow.form.get_cloned(), ExpenseForm::new(today()));
        match workflow.expenses.get_cloned() {
            ExpenseList::Loaded(expenses) => {
                assert_eq!(expenses.len(), 1);
                assert_eq!(expenses[0].description, "Team lunch");
                assert_eq!(expenses[0].id, "N0");
            }
            other => panic!("unexpected list state {:?}", other),
        }

        let requests = harness.transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[1].method, Method::Get);
    }

    #[test]
    fn test_submit_failure_keeps_values() {
        let harness = Harness::new(employee_session());
        harness
            .transport
            .push(Ok(json_response(400, serde_json::json!({"detail": "Amount must be greater than 0"}))));
        let workflow = ExpenseWorkflow::new(harness.client.clone());
        workflow.form.set(filled_form());

        let result = block_on(workflow.submit());

        assert_eq!(
            result,
            Err(Error::Api {
                status: 400,
                detail: "Amount must be greater than 0".to_string()
            })
        );
        assert_eq!(workflow.stage.get(), Stage::Editing);
        assert_eq!(workflow.form.get_cloned(), filled_form());
        assert_eq!(workflow.tab.get(), Tab::Upload);
        assert_eq!(harness.transport.requests().len(), 1);
    }

    #[test]
    fn test_submit_network_failure_reverts() {
        let harness = Harness::new(employee_session());
        harness
            .transport
            .push(Err(Error::Network("offline".to_string())));
        let workflow = ExpenseWorkflow::new(harness.client.clone());
        workflow.form.set(filled_form());

        assert!(matches!(block_on(workflow.submit()), Err(Error::Network(_))));
        assert_eq!(workflow.stage.get(), Stage::Editing);
        assert_eq!(workflow.form.get_cloned(), filled_form());
    }

    #[test]
    fn test_refresh_states() {
        let harness = Harness::new(employee_session());
        harness.transport.push(Ok(json_response(200, serde_json::json!([]))));
        harness
            .transport
            .push(Ok(json_response(500, serde_json::json!({"detail": "boom"}))));
        let workflow = ExpenseWorkflow::new(harness.client.clone());

        block_on(workflow.refresh()).unwrap();
        assert_eq!(workflow.expenses.get_cloned(), ExpenseList::Empty);

        assert!(block_on(workflow.refresh()).is_err());
        assert_eq!(
            workflow.expenses.get_cloned(),
            ExpenseList::Failed("boom".to_string())
        );
    }

    #[test]
    fn test_delete_removes_from_refreshed_list() {
        let server = ExpenseServer::with_expenses(vec![
            expense_json("E1", "Taxi"),
            expense_json("E2", "Hotel"),
        ]);
        let harness = Harness::with_transport(employee_session(), server);
        let workflow = ExpenseWorkflow::new(harness.client.clone());
        block_on(workflow.refresh()).unwrap();

        assert!(block_on(workflow.delete("E1")).unwrap());

        match workflow.expenses.get_cloned() {
            ExpenseList::Loaded(expenses) => {
                assert!(expenses.iter().all(|expense| expense.id != "E1"));
                assert_eq!(expenses.len(), 1);
            }
            other => panic!("unexpected list state {:?}", other),
        }
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let harness = Harness::with_transport(
            employee_session(),
            ExpenseServer::with_expenses(vec![expense_json("E1", "Taxi")]),
        );
        harness.host.answer_confirm(false);
        let workflow = ExpenseWorkflow::new(harness.client.clone());

        assert!(!block_on(workflow.delete("E1")).unwrap());
        assert!(harness.transport.requests().is_empty());
    }

    #[test]
    fn test_failed_delete_leaves_list() {
        let harness = Harness::new(employee_session());
        harness
            .transport
            .push(Ok(json_response(200, serde_json::json!([expense_json("E1", "Taxi")]))));
        harness
            .transport
            .push(Ok(json_response(404, serde_json::json!({"detail": "Expense not found"}))));
        let workflow = ExpenseWorkflow::new(harness.client.clone());
        block_on(workflow.refresh()).unwrap();
        let before = workflow.expenses.get_cloned();

        assert!(block_on(workflow.delete("E1")).is_err());
        assert_eq!(workflow.expenses.get_cloned(), before);
        assert_eq!(harness.transport.requests().len(), 2);
    }

    #[test]
    fn test_edit_moves_to_editing_and_clears_error() {
        let harness = Harness::new(employee_session());
        let workflow = ExpenseWorkflow::new(harness.client.clone());
        let mut errors = FieldErrors::new();
        errors.push(Field::Description, "Description is required");
        errors.push(Field::Amount, "Amount is required");
        workflow.errors.set(errors);

        workflow.edit(Field::Description, |form| form.description = "Taxi".to_string());

        assert_eq!(workflow.stage.get(), Stage::Editing);
        assert!(workflow.errors.lock_ref().get(Field::Description).is_none());
        assert!(workflow.errors.lock_ref().get(Field::Amount).is_some());
    }

    #[test]
    fn test_unauthorized_submit_logs_out() {
        let harness = Harness::new(employee_session());
        harness
            .transport
            .push(Ok(json_response(401, serde_json::json!({"detail": "Invalid authentication credentials"}))));
        let workflow = ExpenseWorkflow::new(harness.client.clone());
        workflow.form.set(filled_form());

        assert_eq!(block_on(workflow.submit()), Err(Error::Unauthenticated));
        assert!(!harness.session.is_authenticated());
        assert!(matches!(
            harness.transport.requests()[0].body,
            Body::Json(_)
        ));
    }

    #[test]
    fn test_refresh_keeps_records_with_free_form_dates() {
        let mut odd = expense_json("E2", "Hotel");
        odd["date"] = serde_json::json!("15/01/2024");
        let harness = Harness::with_transport(
            employee_session(),
            ExpenseServer::with_expenses(vec![expense_json("E1", "Taxi"), odd]),
        );
        let workflow = ExpenseWorkflow::new(harness.client.clone());

        block_on(workflow.refresh()).unwrap();

        let ExpenseList::Loaded(expenses) = workflow.expenses.get_cloned() else {
            panic!("expected the list to load");
        };
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].id, "E1");
        assert!(expenses[0].date().is_some());
        assert_eq!(expenses[1].date, "15/01/2024");
        assert_eq!(expenses[1].date(), None);
    }
}
