use std::rc::Rc;

use anyhow::anyhow;
use dominator::{clone, html, link, with_node, Dom, EventOptions};
use futures_signals::map_ref;
use futures_signals::signal::{self, Mutable, SignalExt};
use js_sys::Uint8Array;
use outlay_lib::client::ApiClient;
use outlay_lib::error::{Error, Field};
use outlay_lib::models::{Category, Expense, PaymentMethod, ReceiptFile};
use outlay_lib::route::Route;
use outlay_lib::session::SessionStore;
use outlay_lib::validate::RECEIPT_MIME_TYPES;
use outlay_lib::workflow::{ExpenseForm, ExpenseList, ExpenseWorkflow, Stage, Tab, DATE_FORMAT};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::common::{events, form, snackbar, Spinner};
use crate::utils::AsyncLoader;

pub struct Expenses {
    client: Rc<ApiClient>,
    workflow: Rc<ExpenseWorkflow>,
    receipt: Mutable<Option<File>>,
    loader: AsyncLoader,
}

async fn read_receipt(file: &File) -> anyhow::Result<ReceiptFile> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| anyhow!("error reading {}: {:?}", file.name(), e))?;
    let bytes = Uint8Array::new(&buffer).to_vec();

    Ok(ReceiptFile::new(file.name(), file.type_(), bytes))
}

impl Expenses {
    pub fn new(client: Rc<ApiClient>) -> Rc<Self> {
        Rc::new(Self {
            workflow: ExpenseWorkflow::new(client.clone()),
            client,
            receipt: Mutable::new(None),
            loader: AsyncLoader::new(),
        })
    }

    fn select_receipt(page: Rc<Self>, file: File) {
        // size() is a JS number
        if page.workflow.check_receipt(&file.type_(), file.size() as u64).is_err() {
            page.receipt.set(None);
            return;
        }
        page.receipt.set(Some(file));
    }

    pub fn upload(page: Rc<Self>) {
        let Some(file) = page.receipt.get_cloned() else {
            return;
        };

        page.loader.load(clone!(page => async move {
            let receipt = match read_receipt(&file).await {
                Ok(receipt) => receipt,
                Err(e) => {
                    error!("{:#}", e);
                    snackbar::show("Could not read the selected file".to_string());
                    return;
                }
            };

            match page.workflow.upload(receipt).await {
                Ok(()) => {
                    page.receipt.set(None);
                    snackbar::show("Receipt scanned, please review the details before submitting".to_string());
                }
                Err(Error::Validation(_)) | Err(Error::Unauthenticated) => {}
                Err(e) => {
                    snackbar::show(format!("{} You can enter the details manually.", e.user_message()));
                }
            }
        }));
    }

    pub fn submit(page: Rc<Self>) {
        page.loader.load(clone!(page => async move {
            match page.workflow.submit().await {
                Ok(()) => snackbar::show("Expense submitted successfully".to_string()),
                Err(Error::Validation(_)) => {}
                Err(e) => snackbar::show_error(&e),
            }
        }));
    }

    pub fn refresh(page: Rc<Self>) {
        page.loader.load(clone!(page => async move {
            if let Err(e) = page.workflow.refresh().await {
                error!("error loading expenses: {}", e);
            }
        }));
    }

    pub fn delete(page: Rc<Self>, id: String) {
        page.loader.load(clone!(page => async move {
            match page.workflow.delete(&id).await {
                Ok(true) => snackbar::show("Expense deleted".to_string()),
                Ok(false) => {}
                Err(e) => snackbar::show_error(&e),
            }
        }));
    }

    fn render_topbar(page: Rc<Self>) -> Dom {
        let dashboard = page
            .client
            .session()
            .role()
            .map(Route::dashboard)
            .unwrap_or(Route::Login);

        html!("div", {
            .class("topbar")
            .children(&mut [
                link!(dashboard.url(), {
                    .text("Back")
                }),
                html!("span", {
                    .class("title")
                    .text("Expenses")
                }),
            ])
        })
    }

    fn render_tabs(page: Rc<Self>) -> Dom {
        html!("div", {
            .class("tabs")
            .children([(Tab::Upload, "Upload receipt"), (Tab::List, "My expenses")].into_iter().map(|(tab, label)| {
                html!("button", {
                    .class("tab")
                    .class_signal("active", page.workflow.tab.signal_ref(move |current| *current == tab))
                    .text(label)
                    .event(clone!(page => move |_: events::Click| {
                        page.workflow.show_tab(tab);
                        if tab == Tab::List && *page.workflow.expenses.lock_ref() == ExpenseList::NotLoaded {
                            Self::refresh(page.clone());
                        }
                    }))
                })
            }))
        })
    }

    fn render_input(
        page: &Rc<Self>,
        field: Field,
        kind: &'static str,
        label: &'static str,
        get: fn(&ExpenseForm) -> String,
        set: fn(&mut ExpenseForm, String),
    ) -> Dom {
        let workflow = page.workflow.clone();

        html!("div", {
            .class("field")
            .children(&mut [
                html!("label", {
                    .text(label)
                }),
                html!("input" => HtmlInputElement, {
                    .attribute("type", kind)
                    .class_signal("invalid", workflow.errors.signal_ref(move |errors| errors.get(field).is_some()))
                    .property_signal("value", workflow.form.signal_ref(get).dedupe_cloned())
                    .with_node!(input => {
                        .event(clone!(workflow => move |_: events::Input| {
                            let value = input.value();
                            workflow.edit(field, move |form| set(form, value));
                        }))
                    })
                }),
                form::error(&workflow.errors, field),
            ])
        })
    }

    fn render_category_select(page: &Rc<Self>) -> Dom {
        let workflow = page.workflow.clone();

        html!("div", {
            .class("field")
            .children(&mut [
                html!("label", {
                    .text("Category")
                }),
                html!("select" => HtmlSelectElement, {
                    .children(Category::ALL.iter().map(|category| html!("option", {
                        .attribute("value", category.as_str())
                        .text(category.as_str())
                    })))
                    .property_signal("value", workflow.form.signal_ref(|form| form.category.as_str()).dedupe())
                    .with_node!(select => {
                        .event(clone!(workflow => move |_: events::Change| {
                            let category = Category::from(select.value().as_str());
                            workflow.edit(Field::Category, move |form| form.category = category);
                        }))
                    })
                }),
            ])
        })
    }

    fn render_paid_by_select(page: &Rc<Self>) -> Dom {
        let workflow = page.workflow.clone();

        html!("div", {
            .class("field")
            .children(&mut [
                html!("label", {
                    .text("Paid by")
                }),
                html!("select" => HtmlSelectElement, {
                    .children(PaymentMethod::ALL.iter().map(|method| html!("option", {
                        .attribute("value", method.as_str())
                        .text(method.as_str())
                    })))
                    .property_signal("value", workflow.form.signal_ref(|form| form.paid_by.as_str()).dedupe())
                    .with_node!(select => {
                        .event(clone!(workflow => move |_: events::Change| {
                            let method = PaymentMethod::from(select.value().as_str());
                            workflow.edit(Field::PaidBy, move |form| form.paid_by = method);
                        }))
                    })
                }),
            ])
        })
    }

    fn render_remark(page: &Rc<Self>) -> Dom {
        let workflow = page.workflow.clone();

        html!("div", {
            .class("field")
            .children(&mut [
                html!("label", {
                    .text("Remark")
                }),
                html!("textarea" => HtmlTextAreaElement, {
                    .attribute("rows", "3")
                    .property_signal("value", workflow.form.signal_ref(|form| form.remark.clone()).dedupe_cloned())
                    .with_node!(textarea => {
                        .event(clone!(workflow => move |_: events::Input| {
                            let value = textarea.value();
                            workflow.edit(Field::Remark, move |form| form.remark = value);
                        }))
                    })
                }),
            ])
        })
    }

    fn render_receipt_picker(page: Rc<Self>) -> Dom {
        html!("div", {
            .class("receipt-picker")
            .children(&mut [
                html!("input" => HtmlInputElement, {
                    .attribute("type", "file")
                    .attribute("accept", &RECEIPT_MIME_TYPES.join(","))
                    .with_node!(input => {
                        .event(clone!(page => move |_: events::Change| {
                            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                                Self::select_receipt(page.clone(), file);
                            }
                            input.set_value("");
                        }))
                    })
                }),
                html!("span", {
                    .text_signal(page.receipt.signal_ref(|file| {
                        file.as_ref().map(|file| file.name()).unwrap_or_else(|| "No file selected".to_string())
                    }))
                }),
                html!("button", {
                    .text("Scan receipt")
                    .attribute_signal("disabled", map_ref! {
                        let missing = page.receipt.signal_ref(|file| file.is_none()),
                        let uploading = page.workflow.is_uploading() =>
                        (*missing || *uploading).then_some("true")
                    })
                    .event(clone!(page => move |_: events::Click| {
                        Self::upload(page.clone());
                    }))
                }),
                form::error(&page.workflow.errors, Field::Receipt),
                Spinner::render(page.workflow.is_uploading()),
            ])
        })
    }

    fn render_form(page: Rc<Self>) -> Dom {
        html!("div", {
            .visible_signal(page.workflow.tab.signal_ref(|tab| *tab == Tab::Upload))
            .children(&mut [
                Self::render_receipt_picker(page.clone()),
            ])
            .child_signal(page.workflow.stage.signal().map(|stage| (stage == Stage::Extracted).then(|| html!("div", {
                .class("notice")
                .text("Details extracted from your receipt")
            }))))
            .children(&mut [
                html!("form", {
                    .style("display", "flex")
                    .style("flex-direction", "column")
                    .event_with_options(&EventOptions::preventable(), |e: events::KeyDown| {
                        if e.key() == "Enter" {
                            e.prevent_default();
                        }
                    })
                    .children(&mut [
                        Self::render_input(&page, Field::Employee, "text", "Employee", |form| form.employee.clone(), |form, value| form.employee = value),
                        Self::render_input(&page, Field::Description, "text", "Description", |form| form.description.clone(), |form, value| form.description = value),
                        Self::render_input(&page, Field::Amount, "number", "Amount", |form| form.amount.clone(), |form, value| form.amount = value),
                        Self::render_input(&page, Field::Date, "date", "Date", |form| form.date.clone(), |form, value| form.date = value),
                        Self::render_category_select(&page),
                        Self::render_paid_by_select(&page),
                        Self::render_remark(&page),
                        html!("button", {
                            .attribute("type", "submit")
                            .attribute_signal("disabled", page.workflow.is_submitting().map(|submitting| submitting.then_some("true")))
                            .text_signal(page.workflow.is_submitting().map(|submitting| if submitting { "Submitting..." } else { "Submit expense" }))
                            .event_with_options(&EventOptions::preventable(), clone!(page => move |e: events::Click| {
                                e.prevent_default();
                                Self::submit(page.clone());
                            }))
                        }),
                    ])
                }),
            ])
        })
    }

    fn render_expense(page: Rc<Self>, expense: Expense) -> Dom {
        let submitted = expense
            .submitted_at()
            .map(|submitted| submitted.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        html!("tr", {
            .children(&mut [
                html!("td", {
                    .text(&expense
                        .date()
                        .map(|date| date.format(DATE_FORMAT).to_string())
                        .unwrap_or_else(|| expense.date.clone()))
                }),
                html!("td", {
                    .text(&expense.description)
                }),
                html!("td", {
                    .text(expense.category.as_str())
                }),
                html!("td", {
                    .text(expense.paid_by.as_str())
                }),
                html!("td", {
                    .class("amount")
                    .text(&format!("{:.2}", expense.amount))
                }),
                html!("td", {
                    .class(["status", expense.status.as_str()])
                    .text(expense.status.as_str())
                }),
                html!("td", {
                    .text(&submitted)
                }),
                html!("td", {
                    .children(&mut [
                        html!("button", {
                            .class("danger")
                            .text("Delete")
                            .event(clone!(page => move |_: events::Click| {
                                Self::delete(page.clone(), expense.id.clone());
                            }))
                        }),
                    ])
                }),
            ])
        })
    }

    fn render_list(page: Rc<Self>) -> Dom {
        html!("div", {
            .visible_signal(page.workflow.tab.signal_ref(|tab| *tab == Tab::List))
            .child_signal(page.workflow.expenses.signal_cloned().map(clone!(page => move |list| Some(match list {
                ExpenseList::NotLoaded | ExpenseList::Loading => Spinner::render(signal::always(true)),
                ExpenseList::Empty => html!("div", {
                    .class("empty")
                    .text("No expenses uploaded yet")
                }),
                ExpenseList::Failed(message) => html!("div", {
                    .class("error")
                    .children(&mut [
                        html!("span", {
                            .text(&message)
                        }),
                        html!("button", {
                            .text("Retry")
                            .event(clone!(page => move |_: events::Click| {
                                Self::refresh(page.clone());
                            }))
                        }),
                    ])
                }),
                ExpenseList::Loaded(expenses) => html!("table", {
                    .children(&mut [
                        html!("thead", {
                            .children(&mut [
                                html!("tr", {
                                    .children(["Date", "Description", "Category", "Paid by", "Amount", "Status", "Submitted", ""].into_iter().map(|heading| html!("th", {
                                        .text(heading)
                                    })))
                                }),
                            ])
                        }),
                        html!("tbody", {
                            .children(expenses.into_iter().map(|expense| Self::render_expense(page.clone(), expense)))
                        }),
                    ])
                }),
            }))))
        })
    }

    pub fn render(page: Rc<Self>) -> Dom {
        Self::refresh(page.clone());

        html!("div", {
            .class("main")
            .children(&mut [
                Self::render_topbar(page.clone()),
                html!("div", {
                    .class("topbar-spacing")
                }),
                html!("div", {
                    .class("content")
                    .style("max-width", "1024px")
                    .style("margin", "auto")
                    .children(&mut [
                        Self::render_tabs(page.clone()),
                        Self::render_form(page.clone()),
                        Self::render_list(page),
                    ])
                }),
            ])
        })
    }
}
