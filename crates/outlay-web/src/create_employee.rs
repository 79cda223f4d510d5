use std::rc::Rc;

use dominator::{clone, html, link, with_node, Dom, EventOptions};
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use outlay_lib::client::ApiClient;
use outlay_lib::error::{Field, FieldErrors};
use outlay_lib::models::{EmployeeRole, Manager, NewEmployee};
use outlay_lib::route::Route;
use outlay_lib::session::SessionStore;
use web_sys::HtmlSelectElement;

use crate::common::{events, form, snackbar};
use crate::utils::AsyncLoader;

const ROLES: [EmployeeRole; 2] = [EmployeeRole::Employee, EmployeeRole::Manager];

pub struct CreateEmployee {
    client: Rc<ApiClient>,
    name: Mutable<String>,
    email: Mutable<String>,
    role: Mutable<EmployeeRole>,
    password: Mutable<String>,
    confirm_password: Mutable<String>,
    manager_id: Mutable<Option<String>>,
    managers: MutableVec<Manager>,
    errors: Mutable<FieldErrors>,
    loader: AsyncLoader,
}

impl CreateEmployee {
    pub fn new(client: Rc<ApiClient>) -> Rc<Self> {
        Rc::new(Self {
            client,
            name: Mutable::new("".to_string()),
            email: Mutable::new("".to_string()),
            role: Mutable::new(EmployeeRole::default()),
            password: Mutable::new("".to_string()),
            confirm_password: Mutable::new("".to_string()),
            manager_id: Mutable::new(None),
            managers: MutableVec::new(),
            errors: Mutable::new(FieldErrors::new()),
            loader: AsyncLoader::new(),
        })
    }

    fn company_id(&self) -> String {
        self.client.session().load().company_id.unwrap_or_default()
    }

    fn reset(&self) {
        self.name.set("".to_string());
        self.email.set("".to_string());
        self.role.set(EmployeeRole::default());
        self.password.set("".to_string());
        self.confirm_password.set("".to_string());
        self.manager_id.set(None);
        self.errors.set(FieldErrors::new());
    }

    fn fetch_managers(page: Rc<Self>) {
        let company_id = page.company_id();
        page.loader.load(clone!(page => async move {
            match page.client.managers(&company_id).await {
                Ok(managers) => {
                    page.managers.lock_mut().replace_cloned(managers);
                }
                Err(e) => {
                    error!("error fetching managers: {}", e);
                    snackbar::show_error(&e);
                }
            }
        }));
    }

    pub fn create(page: Rc<Self>) {
        let employee = NewEmployee {
            name: page.name.get_cloned(),
            email: page.email.get_cloned(),
            role: page.role.get(),
            password: page.password.get_cloned(),
            confirm_password: page.confirm_password.get_cloned(),
            manager_id: page.manager_id.get_cloned(),
            company_id: page.company_id(),
        };
        if let Err(e) = employee.validate() {
            form::show_field_errors(&page.errors, &e);
            return;
        }

        page.loader.load(clone!(page => async move {
            match page.client.create_employee(&employee).await {
                Ok(created) => {
                    info!("created {} {:?}", employee.role, created.user_id);
                    page.reset();
                    snackbar::show(created.message.unwrap_or_else(|| "Employee created successfully".to_string()));
                    if employee.role == EmployeeRole::Manager {
                        Self::fetch_managers(page.clone());
                    }
                }
                Err(e) => {
                    if !form::show_field_errors(&page.errors, &e) {
                        snackbar::show_error(&e);
                    }
                }
            }
        }));
    }

    fn render_role_select(page: Rc<Self>) -> Dom {
        html!("div", {
            .class("field")
            .children(&mut [
                html!("label", {
                    .text("Role")
                }),
                html!("select" => HtmlSelectElement, {
                    .children(ROLES.iter().map(|role| html!("option", {
                        .attribute("value", role.as_str())
                        .text(role.as_str())
                    })))
                    .property_signal("value", page.role.signal().map(|role| role.as_str()))
                    .with_node!(select => {
                        .event(clone!(page => move |_: events::Change| {
                            let role = match select.value().as_str() {
                                "manager" => EmployeeRole::Manager,
                                _ => EmployeeRole::Employee,
                            };
                            page.role.set_neq(role);
                            page.errors.lock_mut().remove(Field::Manager);
                        }))
                    })
                }),
            ])
        })
    }

    fn render_manager_select(page: Rc<Self>) -> Dom {
        html!("div", {
            .class("field")
            .visible_signal(page.role.signal().map(|role| role == EmployeeRole::Employee))
            .children(&mut [
                html!("label", {
                    .text("Manager")
                }),
                html!("select" => HtmlSelectElement, {
                    .children(&mut [
                        html!("option", {
                            .attribute("value", "")
                            .text("Select a manager")
                        }),
                    ])
                    .children_signal_vec(page.managers.signal_vec_cloned().map(|manager| html!("option", {
                        .attribute("value", &manager.user_id)
                        .text(&format!("{} ({})", manager.name, manager.email))
                    })))
                    .property_signal("value", page.manager_id.signal_cloned().map(|id| id.unwrap_or_default()))
                    .with_node!(select => {
                        .event(clone!(page => move |_: events::Change| {
                            let value = select.value();
                            page.manager_id.set((!value.is_empty()).then_some(value));
                            page.errors.lock_mut().remove(Field::Manager);
                        }))
                    })
                }),
                form::error(&page.errors, Field::Manager),
            ])
        })
    }

    pub fn render(page: Rc<Self>) -> Dom {
        Self::fetch_managers(page.clone());

        html!("div", {
            .class("main")
            .children(&mut [
                html!("div", {
                    .class("topbar")
                    .children(&mut [
                        link!(Route::AdminDashboard.url(), {
                            .text("Back")
                        }),
                        html!("span", {
                            .class("title")
                            .text("Create employee")
                        }),
                    ])
                }),
                html!("div", {
                    .class("topbar-spacing")
                }),
                html!("div", {
                    .class("content")
                    .style("max-width", "640px")
                    .style("margin", "auto")
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
                                form::input("text", "Full name", &page.name, &page.errors, Field::Name),
                                form::input("email", "Email", &page.email, &page.errors, Field::Email),
                                Self::render_role_select(page.clone()),
                                Self::render_manager_select(page.clone()),
                                form::input("password", "Password", &page.password, &page.errors, Field::Password),
                                form::input("password", "Confirm password", &page.confirm_password, &page.errors, Field::ConfirmPassword),
                                html!("button", {
                                    .attribute("type", "submit")
                                    .attribute_signal("disabled", page.loader.is_loading().map(|loading| loading.then_some("true")))
                                    .text("Create")
                                    .event_with_options(&EventOptions::preventable(), clone!(page => move |e: events::Click| {
                                        e.prevent_default();
                                        Self::create(page.clone());
                                    }))
                                }),
                            ])
                        }),
                    ])
                }),
            ])
        })
    }
}
