use crate::models::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    ForgotPassword,
    AdminDashboard,
    ManagerDashboard,
    EmployeeDashboard,
    CreateEmployee,
    Expenses,
    NotFound,
}

impl Route {
    pub fn from_path(pathname: &str) -> Self {
        let mut paths = pathname.split('/').collect::<Vec<_>>();
        paths.retain(|path| !path.is_empty());

        match paths.as_slice() {
            [] | ["login"] => Route::Login,
            ["signup"] => Route::Signup,
            ["forgot-password"] => Route::ForgotPassword,
            ["admin_dashboard"] => Route::AdminDashboard,
            ["manager_dashboard"] => Route::ManagerDashboard,
            ["employee_dashboard"] => Route::EmployeeDashboard,
            ["admin_create"] => Route::CreateEmployee,
            ["employee_expenses"] => Route::Expenses,
            _ => Route::NotFound,
        }
    }

    pub fn dashboard(role: Role) -> Self {
        match role {
            Role::Admin => Route::AdminDashboard,
            Role::Manager => Route::ManagerDashboard,
            Role::Employee => Route::EmployeeDashboard,
        }
    }

    pub fn url(&self) -> String {
        match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::ForgotPassword => "/forgot-password",
            Route::AdminDashboard => "/admin_dashboard",
            Route::ManagerDashboard => "/manager_dashboard",
            Route::EmployeeDashboard => "/employee_dashboard",
            Route::CreateEmployee => "/admin_create",
            Route::Expenses => "/employee_expenses",
            Route::NotFound => "/notfound",
        }
        .to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_url_parses_back() {
        for route in [
            Route::Login,
            Route::Signup,
            Route::ForgotPassword,
            Route::AdminDashboard,
            Route::ManagerDashboard,
            Route::EmployeeDashboard,
            Route::CreateEmployee,
            Route::Expenses,
        ] {
            assert_eq!(Route::from_path(&route.url()), route);
        }
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Route::Login);
        assert_eq!(Route::from_path("/employee_expenses/"), Route::Expenses);
        assert_eq!(Route::from_path("/admin_dashboard/extra"), Route::NotFound);
    }
}
