use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Declares a closed set of backend labels where any unrecognized label
/// falls back to `$default`.
macro_rules! labels {
    ($name:ident, default = $default:ident, { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .unwrap_or($name::$default)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from(s.as_str())
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                v.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labels!(Category, default = Other, {
    Food => "Food",
    Transportation => "Transportation",
    Accommodation => "Accommodation",
    OfficeSupplies => "Office Supplies",
    Entertainment => "Entertainment",
    Medical => "Medical",
    Utilities => "Utilities",
    Other => "Other",
});

labels!(PaymentMethod, default = Cash, {
    Cash => "Cash",
    CreditCard => "Credit Card",
    DebitCard => "Debit Card",
    Upi => "UPI",
});

labels!(ExpenseStatus, default = Pending, {
    Pending => "Pending",
    Approved => "Approved",
    Rejected => "Rejected",
});

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl Default for ExpenseStatus {
    fn default() -> Self {
        ExpenseStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(rename = "expense_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub employee: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    /// As stored by the server, which does not enforce a format.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub paid_by: PaymentMethod,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub status: ExpenseStatus,
    #[serde(rename = "submitted", default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub company_id: String,
}

impl Expense {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    pub fn submitted_at(&self) -> Option<NaiveDateTime> {
        self.submitted_at.as_deref().and_then(|submitted| {
            NaiveDateTime::parse_from_str(submitted, "%Y-%m-%dT%H:%M:%S%.f").ok()
        })
    }
}

/// Body of `POST /api/expenses`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub employee: String,
    pub description: String,
    pub date: NaiveDate,
    pub category: Category,
    pub paid_by: PaymentMethod,
    pub remark: Option<String>,
    pub amount: f64,
    pub status: ExpenseStatus,
    pub user_id: String,
    pub company_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExpenseCreated {
    #[serde(default, alias = "id")]
    pub expense_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
