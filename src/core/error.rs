use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use rust_decimal::Decimal;

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// MySQL server error numbers that mean "another transaction holds the row"
const ER_LOCK_WAIT_TIMEOUT: u16 = 1205;
const ER_LOCK_DEADLOCK: u16 = 1213;

/// Business-rule violations. Each variant is a distinct reason surfaced verbatim to the caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Amount must be between {min} and {max}")]
    AmountOutOfRange { min: Decimal, max: Decimal },

    #[error("Term must be between {min} and {max} days")]
    TermOutOfRange { min: i32, max: i32 },

    #[error("Payment frequency '{0}' is not allowed for this route")]
    FrequencyNotAllowed(String),

    #[error("The route has no cash register assigned")]
    NoRegisterForRoute,

    #[error("The cash register is closed")]
    RegisterClosed,

    #[error("Insufficient register balance to disburse this credit (available {available}, requested {requested})")]
    InsufficientRegisterBalance {
        available: Decimal,
        requested: Decimal,
    },

    #[error("The client is not valid or must be updated")]
    InvalidClient,

    #[error("There is no active shift on the cash register")]
    NoActiveShift,

    #[error("The client already reached the limit of {limit} active credits")]
    ActiveCreditLimitReached { limit: i32 },

    #[error("Payment cannot exceed {percent}% of the initial debt ({max_amount})")]
    PaymentExceedsMaxPercent {
        percent: Decimal,
        max_amount: Decimal,
    },

    #[error("Payment cannot exceed the outstanding balance: {balance}")]
    PaymentExceedsOutstandingBalance { balance: Decimal },

    #[error("Insufficient balance in cash register (available {available}, requested {requested})")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Term must be a positive number of days, got {0}")]
    InvalidTerm(i32),

    #[error("Total debt {total_debt} cannot be split into {count} installments")]
    InstallmentAmountTooSmall { total_debt: Decimal, count: usize },

    #[error("The cash register already has an open shift")]
    ShiftAlreadyOpen,

    #[error("Origin and destination registers must differ")]
    SameRegisterTransfer,
}

/// Problems only an operator can fix by correcting configuration data.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("There is no credit configuration for route {route_id}")]
    NoPolicyForRoute { route_id: String },

    #[error("Invalid payment frequency: {0}")]
    InvalidFrequency(String),

    #[error("{0}")]
    InvalidSetting(String),
}

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Business-rule violation, transaction rolled back
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Missing or malformed configuration data
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing caller identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A row lock could not be acquired within the bounded wait
    #[error("Resource busy, try again")]
    Busy,

    /// Ledger or allocation invariant violated; never partially committed
    #[error("Consistency violation: {0}")]
    Consistency(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(number) = err
            .as_database_error()
            .and_then(|db_err| db_err.try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>())
            .map(|mysql_err| mysql_err.number())
        {
            if number == ER_LOCK_WAIT_TIMEOUT || number == ER_LOCK_DEADLOCK {
                return AppError::Busy;
            }
        }
        AppError::Database(err)
    }
}

impl AppError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn consistency(msg: impl Into<String>) -> Self {
        AppError::Consistency(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Short machine-readable category for API clients
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Configuration(_) => "configuration",
            AppError::NotFound(_) => "not_found",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Busy => "busy",
            AppError::Consistency(_) | AppError::Database(_) | AppError::Internal(_) => "internal",
        }
    }

    /// Message safe to show to callers. Lock and consistency details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Busy => "Resource busy, try again".to_string(),
            AppError::Consistency(_) | AppError::Database(_) | AppError::Internal(_) => {
                "Internal error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "kind": self.kind(),
                "message": self.public_message(),
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Busy => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Consistency(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
